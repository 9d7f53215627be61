//! Native library loading
//!
//! libyamlstar is a GraalVM native image. Five C entry points are used and
//! they are resolved once, when the library is opened, into a [`NativeApi`]
//! table of plain function pointers. The opened library lives in process-wide
//! state for the rest of the process, so those pointers never dangle.

use std::ffi::{c_char, c_int, c_void};

use libloading::{Library, Symbol};
use once_cell::sync::OnceCell;

use crate::config::LibraryConfig;
use crate::error::{Result, YamlStarError};
use crate::locator::{ArtifactLocator, LibraryArtifact};

/// `graal_create_isolate(params, *isolate, *thread)`
pub type CreateIsolateFn =
    unsafe extern "C" fn(*mut c_void, *mut *mut c_void, *mut *mut c_void) -> c_int;
/// `graal_tear_down_isolate(thread)`
pub type TearDownIsolateFn = unsafe extern "C" fn(*mut c_void) -> c_int;
/// `yamlstar_load(thread, yaml)` and `yamlstar_load_all(thread, yaml)`
pub type LoadFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> *const c_char;
/// `yamlstar_version(thread)`
pub type VersionFn = unsafe extern "C" fn(*mut c_void) -> *const c_char;

pub const CREATE_ISOLATE_SYMBOL: &str = "graal_create_isolate";
pub const TEAR_DOWN_ISOLATE_SYMBOL: &str = "graal_tear_down_isolate";
pub const LOAD_SYMBOL: &str = "yamlstar_load";
pub const LOAD_ALL_SYMBOL: &str = "yamlstar_load_all";
pub const VERSION_SYMBOL: &str = "yamlstar_version";

/// Resolved entry points.
///
/// Fields are crate-private: every pointer must honour the libyamlstar
/// calling contract, which only [`NativeLibrary::open`] (or test doubles
/// inside this crate) can vouch for.
#[derive(Clone, Copy)]
pub struct NativeApi {
    pub(crate) create_isolate: CreateIsolateFn,
    pub(crate) tear_down_isolate: TearDownIsolateFn,
    pub(crate) load: LoadFn,
    pub(crate) load_all: LoadFn,
    pub(crate) version: VersionFn,
}

impl std::fmt::Debug for NativeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeApi")
            .field(CREATE_ISOLATE_SYMBOL, &(self.create_isolate as *const ()))
            .field(TEAR_DOWN_ISOLATE_SYMBOL, &(self.tear_down_isolate as *const ()))
            .field(LOAD_SYMBOL, &(self.load as *const ()))
            .field(LOAD_ALL_SYMBOL, &(self.load_all as *const ()))
            .field(VERSION_SYMBOL, &(self.version as *const ()))
            .finish()
    }
}

/// An opened libyamlstar together with its entry points.
pub struct NativeLibrary {
    api: NativeApi,
    artifact: LibraryArtifact,
    // Must outlive `api`.
    _library: Library,
}

impl NativeLibrary {
    /// Open the artifact and resolve all five entry points.
    pub fn open(artifact: LibraryArtifact) -> Result<Self> {
        let library = unsafe { Library::new(&artifact.path) }.map_err(|e| {
            YamlStarError::LibraryLoad {
                path: artifact.path.clone(),
                reason: e.to_string(),
            }
        })?;

        // SAFETY: the types match the GraalVM / libyamlstar C headers.
        let api = unsafe {
            NativeApi {
                create_isolate: symbol::<CreateIsolateFn>(&library, CREATE_ISOLATE_SYMBOL)?,
                tear_down_isolate: symbol::<TearDownIsolateFn>(&library, TEAR_DOWN_ISOLATE_SYMBOL)?,
                load: symbol::<LoadFn>(&library, LOAD_SYMBOL)?,
                load_all: symbol::<LoadFn>(&library, LOAD_ALL_SYMBOL)?,
                version: symbol::<VersionFn>(&library, VERSION_SYMBOL)?,
            }
        };

        tracing::info!(
            target: "yamlstar::native",
            "Loaded {} ({})",
            artifact.path.display(),
            artifact.platform
        );

        Ok(Self {
            api,
            artifact,
            _library: library,
        })
    }

    pub fn api(&self) -> &NativeApi {
        &self.api
    }

    pub fn artifact(&self) -> &LibraryArtifact {
        &self.artifact
    }
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("artifact", &self.artifact)
            .field("api", &self.api)
            .finish()
    }
}

/// Copy a function pointer out of the library.
///
/// # Safety
/// `T` must be the correct function pointer type for `name`.
unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T> {
    let symbol: Symbol<T> =
        library
            .get(name.as_bytes())
            .map_err(|e| YamlStarError::MissingSymbol {
                symbol: name,
                reason: e.to_string(),
            })?;
    Ok(*symbol)
}

static LIBRARY: OnceCell<NativeLibrary> = OnceCell::new();

/// The process-wide library, located and opened on first use.
///
/// Only the first successful call's `config` matters; later calls reuse the
/// already opened library. A failed attempt leaves nothing behind, so a later
/// call may retry with a different configuration.
pub fn global(config: &LibraryConfig) -> Result<&'static NativeLibrary> {
    if let Some(library) = LIBRARY.get() {
        return Ok(library);
    }
    LIBRARY.get_or_try_init(|| -> Result<NativeLibrary> {
        config.validate()?;
        let artifact = ArtifactLocator::from_config(config)?.locate()?;
        NativeLibrary::open(artifact)
    })
}

/// The process-wide library if it has already been opened.
pub fn loaded() -> Option<&'static NativeLibrary> {
    LIBRARY.get()
}
