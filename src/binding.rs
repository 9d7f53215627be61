//! Public binding API.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{BindingConfig, LibraryConfig};
use crate::envelope;
use crate::error::{Result, YamlStarError};
use crate::isolate::Isolate;
use crate::locator::LibraryArtifact;
use crate::marshal::{self, Operation};
use crate::native;

/// A YAML 1.2 loader backed by libyamlstar.
///
/// Each instance owns one GraalVM isolate, created in the constructor and torn
/// down by [`YamlStar::close`] or on drop. The isolate thread is bound to the
/// creating OS thread, so `YamlStar` is neither `Send` nor `Sync`; create one
/// per thread.
///
/// ```no_run
/// let ys = yamlstar::YamlStar::new()?;
/// let data: serde_json::Value = ys.load("key: value")?;
/// assert_eq!(data["key"], "value");
/// # Ok::<(), yamlstar::YamlStarError>(())
/// ```
pub struct YamlStar {
    isolate: Isolate,
    artifact: Option<&'static LibraryArtifact>,
}

impl YamlStar {
    /// Create a loader using the default configuration plus environment
    /// overrides (`YAMLSTAR_LIBRARY`).
    ///
    /// # Errors
    /// Fails when the platform is unsupported, the library cannot be found or
    /// opened, or the isolate cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_library_config(&BindingConfig::from_env().library)
    }

    /// Create a loader from an explicit configuration.
    pub fn with_config(config: &BindingConfig) -> Result<Self> {
        Self::with_library_config(&config.library)
    }

    pub fn with_library_config(config: &LibraryConfig) -> Result<Self> {
        let library = native::global(config)?;
        let isolate = Isolate::create(library.api())?;
        tracing::debug!(
            target: "yamlstar::binding",
            "YAMLStar ready ({})",
            library.artifact().path.display()
        );
        Ok(Self {
            isolate,
            artifact: Some(library.artifact()),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_api(api: &'static native::NativeApi) -> Result<Self> {
        Ok(Self {
            isolate: Isolate::create(api)?,
            artifact: None,
        })
    }

    /// Load a YAML string and return its document, deserialized.
    ///
    /// Empty input loads as `null`. Input holding several documents is
    /// passed to the engine as is; whatever it reports as `data` is returned.
    ///
    /// # Errors
    /// [`YamlStarError::Engine`] when the YAML is invalid,
    /// [`YamlStarError::Conversion`] when the value does not fit `T`, and
    /// bridge errors otherwise.
    pub fn load<T: DeserializeOwned>(&self, yaml: &str) -> Result<T> {
        let response = marshal::invoke(&self.isolate, Operation::Load, Some(yaml))?;
        envelope::decode_one(&response)
    }

    /// Load a YAML string and return every document, in order.
    ///
    /// Input without documents yields an empty `Vec`.
    pub fn load_all<T: DeserializeOwned>(&self, yaml: &str) -> Result<Vec<T>> {
        let response = marshal::invoke(&self.isolate, Operation::LoadAll, Some(yaml))?;
        envelope::decode_many(&response)
    }

    /// [`YamlStar::load`] into a dynamic JSON value.
    pub fn load_value(&self, yaml: &str) -> Result<Value> {
        self.load(yaml)
    }

    /// [`YamlStar::load_all`] into dynamic JSON values.
    pub fn load_all_values(&self, yaml: &str) -> Result<Vec<Value>> {
        self.load_all(yaml)
    }

    /// Version string reported by the running engine.
    pub fn version(&self) -> Result<String> {
        let response = marshal::invoke(&self.isolate, Operation::Version, None)?;
        let version = response.trim();
        if version.is_empty() {
            return Err(YamlStarError::ProtocolDecode(
                "yamlstar_version returned an empty string".to_string(),
            ));
        }
        Ok(version.to_string())
    }

    /// Path of the shared library backing this loader.
    pub fn library_path(&self) -> Option<&'static Path> {
        self.artifact.map(|artifact| artifact.path.as_path())
    }

    /// Tear down the isolate, reporting failure.
    ///
    /// Dropping the loader does the same but can only log a failure.
    pub fn close(self) -> Result<()> {
        self.isolate.close()
    }
}

impl std::fmt::Debug for YamlStar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YamlStar")
            .field("isolate", &self.isolate)
            .field("library", &self.library_path())
            .finish()
    }
}
