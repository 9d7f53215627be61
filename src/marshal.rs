//! Call marshalling across the C boundary.
//!
//! Inputs become NUL-terminated buffers that live only for the duration of
//! the call. Responses are copied into an owned `String` before returning,
//! since the engine may reuse its buffer on the next call against the same
//! isolate thread.

use std::ffi::{c_char, CStr, CString};

use crate::error::{Result, YamlStarError};
use crate::isolate::Isolate;
use crate::native::{LOAD_ALL_SYMBOL, LOAD_SYMBOL, VERSION_SYMBOL};

/// Native operations reachable through an isolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Operation {
    Load,
    LoadAll,
    Version,
}

impl Operation {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::LoadAll => "load_all",
            Self::Version => "version",
        }
    }

    /// C symbol implementing the operation.
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Self::Load => LOAD_SYMBOL,
            Self::LoadAll => LOAD_ALL_SYMBOL,
            Self::Version => VERSION_SYMBOL,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Invoke `operation` and return the engine's response text.
///
/// `input` is the YAML source for `Load`/`LoadAll` (missing means empty) and
/// is ignored by `Version`.
pub(crate) fn invoke(isolate: &Isolate, operation: Operation, input: Option<&str>) -> Result<String> {
    let api = isolate.api();
    let thread = isolate.thread();

    tracing::debug!(
        target: "yamlstar::marshal",
        "Calling {} ({} input bytes)",
        operation.symbol(),
        input.map_or(0, str::len)
    );

    let raw = match operation {
        Operation::Version => unsafe { (api.version)(thread) },
        Operation::Load | Operation::LoadAll => {
            let buffer = encode(operation, input.unwrap_or(""))?;
            let entry = if operation == Operation::Load {
                api.load
            } else {
                api.load_all
            };
            // `buffer` outlives the call and is released right after it.
            unsafe { entry(thread, buffer.as_ptr()) }
        }
    };

    unsafe { copy_response(operation, raw) }
}

fn encode(operation: Operation, input: &str) -> Result<CString> {
    CString::new(input).map_err(|e| YamlStarError::InvalidInput {
        operation: operation.name(),
        position: e.nul_position(),
    })
}

/// # Safety
/// `raw` must be null or point to a NUL-terminated buffer that stays valid
/// until this function returns.
unsafe fn copy_response(operation: Operation, raw: *const c_char) -> Result<String> {
    if raw.is_null() {
        return Err(YamlStarError::NullResponse {
            operation: operation.symbol(),
        });
    }
    let text = CStr::from_ptr(raw)
        .to_str()
        .map_err(|source| YamlStarError::Utf8 {
            operation: operation.symbol(),
            source,
        })?;
    Ok(text.to_owned())
}
