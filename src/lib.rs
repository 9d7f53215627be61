//! # YAMLStar
//!
//! Rust binding for libyamlstar, a pure YAML 1.2 loader shipped as a GraalVM
//! native image shared library.
//!
//! The YAML grammar and type coercion live entirely inside the native
//! library. This crate manages the boundary:
//!
//! - **Locating** `libyamlstar.<so|dylib>.<version>` along an ordered search path
//! - **Loading** it once per process and resolving its entry points
//! - **Isolates**: one GraalVM isolate per [`YamlStar`], torn down exactly once
//! - **Marshalling** strings across the C boundary
//! - **Decoding** the `{"data": ...}` / `{"error": ...}` JSON envelope into
//!   Rust values or a typed [`YamlStarError`]
//!
//! ## Architecture
//!
//! ```text
//! caller
//!   │  load / load_all / version
//!   v
//! YamlStar ──> marshal ──> Isolate ──> NativeApi (libyamlstar)
//!   ^                                        │
//!   └──────────── envelope <── JSON text ────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Config {
//!     host: String,
//!     port: u16,
//! }
//!
//! let ys = yamlstar::YamlStar::new()?;
//! let config: Config = ys.load("host: localhost\nport: 8080")?;
//! assert_eq!(config.port, 8080);
//!
//! let docs: Vec<String> = ys.load_all("---\ndoc1\n---\ndoc2")?;
//! assert_eq!(docs, ["doc1", "doc2"]);
//! # Ok::<(), yamlstar::YamlStarError>(())
//! ```
//!
//! ## Modules
//!
//! - [`locator`]: shared library discovery
//! - [`native`]: process-wide library and entry points
//! - [`isolate`]: isolate lifecycle
//! - [`envelope`]: response decoding
//! - [`config`]: configuration and logging setup

/// Public loader API
pub mod binding;
/// Binding configuration, environment overrides and logging setup
pub mod config;
/// Response envelope decoding
pub mod envelope;
/// Error types
pub mod error;
/// GraalVM isolate lifecycle
pub mod isolate;
/// Shared library discovery
pub mod locator;
mod marshal;
/// Native library loading and entry points
pub mod native;
/// Supported platforms
pub mod platform;

#[cfg(test)]
mod mock_engine;

pub use binding::YamlStar;
pub use config::{init_logging, BindingConfig, LibraryConfig, LoggingConfig};
pub use envelope::Envelope;
pub use error::{EngineFailure, Result, YamlStarError};
pub use locator::{ArtifactLocator, LibraryArtifact};
pub use platform::Platform;

/// The version of libyamlstar this binding works with.
pub const LIBYAMLSTAR_VERSION: &str = "0.1.0";
