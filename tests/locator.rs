//! 定位器与配置的公共接口测试（不需要真实共享库）

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;

use yamlstar::{ArtifactLocator, BindingConfig, LibraryConfig, Platform, YamlStarError};

#[test]
fn test_locate_from_toml_config() {
    let lib_dir = tempfile::tempdir().unwrap();
    let artifact = lib_dir
        .path()
        .join(Platform::Linux.library_file_name("yamlstar", "0.1.0"));
    fs::write(&artifact, b"").unwrap();

    let toml = format!(
        r#"
[library]
dev_dir = "/nonexistent/dev"
extra_dirs = ["{}"]
"#,
        lib_dir.path().display()
    );
    let config = BindingConfig::from_toml_str(&toml).unwrap();
    config.validate().unwrap();

    let locator = ArtifactLocator::with_env(
        &config.library,
        Platform::Linux,
        Some(OsStr::new("/nonexistent/env")),
    );
    let found = locator.locate().unwrap();
    assert_eq!(found.path, artifact);
    assert_eq!(found.version, yamlstar::LIBYAMLSTAR_VERSION);
}

#[test]
fn test_missing_artifact_message() {
    let config = LibraryConfig {
        dev_dir: Some(PathBuf::from("/nonexistent/dev")),
        user_dir: None,
        system_dir: Some(PathBuf::from("/nonexistent/usr/local/lib")),
        ..LibraryConfig::default()
    };
    let err = ArtifactLocator::with_env(&config, Platform::MacOs, None)
        .locate()
        .unwrap_err();
    assert!(matches!(err, YamlStarError::ArtifactNotFound { .. }));

    let msg = err.to_string();
    assert!(msg.contains("libyamlstar.dylib.0.1.0"));
    assert!(msg.contains("/nonexistent/dev/libyamlstar.dylib.0.1.0"));
    assert!(msg.contains("/nonexistent/usr/local/lib/libyamlstar.dylib.0.1.0"));
    assert!(msg.contains("cd libyamlstar && make native"));
}

#[test]
fn test_unsupported_platform() {
    let err = Platform::from_os("windows").unwrap_err();
    assert_eq!(err.to_string(), "Unsupported platform 'windows' for yamlstar");
    assert!(err.is_bridge_failure());
}
