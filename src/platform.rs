//! 平台识别
//!
//! libyamlstar 只为两类平台发布共享库，扩展名完全由平台决定。

use crate::error::{Result, YamlStarError};

/// 支持的平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    MacOs,
}

impl Platform {
    /// 当前进程运行的平台
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// 从 `std::env::consts::OS` 风格的名字解析
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::MacOs),
            other => Err(YamlStarError::UnsupportedPlatform {
                platform: other.to_string(),
            }),
        }
    }

    /// 共享库扩展名
    pub fn library_extension(self) -> &'static str {
        match self {
            Self::Linux => "so",
            Self::MacOs => "dylib",
        }
    }

    /// `lib<name>.<ext>.<version>`，例如 `libyamlstar.so.0.1.0`
    pub fn library_file_name(self, name: &str, version: &str) -> String {
        format!("lib{}.{}.{}", name, self.library_extension(), version)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => f.write_str("linux"),
            Self::MacOs => f.write_str("macos"),
        }
    }
}
