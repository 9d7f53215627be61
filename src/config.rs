/// 绑定配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖和日志初始化
use serde::{Deserialize, Serialize};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::LIBYAMLSTAR_VERSION;

/// 显式指定共享库路径的环境变量
pub const LIBRARY_ENV: &str = "YAMLSTAR_LIBRARY";
/// 覆盖日志级别的环境变量
pub const LOG_ENV: &str = "YAMLSTAR_LOG";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 绑定主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// 共享库查找配置
    #[serde(default)]
    pub library: LibraryConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BindingConfig {
    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var_os(key));
    }

    /// 用 `lookup` 代替进程环境应用覆盖
    ///
    /// 空值和无法识别的日志级别会被忽略。
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<OsString>) {
        if let Some(path) = lookup(LIBRARY_ENV) {
            if !path.is_empty() {
                self.library.path = Some(PathBuf::from(path));
            }
        }
        if let Some(val) = lookup(LOG_ENV) {
            match val.to_str().and_then(LogLevel::parse) {
                Some(level) => self.logging.level = level,
                None => tracing::warn!(
                    target: "yamlstar::config",
                    "Ignoring {}={:?}: unknown log level",
                    LOG_ENV,
                    val
                ),
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.library.validate()
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./yamlstar.toml
    /// 2. ~/.config/yamlstar/config.toml
    /// 3. 使用默认配置
    ///
    /// 环境变量覆盖在最后应用。
    pub fn load_or_default() -> Self {
        let mut config = Self::from_first_file(&Self::config_file_candidates());
        config.apply_env_overrides();
        config
    }

    /// 默认的配置文件查找顺序
    pub fn config_file_candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from("yamlstar.toml")];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("yamlstar").join("config.toml"));
        }
        candidates
    }

    /// 第一个能解析的 TOML 文件，都不可用时返回默认配置
    ///
    /// 不存在的文件直接跳过，解析失败的文件记录警告后跳过。不应用环境变量覆盖。
    pub fn from_first_file(candidates: &[PathBuf]) -> Self {
        candidates
            .iter()
            .filter(|path| path.is_file())
            .find_map(|path| match Self::from_toml_file(path) {
                Ok(config) => {
                    tracing::debug!(target: "yamlstar::config", "Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(target: "yamlstar::config", "Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default()
    }
}

/// 共享库查找配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// 库名，文件名为 `lib<name>.<ext>.<version>`
    pub name: String,

    /// 绑定的精确版本
    pub version: String,

    /// 显式路径，设置后跳过目录搜索
    ///
    /// 文件名必须是 `lib<name>.<ext>.<version>`，否则当作目录，在其中查找该文件名。
    pub path: Option<PathBuf>,

    /// 开发目录（最高优先级）
    pub dev_dir: Option<PathBuf>,

    /// 冒号分隔的搜索路径环境变量
    pub search_path_var: String,

    /// 额外目录，排在环境变量之后
    pub extra_dirs: Vec<PathBuf>,

    /// 用户目录，默认 `~/.local/lib`
    pub user_dir: Option<PathBuf>,

    /// 系统目录
    pub system_dir: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: "yamlstar".to_string(),
            version: LIBYAMLSTAR_VERSION.to_string(),
            path: None,
            dev_dir: Some(PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../libyamlstar/lib"
            ))),
            search_path_var: "LD_LIBRARY_PATH".to_string(),
            extra_dirs: Vec::new(),
            user_dir: dirs::home_dir().map(|home| home.join(".local").join("lib")),
            system_dir: Some(PathBuf::from("/usr/local/lib")),
        }
    }
}

impl LibraryConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [("name", &self.name), ("version", &self.version)] {
            if value.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "library.{} must not be empty",
                    field
                )));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(ConfigError::ValidationError(format!(
                    "library.{} must not contain path separators: {}",
                    field, value
                )));
            }
        }
        if self.search_path_var.is_empty() {
            return Err(ConfigError::ValidationError(
                "library.search_path_var must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 优先
    pub level: LogLevel,

    /// 是否输出 target
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            with_target: true,
        }
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// 初始化日志系统
///
/// 配置tracing日志框架。`RUST_LOG` 存在时覆盖配置里的级别。
/// 已经安装过全局 subscriber 时返回 `false`。
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
        .is_ok()
}
