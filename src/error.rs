//! 统一错误处理模块
//!
//! 绑定层的所有失败都汇总到 [`YamlStarError`]。
//!
//! ## 错误类型分层
//!
//! - **桥接层错误**: 平台、动态库、isolate 生命周期、FFI 编解码、响应格式
//! - **引擎错误** ([`YamlStarError::Engine`]): libyamlstar 报告的 YAML 内容错误
//!
//! 调用方可以用 [`YamlStarError::is_bridge_failure`] 区分"桥坏了"和"输入不是合法 YAML"。

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// 绑定层错误类型
#[derive(Error, Debug)]
pub enum YamlStarError {
    /// 当前操作系统不在支持列表内
    #[error("Unsupported platform '{platform}' for yamlstar")]
    UnsupportedPlatform { platform: String },

    /// 所有搜索目录都没有找到共享库文件
    #[error(
        "Shared library file '{file_name}' not found\n\
         Search paths: {}\n\
         Build with: cd libyamlstar && make native\n\
         Or set LD_LIBRARY_PATH to include the library location",
        join_paths(.searched)
    )]
    ArtifactNotFound {
        file_name: String,
        searched: Vec<PathBuf>,
    },

    /// dlopen 失败
    #[error("Failed to load library {}: {reason}", .path.display())]
    LibraryLoad { path: PathBuf, reason: String },

    /// 库里缺少必需的入口符号
    #[error("Failed to get symbol '{symbol}': {reason}")]
    MissingSymbol { symbol: &'static str, reason: String },

    #[error("Failed to create isolate (code {code})")]
    IsolateCreationFailed { code: i32 },

    #[error("Failed to tear down isolate (code {code})")]
    IsolateTeardownFailed { code: i32 },

    /// 输入字符串中含有 NUL 字节，无法转成 C 字符串
    #[error("{operation}: input contains a nul byte at position {position}")]
    InvalidInput {
        operation: &'static str,
        position: usize,
    },

    /// 原生函数返回了空指针
    #[error("{operation}: native call returned null")]
    NullResponse { operation: &'static str },

    /// 原生返回的缓冲区不是合法 UTF-8
    #[error("{operation}: response is not valid UTF-8: {source}")]
    Utf8 {
        operation: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    /// 响应信封格式错误（桥接层缺陷，不是 YAML 内容错误）
    #[error("Unexpected response from libyamlstar: {0}")]
    ProtocolDecode(String),

    /// libyamlstar 报告的错误，原样透传 cause
    #[error("{0}")]
    Engine(EngineFailure),

    /// 引擎返回的值无法转换成调用方要求的类型
    #[error("Failed to convert loaded value: {0}")]
    Conversion(#[source] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// 绑定层结果类型
pub type Result<T> = std::result::Result<T, YamlStarError>;

impl YamlStarError {
    /// 是否是引擎报告的 YAML 内容错误
    pub fn is_engine_error(&self) -> bool {
        matches!(self, Self::Engine(_))
    }

    /// 是否是桥接层自身的问题（库、isolate、协议）
    ///
    /// `Conversion` 和 `Config` 属于调用方的问题，两边都不算。
    pub fn is_bridge_failure(&self) -> bool {
        !matches!(
            self,
            Self::Engine(_) | Self::Conversion(_) | Self::Config(_)
        )
    }

    /// 引擎错误详情
    pub fn engine_failure(&self) -> Option<&EngineFailure> {
        match self {
            Self::Engine(failure) => Some(failure),
            _ => None,
        }
    }
}

/// `{"error": {...}}` 中的错误对象
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineFailure {
    /// 引擎给出的错误信息（含行列等上下文）
    pub cause: String,
    /// 引擎内部的错误类型
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// 其余诊断字段
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Display for EngineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.cause)
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(":")
}
