//! 共享库定位
//!
//! 按优先级在候选目录中查找 `lib<name>.<ext>.<version>`：
//!
//! 1. 开发目录
//! 2. 搜索路径环境变量（冒号分隔，按给定顺序）
//! 3. 额外目录
//! 4. 用户目录 (`~/.local/lib`)
//! 5. 系统目录 (`/usr/local/lib`)
//!
//! 显式路径（`YAMLSTAR_LIBRARY` / `library.path`）跳过以上目录：
//! 指向文件时文件名必须与期望一致，否则按目录处理。
//!
//! 只做文件存在性检查，不会下载或构建。

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::LibraryConfig;
use crate::error::{Result, YamlStarError};
use crate::platform::Platform;

/// 定位结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryArtifact {
    /// 选中的共享库绝对路径
    pub path: PathBuf,
    pub platform: Platform,
    pub version: String,
}

/// 共享库定位器
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    platform: Platform,
    file_name: String,
    version: String,
    explicit: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
}

impl ArtifactLocator {
    /// 用当前平台和进程环境构建定位器
    pub fn from_config(config: &LibraryConfig) -> Result<Self> {
        let platform = Platform::current()?;
        let env_paths = env::var_os(&config.search_path_var);
        Ok(Self::with_env(config, platform, env_paths.as_deref()))
    }

    /// 指定平台和搜索路径变量值，便于测试
    pub fn with_env(
        config: &LibraryConfig,
        platform: Platform,
        env_paths: Option<&OsStr>,
    ) -> Self {
        let mut search_dirs = Vec::new();

        if let Some(dir) = &config.dev_dir {
            search_dirs.push(dir.clone());
        }

        // 空段跳过；非 UTF-8 段原样保留
        if let Some(paths) = env_paths {
            search_dirs
                .extend(env::split_paths(paths).filter(|dir| !dir.as_os_str().is_empty()));
        }

        search_dirs.extend(config.extra_dirs.iter().cloned());

        if let Some(dir) = &config.user_dir {
            search_dirs.push(dir.clone());
        }
        if let Some(dir) = &config.system_dir {
            search_dirs.push(dir.clone());
        }

        Self {
            platform,
            file_name: platform.library_file_name(&config.name, &config.version),
            version: config.version.clone(),
            explicit: config.path.clone(),
            search_dirs,
        }
    }

    /// 期望的文件名
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 按优先级排列的搜索目录
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// 所有候选文件路径，文件名都是 [`Self::file_name`]
    pub fn candidates(&self) -> Vec<PathBuf> {
        match &self.explicit {
            Some(path) if path.file_name() == Some(OsStr::new(&self.file_name)) => {
                vec![path.clone()]
            }
            Some(dir) => vec![dir.join(&self.file_name)],
            None => self
                .search_dirs
                .iter()
                .map(|dir| dir.join(&self.file_name))
                .collect(),
        }
    }

    /// 返回第一个存在的候选文件
    pub fn locate(&self) -> Result<LibraryArtifact> {
        let candidates = self.candidates();

        for candidate in &candidates {
            tracing::debug!(target: "yamlstar::locator", "Checking {}", candidate.display());
            if candidate.is_file() {
                let path = absolutize(candidate);
                tracing::debug!(target: "yamlstar::locator", "Found {}", path.display());
                return Ok(LibraryArtifact {
                    path,
                    platform: self.platform,
                    version: self.version.clone(),
                });
            }
        }

        Err(YamlStarError::ArtifactNotFound {
            file_name: self.file_name.clone(),
            searched: candidates,
        })
    }
}

/// 相对路径按当前目录补全，失败时保持原样
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
