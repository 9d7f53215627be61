//! GraalVM isolate 生命周期
//!
//! [`Isolate`] 拥有一个原生执行上下文：构造时创建，销毁恰好一次。
//! 显式 [`Isolate::close`] 消耗自身并返回销毁结果；否则由 `Drop` 销毁并记录失败。
//! 销毁后无法再使用，也不会重复销毁。
//!
//! isolate thread 绑定创建它的系统线程，所以 `Isolate` 既不是 `Send` 也不是 `Sync`。

use std::ffi::c_void;
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};

use crate::error::{Result, YamlStarError};
use crate::native::NativeApi;

/// 原生执行上下文句柄
pub struct Isolate {
    api: &'static NativeApi,
    isolate: *mut c_void,
    thread: NonNull<c_void>,
}

impl Isolate {
    /// 创建 isolate（配置参数传空）
    pub fn create(api: &'static NativeApi) -> Result<Self> {
        let mut isolate = ptr::null_mut();
        let mut thread = ptr::null_mut();

        let code = unsafe { (api.create_isolate)(ptr::null_mut(), &mut isolate, &mut thread) };
        if code != 0 {
            return Err(YamlStarError::IsolateCreationFailed { code });
        }

        // 返回成功却没有给出 thread，同样视为创建失败
        let thread = NonNull::new(thread).ok_or(YamlStarError::IsolateCreationFailed { code })?;

        tracing::debug!(target: "yamlstar::isolate", "Created isolate thread {:p}", thread);
        Ok(Self {
            api,
            isolate,
            thread,
        })
    }

    /// 原生函数表
    pub(crate) fn api(&self) -> &'static NativeApi {
        self.api
    }

    /// 传给 `yamlstar_*` 的 isolate thread
    pub(crate) fn thread(&self) -> *mut c_void {
        self.thread.as_ptr()
    }

    /// isolate 本身（只用于诊断）
    pub fn raw_isolate(&self) -> *mut c_void {
        self.isolate
    }

    /// 销毁 isolate 并返回结果
    pub fn close(self) -> Result<()> {
        // 阻止 Drop 再次销毁
        let this = ManuallyDrop::new(self);
        this.tear_down()
    }

    fn tear_down(&self) -> Result<()> {
        let code = unsafe { (self.api.tear_down_isolate)(self.thread.as_ptr()) };
        if code != 0 {
            return Err(YamlStarError::IsolateTeardownFailed { code });
        }
        tracing::debug!(target: "yamlstar::isolate", "Tore down isolate thread {:p}", self.thread);
        Ok(())
    }
}

impl Drop for Isolate {
    fn drop(&mut self) {
        if let Err(e) = self.tear_down() {
            tracing::warn!(target: "yamlstar::isolate", "{}", e);
        }
    }
}

impl std::fmt::Debug for Isolate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Isolate")
            .field("isolate", &self.isolate)
            .field("thread", &self.thread)
            .finish()
    }
}
