//! 测试用的 mock 原生引擎
//!
//! 用 `extern "C"` 函数实现与 libyamlstar 相同的调用约定，组装成 [`NativeApi`]。
//! 只实现测试需要的一小部分 YAML：标量、单行 `key: value`、`---` 分隔的多文档。
//!
//! 特殊输入：
//! - `!raw <text>`: 原样返回 `<text>`
//! - `!error <cause>`: 返回错误信封
//! - `!null`: 返回空指针
//! - `!bytes`: 返回非 UTF-8 缓冲区
//!
//! isolate thread 故意泄漏，地址不会被复用，测试可以在销毁后读取计数。

use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::native::NativeApi;

pub(crate) const MOCK_VERSION: &str = "0.1.0-SNAPSHOT";

#[derive(Default)]
struct MockThread {
    teardowns: AtomicUsize,
    // 每次调用覆盖，模拟引擎复用缓冲区
    response: Mutex<Option<CString>>,
}

const MOCK_TABLE: NativeApi = NativeApi {
    create_isolate: mock_create_isolate,
    tear_down_isolate: mock_tear_down_isolate,
    load: mock_load,
    load_all: mock_load_all,
    version: mock_version,
};

pub(crate) static MOCK_API: NativeApi = MOCK_TABLE;

pub(crate) static FAILING_CREATE_API: NativeApi = NativeApi {
    create_isolate: failing_create_isolate,
    ..MOCK_TABLE
};

pub(crate) static NULL_THREAD_API: NativeApi = NativeApi {
    create_isolate: null_thread_create_isolate,
    ..MOCK_TABLE
};

pub(crate) static FAILING_TEARDOWN_API: NativeApi = NativeApi {
    tear_down_isolate: failing_tear_down_isolate,
    ..MOCK_TABLE
};

/// 某个 isolate thread 被销毁的次数
pub(crate) fn teardown_count(thread: *mut c_void) -> usize {
    unsafe { &*(thread as *const MockThread) }
        .teardowns
        .load(Ordering::SeqCst)
}

unsafe extern "C" fn mock_create_isolate(
    params: *mut c_void,
    isolate: *mut *mut c_void,
    thread: *mut *mut c_void,
) -> c_int {
    if !params.is_null() || thread.is_null() {
        return 1;
    }
    let handle = Box::into_raw(Box::new(MockThread::default())) as *mut c_void;
    if !isolate.is_null() {
        *isolate = handle;
    }
    *thread = handle;
    0
}

unsafe extern "C" fn failing_create_isolate(
    _params: *mut c_void,
    _isolate: *mut *mut c_void,
    _thread: *mut *mut c_void,
) -> c_int {
    2
}

unsafe extern "C" fn null_thread_create_isolate(
    _params: *mut c_void,
    _isolate: *mut *mut c_void,
    _thread: *mut *mut c_void,
) -> c_int {
    0
}

unsafe extern "C" fn mock_tear_down_isolate(thread: *mut c_void) -> c_int {
    let previous = (*(thread as *const MockThread))
        .teardowns
        .fetch_add(1, Ordering::SeqCst);
    // 重复销毁返回错误码
    if previous == 0 {
        0
    } else {
        9
    }
}

unsafe extern "C" fn failing_tear_down_isolate(thread: *mut c_void) -> c_int {
    mock_tear_down_isolate(thread);
    3
}

unsafe extern "C" fn mock_load(thread: *mut c_void, input: *const c_char) -> *const c_char {
    let input = CStr::from_ptr(input).to_string_lossy().into_owned();
    match special(&input) {
        Some(response) => respond(thread, response),
        None => respond(thread, Some(envelope(load_document(&input)))),
    }
}

unsafe extern "C" fn mock_load_all(thread: *mut c_void, input: *const c_char) -> *const c_char {
    let input = CStr::from_ptr(input).to_string_lossy().into_owned();
    if let Some(response) = special(&input) {
        return respond(thread, response);
    }
    let documents: Result<Vec<Value>, String> =
        split_documents(&input).iter().map(|doc| load_document(doc)).collect();
    respond(thread, Some(envelope(documents.map(Value::Array))))
}

unsafe extern "C" fn mock_version(thread: *mut c_void) -> *const c_char {
    respond(thread, Some(MOCK_VERSION.as_bytes().to_vec()))
}

unsafe fn respond(thread: *mut c_void, bytes: Option<Vec<u8>>) -> *const c_char {
    let Some(bytes) = bytes else {
        return ptr::null();
    };
    let state = &*(thread as *const MockThread);
    let mut slot = state.response.lock().unwrap();
    let buffer = slot.insert(CString::new(bytes).unwrap());
    buffer.as_ptr()
}

/// 特殊指令；`Some(None)` 表示返回空指针
fn special(input: &str) -> Option<Option<Vec<u8>>> {
    if let Some(text) = input.strip_prefix("!raw ") {
        return Some(Some(text.as_bytes().to_vec()));
    }
    if let Some(cause) = input.strip_prefix("!error ") {
        let body = json!({"error": {"cause": cause, "type": "MockError"}});
        return Some(Some(body.to_string().into_bytes()));
    }
    match input {
        "!null" => Some(None),
        "!bytes" => Some(Some(vec![0xff, 0xfe, 0xfd])),
        _ => None,
    }
}

fn envelope(result: Result<Value, String>) -> Vec<u8> {
    let body = match result {
        Ok(data) => json!({ "data": data }),
        Err(cause) => json!({"error": {"cause": cause, "type": "MockError"}}),
    };
    body.to_string().into_bytes()
}

/// 按 `---` 行切分，`...` 结束当前文档
fn split_documents(input: &str) -> Vec<String> {
    let mut documents = Vec::new();
    // (是否由 `---` 开始, 文本)
    let mut current: Option<(bool, String)> = None;

    for line in input.lines() {
        match line.trim_end() {
            "---" => {
                flush(&mut documents, current.take());
                current = Some((true, String::new()));
            }
            "..." => flush(&mut documents, current.take()),
            text => {
                let (_, doc) = current.get_or_insert_with(|| (false, String::new()));
                doc.push_str(text);
                doc.push('\n');
            }
        }
    }
    flush(&mut documents, current);
    documents
}

/// 没有 `---` 且只有空白的文档不算
fn flush(documents: &mut Vec<String>, current: Option<(bool, String)>) {
    if let Some((explicit, text)) = current {
        if explicit || !text.trim().is_empty() {
            documents.push(text);
        }
    }
}

fn load_document(document: &str) -> Result<Value, String> {
    let text = document.trim();
    if text.is_empty() {
        return Ok(Value::Null);
    }
    if text.contains('"') && text.matches('"').count() % 2 == 1 {
        return Err(format!("unterminated quoted scalar: {}", text));
    }
    if let Some((key, value)) = text.split_once(": ") {
        if !text.contains('\n') {
            return Ok(json!({ key.trim(): scalar(value) }));
        }
    }
    Ok(scalar(text))
}

fn scalar(text: &str) -> Value {
    let text = text.trim();
    match text {
        "" | "null" | "~" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = text.parse::<i64>() {
                json!(n)
            } else if let Ok(f) = text.parse::<f64>() {
                json!(f)
            } else if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
                Value::String(text[1..text.len() - 1].to_string())
            } else {
                Value::String(text.to_string())
            }
        }
    }
}
