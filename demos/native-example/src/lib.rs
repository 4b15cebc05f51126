//! Native example plugin
//!
//! The host calls [`call`] with a JSON payload of the form
//! `{"method": "...", "params": {...}, "settings": {...}}` and receives a JSON
//! string it must hand back to [`free_string`]. Failures are reported as
//! `{"error": "..."}` objects, never as null.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::ffi::{CStr, CString, c_char};
use std::panic::catch_unwind;
use std::ptr;

/// Version reported by `getSystemInfo`
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Deserialize)]
struct PluginInput {
    method: String,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    #[allow(dead_code)]
    settings: Map<String, Value>,
}

#[derive(Deserialize)]
struct AddParams {
    a: i32,
    b: i32,
}

#[derive(Serialize)]
struct AddResult {
    sum: i32,
}

#[derive(Serialize)]
struct SystemInfo {
    os: &'static str,
    arch: &'static str,
    plugin_version: &'static str,
}

/// Dispatch one JSON request and return the JSON response.
pub fn handle_call(payload: &str) -> String {
    let input: PluginInput = match serde_json::from_str(payload) {
        Ok(input) => input,
        Err(e) => return error_json(format!("Invalid input format: {e}")),
    };

    let result = match input.method.as_str() {
        "add" => serde_json::from_value::<AddParams>(input.params)
            .map_err(|e| format!("Invalid params for add: {e}"))
            .and_then(|p| {
                p.a.checked_add(p.b)
                    .ok_or_else(|| "Integer overflow in add".to_string())
            })
            .and_then(|sum| to_json(&AddResult { sum })),
        "getSystemInfo" => to_json(&SystemInfo {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            plugin_version: PLUGIN_VERSION,
        }),
        other => Err(format!("Method '{other}' not found")),
    };

    result.unwrap_or_else(error_json)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn error_json(message: String) -> String {
    json!({ "error": message }).to_string()
}

/// Plugin entry point
///
/// # Returns
/// A newly allocated NUL-terminated JSON string, or null if the response could
/// not be allocated. Release it with [`free_string`].
///
/// # Safety
/// - `payload` must be null or point to a valid NUL-terminated string
/// - `_method` is unused; the method is read from the payload
#[unsafe(no_mangle)]
pub unsafe extern "C" fn call(_method: *const c_char, payload: *const c_char) -> *mut c_char {
    let payload = if payload.is_null() {
        ""
    } else {
        // SAFETY: non-null and NUL-terminated per the caller contract
        unsafe { CStr::from_ptr(payload) }.to_str().unwrap_or("")
    };

    let response = catch_unwind(|| handle_call(payload))
        .unwrap_or_else(|_| error_json("Plugin panicked".to_string()));

    CString::new(response).map_or(ptr::null_mut(), CString::into_raw)
}

/// Release a string returned by [`call`]
///
/// # Safety
/// - `ptr` must be null or a pointer returned by [`call`] that was not freed yet
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        // SAFETY: allocated by CString::into_raw in `call`
        drop(unsafe { CString::from_raw(ptr) });
    }
}
