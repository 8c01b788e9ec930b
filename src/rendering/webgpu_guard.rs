//! Early browser check: both canvases are drawn through WebGPU, with no WebGL fallback.

use wasm_bindgen::JsValue;

/// True when `navigator.gpu` is exposed by the browser.
pub fn webgpu_available() -> bool {
    let Some(win) = web_sys::window() else {
        return false;
    };
    let nav = win.navigator();
    js_sys::Reflect::get(&nav, &JsValue::from_str("gpu"))
        .map(|v| !v.is_undefined())
        .unwrap_or(false)
}

/// Fails fast, before any plugin is built, if WebGPU is missing.
pub fn assert_webgpu_available() {
    if !webgpu_available() {
        panic!("WebGPU (navigator.gpu) is required. Use a WebGPU-enabled browser; WebGL fallback is disabled.");
    }
}
