//! Capability probing from `navigator` and a throwaway canvas
//!
//! Every lookup is best-effort. A signal the browser does not expose, or a
//! lookup that throws, is reported as `None`.

use nightsky_engine::CapabilitySignals;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, Navigator, Window};

/// Collect every capability signal the page exposes
pub fn capability_signals(window: &Window) -> CapabilitySignals {
    let navigator = window.navigator();
    CapabilitySignals {
        accelerated_backend: accelerated_backend(window),
        user_agent: navigator.user_agent().ok(),
        mobile_hint: mobile_hint(&navigator),
        device_memory_gb: device_memory(&navigator),
        logical_cores: logical_cores(&navigator),
    }
}

/// Whether a WebGL context can be created
fn accelerated_backend(window: &Window) -> Option<bool> {
    let document = window.document()?;
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    for id in ["webgl2", "webgl"] {
        match acquire_and_release(&canvas, id) {
            Some(true) => return Some(true),
            Some(false) => continue,
            None => return None,
        }
    }
    Some(false)
}

/// Create a context of kind `id` on `canvas` and give its GPU resources
/// back straight away; `Some(false)` when the kind is unsupported
fn acquire_and_release(canvas: &HtmlCanvasElement, id: &str) -> Option<bool> {
    match canvas.get_context(id) {
        Ok(Some(context)) => {
            lose_context(&context);
            Some(true)
        }
        Ok(None) => Some(false),
        Err(_) => None,
    }
}

/// `context.getExtension("WEBGL_lose_context")?.loseContext()`
fn lose_context(context: &js_sys::Object) {
    let Some(get_extension) = js_sys::Reflect::get(context, &JsValue::from_str("getExtension"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
    else {
        return;
    };
    let Ok(extension) = get_extension.call1(context, &JsValue::from_str("WEBGL_lose_context")) else {
        return;
    };
    if extension.is_null() || extension.is_undefined() {
        return;
    }
    if let Some(lose) = js_sys::Reflect::get(&extension, &JsValue::from_str("loseContext"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
    {
        let _ = lose.call0(&extension);
    }
}

/// `navigator.userAgentData.mobile` (Chromium only)
fn mobile_hint(navigator: &Navigator) -> Option<bool> {
    let data = js_sys::Reflect::get(navigator, &JsValue::from_str("userAgentData")).ok()?;
    if data.is_undefined() || data.is_null() {
        return None;
    }
    js_sys::Reflect::get(&data, &JsValue::from_str("mobile"))
        .ok()?
        .as_bool()
}

/// `navigator.deviceMemory` (Chromium only)
fn device_memory(navigator: &Navigator) -> Option<f64> {
    js_sys::Reflect::get(navigator, &JsValue::from_str("deviceMemory"))
        .ok()?
        .as_f64()
        .filter(|gb| gb.is_finite() && *gb > 0.0)
}

fn logical_cores(navigator: &Navigator) -> Option<u32> {
    let cores = navigator.hardware_concurrency();
    if cores.is_finite() && cores >= 1.0 {
        Some(cores as u32)
    } else {
        None
    }
}
