//! Browser host for the nightsky ambient background
//!
//! Wires [`nightsky_engine::AmbientBackground`] to the DOM and exports a
//! small JS-facing controller.
//!
//! ## Module Structure
//!
//! - `signals` - Capability signals from `navigator` and a throwaway canvas
//! - `canvas` - `<canvas>` drawing surface
//! - `host` - `requestAnimationFrame`, passive listeners, starfield bridge
//!
//! ## Usage (JS)
//!
//! ```js
//! const sky = new NightskyBackground(document.getElementById("sky"), null);
//! sky.set_starfield(mountStarfield, unmountStarfield);
//! sky.mount();
//! // ...
//! sky.unmount();
//! ```

mod canvas;
mod host;
mod signals;

use std::cell::RefCell;
use std::rc::Rc;

use nightsky_engine::{AmbientBackground, ComposerState, NightskyConfig};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::host::{SharedBackground, WebPlatform};

pub use canvas::CanvasSurface;
pub use signals::capability_signals;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

/// JS-facing ambient background controller
#[wasm_bindgen]
pub struct NightskyBackground {
    inner: SharedBackground,
}

#[wasm_bindgen]
impl NightskyBackground {
    /// Create an unmounted background drawing into `container`.
    ///
    /// `config_json` overrides any subset of the defaults, e.g.
    /// `{"smallScreenMaxWidth": 640}`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, config_json: Option<String>) -> Result<NightskyBackground, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => NightskyConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => NightskyConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let inner = Rc::new_cyclic(|weak| {
            let platform = WebPlatform::new(window, document, container, weak.clone());
            RefCell::new(AmbientBackground::new(platform, config))
        });
        Ok(Self { inner })
    }

    /// Register the external dense-starfield.
    ///
    /// `mount(container, {particleCount, fpsLimit})` is called on mount; a
    /// throw falls back to the static dot pattern.
    #[wasm_bindgen]
    pub fn set_starfield(&self, mount: js_sys::Function, unmount: Option<js_sys::Function>) {
        self.inner.borrow_mut().platform_mut().set_starfield(mount, unmount);
    }

    /// Read the device's capabilities and start every layer it can afford
    #[wasm_bindgen]
    pub fn mount(&self) {
        let mut background = self.inner.borrow_mut();
        let signals = signals::capability_signals(background.platform().window());
        background.mount(&signals);
    }

    /// Cancel frames, detach listeners and remove all layers
    #[wasm_bindgen]
    pub fn unmount(&self) {
        self.inner.borrow_mut().unmount();
    }

    /// `"low"` or `"standard"` once mounted
    #[wasm_bindgen]
    pub fn tier(&self) -> Option<String> {
        self.inner.borrow().tier().map(|t| t.id().to_string())
    }

    #[wasm_bindgen]
    pub fn state(&self) -> String {
        let state = match self.inner.borrow().state() {
            ComposerState::Idle => "idle",
            ComposerState::Fallback => "fallback",
            ComposerState::Running => "running",
            ComposerState::Unmounted => "unmounted",
        };
        state.to_string()
    }

    /// Active tier profile as JSON, for debugging
    #[wasm_bindgen]
    pub fn profile_json(&self) -> Option<String> {
        let background = self.inner.borrow();
        let tier = background.tier()?;
        serde_json::to_string(background.config().profile(tier)).ok()
    }
}
