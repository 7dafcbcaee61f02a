//! Browser implementation of the engine's platform traits
//!
//! Frame requests map to `requestAnimationFrame`, listeners to passive DOM
//! event listeners, and surfaces to `<canvas>` elements inside the host
//! container. Every callback holds only a weak reference to the background,
//! so a late callback after teardown finds nothing to drive.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use nightsky_engine::{
    AmbientBackground, FrameHost, FrameRequestId, LayerKind, ListenerHost, ListenerId,
    ListenerOptions, NightskyError, Platform, Size, StarfieldConfig, ViewportEvent,
    ViewportEventKind,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Event, EventTarget, HtmlElement, Window};

use crate::canvas::CanvasSurface;
use crate::log;

pub(crate) type SharedBackground = Rc<RefCell<AmbientBackground<WebPlatform>>>;
type WeakBackground = Weak<RefCell<AmbientBackground<WebPlatform>>>;

/// Static dot pattern painted on the container when the starfield is missing
const STATIC_DOTS: [(&str, &str); 3] = [
    (
        "background-image",
        "radial-gradient(rgba(255, 255, 255, 0.35) 1px, transparent 1px)",
    ),
    ("background-size", "24px 24px"),
    ("background-color", "#000"),
];

/// A registered DOM listener and the closure keeping it alive
struct DomListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// An outstanding `requestAnimationFrame` and the closure it will call
struct PendingFrame {
    handle: i32,
    callback: Closure<dyn FnMut(f64)>,
}

/// External dense-starfield hooks supplied by the page
struct StarfieldHooks {
    mount: js_sys::Function,
    unmount: Option<js_sys::Function>,
}

pub struct WebPlatform {
    window: Window,
    document: Document,
    container: HtmlElement,
    owner: WeakBackground,
    next_frame: u64,
    frames: HashMap<FrameRequestId, PendingFrame>,
    /// Closure of the most recently delivered frame, which may still be on
    /// the call stack; replaced by the next delivery
    spent: Option<Closure<dyn FnMut(f64)>>,
    next_listener: u64,
    listeners: HashMap<ListenerId, DomListener>,
    starfield: Option<StarfieldHooks>,
}

impl WebPlatform {
    pub fn new(window: Window, document: Document, container: HtmlElement, owner: WeakBackground) -> Self {
        Self {
            window,
            document,
            container,
            owner,
            next_frame: 1,
            frames: HashMap::new(),
            spent: None,
            next_listener: 1,
            listeners: HashMap::new(),
            starfield: None,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Register the page's starfield mount/unmount functions
    pub fn set_starfield(&mut self, mount: js_sys::Function, unmount: Option<js_sys::Function>) {
        self.starfield = Some(StarfieldHooks { mount, unmount });
    }

    /// Forget a request the browser has just delivered
    fn frame_delivered(&mut self, id: FrameRequestId) {
        if let Some(frame) = self.frames.remove(&id) {
            self.spent = Some(frame.callback);
        }
    }

    /// Animation frames requested and not yet delivered or cancelled
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }
}

/// Deliver one animation frame to the background, if it still exists
fn deliver_frame(owner: &WeakBackground, id: FrameRequestId, timestamp_ms: f64) {
    let Some(shared) = owner.upgrade() else {
        return;
    };
    let Ok(mut background) = shared.try_borrow_mut() else {
        log("[frames] Frame delivered while background busy, dropped");
        return;
    };
    background.platform_mut().frame_delivered(id);
    background.on_frame(id, timestamp_ms);
}

fn deliver_event(owner: &WeakBackground, kind: ViewportEventKind) {
    let Some(shared) = owner.upgrade() else {
        return;
    };
    let Ok(mut background) = shared.try_borrow_mut() else {
        return;
    };
    let event = match kind {
        ViewportEventKind::Resize => ViewportEvent::Resize,
        ViewportEventKind::VisibilityChange => {
            let hidden = background.platform().document.hidden();
            ViewportEvent::VisibilityChange { hidden }
        }
    };
    background.on_event(event);
}

impl FrameHost for WebPlatform {
    fn request_frame(&mut self) -> Result<FrameRequestId, NightskyError> {
        let id = FrameRequestId(self.next_frame);
        self.next_frame += 1;

        let owner = self.owner.clone();
        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp_ms: f64| {
            deliver_frame(&owner, id, timestamp_ms);
        });
        let handle = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| NightskyError::FrameRequestFailed(format!("{:?}", e)))?;

        self.frames.insert(id, PendingFrame { handle, callback });
        Ok(id)
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        if let Some(frame) = self.frames.remove(&id) {
            let _ = self.window.cancel_animation_frame(frame.handle);
        }
    }
}

impl ListenerHost for WebPlatform {
    fn add_listener(
        &mut self,
        kind: ViewportEventKind,
        options: ListenerOptions,
    ) -> Result<ListenerId, NightskyError> {
        let (target, event): (EventTarget, &'static str) = match kind {
            ViewportEventKind::Resize => (self.window.clone().into(), "resize"),
            ViewportEventKind::VisibilityChange => (self.document.clone().into(), "visibilitychange"),
        };

        let owner = self.owner.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            deliver_event(&owner, kind);
        });

        let dom_options = AddEventListenerOptions::new();
        dom_options.set_passive(options.passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &dom_options,
            )
            .map_err(|e| NightskyError::ListenerFailed(format!("{}: {:?}", event, e)))?;

        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(
            id,
            DomListener {
                target,
                event,
                callback,
            },
        );
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if let Some(listener) = self.listeners.remove(&id) {
            let _ = listener
                .target
                .remove_event_listener_with_callback(listener.event, listener.callback.as_ref().unchecked_ref());
        }
    }
}

impl Platform for WebPlatform {
    type Surface = CanvasSurface;

    fn viewport(&self) -> Size {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Size::new(width as f32, height as f32)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn create_surface(&mut self, layer: LayerKind) -> Result<CanvasSurface, NightskyError> {
        CanvasSurface::create(&self.document, &self.container, layer)
    }

    fn mount_starfield(&mut self, config: &StarfieldConfig) -> Result<(), NightskyError> {
        let hooks = self.starfield.as_ref().ok_or_else(|| {
            NightskyError::StarfieldUnavailable("no starfield registered".to_string())
        })?;
        let payload = js_sys::JSON::parse(&config.to_json())
            .map_err(|e| NightskyError::StarfieldUnavailable(format!("{:?}", e)))?;
        hooks
            .mount
            .call2(&JsValue::NULL, &self.container, &payload)
            .map_err(|e| NightskyError::StarfieldUnavailable(format!("{:?}", e)))?;
        Ok(())
    }

    fn unmount_starfield(&mut self) {
        if let Some(unmount) = self.starfield.as_ref().and_then(|h| h.unmount.as_ref()) {
            if let Err(e) = unmount.call1(&JsValue::NULL, &self.container) {
                log(&format!("[nightsky] Starfield unmount threw: {:?}", e));
            }
        }
    }

    fn mount_static_fallback(&mut self) {
        let style = self.container.style();
        for (property, value) in STATIC_DOTS {
            let _ = style.set_property(property, value);
        }
    }

    fn unmount_static_fallback(&mut self) {
        let style = self.container.style();
        for (property, _) in STATIC_DOTS {
            let _ = style.remove_property(property);
        }
    }

    fn debug_write(&self, msg: &str) {
        log(msg);
    }
}
