//! Mock platform for testing the nightsky engine
//!
//! Provides a [`Platform`] implementation that records everything the engine
//! asks of the page (surfaces, draw calls, frame requests, listeners) so
//! tests can drive the composer deterministically without a browser.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use nightsky_engine::{
    FrameHost, FrameRequestId, LayerKind, ListenerHost, ListenerId, ListenerOptions,
    NightskyError, Platform, RandomSource, Rgba, Size, StarfieldConfig, Surface2d, Vec2,
    ViewportEventKind,
};

/// One drawing command issued against a mock surface
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    FillSolid(Rgba),
    RadialGradient {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
}

/// Side effects on the page, in the order they happened
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformCall {
    RequestFrame(FrameRequestId),
    CancelFrame(FrameRequestId),
    AddListener(ViewportEventKind, ListenerId),
    RemoveListener(ListenerId),
    CreateSurface(LayerKind),
    DetachSurface(LayerKind),
    MountStarfield(StarfieldConfig),
    UnmountStarfield,
    MountStaticFallback,
    UnmountStaticFallback,
}

type Journal = Rc<RefCell<Vec<PlatformCall>>>;

/// Everything observed on one surface
#[derive(Debug)]
pub struct SurfaceRecord {
    pub layer: LayerKind,
    pub size: Size,
    pub device_pixel_ratio: f64,
    /// Backing-store size in device pixels
    pub backing: (u32, u32),
    pub calls: Vec<DrawCall>,
    pub attached: bool,
}

impl SurfaceRecord {
    fn new(layer: LayerKind) -> Self {
        Self {
            layer,
            size: Size::ZERO,
            device_pixel_ratio: 1.0,
            backing: (0, 0),
            calls: Vec::new(),
            attached: true,
        }
    }

    pub fn clears(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Clear)).count()
    }

    pub fn solid_fills(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::FillSolid(_))).count()
    }

    pub fn gradients(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::RadialGradient { .. }))
            .count()
    }

    pub fn lines(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Line { .. })).count()
    }

    pub fn circles(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Circle { .. })).count()
    }

    /// Every call that puts pixels on the surface (clears excluded)
    pub fn paint_calls(&self) -> usize {
        self.calls.len() - self.clears()
    }
}

/// Shared view of a surface; stays readable after the engine takes the surface
pub type SurfaceHandle = Rc<RefCell<SurfaceRecord>>;

/// Surface handed to the engine by [`MockPlatform`]
pub struct MockSurface {
    record: SurfaceHandle,
    journal: Journal,
}

impl MockSurface {
    fn push(&mut self, call: DrawCall) {
        let mut record = self.record.borrow_mut();
        if record.attached {
            record.calls.push(call);
        }
    }
}

impl Surface2d for MockSurface {
    fn resize(&mut self, css_size: Size, device_pixel_ratio: f64) {
        let mut record = self.record.borrow_mut();
        record.size = css_size;
        record.device_pixel_ratio = device_pixel_ratio;
        record.backing = css_size.to_device_pixels(device_pixel_ratio);
    }

    fn size(&self) -> Size {
        self.record.borrow().size
    }

    fn clear(&mut self) {
        self.push(DrawCall::Clear);
    }

    fn fill_solid(&mut self, color: Rgba) {
        self.push(DrawCall::FillSolid(color));
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.push(DrawCall::RadialGradient {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.push(DrawCall::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn detach(&mut self) {
        let mut record = self.record.borrow_mut();
        if record.attached {
            record.attached = false;
            self.journal
                .borrow_mut()
                .push(PlatformCall::DetachSurface(record.layer));
        }
    }
}

/// Mock page for unit and integration testing
///
/// Frames are never delivered on their own: tests collect pending request
/// ids with [`MockPlatform::take_pending_frames`] and hand them to the
/// composer with whatever timestamps they like.
pub struct MockPlatform {
    viewport: Size,
    device_pixel_ratio: f64,
    /// Simulated time in milliseconds
    time_ms: f64,
    next_frame: u64,
    pending_frames: Vec<FrameRequestId>,
    next_listener: u64,
    listeners: BTreeMap<ListenerId, (ViewportEventKind, ListenerOptions)>,
    surfaces: Vec<SurfaceHandle>,
    starfield: Option<StarfieldConfig>,
    starfield_available: bool,
    static_fallback: bool,
    fail_surfaces: bool,
    fail_listeners: bool,
    fail_frames: bool,
    journal: Journal,
    /// Captured debug messages
    debug_log: RefCell<Vec<String>>,
}

impl MockPlatform {
    /// 1920x1080 desktop viewport at 1x with a working starfield
    pub fn new() -> Self {
        Self {
            viewport: Size::new(1920.0, 1080.0),
            device_pixel_ratio: 1.0,
            time_ms: 0.0,
            next_frame: 1,
            pending_frames: Vec::new(),
            next_listener: 1,
            listeners: BTreeMap::new(),
            surfaces: Vec::new(),
            starfield: None,
            starfield_available: true,
            static_fallback: false,
            fail_surfaces: false,
            fail_listeners: false,
            fail_frames: false,
            journal: Rc::new(RefCell::new(Vec::new())),
            debug_log: RefCell::new(Vec::new()),
        }
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Size::new(width, height);
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn with_time(mut self, ms: f64) -> Self {
        self.time_ms = ms;
        self
    }

    /// Make the dense-starfield collaborator unavailable
    pub fn without_starfield(mut self) -> Self {
        self.starfield_available = false;
        self
    }

    /// Make every surface creation fail
    pub fn with_failing_surfaces(mut self) -> Self {
        self.fail_surfaces = true;
        self
    }

    /// Make every listener registration fail
    pub fn with_failing_listeners(mut self) -> Self {
        self.fail_listeners = true;
        self
    }

    /// Make every frame request fail
    pub fn with_failing_frames(mut self) -> Self {
        self.fail_frames = true;
        self
    }

    // =========================================================================
    // Simulation controls
    // =========================================================================

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = ratio;
    }

    pub fn set_time(&mut self, ms: f64) {
        self.time_ms = ms;
    }

    pub fn advance_time(&mut self, ms: f64) {
        self.time_ms += ms;
    }

    /// Drain the pending frame requests, as the browser does when it
    /// delivers them
    pub fn take_pending_frames(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.pending_frames)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn pending_frames(&self) -> &[FrameRequestId] {
        &self.pending_frames
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listener(&self, kind: ViewportEventKind) -> bool {
        self.listeners.values().any(|(k, _)| *k == kind)
    }

    /// Whether every live listener was registered as passive
    pub fn all_listeners_passive(&self) -> bool {
        self.listeners.values().all(|(_, opts)| opts.passive)
    }

    /// Number of surfaces ever created
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Most recently created surface for a layer
    pub fn surface(&self, layer: LayerKind) -> Option<SurfaceHandle> {
        self.surfaces
            .iter()
            .rev()
            .find(|s| s.borrow().layer == layer)
            .cloned()
    }

    /// Config the starfield is currently running with
    pub fn starfield(&self) -> Option<StarfieldConfig> {
        self.starfield
    }

    pub fn static_fallback_mounted(&self) -> bool {
        self.static_fallback
    }

    /// Every side effect so far, oldest first
    pub fn journal(&self) -> Vec<PlatformCall> {
        self.journal.borrow().clone()
    }

    /// Get all captured debug messages
    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.borrow().clone()
    }

    /// Check if a specific message was logged
    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log
            .borrow()
            .iter()
            .any(|msg| msg.contains(substr))
    }

    fn record(&self, call: PlatformCall) {
        self.journal.borrow_mut().push(call);
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHost for MockPlatform {
    fn request_frame(&mut self) -> Result<FrameRequestId, NightskyError> {
        if self.fail_frames {
            return Err(NightskyError::FrameRequestFailed(
                "mock frames disabled".to_string(),
            ));
        }
        let id = FrameRequestId(self.next_frame);
        self.next_frame += 1;
        self.pending_frames.push(id);
        self.record(PlatformCall::RequestFrame(id));
        Ok(id)
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.pending_frames.retain(|pending| *pending != id);
        self.record(PlatformCall::CancelFrame(id));
    }
}

impl ListenerHost for MockPlatform {
    fn add_listener(
        &mut self,
        kind: ViewportEventKind,
        options: ListenerOptions,
    ) -> Result<ListenerId, NightskyError> {
        if self.fail_listeners {
            return Err(NightskyError::ListenerFailed(format!(
                "mock refused {:?}",
                kind
            )));
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, (kind, options));
        self.record(PlatformCall::AddListener(kind, id));
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_some() {
            self.record(PlatformCall::RemoveListener(id));
        }
    }
}

impl Platform for MockPlatform {
    type Surface = MockSurface;

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn now_ms(&self) -> f64 {
        self.time_ms
    }

    fn create_surface(&mut self, layer: LayerKind) -> Result<MockSurface, NightskyError> {
        if self.fail_surfaces {
            return Err(NightskyError::SurfaceUnavailable(format!(
                "mock refused {}",
                layer.name()
            )));
        }
        let record = Rc::new(RefCell::new(SurfaceRecord::new(layer)));
        self.surfaces.push(Rc::clone(&record));
        self.record(PlatformCall::CreateSurface(layer));
        Ok(MockSurface {
            record,
            journal: Rc::clone(&self.journal),
        })
    }

    fn mount_starfield(&mut self, config: &StarfieldConfig) -> Result<(), NightskyError> {
        if !self.starfield_available {
            return Err(NightskyError::StarfieldUnavailable(
                "mock starfield missing".to_string(),
            ));
        }
        self.starfield = Some(*config);
        self.record(PlatformCall::MountStarfield(*config));
        Ok(())
    }

    fn unmount_starfield(&mut self) {
        self.starfield = None;
        self.record(PlatformCall::UnmountStarfield);
    }

    fn mount_static_fallback(&mut self) {
        self.static_fallback = true;
        self.record(PlatformCall::MountStaticFallback);
    }

    fn unmount_static_fallback(&mut self) {
        self.static_fallback = false;
        self.record(PlatformCall::UnmountStaticFallback);
    }

    fn debug_write(&self, msg: &str) {
        self.debug_log.borrow_mut().push(msg.to_string());
    }
}

/// Random source replaying a fixed script, cycling when exhausted
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
