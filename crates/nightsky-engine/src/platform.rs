//! Platform abstraction
//!
//! The engine never talks to a browser directly. Hosts implement these traits
//! so the same engine runs under `requestAnimationFrame` + `<canvas>` in the
//! browser and under a recording mock in tests.
//!
//! # Implementations
//!
//! - **Browser**: `nightsky-web` (`CanvasRenderingContext2d`, DOM listeners)
//! - **Tests**: `nightsky-mock` (records draw calls, fires frames on demand)

use crate::config::StarfieldConfig;
use crate::error::NightskyError;
use crate::math::{Rgba, Size, Vec2};

/// Identifier of one pending display-refresh request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(pub u64);

/// Identifier of one registered viewport listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Drawing layers, bottom to top
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Nebula,
    ShootingStars,
}

impl LayerKind {
    /// CSS stacking order, higher draws on top.
    ///
    /// Always negative so the layers stay beneath in-flow page content even
    /// when the host container does not form its own stacking context.
    pub fn depth(&self) -> i32 {
        match self {
            LayerKind::Nebula => -2,
            LayerKind::ShootingStars => -1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Nebula => "nebula",
            LayerKind::ShootingStars => "shooting-stars",
        }
    }
}

/// Viewport events the engine listens for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportEventKind {
    Resize,
    VisibilityChange,
}

/// A delivered viewport event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportEvent {
    Resize,
    VisibilityChange { hidden: bool },
}

impl ViewportEvent {
    pub fn kind(&self) -> ViewportEventKind {
        match self {
            ViewportEvent::Resize => ViewportEventKind::Resize,
            ViewportEvent::VisibilityChange { .. } => ViewportEventKind::VisibilityChange,
        }
    }
}

/// Options applied when attaching a listener
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Listener promises never to block the event (no `preventDefault`)
    pub passive: bool,
}

impl ListenerOptions {
    pub const PASSIVE: ListenerOptions = ListenerOptions { passive: true };
}

/// 2D raster target owned by exactly one layer
pub trait Surface2d {
    /// Resize the backing store to `css_size * device_pixel_ratio` and scale
    /// drawing so callers keep working in CSS pixels
    fn resize(&mut self, css_size: Size, device_pixel_ratio: f64);

    /// Current size in CSS pixels
    fn size(&self) -> Size;

    /// Clear the whole surface to transparent
    fn clear(&mut self);

    /// Fill the whole surface with a solid color
    fn fill_solid(&mut self, color: Rgba);

    /// Fill a disc with a radial gradient from `inner` at the center to
    /// `outer` at `radius`
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);

    /// Stroke a single line segment
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Fill a circle
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Remove the surface from the page; further draws are no-ops
    fn detach(&mut self);
}

/// Display-refresh scheduling
pub trait FrameHost {
    /// Ask for one callback on the next display refresh. The host later
    /// delivers it to the owner with the returned id and a timestamp in ms.
    fn request_frame(&mut self) -> Result<FrameRequestId, NightskyError>;

    /// Cancel a pending request; unknown ids are ignored
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Viewport listener registration
pub trait ListenerHost {
    fn add_listener(
        &mut self,
        kind: ViewportEventKind,
        options: ListenerOptions,
    ) -> Result<ListenerId, NightskyError>;

    /// Remove a listener; unknown ids are ignored
    fn remove_listener(&mut self, id: ListenerId);
}

/// Everything the composer needs from its hosting page
pub trait Platform: FrameHost + ListenerHost {
    type Surface: Surface2d;

    /// Viewport size in CSS pixels
    fn viewport(&self) -> Size;

    /// Device pixels per CSS pixel
    fn device_pixel_ratio(&self) -> f64;

    /// Monotonic time in milliseconds
    fn now_ms(&self) -> f64;

    /// Create a full-viewport, non-interactive surface for a layer
    fn create_surface(&mut self, layer: LayerKind) -> Result<Self::Surface, NightskyError>;

    /// Start the external dense-starfield collaborator
    fn mount_starfield(&mut self, config: &StarfieldConfig) -> Result<(), NightskyError>;

    /// Stop the external dense-starfield collaborator
    fn unmount_starfield(&mut self);

    /// Show the static tiled-dot pattern
    fn mount_static_fallback(&mut self);

    /// Remove the static tiled-dot pattern
    fn unmount_static_fallback(&mut self);

    /// Write a debug message to the platform's console/log
    fn debug_write(&self, msg: &str);
}
