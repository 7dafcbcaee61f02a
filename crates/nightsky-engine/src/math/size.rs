//! Viewport and surface dimensions

use serde::{Deserialize, Serialize};

use super::Vec2;

/// Width and height in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a point lies outside the left, right or bottom edge.
    ///
    /// The top edge is open: particles spawn on it and only ever move down.
    #[inline]
    pub fn escaped_by(self, p: Vec2) -> bool {
        p.x < 0.0 || p.x > self.width || p.y > self.height
    }

    /// Backing-store size in device pixels for a given pixel ratio
    #[inline]
    pub fn to_device_pixels(self, device_pixel_ratio: f64) -> (u32, u32) {
        let ratio = if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 };
        (
            (self.width as f64 * ratio).round().max(0.0) as u32,
            (self.height as f64 * ratio).round().max(0.0) as u32,
        )
    }
}
