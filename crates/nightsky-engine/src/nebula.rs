//! Slow-redraw nebula layer
//!
//! Blooms are large, low-frequency features, so the layer repaints once per
//! second at most (once per five seconds on low-tier devices) instead of on
//! every display refresh. Nothing survives between repaints.

use crate::config::{NightskyConfig, Span, TierProfile};
use crate::math::{Rgba, Size, Vec2};
use crate::platform::Surface2d;
use crate::random::RandomSource;

/// Translucent bloom colors
pub const NEBULA_PALETTE: [Rgba; 5] = [
    Rgba::new(88, 28, 135, 0.18),
    Rgba::new(30, 64, 175, 0.16),
    Rgba::new(190, 24, 93, 0.12),
    Rgba::new(14, 116, 144, 0.14),
    Rgba::new(67, 56, 202, 0.16),
];

/// One bloom sampled for a single repaint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NebulaBloom {
    pub center: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

impl NebulaBloom {
    fn sample(viewport: Size, radius: Span, rng: &mut dyn RandomSource) -> Self {
        let center = Vec2::new(
            rng.range(0.0, viewport.width as f64) as f32,
            rng.range(0.0, viewport.height as f64) as f32,
        );
        let radius = radius.sample(rng) as f32;
        let index = (rng.next_unit() * NEBULA_PALETTE.len() as f64) as usize;
        let color = NEBULA_PALETTE[index.min(NEBULA_PALETTE.len() - 1)];
        Self { center, radius, color }
    }

    fn paint(&self, surface: &mut dyn Surface2d) {
        surface.fill_radial_gradient(self.center, self.radius, self.color, self.color.with_alpha(0.0));
    }
}

/// Layer painting soft radial blooms onto its own surface
pub struct NebulaLayer<S: Surface2d> {
    surface: S,
    interval_ms: f64,
    bloom_count: [u32; 2],
    bloom_radius: Span,
    last_painted_ms: Option<f64>,
    paints: u64,
}

impl<S: Surface2d> NebulaLayer<S> {
    pub fn new(surface: S, profile: &TierProfile, config: &NightskyConfig) -> Self {
        Self {
            surface,
            interval_ms: profile.nebula_interval_ms(),
            bloom_count: profile.bloom_count,
            bloom_radius: config.bloom_radius,
            last_painted_ms: None,
            paints: 0,
        }
    }

    /// Repaint if the layer has never painted or its interval has passed.
    /// Returns whether a repaint happened.
    pub fn tick(&mut self, now_ms: f64, rng: &mut dyn RandomSource) -> bool {
        let due = match self.last_painted_ms {
            None => true,
            Some(last) => now_ms - last > self.interval_ms,
        };
        if due {
            self.paint(now_ms, rng);
        }
        due
    }

    /// Rescale to the new viewport and repaint immediately
    pub fn resize(&mut self, viewport: Size, device_pixel_ratio: f64, now_ms: f64, rng: &mut dyn RandomSource) {
        self.surface.resize(viewport, device_pixel_ratio);
        self.paint(now_ms, rng);
    }

    fn paint(&mut self, now_ms: f64, rng: &mut dyn RandomSource) {
        let viewport = self.surface.size();
        self.surface.fill_solid(Rgba::BLACK);

        let count = rng.range_inclusive(self.bloom_count[0], self.bloom_count[1]);
        for _ in 0..count {
            NebulaBloom::sample(viewport, self.bloom_radius, rng).paint(&mut self.surface);
        }

        self.last_painted_ms = Some(now_ms);
        self.paints += 1;
    }

    /// Number of repaints since creation
    pub fn paint_count(&self) -> u64 {
        self.paints
    }

    pub fn last_painted_ms(&self) -> Option<f64> {
        self.last_painted_ms
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Release the surface from the page
    pub fn detach(&mut self) {
        self.surface.detach();
    }
}
