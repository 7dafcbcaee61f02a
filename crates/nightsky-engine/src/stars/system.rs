//! Shooting-star layer: one surface, one fixed pool

use crate::config::{NightskyConfig, TierProfile};
use crate::math::Size;
use crate::platform::Surface2d;
use crate::random::RandomSource;

use super::star::{ShootingStar, StarTuning};

/// Owns the shooting-star surface and its particle pool
pub struct ShootingStarSystem<S: Surface2d> {
    surface: S,
    stars: Vec<ShootingStar>,
    tuning: StarTuning,
    frames: u64,
}

impl<S: Surface2d> ShootingStarSystem<S> {
    /// Build the pool (size from the tier profile); every star starts waiting
    pub fn new(
        surface: S,
        profile: &TierProfile,
        config: &NightskyConfig,
        now_ms: f64,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let tuning = StarTuning::new(config, profile);
        let viewport = surface.size();
        let stars = (0..profile.star_pool_size)
            .map(|_| ShootingStar::new(viewport, now_ms, &tuning, rng))
            .collect();
        Self {
            surface,
            stars,
            tuning,
            frames: 0,
        }
    }

    /// Clear, then update and draw every star in turn
    pub fn frame(&mut self, now_ms: f64, rng: &mut dyn RandomSource) {
        self.surface.clear();
        let viewport = self.surface.size();
        for star in &mut self.stars {
            star.update(now_ms, viewport, &self.tuning, rng);
            star.draw(&mut self.surface);
        }
        self.frames += 1;
    }

    /// Rescale the surface; stars outside the new bounds respawn on their
    /// next update
    pub fn resize(&mut self, viewport: Size, device_pixel_ratio: f64) {
        self.surface.resize(viewport, device_pixel_ratio);
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    /// Frames drawn since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Release the surface from the page
    pub fn detach(&mut self) {
        self.surface.detach();
    }
}
