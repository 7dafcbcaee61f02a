//! Tunable configuration
//!
//! The defaults are hand-tuned "feel" values. Hosts may override any subset
//! through JSON; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::capability::CapabilityTier;
use crate::error::NightskyError;
use crate::random::RandomSource;

/// Inclusive-exclusive numeric range `[min, max)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Uniform sample from the range
    #[inline]
    pub fn sample(&self, rng: &mut dyn RandomSource) -> f64 {
        rng.range(self.min, self.max)
    }

    fn validate(&self, name: &str) -> Result<(), NightskyError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(NightskyError::InvalidConfig(format!(
                "{}: expected finite min <= max, got [{}, {}]",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Settings handed to the external dense-starfield collaborator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarfieldConfig {
    pub particle_count: u32,
    pub fps_limit: u32,
}

impl StarfieldConfig {
    /// JSON payload for the collaborator, e.g. `{"particleCount":40,"fpsLimit":30}`
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Every parameter that varies by capability tier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierProfile {
    /// Minimum time between accepted frames; `None` runs at native refresh
    pub frame_interval_ms: Option<f64>,
    /// Nebula redraws per second
    pub nebula_fps: f64,
    /// Blooms painted per nebula redraw (inclusive)
    pub bloom_count: [u32; 2],
    /// Delay before a respawned shooting star may activate
    pub wait_ms: Span,
    /// Number of pooled shooting stars
    pub star_pool_size: usize,
    /// Dense-starfield request
    pub starfield: StarfieldConfig,
}

impl TierProfile {
    /// Defaults for constrained devices
    pub fn low() -> Self {
        Self {
            frame_interval_ms: Some(1000.0 / 30.0),
            nebula_fps: 0.2,
            bloom_count: [1, 1],
            wait_ms: Span::new(10_000.0, 25_000.0),
            star_pool_size: 1,
            starfield: StarfieldConfig {
                particle_count: 40,
                fps_limit: 30,
            },
        }
    }

    /// Defaults for everything else
    pub fn standard() -> Self {
        Self {
            frame_interval_ms: None,
            nebula_fps: 1.0,
            bloom_count: [3, 4],
            wait_ms: Span::new(5_000.0, 20_000.0),
            star_pool_size: 2,
            starfield: StarfieldConfig {
                particle_count: 120,
                fps_limit: 60,
            },
        }
    }

    /// Milliseconds between nebula redraws
    #[inline]
    pub fn nebula_interval_ms(&self) -> f64 {
        1000.0 / self.nebula_fps
    }

    fn validate(&self, name: &str) -> Result<(), NightskyError> {
        if let Some(interval) = self.frame_interval_ms {
            if !interval.is_finite() || interval < 0.0 {
                return Err(NightskyError::InvalidConfig(format!(
                    "{}.frameIntervalMs must be a non-negative number",
                    name
                )));
            }
        }
        if !(self.nebula_fps.is_finite() && self.nebula_fps > 0.0) {
            return Err(NightskyError::InvalidConfig(format!(
                "{}.nebulaFps must be positive",
                name
            )));
        }
        if self.bloom_count[0] > self.bloom_count[1] {
            return Err(NightskyError::InvalidConfig(format!(
                "{}.bloomCount: min exceeds max",
                name
            )));
        }
        if self.star_pool_size == 0 {
            return Err(NightskyError::InvalidConfig(format!(
                "{}.starPoolSize must be at least 1",
                name
            )));
        }
        self.wait_ms.validate(&format!("{}.waitMs", name))
    }
}

/// Complete engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NightskyConfig {
    /// Low-tier viewports narrower than this get only the starfield
    pub small_screen_max_width: f32,
    /// Global slow-down applied to every shooting star's velocity
    pub speed_scale: f32,
    /// Per-star trail length bound
    pub trail_capacity: [usize; 2],
    /// Per-frame opacity gain while fading in
    pub fade_in_rate: Span,
    /// Per-frame opacity loss while fading out
    pub fade_out_rate: Span,
    /// Stroke width of a shooting star's head
    pub line_width: Span,
    /// Nebula bloom radius in CSS pixels
    pub bloom_radius: Span,
    pub low: TierProfile,
    pub standard: TierProfile,
}

impl Default for NightskyConfig {
    fn default() -> Self {
        Self {
            small_screen_max_width: 768.0,
            speed_scale: 0.6,
            trail_capacity: [15, 40],
            fade_in_rate: Span::new(0.02, 0.04),
            fade_out_rate: Span::new(0.008, 0.02),
            line_width: Span::new(1.0, 2.0),
            bloom_radius: Span::new(50.0, 150.0),
            low: TierProfile::low(),
            standard: TierProfile::standard(),
        }
    }
}

impl NightskyConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, NightskyError> {
        let config: NightskyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Profile for the given tier
    pub fn profile(&self, tier: CapabilityTier) -> &TierProfile {
        match tier {
            CapabilityTier::Low => &self.low,
            CapabilityTier::Standard => &self.standard,
        }
    }

    /// Check every range and count for consistency
    pub fn validate(&self) -> Result<(), NightskyError> {
        if !(self.speed_scale.is_finite() && self.speed_scale > 0.0) {
            return Err(NightskyError::InvalidConfig(
                "speedScale must be positive".to_string(),
            ));
        }
        if self.trail_capacity[0] == 0 || self.trail_capacity[0] > self.trail_capacity[1] {
            return Err(NightskyError::InvalidConfig(
                "trailCapacity: expected 1 <= min <= max".to_string(),
            ));
        }
        self.fade_in_rate.validate("fadeInRate")?;
        self.fade_out_rate.validate("fadeOutRate")?;
        if self.fade_in_rate.min <= 0.0 || self.fade_out_rate.min <= 0.0 {
            return Err(NightskyError::InvalidConfig(
                "fade rates must be positive".to_string(),
            ));
        }
        self.line_width.validate("lineWidth")?;
        self.bloom_radius.validate("bloomRadius")?;
        self.low.validate("low")?;
        self.standard.validate("standard")
    }
}
