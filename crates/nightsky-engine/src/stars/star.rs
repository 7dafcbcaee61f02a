//! Per-particle shooting star state machine

use crate::config::{NightskyConfig, Span, TierProfile};
use crate::math::{Rgba, Size, Vec2};
use crate::platform::Surface2d;
use crate::random::RandomSource;

use super::trail::{Trail, TrailSample};

/// Glow radius as a multiple of the stroke width
const GLOW_SCALE: f32 = 3.0;

/// Peak alpha of the glow relative to the star's opacity
const GLOW_ALPHA: f32 = 0.5;

/// Lifecycle phase. `Waiting` is inactive; the other two are active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarPhase {
    Waiting,
    FadingIn,
    FadingOut,
}

/// Edge a star enters the viewport from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryEdge {
    /// Random x along the top, heading down and to the right
    Top,
    /// Upper third of the right edge, heading down and to the left
    Right,
}

/// Spawn and fade parameters shared by every star in a pool
#[derive(Clone, Debug, PartialEq)]
pub struct StarTuning {
    pub speed_scale: f32,
    pub trail_capacity: [usize; 2],
    pub fade_in_rate: Span,
    pub fade_out_rate: Span,
    pub line_width: Span,
    pub wait_ms: Span,
}

impl StarTuning {
    pub fn new(config: &NightskyConfig, profile: &TierProfile) -> Self {
        Self {
            speed_scale: config.speed_scale,
            trail_capacity: config.trail_capacity,
            fade_in_rate: config.fade_in_rate,
            fade_out_rate: config.fade_out_rate,
            line_width: config.line_width,
            wait_ms: profile.wait_ms,
        }
    }
}

/// One pooled shooting star
#[derive(Clone, Debug)]
pub struct ShootingStar {
    position: Vec2,
    velocity: Vec2,
    entry: EntryEdge,
    trail: Trail,
    opacity: f32,
    phase: StarPhase,
    spawn_deadline_ms: f64,
    fade_in_rate: f32,
    fade_out_rate: f32,
    line_width: f32,
}

impl ShootingStar {
    /// Create a star already reset and waiting for its first appearance
    pub fn new(viewport: Size, now_ms: f64, tuning: &StarTuning, rng: &mut dyn RandomSource) -> Self {
        let mut star = Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            entry: EntryEdge::Top,
            trail: Trail::with_capacity(tuning.trail_capacity[0]),
            opacity: 0.0,
            phase: StarPhase::Waiting,
            spawn_deadline_ms: now_ms,
            fade_in_rate: 0.0,
            fade_out_rate: 0.0,
            line_width: 1.0,
        };
        star.reset(viewport, now_ms, tuning, rng);
        star
    }

    /// Respawn: new entry geometry, new per-particle rates, new deadline
    pub fn reset(&mut self, viewport: Size, now_ms: f64, tuning: &StarTuning, rng: &mut dyn RandomSource) {
        let scale = tuning.speed_scale;
        if rng.chance(0.5) {
            self.entry = EntryEdge::Top;
            self.position = Vec2::new(rng.range(0.0, viewport.width as f64) as f32, 0.0);
            self.velocity = Vec2::new(rng.range(1.0, 3.0) as f32, rng.range(2.0, 4.0) as f32) * scale;
        } else {
            self.entry = EntryEdge::Right;
            self.position = Vec2::new(
                viewport.width,
                rng.range(0.0, viewport.height as f64 / 3.0) as f32,
            );
            self.velocity = Vec2::new(-(rng.range(2.0, 4.0) as f32), rng.range(1.0, 3.0) as f32) * scale;
        }

        let [min_len, max_len] = tuning.trail_capacity;
        let capacity = rng.range_inclusive(min_len as u32, max_len as u32) as usize;
        self.trail.reset(capacity);

        self.fade_in_rate = tuning.fade_in_rate.sample(rng) as f32;
        self.fade_out_rate = tuning.fade_out_rate.sample(rng) as f32;
        self.line_width = tuning.line_width.sample(rng) as f32;

        self.opacity = 0.0;
        self.phase = StarPhase::Waiting;
        self.spawn_deadline_ms = now_ms + tuning.wait_ms.sample(rng);
    }

    /// Advance one frame
    pub fn update(&mut self, now_ms: f64, viewport: Size, tuning: &StarTuning, rng: &mut dyn RandomSource) {
        if self.phase == StarPhase::Waiting {
            if now_ms >= self.spawn_deadline_ms {
                self.phase = StarPhase::FadingIn;
                self.opacity = 0.0;
            }
            return;
        }

        self.position += self.velocity;
        self.trail.push(TrailSample {
            position: self.position,
            opacity: self.opacity,
        });

        match self.phase {
            StarPhase::FadingIn => {
                self.opacity = (self.opacity + self.fade_in_rate).min(1.0);
                if self.opacity >= 1.0 {
                    self.phase = StarPhase::FadingOut;
                }
            }
            StarPhase::FadingOut => {
                self.opacity = (self.opacity - self.fade_out_rate).max(0.0);
            }
            StarPhase::Waiting => {}
        }

        if viewport.escaped_by(self.position) || self.opacity <= 0.0 {
            self.reset(viewport, now_ms, tuning, rng);
        }
    }

    /// Draw the trail, head and glow. Waiting stars draw nothing.
    pub fn draw(&self, surface: &mut dyn Surface2d) {
        if !self.is_active() {
            return;
        }
        let head = match self.trail.head() {
            Some(head) => *head,
            None => return,
        };

        for (weight, from, to) in self.trail.segments() {
            let color = Rgba::WHITE.with_alpha(to.opacity * weight);
            surface.stroke_line(from.position, to.position, self.line_width * weight, color);
        }

        let glow = Rgba::WHITE.with_alpha(self.opacity * GLOW_ALPHA);
        surface.fill_radial_gradient(
            head.position,
            self.line_width * GLOW_SCALE,
            glow,
            glow.with_alpha(0.0),
        );
        surface.fill_circle(head.position, self.line_width, Rgba::WHITE.with_alpha(self.opacity));
    }

    pub fn is_active(&self) -> bool {
        self.phase != StarPhase::Waiting
    }

    pub fn phase(&self) -> StarPhase {
        self.phase
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn entry(&self) -> EntryEdge {
        self.entry
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn spawn_deadline_ms(&self) -> f64 {
        self.spawn_deadline_ms
    }

    pub fn fade_in_rate(&self) -> f32 {
        self.fade_in_rate
    }

    pub fn fade_out_rate(&self) -> f32 {
        self.fade_out_rate
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }
}
