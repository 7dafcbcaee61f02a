//! Top-level orchestration: mount, run, unmount
//!
//! The composer classifies the device once, starts the dense starfield (or
//! its static stand-in), and on capable devices stacks the nebula and
//! shooting-star layers on top, each driven by its own frame loop.

use crate::capability::{classify_with_reasons, CapabilitySignals, CapabilityTier};
use crate::config::{NightskyConfig, StarfieldConfig, TierProfile};
use crate::frames::{FrameDecision, FrameScheduler};
use crate::listeners::PassiveListenerRegistrar;
use crate::nebula::NebulaLayer;
use crate::platform::{FrameRequestId, LayerKind, Platform, Surface2d, ViewportEvent, ViewportEventKind};
use crate::random::{RandomSource, SeededRandom};
use crate::stars::ShootingStarSystem;

/// Lifecycle state of the composer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposerState {
    /// Created, not yet mounted
    Idle,
    /// Constrained small-screen device: starfield (or static dots) only
    Fallback,
    /// Nebula and shooting-star layers mounted and looping
    Running,
    /// Torn down; no further drawing
    Unmounted,
}

/// What sits underneath the procedural layers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    None,
    /// External dense-starfield collaborator
    Starfield,
    /// Static tiled-dot pattern
    StaticDots,
}

/// Ambient background controller, generic over its hosting platform
pub struct AmbientBackground<P: Platform> {
    platform: P,
    config: NightskyConfig,
    rng: Box<dyn RandomSource>,
    state: ComposerState,
    tier: Option<CapabilityTier>,
    backdrop: Backdrop,
    nebula: Option<NebulaLayer<P::Surface>>,
    stars: Option<ShootingStarSystem<P::Surface>>,
    nebula_frames: FrameScheduler,
    star_frames: FrameScheduler,
    listeners: PassiveListenerRegistrar,
    hidden: bool,
}

impl<P: Platform> AmbientBackground<P> {
    /// Create an unmounted background seeded from platform entropy
    pub fn new(platform: P, config: NightskyConfig) -> Self {
        Self::with_random(platform, config, SeededRandom::from_entropy())
    }

    /// Create an unmounted background with an explicit random source
    pub fn with_random(platform: P, config: NightskyConfig, rng: impl RandomSource + 'static) -> Self {
        Self {
            platform,
            config,
            rng: Box::new(rng),
            state: ComposerState::Idle,
            tier: None,
            backdrop: Backdrop::None,
            nebula: None,
            stars: None,
            nebula_frames: FrameScheduler::new(None),
            star_frames: FrameScheduler::new(None),
            listeners: PassiveListenerRegistrar::new(),
            hidden: false,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Classify the device and bring up every layer it can afford.
    ///
    /// No-op unless the background is idle or was previously unmounted.
    pub fn mount(&mut self, signals: &CapabilitySignals) {
        if !matches!(self.state, ComposerState::Idle | ComposerState::Unmounted) {
            return;
        }

        let (tier, reasons) = classify_with_reasons(signals);
        self.tier = Some(tier);
        if reasons.is_empty() {
            self.log(&format!("[nightsky] Capability tier: {}", tier.id()));
        } else {
            self.log(&format!(
                "[nightsky] Capability tier: {} ({:?})",
                tier.id(),
                reasons
            ));
        }

        let profile = self.config.profile(tier).clone();
        self.mount_backdrop(&profile.starfield);

        let viewport = self.platform.viewport();
        if tier == CapabilityTier::Low && viewport.width < self.config.small_screen_max_width {
            self.log(&format!(
                "[nightsky] Small low-power viewport ({}px), skipping nebula and shooting stars",
                viewport.width
            ));
            self.state = ComposerState::Fallback;
            return;
        }

        self.mount_layers(&profile);
        self.attach_listeners();
        self.hidden = false;
        self.state = ComposerState::Running;
        self.start_loops();
    }

    /// Tear everything down. Pending frames are cancelled before listeners
    /// are detached. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if matches!(self.state, ComposerState::Idle | ComposerState::Unmounted) {
            return;
        }

        self.nebula_frames.cancel(&mut self.platform);
        self.star_frames.cancel(&mut self.platform);
        self.listeners.detach_all(&mut self.platform);

        if let Some(mut nebula) = self.nebula.take() {
            nebula.detach();
        }
        if let Some(mut stars) = self.stars.take() {
            stars.detach();
        }

        match self.backdrop {
            Backdrop::Starfield => self.platform.unmount_starfield(),
            Backdrop::StaticDots => self.platform.unmount_static_fallback(),
            Backdrop::None => {}
        }
        self.backdrop = Backdrop::None;

        self.state = ComposerState::Unmounted;
        self.log("[nightsky] Unmounted");
    }

    fn mount_backdrop(&mut self, starfield: &StarfieldConfig) {
        match self.platform.mount_starfield(starfield) {
            Ok(()) => {
                self.log(&format!(
                    "[nightsky] Starfield mounted: {} particles @ {} fps",
                    starfield.particle_count, starfield.fps_limit
                ));
                self.backdrop = Backdrop::Starfield;
            }
            Err(e) => {
                self.log(&format!("[nightsky] {}, using static dots", e));
                self.platform.mount_static_fallback();
                self.backdrop = Backdrop::StaticDots;
            }
        }
    }

    fn mount_layers(&mut self, profile: &TierProfile) {
        let viewport = self.platform.viewport();
        let ratio = self.platform.device_pixel_ratio();
        let now_ms = self.platform.now_ms();

        self.nebula_frames = FrameScheduler::new(profile.frame_interval_ms);
        self.star_frames = FrameScheduler::new(profile.frame_interval_ms);

        match self.platform.create_surface(LayerKind::Nebula) {
            Ok(mut surface) => {
                surface.resize(viewport, ratio);
                self.nebula = Some(NebulaLayer::new(surface, profile, &self.config));
            }
            Err(e) => self.log(&format!("[nebula] {}", e)),
        }

        match self.platform.create_surface(LayerKind::ShootingStars) {
            Ok(mut surface) => {
                surface.resize(viewport, ratio);
                self.stars = Some(ShootingStarSystem::new(
                    surface,
                    profile,
                    &self.config,
                    now_ms,
                    self.rng.as_mut(),
                ));
            }
            Err(e) => self.log(&format!("[stars] {}", e)),
        }
    }

    fn attach_listeners(&mut self) {
        for kind in [ViewportEventKind::Resize, ViewportEventKind::VisibilityChange] {
            if let Err(e) = self.listeners.attach(&mut self.platform, kind) {
                self.log(&format!("[listeners] {:?}: {}", kind, e));
            }
        }
    }

    // =========================================================================
    // Frame loops
    // =========================================================================

    fn start_loops(&mut self) {
        if self.nebula.is_some() {
            if let Err(e) = self.nebula_frames.schedule(&mut self.platform) {
                self.log(&format!("[frames] nebula loop stopped: {}", e));
            }
        }
        if self.stars.is_some() {
            if let Err(e) = self.star_frames.schedule(&mut self.platform) {
                self.log(&format!("[frames] star loop stopped: {}", e));
            }
        }
    }

    fn stop_loops(&mut self) {
        self.nebula_frames.cancel(&mut self.platform);
        self.star_frames.cancel(&mut self.platform);
    }

    /// Deliver a native display-refresh callback
    pub fn on_frame(&mut self, id: FrameRequestId, timestamp_ms: f64) {
        if self.state != ComposerState::Running {
            return;
        }

        if self.nebula_frames.owns(id) {
            match self.nebula_frames.on_native_frame(id, timestamp_ms, &mut self.platform) {
                Ok(FrameDecision::Run) => {
                    if let Some(nebula) = &mut self.nebula {
                        nebula.tick(timestamp_ms, self.rng.as_mut());
                    }
                    if let Err(e) = self.nebula_frames.schedule(&mut self.platform) {
                        self.log(&format!("[frames] nebula loop stopped: {}", e));
                    }
                }
                Ok(FrameDecision::Skip) | Ok(FrameDecision::Stale) => {}
                Err(e) => self.log(&format!("[frames] nebula loop stopped: {}", e)),
            }
        } else if self.star_frames.owns(id) {
            match self.star_frames.on_native_frame(id, timestamp_ms, &mut self.platform) {
                Ok(FrameDecision::Run) => {
                    if let Some(stars) = &mut self.stars {
                        stars.frame(timestamp_ms, self.rng.as_mut());
                    }
                    if let Err(e) = self.star_frames.schedule(&mut self.platform) {
                        self.log(&format!("[frames] star loop stopped: {}", e));
                    }
                }
                Ok(FrameDecision::Skip) | Ok(FrameDecision::Stale) => {}
                Err(e) => self.log(&format!("[frames] star loop stopped: {}", e)),
            }
        }
    }

    // =========================================================================
    // Viewport events
    // =========================================================================

    /// Deliver a viewport event from one of the registered listeners
    pub fn on_event(&mut self, event: ViewportEvent) {
        if self.state != ComposerState::Running {
            return;
        }

        match event {
            ViewportEvent::Resize => {
                let viewport = self.platform.viewport();
                let ratio = self.platform.device_pixel_ratio();
                let now_ms = self.platform.now_ms();
                if let Some(nebula) = &mut self.nebula {
                    nebula.resize(viewport, ratio, now_ms, self.rng.as_mut());
                }
                if let Some(stars) = &mut self.stars {
                    stars.resize(viewport, ratio);
                }
            }
            ViewportEvent::VisibilityChange { hidden: true } => {
                if !self.hidden {
                    self.hidden = true;
                    self.stop_loops();
                }
            }
            ViewportEvent::VisibilityChange { hidden: false } => {
                if self.hidden {
                    self.hidden = false;
                    self.start_loops();
                }
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Tier chosen at mount
    pub fn tier(&self) -> Option<CapabilityTier> {
        self.tier
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    pub fn config(&self) -> &NightskyConfig {
        &self.config
    }

    pub fn nebula(&self) -> Option<&NebulaLayer<P::Surface>> {
        self.nebula.as_ref()
    }

    pub fn stars(&self) -> Option<&ShootingStarSystem<P::Surface>> {
        self.stars.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Whether the page is hidden and the loops are parked
    pub fn is_paused(&self) -> bool {
        self.hidden
    }

    fn log(&self, msg: &str) {
        self.platform.debug_write(msg);
    }
}

impl<P: Platform> Drop for AmbientBackground<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}
