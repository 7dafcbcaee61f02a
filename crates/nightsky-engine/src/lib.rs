//! Ambient Night-Sky Background Engine
//!
//! This crate provides the core of the animated page background:
//! - Device capability classification (low vs standard tier)
//! - Frame scheduling with a per-tier frame-rate cap
//! - A slow-redraw nebula layer of soft radial blooms
//! - A pooled shooting-star particle system with fading trails
//! - Composition of all layers over an external dense starfield
//!
//! ## Architecture
//!
//! - [`math`]: Geometry and color types (`Vec2`, `Size`, `Rgba`)
//! - [`capability`]: Tier classification from device signals
//! - [`config`]: Tunables and per-tier profiles
//! - [`frames`]: Frame gate and single-flight frame scheduler
//! - [`listeners`]: Passive viewport listener bookkeeping
//! - [`nebula`]: Nebula layer
//! - [`stars`]: Shooting stars and their trails
//! - [`platform`]: Traits the hosting page implements
//!
//! ## Example
//!
//! ```rust,ignore
//! use nightsky_engine::{AmbientBackground, CapabilitySignals, NightskyConfig};
//!
//! let mut background = AmbientBackground::new(platform, NightskyConfig::default());
//! background.mount(&CapabilitySignals::default().with_accelerated_backend(true));
//!
//! // From the host's display-refresh callback:
//! background.on_frame(id, timestamp_ms);
//!
//! // On teardown:
//! background.unmount();
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: No browser dependencies; hosts implement [`Platform`]
//! 2. **Injectable Time and Randomness**: Timestamps are passed in and every
//!    random draw goes through [`RandomSource`], so tests are deterministic
//! 3. **Single-Threaded**: Everything runs on the host's event loop

pub mod capability;
pub mod config;
pub mod error;
pub mod frames;
pub mod listeners;
pub mod math;
pub mod nebula;
pub mod platform;
pub mod random;
pub mod stars;

mod composer;

pub use capability::{classify, classify_with_reasons, CapabilitySignals, CapabilityTier, LowTierReason};
pub use composer::{AmbientBackground, Backdrop, ComposerState};
pub use config::{NightskyConfig, Span, StarfieldConfig, TierProfile};
pub use error::NightskyError;
pub use frames::{FrameDecision, FrameGate, FrameScheduler};
pub use listeners::PassiveListenerRegistrar;
pub use math::{Rgba, Size, Vec2};
pub use nebula::{NebulaLayer, NEBULA_PALETTE};
pub use platform::{
    FrameHost, FrameRequestId, LayerKind, ListenerHost, ListenerId, ListenerOptions, Platform,
    Surface2d, ViewportEvent, ViewportEventKind,
};
pub use random::{RandomSource, SeededRandom};
pub use stars::{ShootingStar, ShootingStarSystem, StarPhase};
