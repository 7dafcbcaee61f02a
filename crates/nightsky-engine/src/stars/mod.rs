//! Shooting stars
//!
//! A fixed pool of independent particles, each cycling forever through
//! spawn -> wait -> fade in -> fade out -> expire -> respawn, drawn with a
//! bounded fading trail.

mod star;
mod system;
mod trail;

pub use star::{EntryEdge, ShootingStar, StarPhase, StarTuning};
pub use system::ShootingStarSystem;
pub use trail::{Trail, TrailSample};
