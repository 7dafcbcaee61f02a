//! Frame scheduling
//!
//! - [`FrameGate`]: pure timestamp throttle
//! - [`FrameScheduler`]: one self-re-arming loop over a [`FrameHost`](crate::platform::FrameHost)

mod gate;
mod scheduler;

pub use gate::{FrameGate, FRAME_TOLERANCE_MS};
pub use scheduler::{FrameDecision, FrameScheduler};
