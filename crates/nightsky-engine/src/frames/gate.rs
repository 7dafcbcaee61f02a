//! Timestamp throttle for display-refresh callbacks

/// Slack for float jitter in refresh timestamps (two 60 Hz frames are
/// 33.3333 ms apart, a hair under a 30 fps interval)
pub const FRAME_TOLERANCE_MS: f64 = 0.1;

/// Accepts at most one frame per `interval_ms`; uncapped when the interval is `None`
#[derive(Clone, Debug, Default)]
pub struct FrameGate {
    interval_ms: Option<f64>,
    last_accepted_ms: Option<f64>,
}

impl FrameGate {
    pub fn new(interval_ms: Option<f64>) -> Self {
        Self {
            interval_ms,
            last_accepted_ms: None,
        }
    }

    /// Uncapped gate
    pub fn native() -> Self {
        Self::new(None)
    }

    /// Gate limited to `fps` accepted frames per second
    pub fn capped(fps: f64) -> Self {
        Self::new(Some(1000.0 / fps))
    }

    pub fn interval_ms(&self) -> Option<f64> {
        self.interval_ms
    }

    pub fn last_accepted_ms(&self) -> Option<f64> {
        self.last_accepted_ms
    }

    /// Decide whether a frame at `timestamp_ms` runs, recording it if so
    pub fn accept(&mut self, timestamp_ms: f64) -> bool {
        let due = match (self.interval_ms, self.last_accepted_ms) {
            (None, _) | (_, None) => true,
            (Some(interval), Some(last)) => timestamp_ms - last >= interval - FRAME_TOLERANCE_MS,
        };
        if due {
            self.last_accepted_ms = Some(timestamp_ms);
        }
        due
    }

    /// Forget the last accepted frame, e.g. after the loop was paused
    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
    }
}
