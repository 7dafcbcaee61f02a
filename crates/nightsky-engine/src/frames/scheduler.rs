//! Self-re-arming frame loop over a platform's refresh callback

use crate::error::NightskyError;
use crate::platform::{FrameHost, FrameRequestId};

use super::FrameGate;

/// What the owner should do with a delivered native frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDecision {
    /// Run the frame callback, then call [`FrameScheduler::schedule`] again
    Run,
    /// Throttled; the scheduler already re-armed itself
    Skip,
    /// Not our pending request (cancelled or superseded); nothing happens
    Stale,
}

/// Wraps a [`FrameHost`] so a loop never runs faster than its [`FrameGate`]
///
/// At most one request is pending at a time. Frames are skipped, never
/// queued.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    gate: FrameGate,
    pending: Option<FrameRequestId>,
}

impl FrameScheduler {
    pub fn new(interval_ms: Option<f64>) -> Self {
        Self {
            gate: FrameGate::new(interval_ms),
            pending: None,
        }
    }

    /// Request the next refresh unless one is already pending
    pub fn schedule(&mut self, host: &mut dyn FrameHost) -> Result<(), NightskyError> {
        if self.pending.is_none() {
            self.pending = Some(host.request_frame()?);
        }
        Ok(())
    }

    /// Handle a native refresh callback
    pub fn on_native_frame(
        &mut self,
        id: FrameRequestId,
        timestamp_ms: f64,
        host: &mut dyn FrameHost,
    ) -> Result<FrameDecision, NightskyError> {
        if self.pending != Some(id) {
            return Ok(FrameDecision::Stale);
        }
        self.pending = None;

        if self.gate.accept(timestamp_ms) {
            Ok(FrameDecision::Run)
        } else {
            self.schedule(host)?;
            Ok(FrameDecision::Skip)
        }
    }

    /// Cancel the pending request; a late delivery of it becomes `Stale`
    pub fn cancel(&mut self, host: &mut dyn FrameHost) {
        if let Some(id) = self.pending.take() {
            host.cancel_frame(id);
        }
        self.gate.reset();
    }

    /// Whether `id` is this loop's pending request
    pub fn owns(&self, id: FrameRequestId) -> bool {
        self.pending == Some(id)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
