//! Error types for the background engine.
//!
//! Every failure here is soft: callers log it and render less, never more.

use std::fmt;

/// Errors raised by platform hooks and configuration parsing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NightskyError {
    /// A drawing surface could not be created or its 2D context acquired
    SurfaceUnavailable(String),

    /// The external dense-starfield collaborator is missing or refused to start
    StarfieldUnavailable(String),

    /// The platform refused to schedule a display-refresh callback
    FrameRequestFailed(String),

    /// A viewport listener could not be attached
    ListenerFailed(String),

    /// Configuration could not be parsed or failed validation
    InvalidConfig(String),
}

impl fmt::Display for NightskyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NightskyError::SurfaceUnavailable(msg) => write!(f, "Surface unavailable: {}", msg),
            NightskyError::StarfieldUnavailable(msg) => {
                write!(f, "Starfield unavailable: {}", msg)
            }
            NightskyError::FrameRequestFailed(msg) => write!(f, "Frame request failed: {}", msg),
            NightskyError::ListenerFailed(msg) => write!(f, "Listener failed: {}", msg),
            NightskyError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for NightskyError {}

impl From<serde_json::Error> for NightskyError {
    fn from(e: serde_json::Error) -> Self {
        NightskyError::InvalidConfig(e.to_string())
    }
}
