//! Device capability classification
//!
//! Runs once per session and buckets the device into a [`CapabilityTier`].
//! Missing signals never demote a device on their own; only an explicitly
//! weak reading does.

use serde::{Deserialize, Serialize};

/// Minimum reported device memory (GB) for the standard tier
pub const MIN_STANDARD_MEMORY_GB: f64 = 4.0;

/// Minimum reported logical core count for the standard tier
pub const MIN_STANDARD_CORES: u32 = 4;

/// User-agent tokens that identify handheld form factors
const MOBILE_UA_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
    "mobi",
];

/// Discrete capability tier driving every adaptive parameter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityTier {
    /// Constrained device: fewer particles, 30 fps cap, rarer shooting stars
    Low,
    /// Everything else
    #[default]
    Standard,
}

impl CapabilityTier {
    /// Get the string ID for this tier
    pub fn id(&self) -> &'static str {
        match self {
            CapabilityTier::Low => "low",
            CapabilityTier::Standard => "standard",
        }
    }

    /// Parse from string ID (e.g., "low", "standard")
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "low" => Some(CapabilityTier::Low),
            "standard" => Some(CapabilityTier::Standard),
            _ => None,
        }
    }
}

/// Why a device landed in the low tier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LowTierReason {
    /// Accelerated rendering backend reported unavailable
    NoAcceleratedBackend,
    /// Platform or user agent reports a handheld form factor
    MobileFormFactor,
    /// Reported device memory below [`MIN_STANDARD_MEMORY_GB`]
    LowMemory,
    /// Reported logical cores below [`MIN_STANDARD_CORES`]
    FewCores,
}

/// Raw runtime signals. `None` means the platform did not report the signal
/// or the lookup for it failed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CapabilitySignals {
    /// Whether an accelerated (WebGL) rendering backend could be created
    pub accelerated_backend: Option<bool>,
    /// Platform user-agent string
    pub user_agent: Option<String>,
    /// Platform's own mobile flag (`navigator.userAgentData.mobile`)
    pub mobile_hint: Option<bool>,
    /// Approximate device memory in GB (`navigator.deviceMemory`)
    pub device_memory_gb: Option<f64>,
    /// Logical core count (`navigator.hardwareConcurrency`)
    pub logical_cores: Option<u32>,
}

impl CapabilitySignals {
    pub fn with_accelerated_backend(mut self, available: bool) -> Self {
        self.accelerated_backend = Some(available);
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn with_mobile_hint(mut self, mobile: bool) -> Self {
        self.mobile_hint = Some(mobile);
        self
    }

    pub fn with_device_memory(mut self, gb: f64) -> Self {
        self.device_memory_gb = Some(gb);
        self
    }

    pub fn with_logical_cores(mut self, cores: u32) -> Self {
        self.logical_cores = Some(cores);
        self
    }

    fn is_mobile(&self) -> bool {
        if self.mobile_hint == Some(true) {
            return true;
        }
        match &self.user_agent {
            Some(ua) => {
                let ua = ua.to_lowercase();
                MOBILE_UA_TOKENS.iter().any(|token| ua.contains(token))
            }
            None => false,
        }
    }
}

/// Classify a device from its signals
pub fn classify(signals: &CapabilitySignals) -> CapabilityTier {
    classify_with_reasons(signals).0
}

/// Classify a device and report every reason it was demoted
pub fn classify_with_reasons(signals: &CapabilitySignals) -> (CapabilityTier, Vec<LowTierReason>) {
    let mut reasons = Vec::new();

    if signals.accelerated_backend == Some(false) {
        reasons.push(LowTierReason::NoAcceleratedBackend);
    }
    if signals.is_mobile() {
        reasons.push(LowTierReason::MobileFormFactor);
    }
    // NaN compares false and is treated as unreported
    if signals.device_memory_gb.is_some_and(|gb| gb < MIN_STANDARD_MEMORY_GB) {
        reasons.push(LowTierReason::LowMemory);
    }
    if signals.logical_cores.is_some_and(|cores| cores < MIN_STANDARD_CORES) {
        reasons.push(LowTierReason::FewCores);
    }

    let tier = if reasons.is_empty() {
        CapabilityTier::Standard
    } else {
        CapabilityTier::Low
    };
    (tier, reasons)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";

    fn strong_desktop() -> CapabilitySignals {
        CapabilitySignals::default()
            .with_accelerated_backend(true)
            .with_user_agent(DESKTOP_UA)
            .with_device_memory(8.0)
            .with_logical_cores(8)
    }

    #[test]
    fn test_missing_signals_default_to_standard() {
        assert_eq!(classify(&CapabilitySignals::default()), CapabilityTier::Standard);
    }

    #[test]
    fn test_strong_desktop_is_standard() {
        let (tier, reasons) = classify_with_reasons(&strong_desktop());
        assert_eq!(tier, CapabilityTier::Standard);
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_no_accelerated_backend_is_low() {
        let signals = strong_desktop().with_accelerated_backend(false);
        assert_eq!(
            classify_with_reasons(&signals),
            (CapabilityTier::Low, vec![LowTierReason::NoAcceleratedBackend])
        );
    }

    #[test]
    fn test_mobile_user_agent_is_low() {
        let signals = strong_desktop().with_user_agent(IPHONE_UA);
        assert_eq!(classify(&signals), CapabilityTier::Low);

        let signals = strong_desktop().with_user_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8)");
        assert_eq!(classify(&signals), CapabilityTier::Low);
    }

    #[test]
    fn test_mobile_hint_is_low() {
        let signals = strong_desktop().with_mobile_hint(true);
        assert_eq!(classify(&signals), CapabilityTier::Low);

        let signals = strong_desktop().with_mobile_hint(false);
        assert_eq!(classify(&signals), CapabilityTier::Standard);
    }

    #[test]
    fn test_memory_threshold() {
        assert_eq!(classify(&strong_desktop().with_device_memory(2.0)), CapabilityTier::Low);
        assert_eq!(classify(&strong_desktop().with_device_memory(4.0)), CapabilityTier::Standard);
        assert_eq!(
            classify(&strong_desktop().with_device_memory(f64::NAN)),
            CapabilityTier::Standard
        );
    }

    #[test]
    fn test_core_threshold() {
        assert_eq!(classify(&strong_desktop().with_logical_cores(2)), CapabilityTier::Low);
        assert_eq!(classify(&strong_desktop().with_logical_cores(4)), CapabilityTier::Standard);
    }

    #[test]
    fn test_every_reason_is_reported() {
        let signals = CapabilitySignals::default()
            .with_accelerated_backend(false)
            .with_user_agent(IPHONE_UA)
            .with_device_memory(1.0)
            .with_logical_cores(2);
        let (tier, reasons) = classify_with_reasons(&signals);
        assert_eq!(tier, CapabilityTier::Low);
        assert_eq!(reasons.len(), 4);
    }

    #[test]
    fn test_classify_is_pure() {
        let inputs = [
            CapabilitySignals::default(),
            strong_desktop(),
            strong_desktop().with_logical_cores(1),
            CapabilitySignals::default().with_user_agent(IPHONE_UA),
        ];
        for signals in &inputs {
            let first = classify(signals);
            for _ in 0..5 {
                assert_eq!(classify(signals), first);
            }
        }
    }

    #[test]
    fn test_tier_id_roundtrip() {
        for tier in [CapabilityTier::Low, CapabilityTier::Standard] {
            assert_eq!(CapabilityTier::from_id(tier.id()), Some(tier));
        }
        assert_eq!(CapabilityTier::from_id("LOW"), Some(CapabilityTier::Low));
        assert_eq!(CapabilityTier::from_id("ultra"), None);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CapabilityTier::Low).unwrap(), "\"low\"");
        let tier: CapabilityTier = serde_json::from_str("\"standard\"").unwrap();
        assert_eq!(tier, CapabilityTier::Standard);
    }
}
