//! Integration tests for AmbientBackground
//!
//! These tests drive the composer against the recording mock platform:
//! - Tier selection and the small-screen fallback
//! - Frame throttling and nebula cadence
//! - Shooting-star activation timing
//! - Visibility pausing and resize handling
//! - Ordered, idempotent teardown

use nightsky_engine::{
    AmbientBackground, Backdrop, CapabilitySignals, CapabilityTier, ComposerState, LayerKind,
    NightskyConfig, SeededRandom, StarPhase, StarfieldConfig, ViewportEvent, ViewportEventKind,
};
use nightsky_mock::{MockPlatform, PlatformCall, ScriptedRandom};

fn low_signals() -> CapabilitySignals {
    CapabilitySignals::default().with_accelerated_backend(false)
}

fn standard_signals() -> CapabilitySignals {
    CapabilitySignals::default()
        .with_accelerated_backend(true)
        .with_device_memory(8.0)
        .with_logical_cores(8)
}

fn background(platform: MockPlatform) -> AmbientBackground<MockPlatform> {
    AmbientBackground::with_random(platform, NightskyConfig::default(), SeededRandom::from_seed(7))
}

/// Deliver every pending frame at `ts`
fn pump(bg: &mut AmbientBackground<MockPlatform>, ts: f64) {
    bg.platform_mut().set_time(ts);
    for id in bg.platform_mut().take_pending_frames() {
        bg.on_frame(id, ts);
    }
}

/// Deliver `frames` refreshes at `hz`, the first one period after `start`
fn run_at(bg: &mut AmbientBackground<MockPlatform>, hz: f64, start: f64, frames: usize) {
    for i in 1..=frames {
        pump(bg, start + i as f64 * 1000.0 / hz);
    }
}

// =============================================================================
// Mounting
// =============================================================================

#[test]
fn test_low_tier_small_screen_skips_layers() {
    let mut bg = background(MockPlatform::new().with_viewport(375.0, 812.0));
    bg.mount(&low_signals());

    assert_eq!(bg.state(), ComposerState::Fallback);
    assert_eq!(bg.tier(), Some(CapabilityTier::Low));
    assert_eq!(bg.platform().surface_count(), 0);
    assert_eq!(bg.platform().listener_count(), 0);
    assert!(bg.platform().pending_frames().is_empty());
    assert!(bg.nebula().is_none());
    assert!(bg.stars().is_none());
    assert_eq!(
        bg.platform().starfield(),
        Some(StarfieldConfig {
            particle_count: 40,
            fps_limit: 30
        })
    );
}

#[test]
fn test_standard_tier_mounts_everything() {
    let mut bg = background(MockPlatform::new().with_device_pixel_ratio(2.0));
    bg.mount(&standard_signals());

    assert_eq!(bg.state(), ComposerState::Running);
    assert_eq!(bg.tier(), Some(CapabilityTier::Standard));
    assert_eq!(bg.backdrop(), Backdrop::Starfield);
    assert_eq!(
        bg.platform().starfield(),
        Some(StarfieldConfig {
            particle_count: 120,
            fps_limit: 60
        })
    );

    let platform = bg.platform();
    assert_eq!(platform.surface_count(), 2);
    let nebula = platform.surface(LayerKind::Nebula).unwrap();
    assert_eq!(nebula.borrow().backing, (3840, 2160));
    // Both surfaces sized to the viewport at mount
    let stars = platform.surface(LayerKind::ShootingStars).unwrap();
    assert_eq!(stars.borrow().backing, (3840, 2160));
    assert_eq!(stars.borrow().size, nebula.borrow().size);

    assert!(platform.has_listener(ViewportEventKind::Resize));
    assert!(platform.has_listener(ViewportEventKind::VisibilityChange));
    assert!(platform.all_listeners_passive());

    // One pending request per loop
    assert_eq!(platform.pending_frames().len(), 2);
    assert_eq!(bg.stars().unwrap().stars().len(), 2);
    assert!(platform.has_log_containing("Capability tier: standard"));
}

#[test]
fn test_low_tier_wide_screen_still_animates() {
    let mut bg = background(MockPlatform::new().with_viewport(1280.0, 800.0));
    bg.mount(&low_signals());

    assert_eq!(bg.state(), ComposerState::Running);
    assert_eq!(bg.stars().unwrap().stars().len(), 1);
    assert!(bg.platform().has_log_containing("NoAcceleratedBackend"));
}

#[test]
fn test_mobile_user_agent_is_low_tier() {
    let mut bg = background(MockPlatform::new().with_viewport(390.0, 844.0));
    bg.mount(
        &standard_signals()
            .with_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile"),
    );
    assert_eq!(bg.tier(), Some(CapabilityTier::Low));
    assert_eq!(bg.state(), ComposerState::Fallback);
}

#[test]
fn test_small_screen_threshold_is_configurable() {
    let config = NightskyConfig::from_json(r#"{"smallScreenMaxWidth": 320}"#).unwrap();
    let mut bg = AmbientBackground::with_random(
        MockPlatform::new().with_viewport(375.0, 812.0),
        config,
        SeededRandom::from_seed(1),
    );
    bg.mount(&low_signals());
    assert_eq!(bg.state(), ComposerState::Running);
}

#[test]
fn test_missing_starfield_uses_static_dots() {
    let mut bg = background(MockPlatform::new().without_starfield());
    bg.mount(&standard_signals());

    assert_eq!(bg.backdrop(), Backdrop::StaticDots);
    assert!(bg.platform().static_fallback_mounted());
    assert!(bg.platform().starfield().is_none());
    assert!(bg.platform().has_log_containing("static dots"));

    bg.unmount();
    assert!(!bg.platform().static_fallback_mounted());
}

#[test]
fn test_surface_failure_is_not_fatal() {
    let mut bg = background(MockPlatform::new().with_failing_surfaces());
    bg.mount(&standard_signals());

    assert_eq!(bg.state(), ComposerState::Running);
    assert!(bg.nebula().is_none());
    assert!(bg.stars().is_none());
    assert!(bg.platform().pending_frames().is_empty());
    assert!(bg.platform().has_log_containing("[nebula]"));
}

#[test]
fn test_listener_and_frame_failures_are_logged() {
    let mut bg = background(
        MockPlatform::new()
            .with_failing_listeners()
            .with_failing_frames(),
    );
    bg.mount(&standard_signals());

    assert_eq!(bg.state(), ComposerState::Running);
    assert!(bg.platform().has_log_containing("[listeners]"));
    assert!(bg.platform().has_log_containing("[frames]"));
    bg.unmount();
    assert_eq!(bg.state(), ComposerState::Unmounted);
}

#[test]
fn test_mount_twice_is_noop() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    bg.mount(&low_signals());

    assert_eq!(bg.tier(), Some(CapabilityTier::Standard));
    assert_eq!(bg.platform().surface_count(), 2);
}

// =============================================================================
// Frame Loops
// =============================================================================

#[test]
fn test_standard_tier_runs_every_refresh() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    run_at(&mut bg, 60.0, 0.0, 60);

    assert_eq!(bg.stars().unwrap().frame_count(), 60);
    let stars = bg.platform().surface(LayerKind::ShootingStars).unwrap();
    assert_eq!(stars.borrow().clears(), 60);
}

#[test]
fn test_low_tier_caps_at_thirty_fps() {
    let mut bg = background(MockPlatform::new().with_viewport(1280.0, 800.0));
    bg.mount(&low_signals());
    run_at(&mut bg, 120.0, 0.0, 120);

    let frames = bg.stars().unwrap().frame_count();
    assert!((29..=31).contains(&frames), "got {} frames", frames);
}

#[test]
fn test_never_more_than_one_pending_frame_per_loop() {
    let mut bg = background(MockPlatform::new().with_viewport(1280.0, 800.0));
    bg.mount(&low_signals());
    for i in 1..=50 {
        pump(&mut bg, i as f64 * 7.0);
        assert!(bg.platform().pending_frames().len() <= 2);
    }
}

#[test]
fn test_nebula_repaints_once_per_second() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    run_at(&mut bg, 60.0, 0.0, 180);

    let nebula = bg.nebula().unwrap();
    assert_eq!(nebula.paint_count(), 3);
    let surface = bg.platform().surface(LayerKind::Nebula).unwrap();
    assert_eq!(surface.borrow().solid_fills(), 3);
    let blooms = surface.borrow().gradients();
    assert!((9..=12).contains(&blooms), "got {} blooms", blooms);
}

#[test]
fn test_low_tier_nebula_repaints_every_five_seconds() {
    let mut bg = background(MockPlatform::new().with_viewport(1280.0, 800.0));
    bg.mount(&low_signals());
    run_at(&mut bg, 30.0, 0.0, 300);

    // Paints near 0 s and 5 s within the first ten seconds
    assert_eq!(bg.nebula().unwrap().paint_count(), 2);
    let surface = bg.platform().surface(LayerKind::Nebula).unwrap();
    assert_eq!(surface.borrow().gradients(), 2);
}

#[test]
fn test_zero_wait_draw_activates_after_five_seconds() {
    let mut bg = AmbientBackground::with_random(
        MockPlatform::new().with_time(1000.0),
        NightskyConfig::default(),
        ScriptedRandom::constant(0.0),
    );
    bg.mount(&standard_signals());

    for star in bg.stars().unwrap().stars() {
        assert_eq!(star.spawn_deadline_ms(), 6000.0);
    }

    pump(&mut bg, 5999.0);
    assert!(bg
        .stars()
        .unwrap()
        .stars()
        .iter()
        .all(|s| s.phase() == StarPhase::Waiting));
    let surface = bg.platform().surface(LayerKind::ShootingStars).unwrap();
    assert_eq!(surface.borrow().paint_calls(), 0);

    pump(&mut bg, 6000.0);
    assert!(bg
        .stars()
        .unwrap()
        .stars()
        .iter()
        .all(|s| s.phase() == StarPhase::FadingIn));

    pump(&mut bg, 6016.0);
    assert!(surface.borrow().paint_calls() > 0);
}

#[test]
fn test_shooting_stars_eventually_streak() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    run_at(&mut bg, 60.0, 0.0, 60 * 25);

    let surface = bg.platform().surface(LayerKind::ShootingStars).unwrap();
    assert!(surface.borrow().lines() > 0);
    assert!(surface.borrow().circles() > 0);
}

// =============================================================================
// Viewport Events
// =============================================================================

#[test]
fn test_hidden_page_parks_loops() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    run_at(&mut bg, 60.0, 0.0, 10);

    bg.on_event(ViewportEvent::VisibilityChange { hidden: true });
    assert!(bg.is_paused());
    assert!(bg.platform().pending_frames().is_empty());

    run_at(&mut bg, 60.0, 1000.0, 10);
    assert_eq!(bg.stars().unwrap().frame_count(), 10);

    bg.on_event(ViewportEvent::VisibilityChange { hidden: false });
    assert!(!bg.is_paused());
    assert_eq!(bg.platform().pending_frames().len(), 2);
    run_at(&mut bg, 60.0, 2000.0, 5);
    assert_eq!(bg.stars().unwrap().frame_count(), 15);
}

#[test]
fn test_resize_rescales_both_layers() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    pump(&mut bg, 16.0);
    assert_eq!(bg.nebula().unwrap().paint_count(), 1);

    bg.platform_mut().set_viewport(800.0, 600.0);
    bg.platform_mut().set_device_pixel_ratio(2.0);
    bg.on_event(ViewportEvent::Resize);

    for layer in [LayerKind::Nebula, LayerKind::ShootingStars] {
        let surface = bg.platform().surface(layer).unwrap();
        assert_eq!(surface.borrow().backing, (1600, 1200));
    }
    // Nebula repaints immediately on resize
    assert_eq!(bg.nebula().unwrap().paint_count(), 2);
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn test_unmount_before_first_frame_draws_nothing() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    let stale: Vec<_> = bg.platform().pending_frames().to_vec();

    bg.unmount();
    // A browser may still deliver callbacks it had already queued
    for id in stale {
        bg.on_frame(id, 16.0);
    }

    for layer in [LayerKind::Nebula, LayerKind::ShootingStars] {
        let surface = bg.platform().surface(layer).unwrap();
        assert!(surface.borrow().calls.is_empty());
        assert!(!surface.borrow().attached);
    }
    assert!(bg.platform().pending_frames().is_empty());
    assert_eq!(bg.platform().listener_count(), 0);
}

#[test]
fn test_teardown_order() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    pump(&mut bg, 16.0);
    let before = bg.platform().journal().len();

    bg.unmount();
    let journal = bg.platform().journal();
    let teardown = &journal[before..];

    let last = |pred: fn(&PlatformCall) -> bool| teardown.iter().rposition(pred).unwrap();
    let first = |pred: fn(&PlatformCall) -> bool| teardown.iter().position(pred).unwrap();

    let last_cancel = last(|c| matches!(c, PlatformCall::CancelFrame(_)));
    let first_remove = first(|c| matches!(c, PlatformCall::RemoveListener(_)));
    let last_remove = last(|c| matches!(c, PlatformCall::RemoveListener(_)));
    let first_detach = first(|c| matches!(c, PlatformCall::DetachSurface(_)));
    let starfield = first(|c| matches!(c, PlatformCall::UnmountStarfield));

    assert!(last_cancel < first_remove);
    assert!(last_remove < first_detach);
    assert!(first_detach < starfield);
}

#[test]
fn test_unmount_is_idempotent() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    bg.unmount();
    let journal = bg.platform().journal().len();

    bg.unmount();
    assert_eq!(bg.platform().journal().len(), journal);
    assert_eq!(bg.state(), ComposerState::Unmounted);
    let unmounts = bg
        .platform()
        .get_debug_log()
        .iter()
        .filter(|m| m.contains("Unmounted"))
        .count();
    assert_eq!(unmounts, 1);
}

#[test]
fn test_fallback_unmount_releases_starfield() {
    let mut bg = background(MockPlatform::new().with_viewport(375.0, 812.0));
    bg.mount(&low_signals());
    bg.unmount();

    assert!(bg.platform().starfield().is_none());
    assert!(bg
        .platform()
        .journal()
        .contains(&PlatformCall::UnmountStarfield));
}

#[test]
fn test_events_after_unmount_are_ignored() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    bg.unmount();

    bg.on_event(ViewportEvent::VisibilityChange { hidden: false });
    bg.on_event(ViewportEvent::Resize);
    assert!(bg.platform().pending_frames().is_empty());
}

#[test]
fn test_remount_after_unmount() {
    let mut bg = background(MockPlatform::new());
    bg.mount(&standard_signals());
    bg.unmount();
    bg.mount(&standard_signals());

    assert_eq!(bg.state(), ComposerState::Running);
    assert_eq!(bg.platform().surface_count(), 4);
    assert_eq!(bg.platform().listener_count(), 2);
}
