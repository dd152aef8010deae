//! Integration tests for the frame clock.
//!
//! Uses paused tokio time so sleeps resolve as soon as the clock is
//! advanced.

use std::time::Duration;

use warmup_tick::{DelayQueue, FrameClock, FrameConfig, TimerService};

fn config_20hz() -> FrameConfig {
    FrameConfig {
        initial_jitter_us: 0,
        ..FrameConfig::with_rate(20)
    }
}

#[test]
fn test_default_config_rate() {
    let cfg = FrameConfig::default();
    assert_eq!(cfg.rate_hz, 64);
    assert!(cfg.frame_duration().is_some());
}

#[test]
fn test_rate_is_clamped() {
    let clock = FrameClock::new(FrameConfig::with_rate(1_000));
    assert_eq!(clock.rate_hz(), FrameConfig::MAX_RATE_HZ);
}

#[test]
fn test_idle_clock() {
    let clock = FrameClock::with_rate(0);
    assert!(clock.is_idle());
    assert_eq!(clock.frame_duration(), None);
}

#[tokio::test(start_paused = true)]
async fn test_frames_fire_with_fixed_dt() {
    let mut clock = FrameClock::new(config_20hz());
    for expected in 1..=3 {
        let info = clock.wait_for_frame().await;
        assert_eq!(info.frame, expected);
        assert_eq!(info.dt, Duration::from_millis(50));
        assert!(!info.overrun);
        assert_eq!(info.frames_skipped, 0);
    }
    assert_eq!(clock.frame_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_idle_clock_never_fires() {
    let mut clock = FrameClock::with_rate(0);
    let result = tokio::time::timeout(Duration::from_secs(5), clock.wait_for_frame()).await;
    assert!(result.is_err(), "idle clock should pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume() {
    let mut clock = FrameClock::new(config_20hz());
    clock.wait_for_frame().await;

    clock.pause();
    clock.pause();
    assert!(clock.is_paused());
    let result = tokio::time::timeout(Duration::from_secs(1), clock.wait_for_frame()).await;
    assert!(result.is_err(), "paused clock should pend");

    clock.resume();
    clock.resume();
    assert!(!clock.is_paused());
    assert_eq!(clock.wait_for_frame().await.frame, 2);
}

#[tokio::test(start_paused = true)]
async fn test_frames_drive_delay_queue() {
    let mut clock = FrameClock::new(config_20hz());
    let mut timers = DelayQueue::new();
    timers.schedule(Duration::from_secs(1), "tick");

    let mut fired_at = None;
    for _ in 0..40 {
        let info = clock.wait_for_frame().await;
        if !timers.advance(info.dt).is_empty() {
            fired_at = Some(info.frame);
            break;
        }
    }
    assert_eq!(fired_at, Some(20));
}
