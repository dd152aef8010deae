//! Fixed-rate frame clock.
//!
//! Stands in for the host engine's frame loop when the plugin runs outside
//! a game server (the demo binary, soak tests). Each resolved
//! [`FrameClock::wait_for_frame`] is one host frame: the caller advances
//! its [`DelayQueue`](crate::DelayQueue) by [`FrameInfo::dt`] and runs
//! whatever fired.
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(ev) = events.recv() => plugin.on_event(&mut engine, ev),
//!         frame = clock.wait_for_frame() => plugin.on_frame(&mut engine, frame.dt),
//!     }
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

/// Configuration for the frame clock.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Frames per second. 0 = idle (the clock never fires).
    pub rate_hz: u32,
    /// Random jitter (0–max µs) added to the first frame so several
    /// clocks started together don't fire in lockstep.
    pub initial_jitter_us: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: 64,
            initial_jitter_us: 2_000,
        }
    }
}

impl FrameConfig {
    /// Highest supported frame rate.
    pub const MAX_RATE_HZ: u32 = 128;

    pub fn with_rate(rate_hz: u32) -> Self {
        Self {
            rate_hz,
            ..Default::default()
        }
    }

    /// Clamps out-of-range values. Called by [`FrameClock::new`].
    pub fn validated(mut self) -> Self {
        if self.rate_hz > Self::MAX_RATE_HZ {
            warn!(
                rate = self.rate_hz,
                max = Self::MAX_RATE_HZ,
                "rate_hz exceeds maximum, clamping"
            );
            self.rate_hz = Self::MAX_RATE_HZ;
        }
        self
    }

    /// Length of one frame, or `None` when idle.
    pub fn frame_duration(&self) -> Option<Duration> {
        if self.rate_hz == 0 {
            None
        } else {
            Some(Duration::from_secs_f64(1.0 / self.rate_hz as f64))
        }
    }
}

/// One elapsed frame.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Time covered by this frame. Includes skipped frames after an
    /// overrun, so timers stay in step with wall-clock time.
    pub dt: Duration,
    /// `true` if the frame fired late.
    pub overrun: bool,
    /// Whole frames skipped because of the overrun.
    pub frames_skipped: u64,
}

/// Drives host frames at a fixed rate.
pub struct FrameClock {
    config: FrameConfig,
    frame_duration: Option<Duration>,
    frame_count: u64,
    next_frame: Option<Instant>,
    paused: bool,
}

impl FrameClock {
    pub fn new(config: FrameConfig) -> Self {
        let config = config.validated();
        let frame_duration = config.frame_duration();

        let next_frame = frame_duration.map(|d| {
            let jitter = if config.initial_jitter_us > 0 {
                Duration::from_micros(rand::rng().random_range(0..config.initial_jitter_us))
            } else {
                Duration::ZERO
            };
            Instant::now() + d + jitter
        });

        debug!(rate_hz = config.rate_hz, "frame clock created");

        Self {
            config,
            frame_duration,
            frame_count: 0,
            next_frame,
            paused: false,
        }
    }

    pub fn with_rate(rate_hz: u32) -> Self {
        Self::new(FrameConfig::with_rate(rate_hz))
    }

    /// Waits for the next frame.
    ///
    /// Pends forever when idle or paused, so it is safe inside
    /// `tokio::select!`.
    pub async fn wait_for_frame(&mut self) -> FrameInfo {
        let (next, frame_dur) = match (self.next_frame, self.frame_duration) {
            (Some(next), Some(dur)) if !self.paused => (next, dur),
            _ => std::future::pending().await,
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        self.frame_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > frame_dur / 10;
        let frames_skipped = if overrun {
            (late_by.as_nanos() / frame_dur.as_nanos()) as u64
        } else {
            0
        };
        if frames_skipped > 0 {
            warn!(
                frame = self.frame_count,
                skipped = frames_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "frame overrun, skipping ahead"
            );
        }

        self.next_frame = Some(now + frame_dur);
        trace!(frame = self.frame_count, overrun, "frame");

        FrameInfo {
            frame: self.frame_count,
            dt: frame_dur * (1 + frames_skipped as u32),
            overrun,
            frames_skipped,
        }
    }

    /// Stops frames until [`resume`](Self::resume). Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(frame = self.frame_count, "frame clock paused");
        }
    }

    /// Restarts frames one frame from now. Idempotent.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            if let Some(dur) = self.frame_duration {
                self.next_frame = Some(Instant::now() + dur);
            }
            debug!(frame = self.frame_count, "frame clock resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_idle(&self) -> bool {
        self.frame_duration.is_none()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn rate_hz(&self) -> u32 {
        self.config.rate_hz
    }

    pub fn frame_duration(&self) -> Option<Duration> {
        self.frame_duration
    }
}
