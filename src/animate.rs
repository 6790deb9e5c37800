//! Eased numeric animation for displayed counters (block height, gas price).
//!
//! Caller-clocked: the owner samples once per render frame with the current
//! `Instant`, so smoothness is independent of the polling cadence and no
//! timer is held here. Retargeting restarts the interpolation from the
//! currently displayed value, never from zero, so repeated updates before
//! completion stay visually continuous.

use std::time::{Duration, Instant};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct AnimatedValue {
    start: f64,
    target: f64,
    started_at: Instant,
    duration: Duration,
}

impl AnimatedValue {
    pub fn new(initial: f64) -> Self {
        Self::with_duration(initial, DEFAULT_DURATION)
    }

    pub fn with_duration(initial: f64, duration: Duration) -> Self {
        Self {
            start: initial,
            target: initial,
            started_at: Instant::now(),
            duration,
        }
    }

    /// Begin animating toward `target`, starting from whatever value is
    /// displayed at `now`.
    pub fn retarget(&mut self, target: f64, now: Instant) {
        self.start = self.sample(now);
        self.target = target;
        self.started_at = now;
    }

    /// Current interpolated value at `now`: cubic ease-out, clamped to the
    /// exact target once the duration has elapsed (no overshoot).
    pub fn sample(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return self.target;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            return self.target;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = 1.0 - (1.0 - t).powi(3);
        self.start + (self.target - self.start) * eased
    }

    /// Rounded integer for display.
    pub fn display(&self, now: Instant) -> i64 {
        self.sample(now).round() as i64
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}
