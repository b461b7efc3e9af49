#![forbid(unsafe_code)]

//! Time-based interpolation primitives.
//!
//! Unlike a ticking animation object, a [`Tween`] holds no clock of its own:
//! callers pass the elapsed time since the tween was scheduled and get back a
//! normalized progress. This keeps sampling a pure function, so a host frame
//! driver, a test, or a replay can evaluate any instant in any order.
//!
//! # Invariants
//!
//! 1. `progress(elapsed)` is 0.0 for every `elapsed <= delay`.
//! 2. `progress(elapsed)` is 1.0 for every `elapsed >= delay + duration`.
//! 3. Progress is linear in `elapsed` between the two, so it never moves
//!    backwards.
//!
//! # Failure Modes
//!
//! - Zero duration: progress jumps from 0.0 to 1.0 once the delay elapses.

use std::time::Duration;

pub mod stagger;

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Linear interpolation between `from` and `to` at `t` (unclamped).
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Timing of a single delayed, linear transition.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    delay: Duration,
    duration: Duration,
}

impl Tween {
    /// Create a tween with the given duration and no delay.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            delay: Duration::ZERO,
            duration,
        }
    }

    /// Set the start delay (builder).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Configured start delay.
    #[must_use]
    pub fn start_delay(&self) -> Duration {
        self.delay
    }

    /// Configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Total time from scheduling to completion (`delay + duration`).
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }

    /// Progress at `elapsed`, in [0.0, 1.0].
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if elapsed <= self.delay {
            return 0.0;
        }
        let running = elapsed - self.delay;
        if self.duration.is_zero() || running >= self.duration {
            return 1.0;
        }
        (running.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Whether the tween has finished at `elapsed`.
    #[must_use]
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.total()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
