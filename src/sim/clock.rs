//! Periodic countdown clock
//!
//! The session owns two of these (world and bullet) and steps both with the
//! same frame time. Progress through the current period is derived from the
//! time accumulated since the last firing, never stored separately.

use serde::{Deserialize, Serialize};

/// Firing threshold slack for accumulated float time
const DUE_EPSILON_MS: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicClock {
    period_ms: f32,
    since_fire_ms: f32,
}

impl PeriodicClock {
    pub fn new(period_ms: f32) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            since_fire_ms: 0.0,
        }
    }

    pub fn period_ms(&self) -> f32 {
        self.period_ms
    }

    /// Time accumulated since the last firing
    pub fn since_fire_ms(&self) -> f32 {
        self.since_fire_ms
    }

    /// Fraction of the current period elapsed, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        (self.since_fire_ms / self.period_ms).clamp(0.0, 1.0)
    }

    /// Milliseconds until the next firing (0 when due)
    pub fn time_to_next(&self) -> f32 {
        (self.period_ms - self.since_fire_ms).max(0.0)
    }

    pub fn is_due(&self) -> bool {
        self.since_fire_ms + DUE_EPSILON_MS >= self.period_ms
    }

    /// Accumulate `dt_ms` without firing
    pub fn elapse(&mut self, dt_ms: f32) {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.since_fire_ms += dt_ms;
        }
    }

    /// Consume one period. Returns false if the clock was not due.
    pub fn fire(&mut self) -> bool {
        if !self.is_due() {
            return false;
        }
        self.since_fire_ms = (self.since_fire_ms - self.period_ms).max(0.0);
        true
    }

    /// Change the period; applies from the current firing onward
    pub fn set_period(&mut self, period_ms: f32) {
        if period_ms.is_finite() {
            self.period_ms = period_ms.max(1.0);
        }
    }
}
