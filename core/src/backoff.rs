//! Backoff window policy
//!
//! The window after the threshold is reached doubles with every further
//! failure: deficit 0 waits one base window, deficit 1 two, deficit 2 four.

use std::time::Duration;

/// Exponential backoff keyed to the failure deficit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    /// Window for deficit 0
    pub base: Duration,
    /// Optional upper bound on any single window (uncapped when `None`)
    pub max: Option<Duration>,
    /// Jitter factor (0.0 = exact windows, 1.0 = full jitter)
    pub jitter_factor: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            max: None,
            jitter_factor: 0.0,
        }
    }
}

impl Backoff {
    /// Window length `base * 2^deficit`, saturating instead of overflowing
    pub fn window(&self, deficit: u32) -> Duration {
        let factor = 1u32.checked_shl(deficit).unwrap_or(0);
        let exact = if factor == 0 {
            Duration::MAX
        } else {
            self.base.saturating_mul(factor)
        };

        let capped = match self.max {
            Some(max) => exact.min(max),
            None => exact,
        };

        if self.jitter_factor > 0.0 {
            self.jittered(capped)
        } else {
            capped
        }
    }

    // chrono-machines formula: window * (1 - jitter + rand * jitter)
    fn jittered(&self, window: Duration) -> Duration {
        let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        let policy = chrono_machines::Policy {
            max_attempts: 1,
            base_delay_ms: window_ms,
            multiplier: 1.0,
            max_delay_ms: window_ms,
        };
        let delay_ms = policy.calculate_delay(1, self.jitter_factor);
        Duration::from_millis(delay_ms as u64)
    }
}
