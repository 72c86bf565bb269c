// Author: Jacques Murray

//! The exponential backoff schedule.
//!
//! A schedule is simply an `Iterator` that yields `Duration`s. The retry
//! engine pulls one delay after every failed attempt it decides to retry,
//! so the n-th yielded value is the wait between attempt n and n + 1.

use rand::Rng;
use std::time::Duration;

/// Upper bound of the random jitter, as a share of the unjittered delay.
pub const JITTER_RATIO: f64 = 0.3;

/// Exponential backoff with up to 30% positive jitter, clamped to a maximum.
///
/// The delay after attempt `i` (0-indexed) is
/// `min(base * 2^i + jitter, max_delay)` where `jitter` is drawn uniformly
/// from `[0, 0.3 * base * 2^i)`.
///
/// Example with a 1s base and no jitter: 1s, 2s, 4s, 8s, ...
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    base: Duration,
    max_delay: Duration,
    attempt: u32,
}

impl ExponentialBackoff {
    /// Creates a new `ExponentialBackoff` schedule.
    ///
    /// `max_delay` is expected to be at least `base_delay`; a smaller value
    /// simply caps every delay at `max_delay`.
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base: base_delay,
            max_delay,
            attempt: 0,
        }
    }

    /// The unjittered, unclamped delay `base * 2^attempt`. Saturates.
    pub fn exponential(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor)
    }

    /// Computes the delay after `attempt` for a given jitter draw.
    ///
    /// `fraction` is the uniform draw in `[0, 1)`; it is scaled to the
    /// `[0, JITTER_RATIO)` band. Out-of-range or non-finite draws are
    /// pulled back into `[0, 1]`.
    pub fn delay_with_jitter(&self, attempt: u32, fraction: f64) -> Duration {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let exponential = self.exponential(attempt);
        let jitter = exponential.mul_f64(JITTER_RATIO * fraction);
        exponential.saturating_add(jitter).min(self.max_delay)
    }

    /// Computes the delay after `attempt` with a fresh random jitter draw.
    pub fn delay(&self, attempt: u32) -> Duration {
        let fraction: f64 = rand::thread_rng().gen();
        self.delay_with_jitter(attempt, fraction)
    }
}

impl Iterator for ExponentialBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        let delay = self.delay(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(delay)
    }
}
