// Author: Jacques Murray

//! Retry configuration and the default transport retry rule.

use crate::backoff::ExponentialBackoff;
use crate::error::{FailureKind, TransportFailure};
use std::time::Duration;

/// Default total number of attempts, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default unscaled backoff unit.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Default upper clamp on any single delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

/// Retry on no response, on any 5xx, and on 429. Every other status and
/// every local failure is permanent.
pub fn default_should_retry<E: TransportFailure>(error: &E) -> bool {
    match error.kind() {
        FailureKind::NoResponse => true,
        FailureKind::Response(status) => status >= 500 || status == 429,
        FailureKind::Local => false,
    }
}

/// How many times, and how patiently, an operation is retried.
///
/// `should_retry` is the strategy deciding whether a failure is worth
/// another attempt; any `FnMut(&E) -> bool` works, so alternate policies
/// can be plugged in without touching the engine.
///
/// `max_attempts` counts the first attempt too and must be at least 1;
/// the engine treats 0 as 1. `max_delay` is expected to be at least
/// `base_delay` but this is not checked.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig<C> {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub should_retry: C,
}

impl<C> RetryConfig<C> {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration, should_retry: C) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
            should_retry,
        }
    }

    /// Replaces the retry predicate, keeping the timing settings.
    pub fn with_should_retry<N>(self, should_retry: N) -> RetryConfig<N> {
        RetryConfig {
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            should_retry,
        }
    }

    /// The delay schedule for one retry sequence.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(self.base_delay, self.max_delay)
    }
}

/// 3 attempts, 1s base delay, 10s max delay, [`default_should_retry`].
impl<E: TransportFailure> Default for RetryConfig<fn(&E) -> bool> {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_BASE_DELAY,
            DEFAULT_MAX_DELAY,
            default_should_retry::<E>,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Failure(FailureKind);

    impl fmt::Display for Failure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    impl std::error::Error for Failure {}

    impl TransportFailure for Failure {
        fn kind(&self) -> FailureKind {
            self.0
        }
    }

    #[test]
    fn test_default_values() {
        let config: RetryConfig<fn(&Failure) -> bool> = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay, Duration::from_millis(1000));
        assert_eq!(config.max_delay, Duration::from_millis(10_000));
    }

    #[test]
    fn test_default_predicate() {
        let retryable = |kind| default_should_retry(&Failure(kind));

        assert!(retryable(FailureKind::NoResponse));
        assert!(retryable(FailureKind::Response(429)));
        for status in [500, 502, 503, 504, 599] {
            assert!(retryable(FailureKind::Response(status)), "{status} should retry");
        }

        assert!(!retryable(FailureKind::Local));
        for status in [400, 401, 403, 404, 409, 422, 499] {
            assert!(!retryable(FailureKind::Response(status)), "{status} should not retry");
        }
    }

    #[test]
    fn test_with_should_retry_keeps_timing() {
        let config = RetryConfig::new(5, Duration::from_millis(10), Duration::from_millis(80), ())
            .with_should_retry(|_: &Failure| false);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.base_delay, Duration::from_millis(10));
        assert_eq!(config.max_delay, Duration::from_millis(80));
        assert!(!(config.should_retry)(&Failure(FailureKind::NoResponse)));
    }
}
