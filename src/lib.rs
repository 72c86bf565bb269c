// Author: Jacques Murray

//! # chat-retry
//!
//! A resilient client for a question-answering chat backend.
//!
//! ## Goals
//!
//! * Retry transient failures of any `async` operation with exponential
//!   backoff and jitter ([`Retry`], [`RetryConfig`]).
//! * Decide retryability from the raw failure ([`default_should_retry`]).
//! * Turn terminal failures into one display-ready error type
//!   ([`classify`], [`ClassifiedError`], [`user_message`]).
//! * Talk to the chat backend over HTTP ([`ChatClient`]).
//!
//! **Note:** a timer feature is required. `tokio-timer` is on by default;
//! use `default-features = false, features = ["async-std-timer"]` for
//! async-std.
//!
//! ### Example: Asking the backend
//!
//! ```rust,no_run
//! use chat_retry::ChatClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chat_retry::ChatError> {
//!     let client = ChatClient::builder().build()?;
//!
//!     match client.ask("What languages are supported?", &[]).await {
//!         Ok(response) => println!("{}", response.answer),
//!         Err(e) => println!("{}", e.user_message()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Example: Retrying any operation
//!
//! ```rust,no_run
//! use chat_retry::{Retry, RetryConfig};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     Transient,
//!     Permanent,
//! }
//!
//! async fn fetch() -> Result<String, MyError> {
//!     Err(MyError::Transient)
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RetryConfig::new(
//!         4,
//!         Duration::from_millis(200),
//!         Duration::from_secs(2),
//!         |e: &MyError| matches!(e, MyError::Transient),
//!     );
//!
//!     let result = Retry::new(config, || fetch()).await;
//!
//!     if let Err(MyError::Permanent) = result {
//!         println!("Failed immediately.");
//!     }
//! }
//! ```

// Public modules
pub mod backoff;
pub mod client;
pub mod config;
pub mod error;
pub mod messages;
mod sleep;

// Public re-exports for easier use
pub use backoff::ExponentialBackoff;
pub use client::{
    ChatClient, ChatClientBuilder, ChatError, ChatMessage, ChatRequest, ChatResponse,
    ChatRetryConfig, HealthResponse, RetrievedChunk, Role,
};
pub use config::{
    default_should_retry, RetryConfig, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_DELAY,
};
pub use error::{classify, user_message, ClassifiedError, FailureKind, TransportFailure};

use std::future::Future;
use std::future::IntoFuture;
use std::pin::Pin;

/// A retryable operation paired with its [`RetryConfig`].
///
/// Created by [`Retry::new()`] or [`Retry::with_defaults()`]. Await it
/// directly when everything it holds is `Send + 'static`; otherwise call
/// [`Retry::run()`], which borrows freely.
///
/// On success the value is returned unchanged. On failure the raw error
/// is returned verbatim, either because `should_retry` rejected it or
/// because it happened on the last allowed attempt.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Retry<O, C> {
    config: RetryConfig<C>,
    operation: O,
}

impl<O, C> Retry<O, C> {
    /// Creates a new `Retry` instance.
    ///
    /// - `config`: attempt budget, delays and retry predicate.
    /// - `operation`: A closure that returns a `Future` (e.g., `|| async { ... }`).
    pub fn new(config: RetryConfig<C>, operation: O) -> Self {
        Self { config, operation }
    }

    /// Swaps the retry predicate, keeping the attempt budget and delays.
    pub fn with_condition<NewC, E>(self, condition: NewC) -> Retry<O, NewC>
    where
        NewC: FnMut(&E) -> bool,
    {
        Retry {
            config: self.config.with_should_retry(condition),
            operation: self.operation,
        }
    }

    /// Runs the attempt loop.
    ///
    /// `Attempting(i)` ends in success, in failure (predicate rejected the
    /// error, or `i` is the last attempt), or in a backoff wait followed by
    /// `Attempting(i + 1)`.
    pub async fn run<F, T, E>(mut self) -> Result<T, E>
    where
        O: FnMut() -> F,
        C: FnMut(&E) -> bool,
        F: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut backoff = self.config.backoff();
        let mut attempt = 0;

        loop {
            match (self.operation)().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let retryable = (self.config.should_retry)(&e);
                    let is_last_attempt = attempt + 1 >= max_attempts;
                    if !retryable || is_last_attempt {
                        return Err(e);
                    }
                }
            }

            // The schedule is unbounded; the attempt budget stops the loop.
            let delay = backoff.next().unwrap_or(self.config.max_delay);
            sleep::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl<O, E> Retry<O, fn(&E) -> bool>
where
    E: TransportFailure,
{
    /// Creates a `Retry` with [`RetryConfig::default()`]: 3 attempts, 1s
    /// base delay, 10s cap, [`default_should_retry`].
    pub fn with_defaults<F, T>(operation: O) -> Self
    where
        O: FnMut() -> F,
        F: Future<Output = Result<T, E>>,
    {
        Self::new(RetryConfig::default(), operation)
    }
}

/// Lets a `Retry` be `.await`ed directly.
impl<O, C, F, T, E> IntoFuture for Retry<O, C>
where
    O: FnMut() -> F + Send + 'static,
    C: FnMut(&E) -> bool + Send + 'static,
    F: Future<Output = Result<T, E>> + Send + 'static,
    E: Send + 'static,
    T: Send + 'static,
{
    type Output = Result<T, E>;

    // We box the future to avoid complex type signatures in the return.
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send + 'static>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.run())
    }
}

#[cfg(all(test, feature = "tokio-timer"))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct TestError(String);

    fn quick(max_attempts: u32) -> RetryConfig<fn(&TestError) -> bool> {
        fn always(_: &TestError) -> bool {
            true
        }
        RetryConfig::new(
            max_attempts,
            Duration::from_millis(1),
            Duration::from_millis(5),
            always as fn(&TestError) -> bool,
        )
    }

    #[tokio::test]
    async fn test_simple_retry() {
        let result = Retry::new(quick(3), || async { Ok::<u32, TestError>(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = Retry::new(quick(0), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError("down".into()))
            }
        })
        .await;

        assert_eq!(result, Err(TestError("down".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_borrows_local_state() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = Retry::new(quick(4), move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(TestError(format!("attempt {n}")))
            } else {
                Ok(n)
            }
        })
        .run()
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
