// Author: Jacques Murray

//! Runtime-agnostic suspension between retry attempts.
//!
//! The timer comes from whichever runtime feature is enabled
//! (`tokio-timer` by default, or `async-std-timer`). Only the awaiting
//! task is suspended; other in-flight requests keep running.

use std::time::Duration;

/// Suspends the current task for `duration`.
///
/// A zero duration still yields through the runtime timer so that the
/// caller observes a consistent suspension point.
pub(crate) async fn sleep(duration: Duration) {
    cfg_if::cfg_if! {
        if #[cfg(feature = "tokio-timer")] {
            tokio::time::sleep(duration).await;
        } else if #[cfg(feature = "async-std-timer")] {
            async_std::task::sleep(duration).await;
        } else {
            compile_error!("No async timer feature enabled. Please enable 'tokio-timer' or 'async-std-timer'.");
        }
    }
}
