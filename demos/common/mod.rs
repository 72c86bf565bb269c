// Author: Jacques Murray
//
// Shared helpers for the demos.

#![allow(dead_code)]

use chat_retry::{default_should_retry, ChatError, FailureKind, TransportFailure};

/// A stricter-than-default policy for the conditional demo.
///
/// Keeps the default transport rule and also retries 408 Request Timeout,
/// which some proxies in front of the backend return under load.
pub fn retry_including_request_timeout(e: &ChatError) -> bool {
    e.kind() == FailureKind::Response(408) || default_should_retry(e)
}

/// Base URL from the first CLI argument, else the environment/default.
pub fn base_url_arg() -> Option<url::Url> {
    std::env::args().nth(1).and_then(|raw| url::Url::parse(&raw).ok())
}
