// Author: Jacques Murray

//! Failure shapes and the classifier that turns a terminal failure into a
//! [`ClassifiedError`].
//!
//! Retry decisions never look at a [`ClassifiedError`]; they inspect the raw
//! failure through [`TransportFailure::kind`]. Classification happens once,
//! where the outcome is about to be shown.

use crate::messages;
use std::borrow::Cow;
use std::error::Error;
use thiserror::Error;

/// What is known about how a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A response was received with this status code.
    Response(u16),
    /// The request was sent but no response arrived
    /// (timeout, connection reset, DNS failure, refused connection).
    NoResponse,
    /// The failure happened before the request was dispatched, or is an
    /// application-level failure unrelated to transport.
    Local,
}

/// A raw failure that can report its [`FailureKind`].
pub trait TransportFailure: Error {
    fn kind(&self) -> FailureKind;
}

impl TransportFailure for reqwest::Error {
    fn kind(&self) -> FailureKind {
        if let Some(status) = self.status() {
            return FailureKind::Response(status.as_u16());
        }
        if self.is_builder() || self.is_decode() || self.is_redirect() {
            FailureKind::Local
        } else {
            FailureKind::NoResponse
        }
    }
}

/// The uniform, display-ready representation of a failed operation.
///
/// Built exactly once per failed top-level operation by [`classify`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    message: String,
    status_code: Option<u16>,
    #[source]
    cause: Box<dyn Error + Send + Sync + 'static>,
}

impl ClassifiedError {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Present only when the failure came from a received response.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// The original failure, kept for diagnostics.
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Maps this error to the text a user should see.
    ///
    /// 5xx maps to [`messages::SERVER_ERROR`], 429 to
    /// [`messages::RATE_LIMIT`]; anything else shows the classified message.
    pub fn user_message(&self) -> Cow<'_, str> {
        match self.status_code {
            Some(status) if status >= 500 => Cow::Borrowed(messages::SERVER_ERROR),
            Some(429) => Cow::Borrowed(messages::RATE_LIMIT),
            _ => Cow::Borrowed(self.message.as_str()),
        }
    }
}

/// Wraps a raw failure into a [`ClassifiedError`].
///
/// - received response: `"Server error: <status>"` with the status code;
/// - sent without answer: [`messages::CONNECTIVITY_MESSAGE`];
/// - anything else: [`messages::GENERIC_MESSAGE`].
pub fn classify<E>(failure: E) -> ClassifiedError
where
    E: TransportFailure + Send + Sync + 'static,
{
    let (message, status_code) = match failure.kind() {
        FailureKind::Response(status) => (format!("Server error: {status}"), Some(status)),
        FailureKind::NoResponse => (messages::CONNECTIVITY_MESSAGE.to_string(), None),
        FailureKind::Local => (messages::GENERIC_MESSAGE.to_string(), None),
    };
    ClassifiedError {
        message,
        status_code,
        cause: Box::new(failure),
    }
}

/// Maps any error to user-facing text.
///
/// Errors that are not a [`ClassifiedError`] get [`messages::DEFAULT`].
pub fn user_message<'a>(error: &'a (dyn Error + 'static)) -> Cow<'a, str> {
    match error.downcast_ref::<ClassifiedError>() {
        Some(classified) => classified.user_message(),
        None => Cow::Borrowed(messages::DEFAULT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct RawFailure(FailureKind);

    impl fmt::Display for RawFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "raw failure: {:?}", self.0)
        }
    }

    impl Error for RawFailure {}

    impl TransportFailure for RawFailure {
        fn kind(&self) -> FailureKind {
            self.0
        }
    }

    #[test]
    fn test_classify_server_error() {
        let classified = classify(RawFailure(FailureKind::Response(503)));
        assert_eq!(classified.status_code(), Some(503));
        assert_eq!(classified.message(), "Server error: 503");
        assert_eq!(classified.user_message(), messages::SERVER_ERROR);
    }

    #[test]
    fn test_classify_rate_limit() {
        let classified = classify(RawFailure(FailureKind::Response(429)));
        assert_eq!(classified.status_code(), Some(429));
        assert_eq!(classified.user_message(), messages::RATE_LIMIT);
    }

    #[test]
    fn test_client_error_keeps_own_message() {
        for status in [400, 401, 404] {
            let classified = classify(RawFailure(FailureKind::Response(status)));
            let shown = classified.user_message();
            assert_eq!(shown, format!("Server error: {status}"));
            assert_ne!(shown, messages::SERVER_ERROR);
            assert_ne!(shown, messages::RATE_LIMIT);
            assert_ne!(shown, messages::DEFAULT);
        }
    }

    #[test]
    fn test_classify_without_response() {
        let classified = classify(RawFailure(FailureKind::NoResponse));
        assert_eq!(classified.status_code(), None);
        assert_eq!(classified.message(), messages::CONNECTIVITY_MESSAGE);

        let classified = classify(RawFailure(FailureKind::Local));
        assert_eq!(classified.status_code(), None);
        assert_eq!(classified.message(), messages::GENERIC_MESSAGE);
        assert_eq!(classified.user_message(), messages::GENERIC_MESSAGE);
    }

    #[test]
    fn test_cause_is_retained_as_source() {
        let classified = classify(RawFailure(FailureKind::Response(502)));
        let source = classified.source().expect("classified error keeps its cause");
        assert_eq!(source.to_string(), "raw failure: Response(502)");
        assert!(classified.cause().downcast_ref::<RawFailure>().is_some());
    }

    #[test]
    fn test_user_message_for_unrecognized_error() {
        let other = RawFailure(FailureKind::Response(500));
        assert_eq!(user_message(&other), messages::DEFAULT);

        let classified = classify(RawFailure(FailureKind::Response(500)));
        assert_eq!(user_message(&classified), messages::SERVER_ERROR);
    }
}
