// Author: Jacques Murray

use crate::error::{FailureKind, TransportFailure};
use thiserror::Error;

/// A raw failure of one call to the chat backend.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The HTTP layer failed (connect, timeout, body transfer, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an unsuccessful status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The response body was not the expected JSON.
    #[error("Data format unexpected: {0}")]
    Decode(#[from] serde_json::Error),

    /// A configured URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl TransportFailure for ChatError {
    fn kind(&self) -> FailureKind {
        match self {
            ChatError::Http(e) => TransportFailure::kind(e),
            ChatError::Status { status, .. } => FailureKind::Response(*status),
            ChatError::Decode(_) | ChatError::Url(_) => FailureKind::Local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_should_retry;

    #[test]
    fn test_status_kind() {
        let e = ChatError::Status {
            status: 503,
            url: "http://localhost/chat/".into(),
        };
        assert_eq!(e.kind(), FailureKind::Response(503));
        assert!(default_should_retry(&e));
    }

    #[test]
    fn test_local_failures_are_permanent() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = ChatError::from(decode);
        assert_eq!(e.kind(), FailureKind::Local);
        assert!(!default_should_retry(&e));

        let e = ChatError::from(url::Url::parse("not a url").unwrap_err());
        assert_eq!(e.kind(), FailureKind::Local);
    }
}
