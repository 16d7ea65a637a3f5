//! Error types for the HTTPS JSON client.
//!
//! # Design
//! Every failure is returned to the caller. Variants are grouped by where
//! the call broke: before any I/O (`InvalidUrl`, `InvalidParameters`,
//! `Config`), on the wire (`Timeout`, `Network`, `Protocol`), in the server's
//! answer (`NotFound`, `Status`), or while decoding the body (`Decode`).
//! `NotFound` gets its own variant because callers routinely branch on it.

use thiserror::Error;

/// Errors returned by `HttpsClient` and its transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The target URL is malformed, relative without a base URL, or uses a
    /// scheme the client refuses.
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Raw parameter text is not a JSON object, or parameters failed to
    /// serialize.
    #[error("invalid request parameters: {0}")]
    InvalidParameters(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration {key}: {reason}")]
    Config { key: String, reason: String },

    /// The connect or read timeout elapsed.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS, connect, TLS, or socket I/O failure.
    #[error("network failure: {0}")]
    Network(String),

    /// The server's answer was not valid HTTP.
    #[error("protocol failure: {0}")]
    Protocol(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Decode(String),
}

impl ClientError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        ClientError::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the failure happened on the wire rather than in the request
    /// or the server's answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_) | ClientError::Network(_) | ClientError::Protocol(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_code_and_body() {
        let err = ClientError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn transport_classification() {
        assert!(ClientError::Timeout("connect".into()).is_transport());
        assert!(ClientError::Network("reset".into()).is_transport());
        assert!(!ClientError::NotFound.is_transport());
        assert!(!ClientError::Decode("eof".into()).is_transport());
    }
}
