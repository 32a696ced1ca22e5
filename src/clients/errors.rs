//! Error types returned by the request pipeline.
//!
//! [`NetworkRequestError`] is the closed taxonomy every call to
//! [`crate::RequestOrchestrator::execute`] resolves to on failure. It keeps three
//! kinds of failure apart so callers can tell them apart:
//!
//! - the server answered with a non-2xx status (`BadRequest` .. `UnknownError`)
//! - the bytes could not be parsed (`DecodingError`)
//! - the server could not be reached (`TransportFailed`)
//!
//! # Example
//!
//! ```rust,ignore
//! use request_pipeline::NetworkRequestError;
//!
//! match orchestrator.execute::<Order>(&request).await {
//!     Ok(order) => println!("Order {}", order.id),
//!     Err(NetworkRequestError::Forbidden(Some(message))) => println!("Blocked: {message}"),
//!     Err(NetworkRequestError::TransportFailed(e)) => println!("Offline: {e}"),
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use std::sync::Arc;

use thiserror::Error;

/// Failure reported by a [`crate::Transport`] before any HTTP status was received.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The transport gave up waiting for a response.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The request was cancelled before it completed.
    #[error("Request was cancelled")]
    Cancelled,

    /// Any other failure while sending or receiving.
    #[error("Transport error: {0}")]
    Other(String),
}

/// The closed set of failures a pipeline call can end with.
///
/// The type is `Clone` so the outcome of one shared token refresh can be
/// handed to every call waiting on it.
#[derive(Debug, Error, Clone)]
pub enum NetworkRequestError {
    /// 400, with the server's message when the error body could be parsed.
    #[error("Bad request{}", display_message(.0))]
    BadRequest(Option<String>),

    /// 401.
    #[error("Unauthorized")]
    Unauthorized,

    /// 403, with the server's message when the error body could be parsed.
    #[error("Forbidden{}", display_message(.0))]
    Forbidden(Option<String>),

    /// 404.
    #[error("Not found")]
    NotFound,

    /// 402 or 405-499.
    #[error("Client error with status {0}")]
    Error4xx(u16),

    /// 500, with the server's message when the error body could be parsed.
    #[error("Server error{}", display_message(.0))]
    ServerError(Option<String>),

    /// 501-599.
    #[error("Server error with status {0}")]
    Error5xx(u16),

    /// Any other non-2xx status.
    #[error("Unknown error")]
    UnknownError,

    /// A successful response body could not be decoded into the target type.
    #[error("Decoding error: {0}")]
    DecodingError(#[source] Arc<serde_json::Error>),

    /// The request never produced an HTTP response.
    #[error(transparent)]
    TransportFailed(#[from] TransportError),
}

fn display_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map_or_else(String::new, |m| format!(": {m}"))
}

impl NetworkRequestError {
    /// Returns `true` for [`NetworkRequestError::Unauthorized`].
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the HTTP status this error was classified from, when known.
    ///
    /// `UnknownError` carries no status, and decoding or transport failures
    /// never had a failing one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound => Some(404),
            Self::ServerError(_) => Some(500),
            Self::Error4xx(code) | Self::Error5xx(code) => Some(*code),
            Self::UnknownError | Self::DecodingError(_) | Self::TransportFailed(_) => None,
        }
    }

    /// Returns the human-readable message parsed from the error body, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::BadRequest(message) | Self::Forbidden(message) | Self::ServerError(message) => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for NetworkRequestError {
    fn from(error: serde_json::Error) -> Self {
        Self::DecodingError(Arc::new(error))
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NetworkRequestError>();
    assert_send_sync::<TransportError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_included_in_display() {
        let error = NetworkRequestError::Forbidden(Some("blocked".to_string()));
        assert_eq!(error.to_string(), "Forbidden: blocked");

        let error = NetworkRequestError::Forbidden(None);
        assert_eq!(error.to_string(), "Forbidden");

        let error = NetworkRequestError::ServerError(Some("db down".to_string()));
        assert_eq!(error.to_string(), "Server error: db down");
    }

    #[test]
    fn test_status_code_for_each_http_variant() {
        assert_eq!(NetworkRequestError::BadRequest(None).status_code(), Some(400));
        assert_eq!(NetworkRequestError::Unauthorized.status_code(), Some(401));
        assert_eq!(NetworkRequestError::Error4xx(418).status_code(), Some(418));
        assert_eq!(NetworkRequestError::Error5xx(503).status_code(), Some(503));
        assert_eq!(NetworkRequestError::UnknownError.status_code(), None);
        assert_eq!(
            NetworkRequestError::TransportFailed(TransportError::Cancelled).status_code(),
            None
        );
    }

    #[test]
    fn test_message_accessor() {
        let error = NetworkRequestError::BadRequest(Some("missing sku".to_string()));
        assert_eq!(error.message(), Some("missing sku"));
        assert_eq!(NetworkRequestError::NotFound.message(), None);
    }

    #[test]
    fn test_decoding_error_keeps_source() {
        let parse_error = serde_json::from_str::<u32>("\"seven\"").unwrap_err();
        let error = NetworkRequestError::from(parse_error);

        assert!(matches!(error, NetworkRequestError::DecodingError(_)));
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().starts_with("Decoding error:"));
    }

    #[test]
    fn test_transport_error_converts_and_displays_transparently() {
        let error: NetworkRequestError = TransportError::Connect("refused".to_string()).into();
        assert_eq!(error.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_clone_preserves_variant() {
        let error = NetworkRequestError::Error4xx(429);
        let cloned = error.clone();
        assert!(matches!(cloned, NetworkRequestError::Error4xx(429)));
    }
}
