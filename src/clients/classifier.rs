//! Maps HTTP outcomes to [`NetworkRequestError`].
//!
//! Status codes in `[200, 300)` are successful. Anything else is classified
//! before the body is decoded; the error body is only inspected for non-2xx
//! responses, and only to enrich the variants that carry a message.

use serde::Deserialize;

use crate::clients::errors::NetworkRequestError;

/// Structured error body returned by the backend.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_message: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_message.or(self.message)
    }
}

/// Returns `true` if `status` lies in `[200, 300)`.
#[must_use]
pub const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}

/// Classifies a completed HTTP response.
///
/// # Errors
///
/// Returns the [`NetworkRequestError`] matching `status` when it is outside
/// `[200, 300)`.
///
/// | Status | Error |
/// |---|---|
/// | 400 | `BadRequest(message?)` |
/// | 401 | `Unauthorized` |
/// | 403 | `Forbidden(message?)` |
/// | 404 | `NotFound` |
/// | 402, 405-499 | `Error4xx(status)` |
/// | 500 | `ServerError(message?)` |
/// | 501-599 | `Error5xx(status)` |
/// | other | `UnknownError` |
///
/// # Example
///
/// ```rust
/// use request_pipeline::clients::classify_status;
/// use request_pipeline::NetworkRequestError;
///
/// assert!(classify_status(204, b"").is_ok());
///
/// let error = classify_status(403, br#"{"errorMessage":"blocked"}"#).unwrap_err();
/// assert!(matches!(error, NetworkRequestError::Forbidden(Some(m)) if m == "blocked"));
/// ```
pub fn classify_status(status: u16, body: &[u8]) -> Result<(), NetworkRequestError> {
    if is_success(status) {
        return Ok(());
    }

    Err(match status {
        400 => NetworkRequestError::BadRequest(error_message(body)),
        401 => NetworkRequestError::Unauthorized,
        403 => NetworkRequestError::Forbidden(error_message(body)),
        404 => NetworkRequestError::NotFound,
        402 | 405..=499 => NetworkRequestError::Error4xx(status),
        500 => NetworkRequestError::ServerError(error_message(body)),
        501..=599 => NetworkRequestError::Error5xx(status),
        _ => NetworkRequestError::UnknownError,
    })
}

/// Extracts a human-readable message from an error body.
///
/// Falls back to `None` when the body is empty, not JSON, or has no message field.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::TransportError;

    #[test]
    fn test_success_range() {
        for status in [200, 201, 204, 299] {
            assert!(classify_status(status, b"not json").is_ok(), "{status}");
        }
        assert!(classify_status(199, b"").is_err());
        assert!(classify_status(300, b"").is_err());
    }

    #[test]
    fn test_status_table_is_exact() {
        assert!(matches!(classify_status(400, b""), Err(NetworkRequestError::BadRequest(None))));
        assert!(matches!(classify_status(401, b""), Err(NetworkRequestError::Unauthorized)));
        assert!(matches!(classify_status(403, b""), Err(NetworkRequestError::Forbidden(None))));
        assert!(matches!(classify_status(404, b""), Err(NetworkRequestError::NotFound)));
        assert!(matches!(classify_status(500, b""), Err(NetworkRequestError::ServerError(None))));

        for status in [402, 405, 409, 422, 429, 499] {
            assert!(
                matches!(classify_status(status, b""), Err(NetworkRequestError::Error4xx(s)) if s == status),
                "{status}"
            );
        }
        for status in [501, 502, 503, 599] {
            assert!(
                matches!(classify_status(status, b""), Err(NetworkRequestError::Error5xx(s)) if s == status),
                "{status}"
            );
        }
        for status in [0, 100, 199, 301, 304, 399, 600, 999] {
            assert!(
                matches!(classify_status(status, b""), Err(NetworkRequestError::UnknownError)),
                "{status}"
            );
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        for status in 0..1000u16 {
            let first = classify_status(status, b"{}").err().map(|e| e.to_string());
            let second = classify_status(status, b"{}").err().map(|e| e.to_string());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_error_body_enriches_message_variants() {
        let body = br#"{"errorMessage":"blocked"}"#;
        assert!(matches!(
            classify_status(403, body),
            Err(NetworkRequestError::Forbidden(Some(m))) if m == "blocked"
        ));
        assert!(matches!(
            classify_status(400, body),
            Err(NetworkRequestError::BadRequest(Some(m))) if m == "blocked"
        ));
        assert!(matches!(
            classify_status(500, body),
            Err(NetworkRequestError::ServerError(Some(m))) if m == "blocked"
        ));
    }

    #[test]
    fn test_message_field_is_accepted_as_fallback() {
        let body = br#"{"message":"quantity must be positive","code":"E42"}"#;
        assert!(matches!(
            classify_status(400, body),
            Err(NetworkRequestError::BadRequest(Some(m))) if m == "quantity must be positive"
        ));
    }

    #[test]
    fn test_unparsable_error_body_falls_back_to_bare_classification() {
        assert!(matches!(
            classify_status(403, b"<html>Forbidden</html>"),
            Err(NetworkRequestError::Forbidden(None))
        ));
        assert!(matches!(
            classify_status(400, br#"{"errorMessage":""}"#),
            Err(NetworkRequestError::BadRequest(None))
        ));
    }

    #[test]
    fn test_transport_and_decoding_failures_are_distinct_from_status_failures() {
        let transport: NetworkRequestError = TransportError::Timeout("30s".to_string()).into();
        let decoding: NetworkRequestError =
            serde_json::from_slice::<u8>(b"{").unwrap_err().into();

        assert!(matches!(transport, NetworkRequestError::TransportFailed(_)));
        assert!(matches!(decoding, NetworkRequestError::DecodingError(_)));
        assert_eq!(transport.status_code(), None);
        assert_eq!(decoding.status_code(), None);
    }
}
