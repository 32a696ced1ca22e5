//! Decodes successful response bodies into typed values.
//!
//! The envelope shape is taken from the [`Endpoint`] before parsing starts.
//! A wrapped body is never retried as a bare one (or the reverse), so a
//! malformed body always surfaces as [`NetworkRequestError::DecodingError`].

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::clients::endpoint::{Endpoint, EnvelopeShape};
use crate::clients::errors::NetworkRequestError;

/// The wrapped response shape: `{ "result": T, ...metadata }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// The payload.
    pub result: T,
    /// Every other top-level field of the envelope.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Decodes `body` into `T` using the envelope shape of `endpoint`.
///
/// An empty (or whitespace-only) body is read as JSON `null`, so targets such
/// as `()` or `Option<T>` accept bodiless responses on bare endpoints.
///
/// # Errors
///
/// Returns [`NetworkRequestError::DecodingError`] if the body does not match
/// the expected shape.
///
/// # Example
///
/// ```rust
/// use request_pipeline::clients::decode_response;
/// use request_pipeline::{ApiVersion, Endpoint};
///
/// let v1 = Endpoint::new("orders/7").unwrap();
/// let id: u32 = decode_response(br#"{"result": 7, "requestId": "abc"}"#, &v1).unwrap();
/// assert_eq!(id, 7);
///
/// let v2 = Endpoint::new("orders/7").unwrap().with_version(ApiVersion::V2);
/// let id: u32 = decode_response(b"7", &v2).unwrap();
/// assert_eq!(id, 7);
/// ```
pub fn decode_response<T>(body: &[u8], endpoint: &Endpoint) -> Result<T, NetworkRequestError>
where
    T: DeserializeOwned,
{
    let body = non_empty_or_null(body);

    match endpoint.envelope_shape() {
        EnvelopeShape::Bare => Ok(serde_json::from_slice::<T>(body)?),
        EnvelopeShape::Wrapped => {
            let envelope = serde_json::from_slice::<ResponseEnvelope<T>>(body)?;
            Ok(envelope.result)
        }
    }
}

fn non_empty_or_null(body: &[u8]) -> &[u8] {
    if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    }
}
