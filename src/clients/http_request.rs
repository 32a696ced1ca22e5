//! Request types for the pipeline.
//!
//! This module provides [`NetworkRequest`] and its builder, plus the small
//! enums that describe how a request is sent.

use std::fmt;

use serde::Serialize;

use crate::clients::endpoint::Endpoint;
use crate::clients::headers::HttpHeaders;

/// HTTP methods supported by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a request carries the bearer token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Attach the access token when one is stored. An unauthorized response
    /// triggers refresh-and-replay.
    #[default]
    Mandatory,
    /// Never attach the token and never refresh. Used by the refresh call itself.
    Skip,
}

impl AuthMode {
    /// Returns `true` for [`AuthMode::Mandatory`].
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        matches!(self, Self::Mandatory)
    }
}

/// A JSON request payload.
///
/// For GET requests the payload is not sent as a body: its top-level fields
/// are form-url-encoded into the query string instead.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpBody(serde_json::Value);

impl HttpBody {
    /// Serializes `value` into a body.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self)
    }

    /// Returns the payload as a JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Returns the raw JSON bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }

    /// Returns the payload as `key=value` pairs for a query string.
    ///
    /// Objects contribute one pair per non-null field, with strings taken
    /// verbatim and other values in their JSON form. Anything that is not an
    /// object yields no pairs.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let Some(object) = self.0.as_object() else {
            return Vec::new();
        };
        object
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let value = match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect()
    }
}

impl From<serde_json::Value> for HttpBody {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// One logical call: method, endpoint, optional body and headers, auth mode.
///
/// A request is immutable once built and can be executed any number of times;
/// replays after a token refresh re-send it unchanged apart from the
/// `Authorization` header.
///
/// # Example
///
/// ```rust
/// use request_pipeline::{AuthMode, Endpoint, HttpMethod, NetworkRequest};
/// use serde_json::json;
///
/// let request = NetworkRequest::builder(HttpMethod::Post, Endpoint::new("cart/items").unwrap())
///     .body(json!({"sku": "A-1", "quantity": 2}))
///     .header("X-Idempotency-Key", "k-1")
///     .build();
///
/// assert_eq!(request.auth_mode, AuthMode::Mandatory);
/// assert!(request.body.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct NetworkRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The endpoint descriptor.
    pub endpoint: Endpoint,
    /// The payload, if any.
    pub body: Option<HttpBody>,
    /// Query parameters appended to the URL, in order.
    pub query: Vec<(String, String)>,
    /// Caller-supplied headers merged over the composed defaults.
    pub extra_headers: Option<HttpHeaders>,
    /// Whether the access token is attached.
    pub auth_mode: AuthMode,
}

impl NetworkRequest {
    /// Creates a new builder for constructing a `NetworkRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, endpoint: Endpoint) -> NetworkRequestBuilder {
        NetworkRequestBuilder::new(method, endpoint)
    }

    /// Returns every query pair for this request: explicit parameters first,
    /// then the body's fields for GET requests.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.query.clone();
        if self.method == HttpMethod::Get {
            if let Some(body) = &self.body {
                pairs.extend(body.to_query_pairs());
            }
        }
        pairs
    }

    /// Returns the bytes to send as the request body.
    ///
    /// GET requests never carry a body.
    #[must_use]
    pub fn body_bytes(&self) -> Option<Vec<u8>> {
        if self.method == HttpMethod::Get {
            return None;
        }
        self.body.as_ref().map(HttpBody::to_bytes)
    }
}

/// Builder for constructing [`NetworkRequest`] instances.
#[derive(Debug)]
pub struct NetworkRequestBuilder {
    method: HttpMethod,
    endpoint: Endpoint,
    body: Option<HttpBody>,
    query: Vec<(String, String)>,
    extra_headers: Option<HttpHeaders>,
    auth_mode: AuthMode,
}

impl NetworkRequestBuilder {
    fn new(method: HttpMethod, endpoint: Endpoint) -> Self {
        Self {
            method,
            endpoint,
            body: None,
            query: Vec::new(),
            extra_headers: None,
            auth_mode: AuthMode::default(),
        }
    }

    /// Sets the request payload.
    #[must_use]
    pub fn body(mut self, body: impl Into<HttpBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets all extra headers at once.
    #[must_use]
    pub fn extra_headers(mut self, headers: HttpHeaders) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Adds a single extra header. The first value for a name wins.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HttpHeaders::new)
            .insert_if_absent(key, value);
        self
    }

    /// Sets the auth mode (default [`AuthMode::Mandatory`]).
    #[must_use]
    pub const fn auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    /// Builds the [`NetworkRequest`].
    #[must_use]
    pub fn build(self) -> NetworkRequest {
        NetworkRequest {
            method: self.method,
            endpoint: self.endpoint,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
            auth_mode: self.auth_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint() -> Endpoint {
        Endpoint::new("products").unwrap()
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_auth_mode_defaults_to_mandatory() {
        assert_eq!(AuthMode::default(), AuthMode::Mandatory);
        assert!(AuthMode::Mandatory.is_mandatory());
        assert!(!AuthMode::Skip.is_mandatory());
    }

    #[test]
    fn test_builder_defaults() {
        let request = NetworkRequest::builder(HttpMethod::Get, endpoint()).build();

        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
        assert!(request.extra_headers.is_none());
        assert_eq!(request.auth_mode, AuthMode::Mandatory);
    }

    #[test]
    fn test_builder_header_is_first_wins() {
        let request = NetworkRequest::builder(HttpMethod::Get, endpoint())
            .header("X-Custom", "one")
            .header("x-custom", "two")
            .build();

        let headers = request.extra_headers.unwrap();
        assert_eq!(headers.get("X-Custom"), Some("one"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_post_body_is_sent_as_json_bytes() {
        let request = NetworkRequest::builder(HttpMethod::Post, endpoint())
            .body(json!({"title": "Lamp"}))
            .build();

        assert_eq!(request.body_bytes(), Some(br#"{"title":"Lamp"}"#.to_vec()));
        assert!(request.query_pairs().is_empty());
    }

    #[test]
    fn test_get_body_moves_into_query() {
        let request = NetworkRequest::builder(HttpMethod::Get, endpoint())
            .query_param("page", "2")
            .body(json!({"search": "red lamp", "limit": 20, "cursor": null}))
            .build();

        assert!(request.body_bytes().is_none());
        let pairs = request.query_pairs();
        assert_eq!(pairs[0], ("page".to_string(), "2".to_string()));
        assert!(pairs.contains(&("search".to_string(), "red lamp".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "20".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "cursor"));
    }

    #[test]
    fn test_non_object_body_has_no_query_pairs() {
        let body = HttpBody::from(json!([1, 2, 3]));
        assert!(body.to_query_pairs().is_empty());
    }

    #[test]
    fn test_body_from_serializable() {
        #[derive(Serialize)]
        struct NewItem<'a> {
            sku: &'a str,
        }

        let body = HttpBody::json(&NewItem { sku: "A-1" }).unwrap();
        assert_eq!(body.as_value(), &json!({"sku": "A-1"}));
    }
}
