//! The transport seam and its reqwest implementation.
//!
//! The pipeline never talks to the network directly. It hands a fully built
//! [`TransportRequest`] to a [`Transport`] and gets back a status, headers and
//! raw bytes, or a [`TransportError`]. Timeouts and connection handling are the
//! transport's business.

use std::time::Duration;

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::headers::HttpHeaders;
use crate::clients::http_request::HttpMethod;
use crate::config::PipelineConfig;

/// A request ready to go on the wire.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The fully-qualified URL, query string included.
    pub url: String,
    /// Request headers.
    pub headers: HttpHeaders,
    /// Request body bytes.
    pub body: Option<Vec<u8>>,
}

/// A raw response as received from the wire.
#[derive(Clone, Debug)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HttpHeaders,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// Sends HTTP requests.
///
/// Implementations must be cancel-safe in the usual async sense: dropping the
/// returned future abandons the request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was received.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Appends form-url-encoded `pairs` to `url`.
///
/// # Example
///
/// ```rust
/// use request_pipeline::clients::url_with_query;
///
/// let pairs = vec![("q".to_string(), "red lamp".to_string()), ("page".to_string(), "2".to_string())];
/// assert_eq!(url_with_query("https://a.example/v1/search", &pairs), "https://a.example/v1/search?q=red%20lamp&page=2");
/// ```
#[must_use]
pub fn url_with_query(url: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url.to_string();
    }

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

/// [`Transport`] backed by a [`reqwest::Client`] with rustls.
///
/// `ReqwestTransport` is cheap to clone; clones share one connection pool.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport with a default client and no timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Creates a transport honouring the timeout in `config`.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: config.timeout(),
        }
    }

    /// Returns the per-request timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> HttpHeaders {
        let mut result = HttpHeaders::new();
        for (name, value) in headers {
            // Repeated headers keep their first value.
            result.insert_if_absent(name.as_str(), value.to_str().unwrap_or_default());
        }
        result
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Patch => self.client.patch(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in request.headers.iter() {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        if let Some(timeout) = self.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let res = req_builder.send().await?;

        let status = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Other(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_url_with_query_handles_existing_query() {
        let pairs = vec![("b".to_string(), "2".to_string())];
        assert_eq!(url_with_query("https://x.example/p?a=1", &pairs), "https://x.example/p?a=1&b=2");
        assert_eq!(url_with_query("https://x.example/p", &[]), "https://x.example/p");
    }

    #[test]
    fn test_url_with_query_encodes_reserved_characters() {
        let pairs = vec![("filter".to_string(), "a&b=c".to_string())];
        assert_eq!(
            url_with_query("https://x.example/p", &pairs),
            "https://x.example/p?filter=a%26b%3Dc"
        );
    }

    #[test]
    fn test_from_config_takes_timeout() {
        let config = PipelineConfig::builder()
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(ReqwestTransport::from_config(&config).timeout(), Some(Duration::from_secs(5)));
        assert_eq!(ReqwestTransport::new().timeout(), None);
    }

    #[tokio::test]
    async fn test_send_forwards_method_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/items/3"))
            .and(header("X-Trace", "t-1"))
            .and(body_string(r#"{"qty":2}"#))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("X-Request-Id", "req-9")
                    .set_body_string("ok"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut headers = HttpHeaders::new();
        headers.insert("X-Trace", "t-1");

        let response = ReqwestTransport::new()
            .send(TransportRequest {
                method: HttpMethod::Put,
                url: format!("{}/v1/items/3", mock_server.uri()),
                headers,
                body: Some(br#"{"qty":2}"#.to_vec()),
            })
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.headers.get("x-request-id"), Some("req-9"));
        assert_eq!(response.body, b"ok".to_vec());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let result = ReqwestTransport::new()
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: "http://127.0.0.1:9/v1/anything".to_string(),
                headers: HttpHeaders::new(),
                body: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(TransportError::Connect(_) | TransportError::Other(_))
        ));
    }
}
