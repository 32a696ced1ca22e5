//! One HTTP attempt: compose headers, send, classify.
//!
//! [`RequestSender`] is the step shared by the orchestrator and the token
//! refresher. It performs exactly one transport call and never retries.

use std::fmt;
use std::sync::Arc;

use crate::clients::classifier::classify_status;
use crate::clients::errors::NetworkRequestError;
use crate::clients::headers::compose_headers;
use crate::clients::http_request::NetworkRequest;
use crate::clients::transport::{url_with_query, Transport, TransportRequest};
use crate::config::{BaseUrl, PipelineConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the `User-Agent` value for `config`.
///
/// Format: `"{prefix} | Authed Request Pipeline v{version} | Rust {rust_version}"`,
/// without the prefix part when none is configured.
#[must_use]
pub fn user_agent(config: &PipelineConfig) -> String {
    let user_agent_prefix = config
        .user_agent_prefix()
        .map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    format!("{user_agent_prefix}Authed Request Pipeline v{SDK_VERSION} | Rust {rust_version}")
}

/// Sends a single attempt of a [`NetworkRequest`].
#[derive(Clone)]
pub struct RequestSender {
    transport: Arc<dyn Transport>,
    base_url: BaseUrl,
    user_agent: String,
}

impl RequestSender {
    /// Creates a sender for `config` over `transport`.
    #[must_use]
    pub fn new(config: &PipelineConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: config.base_url().clone(),
            user_agent: user_agent(config),
        }
    }

    /// Returns the `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sends `request` once, with `access_token` as the bearer when the
    /// request's auth mode asks for it.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkRequestError::TransportFailed`] when no response was
    /// received, or the classified error for a non-2xx status.
    pub async fn send(
        &self,
        request: &NetworkRequest,
        access_token: Option<&str>,
    ) -> Result<Vec<u8>, NetworkRequestError> {
        let headers = compose_headers(
            request.auth_mode,
            request.method,
            access_token,
            &self.user_agent,
            request.extra_headers.as_ref(),
        );
        let url = url_with_query(&request.endpoint.url(&self.base_url), &request.query_pairs());

        tracing::debug!(method = %request.method, url = %url, "sending request");

        let response = self
            .transport
            .send(TransportRequest {
                method: request.method,
                url,
                headers,
                body: request.body_bytes(),
            })
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "transport failed");
                NetworkRequestError::from(e)
            })?;

        classify_status(response.status, &response.body)?;
        Ok(response.body)
    }
}

impl fmt::Debug for RequestSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSender")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prefix: Option<&str>) -> PipelineConfig {
        let builder = PipelineConfig::builder().base_url(BaseUrl::new("https://api.example.com").unwrap());
        match prefix {
            Some(prefix) => builder.user_agent_prefix(prefix),
            None => builder,
        }
        .build()
        .unwrap()
    }

    #[test]
    fn test_user_agent_format() {
        let agent = user_agent(&config(None));
        assert!(agent.starts_with("Authed Request Pipeline v"));
        assert!(agent.contains(SDK_VERSION));
        assert!(agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let agent = user_agent(&config(Some("MyApp/1.0")));
        assert!(agent.starts_with("MyApp/1.0 | "));
        assert!(agent.contains("Authed Request Pipeline"));
    }
}
