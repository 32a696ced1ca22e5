//! Configuration types for the request pipeline.
//!
//! # Overview
//!
//! - [`PipelineConfig`]: settings shared by every request an orchestrator sends
//! - [`PipelineConfigBuilder`]: a builder for constructing [`PipelineConfig`] instances
//! - [`BaseUrl`]: a validated base URL
//! - [`ApiVersion`]: the API version tag carried by endpoints
//!
//! # Example
//!
//! ```rust
//! use request_pipeline::{BaseUrl, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .user_agent_prefix("Storefront/3.2")
//!     .build()
//!     .unwrap();
//!
//! assert!(config.retry_unauthorized_after_replay());
//! ```

mod newtypes;
mod version;

pub use newtypes::BaseUrl;
pub use version::ApiVersion;

use std::time::Duration;

use crate::clients::Endpoint;
use crate::error::ConfigError;

/// Path of the token refresh endpoint when none is configured.
pub const DEFAULT_REFRESH_PATH: &str = "auth/refresh";

/// Configuration for a [`crate::RequestOrchestrator`].
///
/// `PipelineConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    base_url: BaseUrl,
    refresh_endpoint: Endpoint,
    user_agent_prefix: Option<String>,
    retry_unauthorized_after_replay: bool,
    timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Creates a new builder for constructing a `PipelineConfig`.
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Returns the default base URL endpoints are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the endpoint the token refresher posts to.
    #[must_use]
    pub const fn refresh_endpoint(&self) -> &Endpoint {
        &self.refresh_endpoint
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns whether an `Unauthorized` replay gets one more attempt.
    #[must_use]
    pub const fn retry_unauthorized_after_replay(&self) -> bool {
        self.retry_unauthorized_after_replay
    }

    /// Returns the per-request timeout applied by [`crate::ReqwestTransport`].
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

// Verify PipelineConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PipelineConfig>();
};

/// Builder for constructing [`PipelineConfig`] instances.
///
/// `base_url` is required. All other fields have defaults.
///
/// # Defaults
///
/// - `refresh_endpoint`: `v1/auth/refresh` on the base URL
/// - `user_agent_prefix`: `None`
/// - `retry_unauthorized_after_replay`: `true`
/// - `timeout`: `None`
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    base_url: Option<BaseUrl>,
    refresh_endpoint: Option<Endpoint>,
    user_agent_prefix: Option<String>,
    retry_unauthorized_after_replay: Option<bool>,
    timeout: Option<Duration>,
}

impl PipelineConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the token refresh endpoint.
    #[must_use]
    pub fn refresh_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.refresh_endpoint = Some(endpoint);
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Enables or disables the extra attempt after an unauthorized replay.
    #[must_use]
    pub const fn retry_unauthorized_after_replay(mut self, enabled: bool) -> Self {
        self.retry_unauthorized_after_replay = Some(enabled);
        self
    }

    /// Sets the per-request timeout used by [`crate::ReqwestTransport`].
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`PipelineConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set.
    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let refresh_endpoint = match self.refresh_endpoint {
            Some(endpoint) => endpoint,
            None => Endpoint::new(DEFAULT_REFRESH_PATH)?,
        };

        Ok(PipelineConfig {
            base_url,
            refresh_endpoint,
            user_agent_prefix: self.user_agent_prefix,
            retry_unauthorized_after_replay: self.retry_unauthorized_after_replay.unwrap_or(true),
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseUrl {
        BaseUrl::new("https://api.example.com").unwrap()
    }

    #[test]
    fn test_build_requires_base_url() {
        let result = PipelineConfig::builder().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::builder().base_url(base()).build().unwrap();

        assert_eq!(config.base_url().as_ref(), "https://api.example.com");
        assert_eq!(config.refresh_endpoint().path(), DEFAULT_REFRESH_PATH);
        assert_eq!(config.refresh_endpoint().version(), ApiVersion::V1);
        assert!(config.user_agent_prefix().is_none());
        assert!(config.retry_unauthorized_after_replay());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_all_options() {
        let refresh = Endpoint::new("session/renew")
            .unwrap()
            .with_version(ApiVersion::V2);
        let config = PipelineConfig::builder()
            .base_url(base())
            .refresh_endpoint(refresh.clone())
            .user_agent_prefix("MyApp/1.0")
            .retry_unauthorized_after_replay(false)
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap();

        assert_eq!(config.refresh_endpoint(), &refresh);
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
        assert!(!config.retry_unauthorized_after_replay());
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }
}
