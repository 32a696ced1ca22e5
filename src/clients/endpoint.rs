//! Endpoint descriptors.
//!
//! An [`Endpoint`] names a concrete target: a path, the API version it is
//! served under, and whether it belongs to the shared store. Those two flags
//! alone decide the [`EnvelopeShape`] of its responses.

use crate::config::{ApiVersion, BaseUrl};
use crate::error::ConfigError;

/// Outer JSON shape of a successful response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// The body is the payload itself.
    Bare,
    /// The body is `{ "result": <payload>, ...metadata }`.
    Wrapped,
}

/// An immutable descriptor for an API endpoint.
///
/// # Example
///
/// ```rust
/// use request_pipeline::{ApiVersion, BaseUrl, Endpoint, EnvelopeShape};
///
/// let base = BaseUrl::new("https://api.example.com").unwrap();
///
/// let orders = Endpoint::new("orders/7").unwrap();
/// assert_eq!(orders.url(&base), "https://api.example.com/v1/orders/7");
/// assert_eq!(orders.envelope_shape(), EnvelopeShape::Wrapped);
///
/// let cart = Endpoint::new("/cart/").unwrap().with_version(ApiVersion::V2);
/// assert_eq!(cart.url(&base), "https://api.example.com/v2/cart");
/// assert_eq!(cart.envelope_shape(), EnvelopeShape::Bare);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    version: ApiVersion,
    shared_store: bool,
    base_url: Option<BaseUrl>,
}

impl Endpoint {
    /// Creates a v1, non-shared-store endpoint for `path`.
    ///
    /// Leading and trailing slashes are stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyEndpointPath`] if nothing remains after normalization.
    pub fn new(path: impl Into<String>) -> Result<Self, ConfigError> {
        let path = path.into();
        let path = path.trim().trim_matches('/');
        if path.is_empty() {
            return Err(ConfigError::EmptyEndpointPath);
        }

        Ok(Self {
            path: path.to_string(),
            version: ApiVersion::V1,
            shared_store: false,
            base_url: None,
        })
    }

    /// Sets the API version.
    #[must_use]
    pub const fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    /// Marks this endpoint as a shared-store endpoint.
    #[must_use]
    pub const fn with_shared_store(mut self, shared_store: bool) -> Self {
        self.shared_store = shared_store;
        self
    }

    /// Serves this endpoint from `base_url` instead of the pipeline default.
    #[must_use]
    pub fn with_base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Returns the normalized path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the API version.
    #[must_use]
    pub const fn version(&self) -> ApiVersion {
        self.version
    }

    /// Returns `true` if this endpoint targets API v2.
    #[must_use]
    pub const fn is_v2(&self) -> bool {
        self.version.is_v2()
    }

    /// Returns `true` if this is a shared-store endpoint.
    #[must_use]
    pub const fn is_shared_store(&self) -> bool {
        self.shared_store
    }

    /// Returns the envelope shape expected for successful responses.
    #[must_use]
    pub const fn envelope_shape(&self) -> EnvelopeShape {
        if self.is_v2() || self.shared_store {
            EnvelopeShape::Bare
        } else {
            EnvelopeShape::Wrapped
        }
    }

    /// Resolves the full request URL, preferring this endpoint's own base URL.
    #[must_use]
    pub fn url(&self, default_base: &BaseUrl) -> String {
        let base = self.base_url.as_ref().unwrap_or(default_base);
        base.join(&format!("{}/{}", self.version.as_path_segment(), self.path))
    }
}
