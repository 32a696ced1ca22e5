//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated base URL that endpoint paths are resolved against.
///
/// The URL must carry a scheme and a non-empty host. Any trailing slash is
/// removed so endpoint paths can be joined without producing `//`.
///
/// # Example
///
/// ```rust
/// use request_pipeline::BaseUrl;
///
/// let url = BaseUrl::new("https://api.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "api.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme or
    /// host, or carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(invalid());
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(invalid());
        }

        // Paths are appended to the URL, so it cannot carry a query or fragment
        if url[host_start..].contains(['?', '#']) {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Joins a relative path onto this base URL with exactly one `/` between them.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_rejects_query_and_fragment() {
        for url in [
            "https://api.example.com?x=1",
            "https://api.example.com/mobile?x=1",
            "https://api.example.com#top",
            "http://127.0.0.1:8080/#",
        ] {
            assert!(
                matches!(BaseUrl::new(url), Err(ConfigError::InvalidBaseUrl { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_base_url_validates_format() {
        let url = BaseUrl::new("https://api.example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), "api.example.com");

        // With port
        let url = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_name(), "127.0.0.1");

        // With path prefix
        let url = BaseUrl::new("https://api.example.com/mobile").unwrap();
        assert_eq!(url.host_name(), "api.example.com");
        assert_eq!(url.as_ref(), "https://api.example.com/mobile");
    }

    #[test]
    fn test_base_url_strips_trailing_slashes() {
        let url = BaseUrl::new("https://api.example.com///").unwrap();
        assert_eq!(url.as_ref(), "https://api.example.com");
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        // No scheme
        assert!(BaseUrl::new("api.example.com").is_err());

        // Empty host
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("https://:8080").is_err());

        // Invalid scheme
        assert!(BaseUrl::new("://example.com").is_err());
        assert!(BaseUrl::new("ht-tp://example.com").is_err());
    }

    #[test]
    fn test_base_url_join_normalizes_slashes() {
        let url = BaseUrl::new("https://api.example.com/").unwrap();
        assert_eq!(url.join("/v1/orders"), "https://api.example.com/v1/orders");
        assert_eq!(url.join("v1/orders"), "https://api.example.com/v1/orders");
    }

    #[test]
    fn test_base_url_deserialization_validates() {
        let url: BaseUrl = serde_json::from_str(r#""https://api.example.com""#).unwrap();
        assert_eq!(url.host_name(), "api.example.com");

        let result: Result<BaseUrl, _> = serde_json::from_str(r#""nope""#);
        assert!(result.is_err());
    }
}
