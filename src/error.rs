//! Configuration error types for the request pipeline.
//!
//! All configuration constructors return `Result<T, ConfigError>` so invalid
//! settings are rejected before a single request is sent. Errors produced while
//! executing requests live in [`crate::clients::NetworkRequestError`].
//!
//! # Example
//!
//! ```rust
//! use request_pipeline::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while building pipeline configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme and host (e.g., 'https://api.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected 'v1' or 'v2'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// An endpoint path is empty after normalization.
    #[error("Endpoint path cannot be empty.")]
    EmptyEndpointPath,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "ftp//broken".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp//broken"));
        assert!(message.contains("scheme and host"));
    }

    #[test]
    fn test_invalid_api_version_error_message() {
        let error = ConfigError::InvalidApiVersion {
            version: "v9".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid API version 'v9'. Expected 'v1' or 'v2'.");
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "base_url" };
        let message = error.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyEndpointPath;
        let _: &dyn std::error::Error = &error;
    }
}
