//! API version tags carried by endpoints.
//!
//! The version decides both the URL segment an endpoint is served under and,
//! together with the shared-store flag, which response envelope is expected.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend API version an endpoint belongs to.
///
/// # Example
///
/// ```rust
/// use request_pipeline::ApiVersion;
///
/// let version: ApiVersion = "v2".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2);
/// assert_eq!(version.to_string(), "v2");
/// assert_eq!(ApiVersion::default(), ApiVersion::V1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Version 1. Responses are wrapped in a `{ "result": ... }` envelope.
    #[default]
    V1,
    /// Version 2. Responses are bare payloads.
    V2,
}

impl ApiVersion {
    /// Returns the URL path segment for this version.
    #[must_use]
    pub const fn as_path_segment(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    /// Returns `true` for [`ApiVersion::V2`].
    #[must_use]
    pub const fn is_v2(&self) -> bool {
        matches!(self, Self::V2)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path_segment())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            _ => Err(ConfigError::InvalidApiVersion { version: s }),
        }
    }
}
