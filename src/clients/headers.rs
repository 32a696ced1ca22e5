//! Header composition.
//!
//! [`compose_headers`] builds the full header set for one HTTP attempt. It is
//! a pure function: the token is passed in, so each attempt (including a
//! replay after refresh) composes from whatever token is current at send time.

use std::fmt;

use crate::clients::http_request::{AuthMode, HttpMethod};

/// `User-Agent` header name.
pub const USER_AGENT: &str = "User-Agent";
/// `Accept` header name.
pub const ACCEPT: &str = "Accept";
/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Authorization` header name.
pub const AUTHORIZATION: &str = "Authorization";

/// Content type declared for GET requests.
pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded; charset=utf-8";
/// Content type declared for every other method.
pub const JSON: &str = "application/json";

/// An ordered header map with case-insensitive names.
///
/// Insertion order is preserved. Lookups ignore ASCII case, and a name is
/// stored at most once.
///
/// # Example
///
/// ```rust
/// use request_pipeline::HttpHeaders;
///
/// let mut headers = HttpHeaders::new();
/// headers.insert("X-Request-Id", "abc");
/// headers.insert_if_absent("x-request-id", "ignored");
///
/// assert_eq!(headers.get("X-REQUEST-ID"), Some("abc"));
/// assert_eq!(headers.len(), 1);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    entries: Vec<(String, String)>,
}

impl HttpHeaders {
    /// Creates an empty header map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the value for `name`, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].1.as_str())
    }

    /// Returns `true` if a header named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Sets `name` to `value`, replacing any existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Sets `name` to `value` only if no value is present yet.
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value.into()));
        true
    }

    /// Removes `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K, V> FromIterator<(K, V)> for HttpHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert_if_absent(name, value);
        }
        headers
    }
}

impl fmt::Debug for HttpHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bearer tokens must not reach logs.
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| {
                let shown = if k.eq_ignore_ascii_case(AUTHORIZATION) {
                    "*****"
                } else {
                    v.as_str()
                };
                (k.as_str(), shown)
            }))
            .finish()
    }
}

/// Returns the content type declared for `method`.
#[must_use]
pub const fn content_type_for(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => FORM_URL_ENCODED,
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete => JSON,
    }
}

/// Builds the header set for one HTTP attempt.
///
/// - `User-Agent` and `Accept` are always set and win over caller headers.
/// - `Content-Type` depends on the method and `Authorization: Bearer <token>` is
///   attached only for [`AuthMode::Mandatory`] with a token present. Both are
///   defaults a caller header with the same name replaces.
/// - Remaining caller headers are appended; duplicates among them keep the first value.
///
/// # Example
///
/// ```rust
/// use request_pipeline::clients::compose_headers;
/// use request_pipeline::{AuthMode, HttpHeaders, HttpMethod};
///
/// let headers = compose_headers(AuthMode::Mandatory, HttpMethod::Post, Some("t0k3n"), "agent/1", None);
/// assert_eq!(headers.get("Authorization"), Some("Bearer t0k3n"));
/// assert_eq!(headers.get("Content-Type"), Some("application/json"));
///
/// let headers = compose_headers(AuthMode::Skip, HttpMethod::Get, Some("t0k3n"), "agent/1", None);
/// assert!(headers.get("Authorization").is_none());
/// ```
#[must_use]
pub fn compose_headers(
    auth_mode: AuthMode,
    method: HttpMethod,
    access_token: Option<&str>,
    user_agent: &str,
    extra: Option<&HttpHeaders>,
) -> HttpHeaders {
    let mut headers = HttpHeaders::new();
    headers.insert(USER_AGENT, user_agent);
    headers.insert(ACCEPT, JSON);
    headers.insert(CONTENT_TYPE, content_type_for(method));

    if auth_mode.is_mandatory() {
        if let Some(token) = access_token.filter(|t| !t.is_empty()) {
            headers.insert(AUTHORIZATION, format!("Bearer {token}"));
        }
    }

    let Some(extra) = extra else {
        return headers;
    };

    let mut overridden: Vec<&str> = Vec::new();
    for (name, value) in extra.iter() {
        let soft_default = name.eq_ignore_ascii_case(CONTENT_TYPE)
            || name.eq_ignore_ascii_case(AUTHORIZATION);
        let already_overridden = overridden.iter().any(|n| n.eq_ignore_ascii_case(name));

        if soft_default && !already_overridden {
            headers.insert(name, value);
            overridden.push(name);
        } else {
            headers.insert_if_absent(name, value);
        }
    }

    headers
}
