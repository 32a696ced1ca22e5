//! # Authed Request Pipeline
//!
//! A typed, authenticated HTTP request pipeline for async Rust clients.
//!
//! ## Overview
//!
//! One call, [`RequestOrchestrator::execute`], takes a [`NetworkRequest`] and
//! returns either a decoded `T` or exactly one [`NetworkRequestError`]. Along
//! the way it:
//!
//! - composes headers (user agent, method-dependent content type, bearer token)
//! - classifies non-2xx statuses into a closed error taxonomy
//! - decodes bare or `{ "result": ... }`-wrapped bodies depending on the endpoint
//! - refreshes an expired token once and replays the request, sharing one
//!   refresh between concurrent calls
//!
//! The network and token storage are injected: see [`Transport`] and
//! [`TokenStore`]. [`ReqwestTransport`] and [`InMemoryTokenStore`] are provided.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use request_pipeline::{
//!     ApiVersion, AuthToken, BaseUrl, Endpoint, HttpMethod, InMemoryTokenStore,
//!     NetworkRequest, PipelineConfig, RequestOrchestrator,
//! };
//!
//! #[derive(serde::Deserialize)]
//! struct Cart { items: Vec<String> }
//!
//! let config = PipelineConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com")?)
//!     .user_agent_prefix("ShopApp/2.1")
//!     .build()?;
//!
//! let store = Arc::new(InMemoryTokenStore::with_token(AuthToken::new("access", "refresh")));
//! let orchestrator = RequestOrchestrator::with_reqwest(&config, store);
//!
//! let cart_endpoint = Endpoint::new("cart")?.with_version(ApiVersion::V2);
//! let request = NetworkRequest::builder(HttpMethod::Get, cart_endpoint).build();
//! let cart: Cart = orchestrator.execute(&request).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration, transport and token store are passed explicitly
//! - **Fail-fast validation**: config newtypes validate on construction
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::{AuthToken, InMemoryTokenStore, TokenRefresher, TokenStore};
pub use config::{ApiVersion, BaseUrl, PipelineConfig, PipelineConfigBuilder};
pub use error::ConfigError;

pub use clients::{
    AuthMode, Endpoint, EnvelopeShape, HttpBody, HttpHeaders, HttpMethod, NetworkRequest,
    NetworkRequestBuilder, NetworkRequestError, RequestOrchestrator, ReqwestTransport, Transport,
    TransportError, TransportRequest, TransportResponse,
};
