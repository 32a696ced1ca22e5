//! The request pipeline.
//!
//! This module turns a [`NetworkRequest`] into a typed value or a single
//! [`NetworkRequestError`]. Its parts, leaf first:
//!
//! - [`compose_headers`]: header set for one attempt
//! - [`classify_status`]: status code to error taxonomy
//! - [`decode_response`]: bytes to `T`, bare or wrapped in `{ "result": T }`
//! - [`RequestSender`]: one attempt over a [`Transport`]
//! - [`RequestOrchestrator`]: refresh-and-replay around the sender
//!
//! # Example
//!
//! ```rust,ignore
//! use request_pipeline::{Endpoint, HttpMethod, NetworkRequest, NetworkRequestError};
//!
//! let request = NetworkRequest::builder(HttpMethod::Post, Endpoint::new("cart/items")?)
//!     .body(serde_json::json!({"sku": "A-1"}))
//!     .build();
//!
//! match orchestrator.execute::<CartItem>(&request).await {
//!     Ok(item) => println!("Added {}", item.sku),
//!     Err(NetworkRequestError::BadRequest(message)) => println!("Rejected: {message:?}"),
//!     Err(e) => println!("Failed: {e}"),
//! }
//! ```

mod classifier;
mod decoder;
mod endpoint;
mod errors;
mod headers;
mod http_request;
mod orchestrator;
mod sender;
mod transport;

pub use classifier::{classify_status, is_success};
pub use decoder::{decode_response, ResponseEnvelope};
pub use endpoint::{Endpoint, EnvelopeShape};
pub use errors::{NetworkRequestError, TransportError};
pub use headers::{compose_headers, content_type_for, HttpHeaders};
pub use http_request::{AuthMode, HttpBody, HttpMethod, NetworkRequest, NetworkRequestBuilder};
pub use orchestrator::RequestOrchestrator;
pub use sender::{user_agent, RequestSender, SDK_VERSION};
pub use transport::{
    url_with_query, ReqwestTransport, Transport, TransportRequest, TransportResponse,
};
