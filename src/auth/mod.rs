//! Token handling for the request pipeline.
//!
//! - [`AuthToken`]: the access/refresh pair
//! - [`TokenStore`]: where the pair lives, supplied by the application
//! - [`InMemoryTokenStore`]: a ready-made store
//! - [`TokenRefresher`]: the refresh call

mod refresh;
mod token;

pub use refresh::{RefreshTokenResponse, TokenRefresher};
pub use token::{AuthToken, InMemoryTokenStore, TokenStore};
