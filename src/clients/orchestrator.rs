//! The request orchestrator.
//!
//! [`RequestOrchestrator::execute`] is the single public operation of the
//! pipeline. Each call walks its own small state machine:
//!
//! ```text
//! Initial --401, mandatory--> refresh --ok--> Replay --401, retry enabled--> UnauthorizedRetry
//!    |                           |              |                                |
//!    +-- 2xx: decode             +-- err: done  +-- anything else: done          +-- done
//! ```
//!
//! - At most one refresh per call. A replay that is rejected again never
//!   refreshes again.
//! - [`AuthMode::Skip`] calls never refresh and are sent exactly once.
//! - Every attempt composes its headers from the token stored at send time,
//!   so a replay always carries the newest token.
//!
//! # Single-flight refresh
//!
//! Concurrent calls that hit 401 share one refresh. The in-flight refresh is
//! kept as a weak handle to a shared future: callers that find a live,
//! unfinished refresh await it instead of starting their own. When every
//! waiter is dropped the refresh is dropped with them, which cancels its
//! transport request.
//!
//! A 401 for an attempt whose token has already been replaced in the store
//! goes straight to the replay without refreshing again.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use serde::de::DeserializeOwned;

use crate::auth::{AuthToken, TokenRefresher, TokenStore};
use crate::clients::decoder::decode_response;
use crate::clients::errors::NetworkRequestError;
use crate::clients::http_request::{AuthMode, NetworkRequest};
use crate::clients::sender::RequestSender;
use crate::clients::transport::{ReqwestTransport, Transport};
use crate::config::PipelineConfig;

type RefreshFuture = BoxFuture<'static, Result<AuthToken, NetworkRequestError>>;

/// Which attempt of a call is being sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// The first send.
    Initial,
    /// The send after a successful token refresh.
    Replay,
    /// The extra send after the replay was rejected as unauthorized.
    UnauthorizedRetry,
}

/// Executes typed, authenticated requests.
///
/// Clones share the transport, the token store and the in-flight refresh.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use request_pipeline::{
///     AuthToken, BaseUrl, Endpoint, HttpMethod, InMemoryTokenStore, NetworkRequest,
///     PipelineConfig, RequestOrchestrator,
/// };
///
/// #[derive(serde::Deserialize)]
/// struct Order { id: u64 }
///
/// let config = PipelineConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com").unwrap())
///     .build()
///     .unwrap();
/// let store = Arc::new(InMemoryTokenStore::with_token(AuthToken::new("access", "refresh")));
/// let orchestrator = RequestOrchestrator::with_reqwest(&config, store);
///
/// let request = NetworkRequest::builder(HttpMethod::Get, Endpoint::new("orders/7").unwrap()).build();
/// let order: Order = orchestrator.execute(&request).await?;
/// ```
#[derive(Clone)]
pub struct RequestOrchestrator {
    sender: RequestSender,
    store: Arc<dyn TokenStore>,
    refresher: TokenRefresher,
    retry_unauthorized_after_replay: bool,
    in_flight_refresh: Arc<Mutex<Option<WeakShared<RefreshFuture>>>>,
}

// Verify RequestOrchestrator is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestOrchestrator>();
};

impl RequestOrchestrator {
    /// Creates an orchestrator over `transport` and `store`.
    #[must_use]
    pub fn new(
        config: &PipelineConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        let sender = RequestSender::new(config, transport);
        let refresher = TokenRefresher::new(
            sender.clone(),
            store.clone(),
            config.refresh_endpoint().clone(),
        );

        Self {
            sender,
            store,
            refresher,
            retry_unauthorized_after_replay: config.retry_unauthorized_after_replay(),
            in_flight_refresh: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates an orchestrator using [`ReqwestTransport`].
    #[must_use]
    pub fn with_reqwest(config: &PipelineConfig, store: Arc<dyn TokenStore>) -> Self {
        Self::new(config, Arc::new(ReqwestTransport::from_config(config)), store)
    }

    /// Returns the `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.sender.user_agent()
    }

    /// Sends `request` and decodes the successful response into `T`.
    ///
    /// An unauthorized response to a [`AuthMode::Mandatory`] request triggers
    /// one token refresh followed by one replay. If the replay is rejected as
    /// unauthorized too, one more attempt is made when
    /// [`PipelineConfig::retry_unauthorized_after_replay`] is enabled.
    ///
    /// Dropping the returned future abandons the call: the attempt in flight
    /// is cancelled and no refresh or replay follows.
    ///
    /// # Errors
    ///
    /// Returns exactly one [`NetworkRequestError`]: the classification of the
    /// last attempt, the refresh failure if the refresh failed, or a decoding
    /// error if the successful body did not match `T`.
    pub async fn execute<T>(&self, request: &NetworkRequest) -> Result<T, NetworkRequestError>
    where
        T: DeserializeOwned,
    {
        let mut phase = Phase::Initial;

        loop {
            let access_token = match request.auth_mode {
                AuthMode::Mandatory => self.store.access_token(),
                AuthMode::Skip => None,
            };

            tracing::debug!(
                method = %request.method,
                endpoint = request.endpoint.path(),
                phase = ?phase,
                "executing request"
            );

            match self.sender.send(request, access_token.as_deref()).await {
                Ok(body) => return decode_response(&body, &request.endpoint),
                Err(error) => {
                    phase = self
                        .next_phase(phase, request, access_token.as_deref(), error)
                        .await?;
                }
            }
        }
    }

    /// Decides what follows a failed attempt sent with `sent_token`. `Err` is
    /// terminal.
    async fn next_phase(
        &self,
        phase: Phase,
        request: &NetworkRequest,
        sent_token: Option<&str>,
        error: NetworkRequestError,
    ) -> Result<Phase, NetworkRequestError> {
        if !error.is_unauthorized() || !request.auth_mode.is_mandatory() {
            return Err(error);
        }

        match phase {
            Phase::Initial => {
                if self.token_rotated_since(sent_token) {
                    tracing::debug!(
                        endpoint = request.endpoint.path(),
                        "token rotated while the request was in flight, replaying"
                    );
                } else {
                    self.refresh_token().await?;
                }
                Ok(Phase::Replay)
            }
            Phase::Replay if self.retry_unauthorized_after_replay => {
                tracing::warn!(
                    endpoint = request.endpoint.path(),
                    "replay after token refresh was unauthorized, retrying once"
                );
                Ok(Phase::UnauthorizedRetry)
            }
            Phase::Replay | Phase::UnauthorizedRetry => {
                tracing::warn!(
                    endpoint = request.endpoint.path(),
                    "request still unauthorized after token refresh"
                );
                Err(error)
            }
        }
    }

    /// Whether the store holds a different access token than the one an
    /// attempt was sent with.
    fn token_rotated_since(&self, sent_token: Option<&str>) -> bool {
        self.store
            .access_token()
            .is_some_and(|current| Some(current.as_str()) != sent_token)
    }

    /// Refreshes the token pair, joining a refresh already in flight.
    ///
    /// # Errors
    ///
    /// Returns the refresh call's error. Every caller sharing the refresh
    /// receives the same error.
    pub async fn refresh_token(&self) -> Result<AuthToken, NetworkRequestError> {
        let refresh = {
            let mut slot = self
                .in_flight_refresh
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let in_flight = slot
                .as_ref()
                .and_then(WeakShared::upgrade)
                .filter(|refresh| refresh.peek().is_none());

            if let Some(refresh) = in_flight {
                tracing::debug!("joining in-flight token refresh");
                refresh
            } else {
                tracing::info!("starting token refresh");
                let refresher = self.refresher.clone();
                let future: RefreshFuture = async move { refresher.refresh().await }.boxed();
                let refresh: Shared<RefreshFuture> = future.shared();
                *slot = refresh.downgrade();
                refresh
            }
        };

        refresh.await
    }
}

impl fmt::Debug for RequestOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOrchestrator")
            .field("sender", &self.sender)
            .field("refresher", &self.refresher)
            .field(
                "retry_unauthorized_after_replay",
                &self.retry_unauthorized_after_replay,
            )
            .finish_non_exhaustive()
    }
}
