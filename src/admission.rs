//! Admission control: limits how many requests a caller may make in a window of time.
//!
//! The check runs once per request, ahead of any handler.
//!
//! Callers are identified by the `x-forwarded-for` header, which is only
//! trustworthy when the server runs behind a proxy that sets it. Without the
//! header, the peer address of the connection is used instead.

use std::{
    collections::{HashMap, VecDeque},
    fmt::Debug,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, FromRef, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error};

/// The header used to identify callers behind a proxy.
pub const CALLER_HEADER: &str = "x-forwarded-for";

/// The key used for callers that cannot be identified.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Decides whether a caller may make another request.
pub trait AdmissionControl: Debug + Send + Sync {
    /// Record a request from `key` and return whether it is allowed.
    fn admit(&self, key: &str) -> bool;
}

/// Allows at most `limit` requests per caller within any `window` of time.
///
/// The request times of each caller are kept in a log that is pruned on each
/// call, so the window slides rather than resetting on fixed boundaries.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    limit: usize,
    window: Duration,
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    /// The request budget used by default: 100 requests per minute.
    pub const DEFAULT_LIMIT: usize = 100;
    /// The window used by default.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

    /// Create a limiter that allows `limit` requests per `window`.
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            requests: Mutex::new(HashMap::new()),
        }
    }

    fn admit_at(&self, key: &str, now: Instant) -> bool {
        let mut requests = match self.requests.lock() {
            Ok(requests) => requests,
            Err(error) => {
                // Fail open if a previous holder of the lock panicked.
                tracing::error!("Could not acquire rate limiter lock: {error}");
                return true;
            }
        };

        // Forget callers with no requests left in the window.
        requests.retain(|_, log| {
            log.back()
                .is_some_and(|last| now.saturating_duration_since(*last) < self.window)
        });

        let log = requests.entry(key.to_owned()).or_default();

        while log
            .front()
            .is_some_and(|first| now.saturating_duration_since(*first) >= self.window)
        {
            log.pop_front();
        }

        if log.len() >= self.limit {
            return false;
        }

        log.push_back(now);
        true
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, Self::DEFAULT_WINDOW)
    }
}

impl AdmissionControl for SlidingWindowLimiter {
    fn admit(&self, key: &str) -> bool {
        self.admit_at(key, Instant::now())
    }
}

/// The state needed for the admission middleware.
#[derive(Debug, Clone)]
pub struct AdmissionState {
    /// The admission control collaborator.
    pub admission: Arc<dyn AdmissionControl>,
}

impl FromRef<AppState> for AdmissionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            admission: state.admission.clone(),
        }
    }
}

/// Middleware function that rejects requests from callers that have exceeded
/// their request budget with a 429 response.
pub async fn admission_guard(
    State(state): State<AdmissionState>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| *address);
    let key = caller_key(request.headers(), peer);

    if !state.admission.admit(&key) {
        tracing::warn!("Rejected request from {key}: request budget exceeded");
        return Error::AdmissionDenied.into_response();
    }

    next.run(request).await
}

/// Identify the caller of a request.
///
/// Uses the first address in the `x-forwarded-for` header set by a trusted
/// proxy, then the `peer` address of the connection, falling back to
/// [ANONYMOUS_CALLER].
fn caller_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .or_else(|| peer.map(|address| address.ip().to_string()))
        .unwrap_or_else(|| ANONYMOUS_CALLER.to_owned())
}
