//! Request-scoped plumbing for the store API: request ids and the
//! fixed-window request budget on the store routes.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use storefinder_core::RateLimitConfig;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id, stored as a request extension by [`request_id`].
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a non-blank caller id, otherwise mint a `UUIDv4`.
    fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| Uuid::new_v4().to_string(), String::from);
        Self(id)
    }
}

/// Attach a [`RequestId`] to the request, run the handler inside a span
/// carrying it, and echo it in the `x-request-id` response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let span = tracing::info_span!(
        "store_api",
        request_id = %id.0,
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(id.clone());

    let mut res = next.run(req).instrument(span).await;
    if let Ok(val) = HeaderValue::from_str(&id.0) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: usize,
}

/// Request budget shared by every store route.
#[derive(Debug, Clone)]
pub struct StoreRateLimiter {
    budget: RateLimitConfig,
    window: Arc<Mutex<Window>>,
}

impl StoreRateLimiter {
    #[must_use]
    pub fn new(budget: RateLimitConfig) -> Self {
        Self {
            budget,
            window: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    /// Spend one request. On refusal, returns the time left in the window.
    async fn acquire(&self) -> Result<(), Duration> {
        let mut window = self.window.lock().await;
        let now = Instant::now();
        if now.duration_since(window.opened_at) >= self.budget.window {
            *window = Window {
                opened_at: now,
                used: 0,
            };
        }

        if window.used >= self.budget.max_requests {
            let elapsed = now.duration_since(window.opened_at);
            return Err(self.budget.window.saturating_sub(elapsed));
        }
        window.used += 1;
        Ok(())
    }
}

/// Reject store requests past the budget with `429` and `Retry-After`.
pub async fn limit_store_requests(
    State(limiter): State<StoreRateLimiter>,
    Extension(req_id): Extension<RequestId>,
    req: Request,
    next: Next,
) -> Response {
    match limiter.acquire().await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            // Round up so clients never retry inside the closed window.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            tracing::warn!(
                max_requests = limiter.budget.max_requests,
                retry_after_secs = secs,
                "store request budget exhausted"
            );
            let mut res = ApiError::rate_limited(req_id.0).into_response();
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs.max(1)));
            res
        }
    }
}
