mod stores;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefinder_core::{AppConfig, StoreDataset};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::{
    limit_store_requests, request_id, RequestId, StoreRateLimiter, REQUEST_ID_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<StoreDataset>,
    pub config: Arc<AppConfig>,
}

/// `{ "data": ..., "meta": ... }` body of every successful response.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: T,
    pub meta: EnvelopeMeta,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    /// Number of stores in `data`, for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    /// Whether the caller should render the compact (mobile) layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact_layout: Option<bool>,
}

impl EnvelopeMeta {
    fn for_request(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
            results: None,
            compact_layout: None,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: EnvelopeMeta::for_request(request_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    RateLimited,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: EnvelopeMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    fn new(request_id: String, code: ErrorCode, message: String) -> Self {
        Self {
            error: ErrorBody { code, message },
            meta: EnvelopeMeta::for_request(request_id),
        }
    }

    pub fn invalid(request_id: String, message: impl Into<String>) -> Self {
        Self::new(request_id, ErrorCode::ValidationError, message.into())
    }

    pub fn store_not_found(request_id: String, store_id: &str) -> Self {
        Self::new(
            request_id,
            ErrorCode::NotFound,
            format!("store '{store_id}' not found"),
        )
    }

    pub fn rate_limited(request_id: String) -> Self {
        Self::new(
            request_id,
            ErrorCode::RateLimited,
            "too many store requests; retry later".to_string(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.error.code.status(), Json(self)).into_response()
    }
}

/// Browsers on any origin may read the store routes and the headers the
/// API sets.
fn build_cors() -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([request_id.clone()])
        .expose_headers([request_id, header::RETRY_AFTER])
}

pub fn build_app(state: AppState) -> Router {
    let limiter = StoreRateLimiter::new(state.config.rate_limit);

    let store_routes = Router::new()
        .route("/api/v1/stores/search", get(stores::search))
        .route("/api/v1/stores/in-view", get(stores::in_view))
        .route("/api/v1/stores/{id}", get(stores::get_store))
        .layer(axum::middleware::from_fn_with_state(
            limiter,
            limit_store_requests,
        ));

    Router::new()
        .route("/api/v1/health", get(health))
        .merge(store_routes)
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    stores: usize,
    /// Dataset entries dropped at load.
    skipped: usize,
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<Envelope<Health>> {
    Json(Envelope::new(
        req_id.0,
        Health {
            status: "ok",
            stores: state.dataset.len(),
            skipped: state.dataset.skipped(),
        },
    ))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
