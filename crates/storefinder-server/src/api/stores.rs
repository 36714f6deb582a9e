use axum::{
    extract::{Path, Query, State},
    http::{header::USER_AGENT, HeaderMap},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefinder_core::{is_compact_viewport, DeviceInfo, StoreFeature};
use storefinder_search::{features_in_view, search_stores, Bounds, MIN_VIEWPORT_ZOOM};

use crate::middleware::RequestId;

use super::{ApiError, AppState, Envelope};

#[derive(Debug, Serialize)]
pub(super) struct StoreItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub butikk: Option<String>,
    pub address: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub shopping_center: Option<String>,
    pub is_shopping_center: bool,
    pub store_count: Option<u32>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl StoreItem {
    /// `None` for features without properties.
    fn from_feature(feature: &StoreFeature) -> Option<Self> {
        let props = feature.properties.as_ref()?;
        let coords = feature.coordinates();
        Some(Self {
            id: props.id.as_ref().map(ToString::to_string),
            name: props.name.clone(),
            butikk: props.butikk.clone(),
            address: props.address.clone(),
            address_line: props.address_line.clone(),
            city: props.city.clone(),
            zip_code: props.zip_code.clone(),
            shopping_center: props.shopping_center.clone(),
            is_shopping_center: props.is_shopping_center,
            store_count: props.store_count,
            longitude: coords.map(|c| c.longitude),
            latitude: coords.map(|c| c.latitude),
        })
    }
}

/// List envelope; `meta.results` counts the stores actually returned.
fn store_list(request_id: String, features: &[&StoreFeature]) -> Envelope<Vec<StoreItem>> {
    let items: Vec<StoreItem> = features
        .iter()
        .filter_map(|f| StoreItem::from_feature(f))
        .collect();
    let mut envelope = Envelope::new(request_id, items);
    envelope.meta.results = Some(envelope.data.len());
    envelope
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
    /// Client viewport width in CSS pixels.
    pub width: Option<u32>,
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Envelope<Vec<StoreItem>>>, ApiError> {
    let Some(query) = params.q else {
        return Err(ApiError::invalid(req_id.0, "query parameter 'q' is required"));
    };

    let limit = state.config.search.resolve_limit(params.limit);
    let device =
        DeviceInfo::from_user_agent(headers.get(USER_AGENT).and_then(|v| v.to_str().ok()));

    let matches = search_stores(state.dataset.features(), &query, limit);
    tracing::debug!(
        platform = %device.platform,
        limit,
        results = matches.len(),
        "store search"
    );

    let mut envelope = store_list(req_id.0, &matches);
    envelope.meta.compact_layout = Some(is_compact_viewport(&device, params.width));
    Ok(Json(envelope))
}

#[derive(Debug, Deserialize)]
pub(super) struct ViewParams {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
    pub zoom: Option<f64>,
}

pub(super) async fn in_view(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Envelope<Vec<StoreItem>>>, ApiError> {
    let bounds = Bounds {
        west: params.west,
        south: params.south,
        east: params.east,
        north: params.north,
    };
    if !bounds.is_valid() {
        return Err(ApiError::invalid(
            req_id.0,
            "bounds must satisfy west <= east and south <= north",
        ));
    }

    let zoom = params.zoom.unwrap_or(MIN_VIEWPORT_ZOOM);
    if !zoom.is_finite() {
        return Err(ApiError::invalid(req_id.0, "zoom must be a finite number"));
    }

    let visible = features_in_view(state.dataset.features(), &bounds, zoom);
    Ok(Json(store_list(req_id.0, &visible)))
}

pub(super) async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<StoreItem>>, ApiError> {
    match state.dataset.find_by_id(&id).and_then(StoreItem::from_feature) {
        Some(item) => Ok(Json(Envelope::new(req_id.0, item))),
        None => Err(ApiError::store_not_found(req_id.0, &id)),
    }
}
