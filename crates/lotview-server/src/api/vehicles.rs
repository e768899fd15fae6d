use axum::{
    extract::{Path, Query, State},
    response::Html,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use lotview_core::{
    compose_poster, Facets, ListedVehicle, PosterOptions, PriceRange, QueryState, RowIssue,
    SortKey, SourceKind, VehicleRecord,
};
use lotview_source::load_snapshot_from_config;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct VehicleItem {
    key: String,
    #[serde(flatten)]
    vehicle: VehicleRecord,
    effective_price: Option<Decimal>,
    has_discount: bool,
    savings: Option<Decimal>,
}

impl From<ListedVehicle<'_>> for VehicleItem {
    fn from(listed: ListedVehicle<'_>) -> Self {
        Self {
            key: listed.key,
            vehicle: listed.vehicle.clone(),
            effective_price: listed.effective_price,
            has_discount: listed.has_discount,
            savings: listed.savings,
        }
    }
}

/// Query string for the list route. Absent or empty parameters mean "no
/// filter"; `price_range` and `sort` use the same strings as the CLI.
#[derive(Debug, Default, Deserialize)]
pub(super) struct VehicleQuery {
    pub search: Option<String>,
    pub make: Option<String>,
    pub year: Option<String>,
    pub fuel_type: Option<String>,
    pub price_range: Option<String>,
    pub sort: Option<String>,
}

impl VehicleQuery {
    fn into_query_state(self) -> Result<QueryState, lotview_core::QueryError> {
        let price_range = match self.price_range.as_deref() {
            Some(raw) => raw.parse::<PriceRange>()?,
            None => PriceRange::Any,
        };
        let sort = match self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => raw.parse::<SortKey>()?,
            None => SortKey::default(),
        };
        Ok(QueryState {
            search: self.search.unwrap_or_default(),
            make: self.make.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            fuel_type: self.fuel_type.unwrap_or_default(),
            price_range,
            sort,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ReloadData {
    vehicles: usize,
    source: SourceKind,
    fell_back: bool,
    fetched_at: DateTime<Utc>,
    skipped: Vec<RowIssue>,
}

pub(super) async fn list_vehicles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<VehicleQuery>,
) -> Result<Json<ApiResponse<Vec<VehicleItem>>>, ApiError> {
    let query = query
        .into_query_state()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let snapshot = state.snapshot().await;
    let data = snapshot
        .listing(&query)
        .into_iter()
        .map(VehicleItem::from)
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn vehicle_facets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Facets>> {
    let snapshot = state.snapshot().await;
    Json(ApiResponse {
        data: snapshot.facets(),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn get_vehicle(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<VehicleItem>>, ApiError> {
    let snapshot = state.snapshot().await;
    let (index, vehicle) = snapshot
        .find(&key)
        .ok_or_else(|| not_found(&req_id, &key))?;

    Ok(Json(ApiResponse {
        data: VehicleItem::from(ListedVehicle::new(index, vehicle)),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn vehicle_poster(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(key): Path<String>,
) -> Result<Html<String>, ApiError> {
    let snapshot = state.snapshot().await;
    let (_, vehicle) = snapshot
        .find(&key)
        .ok_or_else(|| not_found(&req_id, &key))?;

    let options = PosterOptions {
        dealer_name: state.config.dealer_name.clone(),
        auto_print: false,
    };
    Ok(Html(compose_poster(vehicle, &options)))
}

/// Re-fetches the inventory and swaps it in. On failure the previous
/// snapshot keeps serving.
pub(super) async fn reload_inventory(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ReloadData>>, ApiError> {
    let snapshot = load_snapshot_from_config(&state.client, &state.config)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "inventory reload failed");
            let message = if state.config.exposes_error_details() {
                e.to_string()
            } else {
                "inventory sources are unavailable".to_string()
            };
            ApiError::new(req_id.0.clone(), "source_unavailable", message)
        })?;

    let data = ReloadData {
        vehicles: snapshot.len(),
        source: snapshot.source,
        fell_back: snapshot.fell_back,
        fetched_at: snapshot.fetched_at,
        skipped: snapshot.skipped.clone(),
    };
    state.replace(snapshot).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn not_found(req_id: &RequestId, key: &str) -> ApiError {
    ApiError::new(
        req_id.0.clone(),
        "not_found",
        format!("vehicle '{key}' not found"),
    )
}
