mod vehicles;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use lotview_core::{AppConfig, InventorySnapshot, SourceKind};
use lotview_source::InventoryClient;
use serde::Serialize;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, RequestId};

/// Shared handler state.
///
/// The snapshot is swapped wholesale on reload; handlers clone the inner
/// `Arc` and release the lock before doing any work.
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<RwLock<Arc<InventorySnapshot>>>,
    pub client: Arc<InventoryClient>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(snapshot: InventorySnapshot, client: InventoryClient, config: AppConfig) -> Self {
        Self {
            inventory: Arc::new(RwLock::new(Arc::new(snapshot))),
            client: Arc::new(client),
            config: Arc::new(config),
        }
    }

    pub(crate) async fn snapshot(&self) -> Arc<InventorySnapshot> {
        Arc::clone(&*self.inventory.read().await)
    }

    pub(crate) async fn replace(&self, snapshot: InventorySnapshot) {
        *self.inventory.write().await = Arc::new(snapshot);
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    vehicles: usize,
    source: SourceKind,
    fell_back: bool,
    fetched_at: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "source_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/vehicles", get(vehicles::list_vehicles))
        .route("/api/v1/vehicles/facets", get(vehicles::vehicle_facets))
        .route("/api/v1/vehicles/{key}", get(vehicles::get_vehicle))
        .route("/api/v1/vehicles/{key}/poster", get(vehicles::vehicle_poster))
        .route("/api/v1/inventory/reload", post(vehicles::reload_inventory))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let snapshot = state.snapshot().await;
    Json(ApiResponse {
        data: HealthData {
            status: if snapshot.is_empty() { "empty" } else { "ok" },
            vehicles: snapshot.len(),
            source: snapshot.source,
            fell_back: snapshot.fell_back,
            fetched_at: snapshot.fetched_at,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
