//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::logging_middleware;
use crate::utils::constants::MAX_IN_FLIGHT_SCANS;

/// Routes that hit upstream sources; capped so a burst cannot fan out unbounded
fn scan_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/scan", post(handlers::scan_asset))
        .route("/export-iso", get(handlers::export_iso))
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_SCANS))
}

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .merge(scan_routes());

    Router::new()
        .nest("/v1", api_v1)
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // bottom layer runs first
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
