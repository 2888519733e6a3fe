//! API Request Handlers

use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::types::*;
use crate::core::pipeline::AssetPipeline;
use crate::models::errors::AppError;
use crate::utils::constants::APP_VERSION;
use crate::utils::report::IsoReport;

type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

/// Shared application state
pub struct AppState {
    pub pipeline: AssetPipeline,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: AssetPipeline) -> Self {
        Self {
            pipeline,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn failure(err: AppError, start: Instant) -> ApiFailure {
    let status = StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiResponse::error(err.into(), elapsed_ms(start))))
}

/// Non-empty asset or a 400
fn required_asset(asset: Option<&str>, start: Instant) -> Result<String, ApiFailure> {
    match asset.map(str::trim) {
        Some(a) if !a.is_empty() => Ok(a.to_string()),
        _ => Err(failure(AppError::bad_request("`asset` is required"), start)),
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Scan
// ============================================

pub async fn scan_asset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ApiResponse<ScanData>>, ApiFailure> {
    let start = Instant::now();
    let asset = required_asset(Some(&req.asset), start)?;

    let resolution = state.pipeline.resolve_detailed(&asset).await;
    info!(
        asset = %asset,
        score = resolution.result.risk_score,
        "🔍 Scan served"
    );

    Ok(Json(ApiResponse::success(ScanData::from(resolution), elapsed_ms(start))))
}

// ============================================
// ISO 20022 Export
// ============================================

pub async fn export_iso(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiFailure> {
    let start = Instant::now();
    let asset = required_asset(query.asset.as_deref(), start)?;

    // exports re-render a result; they are not counted as scans
    let result = state.pipeline.preview(&asset).await;
    let report = IsoReport::from_result(&result);

    let headers = [
        (header::CONTENT_TYPE, "application/xml; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.file_name()),
        ),
    ];
    Ok((headers, report.to_xml()).into_response())
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StatsData>>, ApiFailure> {
    let start = Instant::now();

    let total_scans = match state.pipeline.usage().cloned() {
        Some(usage) => tokio::task::spawn_blocking(move || usage.read())
            .await
            .map_err(|e| AppError::internal(format!("usage read task failed: {}", e)))
            .and_then(|read| read)
            .map_err(|e| {
                error!(code = e.code_str(), "❌ Usage store read failed: {}", e.message);
                failure(AppError::internal("usage store unavailable"), start)
            })?,
        None => 0,
    };

    let data = StatsData {
        total_scans,
        uptime_seconds: state.uptime_seconds(),
    };
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}
