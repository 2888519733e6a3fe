//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::core::pipeline::Resolution;
use crate::core::risk_score::RiskScore;
use crate::models::errors::AppError;
use crate::models::types::AssetResult;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message,
        }
    }
}

// ============================================
// Scan
// ============================================

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub asset: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub asset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScanData {
    #[serde(flatten)]
    pub result: AssetResult,
    pub risk: RiskScoreResponse,
    /// Usage total after this scan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
}

impl From<Resolution> for ScanData {
    fn from(resolution: Resolution) -> Self {
        Self {
            risk: RiskScoreResponse::from(&resolution.risk),
            result: resolution.result,
            usage_count: resolution.usage_total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RiskScoreResponse {
    pub total: u8,
    pub level: String,
    pub recommendation: String,
    pub color: String,
    pub strategy: String,
    pub reason: String,
}

impl From<&RiskScore> for RiskScoreResponse {
    fn from(score: &RiskScore) -> Self {
        Self {
            total: score.total,
            level: score.level().to_string(),
            recommendation: score.recommendation(),
            color: score.color_code().to_string(),
            strategy: score.strategy.as_str().to_string(),
            reason: score.reason.clone(),
        }
    }
}

// ============================================
// Health & Stats
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub total_scans: u64,
    pub uptime_seconds: u64,
}
