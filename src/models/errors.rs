//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so degraded results can be
//! traced in logs.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - UPSTREAM_xxx: third-party chain / market API failures
//! - CFG_xxx: configuration errors
//! - API_xxx: HTTP surface errors

use std::fmt;

/// Crate-wide error: a stable code, a message for logs, and the cause if any
#[derive(Debug)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Keep the underlying error reachable through `Error::source`
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(cause)),
            ..Self::new(code, message)
        }
    }

    /// Stable code string, used as the `code` field in logs and API errors
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// True when the fetcher should swallow this and fall back / degrade
    pub fn degrades_signal(&self) -> bool {
        self.code.degrades_signal()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Upstream Errors
    // ============================================
    /// Source unreachable or answered non-2xx
    UpstreamUnavailable,
    /// Source did not answer within the configured timeout
    UpstreamTimeout,
    /// Source answered HTTP 429
    UpstreamRateLimited,
    /// Source answered 2xx but the payload lacked the expected fields
    MalformedUpstreamPayload,

    // ============================================
    // Pipeline Errors
    // ============================================
    /// Input matched no supported grammar
    UnsupportedInput,
    /// Arithmetic fault while scoring (non-finite or negative signal)
    ScoringFault,

    // ============================================
    // Collaborator / Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Usage log could not be written or read
    UsageStoreFailed,
    /// Denylist file could not be loaded
    BlacklistLoadFailed,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            Self::MalformedUpstreamPayload => "UPSTREAM_MALFORMED_PAYLOAD",

            Self::UnsupportedInput => "UNSUPPORTED_INPUT",
            Self::ScoringFault => "SCORING_FAULT",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::UsageStoreFailed => "USAGE_STORE_FAILED",
            Self::BlacklistLoadFailed => "BLACKLIST_LOAD_FAILED",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::ConfigInvalidValue => 400,
            Self::UpstreamRateLimited => 429,
            Self::UpstreamUnavailable | Self::MalformedUpstreamPayload => 502,
            Self::UpstreamTimeout => 504,
            _ => 500,
        }
    }

    /// Upstream failures are absorbed by the fetcher: they degrade the
    /// signal instead of reaching the caller.
    pub fn degrades_signal(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable
                | Self::UpstreamTimeout
                | Self::UpstreamRateLimited
                | Self::MalformedUpstreamPayload
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Upstream source unreachable / non-2xx
    pub fn upstream_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, msg)
    }

    /// Upstream payload missing the expected field
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedUpstreamPayload, msg)
    }

    /// Upstream rate limited
    pub fn rate_limited(source: &str) -> Self {
        Self::new(
            ErrorCode::UpstreamRateLimited,
            format!("{} rate limited (HTTP 429)", source),
        )
    }

    /// Scoring arithmetic fault
    pub fn scoring_fault(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScoringFault, msg)
    }

    /// Usage store failure
    pub fn usage_store(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UsageStoreFailed, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::UpstreamTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::UpstreamUnavailable, "Connection failed")
        } else if err.is_decode() {
            Self::new(ErrorCode::MalformedUpstreamPayload, err.to_string())
        } else {
            Self::new(ErrorCode::UpstreamUnavailable, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::MalformedUpstreamPayload, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::malformed("missing `result`");
        assert_eq!(err.code, ErrorCode::MalformedUpstreamPayload);
        assert_eq!(err.code_str(), "UPSTREAM_MALFORMED_PAYLOAD");
        assert_eq!(err.to_string(), "[UPSTREAM_MALFORMED_PAYLOAD] missing `result`");
    }

    #[test]
    fn test_degrades_signal() {
        assert!(ErrorCode::UpstreamTimeout.degrades_signal());
        assert!(ErrorCode::MalformedUpstreamPayload.degrades_signal());
        assert!(ErrorCode::UpstreamRateLimited.degrades_signal());
        assert!(!ErrorCode::UsageStoreFailed.degrades_signal());
        assert!(!ErrorCode::ScoringFault.degrades_signal());
    }

    #[test]
    fn test_missing_key_is_not_an_outage() {
        let err = AppError::invalid_config("Helius needs HELIUS_API_KEY");
        assert!(!err.degrades_signal());
        assert!(AppError::rate_limited("Etherscan").degrades_signal());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ApiBadRequest.http_status(), 400);
        assert_eq!(ErrorCode::UpstreamRateLimited.http_status(), 429);
        assert_eq!(ErrorCode::UpstreamTimeout.http_status(), 504);
        assert_eq!(ErrorCode::UsageStoreFailed.http_status(), 500);
    }

    #[test]
    fn test_json_error_is_malformed_payload() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::MalformedUpstreamPayload);
        assert!(std::error::Error::source(&err).is_some());
    }
}
