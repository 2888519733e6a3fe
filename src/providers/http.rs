//! HTTP plumbing shared by every source
//!
//! - One `reqwest::Client` with User-Agent, gzip and a hard timeout
//! - JSON fetch mapping 429 / non-2xx / bad JSON onto `AppError` codes
//! - The primary -> fallback combinator (exactly two attempts)

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{Category, Network, RawSignal};
use crate::utils::constants::{json_base_units, network_units_to_float, USER_AGENT};

/// Build the shared client. Every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> AppResult<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .gzip(true)
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(|e| AppError::with_source(ErrorCode::ConfigInvalidValue, "failed to build HTTP client", e))
}

/// Send a request and decode a 2xx JSON body
pub async fn send_json(source: &str, request: RequestBuilder) -> AppResult<Value> {
    let response = request.send().await.map_err(|e| {
        let err = AppError::from(e);
        AppError::new(err.code, format!("{}: {}", source, err.message))
    })?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(AppError::rate_limited(source));
    }
    if !status.is_success() {
        return Err(AppError::upstream_unavailable(format!(
            "{} returned HTTP {}",
            source, status
        )));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        AppError::with_source(
            ErrorCode::MalformedUpstreamPayload,
            format!("{} returned invalid JSON", source),
            e,
        )
    })
}

/// Required field by JSON pointer; missing or null is a malformed payload
pub fn field<'a>(source: &str, value: &'a Value, pointer: &str) -> AppResult<&'a Value> {
    match value.pointer(pointer) {
        Some(Value::Null) | None => Err(AppError::malformed(format!(
            "{} payload missing `{}`",
            source, pointer
        ))),
        Some(v) => Ok(v),
    }
}

/// Required integer base-unit amount converted with the network's divisor
pub fn base_unit_balance(source: &str, value: &Value, network: Network) -> AppResult<f64> {
    json_base_units(value)
        .and_then(|raw| network_units_to_float(&raw, network))
        .ok_or_else(|| {
            AppError::malformed(format!("{} returned a non-integer {} amount: {}", source, network, value))
        })
}

/// Try `primary`, then `fallback` once. Never fails: when both sources fail
/// the result is `RawSignal::unavailable`. `fallback` is only polled after
/// `primary` failed.
pub async fn primary_or_fallback<P, F>(
    label: &str,
    category: Category,
    primary_name: &str,
    primary: P,
    fallback_name: &str,
    fallback: F,
) -> RawSignal
where
    P: Future<Output = AppResult<RawSignal>>,
    F: Future<Output = AppResult<RawSignal>>,
{
    match primary.await {
        Ok(signal) => {
            debug!(label, source = primary_name, "✅ Primary source answered");
            return signal.with_source(primary_name);
        }
        Err(e) if e.degrades_signal() => {
            warn!(
                label,
                source = primary_name,
                code = e.code_str(),
                "⚠️ Primary source failed: {}",
                e.message
            );
        }
        // not an outage (missing key, bad local setup): louder, same fallback
        Err(e) => {
            error!(
                label,
                source = primary_name,
                code = e.code_str(),
                "❌ Primary source unusable: {}",
                e.message
            );
        }
    }

    info!(label, source = fallback_name, "🔄 Trying fallback source");
    match fallback.await {
        Ok(signal) => {
            info!(label, source = fallback_name, "✅ Fallback source answered");
            signal.with_source(fallback_name)
        }
        Err(e) => {
            warn!(
                label,
                source = fallback_name,
                code = e.code_str(),
                "❌ Both sources failed, returning degraded signal: {}",
                e.message
            );
            RawSignal::unavailable(category)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fallback_not_polled_when_primary_succeeds() {
        let calls = AtomicUsize::new(0);
        let signal = primary_or_fallback(
            "test",
            Category::Wallet,
            "A",
            async { Ok::<_, AppError>(RawSignal::balance(1.0)) },
            "B",
            async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AppError>(RawSignal::balance(2.0))
            },
        )
        .await;

        assert_eq!(signal.balance, Some(1.0));
        assert_eq!(signal.source.as_deref(), Some("A"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_used_on_primary_error() {
        let signal = primary_or_fallback(
            "test",
            Category::Wallet,
            "A",
            async { Err::<RawSignal, _>(AppError::malformed("no result")) },
            "B",
            async { Ok::<_, AppError>(RawSignal::balance(2.0)) },
        )
        .await;

        assert_eq!(signal.balance, Some(2.0));
        assert_eq!(signal.source.as_deref(), Some("B"));
        assert!(!signal.unavailable);
    }

    #[tokio::test]
    async fn test_both_failing_degrades() {
        let signal = primary_or_fallback(
            "test",
            Category::Token,
            "A",
            async { Err::<RawSignal, _>(AppError::upstream_unavailable("down")) },
            "B",
            async { Err::<RawSignal, _>(AppError::rate_limited("B")) },
        )
        .await;

        assert!(signal.unavailable);
        assert_eq!(signal.holders, None);
        assert_eq!(signal.source, None);
    }

    #[test]
    fn test_field_rejects_missing_and_null() {
        let payload = json!({"result": null, "data": [{"balance": 5}]});
        assert!(field("X", &payload, "/result").is_err());
        assert!(field("X", &payload, "/missing").is_err());
        assert_eq!(field("X", &payload, "/data/0/balance").unwrap(), &json!(5));
    }

    #[test]
    fn test_base_unit_balance() {
        let wei = json!("1000000000000000000");
        assert_eq!(base_unit_balance("X", &wei, Network::Ethereum).unwrap(), 1.0);

        let err = base_unit_balance("X", &json!("Max rate limit reached"), Network::Ethereum).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedUpstreamPayload);
    }
}
