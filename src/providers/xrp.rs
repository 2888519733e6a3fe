//! XRP wallet balance: XRPScan (already in XRP) -> rippled `account_info` (drops, 1e6)

use serde_json::json;

use super::http::{base_unit_balance, field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, Network, RawSignal};
use crate::utils::constants::json_f64;

pub async fn fetch_wallet(ctx: &SourceContext, address: &str) -> RawSignal {
    primary_or_fallback(
        "xrp_wallet",
        Category::Wallet,
        "XRPScan",
        xrpscan_balance(ctx, address),
        "rippled",
        rippled_balance(ctx, address),
    )
    .await
}

async fn xrpscan_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/api/v1/account/{}", ctx.endpoints.xrpscan, address);
    let payload = send_json("XRPScan", ctx.client.get(&url)).await?;

    let xrp = json_f64(field("XRPScan", &payload, "/xrpBalance")?)
        .filter(|v| *v >= 0.0)
        .ok_or_else(|| AppError::malformed("XRPScan `xrpBalance` is not a number"))?;
    Ok(RawSignal::balance(xrp))
}

async fn rippled_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/", ctx.endpoints.rippled);
    let body = json!({
        "method": "account_info",
        "params": [{ "account": address, "ledger_index": "validated" }]
    });
    let payload = send_json("rippled", ctx.client.post(&url).json(&body)).await?;

    let drops = field("rippled", &payload, "/result/account_data/Balance")?;
    Ok(RawSignal::balance(base_unit_balance("rippled", drops, Network::Xrp)?))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx_at;
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDR: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    #[tokio::test]
    async fn test_xrpscan_primary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/account/{}", ADDR)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "xrpBalance": "42.5" })))
            .mount(&server)
            .await;

        let signal = fetch_wallet(&ctx_at(&server.uri()), ADDR).await;
        assert_eq!(signal.balance, Some(42.5));
    }

    #[tokio::test]
    async fn test_rippled_fallback_converts_drops() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": { "account_data": { "Balance": "25000000" }, "status": "success" }
            })))
            .mount(&server)
            .await;

        let signal = fetch_wallet(&ctx_at(&server.uri()), ADDR).await;
        assert_eq!(signal.balance, Some(25.0));
        assert_eq!(signal.source.as_deref(), Some("rippled"));
    }
}
