//! TRON wallet balance: TronGrid -> Tronscan (sun, 1e6)

use super::http::{base_unit_balance, field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::AppResult;
use crate::models::types::{Category, Network, RawSignal};

pub async fn fetch_wallet(ctx: &SourceContext, address: &str) -> RawSignal {
    primary_or_fallback(
        "tron_wallet",
        Category::Wallet,
        "TronGrid",
        trongrid_balance(ctx, address),
        "Tronscan",
        tronscan_balance(ctx, address),
    )
    .await
}

async fn trongrid_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/v1/accounts/{}", ctx.endpoints.trongrid, address);
    let payload = send_json("TronGrid", ctx.client.get(&url)).await?;
    let sun = field("TronGrid", &payload, "/data/0/balance")?;
    Ok(RawSignal::balance(base_unit_balance("TronGrid", sun, Network::Tron)?))
}

async fn tronscan_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/api/account", ctx.endpoints.tronscan);
    let request = ctx.client.get(&url).query(&[("address", address)]);
    let payload = send_json("Tronscan", request).await?;
    let sun = field("Tronscan", &payload, "/balance")?;
    Ok(RawSignal::balance(base_unit_balance("Tronscan", sun, Network::Tron)?))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx_at;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDR: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

    #[tokio::test]
    async fn test_trongrid_primary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/accounts/{}", ADDR)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "data": [{ "balance": 12_500_000u64 }]
            })))
            .mount(&server)
            .await;

        let signal = fetch_wallet(&ctx_at(&server.uri()), ADDR).await;
        assert_eq!(signal.balance, Some(12.5));
        assert_eq!(signal.source.as_deref(), Some("TronGrid"));
    }

    #[tokio::test]
    async fn test_inactive_account_falls_back_to_tronscan() {
        let server = MockServer::start().await;
        // Unactivated accounts come back with an empty `data` array
        Mock::given(method("GET"))
            .and(path(format!("/v1/accounts/{}", ADDR)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/account"))
            .and(query_param("address", ADDR))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "balance": 0 })))
            .mount(&server)
            .await;

        let signal = fetch_wallet(&ctx_at(&server.uri()), ADDR).await;
        assert_eq!(signal.balance, Some(0.0));
        assert_eq!(signal.source.as_deref(), Some("Tronscan"));
        assert!(!signal.unavailable);
    }
}
