//! Solana wallet balance: Helius -> Solscan (lamports, 1e9)

use super::http::{base_unit_balance, field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, Network, RawSignal};

pub async fn fetch_wallet(ctx: &SourceContext, address: &str) -> RawSignal {
    primary_or_fallback(
        "solana_wallet",
        Category::Wallet,
        "Helius",
        helius_balance(ctx, address),
        "Solscan",
        solscan_balance(ctx, address),
    )
    .await
}

async fn helius_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let key = ctx
        .keys
        .helius
        .as_deref()
        .ok_or_else(|| AppError::invalid_config("Helius needs HELIUS_API_KEY"))?;

    let url = format!("{}/v0/addresses/{}/balances", ctx.endpoints.helius, address);
    let request = ctx.client.get(&url).query(&[("api-key", key)]);
    let payload = send_json("Helius", request).await?;

    let lamports = field("Helius", &payload, "/nativeBalance")?;
    Ok(RawSignal::balance(base_unit_balance("Helius", lamports, Network::Solana)?))
}

async fn solscan_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/account/{}", ctx.endpoints.solscan, address);
    let payload = send_json("Solscan", ctx.client.get(&url)).await?;

    let lamports = field("Solscan", &payload, "/lamports")?;
    Ok(RawSignal::balance(base_unit_balance("Solscan", lamports, Network::Solana)?))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx_at;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDR: &str = "DRpbCBMxVnDK7maPM5tGv6MvB3v1sRMC86PZ8okm21hy";

    #[tokio::test]
    async fn test_helius_with_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v0/addresses/{}/balances", ADDR)))
            .and(query_param("api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nativeBalance": 2_000_000_000u64 })))
            .mount(&server)
            .await;

        let mut ctx = ctx_at(&server.uri());
        ctx.keys.helius = Some("test-key".to_string());
        let signal = fetch_wallet(&ctx, ADDR).await;
        assert_eq!(signal.balance, Some(2.0));
        assert_eq!(signal.source.as_deref(), Some("Helius"));
    }

    #[tokio::test]
    async fn test_missing_key_goes_straight_to_solscan() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v0/addresses/{}/balances", ADDR)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nativeBalance": 1 })))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/account/{}", ADDR)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "lamports": 500_000_000u64 })))
            .mount(&server)
            .await;

        let signal = fetch_wallet(&ctx_at(&server.uri()), ADDR).await;
        assert_eq!(signal.balance, Some(0.5));
        assert_eq!(signal.source.as_deref(), Some("Solscan"));
    }
}
