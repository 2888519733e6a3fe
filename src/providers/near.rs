//! NEAR wallet balance via `view_account` on two RPC providers (yoctoNEAR, 1e24)

use serde_json::json;

use super::http::{base_unit_balance, field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, Network, RawSignal};

pub async fn fetch_wallet(ctx: &SourceContext, account_id: &str) -> RawSignal {
    primary_or_fallback(
        "near_wallet",
        Category::Wallet,
        "NEAR RPC",
        view_account(ctx, "NEAR RPC", &ctx.endpoints.near_rpc, account_id),
        "NEAR RPC (fallback)",
        view_account(ctx, "NEAR RPC (fallback)", &ctx.endpoints.near_rpc_fallback, account_id),
    )
    .await
}

async fn view_account(ctx: &SourceContext, source: &str, base: &str, account_id: &str) -> AppResult<RawSignal> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": "asset_guard",
        "method": "query",
        "params": {
            "request_type": "view_account",
            "finality": "final",
            "account_id": account_id
        }
    });
    let payload = send_json(source, ctx.client.post(base).json(&body)).await?;

    // JSON-RPC errors arrive with HTTP 200
    if let Some(err) = payload.get("error") {
        return Err(AppError::malformed(format!("{} error: {}", source, err)));
    }

    let yocto = field(source, &payload, "/result/amount")?;
    Ok(RawSignal::balance(base_unit_balance(source, yocto, Network::Near)?))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx_at;
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_view_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": "asset_guard",
                "result": { "amount": "3500000000000000000000000", "locked": "0" }
            })))
            .mount(&server)
            .await;

        let signal = fetch_wallet(&ctx_at(&server.uri()), "alice.near").await;
        assert!((signal.balance.unwrap() - 3.5).abs() < 1e-9);
        assert_eq!(signal.source.as_deref(), Some("NEAR RPC"));
    }

    #[tokio::test]
    async fn test_rpc_error_uses_second_provider() {
        let primary = MockServer::start().await;
        let fallback = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": "asset_guard",
                "error": { "name": "HANDLER_ERROR", "cause": { "name": "UNKNOWN_ACCOUNT" } }
            })))
            .mount(&primary)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": { "amount": "1000000000000000000000000" }
            })))
            .mount(&fallback)
            .await;

        let mut ctx = ctx_at(&primary.uri());
        ctx.endpoints.near_rpc_fallback = fallback.uri();
        let signal = fetch_wallet(&ctx, "alice.near").await;
        assert_eq!(signal.balance, Some(1.0));
        assert_eq!(signal.source.as_deref(), Some("NEAR RPC (fallback)"));
    }
}
