//! EVM wallet balances (Ethereum, Polygon)
//!
//! Ethereum: Etherscan -> Blockchair. Polygon: Polygonscan -> Covalent.
//! All amounts are wei (1e18).

use serde_json::Value;

use super::http::{base_unit_balance, field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, Network, RawSignal};
use crate::utils::constants::POLYGON_CHAIN_ID;

pub async fn fetch_ethereum_wallet(ctx: &SourceContext, address: &str) -> RawSignal {
    primary_or_fallback(
        "ethereum_wallet",
        Category::Wallet,
        "Etherscan",
        scan_balance(ctx, "Etherscan", &ctx.endpoints.etherscan, ctx.keys.etherscan.as_deref(), address, Network::Ethereum),
        "Blockchair",
        blockchair_balance(ctx, address),
    )
    .await
}

pub async fn fetch_polygon_wallet(ctx: &SourceContext, address: &str) -> RawSignal {
    primary_or_fallback(
        "polygon_wallet",
        Category::Wallet,
        "Polygonscan",
        scan_balance(ctx, "Polygonscan", &ctx.endpoints.polygonscan, ctx.keys.polygonscan.as_deref(), address, Network::Polygon),
        "Covalent",
        covalent_balance(ctx, address),
    )
    .await
}

/// Etherscan-family `account/balance`. `status != "1"` means `result` holds
/// an error message, not an amount.
async fn scan_balance(
    ctx: &SourceContext,
    source: &str,
    base: &str,
    api_key: Option<&str>,
    address: &str,
    network: Network,
) -> AppResult<RawSignal> {
    let url = format!("{}/api", base);
    let request = ctx.client.get(&url).query(&[
        ("module", "account"),
        ("action", "balance"),
        ("address", address),
        ("tag", "latest"),
        ("apikey", api_key.unwrap_or("")),
    ]);
    let payload = send_json(source, request).await?;

    ensure_scan_ok(source, &payload)?;
    let balance = base_unit_balance(source, field(source, &payload, "/result")?, network)?;
    Ok(RawSignal::balance(balance))
}

pub(crate) fn ensure_scan_ok(source: &str, payload: &Value) -> AppResult<()> {
    match payload.get("status").and_then(Value::as_str) {
        Some("1") => Ok(()),
        _ => Err(AppError::malformed(format!(
            "{} answered status {}: {}",
            source,
            payload.get("status").unwrap_or(&Value::Null),
            payload.get("result").unwrap_or(&Value::Null)
        ))),
    }
}

async fn blockchair_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/ethereum/dashboards/address/{}", ctx.endpoints.blockchair, address);
    let payload = send_json("Blockchair", ctx.client.get(&url)).await?;

    // `data` is keyed by the (lowercased) address
    let entry = field("Blockchair", &payload, "/data")?
        .as_object()
        .and_then(|data| data.values().next())
        .ok_or_else(|| AppError::malformed("Blockchair payload has empty `data`"))?;

    let balance = base_unit_balance("Blockchair", field("Blockchair", entry, "/address/balance")?, Network::Ethereum)?;
    Ok(RawSignal::balance(balance))
}

async fn covalent_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!(
        "{}/v1/{}/address/{}/balances_v2/",
        ctx.endpoints.covalent, POLYGON_CHAIN_ID, address
    );
    let mut request = ctx.client.get(&url);
    if let Some(key) = ctx.keys.covalent.as_deref() {
        request = request.query(&[("key", key)]);
    }
    let payload = send_json("Covalent", request).await?;

    let native = field("Covalent", &payload, "/data/items")?
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .find(|item| item.get("native_token").and_then(Value::as_bool) == Some(true))
        })
        .ok_or_else(|| AppError::malformed("Covalent payload has no native token item"))?;

    let balance = base_unit_balance("Covalent", field("Covalent", native, "/balance")?, Network::Polygon)?;
    Ok(RawSignal::balance(balance))
}
