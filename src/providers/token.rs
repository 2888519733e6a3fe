//! ERC-20 token facts (name, symbol, holders): Etherscan `tokeninfo` -> Ethplorer

use serde_json::Value;
use tracing::debug;

use super::evm::ensure_scan_ok;
use super::http::{field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, RawSignal};
use crate::utils::constants::json_u64;

pub async fn fetch_token(ctx: &SourceContext, contract: &str) -> RawSignal {
    if let Some(signal) = ctx.take_token(contract) {
        debug!(contract, "♻️ Reusing token info from classification");
        return signal.with_source("Etherscan");
    }

    primary_or_fallback(
        "token_info",
        Category::Token,
        "Etherscan",
        etherscan_token_info(ctx, contract),
        "Ethplorer",
        ethplorer_token_info(ctx, contract),
    )
    .await
}

/// Also used by the EVM resolver: a named token here means the address is a Token
pub async fn etherscan_token_info(ctx: &SourceContext, contract: &str) -> AppResult<RawSignal> {
    let url = format!("{}/api", ctx.endpoints.etherscan);
    let request = ctx.client.get(&url).query(&[
        ("module", "token"),
        ("action", "tokeninfo"),
        ("contractaddress", contract),
        ("apikey", ctx.keys.etherscan.as_deref().unwrap_or("")),
    ]);
    let payload = send_json("Etherscan", request).await?;
    ensure_scan_ok("Etherscan", &payload)?;

    let info = field("Etherscan", &payload, "/result/0")?;
    Ok(RawSignal {
        name: text(info, "tokenName"),
        symbol: text(info, "symbol"),
        holders: info.get("holdersCount").and_then(json_u64),
        total_supply: text(info, "totalSupply"),
        ..Default::default()
    })
}

async fn ethplorer_token_info(ctx: &SourceContext, contract: &str) -> AppResult<RawSignal> {
    let url = format!("{}/getTokenInfo/{}", ctx.endpoints.ethplorer, contract);
    let request = ctx.client.get(&url).query(&[("apiKey", ctx.keys.ethplorer.as_str())]);
    let payload = send_json("Ethplorer", request).await?;

    if let Some(err) = payload.get("error") {
        return Err(AppError::malformed(format!("Ethplorer error: {}", err)));
    }

    let holders = json_u64(field("Ethplorer", &payload, "/holdersCount")?);
    Ok(RawSignal {
        name: text(&payload, "name"),
        symbol: text(&payload, "symbol"),
        holders,
        total_supply: text(&payload, "totalSupply"),
        ..Default::default()
    })
}

/// Non-empty string (or number rendered as string) under `key`
pub(crate) fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
