//! Axelar wallet balance via Cosmos bank module on two LCD endpoints (uaxl, 1e6)

use serde_json::Value;

use super::http::{base_unit_balance, field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, Network, RawSignal};
use crate::utils::constants::AXELAR_DENOM;

pub async fn fetch_wallet(ctx: &SourceContext, address: &str) -> RawSignal {
    primary_or_fallback(
        "axelar_wallet",
        Category::Wallet,
        "Axelar LCD",
        bank_balance(ctx, "Axelar LCD", &ctx.endpoints.axelar_lcd, address),
        "Axelar LCD (fallback)",
        bank_balance(ctx, "Axelar LCD (fallback)", &ctx.endpoints.axelar_lcd_fallback, address),
    )
    .await
}

/// An account holding no `uaxl` has a zero balance
async fn bank_balance(ctx: &SourceContext, source: &str, base: &str, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/cosmos/bank/v1beta1/balances/{}", base, address);
    let payload = send_json(source, ctx.client.get(&url)).await?;

    let balances = field(source, &payload, "/balances")?
        .as_array()
        .ok_or_else(|| AppError::malformed(format!("{} `balances` is not an array", source)))?;

    let coin = balances
        .iter()
        .find(|c| c.get("denom").and_then(Value::as_str) == Some(AXELAR_DENOM));

    let amount = match coin {
        Some(coin) => base_unit_balance(source, field(source, coin, "/amount")?, Network::Axelar)?,
        None => 0.0,
    };
    Ok(RawSignal::balance(amount))
}
