//! Coin market data (USD price, 24h volume, market cap): CoinGecko -> CoinCap

use tracing::warn;

use super::http::{field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, RawSignal};
use crate::utils::constants::{get_coincap_id, get_coingecko_id, json_f64};

pub async fn fetch_coin(ctx: &SourceContext, symbol: &str) -> RawSignal {
    let (Some(gecko_id), Some(coincap_id)) = (get_coingecko_id(symbol), get_coincap_id(symbol)) else {
        warn!(symbol, "⚠️ No market id for symbol");
        return RawSignal::unavailable(Category::Coin);
    };

    primary_or_fallback(
        "coin_market",
        Category::Coin,
        "CoinGecko",
        coingecko_market(ctx, symbol, gecko_id),
        "CoinCap",
        coincap_market(ctx, symbol, coincap_id),
    )
    .await
}

async fn coingecko_market(ctx: &SourceContext, symbol: &str, id: &str) -> AppResult<RawSignal> {
    let url = format!("{}/api/v3/coins/{}", ctx.endpoints.coingecko, id);
    let request = ctx.client.get(&url).query(&[
        ("localization", "false"),
        ("tickers", "false"),
        ("community_data", "false"),
        ("developer_data", "false"),
    ]);
    let payload = send_json("CoinGecko", request).await?;

    let usd = |pointer: &str| -> AppResult<f64> {
        json_f64(field("CoinGecko", &payload, pointer)?)
            .ok_or_else(|| AppError::malformed(format!("CoinGecko `{}` is not a number", pointer)))
    };

    Ok(RawSignal {
        price: Some(usd("/market_data/current_price/usd")?),
        volume: Some(usd("/market_data/total_volume/usd")?),
        market_cap: Some(usd("/market_data/market_cap/usd")?),
        name: payload.get("name").and_then(|v| v.as_str()).map(str::to_string),
        symbol: Some(symbol.to_uppercase()),
        ..Default::default()
    })
}

async fn coincap_market(ctx: &SourceContext, symbol: &str, id: &str) -> AppResult<RawSignal> {
    let url = format!("{}/v2/assets/{}", ctx.endpoints.coincap, id);
    let payload = send_json("CoinCap", ctx.client.get(&url)).await?;

    // CoinCap sends every number as a string
    let usd = |pointer: &str| -> AppResult<f64> {
        json_f64(field("CoinCap", &payload, pointer)?)
            .ok_or_else(|| AppError::malformed(format!("CoinCap `{}` is not a number", pointer)))
    };

    Ok(RawSignal {
        price: Some(usd("/data/priceUsd")?),
        volume: Some(usd("/data/volumeUsd24Hr")?),
        market_cap: Some(usd("/data/marketCapUsd")?),
        name: payload.pointer("/data/name").and_then(|v| v.as_str()).map(str::to_string),
        symbol: Some(symbol.to_uppercase()),
        ..Default::default()
    })
}
