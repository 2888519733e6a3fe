//! Bitcoin wallet balance: BlockCypher -> Blockstream (satoshi, 1e8)

use super::http::{base_unit_balance, field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, Network, RawSignal};
use crate::utils::constants::{json_u64, network_units_to_float};

pub async fn fetch_wallet(ctx: &SourceContext, address: &str) -> RawSignal {
    primary_or_fallback(
        "bitcoin_wallet",
        Category::Wallet,
        "BlockCypher",
        blockcypher_balance(ctx, address),
        "Blockstream",
        blockstream_balance(ctx, address),
    )
    .await
}

async fn blockcypher_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/v1/btc/main/addrs/{}/balance", ctx.endpoints.blockcypher, address);
    let payload = send_json("BlockCypher", ctx.client.get(&url)).await?;
    let sats = field("BlockCypher", &payload, "/final_balance")?;
    Ok(RawSignal::balance(base_unit_balance("BlockCypher", sats, Network::Bitcoin)?))
}

/// Confirmed balance = funded - spent
async fn blockstream_balance(ctx: &SourceContext, address: &str) -> AppResult<RawSignal> {
    let url = format!("{}/api/address/{}", ctx.endpoints.blockstream, address);
    let payload = send_json("Blockstream", ctx.client.get(&url)).await?;

    let funded = json_u64(field("Blockstream", &payload, "/chain_stats/funded_txo_sum")?);
    let spent = json_u64(field("Blockstream", &payload, "/chain_stats/spent_txo_sum")?);
    let sats = funded
        .zip(spent)
        .and_then(|(f, s)| f.checked_sub(s))
        .ok_or_else(|| AppError::malformed("Blockstream chain_stats are not consistent integers"))?;

    let btc = network_units_to_float(&sats.to_string(), Network::Bitcoin)
        .ok_or_else(|| AppError::malformed("Blockstream balance conversion failed"))?;
    Ok(RawSignal::balance(btc))
}
