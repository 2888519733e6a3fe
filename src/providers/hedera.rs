//! Hedera wallet balance: mirror node account -> mirror node balances (tinybar, 1e8)

use super::http::{base_unit_balance, field, primary_or_fallback, send_json};
use super::SourceContext;
use crate::models::errors::AppResult;
use crate::models::types::{Category, Network, RawSignal};

pub async fn fetch_wallet(ctx: &SourceContext, account: &str) -> RawSignal {
    primary_or_fallback(
        "hedera_wallet",
        Category::Wallet,
        "Hedera mirror (accounts)",
        account_balance(ctx, account),
        "Hedera mirror (balances)",
        balances_lookup(ctx, account),
    )
    .await
}

async fn account_balance(ctx: &SourceContext, account: &str) -> AppResult<RawSignal> {
    let url = format!("{}/api/v1/accounts/{}", ctx.endpoints.hedera_mirror, account);
    let payload = send_json("Hedera mirror", ctx.client.get(&url)).await?;
    let tinybar = field("Hedera mirror", &payload, "/balance/balance")?;
    Ok(RawSignal::balance(base_unit_balance("Hedera mirror", tinybar, Network::Hedera)?))
}

async fn balances_lookup(ctx: &SourceContext, account: &str) -> AppResult<RawSignal> {
    let url = format!("{}/api/v1/balances", ctx.endpoints.hedera_mirror_fallback);
    let request = ctx.client.get(&url).query(&[("account.id", account)]);
    let payload = send_json("Hedera balances", request).await?;
    let tinybar = field("Hedera balances", &payload, "/balances/0/balance")?;
    Ok(RawSignal::balance(base_unit_balance("Hedera balances", tinybar, Network::Hedera)?))
}
