//! Asset Resolution Pipeline
//!
//! Guard -> Classifier -> Fetcher -> Scorer, assembled into one
//! `AssetResult`. `resolve` never fails: every error is absorbed into a
//! degraded or fixed-score result.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::core::classifier::{classify_with, EvmResolver};
use crate::core::guard::{is_blocked, BlacklistStore, StaticBlacklist};
use crate::core::risk_score::RiskScore;
use crate::models::config::ScannerConfig;
use crate::models::errors::{AppResult, ErrorCode};
use crate::models::types::{AssetQuery, AssetResult, Category, Network, RawSignal};
use crate::providers::{ChainFetcher, HttpChainFetcher, HttpEvmResolver, SourceContext};
use crate::utils::usage::{CsvUsageLog, UsageStore};

/// A resolved query with its scoring breakdown
#[derive(Debug, Clone)]
pub struct Resolution {
    pub result: AssetResult,
    pub risk: RiskScore,
    /// Usage total after this scan; `None` when not recorded
    pub usage_total: Option<u64>,
    pub latency_ms: u64,
}

/// Single entry point for callers (CLI, HTTP API)
#[derive(Clone)]
pub struct AssetPipeline {
    blacklist: Arc<dyn BlacklistStore>,
    fetcher: Arc<dyn ChainFetcher>,
    evm_resolver: Arc<dyn EvmResolver>,
    usage: Option<Arc<dyn UsageStore>>,
}

impl AssetPipeline {
    pub fn new(
        blacklist: Arc<dyn BlacklistStore>,
        fetcher: Arc<dyn ChainFetcher>,
        evm_resolver: Arc<dyn EvmResolver>,
    ) -> Self {
        Self {
            blacklist,
            fetcher,
            evm_resolver,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Arc<dyn UsageStore>) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Production wiring: HTTP sources, built-in denylist (+ optional file),
    /// CSV scan log
    pub fn from_config(config: &ScannerConfig) -> AppResult<Self> {
        let mut blacklist = StaticBlacklist::with_defaults();
        if let Some(path) = &config.blacklist_path {
            blacklist.extend_from_file(path)?;
        }

        let ctx = Arc::new(SourceContext::from_config(config)?);
        let fetcher = HttpChainFetcher::new(ctx.clone());
        let resolver = HttpEvmResolver::new(ctx);
        let usage = CsvUsageLog::new(config.usage_log_path.clone());

        info!(
            denylist = blacklist.len(),
            usage_log = %usage.path().display(),
            timeout_secs = config.http_timeout.as_secs(),
            "🛡️ Asset pipeline ready"
        );

        Ok(Self::new(Arc::new(blacklist), Arc::new(fetcher), Arc::new(resolver))
            .with_usage(Arc::new(usage)))
    }

    pub fn usage(&self) -> Option<&Arc<dyn UsageStore>> {
        self.usage.as_ref()
    }

    /// Resolve one raw input into a result
    pub async fn resolve(&self, raw_input: &str) -> AssetResult {
        self.resolve_detailed(raw_input).await.result
    }

    /// Resolve and keep the scoring breakdown and usage total
    pub async fn resolve_detailed(&self, raw_input: &str) -> Resolution {
        self.run(raw_input, true).await
    }

    /// Same result as `resolve`, but not counted as a scan (report exports)
    pub async fn preview(&self, raw_input: &str) -> AssetResult {
        self.run(raw_input, false).await.result
    }

    async fn run(&self, raw_input: &str, count_usage: bool) -> Resolution {
        let start = Instant::now();
        let query = AssetQuery::new(raw_input);

        if is_blocked(self.blacklist.as_ref(), &query) {
            info!(input = %query, "🚫 Denylisted input, skipping fetch");
            let result = AssetResult::blacklisted(&query);
            return finish(result, None, start);
        }

        let (category, network) = classify_with(query.as_str(), self.evm_resolver.as_ref()).await;
        if category == Category::Unknown {
            info!(
                input = %query,
                code = ErrorCode::UnsupportedInput.as_str(),
                "❓ Unsupported input format"
            );
            return finish(AssetResult::unsupported(&query), None, start);
        }

        let signal = self.fetcher.fetch(category, network, query.as_str()).await;
        let risk = RiskScore::calculate(category, &signal);
        let (balance, description) = describe(category, network, &signal);

        let result = AssetResult {
            input: query.to_string(),
            category,
            network,
            balance,
            info: description,
            risk_score: risk.total,
            degraded: signal.unavailable,
        };

        let usage_total = match &self.usage {
            Some(usage) if count_usage => record_usage(usage.clone(), result.clone()).await,
            _ => None,
        };

        info!(
            input = %result.input,
            category = %result.category,
            network = %result.network,
            score = result.risk_score,
            strategy = risk.strategy.as_str(),
            degraded = result.degraded,
            "✅ Asset resolved"
        );

        Resolution {
            result,
            risk,
            usage_total,
            latency_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Store writes may touch the filesystem; keep them off the async workers
async fn record_usage(usage: Arc<dyn UsageStore>, result: AssetResult) -> Option<u64> {
    match tokio::task::spawn_blocking(move || usage.record(&result)).await {
        Ok(Ok(total)) => Some(total),
        Ok(Err(e)) => {
            warn!(code = e.code_str(), "⚠️ Usage store write failed: {}", e.message);
            None
        }
        Err(e) => {
            warn!("⚠️ Usage store task failed: {}", e);
            None
        }
    }
}

fn finish(result: AssetResult, usage_total: Option<u64>, start: Instant) -> Resolution {
    let risk = RiskScore::calculate(result.category, &RawSignal::default());
    Resolution {
        result,
        risk,
        usage_total,
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

/// Human-readable `(balance, info)` for a fetched signal
pub fn describe(category: Category, network: Network, signal: &RawSignal) -> (Option<String>, String) {
    if signal.unavailable {
        let info = match category {
            Category::Wallet => format!("❌ {} balance unavailable", network),
            Category::Token => "❌ Failed to fetch token info".to_string(),
            Category::Coin => "❌ Coin data unavailable".to_string(),
            Category::Nft => "❌ NFT info not available".to_string(),
            _ => "❌ Live data unavailable".to_string(),
        };
        return (None, info);
    }

    match category {
        Category::Wallet => {
            let amount = signal.balance.unwrap_or(0.0);
            let balance = format!(
                "{:.prec$} {}",
                amount,
                network.native_symbol(),
                prec = network.display_precision()
            );
            let source = signal.source.as_deref().unwrap_or("network explorer");
            (Some(balance), format!("Validated via {}", source))
        }
        Category::Token => {
            let name = signal.name.as_deref().unwrap_or("Unknown");
            let symbol = signal.symbol.as_deref().unwrap_or("?");
            let holders = signal
                .holders
                .map(|h| h.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            (None, format!("{} ({}), Holders: {}", name, symbol, holders))
        }
        Category::Coin => (
            None,
            format!(
                "Price: ${}, Volume: ${}, Market Cap: ${}",
                usd(signal.price),
                usd(signal.volume),
                usd(signal.market_cap)
            ),
        ),
        Category::Nft => {
            let name = signal.name.as_deref().unwrap_or("Unknown");
            let supply = signal.total_supply.as_deref().unwrap_or("N/A");
            let verified = if signal.verified.unwrap_or(false) { "Yes" } else { "No" };
            (None, format!("{}, Supply: {}, Verified: {}", name, supply, verified))
        }
        Category::Blacklisted | Category::Unknown => (None, String::new()),
    }
}

fn usd(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_wallet_precision() {
        let signal = RawSignal::balance(1.5).with_source("Etherscan");
        let (balance, info) = describe(Category::Wallet, Network::Ethereum, &signal);
        assert_eq!(balance.as_deref(), Some("1.5000 ETH"));
        assert_eq!(info, "Validated via Etherscan");

        let (balance, _) = describe(Category::Wallet, Network::Bitcoin, &RawSignal::balance(0.25));
        assert_eq!(balance.as_deref(), Some("0.250000 BTC"));

        let (balance, _) = describe(Category::Wallet, Network::Near, &RawSignal::balance(3.0));
        assert_eq!(balance.as_deref(), Some("3.00 NEAR"));
    }

    #[test]
    fn test_describe_token_coin_nft() {
        let token = RawSignal {
            name: Some("Tether USD".to_string()),
            symbol: Some("USDT".to_string()),
            holders: Some(42),
            ..Default::default()
        };
        assert_eq!(
            describe(Category::Token, Network::Ethereum, &token).1,
            "Tether USD (USDT), Holders: 42"
        );

        let coin = RawSignal {
            price: Some(3000.5),
            volume: Some(1e9),
            market_cap: None,
            ..Default::default()
        };
        assert_eq!(
            describe(Category::Coin, Network::Native, &coin).1,
            "Price: $3000.5, Volume: $1000000000, Market Cap: $N/A"
        );

        let nft = RawSignal {
            name: Some("Azuki".to_string()),
            total_supply: Some("10000".to_string()),
            verified: Some(true),
            ..Default::default()
        };
        assert_eq!(
            describe(Category::Nft, Network::Ethereum, &nft).1,
            "Azuki, Supply: 10000, Verified: Yes"
        );
    }

    #[test]
    fn test_describe_degraded() {
        let (balance, info) = describe(
            Category::Wallet,
            Network::Tron,
            &RawSignal::unavailable(Category::Wallet),
        );
        assert!(balance.is_none());
        assert_eq!(info, "❌ TRON balance unavailable");
    }
}
