//! Configuration module for AssetGuard
//!
//! Everything is read from the environment with defaults from
//! utils/constants.rs. Upstream base URLs are configurable so the fetcher
//! can be pointed at a mock server.

use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::utils::constants::{
    DEFAULT_API_PORT, DEFAULT_ETHPLORER_KEY, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_USAGE_LOG,
    URL_AXELAR_LCD, URL_AXELAR_LCD_FALLBACK, URL_BLOCKCHAIR, URL_BLOCKCYPHER, URL_BLOCKSTREAM,
    URL_COINCAP, URL_COINGECKO, URL_COVALENT, URL_ETHERSCAN, URL_ETHPLORER, URL_HEDERA_MIRROR,
    URL_HEDERA_MIRROR_FALLBACK, URL_HELIUS, URL_NEAR_RPC, URL_NEAR_RPC_FALLBACK, URL_OPENSEA,
    URL_POLYGONSCAN, URL_RESERVOIR, URL_RIPPLED, URL_SOLSCAN, URL_TRONGRID, URL_TRONSCAN,
    URL_XRPSCAN,
};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Third-party API keys. Keys are NEVER logged.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub etherscan: Option<String>,
    pub polygonscan: Option<String>,
    pub helius: Option<String>,
    pub covalent: Option<String>,
    pub opensea: Option<String>,
    pub ethplorer: String,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        Self {
            etherscan: env_opt("ETHERSCAN_API_KEY"),
            polygonscan: env_opt("POLYGONSCAN_API_KEY"),
            helius: env_opt("HELIUS_API_KEY"),
            covalent: env_opt("COVALENT_API_KEY"),
            opensea: env_opt("OPENSEA_API_KEY"),
            ethplorer: env_or("ETHPLORER_API_KEY", DEFAULT_ETHPLORER_KEY),
        }
    }

    /// Log which keys are configured (values hidden)
    pub fn log_summary(&self) {
        let status = |k: &Option<String>| if k.is_some() { "configured" } else { "not set" };
        info!(
            etherscan = status(&self.etherscan),
            polygonscan = status(&self.polygonscan),
            helius = status(&self.helius),
            covalent = status(&self.covalent),
            opensea = status(&self.opensea),
            "🔑 API keys (values hidden)"
        );
    }
}

/// Base URLs for every upstream source (no trailing slash)
#[derive(Debug, Clone)]
pub struct SourceEndpoints {
    pub etherscan: String,
    pub blockchair: String,
    pub polygonscan: String,
    pub covalent: String,
    pub trongrid: String,
    pub tronscan: String,
    pub blockcypher: String,
    pub blockstream: String,
    pub xrpscan: String,
    pub rippled: String,
    pub helius: String,
    pub solscan: String,
    pub hedera_mirror: String,
    pub hedera_mirror_fallback: String,
    pub near_rpc: String,
    pub near_rpc_fallback: String,
    pub axelar_lcd: String,
    pub axelar_lcd_fallback: String,
    pub ethplorer: String,
    pub opensea: String,
    pub reservoir: String,
    pub coingecko: String,
    pub coincap: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            etherscan: URL_ETHERSCAN.to_string(),
            blockchair: URL_BLOCKCHAIR.to_string(),
            polygonscan: URL_POLYGONSCAN.to_string(),
            covalent: URL_COVALENT.to_string(),
            trongrid: URL_TRONGRID.to_string(),
            tronscan: URL_TRONSCAN.to_string(),
            blockcypher: URL_BLOCKCYPHER.to_string(),
            blockstream: URL_BLOCKSTREAM.to_string(),
            xrpscan: URL_XRPSCAN.to_string(),
            rippled: URL_RIPPLED.to_string(),
            helius: URL_HELIUS.to_string(),
            solscan: URL_SOLSCAN.to_string(),
            hedera_mirror: URL_HEDERA_MIRROR.to_string(),
            hedera_mirror_fallback: URL_HEDERA_MIRROR_FALLBACK.to_string(),
            near_rpc: URL_NEAR_RPC.to_string(),
            near_rpc_fallback: URL_NEAR_RPC_FALLBACK.to_string(),
            axelar_lcd: URL_AXELAR_LCD.to_string(),
            axelar_lcd_fallback: URL_AXELAR_LCD_FALLBACK.to_string(),
            ethplorer: URL_ETHPLORER.to_string(),
            opensea: URL_OPENSEA.to_string(),
            reservoir: URL_RESERVOIR.to_string(),
            coingecko: URL_COINGECKO.to_string(),
            coincap: URL_COINCAP.to_string(),
        }
    }
}

impl SourceEndpoints {
    /// Point every source at one base URL (mock servers in tests)
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            etherscan: base.clone(),
            blockchair: base.clone(),
            polygonscan: base.clone(),
            covalent: base.clone(),
            trongrid: base.clone(),
            tronscan: base.clone(),
            blockcypher: base.clone(),
            blockstream: base.clone(),
            xrpscan: base.clone(),
            rippled: base.clone(),
            helius: base.clone(),
            solscan: base.clone(),
            hedera_mirror: base.clone(),
            hedera_mirror_fallback: base.clone(),
            near_rpc: base.clone(),
            near_rpc_fallback: base.clone(),
            axelar_lcd: base.clone(),
            axelar_lcd_fallback: base.clone(),
            ethplorer: base.clone(),
            opensea: base.clone(),
            reservoir: base.clone(),
            coingecko: base.clone(),
            coincap: base,
        }
    }
}

/// Configuration for the scanner and its API server
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Per-request timeout on every upstream call
    pub http_timeout: Duration,
    pub keys: ApiKeys,
    pub endpoints: SourceEndpoints,
    /// CSV scan log backing the usage counter
    pub usage_log_path: PathBuf,
    /// Extra denylist entries, one per line
    pub blacklist_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        let http_timeout = std::env::var("ASSET_GUARD_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        // Railway-style PORT first, then the app-specific variable
        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("ASSET_GUARD_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_API_PORT);

        Self {
            http_timeout: Duration::from_secs(http_timeout),
            keys: ApiKeys::from_env(),
            endpoints: SourceEndpoints::default(),
            usage_log_path: PathBuf::from(env_or("ASSET_GUARD_USAGE_LOG", DEFAULT_USAGE_LOG)),
            blacklist_path: env_opt("ASSET_GUARD_BLACKLIST_FILE").map(PathBuf::from),
            host: env_or("ASSET_GUARD_HOST", "0.0.0.0"),
            port,
        }
    }
}

impl ScannerConfig {
    /// Offline config for tests: every source at `base`, no keys, short timeout
    pub fn for_endpoints(base: &str) -> Self {
        Self {
            http_timeout: Duration::from_secs(2),
            keys: ApiKeys {
                ethplorer: DEFAULT_ETHPLORER_KEY.to_string(),
                ..Default::default()
            },
            endpoints: SourceEndpoints::all_at(base),
            usage_log_path: PathBuf::from(DEFAULT_USAGE_LOG),
            blacklist_path: None,
            host: "127.0.0.1".to_string(),
            port: DEFAULT_API_PORT,
        }
    }
}
