//! Constants Module - Single Source of Truth
//!
//! Every constant, unit table and conversion helper used across the
//! pipeline is defined here. No hardcoded URLs or divisors in other modules.

use alloy_primitives::U256;
use serde_json::Value;

use crate::models::types::Network;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "AssetGuard";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for upstream HTTP requests
pub const USER_AGENT: &str = concat!("AssetGuard/", env!("CARGO_PKG_VERSION"));

/// Default timeout for a single upstream request (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default API port
pub const DEFAULT_API_PORT: u16 = 8080;

/// Scans in flight per API process (each one fans out to upstream sources)
pub const MAX_IN_FLIGHT_SCANS: usize = 64;

/// Default CSV scan log
pub const DEFAULT_USAGE_LOG: &str = "asset_log.csv";

/// Ethplorer's public shared key
pub const DEFAULT_ETHPLORER_KEY: &str = "freekey";

// ============================================
// UPSTREAM BASE URLS
// ============================================

pub const URL_ETHERSCAN: &str = "https://api.etherscan.io";
pub const URL_BLOCKCHAIR: &str = "https://api.blockchair.com";
pub const URL_POLYGONSCAN: &str = "https://api.polygonscan.com";
pub const URL_COVALENT: &str = "https://api.covalenthq.com";
pub const URL_TRONGRID: &str = "https://api.trongrid.io";
pub const URL_TRONSCAN: &str = "https://apilist.tronscanapi.com";
pub const URL_BLOCKCYPHER: &str = "https://api.blockcypher.com";
pub const URL_BLOCKSTREAM: &str = "https://blockstream.info";
pub const URL_XRPSCAN: &str = "https://api.xrpscan.com";
pub const URL_RIPPLED: &str = "https://xrplcluster.com";
pub const URL_HELIUS: &str = "https://api.helius.xyz";
pub const URL_SOLSCAN: &str = "https://public-api.solscan.io";
pub const URL_HEDERA_MIRROR: &str = "https://mainnet-public.mirrornode.hedera.com";
pub const URL_HEDERA_MIRROR_FALLBACK: &str = "https://mainnet-public.mirrornode.hedera.com";
pub const URL_NEAR_RPC: &str = "https://rpc.mainnet.near.org";
pub const URL_NEAR_RPC_FALLBACK: &str = "https://rpc.fastnear.com";
pub const URL_AXELAR_LCD: &str = "https://axelar-lcd.quickapi.com";
pub const URL_AXELAR_LCD_FALLBACK: &str = "https://axelar-api.polkachu.com";
pub const URL_ETHPLORER: &str = "https://api.ethplorer.io";
pub const URL_OPENSEA: &str = "https://api.opensea.io";
pub const URL_RESERVOIR: &str = "https://api.reservoir.tools";
pub const URL_COINGECKO: &str = "https://api.coingecko.com";
pub const URL_COINCAP: &str = "https://api.coincap.io";

/// Polygon PoS chain id used by Covalent paths
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Axelar native staking denom
pub const AXELAR_DENOM: &str = "uaxl";

// ============================================
// COIN SYMBOLS
// ============================================

/// Symbols classified as `Coin` (compared uppercased)
pub const COIN_SYMBOLS: [&str; 8] = ["BTC", "ETH", "BNB", "XRP", "SOL", "ADA", "DOGE", "MATIC"];

/// Check whether the query is a supported coin symbol
pub fn is_coin_symbol(query: &str) -> bool {
    let upper = query.to_uppercase();
    COIN_SYMBOLS.contains(&upper.as_str())
}

/// CoinGecko coin id for a symbol
pub fn get_coingecko_id(symbol: &str) -> Option<&'static str> {
    match symbol.to_uppercase().as_str() {
        "BTC" => Some("bitcoin"),
        "ETH" => Some("ethereum"),
        "BNB" => Some("binancecoin"),
        "XRP" => Some("ripple"),
        "SOL" => Some("solana"),
        "ADA" => Some("cardano"),
        "DOGE" => Some("dogecoin"),
        "MATIC" => Some("matic-network"),
        _ => None,
    }
}

/// CoinCap asset id for a symbol
pub fn get_coincap_id(symbol: &str) -> Option<&'static str> {
    match symbol.to_uppercase().as_str() {
        "BTC" => Some("bitcoin"),
        "ETH" => Some("ethereum"),
        "BNB" => Some("binance-coin"),
        "XRP" => Some("xrp"),
        "SOL" => Some("solana"),
        "ADA" => Some("cardano"),
        "DOGE" => Some("dogecoin"),
        "MATIC" => Some("polygon"),
        _ => None,
    }
}

// ============================================
// DENYLIST
// ============================================

/// Built-in denylist (matched case-insensitively, exact)
pub const DEFAULT_DENYLIST: [&str; 5] = [
    "0x000000000000000000000000000000000000dead", // Burn address
    "trx",                                        // Fake TRX ticker (not a supported coin)
    "0x1111111111111111111111111111111111111111", // Dummy token
    "nftscam.eth",
    "scamcoin",
];

// ============================================
// REPORT CONSTANTS
// ============================================

pub const REPORT_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.001.001.03";
pub const REPORT_STANDARD: &str = "ISO 20022-Inspired";
pub const REPORT_ISSUER: &str = "ADC AssetGuard + AI";
pub const REPORT_DEFAULT_NOTE: &str = "Validated via ADC AssetGuard";
/// Header row of the CSV scan log
pub const USAGE_LOG_HEADER: &str = "timestamp,input,type,network";

// ============================================
// NETWORK METADATA
// ============================================

/// Smallest-unit exponent per network. A wrong entry silently corrupts
/// every downstream score.
pub fn get_base_unit_decimals(network: Network) -> Option<u32> {
    match network {
        Network::Ethereum | Network::Polygon => Some(18), // wei
        Network::Bitcoin => Some(8),                      // satoshi
        Network::Hedera => Some(8),                       // tinybar
        Network::Tron => Some(6),                         // sun
        Network::Axelar => Some(6),                       // uaxl
        Network::Xrp => Some(6),                          // drops
        Network::Solana => Some(9),                       // lamports
        Network::Near => Some(24),                        // yoctoNEAR
        Network::Native | Network::Unknown => None,
    }
}

/// Native ticker per network
pub fn get_native_symbol(network: Network) -> &'static str {
    match network {
        Network::Ethereum => "ETH",
        Network::Polygon => "MATIC",
        Network::Tron => "TRX",
        Network::Bitcoin => "BTC",
        Network::Xrp => "XRP",
        Network::Solana => "SOL",
        Network::Hedera => "HBAR",
        Network::Near => "NEAR",
        Network::Axelar => "AXL",
        Network::Native | Network::Unknown => "",
    }
}

/// Decimal places in balance descriptions
pub fn get_display_precision(network: Network) -> usize {
    match network {
        Network::Ethereum | Network::Polygon => 4,
        Network::Bitcoin => 6,
        _ => 2,
    }
}

// ============================================
// CONVERSION UTILITIES - Single Source of Truth
// ============================================

/// Convert an integer base-unit amount (decimal string) to display units.
///
/// The division is done in 256-bit integers (whole part + remainder) so
/// `1000000000000000000` wei is exactly `1.0` ETH. Returns `None` for
/// anything that is not a plain non-negative integer.
pub fn base_units_to_float(raw: &str, decimals: u32) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: U256 = raw.parse().ok()?;
    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    let whole: f64 = whole.to_string().parse().ok()?;
    let remainder: f64 = remainder.to_string().parse().ok()?;
    Some(whole + remainder / 10f64.powi(decimals as i32))
}

/// Convert a base-unit amount for a network using the unit table
pub fn network_units_to_float(raw: &str, network: Network) -> Option<f64> {
    base_units_to_float(raw, network.base_unit_decimals()?)
}

/// Extract an integer base-unit amount from a JSON number or string
pub fn json_base_units(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => n.as_u64().map(|v| v.to_string()),
        _ => None,
    }
}

/// Extract a float from a JSON number or numeric string
pub fn json_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Extract a non-negative integer from a JSON number or numeric string
pub fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
