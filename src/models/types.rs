//! Type definitions for AssetGuard
//! All data records that flow through the classify -> fetch -> score pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{get_base_unit_decimals, get_display_precision, get_native_symbol};

/// Coarse asset kind assigned to a query. Exactly one per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Wallet,
    Token,
    #[serde(rename = "NFT")]
    Nft,
    Coin,
    Blacklisted,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wallet => "Wallet",
            Category::Token => "Token",
            Category::Nft => "NFT",
            Category::Coin => "Coin",
            Category::Blacklisted => "Blacklisted",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported networks. `Native` tags coin symbols; `Unknown` renders as "N/A".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Ethereum,
    #[serde(rename = "TRON")]
    Tron,
    Bitcoin,
    #[serde(rename = "XRP")]
    Xrp,
    Solana,
    Hedera,
    Polygon,
    #[serde(rename = "NEAR")]
    Near,
    Axelar,
    Native,
    #[serde(rename = "N/A")]
    Unknown,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Ethereum => "Ethereum",
            Network::Tron => "TRON",
            Network::Bitcoin => "Bitcoin",
            Network::Xrp => "XRP",
            Network::Solana => "Solana",
            Network::Hedera => "Hedera",
            Network::Polygon => "Polygon",
            Network::Near => "NEAR",
            Network::Axelar => "Axelar",
            Network::Native => "Native",
            Network::Unknown => "N/A",
        }
    }

    /// Native ticker used in balance descriptions (delegates to constants)
    pub fn native_symbol(&self) -> &'static str {
        get_native_symbol(*self)
    }

    /// Smallest-unit exponent: balance = base_units / 10^decimals (delegates to constants)
    pub fn base_unit_decimals(&self) -> Option<u32> {
        get_base_unit_decimals(*self)
    }

    /// Decimal places shown in balance descriptions (delegates to constants)
    pub fn display_precision(&self) -> usize {
        get_display_precision(*self)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw user input, whitespace-trimmed and otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    raw: String,
}

impl AssetQuery {
    pub fn new(input: &str) -> Self {
        Self {
            raw: input.trim().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased form used for denylist lookups
    pub fn normalized(&self) -> String {
        self.raw.to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Display for AssetQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Loosely-typed facts fetched for a query. `None` means "not provided",
/// which is distinct from zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    /// Balance in chain-native display units (already divided by the base-unit factor)
    pub balance: Option<f64>,
    pub holders: Option<u64>,
    /// 24h volume in USD
    pub volume: Option<f64>,
    /// Market capitalization in USD
    pub market_cap: Option<f64>,
    /// Spot price in USD
    pub price: Option<f64>,
    pub verified: Option<bool>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub total_supply: Option<String>,
    /// Which upstream source produced the data
    pub source: Option<String>,
    /// Both primary and fallback sources failed
    pub unavailable: bool,
}

impl RawSignal {
    /// Degraded signal returned when every source failed
    pub fn unavailable(category: Category) -> Self {
        Self {
            balance: (category == Category::Wallet).then_some(0.0),
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Wallet signal carrying only a converted balance
    pub fn balance(balance: f64) -> Self {
        Self {
            balance: Some(balance),
            ..Default::default()
        }
    }
}

/// Pipeline output. Owned by the caller; never mutated by the core after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetResult {
    pub input: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub network: Network,
    /// Human-readable balance (wallets only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub balance: Option<String>,
    /// Human-readable description of the fetched signal
    pub info: String,
    pub risk_score: u8,
    /// Live data could not be fetched; the score reflects a degraded signal
    #[serde(default)]
    pub degraded: bool,
}

impl AssetResult {
    /// Denylist hit: fixed score 100, no fetch, no scoring
    pub fn blacklisted(query: &AssetQuery) -> Self {
        Self {
            input: query.to_string(),
            category: Category::Blacklisted,
            network: Network::Unknown,
            balance: None,
            info: "🚫 Listed on the AssetGuard denylist".to_string(),
            risk_score: 100,
            degraded: false,
        }
    }

    /// No grammar matched: fixed zero-risk result
    pub fn unsupported(query: &AssetQuery) -> Self {
        Self {
            input: query.to_string(),
            category: Category::Unknown,
            network: Network::Unknown,
            balance: None,
            info: "❌ Invalid format or unsupported input".to_string(),
            risk_score: 0,
            degraded: false,
        }
    }
}
