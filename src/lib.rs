//! AssetGuard Library
//!
//! Blockchain asset classifier and risk scorer:
//! - Input grammar detection across ten networks (plus coin tickers)
//! - Live chain / market data with a fallback source per network
//! - 0-100 risk normalization and a denylist guard
//! - ISO 20022-style report export

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::classifier::{classify, classify_with, pre_classify, EvmResolver, PreClassification};
pub use crate::core::guard::{is_blocked, BlacklistStore, StaticBlacklist};
pub use crate::core::pipeline::{AssetPipeline, Resolution};
pub use crate::core::risk_score::{score, RiskScore, ScoringStrategy};
pub use models::config::{ApiKeys, ScannerConfig, SourceEndpoints};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{AssetQuery, AssetResult, Category, Network, RawSignal};
pub use providers::{ChainFetcher, HttpChainFetcher, HttpEvmResolver, SourceContext};
pub use utils::report::IsoReport;
pub use utils::usage::{CsvUsageLog, InMemoryUsage, UsageStore};
