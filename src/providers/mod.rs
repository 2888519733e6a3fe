//! Providers Module - External Data Sources
//!
//! Jalur data: one module per network, each owning a primary/fallback
//! source pair. Everything here degrades instead of failing.

pub mod axelar;
pub mod bitcoin;
pub mod evm;
pub mod hedera;
pub mod http;
pub mod market;
pub mod near;
pub mod nft;
pub mod solana;
pub mod token;
pub mod tron;
pub mod xrp;

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

use crate::core::classifier::EvmResolver;
use crate::models::config::{ApiKeys, ScannerConfig, SourceEndpoints};
use crate::models::errors::AppResult;
use crate::models::types::{Category, Network, RawSignal};

pub use http::{build_client, primary_or_fallback};

/// Per-network data acquisition. Never fails: a total outage yields
/// `RawSignal::unavailable`.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch(&self, category: Category, network: Network, query: &str) -> RawSignal;
}

/// Shared HTTP client plus where to reach each source and with which key
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub client: Client,
    pub endpoints: SourceEndpoints,
    pub keys: ApiKeys,
    /// Etherscan token info seen by the resolver, handed to the next token
    /// fetch for the same address
    token_hits: DashMap<String, RawSignal>,
}

impl SourceContext {
    pub fn from_config(config: &ScannerConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_client(config.http_timeout)?,
            endpoints: config.endpoints.clone(),
            keys: config.keys.clone(),
            token_hits: DashMap::new(),
        })
    }

    pub(crate) fn remember_token(&self, address: &str, signal: RawSignal) {
        self.token_hits.insert(address.to_lowercase(), signal);
    }

    /// One-shot: the entry is gone after this
    pub(crate) fn take_token(&self, address: &str) -> Option<RawSignal> {
        self.token_hits.remove(&address.to_lowercase()).map(|(_, signal)| signal)
    }
}

/// Live fetcher dispatching on `(Category, Network)`
#[derive(Clone)]
pub struct HttpChainFetcher {
    ctx: Arc<SourceContext>,
}

impl HttpChainFetcher {
    pub fn new(ctx: Arc<SourceContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch(&self, category: Category, network: Network, query: &str) -> RawSignal {
        let ctx = self.ctx.as_ref();
        match (category, network) {
            (Category::Wallet, Network::Ethereum) => evm::fetch_ethereum_wallet(ctx, query).await,
            (Category::Wallet, Network::Polygon) => evm::fetch_polygon_wallet(ctx, query).await,
            (Category::Wallet, Network::Tron) => tron::fetch_wallet(ctx, query).await,
            (Category::Wallet, Network::Bitcoin) => bitcoin::fetch_wallet(ctx, query).await,
            (Category::Wallet, Network::Xrp) => xrp::fetch_wallet(ctx, query).await,
            (Category::Wallet, Network::Solana) => solana::fetch_wallet(ctx, query).await,
            (Category::Wallet, Network::Hedera) => hedera::fetch_wallet(ctx, query).await,
            (Category::Wallet, Network::Near) => near::fetch_wallet(ctx, query).await,
            (Category::Wallet, Network::Axelar) => axelar::fetch_wallet(ctx, query).await,
            (Category::Token, Network::Ethereum) => token::fetch_token(ctx, query).await,
            (Category::Nft, Network::Ethereum) => nft::fetch_collection(ctx, query).await,
            (Category::Coin, _) => market::fetch_coin(ctx, query).await,
            _ => {
                debug!(%category, %network, "No source for this pair");
                RawSignal::unavailable(category)
            }
        }
    }
}

/// Splits `0x` addresses: named token on Etherscan -> Token, known OpenSea
/// contract -> NFT, otherwise Wallet
#[derive(Clone)]
pub struct HttpEvmResolver {
    ctx: Arc<SourceContext>,
}

impl HttpEvmResolver {
    pub fn new(ctx: Arc<SourceContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl EvmResolver for HttpEvmResolver {
    async fn resolve_evm_candidate(&self, address: &str) -> Category {
        let ctx = self.ctx.as_ref();

        match token::etherscan_token_info(ctx, address).await {
            Ok(signal) if signal.name.as_deref().is_some_and(|n| !n.is_empty()) => {
                ctx.remember_token(address, signal);
                return Category::Token;
            }
            Ok(_) => {}
            Err(e) => debug!(address, code = e.code_str(), "Token check: no"),
        }

        match nft::opensea_contract(ctx, address).await {
            Ok(_) => Category::Nft,
            Err(e) => {
                debug!(address, code = e.code_str(), "NFT check: no");
                Category::Wallet
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Context with every source pointed at one mock server
    pub fn ctx_at(base: &str) -> SourceContext {
        SourceContext::from_config(&ScannerConfig::for_endpoints(base)).unwrap()
    }
}
