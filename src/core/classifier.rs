//! Address Classifier
//!
//! Maps an input string to `(Category, Network)` from surface syntax only.
//! Rules run in a fixed order and the first match wins:
//!
//! 1. coin symbol            -> (Coin, Native)
//! 2. `0x` + 42 chars        -> EVM candidate (Wallet | Token | NFT, Ethereum)
//! 3. `T` + 34 chars         -> (Wallet, TRON)
//! 4. `1` / `3` / `bc1`      -> (Wallet, Bitcoin)
//! 5. `r`, len >= 25         -> (Wallet, XRP)
//! 6. exactly 44 chars       -> (Wallet, Solana)
//! 7. has `-`, len >= 42     -> (Wallet, Hedera)
//! 8. ends with `.near`      -> (Wallet, NEAR)
//! 9. starts with `axelar1`  -> (Wallet, Axelar)
//! 10. otherwise             -> (Unknown, N/A)
//!
//! An EVM candidate cannot be split into Wallet / Token / NFT by syntax, so
//! that step lives behind [`EvmResolver`], which performs the live lookup.

use async_trait::async_trait;
use tracing::debug;

use crate::models::types::{Category, Network};
use crate::utils::constants::is_coin_symbol;

/// Result of the syntax-only pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreClassification {
    Coin,
    /// `0x` + 42 chars; needs [`EvmResolver`] to pick Wallet, Token or NFT
    EvmCandidate,
    Wallet(Network),
    Unknown,
}

/// Syntax-only classification. Pure and total.
pub fn pre_classify(query: &str) -> PreClassification {
    let len = query.chars().count();

    if is_coin_symbol(query) {
        PreClassification::Coin
    } else if query.starts_with("0x") && len == 42 {
        PreClassification::EvmCandidate
    } else if query.starts_with('T') && len == 34 {
        PreClassification::Wallet(Network::Tron)
    } else if query.starts_with('1') || query.starts_with('3') || query.starts_with("bc1") {
        PreClassification::Wallet(Network::Bitcoin)
    } else if query.starts_with('r') && len >= 25 {
        PreClassification::Wallet(Network::Xrp)
    } else if len == 44 {
        PreClassification::Wallet(Network::Solana)
    } else if query.contains('-') && len >= 42 {
        PreClassification::Wallet(Network::Hedera)
    } else if query.ends_with(".near") {
        PreClassification::Wallet(Network::Near)
    } else if query.starts_with("axelar1") {
        PreClassification::Wallet(Network::Axelar)
    } else {
        PreClassification::Unknown
    }
}

/// Pure classification. EVM candidates take the syntax default
/// `(Wallet, Ethereum)`; use [`classify_with`] for the live split.
pub fn classify(query: &str) -> (Category, Network) {
    match pre_classify(query) {
        PreClassification::Coin => (Category::Coin, Network::Native),
        PreClassification::EvmCandidate => (Category::Wallet, Network::Ethereum),
        PreClassification::Wallet(network) => (Category::Wallet, network),
        PreClassification::Unknown => (Category::Unknown, Network::Unknown),
    }
}

/// Live disambiguation of a `0x` address into Wallet, Token or NFT
#[async_trait]
pub trait EvmResolver: Send + Sync {
    /// Must return one of Wallet, Token or NFT. I/O failures count as "no".
    async fn resolve_evm_candidate(&self, address: &str) -> Category;
}

/// Full classification: syntax pass, then the EVM resolver for `0x` candidates
pub async fn classify_with(query: &str, resolver: &dyn EvmResolver) -> (Category, Network) {
    let pre = pre_classify(query);
    debug!(query, ?pre, "🔎 Pre-classified");

    match pre {
        PreClassification::EvmCandidate => {
            let category = resolver.resolve_evm_candidate(query).await;
            debug!(query, category = %category, "🔎 EVM candidate resolved");
            (category, Network::Ethereum)
        }
        _ => classify(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVM: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
    const TRON: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
    const BTC_LEGACY: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
    const BTC_SEGWIT: &str = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";
    const XRP: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    const SOLANA: &str = "DRpbCBMxVnDK7maPM5tGv6MvB3v1sRMC86PZ8okm21hy";
    const HEDERA: &str = "0.0.1234567-vfmkw-abcdefghijklmnopqrstuvwxyz12";
    const AXELAR: &str = "axelar1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq";

    struct FixedResolver(Category);

    #[async_trait]
    impl EvmResolver for FixedResolver {
        async fn resolve_evm_candidate(&self, _address: &str) -> Category {
            self.0
        }
    }

    #[test]
    fn test_coin_symbol_wins_first() {
        assert_eq!(classify("BTC"), (Category::Coin, Network::Native));
        assert_eq!(classify("eth"), (Category::Coin, Network::Native));
        assert_eq!(classify("Matic"), (Category::Coin, Network::Native));
    }

    #[test]
    fn test_network_grammars() {
        assert_eq!(pre_classify(EVM), PreClassification::EvmCandidate);
        assert_eq!(classify(EVM), (Category::Wallet, Network::Ethereum));
        assert_eq!(classify(TRON), (Category::Wallet, Network::Tron));
        assert_eq!(classify(BTC_LEGACY), (Category::Wallet, Network::Bitcoin));
        assert_eq!(classify(BTC_SEGWIT), (Category::Wallet, Network::Bitcoin));
        assert_eq!(classify(XRP), (Category::Wallet, Network::Xrp));
        assert_eq!(classify(SOLANA), (Category::Wallet, Network::Solana));
        assert_eq!(classify(HEDERA), (Category::Wallet, Network::Hedera));
        assert_eq!(classify("alice.near"), (Category::Wallet, Network::Near));
        assert_eq!(classify(AXELAR), (Category::Wallet, Network::Axelar));
    }

    #[test]
    fn test_precedence_on_overlapping_grammars() {
        // 44 chars with a dash: Solana rule runs before Hedera
        let dashed = "0.0.1234567-vfmkw-abcdefghijklmnopqrstuvwxyz";
        assert_eq!(dashed.len(), 44);
        assert_eq!(classify(dashed), (Category::Wallet, Network::Solana));

        // Short `r` strings are not XRP
        assert_eq!(classify("ripple"), (Category::Unknown, Network::Unknown));

        // `.near` names starting with `1` are caught by the Bitcoin rule
        assert_eq!(classify("1bob.near"), (Category::Wallet, Network::Bitcoin));
    }

    #[test]
    fn test_unknown_inputs() {
        assert_eq!(classify("not-a-real-address"), (Category::Unknown, Network::Unknown));
        assert_eq!(classify(""), (Category::Unknown, Network::Unknown));
        assert_eq!(classify("0x123"), (Category::Unknown, Network::Unknown));
    }

    #[test]
    fn test_classifier_is_total() {
        let inputs = [
            "", " ", "0x", "T", "r", "-", ".near", "axelar1", "🦀🦀🦀", "ÉTH",
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44eff", "\u{0}",
        ];
        for input in inputs {
            let (category, _network) = classify(input);
            assert!(category != Category::Blacklisted);
            assert_eq!(classify(input), classify(input));
        }
    }

    #[tokio::test]
    async fn test_classify_with_resolver() {
        let token = FixedResolver(Category::Token);
        assert_eq!(classify_with(EVM, &token).await, (Category::Token, Network::Ethereum));

        let nft = FixedResolver(Category::Nft);
        assert_eq!(classify_with(EVM, &nft).await, (Category::Nft, Network::Ethereum));

        // Resolver is not consulted outside the EVM grammar
        assert_eq!(classify_with(TRON, &token).await, (Category::Wallet, Network::Tron));
    }
}
