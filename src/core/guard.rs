//! Blacklist Guard
//!
//! Case-insensitive exact match against a static denylist. A hit
//! short-circuits the pipeline with a fixed score of 100.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::AssetQuery;
use crate::utils::constants::DEFAULT_DENYLIST;

/// Denylist collaborator. Receives the lowercased, trimmed input.
pub trait BlacklistStore: Send + Sync {
    fn contains(&self, normalized: &str) -> bool;
}

/// In-memory denylist loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct StaticBlacklist {
    entries: HashSet<String>,
}

impl StaticBlacklist {
    /// Empty denylist
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in denylist
    pub fn with_defaults() -> Self {
        Self::from_entries(DEFAULT_DENYLIST)
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    /// Add entries from a file: one per line, `#` starts a comment
    pub fn extend_from_file(&mut self, path: &Path) -> AppResult<usize> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorCode::BlacklistLoadFailed,
                format!("cannot read denylist {}", path.display()),
                e,
            )
        })?;

        let before = self.entries.len();
        for line in content.lines() {
            let entry = line.split('#').next().unwrap_or("").trim();
            if !entry.is_empty() {
                self.entries.insert(entry.to_lowercase());
            }
        }
        let added = self.entries.len() - before;
        info!(path = %path.display(), added, total = self.entries.len(), "🚫 Denylist file loaded");
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlacklistStore for StaticBlacklist {
    fn contains(&self, normalized: &str) -> bool {
        self.entries.contains(normalized)
    }
}

/// Guard check used by the pipeline
pub fn is_blocked(store: &dyn BlacklistStore, query: &AssetQuery) -> bool {
    !query.is_empty() && store.contains(&query.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_denylist() {
        let list = StaticBlacklist::with_defaults();
        let burn = AssetQuery::new("0x000000000000000000000000000000000000dEaD");
        assert!(is_blocked(&list, &burn));
        assert!(is_blocked(&list, &AssetQuery::new("  ScamCoin ")));
        assert!(is_blocked(&list, &AssetQuery::new("nftscam.eth")));

        // Supported coin tickers are not on the built-in list
        assert!(!is_blocked(&list, &AssetQuery::new("ETH")));
        assert!(!is_blocked(&list, &AssetQuery::new("BTC")));
        // TRX is not a supported coin symbol, so it stays denylisted
        assert!(is_blocked(&list, &AssetQuery::new("TRX")));
        assert!(is_blocked(&list, &AssetQuery::new("trx")));
    }

    #[test]
    fn test_exact_match_only() {
        let list = StaticBlacklist::from_entries(["scamcoin"]);
        assert!(!is_blocked(&list, &AssetQuery::new("scamcoin2")));
        assert!(!is_blocked(&list, &AssetQuery::new("scam")));
        assert!(!is_blocked(&list, &AssetQuery::new("")));
    }

    #[test]
    fn test_extend_from_file() {
        let path = std::env::temp_dir().join(format!("denylist_{}.txt", uuid::Uuid::new_v4()));
        fs::write(&path, "# comment\nBadToken\n\n0xABC # trailing\n").unwrap();

        let mut list = StaticBlacklist::empty();
        assert_eq!(list.extend_from_file(&path).unwrap(), 2);
        assert!(list.contains("badtoken"));
        assert!(list.contains("0xabc"));
        let _ = fs::remove_file(&path);

        let err = list.extend_from_file(Path::new("/nonexistent/denylist.txt")).unwrap_err();
        assert_eq!(err.code, ErrorCode::BlacklistLoadFailed);
    }
}
