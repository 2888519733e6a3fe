//! Usage Counter / Scan Log
//!
//! Process-wide state lives here, outside the pipeline core. Every store
//! serializes concurrent increments so increment-and-read is atomic.

use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{AssetResult, Category};
use crate::utils::constants::USAGE_LOG_HEADER;

/// Usage counter collaborator
pub trait UsageStore: Send + Sync {
    /// Record one resolved query, returning the new total
    fn record(&self, result: &AssetResult) -> AppResult<u64>;

    /// Current total
    fn read(&self) -> AppResult<u64>;
}

// ============================================
// CSV scan log
// ============================================

/// Append-only CSV log (`timestamp,input,type,network`). The row count is
/// the usage total; the file is counted once, then the total is kept in
/// memory next to the lock that serializes appends.
pub struct CsvUsageLog {
    path: PathBuf,
    rows: Mutex<Option<u64>>,
}

impl CsvUsageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rows: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn count_rows(&self) -> AppResult<u64> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| AppError::with_source(ErrorCode::UsageStoreFailed, "read scan log", e))?;

        let rows = content
            .lines()
            .filter(|line| !line.trim().is_empty() && *line != USAGE_LOG_HEADER)
            .count();
        debug!(rows, path = %self.path.display(), "📂 Scan log counted");
        Ok(rows as u64)
    }

    fn lock_rows(&self) -> AppResult<MutexGuard<'_, Option<u64>>> {
        self.rows
            .lock()
            .map_err(|_| AppError::usage_store("scan log lock poisoned"))
    }
}

impl UsageStore for CsvUsageLog {
    fn record(&self, result: &AssetResult) -> AppResult<u64> {
        let mut rows = self.lock_rows()?;
        let current = match *rows {
            Some(n) => n,
            None => self.count_rows()?,
        };

        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::with_source(ErrorCode::UsageStoreFailed, "open scan log", e))?;

        let mut buf = String::new();
        if needs_header {
            buf.push_str(USAGE_LOG_HEADER);
            buf.push('\n');
        }
        buf.push_str(&format!(
            "{},{},{},{}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            csv_field(&result.input),
            result.category.as_str(),
            result.network.as_str(),
        ));

        file.write_all(buf.as_bytes())
            .map_err(|e| AppError::with_source(ErrorCode::UsageStoreFailed, "append scan log", e))?;

        let total = current + 1;
        *rows = Some(total);
        debug!(total, path = %self.path.display(), "📝 Scan logged");
        Ok(total)
    }

    fn read(&self) -> AppResult<u64> {
        let mut rows = self.lock_rows()?;
        match *rows {
            Some(n) => Ok(n),
            None => {
                let n = self.count_rows()?;
                *rows = Some(n);
                Ok(n)
            }
        }
    }
}

/// Quote a CSV field when needed; line breaks are flattened so one scan is one row
fn csv_field(value: &str) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.contains(',') || flat.contains('"') {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

// ============================================
// In-memory counter
// ============================================

/// Lock-free counter with per-category breakdown
#[derive(Default)]
pub struct InMemoryUsage {
    total: AtomicU64,
    by_category: DashMap<Category, u64>,
}

impl InMemoryUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_for(&self, category: Category) -> u64 {
        self.by_category.get(&category).map(|v| *v).unwrap_or(0)
    }

    /// Per-category counts keyed by category name
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.by_category
            .iter()
            .map(|entry| (entry.key().as_str().to_string(), *entry.value()))
            .collect()
    }
}

impl UsageStore for InMemoryUsage {
    fn record(&self, result: &AssetResult) -> AppResult<u64> {
        *self.by_category.entry(result.category).or_insert(0) += 1;
        Ok(self.total.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn read(&self) -> AppResult<u64> {
        Ok(self.total.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::Network;
    use std::sync::Arc;

    fn result(input: &str, category: Category) -> AssetResult {
        AssetResult {
            input: input.to_string(),
            category,
            network: Network::Ethereum,
            balance: None,
            info: String::new(),
            risk_score: 50,
            degraded: false,
        }
    }

    fn temp_log() -> PathBuf {
        std::env::temp_dir().join(format!("asset_guard_usage_{}.csv", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_csv_log_writes_header_once() {
        let path = temp_log();
        let log = CsvUsageLog::new(&path);

        assert_eq!(log.read().unwrap(), 0);
        assert_eq!(log.record(&result("0xabc", Category::Wallet)).unwrap(), 1);
        assert_eq!(log.record(&result("a,b", Category::Token)).unwrap(), 2);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], USAGE_LOG_HEADER);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",0xabc,Wallet,Ethereum"));
        assert!(lines[2].contains("\"a,b\",Token"));
        assert_eq!(log.read().unwrap(), 2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_csv_log_resumes_existing_file() {
        let path = temp_log();
        fs::write(
            &path,
            format!("{}\n2024-01-01 00:00:00,BTC,Coin,Native\n2024-01-01 00:00:01,ETH,Coin,Native\n", USAGE_LOG_HEADER),
        )
        .unwrap();

        let log = CsvUsageLog::new(&path);
        assert_eq!(log.path(), path.as_path());
        assert_eq!(log.record(&result("alice.near", Category::Wallet)).unwrap(), 3);
        assert_eq!(log.read().unwrap(), 3);

        // header is not repeated on a non-empty file
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches(USAGE_LOG_HEADER).count(), 1);
        assert_eq!(content.lines().count(), 4);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_csv_log_concurrent_totals_are_distinct() {
        let path = temp_log();
        let log = Arc::new(CsvUsageLog::new(&path));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let log = log.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| log.record(&result("BTC", Category::Coin)).unwrap())
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut totals: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        totals.sort_unstable();
        assert_eq!(totals, (1..=100).collect::<Vec<u64>>());
        assert_eq!(log.read().unwrap(), 100);
        assert_eq!(CsvUsageLog::new(&path).read().unwrap(), 100);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_csv_field_flattens_newlines() {
        assert_eq!(csv_field("a\nb"), "a b");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_in_memory_counts_are_atomic() {
        let usage = Arc::new(InMemoryUsage::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let usage = usage.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        usage.record(&result("BTC", Category::Coin)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(usage.read().unwrap(), 800);
        assert_eq!(usage.count_for(Category::Coin), 800);
        assert_eq!(usage.count_for(Category::Wallet), 0);
        assert_eq!(usage.snapshot().get("Coin"), Some(&800));
    }
}
