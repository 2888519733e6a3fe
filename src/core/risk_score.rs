//! Risk Scoring Module
//! Reduces a category-specific RawSignal to one 0-100 score
//!
//! One strategy per category, picked from the fields the fetcher actually
//! populated. All thresholds live in the table below.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, RawSignal};

// ============================================
// SCORE TABLE - Single Source of Truth
// ============================================

/// No applicable signal, or every source failed
pub const NEUTRAL_SCORE: u8 = 50;
/// Denylist hit
pub const DENYLIST_SCORE: u8 = 100;
/// Unsupported input
pub const UNSUPPORTED_SCORE: u8 = 0;
/// Arithmetic fault while scoring
pub const FAULT_SCORE: u8 = 0;

pub const WALLET_BASELINE: i64 = 50;
pub const WALLET_FUNDED_BONUS: i64 = 20;
pub const WALLET_EMPTY_PENALTY: i64 = 30;
pub const WALLET_HOLDER_STEP: u64 = 1_000;
pub const WALLET_HOLDER_CAP: i64 = 20;
pub const WALLET_VOLUME_STEP: f64 = 10_000.0;
pub const WALLET_VOLUME_CAP: i64 = 20;

/// volume / market cap strictly above threshold -> score
pub const MARKET_TIERS: [(f64, u8); 3] = [(1.0, 20), (0.1, 40), (0.01, 60)];
pub const MARKET_FLOOR: u8 = 80;

/// holders strictly above threshold -> score
pub const HOLDER_TIERS: [(u64, u8); 3] = [(10_000, 20), (1_000, 40), (100, 60)];
pub const HOLDER_FLOOR: u8 = 80;

/// Tokens and NFT collections share one verification table
pub const VERIFIED_SCORE: u8 = 20;
pub const UNVERIFIED_SCORE: u8 = 60;

/// How a score was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Baseline 50 adjusted by balance, holders and volume
    WalletBalance,
    /// volume / market-cap tiers
    MarketActivity,
    /// Holder-count tiers
    HolderDistribution,
    /// Verified flag
    Verification,
    /// No usable signal
    Neutral,
    /// Fixed 100, no signal consulted
    Denylisted,
    /// Fixed 0, no signal consulted
    Unsupported,
}

impl ScoringStrategy {
    /// Pick the strategy for a category from the populated signal fields
    pub fn select(category: Category, signal: &RawSignal) -> Self {
        match category {
            Category::Blacklisted => return Self::Denylisted,
            Category::Unknown => return Self::Unsupported,
            _ => {}
        }
        if signal.unavailable {
            return Self::Neutral;
        }

        let has_market = signal.volume.is_some() || signal.market_cap.is_some();
        let has_holders = signal.holders.is_some();
        let has_verified = signal.verified.is_some();

        match category {
            Category::Wallet => Self::WalletBalance,
            Category::Coin if has_market => Self::MarketActivity,
            Category::Coin if has_holders => Self::HolderDistribution,
            Category::Token if has_holders => Self::HolderDistribution,
            Category::Token if has_market => Self::MarketActivity,
            Category::Token if has_verified => Self::Verification,
            Category::Nft if has_verified => Self::Verification,
            Category::Nft if has_holders => Self::HolderDistribution,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WalletBalance => "wallet_balance",
            Self::MarketActivity => "market_activity",
            Self::HolderDistribution => "holder_distribution",
            Self::Verification => "verification",
            Self::Neutral => "neutral",
            Self::Denylisted => "denylisted",
            Self::Unsupported => "unsupported",
        }
    }

    fn apply(&self, signal: &RawSignal) -> AppResult<(u8, String)> {
        match self {
            Self::WalletBalance => wallet_score(signal),
            Self::MarketActivity => market_score(signal),
            Self::HolderDistribution => {
                let holders = signal.holders.unwrap_or(0);
                Ok((holder_score(holders), format!("{} holders", holders)))
            }
            Self::Verification => {
                let verified = signal.verified.unwrap_or(false);
                let score = if verified { VERIFIED_SCORE } else { UNVERIFIED_SCORE };
                let reason = if verified { "Verified contract" } else { "Contract NOT verified" };
                Ok((score, reason.to_string()))
            }
            Self::Neutral => {
                let reason = if signal.unavailable {
                    "Live data unavailable"
                } else {
                    "No applicable signal"
                };
                Ok((NEUTRAL_SCORE, reason.to_string()))
            }
            Self::Denylisted => Ok((DENYLIST_SCORE, "Listed on denylist".to_string())),
            Self::Unsupported => Ok((UNSUPPORTED_SCORE, "Unsupported input".to_string())),
        }
    }
}

/// Reject NaN, infinities and negatives before any arithmetic
fn checked(name: &str, value: Option<f64>) -> AppResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::scoring_fault(format!(
            "{} is not a finite non-negative number: {}",
            name, v
        ))),
        other => Ok(other),
    }
}

fn wallet_score(signal: &RawSignal) -> AppResult<(u8, String)> {
    let balance = checked("balance", signal.balance)?;
    let volume = checked("volume", signal.volume)?;

    let mut score = WALLET_BASELINE;
    match balance {
        Some(b) if b > 1.0 => score += WALLET_FUNDED_BONUS,
        Some(b) if b == 0.0 => score -= WALLET_EMPTY_PENALTY,
        _ => {}
    }
    if let Some(holders) = signal.holders {
        score += ((holders / WALLET_HOLDER_STEP) as i64).min(WALLET_HOLDER_CAP);
    }
    if let Some(v) = volume {
        score += (v / WALLET_VOLUME_STEP).trunc().min(WALLET_VOLUME_CAP as f64) as i64;
    }

    let total = score.clamp(0, 100) as u8;
    Ok((total, format!("Balance {}", balance.unwrap_or(0.0))))
}

fn market_score(signal: &RawSignal) -> AppResult<(u8, String)> {
    let volume = checked("volume", signal.volume)?.unwrap_or(0.0);
    let market_cap = checked("market_cap", signal.market_cap)?.unwrap_or(0.0);

    let ratio = if market_cap > 0.0 { volume / market_cap } else { 0.0 };
    if !ratio.is_finite() {
        return Err(AppError::scoring_fault("volume / market cap overflowed"));
    }

    let score = MARKET_TIERS
        .iter()
        .find(|(threshold, _)| ratio > *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(MARKET_FLOOR);

    Ok((score, format!("Volume/market-cap ratio {:.4}", ratio)))
}

fn holder_score(holders: u64) -> u8 {
    HOLDER_TIERS
        .iter()
        .find(|(threshold, _)| holders > *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(HOLDER_FLOOR)
}

/// Granular risk score (0-100)
/// - 0-20: Low
/// - 21-40: Moderate
/// - 41-60: Elevated
/// - 61-80: High
/// - 81-100: Critical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Overall score (0-100)
    pub total: u8,
    pub strategy: ScoringStrategy,
    /// Short human-readable basis for the score
    pub reason: String,
}

impl RiskScore {
    /// Score a signal. Total: never fails, always within 0..=100.
    pub fn calculate(category: Category, signal: &RawSignal) -> Self {
        let strategy = ScoringStrategy::select(category, signal);

        match strategy.apply(signal) {
            Ok((total, reason)) => Self {
                total: total.min(100),
                strategy,
                reason,
            },
            Err(err) => {
                warn!(
                    code = err.code_str(),
                    strategy = strategy.as_str(),
                    "⚠️ Scoring fault, degrading to {}: {}",
                    FAULT_SCORE,
                    err.message
                );
                Self {
                    total: FAULT_SCORE,
                    strategy,
                    reason: "Scoring fault".to_string(),
                }
            }
        }
    }

    pub fn level(&self) -> &'static str {
        match self.total {
            0..=20 => "LOW",
            21..=40 => "MODERATE",
            41..=60 => "ELEVATED",
            61..=80 => "HIGH",
            _ => "CRITICAL",
        }
    }

    /// Human-readable recommendation
    pub fn recommendation(&self) -> String {
        let (badge, action) = match self.total {
            0..=20 => ("✅ LOW RISK", "Proceed with standard caution."),
            21..=40 => ("🟡 MODERATE RISK", "Review the asset before interacting."),
            41..=60 => ("🟠 ELEVATED RISK", "Manual review strongly recommended."),
            61..=80 => ("🔴 HIGH RISK", "Avoid unless you understand the risks."),
            _ => ("💀 CRITICAL RISK", "DO NOT INTERACT."),
        };
        format!("{} - {}", badge, action)
    }

    /// Color code for UI
    pub fn color_code(&self) -> &'static str {
        match self.total {
            0..=20 => "#22c55e",   // Green
            21..=40 => "#eab308",  // Yellow
            41..=60 => "#f97316",  // Orange
            61..=80 => "#ef4444",  // Red
            _ => "#7c2d12",        // Dark red
        }
    }
}

/// Convenience wrapper returning only the number
pub fn score(category: Category, signal: &RawSignal) -> u8 {
    RiskScore::calculate(category, signal).total
}
