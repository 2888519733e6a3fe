//! Core Module - Business Logic
//!
//! Otak aplikasi: classification, denylist guard, risk scoring and the
//! pipeline that ties them together. No HTTP in here except through the
//! `ChainFetcher` / `EvmResolver` seams.

pub mod classifier;
pub mod guard;
pub mod pipeline;
pub mod risk_score;

pub use classifier::*;
pub use guard::*;
pub use pipeline::*;
pub use risk_score::*;
