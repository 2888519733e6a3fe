//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constants, the usage counter and the XML report formatter.
//! Single Source of Truth untuk fungsi shared.

pub mod constants;
pub mod report;
pub mod usage;

pub use constants::*;
pub use report::*;
pub use usage::*;
