//! AssetGuard HTTP API Module
//! Thin REST surface over the resolution pipeline

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use routes::create_router;
pub use types::*;
