//! AssetGuard API Server
//!
//! REST surface over the asset resolution pipeline
//!
//! Usage:
//!   cargo run --bin asset_guard_api
//!
//! Environment:
//!   PORT / ASSET_GUARD_PORT    - Server port (default: 8080)
//!   ASSET_GUARD_HOST           - Server host (default: 0.0.0.0)
//!   ASSET_GUARD_BLACKLIST_FILE - Extra denylist entries, one per line
//!   RUST_LOG                   - Log level (default: info)

use asset_guard::api::{create_router, handlers::AppState};
use asset_guard::utils::constants::{APP_NAME, APP_VERSION};
use asset_guard::{AssetPipeline, ScannerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = ScannerConfig::default();
    config.keys.log_summary();

    let pipeline = AssetPipeline::from_config(&config).inspect_err(|e| {
        error!(code = e.code_str(), "❌ Pipeline init failed: {}", e.message);
    })?;
    let state = Arc::new(AppState::new(pipeline));
    let app = create_router(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🚀 {} API v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /v1/scan         - Classify, fetch and score one asset");
    info!("  GET  /v1/export-iso   - ISO 20022 report (?asset=...)");
    info!("  GET  /v1/stats        - Scan counter");
    info!("  GET  /v1/health       - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 Shutdown signal received");
    match state.pipeline.usage().map(|usage| usage.read()) {
        Some(Ok(total)) => info!("   Total scans recorded: {}", total),
        Some(Err(e)) => warn!("   ⚠️ Failed to read usage log: {}", e),
        None => {}
    }
    info!("👋 {} API shutdown complete", APP_NAME);

    Ok(())
}
