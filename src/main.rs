//! AssetGuard CLI
//!
//! Resolve one input (address, contract, ticker) and print the result.
//!
//! Usage:
//!   asset_guard <input>          - JSON result with risk breakdown
//!   asset_guard <input> --xml    - ISO 20022-style report
//!
//! Environment:
//!   RUST_LOG                      - Log level (default: info)
//!   ASSET_GUARD_HTTP_TIMEOUT_SECS - Upstream timeout (default: 10)
//!   ASSET_GUARD_USAGE_LOG         - CSV scan log (default: asset_log.csv)

use asset_guard::api::ScanData;
use asset_guard::{AssetPipeline, IsoReport, ScannerConfig};

use eyre::{bail, Result};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

enum OutputFormat {
    Json,
    Xml,
}

fn parse_args() -> Result<(String, OutputFormat)> {
    let mut input = None;
    let mut format = OutputFormat::Json;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--xml" => format = OutputFormat::Xml,
            "--json" => format = OutputFormat::Json,
            flag if flag.starts_with("--") => bail!("unknown flag `{}`", flag),
            value if input.is_none() => input = Some(value.to_string()),
            extra => bail!("unexpected argument `{}`", extra),
        }
    }

    match input {
        Some(input) => Ok((input, format)),
        None => bail!("usage: asset_guard <input> [--xml]"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let (input, format) = parse_args()?;

    let config = ScannerConfig::default();
    config.keys.log_summary();
    let pipeline = AssetPipeline::from_config(&config)?;

    match format {
        OutputFormat::Json => {
            let resolution = pipeline.resolve_detailed(&input).await;
            println!("{}", serde_json::to_string_pretty(&ScanData::from(resolution))?);
        }
        OutputFormat::Xml => {
            let result = pipeline.resolve(&input).await;
            println!("{}", IsoReport::from_result(&result).to_xml());
        }
    }

    Ok(())
}
