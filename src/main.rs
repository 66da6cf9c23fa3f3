//! Main entry point for chunked-uploader CLI

use chunked_uploader::cli::{Cli, Commands};
use chunked_uploader::shutdown::{self, ShutdownCoordinator};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber. `LOG_FORMAT=json` switches to
/// structured JSON output; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chunked_uploader=info"));

    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Optional Prometheus scrape endpoint
    if let Some(addr) = cli.metrics_addr {
        if let Err(e) = chunked_uploader::metrics::init_metrics(addr) {
            error!("Failed to initialize metrics: {}", e);
            std::process::exit(1);
        }
    }

    // Ctrl+C requests a stop that the executor honors at the next chunk
    // boundary, keeping the accepted-chunk count exact for resumption.
    let shutdown = ShutdownCoordinator::shared();
    shutdown::install_global(shutdown.clone());
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received - stopping after the chunk in flight...");
                shutdown.request();
            }
        }
    });

    let result = match cli.command {
        Commands::Upload(ref args) => args
            .execute(&cli, shutdown.clone())
            .await
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Plan(ref args) => args.execute(&cli).await.map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
