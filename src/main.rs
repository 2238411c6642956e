//! Main entry point for the nse-batch-downloader CLI

use clap::Parser;
use nse_batch_downloader::cli::{status, Cli, Commands};
use nse_batch_downloader::metrics;
use nse_batch_downloader::shutdown::ShutdownCoordinator;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nse_batch_downloader=info"));

    // Logs go to stderr so JSON command output on stdout stays parseable.
    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Some(addr) = cli.metrics_addr {
        if let Err(e) = metrics::init_metrics(addr) {
            error!("Metrics disabled: {}", e);
        }
    }

    // Ctrl+C abandons a pending batch instead of killing the process mid-request
    let shutdown = ShutdownCoordinator::shared();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received - cancelling pending download...");
                shutdown.request_shutdown();
            }
        }
    });

    let result = match cli.command {
        Commands::Download(ref args) => args.execute(&cli, shutdown.clone()).await,
        Commands::LastDate => status::last_date(&cli).await,
        Commands::Today => status::today(&cli).await,
        Commands::Convert(ref convert) => convert.execute(cli.output_format),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
