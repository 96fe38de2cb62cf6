use std::path::PathBuf;

use clap::Parser;

use asset_router::lifecycle::startup;
use asset_router::observability::logging;

#[derive(Parser)]
#[command(name = "asset-router")]
#[command(about = "Routes requests to the asset repository, font API and favicon service", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::prepare_config(cli.config.as_deref(), cli.bind)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "asset-router starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
