//! Serves the body-fat form.

use anyhow::{Context, Result};
use bodyfat_app::{setup_logging, web, AppSettings};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "serve", version, about = "Serve the body-fat estimator web form")]
struct Cli {
    /// Overrides BODYFAT_HOST
    #[arg(long)]
    host: Option<String>,

    /// Overrides BODYFAT_PORT
    #[arg(short, long)]
    port: Option<u16>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let mut settings = AppSettings::from_env().context("invalid server settings")?;
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }

    web::serve(&settings).await
}
