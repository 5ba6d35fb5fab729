//! Moves the raw dataset between S3 and the local disk.
//!
//! Credentials and region come from the usual `AWS_*` variables.

use anyhow::{Context, Result};
use bodyfat_app::s3::{download_file, upload_file};
use bodyfat_app::setup_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "s3", version, about = "Copy files to and from S3")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch s3://bucket/key into a local file
    Download {
        #[arg(long)]
        s3_path: String,
        #[arg(long, default_value = "data/bodyfat.csv")]
        local_path: PathBuf,
    },
    /// Store a local file at s3://bucket/key
    Upload {
        #[arg(long)]
        s3_path: String,
        #[arg(long, default_value = "data/bodyfat.csv")]
        local_path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    match cli.command {
        Command::Download { s3_path, local_path } => download_file(&local_path, &s3_path)
            .await
            .with_context(|| format!("failed to download {s3_path}")),
        Command::Upload { s3_path, local_path } => upload_file(&local_path, &s3_path)
            .await
            .with_context(|| format!("failed to upload {}", local_path.display())),
    }
}
