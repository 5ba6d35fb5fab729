//! Runs one stage of the training pipeline.
//!
//! ```text
//! run preprocess --config config/pipeline.toml
//! run train
//! ```

use anyhow::{Context, Result};
use bodyfat::config::PipelineConfig;
use bodyfat::pipeline::{run_step, Step};
use bodyfat_app::setup_logging;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "run", version, about = "Run one stage of the body-fat pipeline")]
struct Cli {
    /// preprocess, get_features, train, predict or evaluate
    step: Step,

    /// Pipeline configuration file
    #[arg(short, long, default_value = "config/pipeline.toml")]
    config: PathBuf,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let config = PipelineConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    run_step(cli.step, &config).with_context(|| format!("step `{}` failed", cli.step))?;
    Ok(())
}
