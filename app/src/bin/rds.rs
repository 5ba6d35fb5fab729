//! Manages the submissions database outside the web server.
//!
//! ```text
//! rds create_db --database data/bodyfat.db
//! rds ingest --name Ada --age 24 --weight 210.25 ... --wrist 18.8
//! ```

use anyhow::{Context, Result};
use bodyfat::serving::Measurements;
use bodyfat_app::{setup_logging, AppSettings, UserStore};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rds", version, about = "Create or append to the submissions database")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database file; defaults to DATABASE_URL or data/bodyfat.db
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the submissions table
    #[command(name = "create_db")]
    CreateDb,
    /// Append one record
    Ingest {
        #[arg(long, default_value = "")]
        name: String,
        #[command(flatten)]
        measurements: MeasurementArgs,
    },
}

#[derive(Args, Debug)]
struct MeasurementArgs {
    #[arg(long)]
    age: f64,
    #[arg(long)]
    weight: f64,
    #[arg(long)]
    height: f64,
    #[arg(long)]
    neck: f64,
    #[arg(long)]
    chest: f64,
    #[arg(long)]
    abdomen: f64,
    #[arg(long)]
    hip: f64,
    #[arg(long)]
    thigh: f64,
    #[arg(long)]
    knee: f64,
    #[arg(long)]
    ankle: f64,
    #[arg(long)]
    biceps: f64,
    #[arg(long)]
    forearm: f64,
    #[arg(long)]
    wrist: f64,
}

impl From<MeasurementArgs> for Measurements {
    fn from(m: MeasurementArgs) -> Self {
        Measurements {
            age: m.age,
            weight: m.weight,
            height: m.height,
            neck: m.neck,
            chest: m.chest,
            abdomen: m.abdomen,
            hip: m.hip,
            thigh: m.thigh,
            knee: m.knee,
            ankle: m.ankle,
            biceps: m.biceps,
            forearm: m.forearm,
            wrist: m.wrist,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let database = match cli.database {
        Some(path) => path,
        None => AppSettings::from_env()?.database_path,
    };

    match cli.command {
        Command::CreateDb => {
            if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let store = UserStore::open(&database)?;
            store.create_schema()?;
        }
        Command::Ingest { name, measurements } => {
            let store = UserStore::open(&database)?;
            let id = store
                .add_user(&name, &measurements.into())
                .with_context(|| format!("failed to ingest into {}", database.display()))?;
            info!("Stored record {} in {}", id, store.location());
        }
    }
    Ok(())
}
