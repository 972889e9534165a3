//! Helmreg CLI
//!
//! Terminal interface for the helmet registration record store. Owners
//! register, fill in details, and attach document images; authority
//! accounts search by helmet id and approve or reject.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use helmreg_core::config;
use helmreg_core::tracing_init::init_tracing;
use helmreg_store::Store;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "helmreg")]
#[command(version, about = "Helmet registration record manager", long_about = None)]
struct Cli {
    /// Database path (overrides config and HELMREG_DATABASE_PATH)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Emit structured JSON log lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("helmreg=warn", cli.log_json);

    let mut config = config::load_config()?;
    if let Some(path) = cli.database {
        config.storage.database_path = Some(path);
    }
    let db_path = config
        .storage
        .database_path
        .clone()
        .or_else(config::database_path)
        .ok_or_else(|| anyhow::anyhow!("no database path configured; pass --database"))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting helmreg CLI");

    let mut store = Store::open(&db_path).await?;
    commands::run(&mut store, &config, cli.command).await
}
