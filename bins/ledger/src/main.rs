//! OpenBank ledger CLI
//!
//! Replays JSON scripts of account operations against an in-memory ledger
//! and prints one JSON line per step on stdout. Logs go to stderr.

mod script;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use openbank_core::account::AccountService;
use openbank_core::calendar::BizDate;
use openbank_core::ledger::LedgerError;
use openbank_core::product::default_products;
use openbank_shared::AppConfig;
use openbank_shared::config::LogConfig;
use openbank_store::{MemoryLedgerStore, MemoryProductCatalog};

use script::{ScriptRunner, Step};

#[derive(Parser)]
#[command(name = "openbank")]
#[command(about = "OpenBank - deposit account ledger", long_about = None)]
struct Cli {
    /// First day the standard products are valid (YYYYMMDD)
    #[arg(long, default_value = "20000101", global = true)]
    catalog_start: BizDate,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON script of account operations
    Replay {
        /// Path to the script
        script: PathBuf,
        /// Report failed steps and continue instead of stopping
        #[arg(long)]
        keep_going: bool,
    },

    /// List the standard products
    Products,
}

fn init_tracing(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn error_json(err: &anyhow::Error) -> serde_json::Value {
    match err.downcast_ref::<LedgerError>() {
        Some(ledger) => json!({
            "code": ledger.error_code(),
            "kind": format!("{:?}", ledger.kind()),
            "message": ledger.to_string(),
        }),
        None => json!({ "code": "SCRIPT_ERROR", "message": format!("{err:#}") }),
    }
}

async fn replay(
    config: &AppConfig,
    catalog_start: BizDate,
    path: &Path,
    keep_going: bool,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid script {}", path.display()))?;

    let store = Arc::new(MemoryLedgerStore::from_config(&config.ledger));
    let catalog = Arc::new(MemoryProductCatalog::seeded(catalog_start)?);
    let service = AccountService::from_config(store, catalog, config);
    let mut runner = ScriptRunner::new(service);

    info!(steps = steps.len(), script = %path.display(), "Replaying script");

    let mut failures = 0usize;
    for (idx, step) in steps.into_iter().enumerate() {
        let number = idx + 1;
        let op = step.name();

        match runner.run(step).await {
            Ok(result) => {
                println!("{}", json!({ "step": number, "op": op, "ok": true, "result": result }));
            }
            Err(err) => {
                failures += 1;
                println!(
                    "{}",
                    json!({ "step": number, "op": op, "ok": false, "error": error_json(&err) })
                );
                if !keep_going {
                    bail!("Step {number} ({op}) failed: {err:#}");
                }
                warn!(step = number, op, error = %err, "Step failed, continuing");
            }
        }
    }

    info!(failures, "Replay finished");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log);

    let cli = Cli::parse();
    info!(
        rounding = %config.interest.rounding,
        lock_timeout_ms = config.ledger.lock_timeout_ms,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Replay { script, keep_going } => {
            replay(&config, cli.catalog_start, &script, keep_going).await
        }
        Commands::Products => {
            for product in default_products(cli.catalog_start) {
                println!("{}", serde_json::to_string(&product.validate()?)?);
            }
            Ok(())
        }
    }
}
