//! Populator CLI
//!
//! Fetches a storefront listing and writes it into the content backend.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use populator::{
    error::{AppError, Result},
    models::{Config, PopulateReport},
    pipeline::Populator,
    storage::{CatalogStorage, MemoryStorage, RestStorage},
    utils::{http, parse_param},
};

/// Populator - storefront catalog ingestion
#[derive(Parser, Debug)]
#[command(name = "populate", version, about = "Populate a catalog from a storefront listing")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "populate.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the listing and create missing records
    Run {
        /// Listing filter as key=value (repeatable), e.g. --param price=free
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Write into an in-memory store instead of the backend
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_summary(report: &PopulateReport) {
    log::info!("[SUMMARY] Population finished");
    for (label, value) in report.summary_items() {
        log::info!("    {}: {}", label, value);
    }
    for failure in &report.failed {
        log::warn!("    failed: {} ({})", failure.title, failure.reason);
    }
    for failure in &report.relations.failed {
        log::warn!(
            "    unresolved {}: {} ({})",
            failure.kind,
            failure.name,
            failure.reason
        );
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    config.apply_env_overrides();
    init_logging(cli.verbose, &config.logging.level);

    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run { params, dry_run } => {
            config.validate()?;

            let params = params
                .iter()
                .map(|raw| {
                    parse_param(raw).ok_or_else(|| {
                        AppError::validation(format!("invalid --param '{raw}', expected KEY=VALUE"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let client = http::create_async_client(&config.http)?;
            let storage: Arc<dyn CatalogStorage> = if dry_run {
                log::info!("Dry run: records are kept in memory");
                Arc::new(MemoryStorage::new())
            } else {
                let rest = RestStorage::new(client.clone(), &config.storage)?;
                log::info!("Storage backend: {}", rest.base_url());
                Arc::new(rest)
            };

            let populator = Populator::new(&config, client, storage)?;
            let report = match populator.populate(&params).await {
                Ok(report) => report,
                Err(e) => {
                    log::error!("Population aborted: {}", e);
                    return Err(e);
                }
            };

            print_summary(&report);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    log::info!("Done!");

    Ok(())
}
