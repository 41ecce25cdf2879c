//! Harvest CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use harvest::{
    error::Result,
    models::Config,
    pipeline,
    storage::LocalStorage,
    utils::http,
};

/// harvest - Incremental movie ranking and wanted-persons scraper
#[derive(Parser, Debug)]
#[command(
    name = "harvest",
    version,
    about = "Incremental, deduplicated listing harvester"
)]
struct Cli {
    /// Path to storage directory holding config and output files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harvest the ranked movie listing into batched units
    Movies {
        /// Combine all units into one file afterwards
        #[arg(long)]
        combine: bool,
    },

    /// Combine existing movie units into one file
    Combine,

    /// Harvest the wanted-persons listing into the ledger
    Wanted {
        /// Do not download mugshots
        #[arg(long)]
        skip_photos: bool,
    },

    /// Validate configuration file
    Validate,

    /// Show stored outputs and the last run
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load configuration
    let config_path = cli.storage_dir.join("config.toml");
    let config = if config_path.exists() {
        Config::load_or_default(&config_path)
    } else {
        Config::default()
    };
    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    let storage = LocalStorage::new(&cli.storage_dir);

    match cli.command {
        Command::Movies { combine } => {
            config.validate()?;
            let client = http::create_client(&config.crawler)?;
            let report = pipeline::run_movies(&config, &storage, &client).await?;
            pipeline::log_report(&report);
            pipeline::save_report(&storage, &report).await?;

            if combine {
                pipeline::combine_movies(&config, &storage).await?;
            }
        }

        Command::Combine => {
            let merged = pipeline::combine_movies(&config, &storage).await?;
            log::info!("Combined {} units", merged);
        }

        Command::Wanted { skip_photos } => {
            config.validate()?;
            let client = http::create_client(&config.crawler)?;
            let report = pipeline::run_wanted(&config, &storage, &client, skip_photos).await?;
            pipeline::log_report(&report);
            pipeline::save_report(&storage, &report).await?;
            log::info!("Number of records added: {}", report.added);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let units = pipeline::list_units(&storage, &config.movies.unit_prefix).await?;
            log::info!("Movie units: {}", units.len());
            for unit in &units {
                log::info!("    {}", unit);
            }

            let ledger = cli.storage_dir.join(&config.wanted.ledger_file);
            log::info!(
                "Wanted ledger: {}",
                if ledger.exists() { "exists" } else { "not found" }
            );

            match pipeline::load_report(&storage).await? {
                Some(report) => {
                    log::info!(
                        "Last run: {} at {} ({} added, {} failed)",
                        report.source,
                        report.end_time,
                        report.added,
                        report.failures.len()
                    );
                }
                None => log::info!("No run recorded yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
