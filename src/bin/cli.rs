//! gradewatch CLI
//!
//! Polls the configured student information system and reports grade
//! changes until interrupted.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gradewatch::{
    error::Result,
    models::{AssignmentRecord, ClassRecord, Config, SnapshotRecord},
    pipeline::{Watcher, run_schedule},
    storage::{self, LoadStatus, SnapshotStorage, load_snapshot},
};

/// gradewatch - Student Grade Change Notifier
#[derive(Parser, Debug)]
#[command(name = "gradewatch", version, about = "Student Grade Change Notifier")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "gradewatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll on the configured interval until interrupted (default)
    Run,

    /// Run a single cycle and exit
    Once,

    /// Validate configuration file
    Validate,

    /// Show stored snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Log presence and size of one stored collection.
async fn report_snapshot<R: SnapshotRecord>(storage: &dyn SnapshotStorage) {
    let loaded = load_snapshot::<R>(storage).await;
    let location = storage.location(R::KIND);
    match loaded.status {
        LoadStatus::Found => log::info!(
            "{}: {} record(s) in {}",
            R::KIND,
            loaded.records.len(),
            location
        ),
        LoadStatus::Missing => log::info!("{}: no snapshot at {}", R::KIND, location),
        LoadStatus::Corrupt(reason) => {
            log::warn!("{}: unreadable snapshot at {} ({})", R::KIND, location, reason)
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("gradewatch starting...");

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            config.validate()?;
            let watcher = Watcher::from_config(&config)?;
            log::info!(
                "Polling every {}s; press Ctrl-C to stop",
                config.schedule.interval_secs
            );

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            run_schedule(&watcher, config.schedule.interval(), shutdown).await;
        }

        Command::Once => {
            config.validate()?;
            let watcher = Watcher::from_config(&config)?;
            let summary = watcher.run_cycle().await?;
            log::info!(
                "{} class change(s), {} assignment change(s), {} notification(s) sent",
                summary.class_changes,
                summary.assignment_changes,
                summary.notifications_sent
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            match &config.source.file {
                Some(path) => log::info!("✓ Source: file {}", path.display()),
                None => log::info!("✓ Source: {}", config.source.endpoint),
            }
            log::info!(
                "✓ Notifier: {}",
                if config.notifier.webhook_url.is_some() {
                    "webhook"
                } else {
                    "log only"
                }
            );
            log::info!(
                "✓ Interval: {}s, term prefix '{}'",
                config.schedule.interval_secs,
                config.schedule.term_prefix
            );

            log::info!("All validations passed!");
        }

        Command::Info => {
            let storage = storage::from_config(&config.storage);
            log::info!("Storage directory: {}", storage.root_dir().display());
            report_snapshot::<ClassRecord>(&storage).await;
            report_snapshot::<AssignmentRecord>(&storage).await;
        }
    }

    log::info!("Done!");

    Ok(())
}
