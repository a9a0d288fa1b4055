//! Polls the tracking service and moves merged work items to test.
//!
//! Usage:
//!
//! ```text
//! qa-triage [--config qa-triage.toml] [--once] [--log-file triage.log]
//! ```
//!
//! The access token may be supplied through `QA_TRIAGE_TOKEN` instead of
//! the configuration file. Log verbosity follows `RUST_LOG`.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use mockable::DefaultClock;
use qa_triage::config::Settings;
use qa_triage::triage::adapters::{file::FileProcessedLog, http::HttpTracker};
use qa_triage::worker::{Worker, interrupt_signal};
use std::fs;
use std::sync::Arc;
use tracing::{error, info};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "qa-triage", version)]
#[command(about = "Moves merged work items to test and opens development and QA sub-tasks")]
struct Args {
    /// Configuration file.
    #[arg(long, default_value = "qa-triage.toml")]
    config: Utf8PathBuf,

    /// Run a single iteration and exit.
    #[arg(long)]
    once: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<Utf8PathBuf>,
}

fn setup_logging(log_file: Option<&Utf8Path>) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = log_file.and_then(|path| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    if let Some(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();
    setup_logging(args.log_file.as_deref());

    let settings = Arc::new(Settings::load(&args.config).inspect_err(|err| {
        error!(config = %args.config, %err, "invalid configuration");
    })?);
    let tracker = Arc::new(HttpTracker::new(&settings)?);
    let processed = Arc::new(FileProcessedLog::open(&settings.processed_log)?);
    let worker = Worker::new(
        tracker,
        processed,
        Arc::new(DefaultClock),
        Arc::clone(&settings),
    );

    info!(
        branches = settings.monitored_branches.len(),
        interval_secs = settings.update_interval.as_secs(),
        "qa-triage started"
    );
    if args.once {
        worker.run_iteration().await;
    } else {
        let shutdown = interrupt_signal().inspect_err(|err| {
            error!(%err, "failed to install the shutdown handler");
        })?;
        worker.run_until(shutdown).await;
    }
    info!("qa-triage stopped");
    Ok(())
}
