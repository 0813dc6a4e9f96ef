mod config;
mod logging;
mod run;
mod signal;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use racing_engine::{CancellationToken, HttpSessionFactory, XlsxWorkbookWriter};
use racing_logging::{racing_info, racing_warn};

use crate::config::{RunConfig, DEFAULT_CONFIG_FILENAME};

fn main() -> anyhow::Result<()> {
    // An explicit path must exist; the default file is optional.
    let (config_path, required) = match std::env::args_os().nth(1) {
        Some(path) => (PathBuf::from(path), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };
    let config = RunConfig::load(&config_path, required)
        .with_context(|| format!("loading {}", config_path.display()))?;
    logging::initialize(&config.logging);
    if config_path.is_file() {
        racing_info!("Loaded config from {:?}", config_path);
    } else {
        racing_info!("No config at {:?}, using defaults", config_path);
    }
    config.validate().context("checking configuration")?;

    let token = CancellationToken::new();
    if let Err(err) = signal::install_interrupt_handler(token.clone(), config.grace_period()) {
        racing_warn!("Interrupt handling unavailable: {}", err);
    }

    let today = chrono::Local::now().date_naive();
    racing_info!(
        "Starting scrape on {} (all dates: {}, workers: {})",
        today,
        config.crawl_all_dates,
        config.worker_count
    );

    let sessions = Arc::new(HttpSessionFactory::new(config.fetch_settings()));
    let summary = run::execute(
        &config,
        &token,
        sessions,
        Arc::new(XlsxWorkbookWriter),
        today,
    );
    run::log_summary(&summary, &config.output_dir);

    if summary.cancelled {
        racing_warn!("Run was interrupted");
        log::logger().flush();
        process::exit(signal::INTERRUPTED_EXIT_CODE);
    }

    run::notify_if_enabled(&config, &summary, today);
    Ok(())
}
