//! Logger setup for the scraper binary, driven by the `logging` section of the config.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum LogDestination {
    File,
    Terminal,
    #[default]
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub destination: LogDestination,
    /// Truncated at start-up.
    pub file: PathBuf,
    /// Debug level instead of Info.
    pub verbose: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::Both,
            file: PathBuf::from("racing.log"),
            verbose: false,
        }
    }
}

impl LoggingConfig {
    fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

/// Installs the global logger. A second call, or a log file that cannot be
/// created, leaves whatever logging is possible in place.
pub fn initialize(settings: &LoggingConfig) {
    let _ = CombinedLogger::init(loggers(settings));
}

fn loggers(settings: &LoggingConfig) -> Vec<Box<dyn SharedLogger>> {
    let level = settings.level();
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(settings.destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(settings.destination, LogDestination::File | LogDestination::Both) {
        if let Some(file_logger) = file_logger(level, config, &settings.file) {
            loggers.push(file_logger);
        }
    }
    loggers
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Debug)
        .build()
}

fn file_logger(level: LevelFilter, config: Config, path: &Path) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: could not create log file {:?}: {}", path, err);
            None
        }
    }
}
