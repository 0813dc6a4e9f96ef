#![deny(missing_docs)]
//! Shared logging utilities for the racing scraper workspace.
//!
//! This crate provides the `racing_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

use std::cell::RefCell;

thread_local! {
    /// Label of the work item the current thread is processing, if any.
    static ITEM_LABEL: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Tags log lines emitted from the current thread with `label`.
/// Worker threads call this when they pick up a work item.
pub fn set_item_label(label: Option<&str>) {
    ITEM_LABEL.with(|v| *v.borrow_mut() = label.map(str::to_string));
}

/// Returns the work item label for the current thread, or `"-"` when unset.
pub fn item_label() -> String {
    ITEM_LABEL.with(|v| v.borrow().clone().unwrap_or_else(|| "-".to_string()))
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! racing_trace {
    ($($arg:tt)*) => {{
        log::trace!("[{}] {}", $crate::item_label(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! racing_info {
    ($($arg:tt)*) => {{
        log::info!("[{}] {}", $crate::item_label(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! racing_debug {
    ($($arg:tt)*) => {{
        log::debug!("[{}] {}", $crate::item_label(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! racing_warn {
    ($($arg:tt)*) => {{
        log::warn!("[{}] {}", $crate::item_label(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! racing_error {
    ($($arg:tt)*) => {{
        log::error!("[{}] {}", $crate::item_label(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
