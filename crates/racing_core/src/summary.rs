use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::format_elapsed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Session,
    Scrape,
    EmptyResult,
    Panicked,
    Save,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Session => write!(f, "session"),
            FailureStage::Scrape => write!(f, "scrape"),
            FailureStage::EmptyResult => write!(f, "empty result"),
            FailureStage::Panicked => write!(f, "panicked"),
            FailureStage::Save => write!(f, "save"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub identifier: String,
    pub stage: FailureStage,
    pub message: String,
}

/// Outcome counts of one orchestrated run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Work items that started executing.
    pub dispatched: usize,
    /// Items whose scrape produced at least one table.
    pub scraped: usize,
    pub saved: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
    pub save_failures: Vec<ItemFailure>,
    /// Save tasks dropped because the run was cancelled.
    pub discarded: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn failed_identifiers(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.identifier.as_str()).collect()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{status}: dispatched={dispatched} scraped={scraped} saved={saved} failed={failed} \
             save_failed={save_failed} discarded={discarded} elapsed={elapsed}",
            status = if self.cancelled { "cancelled" } else { "completed" },
            dispatched = self.dispatched,
            scraped = self.scraped,
            saved = self.saved.len(),
            failed = self.failures.len(),
            save_failed = self.save_failures.len(),
            discarded = self.discarded,
            elapsed = format_elapsed(self.elapsed),
        )
    }
}
