use std::path::PathBuf;

use crate::ScrapeResult;

/// One unit of orchestrated work, bound to one date or page key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub identifier: String,
    pub url: String,
    pub destination: PathBuf,
    /// 1-based position, for progress reporting only.
    pub index: usize,
    pub total: usize,
}

/// A pending write of one scrape result to one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTask {
    pub identifier: String,
    pub destination: PathBuf,
    pub result: ScrapeResult,
}
