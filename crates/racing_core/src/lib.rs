//! Racing core: pure data model shared by the engine and the app.
mod progress;
mod summary;
mod table;
mod work;

pub use progress::{format_elapsed, percent_complete, ProgressLine};
pub use summary::{FailureStage, ItemFailure, RunSummary};
pub use table::{fit_row, ScrapeResult, Table, TableError, PLACEHOLDER_HEADER, PLACEHOLDER_MESSAGE};
pub use work::{SaveTask, WorkItem};
