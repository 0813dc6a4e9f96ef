//! Racing engine: page sessions, scrapers, workbook output and the parallel run orchestrator.
mod catalog;
mod decode;
mod fetch;
mod filename;
mod notify;
mod orchestrator;
mod persist;
mod progress;
mod retry;
mod save_worker;
mod scrape;
mod session;
mod types;
mod workbook;

use std::any::Any;

pub use catalog::{collect_meeting_dates, CatalogError};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::{destination_for, sanitize_component, WORKBOOK_EXTENSION};
pub use notify::{Notification, Notifier, NotifyError, OutboxNotifier};
pub use orchestrator::{
    planned_destinations, DatePlan, Orchestrator, OrchestratorSettings, Target, DATE_PLACEHOLDER,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use progress::ProgressReporter;
pub use retry::RetryPolicy;
pub use save_worker::{SaveReport, SaveWorker};
pub use scrape::{
    extract_links, parse_dates, parse_race_card, parse_race_result, parse_ranking,
    parse_speed_pro, DateListScraper, PageScraper, RaceCardScraper, RaceResultScraper,
    RankingScraper, ScrapeError, SpeedProScraper, DATES_HEADER,
};
pub use session::{BrowserSession, HttpSession, HttpSessionFactory, SessionFactory};
pub use tokio_util::sync::CancellationToken;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, LoadedPage};
pub use workbook::{sheet_name, SheetWriter, WriteError, XlsxWorkbookWriter};

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
