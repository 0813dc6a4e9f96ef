use std::path::Path;

use racing_logging::{racing_error, racing_info};
use thiserror::Error;

use crate::scrape::{DateListScraper, PageScraper, ScrapeError};
use crate::session::SessionFactory;
use crate::workbook::SheetWriter;
use crate::FetchError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not open session: {0}")]
    Session(#[from] FetchError),
    #[error("could not read meeting dates: {0}")]
    Scrape(#[from] ScrapeError),
}

/// Reads every known meeting date from `url` and saves them to `destination`
/// as the aggregate date workbook. A failed save is logged; the dates are
/// still returned so the run can proceed.
pub fn collect_meeting_dates(
    sessions: &dyn SessionFactory,
    writer: &dyn SheetWriter,
    url: &str,
    destination: &Path,
) -> Result<Vec<String>, CatalogError> {
    let mut session = sessions.create()?;
    let result = DateListScraper.scrape(session.as_mut(), url)?;
    drop(session);

    let dates: Vec<String> = result
        .tables()
        .iter()
        .flat_map(|table| table.rows())
        .filter_map(|row| row.first())
        .map(|date| date.trim().to_string())
        .filter(|date| !date.is_empty())
        .collect();
    racing_info!("Found {} meeting date(s)", dates.len());

    match writer.write(result.tables(), destination) {
        Ok(path) => racing_info!("Saved meeting dates to {:?}", path),
        Err(err) => racing_error!("Failed to save meeting dates to {:?}: {}", destination, err),
    }
    Ok(dates)
}
