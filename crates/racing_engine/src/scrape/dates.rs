use racing_core::{ScrapeResult, Table};
use scraper::Html;

use super::{cell_text, load, missing, selector, PageScraper, ScrapeError};
use crate::session::BrowserSession;

pub const DATES_HEADER: &str = "Dates";

/// Every meeting date offered by the results page's date picker.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateListScraper;

impl PageScraper for DateListScraper {
    fn name(&self) -> &str {
        "meeting dates"
    }

    fn scrape(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<ScrapeResult, ScrapeError> {
        let page = load(session, url)?;
        let dates = parse_dates(&page.html, url)?;
        let rows = dates.into_iter().map(|date| vec![date]).collect();
        let table = Table::new(vec![DATES_HEADER.to_string()], rows).map_err(|source| {
            ScrapeError::Table {
                url: url.to_string(),
                source,
            }
        })?;
        Ok(ScrapeResult::new(vec![table]))
    }
}

/// Option texts of the first `<select>`, most recent first as the site lists them.
pub fn parse_dates(html: &str, url: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let select_sel = selector("select")?;
    let option_sel = selector("option")?;

    let select = document
        .select(&select_sel)
        .next()
        .ok_or_else(|| missing("select", url))?;
    let dates: Vec<String> = select
        .select(&option_sel)
        .map(cell_text)
        .filter(|text| !text.is_empty())
        .collect();
    if dates.is_empty() {
        return Err(missing("select option", url));
    }
    Ok(dates)
}
