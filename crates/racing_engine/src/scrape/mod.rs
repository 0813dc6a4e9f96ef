//! Page scrapers: turn one entry URL into the tables of that page and its linked sub-pages.
mod dates;
mod links;
mod racecard;
mod ranking;
mod results;
mod speed_pro;

use racing_core::{ScrapeResult, Table, TableError};
use racing_logging::racing_warn;
use scraper::{ElementRef, Selector};
use thiserror::Error;

use crate::session::BrowserSession;
use crate::{FetchError, LoadedPage};

pub use dates::{parse_dates, DateListScraper, DATES_HEADER};
pub use links::extract_links;
pub use racecard::{parse_race_card, RaceCardScraper};
pub use ranking::{parse_ranking, RankingScraper};
pub use results::{parse_race_result, RaceResultScraper};
pub use speed_pro::{parse_speed_pro, SpeedProScraper};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to load {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("element `{selector}` not found on {url}")]
    MissingElement { selector: String, url: String },
    #[error("invalid selector `{0}`")]
    Selector(String),
    #[error("no header cells in table on {url}")]
    NoHeaders { url: String },
    #[error("malformed table on {url}: {source}")]
    Table {
        url: String,
        #[source]
        source: TableError,
    },
}

/// Turns a URL into zero or more tables using an exclusive session.
///
/// Implementations must not panic on unexpected markup; a missing element on
/// a sub-page is logged and that sub-page skipped, while a failure on the
/// entry page is returned as an error.
pub trait PageScraper: Send + Sync {
    fn name(&self) -> &str;

    fn scrape(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<ScrapeResult, ScrapeError>;
}

pub(crate) fn load(session: &mut dyn BrowserSession, url: &str) -> Result<LoadedPage, ScrapeError> {
    session.open(url).map_err(|source| ScrapeError::Fetch {
        url: url.to_string(),
        source,
    })
}

pub(crate) fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css.to_string()))
}

pub(crate) fn missing(selector: &str, url: &str) -> ScrapeError {
    ScrapeError::MissingElement {
        selector: selector.to_string(),
        url: url.to_string(),
    }
}

/// Visible text of an element with whitespace runs collapsed.
pub(crate) fn cell_text(element: ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Text nodes of an element as trimmed, non-empty lines.
pub(crate) fn text_lines(element: ElementRef) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Inline `display: none` is how the site hides duplicate columns.
pub(crate) fn is_hidden(element: ElementRef) -> bool {
    element
        .value()
        .attr("style")
        .map(|style| {
            let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
            compact.to_ascii_lowercase().contains("display:none")
        })
        .unwrap_or(false)
}

pub(crate) fn has_class(element: ElementRef, class: &str) -> bool {
    element
        .value()
        .attr("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

pub(crate) fn build_table(
    url: &str,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> Result<Table, ScrapeError> {
    if headers.is_empty() {
        return Err(ScrapeError::NoHeaders {
            url: url.to_string(),
        });
    }
    Ok(Table::from_ragged(headers, rows))
}

/// Parses every page in `urls` into one table each, reusing the already
/// loaded entry page. Pages that fail to load or parse are skipped.
pub(crate) fn collect_tables<F>(
    session: &mut dyn BrowserSession,
    entry_url: &str,
    entry: &LoadedPage,
    urls: &[String],
    parse: F,
) -> ScrapeResult
where
    F: Fn(&str, &str) -> Result<Table, ScrapeError>,
{
    let mut result = ScrapeResult::empty();
    for page_url in urls {
        let table = if page_url == entry_url || *page_url == entry.final_url {
            parse(&entry.html, page_url)
        } else {
            load(session, page_url).and_then(|page| parse(&page.html, page_url))
        };
        match table {
            Ok(table) => result.push(table),
            Err(err) => racing_warn!("Skipping page {}: {}", page_url, err),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::{cell_text, has_class, is_hidden, selector, text_lines};

    #[test]
    fn cell_helpers_read_markup() {
        let doc = Html::parse_fragment(
            r#"<table><tr class="comment odd"><td style="DISPLAY: None">x</td><td> A
            <br> B </td></tr></table>"#,
        );
        let td = selector("td").unwrap();
        let tr = selector("tr").unwrap();
        let cells: Vec<_> = doc.select(&td).collect();
        assert!(is_hidden(cells[0]));
        assert!(!is_hidden(cells[1]));
        assert_eq!(cell_text(cells[1]), "A B");
        assert_eq!(text_lines(cells[1]), vec!["A".to_string(), "B".to_string()]);

        let row = doc.select(&tr).next().unwrap();
        assert!(has_class(row, "comment"));
        assert!(!has_class(row, "odd-row"));
    }
}
