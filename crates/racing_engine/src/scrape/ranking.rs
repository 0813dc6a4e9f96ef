use racing_core::{ScrapeResult, Table};
use scraper::{ElementRef, Html, Selector};

use super::{build_table, cell_text, load, missing, selector, PageScraper, ScrapeError};
use crate::session::BrowserSession;

const TABLE_SELECTOR: &str = "#innerContent table";

/// Trainer or jockey ranking: a single table on a single page.
#[derive(Debug, Default, Clone, Copy)]
pub struct RankingScraper;

impl PageScraper for RankingScraper {
    fn name(&self) -> &str {
        "ranking"
    }

    fn scrape(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<ScrapeResult, ScrapeError> {
        let page = load(session, url)?;
        let table = parse_ranking(&page.html, url)?;
        Ok(ScrapeResult::new(vec![table]))
    }
}

/// The ranking is the second table of the content area; its first header
/// row is a season banner, the column names are in the second.
pub fn parse_ranking(html: &str, url: &str) -> Result<Table, ScrapeError> {
    let document = Html::parse_document(html);
    let table_sel = selector(TABLE_SELECTOR)?;
    let head_row_sel = selector("thead tr")?;
    let body_row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .nth(1)
        .ok_or_else(|| missing(TABLE_SELECTOR, url))?;
    let head_row = table
        .select(&head_row_sel)
        .nth(1)
        .ok_or_else(|| missing("thead tr", url))?;

    let headers = non_empty_cells(head_row, &cell_sel);
    let rows = table
        .select(&body_row_sel)
        .map(|tr| non_empty_cells(tr, &cell_sel))
        .filter(|row| !row.is_empty())
        .collect();

    build_table(url, headers, rows)
}

fn non_empty_cells(row: ElementRef, cell_sel: &Selector) -> Vec<String> {
    row.select(cell_sel)
        .map(cell_text)
        .filter(|text| !text.is_empty())
        .collect()
}
