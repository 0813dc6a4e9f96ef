use racing_core::{ScrapeResult, Table};
use scraper::Html;

use super::{
    build_table, cell_text, collect_tables, extract_links, has_class, load, missing, selector,
    PageScraper, ScrapeError,
};
use crate::session::BrowserSession;

const TABLE_SELECTOR: &str = ".datatable";
const RACE_LINKS: &str = ".race-nav";
const COMMENT_CLASS: &str = "comment";

/// Speed-pro form guide, one sheet per race linked from the race navigation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpeedProScraper;

impl PageScraper for SpeedProScraper {
    fn name(&self) -> &str {
        "speed pro"
    }

    fn scrape(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<ScrapeResult, ScrapeError> {
        let entry = load(session, url)?;
        let urls = extract_links(&entry.html, &entry.final_url, RACE_LINKS)?;
        if urls.is_empty() {
            return Err(missing(RACE_LINKS, url));
        }
        Ok(collect_tables(session, url, &entry, &urls, parse_speed_pro))
    }
}

/// Comment rows carry the horse number and a free-text remark; the two
/// blank cells realign the remark under the columns that follow the horse.
pub fn parse_speed_pro(html: &str, url: &str) -> Result<Table, ScrapeError> {
    let document = Html::parse_document(html);
    let table_sel = selector(TABLE_SELECTOR)?;
    let head_sel = selector("th")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| missing(TABLE_SELECTOR, url))?;

    let headers: Vec<String> = table
        .select(&head_sel)
        .map(cell_text)
        .filter(|text| !text.is_empty())
        .collect();

    let mut rows = Vec::new();
    for tr in table.select(&row_sel) {
        let cells: Vec<String> = tr.select(&cell_sel).map(cell_text).collect();
        let Some((first, rest)) = cells.split_first() else {
            continue;
        };
        if has_class(tr, COMMENT_CLASS) {
            let mut row = vec![first.clone(), String::new(), String::new()];
            row.extend_from_slice(rest);
            rows.push(row);
        } else {
            rows.push(cells);
        }
    }

    build_table(url, headers, rows)
}
