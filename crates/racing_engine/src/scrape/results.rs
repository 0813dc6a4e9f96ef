use racing_core::{ScrapeResult, Table};
use scraper::Html;

use super::{
    build_table, cell_text, collect_tables, extract_links, is_hidden, load, missing, selector,
    PageScraper, ScrapeError,
};
use crate::session::BrowserSession;

const TABLE_SELECTOR: &str = "#innerContent .performance";
const RACE_LINKS: &str = ".top_races";
const MEETING_SELECTOR: &str = ".raceMeeting_select span";
const MEETING_PREFIX: &str = "Race Meeting:";

/// Past results of every race on one meeting date.
#[derive(Debug, Default, Clone, Copy)]
pub struct RaceResultScraper;

impl PageScraper for RaceResultScraper {
    fn name(&self) -> &str {
        "race results"
    }

    fn scrape(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<ScrapeResult, ScrapeError> {
        let entry = load(session, url)?;
        let mut urls = vec![url.to_string()];
        for link in extract_links(&entry.html, &entry.final_url, RACE_LINKS)? {
            if link != url && link != entry.final_url {
                urls.push(link);
            }
        }
        Ok(collect_tables(session, url, &entry, &urls, parse_race_result))
    }
}

/// One results table: a race details row followed by the finishing order.
pub fn parse_race_result(html: &str, url: &str) -> Result<Table, ScrapeError> {
    let document = Html::parse_document(html);
    let section_sel = selector(TABLE_SELECTOR)?;
    let head_sel = selector("thead td")?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;

    let section = document
        .select(&section_sel)
        .next()
        .ok_or_else(|| missing(TABLE_SELECTOR, url))?;

    let headers: Vec<String> = section
        .select(&head_sel)
        .map(cell_text)
        .filter(|text| !text.is_empty())
        .collect();

    let mut rows = vec![race_details(&document)?];
    for tr in section.select(&row_sel) {
        let row: Vec<String> = tr
            .select(&cell_sel)
            .filter(|td| !is_hidden(*td))
            .map(cell_text)
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    build_table(url, headers, rows)
}

fn race_details(document: &Html) -> Result<Vec<String>, ScrapeError> {
    let meeting_sel = selector(MEETING_SELECTOR)?;
    let info = document
        .select(&meeting_sel)
        .next()
        .map(cell_text)
        .map(|text| text.replace(MEETING_PREFIX, "").trim().to_string())
        .filter(|text| !text.is_empty());
    Ok(match info {
        Some(info) => vec!["Race Details".to_string(), info],
        None => vec!["No Race Details Found".to_string()],
    })
}
