use racing_core::{ScrapeResult, Table};
use scraper::Html;

use super::{
    build_table, cell_text, collect_tables, extract_links, is_hidden, load, missing, selector,
    text_lines, PageScraper, ScrapeError,
};
use crate::session::BrowserSession;

const TABLE_SELECTOR: &str = "#racecardlist table";
const RACE_LINKS: &str = ".racingNum";
const DETAILS_SELECTOR: &str = ".f_fs13";
const COLOUR_HEADER: &str = "Colour";
/// Colour is the third body cell; its swatch is an image, so only the header carries text.
const COLOUR_CELL: usize = 2;
/// Links to the simulcast meeting, which has no race card of its own.
const EXCLUDED_LINK: &str = "Racecourse=S1";

/// Today's race card, one sheet per race.
#[derive(Debug, Default, Clone, Copy)]
pub struct RaceCardScraper;

impl PageScraper for RaceCardScraper {
    fn name(&self) -> &str {
        "race card"
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
        urls.retain(|link| !link.contains(EXCLUDED_LINK));
        Ok(collect_tables(session, url, &entry, &urls, parse_race_card))
    }
}

pub fn parse_race_card(html: &str, url: &str) -> Result<Table, ScrapeError> {
    let document = Html::parse_document(html);
    let table_sel = selector(TABLE_SELECTOR)?;
    let head_sel = selector("thead td")?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| missing(TABLE_SELECTOR, url))?;

    let headers: Vec<String> = table
        .select(&head_sel)
        .map(cell_text)
        .filter(|text| !text.is_empty() && text != COLOUR_HEADER)
        .collect();

    let mut rows = vec![race_details(&document)?];
    for tr in table.select(&row_sel) {
        let mut row: Vec<String> = tr
            .select(&cell_sel)
            .filter(|td| !is_hidden(*td))
            .map(cell_text)
            .collect();
        if row.is_empty() {
            continue;
        }
        if row.len() > COLOUR_CELL {
            row.remove(COLOUR_CELL);
        }
        rows.push(row);
    }

    build_table(url, headers, rows)
}

fn race_details(document: &Html) -> Result<Vec<String>, ScrapeError> {
    let details_sel = selector(DETAILS_SELECTOR)?;
    let Some(element) = document.select(&details_sel).next() else {
        return Ok(vec!["No Race Details Found".to_string()]);
    };
    let mut row = vec!["Race Details".to_string()];
    for line in text_lines(element) {
        let lower = line.to_lowercase();
        if lower.contains("turf") || lower.contains("all weather track") {
            row.extend(line.split(',').map(|part| part.trim().to_string()));
        }
    }
    Ok(row)
}
