use std::collections::HashMap;

use pretty_assertions::assert_eq;
use racing_engine::{
    extract_links, parse_dates, parse_race_card, parse_race_result, parse_ranking,
    parse_speed_pro, BrowserSession, DateListScraper, FailureKind, FetchError, LoadedPage,
    PageScraper, RaceResultScraper, ScrapeError, SpeedProScraper, DATES_HEADER,
};

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Serves canned HTML by URL; unknown URLs fail like a 404.
struct FixtureSession {
    pages: HashMap<String, String>,
    opened: Vec<String>,
}

impl FixtureSession {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
            opened: Vec::new(),
        }
    }
}

impl BrowserSession for FixtureSession {
    fn open(&mut self, url: &str) -> Result<LoadedPage, FetchError> {
        self.opened.push(url.to_string());
        self.pages
            .get(url)
            .map(|html| LoadedPage {
                final_url: url.to_string(),
                html: html.clone(),
            })
            .ok_or_else(|| FetchError::new(FailureKind::HttpStatus(404), "Not Found"))
    }
}

const RESULT_PAGE: &str = r#"
<html><body>
  <div class="raceMeeting_select"><span>Race Meeting:  01/01/2024 Sha Tin</span></div>
  <div class="top_races">
    <a href="/results?date=2024/01/01&RaceNo=1">1</a>
    <a href="/results?date=2024/01/01&RaceNo=2">2</a>
    <a href="/results?date=2024/01/01&RaceNo=2">2</a>
  </div>
  <div id="innerContent">
    <div class="performance"><table>
      <thead><tr><td>Pla.</td><td>Horse No.</td><td></td><td>Horse</td></tr></thead>
      <tbody>
        <tr><td>1</td><td>7</td><td style="display: none">hidden</td><td>GOLDEN  SIXTY</td></tr>
        <tr><td>2</td><td>3</td><td style="display:none">x</td><td>ROMANTIC WARRIOR</td></tr>
        <tr></tr>
      </tbody>
    </table></div>
  </div>
</body></html>"#;

#[test]
fn race_result_table_has_details_row_and_visible_cells() {
    let table = parse_race_result(RESULT_PAGE, "https://example.test/results").unwrap();
    assert_eq!(table.headers(), strings(&["Pla.", "Horse No.", "Horse"]).as_slice());
    assert_eq!(
        table.rows(),
        &[
            strings(&["Race Details", "01/01/2024 Sha Tin", ""]),
            strings(&["1", "7", "GOLDEN SIXTY"]),
            strings(&["2", "3", "ROMANTIC WARRIOR"]),
        ]
    );
}

#[test]
fn race_result_without_table_is_missing_element() {
    let err = parse_race_result("<html><body></body></html>", "https://example.test/x").unwrap_err();
    assert!(matches!(err, ScrapeError::MissingElement { .. }));
}

#[test]
fn links_are_resolved_and_deduplicated() {
    let links = extract_links(RESULT_PAGE, "https://example.test/results?date=2024/01/01", ".top_races")
        .unwrap();
    assert_eq!(
        links,
        strings(&[
            "https://example.test/results?date=2024/01/01&RaceNo=1",
            "https://example.test/results?date=2024/01/01&RaceNo=2",
        ])
    );
}

#[test]
fn race_result_scraper_collects_one_table_per_page_and_skips_failures() {
    let entry = "https://example.test/results?date=2024/01/01";
    let race_one = "https://example.test/results?date=2024/01/01&RaceNo=1";
    let mut session = FixtureSession::new(&[(entry, RESULT_PAGE), (race_one, RESULT_PAGE)]);

    let result = RaceResultScraper.scrape(&mut session, entry).unwrap();

    // Entry page is parsed from the first load; race 2 is a 404 and skipped.
    assert_eq!(result.tables().len(), 2);
    assert_eq!(session.opened.iter().filter(|u| u.as_str() == entry).count(), 1);
    assert_eq!(session.opened.len(), 3);
}

#[test]
fn race_result_scraper_fails_when_entry_page_fails() {
    let mut session = FixtureSession::new(&[]);
    let err = RaceResultScraper
        .scrape(&mut session, "https://example.test/none")
        .unwrap_err();
    assert!(matches!(err, ScrapeError::Fetch { .. }));
}

#[test]
fn race_card_drops_colour_column_and_collects_going_details() {
    let html = r#"
    <html><body>
      <div class="f_fs13">Race 1 - SHA TIN<br>Sunday, January 07, 2024, Sha Tin, 12:45<br>Turf, "B+2" Course, 1200M, Good</div>
      <div id="racecardlist"><table>
        <thead><tr><td>Horse No.</td><td>Last 6 Runs</td><td>Colour</td><td>Horse</td><td>Wt.</td><td>Jockey</td></tr></thead>
        <tbody>
          <tr><td>1</td><td>1/2/3</td><td><img></td><td>GOLDEN SIXTY</td><td>133</td><td>Z Purton</td></tr>
        </tbody>
      </table></div>
    </body></html>"#;
    let table = parse_race_card(html, "https://example.test/card").unwrap();
    assert_eq!(
        table.headers(),
        strings(&["Horse No.", "Last 6 Runs", "Horse", "Wt.", "Jockey"]).as_slice()
    );
    assert_eq!(
        table.rows()[0],
        strings(&["Race Details", "Turf", "\"B+2\" Course", "1200M", "Good"])
    );
    assert_eq!(
        table.rows()[1],
        strings(&["1", "1/2/3", "GOLDEN SIXTY", "133", "Z Purton"])
    );
}

#[test]
fn ranking_uses_second_table_and_second_header_row() {
    let html = r#"
    <html><body><div id="innerContent">
      <table><tr><td>season selector</td></tr></table>
      <table>
        <thead>
          <tr><td>Season 2023/2024</td></tr>
          <tr><td>Trainer</td><td>Win</td><td></td><td>2nd</td></tr>
        </thead>
        <tbody>
          <tr><td>J Size</td><td>40</td><td></td><td>31</td></tr>
          <tr><td></td></tr>
          <tr><td>F C Lor</td><td>39</td><td></td><td>30</td></tr>
        </tbody>
      </table>
    </div></body></html>"#;
    let table = parse_ranking(html, "https://example.test/trainers").unwrap();
    assert_eq!(table.headers(), strings(&["Trainer", "Win", "2nd"]).as_slice());
    assert_eq!(
        table.rows(),
        &[strings(&["J Size", "40", "31"]), strings(&["F C Lor", "39", "30"])]
    );
}

const SPEED_PRO_PAGE: &str = r#"
<html><body>
  <div class="race-nav"><a href="race1.html">R1</a><a href="race2.html">R2</a></div>
  <table class="datatable">
    <tr><th>No.</th><th>Horse</th><th>Draw</th><th>Fitness</th></tr>
    <tr><td>1</td><td>GOLDEN SIXTY</td><td>4</td><td>95</td></tr>
    <tr class="comment"><td>1</td><td>Strong trial</td></tr>
  </table>
</body></html>"#;

#[test]
fn speed_pro_realigns_comment_rows() {
    let table = parse_speed_pro(SPEED_PRO_PAGE, "https://example.test/sp/race1.html").unwrap();
    assert_eq!(table.headers(), strings(&["No.", "Horse", "Draw", "Fitness"]).as_slice());
    assert_eq!(
        table.rows(),
        &[
            strings(&["1", "GOLDEN SIXTY", "4", "95"]),
            strings(&["1", "", "", "Strong trial"]),
        ]
    );
}

#[test]
fn speed_pro_scraper_follows_race_navigation() {
    let entry = "https://example.test/sp/formguide.html";
    let mut session = FixtureSession::new(&[
        (entry, SPEED_PRO_PAGE),
        ("https://example.test/sp/race1.html", SPEED_PRO_PAGE),
        ("https://example.test/sp/race2.html", SPEED_PRO_PAGE),
    ]);
    let result = SpeedProScraper.scrape(&mut session, entry).unwrap();
    assert_eq!(result.tables().len(), 2);
}

#[test]
fn date_list_reads_select_options() {
    let html = r#"<html><body><select>
        <option>07/01/2024</option><option> 01/01/2024 </option><option></option>
    </select></body></html>"#;
    assert_eq!(
        parse_dates(html, "https://example.test/results").unwrap(),
        strings(&["07/01/2024", "01/01/2024"])
    );

    let url = "https://example.test/results";
    let mut session = FixtureSession::new(&[(url, html)]);
    let result = DateListScraper.scrape(&mut session, url).unwrap();
    let table = &result.tables()[0];
    assert_eq!(table.headers(), strings(&[DATES_HEADER]).as_slice());
    assert_eq!(table.rows().len(), 2);
}

#[test]
fn date_list_without_select_is_an_error() {
    assert!(parse_dates("<p>maintenance</p>", "https://example.test").is_err());
}
