use thiserror::Error;

pub const PLACEHOLDER_HEADER: &str = "Notice";
pub const PLACEHOLDER_MESSAGE: &str = "No data was found on the scraped pages.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// A header row plus data rows, all of the same width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, rejecting any row whose width differs from the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let expected = headers.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(TableError::RaggedRow {
                row,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    /// Builds a table from scraped rows of uneven width by fitting every row to the header.
    pub fn from_ragged(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows.into_iter().map(|row| fit_row(row, width)).collect();
        Self { headers, rows }
    }

    /// Single-sheet stand-in written when every scraped table came back empty.
    pub fn placeholder() -> Self {
        Self {
            headers: vec![PLACEHOLDER_HEADER.to_string()],
            rows: vec![vec![PLACEHOLDER_MESSAGE.to_string()]],
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Pads with empty cells or truncates so the row has exactly `width` cells.
pub fn fit_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize(width, String::new());
    row
}

/// Ordered tables produced by one page scraper call. No tables means the item failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeResult {
    tables: Vec<Table>,
}

impl ScrapeResult {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// True when the scraper produced no tables at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// True when there are no tables, or every table has no data rows.
    pub fn has_no_rows(&self) -> bool {
        self.tables.iter().all(Table::is_empty)
    }

    /// Tables ready for writing: the placeholder sheet replaces an all-empty result.
    pub fn into_writable(self) -> Vec<Table> {
        if self.has_no_rows() {
            vec![Table::placeholder()]
        } else {
            self.tables
        }
    }
}

impl From<Vec<Table>> for ScrapeResult {
    fn from(tables: Vec<Table>) -> Self {
        Self::new(tables)
    }
}

impl From<Option<ScrapeResult>> for ScrapeResult {
    fn from(result: Option<ScrapeResult>) -> Self {
        result.unwrap_or_default()
    }
}
