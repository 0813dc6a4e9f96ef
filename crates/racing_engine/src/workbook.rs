use std::path::{Path, PathBuf};

use racing_core::Table;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, XlsxError};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("workbook error: {0}")]
    Workbook(#[from] XlsxError),
    #[error("nothing to write for {0}")]
    NoTables(String),
    #[error("table {sheet} exceeds the worksheet size limit")]
    TooLarge { sheet: String },
}

/// Persists an ordered list of tables as one sheet each.
pub trait SheetWriter: Send + Sync {
    fn write(&self, tables: &[Table], destination: &Path) -> Result<PathBuf, WriteError>;
}

/// Sheet name for the table at 0-based `position`.
pub fn sheet_name(position: usize) -> String {
    format!("Page_{}", position + 1)
}

/// `.xlsx` writer: header row in bold, data rows below, one worksheet per table.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWorkbookWriter;

impl XlsxWorkbookWriter {
    /// Encodes the workbook in memory without touching the filesystem.
    pub fn encode(&self, tables: &[Table]) -> Result<Vec<u8>, WriteError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for (position, table) in tables.iter().enumerate() {
            let name = sheet_name(position);
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&name)?;

            for (col, header) in table.headers().iter().enumerate() {
                let col = to_col(col, &name)?;
                worksheet.write_string_with_format(0, col, header, &header_format)?;
            }
            for (row_idx, row) in table.rows().iter().enumerate() {
                let row_num = to_row(row_idx + 1, &name)?;
                for (col, cell) in row.iter().enumerate() {
                    if cell.is_empty() {
                        continue;
                    }
                    worksheet.write_string(row_num, to_col(col, &name)?, cell)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

impl SheetWriter for XlsxWorkbookWriter {
    fn write(&self, tables: &[Table], destination: &Path) -> Result<PathBuf, WriteError> {
        if tables.is_empty() {
            return Err(WriteError::NoTables(destination.display().to_string()));
        }
        let bytes = self.encode(tables)?;
        let (writer, filename) = AtomicFileWriter::for_target(destination)?;
        Ok(writer.write(&filename, &bytes)?)
    }
}

fn to_row(index: usize, sheet: &str) -> Result<RowNum, WriteError> {
    RowNum::try_from(index).map_err(|_| WriteError::TooLarge {
        sheet: sheet.to_string(),
    })
}

fn to_col(index: usize, sheet: &str) -> Result<ColNum, WriteError> {
    ColNum::try_from(index).map_err(|_| WriteError::TooLarge {
        sheet: sheet.to_string(),
    })
}
