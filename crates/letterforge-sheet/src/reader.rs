//! Upload parsing: raw file bytes to [`SheetData`].
//!
//! The extension picks the decoder (calamine for workbook formats, the csv
//! crate for delimited text), but the content is never trusted to match the
//! extension: decode failures surface as [`ParseError::Corrupt`].

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Reader};

use crate::error::{ParseError, Result};
use crate::record::{CellValue, RowRecord, SheetData};

/// Accepted upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Excel-family workbook (xlsx, xlsm, xlsb, xls) or OpenDocument (ods)
    Workbook,
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
}

impl SheetFormat {
    /// Detect the format from a file name's extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SheetFormat::Workbook),
            "csv" => Some(SheetFormat::Csv),
            "tsv" | "tab" => Some(SheetFormat::Tsv),
            _ => None,
        }
    }
}

/// Parse an uploaded spreadsheet into [`SheetData`].
///
/// Reads only the first worksheet. The first non-empty row becomes the
/// header row; blank header cells are named `Column<n>`. Rows with no
/// values at all are skipped. A header-only or blank sheet fails with
/// [`ParseError::EmptyFile`].
pub fn parse_sheet(bytes: &[u8], file_name: &str) -> Result<SheetData> {
    let format = SheetFormat::from_file_name(file_name)
        .ok_or_else(|| ParseError::UnsupportedFormat(file_name.to_string()))?;

    let grid = match format {
        SheetFormat::Workbook => read_workbook(bytes)?,
        SheetFormat::Csv => read_delimited(bytes, b',')?,
        SheetFormat::Tsv => read_delimited(bytes, b'\t')?,
    };

    sheet_from_grid(grid)
}

/// Decode the first worksheet of a workbook into a cell grid
fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(ParseError::EmptyFile),
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect())
}

/// Decode delimited text into a cell grid
fn read_delimited(bytes: &[u8], delimiter: u8) -> Result<Vec<Vec<CellValue>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false) // we handle the header row ourselves
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: Vec<CellValue> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(field.to_string())
                }
            })
            .collect();
        grid.push(row);
    }

    Ok(grid)
}

/// Split a raw grid into headers plus records
fn sheet_from_grid(grid: Vec<Vec<CellValue>>) -> Result<SheetData> {
    let mut rows_iter = grid.into_iter().skip_while(row_is_blank);

    let header_cells = rows_iter.next().ok_or(ParseError::EmptyFile)?;
    let headers: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let text = cell.to_text();
            if text.trim().is_empty() {
                format!("Column{}", idx + 1)
            } else {
                text
            }
        })
        .collect();

    let mut rows = Vec::new();
    for raw in rows_iter {
        if row_is_blank(&raw) {
            continue;
        }
        // Pad short rows with Empty; cells beyond the header width are dropped
        let columns: Vec<(String, CellValue)> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let value = raw.get(idx).cloned().unwrap_or(CellValue::Empty);
                (name.clone(), value)
            })
            .collect();
        rows.push(RowRecord::from_pairs(columns));
    }

    if rows.is_empty() {
        return Err(ParseError::EmptyFile);
    }

    SheetData::new(headers, rows)
}

fn row_is_blank(row: &Vec<CellValue>) -> bool {
    row.iter().all(CellValue::is_empty)
}
