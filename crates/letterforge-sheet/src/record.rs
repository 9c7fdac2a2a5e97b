//! Row and sheet data model.
//!
//! An uploaded worksheet becomes a [`SheetData`]: an ordered header list plus
//! one [`RowRecord`] per data row. Every record carries the same key set as
//! the headers, so downstream code never deals with ragged rows.

use calamine::Data;

use crate::error::{ParseError, Result};

/// A single cell value with a deterministic text representation
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent or blank cell
    Empty,
    /// Plain text
    Text(String),
    /// Numeric value (integers are preserved through formatting)
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Date/time rendered as the serial or ISO string the source provided
    DateTime(String),
}

impl CellValue {
    /// Whether this cell holds no value
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Stable text representation used for substitution and previews.
    ///
    /// Rules (fixed, so resolved output is byte-for-byte reproducible):
    /// - `Empty` -> `""`
    /// - `Text` -> the string unchanged
    /// - `Number` -> no decimals when the value is integral (`100` not
    ///   `100.0`), otherwise Rust's shortest `f64` display
    /// - `Bool` -> `true` / `false`
    /// - `DateTime` -> the string as parsed from the source
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    n.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(s) => s.clone(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(e) => CellValue::Text(format!("#ERROR: {:?}", e)),
            Data::DateTime(dt) => CellValue::DateTime(dt.to_string()),
            Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
            Data::DurationIso(s) => CellValue::DateTime(s.clone()),
        }
    }
}

/// One spreadsheet row as an ordered column-name -> value mapping.
///
/// Immutable once parsed; insertion order matches the sheet's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    columns: Vec<(String, CellValue)>,
}

impl RowRecord {
    /// Build a record from ordered (column, value) pairs
    pub fn from_pairs(columns: Vec<(String, CellValue)>) -> Self {
        Self { columns }
    }

    /// Look up a cell by exact column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterate over (column, value) pairs in sheet order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Column names in sheet order
    pub fn keys(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Cell values rendered as text, in sheet order (preview rows)
    pub fn values_text(&self) -> Vec<String> {
        self.columns.iter().map(|(_, v)| v.to_text()).collect()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Parsed contents of one worksheet: headers plus data rows
#[derive(Debug, Clone)]
pub struct SheetData {
    headers: Vec<String>,
    rows: Vec<RowRecord>,
}

impl SheetData {
    /// Build sheet data, validating that every row carries exactly the
    /// header key set.
    pub fn new(headers: Vec<String>, rows: Vec<RowRecord>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.keys() != headers.iter().map(String::as_str).collect::<Vec<_>>() {
                return Err(ParseError::Corrupt(format!(
                    "row {} does not match the header columns",
                    idx
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Column names in sheet order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All data rows in sheet order
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The first `n` rows, for upload previews
    pub fn preview(&self, n: usize) -> &[RowRecord] {
        &self.rows[..n.min(self.rows.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> RowRecord {
        RowRecord::from_pairs(
            pairs
                .iter()
                .map(|(n, v)| (n.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_cell_to_text_numbers() {
        assert_eq!(CellValue::Number(100.0).to_text(), "100");
        assert_eq!(CellValue::Number(3.25).to_text(), "3.25");
        assert_eq!(CellValue::Number(-7.0).to_text(), "-7");
    }

    #[test]
    fn test_cell_to_text_other() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::Text("Acme".into()).to_text(), "Acme");
        assert_eq!(CellValue::Bool(true).to_text(), "true");
        assert_eq!(CellValue::DateTime("2024-01-31".into()).to_text(), "2024-01-31");
    }

    #[test]
    fn test_cell_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_row_record_lookup() {
        let row = record(&[
            ("Name", CellValue::Text("Acme".into())),
            ("Balance", CellValue::Number(100.0)),
        ]);

        assert_eq!(row.get("Name"), Some(&CellValue::Text("Acme".into())));
        assert_eq!(row.get("Balance"), Some(&CellValue::Number(100.0)));
        assert_eq!(row.get("Missing"), None);
        assert_eq!(row.keys(), vec!["Name", "Balance"]);
        assert_eq!(row.values_text(), vec!["Acme", "100"]);
    }

    #[test]
    fn test_sheet_data_validates_key_set() {
        let headers = vec!["A".to_string(), "B".to_string()];
        let good = record(&[("A", CellValue::Empty), ("B", CellValue::Empty)]);
        let bad = record(&[("A", CellValue::Empty)]);

        assert!(SheetData::new(headers.clone(), vec![good.clone()]).is_ok());
        assert!(SheetData::new(headers, vec![good, bad]).is_err());
    }

    #[test]
    fn test_sheet_preview_is_bounded() {
        let headers = vec!["A".to_string()];
        let rows: Vec<_> = (0..8)
            .map(|i| record(&[("A", CellValue::Number(i as f64))]))
            .collect();
        let sheet = SheetData::new(headers, rows).unwrap();

        assert_eq!(sheet.row_count(), 8);
        assert_eq!(sheet.preview(5).len(), 5);
        assert_eq!(sheet.preview(20).len(), 8);
    }
}
