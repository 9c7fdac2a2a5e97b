//! # letterforge-sheet
//!
//! Spreadsheet ingestion for letterforge - parse an uploaded Excel or CSV
//! file into typed row records ready for placeholder substitution.
//!
//! ## Features
//!
//! - **Excel support**: `.xlsx`/`.xlsm`/`.xlsb`/`.xls`/`.ods` via `calamine`
//! - **Delimited text**: `.csv`/`.tsv` via the `csv` crate
//! - **Typed rows**: every row carries the header key set, in sheet order
//!
//! ## Example
//!
//! ```rust,ignore
//! use letterforge_sheet::parse_sheet;
//!
//! let sheet = parse_sheet(&bytes, "accounts.xlsx")?;
//! for row in sheet.rows() {
//!     println!("{:?}", row.get("Customer Name"));
//! }
//! ```

pub mod error;
pub mod reader;
pub mod record;

// Re-exports
pub use error::{ParseError, Result};
pub use reader::{parse_sheet, SheetFormat};
pub use record::{CellValue, RowRecord, SheetData};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all exports are accessible
        let _: fn(&[u8], &str) -> Result<SheetData> = parse_sheet;
        let _ = CellValue::Empty;
    }
}
