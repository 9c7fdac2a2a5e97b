//! letterforge CLI - Command-line interface library
//!
//! This library provides the CLI functionality for letterforge, including:
//! - Inspect: Preview a spreadsheet's columns and rows
//! - Generate: Run the full letter generation pipeline
//!
//! # Binary Usage
//!
//! ```bash
//! # Preview a spreadsheet
//! letterforge inspect accounts.xlsx
//!
//! # Generate one PDF per row
//! letterforge generate accounts.xlsx --template letter.txt
//!
//! # Generate a single combined PDF and a zip archive
//! letterforge generate accounts.xlsx --template letter.txt \
//!     --mode combined --archive letters.zip
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{generate_command, inspect_command, run_cli, ModeArg};
