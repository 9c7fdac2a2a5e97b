//! letterforge-pdf - PDF letter rendering via Typst
//!
//! # Architecture
//!
//! Rendering happens in two stages:
//!
//! 1. **Markup** - Builds Typst markup from a resolved letter body: fixed
//!    skeleton (title block, date-stamped footer, page numbers) around the
//!    escaped body text.
//! 2. **Compiler** - Compiles the markup to PDF bytes.
//!
//! # Example
//!
//! ```ignore
//! use letterforge_pdf::{LetterBody, LetterCompiler, LetterLayout, LetterRenderer};
//!
//! let compiler = LetterCompiler::new();
//! let layout = LetterLayout::new("Reconciliation Letter", "2024-01-31");
//! let pdf = compiler.render_letter(&layout, &LetterBody::new(0, "Dear Acme."))?;
//! ```

mod compiler;
mod error;
mod markup;

pub use compiler::{LetterCompiler, LetterRenderer};
pub use error::{PdfError, Result};
pub use markup::{combined_markup, escape_text, letter_markup, LetterBody, LetterLayout};
