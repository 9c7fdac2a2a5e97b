//! Typst to PDF compilation.
//!
//! Wraps `typst-as-lib` behind the [`LetterRenderer`] seam so the batch
//! orchestrator can be exercised without a real compile.

use typst_as_lib::TypstEngine;

use crate::error::{PdfError, Result};
use crate::markup::{combined_markup, letter_markup, LetterBody, LetterLayout};

/// Renders resolved letter bodies into finished PDF documents.
///
/// The orchestrator acquires one renderer per run and drops it at run end,
/// whatever the exit path.
pub trait LetterRenderer {
    /// Render one letter as its own document
    fn render_letter(&self, layout: &LetterLayout, body: &LetterBody) -> Result<Vec<u8>>;

    /// Render all letters into one multi-page document
    fn render_combined(&self, layout: &LetterLayout, bodies: &[LetterBody]) -> Result<Vec<u8>>;
}

/// Typst-backed letter compiler
#[derive(Debug, Default)]
pub struct LetterCompiler {
    /// Additional font files to register with the engine
    fonts: Vec<Vec<u8>>,
}

impl LetterCompiler {
    /// Create a compiler using the engine's default font discovery
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Create a compiler with custom fonts.
    ///
    /// An unreadable font file means the engine cannot be started at all,
    /// so this fails with [`PdfError::EngineUnavailable`].
    pub fn with_fonts(font_paths: &[&str]) -> Result<Self> {
        let mut fonts = Vec::new();
        for font_path in font_paths {
            let font_bytes = std::fs::read(font_path).map_err(|e| {
                PdfError::EngineUnavailable(format!("failed to read font {}: {}", font_path, e))
            })?;
            fonts.push(font_bytes);
        }
        Ok(Self { fonts })
    }

    /// Compile Typst markup to PDF bytes
    pub fn compile(&self, markup: &str) -> Result<Vec<u8>> {
        let mut builder = TypstEngine::builder().main_file(markup.to_string());

        if !self.fonts.is_empty() {
            builder = builder.fonts(self.fonts.clone());
        }

        let engine = builder.build();
        let compiled = engine.compile();

        // compiled is Warned<Result<Document, Error>>
        // - compiled.output is the Result
        // - compiled.warnings contains any warnings
        let document = compiled
            .output
            .map_err(|e| PdfError::Compilation(format!("{:?}", e)))?;

        let options = typst_pdf::PdfOptions::default();
        let pdf_bytes = typst_pdf::pdf(&document, &options)
            .map_err(|e| PdfError::Compilation(format!("PDF generation failed: {:?}", e)))?;

        Ok(pdf_bytes.into())
    }
}

impl LetterRenderer for LetterCompiler {
    fn render_letter(&self, layout: &LetterLayout, body: &LetterBody) -> Result<Vec<u8>> {
        self.compile(&letter_markup(layout, body))
    }

    fn render_combined(&self, layout: &LetterLayout, bodies: &[LetterBody]) -> Result<Vec<u8>> {
        self.compile(&combined_markup(layout, bodies))
    }
}
