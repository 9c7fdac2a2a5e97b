//! The batch loop: ingest, resolve, render, store.
//!
//! One bad row never aborts the batch; its failure is recorded and the loop
//! moves on. Only an engine-level failure (or a parse failure before the
//! loop starts) ends the run early.

use std::collections::BTreeMap;

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use letterforge_pdf::{LetterBody, LetterLayout, LetterRenderer};
use letterforge_sheet::parse_sheet;
use letterforge_store::{ArtifactStore, RunId};
use letterforge_template::{resolve_with, TemplateSpec, UnresolvedTokenPolicy};

use crate::error::{CoreError, Result};
use crate::run::{GeneratedDocument, RunResult, RunState};

/// Title used when the template spec does not set one
pub const DEFAULT_TITLE: &str = "Reconciliation Letter";

/// Artifact name for the single combined document
pub const COMBINED_FILE_NAME: &str = "letters.pdf";

/// How many documents a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// One document per spreadsheet row
    PerRow,
    /// One multi-page document with a page break between rows
    Combined,
}

/// Drives one generation run against a renderer and an artifact store.
///
/// Rows render sequentially, in sheet order, against a renderer acquired
/// for this run only; the store is reset before the first artifact is
/// written.
pub struct BatchRunner<'a, R: LetterRenderer, S: ArtifactStore> {
    renderer: &'a R,
    store: &'a mut S,
    state: RunState,
}

impl<'a, R: LetterRenderer, S: ArtifactStore> BatchRunner<'a, R, S> {
    /// Create a runner for one run
    pub fn new(renderer: &'a R, store: &'a mut S) -> Self {
        Self {
            renderer,
            store,
            state: RunState::Idle,
        }
    }

    /// Current position in the run lifecycle
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute a full run over the uploaded sheet bytes.
    ///
    /// A `ParseError` fails the run before any output directory is touched.
    /// Per-row render failures are absorbed into the [`RunResult`];
    /// a fatal engine failure aborts with [`CoreError::EngineFailed`].
    pub fn run(
        &mut self,
        sheet_bytes: &[u8],
        sheet_name: &str,
        spec: &TemplateSpec,
        statics: &BTreeMap<String, String>,
        mode: RenderMode,
    ) -> Result<RunResult> {
        let started_at = Utc::now();

        self.state = RunState::Ingesting;
        let sheet = match parse_sheet(sheet_bytes, sheet_name) {
            Ok(sheet) => sheet,
            Err(e) => {
                self.state = RunState::Failed;
                tracing::warn!(sheet = %sheet_name, error = %e, "ingestion failed; run aborted");
                return Err(e.into());
            }
        };

        let run_id = RunId::new();
        if let Err(e) = self.store.reset(&run_id) {
            self.state = RunState::Failed;
            return Err(e.into());
        }

        self.state = RunState::Rendering;
        tracing::info!(run = %run_id, rows = sheet.row_count(), ?mode, "run started");

        let layout = LetterLayout::new(
            spec.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            statics
                .get("Date")
                .cloned()
                .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string()),
        );

        let documents = match mode {
            RenderMode::PerRow => self.render_per_row(&sheet, spec, statics, &layout)?,
            RenderMode::Combined => self.render_combined(&sheet, spec, statics, &layout)?,
        };

        self.state = RunState::Packaging;
        let result = RunResult {
            run_id,
            total_requested: sheet.row_count(),
            documents,
            started_at,
            finished_at: Utc::now(),
        };

        self.state = RunState::Complete;
        tracing::info!(
            run = %result.run_id,
            succeeded = result.success_count(),
            failed = result.failure_count(),
            elapsed_ms = result.elapsed_ms(),
            "run complete"
        );
        Ok(result)
    }

    fn render_per_row(
        &mut self,
        sheet: &letterforge_sheet::SheetData,
        spec: &TemplateSpec,
        statics: &BTreeMap<String, String>,
        layout: &LetterLayout,
    ) -> Result<Vec<GeneratedDocument>> {
        let mut documents = Vec::with_capacity(sheet.row_count());

        for (idx, row) in sheet.rows().iter().enumerate() {
            let text = resolve_with(spec, row, statics, UnresolvedTokenPolicy::Blank);
            let body = LetterBody::new(idx, text);
            let file_name = format!("letter_{:04}.pdf", idx + 1);

            match self.renderer.render_letter(layout, &body) {
                Ok(bytes) => match self.store.save(idx, &file_name, &bytes) {
                    Ok(path) => {
                        documents.push(GeneratedDocument::success(idx, file_name, path));
                    }
                    Err(e) => {
                        tracing::warn!(row = idx, error = %e, "artifact save failed");
                        documents.push(GeneratedDocument::failed(idx, file_name, e.to_string()));
                    }
                },
                Err(e) if e.is_fatal() => {
                    self.state = RunState::Failed;
                    let completed = documents.iter().filter(|d| d.is_success()).count();
                    tracing::error!(run_row = idx, completed, error = %e, "rendering engine failed");
                    return Err(CoreError::EngineFailed {
                        completed,
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!(row = idx, error = %e, "row failed to render; continuing");
                    documents.push(GeneratedDocument::failed(idx, file_name, e.to_string()));
                }
            }
        }

        Ok(documents)
    }

    fn render_combined(
        &mut self,
        sheet: &letterforge_sheet::SheetData,
        spec: &TemplateSpec,
        statics: &BTreeMap<String, String>,
        layout: &LetterLayout,
    ) -> Result<Vec<GeneratedDocument>> {
        let bodies: Vec<LetterBody> = sheet
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                LetterBody::new(idx, resolve_with(spec, row, statics, UnresolvedTokenPolicy::Blank))
            })
            .collect();

        match self.renderer.render_combined(layout, &bodies) {
            Ok(bytes) => {
                let path = match self.store.save(0, COMBINED_FILE_NAME, &bytes) {
                    Ok(path) => path,
                    Err(e) => {
                        self.state = RunState::Failed;
                        tracing::error!(error = %e, "combined artifact save failed");
                        return Err(e.into());
                    }
                };
                // One record per source row; all reference the shared artifact
                Ok((0..sheet.row_count())
                    .map(|idx| {
                        GeneratedDocument::success(idx, COMBINED_FILE_NAME.to_string(), path.clone())
                    })
                    .collect())
            }
            Err(e) if e.is_fatal() => {
                self.state = RunState::Failed;
                tracing::error!(error = %e, "rendering engine failed");
                Err(CoreError::EngineFailed {
                    completed: 0,
                    source: e,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "combined document failed to render");
                Ok((0..sheet.row_count())
                    .map(|idx| {
                        GeneratedDocument::failed(idx, COMBINED_FILE_NAME.to_string(), e.to_string())
                    })
                    .collect())
            }
        }
    }
}
