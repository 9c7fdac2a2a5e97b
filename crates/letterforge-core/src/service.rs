//! Service boundary for the wizard UI (or any other client).
//!
//! Typed request/response operations mirroring the HTTP surface the
//! original system exposed: upload a sheet, generate letters, download one
//! artifact or the whole bundle. State lives under one working directory:
//! `uploads/` for incoming sheets, `output/<run-id>/` for the current run,
//! `archive/` for the most recently built zip.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use letterforge_pdf::{LetterCompiler, LetterRenderer};
use letterforge_sheet::parse_sheet;
use letterforge_store::{ArtifactStore, DiskStore};
use letterforge_template::TemplateSpec;

use crate::error::Result;
use crate::orchestrator::{BatchRunner, RenderMode};
use crate::run::{RunOutcome, RunResult};
use crate::session::UploadStore;

/// Upload responses carry at most this many preview rows
pub const PREVIEW_ROWS: usize = 5;

/// Response to a successful sheet upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Handle for later `generate` calls
    pub session_file_id: String,
    /// Column names in sheet order
    pub headers: Vec<String>,
    /// Number of data rows
    pub row_count: usize,
    /// Up to [`PREVIEW_ROWS`] rows of cell text, aligned with `headers`
    pub preview_rows: Vec<Vec<String>>,
}

/// Caller-facing summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub total_requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Sheet row indices that failed (empty on full success)
    pub failed_rows: Vec<usize>,
    /// Downloadable artifact names, in generation order
    pub files: Vec<String>,
    pub outcome: RunOutcome,
    pub elapsed_ms: i64,
}

impl RunSummary {
    fn from_result(result: &RunResult) -> Self {
        Self {
            run_id: result.run_id.to_string(),
            total_requested: result.total_requested,
            succeeded: result.success_count(),
            failed: result.failure_count(),
            failed_rows: result.failed_rows(),
            files: result.success_files(),
            outcome: result.outcome(),
            elapsed_ms: result.elapsed_ms(),
        }
    }
}

/// Static values available to every row of a run.
///
/// Currently just `Date`, the local generation date as `YYYY-MM-DD`,
/// computed once so every letter in a run carries the same stamp.
pub fn built_in_statics() -> BTreeMap<String, String> {
    let mut statics = BTreeMap::new();
    statics.insert(
        "Date".to_string(),
        Local::now().format("%Y-%m-%d").to_string(),
    );
    statics
}

/// The generation pipeline behind one working directory.
///
/// One service instance serves one session; concurrent sessions get their
/// own working directories (and therefore their own stores). Runs through
/// a single instance are inherently serialized by `&mut self`.
pub struct Service<R: LetterRenderer> {
    uploads: UploadStore,
    store: DiskStore,
    renderer: R,
    last_run: Option<RunResult>,
}

impl Service<LetterCompiler> {
    /// Open a service with the Typst-backed compiler
    pub fn open(work_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_renderer(work_dir, LetterCompiler::new())
    }
}

impl<R: LetterRenderer> Service<R> {
    /// Open a service with a custom renderer backend
    pub fn with_renderer(work_dir: impl AsRef<Path>, renderer: R) -> Result<Self> {
        let work_dir = work_dir.as_ref();
        let uploads = UploadStore::new(work_dir.join("uploads"))?;
        let store = DiskStore::new(work_dir)?;
        Ok(Self {
            uploads,
            store,
            renderer,
            last_run: None,
        })
    }

    /// Parse and stage an uploaded sheet.
    ///
    /// The sheet is parsed up front so malformed uploads are rejected
    /// before a session file id is ever handed out.
    pub fn upload_sheet(&mut self, bytes: &[u8], file_name: &str) -> Result<UploadResponse> {
        let sheet = parse_sheet(bytes, file_name)?;
        let id = self.uploads.save(bytes, file_name)?;

        tracing::info!(session = %id, rows = sheet.row_count(), "sheet uploaded");
        Ok(UploadResponse {
            session_file_id: id.to_string(),
            headers: sheet.headers().to_vec(),
            row_count: sheet.row_count(),
            preview_rows: sheet
                .preview(PREVIEW_ROWS)
                .iter()
                .map(|row| row.values_text())
                .collect(),
        })
    }

    /// Run the full pipeline for a previously uploaded sheet
    pub fn generate(
        &mut self,
        session_file_id: &str,
        spec: &TemplateSpec,
        mode: RenderMode,
    ) -> Result<RunSummary> {
        let (bytes, original_name) = self.uploads.load(session_file_id)?;
        let statics = built_in_statics();

        let mut runner = BatchRunner::new(&self.renderer, &mut self.store);
        let result = runner.run(&bytes, &original_name, spec, &statics, mode)?;

        let summary = RunSummary::from_result(&result);
        self.last_run = Some(result);
        Ok(summary)
    }

    /// Bundle the current run's artifacts into one zip
    pub fn download_archive(&self) -> Result<Vec<u8>> {
        Ok(self.store.archive()?)
    }

    /// Retrieve one artifact of the current run by name
    pub fn download_artifact(&self, file_name: &str) -> Result<Vec<u8>> {
        Ok(self.store.fetch(file_name)?)
    }

    /// Artifact names of the current run
    pub fn list_artifacts(&self) -> Vec<String> {
        self.store.list()
    }

    /// Full result of the most recent run, if any
    pub fn last_run(&self) -> Option<&RunResult> {
        self.last_run.as_ref()
    }

    /// Trivial liveness check
    pub fn ping(&self) -> &'static str {
        "ok"
    }
}
