//! Run bookkeeping: per-document records and the aggregated result.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use letterforge_store::RunId;

/// Lifecycle of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run started yet
    Idle,
    /// Parsing the uploaded sheet
    Ingesting,
    /// Resolving and rendering rows
    Rendering,
    /// Aggregating results (archiving itself is lazy)
    Packaging,
    /// Run finished; per-row failures may still be recorded
    Complete,
    /// Run aborted by a fatal error
    Failed,
}

/// Outcome of one generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Success,
    Failed,
}

/// Record of one row's document, kept even when generation failed
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Index of the source spreadsheet row (0-based)
    pub source_row_index: usize,
    /// Artifact file name (the intended name, for failed rows)
    pub file_name: String,
    /// Server-local path; empty for failed rows
    pub file_path: PathBuf,
    /// Whether the document was produced
    pub status: DocumentStatus,
    /// Failure detail for `Failed` documents
    pub error: Option<String>,
}

impl GeneratedDocument {
    /// Record a successfully stored document
    pub fn success(source_row_index: usize, file_name: String, file_path: PathBuf) -> Self {
        Self {
            source_row_index,
            file_name,
            file_path,
            status: DocumentStatus::Success,
            error: None,
        }
    }

    /// Record a row whose document could not be produced
    pub fn failed(source_row_index: usize, file_name: String, error: String) -> Self {
        Self {
            source_row_index,
            file_name,
            file_path: PathBuf::new(),
            status: DocumentStatus::Failed,
            error: Some(error),
        }
    }

    /// Whether the document was produced
    pub fn is_success(&self) -> bool {
        self.status == DocumentStatus::Success
    }
}

/// Caller-facing classification of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every row produced a document
    FullSuccess,
    /// Some rows produced documents, some failed
    PartialSuccess,
    /// The run completed but nothing was produced
    NothingProduced,
}

/// Aggregated result of one batch run.
///
/// Owned by the orchestrator for the run's duration; superseded when a new
/// run starts (the old output directory is cleared on the next `reset`).
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Identifier of the run (and its output directory)
    pub run_id: RunId,
    /// Number of data rows in the ingested sheet
    pub total_requested: usize,
    /// One record per row, in sheet order
    pub documents: Vec<GeneratedDocument>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    /// Number of documents produced
    pub fn success_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_success()).count()
    }

    /// Number of rows that failed
    pub fn failure_count(&self) -> usize {
        self.documents.len() - self.success_count()
    }

    /// Row indices that failed, in sheet order
    pub fn failed_rows(&self) -> Vec<usize> {
        self.documents
            .iter()
            .filter(|d| !d.is_success())
            .map(|d| d.source_row_index)
            .collect()
    }

    /// Distinct artifact file names of successful documents, in order.
    ///
    /// Combined mode shares one file across rows, hence the dedup.
    pub fn success_files(&self) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        for doc in self.documents.iter().filter(|d| d.is_success()) {
            if !files.contains(&doc.file_name) {
                files.push(doc.file_name.clone());
            }
        }
        files
    }

    /// Wall-clock duration of the run in milliseconds
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Classify the run for the caller
    pub fn outcome(&self) -> RunOutcome {
        let succeeded = self.success_count();
        if succeeded == self.total_requested && self.total_requested > 0 {
            RunOutcome::FullSuccess
        } else if succeeded > 0 {
            RunOutcome::PartialSuccess
        } else {
            RunOutcome::NothingProduced
        }
    }
}
