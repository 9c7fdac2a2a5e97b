//! Batch letter generation pipeline.
//!
//! Ties the other crates together: sheets come in through an upload store,
//! rows are resolved against a template, rendered to PDF, and filed into a
//! run-scoped artifact store. [`Service`] is the boundary clients talk to;
//! [`BatchRunner`] is the state machine underneath it.

pub mod error;
pub mod orchestrator;
pub mod run;
pub mod service;
pub mod session;

pub use error::{CoreError, Result};
pub use orchestrator::{BatchRunner, RenderMode, COMBINED_FILE_NAME, DEFAULT_TITLE};
pub use run::{DocumentStatus, GeneratedDocument, RunOutcome, RunResult, RunState};
pub use service::{built_in_statics, RunSummary, Service, UploadResponse, PREVIEW_ROWS};
pub use session::{SessionFileId, UploadStore};
