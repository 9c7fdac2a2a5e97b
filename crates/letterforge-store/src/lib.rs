//! # letterforge-store
//!
//! Run-scoped artifact storage and packaging for letterforge.
//!
//! A generation run saves its PDF letters through an [`ArtifactStore`];
//! the disk backend namespaces each run under its own directory, rejects
//! path-escaping artifact names, and bundles the current run into a flat
//! zip on demand.

pub mod error;
pub mod store;

// Re-exports
pub use error::{Result, StoreError};
pub use store::{ArtifactStore, DiskStore, RunId};
