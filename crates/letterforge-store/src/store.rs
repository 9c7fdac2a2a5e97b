//! Run-scoped artifact storage.
//!
//! One run owns one directory under `output/`; `reset` wipes every previous
//! run directory before a new run begins, so the store never leaks artifacts
//! across runs - including runs that were abandoned mid-way.

use std::fmt;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::{Result, StoreError};

/// Identifier for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId(String);

impl RunId {
    /// Generate a fresh run id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage backend for generated letter artifacts.
///
/// Backends must keep `list()` order stable (save insertion order) and must
/// reject any artifact name that could escape the managed directory.
pub trait ArtifactStore {
    /// Clear all artifacts of previous runs and open a new run scope
    fn reset(&mut self, run_id: &RunId) -> Result<()>;

    /// Persist one artifact, returning its server-local path
    fn save(&mut self, row_index: usize, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;

    /// Current artifacts in save order
    fn list(&self) -> Vec<String>;

    /// Retrieve one artifact by exact name
    fn fetch(&self, file_name: &str) -> Result<Vec<u8>>;

    /// Bundle every current artifact into one flat zip archive
    fn archive(&self) -> Result<Vec<u8>>;
}

struct CurrentRun {
    id: RunId,
    dir: PathBuf,
    /// Artifact names in save order
    artifacts: Vec<String>,
}

/// Disk-backed artifact store.
///
/// Layout under the root: `output/<run-id>/` for the current run's
/// artifacts and `archive/letters.zip` for the most recently built bundle.
pub struct DiskStore {
    output_dir: PathBuf,
    staging_dir: PathBuf,
    current: Option<CurrentRun>,
}

impl DiskStore {
    /// Open a store rooted at `root`, creating the directory tree
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let output_dir = root.join("output");
        let staging_dir = root.join("archive");
        fs::create_dir_all(&output_dir)?;
        fs::create_dir_all(&staging_dir)?;
        Ok(Self {
            output_dir,
            staging_dir,
            current: None,
        })
    }

    /// The id of the currently open run, if any
    pub fn current_run(&self) -> Option<&RunId> {
        self.current.as_ref().map(|run| &run.id)
    }

    fn current(&self) -> Result<&CurrentRun> {
        self.current.as_ref().ok_or(StoreError::NoActiveRun)
    }
}

/// Reject names with separators, parent references, or other escape attempts
fn validate_entry_name(name: &str) -> Result<()> {
    let suspicious = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name.contains("..");
    if suspicious {
        tracing::warn!(artifact = %name, "rejected artifact name escaping the managed directory");
        return Err(StoreError::PathViolation(name.to_string()));
    }
    Ok(())
}

impl ArtifactStore for DiskStore {
    fn reset(&mut self, run_id: &RunId) -> Result<()> {
        // Wipe everything from prior runs, whatever state they ended in
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir)?;
        }
        let run_dir = self.output_dir.join(run_id.as_str());
        fs::create_dir_all(&run_dir)?;

        tracing::debug!(run = %run_id, "output store reset");
        self.current = Some(CurrentRun {
            id: run_id.clone(),
            dir: run_dir,
            artifacts: Vec::new(),
        });
        Ok(())
    }

    fn save(&mut self, row_index: usize, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        validate_entry_name(file_name)?;
        let run = self.current.as_mut().ok_or(StoreError::NoActiveRun)?;

        let path = run.dir.join(file_name);
        fs::write(&path, bytes)?;

        // Saving the same name twice rewrites the file without duplicating
        // the index entry (combined mode shares one artifact across rows)
        if !run.artifacts.iter().any(|name| name == file_name) {
            run.artifacts.push(file_name.to_string());
        }

        tracing::debug!(row = row_index, artifact = %file_name, "artifact saved");
        Ok(path)
    }

    fn list(&self) -> Vec<String> {
        match &self.current {
            Some(run) => run.artifacts.clone(),
            None => Vec::new(),
        }
    }

    fn fetch(&self, file_name: &str) -> Result<Vec<u8>> {
        validate_entry_name(file_name)?;
        let run = self.current()?;

        if !run.artifacts.iter().any(|name| name == file_name) {
            return Err(StoreError::NotFound(file_name.to_string()));
        }
        fs::read(run.dir.join(file_name)).map_err(|_| StoreError::NotFound(file_name.to_string()))
    }

    fn archive(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            for name in self.list() {
                let bytes = self.fetch(&name)?;
                zip.start_file(name.as_str(), options)?;
                zip.write_all(&bytes)?;
            }
            zip.finish()?;
        }

        let bytes = buffer.into_inner();
        // Stage the most recent bundle next to the run output
        fs::write(self.staging_dir.join("letters.zip"), &bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::read::ZipArchive;

    fn store() -> (tempfile::TempDir, DiskStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_list_fetch_roundtrip() {
        let (_dir, mut store) = store();
        store.reset(&RunId::new()).unwrap();

        store.save(0, "letter_0001.pdf", b"first").unwrap();
        store.save(1, "letter_0002.pdf", b"second").unwrap();

        assert_eq!(store.list(), vec!["letter_0001.pdf", "letter_0002.pdf"]);
        assert_eq!(store.fetch("letter_0001.pdf").unwrap(), b"first");
        assert_eq!(store.fetch("letter_0002.pdf").unwrap(), b"second");
    }

    #[test]
    fn test_save_requires_active_run() {
        let (_dir, mut store) = store();
        let result = store.save(0, "letter_0001.pdf", b"x");
        assert!(matches!(result, Err(StoreError::NoActiveRun)));
    }

    #[test]
    fn test_fetch_missing_artifact_is_not_found() {
        let (_dir, mut store) = store();
        store.reset(&RunId::new()).unwrap();
        let result = store.fetch("letter_9999.pdf");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_reset_clears_previous_run() {
        let (_dir, mut store) = store();

        store.reset(&RunId::new()).unwrap();
        let path_a = store.save(0, "letter_0001.pdf", b"run a").unwrap();
        assert!(path_a.exists());

        store.reset(&RunId::new()).unwrap();
        assert!(store.list().is_empty());
        assert!(!path_a.exists(), "run A artifact must be wiped");

        store.save(0, "letter_0001.pdf", b"run b").unwrap();
        assert_eq!(store.fetch("letter_0001.pdf").unwrap(), b"run b");
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_path_traversal_rejected() {
        let (_dir, mut store) = store();
        store.reset(&RunId::new()).unwrap();

        for name in [
            "../../etc/passwd",
            "..\\..\\secrets.txt",
            "a/b.pdf",
            "..",
            "",
            "nul\0byte.pdf",
        ] {
            let fetched = store.fetch(name);
            assert!(
                matches!(fetched, Err(StoreError::PathViolation(_))),
                "fetch({:?}) should be a path violation",
                name
            );
            let saved = store.save(0, name, b"x");
            assert!(
                matches!(saved, Err(StoreError::PathViolation(_))),
                "save({:?}) should be a path violation",
                name
            );
        }
    }

    #[test]
    fn test_archive_contains_every_artifact_byte_equal() {
        let (_dir, mut store) = store();
        store.reset(&RunId::new()).unwrap();
        store.save(0, "letter_0001.pdf", b"first").unwrap();
        store.save(1, "letter_0002.pdf", b"second").unwrap();

        let bytes = store.archive().unwrap();
        let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 2);

        let mut first = Vec::new();
        zip.by_name("letter_0001.pdf")
            .unwrap()
            .read_to_end(&mut first)
            .unwrap();
        assert_eq!(first, b"first");

        let mut second = Vec::new();
        zip.by_name("letter_0002.pdf")
            .unwrap()
            .read_to_end(&mut second)
            .unwrap();
        assert_eq!(second, b"second");
    }

    #[test]
    fn test_archive_with_zero_artifacts_is_valid() {
        let (_dir, mut store) = store();
        store.reset(&RunId::new()).unwrap();

        let bytes = store.archive().unwrap();
        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 0);
    }

    #[test]
    fn test_archive_is_staged_on_disk() {
        let (dir, mut store) = store();
        store.reset(&RunId::new()).unwrap();
        store.save(0, "letter_0001.pdf", b"x").unwrap();
        store.archive().unwrap();

        assert!(dir.path().join("archive").join("letters.zip").exists());
    }

    #[test]
    fn test_duplicate_save_keeps_single_index_entry() {
        let (_dir, mut store) = store();
        store.reset(&RunId::new()).unwrap();
        store.save(0, "letters.pdf", b"v1").unwrap();
        store.save(1, "letters.pdf", b"v2").unwrap();

        assert_eq!(store.list(), vec!["letters.pdf"]);
        assert_eq!(store.fetch("letters.pdf").unwrap(), b"v2");
    }
}
