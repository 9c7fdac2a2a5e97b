//! Incoming upload storage.
//!
//! Uploaded sheets wait in their own directory, keyed by a generated
//! session file id, until the caller asks to generate from one of them.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Identifier handed back to the caller after an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFileId(String);

impl SessionFileId {
    fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory-backed store for uploaded sheets
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open an upload store at `dir`, creating it if needed
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Persist an upload and hand back its session file id.
    ///
    /// The original name is kept (sanitized) so the parser can pick the
    /// right decoder from its extension later.
    pub fn save(&self, bytes: &[u8], original_name: &str) -> Result<SessionFileId> {
        let id = SessionFileId::new();
        let safe_name = sanitize_file_name(original_name);
        let path = self.dir.join(format!("{}__{}", id, safe_name));
        fs::write(path, bytes)?;
        Ok(id)
    }

    /// Load an upload by session file id, returning bytes and original name
    pub fn load(&self, id: &str) -> Result<(Vec<u8>, String)> {
        let prefix = format!("{}__", id);
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(original) = file_name.strip_prefix(&prefix) {
                let bytes = fs::read(entry.path())?;
                return Ok((bytes, original.to_string()));
            }
        }
        Err(CoreError::NotFound(format!("session file {}", id)))
    }
}

/// Keep only the final path component and neutralize traversal sequences
fn sanitize_file_name(name: &str) -> String {
    let last = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .replace("..", "_");
    if last.is_empty() {
        "upload.dat".to_string()
    } else {
        last
    }
}
