//! Persistence for the single vault record.
//!
//! Exactly one record exists at a time. Saving overwrites it, deleting
//! removes it. Concurrent writers from separate processes race with
//! last-writer-wins semantics.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, WikiError};
use crate::fs::write_private_atomic;
use crate::vault::VaultRecord;

/// Storage seam for the vault record.
pub trait CredentialStore {
    /// Load the stored record, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<VaultRecord>>;

    /// Replace any stored record with `record`.
    fn save(&self, record: &VaultRecord) -> Result<()>;

    /// Remove the stored record. Returns whether one existed.
    fn delete(&self) -> Result<bool>;
}

/// JSON file on disk, written atomically with owner-only permissions.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<VaultRecord>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(WikiError::internal(format!(
                    "Failed to read credentials {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };

        let record = serde_json::from_str::<VaultRecord>(&contents).map_err(|e| {
            WikiError::auth(format!(
                "Stored token is invalid ({}). Run `wiki auth login` again.",
                e
            ))
        })?;
        Ok(Some(record))
    }

    fn save(&self, record: &VaultRecord) -> Result<()> {
        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| WikiError::internal(format!("Failed to encode credentials: {}", e)))?;
        write_private_atomic(&self.path, contents.as_bytes()).map_err(|e| {
            WikiError::internal(format!(
                "Failed to write credentials {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn delete(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(WikiError::internal(format!(
                "Failed to remove credentials {}: {}",
                self.path.display(),
                err
            ))),
        }
    }
}
