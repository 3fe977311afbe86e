//! Append-only JSON log of analysis records

use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::models::AnalysisRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to encode records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owns the backing file. Every read-modify-write goes through one lock,
/// so appends from concurrent requests cannot interleave.
pub struct RecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order. A missing file is the first-run case.
    pub fn load(&self) -> Result<Vec<AnalysisRecord>, StoreError> {
        let _guard = self.lock.lock();
        self.read_all()
    }

    /// Append one record and rewrite the file atomically
    pub fn append(&self, record: &AnalysisRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut records = self.read_all()?;
        records.push(record.clone());
        self.write_all(&records)?;

        tracing::debug!("Stored record {} ({} total)", record.id, records.len());
        Ok(())
    }

    pub fn find(&self, id: Uuid) -> Result<Option<AnalysisRecord>, StoreError> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    fn read_all(&self) -> Result<Vec<AnalysisRecord>, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&data).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Write to a sibling temp file, fsync, then rename over the target
    fn write_all(&self, records: &[AnalysisRecord]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let json = serde_json::to_vec_pretty(records)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(&json).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
