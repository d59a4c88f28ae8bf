//! On-disk cache of raw catalogue records
//!
//! One file per system number, `<root>/<number>.<extension>`, holding the
//! bytes exactly as the catalogue returned them.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::Builder;

use crate::{
    config::CacheConfig,
    error::{AppError, AppResult},
    models::{RawRecord, RunMode, SystemNumber},
};

#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    extension: String,
    /// Replace existing entries (forced and test runs only)
    overwrite: bool,
}

impl CacheStore {
    pub fn new(config: &CacheConfig, mode: &RunMode) -> Self {
        Self::with_root(&config.root, &config.extension, mode.allows_overwrite())
    }

    pub fn with_root(root: impl Into<PathBuf>, extension: &str, overwrite: bool) -> Self {
        Self {
            root: root.into(),
            extension: extension.to_string(),
            overwrite,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, system_number: &SystemNumber) -> PathBuf {
        self.root.join(format!("{}.{}", system_number, self.extension))
    }

    pub fn ensure_root(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn has(&self, system_number: &SystemNumber) -> bool {
        self.path_for(system_number).is_file()
    }

    /// Cached bytes; `NotFound` if there is no readable entry
    pub fn read(&self, system_number: &SystemNumber) -> AppResult<RawRecord> {
        let path = self.path_for(system_number);
        fs::read(&path)
            .map(RawRecord::from)
            .map_err(|e| AppError::NotFound(format!("{}: {}", path.display(), e)))
    }

    /// Store bytes unless an entry exists and this run may not replace it.
    /// Returns whether the file was written.
    pub fn write(&self, system_number: &SystemNumber, raw: &RawRecord) -> AppResult<bool> {
        let path = self.path_for(system_number);
        if !self.overwrite && path.is_file() {
            tracing::debug!("Keeping existing cache entry {}", path.display());
            return Ok(false);
        }

        self.ensure_root()?;
        let mut temp = Builder::new()
            .prefix(".bebb-")
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        temp.write_all(raw.as_bytes())?;
        temp.persist(&path).map_err(|e| AppError::Io(e.error))?;

        tracing::debug!("Cached {} bytes at {}", raw.len(), path.display());
        Ok(true)
    }
}
