//! Local storage folder for downloaded datasets.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pbaesa_types::Year;

use crate::error::MrioError;

/// Folder holding `IOT_{year}_*` dataset artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetCache {
    folder: PathBuf,
}

impl DatasetCache {
    /// Use `folder` as the storage location. The folder need not exist yet.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// The storage folder.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Find the artifact for `year`, if one is cached.
    ///
    /// When several artifacts match (e.g. both `ixi` and `pxp` systems) the
    /// lexicographically first is returned so lookups are deterministic.
    ///
    /// # Errors
    ///
    /// [`MrioError::Io`] if the folder exists but cannot be listed.
    pub fn locate(&self, year: Year) -> Result<Option<PathBuf>, MrioError> {
        let entries = match fs::read_dir(&self.folder) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let prefix = format!("IOT_{year}_");
        let mut matches: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                matches.push(entry.path());
            }
        }
        matches.sort();
        Ok(matches.into_iter().next())
    }
}
