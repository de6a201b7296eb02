//! On-disk persistence of allocation tables, one JSON file per year.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use pbaesa_types::Year;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::table::AllocationTable;

/// Directory of `allocation_factors_{year}.json` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationStore {
    directory: PathBuf,
}

impl AllocationStore {
    /// Store tables under `directory`, created on first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The storage directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the table for `year`.
    pub fn path(&self, year: Year) -> PathBuf {
        self.directory.join(format!("allocation_factors_{year}.json"))
    }

    /// Read the table for `year`. A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file exists but cannot be opened or read.
    /// - [`StoreError::Json`] if its contents are not a valid table.
    pub fn load(&self, year: Year) -> Result<Option<AllocationTable>, StoreError> {
        let path = self.path(year);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(year = year.get(), path = %path.display(), "No stored allocation table");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let table = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(table))
    }

    /// Write `table`, replacing any previous table for its year.
    ///
    /// The file appears only once fully written.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the directory or staging file cannot be
    ///   written or moved into place.
    /// - [`StoreError::Json`] if the table cannot be encoded.
    pub fn save(&self, table: &AllocationTable) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.path(table.year);

        let mut staging = NamedTempFile::new_in(&self.directory)?;
        {
            let mut writer = BufWriter::new(staging.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, table)?;
            writer.flush()?;
        }
        staging.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        info!(
            year = table.year.get(),
            rows = table.len(),
            path = %path.display(),
            "Allocation table saved"
        );
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::table::AllocationRow;

    fn table(year: u16) -> AllocationTable {
        AllocationTable {
            year: Year::new(year),
            generated_at: Utc::now(),
            rows: vec![AllocationRow {
                geography: "DE".to_owned(),
                region: "DE".to_owned(),
                sector: "Cultivation of wheat".to_owned(),
                direct_fce: Some(0.0125),
                total_fce: None,
                direct_gva: None,
                total_gva: None,
            }],
        }
    }

    #[test]
    fn missing_table_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = AllocationStore::new(dir.path());
        assert!(store.load(Year::new(2020)).unwrap().is_none());
    }

    #[test]
    fn saved_table_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let store = AllocationStore::new(dir.path().join("out"));

        let saved = table(2019);
        let path = store.save(&saved).unwrap();
        assert!(path.ends_with("allocation_factors_2019.json"));

        let loaded = store.load(Year::new(2019)).unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(fs::read_dir(store.directory()).unwrap().count(), 1);
    }

    #[test]
    fn corrupt_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = AllocationStore::new(dir.path());
        fs::write(store.path(Year::new(2020)), "{").unwrap();
        assert!(matches!(store.load(Year::new(2020)), Err(StoreError::Json(_))));
    }
}
