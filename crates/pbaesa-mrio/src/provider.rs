//! Dataset providers.
//!
//! The loader calls a [`DatasetProvider`] at most once per missing year and
//! then looks in the cache again. Providers write through a temporary file in
//! the storage folder that is renamed into place only after the transfer
//! completes, so an interrupted download never looks like a cached dataset.

use std::fs;
use std::path::Path;
use std::time::Duration;

use pbaesa_types::Year;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::MrioError;

/// Default base URL of the EXIOBASE 3 record.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://zenodo.org/records/5589597/files";

/// Default classification system (industry by industry).
pub const DEFAULT_SYSTEM: &str = "ixi";

/// Default limit on a whole transfer, four hours. A full EXIOBASE archive is
/// several hundred megabytes.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(14_400);

/// Limit on establishing the connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a year's raw dataset into a storage folder.
pub trait DatasetProvider {
    /// Place an `IOT_{year}_*` artifact in `folder`.
    ///
    /// # Errors
    ///
    /// - [`MrioError::Download`] if the dataset cannot be obtained.
    /// - [`MrioError::Io`] if it cannot be written to `folder`.
    fn fetch(&self, year: Year, folder: &Path) -> Result<(), MrioError>;
}

/// Provider that never downloads. Missing years stay missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl DatasetProvider for OfflineProvider {
    fn fetch(&self, year: Year, _folder: &Path) -> Result<(), MrioError> {
        Err(MrioError::Download {
            year,
            message: "downloads are disabled".to_owned(),
        })
    }
}

/// Downloads `IOT_{year}_{system}.zip` from a Zenodo record over HTTPS.
#[derive(Debug, Clone)]
pub struct ZenodoProvider {
    base_url: String,
    system: String,
    timeout: Duration,
}

impl ZenodoProvider {
    /// Create a provider for `base_url` and classification `system`.
    ///
    /// `timeout` bounds the whole transfer, body included.
    pub fn new(base_url: impl Into<String>, system: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            system: system.into(),
            timeout,
        }
    }

    /// Archive file name for `year`.
    pub fn file_name(&self, year: Year) -> String {
        format!("IOT_{year}_{}.zip", self.system)
    }

    /// Download URL for `year`.
    pub fn url(&self, year: Year) -> String {
        format!(
            "{}/{}?download=1",
            self.base_url.trim_end_matches('/'),
            self.file_name(year)
        )
    }
}

impl Default for ZenodoProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_URL, DEFAULT_SYSTEM, DEFAULT_DOWNLOAD_TIMEOUT)
    }
}

impl DatasetProvider for ZenodoProvider {
    fn fetch(&self, year: Year, folder: &Path) -> Result<(), MrioError> {
        let download_error = |e: reqwest::Error| MrioError::Download {
            year,
            message: e.to_string(),
        };

        fs::create_dir_all(folder)?;
        let url = self.url(year);
        info!(year = year.get(), url = %url, "Downloading EXIOBASE dataset");

        let client = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(self.timeout)
            .build()
            .map_err(download_error)?;
        let mut response = client
            .get(&url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(download_error)?;

        let mut staging = NamedTempFile::new_in(folder)?;
        let bytes = response.copy_to(&mut staging).map_err(download_error)?;

        let target = folder.join(self.file_name(year));
        staging.persist(&target).map_err(|e| MrioError::Io(e.error))?;
        info!(year = year.get(), bytes, path = %target.display(), "Dataset stored");
        Ok(())
    }
}
