//! Configuration loading and typed config structures for assessments.
//!
//! The configuration lives in `pbaesa-config.yaml`. Every field has a default
//! matching the published EXIOBASE 3 setup, so an empty file (or none at all)
//! is a valid configuration. Sections are converted into the immutable inputs
//! the components take: [`SafeOperatingSpace`], [`GeoScopes`], [`YearRange`]
//! and [`FceCategories`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pbaesa_allocation::{DEFAULT_TOLERANCE, FceCategories};
use pbaesa_mrio::{DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_DOWNLOAD_URL, DEFAULT_SYSTEM};
use pbaesa_sos::SafeOperatingSpace;
use pbaesa_types::{EXIOBASE_GEO_SCOPES, FINAL_CONSUMPTION_CATEGORIES, GeoScopes, Year, YearRange};
use serde::Deserialize;

/// Overrides `exiobase.storage_dir`.
pub const ENV_EXIOBASE_DIR: &str = "PBAESA_EXIOBASE_DIR";
/// Overrides `allocation.output_dir`.
pub const ENV_ALLOCATION_DIR: &str = "PBAESA_ALLOCATION_DIR";
/// Overrides `exiobase.download_url`.
pub const ENV_DOWNLOAD_URL: &str = "PBAESA_DOWNLOAD_URL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level assessment configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssessmentConfig {
    /// Safe-operating-space thresholds.
    #[serde(default)]
    pub boundaries: BoundariesConfig,

    /// Recognised geographies.
    #[serde(default)]
    pub geography: GeographyConfig,

    /// EXIOBASE dataset location and schema.
    #[serde(default)]
    pub exiobase: ExiobaseConfig,

    /// Allocation-table output.
    #[serde(default)]
    pub allocation: AllocationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AssessmentConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides:
    /// - `PBAESA_EXIOBASE_DIR` overrides `exiobase.storage_dir`
    /// - `PBAESA_DOWNLOAD_URL` overrides `exiobase.download_url`
    /// - `PBAESA_ALLOCATION_DIR` overrides `allocation.output_dir`
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Io`] if the file cannot be read.
    /// - [`ConfigError::Yaml`] if its contents are not valid configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Yaml`] if `yaml` is not valid configuration.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Yaml`] if `yaml` is not valid configuration.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`, which maps a variable name to its
    /// value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(ENV_EXIOBASE_DIR) {
            self.exiobase.storage_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup(ENV_DOWNLOAD_URL) {
            self.exiobase.download_url = val;
        }
        if let Some(val) = lookup(ENV_ALLOCATION_DIR) {
            self.allocation.output_dir = PathBuf::from(val);
        }
    }
}

/// One configured threshold.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThresholdEntry {
    /// Budget in the category's control unit.
    pub value: f64,
    /// Control-variable unit.
    #[serde(default)]
    pub unit: Option<String>,
}

/// Safe-operating-space thresholds.
///
/// Entries are applied on top of the planetary-boundary defaults, so a
/// configuration only lists the categories it changes or adds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BoundariesConfig {
    /// Category label -> threshold.
    #[serde(default)]
    pub thresholds: BTreeMap<String, ThresholdEntry>,
}

impl BoundariesConfig {
    /// The resulting threshold table.
    pub fn safe_operating_space(&self) -> SafeOperatingSpace {
        self.thresholds
            .iter()
            .fold(SafeOperatingSpace::planetary_defaults(), |sos, (category, entry)| {
                sos.with_threshold(category, entry.value, entry.unit.as_deref())
            })
    }
}

/// Recognised geographical scopes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeographyConfig {
    /// Geography codes in FR column order.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl GeographyConfig {
    /// The scopes as a [`GeoScopes`] set.
    pub fn geo_scopes(&self) -> GeoScopes {
        GeoScopes::new(self.scopes.iter().cloned())
    }
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            scopes: default_scopes(),
        }
    }
}

/// EXIOBASE dataset settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExiobaseConfig {
    /// Folder holding `IOT_{year}_*` artifacts.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Classification system (`ixi` or `pxp`).
    #[serde(default = "default_system")]
    pub system: String,

    /// Base URL the archives are downloaded from.
    #[serde(default = "default_download_url")]
    pub download_url: String,

    /// Whether missing years are downloaded.
    #[serde(default = "default_true")]
    pub download_enabled: bool,

    /// Limit on a whole dataset transfer in seconds, body included.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// First published year.
    #[serde(default = "default_first_year")]
    pub first_year: u16,

    /// Last published year.
    #[serde(default = "default_last_year")]
    pub last_year: u16,

    /// Final-demand labels summed into FCE.
    #[serde(default = "default_fce_categories")]
    pub fce_categories: Vec<String>,
}

impl ExiobaseConfig {
    /// Supported years.
    pub const fn year_range(&self) -> YearRange {
        YearRange {
            first: Year::new(self.first_year),
            last: Year::new(self.last_year),
        }
    }

    /// FCE sub-category labels.
    pub fn fce_categories(&self) -> FceCategories {
        FceCategories::new(self.fce_categories.iter().cloned())
    }

    /// Download timeout.
    pub const fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for ExiobaseConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            system: default_system(),
            download_url: default_download_url(),
            download_enabled: true,
            download_timeout_secs: default_download_timeout_secs(),
            first_year: default_first_year(),
            last_year: default_last_year(),
            fce_categories: default_fce_categories(),
        }
    }
}

/// Allocation-table output settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AllocationConfig {
    /// Directory of persisted tables.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Column-sum tolerance of the FR matrix.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            tolerance: default_tolerance(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is
    /// unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_scopes() -> Vec<String> {
    EXIOBASE_GEO_SCOPES.iter().map(|s| (*s).to_owned()).collect()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("exiobase")
}

fn default_system() -> String {
    DEFAULT_SYSTEM.to_owned()
}

fn default_download_url() -> String {
    DEFAULT_DOWNLOAD_URL.to_owned()
}

const fn default_true() -> bool {
    true
}

const fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT.as_secs()
}

const fn default_first_year() -> u16 {
    YearRange::EXIOBASE3.first.get()
}

const fn default_last_year() -> u16 {
    YearRange::EXIOBASE3.last.get()
}

fn default_fce_categories() -> Vec<String> {
    FINAL_CONSUMPTION_CATEGORIES.iter().map(|s| (*s).to_owned()).collect()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Allocation Factors")
}

const fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = AssessmentConfig::parse_without_env("").unwrap();
        assert_eq!(config, AssessmentConfig::default());
        assert_eq!(config.geography.geo_scopes().len(), 49);
        assert_eq!(config.exiobase.year_range(), YearRange::EXIOBASE3);
        assert_eq!(config.exiobase.fce_categories(), FceCategories::default());
        assert_eq!(config.allocation.output_dir, PathBuf::from("Allocation Factors"));
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.exiobase.download_timeout(), DEFAULT_DOWNLOAD_TIMEOUT);
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r#"
boundaries:
  thresholds:
    Climate Change:
      value: 1.0
    Novel Entities:
      value: 3.0
      unit: "share of untested chemicals"

geography:
  scopes: [DE, FR, WM]

exiobase:
  storage_dir: /data/exiobase
  download_enabled: false
  first_year: 2000
  last_year: 2010

allocation:
  tolerance: 1.0e-6

logging:
  level: debug
  format: json
"#;
        let config = AssessmentConfig::parse_without_env(yaml).unwrap();

        let sos = config.boundaries.safe_operating_space();
        assert_eq!(sos.threshold("Climate Change"), Some(1.0));
        assert_eq!(sos.threshold("Novel Entities"), Some(3.0));
        assert_eq!(sos.threshold("Freshwater Use"), Some(4000.0));

        assert_eq!(config.geography.geo_scopes().len(), 3);
        assert!(!config.exiobase.download_enabled);
        assert_eq!(config.exiobase.system, "ixi");
        assert!(!config.exiobase.year_range().contains(Year::new(2011)));
        assert_eq!(config.allocation.tolerance, 1.0e-6);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn overrides_replace_paths_and_url() {
        let mut config = AssessmentConfig::default();
        config.apply_overrides(|name| match name {
            ENV_EXIOBASE_DIR => Some("/tmp/exio".to_owned()),
            ENV_ALLOCATION_DIR => Some("/tmp/alloc".to_owned()),
            _ => None,
        });

        assert_eq!(config.exiobase.storage_dir, PathBuf::from("/tmp/exio"));
        assert_eq!(config.allocation.output_dir, PathBuf::from("/tmp/alloc"));
        assert_eq!(config.exiobase.download_url, DEFAULT_DOWNLOAD_URL);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = AssessmentConfig::parse_without_env("exiobase: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }
}
