//! EXIOBASE multi-region input-output tables.
//!
//! Loading a year goes through four stages:
//!
//! 1. **Locate**: find `IOT_{year}_*` in the storage folder, asking a
//!    [`DatasetProvider`] to fetch it once if missing.
//! 2. **Parse**: read `Z.txt` and `Y.txt` into [`LabeledMatrix`] values whose
//!    (region, sector) axes are resolved to integer positions.
//! 3. **Coefficients**: `x = rowsum(Z) + rowsum(Y)`, `A = Z · diag(1/x)`.
//! 4. **Invert**: `L = (I - A)⁻¹` by dense LU decomposition.
//!
//! The result, [`MrioTables`], carries `L` and `Y` for the allocation step.
//! Downstream code depends on the [`MrioSource`] trait rather than on
//! [`MrioLoader`] directly.
//!
//! # Modules
//!
//! - [`archive`] -- Member access for zipped or extracted datasets
//! - [`axis`] -- [`Axis`] and [`Label`], two-level labels with a position index
//! - [`cache`] -- [`DatasetCache`], the local storage folder
//! - [`error`] -- [`MrioError`]
//! - [`leontief`] -- Total output, technical coefficients, and inversion
//! - [`loader`] -- [`MrioLoader`], [`MrioSource`] and [`MrioTables`]
//! - [`matrix`] -- [`LabeledMatrix`]
//! - [`parse`] -- The EXIOBASE tab-separated text format
//! - [`provider`] -- [`DatasetProvider`], [`ZenodoProvider`], [`OfflineProvider`]

pub mod archive;
pub mod axis;
pub mod cache;
pub mod error;
pub mod leontief;
pub mod loader;
pub mod matrix;
pub mod parse;
pub mod provider;

pub use archive::DatasetArchive;
pub use axis::{Axis, Label};
pub use cache::DatasetCache;
pub use error::MrioError;
pub use leontief::{identity_residual, leontief_inverse, technical_coefficients, total_output};
pub use loader::{MrioLoader, MrioSource, MrioTables, compute_tables};
pub use matrix::LabeledMatrix;
pub use parse::parse_matrix;
pub use provider::{
    CONNECT_TIMEOUT, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_DOWNLOAD_URL, DEFAULT_SYSTEM,
    DatasetProvider, OfflineProvider, ZenodoProvider,
};
