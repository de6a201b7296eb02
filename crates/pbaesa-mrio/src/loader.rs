//! Year-scoped loading of `(L, Y)`.

use std::path::PathBuf;

use nalgebra::DMatrix;
use pbaesa_types::{Year, YearRange};
use tracing::{debug, info, warn};

use crate::archive::{DatasetArchive, Y_MEMBER, Z_MEMBER};
use crate::axis::Axis;
use crate::cache::DatasetCache;
use crate::error::MrioError;
use crate::leontief::{identity_residual, leontief_inverse, technical_coefficients, total_output};
use crate::matrix::LabeledMatrix;
use crate::provider::DatasetProvider;

/// The inputs of the allocation step for one year.
#[derive(Debug, Clone)]
pub struct MrioTables {
    /// Dataset year.
    pub year: Year,
    /// The (region, sector) axis shared by the rows and columns of `L` and
    /// the rows of `Y`.
    pub sectors: Axis,
    /// Leontief inverse `(I - A)⁻¹`.
    pub leontief: DMatrix<f64>,
    /// Final demand `Y`.
    pub final_demand: LabeledMatrix,
}

/// Anything that can produce [`MrioTables`] for a year.
pub trait MrioSource {
    /// Load the tables for `year`.
    ///
    /// # Errors
    ///
    /// Any [`MrioError`] of locating, parsing or inverting the dataset.
    fn load(&self, year: Year) -> Result<MrioTables, MrioError>;
}

/// Derive [`MrioTables`] from a parsed transaction matrix and final demand.
///
/// Both matrices must share the (region, sector) row axis and `z` must be
/// square over it.
///
/// # Errors
///
/// - [`MrioError::AxisMismatch`] if the row and column axes disagree.
/// - [`MrioError::DegenerateOutput`] if a sector's total output is zero.
/// - [`MrioError::SingularMatrix`] if `I - A` has no usable inverse.
pub fn compute_tables(
    year: Year,
    z: LabeledMatrix,
    y: LabeledMatrix,
) -> Result<MrioTables, MrioError> {
    if z.rows() != z.columns() {
        return Err(MrioError::AxisMismatch {
            message: format!(
                "Z rows ({}) and Z columns ({}) differ",
                z.rows().len(),
                z.columns().len()
            ),
        });
    }
    if z.rows() != y.rows() {
        return Err(MrioError::AxisMismatch {
            message: format!(
                "Z rows ({}) and Y rows ({}) differ",
                z.rows().len(),
                y.rows().len()
            ),
        });
    }

    let x = total_output(z.values(), y.values());
    let (sectors, _, z_values) = z.into_parts();
    let a = technical_coefficients(z_values, &x, &sectors)?;
    let leontief = leontief_inverse(&a, year)?;
    debug!(
        year = year.get(),
        residual = identity_residual(&a, &leontief),
        "Leontief inverse computed"
    );

    Ok(MrioTables {
        year,
        sectors,
        leontief,
        final_demand: y,
    })
}

/// Loads EXIOBASE years from a local cache, downloading missing ones.
pub struct MrioLoader {
    cache: DatasetCache,
    provider: Box<dyn DatasetProvider>,
    supported: YearRange,
}

impl MrioLoader {
    /// Create a loader over `cache` that fetches through `provider`.
    pub fn new(
        cache: DatasetCache,
        provider: Box<dyn DatasetProvider>,
        supported: YearRange,
    ) -> Self {
        Self {
            cache,
            provider,
            supported,
        }
    }

    /// Find the dataset for `year`, calling the provider once if it is not
    /// cached.
    ///
    /// # Errors
    ///
    /// - [`MrioError::UnsupportedYear`] if `year` is outside the published
    ///   range, or is still missing after the provider ran.
    /// - [`MrioError::Io`] if the storage folder cannot be listed.
    pub fn locate_dataset(&self, year: Year) -> Result<PathBuf, MrioError> {
        let unsupported = MrioError::UnsupportedYear {
            year,
            supported: self.supported,
        };
        if !self.supported.contains(year) {
            return Err(unsupported);
        }

        if let Some(path) = self.cache.locate(year)? {
            return Ok(path);
        }

        info!(
            year = year.get(),
            folder = %self.cache.folder().display(),
            "Dataset not cached, requesting download"
        );
        if let Err(e) = self.provider.fetch(year, self.cache.folder()) {
            warn!(year = year.get(), error = %e, "Dataset provider failed");
        }

        self.cache.locate(year)?.ok_or(unsupported)
    }
}

impl core::fmt::Debug for MrioLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MrioLoader")
            .field("cache", &self.cache)
            .field("supported", &self.supported)
            .finish_non_exhaustive()
    }
}

impl MrioSource for MrioLoader {
    fn load(&self, year: Year) -> Result<MrioTables, MrioError> {
        let path = self.locate_dataset(year)?;
        info!(year = year.get(), path = %path.display(), "Loading EXIOBASE dataset");

        let archive = DatasetArchive::open(&path);
        let z = archive.read_matrix(Z_MEMBER)?;
        let y = archive.read_matrix(Y_MEMBER)?;
        let tables = compute_tables(year, z, y)?;

        info!(
            year = year.get(),
            sectors = tables.sectors.len(),
            demand_columns = tables.final_demand.columns().len(),
            "MRIO tables ready"
        );
        Ok(tables)
    }
}
