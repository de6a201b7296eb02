//! Year-scoped construction of allocation tables.

use std::path::PathBuf;

use chrono::Utc;
use pbaesa_mrio::MrioSource;
use pbaesa_types::{GeoScopes, Year};
use tracing::info;

use crate::error::BuildError;
use crate::fr_matrix::{
    ColumnBalance, DEFAULT_TOLERANCE, FceCategories, FrMatrix, compute_fr_matrix,
};
use crate::store::AllocationStore;
use crate::table::AllocationTable;

/// Anything that can build a year's allocation table on demand.
pub trait TableSource {
    /// Build the table for `year`.
    ///
    /// # Errors
    ///
    /// Any [`BuildError`] that prevents producing the table.
    fn build_table(&self, year: Year) -> Result<AllocationTable, BuildError>;
}

/// Builds allocation tables from an [`MrioSource`].
#[derive(Debug, Clone)]
pub struct AllocationMatrixBuilder<S> {
    source: S,
    geographies: GeoScopes,
    categories: FceCategories,
    tolerance: f64,
}

impl<S: MrioSource> AllocationMatrixBuilder<S> {
    /// Create a builder over `source` with the given geography columns.
    pub fn new(source: S, geographies: GeoScopes) -> Self {
        Self {
            source,
            geographies,
            categories: FceCategories::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Override the FCE category labels.
    #[must_use]
    pub fn with_categories(mut self, categories: FceCategories) -> Self {
        self.categories = categories;
        self
    }

    /// Override the column-sum tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Load `year` and compute its checked FR matrix.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Mrio`] if the input-output tables cannot be loaded.
    /// - Any error of [`compute_fr_matrix`].
    /// - [`BuildError::ColumnSumDrift`] for the first column whose sum is
    ///   off by more than the tolerance.
    pub fn fr_matrix(&self, year: Year) -> Result<FrMatrix, BuildError> {
        let tables = self.source.load(year)?;
        let fr = compute_fr_matrix(&tables, &self.geographies, &self.categories)?;

        if let ColumnBalance::Drift(drift) = fr.column_balance(self.tolerance) {
            if let Some((geography, sum)) = drift.into_iter().next() {
                return Err(BuildError::ColumnSumDrift { geography, sum });
            }
        }
        Ok(fr)
    }

    /// Build the diagonal allocation table for `year`.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::fr_matrix`], or [`BuildError::RegionOutOfScope`]
    /// if a sector row belongs to an unrecognised region.
    pub fn build(&self, year: Year) -> Result<AllocationTable, BuildError> {
        let fr = self.fr_matrix(year)?;
        let table = AllocationTable::from_fr_matrix(&fr, Utc::now())?;
        info!(
            year = year.get(),
            rows = table.len(),
            empty_geographies = fr.empty.len(),
            "Allocation table built"
        );
        Ok(table)
    }
}

impl<S: MrioSource> TableSource for AllocationMatrixBuilder<S> {
    fn build_table(&self, year: Year) -> Result<AllocationTable, BuildError> {
        self.build(year)
    }
}

/// Build the table for `year` and persist it, returning the artifact path.
///
/// Nothing is written when the build fails.
///
/// # Errors
///
/// Any error of `source`, or [`BuildError::Store`] if the table cannot be
/// written.
pub fn export_all_allocation_factors(
    source: &dyn TableSource,
    store: &AllocationStore,
    year: Year,
) -> Result<PathBuf, BuildError> {
    let table = source.build_table(year)?;
    Ok(store.save(&table)?)
}
