//! Allocation factors from EXIOBASE final consumption.
//!
//! An allocation factor apportions a globally aggregated environmental
//! burden to one (geography, sector) pair. This version computes the direct
//! final-consumption-expenditure (FCE) share: the fraction of a geography's
//! household, NPISH and government consumption spent directly on the sector.
//!
//! # Modules
//!
//! - [`fr_matrix`] -- The sector-by-geography FCE share matrix
//! - [`table`] -- [`AllocationTable`], the diagonal long-form result
//! - [`builder`] -- [`AllocationMatrixBuilder`] and [`TableSource`]
//! - [`store`] -- [`AllocationStore`], one JSON file per year
//! - [`accessor`] -- [`AllocationFactorAccessor`], lookups by geography and sector
//! - [`error`] -- [`BuildError`], [`LookupError`], [`StoreError`]

pub mod accessor;
pub mod builder;
pub mod error;
pub mod fr_matrix;
pub mod store;
pub mod table;

pub use accessor::AllocationFactorAccessor;
pub use builder::{AllocationMatrixBuilder, TableSource, export_all_allocation_factors};
pub use error::{BuildError, LookupError, StoreError};
pub use fr_matrix::{
    ColumnBalance, DEFAULT_TOLERANCE, FceCategories, FrMatrix, compute_fr_matrix, fce_selector,
};
pub use store::AllocationStore;
pub use table::{AllocationRow, AllocationTable, AllocationVariant};
