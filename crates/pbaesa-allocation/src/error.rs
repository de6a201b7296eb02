//! Error types for the `pbaesa-allocation` crate.
//!
//! Build errors are fatal for the requested year and nothing is persisted.
//! Lookup errors are recoverable: a later call may succeed once the table
//! exists.

use pbaesa_mrio::MrioError;
use pbaesa_types::Year;

use crate::table::AllocationVariant;

/// Errors from reading or writing a persisted allocation table.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file-system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table could not be encoded or decoded.
    #[error("malformed allocation table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort building a year's allocation table.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Loading the input-output tables failed.
    #[error(transparent)]
    Mrio(#[from] MrioError),

    /// A (geography, FCE category) column is absent from the final-demand
    /// matrix.
    #[error("final demand has no column {geography}/{category}")]
    MissingDemandColumn {
        /// Geography code.
        geography: String,
        /// Expected FCE category label.
        category: String,
    },

    /// A geography's FCE total is zero although some contributions are not.
    #[error("FCE of {geography} sums to zero across {contributors} nonzero contributions")]
    DegenerateGeography {
        /// Geography code.
        geography: String,
        /// Number of nonzero entries in the geography's column.
        contributors: usize,
    },

    /// A geography's FCE total or one of its shares is NaN or infinite.
    #[error("FCE of {geography} is not finite (total {total})")]
    NonFiniteShare {
        /// Geography code.
        geography: String,
        /// Column total before normalisation.
        total: f64,
    },

    /// The FR matrix does not have one row per sector of `L` and one column
    /// per geography.
    #[error("FR matrix has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        /// `(sectors, geographies)`.
        expected: (usize, usize),
        /// Shape produced.
        actual: (usize, usize),
    },

    /// A normalised FR column does not sum to one.
    #[error("FR column {geography} sums to {sum}, expected 1")]
    ColumnSumDrift {
        /// Geography code.
        geography: String,
        /// Observed column sum.
        sum: f64,
    },

    /// A sector row belongs to a region outside the recognised scopes.
    #[error("region {region} is not a recognised geography")]
    RegionOutOfScope {
        /// Region code.
        region: String,
    },

    /// Persisting the table failed.
    #[error("allocation store: {0}")]
    Store(#[from] StoreError),
}

/// Errors returned by allocation-factor lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    /// No table exists for the year and none could be built.
    #[error("allocation table for {year} is unavailable: {reason}")]
    TableUnavailable {
        /// Requested year.
        year: Year,
        /// Why neither the store nor the builder produced a table.
        reason: String,
    },

    /// The geography is not a recognised scope.
    #[error("unknown geography {requested:?}; valid codes are {}", valid.join(", "))]
    UnknownGeography {
        /// Requested code.
        requested: String,
        /// Every recognised code.
        valid: Vec<String>,
    },

    /// The sector does not occur in the table.
    #[error("unknown sector {requested:?}; valid sectors are {}", valid.join(", "))]
    UnknownSector {
        /// Requested sector.
        requested: String,
        /// Every sector in the table.
        valid: Vec<String>,
    },

    /// The requested variant is not computed.
    #[error("{variant} allocation factors are not available for {year}")]
    ColumnUnavailable {
        /// Requested variant.
        variant: AllocationVariant,
        /// Requested year.
        year: Year,
    },

    /// Geography and sector are known but the table has no row for the pair.
    #[error("no allocation row for {geography}/{sector}")]
    RowMissing {
        /// Geography code.
        geography: String,
        /// Sector name.
        sector: String,
    },
}
