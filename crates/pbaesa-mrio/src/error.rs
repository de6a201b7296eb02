//! Error types for the `pbaesa-mrio` crate.
//!
//! Every variant is fatal for the requested year: the loader never returns
//! partially computed matrices.

use pbaesa_types::{Year, YearRange};

/// Errors that can occur while loading a year's input-output tables.
#[derive(Debug, thiserror::Error)]
pub enum MrioError {
    /// The year is outside the published range, or no dataset could be
    /// found for it even after a download attempt.
    #[error("EXIOBASE data for {year} is unavailable; published years are {supported}")]
    UnsupportedYear {
        /// The requested year.
        year: Year,
        /// The range the provider publishes.
        supported: YearRange,
    },

    /// A (region, sector) pair has zero total output, so its column of the
    /// technical-coefficient matrix would divide by zero.
    #[error("total output of {region}/{sector} is zero")]
    DegenerateOutput {
        /// Region of the degenerate row.
        region: String,
        /// Sector of the degenerate row.
        sector: String,
    },

    /// `(I - A)` could not be inverted.
    #[error("(I - A) is singular for {year}; no Leontief inverse exists")]
    SingularMatrix {
        /// The dataset year.
        year: Year,
    },

    /// Two matrices that must share an axis do not.
    #[error("axis mismatch: {message}")]
    AxisMismatch {
        /// Which axes disagree and how.
        message: String,
    },

    /// A label occurs twice on one axis.
    #[error("duplicate label {region}/{name} on {axis} axis")]
    DuplicateLabel {
        /// Axis description (`rows` or `columns`).
        axis: &'static str,
        /// Region level of the label.
        region: String,
        /// Second level of the label.
        name: String,
    },

    /// A matrix file is malformed.
    #[error("{file}:{line}: {message}")]
    Parse {
        /// Member or file name.
        file: String,
        /// One-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// A required member (`Z.txt`, `Y.txt`) is missing from the dataset.
    #[error("dataset {dataset} has no member {member}")]
    MissingMember {
        /// Dataset path.
        dataset: String,
        /// Missing member name.
        member: &'static str,
    },

    /// The dataset archive could not be read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The dataset provider failed to fetch a year.
    #[error("download of {year} failed: {message}")]
    Download {
        /// The requested year.
        year: Year,
        /// Description of the failure.
        message: String,
    },

    /// A file-system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
