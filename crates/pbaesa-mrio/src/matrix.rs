//! Dense matrices with labelled axes.

use nalgebra::DMatrix;

use crate::axis::Axis;
use crate::error::MrioError;

/// A dense `f64` matrix whose rows and columns carry [`Axis`] labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    rows: Axis,
    columns: Axis,
    values: DMatrix<f64>,
}

impl LabeledMatrix {
    /// Combine axes and values, checking that the dimensions agree.
    ///
    /// # Errors
    ///
    /// [`MrioError::AxisMismatch`] if `values` is not rows x columns.
    pub fn new(rows: Axis, columns: Axis, values: DMatrix<f64>) -> Result<Self, MrioError> {
        if values.nrows() != rows.len() || values.ncols() != columns.len() {
            return Err(MrioError::AxisMismatch {
                message: format!(
                    "{}x{} values for {} row and {} column labels",
                    values.nrows(),
                    values.ncols(),
                    rows.len(),
                    columns.len()
                ),
            });
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// Row labels.
    pub const fn rows(&self) -> &Axis {
        &self.rows
    }

    /// Column labels.
    pub const fn columns(&self) -> &Axis {
        &self.columns
    }

    /// The numeric values.
    pub const fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Split into `(rows, columns, values)`.
    pub fn into_parts(self) -> (Axis, Axis, DMatrix<f64>) {
        (self.rows, self.columns, self.values)
    }
}
