//! Technical coefficients and the Leontief inverse.
//!
//! With total output `x = rowsum(Z) + rowsum(Y)`, the technical-coefficient
//! matrix is `A = Z · diag(1/x)` and the Leontief inverse is `L = (I - A)⁻¹`.

use nalgebra::{DMatrix, DVector};
use pbaesa_types::Year;

use crate::axis::Axis;
use crate::error::MrioError;

/// Total output per row: `rowsum(z) + rowsum(y)`.
pub fn total_output(z: &DMatrix<f64>, y: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(
        z.nrows(),
        z.row_iter()
            .zip(y.row_iter())
            .map(|(z_row, y_row)| z_row.sum() + y_row.sum()),
    )
}

/// Divide column `j` of `z` by `x[j]`.
///
/// # Errors
///
/// [`MrioError::DegenerateOutput`] if some `x[j]` is exactly zero, naming
/// the label at position `j` of `sectors`.
#[allow(clippy::float_cmp)]
pub fn technical_coefficients(
    mut z: DMatrix<f64>,
    x: &DVector<f64>,
    sectors: &Axis,
) -> Result<DMatrix<f64>, MrioError> {
    if let Some(position) = x.iter().position(|&output| output == 0.0) {
        let (region, sector) = sectors
            .get(position)
            .map(|label| (label.region.clone(), label.name.clone()))
            .unwrap_or_default();
        return Err(MrioError::DegenerateOutput { region, sector });
    }

    for (mut column, &output) in z.column_iter_mut().zip(x.iter()) {
        for value in column.iter_mut() {
            *value /= output;
        }
    }
    Ok(z)
}

/// Invert `I - a`.
///
/// # Errors
///
/// [`MrioError::SingularMatrix`] when the LU decomposition finds no inverse
/// or the result holds non-finite values.
pub fn leontief_inverse(a: &DMatrix<f64>, year: Year) -> Result<DMatrix<f64>, MrioError> {
    let n = a.nrows();
    let inverse = (DMatrix::<f64>::identity(n, n) - a)
        .try_inverse()
        .ok_or(MrioError::SingularMatrix { year })?;
    if inverse.iter().any(|value| !value.is_finite()) {
        return Err(MrioError::SingularMatrix { year });
    }
    Ok(inverse)
}

/// Largest absolute entry of `(I - a) · l - I`.
pub fn identity_residual(a: &DMatrix<f64>, l: &DMatrix<f64>) -> f64 {
    let n = a.nrows();
    let identity = DMatrix::<f64>::identity(n, n);
    ((&identity - a) * l - identity).amax()
}
