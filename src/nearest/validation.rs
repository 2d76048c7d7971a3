//! nearest::validation — fail-fast checks on input matrices.
use crate::nearest::errors::{NearestError, NearestResult};
use ndarray::Array2;

/// Entries `a_ij`, `a_ji` differing by more than this are asymmetric.
pub const SYMMETRY_TOL: f64 = 1e-10;

/// Validate a square, non-empty, finite, symmetric matrix.
///
/// # Errors
/// - `EmptyMatrix`, `NotSquare`, `NonFinite` or `NotSymmetric`, checked in
///   that order.
pub fn validate_symmetric(a: &Array2<f64>) -> NearestResult<()> {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return Err(NearestError::EmptyMatrix);
    }
    if rows != cols {
        return Err(NearestError::NotSquare { rows, cols });
    }
    if let Some(((row, col), &value)) = a.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(NearestError::NonFinite { row, col, value });
    }
    for i in 0..rows {
        for j in (i + 1)..cols {
            let (upper, lower) = (a[[i, j]], a[[j, i]]);
            if (upper - lower).abs() > SYMMETRY_TOL {
                return Err(NearestError::NotSymmetric { row: i, col: j, upper, lower });
            }
        }
    }
    Ok(())
}
