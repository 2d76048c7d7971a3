//! nearest::near_psd — alternating projections with Dykstra's correction.
//!
//! Purpose
//! -------
//! A cheaper, lower-precision repair than the Newton engine: alternate
//! between the PSD cone and the unit-diagonal affine set (Higham 2002),
//! carrying Dykstra's correction on the PSD step, and finish with a clip
//! plus diagonal congruence so the result is PSD with an exact unit
//! diagonal. Suitable when a semidefinite result (`τ = 0`) is acceptable.
//!
//! Key behaviors
//! -------------
//! - Stops when successive iterates differ by less than `tol` in Frobenius
//!   norm, when an iterate is already PSD, or after `n_iter` rounds.
//! - Exhausting `n_iter` is logged with `tracing::warn!`; the cleaned-up
//!   last iterate is still returned.
use crate::nearest::errors::NearestResult;
use crate::nearest::options::NearPSDOptions;
use crate::nearest::validation::validate_symmetric;
use crate::numerical_stability::linalg::{
    frobenius_norm, from_dmatrix, project_psd, rescale_unit_diagonal, sorted_sym_eigen,
    symmetrize, to_dmatrix,
};
use nalgebra::DMatrix;
use ndarray::Array2;
use tracing::{debug, warn};

/// cor_near_psd — nearest PSD correlation matrix by alternating projections.
///
/// Parameters
/// ----------
/// - `a`: `&Array2<f64>`
///   Symmetric input matrix.
/// - `opts`: `&NearPSDOptions`
///   Round cap `n_iter` and stopping tolerance `tol`.
///
/// Returns
/// -------
/// `NearestResult<Array2<f64>>`
///   PSD matrix with unit diagonal and entries in `[−1, 1]`.
///
/// Errors
/// ------
/// - Matrix validation errors (empty, not square, non-finite, asymmetric).
pub fn cor_near_psd(a: &Array2<f64>, opts: &NearPSDOptions) -> NearestResult<Array2<f64>> {
    opts.validate()?;
    validate_symmetric(a)?;
    let n = a.nrows();
    let mut y = symmetrize(&to_dmatrix(a));
    set_unit_diagonal(&mut y);
    let mut delta_s = DMatrix::<f64>::zeros(n, n);

    let mut done = false;
    let mut rounds = 0;
    while rounds < opts.n_iter {
        rounds += 1;
        let r = &y - &delta_s;
        let x = project_psd(&r);
        delta_s = &x - &r;
        let mut y_next = x;
        set_unit_diagonal(&mut y_next);

        let diff = frobenius_norm(&(&y_next - &y));
        y = y_next;
        let lmin = sorted_sym_eigen(&y).values.iter().copied().fold(f64::INFINITY, f64::min);
        if diff < opts.tol || lmin >= 0.0 {
            done = true;
            break;
        }
    }
    if done {
        debug!(rounds, "alternating projections finished");
    } else {
        warn!(rounds, "alternating projections hit the round cap; returning cleaned-up iterate");
    }

    let mut out = project_psd(&y);
    rescale_unit_diagonal(&mut out);
    for j in 0..n {
        for i in 0..n {
            if i != j {
                out[(i, j)] = out[(i, j)].clamp(-1.0, 1.0);
            }
        }
    }
    Ok(from_dmatrix(&out))
}

fn set_unit_diagonal(m: &mut DMatrix<f64>) {
    for i in 0..m.nrows() {
        m[(i, i)] = 1.0;
    }
}
