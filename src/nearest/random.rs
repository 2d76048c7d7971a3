//! nearest::random — random correlation matrices for tests and synthetic
//! structures.
//!
//! Purpose
//! -------
//! - [`cor_rand_pd`]: positive definite matrices from the C-vine
//!   partial-correlation construction (Lewandowski, Kurowicka & Joe, 2009).
//!   Partial correlations at vine level `k` are `2·Beta(β_k, β_k) − 1` with
//!   `β_k = α + (d − 1 − k)/2 − ½`, so `α` controls how concentrated the
//!   correlations are around zero (`α = 1` is uniform over correlation
//!   matrices). Rows and columns are randomly permuted at the end.
//! - [`cor_rand_psd`]: rank-`k` matrices `W·Wᵀ`, `W ~ N(0, 1)^{d×k}`,
//!   rescaled to a unit diagonal.
//! - [`set_diag`]: copy of a matrix with its diagonal replaced.
//!
//! Conventions
//! -----------
//! - The caller supplies the RNG, so results are reproducible under a
//!   seeded `StdRng`.
use crate::nearest::errors::{NearestError, NearestResult};
use crate::numerical_stability::linalg::{from_dmatrix, rescale_unit_diagonal, symmetrize};
use nalgebra::DMatrix;
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Beta, Distribution, StandardNormal};

/// cor_rand_pd — random positive definite correlation matrix.
///
/// Parameters
/// ----------
/// - `rng`: `&mut R`
/// - `d`: `usize`
///   Dimension, at least 1.
/// - `alpha`: `f64`
///   Concentration, strictly positive and finite.
///
/// Returns
/// -------
/// `NearestResult<Array2<f64>>`
///   Symmetric, unit diagonal, positive definite.
///
/// Errors
/// ------
/// - `InvalidDimension` for `d = 0`.
/// - `InvalidParameter` for a non-positive or non-finite `alpha`.
pub fn cor_rand_pd<R: Rng + ?Sized>(rng: &mut R, d: usize, alpha: f64) -> NearestResult<Array2<f64>> {
    if d == 0 {
        return Err(NearestError::InvalidDimension { dim: d, reason: "must be at least 1" });
    }
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(NearestError::InvalidParameter {
            name: "alpha",
            value: alpha,
            reason: "must be finite and strictly positive",
        });
    }

    let mut partial = DMatrix::<f64>::zeros(d, d);
    let mut s = DMatrix::<f64>::identity(d, d);
    let mut beta = alpha + (d as f64 - 1.0) / 2.0;
    for k in 0..d.saturating_sub(1) {
        beta -= 0.5;
        let dist = Beta::new(beta, beta).map_err(|_| NearestError::InvalidParameter {
            name: "alpha",
            value: alpha,
            reason: "beta shape parameter out of range",
        })?;
        for i in (k + 1)..d {
            partial[(k, i)] = 2.0 * dist.sample(rng) - 1.0;
            let mut p = partial[(k, i)];
            for l in (0..k).rev() {
                p = p * ((1.0 - partial[(l, i)].powi(2)) * (1.0 - partial[(l, k)].powi(2))).sqrt()
                    + partial[(l, i)] * partial[(l, k)];
            }
            s[(k, i)] = p;
            s[(i, k)] = p;
        }
    }

    let mut perm: Vec<usize> = (0..d).collect();
    perm.shuffle(rng);
    let permuted = DMatrix::from_fn(d, d, |i, j| s[(perm[i], perm[j])]);
    Ok(from_dmatrix(&permuted))
}

/// cor_rand_psd — random correlation matrix of rank at most `k`.
///
/// # Errors
/// - `InvalidDimension` for `d = 0`.
/// - `InvalidParameter` for `k = 0`.
pub fn cor_rand_psd<R: Rng + ?Sized>(rng: &mut R, d: usize, k: usize) -> NearestResult<Array2<f64>> {
    if d == 0 {
        return Err(NearestError::InvalidDimension { dim: d, reason: "must be at least 1" });
    }
    if k == 0 {
        return Err(NearestError::InvalidParameter {
            name: "k",
            value: 0.0,
            reason: "factor rank must be at least 1",
        });
    }
    let w = DMatrix::<f64>::from_fn(d, k, |_, _| StandardNormal.sample(rng));
    let mut s = symmetrize(&(&w * w.transpose()));
    rescale_unit_diagonal(&mut s);
    Ok(from_dmatrix(&s))
}

/// set_diag — copy of `a` with every diagonal entry set to `value`.
pub fn set_diag(a: &Array2<f64>, value: f64) -> Array2<f64> {
    let mut out = a.clone();
    out.diag_mut().fill(value);
    out
}
