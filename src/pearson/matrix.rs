//! pearson::matrix — the pairwise map from a target correlation matrix to
//! the latent normal correlation matrix.
//!
//! Purpose
//! -------
//! Apply single-pair matching to every `i < j` of a `d × d` target, in
//! parallel, and assemble the symmetric latent matrix with a unit diagonal.
//!
//! Key behaviors
//! -------------
//! - Each marginal is prepared once ([`prepare_margins`]) against one shared
//!   Gauss–Hermite rule; preparation runs on rayon workers.
//! - Pairs are solved independently on rayon workers. Failures do not stop
//!   the map: all of them are collected, ordered by `(i, j)`, and returned
//!   as `PearsonError::Pairwise`.
//! - The result is not projected: the latent matrix may be indefinite and is
//!   repaired downstream by `nearest::cor_near_pd`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The target must be square, match the number of marginals, be finite,
//!   symmetric within `SYMMETRY_TOL`, and hold entries in `[−1, 1]`. Its
//!   diagonal is ignored.
use crate::hermite::GaussHermiteRule;
use crate::margins::Marginal;
use crate::pearson::errors::{PairFailure, PearsonError, PearsonResult};
use crate::pearson::matching::{correlation_bounds_prepared, latent_correlation_prepared};
use crate::pearson::options::MatchOptions;
use crate::pearson::prepared::PreparedMargin;
use ndarray::Array2;
use rayon::prelude::*;
use tracing::debug;

const SYMMETRY_TOL: f64 = 1e-10;

/// Prepare every marginal for matching, sharing one quadrature rule.
///
/// # Errors
/// - `PearsonError::Prepare { index, .. }` naming a marginal that could not
///   be prepared.
pub fn prepare_margins(
    margins: &[&dyn Marginal], opts: &MatchOptions,
) -> PearsonResult<Vec<PreparedMargin>> {
    opts.validate()?;
    let rule = GaussHermiteRule::new(opts.quadrature_nodes)?;
    margins
        .par_iter()
        .enumerate()
        .map(|(index, m)| {
            PreparedMargin::new(*m, opts.degree, &rule)
                .map_err(|error| PearsonError::Prepare { index, error: Box::new(error) })
        })
        .collect()
}

/// latent_correlation_matrix — latent normal correlation for a target matrix.
///
/// Parameters
/// ----------
/// - `target`: `&Array2<f64>`
///   Symmetric `d × d` Pearson correlation target of the marginal variables.
/// - `margins`: `&[&dyn Marginal]`
///   The `d` marginals, in the target's row order.
/// - `opts`: `&MatchOptions`
///   Matching configuration applied to every pair.
///
/// Returns
/// -------
/// `PearsonResult<Array2<f64>>`
///   Symmetric latent matrix with unit diagonal. Not necessarily PSD.
///
/// Errors
/// ------
/// - `DimensionMismatch`, `AsymmetricTarget`, `InvalidTarget` for a malformed
///   target.
/// - `Prepare { index, .. }` if a marginal cannot be expanded.
/// - `Pairwise(failures)` listing every failed pair with its `(i, j)`.
pub fn latent_correlation_matrix(
    target: &Array2<f64>, margins: &[&dyn Marginal], opts: &MatchOptions,
) -> PearsonResult<Array2<f64>> {
    validate_target_matrix(target, margins.len())?;
    let prepared = prepare_margins(margins, opts)?;
    latent_correlation_matrix_prepared(target, &prepared, opts)
}

/// [`latent_correlation_matrix`] on prepared marginals.
pub fn latent_correlation_matrix_prepared(
    target: &Array2<f64>, prepared: &[PreparedMargin], opts: &MatchOptions,
) -> PearsonResult<Array2<f64>> {
    let d = prepared.len();
    validate_target_matrix(target, d)?;
    opts.validate()?;

    let results: Vec<(usize, usize, PearsonResult<f64>)> = upper_pairs(d)
        .into_par_iter()
        .map(|(i, j)| {
            let res = latent_correlation_prepared(target[[i, j]], &prepared[i], &prepared[j], opts);
            (i, j, res)
        })
        .collect();

    let mut latent = Array2::<f64>::eye(d);
    let mut failures = Vec::new();
    for (i, j, res) in results {
        match res {
            Ok(rho) => {
                debug!(i, j, target = target[[i, j]], latent = rho, "matched pair");
                latent[[i, j]] = rho;
                latent[[j, i]] = rho;
            }
            Err(error) => failures.push(PairFailure { i, j, error }),
        }
    }
    if !failures.is_empty() {
        return Err(PearsonError::Pairwise(failures));
    }
    Ok(latent)
}

/// Attainable lower and upper correlation for every marginal pair.
///
/// Returns `(lower, upper)`, both symmetric with unit diagonal.
///
/// # Errors
/// - `Prepare { index, .. }` for marginals that cannot be expanded.
/// - `Pairwise(failures)` for pairs whose polynomial is non-finite.
pub fn correlation_bounds_matrix(
    margins: &[&dyn Marginal], opts: &MatchOptions,
) -> PearsonResult<(Array2<f64>, Array2<f64>)> {
    let prepared = prepare_margins(margins, opts)?;
    let d = prepared.len();
    let results: Vec<_> = upper_pairs(d)
        .into_par_iter()
        .map(|(i, j)| (i, j, correlation_bounds_prepared(&prepared[i], &prepared[j], opts.degree)))
        .collect();

    let mut lower = Array2::<f64>::eye(d);
    let mut upper = Array2::<f64>::eye(d);
    let mut failures = Vec::new();
    for (i, j, res) in results {
        match res {
            Ok(b) => {
                lower[[i, j]] = b.lower;
                lower[[j, i]] = b.lower;
                upper[[i, j]] = b.upper;
                upper[[j, i]] = b.upper;
            }
            Err(error) => failures.push(PairFailure { i, j, error }),
        }
    }
    if !failures.is_empty() {
        return Err(PearsonError::Pairwise(failures));
    }
    Ok((lower, upper))
}

fn upper_pairs(d: usize) -> Vec<(usize, usize)> {
    (0..d).flat_map(|i| (i + 1..d).map(move |j| (i, j))).collect()
}

fn validate_target_matrix(target: &Array2<f64>, d: usize) -> PearsonResult<()> {
    let (rows, cols) = target.dim();
    if rows != d || cols != d {
        return Err(PearsonError::DimensionMismatch { expected: d, found: (rows, cols) });
    }
    for i in 0..d {
        for j in (i + 1)..d {
            let (upper, lower) = (target[[i, j]], target[[j, i]]);
            if !upper.is_finite() || !lower.is_finite() {
                return Err(PearsonError::InvalidTarget {
                    value: if upper.is_finite() { lower } else { upper },
                    reason: "target entries must be finite",
                });
            }
            if (upper - lower).abs() > SYMMETRY_TOL {
                return Err(PearsonError::AsymmetricTarget { row: i, col: j, upper, lower });
            }
            if upper.abs() > 1.0 {
                return Err(PearsonError::InvalidTarget {
                    value: upper,
                    reason: "a correlation must lie in [-1, 1]",
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::margins::{Continuous, Discrete};
    use crate::pearson::errors::InfeasibleReason;
    use ndarray::array;
    use statrs::distribution::{Bernoulli, Exp, Normal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Symmetric assembly with unit diagonal.
    // - Aggregation of pair failures with their (i, j).
    // - Target validation: shape, symmetry.
    // - Bounds matrices.
    //
    // They intentionally DO NOT cover:
    // - Single-pair numerics (see `matching`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Normal marginals reproduce the target; the output is symmetric.
    //
    // Given
    // -----
    // - Three N(0, 1) marginals and a valid 3×3 target.
    //
    // Expect
    // ------
    // - Latent ≈ target off-diagonal; unit diagonal; exact symmetry.
    fn normal_margins_reproduce_target() {
        // Arrange
        let n = Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap();
        let margins: Vec<&dyn Marginal> = vec![&n, &n, &n];
        let target = array![[1.0, 0.3, -0.2], [0.3, 1.0, 0.5], [-0.2, 0.5, 1.0]];

        // Act
        let latent =
            latent_correlation_matrix(&target, &margins, &MatchOptions::default()).unwrap();

        // Assert
        for i in 0..3 {
            assert_eq!(latent[[i, i]], 1.0);
            for j in 0..3 {
                assert_eq!(latent[[i, j]], latent[[j, i]]);
                assert!((latent[[i, j]] - target[[i, j]]).abs() < 1e-8);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Failed pairs are reported together with their indices.
    //
    // Given
    // -----
    // - Margins [N(0,1), Bernoulli(½), Bernoulli(½)]; the (1, 2) target 0.95
    //   exceeds the Bernoulli pair's upper bound, (0, 2) target −0.9 exceeds
    //   the normal × Bernoulli bound 2φ(0) ≈ 0.80.
    //
    // Expect
    // ------
    // - `Pairwise` with exactly (0, 2) and (1, 2), in that order, both
    //   `OutOfBounds`.
    fn pair_failures_keep_indices() {
        // Arrange
        let n = Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap();
        let b = Discrete::new(Bernoulli::new(0.5).unwrap()).unwrap();
        let margins: Vec<&dyn Marginal> = vec![&n, &b, &b];
        let target = array![[1.0, 0.2, -0.9], [0.2, 1.0, 0.95], [-0.9, 0.95, 1.0]];

        // Act
        let err =
            latent_correlation_matrix(&target, &margins, &MatchOptions::default()).unwrap_err();

        // Assert
        match err {
            PearsonError::Pairwise(failures) => {
                let ids: Vec<(usize, usize)> = failures.iter().map(|f| (f.i, f.j)).collect();
                assert_eq!(ids, vec![(0, 2), (1, 2)]);
                for f in &failures {
                    assert!(matches!(
                        f.error,
                        PearsonError::InfeasibleTarget { reason: InfeasibleReason::OutOfBounds, .. }
                    ));
                }
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Malformed targets fail before any solve.
    //
    // Given
    // -----
    // - A 2×2 target with 3 marginals; an asymmetric 2×2 target.
    //
    // Expect
    // ------
    // - `DimensionMismatch`; `AsymmetricTarget { row: 0, col: 1 }`.
    fn malformed_targets_are_rejected() {
        let n = Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap();
        let three: Vec<&dyn Marginal> = vec![&n, &n, &n];
        let two: Vec<&dyn Marginal> = vec![&n, &n];
        let opts = MatchOptions::default();

        assert!(matches!(
            latent_correlation_matrix(&Array2::eye(2), &three, &opts),
            Err(PearsonError::DimensionMismatch { expected: 3, found: (2, 2) })
        ));
        let asym = array![[1.0, 0.3], [0.2, 1.0]];
        assert!(matches!(
            latent_correlation_matrix(&asym, &two, &opts),
            Err(PearsonError::AsymmetricTarget { row: 0, col: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Bounds matrices are ordered and symmetric.
    //
    // Given
    // -----
    // - [N(0,1), Exp(1), Bernoulli(½)].
    //
    // Expect
    // ------
    // - lower ≤ upper elementwise, both symmetric, unit diagonal;
    //   normal × normal absent so every off-diagonal upper bound < 1.
    fn bounds_matrix_is_ordered() {
        // Arrange
        let n = Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap();
        let e = Continuous::new(Exp::new(1.0).unwrap()).unwrap();
        let b = Discrete::new(Bernoulli::new(0.5).unwrap()).unwrap();
        let margins: Vec<&dyn Marginal> = vec![&n, &e, &b];

        // Act
        let (lower, upper) = correlation_bounds_matrix(&margins, &MatchOptions::default()).unwrap();

        // Assert
        for i in 0..3 {
            assert_eq!((lower[[i, i]], upper[[i, i]]), (1.0, 1.0));
            for j in 0..3 {
                assert!(lower[[i, j]] <= upper[[i, j]]);
                assert_eq!(lower[[i, j]], lower[[j, i]]);
                assert_eq!(upper[[i, j]], upper[[j, i]]);
                if i != j {
                    assert!(upper[[i, j]] < 1.0 && lower[[i, j]] > -1.0);
                }
            }
        }
    }
}
