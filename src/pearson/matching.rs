//! pearson::matching — latent correlation for one marginal pair.
//!
//! Purpose
//! -------
//! Invert `ρx = G(ρz)` for a pair of marginals: given a target Pearson
//! correlation of the marginal variables, return the correlation of the
//! latent normals that reproduces it under the NORTA transform.
//!
//! Key behaviors
//! -------------
//! - Bounds are `G(−1)` and `G(1)` clamped to `[−1, 1]` and ordered.
//! - Targets outside the bounds follow [`BoundsPolicy`]: `Error` reports
//!   `InfeasibleTarget`, `Clamp` moves the target onto the nearest bound
//!   and emits a `tracing` warning.
//! - A target of exactly zero maps to zero without solving.
//! - Zero roots or more than one root on `[−1, 1]` are reported as
//!   infeasibility; the polynomial is never assumed monotone.
//!
//! Downstream usage
//! ----------------
//! - `latent_correlation` / `correlation_bounds` take raw marginals and
//!   build their own quadrature rule; the `_prepared` variants reuse caches
//!   and are what the matrix map calls from its workers.
use crate::hermite::GaussHermiteRule;
use crate::margins::Marginal;
use crate::numerical_stability::constants::GENERAL_TOL;
use crate::pearson::errors::{InfeasibleReason, PearsonError, PearsonResult};
use crate::pearson::options::{BoundsPolicy, MatchOptions};
use crate::pearson::prepared::PreparedMargin;
use crate::pearson::series::PairPolynomial;
use crate::pearson::solve::solve_poly_pm_one;
use tracing::warn;

/// Attainable Pearson correlations for a marginal pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationBounds {
    pub lower: f64,
    pub upper: f64,
}

impl CorrelationBounds {
    pub fn contains(&self, rho: f64) -> bool {
        rho >= self.lower && rho <= self.upper
    }

    pub fn clamp(&self, rho: f64) -> f64 {
        rho.clamp(self.lower, self.upper)
    }
}

/// Attainable correlation bounds of `(a, b)` under a Gaussian copula.
///
/// Parameters
/// ----------
/// - `a`, `b`: `&dyn Marginal`
/// - `opts`: `&MatchOptions`
///   Degree and quadrature order of the expansion.
///
/// Returns
/// -------
/// `PearsonResult<CorrelationBounds>`
///   `lower ≤ upper`, both inside `[−1, 1]`.
///
/// Errors
/// ------
/// - Expansion or support errors of either marginal.
/// - `NumericDegeneracy` if the polynomial is non-finite.
pub fn correlation_bounds(
    a: &dyn Marginal, b: &dyn Marginal, opts: &MatchOptions,
) -> PearsonResult<CorrelationBounds> {
    opts.validate()?;
    let rule = GaussHermiteRule::new(opts.quadrature_nodes)?;
    let pa = PreparedMargin::new(a, opts.degree, &rule)?;
    let pb = PreparedMargin::new(b, opts.degree, &rule)?;
    correlation_bounds_prepared(&pa, &pb, opts.degree)
}

/// [`correlation_bounds`] on prepared marginals.
pub fn correlation_bounds_prepared(
    a: &PreparedMargin, b: &PreparedMargin, degree: usize,
) -> PearsonResult<CorrelationBounds> {
    let poly = PairPolynomial::new(a, b, degree);
    check_finite(&poly)?;
    Ok(bounds_of(&poly))
}

/// latent_correlation — latent normal correlation reproducing `target`.
///
/// Parameters
/// ----------
/// - `target`: `f64`
///   Desired Pearson correlation of the marginal variables, in `[−1, 1]`.
/// - `a`, `b`: `&dyn Marginal`
///   The two marginals.
/// - `opts`: `&MatchOptions`
///   Degree, quadrature order, bounds policy and root-solver settings.
///
/// Returns
/// -------
/// `PearsonResult<f64>`
///   `ρz ∈ [−1, 1]` with `G(ρz) ≈ target`.
///
/// Errors
/// ------
/// - `InvalidTarget` for non-finite targets or targets outside `[−1, 1]`.
/// - `InfeasibleTarget` for unattainable targets (policy `Error`), when no
///   root exists, or when more than one root exists.
/// - `NumericDegeneracy` when every non-constant coefficient vanishes.
///
/// Examples
/// --------
/// ```rust
/// use rust_mvsim::margins::Continuous;
/// use rust_mvsim::pearson::{MatchOptions, latent_correlation};
/// use statrs::distribution::Normal;
///
/// let n = Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap();
/// let rho = latent_correlation(0.5, &n, &n, &MatchOptions::default()).unwrap();
/// assert!((rho - 0.5).abs() < 1e-8);
/// ```
pub fn latent_correlation(
    target: f64, a: &dyn Marginal, b: &dyn Marginal, opts: &MatchOptions,
) -> PearsonResult<f64> {
    validate_target(target)?;
    opts.validate()?;
    let rule = GaussHermiteRule::new(opts.quadrature_nodes)?;
    let pa = PreparedMargin::new(a, opts.degree, &rule)?;
    let pb = PreparedMargin::new(b, opts.degree, &rule)?;
    latent_correlation_prepared(target, &pa, &pb, opts)
}

/// [`latent_correlation`] on prepared marginals.
pub fn latent_correlation_prepared(
    target: f64, a: &PreparedMargin, b: &PreparedMargin, opts: &MatchOptions,
) -> PearsonResult<f64> {
    validate_target(target)?;
    opts.validate()?;
    let poly = PairPolynomial::new(a, b, opts.degree);
    check_finite(&poly)?;
    if target == 0.0 {
        return Ok(0.0);
    }
    if poly.coefficients().iter().skip(1).all(|c| c.abs() <= GENERAL_TOL) {
        return Err(PearsonError::NumericDegeneracy {
            reason: "all non-constant coefficients vanish",
        });
    }

    let bounds = bounds_of(&poly);
    let goal = if bounds.contains(target) {
        target
    } else {
        match opts.bounds_policy {
            BoundsPolicy::Error => {
                return Err(PearsonError::InfeasibleTarget {
                    target,
                    lower: bounds.lower,
                    upper: bounds.upper,
                    reason: InfeasibleReason::OutOfBounds,
                });
            }
            BoundsPolicy::Clamp => {
                let clamped = bounds.clamp(target);
                warn!(
                    target,
                    clamped,
                    lower = bounds.lower,
                    upper = bounds.upper,
                    "target correlation outside attainable bounds; clamping"
                );
                clamped
            }
        }
    };

    let mut shifted = poly.coefficients().to_vec();
    shifted[0] -= goal;
    let roots = solve_poly_pm_one(&shifted, opts.root_tol, opts.max_iters)?;
    let infeasible = |reason| PearsonError::InfeasibleTarget {
        target,
        lower: bounds.lower,
        upper: bounds.upper,
        reason,
    };
    match roots.as_slice() {
        [] => Err(infeasible(InfeasibleReason::NoRootInRange)),
        [root] => Ok(root.clamp(-1.0, 1.0)),
        _ => Err(infeasible(InfeasibleReason::NonMonotone)),
    }
}

fn validate_target(target: f64) -> PearsonResult<()> {
    if !target.is_finite() {
        return Err(PearsonError::InvalidTarget { value: target, reason: "must be finite" });
    }
    if !(-1.0..=1.0).contains(&target) {
        return Err(PearsonError::InvalidTarget {
            value: target,
            reason: "a correlation must lie in [-1, 1]",
        });
    }
    Ok(())
}

fn check_finite(poly: &PairPolynomial) -> PearsonResult<()> {
    if poly.coefficients().iter().any(|c| !c.is_finite()) {
        return Err(PearsonError::NumericDegeneracy { reason: "non-finite coefficient" });
    }
    Ok(())
}

fn bounds_of(poly: &PairPolynomial) -> CorrelationBounds {
    let at_minus = poly.eval(-1.0).clamp(-1.0, 1.0);
    let at_plus = poly.eval(1.0).clamp(-1.0, 1.0);
    CorrelationBounds { lower: at_minus.min(at_plus), upper: at_minus.max(at_plus) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::margins::{Continuous, Discrete};
    use crate::numerical_stability::normal::{std_normal_cdf, std_normal_pdf};
    use statrs::distribution::{Bernoulli, Exp, Normal};
    use std::f64::consts::PI;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Identity behavior for normal marginals.
    // - Closed-form inverses for Bernoulli(½) pairs and normal × Bernoulli(½).
    // - Bounds of normal × exponential against direct numerical integration.
    // - Out-of-bounds handling under both policies.
    // - Input validation of the target.
    //
    // They intentionally DO NOT cover:
    // - Matrix-level aggregation (see `matrix`).
    // -------------------------------------------------------------------------

    fn std_normal() -> Continuous<Normal> {
        Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap()
    }

    fn fair_coin() -> Discrete<Bernoulli> {
        Discrete::new(Bernoulli::new(0.5).unwrap()).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // For normal marginals the transform is the identity.
    //
    // Given
    // -----
    // - N(0, 1) × N(0, 1) and N(2, 3) × N(0, 1); targets −0.7, 0.5.
    //
    // Expect
    // ------
    // - ρz ≈ target.
    fn normal_pair_is_identity() {
        // Arrange
        let n = std_normal();
        let m = Continuous::new(Normal::new(2.0, 3.0).unwrap()).unwrap();
        let opts = MatchOptions::default();

        for target in [-0.7, 0.5] {
            // Act
            let a = latent_correlation(target, &n, &n, &opts).unwrap();
            let b = latent_correlation(target, &m, &n, &opts).unwrap();

            // Assert
            assert!((a - target).abs() < 1e-8, "got {a}");
            assert!((b - target).abs() < 1e-8, "got {b}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Bernoulli(½) pairs follow ρx = (2/π)·asin(ρz); invert it.
    //
    // Given
    // -----
    // - target = (2/π)·asin(0.4).
    //
    // Expect
    // ------
    // - ρz ≈ 0.4 (degree-7 truncation error is far below 1e-4 here).
    fn bernoulli_pair_inverts_arcsine_law() {
        // Arrange
        let b = fair_coin();
        let target = 2.0 / PI * 0.4_f64.asin();

        // Act
        let rho = latent_correlation(target, &b, &b, &MatchOptions::default()).unwrap();

        // Assert
        assert!((rho - 0.4).abs() < 1e-4, "got {rho}");
    }

    #[test]
    // Purpose
    // -------
    // Mixed normal × Bernoulli(½) is linear with slope 2φ(0).
    //
    // Given
    // -----
    // - target 0.4 in both argument orders.
    //
    // Expect
    // ------
    // - ρz = 0.4 / (2φ(0)).
    fn normal_bernoulli_pair_is_linear() {
        // Arrange
        let n = std_normal();
        let b = fair_coin();
        let opts = MatchOptions::default();
        let expected = 0.4 / (2.0 * std_normal_pdf(0.0));

        // Act
        let nb = latent_correlation(0.4, &n, &b, &opts).unwrap();
        let bn = latent_correlation(0.4, &b, &n, &opts).unwrap();

        // Assert
        assert!((nb - expected).abs() < 1e-8, "got {nb}");
        assert!((bn - expected).abs() < 1e-8, "got {bn}");
    }

    #[test]
    // Purpose
    // -------
    // Bounds of N(0, 1) × Exp(1) equal ±E[Z·F⁻¹(Φ(Z))], the comonotone
    // correlation; check against a fine trapezoid integral.
    //
    // Given
    // -----
    // - Exp(1) has unit standard deviation, so the bound is the integral.
    //
    // Expect
    // ------
    // - lower ≈ −upper ≈ −integral within 1e-6.
    fn normal_exponential_bounds_match_integral() {
        // Arrange
        let n = std_normal();
        let e = Continuous::new(Exp::new(1.0).unwrap()).unwrap();
        let h = 1e-3;
        let integral: f64 = (-8000..=8000)
            .map(|i| {
                let z = i as f64 * h;
                let x = -std_normal_cdf(-z).ln();
                z * x * std_normal_pdf(z) * h
            })
            .sum();

        // Act
        let bounds = correlation_bounds(&n, &e, &MatchOptions::default()).unwrap();

        // Assert
        assert!((bounds.upper - integral).abs() < 1e-6, "{} vs {integral}", bounds.upper);
        assert!((bounds.lower + integral).abs() < 1e-6, "{} vs {integral}", bounds.lower);
        assert!(bounds.lower < bounds.upper);
    }

    #[test]
    // Purpose
    // -------
    // Unattainable targets error under `Error` and clamp under `Clamp`.
    //
    // Given
    // -----
    // - Bernoulli(½) pair (upper bound ≈ 0.82 at degree 7); target 0.95.
    //
    // Expect
    // ------
    // - `InfeasibleTarget { reason: OutOfBounds }` with target 0.95;
    //   with `Clamp`, ρz ≈ 1.
    fn out_of_bounds_follows_policy() {
        // Arrange
        let b = fair_coin();
        let strict = MatchOptions::default();
        let relaxed = MatchOptions { bounds_policy: BoundsPolicy::Clamp, ..strict };

        // Act
        let err = latent_correlation(0.95, &b, &b, &strict).unwrap_err();
        let clamped = latent_correlation(0.95, &b, &b, &relaxed).unwrap();

        // Assert
        match err {
            PearsonError::InfeasibleTarget { target, upper, reason, .. } => {
                assert_eq!(target, 0.95);
                assert!(upper < 0.95);
                assert_eq!(reason, InfeasibleReason::OutOfBounds);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!((clamped - 1.0).abs() < 1e-6, "got {clamped}");
    }

    #[test]
    // Purpose
    // -------
    // Zero target short-circuits; invalid targets are rejected.
    //
    // Given
    // -----
    // - targets 0.0, 1.5 and NaN.
    //
    // Expect
    // ------
    // - 0.0, `InvalidTarget`, `InvalidTarget`.
    fn zero_and_invalid_targets() {
        let n = std_normal();
        let opts = MatchOptions::default();
        assert_eq!(latent_correlation(0.0, &n, &n, &opts).unwrap(), 0.0);
        assert!(matches!(
            latent_correlation(1.5, &n, &n, &opts),
            Err(PearsonError::InvalidTarget { .. })
        ));
        assert!(matches!(
            latent_correlation(f64::NAN, &n, &n, &opts),
            Err(PearsonError::InvalidTarget { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Options assembled by struct update skip `MatchOptions::new`; every
    // entry point still rejects them.
    //
    // Given
    // -----
    // - `root_tol = −1` and `degree = 0` spliced into the defaults.
    //
    // Expect
    // ------
    // - `InvalidTolerance` from `latent_correlation`, `InvalidDegree` from
    //   `correlation_bounds`.
    fn struct_literal_options_are_revalidated() {
        // Arrange
        let n = std_normal();
        let bad_tol = MatchOptions { root_tol: -1.0, ..MatchOptions::default() };
        let bad_degree = MatchOptions { degree: 0, ..MatchOptions::default() };

        // Act
        let tol_err = latent_correlation(0.4, &n, &n, &bad_tol);
        let degree_err = correlation_bounds(&n, &n, &bad_degree);

        // Assert
        assert!(matches!(tol_err, Err(PearsonError::InvalidTolerance { .. })));
        assert!(matches!(degree_err, Err(PearsonError::InvalidDegree { degree: 0, .. })));
    }
}
