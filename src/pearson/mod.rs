//! pearson — matching target Pearson correlations through a Gaussian copula.
//!
//! Purpose
//! -------
//! Given marginals `F_A`, `F_B` and a target Pearson correlation `ρx` of
//! `X = F_A⁻¹(Φ(Z₁))`, `Y = F_B⁻¹(Φ(Z₂))`, find the latent correlation `ρz`
//! of `(Z₁, Z₂)` that reproduces it. The relation `ρx = G(ρz)` is a
//! truncated power series whose coefficients come from Hermite expansions
//! (continuous marginals) or latent breakpoints (discrete marginals).
//!
//! Key behaviors
//! -------------
//! - [`PreparedMargin`] caches each marginal's expansion once; the
//!   [`PairKind`] of a pair picks the coefficient formula.
//! - [`latent_correlation`] inverts `G` on `[−1, 1]` by a grid scan plus
//!   Brent refinement ([`solve_poly_pm_one`]), rejecting non-monotone cases.
//! - [`correlation_bounds`] reports `[G(−1), G(1)]`.
//! - [`latent_correlation_matrix`] / [`correlation_bounds_matrix`] map all
//!   pairs of a target matrix in parallel and report failures per pair.
//!
//! Invariants & assumptions
//! ------------------------
//! - Out-of-range targets are errors unless [`BoundsPolicy::Clamp`] is set.
//! - Non-convergence of Brent within `max_iters` is not an error; the best
//!   bracketed iterate is used.
//!
//! Conventions
//! -----------
//! - Hermite quantities follow the probabilists' convention; see `hermite`.
//! - `degree` is the highest power of `ρz` kept in `G`.
//!
//! Testing notes
//! -------------
//! - Closed forms pin the coefficient formulas: identity for normal pairs,
//!   `(2/π)·asin` for Bernoulli(½) pairs, `2φ(0)·ρ` for normal × Bernoulli(½).
pub mod errors;
pub mod matching;
pub mod matrix;
pub mod options;
pub mod prepared;
pub mod series;
pub mod solve;

pub use self::errors::{InfeasibleReason, PairFailure, PearsonError, PearsonResult};
pub use self::matching::{
    CorrelationBounds, correlation_bounds, correlation_bounds_prepared, latent_correlation,
    latent_correlation_prepared,
};
pub use self::matrix::{
    correlation_bounds_matrix, latent_correlation_matrix, latent_correlation_matrix_prepared,
    prepare_margins,
};
pub use self::options::{BoundsPolicy, DEFAULT_DEGREE, MatchOptions};
pub use self::prepared::{MarginExpansion, PairKind, PreparedMargin};
pub use self::series::{PairPolynomial, discrete_moment, eval_poly, gn0d, gn0m};
pub use self::solve::solve_poly_pm_one;
