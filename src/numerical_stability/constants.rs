//! Numerical constants shared across the crate.
//!
//! Provides the small set of cutoffs and floors used to keep `f64`
//! arithmetic away from degenerate regimes: probabilities that would map
//! to ±∞ on the normal scale, eigenvalues that are zero up to rounding,
//! and divisors that would otherwise vanish.
//!
//! # Provided items
//! - [`PROB_CLAMP`]: distance kept from 0 and 1 before a quantile call.
//! - [`EIGEN_EPS`]: eigenvalues at or below this magnitude count as zero.
//! - [`GENERAL_TOL`]: general comparison tolerance for "numerically zero".
//! - [`PERTURBATION`]: ridge added to the generalized Jacobian.
//! - [`PRECOND_FLOOR`]: lower bound for diagonal preconditioner entries.
//! - [`DISCRETE_TAIL_MASS`]: tail probability dropped when enumerating
//!   unbounded discrete supports.

/// Probability clamp for `F⁻¹(Φ(z))` evaluations.
///
/// Gauss–Hermite nodes at high order reach |z| > 13, where `Φ(z)` rounds to
/// exactly 0 or 1 and most quantile functions return ±∞. Probabilities are
/// clamped into `[PROB_CLAMP, 1 - PROB_CLAMP]` first.
pub const PROB_CLAMP: f64 = 1e-15;

/// Eigenvalue threshold below which a value is treated as numerically zero.
pub const EIGEN_EPS: f64 = 1e-12;

/// Tolerance for "numerically zero" polynomial coefficients and residuals.
pub const GENERAL_TOL: f64 = 1e-12;

/// Ridge added to the generalized Jacobian `V(y)` in the Newton engine.
pub const PERTURBATION: f64 = 1e-9;

/// Floor applied to the diagonal preconditioner of the inner CG solve.
pub const PRECOND_FLOOR: f64 = 1e-8;

/// Tail mass dropped when a discrete marginal has unbounded support.
///
/// Support points are enumerated up to `F⁻¹(1 - DISCRETE_TAIL_MASS)`.
pub const DISCRETE_TAIL_MASS: f64 = 1e-5;

/// Hard cap on the number of enumerated discrete support points.
pub const MAX_SUPPORT_POINTS: usize = 100_000;

/// Tolerance on a caller-supplied latent correlation matrix: diagonal
/// entries within this of `1` and `λ_min ≥ -CORRELATION_TOL`.
pub const CORRELATION_TOL: f64 = 1e-8;
