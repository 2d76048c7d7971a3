//! hermite — Hermite polynomials, Gauss–Hermite quadrature, expansion coefficients.
//!
//! Purpose
//! -------
//! Provide the expansion layer underneath Pearson matching: evaluate Hermite
//! polynomials in either convention, build Gauss–Hermite rules, and expand a
//! marginal's normal-scale quantile function `F⁻¹(Φ(z))` in the
//! Probabilists' Hermite basis.
//!
//! Key behaviors
//! -------------
//! - [`hermite`] / [`hermite_prob`] / [`hermite_phys`]: three-term recurrences.
//! - [`probabilists_from_physicists`] / [`physicists_from_probabilists`]:
//!   exact scaling identities between the conventions.
//! - [`h_phi`]: `He_n(x)·φ(x)` with an exact zero at ±∞.
//! - [`GaussHermiteRule`]: Golub–Welsch nodes and weights.
//! - [`get_coefs`]: `a_k = E[He_k(Z)·F⁻¹(Φ(Z))]/k!`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Gauss–Hermite rules use the Physicists' weight `e^{−x²}`; every
//!   consumer that needs Probabilists' expectations rescales nodes by `√2`
//!   and sums by `π^{−1/2}`.
//! - Coefficient vectors have length `degree + 1` and are deterministic for
//!   a given marginal, degree and rule.
//!
//! Testing notes
//! -------------
//! - Unit tests check closed forms and the normal / uniform cross-checks.
//! - Property tests in `tests/prop_correlation.rs` cover the recurrence and
//!   convention round trips for random `x` and `n ≤ 20`.

pub mod coefficients;
pub mod errors;
pub mod polynomial;
pub mod quadrature;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::coefficients::{HermiteCoefficients, factorial, get_coefs};
pub use self::errors::{HermiteError, HermiteResult};
pub use self::polynomial::{
    HermiteKind, h_phi, hermite, hermite_phys, hermite_prob, hermite_prob_all,
    physicists_from_probabilists, probabilists_from_physicists,
};
pub use self::quadrature::{DEFAULT_QUADRATURE_NODES, GaussHermiteRule};
