//! numerical_stability — constants, standard-normal helpers, dense linalg glue.
//!
//! Purpose
//! -------
//! Collect the low-level numeric building blocks shared by the Hermite,
//! matching, nearest-correlation and simulation layers, so that each of
//! those modules works with one set of cutoffs and one deterministic
//! eigendecomposition.
//!
//! Key behaviors
//! -------------
//! - [`constants`]: clamps, floors and tolerances.
//! - [`normal`]: φ, Φ and Φ⁻¹ on top of `statrs` special functions.
//! - [`linalg`]: `ndarray` ⇄ `nalgebra` bridge, sorted symmetric eigen,
//!   PSD projection and factorization helpers.
//!
//! Conventions
//! -----------
//! - Everything here is a pure function or a plain constant; no I/O and no
//!   logging.

pub mod constants;
pub mod linalg;
pub mod normal;

pub use self::linalg::{is_positive_semidefinite, min_eigenvalue};
pub use self::normal::{std_normal_cdf, std_normal_pdf, std_normal_quantile};
