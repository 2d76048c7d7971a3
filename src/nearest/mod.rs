//! nearest — repairing symmetric matrices into valid correlation matrices.
//!
//! Purpose
//! -------
//! Map an arbitrary symmetric matrix (typically the latent matrix produced
//! by pairwise Pearson matching) to the nearest correlation matrix in
//! Frobenius norm, and generate random valid correlation matrices.
//!
//! Key behaviors
//! -------------
//! - [`cor_near_pd`] / [`nearest_correlation`]: semismooth Newton on the
//!   dual with preconditioned CG and Armijo backtracking. Unit diagonal,
//!   `λ_min ≥ τ`. The building blocks (`npd_*`) are public for testing and
//!   reuse.
//! - [`cor_near_psd`]: alternating projections with Dykstra's correction,
//!   semidefinite result.
//! - [`cor_rand_pd`], [`cor_rand_psd`], [`set_diag`]: generators and
//!   helpers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated up front (square, non-empty, finite, symmetric).
//! - Every function returns a new matrix; caller-owned inputs are never
//!   modified.
//! - All working state of one call lives in that call ([`NewtonState`]), so
//!   concurrent calls on different matrices are independent.
//!
//! Downstream usage
//! ----------------
//! - `simulation::MvDistribution::new` repairs the latent matrix with
//!   [`cor_near_pd`] before factoring it for sampling.
pub mod errors;
pub mod near_psd;
pub mod newton;
pub mod options;
pub mod random;
pub mod validation;
pub mod workspace;

pub use self::errors::{NearestError, NearestResult};
pub use self::near_psd::cor_near_psd;
pub use self::newton::{
    CgOutcome, NearestOutcome, cor_near_pd, nearest_correlation, npd_gradient, npd_jacobian,
    npd_pca, npd_pre_cg, npd_precond_matrix, npd_set_omega,
};
pub use self::options::{NearPSDOptions, NearestPDOptions};
pub use self::random::{cor_rand_pd, cor_rand_psd, set_diag};
pub use self::validation::validate_symmetric;
pub use self::workspace::{DualPoint, NewtonState};
pub use crate::numerical_stability::linalg::{is_positive_semidefinite, min_eigenvalue};
