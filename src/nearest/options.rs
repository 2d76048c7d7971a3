//! nearest::options — validated settings for the Newton engine and the
//! alternating-projection fallback.
//!
//! Conventions
//! -----------
//! - `NearestPDOptions::default()`: `tau = 1e-5`, `outer_iters = 200`,
//!   `inner_iters = 20`, `cg_iters = 200`, `outer_tol = 1e-6`,
//!   `cg_tol = 1e-2`, `newton_tol = 1e-4`, `perturbation = 1e-9`.
//! - `NearPSDOptions::default()`: `n_iter = 100`, `tol = 1e-10`.
use crate::nearest::errors::{NearestError, NearestResult};
use crate::numerical_stability::constants::PERTURBATION;

/// NearestPDOptions — settings of the semismooth Newton engine.
///
/// Fields
/// ------
/// - `tau`: eigenvalue floor of the result, in `[0, 1)`.
/// - `outer_iters`: cap on Newton iterations.
/// - `inner_iters`: cap on Armijo halvings per Newton step.
/// - `cg_iters`: cap on preconditioned CG iterations per Newton step.
/// - `outer_tol`: stop when the diagonal residual or the relative duality
///   gap falls below this.
/// - `cg_tol`: relative residual target of the CG solve.
/// - `newton_tol`: Armijo sufficient-decrease constant.
/// - `perturbation`: ridge added to the generalized Jacobian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPDOptions {
    pub tau: f64,
    pub outer_iters: usize,
    pub inner_iters: usize,
    pub cg_iters: usize,
    pub outer_tol: f64,
    pub cg_tol: f64,
    pub newton_tol: f64,
    pub perturbation: f64,
}

impl NearestPDOptions {
    /// Create validated engine options.
    ///
    /// # Errors
    /// - `InvalidTau` unless `0 ≤ tau < 1`.
    /// - `InvalidIterations` for a zero `outer_iters` or `cg_iters`.
    /// - `InvalidTolerance` for non-finite or non-positive tolerances, or a
    ///   negative perturbation.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tau: f64, outer_iters: usize, inner_iters: usize, cg_iters: usize, outer_tol: f64,
        cg_tol: f64, newton_tol: f64, perturbation: f64,
    ) -> NearestResult<Self> {
        let opts = Self {
            tau,
            outer_iters,
            inner_iters,
            cg_iters,
            outer_tol,
            cg_tol,
            newton_tol,
            perturbation,
        };
        opts.validate()?;
        Ok(opts)
    }

    /// Check the invariants enforced by [`NearestPDOptions::new`];
    /// [`cor_near_pd`](crate::nearest::cor_near_pd) runs this on entry.
    pub fn validate(&self) -> NearestResult<()> {
        let NearestPDOptions {
            tau, outer_iters, cg_iters, outer_tol, cg_tol, newton_tol, perturbation, ..
        } = *self;
        if !tau.is_finite() || !(0.0..1.0).contains(&tau) {
            return Err(NearestError::InvalidTau { value: tau, reason: "must lie in [0, 1)" });
        }
        validate_iterations("outer_iters", outer_iters)?;
        validate_iterations("cg_iters", cg_iters)?;
        validate_tolerance("outer_tol", outer_tol)?;
        validate_tolerance("cg_tol", cg_tol)?;
        validate_tolerance("newton_tol", newton_tol)?;
        if !perturbation.is_finite() || perturbation < 0.0 {
            return Err(NearestError::InvalidTolerance {
                name: "perturbation",
                value: perturbation,
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Default options with eigenvalue floor `tau`.
    pub fn with_tau(tau: f64) -> NearestResult<Self> {
        let d = Self::default();
        Self::new(
            tau,
            d.outer_iters,
            d.inner_iters,
            d.cg_iters,
            d.outer_tol,
            d.cg_tol,
            d.newton_tol,
            d.perturbation,
        )
    }
}

impl Default for NearestPDOptions {
    fn default() -> Self {
        Self {
            tau: 1e-5,
            outer_iters: 200,
            inner_iters: 20,
            cg_iters: 200,
            outer_tol: 1e-6,
            cg_tol: 1e-2,
            newton_tol: 1e-4,
            perturbation: PERTURBATION,
        }
    }
}

/// NearPSDOptions — settings of the alternating-projection repair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearPSDOptions {
    pub n_iter: usize,
    pub tol: f64,
}

impl NearPSDOptions {
    pub fn new(n_iter: usize, tol: f64) -> NearestResult<Self> {
        let opts = Self { n_iter, tol };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> NearestResult<()> {
        validate_iterations("n_iter", self.n_iter)?;
        validate_tolerance("tol", self.tol)
    }
}

impl Default for NearPSDOptions {
    fn default() -> Self {
        Self { n_iter: 100, tol: 1e-10 }
    }
}

fn validate_iterations(name: &'static str, value: usize) -> NearestResult<()> {
    if value == 0 {
        return Err(NearestError::InvalidIterations { name, value, reason: "must be at least 1" });
    }
    Ok(())
}

fn validate_tolerance(name: &'static str, value: f64) -> NearestResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(NearestError::InvalidTolerance {
            name,
            value,
            reason: "must be finite and strictly positive",
        });
    }
    Ok(())
}
