//! simulation::mvdist — NORTA vectors with arbitrary marginals.
//!
//! Purpose
//! -------
//! Sample `n × d` matrices whose columns follow the given marginals and
//! whose dependence comes from a latent multivariate normal with
//! correlation matrix `ρz`:
//!
//! ```text
//! Z ~ N(0, ρz),   X_j = F_j⁻¹(Φ(Z_j)).
//! ```
//!
//! Key behaviors
//! -------------
//! - [`rvec`] samples directly from a latent matrix supplied by the caller.
//! - [`MvDistribution::new`] derives the latent matrix from a target on
//!   the observed scale: Pearson targets go through pairwise matching,
//!   Spearman and Kendall targets through the Gaussian-copula conversion.
//!   The result is repaired with the semismooth Newton engine and factored
//!   once.
//! - Marginal transforms run in parallel across columns.
//!
//! Invariants & assumptions
//! ------------------------
//! - The latent matrix is a correlation matrix (symmetric, unit diagonal,
//!   PSD). `rvec` rejects anything else up to [`CORRELATION_TOL`]; a
//!   semidefinite matrix is factored through its eigen square root.
//! - [`MvDistribution`] keeps the convergence flag and status of the
//!   repair; a latent matrix that is only the best iterate is reported
//!   through [`MvDistribution::converged`].
//! - Rank-correlation conversion is exact for continuous marginals; for
//!   discrete marginals it is the usual approximation.
//!
//! Conventions
//! -----------
//! - Rows are draws, columns are coordinates.
//! - Probabilities are clamped into `[PROB_CLAMP, 1 − PROB_CLAMP]` before
//!   the quantile call, so unbounded marginals never return infinities.
use crate::correlation::convert::{CorrelationType, cor_convert_matrix};
use crate::margins::marginal::Marginal;
use crate::nearest::newton::cor_near_pd;
use crate::nearest::options::NearestPDOptions;
use crate::nearest::validation::validate_symmetric;
use crate::numerical_stability::constants::{CORRELATION_TOL, PROB_CLAMP};
use crate::numerical_stability::linalg::{lower_factor, min_eigenvalue, to_dmatrix};
use crate::numerical_stability::normal::std_normal_cdf;
use crate::pearson::matrix::latent_correlation_matrix;
use crate::pearson::options::MatchOptions;
use crate::simulation::errors::{SimError, SimResult};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

/// SimOptions — configuration of the matching and repair stages.
///
/// Fields
/// ------
/// - `matching`: [`MatchOptions`] for pairwise Pearson matching.
/// - `nearest`: [`NearestPDOptions`] for the repair of the latent matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimOptions {
    pub matching: MatchOptions,
    pub nearest: NearestPDOptions,
}

impl SimOptions {
    pub fn new(matching: MatchOptions, nearest: NearestPDOptions) -> Self {
        SimOptions { matching, nearest }
    }
}

/// normal_to_margin — map standard normal draws to `marginal`.
///
/// Returns `F⁻¹(Φ(z))` for every entry of `z`.
pub fn normal_to_margin(marginal: &dyn Marginal, z: &Array1<f64>) -> Array1<f64> {
    z.mapv(|v| marginal.quantile(std_normal_cdf(v).clamp(PROB_CLAMP, 1.0 - PROB_CLAMP)))
}

/// rvec — draw `n` NORTA vectors from a latent correlation matrix.
///
/// Parameters
/// ----------
/// - `rng`: `&mut R`
/// - `n`: `usize`
///   Number of draws (rows of the result).
/// - `margins`: `&[&dyn Marginal]`
///   One marginal per coordinate.
/// - `rho`: `&Array2<f64>`
///   Latent normal correlation matrix, `d × d` with `d = margins.len()`.
///
/// Returns
/// -------
/// `SimResult<Array2<f64>>`
///   `n × d` draws.
///
/// Errors
/// ------
/// - `EmptyMargins` when `margins` is empty.
/// - `DimensionMismatch` when `rho` is not `d × d`.
/// - `Nearest(..)` when `rho` is not finite and symmetric.
/// - `InvalidCorrelation` when a diagonal entry differs from `1` or
///   `λ_min < −CORRELATION_TOL`.
pub fn rvec<R: Rng + ?Sized>(
    rng: &mut R, n: usize, margins: &[&dyn Marginal], rho: &Array2<f64>,
) -> SimResult<Array2<f64>> {
    check_shape(rho, margins.len())?;
    validate_symmetric(rho)?;
    validate_correlation(rho)?;
    let factor = lower_factor(&to_dmatrix(rho));
    Ok(draw(rng, n, margins, &factor))
}

/// MvDistribution — a multivariate distribution with fixed marginals and a
/// target correlation structure.
///
/// Fields
/// ------
/// - `target`: correlation matrix on the observed scale, of type `cor_type`.
/// - `margins`: one shared marginal per coordinate.
/// - `latent`: repaired latent normal correlation matrix.
/// - `converged`, `status`: outcome of the repair. When `converged` is
///   `false` the latent matrix is the best iterate found; it is still a
///   valid correlation matrix but not the nearest one to the raw matrix.
/// - `factor`: `L` with `L·Lᵀ = latent`, reused by every `sample` call.
///
/// Notes
/// -----
/// - Construction does all the expensive work; [`MvDistribution::sample`]
///   only draws normals and applies quantile functions.
pub struct MvDistribution {
    target: Array2<f64>,
    margins: Vec<Arc<dyn Marginal>>,
    cor_type: CorrelationType,
    latent: Array2<f64>,
    converged: bool,
    status: String,
    factor: DMatrix<f64>,
}

impl MvDistribution {
    /// Build the latent structure for `target` and `margins`.
    ///
    /// Parameters
    /// ----------
    /// - `target`: `&Array2<f64>`
    ///   `d × d` correlation matrix of type `cor_type`; the diagonal is
    ///   ignored.
    /// - `margins`: `Vec<Arc<dyn Marginal>>`
    /// - `cor_type`: `CorrelationType`
    /// - `opts`: `&SimOptions`
    ///
    /// Errors
    /// ------
    /// - `EmptyMargins`, `DimensionMismatch`.
    /// - `Pearson(..)` for infeasible or degenerate pairs (Pearson targets).
    /// - `Correlation(..)` for coefficients outside `[−1, 1]` (rank targets).
    /// - `Nearest(..)` when the latent matrix cannot be repaired.
    pub fn new(
        target: &Array2<f64>, margins: Vec<Arc<dyn Marginal>>, cor_type: CorrelationType,
        opts: &SimOptions,
    ) -> SimResult<Self> {
        check_shape(target, margins.len())?;
        let raw = match cor_type {
            CorrelationType::Pearson => {
                let refs: Vec<&dyn Marginal> = margins.iter().map(|m| m.as_ref()).collect();
                latent_correlation_matrix(target, &refs, &opts.matching)?
            }
            CorrelationType::Spearman | CorrelationType::Kendall => {
                cor_convert_matrix(target, cor_type, CorrelationType::Pearson)?
            }
        };
        let repaired = cor_near_pd(&raw, &opts.nearest)?;
        if repaired.converged {
            debug!(
                dim = margins.len(),
                iterations = repaired.iterations,
                residual = repaired.residual,
                "latent correlation matrix repaired"
            );
        } else {
            warn!(
                dim = margins.len(),
                iterations = repaired.iterations,
                residual = repaired.residual,
                status = repaired.status.as_str(),
                "latent correlation repair stopped early; sampling from best iterate"
            );
        }
        let factor = lower_factor(&to_dmatrix(&repaired.matrix));
        Ok(MvDistribution {
            target: target.clone(),
            margins,
            cor_type,
            latent: repaired.matrix,
            converged: repaired.converged,
            status: repaired.status,
            factor,
        })
    }

    /// Draw `n` vectors as an `n × d` matrix.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Array2<f64> {
        let refs: Vec<&dyn Marginal> = self.margins.iter().map(|m| m.as_ref()).collect();
        draw(rng, n, &refs, &self.factor)
    }

    pub fn dim(&self) -> usize {
        self.margins.len()
    }

    pub fn target(&self) -> &Array2<f64> {
        &self.target
    }

    pub fn cor_type(&self) -> CorrelationType {
        self.cor_type
    }

    pub fn latent(&self) -> &Array2<f64> {
        &self.latent
    }

    /// Whether the repair of the latent matrix converged.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Termination reason reported by the repair.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn margins(&self) -> &[Arc<dyn Marginal>] {
        &self.margins
    }
}

// ---- Helper Methods ----

fn check_shape(m: &Array2<f64>, d: usize) -> SimResult<()> {
    if d == 0 {
        return Err(SimError::EmptyMargins);
    }
    if m.dim() != (d, d) {
        return Err(SimError::DimensionMismatch { expected: d, found: m.dim() });
    }
    Ok(())
}

fn validate_correlation(rho: &Array2<f64>) -> SimResult<()> {
    if let Some(&value) = rho.diag().iter().find(|v| (**v - 1.0).abs() > CORRELATION_TOL) {
        return Err(SimError::InvalidCorrelation { value, reason: "diagonal entries must equal 1" });
    }
    match min_eigenvalue(rho) {
        Some(lmin) if lmin < -CORRELATION_TOL => Err(SimError::InvalidCorrelation {
            value: lmin,
            reason: "matrix must be positive semidefinite",
        }),
        _ => Ok(()),
    }
}

fn draw<R: Rng + ?Sized>(
    rng: &mut R, n: usize, margins: &[&dyn Marginal], factor: &DMatrix<f64>,
) -> Array2<f64> {
    let d = margins.len();
    let z = DMatrix::<f64>::from_fn(n, d, |_, _| StandardNormal.sample(rng));
    let correlated = z * factor.transpose();
    let columns: Vec<Array1<f64>> = margins
        .par_iter()
        .enumerate()
        .map(|(j, marginal)| {
            let zj = Array1::from_iter(correlated.column(j).iter().copied());
            normal_to_margin(*marginal, &zj)
        })
        .collect();
    Array2::from_shape_fn((n, d), |(i, j)| columns[j][i])
}
