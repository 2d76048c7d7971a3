//! hermite::quadrature — Gauss–Hermite nodes and weights (Golub–Welsch).
//!
//! Purpose
//! -------
//! Build the `m`-point Gauss–Hermite rule for the Physicists' weight
//! `e^{−x²}`: `∫ f(x) e^{−x²} dx ≈ Σ_s w_s f(t_s)`, exact for polynomials of
//! degree ≤ 2m − 1.
//!
//! Key behaviors
//! -------------
//! - Nodes are the eigenvalues of the symmetric Jacobi matrix with zero
//!   diagonal and off-diagonal `√(i/2)`, `i = 1..m−1`.
//! - Weights are `√π·v_{0,s}²`, where `v_{0,s}` is the first component of
//!   the normalized eigenvector for node `t_s`.
//! - Nodes are returned in ascending order.
//!
//! Conventions
//! -----------
//! - Expectations under `N(0, 1)` are `E[g(Z)] ≈ π^{−1/2} Σ_s w_s g(√2·t_s)`;
//!   the rescaling is applied by the callers in `coefficients`.
use crate::hermite::errors::{HermiteError, HermiteResult};
use crate::numerical_stability::normal::sqrt_pi;
use nalgebra::{DMatrix, SymmetricEigen};

/// Default number of Gauss–Hermite nodes used by the matcher.
pub const DEFAULT_QUADRATURE_NODES: usize = 100;

/// GaussHermiteRule — nodes and weights for `∫ f(x) e^{−x²} dx`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussHermiteRule {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussHermiteRule {
    /// new — Golub–Welsch construction of an `m`-point rule.
    ///
    /// Parameters
    /// ----------
    /// - `m`: `usize`
    ///   Number of nodes, at least 1.
    ///
    /// Returns
    /// -------
    /// `HermiteResult<GaussHermiteRule>`
    ///   Rule with ascending nodes; weights sum to `√π`.
    ///
    /// Errors
    /// ------
    /// - `HermiteError::InvalidNodeCount` when `m == 0`.
    pub fn new(m: usize) -> HermiteResult<Self> {
        if m == 0 {
            return Err(HermiteError::InvalidNodeCount {
                nodes: m,
                reason: "at least one node is required",
            });
        }
        Ok(golub_welsch(m))
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `E[g(Z)]` for `Z ~ N(0, 1)`, via `π^{−1/2} Σ w_s g(√2 t_s)`.
    pub fn expect_normal<F: Fn(f64) -> f64>(&self, g: F) -> f64 {
        let total: f64 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&t, &w)| w * g(std::f64::consts::SQRT_2 * t))
            .sum();
        total / sqrt_pi()
    }
}

impl Default for GaussHermiteRule {
    fn default() -> Self {
        golub_welsch(DEFAULT_QUADRATURE_NODES)
    }
}

// ---- Helper methods ----

/// Eigen-decompose the `m × m` Jacobi matrix (`m ≥ 1`).
fn golub_welsch(m: usize) -> GaussHermiteRule {
    let mut jacobi = DMatrix::<f64>::zeros(m, m);
    for i in 1..m {
        let b = (i as f64 / 2.0).sqrt();
        jacobi[(i - 1, i)] = b;
        jacobi[(i, i - 1)] = b;
    }
    let eig = SymmetricEigen::new(jacobi);
    let mu0 = sqrt_pi();
    let mut pairs: Vec<(f64, f64)> = (0..m)
        .map(|s| {
            let v0 = eig.eigenvectors[(0, s)];
            (eig.eigenvalues[s], mu0 * v0 * v0)
        })
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    GaussHermiteRule {
        nodes: pairs.iter().map(|p| p.0).collect(),
        weights: pairs.iter().map(|p| p.1).collect(),
    }
}
