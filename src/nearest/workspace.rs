//! nearest::workspace — per-call working state of the Newton engine.
//!
//! Purpose
//! -------
//! Hold everything one call of `cor_near_pd` needs across outer
//! iterations: the shifted target `G = sym(R) − τI`, the right-hand side
//! `b₀ = (1 − τ)·1`, and the current dual point with its eigendecomposition
//! and gradient.
//!
//! Invariants & assumptions
//! ------------------------
//! - A [`NewtonState`] is created inside the call and dropped on return;
//!   nothing is shared between calls, so concurrent repairs of different
//!   matrices are independent.
//! - [`DualPoint`] values are only produced by [`NewtonState::point_at`],
//!   so `eig`, `f` and `fy` always describe `G + Diag(y)` at that `y`.
use crate::nearest::newton::npd_gradient;
use crate::numerical_stability::linalg::{SortedEigen, sorted_sym_eigen, symmetrize};
use nalgebra::{DMatrix, DVector};

/// A dual iterate `y` together with the quantities derived from it.
#[derive(Debug, Clone)]
pub struct DualPoint {
    pub y: DVector<f64>,
    /// `G + Diag(y)`.
    pub x: DMatrix<f64>,
    pub eig: SortedEigen,
    /// Dual objective `½‖(G + Diag y)₊‖² − b₀ᵀy`.
    pub f: f64,
    /// `diag((G + Diag y)₊)`.
    pub fy: DVector<f64>,
}

/// NewtonState — fixed problem data of one repair call.
#[derive(Debug, Clone)]
pub struct NewtonState {
    pub g: DMatrix<f64>,
    pub b0: DVector<f64>,
}

impl NewtonState {
    pub fn new(r: &DMatrix<f64>, tau: f64) -> Self {
        let n = r.nrows();
        let mut g = symmetrize(r);
        for i in 0..n {
            g[(i, i)] -= tau;
        }
        Self { g, b0: DVector::from_element(n, 1.0 - tau) }
    }

    pub fn dim(&self) -> usize {
        self.g.nrows()
    }

    /// `½‖G‖²_F`, the constant relating dual and primal objectives.
    pub fn half_norm_g(&self) -> f64 {
        0.5 * self.g.norm_squared()
    }

    /// Evaluate the dual at `y`.
    pub fn point_at(&self, y: DVector<f64>) -> DualPoint {
        let mut x = self.g.clone();
        for i in 0..self.dim() {
            x[(i, i)] += y[i];
        }
        let eig = sorted_sym_eigen(&x);
        let (f, fy) = npd_gradient(&y, &eig, &self.b0);
        DualPoint { y, x, eig, f, fy }
    }

    /// `‖b₀ − F(y)‖₂`, the violation of the diagonal constraint.
    pub fn residual(&self, point: &DualPoint) -> f64 {
        (&self.b0 - &point.fy).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of the shifted problem and the dual at y = 0.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // For a PD input the dual at zero has zero diagonal residual.
    //
    // Given
    // -----
    // - R = [[1, 0.3], [0.3, 1]], τ = 1e-5.
    //
    // Expect
    // ------
    // - `G = R − τI`, `b₀ = 1 − τ`, `F(0) = diag(G)` so the residual is ≈ 0.
    fn dual_at_zero_for_pd_input() {
        // Arrange
        let r = DMatrix::from_row_slice(2, 2, &[1.0, 0.3, 0.3, 1.0]);
        let state = NewtonState::new(&r, 1e-5);

        // Act
        let point = state.point_at(DVector::zeros(2));

        // Assert
        assert!((state.g[(0, 0)] - (1.0 - 1e-5)).abs() < 1e-15);
        assert!((state.b0[1] - (1.0 - 1e-5)).abs() < 1e-15);
        assert!(state.residual(&point) < 1e-12);
        assert!((point.f - state.half_norm_g()).abs() < 1e-12);
    }
}
