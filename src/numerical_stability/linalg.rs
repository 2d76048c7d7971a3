//! numerical_stability::linalg — dense symmetric-matrix helpers.
//!
//! Purpose
//! -------
//! Bridge the `ndarray` public surface of the crate to `nalgebra` for the
//! eigen-based work done by the nearest-correlation engine and the sampler,
//! and provide a deterministic, sorted symmetric eigendecomposition.
//!
//! Key behaviors
//! -------------
//! - Copy `Array2<f64>` into `DMatrix<f64>` and back ([`to_dmatrix`],
//!   [`from_dmatrix`]).
//! - Decompose symmetric matrices with eigenvalues sorted in descending
//!   order, ties broken by original index, and eigenvector signs fixed so
//!   that the largest-magnitude component is positive ([`sorted_sym_eigen`]).
//! - PSD projection, Frobenius norm, diagonal-congruence rescaling and a
//!   Cholesky factor with an eigen square-root fallback.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are square. Symmetry is enforced by [`symmetrize`] where the
//!   caller cannot guarantee it; other helpers read both triangles as-is.
//! - None of these helpers mutate caller-owned matrices unless the
//!   signature takes `&mut`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the ndarray/nalgebra round trip, descending order and
//!   determinism on repeated eigenvalues, PSD projection and the factor
//!   fallback on a rank-deficient matrix.
use crate::numerical_stability::constants::EIGEN_EPS;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use ndarray::Array2;

/// Eigen-decomposition with eigenvalues sorted in descending order.
///
/// `vectors.column(k)` is the unit eigenvector for `values[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedEigen {
    pub values: DVector<f64>,
    pub vectors: DMatrix<f64>,
}

impl SortedEigen {
    /// Number of strictly positive eigenvalues (`> 0`).
    pub fn n_positive(&self) -> usize {
        self.values.iter().take_while(|&&v| v > 0.0).count()
    }

    /// Rebuild `P · diag(f(λ)) · Pᵀ`.
    pub fn reconstruct<F: Fn(f64) -> f64>(&self, f: F) -> DMatrix<f64> {
        let mut scaled = self.vectors.clone();
        for (k, mut col) in scaled.column_iter_mut().enumerate() {
            col *= f(self.values[k]);
        }
        symmetrize(&(scaled * self.vectors.transpose()))
    }
}

/// Copy an `ndarray` matrix into a freshly allocated `DMatrix`.
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = a.dim();
    DMatrix::from_fn(rows, cols, |i, j| a[[i, j]])
}

/// Copy a `DMatrix` back into an `ndarray` matrix.
pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// `(M + Mᵀ) / 2`.
pub fn symmetrize(m: &DMatrix<f64>) -> DMatrix<f64> {
    0.5 * (m + m.transpose())
}

/// Frobenius norm `‖M‖_F`.
pub fn frobenius_norm(m: &DMatrix<f64>) -> f64 {
    m.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// sorted_sym_eigen — deterministic symmetric eigendecomposition.
///
/// Parameters
/// ----------
/// - `m`: `&DMatrix<f64>`
///   Square matrix; only its symmetric part is decomposed.
///
/// Returns
/// -------
/// `SortedEigen`
///   Eigenvalues in descending order. Equal eigenvalues keep the order the
///   backend produced them in (stable sort on index), and every eigenvector
///   is sign-normalized so its largest-magnitude component is positive.
///
/// Notes
/// -----
/// - Repeated eigenvalues span an eigenspace with no unique basis. The
///   stable order plus sign convention makes the output a deterministic
///   function of the input, which keeps the Newton iterations reproducible.
pub fn sorted_sym_eigen(m: &DMatrix<f64>) -> SortedEigen {
    let n = m.nrows();
    let eig = SymmetricEigen::new(symmetrize(m));
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]).then(a.cmp(&b)));

    let values = DVector::from_iterator(n, order.iter().map(|&k| eig.eigenvalues[k]));
    let mut vectors = DMatrix::<f64>::zeros(n, n);
    for (dst, &src) in order.iter().enumerate() {
        let col = eig.eigenvectors.column(src);
        let pivot = col.iter().copied().fold(0.0_f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
        vectors.set_column(dst, &(col * sign));
    }
    SortedEigen { values, vectors }
}

/// Project a symmetric matrix onto the PSD cone by clipping eigenvalues at 0.
pub fn project_psd(m: &DMatrix<f64>) -> DMatrix<f64> {
    sorted_sym_eigen(m).reconstruct(|v| v.max(0.0))
}

/// Smallest eigenvalue of a symmetric `ndarray` matrix, `None` when empty.
pub fn min_eigenvalue(a: &Array2<f64>) -> Option<f64> {
    if a.is_empty() || a.nrows() != a.ncols() {
        return None;
    }
    let eig = SymmetricEigen::new(symmetrize(&to_dmatrix(a)));
    eig.eigenvalues.iter().copied().reduce(f64::min)
}

/// `true` when the smallest eigenvalue is `≥ -tol`.
pub fn is_positive_semidefinite(a: &Array2<f64>, tol: f64) -> bool {
    min_eigenvalue(a).is_some_and(|lmin| lmin >= -tol)
}

/// rescale_unit_diagonal — diagonal congruence `D^{-1/2} M D^{-1/2}`.
///
/// Sets the diagonal to exactly `1.0` afterwards. Diagonal entries at or
/// below [`EIGEN_EPS`] are treated as `1.0`, leaving that row and column
/// unscaled.
pub fn rescale_unit_diagonal(m: &mut DMatrix<f64>) {
    let n = m.nrows();
    let scale: Vec<f64> =
        (0..n).map(|i| if m[(i, i)] > EIGEN_EPS { 1.0 / m[(i, i)].sqrt() } else { 1.0 }).collect();
    for j in 0..n {
        for i in 0..n {
            m[(i, j)] *= scale[i] * scale[j];
        }
    }
    for i in 0..n {
        m[(i, i)] = 1.0;
    }
}

/// lower_factor — `L` with `L·Lᵀ = R` for a PSD correlation matrix.
///
/// Tries a Cholesky factorization first; when `R` is only semidefinite
/// (Cholesky fails) falls back to the symmetric square root
/// `P·diag(√max(λ, 0))·Pᵀ`, which also satisfies `L·Lᵀ = R` up to the
/// clipped negative eigenvalues.
pub fn lower_factor(r: &DMatrix<f64>) -> DMatrix<f64> {
    match r.clone().cholesky() {
        Some(chol) => chol.l(),
        None => sorted_sym_eigen(r).reconstruct(|v| v.max(0.0).sqrt()),
    }
}
