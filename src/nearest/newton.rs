//! nearest::newton — semismooth Newton method for the nearest correlation
//! matrix with an eigenvalue floor.
//!
//! Purpose
//! -------
//! Solve `min ½‖X − R‖²_F` over symmetric `X` with `diag(X) = 1` and
//! `λ_min(X) ≥ τ`. Shifting by `τI` turns this into the nearest correlation
//! problem for `G = R − τI` with diagonal `b₀ = 1 − τ`, whose dual
//!
//! ```text
//! θ(y) = ½‖(G + Diag y)₊‖²_F − b₀ᵀy
//! ```
//!
//! is convex and once continuously differentiable with gradient
//! `F(y) − b₀`, `F(y) = diag((G + Diag y)₊)`. Its generalized Hessian is
//! applied through the eigenbasis of `G + Diag y` without ever being formed.
//!
//! Key behaviors
//! -------------
//! - Newton directions come from preconditioned CG on
//!   `(V + εI)·d = b₀ − F(y)` ([`npd_pre_cg`], [`npd_jacobian`],
//!   [`npd_precond_matrix`]).
//! - Armijo backtracking accepts a step when
//!   `θ(y + αd) ≤ θ(y) + newton_tol·α·∇θᵀd + 1e-6`.
//! - A direction with `∇θᵀd ≥ 0` is replaced by steepest descent.
//! - A line search that exhausts `inner_iters` halvings stops the outer loop
//!   and keeps the current iterate.
//! - The primal iterate is recovered with [`npd_pca`], which also enforces
//!   the diagonal exactly.
//!
//! Invariants & assumptions
//! ------------------------
//! - Eigenvalues are sorted in descending order with a deterministic tie
//!   break (see `numerical_stability::linalg::sorted_sym_eigen`); `r`
//!   denotes the number of strictly positive eigenvalues.
//! - The returned matrix has `diag = 1` exactly and `λ_min ≥ τ` up to
//!   rounding.
//! - Non-convergence within `outer_iters` is reported through
//!   [`NearestOutcome::converged`] plus a warning, never as an error.
//!
//! Testing notes
//! -------------
//! - The dual gradient is checked against central differences.
//! - The 4 × 4 indefinite matrix is repaired and compared with eigenvalue
//!   clipping; valid inputs are returned unchanged; an equicorrelation matrix
//!   with a repeated eigenvalue is repaired deterministically to its known
//!   solution.
use crate::nearest::errors::NearestResult;
use crate::nearest::options::NearestPDOptions;
use crate::nearest::validation::validate_symmetric;
use crate::nearest::workspace::{DualPoint, NewtonState};
use crate::numerical_stability::constants::PRECOND_FLOOR;
use crate::numerical_stability::linalg::{SortedEigen, from_dmatrix, symmetrize, to_dmatrix};
use nalgebra::{DMatrix, DVector};
use ndarray::Array2;
use tracing::{debug, warn};

/// Slack added to the Armijo test so that steps at round-off level pass.
const ARMIJO_SLACK: f64 = 1e-6;

/// NearestOutcome — result of the Newton engine.
///
/// Fields
/// ------
/// - `matrix`: repaired correlation matrix (unit diagonal, `λ_min ≥ τ`).
/// - `converged`: whether `residual` or `gap` reached `outer_tol`.
/// - `iterations`: outer Newton iterations performed.
/// - `fn_evals`: dual evaluations (one eigendecomposition each).
/// - `residual`: final `‖b₀ − F(y)‖₂`.
/// - `gap`: final relative duality gap.
/// - `status`: human-readable termination reason.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestOutcome {
    pub matrix: Array2<f64>,
    pub converged: bool,
    pub iterations: usize,
    pub fn_evals: usize,
    pub residual: f64,
    pub gap: f64,
    pub status: String,
}

/// Summary of one preconditioned CG solve.
#[derive(Debug, Clone, PartialEq)]
pub struct CgOutcome {
    pub step: DVector<f64>,
    pub iterations: usize,
    pub relres: f64,
    pub converged: bool,
    pub negative_curvature: bool,
}

/// npd_gradient — dual objective and `F(y)` at the current eigendecomposition.
///
/// Parameters
/// ----------
/// - `y`: `&DVector<f64>`
///   Dual point.
/// - `eig`: `&SortedEigen`
///   Eigendecomposition of `G + Diag(y)`.
/// - `b0`: `&DVector<f64>`
///   Target diagonal.
///
/// Returns
/// -------
/// `(f64, DVector<f64>)`
///   `θ(y) = ½Σ max(λ, 0)² − b₀ᵀy` and `F(y)_i = Σ_{λ_k > 0} λ_k P_ik²`.
///   The gradient of `θ` is `F(y) − b₀`.
pub fn npd_gradient(y: &DVector<f64>, eig: &SortedEigen, b0: &DVector<f64>) -> (f64, DVector<f64>) {
    let n = eig.values.len();
    let r = eig.n_positive();
    let mut fy = DVector::<f64>::zeros(n);
    let mut f = 0.0;
    for k in 0..r {
        let lambda = eig.values[k];
        f += lambda * lambda;
        for i in 0..n {
            let p = eig.vectors[(i, k)];
            fy[i] += lambda * p * p;
        }
    }
    (0.5 * f - b0.dot(y), fy)
}

/// npd_pca — primal matrix from the current eigendecomposition.
///
/// Projects `x` onto the PSD cone (working with whichever of the positive or
/// non-positive eigenspaces is smaller), lifts the diagonal to at least `b`,
/// then applies the congruence `X_ij ← X_ij·√(b_i/d_i)·√(b_j/d_j)` so the
/// diagonal equals `b` exactly.
///
/// Parameters
/// ----------
/// - `x`: `&DMatrix<f64>`
///   The matrix `eig` decomposes.
/// - `eig`: `&SortedEigen`
/// - `b`: `&DVector<f64>`
///   Strictly positive target diagonal.
pub fn npd_pca(x: &DMatrix<f64>, eig: &SortedEigen, b: &DVector<f64>) -> DMatrix<f64> {
    let n = x.nrows();
    let r = eig.n_positive();
    let mut out = if r == 0 {
        DMatrix::zeros(n, n)
    } else if r == n {
        x.clone()
    } else if r <= n / 2 {
        weighted_outer(eig, 0, r, |v| v)
    } else {
        x + weighted_outer(eig, r, n - r, |v| -v)
    };
    out = symmetrize(&out);

    let scale: Vec<f64> = (0..n)
        .map(|i| {
            let d = out[(i, i)].max(b[i]);
            out[(i, i)] = d;
            (b[i] / d).sqrt()
        })
        .collect();
    for j in 0..n {
        for i in 0..n {
            out[(i, j)] *= scale[i] * scale[j];
        }
    }
    out
}

/// npd_set_omega — the `r × (n − r)` block of the first divided differences.
///
/// `Ω₁₂[i, j] = λ_i / (|λ_i| + |λ_{r+j}|)` for positive `λ_i` and
/// non-positive `λ_{r+j}`. The full matrix is
/// `Ω = [[1, Ω₁₂], [Ω₁₂ᵀ, 0]]`.
pub fn npd_set_omega(eig: &SortedEigen) -> DMatrix<f64> {
    let n = eig.values.len();
    let r = eig.n_positive();
    DMatrix::from_fn(r, n - r, |i, j| {
        let (pos, neg) = (eig.values[i], eig.values[r + j]);
        pos / (pos.abs() + neg.abs())
    })
}

/// npd_jacobian — generalized Jacobian applied to `x`.
///
/// `V(x) = diag(P·(Ω ∘ (Pᵀ·Diag(x)·P))·Pᵀ) + perturbation·x`, with `Ω`
/// assembled from `omega12`. The ridge keeps the operator positive definite
/// when `V` is singular.
pub fn npd_jacobian(
    x: &DVector<f64>, omega12: &DMatrix<f64>, vectors: &DMatrix<f64>, perturbation: f64,
) -> DVector<f64> {
    let n = vectors.nrows();
    let omega = full_omega(omega12, n);
    let mut scaled = vectors.clone();
    for (i, mut row) in scaled.row_iter_mut().enumerate() {
        row *= x[i];
    }
    let inner = vectors.transpose() * scaled;
    let h = omega.component_mul(&inner);
    let ph = vectors * h;
    DVector::from_fn(n, |i, _| ph.row(i).dot(&vectors.row(i)) + perturbation * x[i])
}

/// npd_precond_matrix — diagonal of the Jacobian, used as a preconditioner.
///
/// `c_i = (H·Ω·Hᵀ)_ii` with `H = P ∘ P`, floored at [`PRECOND_FLOOR`].
pub fn npd_precond_matrix(omega12: &DMatrix<f64>, vectors: &DMatrix<f64>) -> DVector<f64> {
    let n = vectors.nrows();
    let omega = full_omega(omega12, n);
    let h = vectors.map(|v| v * v);
    let hw = &h * omega;
    DVector::from_fn(n, |i, _| hw.row(i).dot(&h.row(i)).max(PRECOND_FLOOR))
}

/// npd_pre_cg — preconditioned conjugate gradient for `A·d = b`.
///
/// Parameters
/// ----------
/// - `b`: `&DVector<f64>`
///   Right-hand side.
/// - `c`: `&DVector<f64>`
///   Diagonal preconditioner, strictly positive.
/// - `tol`: `f64`
///   Stop when `‖r‖ ≤ tol·‖b‖`.
/// - `max_iter`: `usize`
///   Iteration cap.
/// - `apply`: `Fn(&DVector<f64>) -> DVector<f64>`
///   The operator `A`.
///
/// Returns
/// -------
/// `CgOutcome`
///   The last iterate. On non-positive curvature the solve stops early and
///   keeps the current iterate; if that is still zero, the normalized
///   search direction is returned instead, which is a descent direction for
///   the dual.
pub fn npd_pre_cg<F>(
    b: &DVector<f64>, c: &DVector<f64>, tol: f64, max_iter: usize, apply: F,
) -> CgOutcome
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let n = b.len();
    let n2b = b.norm();
    let mut step = DVector::<f64>::zeros(n);
    if n2b == 0.0 {
        return CgOutcome {
            step,
            iterations: 0,
            relres: 0.0,
            converged: true,
            negative_curvature: false,
        };
    }
    let tolb = tol * n2b;
    let mut r = b.clone();
    let mut z = r.component_div(c);
    let mut rz1 = r.dot(&z);
    let mut rz2 = 1.0;
    let mut d = z.clone();
    let mut iterations = 0;
    let mut relres = 1.0;
    let mut converged = false;
    let mut negative_curvature = false;

    for k in 1..=max_iter {
        if k > 1 {
            d = &z + (rz1 / rz2) * &d;
        }
        let w = apply(&d);
        let denom = d.dot(&w);
        iterations = k;
        if denom <= 0.0 || !denom.is_finite() {
            negative_curvature = true;
            if step.norm() == 0.0 {
                step = &d / d.norm();
            }
            break;
        }
        let alpha = rz1 / denom;
        step += alpha * &d;
        r -= alpha * &w;
        relres = r.norm() / n2b;
        if r.norm() <= tolb {
            converged = true;
            break;
        }
        z = r.component_div(c);
        rz2 = rz1;
        rz1 = r.dot(&z);
    }
    CgOutcome { step, iterations, relres, converged, negative_curvature }
}

/// cor_near_pd — nearest correlation matrix with eigenvalue floor `τ`.
///
/// Parameters
/// ----------
/// - `r`: `&Array2<f64>`
///   Symmetric `n × n` input; need not be PSD or have a unit diagonal.
/// - `opts`: `&NearestPDOptions`
///   Floor, caps and tolerances.
///
/// Returns
/// -------
/// `NearestResult<NearestOutcome>`
///   The repaired matrix plus convergence diagnostics. The input is not
///   modified.
///
/// Errors
/// ------
/// - `EmptyMatrix`, `NotSquare`, `NonFinite`, `NotSymmetric` for malformed
///   input.
/// - `InvalidTau`, `InvalidIterations`, `InvalidTolerance` for options that
///   fail [`NearestPDOptions::validate`].
///
/// Notes
/// -----
/// - A valid correlation matrix with `λ_min ≥ τ` is returned unchanged: the
///   dual at `y = 0` already has zero residual.
///
/// Examples
/// --------
/// ```rust
/// use ndarray::array;
/// use rust_mvsim::nearest::{NearestPDOptions, cor_near_pd};
///
/// let r = array![[1.0, 0.9, 0.7], [0.9, 1.0, 0.3], [0.7, 0.3, 1.0]];
/// let out = cor_near_pd(&r, &NearestPDOptions::default()).unwrap();
/// assert!(out.converged);
/// assert_eq!(out.matrix[[1, 1]], 1.0);
/// ```
pub fn cor_near_pd(r: &Array2<f64>, opts: &NearestPDOptions) -> NearestResult<NearestOutcome> {
    opts.validate()?;
    validate_symmetric(r)?;
    let state = NewtonState::new(&to_dmatrix(r), opts.tau);
    let n = state.dim();
    let val_g = state.half_norm_g();

    let mut current = state.point_at(DVector::zeros(n));
    let mut fn_evals = 1;
    let mut primal = npd_pca(&current.x, &current.eig, &state.b0);
    let mut residual = state.residual(&current);
    let mut gap = duality_gap(val_g, current.f, &primal, &state.g);
    let mut iterations = 0;
    let mut line_search_failed = false;

    while gap > opts.outer_tol && residual > opts.outer_tol && iterations < opts.outer_iters {
        let omega12 = npd_set_omega(&current.eig);
        let c = npd_precond_matrix(&omega12, &current.eig.vectors);
        let rhs = &state.b0 - &current.fy;
        let cg = npd_pre_cg(&rhs, &c, opts.cg_tol, opts.cg_iters, |x| {
            npd_jacobian(x, &omega12, &current.eig.vectors, opts.perturbation)
        });

        let mut direction = cg.step;
        let mut slope = -rhs.dot(&direction);
        if !(slope < 0.0) {
            direction = rhs.clone();
            slope = -rhs.norm_squared();
        }

        let (accepted, evals) = armijo_search(&state, &current, &direction, slope, opts);
        fn_evals += evals;
        iterations += 1;
        let Some((next, step)) = accepted else {
            line_search_failed = true;
            debug!(iteration = iterations, residual, gap, "line search failed");
            break;
        };
        current = next;
        primal = npd_pca(&current.x, &current.eig, &state.b0);
        residual = state.residual(&current);
        gap = duality_gap(val_g, current.f, &primal, &state.g);
        debug!(
            iteration = iterations,
            residual,
            gap,
            step,
            cg_iters = cg.iterations,
            cg_relres = cg.relres,
            "newton iteration"
        );
    }

    let converged = gap <= opts.outer_tol || residual <= opts.outer_tol;
    let status = if converged {
        "Converged"
    } else if line_search_failed {
        "Line search failed"
    } else {
        "Maximum iterations reached"
    };
    if !converged {
        warn!(
            iterations,
            residual,
            gap,
            status,
            "nearest correlation did not converge; returning best iterate"
        );
    }

    let mut x = primal;
    for i in 0..n {
        x[(i, i)] += opts.tau;
    }
    let mut x = symmetrize(&x);
    for i in 0..n {
        x[(i, i)] = 1.0;
    }
    Ok(NearestOutcome {
        matrix: from_dmatrix(&x),
        converged,
        iterations,
        fn_evals,
        residual,
        gap,
        status: status.to_string(),
    })
}

/// Convenience wrapper around [`cor_near_pd`] returning the repaired matrix
/// and the `converged` flag. A `false` flag means the matrix is the best
/// iterate after the iteration cap or a failed line search.
pub fn nearest_correlation(
    r: &Array2<f64>, opts: &NearestPDOptions,
) -> NearestResult<(Array2<f64>, bool)> {
    cor_near_pd(r, opts).map(|outcome| (outcome.matrix, outcome.converged))
}

// ---- Helper Methods ----

fn armijo_search(
    state: &NewtonState, current: &DualPoint, direction: &DVector<f64>, slope: f64,
    opts: &NearestPDOptions,
) -> (Option<(DualPoint, f64)>, usize) {
    let mut evals = 0;
    let mut step = 1.0;
    for _ in 0..=opts.inner_iters {
        let trial = state.point_at(&current.y + step * direction);
        evals += 1;
        if trial.f <= current.f + opts.newton_tol * step * slope + ARMIJO_SLACK {
            return (Some((trial, step)), evals);
        }
        step *= 0.5;
    }
    (None, evals)
}

fn duality_gap(val_g: f64, f: f64, primal: &DMatrix<f64>, g: &DMatrix<f64>) -> f64 {
    let val_obj = 0.5 * (primal - g).norm_squared();
    let dual_obj = val_g - f;
    (val_obj - dual_obj) / (1.0 + dual_obj.abs() + val_obj.abs())
}

fn full_omega(omega12: &DMatrix<f64>, n: usize) -> DMatrix<f64> {
    let r = omega12.nrows();
    DMatrix::from_fn(n, n, |i, j| match (i < r, j < r) {
        (true, true) => 1.0,
        (true, false) => omega12[(i, j - r)],
        (false, true) => omega12[(j, i - r)],
        (false, false) => 0.0,
    })
}

/// `Σ_{k ∈ [start, start+len)} w(λ_k)·p_k·p_kᵀ`.
fn weighted_outer<W: Fn(f64) -> f64>(
    eig: &SortedEigen, start: usize, len: usize, weight: W,
) -> DMatrix<f64> {
    let block = eig.vectors.columns(start, len);
    let mut scaled = block.clone_owned();
    for (k, mut col) in scaled.column_iter_mut().enumerate() {
        col *= weight(eig.values[start + k]);
    }
    scaled * block.transpose()
}
