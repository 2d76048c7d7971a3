//! pearson::solve — real roots of a polynomial on `[−1, 1]`.
//!
//! Purpose
//! -------
//! Locate every real root of `p(x) = Σ_k c_k x^k` on the closed interval
//! `[−1, 1]`. Sign changes are found on a uniform grid and each bracket is
//! refined with `argmin`'s Brent root finder.
//!
//! Key behaviors
//! -------------
//! - Grid points where `p` is exactly zero are roots as they stand.
//! - The two endpoints are also accepted when `|p(±1)| ≤ ENDPOINT_TOL`, so
//!   targets equal to an attainable bound still resolve.
//! - Roots closer than `DEDUP_TOL` are merged; the result is sorted.
//!
//! Invariants & assumptions
//! ------------------------
//! - Tangential roots (even multiplicity, no sign change) are not reported.
//!   Callers treat "no root" as infeasibility.
use crate::pearson::errors::{PearsonError, PearsonResult};
use crate::pearson::series::eval_poly;
use argmin::core::{CostFunction, Error, Executor, State};
use argmin::solver::brent::BrentRoot;

const GRID_INTERVALS: usize = 200;
const ENDPOINT_TOL: f64 = 1e-12;
const DEDUP_TOL: f64 = 1e-9;

/// Polynomial wrapped as an `argmin` problem. The cost is the signed value,
/// which is what `BrentRoot` brackets on.
#[derive(Debug, Clone)]
struct PolyRoot {
    coef: Vec<f64>,
}

impl CostFunction for PolyRoot {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        Ok(eval_poly(&self.coef, *x))
    }
}

/// All roots of `Σ_k coef[k]·x^k` in `[−1, 1]`, ascending.
///
/// Parameters
/// ----------
/// - `coef`: `&[f64]`
///   Ascending polynomial coefficients.
/// - `tol`: `f64`
///   Brent tolerance per bracket.
/// - `max_iters`: `u64`
///   Brent iteration cap per bracket.
///
/// Returns
/// -------
/// `PearsonResult<Vec<f64>>`
///   Sorted, de-duplicated roots. Empty when none exist.
///
/// Errors
/// ------
/// - `PearsonError::RootSolver` if the Brent backend fails.
pub fn solve_poly_pm_one(coef: &[f64], tol: f64, max_iters: u64) -> PearsonResult<Vec<f64>> {
    let grid: Vec<f64> =
        (0..=GRID_INTERVALS).map(|i| -1.0 + 2.0 * i as f64 / GRID_INTERVALS as f64).collect();
    let values: Vec<f64> = grid.iter().map(|&x| eval_poly(coef, x)).collect();

    let mut roots = Vec::new();
    if values[0].abs() <= ENDPOINT_TOL {
        roots.push(-1.0);
    }
    if values[GRID_INTERVALS].abs() <= ENDPOINT_TOL {
        roots.push(1.0);
    }
    for i in 0..GRID_INTERVALS {
        let (fa, fb) = (values[i], values[i + 1]);
        if fa == 0.0 {
            roots.push(grid[i]);
        } else if fa * fb < 0.0 {
            roots.push(brent_bracket(coef, grid[i], grid[i + 1], tol, max_iters)?);
        }
    }

    roots.sort_by(|a, b| a.total_cmp(b));
    roots.dedup_by(|later, kept| (*later - *kept).abs() <= DEDUP_TOL);
    Ok(roots)
}

fn brent_bracket(coef: &[f64], lo: f64, hi: f64, tol: f64, max_iters: u64) -> PearsonResult<f64> {
    let problem = PolyRoot { coef: coef.to_vec() };
    let solver = BrentRoot::new(lo, hi, tol);
    let result =
        Executor::new(problem, solver).configure(|state| state.max_iters(max_iters)).run()?;
    let root = result.state().get_best_param().copied().ok_or_else(|| PearsonError::RootSolver {
        text: format!("no iterate recorded on [{lo}, {hi}]"),
    })?;
    Ok(root.clamp(lo, hi))
}
