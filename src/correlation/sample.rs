//! correlation::sample — sample correlation matrices.
//!
//! Purpose
//! -------
//! Estimate a `d × d` correlation matrix from `n × d` data (rows are
//! observations) as Pearson, Spearman (Pearson on mid-ranks) or Kendall's
//! τ-b. Used to check simulated output against its target.
//!
//! Key behaviors
//! -------------
//! - Ties receive mid-ranks for Spearman; Kendall uses the τ-b tie
//!   correction `(n_c − n_d)/√((n₀ − n₁)(n₀ − n₂))`.
//! - Kendall pairs are evaluated in parallel with rayon; each pair is
//!   `O(n²)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two finite observations; no constant column.
use crate::correlation::convert::CorrelationType;
use crate::correlation::errors::{CorrelationError, CorrelationResult};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;

/// cor — sample correlation matrix of the columns of `data`.
///
/// Parameters
/// ----------
/// - `data`: `&Array2<f64>`
///   `n × d` observations.
/// - `kind`: `CorrelationType`
///
/// Returns
/// -------
/// `CorrelationResult<Array2<f64>>`
///   Symmetric with unit diagonal.
///
/// Errors
/// ------
/// - `InsufficientData` for `n < 2`.
/// - `NonFinite` for NaN or infinite entries.
/// - `ZeroVariance` for a constant column.
pub fn cor(data: &Array2<f64>, kind: CorrelationType) -> CorrelationResult<Array2<f64>> {
    let (n, d) = data.dim();
    if n < 2 {
        return Err(CorrelationError::InsufficientData { observations: n });
    }
    if let Some(((row, col), &value)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(CorrelationError::NonFinite { row, col, value });
    }
    for (column, col) in data.axis_iter(Axis(1)).enumerate() {
        let first = col[0];
        if col.iter().all(|&v| v == first) {
            return Err(CorrelationError::ZeroVariance { column });
        }
    }

    match kind {
        CorrelationType::Pearson => Ok(pearson_matrix(data)),
        CorrelationType::Spearman => {
            let mut ranked = Array2::<f64>::zeros((n, d));
            for (j, col) in data.axis_iter(Axis(1)).enumerate() {
                ranked.column_mut(j).assign(&mid_ranks(col));
            }
            Ok(pearson_matrix(&ranked))
        }
        CorrelationType::Kendall => Ok(kendall_matrix(data)),
    }
}

fn pearson_matrix(data: &Array2<f64>) -> Array2<f64> {
    let d = data.ncols();
    let mut centered = data.to_owned();
    for mut col in centered.axis_iter_mut(Axis(1)) {
        let mean = col.sum() / col.len() as f64;
        col.mapv_inplace(|v| v - mean);
    }
    let cov = centered.t().dot(&centered);
    let mut out = Array2::<f64>::eye(d);
    for i in 0..d {
        for j in (i + 1)..d {
            let r = (cov[[i, j]] / (cov[[i, i]] * cov[[j, j]]).sqrt()).clamp(-1.0, 1.0);
            out[[i, j]] = r;
            out[[j, i]] = r;
        }
    }
    out
}

/// Mid-ranks (1-based) of a column; tied values share their average rank.
fn mid_ranks(col: ArrayView1<'_, f64>) -> Array1<f64> {
    let n = col.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| col[a].total_cmp(&col[b]));
    let mut ranks = Array1::<f64>::zeros(n);
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && col[order[end]] == col[order[start]] {
            end += 1;
        }
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

fn kendall_tau_b(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let n = x.len();
    let (mut concordant, mut discordant) = (0.0_f64, 0.0_f64);
    let (mut ties_x, mut ties_y) = (0.0_f64, 0.0_f64);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 {
                ties_x += 1.0;
            }
            if dy == 0.0 {
                ties_y += 1.0;
            }
            let s = dx * dy;
            if s > 0.0 {
                concordant += 1.0;
            } else if s < 0.0 {
                discordant += 1.0;
            }
        }
    }
    let n0 = (n * (n - 1)) as f64 / 2.0;
    let denom = ((n0 - ties_x) * (n0 - ties_y)).sqrt();
    ((concordant - discordant) / denom).clamp(-1.0, 1.0)
}

fn kendall_matrix(data: &Array2<f64>) -> Array2<f64> {
    let d = data.ncols();
    let pairs: Vec<(usize, usize)> = (0..d).flat_map(|i| (i + 1..d).map(move |j| (i, j))).collect();
    let taus: Vec<(usize, usize, f64)> = pairs
        .into_par_iter()
        .map(|(i, j)| (i, j, kendall_tau_b(data.column(i), data.column(j))))
        .collect();
    let mut out = Array2::<f64>::eye(d);
    for (i, j, tau) in taus {
        out[[i, j]] = tau;
        out[[j, i]] = tau;
    }
    out
}
