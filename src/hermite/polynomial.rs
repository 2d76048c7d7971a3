//! hermite::polynomial — Hermite polynomials in both conventions.
//!
//! Purpose
//! -------
//! Evaluate Hermite polynomials by their three-term recurrences, convert
//! between the Probabilists' (`He_n`) and Physicists' (`H_n`) conventions,
//! and evaluate `He_n(x)·φ(x)`, the building block of the discrete
//! matching sums.
//!
//! Key behaviors
//! -------------
//! - `He_{n+1}(x) = x·He_n(x) − n·He_{n−1}(x)`, `He_0 = 1`, `He_1 = x`.
//! - `H_{n+1}(x) = 2x·H_n(x) − 2n·H_{n−1}(x)`, `H_0 = 1`, `H_1 = 2x`.
//! - `He_n(x) = 2^{−n/2}·H_n(x/√2)` and `H_n(x) = 2^{n/2}·He_n(√2·x)`.
//! - [`h_phi`] returns exactly `0.0` at `x = ±∞`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The recurrences are stable for the degrees used here (n ≤ ~20).
//!   High-degree values at large |x| may overflow to ±∞; no clamping is
//!   applied.
use crate::numerical_stability::normal::std_normal_pdf;
use std::f64::consts::SQRT_2;

/// Hermite polynomial convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HermiteKind {
    /// `He_n`, orthogonal under the standard normal density.
    #[default]
    Probabilists,
    /// `H_n`, orthogonal under `e^{−x²}`.
    Physicists,
}

/// hermite — degree-`n` Hermite polynomial at `x`.
///
/// Parameters
/// ----------
/// - `x`: `f64`
///   Evaluation point.
/// - `n`: `usize`
///   Degree.
/// - `kind`: [`HermiteKind`]
///   Convention; [`HermiteKind::Probabilists`] is the default.
///
/// Returns
/// -------
/// `f64`
///   `He_n(x)` or `H_n(x)`.
///
/// Examples
/// --------
/// ```rust
/// use rust_mvsim::hermite::{hermite, HermiteKind};
///
/// // He_2(x) = x² − 1, H_2(x) = 4x² − 2
/// assert_eq!(hermite(3.0, 2, HermiteKind::Probabilists), 8.0);
/// assert_eq!(hermite(3.0, 2, HermiteKind::Physicists), 34.0);
/// ```
pub fn hermite(x: f64, n: usize, kind: HermiteKind) -> f64 {
    match kind {
        HermiteKind::Probabilists => hermite_prob(x, n),
        HermiteKind::Physicists => hermite_phys(x, n),
    }
}

/// Probabilists' `He_n(x)` via the three-term recurrence.
pub fn hermite_prob(x: f64, n: usize) -> f64 {
    if n == 0 {
        return 1.0;
    }
    let mut prev = 1.0;
    let mut curr = x;
    for k in 1..n {
        let next = x * curr - k as f64 * prev;
        prev = curr;
        curr = next;
    }
    curr
}

/// Physicists' `H_n(x)` via the three-term recurrence.
pub fn hermite_phys(x: f64, n: usize) -> f64 {
    if n == 0 {
        return 1.0;
    }
    let mut prev = 1.0;
    let mut curr = 2.0 * x;
    for k in 1..n {
        let next = 2.0 * x * curr - 2.0 * k as f64 * prev;
        prev = curr;
        curr = next;
    }
    curr
}

/// `He_0(x), …, He_n(x)` in one pass.
pub fn hermite_prob_all(x: f64, n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n + 1);
    out.push(1.0);
    if n == 0 {
        return out;
    }
    out.push(x);
    for k in 1..n {
        let next = x * out[k] - k as f64 * out[k - 1];
        out.push(next);
    }
    out
}

/// `He_n(x)` computed from the Physicists' polynomial: `2^{−n/2}·H_n(x/√2)`.
pub fn probabilists_from_physicists(x: f64, n: usize) -> f64 {
    2f64.powf(-(n as f64) / 2.0) * hermite_phys(x / SQRT_2, n)
}

/// `H_n(x)` computed from the Probabilists' polynomial: `2^{n/2}·He_n(√2·x)`.
pub fn physicists_from_probabilists(x: f64, n: usize) -> f64 {
    2f64.powf(n as f64 / 2.0) * hermite_prob(SQRT_2 * x, n)
}

/// h_phi — `He_n(x)·φ(x)`, with `h_phi(±∞, n) = 0` exactly.
///
/// Notes
/// -----
/// - At the infinite breakpoints of a discrete support the product is the
///   indeterminate `∞·0`; the limit is 0 for every `n`, which is what the
///   rectangle sums need.
pub fn h_phi(x: f64, n: usize) -> f64 {
    if x.is_infinite() {
        return 0.0;
    }
    hermite_prob(x, n) * std_normal_pdf(x)
}
