//! hermite::coefficients — Hermite expansion of `F⁻¹(Φ(z))`.
//!
//! Purpose
//! -------
//! Compute the coefficients `a_k` of the expansion
//! `F⁻¹(Φ(z)) = Σ_k a_k·He_k(z)` for a marginal `F`, with `Z ~ N(0, 1)`.
//! They drive the continuous branches of Pearson matching.
//!
//! Key behaviors
//! -------------
//! - `a_k = E[He_k(Z)·F⁻¹(Φ(Z))] / k!`, estimated with a Physicists'
//!   Gauss–Hermite rule: nodes are rescaled by `√2` and the sum by `π^{−1/2}`,
//!   i.e. `a_k = 1/(√π·k!) Σ_s w_s He_k(√2 t_s) F⁻¹(Φ(√2 t_s))`.
//! - Probabilities are clamped into `[PROB_CLAMP, 1 − PROB_CLAMP]` before
//!   the quantile call.
//! - A non-finite coefficient at degree `k ≥ 2` truncates the expansion to
//!   degree `k − 1` with a `tracing` warning.
//!
//! Invariants & assumptions
//! ------------------------
//! - `coefs.len() == degree + 1`, where `degree` is the requested degree
//!   unless truncated as above.
//! - The rule has at least `degree + 1` nodes.
use crate::hermite::{
    errors::{HermiteError, HermiteResult},
    polynomial::hermite_prob_all,
    quadrature::GaussHermiteRule,
};
use crate::margins::Marginal;
use crate::numerical_stability::{
    constants::PROB_CLAMP,
    normal::{sqrt_pi, std_normal_cdf},
};
use std::f64::consts::SQRT_2;
use tracing::warn;

/// HermiteCoefficients — `a_0, …, a_n` of a marginal's normal-scale expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct HermiteCoefficients {
    coefs: Vec<f64>,
}

impl HermiteCoefficients {
    pub fn from_vec(coefs: Vec<f64>) -> Self {
        Self { coefs }
    }

    /// Expansion degree `n` (`len − 1`).
    pub fn degree(&self) -> usize {
        self.coefs.len().saturating_sub(1)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.coefs
    }

    /// `a_k`, or `0.0` beyond the expansion degree.
    pub fn get(&self, k: usize) -> f64 {
        self.coefs.get(k).copied().unwrap_or(0.0)
    }

    /// `E[He_k(Z)·X] = k!·a_k`.
    pub fn moment(&self, k: usize) -> f64 {
        factorial(k) * self.get(k)
    }
}

/// `k!` as `f64`.
pub fn factorial(k: usize) -> f64 {
    (1..=k).fold(1.0, |acc, i| acc * i as f64)
}

/// get_coefs — Hermite coefficients of `F⁻¹(Φ(·))` up to degree `n`.
///
/// Parameters
/// ----------
/// - `marginal`: `&dyn Marginal`
///   Target marginal; only `quantile` is used.
/// - `n`: `usize`
///   Requested expansion degree.
/// - `rule`: `&GaussHermiteRule`
///   Physicists' Gauss–Hermite rule with at least `n + 1` nodes.
///
/// Returns
/// -------
/// `HermiteResult<HermiteCoefficients>`
///   `a_0..=a_n`, or a shorter expansion if a high-degree coefficient was
///   non-finite.
///
/// Errors
/// ------
/// - `HermiteError::InvalidNodeCount` if `rule.len() < n + 1`.
/// - `HermiteError::Degenerate` if `a_0` or `a_1` is non-finite.
///
/// Examples
/// --------
/// ```rust
/// use rust_mvsim::hermite::{get_coefs, GaussHermiteRule};
/// use rust_mvsim::margins::Continuous;
/// use statrs::distribution::Normal;
///
/// let rule = GaussHermiteRule::new(40).unwrap();
/// let m = Continuous::new(Normal::new(1.0, 2.0).unwrap()).unwrap();
/// let c = get_coefs(&m, 5, &rule).unwrap();
/// assert!((c.get(0) - 1.0).abs() < 1e-8);
/// assert!((c.get(1) - 2.0).abs() < 1e-8);
/// ```
pub fn get_coefs(
    marginal: &dyn Marginal, n: usize, rule: &GaussHermiteRule,
) -> HermiteResult<HermiteCoefficients> {
    if rule.len() < n + 1 {
        return Err(HermiteError::InvalidNodeCount {
            nodes: rule.len(),
            reason: "the quadrature rule needs at least degree + 1 nodes",
        });
    }

    let mut sums = vec![0.0; n + 1];
    for (&t, &w) in rule.nodes().iter().zip(rule.weights()) {
        let z = SQRT_2 * t;
        let p = std_normal_cdf(z).clamp(PROB_CLAMP, 1.0 - PROB_CLAMP);
        let q = marginal.quantile(p);
        let he = hermite_prob_all(z, n);
        for (k, sum) in sums.iter_mut().enumerate() {
            *sum += q * he[k] * w;
        }
    }

    let norm = 1.0 / sqrt_pi();
    let mut coefs: Vec<f64> =
        sums.iter().enumerate().map(|(k, s)| s * norm / factorial(k)).collect();

    if let Some(bad) = coefs.iter().position(|c| !c.is_finite()) {
        if bad <= 1 {
            return Err(HermiteError::Degenerate {
                degree: bad,
                reason: "non-finite coefficient; the marginal has no usable expansion",
            });
        }
        warn!(
            requested = n,
            effective = bad - 1,
            "Hermite expansion produced a non-finite coefficient; lowering degree"
        );
        coefs.truncate(bad);
    }
    Ok(HermiteCoefficients { coefs })
}
