//! pearson::series — coefficients of the correlation polynomial `G(ρz)`.
//!
//! Purpose
//! -------
//! Assemble `ρx = G(ρz) = Σ_k c_k ρz^k` for a marginal pair from cached
//! per-marginal data. With `m_k = E[He_k(Z)·X]`, Mehler's expansion of the
//! bivariate normal density gives
//! `Cov(X, Y) = Σ_{k≥1} m^A_k m^B_k ρz^k / k!`, hence
//! `c_k = m^A_k m^B_k / (k!·σA·σB)` for `k ≥ 1`.
//!
//! Key behaviors
//! -------------
//! - continuous × continuous: `m_k = k!·a_k`, so `c_k = k!·a_k·b_k/(σAσB)`,
//!   and `c_0 = (a_0 b_0 − μA μB)/(σAσB)` absorbs the quadrature bias of the
//!   means.
//! - continuous × discrete: [`gn0m`], the mixed sum
//!   `−(σAσB)^{−1}·Σ_r a_r [Hφ(α_{r+1}, k−1) − Hφ(α_r, k−1)]·k!·b_k`.
//! - discrete × discrete: [`gn0d`], the rectangle double sum over both
//!   supports' breakpoints of the bivariate normal probability weights.
//! - `c_0 = 0` for every pair that involves a discrete marginal.
//!
//! Invariants & assumptions
//! ------------------------
//! - `k ≥ 1` for [`gn0d`], [`gn0m`] and [`discrete_moment`]; degree 0 is the
//!   constant term and has its own formula.
//! - The pair kind is resolved once in [`PairPolynomial::new`]; bounds and
//!   root solves reuse the same coefficient vector.
use crate::hermite::{HermiteCoefficients, factorial, h_phi};
use crate::margins::DiscreteSupport;
use crate::pearson::prepared::{MarginExpansion, PairKind, PreparedMargin};

/// `Σ_r a_r·[Hφ(α_{r+1}, k−1) − Hφ(α_r, k−1)]` over a discrete support.
fn breakpoint_sum(support: &DiscreteSupport, k: usize) -> f64 {
    let breaks = support.breaks();
    support
        .points()
        .iter()
        .enumerate()
        .map(|(r, &a)| a * (h_phi(breaks[r + 1], k - 1) - h_phi(breaks[r], k - 1)))
        .sum()
}

/// `E[He_k(Z)·X]` for a discrete marginal, `k ≥ 1`.
pub fn discrete_moment(support: &DiscreteSupport, k: usize) -> f64 {
    -breakpoint_sum(support, k)
}

/// gn0d — discrete × discrete series term at degree `n ≥ 1`.
///
/// Parameters
/// ----------
/// - `n`: `usize`
///   Series degree, at least 1.
/// - `a`, `b`: `&DiscreteSupport`
///   Cached supports with breakpoints `α`, `β`.
/// - `sigma_ab_inv`: `f64`
///   `1/(σA·σB)`.
///
/// Returns
/// -------
/// `f64`
///   `σAσB⁻¹ Σ_{r,s} a_r b_s [Hφ(α_{r+1})Hφ(β_{s+1}) + Hφ(α_r)Hφ(β_s)
///   − Hφ(α_r)Hφ(β_{s+1}) − Hφ(α_{r+1})Hφ(β_s)]`, with every `Hφ` at degree
///   `n − 1`. The `n`-th polynomial coefficient is this value over `n!`.
///
/// Notes
/// -----
/// - The rectangle sum factorizes into
///   `discrete_moment(a, n)·discrete_moment(b, n)·σAσB⁻¹`; tests use this
///   as a cross-check.
pub fn gn0d(n: usize, a: &DiscreteSupport, b: &DiscreteSupport, sigma_ab_inv: f64) -> f64 {
    let ha: Vec<f64> = a.breaks().iter().map(|&x| h_phi(x, n - 1)).collect();
    let hb: Vec<f64> = b.breaks().iter().map(|&x| h_phi(x, n - 1)).collect();
    let mut total = 0.0;
    for (r, &ar) in a.points().iter().enumerate() {
        for (s, &bs) in b.points().iter().enumerate() {
            let rect =
                ha[r + 1] * hb[s + 1] + ha[r] * hb[s] - ha[r] * hb[s + 1] - ha[r + 1] * hb[s];
            total += ar * bs * rect;
        }
    }
    total * sigma_ab_inv
}

/// gn0m — continuous × discrete series term at degree `n ≥ 1`.
///
/// `−σAσB⁻¹ · Σ_r a_r [Hφ(α_{r+1}, n−1) − Hφ(α_r, n−1)] · S_n`, where
/// `S_n = π^{−1/2} Σ_s w_s He_n(√2 t_s) F⁻¹(Φ(√2 t_s)) = n!·b_n` is read from
/// the continuous marginal's cached coefficients.
pub fn gn0m(
    n: usize, continuous: &HermiteCoefficients, discrete: &DiscreteSupport, sigma_ab_inv: f64,
) -> f64 {
    -sigma_ab_inv * breakpoint_sum(discrete, n) * continuous.moment(n)
}

/// PairPolynomial — `G(ρz)` coefficients for one resolved marginal pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairPolynomial {
    kind: PairKind,
    coef: Vec<f64>,
}

impl PairPolynomial {
    /// Resolve the pair kind and assemble `c_0..=c_degree`.
    pub fn new(a: &PreparedMargin, b: &PreparedMargin, degree: usize) -> Self {
        let kind = PairKind::of(a, b);
        let inv = 1.0 / (a.std_dev() * b.std_dev());
        let mut coef = vec![0.0; degree + 1];
        match (a.expansion(), b.expansion()) {
            (MarginExpansion::Continuous(ca), MarginExpansion::Continuous(cb)) => {
                coef[0] = (ca.get(0) * cb.get(0) - a.mean() * b.mean()) * inv;
                for (k, c) in coef.iter_mut().enumerate().skip(1) {
                    *c = factorial(k) * ca.get(k) * cb.get(k) * inv;
                }
            }
            (MarginExpansion::Continuous(cont), MarginExpansion::Discrete(disc))
            | (MarginExpansion::Discrete(disc), MarginExpansion::Continuous(cont)) => {
                for (k, c) in coef.iter_mut().enumerate().skip(1) {
                    *c = gn0m(k, cont, disc, inv) / factorial(k);
                }
            }
            (MarginExpansion::Discrete(da), MarginExpansion::Discrete(db)) => {
                for (k, c) in coef.iter_mut().enumerate().skip(1) {
                    *c = gn0d(k, da, db, inv) / factorial(k);
                }
            }
        }
        Self { kind, coef }
    }

    pub fn kind(&self) -> PairKind {
        self.kind
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coef
    }

    /// `G(ρ)` by Horner's scheme.
    pub fn eval(&self, rho: f64) -> f64 {
        eval_poly(&self.coef, rho)
    }
}

/// Horner evaluation of `Σ_k coef[k]·x^k`.
pub fn eval_poly(coef: &[f64], x: f64) -> f64 {
    coef.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
