//! margins::marginal — the marginal-distribution capability and statrs adapters.
//!
//! Purpose
//! -------
//! Define the [`Marginal`] trait consumed by the Hermite expansion, the
//! Pearson matcher and the sampler, and provide adapters that turn `statrs`
//! continuous and discrete distributions into marginals with validated
//! first and second moments.
//!
//! Key behaviors
//! -------------
//! - [`Continuous`] wraps any `ContinuousCDF<f64, f64>` with a finite mean
//!   and variance; quantiles come from the distribution's `inverse_cdf`.
//! - [`Discrete`] wraps any `DiscreteCDF<u64, f64>`; quantiles are computed
//!   by galloping plus bisection on the integer lattice so they are exact
//!   step-function inverses, `Q(p) = min{k : F(k) ≥ p}`.
//! - Both adapters cache `mean` and `std_dev` at construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every marginal is `Send + Sync`; matching fans out over pairs with
//!   rayon and shares marginals by reference.
//! - `std_dev() > 0` and `mean()` is finite for every adapter value.
//! - Discrete marginals live on the integer lattice. Their support may be
//!   unbounded above (`Max::max() == u64::MAX`).
//!
//! Conventions
//! -----------
//! - `quantile(0.0)` / `quantile(1.0)` return the support endpoints,
//!   possibly infinite.
//! - Probabilities outside `[0, 1]` are clamped rather than rejected.
use crate::margins::errors::{MarginError, MarginResult};
use statrs::distribution::{ContinuousCDF, DiscreteCDF};
use statrs::statistics::Distribution;

/// Marginal — a univariate distribution usable as a NORTA target.
///
/// Required methods
/// ----------------
/// - `quantile(p)`: inverse CDF on `[0, 1]`.
/// - `cdf(x)`: distribution function.
/// - `is_discrete()`: selects the coefficient formula in matching.
/// - `mean()`, `std_dev()`: standardize covariances into correlations.
///
/// Provided methods
/// ----------------
/// - `support()`: `(quantile(0), quantile(1))`.
pub trait Marginal: Send + Sync {
    fn quantile(&self, p: f64) -> f64;
    fn cdf(&self, x: f64) -> f64;
    fn is_discrete(&self) -> bool;
    fn mean(&self) -> f64;
    fn std_dev(&self) -> f64;

    fn support(&self) -> (f64, f64) {
        (self.quantile(0.0), self.quantile(1.0))
    }
}

/// Continuous — adapter for `statrs` continuous distributions.
///
/// Construct with [`Continuous::new`], which rejects distributions without
/// a finite mean and positive finite standard deviation.
#[derive(Debug, Clone)]
pub struct Continuous<D> {
    dist: D,
    mean: f64,
    std_dev: f64,
}

impl<D> Continuous<D>
where
    D: ContinuousCDF<f64, f64> + Distribution<f64>,
{
    /// Wrap `dist`, validating its moments.
    ///
    /// # Errors
    /// - [`MarginError::MissingMoment`] if `statrs` reports no mean or variance.
    /// - [`MarginError::NonFiniteMean`] / [`MarginError::InvalidStdDev`] for
    ///   unusable moments.
    pub fn new(dist: D) -> MarginResult<Self> {
        let mean = dist.mean().ok_or(MarginError::MissingMoment { what: "mean" })?;
        let std_dev =
            dist.std_dev().ok_or(MarginError::MissingMoment { what: "standard deviation" })?;
        validate_moments(mean, std_dev)?;
        Ok(Self { dist, mean, std_dev })
    }

    pub fn inner(&self) -> &D {
        &self.dist
    }
}

impl<D> Marginal for Continuous<D>
where
    D: ContinuousCDF<f64, f64> + Send + Sync,
{
    fn quantile(&self, p: f64) -> f64 {
        self.dist.inverse_cdf(p.clamp(0.0, 1.0))
    }

    fn cdf(&self, x: f64) -> f64 {
        self.dist.cdf(x)
    }

    fn is_discrete(&self) -> bool {
        false
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

/// Discrete — adapter for `statrs` distributions on the non-negative integers.
#[derive(Debug, Clone)]
pub struct Discrete<D> {
    dist: D,
    mean: f64,
    std_dev: f64,
}

impl<D> Discrete<D>
where
    D: DiscreteCDF<u64, f64> + Distribution<f64>,
{
    /// Wrap `dist`, validating its moments.
    ///
    /// # Errors
    /// - Same as [`Continuous::new`]. A point mass (zero variance) is rejected
    ///   with [`MarginError::InvalidStdDev`].
    pub fn new(dist: D) -> MarginResult<Self> {
        let mean = dist.mean().ok_or(MarginError::MissingMoment { what: "mean" })?;
        let std_dev =
            dist.std_dev().ok_or(MarginError::MissingMoment { what: "standard deviation" })?;
        validate_moments(mean, std_dev)?;
        Ok(Self { dist, mean, std_dev })
    }

    pub fn inner(&self) -> &D {
        &self.dist
    }
}

impl<D> Discrete<D>
where
    D: DiscreteCDF<u64, f64>,
{
    /// Smallest `k` in `[min, max]` with `F(k) ≥ p`.
    fn lattice_quantile(&self, p: f64) -> u64 {
        let lo_bound = self.dist.min();
        let hi_bound = self.dist.max();
        if self.dist.cdf(lo_bound) >= p {
            return lo_bound;
        }
        // Gallop until F(hi) ≥ p, keeping F(lo) < p.
        let mut lo = lo_bound;
        let mut step: u64 = 1;
        let mut hi = lo_bound.saturating_add(step).min(hi_bound);
        while hi < hi_bound && self.dist.cdf(hi) < p {
            lo = hi;
            step = step.saturating_mul(2);
            hi = lo.saturating_add(step).min(hi_bound);
        }
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.dist.cdf(mid) >= p {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        hi
    }
}

impl<D> Marginal for Discrete<D>
where
    D: DiscreteCDF<u64, f64> + Send + Sync,
{
    fn quantile(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        if p >= 1.0 {
            let hi = self.dist.max();
            return if hi == u64::MAX { f64::INFINITY } else { hi as f64 };
        }
        if p <= 0.0 {
            return self.dist.min() as f64;
        }
        self.lattice_quantile(p) as f64
    }

    fn cdf(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if x < self.dist.min() as f64 {
            return 0.0;
        }
        if x >= self.dist.max() as f64 {
            return 1.0;
        }
        self.dist.cdf(x.floor() as u64)
    }

    fn is_discrete(&self) -> bool {
        true
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

fn validate_moments(mean: f64, std_dev: f64) -> MarginResult<()> {
    if !mean.is_finite() {
        return Err(MarginError::NonFiniteMean { value: mean });
    }
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return Err(MarginError::InvalidStdDev {
            value: std_dev,
            reason: "Must be positive and finite.",
        });
    }
    Ok(())
}
