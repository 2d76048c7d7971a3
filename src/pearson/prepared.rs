//! pearson::prepared — per-marginal caches and pair-kind dispatch.
//!
//! Purpose
//! -------
//! Precompute everything a marginal contributes to a pairwise solve, once:
//! its moments and either its Hermite coefficients (continuous) or its
//! enumerated support with latent breakpoints (discrete). Pairs are then
//! dispatched on an explicit [`PairKind`] resolved from the two caches.
//!
//! Invariants & assumptions
//! ------------------------
//! - A [`PreparedMargin`] is immutable and `Send + Sync`; the matrix map
//!   shares one per marginal across all rayon workers.
//! - Continuous caches hold `degree + 1` coefficients unless the expansion
//!   was truncated (see `hermite::get_coefs`).
use crate::hermite::{GaussHermiteRule, HermiteCoefficients, get_coefs};
use crate::margins::{DiscreteSupport, Marginal};
use crate::pearson::errors::PearsonResult;

/// Expansion data cached for one marginal.
#[derive(Debug, Clone, PartialEq)]
pub enum MarginExpansion {
    Continuous(HermiteCoefficients),
    Discrete(DiscreteSupport),
}

/// PreparedMargin — moments plus cached expansion of one marginal.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMargin {
    mean: f64,
    std_dev: f64,
    expansion: MarginExpansion,
}

impl PreparedMargin {
    /// Prepare `marginal` for matching at expansion degree `degree`.
    ///
    /// # Errors
    /// - Hermite expansion errors for continuous marginals.
    /// - Support enumeration errors for discrete marginals.
    pub fn new(
        marginal: &dyn Marginal, degree: usize, rule: &GaussHermiteRule,
    ) -> PearsonResult<Self> {
        let expansion = if marginal.is_discrete() {
            MarginExpansion::Discrete(DiscreteSupport::new(marginal)?)
        } else {
            MarginExpansion::Continuous(get_coefs(marginal, degree, rule)?)
        };
        Ok(Self { mean: marginal.mean(), std_dev: marginal.std_dev(), expansion })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn expansion(&self) -> &MarginExpansion {
        &self.expansion
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self.expansion, MarginExpansion::Discrete(_))
    }
}

/// PairKind — which coefficient formula applies to a marginal pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    ContinuousContinuous,
    ContinuousDiscrete,
    DiscreteContinuous,
    DiscreteDiscrete,
}

impl PairKind {
    /// Resolve the kind of `(a, b)` from their cached expansions.
    pub fn of(a: &PreparedMargin, b: &PreparedMargin) -> Self {
        match (a.is_discrete(), b.is_discrete()) {
            (false, false) => PairKind::ContinuousContinuous,
            (false, true) => PairKind::ContinuousDiscrete,
            (true, false) => PairKind::DiscreteContinuous,
            (true, true) => PairKind::DiscreteDiscrete,
        }
    }
}
