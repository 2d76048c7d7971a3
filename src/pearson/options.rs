//! pearson::options — configuration of the matching solver.
//!
//! Purpose
//! -------
//! Hold the validated knobs of Pearson matching: expansion degree,
//! Gauss–Hermite order, root-solver tolerance and iteration cap, and the
//! policy applied to targets outside the attainable bounds.
//!
//! Conventions
//! -----------
//! - Construct with [`MatchOptions::new`] (validates) or use
//!   `MatchOptions::default()`: degree 7, 100 nodes, `BoundsPolicy::Error`,
//!   tolerance 1e-13, 100 Brent iterations.
use crate::hermite::DEFAULT_QUADRATURE_NODES;
use crate::pearson::errors::{PearsonError, PearsonResult};
use std::str::FromStr;

/// Default Hermite expansion degree.
pub const DEFAULT_DEGREE: usize = 7;

/// What to do with a target outside `[G(−1), G(1)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Report `InfeasibleTarget`.
    #[default]
    Error,
    /// Clamp into the bounds and warn.
    Clamp,
}

impl FromStr for BoundsPolicy {
    type Err = PearsonError;

    /// Parse `"error"` or `"clamp"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(BoundsPolicy::Error),
            "clamp" => Ok(BoundsPolicy::Clamp),
            _ => Err(PearsonError::InvalidPolicy { name: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    pub degree: usize,
    pub quadrature_nodes: usize,
    pub bounds_policy: BoundsPolicy,
    pub root_tol: f64,
    pub max_iters: u64,
}

impl MatchOptions {
    /// Create validated matching options.
    ///
    /// # Rules
    /// - `degree ≥ 1`.
    /// - `quadrature_nodes ≥ degree + 1`.
    /// - `root_tol` finite and strictly positive.
    /// - `max_iters > 0`.
    ///
    /// # Errors
    /// - [`PearsonError::InvalidDegree`], [`PearsonError::InvalidQuadrature`],
    ///   [`PearsonError::InvalidTolerance`] or [`PearsonError::InvalidMaxIter`]
    ///   for the rule violated.
    pub fn new(
        degree: usize, quadrature_nodes: usize, bounds_policy: BoundsPolicy, root_tol: f64,
        max_iters: u64,
    ) -> PearsonResult<Self> {
        let opts = Self { degree, quadrature_nodes, bounds_policy, root_tol, max_iters };
        opts.validate()?;
        Ok(opts)
    }

    /// Check the invariants enforced by [`MatchOptions::new`]. Every matching
    /// entry point runs this, so struct-literal updates are caught too.
    pub fn validate(&self) -> PearsonResult<()> {
        let MatchOptions { degree, quadrature_nodes, root_tol, max_iters, .. } = *self;
        if degree == 0 {
            return Err(PearsonError::InvalidDegree {
                degree,
                reason: "degree must be at least 1",
            });
        }
        if quadrature_nodes < degree + 1 {
            return Err(PearsonError::InvalidQuadrature {
                nodes: quadrature_nodes,
                reason: "need at least degree + 1 nodes",
            });
        }
        if !root_tol.is_finite() || root_tol <= 0.0 {
            return Err(PearsonError::InvalidTolerance {
                tol: root_tol,
                reason: "must be finite and strictly positive",
            });
        }
        if max_iters == 0 {
            return Err(PearsonError::InvalidMaxIter {
                max_iter: max_iters,
                reason: "the root solver needs at least one iteration",
            });
        }
        Ok(())
    }

    /// Default options with a different degree.
    pub fn with_degree(degree: usize) -> PearsonResult<Self> {
        let base = Self::default();
        Self::new(
            degree,
            base.quadrature_nodes.max(degree + 1),
            base.bounds_policy,
            base.root_tol,
            base.max_iters,
        )
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            quadrature_nodes: DEFAULT_QUADRATURE_NODES,
            bounds_policy: BoundsPolicy::Error,
            root_tol: 1e-13,
            max_iters: 100,
        }
    }
}
