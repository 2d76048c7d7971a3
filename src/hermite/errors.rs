//! hermite::errors — failures of the quadrature rule and the expansion.
//!
//! Conventions
//! -----------
//! - Invalid configuration (`InvalidNodeCount`) fails fast.
//! - `Degenerate` is raised only after degree degradation has been tried.
//! - With `python-bindings`, every variant maps to `PyValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type HermiteResult<T> = Result<T, HermiteError>;

/// HermiteError — quadrature and expansion failures.
///
/// Variants
/// --------
/// - `InvalidNodeCount { nodes, reason }`
///   The Gauss–Hermite order is zero or too small for the requested degree.
/// - `Degenerate { degree, reason }`
///   The expansion produced a non-finite coefficient at `degree ≤ 1`, so no
///   usable lower-degree expansion remains (e.g. a marginal without a finite
///   variance on the quadrature grid).
#[derive(Debug, Clone, PartialEq)]
pub enum HermiteError {
    InvalidNodeCount { nodes: usize, reason: &'static str },
    Degenerate { degree: usize, reason: &'static str },
}

impl std::error::Error for HermiteError {}

impl std::fmt::Display for HermiteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HermiteError::InvalidNodeCount { nodes, reason } => {
                write!(f, "Invalid Gauss-Hermite node count {nodes}: {reason}")
            }
            HermiteError::Degenerate { degree, reason } => {
                write!(f, "Hermite expansion degenerate at degree {degree}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<HermiteError> for PyErr {
    fn from(err: HermiteError) -> PyErr {
        PyValueError::new_err(format!("HermiteError: {err}"))
    }
}
