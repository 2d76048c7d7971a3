//! simulation::errors — failures of building or sampling a NORTA
//! distribution.
//!
//! Purpose
//! -------
//! Collect the errors of every stage the assembly layer drives (matching,
//! conversion, repair) under one [`SimError`], so callers can use `?` on the
//! whole pipeline.

use crate::correlation::errors::CorrelationError;
use crate::margins::errors::MarginError;
use crate::nearest::errors::NearestError;
use crate::pearson::errors::PearsonError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SimResult<T> = Result<T, SimError>;

/// SimError — errors of the simulation layer.
///
/// Variants
/// --------
/// - `EmptyMargins`
///   No marginals were supplied.
/// - `DimensionMismatch { expected, found }`
///   The correlation matrix is not `d × d` for `d` marginals.
/// - `InvalidCorrelation { value, reason }`
///   The latent matrix handed to `rvec` has a diagonal entry away from `1`
///   or a negative eigenvalue; `value` is the offending entry or `λ_min`.
/// - `Pearson`, `Nearest`, `Correlation`, `Margin`
///   Wrapped failures of the corresponding stage.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    // ---- Input validation ----
    EmptyMargins,
    DimensionMismatch { expected: usize, found: (usize, usize) },
    InvalidCorrelation { value: f64, reason: &'static str },

    // ---- Wrapped ----
    Pearson(PearsonError),
    Nearest(NearestError),
    Correlation(CorrelationError),
    Margin(MarginError),
}

impl std::error::Error for SimError {}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::EmptyMargins => write!(f, "At least one marginal distribution is required."),
            SimError::DimensionMismatch { expected, found } => write!(
                f,
                "Correlation matrix must be {expected}x{expected}; found {}x{}.",
                found.0, found.1
            ),
            SimError::InvalidCorrelation { value, reason } => {
                write!(f, "Invalid latent correlation matrix ({value}): {reason}")
            }
            SimError::Pearson(err) => write!(f, "{err}"),
            SimError::Nearest(err) => write!(f, "{err}"),
            SimError::Correlation(err) => write!(f, "{err}"),
            SimError::Margin(err) => write!(f, "{err}"),
        }
    }
}

impl From<PearsonError> for SimError {
    fn from(err: PearsonError) -> Self {
        SimError::Pearson(err)
    }
}

impl From<NearestError> for SimError {
    fn from(err: NearestError) -> Self {
        SimError::Nearest(err)
    }
}

impl From<CorrelationError> for SimError {
    fn from(err: CorrelationError) -> Self {
        SimError::Correlation(err)
    }
}

impl From<MarginError> for SimError {
    fn from(err: MarginError) -> Self {
        SimError::Margin(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<SimError> for PyErr {
    fn from(err: SimError) -> PyErr {
        PyValueError::new_err(format!("SimError: {err}"))
    }
}
