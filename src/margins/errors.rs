//! margins::errors — construction and support-enumeration failures.
//!
//! Purpose
//! -------
//! Provide [`MarginError`] and [`MarginResult`] for the marginal adapters
//! and the discrete-support enumeration. These errors are raised before any
//! Hermite expansion or matching iteration starts, so a marginal that
//! cannot participate in moment matching is rejected at construction.
//!
//! Conventions
//! -----------
//! - Messages are phrased as domain constraints ("standard deviation must be
//!   positive and finite") rather than low-level details.
//! - With `python-bindings`, every variant maps to `PyValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type MarginResult<T> = Result<T, MarginError>;

/// MarginError — invalid marginal distributions.
///
/// Variants
/// --------
/// - `MissingMoment { what }`
///   The wrapped distribution does not report a mean or standard deviation
///   (e.g. Cauchy). Pearson matching requires both.
/// - `NonFiniteMean { value }` / `InvalidStdDev { value, reason }`
///   The reported moments cannot be used to standardize covariances.
/// - `InvalidSupport { lower, upper, reason }`
///   A discrete marginal's support could not be enumerated on the integer
///   lattice.
/// - `SupportTooLarge { points, limit }`
///   Enumerating the discrete support would exceed the hard cap.
/// - `DegenerateSupport`
///   All mass sits on a single point.
#[derive(Debug, Clone, PartialEq)]
pub enum MarginError {
    // ---- Moments ----
    MissingMoment { what: &'static str },
    NonFiniteMean { value: f64 },
    InvalidStdDev { value: f64, reason: &'static str },

    // ---- Discrete support ----
    InvalidSupport { lower: f64, upper: f64, reason: &'static str },
    SupportTooLarge { points: usize, limit: usize },
    DegenerateSupport,
}

impl std::error::Error for MarginError {}

impl std::fmt::Display for MarginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarginError::MissingMoment { what } => {
                write!(f, "Marginal does not report a finite {what}; Pearson matching needs it.")
            }
            MarginError::NonFiniteMean { value } => {
                write!(f, "Invalid marginal mean: {value}. Must be finite.")
            }
            MarginError::InvalidStdDev { value, reason } => {
                write!(f, "Invalid marginal standard deviation: {value}. {reason}")
            }
            MarginError::InvalidSupport { lower, upper, reason } => {
                write!(f, "Invalid discrete support [{lower}, {upper}]: {reason}")
            }
            MarginError::SupportTooLarge { points, limit } => {
                write!(f, "Discrete support has {points} points; at most {limit} are enumerated.")
            }
            MarginError::DegenerateSupport => {
                write!(f, "Discrete marginal puts all mass on a single point.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<MarginError> for PyErr {
    fn from(err: MarginError) -> PyErr {
        PyValueError::new_err(format!("MarginError: {err}"))
    }
}
