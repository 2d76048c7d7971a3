//! nearest::errors — input and option errors of the correlation-repair engines.
//!
//! Purpose
//! -------
//! Provide [`NearestError`] and [`NearestResult`] for the Newton engine,
//! the alternating-projection fallback and the random correlation
//! generators.
//!
//! Conventions
//! -----------
//! - Every variant is raised before iteration starts. Running out of
//!   iterations is reported through `NearestOutcome::converged`, never as an
//!   error.
//! - With `python-bindings`, every variant maps to `PyValueError`.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type NearestResult<T> = Result<T, NearestError>;

/// NearestError — invalid matrices and invalid engine options.
///
/// Variants
/// --------
/// - `EmptyMatrix`
///   A `0 × 0` input.
/// - `NotSquare { rows, cols }`
/// - `NotSymmetric { row, col, upper, lower }`
///   First asymmetric entry found, scanning the upper triangle row-wise.
/// - `NonFinite { row, col, value }`
/// - `InvalidTau { value, reason }`
///   Eigenvalue floor outside `[0, 1)`.
/// - `InvalidTolerance { name, value, reason }`
/// - `InvalidIterations { name, value, reason }`
/// - `InvalidDimension { dim, reason }`
///   Random generator asked for an empty matrix.
/// - `InvalidParameter { name, value, reason }`
///   Other scalar parameters, e.g. the C-vine `α` or the factor rank `k`.
#[derive(Debug, Clone, PartialEq)]
pub enum NearestError {
    // ---- Matrix validation ----
    EmptyMatrix,
    NotSquare { rows: usize, cols: usize },
    NotSymmetric { row: usize, col: usize, upper: f64, lower: f64 },
    NonFinite { row: usize, col: usize, value: f64 },

    // ---- Options ----
    InvalidTau { value: f64, reason: &'static str },
    InvalidTolerance { name: &'static str, value: f64, reason: &'static str },
    InvalidIterations { name: &'static str, value: usize, reason: &'static str },

    // ---- Generators ----
    InvalidDimension { dim: usize, reason: &'static str },
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },
}

impl std::error::Error for NearestError {}

impl std::fmt::Display for NearestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NearestError::EmptyMatrix => write!(f, "Matrix must be non-empty."),
            NearestError::NotSquare { rows, cols } => {
                write!(f, "Matrix must be square; found {rows}x{cols}.")
            }
            NearestError::NotSymmetric { row, col, upper, lower } => {
                write!(f, "Matrix is not symmetric at ({row}, {col}): {upper} vs {lower}.")
            }
            NearestError::NonFinite { row, col, value } => {
                write!(f, "Matrix entry ({row}, {col}) is not finite: {value}.")
            }
            NearestError::InvalidTau { value, reason } => {
                write!(f, "Invalid eigenvalue floor tau {value}: {reason}")
            }
            NearestError::InvalidTolerance { name, value, reason } => {
                write!(f, "Invalid tolerance {name} = {value}: {reason}")
            }
            NearestError::InvalidIterations { name, value, reason } => {
                write!(f, "Invalid iteration cap {name} = {value}: {reason}")
            }
            NearestError::InvalidDimension { dim, reason } => {
                write!(f, "Invalid matrix dimension {dim}: {reason}")
            }
            NearestError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid parameter {name} = {value}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<NearestError> for PyErr {
    fn from(err: NearestError) -> PyErr {
        PyValueError::new_err(format!("NearestError: {err}"))
    }
}
