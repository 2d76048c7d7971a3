//! correlation::errors — errors of correlation conversion and estimation.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type CorrelationResult<T> = Result<T, CorrelationError>;

/// CorrelationError — invalid inputs to conversion or sample estimation.
///
/// Variants
/// --------
/// - `InvalidType { name }`
///   Unknown correlation type name.
/// - `OutOfRange { value }`
///   Coefficient outside `[−1, 1]` or non-finite.
/// - `NotSquare { rows, cols }`
/// - `InsufficientData { observations }`
///   Fewer than two rows of data.
/// - `NonFinite { row, col, value }`
/// - `ZeroVariance { column }`
///   A column is constant, so no correlation is defined.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrelationError {
    InvalidType { name: String },
    OutOfRange { value: f64 },
    NotSquare { rows: usize, cols: usize },
    InsufficientData { observations: usize },
    NonFinite { row: usize, col: usize, value: f64 },
    ZeroVariance { column: usize },
}

impl std::error::Error for CorrelationError {}

impl std::fmt::Display for CorrelationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationError::InvalidType { name } => write!(
                f,
                "Invalid correlation type '{name}'. Valid options are case insensitive 'pearson', 'spearman' or 'kendall'."
            ),
            CorrelationError::OutOfRange { value } => {
                write!(f, "Correlation coefficient {value} is outside [-1, 1].")
            }
            CorrelationError::NotSquare { rows, cols } => {
                write!(f, "Correlation matrix must be square; found {rows}x{cols}.")
            }
            CorrelationError::InsufficientData { observations } => {
                write!(f, "Need at least 2 observations; found {observations}.")
            }
            CorrelationError::NonFinite { row, col, value } => {
                write!(f, "Data entry ({row}, {col}) is not finite: {value}.")
            }
            CorrelationError::ZeroVariance { column } => {
                write!(f, "Column {column} is constant; correlation is undefined.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<CorrelationError> for PyErr {
    fn from(err: CorrelationError) -> PyErr {
        PyValueError::new_err(format!("CorrelationError: {err}"))
    }
}
