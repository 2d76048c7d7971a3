//! pearson::errors — infeasibility, degeneracy and input errors of Pearson matching.
//!
//! Purpose
//! -------
//! Provide [`PearsonError`] and [`PearsonResult`] for the moment-matching
//! solver, the bounds estimator and the pairwise matrix map. Failures of a
//! single pair carry the pair's identity when they surface through the
//! matrix map, so callers can decide per pair whether to abort or relax.
//!
//! Key behaviors
//! -------------
//! - `InfeasibleTarget` carries the target, the attainable bounds and an
//!   [`InfeasibleReason`] distinguishing "outside bounds", "no root" and
//!   "more than one root".
//! - `Pairwise` aggregates per-pair [`PairFailure`]s without flattening them.
//! - Errors from the Hermite and margin layers are wrapped via `From`.
//!
//! Conventions
//! -----------
//! - Non-convergence of the root solver within its iteration cap is not an
//!   error here: Brent's bracket always holds a root, so the best iterate is
//!   returned.
//! - With `python-bindings`, every variant maps to `PyValueError`.
use crate::hermite::HermiteError;
use crate::margins::MarginError;
use argmin::core::Error;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type PearsonResult<T> = Result<T, PearsonError>;

/// Why a target correlation could not be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfeasibleReason {
    /// Target lies outside `[G(−1), G(1)]`.
    OutOfBounds,
    /// No root of `G(ρ) − target` in `[−1, 1]`.
    NoRootInRange,
    /// More than one root: `G` is not monotone on `[−1, 1]`.
    NonMonotone,
}

impl std::fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfeasibleReason::OutOfBounds => write!(f, "target outside attainable bounds"),
            InfeasibleReason::NoRootInRange => write!(f, "no root in [-1, 1]"),
            InfeasibleReason::NonMonotone => {
                write!(f, "correlation polynomial is not monotone on [-1, 1]")
            }
        }
    }
}

/// One failed pair of the pairwise matrix map.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFailure {
    pub i: usize,
    pub j: usize,
    pub error: PearsonError,
}

/// PearsonError — failures of Pearson matching.
///
/// Variants
/// --------
/// - `InfeasibleTarget { target, lower, upper, reason }`
///   The target cannot be reached for this marginal pair.
/// - `NumericDegeneracy { reason }`
///   The correlation polynomial carries no information (all non-constant
///   coefficients vanish) or is non-finite.
/// - `InvalidTarget { value, reason }`, `InvalidDegree { degree, reason }`,
///   `InvalidQuadrature { nodes, reason }`, `InvalidTolerance { tol, reason }`,
///   `InvalidMaxIter { max_iter, reason }`,
///   `DimensionMismatch { expected, found }`,
///   `AsymmetricTarget { row, col, upper, lower }`, `InvalidPolicy { name }`
///   Input validation failures raised before any iteration.
/// - `Hermite(HermiteError)` / `Margin(MarginError)`
///   Failures from the expansion or support-enumeration layers.
/// - `Prepare { index, error }`
///   Preparing marginal `index` for the matrix map failed.
/// - `RootSolver { text }`
///   The root-solver backend reported an error.
/// - `Pairwise(Vec<PairFailure>)`
///   One or more pairs of a matrix map failed; each keeps its `(i, j)`.
#[derive(Debug, Clone, PartialEq)]
pub enum PearsonError {
    // ---- Infeasibility ----
    InfeasibleTarget { target: f64, lower: f64, upper: f64, reason: InfeasibleReason },

    // ---- Numerics ----
    NumericDegeneracy { reason: &'static str },

    // ---- Input validation ----
    InvalidTarget { value: f64, reason: &'static str },
    InvalidDegree { degree: usize, reason: &'static str },
    InvalidQuadrature { nodes: usize, reason: &'static str },
    InvalidTolerance { tol: f64, reason: &'static str },
    InvalidMaxIter { max_iter: u64, reason: &'static str },
    DimensionMismatch { expected: usize, found: (usize, usize) },
    AsymmetricTarget { row: usize, col: usize, upper: f64, lower: f64 },
    InvalidPolicy { name: String },

    // ---- Wrapped ----
    Hermite(HermiteError),
    Margin(MarginError),
    Prepare { index: usize, error: Box<PearsonError> },
    RootSolver { text: String },

    // ---- Pairwise ----
    Pairwise(Vec<PairFailure>),
}

impl std::error::Error for PearsonError {}

impl std::fmt::Display for PearsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PearsonError::InfeasibleTarget { target, lower, upper, reason } => write!(
                f,
                "Infeasible target correlation {target}: {reason} (attainable [{lower}, {upper}])."
            ),
            PearsonError::NumericDegeneracy { reason } => {
                write!(f, "Numerically degenerate correlation polynomial: {reason}")
            }
            PearsonError::InvalidTarget { value, reason } => {
                write!(f, "Invalid target correlation {value}: {reason}")
            }
            PearsonError::InvalidDegree { degree, reason } => {
                write!(f, "Invalid expansion degree {degree}: {reason}")
            }
            PearsonError::InvalidQuadrature { nodes, reason } => {
                write!(f, "Invalid quadrature node count {nodes}: {reason}")
            }
            PearsonError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid root tolerance {tol}: {reason}")
            }
            PearsonError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid root-solver iteration cap {max_iter}: {reason}")
            }
            PearsonError::DimensionMismatch { expected, found } => write!(
                f,
                "Target matrix must be {expected}x{expected}; found {}x{}.",
                found.0, found.1
            ),
            PearsonError::AsymmetricTarget { row, col, upper, lower } => write!(
                f,
                "Target matrix is not symmetric at ({row}, {col}): {upper} vs {lower}."
            ),
            PearsonError::InvalidPolicy { name } => write!(
                f,
                "Invalid bounds policy '{name}'. Valid options are case insensitive 'error' or 'clamp'."
            ),
            PearsonError::Hermite(err) => write!(f, "{err}"),
            PearsonError::Margin(err) => write!(f, "{err}"),
            PearsonError::Prepare { index, error } => {
                write!(f, "Could not prepare marginal {index}: {error}")
            }
            PearsonError::RootSolver { text } => write!(f, "Root solver failed: {text}"),
            PearsonError::Pairwise(failures) => {
                write!(f, "{} pair(s) failed:", failures.len())?;
                for failure in failures {
                    write!(f, " ({}, {}): {};", failure.i, failure.j, failure.error)?;
                }
                Ok(())
            }
        }
    }
}

impl From<HermiteError> for PearsonError {
    fn from(err: HermiteError) -> Self {
        PearsonError::Hermite(err)
    }
}

impl From<MarginError> for PearsonError {
    fn from(err: MarginError) -> Self {
        PearsonError::Margin(err)
    }
}

impl From<Error> for PearsonError {
    fn from(err: Error) -> Self {
        PearsonError::RootSolver { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PearsonError> for PyErr {
    fn from(err: PearsonError) -> PyErr {
        PyValueError::new_err(format!("PearsonError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` payload embedding, including pair identities inside
    //   `Pairwise`.
    // - `From` conversions from the lower layers.
    //
    // They intentionally DO NOT cover:
    // - When each variant is raised; see `matching` and `matrix`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pair identities must survive formatting of an aggregated failure.
    //
    // Given
    // -----
    // - A `Pairwise` error with failures at (0, 2) and (1, 3).
    //
    // Expect
    // ------
    // - The message names both pairs and the failure count.
    fn pairwise_display_names_each_pair() {
        // Arrange
        let infeasible = PearsonError::InfeasibleTarget {
            target: 0.9,
            lower: -0.6,
            upper: 0.7,
            reason: InfeasibleReason::OutOfBounds,
        };
        let err = PearsonError::Pairwise(vec![
            PairFailure { i: 0, j: 2, error: infeasible.clone() },
            PairFailure { i: 1, j: 3, error: PearsonError::NumericDegeneracy { reason: "flat" } },
        ]);

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("2 pair(s)"), "Got: {msg}");
        assert!(msg.contains("(0, 2)") && msg.contains("(1, 3)"), "Got: {msg}");
        assert!(msg.contains("0.9"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Lower-layer errors convert without losing their variant.
    //
    // Given
    // -----
    // - A `MarginError::DegenerateSupport`.
    //
    // Expect
    // ------
    // - `PearsonError::Margin(DegenerateSupport)`.
    fn margin_error_converts_into_pearson_error() {
        // Arrange
        let err = MarginError::DegenerateSupport;

        // Act
        let converted: PearsonError = err.into();

        // Assert
        assert_eq!(converted, PearsonError::Margin(MarginError::DegenerateSupport));
    }
}
