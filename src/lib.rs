//! rust_mvsim — NORTA simulation of correlated random vectors with arbitrary
//! marginals, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the correlation utilities to Python via the `_rust_mvsim`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing classes, functions and submodules.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules as the public crate surface:
//!   `hermite`, `margins`, `pearson` (matching and bounds), `nearest`
//!   (nearest correlation matrices and random generators), `correlation`
//!   (conversion and sample estimates) and `simulation` (NORTA sampling).
//! - Define `#[pyclass]` / `#[pyfunction]` wrappers and the `#[pymodule]`
//!   initializer for the `_rust_mvsim` Python extension, with submodules
//!   `correlation` and `nearest`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion and error mapping.
//! - Matrices cross the boundary as 2-D `float64` numpy arrays and are
//!   copied into owned `ndarray` buffers, so Python-side mutation never
//!   aliases Rust state.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyValueError` at the PyO3 boundary.
//! - Marginal distributions are Rust-only (`statrs` adapters); the Python
//!   surface covers the matrix-level routines.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends directly on the inner modules and can ignore
//!   the items guarded by the `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules, the
//!   end-to-end test in `tests/integration_norta_pipeline.rs` and property
//!   tests in `tests/prop_correlation.rs`.

pub mod correlation;
pub mod hermite;
pub mod margins;
pub mod nearest;
pub mod numerical_stability;
pub mod pearson;
pub mod simulation;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    correlation::convert::CorrelationType,
    nearest::newton::{NearestOutcome, cor_near_pd},
    utils::{
        build_rng, extract_cor_type, extract_f64_matrix, extract_near_pd_opts,
        extract_near_psd_opts,
    },
};

/// NearestPD — Python-facing wrapper for the semismooth Newton repair.
///
/// Purpose
/// -------
/// Run [`cor_near_pd`] on a Python matrix and expose the repaired matrix
/// together with the convergence diagnostics of [`NearestOutcome`].
///
/// Parameters
/// ----------
/// Constructed from Python via `NearestPD(data, tau=None, ...)`:
/// - `data`: `&PyAny`
///   Square symmetric 2-D array-like of `float64`.
/// - `tau`, `outer_iters`, `inner_iters`, `cg_iters`, `outer_tol`, `cg_tol`,
///   `newton_tol`: optional engine settings; `None` keeps the defaults of
///   `NearestPDOptions`.
///
/// Notes
/// -----
/// - Non-convergence is reported through `converged` / `status`, never as
///   an exception.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_mvsim.nearest")]
pub struct NearestPD {
    inner: NearestOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl NearestPD {
    #[new]
    #[pyo3(
        signature = (
            data,
            tau = None,
            outer_iters = None,
            inner_iters = None,
            cg_iters = None,
            outer_tol = None,
            cg_tol = None,
            newton_tol = None,
        ),
        text_signature = "(data, /, tau=None, outer_iters=None, inner_iters=None, \
                          cg_iters=None, outer_tol=None, cg_tol=None, newton_tol=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        data: &Bound<'py, PyAny>, tau: Option<f64>, outer_iters: Option<usize>,
        inner_iters: Option<usize>, cg_iters: Option<usize>, outer_tol: Option<f64>,
        cg_tol: Option<f64>, newton_tol: Option<f64>,
    ) -> PyResult<Self> {
        let r = extract_f64_matrix(data)?;
        let opts = extract_near_pd_opts(
            tau,
            outer_iters,
            inner_iters,
            cg_iters,
            outer_tol,
            cg_tol,
            newton_tol,
        )?;
        let inner = cor_near_pd(&r, &opts)?;
        Ok(NearestPD { inner })
    }

    #[getter]
    pub fn matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.matrix.clone().into_pyarray(py)
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn fn_evals(&self) -> usize {
        self.inner.fn_evals
    }

    #[getter]
    pub fn residual(&self) -> f64 {
        self.inner.residual
    }

    #[getter]
    pub fn gap(&self) -> f64 {
        self.inner.gap
    }
}

/// Sample correlation matrix of an `n × d` array (`method` is `"pearson"`,
/// `"spearman"` or `"kendall"`).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cor", signature = (data, method = None), text_signature = "(data, /, method=None)")]
fn py_cor<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, method: Option<&str>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let x = extract_f64_matrix(data)?;
    let out = correlation::sample::cor(&x, extract_cor_type(method)?)?;
    Ok(out.into_pyarray(py))
}

/// Convert a coefficient between correlation types.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cor_convert", signature = (rho, from_type, to_type), text_signature = "(rho, from_type, to_type, /)")]
fn py_cor_convert(rho: f64, from_type: &str, to_type: &str) -> PyResult<f64> {
    let from = from_type.parse::<CorrelationType>()?;
    let to = to_type.parse::<CorrelationType>()?;
    Ok(correlation::convert::cor_convert(rho, from, to)?)
}

/// Nearest PSD correlation matrix by alternating projections.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cor_near_psd", signature = (data, n_iter = None, tol = None), text_signature = "(data, /, n_iter=None, tol=None)")]
fn py_cor_near_psd<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, n_iter: Option<usize>, tol: Option<f64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let a = extract_f64_matrix(data)?;
    let opts = extract_near_psd_opts(n_iter, tol)?;
    Ok(nearest::near_psd::cor_near_psd(&a, &opts)?.into_pyarray(py))
}

/// Random positive definite correlation matrix (C-vine).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cor_rand_pd", signature = (d, alpha = 1.0, seed = None), text_signature = "(d, /, alpha=1.0, seed=None)")]
fn py_cor_rand_pd<'py>(
    py: Python<'py>, d: usize, alpha: f64, seed: Option<u64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let mut rng = build_rng(seed);
    Ok(nearest::random::cor_rand_pd(&mut rng, d, alpha)?.into_pyarray(py))
}

/// Random correlation matrix of rank at most `k` (defaults to `d`).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cor_rand_psd", signature = (d, k = None, seed = None), text_signature = "(d, /, k=None, seed=None)")]
fn py_cor_rand_psd<'py>(
    py: Python<'py>, d: usize, k: Option<usize>, seed: Option<u64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let mut rng = build_rng(seed);
    Ok(nearest::random::cor_rand_psd(&mut rng, d, k.unwrap_or(d))?.into_pyarray(py))
}

/// _rust_mvsim — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_mvsim` module, attach the `correlation` and `nearest`
/// submodules and register them in `sys.modules` so dotted imports work.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_mvsim<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let correlation_mod = PyModule::new(_py, "correlation")?;
    let nearest_mod = PyModule::new(_py, "nearest")?;
    correlation_module(_py, m, &correlation_mod)?;
    nearest_module(_py, m, &nearest_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_mvsim.correlation", correlation_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("rust_mvsim.nearest", nearest_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn correlation_module<'py>(
    _py: Python, rust_mvsim: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_cor, m)?)?;
    m.add_function(wrap_pyfunction!(py_cor_convert, m)?)?;
    rust_mvsim.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn nearest_module<'py>(
    _py: Python, rust_mvsim: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<NearestPD>()?;
    m.add_function(wrap_pyfunction!(py_cor_near_psd, m)?)?;
    m.add_function(wrap_pyfunction!(py_cor_rand_pd, m)?)?;
    m.add_function(wrap_pyfunction!(py_cor_rand_psd, m)?)?;
    rust_mvsim.add_submodule(m)?;
    Ok(())
}
