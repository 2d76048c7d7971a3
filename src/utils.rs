#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use rand::{SeedableRng, rngs::StdRng};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray2;

#[cfg(feature = "python-bindings")]
use crate::{
    correlation::convert::CorrelationType,
    nearest::options::{NearPSDOptions, NearestPDOptions},
};

/// Copy a 2-D array-like (numpy array, pandas DataFrame, nested sequence)
/// into an owned `Array2<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64",
        )
    })?;
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err(format!(
            "row {i} has {} entries; expected {n_cols}",
            rows[i].len()
        )));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| PyValueError::new_err(format!("could not build matrix: {e}")))
}

#[cfg(feature = "python-bindings")]
pub fn extract_cor_type(name: Option<&str>) -> PyResult<CorrelationType> {
    match name {
        None => Ok(CorrelationType::Pearson),
        Some(s) => Ok(s.parse::<CorrelationType>()?),
    }
}

#[cfg(feature = "python-bindings")]
pub fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn extract_near_pd_opts(
    tau: Option<f64>, outer_iters: Option<usize>, inner_iters: Option<usize>,
    cg_iters: Option<usize>, outer_tol: Option<f64>, cg_tol: Option<f64>,
    newton_tol: Option<f64>,
) -> PyResult<NearestPDOptions> {
    let d = NearestPDOptions::default();
    Ok(NearestPDOptions::new(
        tau.unwrap_or(d.tau),
        outer_iters.unwrap_or(d.outer_iters),
        inner_iters.unwrap_or(d.inner_iters),
        cg_iters.unwrap_or(d.cg_iters),
        outer_tol.unwrap_or(d.outer_tol),
        cg_tol.unwrap_or(d.cg_tol),
        newton_tol.unwrap_or(d.newton_tol),
        d.perturbation,
    )?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_near_psd_opts(n_iter: Option<usize>, tol: Option<f64>) -> PyResult<NearPSDOptions> {
    let d = NearPSDOptions::default();
    Ok(NearPSDOptions::new(n_iter.unwrap_or(d.n_iter), tol.unwrap_or(d.tol))?)
}
