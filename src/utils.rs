//! utils — conversions at the Python boundary.
//!
//! Accept NumPy arrays, pandas objects, or plain sequences and hand back
//! contiguous `ndarray` buffers for the core modules.

#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

/// Owned 1-D copy of an array-like of floats (ndarray, Series, or plain
/// sequence).
///
/// Errors
/// ------
/// - `TypeError` when the object is none of the accepted shapes.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    if let Ok(column) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(column.as_array().to_owned());
    }
    if let Ok(column) = raw_data
        .call_method0("to_numpy")
        .and_then(|obj| obj.extract::<PyReadonlyArray1<f64>>())
    {
        return Ok(column.as_array().to_owned());
    }
    let values: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or float64 sequence")
    })?;
    Ok(Array1::from(values))
}

/// Owned 2-D copy of a matrix-like of floats (ndarray, DataFrame, or nested
/// sequences).
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
        PyTypeError::new_err("expected a 2-D numpy.ndarray, pandas.DataFrame, or nested float64 sequences")
    })?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(PyTypeError::new_err("matrix rows must all have the same length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let n_rows = if n_cols == 0 { 0 } else { flat.len() / n_cols };
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|err| PyTypeError::new_err(err.to_string()))
}
