use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

/// JSON inn (samples, setup, cfg?) → rapport som JSON-streng.
#[pyfunction]
#[pyo3(signature = (samples_json, setup_json, cfg_json=None))]
fn analyze_session_json(samples_json: &str, setup_json: &str, cfg_json: Option<&str>) -> PyResult<String> {
    crate::analyze_session_json(samples_json, setup_json, cfg_json)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Samme som `analyze_session_json`, men returnerer en Python-dict via json.loads.
#[pyfunction]
#[pyo3(signature = (samples_json, setup_json, cfg_json=None))]
fn analyze_session_dict(
    py: Python<'_>,
    samples_json: &str,
    setup_json: &str,
    cfg_json: Option<&str>,
) -> PyResult<PyObject> {
    let out = crate::analyze_session_json(samples_json, setup_json, cfg_json)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    // unngår pyo3 serde-feature
    let json_mod = py
        .import("json")
        .map_err(|e| PyValueError::new_err(format!("failed to import json: {e}")))?;
    let obj = json_mod
        .call_method1("loads", (out.as_str(),))
        .map_err(|e| PyValueError::new_err(format!("internal JSON parse error via json.loads: {e}")))?;
    Ok(obj.into_py(py))
}

#[pymodule]
fn cornergraph_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_session_json, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_session_dict, m)?)?;
    Ok(())
}
