use crate::config::SimulationConfig;
use crate::sim::simulate;
use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

fn to_py_err(e: impl std::fmt::Display) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

/// Runs a full simulation from a TOML configuration string and returns the
/// `(paths, cashflows, summary)` frames.
#[pyfunction]
#[pyo3(name = "simulate", signature = (config_toml, seed=None))]
pub fn simulate_py(
    config_toml: String,
    seed: Option<u64>,
) -> PyResult<(PyDataFrame, PyDataFrame, PyDataFrame)> {
    let mut config = SimulationConfig::from_toml_str(&config_toml).map_err(to_py_err)?;
    if seed.is_some() {
        config.simulation.seed = seed;
    }
    let output = simulate(&config).map_err(to_py_err)?;
    Ok((
        PyDataFrame(output.paths_dataframe().map_err(to_py_err)?),
        PyDataFrame(output.cashflows_dataframe().map_err(to_py_err)?),
        PyDataFrame(output.summary_dataframe().map_err(to_py_err)?),
    ))
}

#[pymodule]
fn irs_path_sim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_py, m)?)?;
    Ok(())
}
