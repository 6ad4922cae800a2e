use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json as json;
use serde_path_to_error as spte;

use crate::config::AnalyzerConfig;
use crate::dataset::{summarize, Dataset};
use crate::models::{ElevationSample, StageProfile};

// ──────────────────────────────────────────────────────────────────────────────
// INPUT-REPR (untagged): høydepunkt som objekt eller [km, moh]-par
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleIn {
    Object {
        #[serde(alias = "km")]
        distance_km: f64,
        #[serde(alias = "alt", alias = "altitude")]
        altitude_m: f64,
    },
    Pair(f64, f64),
}

impl From<SampleIn> for ElevationSample {
    fn from(s: SampleIn) -> Self {
        match s {
            SampleIn::Object { distance_km, altitude_m } => ElevationSample::new(distance_km, altitude_m),
            SampleIn::Pair(km, alt) => ElevationSample::new(km, alt),
        }
    }
}

fn parse<T: DeserializeOwned>(what: &str, json_in: &str) -> PyResult<T> {
    let mut de = json::Deserializer::from_str(json_in);
    spte::deserialize(&mut de).map_err(|e| {
        let path = e.path().to_string();
        PyValueError::new_err(format!("parse error ({what}) at {path}: {}", e.into_inner()))
    })
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    json::to_string(value).map_err(|e| PyValueError::new_err(format!("serialize error: {e}")))
}

fn value_err(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Etapper fra JSON, eller det innebygde datasettet når `None`.
fn stages_or_builtin(stages_json: Option<&str>) -> PyResult<Vec<StageProfile>> {
    match stages_json {
        Some(s) => parse("stages", s),
        None => Ok(Dataset::builtin().map_err(value_err)?.stages().to_vec()),
    }
}

/// Tidsgrense fra det innebygde løpet og vekt fra konfig, overstyrt av `ELCRUCE_*`.
fn settings() -> PyResult<AnalyzerConfig> {
    let ds = Dataset::builtin().map_err(value_err)?;
    Ok(AnalyzerConfig::for_event(ds.event()).apply_env())
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-FUNKSJONER
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
fn interpolate_altitude_json(samples_json: &str, target_km: f64) -> PyResult<f64> {
    let raw: Vec<SampleIn> = parse("samples", samples_json)?;
    let samples: Vec<ElevationSample> = raw.into_iter().map(Into::into).collect();
    crate::metrics::interpolate_altitude(&samples, target_km).map_err(value_err)
}

#[pyfunction]
#[pyo3(signature = (stages_json=None))]
fn compare_stages_json(stages_json: Option<&str>) -> PyResult<String> {
    let stages = stages_or_builtin(stages_json)?;
    to_json(&crate::report::comparison_names(&stages).map_err(value_err)?)
}

#[pyfunction]
#[pyo3(signature = (stages_json=None, limit_min_per_km=None))]
fn comparison_rows_json(stages_json: Option<&str>, limit_min_per_km: Option<f64>) -> PyResult<String> {
    let stages = stages_or_builtin(stages_json)?;
    let limit = limit_min_per_km.unwrap_or(settings()?.time_limit_min_per_km);
    to_json(&crate::report::comparison_rows(&stages, Some(limit)).map_err(value_err)?)
}

#[pyfunction]
#[pyo3(signature = (pace_min_per_km, stages_json=None, weight_kg=None, limit_min_per_km=None))]
fn pace_plan_json(
    pace_min_per_km: f64,
    stages_json: Option<&str>,
    weight_kg: Option<f64>,
    limit_min_per_km: Option<f64>,
) -> PyResult<String> {
    let stages = stages_or_builtin(stages_json)?;
    let cfg = settings()?;
    let plan = crate::planner::pace_plan(
        &stages,
        pace_min_per_km,
        Some(weight_kg.unwrap_or(cfg.default_weight_kg)),
        Some(limit_min_per_km.unwrap_or(cfg.time_limit_min_per_km)),
    )
    .map_err(value_err)?;
    to_json(&plan)
}

#[pyfunction]
fn hydration_plan_json(stage_json: &str, pace_min_per_km: f64) -> PyResult<String> {
    let stage: StageProfile = parse("stage", stage_json)?;
    to_json(&crate::planner::hydration_plan(&stage, pace_min_per_km).map_err(value_err)?)
}

#[pyfunction]
fn profile_series_json(stage_json: &str) -> PyResult<String> {
    let stage: StageProfile = parse("stage", stage_json)?;
    to_json(&crate::planner::profile_series(&stage).map_err(value_err)?)
}

#[pyfunction]
#[pyo3(signature = (stages_json=None))]
fn dataset_summary_json(stages_json: Option<&str>) -> PyResult<String> {
    let stages = stages_or_builtin(stages_json)?;
    to_json(&summarize(&stages).map_err(value_err)?)
}

#[pyfunction]
fn builtin_dataset_json() -> PyResult<String> {
    to_json(Dataset::builtin().map_err(value_err)?)
}

#[pyfunction]
#[pyo3(name = "format_duration")]
fn py_format_duration(hours: f64) -> String {
    crate::metrics::format_duration(hours)
}

#[pyfunction]
#[pyo3(name = "estimate_calories", signature = (distance_km, elevation_gain_m, weight_kg=None))]
fn py_estimate_calories(distance_km: f64, elevation_gain_m: f64, weight_kg: Option<f64>) -> PyResult<i64> {
    let weight = weight_kg.unwrap_or(settings()?.default_weight_kg);
    Ok(crate::metrics::estimate_calories(distance_km, elevation_gain_m, Some(weight)))
}

#[pyfunction]
#[pyo3(signature = (stages_json=None))]
fn stage_context(stages_json: Option<&str>) -> PyResult<String> {
    let ds = Dataset::builtin().map_err(value_err)?;
    let stages = stages_or_builtin(stages_json)?;
    crate::advisory::stage_context(ds.event(), &stages).map_err(value_err)
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

#[pymodule]
fn elcruce_core(_py: Python, m: &PyModule) -> PyResult<()> {
    // Kjernen
    m.add_function(wrap_pyfunction!(interpolate_altitude_json, m)?)?;
    m.add_function(wrap_pyfunction!(compare_stages_json, m)?)?;
    m.add_function(wrap_pyfunction!(py_format_duration, m)?)?;
    m.add_function(wrap_pyfunction!(py_estimate_calories, m)?)?;

    // Sider i dashboardet
    m.add_function(wrap_pyfunction!(comparison_rows_json, m)?)?;
    m.add_function(wrap_pyfunction!(pace_plan_json, m)?)?;
    m.add_function(wrap_pyfunction!(hydration_plan_json, m)?)?;
    m.add_function(wrap_pyfunction!(profile_series_json, m)?)?;
    m.add_function(wrap_pyfunction!(dataset_summary_json, m)?)?;
    m.add_function(wrap_pyfunction!(builtin_dataset_json, m)?)?;

    // Rådgiver-kontekst
    m.add_function(wrap_pyfunction!(stage_context, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_accept_pairs_and_objects() {
        let raw: Vec<SampleIn> = parse(
            "samples",
            r#"[[0, 1000], {"km": 2, "alt": 1100}, {"distance_km": 4.0, "altitude_m": 1250.0}]"#,
        )
        .unwrap();
        let samples: Vec<ElevationSample> = raw.into_iter().map(Into::into).collect();
        assert_eq!(
            samples,
            vec![
                ElevationSample::new(0.0, 1000.0),
                ElevationSample::new(2.0, 1100.0),
                ElevationSample::new(4.0, 1250.0),
            ]
        );
        assert_eq!(crate::metrics::interpolate_altitude(&samples, 3.0).unwrap(), 1175.0);
    }

    #[test]
    fn malformed_samples_are_rejected() {
        assert!(parse::<Vec<SampleIn>>("samples", r#"[{"km": "x"}]"#).is_err());
    }

    #[test]
    fn builtin_is_used_without_stages() {
        assert_eq!(stages_or_builtin(None).unwrap().len(), 3);
    }
}
