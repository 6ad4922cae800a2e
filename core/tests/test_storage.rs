use std::fs;
use std::path::PathBuf;

use elcruce_core::{load_config, load_dataset, save_config, save_dataset, AnalyzerConfig, Dataset};

fn tmp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("elcruce_{}_{name}", std::process::id()))
}

#[test]
fn dataset_survives_disk_round_trip() {
    let path = tmp_path("dataset.json");
    let ds = Dataset::builtin().unwrap();

    save_dataset(ds, &path).unwrap();
    let loaded = load_dataset(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(&loaded, ds);
    assert_eq!(loaded.summary(), ds.summary());
}

#[test]
fn config_round_trip_and_missing_file() {
    let path = tmp_path("config.json");
    let mut cfg = AnalyzerConfig::default();
    cfg.time_limit_min_per_km = 14.0;
    cfg.advisory.model = "llama3".into();

    save_config(&cfg, &path).unwrap();
    let loaded = load_config(&path).unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(loaded, cfg);

    let missing = load_config(tmp_path("finnes_ikke.json")).unwrap();
    assert_eq!(missing, AnalyzerConfig::default());
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let path = tmp_path("partial.json");
    fs::write(&path, r#"{"time_limit_min_per_km": 12.5}"#).unwrap();
    let cfg = load_config(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(cfg.time_limit_min_per_km, 12.5);
    assert_eq!(cfg.default_weight_kg, 70.0);
    assert_eq!(cfg.advisory.chat_max_tokens, 800);
}

#[test]
fn invalid_dataset_reports_field_path() {
    let path = tmp_path("bad_dataset.json");
    let ds = Dataset::builtin().unwrap();
    let mut value = serde_json::to_value(ds).unwrap();
    value["stages"][1]["distance_km"] = serde_json::json!("langt");
    fs::write(&path, value.to_string()).unwrap();

    let err = load_dataset(&path).unwrap_err().to_string();
    fs::remove_file(&path).ok();
    assert!(err.contains("stages[1]"), "mangler feltsti: {err}");
}

#[test]
fn invariant_violation_is_rejected_on_load() {
    let path = tmp_path("unsorted.json");
    let ds = Dataset::builtin().unwrap();
    let mut value = serde_json::to_value(ds).unwrap();
    value["stages"][0]["elevation_samples"][2]["distance_km"] = serde_json::json!(0.5);
    fs::write(&path, value.to_string()).unwrap();

    let res = load_dataset(&path);
    fs::remove_file(&path).ok();
    assert!(res.is_err());
}
