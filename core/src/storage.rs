use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::dataset::Dataset;

/// JSON → T med feltsti i feilmeldingen (f.eks. `stages[1].elevation_samples`).
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("kunne ikke lese {}", path.display()))?;
    let mut de = serde_json::Deserializer::from_str(&contents);
    serde_path_to_error::deserialize(&mut de).map_err(|e| {
        let at = e.path().to_string();
        anyhow::anyhow!("{}: ugyldig JSON ved {at}: {}", path.display(), e.into_inner())
    })
}

/// Lagrer som JSON (pretty-print).
fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("kunne ikke skrive {}", path.display()))?;
    Ok(())
}

/// Leser inn et etappedatasett. Alle invarianter valideres under innlesing.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let ds: Dataset = read_json(path)?;
    log::info!(
        "📂 Datasett lastet fra {} ({} etapper)",
        path.display(),
        ds.stages().len()
    );
    Ok(ds)
}

pub fn save_dataset(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_json(dataset, path)?;
    log::info!(
        "✅ Datasett lagret til {} ({} etapper)",
        path.display(),
        dataset.stages().len()
    );
    Ok(())
}

/// Leser konfig fra disk. Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalyzerConfig> {
    let path = path.as_ref();
    if path.exists() {
        let cfg: AnalyzerConfig = read_json(path)?;
        log::info!(
            "📂 Konfig lastet fra {} (grense={} min/km)",
            path.display(),
            cfg.time_limit_min_per_km
        );
        Ok(cfg)
    } else {
        log::warn!(
            "⚠️ Fant ikke konfig på {}, returnerer default",
            path.display()
        );
        Ok(AnalyzerConfig::default())
    }
}

pub fn save_config(cfg: &AnalyzerConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_json(cfg, path)?;
    log::info!("✅ Konfig lagret til {}", path.display());
    Ok(())
}
