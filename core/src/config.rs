use serde::{Deserialize, Serialize};

use crate::metrics::{DEFAULT_TIME_LIMIT_MIN_PER_KM, DEFAULT_WEIGHT_KG};
use crate::models::RaceEvent;

/// Plassholderen fra `.env`-malen; regnes som manglende nøkkel.
pub const API_KEY_PLACEHOLDER: &str = "tu-api-key-aqui";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub model: String,
    pub base_url: String,
    /// Navnet på miljøvariabelen som holder API-nøkkelen (nøkkelen lagres aldri i fil).
    pub api_key_env: String,
    pub temperature: f32,
    pub chat_max_tokens: u32,
    pub plan_max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.7,
            chat_max_tokens: 800,
            plan_max_tokens: 1500,
            timeout_secs: 30,
        }
    }
}

impl AdvisoryConfig {
    /// API-nøkkel fra miljøet; tom verdi eller plassholder gir `None`.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != API_KEY_PLACEHOLDER)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub time_limit_min_per_km: f64,
    pub default_weight_kg: f64,
    pub advisory: AdvisoryConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            time_limit_min_per_km: DEFAULT_TIME_LIMIT_MIN_PER_KM,
            default_weight_kg: DEFAULT_WEIGHT_KG,
            advisory: AdvisoryConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Default-konfig med løpets egen tidsgrense.
    pub fn for_event(event: &RaceEvent) -> Self {
        Self {
            time_limit_min_per_km: event.time_limit_min_per_km,
            ..Self::default()
        }
    }

    /// Overstyr fra miljøet (`ELCRUCE_*`). Ugyldige tall ignoreres med en advarsel.
    pub fn apply_env(mut self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok());
        self
    }

    fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("ELCRUCE_TIME_LIMIT_MIN_PER_KM") {
            match raw.trim().parse::<f64>() {
                Ok(v) if v > 0.0 => self.time_limit_min_per_km = v,
                _ => log::warn!("ignorerer ELCRUCE_TIME_LIMIT_MIN_PER_KM={raw:?} (ikke et positivt tall)"),
            }
        }
        if let Some(raw) = lookup("ELCRUCE_DEFAULT_WEIGHT_KG") {
            match raw.trim().parse::<f64>() {
                Ok(v) if v > 0.0 => self.default_weight_kg = v,
                _ => log::warn!("ignorerer ELCRUCE_DEFAULT_WEIGHT_KG={raw:?} (ikke et positivt tall)"),
            }
        }
        if let Some(model) = lookup("ELCRUCE_ADVISORY_MODEL") {
            self.advisory.model = model;
        }
        if let Some(url) = lookup("ELCRUCE_ADVISORY_BASE_URL") {
            self.advisory.base_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_race_rules() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.time_limit_min_per_km, 15.0);
        assert_eq!(cfg.default_weight_kg, 70.0);
        assert_eq!(cfg.advisory.model, "gpt-4o-mini");
        assert_eq!(cfg.advisory.chat_max_tokens, 800);
        assert_eq!(cfg.advisory.plan_max_tokens, 1500);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: AnalyzerConfig =
            serde_json::from_str(r#"{"time_limit_min_per_km": 14, "advisory": {"model": "x"}}"#).unwrap();
        assert_eq!(cfg.time_limit_min_per_km, 14.0);
        assert_eq!(cfg.default_weight_kg, 70.0);
        assert_eq!(cfg.advisory.model, "x");
        assert_eq!(cfg.advisory.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn env_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("ELCRUCE_TIME_LIMIT_MIN_PER_KM", "abc"),
            ("ELCRUCE_ADVISORY_MODEL", "gpt-4o"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AnalyzerConfig::default();
        cfg.apply_vars(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.time_limit_min_per_km, 15.0);
        assert_eq!(cfg.advisory.model, "gpt-4o");

        cfg.apply_vars(|k| (k == "ELCRUCE_TIME_LIMIT_MIN_PER_KM").then(|| "12.5".to_string()));
        assert_eq!(cfg.time_limit_min_per_km, 12.5);
    }

    #[test]
    fn event_limit_and_weight_override() {
        let mut event = crate::dataset::Dataset::builtin().unwrap().event().clone();
        event.time_limit_min_per_km = 13.0;
        let mut cfg = AnalyzerConfig::for_event(&event);
        assert_eq!(cfg.time_limit_min_per_km, 13.0);
        assert_eq!(cfg.default_weight_kg, 70.0);

        cfg.apply_vars(|k| (k == "ELCRUCE_DEFAULT_WEIGHT_KG").then(|| "62".to_string()));
        assert_eq!(cfg.default_weight_kg, 62.0);
        cfg.apply_vars(|k| (k == "ELCRUCE_DEFAULT_WEIGHT_KG").then(|| "-1".to_string()));
        assert_eq!(cfg.default_weight_kg, 62.0);
    }

    #[test]
    fn placeholder_key_counts_as_missing() {
        let cfg = AdvisoryConfig {
            api_key_env: "ELCRUCE_TEST_PLACEHOLDER_KEY".into(),
            ..Default::default()
        };
        std::env::set_var("ELCRUCE_TEST_PLACEHOLDER_KEY", API_KEY_PLACEHOLDER);
        assert_eq!(cfg.api_key(), None);
        std::env::set_var("ELCRUCE_TEST_PLACEHOLDER_KEY", " sk-test ");
        assert_eq!(cfg.api_key().as_deref(), Some("sk-test"));
        std::env::remove_var("ELCRUCE_TEST_PLACEHOLDER_KEY");
    }
}
