use serde::{Deserialize, Serialize};

use crate::metrics::format_duration;
use crate::models::ElevationSample;

/// Estimat mot tidsgrense: enten innenfor (med margin) eller over (med manko).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LimitVerdict {
    Within { margin_hours: f64 },
    Exceeds { shortfall_hours: f64 },
}

impl LimitVerdict {
    /// `estimate <= limit` regnes som innenfor.
    pub fn from_hours(estimate_hours: f64, limit_hours: f64) -> Self {
        if estimate_hours <= limit_hours {
            LimitVerdict::Within { margin_hours: limit_hours - estimate_hours }
        } else {
            LimitVerdict::Exceeds { shortfall_hours: estimate_hours - limit_hours }
        }
    }

    pub fn is_within(&self) -> bool {
        matches!(self, LimitVerdict::Within { .. })
    }

    pub fn label(&self) -> String {
        match self {
            LimitVerdict::Within { margin_hours } => {
                format!("Cumplirías con {} de margen", format_duration(*margin_hours))
            }
            LimitVerdict::Exceeds { shortfall_hours } => {
                format!("Te faltarían {}", format_duration(*shortfall_hours))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEstimate {
    pub stage: String,
    pub distance_km: f64,
    pub estimated_hours: f64,
    pub estimated_label: String,
    pub limit_hours: f64,
    pub limit_label: String,
    pub calories: i64,
    pub verdict: LimitVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacePlan {
    pub pace_min_per_km: f64,
    pub weight_kg: f64,
    pub stages: Vec<StageEstimate>,
    pub total_hours: f64,
    pub total_label: String,
    pub total_calories: i64,
}

impl PacePlan {
    pub fn all_within_limit(&self) -> bool {
        self.stages.iter().all(|s| s.verdict.is_within())
    }
}

/// Hva som kreves for å nå en måltid på én etappe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCheck {
    pub stage: String,
    pub target_hours: f64,
    pub target_label: String,
    pub required_pace_min_per_km: f64,
    pub limit_pace_min_per_km: f64,
    pub within_pace_limit: bool,
    pub limit_hours: f64,
    pub verdict: LimitVerdict,
}

/// Beregnet ankomst til en væskestasjon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationEta {
    pub name: String,
    pub distance_km: f64,
    pub segment_km: f64, // fra forrige stasjon (eller start)
    pub elapsed_hours: f64,
    pub elapsed_label: String,
    pub altitude_m: f64,
    pub solid_food: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationMarker {
    pub name: String,
    pub distance_km: f64,
    pub altitude_m: f64,
}

/// Grafdata for én etappe: profilpunkter + markører for væskestasjoner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSeries {
    pub stage: String,
    pub points: Vec<ElevationSample>,
    pub markers: Vec<HydrationMarker>,
    pub min_altitude_m: f64,
    pub max_altitude_m: f64,
    pub summit: ElevationSample, // høyeste punkt, første ved likhet
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffortShare {
    pub stage: String,
    pub elevation_gain_m: f64,
    pub share_pct: f64,
}

/// Én rad i sammenligningstabellen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRow {
    pub name: String,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub intensity_m_per_km: f64,
    pub time_limit_label: String,
    pub hydration_count: usize,
}

/// Navnene fra en `StageComparison`, for serialisering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonNames {
    pub longest: String,
    pub most_climb: String,
    pub most_intense: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_boundary_counts_as_within() {
        let v = LimitVerdict::from_hours(7.75, 7.75);
        assert_eq!(v, LimitVerdict::Within { margin_hours: 0.0 });
        assert_eq!(v.label(), "Cumplirías con 0h 00min de margen");
    }

    #[test]
    fn verdict_serializes_with_status_tag() {
        let v = LimitVerdict::from_hours(9.0, 7.5);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json["status"], "exceeds");
        assert_eq!(json["shortfall_hours"], 1.5);
        assert_eq!(v.label(), "Te faltarían 1h 30min");
    }
}
