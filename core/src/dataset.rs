use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::metrics::DEFAULT_TIME_LIMIT_MIN_PER_KM;
use crate::models::{ElevationSample, HydrationPoint, RaceEvent, StageProfile, StageRecord};

/// Summer over alle etapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_distance_km: f64,
    pub total_elevation_gain_m: f64,
    pub stage_count: usize,
    pub hydration_point_count: usize,
}

fn totals(stages: &[StageProfile]) -> DatasetSummary {
    DatasetSummary {
        total_distance_km: stages.iter().map(StageProfile::distance_km).sum(),
        total_elevation_gain_m: stages.iter().map(StageProfile::elevation_gain_m).sum(),
        stage_count: stages.len(),
        hydration_point_count: stages.iter().map(StageProfile::hydration_count).sum(),
    }
}

pub fn summarize(stages: &[StageProfile]) -> MetricsResult<DatasetSummary> {
    if stages.is_empty() {
        return Err(MetricsError::EmptyInput("ingen etapper å summere"));
    }
    Ok(totals(stages))
}

/// Uforanderlig etappetabell + løpsmetadata. Bygges én gang ved oppstart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRecord")]
pub struct Dataset {
    event: RaceEvent,
    stages: Vec<StageProfile>,
}

#[derive(Debug, Deserialize)]
struct DatasetRecord {
    event: RaceEvent,
    stages: Vec<StageProfile>,
}

impl TryFrom<DatasetRecord> for Dataset {
    type Error = MetricsError;

    fn try_from(r: DatasetRecord) -> Result<Self, Self::Error> {
        Self::new(r.event, r.stages)
    }
}

impl Dataset {
    pub fn new(event: RaceEvent, stages: Vec<StageProfile>) -> MetricsResult<Self> {
        if stages.is_empty() {
            return Err(MetricsError::EmptyInput("datasettet må ha minst én etappe"));
        }
        Ok(Self { event, stages })
    }

    /// Prosessglobal tabell for El Cruce Saucony 2025 (validert ved første bruk).
    pub fn builtin() -> MetricsResult<&'static Dataset> {
        static BUILTIN: OnceCell<Dataset> = OnceCell::new();
        BUILTIN.get_or_try_init(el_cruce_2025)
    }

    pub fn event(&self) -> &RaceEvent {
        &self.event
    }

    pub fn stages(&self) -> &[StageProfile] {
        &self.stages
    }

    pub fn stage(&self, index: usize) -> Option<&StageProfile> {
        self.stages.get(index)
    }

    pub fn stage_by_name(&self, name: &str) -> Option<&StageProfile> {
        self.stages.iter().find(|s| s.name() == name)
    }

    /// Alltid definert: `Dataset::new` avviser tomme etappelister.
    pub fn summary(&self) -> DatasetSummary {
        totals(&self.stages)
    }
}

fn stage(
    name: &str,
    distance_km: f64,
    elevation_gain_m: f64,
    (start_label, end_label): (&str, &str),
    hydration: &[(&str, f64)],
    profile: &[(f64, f64)],
    notes: &str,
) -> MetricsResult<StageProfile> {
    StageProfile::new(StageRecord {
        name: name.to_string(),
        distance_km,
        elevation_gain_m,
        start_label: start_label.to_string(),
        end_label: end_label.to_string(),
        notes: notes.to_string(),
        hydration_points: hydration
            .iter()
            .map(|&(n, km)| HydrationPoint::new(n, km))
            .collect(),
        elevation_samples: profile.iter().copied().map(ElevationSample::from).collect(),
    })
}

fn date(y: i32, m: u32, d: u32) -> MetricsResult<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| MetricsError::InvalidInput(format!("ugyldig dato {y}-{m}-{d}")))
}

/// Offisielle høydeprofiler, lest av arrangørens publiserte kart.
fn el_cruce_2025() -> MetricsResult<Dataset> {
    let event = RaceEvent {
        name: "El Cruce Saucony 2025".into(),
        location: "Villa La Angostura, Neuquén, Argentina".into(),
        start_date: date(2025, 12, 1)?,
        end_date: date(2025, 12, 7)?,
        camps: 2,
        time_limit_min_per_km: DEFAULT_TIME_LIMIT_MIN_PER_KM,
    };

    let stages = vec![
        stage(
            "Etapa 1",
            31.0,
            1600.0,
            ("Largada en Olas", "Campamento 1"),
            &[("Oasis A", 7.0), ("Oasis B", 16.0), ("Oasis C", 23.0)],
            &[
                (0.0, 1000.0), (2.0, 1100.0), (4.0, 1250.0), (6.0, 1400.0), (8.0, 1550.0),
                (10.0, 1750.0), (12.0, 1800.0), (14.0, 1700.0), (16.0, 1600.0), (18.0, 1200.0),
                (20.0, 1100.0), (22.0, 1150.0), (24.0, 1200.0), (26.0, 1100.0), (28.0, 1050.0),
                (30.0, 1000.0), (31.0, 1000.0),
            ],
            "Etapa más técnica con ascenso fuerte hasta 1800m en los primeros 12km",
        )?,
        stage(
            "Etapa 2",
            32.0,
            1300.0,
            ("Campamento 1", "Campamento 2"),
            &[("Oasis D", 11.0), ("Oasis E", 23.0)],
            &[
                (0.0, 1000.0), (2.0, 1100.0), (4.0, 1200.0), (6.0, 1300.0), (8.0, 1250.0),
                (10.0, 1200.0), (12.0, 1300.0), (14.0, 1200.0), (16.0, 1100.0), (18.0, 1000.0),
                (20.0, 1100.0), (22.0, 1050.0), (24.0, 1000.0), (26.0, 1100.0), (28.0, 1050.0),
                (30.0, 1000.0), (32.0, 950.0),
            ],
            "Perfil ondulado con múltiples subidas y bajadas moderadas",
        )?,
        stage(
            "Etapa 3",
            30.0,
            1500.0,
            ("Largada 3 (Campamento 2)", "Centro Villa La Angostura"),
            &[("Oasis F", 5.0), ("Oasis G", 22.0)],
            &[
                (0.0, 1000.0), (2.0, 1100.0), (4.0, 1200.0), (6.0, 1300.0), (8.0, 1400.0),
                (10.0, 1500.0), (12.0, 1600.0), (14.0, 1700.0), (16.0, 1800.0), (18.0, 1650.0),
                (20.0, 1400.0), (22.0, 1200.0), (24.0, 1000.0), (26.0, 900.0), (28.0, 850.0),
                (30.0, 800.0),
            ],
            "Gran ascenso en la primera mitad hasta 1800m, luego descenso prolongado",
        )?,
    ];

    Dataset::new(event, stages)
}
