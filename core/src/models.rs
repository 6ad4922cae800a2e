use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};

/// Toleranse for "første punkt på km 0" og "siste punkt på etappedistansen".
const KNOT_TOL_KM: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub distance_km: f64, // km fra start
    pub altitude_m: f64,  // meter over havet
}

impl ElevationSample {
    pub const fn new(distance_km: f64, altitude_m: f64) -> Self {
        Self { distance_km, altitude_m }
    }
}

impl From<(f64, f64)> for ElevationSample {
    fn from((distance_km, altitude_m): (f64, f64)) -> Self {
        Self::new(distance_km, altitude_m)
    }
}

/// Væskestasjon ("oasis") langs løypa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationPoint {
    pub name: String,
    pub distance_km: f64,
}

impl HydrationPoint {
    pub fn new(name: impl Into<String>, distance_km: f64) -> Self {
        Self { name: name.into(), distance_km }
    }
}

/// Rå etappepost slik den ligger på disk / i JSON. Ingen garantier før den
/// er konvertert til [`StageProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub name: String,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    #[serde(default)]
    pub start_label: String,
    #[serde(default)]
    pub end_label: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub hydration_points: Vec<HydrationPoint>,
    pub elevation_samples: Vec<ElevationSample>,
}

/// Validert etappe. Opprettes kun via [`StageProfile::new`] (eller serde, som
/// går gjennom samme validering), og endres aldri etterpå.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StageRecord", into = "StageRecord")]
pub struct StageProfile {
    name: String,
    distance_km: f64,
    elevation_gain_m: f64,
    start_label: String,
    end_label: String,
    notes: String,
    hydration_points: Vec<HydrationPoint>,
    elevation_samples: Vec<ElevationSample>,
}

/// Sjekker at en høydeprofil kan interpoleres: minst to punkter, endelige
/// verdier og strengt stigende distanse.
pub(crate) fn validate_samples(samples: &[ElevationSample]) -> MetricsResult<()> {
    if samples.len() < 2 {
        return Err(MetricsError::InvalidProfile(format!(
            "høydeprofilen må ha minst 2 punkter (fikk {})",
            samples.len()
        )));
    }
    for (i, s) in samples.iter().enumerate() {
        if !s.distance_km.is_finite() || !s.altitude_m.is_finite() {
            return Err(MetricsError::InvalidProfile(format!(
                "punkt {i} har ikke-endelig verdi"
            )));
        }
    }
    for (i, pair) in samples.windows(2).enumerate() {
        if pair[1].distance_km <= pair[0].distance_km {
            return Err(MetricsError::InvalidProfile(format!(
                "distanse er ikke strengt stigende ved punkt {} ({} km -> {} km)",
                i + 1,
                pair[0].distance_km,
                pair[1].distance_km
            )));
        }
    }
    Ok(())
}

impl StageProfile {
    pub fn new(record: StageRecord) -> MetricsResult<Self> {
        let StageRecord {
            name,
            distance_km,
            elevation_gain_m,
            start_label,
            end_label,
            notes,
            hydration_points,
            elevation_samples,
        } = record;

        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(MetricsError::InvalidProfile(format!(
                "{name}: distance_km må være > 0 (fikk {distance_km})"
            )));
        }
        if !elevation_gain_m.is_finite() || elevation_gain_m < 0.0 {
            return Err(MetricsError::InvalidProfile(format!(
                "{name}: elevation_gain_m kan ikke være negativ (fikk {elevation_gain_m})"
            )));
        }

        validate_samples(&elevation_samples)
            .map_err(|e| MetricsError::InvalidProfile(format!("{name}: {e}")))?;

        // validate_samples garanterer ≥ 2 punkter
        let first = elevation_samples[0].distance_km;
        let last = elevation_samples[elevation_samples.len() - 1].distance_km;
        if first.abs() > KNOT_TOL_KM {
            return Err(MetricsError::InvalidProfile(format!(
                "{name}: første høydepunkt må ligge på km 0 (fikk {first})"
            )));
        }
        if (last - distance_km).abs() > KNOT_TOL_KM {
            return Err(MetricsError::InvalidProfile(format!(
                "{name}: siste høydepunkt ({last} km) matcher ikke distansen ({distance_km} km)"
            )));
        }

        let mut prev: Option<f64> = None;
        for hp in &hydration_points {
            let km = hp.distance_km;
            if !km.is_finite() || km < first || km > last {
                return Err(MetricsError::InvalidProfile(format!(
                    "{name}: {} på km {km} ligger utenfor profilen [{first}, {last}]",
                    hp.name
                )));
            }
            if let Some(p) = prev {
                if km <= p {
                    return Err(MetricsError::InvalidProfile(format!(
                        "{name}: væskestasjoner må være strengt stigende ({} på km {km})",
                        hp.name
                    )));
                }
            }
            prev = Some(km);
        }

        Ok(Self {
            name,
            distance_km,
            elevation_gain_m,
            start_label,
            end_label,
            notes,
            hydration_points,
            elevation_samples,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn elevation_gain_m(&self) -> f64 {
        self.elevation_gain_m
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    pub fn end_label(&self) -> &str {
        &self.end_label
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn hydration_points(&self) -> &[HydrationPoint] {
        &self.hydration_points
    }

    pub fn hydration_count(&self) -> usize {
        self.hydration_points.len()
    }

    pub fn elevation_samples(&self) -> &[ElevationSample] {
        &self.elevation_samples
    }

    /// Høyeste punkt i profilen (km, moh). Ved likhet vinner første forekomst.
    pub fn highest_point(&self) -> ElevationSample {
        let mut best = self.elevation_samples[0];
        for s in &self.elevation_samples[1..] {
            if s.altitude_m > best.altitude_m {
                best = *s;
            }
        }
        best
    }
}

impl TryFrom<StageRecord> for StageProfile {
    type Error = MetricsError;

    fn try_from(record: StageRecord) -> Result<Self, Self::Error> {
        Self::new(record)
    }
}

impl From<StageProfile> for StageRecord {
    fn from(p: StageProfile) -> Self {
        Self {
            name: p.name,
            distance_km: p.distance_km,
            elevation_gain_m: p.elevation_gain_m,
            start_label: p.start_label,
            end_label: p.end_label,
            notes: p.notes,
            hydration_points: p.hydration_points,
            elevation_samples: p.elevation_samples,
        }
    }
}

/// Metadata for hele løpet (navn, sted, datoer, leirer, tidsgrense).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceEvent {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub camps: u32,
    pub time_limit_min_per_km: f64, // min/km
}

impl RaceEvent {
    /// Antall kalenderdager inkl. første og siste dag.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(samples: Vec<(f64, f64)>, distance_km: f64) -> StageRecord {
        StageRecord {
            name: "Test".into(),
            distance_km,
            elevation_gain_m: 100.0,
            start_label: "A".into(),
            end_label: "B".into(),
            notes: String::new(),
            hydration_points: vec![],
            elevation_samples: samples.into_iter().map(Into::into).collect(),
        }
    }

    #[test]
    fn accepts_minimal_profile() {
        let p = StageProfile::new(record(vec![(0.0, 100.0), (5.0, 200.0)], 5.0)).unwrap();
        assert_eq!(p.elevation_samples().len(), 2);
        assert_eq!(p.hydration_count(), 0);
    }

    #[test]
    fn rejects_single_sample() {
        let err = StageProfile::new(record(vec![(0.0, 100.0)], 5.0)).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidProfile(_)));
    }

    #[test]
    fn rejects_non_increasing_distance() {
        let err =
            StageProfile::new(record(vec![(0.0, 1.0), (2.0, 2.0), (2.0, 3.0), (5.0, 1.0)], 5.0))
                .unwrap_err();
        assert!(matches!(err, MetricsError::InvalidProfile(_)));
    }

    #[test]
    fn rejects_profile_not_covering_distance() {
        let err = StageProfile::new(record(vec![(0.0, 1.0), (4.0, 2.0)], 5.0)).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidProfile(_)));

        let err = StageProfile::new(record(vec![(1.0, 1.0), (5.0, 2.0)], 5.0)).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidProfile(_)));
    }

    #[test]
    fn rejects_zero_distance() {
        let err = StageProfile::new(record(vec![(0.0, 1.0), (0.0, 2.0)], 0.0)).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidProfile(_)));
    }

    #[test]
    fn rejects_hydration_outside_profile_or_unordered() {
        let mut r = record(vec![(0.0, 1.0), (10.0, 2.0)], 10.0);
        r.hydration_points = vec![HydrationPoint::new("X", 11.0)];
        assert!(StageProfile::new(r).is_err());

        let mut r = record(vec![(0.0, 1.0), (10.0, 2.0)], 10.0);
        r.hydration_points = vec![HydrationPoint::new("X", 6.0), HydrationPoint::new("Y", 3.0)];
        assert!(StageProfile::new(r).is_err());
    }

    #[test]
    fn serde_validates_on_load() {
        let bad = r#"{"name":"X","distance_km":3,"elevation_gain_m":10,
                      "elevation_samples":[{"distance_km":0,"altitude_m":1}]}"#;
        assert!(serde_json::from_str::<StageProfile>(bad).is_err());

        let good = r#"{"name":"X","distance_km":3,"elevation_gain_m":10,
                       "elevation_samples":[{"distance_km":0,"altitude_m":1},
                                            {"distance_km":3,"altitude_m":4}]}"#;
        let p: StageProfile = serde_json::from_str(good).unwrap();
        assert_eq!(p.distance_km(), 3.0);
        assert_eq!(p.start_label(), "");
    }

    #[test]
    fn highest_point_prefers_first_on_tie() {
        let p = StageProfile::new(record(
            vec![(0.0, 1.0), (1.0, 9.0), (2.0, 9.0), (3.0, 2.0)],
            3.0,
        ))
        .unwrap();
        assert_eq!(p.highest_point(), ElevationSample::new(1.0, 9.0));
    }
}
