use ordered_float::OrderedFloat;

use crate::error::{MetricsError, MetricsResult};
use crate::models::{validate_samples, ElevationSample, StageProfile};

/// Standard tidsgrense for etapper (min/km).
pub const DEFAULT_TIME_LIMIT_MIN_PER_KM: f64 = 15.0;
/// Standard løpervekt for kaloriestimat (kg).
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

/// Kcal per km og kg løpervekt (flat energikostnad).
const KCAL_PER_KM_KG: f64 = 1.0;
/// Kcal per høydemeter og kg løpervekt.
const KCAL_PER_M_GAIN_KG: f64 = 0.5;

/// Lineær interpolasjon av høyde på `target_distance` (km).
///
/// Utenfor profilen returneres nærmeste endepunkt (ingen ekstrapolasjon).
/// Treffer `target_distance` et knutepunkt eksakt, returneres knutepunktets
/// høyde uten avrundingsdrift.
pub fn interpolate_altitude(samples: &[ElevationSample], target_distance: f64) -> MetricsResult<f64> {
    validate_samples(samples)?;
    if target_distance.is_nan() {
        return Err(MetricsError::InvalidInput("target_distance er NaN".into()));
    }

    let first = samples[0];
    let last = samples[samples.len() - 1];
    if target_distance <= first.distance_km {
        return Ok(first.altitude_m);
    }
    if target_distance >= last.distance_km {
        return Ok(last.altitude_m);
    }

    for pair in samples.windows(2) {
        let (s1, s2) = (pair[0], pair[1]);
        if s1.distance_km <= target_distance && target_distance <= s2.distance_km {
            if target_distance == s1.distance_km {
                return Ok(s1.altitude_m);
            }
            if target_distance == s2.distance_km {
                return Ok(s2.altitude_m);
            }
            let ratio = (target_distance - s1.distance_km) / (s2.distance_km - s1.distance_km);
            return Ok(s1.altitude_m + ratio * (s2.altitude_m - s1.altitude_m));
        }
    }

    // Uoppnåelig for en validert, strengt stigende profil
    Err(MetricsError::InvalidProfile(format!(
        "fant ikke segment for km {target_distance}"
    )))
}

/// Høydemeter per km gitt rå tall.
pub fn gain_per_km(elevation_gain_m: f64, distance_km: f64) -> MetricsResult<f64> {
    if distance_km <= 0.0 {
        return Err(MetricsError::DivisionByZero("distance_km må være > 0 for m/km"));
    }
    Ok(elevation_gain_m / distance_km)
}

/// Intensitet = høydemeter / km.
pub fn intensity(stage: &StageProfile) -> MetricsResult<f64> {
    gain_per_km(stage.elevation_gain_m(), stage.distance_km())
}

/// Tid (timer) for en distanse ved gitt pace (min/km). Ingen klamping.
pub fn time_for_pace(distance_km: f64, pace_min_per_km: f64) -> f64 {
    distance_km * pace_min_per_km / 60.0
}

/// Pace (min/km) som trengs for å nå `target_hours`.
pub fn pace_for_target_time(distance_km: f64, target_hours: f64) -> MetricsResult<f64> {
    if distance_km <= 0.0 {
        return Err(MetricsError::DivisionByZero("distance_km må være > 0 for pace"));
    }
    Ok(target_hours * 60.0 / distance_km)
}

/// Tidsgrense (timer) for en etappe. `None` gir 15 min/km.
pub fn stage_time_limit(distance_km: f64, limit_min_per_km: Option<f64>) -> MetricsResult<f64> {
    if distance_km <= 0.0 {
        return Err(MetricsError::DivisionByZero("distance_km må være > 0 for tidsgrense"));
    }
    Ok(time_for_pace(
        distance_km,
        limit_min_per_km.unwrap_or(DEFAULT_TIME_LIMIT_MIN_PER_KM),
    ))
}

/// Kaloriestimat for trailløp (kcal, avkuttet).
///
/// Heuristikk: `km * kg + høydemeter * kg * 0.5`.
pub fn estimate_calories(distance_km: f64, elevation_gain_m: f64, weight_kg: Option<f64>) -> i64 {
    let w = weight_kg.unwrap_or(DEFAULT_WEIGHT_KG);
    let base = distance_km * w * KCAL_PER_KM_KG;
    let climb = elevation_gain_m * w * KCAL_PER_M_GAIN_KG;
    (base + climb) as i64
}

/// Resultat av [`compare_stages`]: lengste etappe, flest høydemeter og
/// høyest intensitet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageComparison<'a> {
    pub longest: &'a StageProfile,
    pub most_climb: &'a StageProfile,
    pub most_intense: &'a StageProfile,
}

/// Lineært maks-søk; ved likhet vinner første etappe i input-rekkefølge.
fn first_max_by<'a, F>(stages: &'a [StageProfile], mut key: F) -> MetricsResult<&'a StageProfile>
where
    F: FnMut(&StageProfile) -> MetricsResult<f64>,
{
    let (head, rest) = stages
        .split_first()
        .ok_or(MetricsError::EmptyInput("ingen etapper å sammenligne"))?;
    let mut best = head;
    let mut best_key = OrderedFloat(key(head)?);
    for s in rest {
        let k = OrderedFloat(key(s)?);
        if k > best_key {
            best = s;
            best_key = k;
        }
    }
    Ok(best)
}

pub fn compare_stages(stages: &[StageProfile]) -> MetricsResult<StageComparison<'_>> {
    Ok(StageComparison {
        longest: first_max_by(stages, |s| Ok(s.distance_km()))?,
        most_climb: first_max_by(stages, |s| Ok(s.elevation_gain_m()))?,
        most_intense: first_max_by(stages, intensity)?,
    })
}

/// "Xh MMmin". Negative verdier er utenfor kontrakt.
pub fn format_duration(hours: f64) -> String {
    let h = hours.floor();
    let m = ((hours - h) * 60.0).floor();
    format!("{}h {:02}min", h as i64, m as i64)
}
