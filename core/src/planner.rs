use crate::config::AnalyzerConfig;
use crate::error::{MetricsError, MetricsResult};
use crate::metrics::{
    estimate_calories, format_duration, interpolate_altitude, pace_for_target_time,
    stage_time_limit, time_for_pace, DEFAULT_TIME_LIMIT_MIN_PER_KM, DEFAULT_WEIGHT_KG,
};
use crate::models::StageProfile;
use crate::types::{
    EffortShare, HydrationEta, HydrationMarker, LimitVerdict, PacePlan, ProfileSeries,
    StageEstimate, TargetCheck,
};

/// Etter denne km-en anbefales fast føde på stasjonene.
pub const SOLID_FOOD_AFTER_KM: f64 = 15.0;

pub fn stage_estimate(
    stage: &StageProfile,
    pace_min_per_km: f64,
    weight_kg: Option<f64>,
    limit_min_per_km: Option<f64>,
) -> MetricsResult<StageEstimate> {
    let estimated_hours = time_for_pace(stage.distance_km(), pace_min_per_km);
    let limit_hours = stage_time_limit(stage.distance_km(), limit_min_per_km)?;
    Ok(StageEstimate {
        stage: stage.name().to_string(),
        distance_km: stage.distance_km(),
        estimated_hours,
        estimated_label: format_duration(estimated_hours),
        limit_hours,
        limit_label: format_duration(limit_hours),
        calories: estimate_calories(stage.distance_km(), stage.elevation_gain_m(), weight_kg),
        verdict: LimitVerdict::from_hours(estimated_hours, limit_hours),
    })
}

/// Tid, tidsgrense og kalorier per etappe ved fast pace, pluss totaler.
pub fn pace_plan(
    stages: &[StageProfile],
    pace_min_per_km: f64,
    weight_kg: Option<f64>,
    limit_min_per_km: Option<f64>,
) -> MetricsResult<PacePlan> {
    if stages.is_empty() {
        return Err(MetricsError::EmptyInput("ingen etapper å planlegge"));
    }
    let estimates = stages
        .iter()
        .map(|s| stage_estimate(s, pace_min_per_km, weight_kg, limit_min_per_km))
        .collect::<MetricsResult<Vec<_>>>()?;

    let total_hours: f64 = estimates.iter().map(|e| e.estimated_hours).sum();
    let total_calories: i64 = estimates.iter().map(|e| e.calories).sum();

    log::debug!(
        "pace_plan: {} etapper @ {pace_min_per_km} min/km -> {total_hours:.2} h",
        estimates.len()
    );

    Ok(PacePlan {
        pace_min_per_km,
        weight_kg: weight_kg.unwrap_or(DEFAULT_WEIGHT_KG),
        stages: estimates,
        total_hours,
        total_label: format_duration(total_hours),
        total_calories,
    })
}

/// Som [`pace_plan`], med vekt og tidsgrense fra konfig.
pub fn configured_pace_plan(
    stages: &[StageProfile],
    pace_min_per_km: f64,
    config: &AnalyzerConfig,
) -> MetricsResult<PacePlan> {
    pace_plan(
        stages,
        pace_min_per_km,
        Some(config.default_weight_kg),
        Some(config.time_limit_min_per_km),
    )
}

/// Nødvendig pace for en måltid, sjekket mot tidsgrensen.
pub fn target_check(
    stage: &StageProfile,
    target_hours: f64,
    limit_min_per_km: Option<f64>,
) -> MetricsResult<TargetCheck> {
    let limit_pace = limit_min_per_km.unwrap_or(DEFAULT_TIME_LIMIT_MIN_PER_KM);
    let required = pace_for_target_time(stage.distance_km(), target_hours)?;
    let limit_hours = stage_time_limit(stage.distance_km(), Some(limit_pace))?;
    Ok(TargetCheck {
        stage: stage.name().to_string(),
        target_hours,
        target_label: format_duration(target_hours),
        required_pace_min_per_km: required,
        limit_pace_min_per_km: limit_pace,
        within_pace_limit: required <= limit_pace,
        limit_hours,
        verdict: LimitVerdict::from_hours(target_hours, limit_hours),
    })
}

/// Ankomsttid til hver væskestasjon ved jevn pace.
pub fn hydration_plan(stage: &StageProfile, pace_min_per_km: f64) -> MetricsResult<Vec<HydrationEta>> {
    let mut out = Vec::with_capacity(stage.hydration_count());
    let mut prev_km = 0.0;
    let mut elapsed = 0.0;

    for hp in stage.hydration_points() {
        let segment_km = hp.distance_km - prev_km;
        elapsed += time_for_pace(segment_km, pace_min_per_km);
        out.push(HydrationEta {
            name: hp.name.clone(),
            distance_km: hp.distance_km,
            segment_km,
            elapsed_hours: elapsed,
            elapsed_label: format_duration(elapsed),
            altitude_m: interpolate_altitude(stage.elevation_samples(), hp.distance_km)?,
            solid_food: hp.distance_km > SOLID_FOOD_AFTER_KM,
        });
        prev_km = hp.distance_km;
    }

    Ok(out)
}

/// Andel (%) av samlede høydemeter per etappe.
pub fn effort_distribution(stages: &[StageProfile]) -> MetricsResult<Vec<EffortShare>> {
    if stages.is_empty() {
        return Err(MetricsError::EmptyInput("ingen etapper å fordele"));
    }
    let total: f64 = stages.iter().map(StageProfile::elevation_gain_m).sum();
    if total <= 0.0 {
        return Err(MetricsError::DivisionByZero("samlede høydemeter er 0"));
    }
    Ok(stages
        .iter()
        .map(|s| EffortShare {
            stage: s.name().to_string(),
            elevation_gain_m: s.elevation_gain_m(),
            share_pct: s.elevation_gain_m() / total * 100.0,
        })
        .collect())
}

/// Profilpunkter og stasjonsmarkører (interpolert høyde) for graf.
pub fn profile_series(stage: &StageProfile) -> MetricsResult<ProfileSeries> {
    let points = stage.elevation_samples().to_vec();
    let markers = stage
        .hydration_points()
        .iter()
        .map(|hp| {
            Ok(HydrationMarker {
                name: hp.name.clone(),
                distance_km: hp.distance_km,
                altitude_m: interpolate_altitude(&points, hp.distance_km)?,
            })
        })
        .collect::<MetricsResult<Vec<_>>>()?;

    let min_altitude_m = points.iter().map(|p| p.altitude_m).fold(f64::INFINITY, f64::min);
    let summit = stage.highest_point();

    Ok(ProfileSeries {
        stage: stage.name().to_string(),
        points,
        markers,
        min_altitude_m,
        max_altitude_m: summit.altitude_m,
        summit,
    })
}
