use crate::dataset::Dataset;
use crate::error::{MetricsError, MetricsResult};
use crate::metrics::{compare_stages, format_duration, intensity, stage_time_limit};
use crate::models::StageProfile;
use crate::types::{ComparisonNames, StageRow};

pub fn comparison_rows(
    stages: &[StageProfile],
    limit_min_per_km: Option<f64>,
) -> MetricsResult<Vec<StageRow>> {
    if stages.is_empty() {
        return Err(MetricsError::EmptyInput("ingen etapper å sammenligne"));
    }
    stages
        .iter()
        .map(|s| {
            Ok(StageRow {
                name: s.name().to_string(),
                distance_km: s.distance_km(),
                elevation_gain_m: s.elevation_gain_m(),
                intensity_m_per_km: intensity(s)?,
                time_limit_label: format_duration(stage_time_limit(s.distance_km(), limit_min_per_km)?),
                hydration_count: s.hydration_count(),
            })
        })
        .collect()
}

pub fn comparison_names(stages: &[StageProfile]) -> MetricsResult<ComparisonNames> {
    let c = compare_stages(stages)?;
    Ok(ComparisonNames {
        longest: c.longest.name().to_string(),
        most_climb: c.most_climb.name().to_string(),
        most_intense: c.most_intense.name().to_string(),
    })
}

/// Tekstrapport: sammendrag, tabell og de tre høydepunktene fra sammenligningen.
/// Uten `limit_min_per_km` brukes løpets egen tidsgrense.
pub fn render_stage_report(dataset: &Dataset, limit_min_per_km: Option<f64>) -> MetricsResult<String> {
    let event = dataset.event();
    let summary = dataset.summary();
    let limit = limit_min_per_km.unwrap_or(event.time_limit_min_per_km);
    let rows = comparison_rows(dataset.stages(), Some(limit))?;
    let cmp = compare_stages(dataset.stages())?;

    let mut out = format!("--- {} ---\n", event.name);
    out.push_str(&format!(
        "{} | {} – {}\n",
        event.location,
        event.start_date.format("%d.%m.%Y"),
        event.end_date.format("%d.%m.%Y")
    ));
    out.push_str(&format!(
        "{} etapas, {} km, +{} m, {} oasis\n\n",
        summary.stage_count,
        summary.total_distance_km,
        summary.total_elevation_gain_m,
        summary.hydration_point_count
    ));
    out.push_str(&format!(
        "{:<10} {:>8} {:>8} {:>8} {:>10} {:>6} {:>14}\n",
        "Etapa", "km", "D+ m", "m/km", "Límite", "Oasis", "Punto más alto"
    ));
    for (r, s) in rows.iter().zip(dataset.stages()) {
        let top = s.highest_point();
        out.push_str(&format!(
            "{:<10} {:>8.1} {:>8.0} {:>8.1} {:>10} {:>6} {:>14}\n",
            r.name,
            r.distance_km,
            r.elevation_gain_m,
            r.intensity_m_per_km,
            r.time_limit_label,
            r.hydration_count,
            format!("{} m (km {})", top.altitude_m, top.distance_km)
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "Más larga:     {} ({} km)\n",
        cmp.longest.name(),
        cmp.longest.distance_km()
    ));
    out.push_str(&format!(
        "Más desnivel:  {} (+{} m)\n",
        cmp.most_climb.name(),
        cmp.most_climb.elevation_gain_m()
    ));
    out.push_str(&format!(
        "Más intensa:   {} ({:.1} m/km)\n",
        cmp.most_intense.name(),
        intensity(cmp.most_intense)?
    ));

    Ok(out)
}
