use elcruce_core::{
    configured_pace_plan, effort_distribution, pace_plan, stage_estimate, target_check,
    AnalyzerConfig, Dataset, LimitVerdict, MetricsError,
};

#[test]
fn pace_plan_at_ten_min_per_km() {
    let ds = Dataset::builtin().unwrap();
    let plan = pace_plan(ds.stages(), 10.0, None, None).unwrap();

    let labels: Vec<&str> = plan.stages.iter().map(|e| e.estimated_label.as_str()).collect();
    assert_eq!(labels, ["5h 10min", "5h 19min", "5h 00min"]);

    let limits: Vec<&str> = plan.stages.iter().map(|e| e.limit_label.as_str()).collect();
    assert_eq!(limits, ["7h 45min", "8h 00min", "7h 30min"]);

    let kcal: Vec<i64> = plan.stages.iter().map(|e| e.calories).collect();
    assert_eq!(kcal, [58170, 47740, 54600]);

    assert_eq!(plan.total_label, "15h 30min");
    assert_eq!(plan.total_calories, 160510);
    assert_eq!(plan.weight_kg, 70.0);
    assert!(plan.all_within_limit());
}

#[test]
fn slow_pace_exceeds_every_limit() {
    let ds = Dataset::builtin().unwrap();
    let plan = pace_plan(ds.stages(), 16.0, Some(70.0), None).unwrap();
    assert!(!plan.all_within_limit());
    for e in &plan.stages {
        assert!(matches!(e.verdict, LimitVerdict::Exceeds { .. }), "{}", e.stage);
        assert!(e.verdict.label().starts_with("Te faltarían "));
    }
}

#[test]
fn pace_exactly_at_limit_counts_as_within() {
    let ds = Dataset::builtin().unwrap();
    let e = stage_estimate(ds.stage(2).unwrap(), 15.0, None, None).unwrap();
    assert_eq!(e.verdict, LimitVerdict::Within { margin_hours: 0.0 });
    assert_eq!(e.verdict.label(), "Cumplirías con 0h 00min de margen");
}

#[test]
fn empty_plan_is_rejected() {
    assert!(matches!(
        pace_plan(&[], 10.0, None, None),
        Err(MetricsError::EmptyInput(_))
    ));
}

#[test]
fn target_time_checks() {
    let ds = Dataset::builtin().unwrap();
    let stage3 = ds.stage_by_name("Etapa 3").unwrap();

    let fast = target_check(stage3, 5.0, None).unwrap();
    assert!((fast.required_pace_min_per_km - 10.0).abs() < 1e-9);
    assert!(fast.within_pace_limit);
    assert!(fast.verdict.is_within());

    let slow = target_check(stage3, 8.0, None).unwrap();
    assert!((slow.required_pace_min_per_km - 16.0).abs() < 1e-9);
    assert!(!slow.within_pace_limit);
    assert!(!slow.verdict.is_within());
}

#[test]
fn effort_shares_cover_all_climbing() {
    let ds = Dataset::builtin().unwrap();
    let shares = effort_distribution(ds.stages()).unwrap();
    let sum: f64 = shares.iter().map(|s| s.share_pct).sum();
    assert!((sum - 100.0).abs() < 1e-9);
    assert!((shares[0].share_pct - 1600.0 / 4400.0 * 100.0).abs() < 1e-9);
}

#[test]
fn configured_weight_and_limit_are_used() {
    let ds = Dataset::builtin().unwrap();
    let mut cfg = AnalyzerConfig::for_event(ds.event());
    cfg.default_weight_kg = 80.0;
    cfg.time_limit_min_per_km = 12.0;

    let plan = configured_pace_plan(ds.stages(), 10.0, &cfg).unwrap();
    assert_eq!(plan.weight_kg, 80.0);
    let kcal: Vec<i64> = plan.stages.iter().map(|e| e.calories).collect();
    assert_eq!(kcal, [66480, 54560, 62400]);
    assert_eq!(plan.total_calories, 183440);
    // 30 km @ 12 min/km
    assert_eq!(plan.stages[2].limit_hours, 6.0);

    let default_plan = configured_pace_plan(ds.stages(), 10.0, &AnalyzerConfig::for_event(ds.event())).unwrap();
    assert_eq!(default_plan.total_calories, 160510);
}
