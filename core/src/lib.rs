pub mod advisory;
pub mod advisory_api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod models;
pub mod planner;
pub mod report;
pub mod storage;
pub mod telemetry;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use advisory::{
    Advisor, AdvisoryError, AdvisoryProvider, ChatMessage, CompletionRequest, Conversation,
    MessageRole, PlanRequest, StaticAdvisor,
};
pub use advisory_api::OpenAiClient;
pub use config::{AdvisoryConfig, AnalyzerConfig};
pub use dataset::{summarize, Dataset, DatasetSummary};
pub use error::{MetricsError, MetricsResult};
pub use metrics::{
    compare_stages, estimate_calories, format_duration, gain_per_km, intensity,
    interpolate_altitude, pace_for_target_time, stage_time_limit, time_for_pace, StageComparison,
};
pub use models::{ElevationSample, HydrationPoint, RaceEvent, StageProfile, StageRecord};
pub use planner::{
    configured_pace_plan, effort_distribution, hydration_plan, pace_plan, profile_series,
    stage_estimate, target_check,
};
pub use report::{comparison_rows, render_stage_report};
pub use storage::{load_config, load_dataset, save_config, save_dataset};
pub use types::{LimitVerdict, PacePlan, StageEstimate, StageRow, TargetCheck};
