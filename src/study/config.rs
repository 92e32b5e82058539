use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryThresholds {
    /// Below this the interval is halved and the stage regresses.
    pub weak: f64,
    /// Above this the stage advances.
    pub advance: f64,
    /// Above this the interval is stretched.
    pub strong: f64,
}

impl Default for MasteryThresholds {
    fn default() -> Self {
        Self {
            weak: 30.0,
            advance: 70.0,
            strong: 80.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Base interval in days for stages 0..=4.
    pub stage_intervals_days: [f64; 5],
    pub high_override_hours: i64,
    pub medium_override_hours: i64,
    pub low_override_hours: i64,
    pub thresholds: MasteryThresholds,
    pub weak_scale: f64,
    pub strong_scale: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            stage_intervals_days: [1.0, 7.0, 16.0, 35.0, 90.0],
            high_override_hours: 8,
            medium_override_hours: 24,
            low_override_hours: 72,
            thresholds: MasteryThresholds::default(),
            weak_scale: 0.5,
            strong_scale: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    pub completion_weight: f64,
    pub adequacy_weight: f64,
    /// Blueprint percentage points that call for one scheduled record.
    pub adequacy_divisor: f64,
    pub proficiency_floor: u32,
    pub horizon_days: f64,
    pub time_pressure_base: f64,
    pub high_threshold: f64,
    pub moderate_threshold: f64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            completion_weight: 0.7,
            adequacy_weight: 0.3,
            adequacy_divisor: 10.0,
            proficiency_floor: 10,
            horizon_days: 90.0,
            time_pressure_base: 0.7,
            high_threshold: 75.0,
            moderate_threshold: 50.0,
        }
    }
}

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#4F46E5", "#059669", "#D97706", "#DC2626", "#7C3AED", "#0891B2", "#DB2777", "#65A30D",
    "#EA580C", "#2563EB",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub max_block_hours: u32,
    pub min_subject_hours: u32,
    /// Longest plan accepted, in days.
    pub max_plan_days: i64,
    pub max_hours_per_day: i64,
    pub palette: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_block_hours: 2,
            min_subject_hours: 1,
            max_plan_days: 3650,
            max_hours_per_day: 24,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    pub scheduler: SchedulerConfig,
    pub readiness: ReadinessConfig,
    pub planner: PlannerConfig,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_parse::<i64>("STUDY_HIGH_OVERRIDE_HOURS") {
            config.scheduler.high_override_hours = val.max(1);
        }
        if let Some(val) = env_parse::<f64>("STUDY_READINESS_HORIZON_DAYS") {
            if val > 0.0 {
                config.readiness.horizon_days = val;
            }
        }
        if let Some(val) = env_parse::<u32>("STUDY_MAX_BLOCK_HOURS") {
            config.planner.max_block_hours = val.max(1);
        }
        if let Ok(val) = std::env::var("STUDY_PALETTE") {
            let palette: Vec<String> = val
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if !palette.is_empty() {
                config.planner.palette = palette;
            }
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
