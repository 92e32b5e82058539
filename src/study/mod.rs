//! Study readiness & adaptive scheduling engine
//!
//! Contains:
//! - Scheduler - stage-bucket spaced repetition with priority overrides
//! - ReadinessScorer - per-subject proficiency/readiness and overall readiness
//! - Planner - proportional study-hour allocation spread over the days to the exam
//! - StudyEngine - composes the three over one learner snapshot
//!
//! Everything here is pure and synchronous: no I/O, no interior state between calls.

pub mod blueprint;
pub mod config;
pub mod engine;
pub mod error;
pub mod planner;
pub mod readiness;
pub mod scheduler;
pub mod types;

pub use blueprint::{even_split, parse_exam_date, resolve_blueprint};
pub use config::{EngineConfig, PlannerConfig, ReadinessConfig, SchedulerConfig};
pub use engine::{ExamWindow, StudyEngine, StudySnapshot};
pub use error::{EngineError, EngineResult};
pub use planner::{subject_priority, Planner};
pub use readiness::{days_to_exam, group_records, ReadinessScorer, SubjectTally};
pub use scheduler::{due_count, is_due, select_due, ReviewOptions, Scheduler};
pub use types::*;
