//! Study engine - composition entry point over one learner snapshot
//!
//! records → scorer → proficiencies → planner → per-day schedule.
//! The scheduler runs per item and shares nothing with the other two.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::study::blueprint::{parse_exam_date, resolve_blueprint};
use crate::study::config::EngineConfig;
use crate::study::error::{EngineError, EngineResult};
use crate::study::planner::Planner;
use crate::study::readiness::ReadinessScorer;
use crate::study::scheduler::{select_due, ReviewOptions, Scheduler};
use crate::study::types::{
    BlueprintEntry, PracticeRecord, ReadinessReport, ReviewPatch, ReviewableItem, StudyPlan,
};

/// Read-only inputs gathered by the caller from its collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySnapshot {
    #[serde(default)]
    pub exam: Option<String>,
    #[serde(default)]
    pub records: Vec<PracticeRecord>,
    #[serde(default)]
    pub blueprint: Option<Vec<BlueprintEntry>>,
    /// Known subjects for the exam, used when no blueprint is available.
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default)]
    pub hours_per_day: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamWindow {
    pub exam_date: NaiveDate,
    pub days_until_exam: i64,
}

pub struct StudyEngine {
    scheduler: Scheduler,
    scorer: ReadinessScorer,
    config: EngineConfig,
}

impl Default for StudyEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl StudyEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            scheduler: Scheduler::new(config.scheduler.clone()),
            scorer: ReadinessScorer::new(config.readiness.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn review(&self, item: &ReviewableItem, options: &ReviewOptions) -> EngineResult<ReviewPatch> {
        self.scheduler.compute_next_review(item, options)
    }

    pub fn due_queue<'a>(&self, items: &'a [ReviewableItem], now: DateTime<Utc>) -> Vec<&'a ReviewableItem> {
        select_due(items, now)
    }

    pub fn blueprint_for(&self, snapshot: &StudySnapshot) -> EngineResult<Vec<BlueprintEntry>> {
        resolve_blueprint(
            snapshot.exam.as_deref(),
            snapshot.blueprint.as_deref(),
            &snapshot.subjects,
        )
    }

    /// Validates the exam date against `today`; the exam has to be at least one day away.
    pub fn exam_window(&self, exam_date: Option<&str>, today: NaiveDate) -> EngineResult<ExamWindow> {
        let raw = exam_date
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| EngineError::InvalidDate(String::new()))?;
        let exam_date = parse_exam_date(raw)?;
        let days_until_exam = (exam_date - today).num_days();
        if days_until_exam <= 0 {
            return Err(EngineError::InvalidTimeWindow { days_until_exam });
        }
        Ok(ExamWindow {
            exam_date,
            days_until_exam,
        })
    }

    pub fn assess(&self, snapshot: &StudySnapshot, today: NaiveDate) -> EngineResult<ReadinessReport> {
        let blueprint = self.blueprint_for(snapshot).map_err(|err| with_exam(err, snapshot))?;
        let exam_date = match snapshot.exam_date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(raw) => Some(parse_exam_date(raw)?),
            None => None,
        };

        self.scorer
            .score_readiness(&snapshot.records, &blueprint, exam_date, today)
            .map_err(|err| with_exam(err, snapshot))
    }

    pub fn plan(&self, snapshot: &StudySnapshot, today: NaiveDate) -> EngineResult<StudyPlan> {
        let window = self.exam_window(snapshot.exam_date.as_deref(), today)?;
        let hours_per_day = snapshot.hours_per_day.unwrap_or(0);
        if hours_per_day <= 0 {
            return Err(EngineError::InvalidStudyHours(hours_per_day));
        }

        let blueprint = self.blueprint_for(snapshot).map_err(|err| with_exam(err, snapshot))?;
        let proficiencies = self.scorer.compute_proficiencies(&snapshot.records, &blueprint);

        Planner::new(self.config.planner.clone())
            .with_proficiency_floor(self.config.readiness.proficiency_floor)
            .with_history(&snapshot.records)
            .build_plan(
                &blueprint,
                &proficiencies,
                window.days_until_exam,
                hours_per_day,
                today,
            )
            .map_err(|err| with_exam(err, snapshot))
    }
}

fn with_exam(err: EngineError, snapshot: &StudySnapshot) -> EngineError {
    match err {
        EngineError::MissingBlueprint { exam: None } => EngineError::MissingBlueprint {
            exam: snapshot.exam.clone(),
        },
        other => other,
    }
}
