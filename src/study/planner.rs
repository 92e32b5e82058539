//! Study-time allocation planner
//!
//! priority = round(weight × (100 − proficiency) / 100)
//! hours    = max(1, round(priority / Σpriority × days × hours_per_day))
//!
//! Hours are spread round-robin over the days before the exam in blocks of at
//! most two hours, biggest allocations first. The one-hour floor may push the
//! total above the nominal budget; that surplus is reported, never normalised.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::study::blueprint::merge_entries;
use crate::study::config::{PlannerConfig, ReadinessConfig};
use crate::study::error::{EngineError, EngineResult};
use crate::study::types::{
    subject_key, BlueprintEntry, PracticeRecord, StudyDayAllocation, StudyPlan, SubjectAllocation,
    SubjectHours, SubjectProficiency,
};

const FALLBACK_COLOR: &str = "#9CA3AF";

pub fn subject_priority(weight: f64, proficiency: u32) -> u32 {
    let gap = 100 - proficiency.min(100);
    (weight.max(0.0) * gap as f64 / 100.0).round() as u32
}

/// 32-bit string hash, stable across runs and platforms.
fn stable_hash(value: &str) -> u32 {
    value.chars().fold(0i32, |hash, c| {
        hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(c as i32)
    }).unsigned_abs()
}

#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    proficiency_floor: u32,
    history_colors: HashMap<String, String>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            proficiency_floor: ReadinessConfig::default().proficiency_floor,
            history_colors: HashMap::new(),
        }
    }

    /// Proficiency assumed for blueprint subjects missing from the proficiency list.
    pub fn with_proficiency_floor(mut self, floor: u32) -> Self {
        self.proficiency_floor = floor;
        self
    }

    /// Reuse colours already attached to past records; the most recent record wins.
    pub fn with_history(mut self, records: &[PracticeRecord]) -> Self {
        let mut latest: HashMap<String, (chrono::DateTime<chrono::Utc>, String)> = HashMap::new();
        for record in records {
            let Some(color) = record.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
                continue;
            };
            let key = subject_key(&record.subject);
            match latest.get(&key) {
                Some((date, _)) if *date >= record.date => {}
                _ => {
                    latest.insert(key, (record.date, color.to_string()));
                }
            }
        }
        self.history_colors = latest.into_iter().map(|(k, (_, c))| (k, c)).collect();
        self
    }

    pub fn color_for(&self, subject: &str) -> String {
        let key = subject_key(subject);
        if let Some(color) = self.history_colors.get(&key) {
            return color.clone();
        }
        if self.config.palette.is_empty() {
            return FALLBACK_COLOR.to_string();
        }
        let index = stable_hash(&key) as usize % self.config.palette.len();
        self.config.palette[index].clone()
    }

    /// Per-subject hour totals, in blueprint order.
    pub fn allocate_hours(
        &self,
        blueprint: &[BlueprintEntry],
        proficiencies: &[SubjectProficiency],
        total_hours: u32,
    ) -> Vec<SubjectHours> {
        let proficiency_of: HashMap<String, u32> = proficiencies
            .iter()
            .map(|p| (subject_key(&p.subject), p.proficiency_score))
            .collect();

        let mut rows: Vec<SubjectHours> = merge_entries(blueprint)
            .into_iter()
            .map(|entry| {
                let proficiency = proficiency_of
                    .get(&subject_key(&entry.subject))
                    .copied()
                    .unwrap_or(self.proficiency_floor);
                SubjectHours {
                    priority: subject_priority(entry.percentage, proficiency),
                    color: self.color_for(&entry.subject),
                    subject: entry.subject,
                    blueprint_percentage: entry.percentage,
                    proficiency_score: proficiency,
                    hours: 0,
                }
            })
            .collect();

        let total_priority: u32 = rows.iter().map(|r| r.priority).sum();
        let floor = self.config.min_subject_hours.max(1);

        if total_priority == 0 {
            tracing::debug!(subjects = rows.len(), "zero priority mass, using hour floor");
        }

        for row in &mut rows {
            row.hours = if total_priority == 0 {
                floor
            } else {
                let share = row.priority as f64 / total_priority as f64 * total_hours as f64;
                (share.round() as u32).max(floor)
            };
        }

        rows
    }

    pub fn generate_schedule(
        &self,
        blueprint: &[BlueprintEntry],
        proficiencies: &[SubjectProficiency],
        days_until_exam: i64,
        hours_per_day: i64,
        start_date: NaiveDate,
    ) -> EngineResult<Vec<StudyDayAllocation>> {
        self.build_plan(blueprint, proficiencies, days_until_exam, hours_per_day, start_date)
            .map(|plan| plan.days)
    }

    pub fn build_plan(
        &self,
        blueprint: &[BlueprintEntry],
        proficiencies: &[SubjectProficiency],
        days_until_exam: i64,
        hours_per_day: i64,
        start_date: NaiveDate,
    ) -> EngineResult<StudyPlan> {
        if days_until_exam <= 0 || days_until_exam > self.config.max_plan_days {
            return Err(EngineError::InvalidTimeWindow { days_until_exam });
        }
        if hours_per_day <= 0 || hours_per_day > self.config.max_hours_per_day {
            return Err(EngineError::InvalidStudyHours(hours_per_day));
        }
        if merge_entries(blueprint).is_empty() {
            return Err(EngineError::MissingBlueprint { exam: None });
        }

        // Both factors are bounded by config, so the budget fits comfortably in u32.
        let budget_hours = (days_until_exam * hours_per_day) as u32;
        let subjects = self.allocate_hours(blueprint, proficiencies, budget_hours);
        let days = self.distribute(&subjects, days_until_exam as usize, start_date);

        let allocated_hours: u32 = subjects.iter().map(|s| s.hours).sum();
        let over_allocated_hours = allocated_hours.saturating_sub(budget_hours);

        tracing::info!(
            days = days.len(),
            subjects = subjects.len(),
            budget_hours,
            allocated_hours,
            over_allocated_hours,
            "study plan generated"
        );

        Ok(StudyPlan {
            days,
            subjects,
            budget_hours,
            allocated_hours,
            over_allocated_hours,
        })
    }

    fn distribute(
        &self,
        subjects: &[SubjectHours],
        day_count: usize,
        start_date: NaiveDate,
    ) -> Vec<StudyDayAllocation> {
        let mut days: Vec<StudyDayAllocation> = (0..day_count)
            .map(|index| StudyDayAllocation {
                day_index: index as u32,
                date: start_date + Duration::days(index as i64),
                subjects: Vec::new(),
                total_hours: 0,
            })
            .collect();

        let mut order: Vec<&SubjectHours> = subjects.iter().collect();
        order.sort_by(|a, b| b.hours.cmp(&a.hours).then_with(|| b.priority.cmp(&a.priority)));

        let block = self.config.max_block_hours.max(1);
        let mut cursor = 0usize;

        for subject in order {
            let mut remaining = subject.hours;
            while remaining > 0 {
                let hours = remaining.min(block);
                let day = &mut days[cursor];
                match day.subjects.iter_mut().find(|a| a.subject == subject.subject) {
                    Some(existing) => {
                        existing.hours += hours;
                        existing.blocks += 1;
                    }
                    None => day.subjects.push(SubjectAllocation {
                        subject: subject.subject.clone(),
                        hours,
                        priority: subject.priority,
                        color: subject.color.clone(),
                        blocks: 1,
                    }),
                }
                day.total_hours += hours;
                remaining -= hours;
                cursor = (cursor + 1) % day_count;
            }
        }

        for day in &mut days {
            day.subjects.sort_by(|a, b| b.priority.cmp(&a.priority));
        }

        days
    }
}
