//! Subject proficiency and readiness scoring
//!
//! readiness = 0.7 × completion_rate + 0.3 × scheduled_adequacy
//! scheduled_adequacy = min(100, total / max(1, weight / 10) × 100)
//! proficiency = max(10, round(completion_rate)), floor 10 without history
//!
//! Overall = blueprint-weighted mean of subject readiness, scaled by
//! (0.7 + 0.3 × min(days_to_exam / 90, 1)) when an exam date is known.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::study::blueprint::{merge_entries, total_weight};
use crate::study::config::ReadinessConfig;
use crate::study::error::{EngineError, EngineResult};
use crate::study::types::{
    round2, subject_key, BlueprintEntry, OverallReadiness, PracticeRecord, ReadinessReport,
    ReadinessStatus, SubjectProficiency, SubjectReadiness,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectTally {
    /// Spelling of the first record seen for this subject.
    pub display_name: String,
    pub total: u32,
    pub completed: u32,
}

impl SubjectTally {
    /// Completed share as a percentage, 0 without records.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

pub fn group_records(records: &[PracticeRecord]) -> BTreeMap<String, SubjectTally> {
    let mut groups: BTreeMap<String, SubjectTally> = BTreeMap::new();
    for record in records {
        let key = subject_key(&record.subject);
        if key.is_empty() {
            continue;
        }
        let tally = groups.entry(key).or_insert_with(|| SubjectTally {
            display_name: record.subject.trim().to_string(),
            total: 0,
            completed: 0,
        });
        tally.total += 1;
        if record.completed {
            tally.completed += 1;
        }
    }
    groups
}

pub fn days_to_exam(exam_date: NaiveDate, today: NaiveDate) -> i64 {
    (exam_date - today).num_days().max(0)
}

#[derive(Debug, Clone, Default)]
pub struct ReadinessScorer {
    config: ReadinessConfig,
}

impl ReadinessScorer {
    pub fn new(config: ReadinessConfig) -> Self {
        Self { config }
    }

    pub fn time_pressure_factor(&self, days_to_exam: i64) -> f64 {
        (days_to_exam as f64 / self.config.horizon_days).clamp(0.0, 1.0)
    }

    pub fn proficiency_score(&self, tally: Option<&SubjectTally>) -> u32 {
        let floor = self.config.proficiency_floor;
        match tally {
            Some(t) if t.total > 0 => (t.completion_rate().round() as u32).max(floor),
            _ => floor,
        }
    }

    pub fn scheduled_adequacy(&self, total_records: u32, weight: f64) -> f64 {
        let needed = (weight / self.config.adequacy_divisor).max(1.0);
        (total_records as f64 / needed * 100.0).min(100.0)
    }

    pub fn status_for(&self, score: f64) -> ReadinessStatus {
        if score >= self.config.high_threshold {
            ReadinessStatus::High
        } else if score >= self.config.moderate_threshold {
            ReadinessStatus::Moderate
        } else {
            ReadinessStatus::Low
        }
    }

    /// Proficiency for every blueprint subject (blueprint order), then record-only subjects.
    pub fn compute_proficiencies(
        &self,
        records: &[PracticeRecord],
        blueprint: &[BlueprintEntry],
    ) -> Vec<SubjectProficiency> {
        let groups = group_records(records);
        let entries = merge_entries(blueprint);

        let mut out: Vec<SubjectProficiency> = entries
            .iter()
            .map(|entry| {
                let tally = groups.get(&subject_key(&entry.subject));
                self.proficiency_row(entry.subject.clone(), tally)
            })
            .collect();

        for (key, tally) in &groups {
            if entries.iter().any(|e| subject_key(&e.subject) == *key) {
                continue;
            }
            out.push(self.proficiency_row(tally.display_name.clone(), Some(tally)));
        }

        out
    }

    fn proficiency_row(&self, subject: String, tally: Option<&SubjectTally>) -> SubjectProficiency {
        SubjectProficiency {
            subject,
            total_records: tally.map(|t| t.total).unwrap_or(0),
            completed_records: tally.map(|t| t.completed).unwrap_or(0),
            proficiency_score: self.proficiency_score(tally),
        }
    }

    pub fn score_readiness(
        &self,
        records: &[PracticeRecord],
        blueprint: &[BlueprintEntry],
        exam_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> EngineResult<ReadinessReport> {
        let entries = merge_entries(blueprint);
        if entries.is_empty() || total_weight(&entries) <= 0.0 {
            return Err(EngineError::MissingBlueprint { exam: None });
        }

        if records.is_empty() {
            tracing::debug!("no practice history, proficiency floors apply");
        }

        let groups = group_records(records);
        let mut subjects = Vec::with_capacity(entries.len() + groups.len());

        for entry in &entries {
            let key = subject_key(&entry.subject);
            let tally = groups.get(&key);
            let total = tally.map(|t| t.total).unwrap_or(0);
            let completed = tally.map(|t| t.completed).unwrap_or(0);
            let completion_rate = tally.map(SubjectTally::completion_rate).unwrap_or(0.0);
            let adequacy = self.scheduled_adequacy(total, entry.percentage);
            let readiness = (self.config.completion_weight * completion_rate
                + self.config.adequacy_weight * adequacy)
                .clamp(0.0, 100.0);

            subjects.push(SubjectReadiness {
                subject: entry.subject.clone(),
                total_records: total,
                completed_records: completed,
                completion_rate: round2(completion_rate),
                blueprint_percentage: entry.percentage,
                scheduled_adequacy: round2(adequacy),
                readiness_score: round2(readiness),
            });
        }

        for (key, tally) in &groups {
            if entries.iter().any(|e| subject_key(&e.subject) == *key) {
                continue;
            }
            let completion_rate = round2(tally.completion_rate());
            subjects.push(SubjectReadiness {
                subject: tally.display_name.clone(),
                total_records: tally.total,
                completed_records: tally.completed,
                completion_rate,
                blueprint_percentage: 0.0,
                scheduled_adequacy: 0.0,
                readiness_score: completion_rate,
            });
        }

        let overall = self.overall(&subjects, exam_date, today);
        let proficiencies = self.compute_proficiencies(records, &entries);

        Ok(ReadinessReport {
            subjects,
            proficiencies,
            overall,
        })
    }

    fn overall(
        &self,
        subjects: &[SubjectReadiness],
        exam_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> OverallReadiness {
        let weighted: Vec<&SubjectReadiness> = subjects
            .iter()
            .filter(|s| s.blueprint_percentage > 0.0)
            .collect();
        let weight_sum: f64 = weighted.iter().map(|s| s.blueprint_percentage).sum();
        let raw = if weight_sum > 0.0 {
            weighted
                .iter()
                .map(|s| s.readiness_score * s.blueprint_percentage)
                .sum::<f64>()
                / weight_sum
        } else {
            0.0
        };

        let days = exam_date.map(|date| days_to_exam(date, today));
        let adjusted = match days {
            Some(d) => {
                let factor = self.time_pressure_factor(d);
                raw * (self.config.time_pressure_base + (1.0 - self.config.time_pressure_base) * factor)
            }
            None => raw,
        };
        let adjusted = adjusted.clamp(0.0, 100.0);

        OverallReadiness {
            score: round2(adjusted),
            raw_score: round2(raw.clamp(0.0, 100.0)),
            status: self.status_for(adjusted),
            subjects_covered: weighted.iter().filter(|s| s.total_records > 0).count() as u32,
            days_to_exam: days,
        }
    }
}
