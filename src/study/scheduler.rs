//! Spaced-repetition scheduler
//!
//! Fixed stage buckets (1d, 7d, 16d, 35d, 90d) scaled by the caller's mastery
//! estimate, with short priority overrides that bypass the stage ladder.
//! Stage 5 is terminal: it is never rescheduled automatically and only shows
//! up in due queues while a priority override is set.

use chrono::{DateTime, Duration, Utc};

use crate::study::config::SchedulerConfig;
use crate::study::error::{EngineError, EngineResult};
use crate::study::types::{ReviewPatch, ReviewPriority, ReviewableItem, MAX_REVIEW_STAGE};

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub now: DateTime<Utc>,
    /// Fresh mastery estimate for this review; falls back to the item's stored score.
    pub mastery: Option<f64>,
}

impl ReviewOptions {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now, mastery: None }
    }

    pub fn with_mastery(mut self, mastery: f64) -> Self {
        self.mastery = Some(mastery);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Base interval for a stage. Stage 5 reuses the stage 4 bucket.
    pub fn base_interval_days(&self, stage: u8) -> f64 {
        let last = self.config.stage_intervals_days.len() - 1;
        self.config.stage_intervals_days[(stage as usize).min(last)]
    }

    pub fn override_interval(&self, priority: ReviewPriority) -> Option<Duration> {
        let hours = match priority {
            ReviewPriority::High => self.config.high_override_hours,
            ReviewPriority::Medium => self.config.medium_override_hours,
            ReviewPriority::Low => self.config.low_override_hours,
            ReviewPriority::None => return None,
        };
        Some(Duration::hours(hours))
    }

    pub fn mastery_scale(&self, mastery: Option<f64>) -> f64 {
        let thresholds = &self.config.thresholds;
        match mastery {
            Some(m) if m < thresholds.weak => self.config.weak_scale,
            Some(m) if m > thresholds.strong => self.config.strong_scale,
            _ => 1.0,
        }
    }

    pub fn next_stage(&self, stage: u8, mastery: Option<f64>) -> u8 {
        if stage >= MAX_REVIEW_STAGE {
            return MAX_REVIEW_STAGE;
        }
        let thresholds = &self.config.thresholds;
        match mastery {
            Some(m) if m > thresholds.advance => (stage + 1).min(MAX_REVIEW_STAGE),
            Some(m) if m < thresholds.weak => stage.saturating_sub(1),
            _ => stage,
        }
    }

    pub fn compute_next_review(
        &self,
        item: &ReviewableItem,
        options: &ReviewOptions,
    ) -> EngineResult<ReviewPatch> {
        if item.review_stage > MAX_REVIEW_STAGE {
            return Err(EngineError::InvalidStage(item.review_stage));
        }

        let now = options.now;

        if let Some(interval) = self.override_interval(item.review_priority) {
            return Ok(ReviewPatch {
                next_review_at: now + interval,
                review_stage: item.review_stage,
                last_reviewed_at: now,
            });
        }

        let mastery = options
            .mastery
            .or(item.mastery_score)
            .map(|m| m.clamp(0.0, 100.0));

        let interval_days = self.base_interval_days(item.review_stage) * self.mastery_scale(mastery);
        let interval = Duration::seconds((interval_days * SECONDS_PER_DAY).round() as i64);
        let review_stage = self.next_stage(item.review_stage, mastery);

        tracing::trace!(
            item_id = %item.id,
            from_stage = item.review_stage,
            to_stage = review_stage,
            interval_days,
            "review scheduled"
        );

        Ok(ReviewPatch {
            next_review_at: now + interval,
            review_stage,
            last_reviewed_at: now,
        })
    }
}

/// Items without a scheduled review are never due.
pub fn is_due(item: &ReviewableItem, now: DateTime<Utc>) -> bool {
    let Some(next) = item.next_review_at else {
        return false;
    };
    next <= now && (!item.is_mastered() || item.review_priority.is_override())
}

/// Due items ordered by priority (high first), then earliest due, then id.
pub fn select_due(items: &[ReviewableItem], now: DateTime<Utc>) -> Vec<&ReviewableItem> {
    let mut due: Vec<&ReviewableItem> = items.iter().filter(|item| is_due(item, now)).collect();
    due.sort_by(|a, b| {
        b.review_priority
            .cmp(&a.review_priority)
            .then_with(|| a.next_review_at.cmp(&b.next_review_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    due
}

pub fn due_count(items: &[ReviewableItem], now: DateTime<Utc>) -> usize {
    items.iter().filter(|item| is_due(item, now)).count()
}
