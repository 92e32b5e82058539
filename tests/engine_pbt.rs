//! Property-Based Tests for the study engine
//!
//! Tests the following invariants:
//! - Stage bounds: scheduled stage always stays within 0..=5
//! - Interval growth: without an override, later stages are scheduled further out
//! - Score bounds: proficiency in 10..=100, readiness and overall in 0..=100
//! - Due queue: mastered items only appear with a priority override
//! - Allocation: every blueprint subject gets at least one hour, blocks hold at most two
//! - Determinism: identical inputs serialise to identical outputs

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use study_readiness::study::{
    select_due, BlueprintEntry, Planner, PracticeRecord, ReadinessScorer, ReviewOptions,
    ReviewPriority, ReviewableItem, Scheduler,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

const SUBJECTS: [&str; 6] = ["Biology", "Chemistry", "Physics", "Math", "History", "Latin"];

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    base_time().date_naive()
}

fn arb_priority() -> impl Strategy<Value = ReviewPriority> {
    prop_oneof![
        Just(ReviewPriority::None),
        Just(ReviewPriority::Low),
        Just(ReviewPriority::Medium),
        Just(ReviewPriority::High),
    ]
}

fn arb_item() -> impl Strategy<Value = ReviewableItem> {
    (
        0u8..=5u8,                                   // review_stage
        proptest::option::of(0.0f64..=100.0f64),     // mastery_score
        arb_priority(),                              // review_priority
        proptest::option::of(-500i64..=500i64),      // next_review offset in hours
        "[a-z]{1,6}",                                // id
    )
        .prop_map(|(stage, mastery, priority, offset, id)| ReviewableItem {
            review_stage: stage,
            mastery_score: mastery,
            review_priority: priority,
            next_review_at: offset.map(|h| base_time() + Duration::hours(h)),
            ..ReviewableItem::new(id)
        })
}

fn arb_record() -> impl Strategy<Value = PracticeRecord> {
    (0usize..SUBJECTS.len(), any::<bool>(), any::<bool>(), 0i64..=60i64).prop_map(
        |(subject, upper, completed, days_ago)| {
            let name = SUBJECTS[subject];
            PracticeRecord {
                subject: if upper { name.to_uppercase() } else { name.to_string() },
                completed,
                date: base_time() - Duration::days(days_ago),
                color: None,
            }
        },
    )
}

fn arb_blueprint() -> impl Strategy<Value = Vec<BlueprintEntry>> {
    prop::collection::vec((0usize..SUBJECTS.len() - 1, 1u32..=60u32), 1..5).prop_map(|rows| {
        rows.into_iter()
            .map(|(subject, weight)| BlueprintEntry::new(SUBJECTS[subject], weight as f64))
            .collect()
    })
}

// ============================================================================
// Scheduler
// ============================================================================

proptest! {
    #[test]
    fn stage_stays_in_bounds(item in arb_item(), mastery in proptest::option::of(-50.0f64..=150.0f64)) {
        let scheduler = Scheduler::default();
        let mut options = ReviewOptions::at(base_time());
        options.mastery = mastery;
        let patch = scheduler.compute_next_review(&item, &options).unwrap();
        prop_assert!(patch.review_stage <= 5);
        prop_assert!(patch.next_review_at > base_time());
        if item.review_priority.is_override() {
            prop_assert_eq!(patch.review_stage, item.review_stage);
        }
    }

    #[test]
    fn interval_grows_with_stage(mastery in proptest::option::of(0.0f64..=100.0f64)) {
        let scheduler = Scheduler::default();
        let options = ReviewOptions::at(base_time());
        let next: Vec<DateTime<Utc>> = (0u8..=4)
            .map(|stage| {
                let item = ReviewableItem {
                    review_stage: stage,
                    mastery_score: mastery,
                    ..ReviewableItem::new("card")
                };
                scheduler.compute_next_review(&item, &options).unwrap().next_review_at
            })
            .collect();
        prop_assert!(next.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn due_queue_respects_terminal_stage(items in prop::collection::vec(arb_item(), 0..20)) {
        let due = select_due(&items, base_time());
        for item in &due {
            prop_assert!(item.next_review_at.is_some());
            prop_assert!(item.review_stage < 5 || item.review_priority.is_override());
        }
        prop_assert!(due.windows(2).all(|pair| pair[0].review_priority >= pair[1].review_priority));
    }
}

// ============================================================================
// Scorer and planner
// ============================================================================

proptest! {
    #[test]
    fn scores_stay_in_bounds(
        records in prop::collection::vec(arb_record(), 0..40),
        blueprint in arb_blueprint(),
        exam_offset in proptest::option::of(-30i64..=200i64),
    ) {
        let scorer = ReadinessScorer::default();
        let exam_date = exam_offset.map(|d| today() + Duration::days(d));
        let report = scorer.score_readiness(&records, &blueprint, exam_date, today()).unwrap();

        for subject in &report.subjects {
            prop_assert!((0.0..=100.0).contains(&subject.readiness_score));
        }
        for proficiency in &report.proficiencies {
            prop_assert!((10..=100).contains(&proficiency.proficiency_score));
        }
        prop_assert!((0.0..=100.0).contains(&report.overall.score));
    }

    #[test]
    fn every_subject_gets_hours(
        records in prop::collection::vec(arb_record(), 0..40),
        blueprint in arb_blueprint(),
        days in 1i64..=21i64,
        hours_per_day in 1i64..=6i64,
    ) {
        let scorer = ReadinessScorer::default();
        let proficiencies = scorer.compute_proficiencies(&records, &blueprint);
        let planner = Planner::default();
        let plan = planner.build_plan(&blueprint, &proficiencies, days, hours_per_day, today()).unwrap();

        prop_assert_eq!(plan.days.len() as i64, days);
        prop_assert!(plan.subjects.iter().all(|s| s.hours >= 1));
        for day in &plan.days {
            for allocation in &day.subjects {
                prop_assert!(allocation.hours <= 2 * allocation.blocks);
            }
        }
        let scheduled: u32 = plan.days.iter().map(|d| d.total_hours).sum();
        prop_assert_eq!(scheduled, plan.allocated_hours);
    }

    #[test]
    fn outputs_are_deterministic(
        records in prop::collection::vec(arb_record(), 0..30),
        blueprint in arb_blueprint(),
    ) {
        let scorer = ReadinessScorer::default();
        let a = serde_json::to_string(&scorer.score_readiness(&records, &blueprint, None, today()).unwrap()).unwrap();
        let b = serde_json::to_string(&scorer.score_readiness(&records, &blueprint, None, today()).unwrap()).unwrap();
        prop_assert_eq!(a, b);

        let proficiencies = scorer.compute_proficiencies(&records, &blueprint);
        let planner = Planner::default().with_history(&records);
        let a = serde_json::to_string(&planner.generate_schedule(&blueprint, &proficiencies, 7, 3, today()).unwrap()).unwrap();
        let b = serde_json::to_string(&planner.generate_schedule(&blueprint, &proficiencies, 7, 3, today()).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }
}
