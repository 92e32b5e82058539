use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};

use crate::study::error::{EngineError, EngineResult};
use crate::study::types::{round2, subject_key, BlueprintEntry};

/// Even-weight blueprint over a known subject list. Blank and repeated names are dropped.
pub fn even_split(subjects: &[String]) -> Vec<BlueprintEntry> {
    let mut seen = HashSet::new();
    let unique: Vec<&str> = subjects
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(subject_key(s)))
        .collect();

    if unique.is_empty() {
        return Vec::new();
    }

    let share = round2(100.0 / unique.len() as f64);
    unique
        .into_iter()
        .map(|subject| BlueprintEntry::new(subject, share))
        .collect()
}

/// Picks the supplied blueprint, falling back to an even split over `subjects`.
/// A blueprint without any positive weight counts as missing.
pub fn resolve_blueprint(
    exam: Option<&str>,
    blueprint: Option<&[BlueprintEntry]>,
    subjects: &[String],
) -> EngineResult<Vec<BlueprintEntry>> {
    if let Some(entries) = blueprint.filter(|entries| total_weight(&merge_entries(entries)) > 0.0) {
        return Ok(entries.to_vec());
    }

    let fallback = even_split(subjects);
    if fallback.is_empty() {
        return Err(EngineError::MissingBlueprint {
            exam: exam.map(str::to_string),
        });
    }

    tracing::warn!(
        exam = exam.unwrap_or("-"),
        subjects = fallback.len(),
        "blueprint unavailable, using even split"
    );
    Ok(fallback)
}

/// Blueprint rows merged by subject key, first spelling kept, weights summed.
pub fn merge_entries(blueprint: &[BlueprintEntry]) -> Vec<BlueprintEntry> {
    let mut merged: Vec<(String, BlueprintEntry)> = Vec::with_capacity(blueprint.len());
    for entry in blueprint {
        let key = subject_key(&entry.subject);
        if key.is_empty() {
            continue;
        }
        let weight = entry.percentage.max(0.0);
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.percentage += weight,
            None => merged.push((key, BlueprintEntry::new(entry.subject.trim(), weight))),
        }
    }
    merged.into_iter().map(|(_, entry)| entry).collect()
}

pub fn total_weight(blueprint: &[BlueprintEntry]) -> f64 {
    blueprint.iter().map(|e| e.percentage.max(0.0)).sum()
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part taken).
pub fn parse_exam_date(value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| EngineError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_even_split() {
        let entries = even_split(&names(&["Physics", "Chemistry", "physics ", "", "Biology"]));
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| (e.percentage - 33.33).abs() < 1e-9));
        assert_eq!(entries[0].subject, "Physics");
    }

    #[test]
    fn test_resolve_prefers_supplied() {
        let supplied = vec![BlueprintEntry::new("Math", 100.0)];
        let resolved = resolve_blueprint(Some("sat"), Some(&supplied), &names(&["A", "B"])).unwrap();
        assert_eq!(resolved, supplied);
    }

    #[test]
    fn test_resolve_falls_back_then_fails() {
        let resolved = resolve_blueprint(Some("sat"), Some(&[]), &names(&["A", "B"])).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].percentage, 50.0);

        let err = resolve_blueprint(Some("sat"), None, &[]).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingBlueprint {
                exam: Some("sat".to_string())
            }
        );
    }

    #[test]
    fn test_resolve_treats_zero_weight_as_missing() {
        let zero = vec![BlueprintEntry::new("Biology", 0.0), BlueprintEntry::new("Chemistry", 0.0)];
        let resolved =
            resolve_blueprint(Some("mcat"), Some(&zero), &names(&["Biology", "Chemistry"])).unwrap();
        assert_eq!(resolved[0], BlueprintEntry::new("Biology", 50.0));
        assert_eq!(resolved[1], BlueprintEntry::new("Chemistry", 50.0));

        let err = resolve_blueprint(Some("mcat"), Some(&zero), &[]).unwrap_err();
        assert!(matches!(err, EngineError::MissingBlueprint { .. }));
    }

    #[test]
    fn test_merge_entries_sums_duplicates() {
        let merged = merge_entries(&[
            BlueprintEntry::new("Biology", 30.0),
            BlueprintEntry::new("Chemistry", 50.0),
            BlueprintEntry::new("BIOLOGY", 20.0),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], BlueprintEntry::new("Biology", 50.0));
    }

    #[test]
    fn test_parse_exam_date() {
        let expected = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert_eq!(parse_exam_date("2026-06-15").unwrap(), expected);
        assert_eq!(parse_exam_date("2026-06-15T08:30:00Z").unwrap(), expected);
        assert!(matches!(parse_exam_date("15/06/2026"), Err(EngineError::InvalidDate(_))));
    }
}
