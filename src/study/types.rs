use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_REVIEW_STAGE: u8 = 5;

/// Normalised subject key used for every case-insensitive comparison.
pub fn subject_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPriority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl ReviewPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::None,
        }
    }

    pub fn is_override(&self) -> bool {
        !matches!(self, Self::None)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl PartialOrd for ReviewPriority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReviewPriority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewableItem {
    pub id: String,
    #[serde(default)]
    pub review_stage: u8,
    #[serde(default)]
    pub mastery_score: Option<f64>,
    #[serde(default)]
    pub review_priority: ReviewPriority,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review_at: Option<DateTime<Utc>>,
}

impl ReviewableItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            review_stage: 0,
            mastery_score: None,
            review_priority: ReviewPriority::None,
            last_reviewed_at: None,
            next_review_at: None,
        }
    }

    pub fn is_mastered(&self) -> bool {
        self.review_stage >= MAX_REVIEW_STAGE
    }

    /// Returns a copy with the scheduling patch applied. The original is left untouched.
    pub fn apply(&self, patch: &ReviewPatch) -> Self {
        Self {
            review_stage: patch.review_stage,
            last_reviewed_at: Some(patch.last_reviewed_at),
            next_review_at: Some(patch.next_review_at),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    pub next_review_at: DateTime<Utc>,
    pub review_stage: u8,
    pub last_reviewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRecord {
    pub subject: String,
    #[serde(default)]
    pub completed: bool,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintEntry {
    pub subject: String,
    pub percentage: f64,
}

impl BlueprintEntry {
    pub fn new(subject: impl Into<String>, percentage: f64) -> Self {
        Self {
            subject: subject.into(),
            percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProficiency {
    pub subject: String,
    pub total_records: u32,
    pub completed_records: u32,
    pub proficiency_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectReadiness {
    pub subject: String,
    pub total_records: u32,
    pub completed_records: u32,
    /// Percentage of completed records, 0–100.
    pub completion_rate: f64,
    pub blueprint_percentage: f64,
    pub scheduled_adequacy: f64,
    pub readiness_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessStatus {
    Low,
    Moderate,
    High,
}

impl ReadinessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallReadiness {
    pub score: f64,
    pub raw_score: f64,
    pub status: ReadinessStatus,
    pub subjects_covered: u32,
    pub days_to_exam: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub subjects: Vec<SubjectReadiness>,
    pub proficiencies: Vec<SubjectProficiency>,
    pub overall: OverallReadiness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAllocation {
    pub subject: String,
    pub hours: u32,
    pub priority: u32,
    pub color: String,
    /// Number of round-robin passes that landed on this day.
    pub blocks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyDayAllocation {
    pub day_index: u32,
    pub date: NaiveDate,
    pub subjects: Vec<SubjectAllocation>,
    pub total_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectHours {
    pub subject: String,
    pub blueprint_percentage: f64,
    pub proficiency_score: u32,
    pub priority: u32,
    pub hours: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub days: Vec<StudyDayAllocation>,
    pub subjects: Vec<SubjectHours>,
    pub budget_hours: u32,
    pub allocated_hours: u32,
    /// Hours above the nominal budget caused by the one-hour floor.
    pub over_allocated_hours: u32,
}
