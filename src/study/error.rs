#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("no blueprint available for exam {exam:?}")]
    MissingBlueprint { exam: Option<String> },
    #[error("invalid time window: {days_until_exam} days until exam")]
    InvalidTimeWindow { days_until_exam: i64 },
    #[error("invalid daily study hours: {0}")]
    InvalidStudyHours(i64),
    #[error("invalid exam date: {0}")]
    InvalidDate(String),
    #[error("review stage {0} out of range")]
    InvalidStage(u8),
}

impl EngineError {
    /// Whether the caller has to surface this to the learner instead of recovering locally.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeWindow { .. } | Self::InvalidStudyHours(_) | Self::InvalidDate(_)
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
