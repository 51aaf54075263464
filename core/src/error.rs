use chrono::NaiveDate;
use thiserror::Error;

/// Invalid or missing cohort setup. Always surfaced, never defaulted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("no participants")]
    NoParticipants,

    #[error("non-positive credits for user '{user_id}': {credits}")]
    NonPositiveCredits { user_id: String, credits: i64 },

    #[error("credits for user '{user_id}' exceed {max}: {credits}")]
    CreditsTooLarge { user_id: String, credits: i64, max: u32 },

    #[error("duplicate participant '{user_id}'")]
    DuplicateParticipant { user_id: String },

    #[error("weekly participation not initialized")]
    NotInitialized,

    #[error("date {date} is outside the cohort week {week_start}..={week_end}")]
    DateOutsideWeek {
        date:       NaiveDate,
        week_start: NaiveDate,
        week_end:   NaiveDate,
    },
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Queue is empty: build the daily queue before assigning leads")]
    QueueEmpty,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchedError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type SchedResult<T> = Result<T, SchedError>;
