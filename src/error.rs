/// Error types for the sample scheduler.
///
/// Every fatal condition of a scheduling run surfaces as a `ScheduleError`.
/// Non-fatal conditions (empty eligible set, catch-all tier) never reach
/// this type.
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Duplicate sample identifier: '{0}'")]
    DuplicateSample(String),

    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    #[error(
        "Calendar exhausted: requested {requested} meeting dates but only {available} \
         remain after exclusions (last candidate examined: {last_candidate:?})"
    )]
    CalendarExhausted {
        requested: usize,
        available: usize,
        last_candidate: Option<NaiveDate>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
