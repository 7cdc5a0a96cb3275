//! Error types for freetime-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FreeTimeError {
    #[error("At least one participant is required to compute shared free time")]
    EmptyParticipantSet,

    #[error("Invalid target week: {0} (term-weeks start at 1)")]
    InvalidWeek(u32),

    #[error("Invalid ideal hour: {0} (must be 0-23)")]
    InvalidIdealHour(u32),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, FreeTimeError>;
