//! Per-record diagnostics.
//!
//! A malformed schedule record never aborts a computation. It is dropped and
//! described by a [`Diagnostic`] that travels back with the report, so the
//! caller can tell a user which row of which timetable was ignored and why.

use serde::Serialize;
use thiserror::Error;

/// Why a single record was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropReason {
    #[error("unrecognized weekday token {token:?}")]
    UnknownWeekday { token: String },

    #[error("unparsable time {value:?} (expected HH:MM)")]
    InvalidTime { value: String },

    #[error("start {start} is not before end {end}")]
    EmptyRange { start: String, end: String },

    #[error("invalid week list {value:?}")]
    InvalidWeeks { value: String },
}

/// Which input record a diagnostic refers to. Indices are zero-based
/// positions in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RecordRef {
    Interval { participant: usize, index: usize },
    Exclusion { index: usize },
}

impl std::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordRef::Interval { participant, index } => {
                write!(f, "participant {participant}, interval {index}")
            }
            RecordRef::Exclusion { index } => write!(f, "exclusion {index}"),
        }
    }
}

/// A dropped record and the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub record: RecordRef,
    pub reason: DropReason,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.record, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_record_and_reason() {
        let d = Diagnostic {
            record: RecordRef::Interval {
                participant: 1,
                index: 3,
            },
            reason: DropReason::UnknownWeekday {
                token: "Funday".to_string(),
            },
        };
        assert_eq!(
            d.to_string(),
            "participant 1, interval 3: unrecognized weekday token \"Funday\""
        );
    }

    #[test]
    fn test_serializes_with_tags() {
        let d = Diagnostic {
            record: RecordRef::Exclusion { index: 0 },
            reason: DropReason::EmptyRange {
                start: "10:00".to_string(),
                end: "09:00".to_string(),
            },
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["record"]["source"], "exclusion");
        assert_eq!(json["reason"]["kind"], "empty_range");
        assert_eq!(json["reason"]["start"], "10:00");
    }
}
