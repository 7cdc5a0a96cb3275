//! Schedule records: the request shape and the validated shape.
//!
//! [`IntervalInput`] and [`ExclusionInput`] mirror what upstream parsers and
//! HTTP handlers produce (loose strings, possibly malformed). Resolving them
//! through [`resolve_participant`] and [`resolve_exclusions`] yields the typed
//! [`RecurringInterval`] / [`ExclusionWindow`] records the engine computes
//! with. Records that fail validation are dropped into the diagnostics list.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::diagnostics::{Diagnostic, DropReason, RecordRef};
use crate::input::{lenient_string, LooseValue};
use crate::recurrence::WeekSet;
use crate::weekday::{WeekdayAliases, WeekdayToken};

// ── Input records ───────────────────────────────────────────────────────────

/// The term-weeks of an input record: a list of week numbers, or the stored
/// text form (`"1,2,3"`, `"1-8"`). An empty list or blank text means every
/// week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WeeksInput {
    List(Vec<u32>),
    Text(String),
    /// A value of neither form, kept for the diagnostic.
    Invalid(String),
}

impl WeeksInput {
    /// # Errors
    ///
    /// Returns [`DropReason::InvalidWeeks`] when the weeks are malformed.
    pub fn week_set(&self) -> Result<WeekSet, DropReason> {
        match self {
            WeeksInput::List(weeks) => WeekSet::from_weeks(weeks.iter().copied()),
            WeeksInput::Text(text) => WeekSet::parse(text),
            WeeksInput::Invalid(value) => Err(DropReason::InvalidWeeks {
                value: value.clone(),
            }),
        }
    }
}

impl Default for WeeksInput {
    fn default() -> Self {
        WeeksInput::List(Vec::new())
    }
}

impl From<Vec<u32>> for WeeksInput {
    fn from(weeks: Vec<u32>) -> Self {
        WeeksInput::List(weeks)
    }
}

impl<'de> Deserialize<'de> for WeeksInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = LooseValue::deserialize(deserializer)?;
        Ok(match &value {
            LooseValue::Null => WeeksInput::default(),
            LooseValue::Text(text) => WeeksInput::Text(text.clone()),
            LooseValue::List(items) => items
                .iter()
                .map(|item| match item {
                    LooseValue::Int(n) => u32::try_from(*n).ok(),
                    LooseValue::Text(t) => t.trim().parse().ok(),
                    _ => None,
                })
                .collect::<Option<Vec<u32>>>()
                .map_or_else(|| WeeksInput::Invalid(value.to_string()), WeeksInput::List),
            LooseValue::Int(_) | LooseValue::Other(_) => WeeksInput::Invalid(value.to_string()),
        })
    }
}

/// One recurring occupied period as supplied by a caller.
///
/// Deserialization accepts any value in every field; malformed fields are
/// reported per record when the input is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalInput {
    #[serde(default, alias = "day")]
    pub weekday: WeekdayToken,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end: String,
    #[serde(default)]
    pub weeks: WeeksInput,
    #[serde(default, alias = "course", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl IntervalInput {
    pub fn new(
        weekday: impl Into<WeekdayToken>,
        start: &str,
        end: &str,
        weeks: Vec<u32>,
    ) -> Self {
        Self {
            weekday: weekday.into(),
            start: start.to_string(),
            end: end.to_string(),
            weeks: WeeksInput::List(weeks),
            label: None,
        }
    }

    /// Use the stored text form for the weeks, e.g. `"1-8,10"`.
    pub fn with_weeks_text(mut self, weeks: &str) -> Self {
        self.weeks = WeeksInput::Text(weeks.to_string());
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// A manually excluded period for the whole group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionInput {
    #[serde(default, alias = "day")]
    pub weekday: WeekdayToken,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end: String,
}

impl ExclusionInput {
    pub fn new(weekday: impl Into<WeekdayToken>, start: &str, end: &str) -> Self {
        Self {
            weekday: weekday.into(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

// ── Validated records ───────────────────────────────────────────────────────

/// A recurring weekly occupied period. `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringInterval {
    weekday: Weekday,
    start: NaiveTime,
    end: NaiveTime,
    weeks: WeekSet,
    label: Option<String>,
}

impl RecurringInterval {
    /// # Errors
    ///
    /// Returns [`DropReason::EmptyRange`] when `start >= end`. Intervals that
    /// cross midnight are expressed as two records, one per day.
    pub fn new(
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
        weeks: WeekSet,
    ) -> Result<Self, DropReason> {
        check_range(start, end)?;
        Ok(Self {
            weekday,
            start,
            end,
            weeks,
            label: None,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn weeks(&self) -> &WeekSet {
        &self.weeks
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether this interval runs in term-week `week`.
    pub fn is_active(&self, week: u32) -> bool {
        self.weeks.is_active(week)
    }
}

/// A group-wide occupied period, already resolved to the target week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionWindow {
    weekday: Weekday,
    start: NaiveTime,
    end: NaiveTime,
}

impl ExclusionWindow {
    /// # Errors
    ///
    /// Returns [`DropReason::EmptyRange`] when `start >= end`.
    pub fn new(weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Self, DropReason> {
        check_range(start, end)?;
        Ok(Self {
            weekday,
            start,
            end,
        })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

fn check_range(start: NaiveTime, end: NaiveTime) -> Result<(), DropReason> {
    if start >= end {
        return Err(DropReason::EmptyRange {
            start: format_clock(start),
            end: format_clock(end),
        });
    }
    Ok(())
}

// ── Clock parsing ───────────────────────────────────────────────────────────

/// Parse a wall-clock time: `"14:00"`, `"8:05"`, `"14:00:00"`.
///
/// Seconds are accepted only when zero; the engine works at minute
/// resolution.
pub fn parse_clock(s: &str) -> Result<NaiveTime, DropReason> {
    let trimmed = s.trim();
    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
        .filter(|t| t.second() == 0);
    parsed.ok_or_else(|| DropReason::InvalidTime {
        value: s.to_string(),
    })
}

/// `HH:MM`.
pub fn format_clock(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

// ── Resolution ──────────────────────────────────────────────────────────────

/// Validate one participant's records.
///
/// Each record that fails weekday normalization, time parsing, week-list
/// validation, or the `start < end` check is dropped and reported in
/// `diagnostics`; the rest are returned in input order.
pub fn resolve_participant(
    participant: usize,
    inputs: &[IntervalInput],
    aliases: &WeekdayAliases,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<RecurringInterval> {
    let mut resolved = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        match resolve_interval(input, aliases) {
            Ok(interval) => resolved.push(interval),
            Err(reason) => {
                let record = RecordRef::Interval { participant, index };
                warn!(%record, %reason, "dropping malformed interval");
                diagnostics.push(Diagnostic { record, reason });
            }
        }
    }
    resolved
}

fn resolve_interval(
    input: &IntervalInput,
    aliases: &WeekdayAliases,
) -> Result<RecurringInterval, DropReason> {
    let weekday = aliases.normalize(&input.weekday)?;
    let start = parse_clock(&input.start)?;
    let end = parse_clock(&input.end)?;
    let weeks = input.weeks.week_set()?;
    let interval = RecurringInterval::new(weekday, start, end, weeks)?;
    Ok(match &input.label {
        Some(label) => interval.with_label(label.clone()),
        None => interval,
    })
}

/// Validate the exclusion windows, dropping malformed ones into
/// `diagnostics`.
pub fn resolve_exclusions(
    inputs: &[ExclusionInput],
    aliases: &WeekdayAliases,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ExclusionWindow> {
    let mut resolved = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let result = aliases.normalize(&input.weekday).and_then(|weekday| {
            ExclusionWindow::new(weekday, parse_clock(&input.start)?, parse_clock(&input.end)?)
        });
        match result {
            Ok(window) => resolved.push(window),
            Err(reason) => {
                let record = RecordRef::Exclusion { index };
                warn!(%record, %reason, "dropping malformed exclusion");
                diagnostics.push(Diagnostic { record, reason });
            }
        }
    }
    resolved
}
