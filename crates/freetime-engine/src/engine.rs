//! The free-time engine: request in, ranked report out.
//!
//! [`FreeTimeEngine`] owns only immutable configuration (grid geometry,
//! weekday aliases, term anchor, holiday calendar). Each call to
//! [`FreeTimeEngine::compute`] builds its grids on the stack and discards
//! them, so one engine can serve concurrent requests from many threads.
//!
//! # Pipeline
//!
//! 1. Validate records (weekday aliases, clock times, week lists); malformed
//!    records become [`Diagnostic`]s.
//! 2. Ask the holiday calendar about each date of the target week.
//! 3. Mark each participant's active, unsuppressed intervals; OR in the
//!    exclusion windows.
//! 4. Extract maximal free runs per weekday.
//! 5. Rank by weekday, distance from the ideal hour, and length.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{CalendarAnchor, FixedHolidays, HolidayCalendar};
use crate::config::EngineConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{FreeTimeError, Result};
use crate::extract::{extract_free_intervals, FreeInterval};
use crate::grid::GridConfig;
use crate::occupancy::{group_grid, SuppressedDays};
use crate::rank::{rank, recommend};
use crate::schedule::{
    resolve_exclusions, resolve_participant, ExclusionInput, ExclusionWindow, IntervalInput,
    RecurringInterval,
};
use crate::weekday::{label_zh, WeekdayAliases};

// ── Request / report ────────────────────────────────────────────────────────

/// One free-time computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTimeRequest {
    /// One schedule per participant. An empty schedule means "free all day".
    #[serde(alias = "schedules")]
    pub participants: Vec<Vec<IntervalInput>>,
    #[serde(default = "default_week")]
    pub week: u32,
    #[serde(default, alias = "excluded_times")]
    pub exclusions: Vec<ExclusionInput>,
    /// Overrides the configured ideal hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_hour: Option<u32>,
    /// Minimum length of the recommended interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration_minutes: Option<u32>,
}

fn default_week() -> u32 {
    1
}

impl FreeTimeRequest {
    pub fn new(week: u32) -> Self {
        Self {
            participants: Vec::new(),
            week,
            exclusions: Vec::new(),
            ideal_hour: None,
            min_duration_minutes: None,
        }
    }

    pub fn participant(mut self, schedule: Vec<IntervalInput>) -> Self {
        self.participants.push(schedule);
        self
    }

    pub fn exclusion(mut self, exclusion: ExclusionInput) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    pub fn ideal_hour(mut self, hour: u32) -> Self {
        self.ideal_hour = Some(hour);
        self
    }

    pub fn min_duration_minutes(mut self, minutes: u32) -> Self {
        self.min_duration_minutes = Some(minutes);
        self
    }
}

/// A weekday of the target week and its calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekDate {
    pub weekday: Weekday,
    pub date: NaiveDate,
    /// Chinese short label, e.g. "周一".
    pub label: &'static str,
}

/// Result of a free-time computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeTimeReport {
    pub week: u32,
    /// Ranked, best first within each weekday.
    pub free_intervals: Vec<FreeInterval>,
    pub recommended_interval: Option<FreeInterval>,
    /// Free blocks summed across all weekdays of the domain.
    pub total_free_blocks: usize,
    pub dates: Vec<WeekDate>,
    /// Dates of the target week on which recurring intervals were ignored.
    pub suppressed_dates: Vec<NaiveDate>,
    /// Records dropped as malformed.
    pub diagnostics: Vec<Diagnostic>,
}

/// Ranking options for [`FreeTimeEngine::compute_resolved`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankOptions {
    pub ideal_hour: Option<u32>,
    pub min_duration_minutes: Option<u32>,
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct FreeTimeEngine {
    grid: GridConfig,
    weekdays: Vec<Weekday>,
    aliases: WeekdayAliases,
    anchor: CalendarAnchor,
    holidays: Box<dyn HolidayCalendar + Send + Sync>,
    ideal_hour: u32,
    term_length: u32,
}

impl fmt::Debug for FreeTimeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeTimeEngine")
            .field("grid", &self.grid)
            .field("weekdays", &self.weekdays)
            .field("anchor", &self.anchor)
            .field("ideal_hour", &self.ideal_hour)
            .field("term_length", &self.term_length)
            .finish_non_exhaustive()
    }
}

impl FreeTimeEngine {
    /// Build an engine from a configuration, validating it first.
    ///
    /// The holiday calendar comes from the configuration's `[holidays]`
    /// section; use [`FreeTimeEngine::with_holidays`] to substitute another.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid: config.grid_config()?,
            weekdays: config.weekdays(),
            aliases: WeekdayAliases::standard(),
            anchor: config.anchor(),
            holidays: Box::new(config.holiday_calendar()?),
            ideal_hour: config.ranking.ideal_hour,
            term_length: config.term.length_weeks,
        })
    }

    pub fn with_holidays<H>(mut self, holidays: H) -> Self
    where
        H: HolidayCalendar + Send + Sync + 'static,
    {
        self.holidays = Box::new(holidays);
        self
    }

    pub fn with_aliases(mut self, aliases: WeekdayAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn anchor(&self) -> &CalendarAnchor {
        &self.anchor
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    /// The term-week to use for `today`, clamped to the configured term.
    pub fn current_week(&self, today: NaiveDate) -> u32 {
        self.anchor.current_week(today, self.term_length)
    }

    /// Dates of each domain weekday in `week`.
    pub fn week_dates(&self, week: u32) -> Result<Vec<WeekDate>> {
        if week == 0 {
            return Err(FreeTimeError::InvalidWeek(week));
        }
        Ok(self
            .weekdays
            .iter()
            .filter_map(|wd| {
                self.anchor
                    .date_for(week, *wd)
                    .map(|date| WeekDate {
                        weekday: *wd,
                        date,
                        label: label_zh(*wd),
                    })
            })
            .collect())
    }

    /// Compute shared free time for a request.
    ///
    /// # Errors
    ///
    /// Returns [`FreeTimeError::EmptyParticipantSet`] when the request has no
    /// participants, [`FreeTimeError::InvalidWeek`] for week 0, and
    /// [`FreeTimeError::InvalidIdealHour`] for an ideal hour above 23. Malformed
    /// individual records are not errors; they are reported in
    /// [`FreeTimeReport::diagnostics`].
    pub fn compute(&self, request: &FreeTimeRequest) -> Result<FreeTimeReport> {
        if request.participants.is_empty() {
            return Err(FreeTimeError::EmptyParticipantSet);
        }

        let mut diagnostics = Vec::new();
        let participants: Vec<Vec<RecurringInterval>> = request
            .participants
            .iter()
            .enumerate()
            .map(|(i, schedule)| resolve_participant(i, schedule, &self.aliases, &mut diagnostics))
            .collect();
        let exclusions = resolve_exclusions(&request.exclusions, &self.aliases, &mut diagnostics);

        let options = RankOptions {
            ideal_hour: request.ideal_hour,
            min_duration_minutes: request.min_duration_minutes,
        };
        let mut report = self.compute_resolved(&participants, &exclusions, request.week, options)?;
        report.diagnostics = diagnostics;
        Ok(report)
    }

    /// Compute shared free time from already validated records.
    pub fn compute_resolved(
        &self,
        participants: &[Vec<RecurringInterval>],
        exclusions: &[ExclusionWindow],
        week: u32,
        options: RankOptions,
    ) -> Result<FreeTimeReport> {
        if participants.is_empty() {
            return Err(FreeTimeError::EmptyParticipantSet);
        }
        if week == 0 {
            return Err(FreeTimeError::InvalidWeek(week));
        }
        let ideal_hour = options.ideal_hour.unwrap_or(self.ideal_hour);
        if ideal_hour > 23 {
            return Err(FreeTimeError::InvalidIdealHour(ideal_hour));
        }

        let suppressed =
            SuppressedDays::evaluate(week, &self.weekdays, &self.anchor, self.holidays.as_ref());
        let occupancy = group_grid(
            participants,
            exclusions,
            week,
            &self.weekdays,
            &self.grid,
            &suppressed,
        );

        let mut free_intervals = extract_free_intervals(&occupancy, &self.grid);
        rank(&mut free_intervals, ideal_hour);
        let recommended_interval = recommend(&free_intervals, options.min_duration_minutes);
        let total_free_blocks = occupancy.free_blocks();

        debug!(
            week,
            participants = participants.len(),
            exclusions = exclusions.len(),
            suppressed = suppressed.dates().count(),
            intervals = free_intervals.len(),
            total_free_blocks,
            "computed shared free time"
        );

        Ok(FreeTimeReport {
            week,
            free_intervals,
            recommended_interval,
            total_free_blocks,
            dates: self.week_dates(week)?,
            suppressed_dates: suppressed.dates().collect(),
            diagnostics: Vec::new(),
        })
    }
}

impl Default for FreeTimeEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            grid: GridConfig::default(),
            weekdays: config.weekdays(),
            aliases: WeekdayAliases::standard(),
            anchor: config.anchor(),
            holidays: Box::new(FixedHolidays::china_statutory()),
            ideal_hour: config.ranking.ideal_hour,
            term_length: config.term.length_weeks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::NoHolidays;

    fn engine() -> FreeTimeEngine {
        FreeTimeEngine::default().with_holidays(NoHolidays)
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FreeTimeEngine>();
    }

    #[test]
    fn test_no_participants_is_error() {
        let err = engine().compute(&FreeTimeRequest::new(1)).unwrap_err();
        assert_eq!(err, FreeTimeError::EmptyParticipantSet);
    }

    #[test]
    fn test_week_zero_is_error() {
        let request = FreeTimeRequest::new(0).participant(vec![]);
        assert_eq!(
            engine().compute(&request).unwrap_err(),
            FreeTimeError::InvalidWeek(0)
        );
    }

    #[test]
    fn test_single_empty_schedule_is_all_free() {
        let report = engine()
            .compute(&FreeTimeRequest::new(1).participant(vec![]))
            .unwrap();
        assert_eq!(report.free_intervals.len(), 5);
        assert_eq!(report.total_free_blocks, 5 * 28);
        assert_eq!(report.recommended_interval, Some(report.free_intervals[0]));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_report_carries_week_dates() {
        let report = engine()
            .compute(&FreeTimeRequest::new(2).participant(vec![]))
            .unwrap();
        assert_eq!(report.week, 2);
        assert_eq!(report.dates.len(), 5);
        assert_eq!(
            report.dates[0].date,
            NaiveDate::from_ymd_opt(2024, 9, 9).unwrap()
        );
    }

    #[test]
    fn test_malformed_records_reported_not_fatal() {
        let request = FreeTimeRequest::new(1)
            .participant(vec![
                IntervalInput::new("Mon", "08:00", "09:00", vec![]),
                IntervalInput::new("Blursday", "08:00", "09:00", vec![]),
            ])
            .exclusion(ExclusionInput::new("Tue", "nope", "09:00"));
        let report = engine().compute(&request).unwrap();
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.total_free_blocks, 5 * 28 - 2);
    }

    #[test]
    fn test_request_ideal_hour_overrides_default() {
        let request = FreeTimeRequest::new(1)
            .participant(vec![IntervalInput::new("Mon", "12:00", "13:00", vec![])])
            .ideal_hour(8);
        let report = engine().compute(&request).unwrap();
        let best = report.recommended_interval.unwrap();
        assert_eq!(best.weekday, Weekday::Mon);
        assert_eq!(best.start_hour(), 8);
    }

    #[test]
    fn test_request_ideal_hour_out_of_range_is_error() {
        let request = FreeTimeRequest::new(1).participant(vec![]).ideal_hour(99);
        assert_eq!(
            engine().compute(&request).unwrap_err(),
            FreeTimeError::InvalidIdealHour(99)
        );
        let edge = FreeTimeRequest::new(1).participant(vec![]).ideal_hour(23);
        assert!(engine().compute(&edge).is_ok());
    }

    #[test]
    fn test_week_dates_carry_labels() {
        let dates = engine().week_dates(1).unwrap();
        assert_eq!(dates[0].label, "周一");
        assert_eq!(dates[4].label, "周五");
    }

    #[test]
    fn test_one_bad_record_does_not_reject_request() {
        let json = r#"{
            "participants": [[
                {"weekday": "Mon", "start": "08:00", "end": "09:00"},
                {"weekday": null, "start": "08:00", "end": "09:00"}
            ]],
            "week": 1
        }"#;
        let request: FreeTimeRequest = serde_json::from_str(json).unwrap();
        let report = engine().compute(&request).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.total_free_blocks, 5 * 28 - 2);
    }

    #[test]
    fn test_current_week_uses_term_length() {
        let e = engine();
        assert_eq!(e.current_week(NaiveDate::from_ymd_opt(2024, 9, 10).unwrap()), 2);
        assert_eq!(e.current_week(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()), 20);
    }

    #[test]
    fn test_request_accepts_field_aliases() {
        let json = r#"{
            "schedules": [[{"day": "周一", "start": "08:00", "end": "09:40", "weeks": [1, 2]}]],
            "week": 2,
            "excluded_times": [{"day": "周二", "start": "12:00", "end": "13:00"}]
        }"#;
        let request: FreeTimeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.participants.len(), 1);
        assert_eq!(request.week, 2);
        assert_eq!(request.exclusions.len(), 1);
    }

    #[test]
    fn test_week_defaults_to_one() {
        let request: FreeTimeRequest = serde_json::from_str(r#"{"participants": [[]]}"#).unwrap();
        assert_eq!(request.week, 1);
    }
}
