//! # freetime-engine
//!
//! Deterministic shared free-time computation over recurring weekly
//! schedules.
//!
//! Given each participant's weekly timetable (intervals tagged with the
//! term-weeks they run in), a target week, and group-wide exclusions, the
//! engine finds the windows when everyone is free and ranks them by a
//! time-of-day preference. It never reads files, clocks, databases, or the
//! network: all inputs, including the holiday calendar, are passed in.
//!
//! ## Modules
//!
//! - [`weekday`] — Weekday alias table → canonical [`chrono::Weekday`]
//! - [`recurrence`] — Term-week membership with an explicit "every week" variant
//! - [`calendar`] — Term anchor (week ↔ date) and holiday suppression
//! - [`grid`] — Fixed-size time blocks over the waking day
//! - [`schedule`] — Input records, validated records, per-record diagnostics
//! - [`occupancy`] — Per-participant and group occupancy grids
//! - [`extract`] — Maximal free runs → [`FreeInterval`]s
//! - [`rank`] — Preference ordering and recommendation
//! - [`config`] — TOML configuration, validated at load time
//! - [`engine`] — [`FreeTimeEngine`]: request → [`FreeTimeReport`]
//! - [`diagnostics`] — Dropped-record reports
//! - [`error`] — Error types

pub mod calendar;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod extract;
pub mod grid;
mod input;
pub mod occupancy;
pub mod rank;
pub mod recurrence;
pub mod schedule;
pub mod weekday;

pub use calendar::{CalendarAnchor, FixedHolidays, HolidayCalendar, NoHolidays};
pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, DropReason, RecordRef};
pub use engine::{FreeTimeEngine, FreeTimeReport, FreeTimeRequest, RankOptions, WeekDate};
pub use error::FreeTimeError;
pub use extract::{extract_free_intervals, FreeInterval};
pub use grid::{DayGrid, GridConfig};
pub use rank::{rank, recommend, DEFAULT_IDEAL_HOUR};
pub use recurrence::{WeekSet, MAX_TERM_WEEK};
pub use schedule::{
    parse_clock, ExclusionInput, ExclusionWindow, IntervalInput, RecurringInterval, WeeksInput,
};
pub use weekday::{WeekdayAliases, WeekdayToken};
