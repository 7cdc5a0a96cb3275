//! Term calendar and holiday suppression.
//!
//! [`CalendarAnchor`] ties abstract term-weeks to concrete dates, and
//! [`HolidayCalendar`] decides which of those dates are suppressed. Neither
//! reads the system clock: callers pass "today" where it matters, and the
//! holiday policy is injected rather than baked into module constants.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ── Calendar anchor ─────────────────────────────────────────────────────────

/// Maps (term-week, weekday) pairs to calendar dates.
///
/// Week 1 is the Monday-to-Sunday week containing `term_start`. Terms almost
/// always begin on a Monday, in which case `term_start` is that Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarAnchor {
    term_start: NaiveDate,
}

impl CalendarAnchor {
    pub fn new(term_start: NaiveDate) -> Self {
        Self { term_start }
    }

    pub fn term_start(&self) -> NaiveDate {
        self.term_start
    }

    /// Monday of term-week 1.
    fn first_monday(&self) -> NaiveDate {
        self.term_start
            - Duration::days(i64::from(self.term_start.weekday().num_days_from_monday()))
    }

    /// The concrete date of `weekday` in term-week `week`.
    ///
    /// Returns `None` for week 0 or when the date falls outside chrono's
    /// representable range.
    pub fn date_for(&self, week: u32, weekday: Weekday) -> Option<NaiveDate> {
        if week == 0 {
            return None;
        }
        let offset_days =
            i64::from(week - 1) * 7 + i64::from(weekday.num_days_from_monday());
        self.first_monday()
            .checked_add_signed(Duration::days(offset_days))
    }

    /// First (Monday) and last (Sunday) date of term-week `week`.
    pub fn week_bounds(&self, week: u32) -> Option<(NaiveDate, NaiveDate)> {
        Some((
            self.date_for(week, Weekday::Mon)?,
            self.date_for(week, Weekday::Sun)?,
        ))
    }

    /// The term-week containing `date`, or `None` if `date` precedes week 1.
    pub fn week_of(&self, date: NaiveDate) -> Option<u32> {
        let days = (date - self.first_monday()).num_days();
        if days < 0 {
            return None;
        }
        u32::try_from(days / 7 + 1).ok()
    }

    /// The teaching week to show for `today`.
    ///
    /// Dates before the term resolve to week 1 and dates after it to the last
    /// week, so the result always lies in `1..=term_length`.
    pub fn current_week(&self, today: NaiveDate, term_length: u32) -> u32 {
        let last = term_length.max(1);
        match self.week_of(today) {
            None => 1,
            Some(week) => week.min(last),
        }
    }
}

// ── Holiday calendars ───────────────────────────────────────────────────────

/// Decides whether recurring activity is suspended on a date.
///
/// Implemented for [`NoHolidays`], [`FixedHolidays`], and any
/// `Fn(NaiveDate) -> bool`, so callers can plug in their own source.
pub trait HolidayCalendar {
    fn is_suppressed(&self, date: NaiveDate) -> bool;
}

impl<F> HolidayCalendar for F
where
    F: Fn(NaiveDate) -> bool,
{
    fn is_suppressed(&self, date: NaiveDate) -> bool {
        self(date)
    }
}

/// A calendar with no suppressed dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_suppressed(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// Fixed (month, day) holidays that recur every year, optionally with
/// weekends suppressed as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedHolidays {
    days: BTreeSet<(u32, u32)>,
    suppress_weekends: bool,
}

/// Mainland China statutory holidays as fixed (month, day) pairs. The lunar
/// holidays use one representative year's dates.
const CHINA_STATUTORY: &[(u32, u32)] = &[
    (1, 1),
    (2, 14),
    (2, 15),
    (2, 16),
    (2, 17),
    (2, 18),
    (2, 19),
    (2, 20),
    (4, 4),
    (4, 5),
    (4, 6),
    (5, 1),
    (5, 2),
    (5, 3),
    (6, 10),
    (6, 11),
    (6, 12),
    (9, 15),
    (9, 16),
    (9, 17),
    (10, 1),
    (10, 2),
    (10, 3),
    (10, 4),
    (10, 5),
    (10, 6),
    (10, 7),
];

impl FixedHolidays {
    pub fn new<I: IntoIterator<Item = (u32, u32)>>(days: I) -> Self {
        Self {
            days: days.into_iter().collect(),
            suppress_weekends: false,
        }
    }

    pub fn china_statutory() -> Self {
        Self::new(CHINA_STATUTORY.iter().copied())
    }

    pub fn with_weekends(mut self, suppress: bool) -> Self {
        self.suppress_weekends = suppress;
        self
    }

    pub fn with_days<I: IntoIterator<Item = (u32, u32)>>(mut self, days: I) -> Self {
        self.days.extend(days);
        self
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl HolidayCalendar for FixedHolidays {
    fn is_suppressed(&self, date: NaiveDate) -> bool {
        if self.suppress_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return true;
        }
        self.days.contains(&(date.month(), date.day()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn anchor() -> CalendarAnchor {
        // Monday
        CalendarAnchor::new(date(2024, 9, 2))
    }

    // ── date_for ────────────────────────────────────────────────────────

    #[test]
    fn test_week_one_monday_is_term_start() {
        assert_eq!(anchor().date_for(1, Weekday::Mon), Some(date(2024, 9, 2)));
        assert_eq!(anchor().date_for(1, Weekday::Fri), Some(date(2024, 9, 6)));
    }

    #[test]
    fn test_later_weeks() {
        // Week 6 Tuesday: 2024-09-02 + 35 + 1 days
        assert_eq!(anchor().date_for(6, Weekday::Tue), Some(date(2024, 10, 8)));
    }

    #[test]
    fn test_week_zero_has_no_date() {
        assert_eq!(anchor().date_for(0, Weekday::Mon), None);
    }

    #[test]
    fn test_mid_week_term_start_aligns_to_monday() {
        // Wednesday start: week 1 still begins on the Monday before.
        let a = CalendarAnchor::new(date(2024, 9, 4));
        assert_eq!(a.date_for(1, Weekday::Mon), Some(date(2024, 9, 2)));
        assert_eq!(a.week_of(date(2024, 9, 2)), Some(1));
    }

    #[test]
    fn test_week_bounds() {
        assert_eq!(
            anchor().week_bounds(2),
            Some((date(2024, 9, 9), date(2024, 9, 15)))
        );
    }

    // ── week_of / current_week ──────────────────────────────────────────

    #[test]
    fn test_week_of() {
        assert_eq!(anchor().week_of(date(2024, 9, 1)), None);
        assert_eq!(anchor().week_of(date(2024, 9, 8)), Some(1));
        assert_eq!(anchor().week_of(date(2024, 9, 9)), Some(2));
    }

    #[test]
    fn test_current_week_clamps_to_term() {
        let a = anchor();
        assert_eq!(a.current_week(date(2024, 8, 1), 20), 1);
        assert_eq!(a.current_week(date(2024, 9, 18), 20), 3);
        assert_eq!(a.current_week(date(2025, 6, 1), 20), 20);
    }

    // ── holidays ────────────────────────────────────────────────────────

    #[test]
    fn test_china_statutory_national_day() {
        let h = FixedHolidays::china_statutory();
        assert!(h.is_suppressed(date(2024, 10, 1)));
        assert!(h.is_suppressed(date(2031, 10, 7)));
        assert!(!h.is_suppressed(date(2024, 10, 8)));
    }

    #[test]
    fn test_weekend_suppression_is_opt_in() {
        let saturday = date(2024, 9, 7);
        assert!(!FixedHolidays::default().is_suppressed(saturday));
        assert!(FixedHolidays::default()
            .with_weekends(true)
            .is_suppressed(saturday));
    }

    #[test]
    fn test_no_holidays() {
        assert!(!NoHolidays.is_suppressed(date(2024, 1, 1)));
    }

    #[test]
    fn test_closure_calendar() {
        let only_christmas = |d: NaiveDate| d.month() == 12 && d.day() == 25;
        assert!(only_christmas.is_suppressed(date(2024, 12, 25)));
        assert!(!only_christmas.is_suppressed(date(2024, 12, 24)));
    }

    #[test]
    fn test_with_days_extends() {
        let h = FixedHolidays::new([(1, 1)]).with_days([(12, 25)]);
        assert_eq!(h.len(), 2);
        assert!(h.is_suppressed(date(2024, 12, 25)));
    }
}
