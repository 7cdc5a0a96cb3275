//! Group occupancy marking.
//!
//! Builds one [`DayGrid`] per weekday in the domain for each participant,
//! then ORs the participant grids and a separate exclusion grid into the
//! group grid. A block is free for the group only if every participant is
//! free and no exclusion covers it.

use chrono::{NaiveDate, NaiveTime, Weekday};
use tracing::trace;

use crate::calendar::{CalendarAnchor, HolidayCalendar};
use crate::grid::{DayGrid, GridConfig};
use crate::schedule::{ExclusionWindow, RecurringInterval};

/// Occupancy for each weekday of the domain, in domain order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    days: Vec<(Weekday, DayGrid)>,
}

impl WeekGrid {
    /// A fully free week over `weekdays`.
    pub fn free(weekdays: &[Weekday], grid: &GridConfig) -> Self {
        Self {
            days: weekdays
                .iter()
                .map(|wd| (*wd, DayGrid::free(grid.block_count())))
                .collect(),
        }
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DayGrid> {
        self.days
            .iter()
            .find(|(wd, _)| *wd == weekday)
            .map(|(_, day)| day)
    }

    fn day_mut(&mut self, weekday: Weekday) -> Option<&mut DayGrid> {
        self.days
            .iter_mut()
            .find(|(wd, _)| *wd == weekday)
            .map(|(_, day)| day)
    }

    /// Weekdays and their grids, in domain order.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DayGrid)> {
        self.days.iter().map(|(wd, day)| (*wd, day))
    }

    /// Mark `[start, end)` on `weekday`. Weekdays outside the domain are
    /// ignored.
    pub fn mark(&mut self, grid: &GridConfig, weekday: Weekday, start: NaiveTime, end: NaiveTime) {
        if let Some(day) = self.day_mut(weekday) {
            day.mark(grid.block_range(start, end));
        }
    }

    /// OR another week's occupancy into this one, weekday by weekday.
    pub fn union_with(&mut self, other: &WeekGrid) {
        for (weekday, theirs) in other.days() {
            if let Some(mine) = self.day_mut(weekday) {
                mine.union_with(theirs);
            }
        }
    }

    /// Free blocks summed across the domain.
    pub fn free_blocks(&self) -> usize {
        self.days.iter().map(|(_, day)| day.free_count()).sum()
    }
}

/// Which weekdays of the target week are suppressed by the holiday calendar.
///
/// The calendar is consulted exactly once per weekday of the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressedDays {
    days: Vec<(Weekday, NaiveDate)>,
}

impl SuppressedDays {
    pub fn none() -> Self {
        Self { days: Vec::new() }
    }

    pub fn evaluate<H: HolidayCalendar + ?Sized>(
        week: u32,
        weekdays: &[Weekday],
        anchor: &CalendarAnchor,
        holidays: &H,
    ) -> Self {
        let days = weekdays
            .iter()
            .filter_map(|wd| anchor.date_for(week, *wd).map(|date| (*wd, date)))
            .filter(|(wd, date)| {
                let suppressed = holidays.is_suppressed(*date);
                if suppressed {
                    trace!(weekday = %wd, %date, "date suppressed by holiday calendar");
                }
                suppressed
            })
            .collect();
        Self { days }
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.days.iter().any(|(wd, _)| *wd == weekday)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().map(|(_, date)| *date)
    }
}

/// Occupancy of one participant in `week`: every interval that is active
/// that week and does not fall on a suppressed date.
pub fn participant_grid(
    intervals: &[RecurringInterval],
    week: u32,
    weekdays: &[Weekday],
    grid: &GridConfig,
    suppressed: &SuppressedDays,
) -> WeekGrid {
    let mut occupancy = WeekGrid::free(weekdays, grid);
    for interval in intervals {
        if !interval.is_active(week) || suppressed.contains(interval.weekday()) {
            continue;
        }
        occupancy.mark(grid, interval.weekday(), interval.start(), interval.end());
    }
    occupancy
}

/// Occupancy imposed on the whole group by exclusion windows. Exclusions are
/// not subject to holiday suppression.
pub fn exclusion_grid(
    exclusions: &[ExclusionWindow],
    weekdays: &[Weekday],
    grid: &GridConfig,
) -> WeekGrid {
    let mut occupancy = WeekGrid::free(weekdays, grid);
    for window in exclusions {
        occupancy.mark(grid, window.weekday(), window.start(), window.end());
    }
    occupancy
}

/// The group's occupancy: union of all participant grids and the exclusion
/// grid.
pub fn group_grid(
    participants: &[Vec<RecurringInterval>],
    exclusions: &[ExclusionWindow],
    week: u32,
    weekdays: &[Weekday],
    grid: &GridConfig,
    suppressed: &SuppressedDays,
) -> WeekGrid {
    let mut group = exclusion_grid(exclusions, weekdays, grid);
    for intervals in participants {
        group.union_with(&participant_grid(intervals, week, weekdays, grid, suppressed));
    }
    group
}
