//! Ranking of free intervals by time-of-day preference.
//!
//! The order is grouped by weekday, then by how close the window's start hour
//! is to the ideal hour, then longest first. The sort is stable, so any
//! remaining ties keep extraction order (weekday, then block).

use crate::extract::FreeInterval;

/// Mid-afternoon: late enough to avoid morning classes, early enough to
/// avoid evening ones.
pub const DEFAULT_IDEAL_HOUR: u32 = 15;

/// Sort key for one interval. Lower sorts first.
pub fn rank_key(interval: &FreeInterval, ideal_hour: u32) -> (u32, u32, i64) {
    (
        interval.weekday.num_days_from_monday(),
        interval.start_hour().abs_diff(ideal_hour),
        -i64::from(interval.duration_minutes),
    )
}

/// Sort `intervals` in place by [`rank_key`].
pub fn rank(intervals: &mut [FreeInterval], ideal_hour: u32) {
    intervals.sort_by_key(|interval| rank_key(interval, ideal_hour));
}

/// The recommended interval from an already ranked list: the first one, or
/// the first at least `min_duration_minutes` long when a minimum is given.
pub fn recommend(ranked: &[FreeInterval], min_duration_minutes: Option<u32>) -> Option<FreeInterval> {
    let minimum = min_duration_minutes.unwrap_or(0);
    ranked
        .iter()
        .find(|interval| interval.duration_minutes >= minimum)
        .copied()
}
