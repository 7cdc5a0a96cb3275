//! Free-interval extraction from a group occupancy grid.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Serialize, Serializer};

use crate::grid::GridConfig;
use crate::occupancy::WeekGrid;

/// A window in which every participant is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeInterval {
    pub weekday: Weekday,
    #[serde(serialize_with = "serialize_clock")]
    pub start: NaiveTime,
    #[serde(serialize_with = "serialize_clock")]
    pub end: NaiveTime,
    pub duration_minutes: u32,
}

impl FreeInterval {
    /// Hour of day the window starts in (14 for 14:30).
    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }
}

fn serialize_clock<S: Serializer>(t: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&t.format("%H:%M"))
}

/// Emit every maximal free run of every weekday, in weekday (domain) order
/// and then block order.
pub fn extract_free_intervals(occupancy: &WeekGrid, grid: &GridConfig) -> Vec<FreeInterval> {
    let mut intervals = Vec::new();
    for (weekday, day) in occupancy.days() {
        for run in day.free_runs() {
            intervals.push(FreeInterval {
                weekday,
                start: grid.block_start(run.start),
                end: grid.block_start(run.end),
                duration_minutes: run.len() as u32 * grid.block_minutes(),
            });
        }
    }
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_free_week_gives_one_interval_per_day() {
        let grid = GridConfig::default();
        let weekdays = [Weekday::Mon, Weekday::Tue];
        let occ = WeekGrid::free(&weekdays, &grid);

        let free = extract_free_intervals(&occ, &grid);

        assert_eq!(free.len(), 2);
        for (interval, weekday) in free.iter().zip(weekdays) {
            assert_eq!(interval.weekday, weekday);
            assert_eq!(interval.start, t(8, 0));
            assert_eq!(interval.end, t(22, 0));
            assert_eq!(interval.duration_minutes, 840);
        }
    }

    #[test]
    fn test_runs_become_clock_intervals() {
        let grid = GridConfig::default();
        let mut occ = WeekGrid::free(&[Weekday::Wed], &grid);
        occ.mark(&grid, Weekday::Wed, t(8, 0), t(8, 20));
        occ.mark(&grid, Weekday::Wed, t(12, 0), t(13, 0));

        let free = extract_free_intervals(&occ, &grid);

        assert_eq!(free.len(), 2);
        assert_eq!((free[0].start, free[0].end), (t(8, 30), t(12, 0)));
        assert_eq!(free[0].duration_minutes, 210);
        assert_eq!((free[1].start, free[1].end), (t(13, 0), t(22, 0)));
        assert_eq!(free[1].duration_minutes, 540);
    }

    #[test]
    fn test_fully_busy_day_emits_nothing() {
        let grid = GridConfig::default();
        let mut occ = WeekGrid::free(&[Weekday::Thu], &grid);
        occ.mark(&grid, Weekday::Thu, t(7, 0), t(23, 0));
        assert!(extract_free_intervals(&occ, &grid).is_empty());
    }

    #[test]
    fn test_serializes_clock_as_hh_mm() {
        let interval = FreeInterval {
            weekday: Weekday::Mon,
            start: t(15, 30),
            end: t(22, 0),
            duration_minutes: 390,
        };
        let json = serde_json::to_value(interval).unwrap();
        assert_eq!(json["weekday"], "Mon");
        assert_eq!(json["start"], "15:30");
        assert_eq!(json["end"], "22:00");
        assert_eq!(json["duration_minutes"], 390);
    }
}
