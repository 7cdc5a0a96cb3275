//! Fixed-resolution time grid over the waking day.
//!
//! One day is the half-open clock window `[day_start, day_end)` cut into
//! blocks of `block_minutes`. Occupancy is tracked per block, and an interval
//! that touches any part of a block occupies the whole block: rounding always
//! goes toward "busy", so a free block is free for its entire length.

use std::ops::Range;

use chrono::{NaiveTime, Timelike};

use crate::error::{FreeTimeError, Result};

/// Validated grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    day_start: NaiveTime,
    day_end: NaiveTime,
    block_minutes: u32,
}

impl GridConfig {
    /// Build a grid.
    ///
    /// # Errors
    ///
    /// Returns [`FreeTimeError::Configuration`] when `day_start >= day_end`,
    /// when `block_minutes` is zero, when the window length is not a whole
    /// number of blocks, or when either bound has a seconds component.
    pub fn new(day_start: NaiveTime, day_end: NaiveTime, block_minutes: u32) -> Result<Self> {
        if day_start >= day_end {
            return Err(FreeTimeError::Configuration(format!(
                "day start {} must be before day end {}",
                day_start.format("%H:%M"),
                day_end.format("%H:%M")
            )));
        }
        if block_minutes == 0 {
            return Err(FreeTimeError::Configuration(
                "block size must be at least one minute".to_string(),
            ));
        }
        if day_start.second() != 0 || day_end.second() != 0 {
            return Err(FreeTimeError::Configuration(
                "day bounds must fall on whole minutes".to_string(),
            ));
        }
        let span = minute_of_day(day_end) - minute_of_day(day_start);
        if span % block_minutes != 0 {
            return Err(FreeTimeError::Configuration(format!(
                "day window of {span} minutes is not divisible into {block_minutes}-minute blocks"
            )));
        }
        Ok(Self {
            day_start,
            day_end,
            block_minutes,
        })
    }

    pub fn day_start(&self) -> NaiveTime {
        self.day_start
    }

    pub fn day_end(&self) -> NaiveTime {
        self.day_end
    }

    pub fn block_minutes(&self) -> u32 {
        self.block_minutes
    }

    /// Number of blocks per day.
    pub fn block_count(&self) -> usize {
        ((minute_of_day(self.day_end) - minute_of_day(self.day_start)) / self.block_minutes)
            as usize
    }

    /// Signed minutes from `day_start` to `time`.
    fn offset(&self, time: NaiveTime) -> i64 {
        i64::from(minute_of_day(time)) - i64::from(minute_of_day(self.day_start))
    }

    /// The block containing `time`, clamped to `[0, block_count)`.
    pub fn block_index(&self, time: NaiveTime) -> usize {
        let raw = self.offset(time).div_euclid(i64::from(self.block_minutes));
        raw.clamp(0, self.block_count() as i64 - 1) as usize
    }

    /// The blocks touched by `[start, end)`.
    ///
    /// The start rounds down and the end rounds up to block boundaries, then
    /// both are clamped to the grid. Intervals entirely outside the window, or
    /// with `start >= end`, give an empty range.
    pub fn block_range(&self, start: NaiveTime, end: NaiveTime) -> Range<usize> {
        let bm = i64::from(self.block_minutes);
        let count = self.block_count() as i64;

        let first = self.offset(start).div_euclid(bm).clamp(0, count);
        let end_offset = self.offset(end);
        let mut last = end_offset.div_euclid(bm);
        if end_offset.rem_euclid(bm) != 0 || end.second() != 0 {
            last += 1;
        }
        let last = last.clamp(0, count);

        if first >= last {
            return 0..0;
        }
        first as usize..last as usize
    }

    /// Clock time at the start of block `index`. `index == block_count`
    /// gives `day_end`.
    pub fn block_start(&self, index: usize) -> NaiveTime {
        let minutes = minute_of_day(self.day_start) + index as u32 * self.block_minutes;
        NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).unwrap_or(self.day_end)
    }
}

impl Default for GridConfig {
    /// 08:00-22:00 in 30-minute blocks (28 blocks).
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            day_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            block_minutes: 30,
        }
    }
}

fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

// ── Day grid ────────────────────────────────────────────────────────────────

/// Occupancy of one day: `true` = occupied, `false` = free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGrid {
    blocks: Vec<bool>,
}

impl DayGrid {
    /// A fully free day with `block_count` blocks.
    pub fn free(block_count: usize) -> Self {
        Self {
            blocks: vec![false; block_count],
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Mark a block range occupied. Indices past the end are ignored.
    pub fn mark(&mut self, range: Range<usize>) {
        let end = range.end.min(self.blocks.len());
        let start = range.start.min(end);
        for block in &mut self.blocks[start..end] {
            *block = true;
        }
    }

    /// OR another day's occupancy into this one.
    pub fn union_with(&mut self, other: &DayGrid) {
        for (mine, theirs) in self.blocks.iter_mut().zip(&other.blocks) {
            *mine |= *theirs;
        }
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.blocks.get(index).copied().unwrap_or(true)
    }

    pub fn free_count(&self) -> usize {
        self.blocks.iter().filter(|b| !**b).count()
    }

    /// Maximal runs of free blocks, left to right.
    ///
    /// A virtual occupied block at `len()` closes a run that reaches the end
    /// of the day.
    pub fn free_runs(&self) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        let mut run_start: Option<usize> = None;

        for i in 0..=self.blocks.len() {
            let occupied = self.is_occupied(i);
            match (run_start, occupied) {
                (None, false) => run_start = Some(i),
                (Some(s), true) => {
                    runs.push(s..i);
                    run_start = None;
                }
                _ => {}
            }
        }

        runs
    }
}
