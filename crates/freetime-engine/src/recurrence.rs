//! Term-week recurrence.
//!
//! A recurring interval either runs every week of the term or only in an
//! explicit set of term-weeks. Input formats express "every week" as an empty
//! list (or a blank stored string); [`WeekSet`] turns that convention into a
//! variant of its own so it can never be confused with "no weeks at all".

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};

use crate::diagnostics::DropReason;

/// Highest week number accepted in a week list or range.
pub const MAX_TERM_WEEK: u32 = 60;

/// The term-weeks a recurring interval applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WeekSet {
    /// Applies in every week, including weeks past the nominal term length.
    #[default]
    AllWeeks,
    /// Applies only in the listed weeks. Never empty.
    Weeks(BTreeSet<u32>),
}

impl WeekSet {
    /// Build from a list of week numbers. An empty list means every week.
    ///
    /// # Errors
    ///
    /// Returns [`DropReason::InvalidWeeks`] if the list contains week 0 or a
    /// week above [`MAX_TERM_WEEK`].
    pub fn from_weeks<I: IntoIterator<Item = u32>>(weeks: I) -> Result<Self, DropReason> {
        let set: BTreeSet<u32> = weeks.into_iter().collect();
        if set.contains(&0) || set.iter().any(|w| *w > MAX_TERM_WEEK) {
            return Err(DropReason::InvalidWeeks {
                value: format_list(&set),
            });
        }
        if set.is_empty() {
            Ok(WeekSet::AllWeeks)
        } else {
            Ok(WeekSet::Weeks(set))
        }
    }

    /// Parse the stored form: comma-separated week numbers with optional
    /// inclusive ranges, e.g. `"1,2,3"` or `"1-8,10"`. A blank string means
    /// every week.
    ///
    /// # Errors
    ///
    /// Returns [`DropReason::InvalidWeeks`] for non-numeric tokens, week 0,
    /// weeks above [`MAX_TERM_WEEK`], or descending ranges.
    pub fn parse(s: &str) -> Result<Self, DropReason> {
        let invalid = || DropReason::InvalidWeeks {
            value: s.to_string(),
        };

        let mut weeks = BTreeSet::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo: u32 = lo.trim().parse().map_err(|_| invalid())?;
                    let hi: u32 = hi.trim().parse().map_err(|_| invalid())?;
                    if lo == 0 || lo > hi || hi > MAX_TERM_WEEK {
                        return Err(invalid());
                    }
                    weeks.extend(lo..=hi);
                }
                None => {
                    let week: u32 = part.parse().map_err(|_| invalid())?;
                    if week == 0 || week > MAX_TERM_WEEK {
                        return Err(invalid());
                    }
                    weeks.insert(week);
                }
            }
        }

        if weeks.is_empty() {
            Ok(WeekSet::AllWeeks)
        } else {
            Ok(WeekSet::Weeks(weeks))
        }
    }

    /// Whether this set includes `week`.
    ///
    /// Weeks outside the term are evaluated mechanically: `AllWeeks` matches
    /// week 40 of a 20-week term.
    pub fn is_active(&self, week: u32) -> bool {
        match self {
            WeekSet::AllWeeks => true,
            WeekSet::Weeks(set) => set.contains(&week),
        }
    }

    pub fn is_all_weeks(&self) -> bool {
        matches!(self, WeekSet::AllWeeks)
    }
}

impl std::fmt::Display for WeekSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekSet::AllWeeks => Ok(()),
            WeekSet::Weeks(set) => f.write_str(&format_list(set)),
        }
    }
}

// Serialized back in the request shape: `[]` for every week.
impl Serialize for WeekSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WeekSet::AllWeeks => serializer.collect_seq(std::iter::empty::<u32>()),
            WeekSet::Weeks(set) => serializer.collect_seq(set),
        }
    }
}

fn format_list(set: &BTreeSet<u32>) -> String {
    set.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
