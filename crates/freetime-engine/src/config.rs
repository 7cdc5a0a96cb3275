//! Engine configuration.
//!
//! Loaded once (typically from TOML) and validated before any computation
//! runs, so a bad grid or holiday table fails at startup instead of on the
//! first request. Every field has a default; an empty file is a valid
//! configuration.
//!
//! ```toml
//! [grid]
//! day_start = "08:00"
//! day_end = "22:00"
//! block_minutes = 30
//!
//! [term]
//! start = "2024-09-02"
//! length_weeks = 20
//!
//! [ranking]
//! ideal_hour = 15
//!
//! [holidays]
//! preset = "china-statutory"
//! fixed = [[12, 25]]
//! suppress_weekends = false
//!
//! [domain]
//! include_weekends = false
//! ```

use std::path::Path;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarAnchor, FixedHolidays};
use crate::error::{FreeTimeError, Result};
use crate::grid::GridConfig;
use crate::rank::DEFAULT_IDEAL_HOUR;
use crate::schedule::parse_clock;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub grid: GridSection,
    pub term: TermSection,
    pub ranking: RankingSection,
    pub holidays: HolidaySection,
    pub domain: DomainSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSection {
    pub day_start: String,
    pub day_end: String,
    pub block_minutes: u32,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            day_start: "08:00".to_string(),
            day_end: "22:00".to_string(),
            block_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TermSection {
    /// First day of term-week 1.
    pub start: NaiveDate,
    pub length_weeks: u32,
}

impl Default for TermSection {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap_or_default(),
            length_weeks: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingSection {
    pub ideal_hour: u32,
}

impl Default for RankingSection {
    fn default() -> Self {
        Self {
            ideal_hour: DEFAULT_IDEAL_HOUR,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HolidayPreset {
    None,
    #[default]
    ChinaStatutory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HolidaySection {
    pub preset: HolidayPreset,
    /// Extra (month, day) pairs on top of the preset.
    pub fixed: Vec<(u32, u32)>,
    pub suppress_weekends: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DomainSection {
    pub include_weekends: bool,
}

impl EngineConfig {
    /// Parse a TOML document. Does not validate; see [`EngineConfig::validate`].
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FreeTimeError::ConfigParse(e.to_string()))
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FreeTimeError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`FreeTimeError::Configuration`] for an invalid grid, a zero
    /// term length, an ideal hour past 23, or an impossible holiday date.
    pub fn validate(&self) -> Result<()> {
        self.grid_config()?;
        self.holiday_calendar()?;
        if self.term.length_weeks == 0 {
            return Err(FreeTimeError::Configuration(
                "term length must be at least one week".to_string(),
            ));
        }
        if self.ranking.ideal_hour > 23 {
            return Err(FreeTimeError::Configuration(format!(
                "ideal hour {} is not an hour of the day",
                self.ranking.ideal_hour
            )));
        }
        Ok(())
    }

    pub fn grid_config(&self) -> Result<GridConfig> {
        let clock = |field: &str, value: &str| {
            parse_clock(value).map_err(|reason| {
                FreeTimeError::Configuration(format!("grid.{field}: {reason}"))
            })
        };
        GridConfig::new(
            clock("day_start", &self.grid.day_start)?,
            clock("day_end", &self.grid.day_end)?,
            self.grid.block_minutes,
        )
    }

    pub fn holiday_calendar(&self) -> Result<FixedHolidays> {
        for &(month, day) in &self.holidays.fixed {
            // 2000 is a leap year, so Feb 29 is accepted.
            if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
                return Err(FreeTimeError::Configuration(format!(
                    "holiday ({month}, {day}) is not a calendar day"
                )));
            }
        }
        let base = match self.holidays.preset {
            HolidayPreset::None => FixedHolidays::default(),
            HolidayPreset::ChinaStatutory => FixedHolidays::china_statutory(),
        };
        Ok(base
            .with_days(self.holidays.fixed.iter().copied())
            .with_weekends(self.holidays.suppress_weekends))
    }

    pub fn anchor(&self) -> CalendarAnchor {
        CalendarAnchor::new(self.term.start)
    }

    /// The weekdays free time is computed for, Monday first.
    pub fn weekdays(&self) -> Vec<Weekday> {
        let mut days = vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ];
        if self.domain.include_weekends {
            days.extend([Weekday::Sat, Weekday::Sun]);
        }
        days
    }
}
