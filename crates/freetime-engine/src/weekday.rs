//! Weekday normalization.
//!
//! Timetables arrive with weekdays spelled many ways: `1`, `"Mon"`,
//! `"Monday"`, `"周一"`, `"星期一"`. Everything downstream of this module works
//! only with [`chrono::Weekday`]; the translation happens once, here, through
//! an explicit [`WeekdayAliases`] table owned by the caller.

use std::collections::HashMap;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};

use crate::diagnostics::DropReason;
use crate::input::LooseValue;

/// A weekday as it appears in input: either a number (1 = Monday .. 7 = Sunday)
/// or a name.
///
/// Deserialization never fails: values of any other shape (`null`, floats,
/// objects) land in [`WeekdayToken::Other`] and are rejected per record by
/// [`WeekdayAliases::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WeekdayToken {
    Number(i64),
    Name(String),
    Other(String),
}

impl Default for WeekdayToken {
    fn default() -> Self {
        WeekdayToken::Name(String::new())
    }
}

impl<'de> Deserialize<'de> for WeekdayToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match LooseValue::deserialize(deserializer)? {
            LooseValue::Int(n) => WeekdayToken::Number(n),
            LooseValue::Text(s) => WeekdayToken::Name(s),
            other => WeekdayToken::Other(other.to_string()),
        })
    }
}

impl fmt::Display for WeekdayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekdayToken::Number(n) => write!(f, "{n}"),
            WeekdayToken::Name(s) | WeekdayToken::Other(s) => f.write_str(s),
        }
    }
}

impl From<&str> for WeekdayToken {
    fn from(s: &str) -> Self {
        WeekdayToken::Name(s.to_string())
    }
}

impl From<i64> for WeekdayToken {
    fn from(n: i64) -> Self {
        WeekdayToken::Number(n)
    }
}

impl From<i32> for WeekdayToken {
    fn from(n: i32) -> Self {
        WeekdayToken::Number(i64::from(n))
    }
}

/// Alias table mapping weekday spellings to the canonical weekday.
///
/// Lookups trim surrounding whitespace and ignore ASCII case, so `"MON"`,
/// `" monday "` and `"Mon"` all resolve through the single `"mon"` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayAliases {
    table: HashMap<String, Weekday>,
}

const CANONICAL: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const ENGLISH: [(&str, &str); 7] = [
    ("monday", "mon"),
    ("tuesday", "tue"),
    ("wednesday", "wed"),
    ("thursday", "thu"),
    ("friday", "fri"),
    ("saturday", "sat"),
    ("sunday", "sun"),
];

const ZH_SHORT: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];
const ZH_LONG: [&str; 7] = [
    "星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日",
];

impl WeekdayAliases {
    /// An empty table. Every lookup fails until aliases are added.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// The standard table: ISO numbers `1`-`7`, English full names and
    /// abbreviations, and the Chinese `周X` / `星期X` forms (plus the
    /// colloquial `周天` / `星期天` for Sunday).
    pub fn standard() -> Self {
        let mut aliases = Self::empty();
        for (i, weekday) in CANONICAL.iter().enumerate() {
            aliases.insert(&(i + 1).to_string(), *weekday);
            aliases.insert(ENGLISH[i].0, *weekday);
            aliases.insert(ENGLISH[i].1, *weekday);
            aliases.insert(ZH_SHORT[i], *weekday);
            aliases.insert(ZH_LONG[i], *weekday);
        }
        aliases.insert("tues", Weekday::Tue);
        aliases.insert("thurs", Weekday::Thu);
        aliases.insert("周天", Weekday::Sun);
        aliases.insert("星期天", Weekday::Sun);
        aliases
    }

    /// Add (or replace) one alias.
    pub fn with_alias(mut self, alias: &str, weekday: Weekday) -> Self {
        self.insert(alias, weekday);
        self
    }

    fn insert(&mut self, alias: &str, weekday: Weekday) {
        self.table.insert(fold(alias), weekday);
    }

    /// Resolve a textual token.
    pub fn lookup(&self, token: &str) -> Option<Weekday> {
        self.table.get(&fold(token)).copied()
    }

    /// Resolve an input token to the canonical weekday.
    ///
    /// # Errors
    ///
    /// Returns [`DropReason::UnknownWeekday`] when the token is not in the
    /// table. Numeric tokens go through the table too, so a table without
    /// numeric aliases rejects `1`.
    pub fn normalize(&self, token: &WeekdayToken) -> Result<Weekday, DropReason> {
        let resolved = match token {
            WeekdayToken::Number(n) => self.lookup(&n.to_string()),
            WeekdayToken::Name(s) => self.lookup(s),
            WeekdayToken::Other(_) => None,
        };
        resolved.ok_or_else(|| DropReason::UnknownWeekday {
            token: token.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for WeekdayAliases {
    fn default() -> Self {
        Self::standard()
    }
}

fn fold(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}

/// Chinese short label ("周一".."周日") for display.
pub fn label_zh(weekday: Weekday) -> &'static str {
    ZH_SHORT[weekday.num_days_from_monday() as usize]
}
