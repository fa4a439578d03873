//! Calendar day value type.
//!
//! A check-in is keyed by the user's local calendar date with no time of
//! day. Saved data written by earlier versions stores the date as a
//! `Date.toDateString()` rendering (`Fri Oct 16 2026`); imported files may
//! carry ISO dates or full instants instead. All of these normalize to the
//! same [`CalendarDay`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Storage rendering, kept stable for existing saves.
const DISPLAY_FORMAT: &str = "%a %b %d %Y";

/// Date-only renderings accepted on input, tried in order.
const DATE_FORMATS: &[&str] = &[DISPLAY_FORMAT, "%Y-%m-%d", "%m/%d/%Y", "%b %d %Y"];

/// Date-time renderings without an offset (date part is used).
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A single calendar date in the user's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today according to the local clock.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day. Saturates at the earliest representable date.
    pub fn pred(&self) -> Self {
        Self(self.0.pred_opt().unwrap_or(self.0))
    }

    /// The day `n` days earlier, saturating like [`CalendarDay::pred`].
    pub fn days_before(&self, n: u64) -> Self {
        Self(self.0.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN))
    }

    /// ISO-8601 date, e.g. `2026-10-16`.
    pub fn iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Ok(Self(date));
            }
        }

        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(instant.date_naive()));
        }

        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(datetime.date()));
            }
        }

        Err(ValidationError::InvalidDay(s.to_string()))
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
