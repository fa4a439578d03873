//! Daily check-in records.
//!
//! One [`CheckIn`] per calendar day: the user's mood plus the habits they
//! report having used. A habit missing from `used_habits` means the user
//! abstained from it that day, whether or not it is currently tracked.

mod day;
mod store;

pub use day::CalendarDay;
pub use store::{CheckInStore, CHECKINS_KEY};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Habits the tracker knows about. Closed set.
///
/// Declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habit {
    Cigarettes,
    Vapes,
    Weed,
    Alcohol,
}

impl Habit {
    pub const ALL: [Habit; 4] = [Habit::Cigarettes, Habit::Vapes, Habit::Weed, Habit::Alcohol];

    pub fn as_str(&self) -> &'static str {
        match self {
            Habit::Cigarettes => "cigarettes",
            Habit::Vapes => "vapes",
            Habit::Weed => "weed",
            Habit::Alcohol => "alcohol",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Habit::Cigarettes => "Cigarettes",
            Habit::Vapes => "Vapes",
            Habit::Weed => "Weed",
            Habit::Alcohol => "Alcohol",
        }
    }
}

impl fmt::Display for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Habit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Habit::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownHabit(s.to_string()))
    }
}

/// How the user felt on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Great, Mood::Good, Mood::Okay, Mood::Bad, Mood::Terrible];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Bad => "bad",
            Mood::Terrible => "terrible",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Great => "Great",
            Mood::Good => "Good",
            Mood::Okay => "Okay",
            Mood::Bad => "Bad",
            Mood::Terrible => "Terrible",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownMood(s.to_string()))
    }
}

/// One day's check-in.
///
/// Wire form is `{ "date": ..., "mood": ..., "habits": [...] }`, shared by
/// the persisted collection and the export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    #[serde(rename = "date")]
    pub day: CalendarDay,

    pub mood: Mood,

    /// Habits used that day; serialized in canonical order
    #[serde(rename = "habits", default)]
    pub used_habits: BTreeSet<Habit>,
}

impl CheckIn {
    pub fn new(day: CalendarDay, mood: Mood, used: impl IntoIterator<Item = Habit>) -> Self {
        Self {
            day,
            mood,
            used_habits: used.into_iter().collect(),
        }
    }

    pub fn used(&self, habit: Habit) -> bool {
        self.used_habits.contains(&habit)
    }

    /// No habit used that day.
    pub fn is_clean(&self) -> bool {
        self.used_habits.is_empty()
    }
}
