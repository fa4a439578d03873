//! Per-habit abstinence streaks.
//!
//! A streak counts consecutive check-in days, ending today, on which a
//! habit was not used. The walk starts at today and steps back one day per
//! record; it stops at the first record that is not dated exactly the day
//! being awaited, or that reports the habit as used. Skipping a day's
//! check-in therefore resets every streak, including skipping today.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::checkin::{CalendarDay, CheckIn, Habit};

/// Streak length per habit, in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Streaks {
    counts: BTreeMap<Habit, u32>,
}

impl Streaks {
    /// All habits at zero.
    pub fn zero() -> Self {
        Self {
            counts: Habit::ALL.into_iter().map(|h| (h, 0)).collect(),
        }
    }

    pub fn get(&self, habit: Habit) -> u32 {
        self.counts.get(&habit).copied().unwrap_or(0)
    }

    /// Every habit with its streak, in canonical habit order.
    pub fn iter(&self) -> impl Iterator<Item = (Habit, u32)> + '_ {
        self.counts.iter().map(|(h, n)| (*h, *n))
    }

    fn set(&mut self, habit: Habit, days: u32) {
        self.counts.insert(habit, days);
    }
}

impl Default for Streaks {
    fn default() -> Self {
        Self::zero()
    }
}

/// "day" for one, "days" otherwise.
pub fn unit_label(days: u32) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}

/// Derives [`Streaks`] from the check-in collection.
///
/// Stateless; recompute from scratch whenever the collection changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator;

impl StreakCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Streaks for every habit, tracked or not, ending at `today`.
    pub fn calculate(&self, records: &[CheckIn], today: CalendarDay) -> Streaks {
        let sorted = sorted_newest_first(records);
        let mut streaks = Streaks::zero();
        for habit in Habit::ALL {
            streaks.set(habit, walk(&sorted, habit, today));
        }
        streaks
    }

    /// Streak for a single habit ending at `today`.
    pub fn streak_for(&self, records: &[CheckIn], habit: Habit, today: CalendarDay) -> u32 {
        walk(&sorted_newest_first(records), habit, today)
    }
}

fn sorted_newest_first(records: &[CheckIn]) -> Vec<&CheckIn> {
    let mut sorted: Vec<&CheckIn> = records.iter().collect();
    sorted.sort_by(|a, b| b.day.cmp(&a.day));
    sorted
}

fn walk(sorted: &[&CheckIn], habit: Habit, today: CalendarDay) -> u32 {
    let mut expected = today;
    let mut streak = 0;

    for record in sorted {
        if record.day != expected || record.used(habit) {
            break;
        }
        streak += 1;
        expected = expected.pred();
    }

    streak
}
