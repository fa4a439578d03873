//! Milestone celebration after a check-in.
//!
//! The trigger looks at the streaks as they stood before the check-in was
//! counted: a tracked habit whose previous streak `s` satisfies
//! `s > 0 && (s + 1) % 5 == 0` is about to reach a multiple of five.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::checkin::Habit;
use crate::streak::Streaks;

/// Streak multiple that earns a celebration.
pub const CELEBRATION_INTERVAL: u32 = 5;

/// How long the celebration stays visible.
pub const CELEBRATION_DURATION_MS: i64 = 3000;

/// A transient celebration signal. Clears itself after its duration; no
/// acknowledgement is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub started_at: DateTime<Utc>,
    pub duration_ms: i64,
    /// Tracked habits that hit the milestone, with their previous streak
    pub milestones: Vec<(Habit, u32)>,
}

impl Celebration {
    pub fn duration(&self) -> Duration {
        Duration::milliseconds(self.duration_ms)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.started_at + self.duration()
    }

    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now >= self.started_at && now < self.expires_at()
    }
}

/// Pure predicate deciding whether a check-in earns a celebration.
#[derive(Debug, Clone, Copy, Default)]
pub struct CelebrationTrigger;

impl CelebrationTrigger {
    pub fn new() -> Self {
        Self
    }

    /// Whether a single previous streak value is one short of a milestone.
    pub fn is_milestone(previous_streak: u32) -> bool {
        previous_streak > 0 && (previous_streak + 1) % CELEBRATION_INTERVAL == 0
    }

    /// Tracked habits whose previous streak qualifies, in `tracked` order.
    pub fn milestones(
        &self,
        previous: &Streaks,
        tracked: impl IntoIterator<Item = Habit>,
    ) -> Vec<(Habit, u32)> {
        tracked
            .into_iter()
            .map(|habit| (habit, previous.get(habit)))
            .filter(|(_, streak)| Self::is_milestone(*streak))
            .collect()
    }

    pub fn fires(&self, previous: &Streaks, tracked: impl IntoIterator<Item = Habit>) -> bool {
        !self.milestones(previous, tracked).is_empty()
    }

    /// A single celebration starting at `now`, or `None` when nothing qualifies.
    pub fn evaluate(
        &self,
        previous: &Streaks,
        tracked: impl IntoIterator<Item = Habit>,
        now: DateTime<Utc>,
    ) -> Option<Celebration> {
        let milestones = self.milestones(previous, tracked);
        if milestones.is_empty() {
            return None;
        }
        Some(Celebration {
            started_at: now,
            duration_ms: CELEBRATION_DURATION_MS,
            milestones,
        })
    }
}
