//! Habits the user has chosen to monitor.
//!
//! Tracking only affects what is shown and which streaks can celebrate;
//! check-ins about an untracked habit are kept and still count.

use crate::checkin::Habit;
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key for the tracked-habit list. Stable across releases.
pub const TRACKING_KEY: &str = "tracking-categories";

/// Ordered set of tracked habits, in the order they were selected.
pub struct TrackingPreferences<S: KeyValueStore> {
    storage: S,
    habits: Vec<Habit>,
}

impl<S: KeyValueStore> TrackingPreferences<S> {
    /// Hydrate from storage; absent or malformed data means nothing is tracked.
    pub fn load(storage: S) -> Self {
        let habits = match storage.get(TRACKING_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Habit>>(&json) {
                Ok(stored) => {
                    let mut habits = Vec::with_capacity(stored.len());
                    for habit in stored {
                        if !habits.contains(&habit) {
                            habits.push(habit);
                        }
                    }
                    habits
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored tracking preferences are malformed");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read tracking preferences");
                Vec::new()
            }
        };

        Self { storage, habits }
    }

    /// Track `habit` if it is not tracked, stop tracking it otherwise, then
    /// persist. Returns whether the habit is tracked afterwards.
    pub fn toggle(&mut self, habit: Habit) -> Result<bool, StorageError> {
        let now_tracked = match self.habits.iter().position(|h| *h == habit) {
            Some(index) => {
                self.habits.remove(index);
                false
            }
            None => {
                self.habits.push(habit);
                true
            }
        };

        tracing::debug!(habit = %habit, tracked = now_tracked, "toggled tracking");
        self.persist()?;
        Ok(now_tracked)
    }

    pub fn contains(&self, habit: Habit) -> bool {
        self.habits.contains(&habit)
    }

    /// Tracked habits in selection order.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Tracked habits in canonical display order.
    pub fn in_display_order(&self) -> Vec<Habit> {
        Habit::ALL
            .into_iter()
            .filter(|h| self.contains(*h))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Habit> + '_ {
        self.habits.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.habits)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.storage.set(TRACKING_KEY, &json)
    }
}
