//! Application state for one user session.
//!
//! [`Tracker`] owns the check-in store, the tracking preferences, the
//! current streaks and any visible celebration. All operations run
//! synchronously on the caller's thread; persistence goes through the
//! injected [`KeyValueStore`].

use std::rc::Rc;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::celebration::{Celebration, CelebrationTrigger};
use crate::checkin::{CalendarDay, CheckIn, CheckInStore, Habit, Mood};
use crate::error::{Result, StorageError};
use crate::preferences::TrackingPreferences;
use crate::storage::KeyValueStore;
use crate::streak::{StreakCalculator, Streaks};
use crate::transfer::{ExportedDocument, ImportExportCodec, ImportSource};

/// The user's local day together with the wall-clock instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub today: CalendarDay,
    pub instant: DateTime<Utc>,
}

impl Moment {
    pub fn now() -> Self {
        let local = Local::now();
        Self {
            today: CalendarDay::from_date(local.date_naive()),
            instant: local.with_timezone(&Utc),
        }
    }

    pub fn at(today: CalendarDay, instant: DateTime<Utc>) -> Self {
        Self { today, instant }
    }
}

/// Result of a submitted check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInOutcome {
    pub record: CheckIn,
    /// Earlier record for the same day that was overwritten
    pub replaced: Option<CheckIn>,
    /// Streaks ending yesterday, before this check-in was counted
    pub previous_streaks: Streaks,
    pub streaks: Streaks,
    pub celebration: Option<Celebration>,
}

/// Result of a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Records now in the store
    pub imported: usize,
    /// Records that were discarded
    pub replaced: usize,
    pub streaks: Streaks,
}

/// Single-session controller over the tracker state.
pub struct Tracker<S: KeyValueStore> {
    store: CheckInStore<Rc<S>>,
    preferences: TrackingPreferences<Rc<S>>,
    calculator: StreakCalculator,
    trigger: CelebrationTrigger,
    codec: ImportExportCodec,
    streaks: Streaks,
    streaks_as_of: CalendarDay,
    celebration: Option<Celebration>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Hydrate from `storage` and compute streaks ending at `today`.
    ///
    /// Never fails: unreadable or malformed stored data starts empty.
    pub fn open(storage: S, today: CalendarDay) -> Self {
        let storage = Rc::new(storage);
        let store = CheckInStore::load(Rc::clone(&storage));
        let preferences = TrackingPreferences::load(storage);
        let calculator = StreakCalculator::new();
        let streaks = calculator.calculate(store.all(), today);

        Self {
            store,
            preferences,
            calculator,
            trigger: CelebrationTrigger::new(),
            codec: ImportExportCodec::new(),
            streaks,
            streaks_as_of: today,
            celebration: None,
        }
    }

    /// Record today's check-in, replacing any earlier one for today.
    ///
    /// The celebration is decided from the streaks as they stood yesterday,
    /// before this record was counted.
    pub fn check_in(
        &mut self,
        mood: Mood,
        used: impl IntoIterator<Item = Habit>,
        now: Moment,
    ) -> Result<CheckInOutcome, StorageError> {
        let earlier: Vec<CheckIn> = self
            .store
            .all()
            .iter()
            .filter(|r| r.day != now.today)
            .cloned()
            .collect();
        let previous_streaks = self.calculator.calculate(&earlier, now.today.pred());

        let record = CheckIn::new(now.today, mood, used);
        let replaced = self.store.upsert(record.clone());
        // streaks follow the in-memory state even if persisting failed
        self.refresh_streaks(now.today);
        let replaced = replaced?;

        let celebration =
            self.trigger
                .evaluate(&previous_streaks, self.preferences.iter(), now.instant);
        if let Some(c) = &celebration {
            tracing::info!(milestones = ?c.milestones, "streak milestone reached");
            self.celebration = Some(c.clone());
        }

        Ok(CheckInOutcome {
            record,
            replaced,
            previous_streaks,
            streaks: self.streaks.clone(),
            celebration,
        })
    }

    /// Recompute streaks from scratch for `today`.
    pub fn refresh_streaks(&mut self, today: CalendarDay) -> &Streaks {
        self.streaks = self.calculator.calculate(self.store.all(), today);
        self.streaks_as_of = today;
        tracing::debug!(as_of = %today, streaks = ?self.streaks, "recomputed streaks");
        &self.streaks
    }

    pub fn streaks(&self) -> &Streaks {
        &self.streaks
    }

    /// Day the current streaks end at.
    pub fn streaks_as_of(&self) -> CalendarDay {
        self.streaks_as_of
    }

    /// Streaks for tracked habits, in display order.
    pub fn tracked_streaks(&self) -> Vec<(Habit, u32)> {
        self.preferences
            .in_display_order()
            .into_iter()
            .map(|h| (h, self.streaks.get(h)))
            .collect()
    }

    pub fn toggle_tracking(&mut self, habit: Habit) -> Result<bool, StorageError> {
        self.preferences.toggle(habit)
    }

    pub fn preferences(&self) -> &TrackingPreferences<Rc<S>> {
        &self.preferences
    }

    pub fn check_ins(&self) -> &[CheckIn] {
        self.store.all()
    }

    pub fn todays_check_in(&self, today: CalendarDay) -> Option<&CheckIn> {
        self.store.find_by_day(today)
    }

    /// Up to `limit` check-ins, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&CheckIn> {
        let mut sorted: Vec<&CheckIn> = self.store.all().iter().collect();
        sorted.sort_by(|a, b| b.day.cmp(&a.day));
        sorted.truncate(limit);
        sorted
    }

    /// The celebration still on screen at `now`, clearing it once expired.
    pub fn celebration(&mut self, now: DateTime<Utc>) -> Option<&Celebration> {
        if self
            .celebration
            .as_ref()
            .is_some_and(|c| !c.is_visible(now))
        {
            self.celebration = None;
        }
        self.celebration.as_ref()
    }

    /// Snapshot the collection into an export document.
    pub fn export(&self, now: Moment) -> ExportedDocument {
        let document = self.codec.export(self.store.all(), now.instant);
        tracing::info!(records = document.records.len(), file = %document.file_name(), "exported check-ins");
        document
    }

    /// Replace the collection with the contents of `source`.
    ///
    /// Returns `Ok(None)` when the source holds nothing. A rejected document
    /// leaves both the store and the source as they were; an accepted one
    /// clears the source.
    pub fn import(
        &mut self,
        source: &mut ImportSource,
        now: Moment,
    ) -> Result<Option<ImportSummary>> {
        let Some(raw) = source.contents() else {
            return Ok(None);
        };

        let records = match self.codec.import(raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(reason = %e.detail(), "import rejected");
                return Err(e.into());
            }
        };

        let replaced = self.store.len();
        let result = self.store.replace_all(records);
        self.refresh_streaks(now.today);
        result?;

        source.clear();
        let summary = ImportSummary {
            imported: self.store.len(),
            replaced,
            streaks: self.streaks.clone(),
        };
        tracing::info!(imported = summary.imported, replaced, "imported check-ins");
        Ok(Some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ImportError};
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> CalendarDay {
        CalendarDay::from_ymd(2026, 10, d).unwrap()
    }

    fn moment(d: u32) -> Moment {
        Moment::at(day(d), Utc.with_ymd_and_hms(2026, 10, d, 20, 0, 0).unwrap())
    }

    fn tracker_with(habits: &[Habit]) -> Tracker<MemoryStore> {
        let mut tracker = Tracker::open(MemoryStore::new(), day(1));
        for habit in habits {
            tracker.toggle_tracking(*habit).unwrap();
        }
        tracker
    }

    #[test]
    fn check_in_updates_streaks() {
        let mut tracker = tracker_with(&[Habit::Cigarettes]);
        tracker.check_in(Mood::Good, [], moment(10)).unwrap();
        let outcome = tracker.check_in(Mood::Good, [], moment(11)).unwrap();

        assert_eq!(outcome.streaks.get(Habit::Cigarettes), 2);
        assert_eq!(outcome.previous_streaks.get(Habit::Cigarettes), 1);
        assert_eq!(tracker.streaks_as_of(), day(11));
    }

    #[test]
    fn same_day_resubmission_replaces() {
        let mut tracker = tracker_with(&[Habit::Weed]);
        tracker.check_in(Mood::Bad, [Habit::Weed], moment(10)).unwrap();
        let outcome = tracker.check_in(Mood::Great, [], moment(10)).unwrap();

        assert_eq!(outcome.replaced.unwrap().mood, Mood::Bad);
        assert_eq!(tracker.check_ins().len(), 1);
        assert_eq!(tracker.streaks().get(Habit::Weed), 1);
    }

    #[test]
    fn fifth_clean_day_celebrates() {
        let mut tracker = tracker_with(&[Habit::Alcohol]);
        for d in 1..=4 {
            let outcome = tracker.check_in(Mood::Good, [], moment(d)).unwrap();
            assert!(outcome.celebration.is_none(), "day {d}");
        }

        let outcome = tracker.check_in(Mood::Great, [], moment(5)).unwrap();
        let celebration = outcome.celebration.expect("celebration on day five");
        assert_eq!(celebration.milestones, vec![(Habit::Alcohol, 4)]);
        assert_eq!(outcome.streaks.get(Habit::Alcohol), 5);

        let shown_at = moment(5).instant;
        assert!(tracker.celebration(shown_at + Duration::seconds(1)).is_some());
        assert!(tracker.celebration(shown_at + Duration::seconds(3)).is_none());
    }

    #[test]
    fn resubmitting_today_keeps_previous_streak() {
        let mut tracker = tracker_with(&[Habit::Vapes]);
        for d in 1..=5 {
            tracker.check_in(Mood::Good, [], moment(d)).unwrap();
        }

        let outcome = tracker.check_in(Mood::Okay, [], moment(5)).unwrap();
        assert_eq!(outcome.previous_streaks.get(Habit::Vapes), 4);
        assert!(outcome.celebration.is_some());
    }

    #[test]
    fn untracked_habits_do_not_celebrate() {
        let mut tracker = tracker_with(&[]);
        for d in 1..=5 {
            let outcome = tracker.check_in(Mood::Good, [], moment(d)).unwrap();
            assert!(outcome.celebration.is_none());
        }
    }

    #[test]
    fn tracked_streaks_in_display_order() {
        let mut tracker = tracker_with(&[Habit::Alcohol, Habit::Vapes]);
        tracker.check_in(Mood::Okay, [Habit::Alcohol], moment(3)).unwrap();
        assert_eq!(
            tracker.tracked_streaks(),
            vec![(Habit::Vapes, 1), (Habit::Alcohol, 0)]
        );
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let mut tracker = tracker_with(&[]);
        for d in [3, 1, 7, 5, 2, 6] {
            tracker.check_in(Mood::Okay, [], moment(d)).unwrap();
        }
        let days: Vec<CalendarDay> = tracker.recent(5).iter().map(|r| r.day).collect();
        assert_eq!(days, vec![day(7), day(6), day(5), day(3), day(2)]);
        assert!(tracker.todays_check_in(day(7)).is_some());
        assert!(tracker.todays_check_in(day(4)).is_none());
    }

    #[test]
    fn import_replaces_and_clears_source() {
        let mut tracker = tracker_with(&[Habit::Weed]);
        tracker.check_in(Mood::Bad, [Habit::Weed], moment(1)).unwrap();

        let mut source = ImportSource::from_bytes(
            r#"{"checkIns":[
                {"date":"2026-10-10","mood":"good","habits":[]},
                {"date":"2026-10-09","mood":"good","habits":[]}
            ]}"#,
        );
        let summary = tracker.import(&mut source, moment(10)).unwrap().unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.replaced, 1);
        assert_eq!(summary.streaks.get(Habit::Weed), 2);
        assert!(source.is_empty());
        assert!(tracker.todays_check_in(day(1)).is_none());
    }

    #[test]
    fn rejected_import_changes_nothing() {
        let mut tracker = tracker_with(&[]);
        tracker.check_in(Mood::Good, [], moment(4)).unwrap();
        let before = tracker.check_ins().to_vec();

        let mut source = ImportSource::from_bytes(r#"{"foo":1}"#);
        let err = tracker.import(&mut source, moment(4)).unwrap_err();
        assert!(matches!(err, CoreError::Import(ImportError::Format { .. })));
        assert!(!source.is_empty());

        let mut source = ImportSource::from_bytes("not json");
        let err = tracker.import(&mut source, moment(4)).unwrap_err();
        assert!(matches!(err, CoreError::Import(ImportError::Parse(_))));

        assert_eq!(tracker.check_ins(), before.as_slice());
    }

    #[test]
    fn empty_source_is_a_no_op() {
        let mut tracker = tracker_with(&[]);
        let mut source = ImportSource::default();
        assert!(tracker.import(&mut source, moment(4)).unwrap().is_none());
    }

    #[test]
    fn state_survives_reopen() {
        let storage = Rc::new(MemoryStore::new());
        {
            let mut tracker = Tracker::open(Rc::clone(&storage), day(1));
            tracker.toggle_tracking(Habit::Vapes).unwrap();
            tracker.check_in(Mood::Good, [], moment(15)).unwrap();
            tracker.check_in(Mood::Good, [], moment(16)).unwrap();
        }

        let tracker = Tracker::open(Rc::clone(&storage), day(16));
        assert!(tracker.preferences().contains(Habit::Vapes));
        assert_eq!(tracker.streaks().get(Habit::Vapes), 2);
    }
}
