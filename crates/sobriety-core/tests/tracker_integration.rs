//! Integration tests for the check-in, streak and celebration workflow.

use std::rc::Rc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use sobriety_core::{
    CalendarDay, CheckIn, CheckInStore, Database, Habit, KeyValueStore, MemoryStore, Moment, Mood,
    StreakCalculator, Tracker, CHECKINS_KEY, TRACKING_KEY,
};
use tempfile::TempDir;

fn today() -> CalendarDay {
    CalendarDay::from_ymd(2026, 10, 16).unwrap()
}

fn moment(days_ago: u64) -> Moment {
    let day = today().days_before(days_ago);
    let instant = Utc
        .from_utc_datetime(&day.date().and_hms_opt(19, 0, 0).unwrap());
    Moment::at(day, instant)
}

#[test]
fn test_four_clean_days_after_a_cigarette() {
    let storage = MemoryStore::new();
    let mut tracker = Tracker::open(&storage, today());
    tracker.toggle_tracking(Habit::Cigarettes).unwrap();

    tracker
        .check_in(Mood::Bad, [Habit::Cigarettes], moment(4))
        .unwrap();
    for days_ago in (0..=3).rev() {
        tracker.check_in(Mood::Good, [], moment(days_ago)).unwrap();
    }

    assert_eq!(tracker.streaks().get(Habit::Cigarettes), 4);
    assert_eq!(tracker.tracked_streaks(), vec![(Habit::Cigarettes, 4)]);
}

#[test]
fn test_skipping_today_resets_streaks_on_reopen() {
    let storage = Rc::new(MemoryStore::new());
    {
        let mut tracker = Tracker::open(Rc::clone(&storage), today());
        for days_ago in (1..=10).rev() {
            tracker.check_in(Mood::Okay, [], moment(days_ago)).unwrap();
        }
        assert_eq!(tracker.streaks().get(Habit::Weed), 10);
    }

    // a new session today, before checking in
    let tracker = Tracker::open(Rc::clone(&storage), today());
    for (_, days) in tracker.streaks().iter() {
        assert_eq!(days, 0);
    }
    assert!(tracker.todays_check_in(today()).is_none());
}

#[test]
fn test_celebration_on_each_fifth_day() {
    let storage = MemoryStore::new();
    let mut tracker = Tracker::open(&storage, today());
    tracker.toggle_tracking(Habit::Vapes).unwrap();

    let mut celebrated_on = Vec::new();
    for days_ago in (0..15).rev() {
        let outcome = tracker.check_in(Mood::Great, [], moment(days_ago)).unwrap();
        if outcome.celebration.is_some() {
            celebrated_on.push(outcome.streaks.get(Habit::Vapes));
        }
    }

    assert_eq!(celebrated_on, vec![5, 10, 15]);
}

#[test]
fn test_used_habit_still_celebrates_from_previous_streak() {
    // the trigger looks at yesterday's streak only
    let storage = MemoryStore::new();
    let mut tracker = Tracker::open(&storage, today());
    tracker.toggle_tracking(Habit::Alcohol).unwrap();

    for days_ago in (1..=4).rev() {
        tracker.check_in(Mood::Good, [], moment(days_ago)).unwrap();
    }
    let outcome = tracker
        .check_in(Mood::Terrible, [Habit::Alcohol], moment(0))
        .unwrap();

    assert!(outcome.celebration.is_some());
    assert_eq!(outcome.streaks.get(Habit::Alcohol), 0);
}

#[test]
fn test_sqlite_backed_session() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sobriety.db");

    {
        let db = Database::open_at(&path).unwrap();
        let mut tracker = Tracker::open(db, today());
        tracker.toggle_tracking(Habit::Weed).unwrap();
        tracker.toggle_tracking(Habit::Alcohol).unwrap();
        tracker.check_in(Mood::Good, [], moment(1)).unwrap();
        tracker.check_in(Mood::Good, [Habit::Alcohol], moment(0)).unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let stored = db.get(TRACKING_KEY).unwrap().unwrap();
    assert_eq!(stored, r#"["weed","alcohol"]"#);
    let stored: serde_json::Value =
        serde_json::from_str(&db.get(CHECKINS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 2);

    let tracker = Tracker::open(db, today());
    assert_eq!(tracker.streaks().get(Habit::Weed), 2);
    assert_eq!(tracker.streaks().get(Habit::Alcohol), 0);
}

proptest! {
    #[test]
    fn upsert_keeps_one_record_per_day(
        entries in prop::collection::vec((0u64..10, 0usize..5, prop::bool::ANY), 1..40)
    ) {
        let storage = MemoryStore::new();
        let mut store = CheckInStore::empty(&storage);
        let mut last_for_day = std::collections::HashMap::new();

        for (days_ago, mood_index, used) in entries {
            let habits = if used { vec![Habit::Weed] } else { vec![] };
            let record = CheckIn::new(today().days_before(days_ago), Mood::ALL[mood_index], habits);
            last_for_day.insert(record.day, record.clone());
            store.upsert(record).unwrap();
        }

        prop_assert_eq!(store.len(), last_for_day.len());
        for (day, record) in &last_for_day {
            prop_assert_eq!(store.find_by_day(*day), Some(record));
        }
    }

    #[test]
    fn streak_never_exceeds_record_count(offsets in prop::collection::vec(0u64..20, 0..30)) {
        let records: Vec<CheckIn> = offsets
            .into_iter()
            .map(|n| CheckIn::new(today().days_before(n), Mood::Okay, []))
            .collect();
        let streaks = StreakCalculator::new().calculate(&records, today());
        for (_, days) in streaks.iter() {
            prop_assert!(days as usize <= records.len());
        }
    }
}
