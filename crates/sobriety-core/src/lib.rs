//! # Sobriety Tracker Core Library
//!
//! This library provides the core logic for the Sobriety Tracker: one daily
//! check-in (a mood plus the habits used that day) and, per habit, a
//! consecutive-day streak of abstinence ending today.
//!
//! ## Architecture
//!
//! - **Check-ins**: day-keyed records with upsert semantics, persisted as a
//!   whole collection through a key-value port
//! - **Streaks**: pure derivation from the collection, recomputed after
//!   every change
//! - **Celebration**: milestone predicate over the pre-check-in streaks
//! - **Transfer**: versioned JSON export/import with schema validation
//! - **Storage**: SQLite key-value database and TOML configuration
//!
//! ## Key Components
//!
//! - [`Tracker`]: Application state controller
//! - [`CheckInStore`]: Day-keyed record collection
//! - [`StreakCalculator`]: Streak derivation
//! - [`ImportExportCodec`]: Export document codec
//! - [`KeyValueStore`]: Persistence port

pub mod celebration;
pub mod checkin;
pub mod error;
pub mod preferences;
pub mod storage;
pub mod streak;
pub mod tracker;
pub mod transfer;

pub use celebration::{Celebration, CelebrationTrigger, CELEBRATION_DURATION_MS, CELEBRATION_INTERVAL};
pub use checkin::{CalendarDay, CheckIn, CheckInStore, Habit, Mood, CHECKINS_KEY};
pub use error::{ConfigError, CoreError, ImportError, StorageError, ValidationError};
pub use preferences::{TrackingPreferences, TRACKING_KEY};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use streak::{unit_label, StreakCalculator, Streaks};
pub use tracker::{CheckInOutcome, ImportSummary, Moment, Tracker};
pub use transfer::{export_file_name, ExportedDocument, ImportExportCodec, ImportSource, FORMAT_VERSION};
