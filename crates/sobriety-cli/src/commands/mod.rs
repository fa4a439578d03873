pub mod checkin;
pub mod config;
pub mod history;
pub mod status;
pub mod track;
pub mod transfer;

use sobriety_core::{CalendarDay, Database, Tracker};

/// Open the tracker over the database in the data directory.
pub fn open_tracker(today: CalendarDay) -> Result<Tracker<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(Tracker::open(db, today))
}

/// "3 days", "1 day".
pub fn format_days(days: u32) -> String {
    format!("{days} {}", sobriety_core::unit_label(days))
}
