use clap::Args;
use serde::Serialize;
use sobriety_core::{CheckIn, Habit, Moment};

use super::{format_days, open_tracker};

#[derive(Args)]
pub struct StatusArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    today: String,
    tracked: Vec<TrackedStreak>,
    checked_in_today: bool,
    todays_check_in: Option<&'a CheckIn>,
}

#[derive(Serialize)]
struct TrackedStreak {
    habit: Habit,
    streak: u32,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = Moment::now();
    let tracker = open_tracker(now.today)?;
    let todays = tracker.todays_check_in(now.today);

    if args.json {
        let report = StatusReport {
            today: now.today.iso(),
            tracked: tracker
                .tracked_streaks()
                .into_iter()
                .map(|(habit, streak)| TrackedStreak { habit, streak })
                .collect(),
            checked_in_today: todays.is_some(),
            todays_check_in: todays,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if tracker.preferences().is_empty() {
        println!("No habits tracked. Use `sobriety track <habit>` to start.");
        return Ok(());
    }

    for (habit, days) in tracker.tracked_streaks() {
        println!("{:<12}{}", habit.label(), format_days(days));
    }
    println!();

    match todays {
        Some(record) => {
            println!("✓ Checked in today");
            println!("Mood: {}", record.mood.label());
            if !record.is_clean() {
                let used: Vec<&str> = record.used_habits.iter().map(|h| h.as_str()).collect();
                println!("Used: {}", used.join(", "));
            }
        }
        None => println!("Not checked in today. Run `sobriety checkin --mood <mood>`."),
    }

    Ok(())
}
