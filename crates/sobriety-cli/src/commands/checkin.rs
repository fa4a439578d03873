use clap::Args;
use sobriety_core::{Config, Habit, Moment, Mood};

use super::{format_days, open_tracker};

#[derive(Args)]
pub struct CheckInArgs {
    /// How you feel today (great, good, okay, bad, terrible)
    #[arg(long)]
    mood: Mood,
    /// Habits used today, comma separated or repeated
    #[arg(long, value_delimiter = ',')]
    used: Vec<Habit>,
    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CheckInArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let now = Moment::now();
    let mut tracker = open_tracker(now.today)?;

    if config.check_in.require_tracked && tracker.preferences().is_empty() {
        return Err("no habits tracked yet; run `sobriety track <habit>` first".into());
    }

    for habit in &args.used {
        if !tracker.preferences().contains(*habit) {
            tracing::warn!(habit = %habit, "recording use of an untracked habit");
        }
    }

    let outcome = tracker.check_in(args.mood, args.used, now)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let verb = if outcome.replaced.is_some() {
        "Updated"
    } else {
        "Checked in"
    };
    println!(
        "{verb} for {} (mood: {})",
        outcome.record.day,
        outcome.record.mood.label()
    );

    for (habit, days) in tracker.tracked_streaks() {
        println!("  {:<12}{}", habit.label(), format_days(days));
    }

    if let Some(celebration) = &outcome.celebration {
        let names: Vec<&str> = celebration
            .milestones
            .iter()
            .map(|(habit, _)| habit.label())
            .collect();
        println!("🎉 Milestone reached: {}", names.join(", "));
    }

    Ok(())
}
