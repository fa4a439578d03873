use clap::Args;
use sobriety_core::{Habit, Moment};

use super::open_tracker;

#[derive(Args)]
pub struct TrackArgs {
    /// Habit to start or stop tracking
    #[arg(required_unless_present = "list")]
    habit: Option<Habit>,
    /// List tracked habits instead
    #[arg(long, conflicts_with = "habit")]
    list: bool,
}

pub fn run(args: TrackArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker(Moment::now().today)?;

    let habit = match (args.list, args.habit) {
        (false, Some(habit)) => habit,
        _ => {
            for habit in tracker.preferences().in_display_order() {
                println!("{habit}");
            }
            return Ok(());
        }
    };

    if tracker.toggle_tracking(habit)? {
        println!("tracking {habit}");
    } else {
        println!("stopped tracking {habit}");
    }
    Ok(())
}
