use clap::Args;
use sobriety_core::{Config, Moment};

use super::open_tracker;

#[derive(Args)]
pub struct HistoryArgs {
    /// Number of check-ins to show (defaults to history.recent_limit)
    #[arg(long)]
    limit: Option<usize>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let limit = args
        .limit
        .unwrap_or(config.history.recent_limit as usize);

    let tracker = open_tracker(Moment::now().today)?;
    let recent = tracker.recent(limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recent)?);
        return Ok(());
    }

    if recent.is_empty() {
        println!("No check-ins yet.");
        return Ok(());
    }

    for record in recent {
        let habits = if record.is_clean() {
            "clean".to_string()
        } else {
            record
                .used_habits
                .iter()
                .map(|h| h.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("{}  {:<9}{}", record.day, record.mood.label(), habits);
    }

    Ok(())
}
