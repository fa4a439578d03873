use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sobriety", version, about = "Sobriety Tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's check-in
    Checkin(commands::checkin::CheckInArgs),
    /// Streaks for tracked habits and today's check-in
    Status(commands::status::StatusArgs),
    /// Recent check-ins, newest first
    History(commands::history::HistoryArgs),
    /// Toggle or list tracked habits
    Track(commands::track::TrackArgs),
    /// Write all check-ins to an export file
    Export(commands::transfer::ExportArgs),
    /// Replace all check-ins with the contents of an export file
    Import(commands::transfer::ImportArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SOBRIETY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Checkin(args) => commands::checkin::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::History(args) => commands::history::run(args),
        Commands::Track(args) => commands::track::run(args),
        Commands::Export(args) => commands::transfer::run_export(args),
        Commands::Import(args) => commands::transfer::run_import(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "sobriety", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
