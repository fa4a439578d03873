use std::path::PathBuf;

use clap::Args;
use sobriety_core::{Config, CoreError, ImportSource, Moment};

use super::open_tracker;

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (defaults to sobriety-tracker-<date>.json in export.directory)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Export file to import
    path: PathBuf,
}

pub fn run_export(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let now = Moment::now();
    let tracker = open_tracker(now.today)?;

    let document = tracker.export(now);
    let path = match args.out {
        Some(path) => path,
        None => {
            let dir = config
                .export
                .directory
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            dir.join(document.file_name())
        }
    };

    std::fs::write(&path, document.to_json(config.export.pretty)?)?;
    println!(
        "exported {} check-ins to {}",
        document.records.len(),
        path.display()
    );
    Ok(())
}

pub fn run_import(args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    // the file is read in full before the tracker is touched
    let mut source = ImportSource::read(&args.path)?;

    let now = Moment::now();
    let mut tracker = open_tracker(now.today)?;

    match tracker.import(&mut source, now) {
        Ok(Some(summary)) => {
            println!(
                "imported {} check-ins (replaced {})",
                summary.imported, summary.replaced
            );
            Ok(())
        }
        Ok(None) => {
            println!("nothing to import");
            Ok(())
        }
        Err(CoreError::Import(e)) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
