//! In-place minification of a record directory into the compact schema.
//! A success ratio below 100% is reported, not treated as a failure.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use legado_core::config::MinifyConfig;
use legado_core::minify::MinificationEngine;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "minify", about = "Rewrite record files into the compact schema")]
struct Args {
    /// JSON config file; flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of record files.
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Worker threads (default: available cores).
    #[arg(short, long)]
    workers: Option<usize>,

    /// Extension of record files.
    #[arg(short, long)]
    extension: Option<String>,

    /// Verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn max_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

fn init_logging(verbosity: u8) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level(verbosity))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber failed")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let mut config = match &args.config {
        Some(path) => MinifyConfig::load_from(path)?,
        None => MinifyConfig::default(),
    };
    if let Some(dir) = args.dir {
        config.dir = dir;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(extension) = args.extension {
        config.extension = extension;
    }

    let dir = config.dir.clone();
    let engine = MinificationEngine::new(config)?;
    let report = engine
        .run()
        .with_context(|| format!("minifying {}", dir.display()))?;

    println!(
        "Successfully processed {} out of {} files ({:.2}% success rate)",
        report.succeeded,
        report.total,
        100.0 * report.success_ratio()
    );
    if report.already_compact > 0 {
        println!("{} files were already compact and left untouched", report.already_compact);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_level() {
        assert_eq!(max_level(0), tracing::Level::WARN);
        assert_eq!(max_level(1), tracing::Level::INFO);
        assert_eq!(max_level(2), tracing::Level::DEBUG);
        assert_eq!(max_level(7), tracing::Level::TRACE);
    }

    #[test]
    fn flags_parse() {
        let args = Args::try_parse_from(["minify", "-vv", "-w", "3", "-d", "records"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.workers, Some(3));
        assert_eq!(args.dir, Some(PathBuf::from("records")));
        assert_eq!(max_level(args.verbose), tracing::Level::DEBUG);
    }
}
