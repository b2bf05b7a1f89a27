//! Bulk record generation: one pretty-printed record file per serial number
//! plus a GeoJSON index of every minted location. Prints the run report as
//! JSON on stdout.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use legado_core::config::GenerateConfig;
use legado_core::generator::BulkGenerator;
use legado_core::land::LandMask;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "generate", about = "Generate synthetic geotagged climate records")]
struct Args {
    /// Land boundary GeoJSON (Natural Earth admin-0 countries).
    #[arg(short, long)]
    land: Option<PathBuf>,

    /// JSON config file; flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving the record files.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of records to generate.
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Run seed; random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log progress every N records.
    #[arg(long)]
    progress_interval: Option<u64>,

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
        Some(path) => GenerateConfig::load_from(path)?,
        None => GenerateConfig::default(),
    };
    if let Some(land) = args.land {
        config.land_path = Some(land);
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(count) = args.count {
        config.total_count = count;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(interval) = args.progress_interval {
        config.progress_interval = interval;
    }

    let Some(land_path) = config.land_path.clone() else {
        bail!("no land boundary given: pass --land or set land_path in the config");
    };
    let land = LandMask::load(&land_path)
        .with_context(|| format!("loading land boundary {}", land_path.display()))?;
    info!("loaded {} land polygons from {}", land.polygon_count(), land_path.display());

    let generator = BulkGenerator::new(config, &land)?;
    let report = generator.run().context("generation aborted")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_level() {
        assert_eq!(max_level(0), tracing::Level::WARN);
        assert_eq!(max_level(1), tracing::Level::INFO);
        assert_eq!(max_level(3), tracing::Level::TRACE);
    }

    #[test]
    fn flags_parse() {
        let args = Args::try_parse_from(["generate", "-l", "land.geojson", "-n", "10", "-v"]).unwrap();
        assert_eq!(args.land, Some(PathBuf::from("land.geojson")));
        assert_eq!(args.count, Some(10));
        assert_eq!(args.verbose, 1);
    }
}
