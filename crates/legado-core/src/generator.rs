//! Bulk generator: drives the whole record pipeline for serials 1..=N.
//!
//! Stages per serial, in order: mint instant, land coordinate, provider
//! readings plus record assembly, record file, index feature. Each random
//! stage owns its own stream derived from the run seed, so changing one
//! stage never shifts the draws of another.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GenerateConfig};
use crate::fsutil::write_atomic;
use crate::geoindex::{point_feature, GeoIndex, IndexError};
use crate::land::sampler::{CoordinateSampler, SampleError};
use crate::land::LandContainment;
use crate::record::{record_path, MetadataRecord, RecordBuilder};
use crate::synth::{ConditionsProvider, SyntheticProvider};

// ── Stage seeds ───────────────────────────────────────────────────────────────

const MINT_SEED_SALT: u64 = 0x0171_7E00_0000_0003;
const COORD_SEED_SALT: u64 = 0xC00E_D000_0000_0004;

// ── Errors and report ─────────────────────────────────────────────────────────

/// Fatal conditions. Per-record failures are counted in the report instead.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub requested: u64,
    pub written: u64,
    pub write_failures: u64,
    pub provider_failures: u64,
    pub index_failures: u64,
}

impl std::fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "wrote {} of {} records (seed {}; {} write failures, {} provider failures, \
             {} index failures)",
            self.written,
            self.requested,
            self.seed,
            self.write_failures,
            self.provider_failures,
            self.index_failures
        )
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

pub struct BulkGenerator<'a> {
    config: GenerateConfig,
    land: &'a dyn LandContainment,
    seed: u64,
}

impl<'a> BulkGenerator<'a> {
    /// Validates the config and fixes the run seed.
    pub fn new(config: GenerateConfig, land: &'a dyn LandContainment) -> Result<Self, GenerateError> {
        config.validate()?;
        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random();
                info!("no seed configured; using {seed}");
                seed
            }
        };
        Ok(Self { config, land, seed })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    /// Run with the synthetic provider.
    pub fn run(&self) -> Result<GenerationReport, GenerateError> {
        self.run_with(&mut SyntheticProvider::new(self.seed))
    }

    /// Run with any provider. Fatal errors abort; everything already
    /// written stays on disk.
    pub fn run_with<P: ConditionsProvider + ?Sized>(
        &self,
        provider: &mut P,
    ) -> Result<GenerationReport, GenerateError> {
        let cfg = &self.config;
        fs::create_dir_all(&cfg.output_dir).map_err(|source| GenerateError::OutputDir {
            path: cfg.output_dir.clone(),
            source,
        })?;

        let window = cfg.mint_window()?;
        let sampler = CoordinateSampler::new(self.land, cfg.domain, cfg.max_attempts)?;
        let mut index = GeoIndex::open(&cfg.index_path(), cfg.index_flush_interval)?;
        let mut builder = RecordBuilder::new(self.seed, cfg.achievements);
        let mut mint_rng = StdRng::seed_from_u64(self.seed ^ MINT_SEED_SALT);
        let mut coord_rng = StdRng::seed_from_u64(self.seed ^ COORD_SEED_SALT);

        let mut report = GenerationReport {
            seed: self.seed,
            requested: cfg.total_count,
            ..GenerationReport::default()
        };
        info!(
            "generating {} records into {} (index {})",
            cfg.total_count,
            cfg.output_dir.display(),
            index.path().display()
        );

        for serial in 1..=cfg.total_count {
            let minted = window.sample(&mut mint_rng);
            let at = sampler.sample(&mut coord_rng)?;

            match builder.build(serial, at, &minted, &mut *provider) {
                Ok(record) => {
                    let path = record_path(&cfg.output_dir, serial, &cfg.record_extension);
                    match write_record(&path, &record) {
                        Ok(()) => {
                            report.written += 1;
                            index.append(&point_feature(&record));
                        }
                        Err(e) => {
                            warn!("record {serial}: cannot write {}: {e}", path.display());
                            report.write_failures += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("record {serial}: provider failed, skipping: {e}");
                    report.provider_failures += 1;
                }
            }

            if serial % cfg.progress_interval == 0 {
                info!(
                    "{serial}/{} records ({:.1}%)",
                    cfg.total_count,
                    100.0 * serial as f64 / cfg.total_count as f64
                );
            }
        }

        let stats = index.finish();
        report.index_failures = stats.failures;
        debug!("geo index holds {} features", stats.features);
        info!("{report}");
        Ok(report)
    }
}

fn write_record(path: &Path, record: &MetadataRecord) -> io::Result<()> {
    let text = serde_json::to_string_pretty(record)?;
    write_atomic(path, text.as_bytes())
}
