//! Parallel in-place minification of a record directory.
//!
//! The file list is sorted and cut once into contiguous batches, one per
//! worker. Batches share nothing; each returns its own tally and the tallies
//! are summed at the end, so the result does not depend on completion order.

use std::fs;
use std::ops::Add;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{minify_file, RecordError};
use crate::config::{ConfigError, MinifyConfig};

#[derive(Debug, Error)]
pub enum MinifyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot list {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome tally. `total = succeeded + already_compact + failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MinifyReport {
    pub total: usize,
    pub succeeded: usize,
    pub already_compact: usize,
    pub failed: usize,
}

impl MinifyReport {
    /// `succeeded / total`, 1.0 for an empty directory.
    pub fn success_ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.succeeded as f64 / self.total as f64
        }
    }
}

impl Add for MinifyReport {
    type Output = MinifyReport;

    fn add(self, rhs: MinifyReport) -> MinifyReport {
        MinifyReport {
            total: self.total + rhs.total,
            succeeded: self.succeeded + rhs.succeeded,
            already_compact: self.already_compact + rhs.already_compact,
            failed: self.failed + rhs.failed,
        }
    }
}

impl std::fmt::Display for MinifyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "processed {} of {} ({:.2}%)",
            self.succeeded,
            self.total,
            100.0 * self.success_ratio()
        )?;
        if self.already_compact > 0 {
            write!(f, ", {} already compact", self.already_compact)?;
        }
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

/// Contiguous chunks of `ceil(n / workers)` items: at most `workers`
/// chunks, none empty.
pub fn partition<T>(items: &[T], workers: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }
    let size = items.len().div_ceil(workers.max(1));
    items.chunks(size).collect()
}

pub struct MinificationEngine {
    config: MinifyConfig,
}

impl MinificationEngine {
    pub fn new(config: MinifyConfig) -> Result<Self, MinifyError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MinifyConfig {
        &self.config
    }

    /// Minify the configured directory.
    pub fn run(&self) -> Result<MinifyReport, MinifyError> {
        self.minify(&self.config.dir)
    }

    /// Regular files in `dir` with the configured extension, sorted by name.
    pub fn eligible_files(&self, dir: &Path) -> Result<Vec<PathBuf>, MinifyError> {
        let read_err = |source| MinifyError::ReadDir { path: dir.to_path_buf(), source };
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let path = entry.path();
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let matches = path
                .extension()
                .is_some_and(|ext| ext == self.config.extension.as_str());
            if is_file && matches {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Rewrite every eligible file in `dir`. Only listing the directory or
    /// starting the pool can fail; per-file problems land in the report.
    pub fn minify(&self, dir: &Path) -> Result<MinifyReport, MinifyError> {
        let files = self.eligible_files(dir)?;
        let batches = partition(&files, self.config.workers);
        info!(
            "minifying {} files in {} with {} workers ({} batches)",
            files.len(),
            dir.display(),
            self.config.workers,
            batches.len()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()?;
        let report = pool.install(|| {
            batches
                .par_iter()
                .enumerate()
                .map(|(i, batch)| {
                    let tally = process_batch(batch);
                    debug!("batch {}/{} done: {tally}", i + 1, batches.len());
                    tally
                })
                .reduce(MinifyReport::default, |a, b| a + b)
        });

        info!("{report}");
        Ok(report)
    }
}

fn process_batch(batch: &[PathBuf]) -> MinifyReport {
    let mut tally = MinifyReport { total: batch.len(), ..MinifyReport::default() };
    for path in batch {
        match minify_file(path) {
            Ok(()) => tally.succeeded += 1,
            Err(e @ RecordError::AlreadyCompact { .. }) => {
                info!("{e}");
                tally.already_compact += 1;
            }
            Err(e) => {
                warn!("{e}");
                tally.failed += 1;
            }
        }
    }
    tally
}
