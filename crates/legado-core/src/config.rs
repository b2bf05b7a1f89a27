//! Run configuration for generation and minification.
//!
//! Both configs deserialize from JSON with every field optional; missing
//! fields take the defaults below. Tools load a file with `--config` and then
//! override single fields from flags before calling `validate()`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::BoundingBox;
use crate::land::sampler::DEFAULT_MAX_ATTEMPTS;
use crate::record::{AchievementPolicy, MintWindow};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ── Generation ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Directory receiving one record file per serial number.
    pub output_dir: PathBuf,
    /// GeoJSON index; `<output_dir>/points.geojson` when unset.
    pub index_file: Option<PathBuf>,
    /// Land boundary GeoJSON. Required by the `generate` tool.
    pub land_path: Option<PathBuf>,
    pub total_count: u64,
    pub mint_start: NaiveDateTime,
    pub mint_end: NaiveDateTime,
    /// Log progress every this many serials.
    pub progress_interval: u64,
    /// Features buffered before the index is written.
    pub index_flush_interval: usize,
    /// Rejection-sampling cap per coordinate.
    pub max_attempts: u64,
    pub domain: BoundingBox,
    pub achievements: AchievementPolicy,
    /// Run seed; drawn from entropy when unset.
    pub seed: Option<u64>,
    pub record_extension: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("metadata_files"),
            index_file: None,
            land_path: None,
            total_count: 20_000_000,
            mint_start: day_start(2024, 1, 1),
            mint_end: day_end(2025, 4, 2),
            progress_interval: 100_000,
            index_flush_interval: 10_000,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            domain: BoundingBox::SAMPLING_DOMAIN,
            achievements: AchievementPolicy::default(),
            seed: None,
            record_extension: "txt".into(),
        }
    }
}

fn day_start(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn day_end(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .unwrap_or_default()
}

impl GenerateConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    pub fn index_path(&self) -> PathBuf {
        self.index_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join("points.geojson"))
    }

    pub fn mint_window(&self) -> Result<MintWindow, ConfigError> {
        MintWindow::new(self.mint_start, self.mint_end)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mint_window()?;
        if self.progress_interval == 0 {
            return Err(invalid("progress_interval", "must be at least 1"));
        }
        if self.index_flush_interval == 0 {
            return Err(invalid("index_flush_interval", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        let p = self.achievements.probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(invalid("achievements.probability", format!("{p} is not in [0, 1]")));
        }
        let d = &self.domain;
        if !(d.min_lat < d.max_lat && d.min_lon < d.max_lon) {
            return Err(invalid("domain", format!("{d} is empty")));
        }
        if d.min_lat < -90.0 || d.max_lat > 90.0 || d.min_lon < -180.0 || d.max_lon > 180.0 {
            return Err(invalid("domain", format!("{d} exceeds the globe")));
        }
        validate_extension("record_extension", &self.record_extension)
    }
}

fn validate_extension(field: &'static str, ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() || ext.contains(['.', '/', '\\']) {
        return Err(invalid(field, format!("{ext:?} is not a bare file extension")));
    }
    Ok(())
}

// ── Minification ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    /// Directory of record files to rewrite in place.
    pub dir: PathBuf,
    /// Worker threads, one batch each.
    pub workers: usize,
    pub extension: String,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("metadata_files"),
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            extension: "txt".into(),
        }
    }
}

impl MinifyConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(invalid("workers", "must be at least 1"));
        }
        validate_extension("extension", &self.extension)
    }
}
