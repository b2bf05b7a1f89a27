//! Compact record schema and the one-way projection into it.
//!
//! The projection keeps the token identity, coordinates, the five world
//! indicators and the hourly weather, renames every key to one or two
//! letters and rounds every float to one decimal. Environmental, satellite
//! and citation blocks are dropped. Achievements are copied verbatim.

pub mod engine;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::coords::Coordinate;
use crate::fsutil::write_atomic;
use crate::numeric::round_dp;
use crate::synth::{HourlyWeather, WeatherData};

pub use engine::{partition, MinificationEngine, MinifyError, MinifyReport};

/// Per-file failure. Never aborts a batch.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: not a metadata record: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: already compact, left untouched", path.display())]
    AlreadyCompact { path: PathBuf },
}

// ── Source view ───────────────────────────────────────────────────────────────

/// The parts of a full record the projection reads. Everything else in the
/// file is ignored; anything listed here is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceRecord {
    pub metadata_version: String,
    pub token_details: SourceTokenDetails,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceTokenDetails {
    pub timestamp_minted: String,
    pub serial_number: u64,
    pub coordinates: Coordinate,
    pub world_conditions_on_mint: SourceWorldConditions,
    pub achievements: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceWorldConditions {
    pub co2_ppm: f64,
    pub global_temperature_anomaly_c: f64,
    pub ch4_ppb: f64,
    pub arctic_sea_ice_min_extent_million_km2: f64,
    pub sea_level_mm_above_ref: f64,
    pub nasa_image: String,
    pub planetary_image: String,
    pub weather_data: WeatherData,
}

// ── Compact schema ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompactRecord {
    /// Always empty.
    #[serde(rename = "a")]
    pub attributes: Vec<Value>,
    #[serde(rename = "v")]
    pub version: String,
    #[serde(rename = "t")]
    pub token: CompactToken,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompactToken {
    #[serde(rename = "ts")]
    pub timestamp: String,
    #[serde(rename = "sn")]
    pub serial_number: u64,
    #[serde(rename = "c")]
    pub coordinates: CompactCoordinates,
    #[serde(rename = "w")]
    pub world: CompactWorld,
    /// Present only when the source had achievements.
    #[serde(rename = "ac", default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompactCoordinates {
    pub la: f64,
    pub lo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompactWorld {
    pub cp: f64,
    pub gt: f64,
    pub ch: f64,
    pub ai: f64,
    pub sl: f64,
    pub ni: String,
    pub pi: String,
    pub wd: CompactWeather,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompactWeather {
    pub h: Vec<CompactHour>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompactHour {
    pub t: String,
    pub te: f64,
    pub p: f64,
    pub h: f64,
    pub ws: f64,
    pub wd: f64,
    pub cc: f64,
    pub pr: f64,
}

// ── Projection ────────────────────────────────────────────────────────────────

#[inline]
fn r1(value: f64) -> f64 {
    round_dp(value, 1)
}

fn compact_hour(h: &HourlyWeather) -> CompactHour {
    CompactHour {
        t: h.time.clone(),
        te: r1(h.temperature_2m),
        p: r1(h.precipitation),
        h: r1(h.relative_humidity_2m),
        ws: r1(h.wind_speed_10m),
        wd: r1(h.wind_direction_10m),
        cc: r1(h.cloud_cover),
        pr: r1(h.pressure_msl),
    }
}

/// Project a full record into the compact schema. Pure.
pub fn compact(source: &SourceRecord) -> CompactRecord {
    let td = &source.token_details;
    let w = &td.world_conditions_on_mint;
    CompactRecord {
        attributes: Vec::new(),
        version: source.metadata_version.clone(),
        token: CompactToken {
            timestamp: td.timestamp_minted.clone(),
            serial_number: td.serial_number,
            coordinates: CompactCoordinates {
                la: td.coordinates.latitude,
                lo: td.coordinates.longitude,
            },
            world: CompactWorld {
                cp: r1(w.co2_ppm),
                gt: r1(w.global_temperature_anomaly_c),
                ch: r1(w.ch4_ppb),
                ai: r1(w.arctic_sea_ice_min_extent_million_km2),
                sl: r1(w.sea_level_mm_above_ref),
                ni: w.nasa_image.clone(),
                pi: w.planetary_image.clone(),
                wd: CompactWeather { h: w.weather_data.hourly.iter().map(compact_hour).collect() },
            },
            achievements: td.achievements.clone(),
        },
    }
}

/// Parse a file's text: a full record is projected, a compact one is
/// refused.
pub fn compact_text(path: &Path, text: &str) -> Result<String, RecordError> {
    let source: SourceRecord = match serde_json::from_str(text) {
        Ok(source) => source,
        Err(source) => {
            if serde_json::from_str::<CompactRecord>(text).is_ok() {
                return Err(RecordError::AlreadyCompact { path: path.to_path_buf() });
            }
            return Err(RecordError::Parse { path: path.to_path_buf(), source });
        }
    };
    serde_json::to_string(&compact(&source))
        .map_err(|source| RecordError::Parse { path: path.to_path_buf(), source })
}

/// Rewrite one record file in place.
pub fn minify_file(path: &Path) -> Result<(), RecordError> {
    let io_err = |source| RecordError::Io { path: path.to_path_buf(), source };
    let text = fs::read_to_string(path).map_err(io_err)?;
    let compacted = compact_text(path, &text)?;
    write_atomic(path, compacted.as_bytes()).map_err(io_err)
}
