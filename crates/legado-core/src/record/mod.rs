//! Full metadata record schema (version 1.0).
//!
//! Field order in the structs is the on-disk key order. Records are written
//! once by the bulk generator, pretty-printed with two-space indentation,
//! one file per serial number.

pub mod achievements;
pub mod builder;
pub mod mint;
pub mod world;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;
use crate::synth::{EnvironmentalData, PlanetaryComputerData, WeatherData};

pub use achievements::{Achievement, AchievementPolicy};
pub use builder::RecordBuilder;
pub use mint::{MintWindow, MintedAt};
pub use world::WorldSnapshot;

pub const METADATA_VERSION: &str = "1.0";
pub const ICE_SHEETS_STATUS: &str = "Net Mass Loss";
pub const OCEAN_WARMING_STATUS: &str = "Elevated";

pub const CO2_SAVED_TRAIT: &str = "CO2 Saved (tonnes)";
pub const DEFORESTATION_TRAIT: &str = "Deforestation Prevented (km^2)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub attributes: Vec<Attribute>,
    pub metadata_version: String,
    pub token_details: TokenDetails,
}

impl MetadataRecord {
    /// Integer value of the attribute with the given trait type.
    pub fn attribute(&self, trait_type: &str) -> Option<u32> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| a.value)
    }

    pub fn serial_number(&self) -> u64 {
        self.token_details.serial_number
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDetails {
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub timestamp_minted: String,
    pub serial_number: u64,
    pub coordinates: Coordinate,
    pub world_conditions_on_mint: WorldConditionsOnMint,
    pub achievements: Vec<Achievement>,
    pub data_sources: Vec<DataSource>,
    /// Reserved; always `{}`.
    pub future_updates: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConditionsOnMint {
    pub co2_ppm: f64,
    pub global_temperature_anomaly_c: f64,
    pub ch4_ppb: f64,
    pub arctic_sea_ice_min_extent_million_km2: f64,
    pub ice_sheets_status: String,
    pub sea_level_mm_above_ref: f64,
    pub ocean_warming_status: String,
    pub nasa_image: String,
    pub planetary_image: String,
    pub weather_data: WeatherData,
    pub environmental_data: EnvironmentalData,
    pub planetary_computer_data: PlanetaryComputerData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    pub url: String,
}

/// The fixed citation list attached to every record.
pub fn data_sources() -> Vec<DataSource> {
    [
        ("NASA GISS", "https://data.giss.nasa.gov/"),
        ("NOAA Climate Data", "https://www.ncdc.noaa.gov/"),
        ("Microsoft Planetary Computer", "https://planetarycomputer.microsoft.com/"),
        ("Open-Meteo", "https://open-meteo.com/"),
    ]
    .into_iter()
    .map(|(name, url)| DataSource { name: name.into(), url: url.into() })
    .collect()
}

/// `<dir>/<serial>.<extension>`
pub fn record_path(dir: &Path, serial: u64, extension: &str) -> PathBuf {
    dir.join(format!("{serial}.{extension}"))
}
