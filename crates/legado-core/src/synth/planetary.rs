//! Satellite-style readings and placeholder imagery URLs.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;
use crate::numeric::round_dp;

/// Readings in the shape of a Planetary Computer STAC lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryComputerData {
    #[serde(rename = "sentinel-2-l2a")]
    pub sentinel_2_l2a: String,
    #[serde(rename = "landsat-8-c2-l2")]
    pub landsat_8_c2_l2: String,
    /// Normalised difference vegetation index, 0–1.
    pub ndvi: f64,
    /// °C.
    pub land_surface_temperature: f64,
    /// mm.
    pub precipitation: f64,
    /// Metres.
    pub elevation: f64,
}

/// `YYYYMMDD_{lat}_{lon}`: the key all placeholder scene URLs share.
fn scene_key(at: Coordinate, date: NaiveDate) -> String {
    format!("{}_{}_{}", date.format("%Y%m%d"), at.latitude, at.longitude)
}

pub fn simulate_planetary_computer<R: Rng + ?Sized>(
    rng: &mut R,
    at: Coordinate,
    date: NaiveDate,
) -> PlanetaryComputerData {
    let key = scene_key(at, date);
    PlanetaryComputerData {
        sentinel_2_l2a: format!("https://example.com/sentinel2/{key}.jpg"),
        landsat_8_c2_l2: format!("https://example.com/landsat8/{key}.jpg"),
        ndvi: round_dp(rng.gen_range(0.0..=1.0), 3),
        land_surface_temperature: round_dp(rng.gen_range(-20.0..=50.0), 1),
        precipitation: round_dp(rng.gen_range(0.0..=100.0), 1),
        elevation: round_dp(rng.gen_range(-100.0..=5000.0), 1),
    }
}

/// Placeholder satellite image for the mint location and day.
pub fn satellite_image_url(at: Coordinate, date: NaiveDate) -> String {
    format!("https://example.com/satellite/{}.jpg", scene_key(at, date))
}

/// NASA Astronomy Picture of the Day thumbnail for the mint day.
pub fn nasa_image_url(date: NaiveDate) -> String {
    format!("https://apod.nasa.gov/apod/calendar/S_{}.jpg", date.format("%y%m%d"))
}
