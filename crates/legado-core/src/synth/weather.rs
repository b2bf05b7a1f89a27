//! Synthetic hourly weather for one calendar day.
//!
//! The day gets one temperature and one precipitation level from the
//! latitude baseline, the season offset and a ±5 °C / ±20 mm draw. Each of
//! the 24 hours then perturbs those independently; the remaining fields are
//! plain uniform draws.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::latitude_bands::{base_precipitation_mm, base_temperature_c};
use super::season::Season;
use crate::coords::Coordinate;
use crate::numeric::round_dp;

pub const HOURS_PER_DAY: u32 = 24;

/// One hourly entry, field names as served by Open-Meteo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    /// `YYYY-MM-DDTHH:00`
    pub time: String,
    pub temperature_2m: f64,
    pub precipitation: f64,
    pub relative_humidity_2m: f64,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
    pub cloud_cover: f64,
    pub pressure_msl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub hourly: Vec<HourlyWeather>,
}

pub fn simulate_weather<R: Rng + ?Sized>(
    rng: &mut R,
    at: Coordinate,
    date: NaiveDate,
) -> WeatherData {
    let season = Season::of(date);
    let temperature = base_temperature_c(at.latitude)
        + season.temperature_offset_c()
        + rng.gen_range(-5.0..=5.0);
    let precipitation = base_precipitation_mm(at.latitude) + rng.gen_range(-20.0..=20.0);

    let day = date.format("%Y-%m-%d");
    let hourly = (0..HOURS_PER_DAY)
        .map(|hour| HourlyWeather {
            time: format!("{day}T{hour:02}:00"),
            temperature_2m: round_dp(temperature + rng.gen_range(-3.0..=3.0), 1),
            precipitation: round_dp((precipitation + rng.gen_range(-5.0..=5.0)).max(0.0), 1),
            relative_humidity_2m: round_dp(rng.gen_range(40.0..=90.0), 1),
            wind_speed_10m: round_dp(rng.gen_range(0.0..=30.0), 1),
            wind_direction_10m: round_dp(rng.gen_range(0.0..=360.0), 1),
            cloud_cover: round_dp(rng.gen_range(0.0..=100.0), 1),
            pressure_msl: round_dp(rng.gen_range(980.0..=1020.0), 1),
        })
        .collect();

    WeatherData { hourly }
}
