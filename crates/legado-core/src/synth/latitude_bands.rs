//! Latitude-dependent baselines for the synthetic readings.
//!
//! Each baseline is linear in absolute latitude and symmetric about the
//! equator. Generators add bounded uniform noise on top.

/// Baseline air temperature in °C before the seasonal offset:
/// 20 °C at the equator, falling 0.5 °C per degree of latitude.
pub fn base_temperature_c(lat_deg: f64) -> f64 {
    20.0 - lat_deg.abs() * 0.5
}

/// Baseline daily precipitation in mm: 50 mm plus 0.3 mm per degree.
pub fn base_precipitation_mm(lat_deg: f64) -> f64 {
    50.0 + lat_deg.abs() * 0.3
}

/// Baseline elevation in metres: 1000 m plus 50 m per degree.
pub fn base_elevation_m(lat_deg: f64) -> f64 {
    1000.0 + lat_deg.abs() * 50.0
}
