//! Per-record environmental data providers.
//!
//! A record needs weather, environmental, satellite and imagery data for its
//! mint location and day. [`ConditionsProvider`] is the seam: the record
//! builder only sees the trait, so the synthetic generators here and any
//! network-backed implementation are interchangeable as long as they return
//! the same shapes.

pub mod environment;
pub mod latitude_bands;
pub mod planetary;
pub mod season;
pub mod weather;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::coords::Coordinate;
pub use environment::{simulate_environmental, EnvironmentalData};
pub use planetary::{nasa_image_url, satellite_image_url, simulate_planetary_computer, PlanetaryComputerData};
pub use weather::{simulate_weather, HourlyWeather, WeatherData};

/// Seed salt for the synthetic provider's stream.
const PROVIDER_SEED_SALT: u64 = 0x5EA5_0A11_D47A_0001;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} has no data for ({}, {}) on {date}", at.latitude, at.longitude)]
    NoData {
        provider: &'static str,
        at: Coordinate,
        date: NaiveDate,
    },

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Source of the per-record readings.
pub trait ConditionsProvider {
    fn weather(&mut self, at: Coordinate, date: NaiveDate) -> Result<WeatherData, ProviderError>;

    fn environmental(
        &mut self,
        at: Coordinate,
        date: NaiveDate,
    ) -> Result<EnvironmentalData, ProviderError>;

    fn planetary_computer(
        &mut self,
        at: Coordinate,
        date: NaiveDate,
    ) -> Result<PlanetaryComputerData, ProviderError>;

    /// URL of a satellite image of the location on that day.
    fn imagery(&mut self, at: Coordinate, date: NaiveDate) -> Result<String, ProviderError>;
}

/// Latitude/season baselines plus bounded uniform noise. Never fails.
pub struct SyntheticProvider {
    rng: StdRng,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed ^ PROVIDER_SEED_SALT) }
    }
}

impl ConditionsProvider for SyntheticProvider {
    fn weather(&mut self, at: Coordinate, date: NaiveDate) -> Result<WeatherData, ProviderError> {
        Ok(simulate_weather(&mut self.rng, at, date))
    }

    fn environmental(
        &mut self,
        at: Coordinate,
        _date: NaiveDate,
    ) -> Result<EnvironmentalData, ProviderError> {
        Ok(simulate_environmental(&mut self.rng, at))
    }

    fn planetary_computer(
        &mut self,
        at: Coordinate,
        date: NaiveDate,
    ) -> Result<PlanetaryComputerData, ProviderError> {
        Ok(simulate_planetary_computer(&mut self.rng, at, date))
    }

    fn imagery(&mut self, at: Coordinate, date: NaiveDate) -> Result<String, ProviderError> {
        Ok(satellite_image_url(at, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_readings() {
        let at = Coordinate::new(-12.0, 130.0);
        let date = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
        let mut a = SyntheticProvider::new(99);
        let mut b = SyntheticProvider::new(99);
        assert_eq!(a.weather(at, date).unwrap(), b.weather(at, date).unwrap());
        assert_eq!(
            a.environmental(at, date).unwrap(),
            b.environmental(at, date).unwrap()
        );
    }

    #[test]
    fn different_seeds_differ() {
        let at = Coordinate::new(-12.0, 130.0);
        let date = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
        let w1 = SyntheticProvider::new(1).weather(at, date).unwrap();
        let w2 = SyntheticProvider::new(2).weather(at, date).unwrap();
        assert_ne!(w1, w2);
    }

    #[test]
    fn no_data_error_names_the_provider() {
        let err = ProviderError::NoData {
            provider: "open-meteo",
            at: Coordinate::new(1.0, 2.0),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(err.to_string(), "open-meteo has no data for (1, 2) on 2024-01-01");
    }
}
