//! Synthetic environmental readings: elevation, air quality, climate
//! normals and terrain descriptors.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::latitude_bands::base_elevation_m;
use crate::coords::Coordinate;
use crate::numeric::round_dp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationData {
    /// Metres.
    pub elevation: f64,
    /// Degrees.
    pub slope: f64,
    /// Degrees clockwise from north.
    pub aspect: f64,
}

/// Concentrations in µg/m³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityData {
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateData {
    /// mm/yr.
    pub annual_precipitation: f64,
    /// °C.
    pub annual_temperature: f64,
    /// Percent.
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainData {
    pub slope: f64,
    pub aspect: f64,
    pub roughness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalData {
    pub elevation_data: ElevationData,
    pub air_quality_data: AirQualityData,
    pub climate_data: ClimateData,
    pub terrain_data: TerrainData,
}

/// Uniform draw rounded to one decimal.
fn draw<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    round_dp(rng.gen_range(lo..=hi), 1)
}

pub fn simulate_environmental<R: Rng + ?Sized>(rng: &mut R, at: Coordinate) -> EnvironmentalData {
    let elevation = base_elevation_m(at.latitude) + rng.gen_range(-500.0..=500.0);

    let air_quality_data = AirQualityData {
        pm25: draw(rng, 5.0, 50.0),
        pm10: draw(rng, 10.0, 100.0),
        no2: draw(rng, 10.0, 100.0),
        o3: draw(rng, 20.0, 150.0),
    };
    let climate_data = ClimateData {
        annual_precipitation: draw(rng, 200.0, 2000.0),
        annual_temperature: draw(rng, -20.0, 30.0),
        humidity: draw(rng, 40.0, 90.0),
    };
    let terrain_data = TerrainData {
        slope: draw(rng, 0.0, 45.0),
        aspect: draw(rng, 0.0, 360.0),
        roughness: draw(rng, 0.0, 100.0),
    };
    let elevation_data = ElevationData {
        elevation: round_dp(elevation, 1),
        slope: draw(rng, 0.0, 45.0),
        aspect: draw(rng, 0.0, 360.0),
    };

    EnvironmentalData {
        elevation_data,
        air_quality_data,
        climate_data,
        terrain_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn elevation_follows_latitude_baseline() {
        let mut rng = StdRng::seed_from_u64(21);
        for lat in [0.0, 25.0, -60.0] {
            let e = simulate_environmental(&mut rng, Coordinate::new(lat, 0.0));
            let base = base_elevation_m(lat);
            assert!((e.elevation_data.elevation - base).abs() <= 500.05);
        }
    }

    #[test]
    fn draws_stay_in_documented_ranges() {
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..200 {
            let e = simulate_environmental(&mut rng, Coordinate::new(10.0, 10.0));
            let aq = &e.air_quality_data;
            assert!((5.0..=50.0).contains(&aq.pm25));
            assert!((10.0..=100.0).contains(&aq.pm10));
            assert!((10.0..=100.0).contains(&aq.no2));
            assert!((20.0..=150.0).contains(&aq.o3));
            let c = &e.climate_data;
            assert!((200.0..=2000.0).contains(&c.annual_precipitation));
            assert!((-20.0..=30.0).contains(&c.annual_temperature));
            assert!((40.0..=90.0).contains(&c.humidity));
            let t = &e.terrain_data;
            assert!((0.0..=45.0).contains(&t.slope));
            assert!((0.0..=360.0).contains(&t.aspect));
            assert!((0.0..=100.0).contains(&t.roughness));
        }
    }

    #[test]
    fn serialised_shape() {
        let mut rng = StdRng::seed_from_u64(23);
        let e = simulate_environmental(&mut rng, Coordinate::new(1.0, 1.0));
        let v = serde_json::to_value(&e).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["elevation_data", "air_quality_data", "climate_data", "terrain_data"]
        );
        assert!(v["elevation_data"]["aspect"].is_number());
        assert!(v["air_quality_data"]["pm25"].is_number());
    }
}
