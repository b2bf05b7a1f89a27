//! Global climate indicators, perturbed independently for every record.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::numeric::round_dp;

/// A base value and the half-width of the uniform band around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub base: f64,
    pub delta: f64,
}

impl Band {
    const fn new(base: f64, delta: f64) -> Self {
        Self { base, delta }
    }

    /// `base + U(-delta, delta)`, rounded to two decimals.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        round_dp(self.base + rng.gen_range(-self.delta..=self.delta), 2)
    }

    /// Whether `value` is a possible draw. The bounds are rounded like the
    /// draw itself, so `3.9 - 0.5` admits exactly 3.4.
    pub fn contains(&self, value: f64) -> bool {
        let lo = round_dp(self.base - self.delta, 2);
        let hi = round_dp(self.base + self.delta, 2);
        (lo..=hi).contains(&value)
    }
}

pub const CO2_PPM: Band = Band::new(420.5, 50.0);
pub const TEMPERATURE_ANOMALY_C: Band = Band::new(1.24, 0.3);
pub const CH4_PPB: Band = Band::new(1895.0, 300.0);
pub const ARCTIC_SEA_ICE_MKM2: Band = Band::new(3.9, 0.5);
pub const SEA_LEVEL_MM: Band = Band::new(95.0, 10.0);

/// The five scalar world conditions of one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub co2_ppm: f64,
    pub global_temperature_anomaly_c: f64,
    pub ch4_ppb: f64,
    pub arctic_sea_ice_min_extent_million_km2: f64,
    pub sea_level_mm_above_ref: f64,
}

impl WorldSnapshot {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            co2_ppm: CO2_PPM.draw(rng),
            global_temperature_anomaly_c: TEMPERATURE_ANOMALY_C.draw(rng),
            ch4_ppb: CH4_PPB.draw(rng),
            arctic_sea_ice_min_extent_million_km2: ARCTIC_SEA_ICE_MKM2.draw(rng),
            sea_level_mm_above_ref: SEA_LEVEL_MM.draw(rng),
        }
    }
}
