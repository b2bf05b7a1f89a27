//! Assembles one complete record from a coordinate, a mint instant and a
//! conditions provider.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::achievements::{template, AchievementPolicy};
use super::world::WorldSnapshot;
use super::{
    data_sources, Attribute, MetadataRecord, MintedAt, TokenDetails, WorldConditionsOnMint,
    CO2_SAVED_TRAIT, DEFORESTATION_TRAIT, ICE_SHEETS_STATUS, METADATA_VERSION,
    OCEAN_WARMING_STATUS,
};
use crate::coords::Coordinate;
use crate::synth::{nasa_image_url, ConditionsProvider, ProviderError};

/// Seed salt for the attribute/world/achievement stream.
const BUILDER_SEED_SALT: u64 = 0xB11D_E12C_0000_0002;

pub const CO2_SAVED_RANGE: std::ops::RangeInclusive<u32> = 20..=400;
pub const DEFORESTATION_RANGE: std::ops::RangeInclusive<u32> = 0..=55;

pub struct RecordBuilder {
    rng: StdRng,
    policy: AchievementPolicy,
}

impl RecordBuilder {
    pub fn new(seed: u64, policy: AchievementPolicy) -> Self {
        Self { rng: StdRng::seed_from_u64(seed ^ BUILDER_SEED_SALT), policy }
    }

    /// Build record `serial`. The only failure is a provider failure, in
    /// which case nothing of the record is kept.
    pub fn build<P: ConditionsProvider + ?Sized>(
        &mut self,
        serial: u64,
        at: Coordinate,
        minted: &MintedAt,
        provider: &mut P,
    ) -> Result<MetadataRecord, ProviderError> {
        let date = minted.date();
        let weather_data = provider.weather(at, date)?;
        let environmental_data = provider.environmental(at, date)?;
        let planetary_computer_data = provider.planetary_computer(at, date)?;
        let planetary_image = provider.imagery(at, date)?;

        let co2_saved = self.rng.gen_range(CO2_SAVED_RANGE);
        let deforestation = self.rng.gen_range(DEFORESTATION_RANGE);
        let world = WorldSnapshot::sample(&mut self.rng);
        let achievements = if self.policy.includes(serial, &mut self.rng) {
            template()
        } else {
            Vec::new()
        };

        Ok(MetadataRecord {
            attributes: vec![
                Attribute { trait_type: CO2_SAVED_TRAIT.into(), value: co2_saved },
                Attribute { trait_type: DEFORESTATION_TRAIT.into(), value: deforestation },
            ],
            metadata_version: METADATA_VERSION.into(),
            token_details: TokenDetails {
                timestamp_minted: minted.timestamp(),
                serial_number: serial,
                coordinates: at,
                world_conditions_on_mint: WorldConditionsOnMint {
                    co2_ppm: world.co2_ppm,
                    global_temperature_anomaly_c: world.global_temperature_anomaly_c,
                    ch4_ppb: world.ch4_ppb,
                    arctic_sea_ice_min_extent_million_km2: world
                        .arctic_sea_ice_min_extent_million_km2,
                    ice_sheets_status: ICE_SHEETS_STATUS.into(),
                    sea_level_mm_above_ref: world.sea_level_mm_above_ref,
                    ocean_warming_status: OCEAN_WARMING_STATUS.into(),
                    nasa_image: nasa_image_url(date),
                    planetary_image,
                    weather_data,
                    environmental_data,
                    planetary_computer_data,
                },
                achievements,
                data_sources: data_sources(),
                future_updates: serde_json::Map::new(),
            },
        })
    }
}
