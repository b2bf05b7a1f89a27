//! Bounded rejection sampling of land coordinates.
//!
//! Candidates are drawn uniformly from the sampling box and kept when the
//! land mask contains them. The box is the configured domain clipped to the
//! land bounds: every point removed by the clip is sea, so the accepted
//! points stay uniform over the land inside the domain while fewer
//! candidates are wasted.

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use super::LandContainment;
use crate::coords::{BoundingBox, Coordinate};

/// Default cap on candidates per coordinate. Natural Earth land covers
/// roughly a third of the default domain, so a healthy mask needs a handful
/// of draws; hitting this cap means the mask or the domain is wrong.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;

#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error(
        "no land coordinate in {bbox} after {attempts} attempts: \
         boundary data unavailable or domain too restrictive"
    )]
    Exhausted { attempts: u64, bbox: BoundingBox },

    #[error("sampling domain {domain} does not overlap land bounds {land}")]
    NoOverlap { domain: BoundingBox, land: BoundingBox },

    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

/// Draws coordinates on land. Holds no RNG of its own; callers pass theirs so
/// one sampler can serve any number of streams.
pub struct CoordinateSampler<'a> {
    land: &'a dyn LandContainment,
    sample_box: BoundingBox,
    max_attempts: u64,
}

impl<'a> CoordinateSampler<'a> {
    pub fn new(
        land: &'a dyn LandContainment,
        domain: BoundingBox,
        max_attempts: u64,
    ) -> Result<Self, SampleError> {
        if max_attempts == 0 {
            return Err(SampleError::ZeroAttempts);
        }

        let sample_box = match land.bounds() {
            Some(land_box) => domain
                .intersect(&land_box)
                .ok_or(SampleError::NoOverlap { domain, land: land_box })?,
            None => domain,
        };
        debug!(
            "sampling box {sample_box} ({:.0}% of domain)",
            100.0 * sample_box.area_deg2() / domain.area_deg2().max(f64::MIN_POSITIVE)
        );

        Ok(Self { land, sample_box, max_attempts })
    }

    /// The box candidates are drawn from.
    pub fn sample_box(&self) -> BoundingBox {
        self.sample_box
    }

    /// Draw candidates until one lies on land.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Coordinate, SampleError> {
        let b = &self.sample_box;
        for _ in 0..self.max_attempts {
            let candidate = Coordinate::new(
                rng.gen_range(b.min_lat..=b.max_lat),
                rng.gen_range(b.min_lon..=b.max_lon),
            );
            if self.land.contains(candidate) {
                return Ok(candidate);
            }
        }
        Err(SampleError::Exhausted {
            attempts: self.max_attempts,
            bbox: self.sample_box,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::land::fixtures::two_continents;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Land mask with no bounds hint and nothing inside it.
    struct Ocean;

    impl LandContainment for Ocean {
        fn contains(&self, _at: Coordinate) -> bool {
            false
        }
    }

    /// ✓ Every sampled coordinate lies on land and inside the domain.
    #[test]
    fn samples_are_on_land() {
        let land = two_continents();
        let sampler =
            CoordinateSampler::new(&land, BoundingBox::SAMPLING_DOMAIN, DEFAULT_MAX_ATTEMPTS)
                .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5_000 {
            let c = sampler.sample(&mut rng).unwrap();
            assert!(land.contains(c), "{c:?} is not on land");
            assert!(BoundingBox::SAMPLING_DOMAIN.contains(c), "{c:?} outside domain");
        }
    }

    /// Both continents get hit, roughly in proportion to their area
    /// (north 40×20, south 40×20: equal).
    #[test]
    fn samples_cover_every_landmass() {
        let land = two_continents();
        let sampler =
            CoordinateSampler::new(&land, BoundingBox::SAMPLING_DOMAIN, DEFAULT_MAX_ATTEMPTS)
                .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let north = (0..4_000)
            .filter(|_| sampler.sample(&mut rng).unwrap().latitude > 0.0)
            .count();
        assert!((1_700..=2_300).contains(&north), "north share {north}/4000");
    }

    #[test]
    fn sample_box_is_clipped_to_land_bounds() {
        let land = two_continents();
        let sampler =
            CoordinateSampler::new(&land, BoundingBox::SAMPLING_DOMAIN, 10).unwrap();
        assert_eq!(sampler.sample_box(), BoundingBox::new(-40.0, 30.0, -100.0, 40.0));
    }

    #[test]
    fn exhaustion_is_an_explicit_error() {
        let sampler = CoordinateSampler::new(&Ocean, BoundingBox::SAMPLING_DOMAIN, 250).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            sampler.sample(&mut rng),
            Err(SampleError::Exhausted {
                attempts: 250,
                bbox: BoundingBox::SAMPLING_DOMAIN,
            })
        );
    }

    #[test]
    fn land_outside_domain_fails_fast() {
        let land = two_continents();
        let polar = BoundingBox::new(60.0, 80.0, -180.0, 180.0);
        assert!(matches!(
            CoordinateSampler::new(&land, polar, 10),
            Err(SampleError::NoOverlap { .. })
        ));
    }

    #[test]
    fn zero_attempts_rejected() {
        let land = two_continents();
        assert_eq!(
            CoordinateSampler::new(&land, BoundingBox::SAMPLING_DOMAIN, 0).err(),
            Some(SampleError::ZeroAttempts)
        );
    }
}
