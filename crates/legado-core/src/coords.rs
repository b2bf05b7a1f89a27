/// Geographic coordinate types and sampling boxes.
/// All coordinate math uses f64.

use serde::{Deserialize, Serialize};

/// A point on the globe in geographic coordinates.
///
/// Serialises as `{"latitude": .., "longitude": ..}`, the shape used inside
/// the `token_details.coordinates` block of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, -90 to +90.
    pub latitude: f64,
    /// Longitude in degrees, -180 to +180.
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// GeoJSON position order: `[longitude, latitude]`.
    pub fn position(self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

/// An axis-aligned latitude/longitude box, inclusive on all edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// The default sampling domain: most land lies between 60°S and 80°N.
    pub const SAMPLING_DOMAIN: BoundingBox = BoundingBox {
        min_lat: -60.0,
        max_lat: 80.0,
        min_lon: -180.0,
        max_lon: 180.0,
    };

    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self { min_lat, max_lat, min_lon, max_lon }
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.latitude >= self.min_lat
            && c.latitude <= self.max_lat
            && c.longitude >= self.min_lon
            && c.longitude <= self.max_lon
    }

    /// Intersection of two boxes, or `None` when they do not overlap
    /// with positive area.
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let clipped = BoundingBox {
            min_lat: self.min_lat.max(other.min_lat),
            max_lat: self.max_lat.min(other.max_lat),
            min_lon: self.min_lon.max(other.min_lon),
            max_lon: self.max_lon.min(other.max_lon),
        };
        (clipped.min_lat < clipped.max_lat && clipped.min_lon < clipped.max_lon)
            .then_some(clipped)
    }

    /// Area in square degrees. Only used to report how much of the domain
    /// the land pre-filter removed.
    pub fn area_deg2(&self) -> f64 {
        (self.max_lat - self.min_lat).max(0.0) * (self.max_lon - self.min_lon).max(0.0)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lat [{}, {}] lon [{}, {}]",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}
