//! Land mask: point-in-land containment over a union of country polygons.
//!
//! The boundary is read once from GeoJSON (Natural Earth admin-0 countries
//! exported as a FeatureCollection) and is read-only afterwards. Samplers
//! receive it by reference through the [`LandContainment`] trait, so tests
//! and alternative boundary providers plug in the same way.

pub mod sampler;

use std::fs;
use std::path::{Path, PathBuf};

use geo::{BoundingRect, Contains, MultiPolygon, Point, Polygon, Rect};
use geojson::GeoJson;
use thiserror::Error;

use crate::coords::{BoundingBox, Coordinate};

/// Errors raised while loading a land boundary. All of them are fatal for a
/// generation run: without a mask no coordinate can be accepted.
#[derive(Debug, Error)]
pub enum LandError {
    #[error("cannot read land boundary {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid land boundary GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("land boundary contains no polygons")]
    NoPolygons,
}

/// A read-only land/sea predicate.
pub trait LandContainment: Send + Sync {
    /// `true` when the coordinate lies strictly inside land.
    fn contains(&self, at: Coordinate) -> bool;

    /// Box enclosing all land, if known. Samplers use it to shrink the box
    /// they draw from.
    fn bounds(&self) -> Option<BoundingBox> {
        None
    }
}

/// One polygon with its precomputed bounding rectangle.
struct LandPart {
    rect: Rect<f64>,
    polygon: Polygon<f64>,
}

impl LandPart {
    #[inline]
    fn contains(&self, point: &Point<f64>) -> bool {
        let (min, max) = (self.rect.min(), self.rect.max());
        point.x() >= min.x
            && point.x() <= max.x
            && point.y() >= min.y
            && point.y() <= max.y
            && self.polygon.contains(point)
    }
}

/// Union of land polygons with a rectangle pre-check per polygon.
pub struct LandMask {
    parts: Vec<LandPart>,
    bounds: BoundingBox,
}

impl LandMask {
    /// Build a mask from polygons in (lon, lat) order.
    pub fn from_polygons<I>(polygons: I) -> Result<Self, LandError>
    where
        I: IntoIterator<Item = Polygon<f64>>,
    {
        let parts: Vec<LandPart> = polygons
            .into_iter()
            .filter_map(|polygon| {
                polygon
                    .bounding_rect()
                    .map(|rect| LandPart { rect, polygon })
            })
            .collect();

        if parts.is_empty() {
            return Err(LandError::NoPolygons);
        }

        let mut bounds = BoundingBox::new(f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for part in &parts {
            bounds.min_lon = bounds.min_lon.min(part.rect.min().x);
            bounds.max_lon = bounds.max_lon.max(part.rect.max().x);
            bounds.min_lat = bounds.min_lat.min(part.rect.min().y);
            bounds.max_lat = bounds.max_lat.max(part.rect.max().y);
        }

        Ok(Self { parts, bounds })
    }

    /// Parse a FeatureCollection, Feature or bare Geometry. Polygon and
    /// MultiPolygon geometries (also inside GeometryCollections) are kept;
    /// every other geometry kind is ignored.
    pub fn from_geojson_str(text: &str) -> Result<Self, LandError> {
        let geojson: GeoJson = text.parse()?;
        let mut polygons = Vec::new();
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in fc.features {
                    if let Some(geometry) = feature.geometry {
                        collect_polygons(geometry.value, &mut polygons)?;
                    }
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(geometry) = feature.geometry {
                    collect_polygons(geometry.value, &mut polygons)?;
                }
            }
            GeoJson::Geometry(geometry) => collect_polygons(geometry.value, &mut polygons)?,
        }
        Self::from_polygons(polygons)
    }

    /// Load a GeoJSON boundary file.
    pub fn load(path: &Path) -> Result<Self, LandError> {
        let text = fs::read_to_string(path).map_err(|source| LandError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_geojson_str(&text)
    }

    pub fn polygon_count(&self) -> usize {
        self.parts.len()
    }
}

impl LandContainment for LandMask {
    fn contains(&self, at: Coordinate) -> bool {
        let point = Point::new(at.longitude, at.latitude);
        self.parts.iter().any(|part| part.contains(&point))
    }

    fn bounds(&self) -> Option<BoundingBox> {
        Some(self.bounds)
    }
}

fn collect_polygons(value: geojson::Value, out: &mut Vec<Polygon<f64>>) -> Result<(), LandError> {
    match value {
        geojson::Value::Polygon(_) => out.push(Polygon::<f64>::try_from(value)?),
        geojson::Value::MultiPolygon(_) => out.extend(MultiPolygon::<f64>::try_from(value)?.0),
        geojson::Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_polygons(geometry.value, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

// ── Test fixtures ─────────────────────────────────────────────────────────────
