//! Synthetic geotagged climate-certificate records.
//!
//! Pipeline:
//!   land mask → coordinate sampler → record builder (+ conditions provider)
//!   → bulk generator (record files + GeoJSON index) → minification engine.

pub mod config;
pub mod coords;
pub mod fsutil;
pub mod generator;
pub mod geoindex;
pub mod land;
pub mod minify;
pub mod numeric;
pub mod record;
pub mod synth;

pub use config::{ConfigError, GenerateConfig, MinifyConfig};
pub use coords::{BoundingBox, Coordinate};
pub use generator::{BulkGenerator, GenerateError, GenerationReport};
pub use geoindex::{GeoIndex, IndexError};
pub use land::{LandContainment, LandError, LandMask};
pub use minify::{MinificationEngine, MinifyError, MinifyReport};
pub use record::MetadataRecord;
