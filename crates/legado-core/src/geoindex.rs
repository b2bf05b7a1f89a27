//! Append-only GeoJSON index of every emitted record location.
//!
//! The file on disk is always a complete FeatureCollection in the canonical
//! compact form `{"type":"FeatureCollection","features":[...]}`, so its last
//! two bytes are `]}`. Appended features are buffered and spliced in front of
//! that tail in one write per flush; nothing already on disk is read back.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use geojson::{Feature, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::fsutil::write_atomic;
use crate::record::{MetadataRecord, CO2_SAVED_TRAIT, DEFORESTATION_TRAIT};

const HEAD: &str = r#"{"type":"FeatureCollection","features":["#;
const TAIL: &[u8] = b"]}";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("geo index {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("geo index {} is not valid GeoJSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },

    #[error("geo index {} is not a FeatureCollection", path.display())]
    NotACollection { path: PathBuf },

    #[error("cannot encode feature: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Totals at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Features in the file.
    pub features: u64,
    /// Features that never reached the file.
    pub failures: u64,
}

/// Single-writer handle on the index file.
pub struct GeoIndex {
    path: PathBuf,
    file: File,
    pending: Vec<String>,
    flush_interval: usize,
    persisted: u64,
    resumed: u64,
    failures: u64,
}

impl GeoIndex {
    /// Open or create the index. An existing file is parsed once and
    /// rewritten in canonical form; a missing one is created empty.
    pub fn open(path: &Path, flush_interval: usize) -> Result<Self, IndexError> {
        let io_err = |source| IndexError::Io { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let features = if path.exists() {
            let text = fs::read_to_string(path).map_err(io_err)?;
            let geojson: GeoJson = text.parse().map_err(|source| IndexError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            match geojson {
                GeoJson::FeatureCollection(fc) => fc
                    .features
                    .iter()
                    .map(serde_json::to_string)
                    .collect::<Result<Vec<_>, _>>()?,
                _ => return Err(IndexError::NotACollection { path: path.to_path_buf() }),
            }
        } else {
            Vec::new()
        };

        let mut canonical = String::from(HEAD);
        canonical.push_str(&features.join(","));
        canonical.push_str("]}");
        write_atomic(path, canonical.as_bytes()).map_err(io_err)?;

        let file = OpenOptions::new().read(true).write(true).open(path).map_err(io_err)?;
        if !features.is_empty() {
            warn!(
                "geo index {} already holds {} features; new features are appended \
                 after them and may repeat their ids",
                path.display(),
                features.len()
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            pending: Vec::new(),
            flush_interval: flush_interval.max(1),
            persisted: features.len() as u64,
            resumed: features.len() as u64,
            failures: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Features written or buffered.
    pub fn len(&self) -> u64 {
        self.persisted + self.pending.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Features found in the file when it was opened.
    pub fn resumed(&self) -> u64 {
        self.resumed
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Buffer one feature, flushing when the buffer is full. Failures are
    /// logged and counted, never returned: the index is best-effort.
    pub fn append(&mut self, feature: &Feature) {
        match serde_json::to_string(feature) {
            Ok(text) => self.pending.push(text),
            Err(e) => {
                warn!("geo index: cannot encode feature: {e}");
                self.failures += 1;
                return;
            }
        }
        if self.pending.len() >= self.flush_interval {
            if let Err(e) = self.flush() {
                warn!("{e}");
            }
        }
    }

    /// Splice buffered features into the file. On failure the batch is
    /// dropped and counted; the file keeps its previous contents.
    pub fn flush(&mut self) -> Result<usize, IndexError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let batch = std::mem::take(&mut self.pending);
        match self.splice(&batch) {
            Ok(()) => {
                self.persisted += batch.len() as u64;
                debug!("geo index: flushed {} features ({} total)", batch.len(), self.persisted);
                Ok(batch.len())
            }
            Err(source) => {
                self.failures += batch.len() as u64;
                Err(IndexError::Io { path: self.path.clone(), source })
            }
        }
    }

    /// Flush what is left and report totals.
    pub fn finish(mut self) -> IndexStats {
        if let Err(e) = self.flush() {
            warn!("{e}");
        }
        IndexStats { features: self.persisted, failures: self.failures }
    }

    fn splice(&mut self, batch: &[String]) -> io::Result<()> {
        let len = self.file.seek(SeekFrom::End(0))?;
        if len < TAIL.len() as u64 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "truncated FeatureCollection"));
        }
        let mut tail = [0u8; 2];
        self.file.seek(SeekFrom::End(-2))?;
        self.file.read_exact(&mut tail)?;
        if tail != TAIL {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "file does not end in `]}`; modified by another writer?",
            ));
        }

        let mut chunk = String::with_capacity(batch.iter().map(|f| f.len() + 1).sum::<usize>() + 2);
        for (i, feature) in batch.iter().enumerate() {
            if self.persisted > 0 || i > 0 {
                chunk.push(',');
            }
            chunk.push_str(feature);
        }
        chunk.push_str("]}");

        self.file.seek(SeekFrom::End(-2))?;
        if let Err(e) = self.file.write_all(chunk.as_bytes()) {
            if let Err(restore) = self.restore(len) {
                warn!("geo index {}: cannot restore tail: {restore}", self.path.display());
            }
            return Err(e);
        }
        self.file.flush()
    }

    /// Cut a partial splice back to the previous `]}`.
    fn restore(&mut self, len: u64) -> io::Result<()> {
        self.file.set_len(len - 2)?;
        self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(TAIL)
    }
}

/// The index entry for one record.
pub fn point_feature(record: &MetadataRecord) -> Feature {
    let serial = record.serial_number();
    let details = &record.token_details;

    let mut properties = JsonObject::new();
    properties.insert("id".into(), json!(serial.to_string()));
    properties.insert("name".into(), json!(format!("Legado Point {serial}")));
    properties.insert("co2_saved".into(), json!(record.attribute(CO2_SAVED_TRAIT)));
    properties.insert(
        "deforestation_prevented".into(),
        json!(record.attribute(DEFORESTATION_TRAIT)),
    );
    properties.insert("minted_date".into(), json!(details.timestamp_minted));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(details.coordinates.position()))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
