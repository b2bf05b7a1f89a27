//! End-to-end: generate a small corpus, then minify it.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use geojson::FeatureCollection;
use legado_core::config::{GenerateConfig, MinifyConfig};
use legado_core::generator::BulkGenerator;
use legado_core::land::{LandContainment, LandMask};
use legado_core::minify::{CompactRecord, MinificationEngine, MinifyReport};
use legado_core::record::achievements::template;
use legado_core::record::{MetadataRecord, CO2_SAVED_TRAIT};
use serde_json::Value;
use tempfile::TempDir;

const COUNT: u64 = 120;

fn land() -> LandMask {
    LandMask::from_geojson_str(include_str!("fixtures/land.geojson")).unwrap()
}

fn generate(out: &Path, seed: u64) -> GenerateConfig {
    let config = GenerateConfig {
        output_dir: out.to_path_buf(),
        total_count: COUNT,
        seed: Some(seed),
        index_flush_interval: 16,
        progress_interval: 50,
        ..GenerateConfig::default()
    };
    let land = land();
    let report = BulkGenerator::new(config.clone(), &land).unwrap().run().unwrap();
    assert_eq!(report.written, COUNT);
    assert_eq!(report.write_failures + report.provider_failures + report.index_failures, 0);
    config
}

fn record_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == "txt"))
        .collect();
    files.sort();
    files
}

fn read_record(dir: &Path, serial: u64) -> MetadataRecord {
    serde_json::from_str(&fs::read_to_string(dir.join(format!("{serial}.txt"))).unwrap()).unwrap()
}

fn copy_records(from: &Path, to: &Path) {
    for path in record_files(from) {
        fs::copy(&path, to.join(path.file_name().unwrap())).unwrap();
    }
}

fn minify(dir: &Path, workers: usize) -> MinifyReport {
    MinificationEngine::new(MinifyConfig { workers, ..MinifyConfig::default() })
        .unwrap()
        .minify(dir)
        .unwrap()
}

// ── Generation ────────────────────────────────────────────────────────────────

/// ✓ N records yield files {1..N} and an index with ids {1..N}.
#[test]
fn serials_are_dense_in_files_and_index() {
    let tmp = TempDir::new().unwrap();
    let config = generate(tmp.path(), 1);

    let stems: BTreeSet<u64> = record_files(tmp.path())
        .iter()
        .map(|p| p.file_stem().unwrap().to_str().unwrap().parse().unwrap())
        .collect();
    assert_eq!(stems, (1..=COUNT).collect::<BTreeSet<u64>>());

    let fc: FeatureCollection = fs::read_to_string(config.index_path()).unwrap().parse().unwrap();
    assert_eq!(fc.features.len() as u64, COUNT);
    let ids: BTreeSet<u64> = fc
        .features
        .iter()
        .map(|f| f.property("id").unwrap().as_str().unwrap().parse().unwrap())
        .collect();
    assert_eq!(ids, (1..=COUNT).collect::<BTreeSet<u64>>());

    let first = &fc.features[0];
    let record = read_record(tmp.path(), 1);
    assert_eq!(first.property("name").unwrap(), "Legado Point 1");
    assert_eq!(
        first.property("co2_saved").unwrap().as_u64().unwrap(),
        u64::from(record.attribute(CO2_SAVED_TRAIT).unwrap())
    );
    assert_eq!(
        first.property("minted_date").unwrap(),
        record.token_details.timestamp_minted.as_str()
    );
    let Some(geojson::Value::Point(position)) = first.geometry.as_ref().map(|g| &g.value) else {
        panic!("index feature is not a point");
    };
    let at = record.token_details.coordinates;
    assert_eq!(position, &vec![at.longitude, at.latitude]);
}

/// ✓ Every record sits on land, inside the mint window, with consistent
/// dates across its three renderings.
#[test]
fn records_are_on_land_and_in_window() {
    let tmp = TempDir::new().unwrap();
    let config = generate(tmp.path(), 2);
    let land = land();

    for serial in 1..=COUNT {
        let record = read_record(tmp.path(), serial);
        let td = &record.token_details;
        assert_eq!(td.serial_number, serial);
        assert!(land.contains(td.coordinates), "serial {serial} at {:?}", td.coordinates);

        let minted = NaiveDateTime::parse_from_str(&td.timestamp_minted, "%Y-%m-%dT%H:%M:%SZ").unwrap();
        assert!(minted >= config.mint_start && minted <= config.mint_end);

        let day: NaiveDate = minted.date();
        let w = &td.world_conditions_on_mint;
        assert!(w.nasa_image.ends_with(&format!("S_{}.jpg", day.format("%y%m%d"))));
        assert!(w.planetary_image.contains(&day.format("%Y%m%d").to_string()));
        assert!(w.weather_data.hourly.iter().all(|h| h.time.starts_with(&day.to_string())));
    }
}

#[test]
fn early_serials_carry_the_template() {
    let tmp = TempDir::new().unwrap();
    generate(tmp.path(), 3);
    for serial in 1..=50 {
        assert_eq!(read_record(tmp.path(), serial).token_details.achievements, template());
    }
    for serial in 51..=COUNT {
        let achievements = read_record(tmp.path(), serial).token_details.achievements;
        assert!(achievements.is_empty() || achievements == template());
    }
}

#[test]
fn records_are_pretty_printed_with_two_spaces() {
    let tmp = TempDir::new().unwrap();
    generate(tmp.path(), 4);
    let text = fs::read_to_string(tmp.path().join("1.txt")).unwrap();
    assert!(text.starts_with("{\n  \"attributes\": [\n    {\n      \"trait_type\""));
}

// ── Minification ──────────────────────────────────────────────────────────────

/// ✓ One worker and four workers produce byte-identical files.
#[test]
fn worker_count_does_not_change_output() {
    let src = TempDir::new().unwrap();
    generate(src.path(), 5);
    let one = TempDir::new().unwrap();
    let four = TempDir::new().unwrap();
    copy_records(src.path(), one.path());
    copy_records(src.path(), four.path());

    let r1 = minify(one.path(), 1);
    let r4 = minify(four.path(), 4);
    assert_eq!(r1, r4);
    assert_eq!(r1.succeeded as u64, COUNT);

    for serial in 1..=COUNT {
        let name = format!("{serial}.txt");
        assert_eq!(
            fs::read(one.path().join(&name)).unwrap(),
            fs::read(four.path().join(&name)).unwrap(),
            "{name} differs"
        );
    }
}

#[test]
fn compact_files_mirror_their_source() {
    let tmp = TempDir::new().unwrap();
    generate(tmp.path(), 6);
    let before: Vec<MetadataRecord> = (1..=COUNT).map(|s| read_record(tmp.path(), s)).collect();

    let report = minify(tmp.path(), 3);
    assert_eq!(report.success_ratio(), 1.0);

    for source in &before {
        let serial = source.serial_number();
        let text = fs::read_to_string(tmp.path().join(format!("{serial}.txt"))).unwrap();
        assert!(!text.contains('\n'));
        let compact: CompactRecord = serde_json::from_str(&text).unwrap();
        let td = &source.token_details;
        assert_eq!(compact.token.serial_number, serial);
        assert_eq!(compact.token.timestamp, td.timestamp_minted);
        assert_eq!(compact.token.coordinates.la, td.coordinates.latitude);
        assert_eq!(compact.token.world.wd.h.len(), 24);
        assert!(compact.attributes.is_empty());

        let raw: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(raw["t"].get("ac").is_some(), !td.achievements.is_empty());
    }
}

#[test]
fn reference_values_round_to_one_decimal() {
    let tmp = TempDir::new().unwrap();
    generate(tmp.path(), 7);

    let path = tmp.path().join("60.txt");
    let mut value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let w = &mut value["token_details"]["world_conditions_on_mint"];
    w["co2_ppm"] = Value::from(421.37_f64);
    w["global_temperature_anomaly_c"] = Value::from(1.10_f64);
    w["weather_data"]["hourly"][0]["temperature_2m"] = Value::from(18.34_f64);
    w["weather_data"]["hourly"][0]["precipitation"] = Value::from(2.06_f64);
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

    minify(tmp.path(), 2);
    let compact: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(compact["t"]["w"]["cp"], 421.4);
    assert_eq!(compact["t"]["w"]["gt"], 1.1);
    assert_eq!(compact["t"]["w"]["wd"]["h"][0]["te"], 18.3);
    assert_eq!(compact["t"]["w"]["wd"]["h"][0]["p"], 2.1);
}

#[test]
fn broken_files_are_counted_and_skipped() {
    let tmp = TempDir::new().unwrap();
    generate(tmp.path(), 8);
    fs::write(tmp.path().join("3.txt"), "{\"attributes\": [").unwrap();

    let report = minify(tmp.path(), 4);
    assert_eq!(report.total as u64, COUNT);
    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded as u64, COUNT - 1);
    assert_eq!(fs::read_to_string(tmp.path().join("3.txt")).unwrap(), "{\"attributes\": [");
}

/// ✓ A second pass refuses every file and changes nothing.
#[test]
fn second_pass_is_refused() {
    let tmp = TempDir::new().unwrap();
    generate(tmp.path(), 9);
    minify(tmp.path(), 2);
    let snapshot: Vec<Vec<u8>> = record_files(tmp.path()).iter().map(|p| fs::read(p).unwrap()).collect();

    let again = minify(tmp.path(), 2);
    assert_eq!(again.already_compact as u64, COUNT);
    assert_eq!(again.succeeded, 0);
    let after: Vec<Vec<u8>> = record_files(tmp.path()).iter().map(|p| fs::read(p).unwrap()).collect();
    assert_eq!(snapshot, after);
}
