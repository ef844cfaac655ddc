use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use wb_config::WellbeingConfig;
use wb_core::{Dimension, DimensionScores, WellbeingRecord, WellbeingTable};
use wb_results::{BuildInfo, ResultsError, SAMPLE_FILE, TableStore, hash_bytes};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn table(n: usize) -> WellbeingTable {
    let records = (0..n)
        .map(|i| {
            let v = 100.0 - i as f64;
            WellbeingRecord {
                country: format!("Country {i:02}"),
                country_code: format!("C{i:02}"),
                scores: [(Dimension::Health, v)].into_iter().collect(),
                composite_index: v,
                gaps: DimensionScores::from_iter([(Dimension::Health, 0.0)]),
            }
        })
        .collect();
    WellbeingTable::new(vec![Dimension::Health], records).expect("valid table")
}

#[test]
fn save_and_load_build() {
    let dir = unique_temp_dir("wb_results_build");
    let store = TableStore::new(dir.clone()).expect("failed to create store");
    assert!(!store.has_build());

    let config = WellbeingConfig::default();
    let info = BuildInfo {
        source_hash: hash_bytes(b"raw extract"),
        source_path: "OECD-wellbeing.csv".to_string(),
        dropped_countries: vec!["Sparse".to_string()],
        year_range: Some((2018, 2024)),
    };
    let full = table(20);

    let manifest = store
        .save_build(&full, &config, &info)
        .expect("failed to save build");
    assert!(store.has_build());
    assert_eq!(manifest.countries, 20);
    assert_eq!(manifest.dimensions, vec![Dimension::Health]);

    let loaded_manifest = store.load_manifest().expect("failed to load manifest");
    assert_eq!(loaded_manifest, manifest);

    let loaded = store.load_table().expect("failed to load table");
    assert_eq!(loaded, full);

    let sample = store.load_sample().expect("failed to load sample");
    assert_eq!(sample.len(), config.transform.sample_size);
    assert_eq!(sample.records()[0].country, "Country 00");
    assert!(dir.join(SAMPLE_FILE).exists());

    let metadata = store.load_metadata().expect("failed to load metadata");
    assert!(metadata.contains("1. Country 00 (100.0)"));
    assert!(metadata.contains("5. Country 04 (96.0)"));
    assert!(!metadata.contains("6. Country 05"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn empty_store_reports_missing_build() {
    let dir = unique_temp_dir("wb_results_empty");
    let store = TableStore::new(dir.clone()).expect("failed to create store");
    assert!(matches!(
        store.load_table(),
        Err(ResultsError::BuildNotFound { .. })
    ));
    assert!(matches!(
        store.load_manifest(),
        Err(ResultsError::BuildNotFound { .. })
    ));
    let _ = fs::remove_dir_all(dir);
}
