//! Service layer: config, build, reload and one-shot queries.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use wb_app::{
    TransformRequest, diagnose, init_config, load_config, load_table, rankings, run_transform,
    simulate_insight, simulate_policy,
};
use wb_config::WellbeingConfig;
use wb_core::Dimension;
use wb_results::{MANIFEST_FILE, METADATA_FILE, SAMPLE_FILE, TABLE_FILE};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

/// Raw extract for four countries with every default measure, plus an older
/// year and a demographic slice that must both be ignored.
fn raw_csv(config: &WellbeingConfig) -> String {
    let countries = [
        ("Finland", "FIN", 9.0),
        ("Denmark", "DNK", 8.0),
        ("Japan", "JPN", 5.0),
        ("Chile", "CHL", 2.0),
    ];
    let mut out = String::from("Country,REF_AREA,Domain,Measure,Sex,Age,Education,Year,OBS_VALUE\n");
    for (ci, (country, code, base)) in countries.iter().enumerate() {
        for (mi, m) in config.measures.iter().enumerate() {
            let value = base + ((ci * 3 + mi) % 5) as f64;
            writeln!(
                out,
                "{country},{code},Domain,{},Total,Total,Total,2022,{value}",
                m.measure
            )
            .unwrap();
            writeln!(
                out,
                "{country},{code},Domain,{},Total,Total,Total,2018,999",
                m.measure
            )
            .unwrap();
            writeln!(
                out,
                "{country},{code},Domain,{},Female,Total,Total,2022,-5",
                m.measure
            )
            .unwrap();
        }
    }
    out
}

#[test]
fn transform_persists_and_reloads() {
    let dir = unique_temp_dir("wb_app_transform");
    fs::create_dir_all(&dir).unwrap();
    let config = WellbeingConfig::default();
    let raw_path = dir.join("raw.csv");
    fs::write(&raw_path, raw_csv(&config)).unwrap();

    let out_dir = dir.join("build");
    let response = run_transform(
        &TransformRequest {
            raw_path: &raw_path,
            out_dir: out_dir.clone(),
        },
        &config,
    )
    .expect("transform failed");

    assert_eq!(response.manifest.countries, 4);
    assert_eq!(response.manifest.dimensions.len(), Dimension::COUNT);
    assert_eq!(response.report.year_range, Some((2022, 2022)));
    assert!(response.report.dropped_countries.is_empty());
    // Four countries is below the default minimum of 25.
    assert!(!response.all_checks_passed());
    assert_eq!(response.rankings.top.len(), 4);

    for file in [TABLE_FILE, METADATA_FILE, SAMPLE_FILE, MANIFEST_FILE] {
        assert!(out_dir.join(file).exists(), "{file} missing");
    }

    let from_dir = load_table(&out_dir).unwrap();
    let from_file = load_table(&out_dir.join(TABLE_FILE)).unwrap();
    assert_eq!(from_dir, from_file);
    assert_eq!(from_dir.len(), 4);
    for record in from_dir.records() {
        for (_, v) in record.scores.iter() {
            assert!((0.0..=100.0).contains(&v));
        }
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_input_is_reported_with_path() {
    let config = WellbeingConfig::default();
    let missing = unique_temp_dir("wb_app_missing").join("raw.csv");
    let err = run_transform(
        &TransformRequest {
            raw_path: &missing,
            out_dir: unique_temp_dir("wb_app_missing_out"),
        },
        &config,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Failed to read input file"));
}

#[test]
fn init_config_round_trips() {
    let dir = unique_temp_dir("wb_app_config");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("wellbeing.yaml");

    let written = init_config(&path).unwrap();
    assert_eq!(load_config(Some(&path)).unwrap(), written);
    assert_eq!(load_config(None).unwrap(), WellbeingConfig::default());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn queries_over_a_built_table() {
    let dir = unique_temp_dir("wb_app_queries");
    fs::create_dir_all(&dir).unwrap();
    let config = WellbeingConfig::default();
    let raw_path = dir.join("raw.csv");
    fs::write(&raw_path, raw_csv(&config)).unwrap();
    let out_dir = dir.join("build");
    run_transform(
        &TransformRequest {
            raw_path: &raw_path,
            out_dir: out_dir.clone(),
        },
        &config,
    )
    .unwrap();
    let table = load_table(&out_dir).unwrap();

    let ranks = rankings(&table, 2);
    assert_eq!(ranks.top.len(), 2);
    assert_eq!(ranks.bottom.last().unwrap().rank, 4);

    let diagnosis = diagnose(&table, "Japan").unwrap();
    assert_eq!(diagnosis.top_performer, table.top_performer().unwrap().country);
    assert!(diagnosis.narrative.contains("OECD Wellbeing Diagnostic: Japan"));
    assert!(diagnose(&table, "Atlantis").is_err());
    let by_code = diagnose(&table, "JPN").unwrap();
    assert_eq!(by_code.country, "Japan");
    assert_eq!(by_code.narrative, diagnosis.narrative);

    let all = simulate_policy(&table, &config, None, &[(Dimension::Jobs, 0.0)]).unwrap();
    assert_eq!(all.len(), 4);
    for (sim, record) in all.iter().zip(table.records()) {
        assert_eq!(sim.scores, record.scores);
    }
    let one = simulate_policy(&table, &config, Some("Chile"), &[(Dimension::Jobs, 40.0)]).unwrap();
    assert_eq!(one.len(), 1);
    assert!(one[0].boosted);

    let insight = simulate_insight(&table, &config, "Japan", Dimension::Health, 10.0).unwrap();
    assert_eq!(insight.benchmarks.len(), 2);
    assert_eq!(
        insight.projection.simulated_value,
        insight.projection.current_value + 10.0
    );

    fs::remove_dir_all(&dir).ok();
}
