use wb_config::{MeasureDef, WellbeingConfig};
use wb_core::{Dimension, round1};
use wb_transform::{RawObservation, TransformError, build_table, read_raw_from_reader};

fn row(country: &str, code: &str, measure: &str, year: i32, value: Option<f64>) -> RawObservation {
    RawObservation {
        country: country.to_string(),
        ref_area: code.to_string(),
        domain: "Test".to_string(),
        measure: measure.to_string(),
        sex: "Total".to_string(),
        age: "Total".to_string(),
        education: "Total".to_string(),
        year,
        obs_value: value,
    }
}

/// One observation per configured measure, values in configuration order.
fn country_rows(
    config: &WellbeingConfig,
    country: &str,
    code: &str,
    values: &[f64],
) -> Vec<RawObservation> {
    config
        .measures
        .iter()
        .zip(values)
        .map(|(m, &v)| row(country, code, &m.measure, 2022, Some(v)))
        .collect()
}

fn single_measure_config() -> WellbeingConfig {
    WellbeingConfig {
        measures: vec![MeasureDef {
            measure: "M".to_string(),
            dimension: Dimension::Health,
            invert: false,
            description: String::new(),
        }],
        ..WellbeingConfig::default()
    }
}

#[test]
fn finland_end_to_end() {
    let config = WellbeingConfig::default();
    // Configuration order: life satisfaction, health, income, education,
    // jobs, long hours (inv), homicides (inv), green space, social support,
    // housing (inv).
    let mut raw = country_rows(
        &config,
        "Finland",
        "FIN",
        &[7.8, 82.0, 40000.0, 290.0, 75.0, 3.0, 0.5, 90.0, 95.0, 15.0],
    );
    raw.extend(country_rows(
        &config,
        "Chile",
        "CHL",
        &[6.2, 80.0, 20000.0, 220.0, 60.0, 9.0, 4.5, 60.0, 85.0, 25.0],
    ));
    raw.extend(country_rows(
        &config,
        "Japan",
        "JPN",
        &[6.0, 84.0, 30000.0, 295.0, 78.0, 15.0, 0.8, 70.0, 88.0, 20.0],
    ));

    let out = build_table(&raw, &config).unwrap();
    let table = out.table;
    assert_eq!(table.dimensions(), &Dimension::ALL[..]);

    let finland = table.find("Finland").unwrap();
    assert_eq!(finland.score(Dimension::Safety), Some(100.0));
    assert_eq!(finland.score(Dimension::LifeSatisfaction), Some(100.0));

    let values: Vec<f64> = finland.scores.iter().map(|(_, v)| v).collect();
    assert_eq!(values.len(), 10);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    assert_eq!(finland.composite_index, round1(mean));

    // Sorted by composite index, descending.
    let composites: Vec<f64> = table.records().iter().map(|r| r.composite_index).collect();
    assert!(composites.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(out.report.observations_kept, 30);
    assert!(out.report.dropped_countries.is_empty());
}

#[test]
fn sparse_country_is_dropped_not_imputed() {
    let config = WellbeingConfig::default();
    let mut raw = Vec::new();
    for (i, (name, code)) in [("A", "AAA"), ("B", "BBB"), ("C", "CCC")].iter().enumerate() {
        let v = i as f64 + 1.0;
        raw.extend(country_rows(&config, name, code, &[v; 10]));
    }
    // Four of ten dimensions reported: six missing.
    raw.extend(country_rows(&config, "Sparse", "SPR", &[1.0, 2.0, 3.0, 4.0]));
    // Five of ten reported: exactly half missing, kept and filled.
    raw.extend(country_rows(&config, "Half", "HLF", &[3.0, 3.0, 3.0, 3.0, 3.0]));

    let out = build_table(&raw, &config).unwrap();
    assert!(out.table.find("Sparse").is_none());
    assert!(out.table.find("Half").is_some());
    assert_eq!(out.report.dropped_countries, vec!["Sparse".to_string()]);

    let fill = out
        .report
        .fills
        .iter()
        .find(|f| f.dimension == Dimension::Housing)
        .unwrap();
    assert_eq!(fill.count, 1);
    // Mean of A, B, C only; the dropped country does not contribute.
    assert_eq!(fill.value, 2.0);
}

#[test]
fn absent_measure_drops_its_dimension() {
    let config = WellbeingConfig::default();
    let raw: Vec<RawObservation> = [("A", "AAA", 1.0), ("B", "BBB", 2.0)]
        .iter()
        .flat_map(|(c, code, v)| country_rows(&config, c, code, &[*v; 10]))
        .filter(|o| o.measure != "Housing affordability")
        .collect();

    let out = build_table(&raw, &config).unwrap();
    assert!(!out.table.has_dimension(Dimension::Housing));
    assert_eq!(out.table.dimensions().len(), 9);
    assert_eq!(out.report.missing_dimensions, vec![Dimension::Housing]);
    let housing = out
        .report
        .measure_presence
        .iter()
        .find(|p| p.dimension == Dimension::Housing)
        .unwrap();
    assert!(!housing.present);
}

#[test]
fn latest_year_wins_and_later_duplicate_replaces() {
    let config = single_measure_config();
    let raw = vec![
        row("A", "AAA", "M", 2021, Some(30.0)),
        row("A", "AAA", "M", 2019, Some(10.0)),
        row("B", "BBB", "M", 2020, Some(20.0)),
    ];
    let out = build_table(&raw, &config).unwrap();
    assert_eq!(out.table.find("A").unwrap().score(Dimension::Health), Some(100.0));
    assert_eq!(out.table.find("B").unwrap().score(Dimension::Health), Some(0.0));
    assert_eq!(out.report.year_range, Some((2020, 2021)));

    let mut raw = raw;
    raw.push(row("A", "AAA", "M", 2021, Some(5.0)));
    let out = build_table(&raw, &config).unwrap();
    assert_eq!(out.table.find("A").unwrap().score(Dimension::Health), Some(0.0));
}

#[test]
fn demographic_slices_are_ignored() {
    let config = single_measure_config();
    let mut female = row("A", "AAA", "M", 2022, Some(99.0));
    female.sex = "Female".to_string();
    let raw = vec![
        row("A", "AAA", "M", 2021, Some(1.0)),
        female,
        row("B", "BBB", "M", 2021, Some(2.0)),
    ];
    let out = build_table(&raw, &config).unwrap();
    assert_eq!(out.report.rows_totals, 2);
    assert_eq!(out.table.find("A").unwrap().score(Dimension::Health), Some(0.0));
}

#[test]
fn constant_column_scores_fifty() {
    let config = single_measure_config();
    let raw = vec![
        row("A", "AAA", "M", 2022, Some(7.0)),
        row("B", "BBB", "M", 2022, Some(7.0)),
        row("C", "CCC", "M", 2022, Some(7.0)),
    ];
    let out = build_table(&raw, &config).unwrap();
    for r in out.table.records() {
        assert_eq!(r.score(Dimension::Health), Some(50.0));
        assert_eq!(r.gap(Dimension::Health), Some(0.0));
    }
}

#[test]
fn ties_keep_alphabetical_order() {
    let config = single_measure_config();
    let raw = vec![
        row("Zed", "ZZZ", "M", 2022, Some(5.0)),
        row("Abe", "AAA", "M", 2022, Some(5.0)),
        row("Low", "LLL", "M", 2022, Some(1.0)),
    ];
    let out = build_table(&raw, &config).unwrap();
    let names: Vec<&str> = out.table.records().iter().map(|r| r.country.as_str()).collect();
    assert_eq!(names, vec!["Abe", "Zed", "Low"]);
    assert_eq!(out.table.top_performer().unwrap().country, "Abe");
}

#[test]
fn nothing_usable_is_an_error() {
    let config = WellbeingConfig::default();
    let raw = vec![row("A", "AAA", "Unrelated", 2022, Some(1.0))];
    assert!(matches!(
        build_table(&raw, &config),
        Err(TransformError::NoDimensions)
    ));

    let raw = vec![row("A", "AAA", "Life satisfaction", 2022, None)];
    assert!(matches!(
        build_table(&raw, &config),
        Err(TransformError::NoDimensions)
    ));
}

#[test]
fn csv_input_builds_table() {
    let data = "\
Country,REF_AREA,Domain,Measure,Sex,Age,Education,Year,OBS_VALUE
Finland,FIN,Safety,Homicides,Total,Total,Total,2021,0.5
Mexico,MEX,Safety,Homicides,Total,Total,Total,2021,25.0
Chile,CHL,Safety,Homicides,Total,Total,Total,2021,4.5
";
    let raw = read_raw_from_reader(data.as_bytes()).unwrap();
    let out = build_table(&raw, &WellbeingConfig::default()).unwrap();
    assert_eq!(out.table.dimensions(), &[Dimension::Safety]);
    assert_eq!(out.table.records()[0].country, "Finland");
    assert_eq!(out.table.find("Mexico").unwrap().score(Dimension::Safety), Some(0.0));
    assert_eq!(out.table.find("Chile").unwrap().score(Dimension::Safety), Some(50.0));
}
