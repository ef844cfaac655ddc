use proptest::prelude::*;
use wb_config::WellbeingConfig;
use wb_core::{Dimension, round1};
use wb_transform::{RawObservation, build_table};

fn raw_table(values: &[[f64; 10]], config: &WellbeingConfig) -> Vec<RawObservation> {
    values
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            config
                .measures
                .iter()
                .zip(row.iter())
                .map(move |(m, &v)| RawObservation {
                    country: format!("Country {i:02}"),
                    ref_area: format!("C{i:02}"),
                    domain: "Test".to_string(),
                    measure: m.measure.clone(),
                    sex: "Total".to_string(),
                    age: "Total".to_string(),
                    education: "Total".to_string(),
                    year: 2022,
                    obs_value: Some(v),
                })
        })
        .collect()
}

fn countries() -> impl Strategy<Value = Vec<[f64; 10]>> {
    prop::collection::vec(prop::array::uniform10(0.0f64..1000.0), 2..20)
}

proptest! {
    #[test]
    fn scores_stay_in_bounds(values in countries()) {
        let config = WellbeingConfig::default();
        let out = build_table(&raw_table(&values, &config), &config).unwrap();
        for r in out.table.records() {
            for (_, v) in r.scores.iter() {
                prop_assert!((0.0..=100.0).contains(&v));
            }
            prop_assert!((0.0..=100.0).contains(&r.composite_index));
            let scores: Vec<f64> = r.scores.iter().map(|(_, v)| v).collect();
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            prop_assert_eq!(r.composite_index, round1(mean));
        }
    }

    #[test]
    fn gaps_sum_to_zero(values in countries()) {
        let config = WellbeingConfig::default();
        let out = build_table(&raw_table(&values, &config), &config).unwrap();
        let n = out.table.len() as f64;
        for &d in out.table.dimensions() {
            let sum: f64 = out.table.records().iter().filter_map(|r| r.gap(d)).sum();
            prop_assert!(sum.abs() <= 0.1 * n + 1e-9, "{d} gaps sum to {sum}");
        }
    }

    #[test]
    fn inverted_dimensions_reward_lower_values(values in countries()) {
        let config = WellbeingConfig::default();
        let out = build_table(&raw_table(&values, &config), &config).unwrap();
        for (col, m) in config.measures.iter().enumerate().filter(|(_, m)| m.invert) {
            for (i, a) in values.iter().enumerate() {
                for (j, b) in values.iter().enumerate() {
                    if a[col] < b[col] {
                        let sa = out.table.find(&format!("Country {i:02}")).unwrap().score(m.dimension);
                        let sb = out.table.find(&format!("Country {j:02}")).unwrap().score(m.dimension);
                        prop_assert!(sa >= sb);
                    }
                }
            }
        }
    }

    #[test]
    fn constant_dimension_scores_fifty(values in countries(), constant in 0.0f64..100.0) {
        let config = WellbeingConfig::default();
        let mut values = values;
        for row in &mut values {
            row[6] = constant;
        }
        let out = build_table(&raw_table(&values, &config), &config).unwrap();
        for r in out.table.records() {
            prop_assert_eq!(r.score(Dimension::Safety), Some(50.0));
        }
    }
}
