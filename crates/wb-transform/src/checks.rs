//! Post-build sanity checks reported by the CLI after a transform.

use serde::Serialize;
use wb_config::WellbeingConfig;
use wb_core::WellbeingTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
}

impl ValidationCheck {
    fn new(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            passed,
        }
    }
}

pub fn validate_table(table: &WellbeingTable, config: &WellbeingConfig) -> Vec<ValidationCheck> {
    let records = table.records();
    let dims = table.dimensions();
    let min_countries = config.transform.min_countries;

    vec![
        ValidationCheck::new(
            "No missing country names",
            records.iter().all(|r| !r.country.trim().is_empty()),
        ),
        ValidationCheck::new(
            "No missing country codes",
            records.iter().all(|r| !r.country_code.trim().is_empty()),
        ),
        ValidationCheck::new(
            "All scores 0-100",
            records.iter().all(|r| {
                dims.iter()
                    .all(|&d| r.score(d).is_some_and(|v| (0.0..=100.0).contains(&v)))
            }),
        ),
        ValidationCheck::new(
            "Composite index exists",
            records.iter().all(|r| r.composite_index.is_finite()),
        ),
        ValidationCheck::new(
            "All gaps calculated",
            records
                .iter()
                .all(|r| dims.iter().all(|&d| r.gap(d).is_some())),
        ),
        ValidationCheck::new(
            format!("At least {min_countries} countries"),
            table.len() >= min_countries,
        ),
    ]
}
