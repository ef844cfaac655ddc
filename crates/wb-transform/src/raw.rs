//! Raw extract ingest.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::TransformResult;

pub const TOTAL: &str = "Total";

/// One row of the raw extract. Unknown columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "REF_AREA")]
    pub ref_area: String,
    #[serde(rename = "Domain", default)]
    pub domain: String,
    #[serde(rename = "Measure")]
    pub measure: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Education")]
    pub education: String,
    #[serde(rename = "Year")]
    pub year: i32,
    /// Empty cells deserialize as `None`.
    #[serde(rename = "OBS_VALUE")]
    pub obs_value: Option<f64>,
}

impl RawObservation {
    /// Country-level aggregate with no demographic breakdown.
    pub fn is_total(&self) -> bool {
        self.age == TOTAL && self.sex == TOTAL && self.education == TOTAL
    }
}

pub fn read_raw_csv(path: &Path) -> TransformResult<Vec<RawObservation>> {
    let file = std::fs::File::open(path)?;
    let rows = read_raw_from_reader(file)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded raw extract");
    Ok(rows)
}

pub fn read_raw_from_reader<R: Read>(reader: R) -> TransformResult<Vec<RawObservation>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawObservation = result?;
        rows.push(row);
    }
    Ok(rows)
}
