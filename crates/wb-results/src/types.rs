//! Persisted build types.

use serde::{Deserialize, Serialize};
use wb_core::Dimension;

pub type BuildId = String;

pub const TABLE_FILE: &str = "oecd_wellbeing_processed.csv";
pub const METADATA_FILE: &str = "oecd_data_metadata.txt";
pub const SAMPLE_FILE: &str = "oecd_sample_15countries.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Written next to the table so a later session can tell which raw extract
/// and configuration produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildManifest {
    pub build_id: BuildId,
    /// SHA-256 of the raw extract bytes.
    pub source_hash: String,
    pub source_path: String,
    pub timestamp: String,
    pub tool_version: String,
    pub countries: usize,
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_countries: Vec<String>,
    #[serde(default)]
    pub year_range: Option<(i32, i32)>,
    pub files: Vec<String>,
}

/// Everything a build needs to persist besides the table itself.
#[derive(Debug, Clone, Default)]
pub struct BuildInfo {
    pub source_hash: String,
    pub source_path: String,
    pub dropped_countries: Vec<String>,
    pub year_range: Option<(i32, i32)>,
}
