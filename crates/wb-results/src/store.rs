//! Build output directory: table, metadata, sample and manifest.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use wb_config::WellbeingConfig;
use wb_core::WellbeingTable;

use crate::codec::{read_table_csv, write_table_csv};
use crate::hash::compute_build_id;
use crate::metadata::render_metadata;
use crate::types::{
    BuildInfo, BuildManifest, MANIFEST_FILE, METADATA_FILE, SAMPLE_FILE, TABLE_FILE,
};
use crate::{ResultsError, ResultsResult};

pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Debug)]
pub struct TableStore {
    root_dir: PathBuf,
}

impl TableStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn table_path(&self) -> PathBuf {
        self.root_dir.join(TABLE_FILE)
    }

    pub fn has_build(&self) -> bool {
        self.root_dir.join(MANIFEST_FILE).exists() && self.table_path().exists()
    }

    /// Persist a freshly built table with its companion files. An existing
    /// build in the same directory is overwritten.
    pub fn save_build(
        &self,
        table: &WellbeingTable,
        config: &WellbeingConfig,
        info: &BuildInfo,
    ) -> ResultsResult<BuildManifest> {
        write_table_csv(table, &self.table_path())?;

        let now = Utc::now();
        let metadata = render_metadata(table, config, info.year_range, now);
        fs::write(self.root_dir.join(METADATA_FILE), metadata)?;

        let mut taken = 0;
        let sample = table.retain_view(|_| {
            taken += 1;
            taken <= config.transform.sample_size
        });
        write_table_csv(&sample, &self.root_dir.join(SAMPLE_FILE))?;

        let manifest = BuildManifest {
            build_id: compute_build_id(&info.source_hash, config, TOOL_VERSION),
            source_hash: info.source_hash.clone(),
            source_path: info.source_path.clone(),
            timestamp: now.to_rfc3339(),
            tool_version: TOOL_VERSION.to_string(),
            countries: table.len(),
            dimensions: table.dimensions().to_vec(),
            dropped_countries: info.dropped_countries.clone(),
            year_range: info.year_range,
            files: vec![
                TABLE_FILE.to_string(),
                METADATA_FILE.to_string(),
                SAMPLE_FILE.to_string(),
            ],
        };
        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        fs::write(self.root_dir.join(MANIFEST_FILE), manifest_json)?;

        tracing::info!(
            dir = %self.root_dir.display(),
            build_id = %manifest.build_id,
            countries = manifest.countries,
            "saved build"
        );
        Ok(manifest)
    }

    pub fn load_manifest(&self) -> ResultsResult<BuildManifest> {
        let manifest_path = self.root_dir.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(self.not_found());
        }
        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_table(&self) -> ResultsResult<WellbeingTable> {
        let path = self.table_path();
        if !path.exists() {
            return Err(self.not_found());
        }
        read_table_csv(&path)
    }

    pub fn load_sample(&self) -> ResultsResult<WellbeingTable> {
        let path = self.root_dir.join(SAMPLE_FILE);
        if !path.exists() {
            return Err(self.not_found());
        }
        read_table_csv(&path)
    }

    pub fn load_metadata(&self) -> ResultsResult<String> {
        let path = self.root_dir.join(METADATA_FILE);
        if !path.exists() {
            return Err(self.not_found());
        }
        Ok(fs::read_to_string(path)?)
    }

    fn not_found(&self) -> ResultsError {
        ResultsError::BuildNotFound {
            path: self.root_dir.display().to_string(),
        }
    }
}
