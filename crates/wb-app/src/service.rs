//! Configuration, table loading, the offline build and one-shot queries.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use wb_config::WellbeingConfig;
use wb_core::{Dimension, Real, WellbeingTable};
use wb_explore::{
    BenchmarkPoint, BoostSimulation, ExploreError, GapAnalysis, ImprovementProjection, RankingEntry,
    analyze_gaps, bottom_ranking, diagnostic_narrative, insight_narrative, project_improvement,
    simulate_boosts, top_ranking,
};
use wb_results::{BuildInfo, BuildManifest, TableStore, hash_bytes, read_table_csv};
use wb_transform::{
    BuildReport, RawProfile, ValidationCheck, build_table, profile_raw, read_raw_from_reader,
    validate_table,
};

use crate::error::{AppError, AppResult};

/// Load configuration from `path`, or the built-in defaults.
pub fn load_config(path: Option<&Path>) -> AppResult<WellbeingConfig> {
    Ok(wb_config::load_or_default(path)?)
}

/// Write the default configuration to `path`.
pub fn init_config(path: &Path) -> AppResult<WellbeingConfig> {
    let config = WellbeingConfig::default();
    wb_config::save_yaml(path, &config)?;
    Ok(config)
}

/// Load a persisted table from its CSV file or from a build directory.
pub fn load_table(path: &Path) -> AppResult<WellbeingTable> {
    let table = if path.is_dir() {
        TableStore::new(path.to_path_buf())?.load_table()?
    } else {
        read_table_csv(path)?
    };
    info!(path = %path.display(), countries = table.len(), "loaded table");
    Ok(table)
}

/// Pretty JSON for CLI output and host payloads.
pub fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn read_input(path: &Path) -> AppResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| AppError::InputRead {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn profile_file(path: &Path) -> AppResult<RawProfile> {
    let bytes = read_input(path)?;
    let observations = read_raw_from_reader(bytes.as_slice())?;
    Ok(profile_raw(&observations))
}

/// Request to build and persist the table from a raw extract.
pub struct TransformRequest<'a> {
    pub raw_path: &'a Path,
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransformResponse {
    pub manifest: BuildManifest,
    pub report: BuildReport,
    pub checks: Vec<ValidationCheck>,
    pub rankings: Rankings,
}

impl TransformResponse {
    pub fn all_checks_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}

pub fn run_transform(
    request: &TransformRequest<'_>,
    config: &WellbeingConfig,
) -> AppResult<TransformResponse> {
    let bytes = read_input(request.raw_path)?;
    let source_hash = hash_bytes(&bytes);
    let observations = read_raw_from_reader(bytes.as_slice())?;
    let output = build_table(&observations, config)?;

    let store = TableStore::new(request.out_dir.clone())?;
    let info = BuildInfo {
        source_hash,
        source_path: request.raw_path.display().to_string(),
        dropped_countries: output.report.dropped_countries.clone(),
        year_range: output.report.year_range,
    };
    let manifest = store.save_build(&output.table, config, &info)?;
    info!(
        build_id = %manifest.build_id,
        out_dir = %request.out_dir.display(),
        countries = output.table.len(),
        "saved build"
    );

    Ok(TransformResponse {
        checks: validate_table(&output.table, config),
        rankings: rankings(&output.table, config.transform.ranking_size),
        manifest,
        report: output.report,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct Rankings {
    pub top: Vec<RankingEntry>,
    pub bottom: Vec<RankingEntry>,
}

pub fn rankings(table: &WellbeingTable, n: usize) -> Rankings {
    Rankings {
        top: top_ranking(table, n),
        bottom: bottom_ranking(table, n),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub country: String,
    pub composite_index: Real,
    pub top_performer: String,
    pub analysis: GapAnalysis,
    pub narrative: String,
}

/// Diagnosis for a country given by name or by ISO code.
pub fn diagnose(table: &WellbeingTable, country: &str) -> AppResult<Diagnosis> {
    let record = table
        .find(country)
        .or_else(|| table.find_by_code(country))
        .ok_or_else(|| ExploreError::CountryNotFound(country.to_string()))?;
    let top = table
        .top_performer()
        .map(|r| r.country.clone())
        .unwrap_or_else(|| record.country.clone());
    let gaps = record.gap_vector();
    Ok(Diagnosis {
        country: record.country.clone(),
        composite_index: record.composite_index,
        narrative: diagnostic_narrative(&record.country, &gaps, &top),
        analysis: analyze_gaps(&gaps),
        top_performer: top,
    })
}

/// Percentage boosts for one country, or for every country when `country`
/// is `None`.
pub fn simulate_policy(
    table: &WellbeingTable,
    config: &WellbeingConfig,
    country: Option<&str>,
    boosts: &[(Dimension, Real)],
) -> AppResult<Vec<BoostSimulation>> {
    let weights = config.simulation.weights();
    let records: Vec<_> = match country {
        Some(name) => vec![
            table
                .find(name)
                .ok_or_else(|| ExploreError::CountryNotFound(name.to_string()))?,
        ],
        None => table.records().iter().collect(),
    };
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(simulate_boosts(record, boosts, &weights)?);
    }
    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub projection: ImprovementProjection,
    pub benchmarks: Vec<BenchmarkPoint>,
    pub narrative: String,
}

/// Positions of the named countries found in `table`, in the given order.
pub fn benchmark_points(
    table: &WellbeingTable,
    names: &[String],
    dimension: Dimension,
) -> Vec<BenchmarkPoint> {
    names
        .iter()
        .filter_map(|name| {
            let r = table.find(name)?;
            Some(BenchmarkPoint {
                country: r.country.clone(),
                value: r.score(dimension)?,
                life_satisfaction: r.score(Dimension::LifeSatisfaction)?,
            })
        })
        .collect()
}

pub fn simulate_insight(
    table: &WellbeingTable,
    config: &WellbeingConfig,
    country: &str,
    dimension: Dimension,
    improvement: Real,
) -> AppResult<Insight> {
    let projection = project_improvement(
        table,
        country,
        dimension,
        improvement,
        config.simulation.correlation_scale,
    )?;
    let benchmarks = benchmark_points(table, &config.dashboard.benchmark_countries, dimension);
    let narrative = insight_narrative(
        &projection,
        &config.dashboard.benchmark_countries,
        &benchmarks,
    );
    Ok(Insight {
        projection,
        benchmarks,
        narrative,
    })
}
