//! The table build: filter, latest-year selection, pivot, coverage drop,
//! mean fill, normalization, composite index, gaps and ranking order.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use wb_config::WellbeingConfig;
use wb_core::{
    Dimension, DimensionScores, Real, WellbeingRecord, WellbeingTable, average_ranks, mean,
    min_max, round1,
};

use crate::raw::RawObservation;
use crate::{TransformError, TransformResult};

/// Value assigned to every country when a column has no spread.
const DEGENERATE_SCORE: Real = 50.0;

#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub table: WellbeingTable,
    pub report: BuildReport,
}

/// What happened during a build, for logs, metadata and the CLI.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub rows_loaded: usize,
    pub rows_totals: usize,
    pub observations_kept: usize,
    pub measure_presence: Vec<MeasurePresence>,
    pub countries_pivoted: usize,
    pub dropped_countries: Vec<String>,
    pub missing_before_fill: Vec<(Dimension, usize)>,
    pub fills: Vec<FillRecord>,
    /// Configured dimensions absent from the output.
    pub missing_dimensions: Vec<Dimension>,
    pub year_range: Option<(i32, i32)>,
    /// Cross-country mean of each normalized dimension (the gap baseline).
    pub dimension_means: Vec<(Dimension, Real)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeasurePresence {
    pub measure: String,
    pub dimension: Dimension,
    pub invert: bool,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FillRecord {
    pub dimension: Dimension,
    pub count: usize,
    /// Column mean in raw units.
    pub value: Real,
}

/// Latest observation per (country, code, measure).
#[derive(Debug, Clone, Copy)]
struct Latest {
    year: i32,
    value: Option<Real>,
}

/// Pivoted, un-normalized row.
#[derive(Debug, Clone)]
struct WideRow {
    country: String,
    country_code: String,
    raw: DimensionScores,
}

/// Run the full build over raw observations.
pub fn build_table(
    observations: &[RawObservation],
    config: &WellbeingConfig,
) -> TransformResult<TransformOutput> {
    let mut report = BuildReport {
        rows_loaded: observations.len(),
        ..BuildReport::default()
    };

    let totals: Vec<&RawObservation> = observations.iter().filter(|o| o.is_total()).collect();
    report.rows_totals = totals.len();
    info!(
        rows = observations.len(),
        totals = totals.len(),
        "filtered to country-level totals"
    );

    report.measure_presence = config
        .measures
        .iter()
        .map(|m| MeasurePresence {
            measure: m.measure.clone(),
            dimension: m.dimension,
            invert: m.invert,
            present: totals.iter().any(|o| o.measure == m.measure),
        })
        .collect();
    for p in report.measure_presence.iter().filter(|p| !p.present) {
        warn!(measure = %p.measure, dimension = %p.dimension, "configured measure not found");
    }

    let latest = latest_observations(&totals, config);
    report.observations_kept = latest.len();
    report.year_range = latest
        .values()
        .map(|l| l.year)
        .fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        });

    let (mut rows, mut dims) = pivot(&latest, config);
    report.countries_pivoted = rows.len();
    if dims.is_empty() {
        return Err(TransformError::NoDimensions);
    }
    debug!(countries = rows.len(), dimensions = dims.len(), "pivoted to wide form");

    report.missing_before_fill = dims
        .iter()
        .map(|&d| (d, rows.iter().filter(|r| !r.raw.contains(d)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();

    report.dropped_countries =
        drop_low_coverage(&mut rows, &dims, config.transform.max_missing_fraction);
    if !report.dropped_countries.is_empty() {
        info!(
            dropped = report.dropped_countries.len(),
            "removed countries with too much missing data"
        );
    }
    if rows.is_empty() {
        return Err(TransformError::NoCountries);
    }

    report.fills = fill_missing(&mut rows, &mut dims);
    for fill in &report.fills {
        info!(
            dimension = %fill.dimension,
            count = fill.count,
            value = fill.value,
            "filled missing values with column mean"
        );
    }
    if dims.is_empty() {
        return Err(TransformError::NoDimensions);
    }

    report.missing_dimensions = config
        .measures
        .iter()
        .map(|m| m.dimension)
        .filter(|d| !dims.contains(d))
        .collect();

    let normalized = normalize(&rows, &dims, config);
    let mut records = score_records(&rows, &normalized, &dims);

    report.dimension_means = dims
        .iter()
        .map(|&d| {
            let column: Vec<Real> = normalized.iter().filter_map(|s| s.get(d)).collect();
            (d, mean(&column).unwrap_or(DEGENERATE_SCORE))
        })
        .collect();

    // Pivot order (country, code) is the tie-break; sort is stable.
    records.sort_by(|a, b| b.composite_index.total_cmp(&a.composite_index));

    let table = WellbeingTable::new(dims, records)?;
    info!(
        countries = table.len(),
        dimensions = table.dimensions().len(),
        "wellbeing table built"
    );

    Ok(TransformOutput { table, report })
}

/// Keep the most recent year per (country, code, measure). Rows are visited
/// in input order and a later row with an equal year replaces the earlier one.
fn latest_observations(
    totals: &[&RawObservation],
    config: &WellbeingConfig,
) -> BTreeMap<(String, String, Dimension), Latest> {
    let mut latest: BTreeMap<(String, String, Dimension), Latest> = BTreeMap::new();
    for obs in totals {
        let Some(def) = config.measure_named(&obs.measure) else {
            continue;
        };
        let key = (obs.country.clone(), obs.ref_area.clone(), def.dimension);
        let candidate = Latest {
            year: obs.year,
            value: obs.obs_value.filter(|v| v.is_finite()),
        };
        match latest.get(&key) {
            Some(existing) if existing.year > candidate.year => {}
            _ => {
                latest.insert(key, candidate);
            }
        }
    }
    latest
}

/// One row per (country, code), sorted by that key. A dimension is present
/// only if at least one country has a value for it.
fn pivot(
    latest: &BTreeMap<(String, String, Dimension), Latest>,
    config: &WellbeingConfig,
) -> (Vec<WideRow>, Vec<Dimension>) {
    let mut wide: BTreeMap<(String, String), DimensionScores> = BTreeMap::new();
    for ((country, code, dim), obs) in latest {
        let row = wide.entry((country.clone(), code.clone())).or_default();
        if let Some(v) = obs.value {
            row.set(*dim, v);
        }
    }

    let rows: Vec<WideRow> = wide
        .into_iter()
        .map(|((country, country_code), raw)| WideRow {
            country,
            country_code,
            raw,
        })
        .collect();

    let dims: Vec<Dimension> = Dimension::ALL
        .into_iter()
        .filter(|&d| config.measure_for(d).is_some())
        .filter(|&d| rows.iter().any(|r| r.raw.contains(d)))
        .collect();

    (rows, dims)
}

/// Remove rows whose missing share exceeds `max_missing_fraction`; returns
/// the dropped country names.
fn drop_low_coverage(
    rows: &mut Vec<WideRow>,
    dims: &[Dimension],
    max_missing_fraction: Real,
) -> Vec<String> {
    let n_dims = dims.len() as Real;
    let mut dropped = Vec::new();
    rows.retain(|row| {
        let missing = dims.iter().filter(|&&d| !row.raw.contains(d)).count() as Real;
        let keep = missing / n_dims <= max_missing_fraction;
        if !keep {
            dropped.push(row.country.clone());
        }
        keep
    });
    dropped
}

/// Fill gaps with the raw column mean over surviving rows. A dimension no
/// surviving row reports is removed from `dims` instead.
fn fill_missing(rows: &mut [WideRow], dims: &mut Vec<Dimension>) -> Vec<FillRecord> {
    let mut fills = Vec::new();
    dims.retain(|&d| {
        let present: Vec<Real> = rows.iter().filter_map(|r| r.raw.get(d)).collect();
        let Some(avg) = mean(&present) else {
            warn!(dimension = %d, "no surviving country reports this dimension; dropping it");
            return false;
        };
        let mut count = 0;
        for row in rows.iter_mut().filter(|r| !r.raw.contains(d)) {
            row.raw.set(d, avg);
            count += 1;
        }
        if count > 0 {
            fills.push(FillRecord {
                dimension: d,
                count,
                value: avg,
            });
        }
        true
    });
    fills
}

/// Normalize every dimension column to 0-100, rounded to one decimal.
fn normalize(
    rows: &[WideRow],
    dims: &[Dimension],
    config: &WellbeingConfig,
) -> Vec<DimensionScores> {
    let mut out = vec![DimensionScores::new(); rows.len()];
    for &d in dims {
        let column: Vec<Real> = rows.iter().filter_map(|r| r.raw.get(d)).collect();
        let scaled = if config.is_inverted(d) {
            debug!(dimension = %d, "normalizing by inverted percentile rank");
            inverted_rank_scale(&column)
        } else {
            debug!(dimension = %d, "normalizing by min-max");
            min_max_scale(&column)
        };
        for (scores, v) in out.iter_mut().zip(scaled) {
            scores.set(d, round1(v));
        }
    }
    out
}

/// Min-max scaling to [0, 100]; a constant column maps to 50.
pub fn min_max_scale(column: &[Real]) -> Vec<Real> {
    match min_max(column) {
        Some((lo, hi)) if hi > lo => column
            .iter()
            .map(|v| (v - lo) / (hi - lo) * 100.0)
            .collect(),
        _ => vec![DEGENERATE_SCORE; column.len()],
    }
}

/// Percentile-rank scaling where the lowest raw value scores 100 and the
/// highest 0. Ties share their average rank; a single row or a constant
/// column maps to 50.
///
/// Uses `(rank - 1) / (n - 1)` rather than the plain `rank / n` percentile
/// so that the best observed value lands exactly on 100.
pub fn inverted_rank_scale(column: &[Real]) -> Vec<Real> {
    let n = column.len();
    if n < 2 {
        return vec![DEGENERATE_SCORE; n];
    }
    average_ranks(column)
        .into_iter()
        .map(|rank| {
            let pct = (rank - 1.0) / (n as Real - 1.0);
            (1.0 - pct) * 100.0
        })
        .collect()
}

/// Composite index and gaps over normalized scores.
fn score_records(
    rows: &[WideRow],
    normalized: &[DimensionScores],
    dims: &[Dimension],
) -> Vec<WellbeingRecord> {
    let means: Vec<(Dimension, Real)> = dims
        .iter()
        .map(|&d| {
            let column: Vec<Real> = normalized.iter().filter_map(|s| s.get(d)).collect();
            (d, mean(&column).unwrap_or(DEGENERATE_SCORE))
        })
        .collect();

    rows.iter()
        .zip(normalized)
        .map(|(row, scores)| {
            let values: Vec<Real> = scores.iter().map(|(_, v)| v).collect();
            let composite = round1(mean(&values).unwrap_or(DEGENERATE_SCORE));

            let gaps: DimensionScores = means
                .iter()
                .filter_map(|&(d, avg)| scores.get(d).map(|v| (d, round1(v - avg))))
                .collect();

            WellbeingRecord {
                country: row.country.clone(),
                country_code: row.country_code.clone(),
                scores: *scores,
                composite_index: composite,
                gaps,
            }
        })
        .collect()
}
