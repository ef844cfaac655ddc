//! Normalized per-country records and the read-only table shared by every
//! interactive view.

use serde::Serialize;
use std::collections::HashSet;

use crate::{CoreError, CoreResult, Dimension, DimensionScores, Real, ensure_finite, mean};

/// One country after normalization.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WellbeingRecord {
    pub country: String,
    pub country_code: String,
    /// Normalized 0-100 score per present dimension.
    pub scores: DimensionScores,
    pub composite_index: Real,
    /// Score minus the cross-country mean, per present dimension.
    pub gaps: DimensionScores,
}

impl WellbeingRecord {
    pub fn score(&self, dim: Dimension) -> Option<Real> {
        self.scores.get(dim)
    }

    pub fn gap(&self, dim: Dimension) -> Option<Real> {
        self.gaps.get(dim)
    }

    /// (dimension, gap) pairs in canonical dimension order.
    pub fn gap_vector(&self) -> Vec<(Dimension, Real)> {
        self.gaps.iter().collect()
    }
}

/// The transformed table: one record per country, built once and never
/// mutated afterwards. Views derived from it are new tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WellbeingTable {
    dimensions: Vec<Dimension>,
    records: Vec<WellbeingRecord>,
}

impl WellbeingTable {
    /// Build a table, checking key uniqueness, dimension coverage and bounds.
    pub fn new(dimensions: Vec<Dimension>, records: Vec<WellbeingRecord>) -> CoreResult<Self> {
        let mut seen_dims = HashSet::new();
        for d in &dimensions {
            if !seen_dims.insert(*d) {
                return Err(CoreError::DuplicateKey {
                    what: "dimension",
                    value: d.key().to_string(),
                });
            }
        }

        let mut countries = HashSet::new();
        let mut codes = HashSet::new();
        for record in &records {
            if !countries.insert(record.country.as_str()) {
                return Err(CoreError::DuplicateKey {
                    what: "country",
                    value: record.country.clone(),
                });
            }
            if !codes.insert(record.country_code.as_str()) {
                return Err(CoreError::DuplicateKey {
                    what: "country_code",
                    value: record.country_code.clone(),
                });
            }

            for &d in &dimensions {
                let score = record.score(d).ok_or(CoreError::Invariant {
                    what: "record is missing a table dimension score",
                })?;
                check_bounds(record, d.key(), score)?;
                let gap = record.gap(d).ok_or(CoreError::Invariant {
                    what: "record is missing a table dimension gap",
                })?;
                ensure_finite(gap, "gap")?;
            }
            check_bounds(record, "composite_index", record.composite_index)?;
        }

        Ok(Self {
            dimensions,
            records,
        })
    }

    /// Dimensions present in this table, in canonical order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn has_dimension(&self, dim: Dimension) -> bool {
        self.dimensions.contains(&dim)
    }

    pub fn records(&self) -> &[WellbeingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, country: &str) -> Option<&WellbeingRecord> {
        self.records.iter().find(|r| r.country == country)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&WellbeingRecord> {
        self.records.iter().find(|r| r.country_code == code)
    }

    /// Country names sorted alphabetically (dropdown order).
    pub fn country_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.iter().map(|r| r.country.clone()).collect();
        names.sort();
        names
    }

    /// All scores of one dimension in row order; empty if absent.
    pub fn column(&self, dim: Dimension) -> Vec<Real> {
        self.records.iter().filter_map(|r| r.score(dim)).collect()
    }

    pub fn column_mean(&self, dim: Dimension) -> Option<Real> {
        mean(&self.column(dim))
    }

    /// Country with the highest composite index; ties go to the first
    /// such row in table order.
    pub fn top_performer(&self) -> Option<&WellbeingRecord> {
        self.records.iter().fold(None::<&WellbeingRecord>, |best, r| match best {
            Some(b) if b.composite_index >= r.composite_index => Some(b),
            _ => Some(r),
        })
    }

    /// Row-order-preserving subset. Every invariant of `self` holds for the
    /// subset, so no re-validation is needed.
    pub fn retain_view<F>(&self, mut keep: F) -> WellbeingTable
    where
        F: FnMut(&WellbeingRecord) -> bool,
    {
        WellbeingTable {
            dimensions: self.dimensions.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

fn check_bounds(record: &WellbeingRecord, column: &str, value: Real) -> CoreResult<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::OutOfRange {
            country: record.country.clone(),
            column: column.to_string(),
            value,
        })
    }
}
