//! Top and bottom listings by composite index.

use serde::Serialize;
use wb_core::{Dimension, Real, WellbeingRecord, WellbeingTable};

const HIGHLIGHTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    /// 1-based position in the table.
    pub rank: usize,
    pub country: String,
    pub composite_index: Real,
    /// Two largest gaps for the top listing, two smallest for the bottom.
    pub highlights: Vec<(Dimension, Real)>,
}

/// First `n` rows of a table sorted by composite index, with each
/// country's strongest dimensions.
pub fn top_ranking(table: &WellbeingTable, n: usize) -> Vec<RankingEntry> {
    table
        .records()
        .iter()
        .enumerate()
        .take(n)
        .map(|(idx, r)| entry(idx, r, true))
        .collect()
}

/// Last `n` rows in table order, with each country's weakest dimensions.
pub fn bottom_ranking(table: &WellbeingTable, n: usize) -> Vec<RankingEntry> {
    let skip = table.len().saturating_sub(n);
    table
        .records()
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(idx, r)| entry(idx, r, false))
        .collect()
}

fn entry(idx: usize, record: &WellbeingRecord, strongest: bool) -> RankingEntry {
    let mut gaps = record.gap_vector();
    if strongest {
        gaps.sort_by(|a, b| b.1.total_cmp(&a.1));
    } else {
        gaps.sort_by(|a, b| a.1.total_cmp(&b.1));
    }
    gaps.truncate(HIGHLIGHTS);
    RankingEntry {
        rank: idx + 1,
        country: record.country.clone(),
        composite_index: record.composite_index,
        highlights: gaps,
    }
}
