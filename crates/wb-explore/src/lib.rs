//! wb-explore: per-interaction computations over the shared table.
//!
//! Every function here is a pure function of a borrowed [`WellbeingTable`]
//! and user inputs; nothing mutates the table.
//!
//! [`WellbeingTable`]: wb_core::WellbeingTable

pub mod filter;
pub mod narrative;
pub mod ranking;
pub mod simulate;

pub use filter::{FilterColumn, FilterOp, FilterPredicate, FilterValue, apply_filters};
pub use narrative::{
    BenchmarkPoint, GapAnalysis, analyze_gaps, diagnostic_narrative, insight_narrative,
};
pub use ranking::{RankingEntry, bottom_ranking, top_ranking};
pub use simulate::{
    BoostSimulation, ImprovementProjection, life_satisfaction_proxy, project_improvement,
    simulate_boosts,
};

use wb_core::Dimension;

pub type ExploreResult<T> = Result<T, ExploreError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExploreError {
    #[error("Country not found: {0}")]
    CountryNotFound(String),

    #[error("Dimension not present in table: {0}")]
    DimensionAbsent(Dimension),

    #[error("Invalid filter {input:?}: {reason}")]
    InvalidFilter { input: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
