//! Scenario simulation.
//!
//! Two independent models are exposed and intentionally left distinct:
//!
//! - [`simulate_boosts`] applies percentage boosts to a record, caps boosted
//!   scores at 100 and recomputes a weighted life-satisfaction proxy.
//! - [`project_improvement`] adds flat points to one dimension and projects
//!   life satisfaction through the cross-country correlation. Neither the
//!   dimension nor the projected life satisfaction is capped.

use serde::Serialize;
use tracing::warn;
use wb_core::{Dimension, DimensionScores, Real, WellbeingRecord, WellbeingTable, pearson};

use crate::{ExploreError, ExploreResult};

pub const SCORE_CAP: Real = 100.0;

/// Percentage-boost outcome for one country. The stored record is untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoostSimulation {
    pub country: String,
    /// Scores after boosting; unboosted dimensions keep their base value.
    pub scores: DimensionScores,
    /// Weighted proxy over the simulated scores.
    pub proxy: Real,
    /// The proxy when any boost is positive, otherwise the base value.
    pub life_satisfaction: Option<Real>,
    pub boosted: bool,
}

impl BoostSimulation {
    pub fn score(&self, dim: Dimension) -> Option<Real> {
        self.scores.get(dim)
    }
}

/// Weighted sum of the scores named in `weights`. Dimensions the record
/// lacks are left out and the remaining weights renormalized.
pub fn life_satisfaction_proxy(scores: &DimensionScores, weights: &[(Dimension, Real)]) -> Real {
    let (sum, total_weight) = weights
        .iter()
        .filter_map(|&(d, w)| scores.get(d).map(|v| (v * w, w)))
        .fold((0.0, 0.0), |(s, tw), (vw, w)| (s + vw, tw + w));
    if total_weight > 0.0 {
        // Nothing missing: plain weighted sum.
        if (total_weight - 1.0).abs() < 1e-12 {
            sum
        } else {
            sum / total_weight
        }
    } else {
        0.0
    }
}

/// `simulated[d] = min(100, base[d] * (1 + boost/100))` for each boost.
pub fn simulate_boosts(
    record: &WellbeingRecord,
    boosts: &[(Dimension, Real)],
    weights: &[(Dimension, Real)],
) -> ExploreResult<BoostSimulation> {
    let mut scores = record.scores;
    let mut boosted = false;

    for &(dim, percent) in boosts {
        if !percent.is_finite() || percent < 0.0 {
            return Err(ExploreError::InvalidInput(format!(
                "boost for {dim} must be a non-negative percentage, got {percent}"
            )));
        }
        let Some(base) = record.score(dim) else {
            if percent > 0.0 {
                return Err(ExploreError::DimensionAbsent(dim));
            }
            continue;
        };
        scores.set(dim, (base * (1.0 + percent / 100.0)).min(SCORE_CAP));
        boosted |= percent > 0.0;
    }

    let proxy = life_satisfaction_proxy(&scores, weights);
    let life_satisfaction = if boosted {
        Some(proxy)
    } else {
        record.score(Dimension::LifeSatisfaction)
    };

    Ok(BoostSimulation {
        country: record.country.clone(),
        scores,
        proxy,
        life_satisfaction,
        boosted,
    })
}

/// Flat-point improvement of one dimension for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovementProjection {
    pub country: String,
    pub dimension: Dimension,
    pub improvement: Real,
    pub current_value: Real,
    /// `current_value + improvement`, not capped at 100.
    pub simulated_value: Real,
    pub current_life_satisfaction: Real,
    /// Pearson correlation of life satisfaction with `dimension` over the view.
    pub correlation: Real,
    pub life_satisfaction_increase: Real,
    /// Not capped at 100.
    pub simulated_life_satisfaction: Real,
}

pub fn project_improvement(
    view: &WellbeingTable,
    country: &str,
    dimension: Dimension,
    improvement: Real,
    correlation_scale: Real,
) -> ExploreResult<ImprovementProjection> {
    if dimension == Dimension::LifeSatisfaction {
        return Err(ExploreError::InvalidInput(
            "life satisfaction is the projected outcome, pick another dimension".to_string(),
        ));
    }
    if !improvement.is_finite() {
        return Err(ExploreError::InvalidInput(format!(
            "improvement must be finite, got {improvement}"
        )));
    }
    for dim in [Dimension::LifeSatisfaction, dimension] {
        if !view.has_dimension(dim) {
            return Err(ExploreError::DimensionAbsent(dim));
        }
    }
    let record = view
        .find(country)
        .ok_or_else(|| ExploreError::CountryNotFound(country.to_string()))?;

    // Both columns are complete because the table requires every record to
    // carry every table dimension.
    let life = view.column(Dimension::LifeSatisfaction);
    let target = view.column(dimension);
    let correlation = pearson(&life, &target).unwrap_or_else(|| {
        warn!(
            dimension = %dimension,
            rows = view.len(),
            "correlation undefined over this view; projecting no change"
        );
        0.0
    });

    let current_value = record.score(dimension).ok_or(ExploreError::DimensionAbsent(dimension))?;
    let current_life_satisfaction = record
        .score(Dimension::LifeSatisfaction)
        .ok_or(ExploreError::DimensionAbsent(Dimension::LifeSatisfaction))?;
    let life_satisfaction_increase = improvement * correlation * correlation_scale;

    Ok(ImprovementProjection {
        country: record.country.clone(),
        dimension,
        improvement,
        current_value,
        simulated_value: current_value + improvement,
        current_life_satisfaction,
        correlation,
        life_satisfaction_increase,
        simulated_life_satisfaction: current_life_satisfaction + life_satisfaction_increase,
    })
}
