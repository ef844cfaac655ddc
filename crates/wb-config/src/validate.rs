//! Configuration validation logic.

use crate::schema::{LATEST_VERSION, WellbeingConfig};
use std::collections::HashSet;
use wb_core::{Dimension, Real};

const WEIGHT_SUM_TOLERANCE: Real = 1e-9;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate {context}: {id}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &WellbeingConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.measures.is_empty() {
        return Err(invalid("measures", "[]", "at least one measure is required"));
    }

    let mut names = HashSet::new();
    let mut dims = HashSet::new();
    for m in &config.measures {
        if m.measure.trim().is_empty() {
            return Err(invalid("measures.measure", "\"\"", "measure name is empty"));
        }
        if !names.insert(m.measure.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: m.measure.clone(),
                context: "measure".to_string(),
            });
        }
        if !dims.insert(m.dimension) {
            return Err(ValidationError::DuplicateId {
                id: m.dimension.key().to_string(),
                context: "measure dimension".to_string(),
            });
        }
    }

    let t = &config.transform;
    if !(0.0..=1.0).contains(&t.max_missing_fraction) {
        return Err(invalid(
            "transform.max_missing_fraction",
            t.max_missing_fraction,
            "must be within [0, 1]",
        ));
    }

    validate_simulation(config)?;
    Ok(())
}

fn validate_simulation(config: &WellbeingConfig) -> Result<(), ValidationError> {
    let sim = &config.simulation;

    let mut seen = HashSet::new();
    let mut total = 0.0;
    for w in &sim.life_satisfaction_weights {
        if w.dimension == Dimension::LifeSatisfaction {
            return Err(invalid(
                "simulation.life_satisfaction_weights",
                w.dimension.key(),
                "life satisfaction cannot predict itself",
            ));
        }
        if !seen.insert(w.dimension) {
            return Err(ValidationError::DuplicateId {
                id: w.dimension.key().to_string(),
                context: "simulation weight".to_string(),
            });
        }
        if !w.weight.is_finite() || w.weight < 0.0 {
            return Err(invalid(
                "simulation.life_satisfaction_weights",
                w.weight,
                "weights must be finite and non-negative",
            ));
        }
        total += w.weight;
    }
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(invalid(
            "simulation.life_satisfaction_weights",
            total,
            "weights must sum to 1.0",
        ));
    }

    if !sim.correlation_scale.is_finite() {
        return Err(invalid(
            "simulation.correlation_scale",
            sim.correlation_scale,
            "must be finite",
        ));
    }

    if let Some(bad) = sim
        .boost_options
        .iter()
        .chain(&sim.improvement_options)
        .find(|v| !v.is_finite() || **v < 0.0)
    {
        return Err(invalid(
            "simulation slider options",
            bad,
            "options must be finite and non-negative",
        ));
    }

    if sim.boost_dimensions.contains(&Dimension::LifeSatisfaction) {
        return Err(invalid(
            "simulation.boost_dimensions",
            Dimension::LifeSatisfaction.key(),
            "life satisfaction is the simulated outcome, not a policy lever",
        ));
    }

    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::WeightDef;

    #[test]
    fn default_config_is_valid() {
        let config = WellbeingConfig::default();
        validate_config(&config).unwrap();
        assert_eq!(config.measures.len(), 10);
        assert_eq!(
            config.inverted_dimensions(),
            vec![
                Dimension::WorkLifeBalance,
                Dimension::Safety,
                Dimension::Housing
            ]
        );
    }

    #[test]
    fn duplicate_dimension_rejected() {
        let mut config = WellbeingConfig::default();
        config.measures[1].dimension = Dimension::LifeSatisfaction;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateId { .. }));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut config = WellbeingConfig::default();
        config.simulation.life_satisfaction_weights[0].weight = 0.5;
        let err = validate_config(&config).unwrap_err();
        assert!(format!("{err}").contains("sum to 1.0"));
    }

    #[test]
    fn life_satisfaction_weight_rejected() {
        let mut config = WellbeingConfig::default();
        config.simulation.life_satisfaction_weights.push(WeightDef {
            dimension: Dimension::LifeSatisfaction,
            weight: 0.0,
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn future_version_rejected() {
        let config = WellbeingConfig {
            version: LATEST_VERSION + 1,
            ..WellbeingConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }
}
