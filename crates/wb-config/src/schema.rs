//! Configuration schema definitions.
//!
//! ```yaml
//! version: 1
//! name: OECD Wellbeing
//! measures:
//!   - measure: Homicides
//!     dimension: safety
//!     invert: true
//!     description: Homicide rate per 100k
//! simulation:
//!   correlation_scale: 0.3
//! ```

use serde::{Deserialize, Serialize};
use wb_core::{Dimension, Real};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellbeingConfig {
    pub version: u32,
    pub name: String,
    /// Allow-list of raw measures, one per dimension.
    pub measures: Vec<MeasureDef>,
    #[serde(default)]
    pub transform: TransformSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasureDef {
    /// Exact `Measure` value in the raw extract.
    pub measure: String,
    pub dimension: Dimension,
    /// Lower raw values are better outcomes.
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformSettings {
    /// Countries missing more than this fraction of dimensions are dropped.
    #[serde(default = "default_max_missing_fraction")]
    pub max_missing_fraction: Real,
    /// Rows written to the smoke-test sample extract.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Countries listed in the metadata summary ranking.
    #[serde(default = "default_metadata_top_n")]
    pub metadata_top_n: usize,
    /// Countries listed in the top/bottom ranking report.
    #[serde(default = "default_ranking_size")]
    pub ranking_size: usize,
    /// Minimum country count expected by the validation checks.
    #[serde(default = "default_min_countries")]
    pub min_countries: usize,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            max_missing_fraction: default_max_missing_fraction(),
            sample_size: default_sample_size(),
            metadata_top_n: default_metadata_top_n(),
            ranking_size: default_ranking_size(),
            min_countries: default_min_countries(),
        }
    }
}

fn default_max_missing_fraction() -> Real {
    0.5
}

fn default_sample_size() -> usize {
    15
}

fn default_metadata_top_n() -> usize {
    5
}

fn default_ranking_size() -> usize {
    10
}

fn default_min_countries() -> usize {
    25
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightDef {
    pub dimension: Dimension,
    pub weight: Real,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationSettings {
    /// Linear model for the simulated life-satisfaction proxy.
    #[serde(default = "default_weights")]
    pub life_satisfaction_weights: Vec<WeightDef>,
    /// Scalar applied to `improvement * corr` in the single-dimension projection.
    #[serde(default = "default_correlation_scale")]
    pub correlation_scale: Real,
    /// Dimensions exposed as percentage-boost sliders.
    #[serde(default = "default_boost_dimensions")]
    pub boost_dimensions: Vec<Dimension>,
    #[serde(default = "default_boost_options")]
    pub boost_options: Vec<Real>,
    #[serde(default = "default_improvement_options")]
    pub improvement_options: Vec<Real>,
    #[serde(default = "default_improvement")]
    pub default_improvement: Real,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            life_satisfaction_weights: default_weights(),
            correlation_scale: default_correlation_scale(),
            boost_dimensions: default_boost_dimensions(),
            boost_options: default_boost_options(),
            improvement_options: default_improvement_options(),
            default_improvement: default_improvement(),
        }
    }
}

impl SimulationSettings {
    pub fn weights(&self) -> Vec<(Dimension, Real)> {
        self.life_satisfaction_weights
            .iter()
            .map(|w| (w.dimension, w.weight))
            .collect()
    }
}

fn default_weights() -> Vec<WeightDef> {
    [
        (Dimension::Environment, 0.15),
        (Dimension::Education, 0.15),
        (Dimension::Jobs, 0.20),
        (Dimension::Safety, 0.10),
        (Dimension::Income, 0.10),
        (Dimension::Housing, 0.10),
        (Dimension::Health, 0.10),
        (Dimension::WorkLifeBalance, 0.05),
        (Dimension::SocialConnections, 0.05),
    ]
    .into_iter()
    .map(|(dimension, weight)| WeightDef { dimension, weight })
    .collect()
}

fn default_correlation_scale() -> Real {
    0.3
}

fn default_boost_dimensions() -> Vec<Dimension> {
    vec![Dimension::Environment, Dimension::Education, Dimension::Jobs]
}

fn default_boost_options() -> Vec<Real> {
    vec![0.0, 10.0, 25.0, 40.0, 50.0]
}

fn default_improvement_options() -> Vec<Real> {
    vec![5.0, 10.0, 15.0, 20.0, 25.0]
}

fn default_improvement() -> Real {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSettings {
    #[serde(default = "default_diagnostic_country")]
    pub diagnostic_country: String,
    #[serde(default = "default_insight_country")]
    pub insight_country: String,
    #[serde(default = "default_dimension")]
    pub default_dimension: Dimension,
    /// Countries the simulation insight compares against.
    #[serde(default = "default_benchmark_countries")]
    pub benchmark_countries: Vec<String>,
    /// Initial selection of the dimension comparison view.
    #[serde(default = "default_comparison_countries")]
    pub comparison_countries: Vec<String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            diagnostic_country: default_diagnostic_country(),
            insight_country: default_insight_country(),
            default_dimension: default_dimension(),
            benchmark_countries: default_benchmark_countries(),
            comparison_countries: default_comparison_countries(),
        }
    }
}

fn default_diagnostic_country() -> String {
    "Finland".to_string()
}

fn default_insight_country() -> String {
    "United States".to_string()
}

fn default_dimension() -> Dimension {
    Dimension::Environment
}

fn default_benchmark_countries() -> Vec<String> {
    vec!["Finland".to_string(), "Denmark".to_string()]
}

fn default_comparison_countries() -> Vec<String> {
    vec![
        "Finland".to_string(),
        "United States".to_string(),
        "Japan".to_string(),
    ]
}

impl Default for WellbeingConfig {
    fn default() -> Self {
        let measure = |name: &str, dimension, invert, description: &str| MeasureDef {
            measure: name.to_string(),
            dimension,
            invert,
            description: description.to_string(),
        };

        Self {
            version: LATEST_VERSION,
            name: "OECD Wellbeing".to_string(),
            measures: vec![
                measure(
                    "Life satisfaction",
                    Dimension::LifeSatisfaction,
                    false,
                    "Overall life satisfaction score",
                ),
                measure(
                    "Life expectancy at birth",
                    Dimension::Health,
                    false,
                    "Years of life expectancy",
                ),
                measure(
                    "Households and NPISHs net adjusted disposable income per capita",
                    Dimension::Income,
                    false,
                    "Household income",
                ),
                measure(
                    "Adult literacy skills",
                    Dimension::Education,
                    false,
                    "Adult literacy proficiency",
                ),
                measure("Employment rate", Dimension::Jobs, false, "Employment rate"),
                measure(
                    "Long hours in paid work",
                    Dimension::WorkLifeBalance,
                    true,
                    "Working very long hours",
                ),
                measure("Homicides", Dimension::Safety, true, "Homicide rate per 100k"),
                measure(
                    "Access to green space",
                    Dimension::Environment,
                    false,
                    "Urban green space access",
                ),
                measure(
                    "Social support",
                    Dimension::SocialConnections,
                    false,
                    "Having social support",
                ),
                measure(
                    "Housing affordability",
                    Dimension::Housing,
                    true,
                    "Housing cost burden",
                ),
            ],
            transform: TransformSettings::default(),
            simulation: SimulationSettings::default(),
            dashboard: DashboardSettings::default(),
        }
    }
}

impl WellbeingConfig {
    pub fn measure_named(&self, measure: &str) -> Option<&MeasureDef> {
        self.measures.iter().find(|m| m.measure == measure)
    }

    pub fn measure_for(&self, dim: Dimension) -> Option<&MeasureDef> {
        self.measures.iter().find(|m| m.dimension == dim)
    }

    pub fn is_inverted(&self, dim: Dimension) -> bool {
        self.measure_for(dim).is_some_and(|m| m.invert)
    }

    /// Inverted dimensions in configuration order.
    pub fn inverted_dimensions(&self) -> Vec<Dimension> {
        self.measures
            .iter()
            .filter(|m| m.invert)
            .map(|m| m.dimension)
            .collect()
    }
}
