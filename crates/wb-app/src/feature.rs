//! Interactive feature contract and the host-side error boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;
use wb_config::WellbeingConfig;
use wb_core::{Dimension, Real, WellbeingTable};
use wb_explore::{FilterPredicate, apply_filters};

use crate::chart::ChartSpec;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Number(Real),
    Text(String),
    List(Vec<String>),
}

impl ControlValue {
    /// Parse a command-line value: numbers first, then comma lists, else text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<Real>() {
            ControlValue::Number(v)
        } else if raw.contains(',') {
            ControlValue::List(raw.split(',').map(|s| s.trim().to_string()).collect())
        } else {
            ControlValue::Text(raw.to_string())
        }
    }
}

impl From<Real> for ControlValue {
    fn from(v: Real) -> Self {
        ControlValue::Number(v)
    }
}

impl From<&str> for ControlValue {
    fn from(v: &str) -> Self {
        ControlValue::Text(v.to_string())
    }
}

impl From<Dimension> for ControlValue {
    fn from(v: Dimension) -> Self {
        ControlValue::Text(v.key().to_string())
    }
}

/// An input widget: an enumerated option set and a default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSpec {
    pub id: String,
    pub label: String,
    pub options: Vec<ControlValue>,
    pub default: ControlValue,
}

impl ControlSpec {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<ControlValue>,
        default: ControlValue,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            options,
            default,
        }
    }
}

/// Current filter predicates plus control selections keyed by control id.
/// Controls left unset fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureInputs {
    #[serde(default)]
    pub filters: Vec<FilterPredicate>,
    #[serde(default)]
    pub selections: BTreeMap<String, ControlValue>,
}

impl FeatureInputs {
    pub fn with_filter(mut self, predicate: FilterPredicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn select(mut self, id: &str, value: impl Into<ControlValue>) -> Self {
        self.selections.insert(id.to_string(), value.into());
        self
    }

    /// Apply `id=value` as written on the command line.
    pub fn set_from_str(&mut self, assignment: &str) -> AppResult<()> {
        let (id, value) = assignment.split_once('=').ok_or_else(|| {
            AppError::InvalidInput(format!("expected id=value, got {assignment:?}"))
        })?;
        self.selections
            .insert(id.trim().to_string(), ControlValue::parse(value));
        Ok(())
    }

    pub fn text(&self, id: &str, default: &str) -> AppResult<String> {
        match self.selections.get(id) {
            None => Ok(default.to_string()),
            Some(ControlValue::Text(v)) => Ok(v.clone()),
            Some(ControlValue::Number(v)) => Ok(v.to_string()),
            Some(ControlValue::List(_)) => Err(AppError::InvalidInput(format!(
                "control {id} expects a single value"
            ))),
        }
    }

    pub fn number(&self, id: &str, default: Real) -> AppResult<Real> {
        match self.selections.get(id) {
            None => Ok(default),
            Some(ControlValue::Number(v)) => Ok(*v),
            Some(ControlValue::Text(v)) => v.trim().parse().map_err(|_| {
                AppError::InvalidInput(format!("control {id} expects a number, got {v:?}"))
            }),
            Some(ControlValue::List(_)) => Err(AppError::InvalidInput(format!(
                "control {id} expects a number"
            ))),
        }
    }

    pub fn dimension(&self, id: &str, default: Dimension) -> AppResult<Dimension> {
        let key = self.text(id, default.key())?;
        key.parse::<Dimension>()
            .map_err(|e| AppError::InvalidInput(e.to_string()))
    }

    pub fn list(&self, id: &str, default: &[String]) -> Vec<String> {
        match self.selections.get(id) {
            None => default.to_vec(),
            Some(ControlValue::List(items)) => items.clone(),
            Some(ControlValue::Text(v)) => vec![v.clone()],
            Some(ControlValue::Number(v)) => vec![v.to_string()],
        }
    }

    /// The filtered view every feature renders from.
    pub fn view(&self, table: &WellbeingTable) -> AppResult<WellbeingTable> {
        Ok(apply_filters(table, &self.filters)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureOutput {
    pub chart: ChartSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

impl FeatureOutput {
    pub fn chart(chart: ChartSpec) -> Self {
        Self {
            chart,
            narrative: None,
        }
    }

    pub fn with_narrative(chart: ChartSpec, narrative: impl Into<String>) -> Self {
        Self {
            chart,
            narrative: Some(narrative.into()),
        }
    }
}

/// One dashboard view. `update` is a pure function of the table, the
/// configuration and the inputs; the table is never modified.
pub trait Feature: Send + Sync {
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn controls(&self, table: &WellbeingTable, config: &WellbeingConfig) -> Vec<ControlSpec>;

    fn update(
        &self,
        table: &WellbeingTable,
        config: &WellbeingConfig,
        inputs: &FeatureInputs,
    ) -> AppResult<FeatureOutput>;

    /// Inputs with every control at its default and no filters.
    fn default_inputs(&self, table: &WellbeingTable, config: &WellbeingConfig) -> FeatureInputs {
        let selections = self
            .controls(table, config)
            .into_iter()
            .map(|c| (c.id, c.default))
            .collect();
        FeatureInputs {
            filters: Vec::new(),
            selections,
        }
    }
}

/// What the hosting shell displays after an update. `error` is empty on
/// success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedUpdate {
    pub feature: String,
    pub chart: ChartSpec,
    pub narrative: String,
    pub error: String,
}

/// Run a feature update, turning any error into a placeholder chart and
/// inline error text. Never fails.
pub fn render_update(
    feature: &dyn Feature,
    table: &WellbeingTable,
    config: &WellbeingConfig,
    inputs: &FeatureInputs,
) -> RenderedUpdate {
    match feature.update(table, config, inputs) {
        Ok(output) => RenderedUpdate {
            feature: feature.id().to_string(),
            chart: output.chart,
            narrative: output.narrative.unwrap_or_default(),
            error: String::new(),
        },
        Err(err) => {
            error!(feature = feature.id(), error = %err, "feature update failed");
            RenderedUpdate {
                feature: feature.id().to_string(),
                chart: ChartSpec::error_placeholder(),
                narrative: String::new(),
                error: format!("Error updating chart: {err}"),
            }
        }
    }
}
