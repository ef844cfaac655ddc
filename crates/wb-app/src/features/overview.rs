//! Global overview: map, ranking and side-by-side comparison.

use wb_config::WellbeingConfig;
use wb_core::{Dimension, Real, WellbeingRecord, WellbeingTable};
use wb_explore::ExploreError;

use crate::chart::{ChartSpec, Trace, TraceKind};
use crate::error::{AppError, AppResult};
use crate::feature::{ControlSpec, ControlValue, Feature, FeatureInputs, FeatureOutput};

pub const METRIC_CONTROL: &str = "metric";
pub const COUNT_CONTROL: &str = "count";
pub const COUNTRIES_CONTROL: &str = "countries";

const COMPOSITE: &str = "composite_index";
const RANKING_COUNTS: [usize; 3] = [5, 10, 20];

/// Either the composite index or one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Metric {
    Composite,
    Dimension(Dimension),
}

impl Metric {
    fn parse(key: &str, table: &WellbeingTable) -> AppResult<Self> {
        if key == COMPOSITE {
            return Ok(Metric::Composite);
        }
        let dim: Dimension = key.parse()?;
        if !table.has_dimension(dim) {
            return Err(ExploreError::DimensionAbsent(dim).into());
        }
        Ok(Metric::Dimension(dim))
    }

    fn label(self) -> &'static str {
        match self {
            Metric::Composite => "Composite Wellbeing Index",
            Metric::Dimension(d) => d.label(),
        }
    }

    fn value(self, record: &WellbeingRecord) -> Option<Real> {
        match self {
            Metric::Composite => Some(record.composite_index),
            Metric::Dimension(d) => record.score(d),
        }
    }
}

pub struct GlobalWellbeingMap;

impl Feature for GlobalWellbeingMap {
    fn id(&self) -> &'static str {
        "global_wellbeing_map"
    }

    fn title(&self) -> &'static str {
        "🌍 Global Wellbeing Map"
    }

    fn description(&self) -> &'static str {
        "World map colored by the composite index or a single wellbeing dimension."
    }

    fn controls(&self, table: &WellbeingTable, _config: &WellbeingConfig) -> Vec<ControlSpec> {
        let mut options = vec![ControlValue::from(COMPOSITE)];
        options.extend(table.dimensions().iter().map(|&d| ControlValue::from(d)));
        vec![ControlSpec::new(
            METRIC_CONTROL,
            "Color Countries By:",
            options,
            COMPOSITE.into(),
        )]
    }

    fn update(
        &self,
        table: &WellbeingTable,
        _config: &WellbeingConfig,
        inputs: &FeatureInputs,
    ) -> AppResult<FeatureOutput> {
        let view = inputs.view(table)?;
        if view.is_empty() {
            return Ok(FeatureOutput::chart(ChartSpec::no_data()));
        }
        let metric = Metric::parse(&inputs.text(METRIC_CONTROL, COMPOSITE)?, &view)?;

        let mut trace = Trace::new(metric.label(), TraceKind::Choropleth);
        for record in view.records() {
            if let Some(v) = metric.value(record) {
                trace.point(record.country_code.as_str(), v);
                trace.text.push(record.country.clone());
            }
        }
        let mut chart = ChartSpec::new("", metric.label()).with_trace(trace);
        chart.title = format!("{} by Country", metric.label());
        Ok(FeatureOutput::chart(chart))
    }
}

/// Horizontal bars of the composite index, highest first.
pub struct CompositeIndexRanking;

impl Feature for CompositeIndexRanking {
    fn id(&self) -> &'static str {
        "composite_index_ranking"
    }

    fn title(&self) -> &'static str {
        "🏆 Composite Index Ranking"
    }

    fn description(&self) -> &'static str {
        "Countries ranked by the unweighted mean of their wellbeing dimensions."
    }

    fn controls(&self, table: &WellbeingTable, _config: &WellbeingConfig) -> Vec<ControlSpec> {
        let all = table.len() as Real;
        let mut options: Vec<ControlValue> = RANKING_COUNTS
            .iter()
            .filter(|&&n| n < table.len())
            .map(|&n| ControlValue::Number(n as Real))
            .collect();
        options.push(ControlValue::Number(all));
        vec![ControlSpec::new(
            COUNT_CONTROL,
            "Countries Shown:",
            options,
            ControlValue::Number(all),
        )]
    }

    fn update(
        &self,
        table: &WellbeingTable,
        _config: &WellbeingConfig,
        inputs: &FeatureInputs,
    ) -> AppResult<FeatureOutput> {
        let view = inputs.view(table)?;
        if view.is_empty() {
            return Ok(FeatureOutput::chart(ChartSpec::no_data()));
        }
        let count = inputs.number(COUNT_CONTROL, view.len() as Real)?;
        if !count.is_finite() || count < 1.0 {
            return Err(AppError::InvalidInput(format!(
                "count must be at least 1, got {count}"
            )));
        }

        let mut trace = Trace::new("Composite Index", TraceKind::Bar { horizontal: true });
        for record in view.records().iter().take(count as usize) {
            trace.point(record.composite_index, record.country.as_str());
            trace.text.push(format!("{:.1}", record.composite_index));
        }
        let mut chart =
            ChartSpec::new("Composite Wellbeing Index (0-100)", "Country").with_trace(trace);
        chart.title = "Composite Wellbeing Index Ranking".to_string();
        Ok(FeatureOutput::chart(chart))
    }
}

/// Grouped bars of every dimension for a handful of countries.
pub struct WellbeingDimensionsComparison;

impl Feature for WellbeingDimensionsComparison {
    fn id(&self) -> &'static str {
        "wellbeing_dimensions_comparison"
    }

    fn title(&self) -> &'static str {
        "📊 Wellbeing Dimensions Comparison"
    }

    fn description(&self) -> &'static str {
        "Side-by-side dimension scores for the selected countries."
    }

    fn controls(&self, table: &WellbeingTable, config: &WellbeingConfig) -> Vec<ControlSpec> {
        let names = table.country_names();
        let options = names
            .iter()
            .map(|n| ControlValue::from(n.as_str()))
            .collect();
        let default = config
            .dashboard
            .comparison_countries
            .iter()
            .filter(|c| table.find(c).is_some())
            .cloned()
            .collect();
        vec![ControlSpec::new(
            COUNTRIES_CONTROL,
            "Countries to Compare:",
            options,
            ControlValue::List(default),
        )]
    }

    fn update(
        &self,
        table: &WellbeingTable,
        config: &WellbeingConfig,
        inputs: &FeatureInputs,
    ) -> AppResult<FeatureOutput> {
        let view = inputs.view(table)?;
        if view.is_empty() {
            return Ok(FeatureOutput::chart(ChartSpec::no_data()));
        }
        let selected = inputs.list(COUNTRIES_CONTROL, &config.dashboard.comparison_countries);

        let mut chart = ChartSpec::new("Wellbeing Dimensions", "Score (0-100)");
        chart.title = "Wellbeing Dimensions by Country".to_string();
        let grouped = TraceKind::Bar { horizontal: false };
        for record in selected.iter().filter_map(|c| view.find(c)) {
            let mut trace = Trace::new(record.country.as_str(), grouped.clone());
            for (dim, value) in record.scores.iter() {
                trace.point(dim.label(), value);
            }
            chart.traces.push(trace);
        }
        if chart.traces.is_empty() {
            return Ok(FeatureOutput::chart(ChartSpec::no_data()));
        }
        Ok(FeatureOutput::chart(chart))
    }
}
