//! Policy simulator: percentage boosts across the view and a single-country
//! flat-point projection.

use wb_config::WellbeingConfig;
use wb_core::{Dimension, Real, WellbeingTable};
use wb_explore::{ExploreError, insight_narrative, project_improvement, simulate_boosts};

use super::{DIMENSION_CONTROL, Selection, country_control, dimension_control, select_country};
use crate::chart::{Annotation, ChartSpec, Trace, TraceKind};
use crate::error::AppResult;
use crate::feature::{ControlSpec, ControlValue, Feature, FeatureInputs, FeatureOutput};
use crate::service::benchmark_points;

pub const IMPROVEMENT_CONTROL: &str = "improvement";

/// Smallest movement, in points, that gets an arrow.
const ARROW_THRESHOLD: Real = 0.1;
const INSIGHT_CHART_HEIGHT: u32 = 500;

/// Control id of the boost slider for `dim`.
pub fn boost_control_id(dim: Dimension) -> String {
    format!("{}_boost", dim.key())
}

fn require(view: &WellbeingTable, dims: &[Dimension]) -> AppResult<()> {
    for &dim in dims {
        if !view.has_dimension(dim) {
            return Err(ExploreError::DimensionAbsent(dim).into());
        }
    }
    Ok(())
}

fn marker(trace: &mut Trace, color: Option<&str>, size: Real, symbol: Option<&str>) {
    trace.marker.size = Some(size);
    trace.marker.colors = color.map(|c| vec![c.to_string()]).unwrap_or_default();
    trace.marker.symbol = symbol.map(str::to_string);
}

/// Every country before and after the boost sliders are applied.
pub struct PolicySimulationScatter;

impl Feature for PolicySimulationScatter {
    fn id(&self) -> &'static str {
        "policy_simulation_scatter"
    }

    fn title(&self) -> &'static str {
        "📈 Policy Simulation Impact"
    }

    fn description(&self) -> &'static str {
        "Interactive scatter plot showing how improving the weakest dimensions affects life \
         satisfaction. Includes sliders for simulation."
    }

    fn controls(&self, table: &WellbeingTable, config: &WellbeingConfig) -> Vec<ControlSpec> {
        let mut controls = vec![dimension_control(
            table,
            "Dimension to Compare:",
            config.dashboard.default_dimension,
        )];
        let options: Vec<ControlValue> = config
            .simulation
            .boost_options
            .iter()
            .map(|&v| ControlValue::Number(v))
            .collect();
        for &dim in &config.simulation.boost_dimensions {
            controls.push(ControlSpec::new(
                boost_control_id(dim),
                format!("{} Policy (+%):", dim.label()),
                options.clone(),
                ControlValue::Number(0.0),
            ));
        }
        controls
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
        let dim = inputs.dimension(DIMENSION_CONTROL, config.dashboard.default_dimension)?;
        require(&view, &[dim, Dimension::LifeSatisfaction])?;

        let mut boosts = Vec::with_capacity(config.simulation.boost_dimensions.len());
        for &d in &config.simulation.boost_dimensions {
            boosts.push((d, inputs.number(&boost_control_id(d), 0.0)?));
        }
        let any_boost = boosts.iter().any(|&(_, b)| b > 0.0);
        let weights = config.simulation.weights();

        let mut current = Trace::new("Current Position", TraceKind::Scatter);
        marker(&mut current, None, 8.0, None);
        current.marker.opacity = Some(0.7);
        let mut simulated = Trace::new("Simulated Position", TraceKind::Scatter);
        marker(&mut simulated, None, 8.0, Some("diamond"));
        simulated.marker.opacity = Some(0.7);
        let mut arrows = Vec::new();

        for record in view.records() {
            let life = record.score(Dimension::LifeSatisfaction);
            let (Some(x0), Some(y0)) = (record.score(dim), life) else {
                continue;
            };
            current.point(x0, y0);
            current.text.push(record.country.clone());
            if !any_boost {
                continue;
            }

            let sim = simulate_boosts(record, &boosts, &weights)?;
            let x1 = sim.score(dim).unwrap_or(x0);
            let y1 = sim.proxy;
            simulated.point(x1, y1);
            simulated.text.push(record.country.clone());
            if (x1 - x0).abs() > ARROW_THRESHOLD || (y1 - y0).abs() > ARROW_THRESHOLD {
                arrows.push(Annotation::arrow((x0, y0), (x1, y1), "gray"));
            }
        }

        let mut chart = ChartSpec::new(dim.axis_title(), "Life Satisfaction").with_trace(current);
        if any_boost {
            chart.traces.push(simulated);
            chart.annotations = arrows;
        }
        Ok(FeatureOutput::chart(chart))
    }
}

/// One country's flat-point projection against the rest of the view.
pub struct SimulationInsight;

impl Feature for SimulationInsight {
    fn id(&self) -> &'static str {
        "simulation_insight"
    }

    fn title(&self) -> &'static str {
        "🤖 Simulation Insight"
    }

    fn description(&self) -> &'static str {
        "Projected life satisfaction after improving one dimension, compared with top performers."
    }

    fn controls(&self, table: &WellbeingTable, config: &WellbeingConfig) -> Vec<ControlSpec> {
        let sim = &config.simulation;
        vec![
            country_control(table, &config.dashboard.insight_country),
            dimension_control(
                table,
                "Dimension to Improve:",
                config.dashboard.default_dimension,
            ),
            ControlSpec::new(
                IMPROVEMENT_CONTROL,
                "Improvement (points):",
                sim.improvement_options
                    .iter()
                    .map(|&v| ControlValue::Number(v))
                    .collect(),
                ControlValue::Number(sim.default_improvement),
            ),
        ]
    }

    fn update(
        &self,
        table: &WellbeingTable,
        config: &WellbeingConfig,
        inputs: &FeatureInputs,
    ) -> AppResult<FeatureOutput> {
        let view = inputs.view(table)?;
        let record = match select_country(&view, inputs, &config.dashboard.insight_country)? {
            Selection::Found(record) => record,
            Selection::Missing { chart, text } => {
                return Ok(FeatureOutput::with_narrative(chart, text));
            }
        };
        let dim = inputs.dimension(DIMENSION_CONTROL, config.dashboard.default_dimension)?;
        let improvement =
            inputs.number(IMPROVEMENT_CONTROL, config.simulation.default_improvement)?;
        let projection = project_improvement(
            &view,
            &record.country,
            dim,
            improvement,
            config.simulation.correlation_scale,
        )?;

        let mut others = Trace::new("Other Countries", TraceKind::Scatter);
        marker(&mut others, Some("lightgray"), 8.0, None);
        others.marker.opacity = Some(0.6);
        for r in view.records() {
            if let (Some(x), Some(y)) = (r.score(dim), r.score(Dimension::LifeSatisfaction)) {
                others.point(x, y);
                others.text.push(r.country.clone());
            }
        }
        let benchmarks = benchmark_points(&view, &config.dashboard.benchmark_countries, dim);

        let country = &projection.country;
        let current_xy = (projection.current_value, projection.current_life_satisfaction);
        let simulated_xy = (projection.simulated_value, projection.simulated_life_satisfaction);

        let mut current = Trace::new(format!("{country} (Current)"), TraceKind::Scatter);
        marker(&mut current, Some("red"), 15.0, None);
        current.point(current_xy.0, current_xy.1);
        current.text.push(country.clone());

        let mut simulated = Trace::new(format!("{country} (Simulated)"), TraceKind::Scatter);
        marker(&mut simulated, Some("blue"), 15.0, Some("diamond"));
        simulated.point(simulated_xy.0, simulated_xy.1);
        simulated.text.push(country.clone());

        let mut chart = ChartSpec::new(dim.axis_title(), "Life Satisfaction").with_trace(others);
        if !benchmarks.is_empty() {
            let mut top = Trace::new("Top Performers", TraceKind::Scatter);
            marker(&mut top, Some("green"), 12.0, Some("star"));
            for b in &benchmarks {
                top.point(b.value, b.life_satisfaction);
                top.text.push(b.country.clone());
            }
            chart.traces.push(top);
        }
        chart.traces.push(current);
        chart.traces.push(simulated);
        chart
            .annotations
            .push(Annotation::arrow(current_xy, simulated_xy, "blue"));
        chart.height = Some(INSIGHT_CHART_HEIGHT);

        let narrative = insight_narrative(
            &projection,
            &config.dashboard.benchmark_countries,
            &benchmarks,
        );
        Ok(FeatureOutput::with_narrative(chart, narrative))
    }
}
