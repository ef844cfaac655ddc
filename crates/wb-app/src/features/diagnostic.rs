//! Country diagnostic: radar profile, gap bars and the written diagnostic.

use wb_config::WellbeingConfig;
use wb_core::{WellbeingRecord, WellbeingTable};
use wb_explore::diagnostic_narrative;

use super::{Selection, country_control, select_country};
use crate::chart::{Axis, ChartSpec, ReferenceLine, Trace, TraceKind};
use crate::error::AppResult;
use crate::feature::{ControlSpec, Feature, FeatureInputs, FeatureOutput};

pub const POSITIVE_GAP_COLOR: &str = "#2E8B57";
pub const NEGATIVE_GAP_COLOR: &str = "#DC143C";

const GAP_CHART_HEIGHT: u32 = 500;

/// Horizontal gap bars colored by sign with a dashed zero line.
pub fn gap_chart(record: &WellbeingRecord) -> ChartSpec {
    let mut trace = Trace::new("Performance Gap", TraceKind::Bar { horizontal: true });
    for (dim, gap) in record.gap_vector() {
        trace.point(gap, dim.label());
        trace.text.push(format!("{gap:+.1}"));
        let color = if gap >= 0.0 {
            POSITIVE_GAP_COLOR
        } else {
            NEGATIVE_GAP_COLOR
        };
        trace.marker.colors.push(color.to_string());
    }

    let mut chart = ChartSpec::new(
        "Performance Gap (points above/below OECD average)",
        "Wellbeing Dimensions",
    )
    .with_trace(trace);
    chart.reference_lines.push(ReferenceLine {
        axis: Axis::X,
        value: 0.0,
        dashed: true,
        color: "gray".to_string(),
    });
    chart.height = Some(GAP_CHART_HEIGHT);
    chart
}

pub struct CountryRadarChart;

impl Feature for CountryRadarChart {
    fn id(&self) -> &'static str {
        "country_radar_chart"
    }

    fn title(&self) -> &'static str {
        "🕸️ Country Wellbeing Profile"
    }

    fn description(&self) -> &'static str {
        "Radar chart of one country's dimension scores against the average of the current view."
    }

    fn controls(&self, table: &WellbeingTable, config: &WellbeingConfig) -> Vec<ControlSpec> {
        vec![country_control(
            table,
            &config.dashboard.diagnostic_country,
        )]
    }

    fn update(
        &self,
        table: &WellbeingTable,
        config: &WellbeingConfig,
        inputs: &FeatureInputs,
    ) -> AppResult<FeatureOutput> {
        let view = inputs.view(table)?;
        let record = match select_country(&view, inputs, &config.dashboard.diagnostic_country)? {
            Selection::Found(record) => record,
            Selection::Missing { chart, .. } => return Ok(FeatureOutput::chart(chart)),
        };

        let mut country = Trace::new(record.country.as_str(), TraceKind::Polar);
        let mut average = Trace::new("OECD Average", TraceKind::Polar);
        for &dim in view.dimensions() {
            if let (Some(value), Some(mean)) = (record.score(dim), view.column_mean(dim)) {
                country.point(dim.label(), value);
                average.point(dim.label(), mean);
            }
        }
        let mut chart = ChartSpec::default().with_trace(country).with_trace(average);
        chart.title = format!("{} Wellbeing Profile", record.country);
        Ok(FeatureOutput::chart(chart))
    }
}

pub struct GapAnalysisBarChart;

impl Feature for GapAnalysisBarChart {
    fn id(&self) -> &'static str {
        "gap_analysis_bar_chart"
    }

    fn title(&self) -> &'static str {
        "📉 Gap Analysis"
    }

    fn description(&self) -> &'static str {
        "Points above or below the OECD average for each dimension of the selected country."
    }

    fn controls(&self, table: &WellbeingTable, config: &WellbeingConfig) -> Vec<ControlSpec> {
        vec![country_control(
            table,
            &config.dashboard.diagnostic_country,
        )]
    }

    fn update(
        &self,
        table: &WellbeingTable,
        config: &WellbeingConfig,
        inputs: &FeatureInputs,
    ) -> AppResult<FeatureOutput> {
        let view = inputs.view(table)?;
        match select_country(&view, inputs, &config.dashboard.diagnostic_country)? {
            Selection::Found(record) => Ok(FeatureOutput::chart(gap_chart(record))),
            Selection::Missing { chart, .. } => Ok(FeatureOutput::chart(chart)),
        }
    }
}

/// Gap bars plus the strengths/weaknesses diagnostic text.
pub struct CountryDiagnostic;

impl Feature for CountryDiagnostic {
    fn id(&self) -> &'static str {
        "country_diagnostic"
    }

    fn title(&self) -> &'static str {
        "💡 Country Wellbeing Diagnostic"
    }

    fn description(&self) -> &'static str {
        "Strengths, weaknesses and a policy recommendation derived from the country's gaps."
    }

    fn controls(&self, table: &WellbeingTable, config: &WellbeingConfig) -> Vec<ControlSpec> {
        vec![country_control(
            table,
            &config.dashboard.diagnostic_country,
        )]
    }

    fn update(
        &self,
        table: &WellbeingTable,
        config: &WellbeingConfig,
        inputs: &FeatureInputs,
    ) -> AppResult<FeatureOutput> {
        let view = inputs.view(table)?;
        let record = match select_country(&view, inputs, &config.dashboard.diagnostic_country)? {
            Selection::Found(record) => record,
            Selection::Missing { chart, text } => {
                return Ok(FeatureOutput::with_narrative(chart, text));
            }
        };
        let top = view
            .top_performer()
            .map(|r| r.country.as_str())
            .unwrap_or(record.country.as_str());
        let narrative = diagnostic_narrative(&record.country, &record.gap_vector(), top);
        Ok(FeatureOutput::with_narrative(gap_chart(record), narrative))
    }
}
