//! The dashboard's interactive features.

mod diagnostic;
mod overview;
mod policy;

pub use diagnostic::{CountryDiagnostic, CountryRadarChart, GapAnalysisBarChart};
pub use overview::{CompositeIndexRanking, GlobalWellbeingMap, WellbeingDimensionsComparison};
pub use policy::{PolicySimulationScatter, SimulationInsight};

use wb_core::{Dimension, WellbeingRecord, WellbeingTable};

use crate::chart::ChartSpec;
use crate::error::AppResult;
use crate::feature::{ControlSpec, ControlValue, Feature, FeatureInputs};

pub const COUNTRY_CONTROL: &str = "country";
pub const DIMENSION_CONTROL: &str = "dimension";

/// Every feature, in dashboard order.
pub fn all_features() -> Vec<Box<dyn Feature>> {
    vec![
        Box::new(GlobalWellbeingMap),
        Box::new(CompositeIndexRanking),
        Box::new(WellbeingDimensionsComparison),
        Box::new(CountryRadarChart),
        Box::new(GapAnalysisBarChart),
        Box::new(CountryDiagnostic),
        Box::new(PolicySimulationScatter),
        Box::new(SimulationInsight),
    ]
}

pub fn find_feature(id: &str) -> Option<Box<dyn Feature>> {
    all_features().into_iter().find(|f| f.id() == id)
}

/// Country selector over the table's countries, sorted by name.
fn country_control(table: &WellbeingTable, default: &str) -> ControlSpec {
    let names = table.country_names();
    let options = names.iter().map(|n| ControlValue::from(n.as_str())).collect();
    ControlSpec::new(COUNTRY_CONTROL, "Select Country:", options, default.into())
}

/// Dimensions that can be compared against life satisfaction.
fn comparable_dimensions(table: &WellbeingTable) -> Vec<Dimension> {
    table
        .dimensions()
        .iter()
        .copied()
        .filter(|&d| d != Dimension::LifeSatisfaction)
        .collect()
}

fn dimension_control(table: &WellbeingTable, label: &str, default: Dimension) -> ControlSpec {
    let options = comparable_dimensions(table)
        .into_iter()
        .map(ControlValue::from)
        .collect();
    ControlSpec::new(DIMENSION_CONTROL, label, options, default.into())
}

/// The selected country in the filtered view, or the no-data output to
/// show instead.
pub(crate) enum Selection<'a> {
    Found(&'a WellbeingRecord),
    Missing { chart: ChartSpec, text: String },
}

pub(crate) fn select_country<'a>(
    view: &'a WellbeingTable,
    inputs: &FeatureInputs,
    default: &str,
) -> AppResult<Selection<'a>> {
    if view.is_empty() {
        return Ok(Selection::Missing {
            chart: ChartSpec::no_data(),
            text: "No data available for analysis.".to_string(),
        });
    }
    let country = inputs.text(COUNTRY_CONTROL, default)?;
    Ok(match view.find(&country) {
        Some(record) => Selection::Found(record),
        None => Selection::Missing {
            chart: ChartSpec::no_data_for(&country),
            text: format!("No data available for {country}."),
        },
    })
}
