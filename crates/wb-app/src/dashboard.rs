//! Dashboard assembly from an explicit list of panel entries, and the
//! shared explorer handle the host serves updates from.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use wb_config::WellbeingConfig;
use wb_core::WellbeingTable;

use crate::error::{AppError, AppResult};
use crate::feature::{ControlSpec, Feature, FeatureInputs, RenderedUpdate, render_update};
use crate::features::all_features;

pub const DASHBOARD_TITLE: &str = "OECD Global Wellbeing Explorer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    GlobalOverview,
    CountryDiagnostic,
    PolicySimulator,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::GlobalOverview,
        Section::CountryDiagnostic,
        Section::PolicySimulator,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::GlobalOverview => "🌍 Global Overview",
            Section::CountryDiagnostic => "🧭 Country Diagnostic",
            Section::PolicySimulator => "⚙️ Policy Simulator",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Section::GlobalOverview => {
                "Explore wellbeing across OECD countries through a world map, rankings and a \
                 dimension comparison."
            }
            Section::CountryDiagnostic => {
                "Detailed wellbeing profile of a selected country with its top strengths and \
                 critical weaknesses."
            }
            Section::PolicySimulator => {
                "What-if scenarios: adjust key dimensions and see how life satisfaction could \
                 change relative to top performers."
            }
        }
    }
}

/// A rendered dashboard card. Fallback panels carry `error` and no controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Percent of the row.
    pub width: u8,
    pub controls: Vec<ControlSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<RenderedUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub type PanelConstructor =
    Box<dyn Fn(&WellbeingTable, &WellbeingConfig) -> AppResult<Panel> + Send + Sync>;
pub type FallbackRenderer = fn(name: &str, width: u8, err: &AppError) -> Panel;

pub struct PanelEntry {
    pub name: String,
    pub section: Section,
    pub width: u8,
    pub constructor: PanelConstructor,
    pub fallback: FallbackRenderer,
}

impl PanelEntry {
    /// Panel for a feature, initially rendered with its default inputs.
    pub fn for_feature(feature: Box<dyn Feature>, section: Section, width: u8) -> Self {
        let name = feature.id().to_string();
        let constructor: PanelConstructor =
            Box::new(move |table: &WellbeingTable, config: &WellbeingConfig| {
                feature_panel(feature.as_ref(), width, table, config)
            });
        Self {
            name,
            section,
            width,
            constructor,
            fallback: error_panel,
        }
    }
}

fn feature_panel(
    feature: &dyn Feature,
    width: u8,
    table: &WellbeingTable,
    config: &WellbeingConfig,
) -> AppResult<Panel> {
    let inputs = feature.default_inputs(table, config);
    let output = feature.update(table, config, &inputs)?;
    Ok(Panel {
        id: feature.id().to_string(),
        title: feature.title().to_string(),
        description: feature.description().to_string(),
        width,
        controls: feature.controls(table, config),
        initial: Some(RenderedUpdate {
            feature: feature.id().to_string(),
            chart: output.chart,
            narrative: output.narrative.unwrap_or_default(),
            error: String::new(),
        }),
        error: None,
    })
}

/// Placeholder card shown when a panel cannot be built.
pub fn error_panel(name: &str, width: u8, err: &AppError) -> Panel {
    Panel {
        id: name.to_string(),
        title: format!("Error in \"{name}\""),
        description: String::new(),
        width,
        controls: Vec::new(),
        initial: None,
        error: Some(err.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionLayout {
    pub section: Section,
    pub title: String,
    pub description: String,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardLayout {
    pub title: String,
    pub countries: usize,
    pub sections: Vec<SectionLayout>,
}

impl DashboardLayout {
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.sections.iter().flat_map(|s| s.panels.iter())
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels().find(|p| p.id == id)
    }
}

/// Build every entry, grouped by section in entry order. A failing
/// constructor is replaced by its fallback; assembly itself never fails.
pub fn assemble_dashboard(
    table: &WellbeingTable,
    config: &WellbeingConfig,
    entries: Vec<PanelEntry>,
) -> DashboardLayout {
    let mut sections: Vec<SectionLayout> = Section::ALL
        .iter()
        .map(|&section| SectionLayout {
            section,
            title: section.title().to_string(),
            description: section.description().to_string(),
            panels: Vec::new(),
        })
        .collect();

    for entry in entries {
        let panel = match (entry.constructor)(table, config) {
            Ok(panel) => panel,
            Err(err) => {
                warn!(panel = %entry.name, error = %err, "panel failed to build; using fallback");
                (entry.fallback)(&entry.name, entry.width, &err)
            }
        };
        if let Some(layout) = sections.iter_mut().find(|s| s.section == entry.section) {
            layout.panels.push(panel);
        }
    }
    sections.retain(|s| !s.panels.is_empty());
    debug!(sections = sections.len(), "assembled dashboard");

    DashboardLayout {
        title: DASHBOARD_TITLE.to_string(),
        countries: table.len(),
        sections,
    }
}

/// The standard layout: three sections, two half-width panels and one
/// full-width panel each, except the simulator which has two.
pub fn default_panels() -> Vec<PanelEntry> {
    let mut features = all_features();
    let mut take = |id: &str| {
        let idx = features.iter().position(|f| f.id() == id)?;
        Some(features.remove(idx))
    };
    let plan = [
        ("global_wellbeing_map", Section::GlobalOverview, 50),
        ("composite_index_ranking", Section::GlobalOverview, 50),
        ("wellbeing_dimensions_comparison", Section::GlobalOverview, 100),
        ("country_radar_chart", Section::CountryDiagnostic, 50),
        ("gap_analysis_bar_chart", Section::CountryDiagnostic, 50),
        ("country_diagnostic", Section::CountryDiagnostic, 100),
        ("policy_simulation_scatter", Section::PolicySimulator, 50),
        ("simulation_insight", Section::PolicySimulator, 50),
    ];
    plan.into_iter()
        .filter_map(|(id, section, width)| {
            take(id).map(|f| PanelEntry::for_feature(f, section, width))
        })
        .collect()
}

/// Read-only handle over the loaded table. Clones share the table, so one
/// explorer can serve any number of concurrent sessions.
#[derive(Clone)]
pub struct Explorer {
    table: Arc<WellbeingTable>,
    config: Arc<WellbeingConfig>,
    features: Arc<Vec<Box<dyn Feature>>>,
}

impl Explorer {
    pub fn new(table: WellbeingTable, config: WellbeingConfig) -> Self {
        Self {
            table: Arc::new(table),
            config: Arc::new(config),
            features: Arc::new(all_features()),
        }
    }

    pub fn table(&self) -> &WellbeingTable {
        &self.table
    }

    pub fn config(&self) -> &WellbeingConfig {
        &self.config
    }

    pub fn feature_ids(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.id()).collect()
    }

    fn feature(&self, id: &str) -> AppResult<&dyn Feature> {
        self.features
            .iter()
            .find(|f| f.id() == id)
            .map(|f| f.as_ref())
            .ok_or_else(|| AppError::FeatureNotFound(id.to_string()))
    }

    pub fn controls(&self, id: &str) -> AppResult<Vec<ControlSpec>> {
        Ok(self.feature(id)?.controls(&self.table, &self.config))
    }

    /// One interaction. Only an unknown feature id is an error; feature
    /// failures come back as a placeholder chart with error text.
    pub fn update(&self, id: &str, inputs: &FeatureInputs) -> AppResult<RenderedUpdate> {
        let feature = self.feature(id)?;
        Ok(render_update(feature, &self.table, &self.config, inputs))
    }

    pub fn layout(&self) -> DashboardLayout {
        assemble_dashboard(&self.table, &self.config, default_panels())
    }
}
