//! Shared application layer for the wellbeing explorer.
//!
//! Serves both the CLI and a dashboard host: configuration and table
//! loading, the offline build, renderer-agnostic chart specs, the
//! interactive features with their error boundary, and dashboard assembly.

pub mod chart;
pub mod dashboard;
pub mod error;
pub mod feature;
pub mod features;
pub mod service;

// Re-export key types for convenience
pub use chart::{Annotation, Axis, AxisValue, ChartSpec, Marker, ReferenceLine, Trace, TraceKind};
pub use dashboard::{
    DashboardLayout, Explorer, Panel, PanelEntry, Section, assemble_dashboard, default_panels,
    error_panel,
};
pub use error::{AppError, AppResult};
pub use feature::{
    ControlSpec, ControlValue, Feature, FeatureInputs, FeatureOutput, RenderedUpdate,
    render_update,
};
pub use features::{all_features, find_feature};
pub use service::{
    Diagnosis, Insight, Rankings, TransformRequest, TransformResponse, diagnose, init_config,
    load_config, load_table, profile_file, rankings, run_transform, simulate_insight,
    simulate_policy, to_json,
};
