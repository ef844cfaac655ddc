//! Renderer-agnostic chart descriptions.
//!
//! A [`ChartSpec`] is plain data: traces, axis titles, annotations and
//! reference lines. The hosting shell decides how to draw it.

use serde::Serialize;
use wb_core::Real;

pub const NO_DATA: &str = "No data available";
pub const UPDATE_FAILED: &str = "An error occurred while updating this chart";

/// Font size used for the centered status annotations.
const STATUS_FONT_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(Real),
    Category(String),
}

impl From<Real> for AxisValue {
    fn from(v: Real) -> Self {
        AxisValue::Number(v)
    }
}

impl From<&str> for AxisValue {
    fn from(v: &str) -> Self {
        AxisValue::Category(v.to_string())
    }
}

impl From<String> for AxisValue {
    fn from(v: String) -> Self {
        AxisValue::Category(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceKind {
    Bar { horizontal: bool },
    Scatter,
    /// `x` holds the angular categories, `y` the radii.
    Polar,
    /// `x` holds ISO-alpha-3 location codes, `y` the values.
    Choropleth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Real>,
    /// One entry for a uniform color, or one per point.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    pub x: Vec<AxisValue>,
    pub y: Vec<AxisValue>,
    /// Per-point labels (hover or bar text).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    pub marker: Marker,
}

impl Trace {
    pub fn new(name: impl Into<String>, kind: TraceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            x: Vec::new(),
            y: Vec::new(),
            text: Vec::new(),
            marker: Marker::default(),
        }
    }

    pub fn point(&mut self, x: impl Into<AxisValue>, y: impl Into<AxisValue>) {
        self.x.push(x.into());
        self.y.push(y.into());
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Text placed on the chart, optionally as an arrow from `tail` to (`x`, `y`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail: Option<(Real, Real)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl Annotation {
    /// Centered message with no arrow.
    pub fn status(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: None,
            y: None,
            tail: None,
            color: None,
            font_size: Some(STATUS_FONT_SIZE),
        }
    }

    pub fn arrow(from: (Real, Real), to: (Real, Real), color: &str) -> Self {
        Self {
            text: String::new(),
            x: Some(to.0),
            y: Some(to.1),
            tail: Some(from),
            color: Some(color.to_string()),
            font_size: None,
        }
    }

    pub fn has_arrow(&self) -> bool {
        self.tail.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub axis: Axis,
    pub value: Real,
    pub dashed: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ChartSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub x_title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub y_title: String,
    pub traces: Vec<Trace>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ChartSpec {
    pub fn new(x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        Self {
            x_title: x_title.into(),
            y_title: y_title.into(),
            ..Self::default()
        }
    }

    /// Empty chart carrying a single centered message.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            annotations: vec![Annotation::status(text)],
            ..Self::default()
        }
    }

    pub fn no_data() -> Self {
        Self::message(NO_DATA)
    }

    pub fn no_data_for(country: &str) -> Self {
        Self::message(format!("{NO_DATA} for {country}"))
    }

    pub fn error_placeholder() -> Self {
        Self::message(UPDATE_FAILED)
    }

    pub fn is_placeholder(&self) -> bool {
        self.traces.is_empty() && self.annotations.len() == 1 && !self.annotations[0].has_arrow()
    }

    pub fn placeholder_text(&self) -> Option<&str> {
        if self.is_placeholder() {
            Some(self.annotations[0].text.as_str())
        } else {
            None
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }

    pub fn arrows(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(|a| a.has_arrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_recognized() {
        assert_eq!(ChartSpec::no_data().placeholder_text(), Some(NO_DATA));
        assert_eq!(
            ChartSpec::no_data_for("Chile").placeholder_text(),
            Some("No data available for Chile")
        );
        assert_eq!(
            ChartSpec::error_placeholder().placeholder_text(),
            Some(UPDATE_FAILED)
        );

        let mut trace = Trace::new("t", TraceKind::Scatter);
        trace.point(1.0, 2.0);
        assert!(!ChartSpec::new("x", "y").with_trace(trace).is_placeholder());
    }

    #[test]
    fn serializes_axis_values_untagged() {
        let mut trace = Trace::new("bars", TraceKind::Bar { horizontal: true });
        trace.point(12.5, "Finland");
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["x"][0], 12.5);
        assert_eq!(json["y"][0], "Finland");
        assert_eq!(json["kind"]["type"], "bar");
        assert_eq!(json["kind"]["horizontal"], true);
    }
}
