//! Chart Specification: a data-only description of one renderable chart.
//!
//! Specs are built by the pure builders and consumed by a [`ChartRenderer`]
//! (see `chart::echarts`). They hold only ordered vectors, so serializing
//! the same spec twice yields identical bytes.
//!
//! [`ChartRenderer`]: crate::chart::ChartRenderer

use chrono::NaiveDate;
use serde::Serialize;

use crate::math::BoxStats;

/// Colorblind-friendly categorical palette, reused cyclically.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22",
    "#17becf",
];

/// Palette entry for the `i`-th series.
pub fn palette_color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// Color used for warnings and placeholder text.
pub fn warning_color() -> &'static str {
    PALETTE[3]
}

/// `rgba(...)` form of a `#rrggbb` palette entry.
pub fn with_alpha(hex: &str, alpha: f64) -> String {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| hex.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok()).unwrap_or(0);
    format!("rgba({}, {}, {}, {alpha})", channel(0), channel(2), channel(4))
}

/// A value on the x-axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Date(NaiveDate),
    Label(String),
    Number(f64),
}

impl XValue {
    pub fn as_label(&self) -> String {
        match self {
            XValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            XValue::Label(s) => s.clone(),
            XValue::Number(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: XValue,
    pub y: f64,
}

impl Point {
    pub fn new(x: XValue, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandPoint {
    pub x: XValue,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    /// Inclusive lower edge.
    pub start: f64,
    pub count: usize,
}

/// How the x-axis should be scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Time,
    Value,
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: String,
    pub kind: AxisKind,
    /// Fixed display window; data outside it is still part of the series.
    pub range: Option<(f64, f64)>,
}

impl AxisSpec {
    pub fn new(title: impl Into<String>, kind: AxisKind) -> Self {
        Self {
            title: title.into(),
            kind,
            range: None,
        }
    }

    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.range = Some((lo, hi));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SeriesData {
    Line { points: Vec<Point>, dash: Dash },
    /// Line filled down to zero.
    Area { points: Vec<Point> },
    /// Overlapping (not stacked) histogram.
    Histogram { bin_width: f64, opacity: f64, bins: Vec<Bin> },
    Scatter { points: Vec<(f64, f64)> },
    Box { stats: BoxStats },
    /// Shaded interval between two curves.
    Band { points: Vec<BandPoint>, fill: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    pub name: String,
    pub color: String,
    pub show_in_legend: bool,
    pub data: SeriesData,
}

impl SeriesSpec {
    pub fn new(name: impl Into<String>, color: impl Into<String>, data: SeriesData) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            show_in_legend: true,
            data,
        }
    }

    pub fn hidden_from_legend(mut self) -> Self {
        self.show_in_legend = false;
        self
    }

    pub fn is_band(&self) -> bool {
        matches!(self.data, SeriesData::Band { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    TopRight,
    Center,
}

/// Free text drawn over the chart area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub color: String,
    pub placement: Placement,
}

impl Annotation {
    pub fn warning(text: impl Into<String>, placement: Placement) -> Self {
        Self {
            text: text.into(),
            color: warning_color().to_string(),
            placement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub legend_title: Option<String>,
    pub series: Vec<SeriesSpec>,
    pub annotations: Vec<Annotation>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, x_axis: AxisSpec, y_axis: AxisSpec) -> Self {
        Self {
            title: title.into(),
            x_axis,
            y_axis,
            legend_title: None,
            series: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// A chart with no data and one centred instructional message.
    pub fn placeholder(title: impl Into<String>, message: impl Into<String>) -> Self {
        let mut spec = Self::new(title, AxisSpec::new("", AxisKind::Value), AxisSpec::new("", AxisKind::Value));
        spec.annotations.push(Annotation::warning(message, Placement::Center));
        spec
    }

    pub fn is_placeholder(&self) -> bool {
        self.series.is_empty() && self.annotations.iter().any(|a| a.placement == Placement::Center)
    }

    pub fn with_legend_title(mut self, title: impl Into<String>) -> Self {
        self.legend_title = Some(title.into());
        self
    }

    pub fn push_series(&mut self, series: SeriesSpec) {
        self.series.push(series);
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(0), "#1f77b4");
        assert_eq!(palette_color(10), palette_color(0));
        assert_eq!(palette_color(13), "#d62728");
    }

    #[test]
    fn alpha_conversion() {
        assert_eq!(with_alpha("#ff7f0e", 0.3), "rgba(255, 127, 14, 0.3)");
    }

    #[test]
    fn placeholder_has_no_series() {
        let spec = ChartSpec::placeholder("Forecast", "Select a currency");
        assert!(spec.is_placeholder());
        assert_eq!(spec.annotations[0].text, "Select a currency");
    }

    #[test]
    fn serialization_is_stable() {
        let mut spec = ChartSpec::new(
            "t",
            AxisSpec::new("Date", AxisKind::Time),
            AxisSpec::new("Rate", AxisKind::Value),
        );
        spec.push_series(SeriesSpec::new(
            "AUD",
            palette_color(0),
            SeriesData::Line {
                points: vec![Point::new(XValue::Date(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()), 1.5)],
                dash: Dash::Solid,
            },
        ));
        let a = serde_json::to_string(&spec).unwrap();
        let b = serde_json::to_string(&spec.clone()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("\"x\":\"2020-01-02\""));
        assert!(a.contains("\"type\":\"line\""));
    }
}
