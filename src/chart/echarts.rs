//! ECharts adapter: turns a [`ChartSpec`] into an ECharts option via `charming`.
//!
//! The page loads the ECharts runtime and calls `setOption` with the JSON
//! produced here, so only the option model is built server-side. Box plots
//! read their five-number rows from the chart's `dataset`.

use charming::component::{Axis, Legend, Title};
use charming::datatype::{DataPoint, Dataset};
use charming::element::{
    AreaStyle, AxisType, Color, ItemStyle, LineStyle, LineStyleType, Symbol, Tooltip, Trigger,
};
use charming::series::{Bar, Boxplot, Line, Scatter};
use charming::{Chart, df};
use serde_json::{Value, json};
use tracing::warn;

use crate::chart::spec::{AxisKind, AxisSpec, BandPoint, Dash, Point, SeriesData, SeriesSpec, with_alpha};
use crate::math::BoxStats;
use crate::chart::{ChartRenderer, ChartSpec};

const TRANSPARENT: &str = "rgba(255, 255, 255, 0)";
/// Bar gap that draws every bar series on the same slot.
const OVERLAY_GAP: &str = "-100%";

/// Renders chart specs as ECharts option JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchartsRenderer;

impl ChartRenderer for EchartsRenderer {
    fn render(&self, spec: &ChartSpec) -> String {
        let chart = build_chart(spec);
        // `charming` has no bar-gap setter, so overlaid histograms are
        // finished on the serialized option.
        match serde_json::to_value(&chart) {
            Ok(mut option) => {
                overlay_bars(&mut option);
                option.to_string()
            }
            Err(err) => {
                warn!(title = %spec.title, %err, "falling back to unpatched chart option");
                chart.to_string()
            }
        }
    }
}

fn overlay_bars(option: &mut Value) {
    let Some(series) = option.get_mut("series").and_then(Value::as_array_mut) else {
        return;
    };
    for entry in series.iter_mut().filter_map(Value::as_object_mut) {
        if entry.get("type").and_then(Value::as_str) == Some("bar") {
            entry.insert("barGap".to_string(), json!(OVERLAY_GAP));
        }
    }
}

/// Build the `charming` chart for a spec.
pub fn build_chart(spec: &ChartSpec) -> Chart {
    let mut chart = build_base_chart(spec);
    chart = add_legend(chart, &spec.series);
    chart = add_axes(chart, spec);
    let mut boxes: Vec<(Vec<Vec<f64>>, Color)> = Vec::new();
    for (i, series) in spec.series.iter().enumerate() {
        chart = match &series.data {
            SeriesData::Box { stats } => {
                let slot = boxes.len() as u64;
                boxes.push((box_rows(i, stats), with_alpha(&series.color, 0.5).into()));
                chart.series(Boxplot::new().name(series.name.as_str()).dataset_index(slot))
            }
            _ => add_series(chart, series, i, spec.x_axis.range),
        };
    }
    if boxes.is_empty() {
        return chart;
    }

    let (sources, colors): (Vec<_>, Vec<_>) = boxes.into_iter().unzip();
    let dataset = sources.into_iter().fold(Dataset::new(), |d, rows| d.source(rows));
    chart.dataset(dataset).color(colors)
}

/// Dataset rows for one box: earlier category slots stay empty so the box
/// lands under its own label.
fn box_rows(slot: usize, stats: &BoxStats) -> Vec<Vec<f64>> {
    let mut rows: Vec<Vec<f64>> = vec![Vec::new(); slot];
    rows.push(vec![
        stats.lower_whisker,
        stats.q1,
        stats.median,
        stats.q3,
        stats.upper_whisker,
    ]);
    rows
}

fn build_base_chart(spec: &ChartSpec) -> Chart {
    let mut title = Title::new().text(spec.title.as_str());
    if !spec.annotations.is_empty() {
        let notes: Vec<&str> = spec.annotations.iter().map(|a| a.text.as_str()).collect();
        title = title.subtext(notes.join(" | "));
    }

    let trigger = if spec.series.iter().any(|s| matches!(s.data, SeriesData::Scatter { .. })) {
        Trigger::Item
    } else {
        Trigger::Axis
    };

    Chart::new().title(title).tooltip(Tooltip::new().trigger(trigger))
}

fn add_legend(chart: Chart, series: &[SeriesSpec]) -> Chart {
    let legend: Vec<String> = series
        .iter()
        .filter(|s| s.show_in_legend)
        .map(|s| s.name.clone())
        .collect();
    if legend.is_empty() {
        return chart;
    }
    chart.legend(Legend::new().inactive_color("#777").data(legend))
}

fn add_axes(chart: Chart, spec: &ChartSpec) -> Chart {
    let mut x_axis = axis(&spec.x_axis);
    // Box plots name their category slots after the series; other category
    // charts take their labels from the data rows.
    let boxes = spec.series.iter().any(|s| matches!(s.data, SeriesData::Box { .. }));
    if spec.x_axis.kind == AxisKind::Category && boxes {
        let labels: Vec<String> = spec.series.iter().map(|s| s.name.clone()).collect();
        x_axis = x_axis.data(labels);
    }
    chart.x_axis(x_axis).y_axis(axis(&spec.y_axis).scale(true))
}

fn axis(spec: &AxisSpec) -> Axis {
    let type_ = match spec.kind {
        AxisKind::Time => AxisType::Time,
        AxisKind::Value => AxisType::Value,
        AxisKind::Category => AxisType::Category,
    };
    let axis = Axis::new().type_(type_).name(spec.title.as_str());
    match spec.range {
        Some((lo, hi)) => axis.min(lo).max(hi),
        None => axis,
    }
}

fn add_series(chart: Chart, series: &SeriesSpec, index: usize, window: Option<(f64, f64)>) -> Chart {
    let name = series.name.as_str();
    let color = series.color.as_str();
    match &series.data {
        SeriesData::Line { points, dash } => {
            let style = match dash {
                Dash::Solid => LineStyleType::Solid,
                Dash::Dashed => LineStyleType::Dashed,
            };
            chart.series(
                Line::new()
                    .name(name)
                    .symbol(Symbol::None)
                    .line_style(LineStyle::new().type_(style).color(color))
                    .item_style(ItemStyle::new().color(color))
                    .data(xy_rows(points)),
            )
        }
        SeriesData::Area { points } => chart.series(
            Line::new()
                .name(name)
                .symbol(Symbol::None)
                .line_style(LineStyle::new().color(color))
                .item_style(ItemStyle::new().color(color))
                .area_style(AreaStyle::new().color(with_alpha(color, 0.4)))
                .data(xy_rows(points)),
        ),
        SeriesData::Histogram {
            bin_width,
            opacity,
            bins,
        } => {
            let (lo, hi) = window.unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
            let rows: Vec<DataPoint> = bins
                .iter()
                .filter(|b| b.start >= lo && b.start + bin_width <= hi + 1e-9)
                .flat_map(|b| df![[b.start + bin_width / 2.0, b.count as f64]])
                .collect();
            chart.series(
                Bar::new()
                    .name(name)
                    .item_style(ItemStyle::new().color(with_alpha(color, *opacity)))
                    .data(rows),
            )
        }
        SeriesData::Scatter { points } => {
            let rows: Vec<DataPoint> = points.iter().flat_map(|(x, y)| df![[*x, *y]]).collect();
            chart.series(
                Scatter::new()
                    .name(name)
                    .item_style(ItemStyle::new().color(color))
                    .data(rows),
            )
        }
        // Box series carry no inline data; `build_chart` wires them to the dataset.
        SeriesData::Box { .. } => chart,
        SeriesData::Band { points, fill } => add_band(chart, name, fill, index, points),
    }
}

/// Two stacked lines: an invisible lower edge plus a filled width on top.
fn add_band(chart: Chart, name: &str, fill: &str, index: usize, points: &[BandPoint]) -> Chart {
    let stack = format!("band-{index}");
    let lower: Vec<DataPoint> = points
        .iter()
        .flat_map(|p| df![[p.x.as_label(), p.lower]])
        .collect();
    let width: Vec<DataPoint> = points
        .iter()
        .flat_map(|p| df![[p.x.as_label(), p.upper - p.lower]])
        .collect();

    chart
        .series(
            Line::new()
                .name(format!("{name} (lower)"))
                .stack(stack.as_str())
                .symbol(Symbol::None)
                .line_style(LineStyle::new().color(TRANSPARENT))
                .data(lower),
        )
        .series(
            Line::new()
                .name(name)
                .stack(stack.as_str())
                .symbol(Symbol::None)
                .line_style(LineStyle::new().color(TRANSPARENT))
                .area_style(AreaStyle::new().color(fill))
                .data(width),
        )
}

fn xy_rows(points: &[Point]) -> Vec<DataPoint> {
    points.iter().flat_map(|p| df![[p.x.as_label(), p.y]]).collect()
}
