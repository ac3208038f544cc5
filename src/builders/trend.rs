//! Exchange rate trend lines.

use crate::builders::{SELECT_CURRENCY_MESSAGE, date_points, selected_series};
use crate::chart::{Annotation, AxisKind, AxisSpec, ChartSpec, Dash, Placement, SeriesData, SeriesSpec, palette_color};
use crate::domain::{RateWindow, Selection};

/// Lines drawn at most; later selections are left out.
pub const MAX_TREND_LINES: usize = 10;

const TITLE: &str = "Exchange Rate Trends Over Time";

pub fn build(window: &RateWindow<'_>, selection: &Selection) -> ChartSpec {
    let series = selected_series(window, &selection.currencies);
    if series.is_empty() {
        return ChartSpec::placeholder(TITLE, SELECT_CURRENCY_MESSAGE);
    }

    let total = series.len();
    let mut spec = ChartSpec::new(
        format!("Exchange Rates for {total} Selected Currencies"),
        AxisSpec::new("Date", AxisKind::Time),
        AxisSpec::new("Exchange Rate Value", AxisKind::Value),
    )
    .with_legend_title("Currencies");

    for (i, (code, values)) in series.iter().take(MAX_TREND_LINES).enumerate() {
        spec.push_series(SeriesSpec::new(
            *code,
            palette_color(i),
            SeriesData::Line {
                points: date_points(window.dates(), values),
                dash: Dash::Solid,
            },
        ));
    }

    if total > MAX_TREND_LINES {
        let omitted = total - MAX_TREND_LINES;
        spec.annotate(Annotation::warning(
            format!("Showing first {MAX_TREND_LINES} out of {total} selected currencies ({omitted} omitted)"),
            Placement::TopRight,
        ));
    }

    spec
}
