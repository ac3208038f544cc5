//! The dashboard pipeline shared by the web server and the CLI.
//!
//! One Selection Snapshot in, every dashboard output back:
//! date-range label -> forecast options -> seven charts -> statistics -> insights
//!
//! Front-ends only decide how to present the [`DashboardView`].

use serde::Serialize;
use tracing::debug;

use crate::builders::{self, TextBlock};
use crate::chart::ChartSpec;
use crate::config::Settings;
use crate::domain::{Dataset, Selection, SelectionQuery};
use crate::error::AppError;
use crate::io::ingest::{load_inflation, load_rates};

/// Load both input tables and derive the option lists.
pub fn load_dataset(settings: &Settings) -> Result<Dataset, AppError> {
    let (rates, _report) = load_rates(&settings.rates_path)?;
    let inflation = load_inflation(&settings.inflation_path)?;
    Ok(Dataset::new(rates, inflation))
}

/// Options for the forecast target dropdown, kept in step with the currency
/// selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastOptions {
    pub options: Vec<String>,
    pub value: Option<String>,
}

impl ForecastOptions {
    pub fn for_selection(selection: &Selection) -> Self {
        Self {
            options: selection.currencies.clone(),
            value: selection.forecast.clone(),
        }
    }

    /// Options for a raw currency list, as sent by the multi-select.
    pub fn for_currencies(dataset: &Dataset, currencies: &[String]) -> Self {
        let query = SelectionQuery {
            currencies: currencies.to_vec(),
            ..Default::default()
        };
        let selection = if currencies.is_empty() {
            Selection {
                currencies: Vec::new(),
                forecast: None,
                ..Selection::default_for(dataset)
            }
        } else {
            Selection::resolve(&query, dataset)
        };
        Self::for_selection(&selection)
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub date_range_label: String,
    pub forecast_options: ForecastOptions,
    pub trend: ChartSpec,
    pub histogram: ChartSpec,
    pub correlation: ChartSpec,
    pub box_plot: ChartSpec,
    pub monthly_change: ChartSpec,
    pub inflation: ChartSpec,
    pub forecast: ChartSpec,
    pub statistics: TextBlock,
    pub insights: Vec<TextBlock>,
}

impl DashboardView {
    /// The seven chart regions in page order, with their element ids.
    pub fn charts(&self) -> [(&'static str, &ChartSpec); 7] {
        [
            ("line-chart", &self.trend),
            ("histogram-chart", &self.histogram),
            ("bubble-chart", &self.correlation),
            ("box-plot", &self.box_plot),
            ("area-chart", &self.monthly_change),
            ("inflation-line-chart", &self.inflation),
            ("forecast-chart", &self.forecast),
        ]
    }
}

/// `Selected period: <start> to <end>` for the resolved range.
pub fn date_range_label(dataset: &Dataset, selection: &Selection) -> String {
    let dates = dataset.window(selection).dates();
    match (dates.first(), dates.last()) {
        (Some(start), Some(end)) => format!(
            "Selected period: {} to {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ),
        _ => "Selected period: none".to_string(),
    }
}

/// Recompute every dashboard output. Pure: the same inputs give the same view.
pub fn build_dashboard(dataset: &Dataset, selection: &Selection) -> DashboardView {
    debug!(
        currencies = selection.currencies.len(),
        start = selection.range.start,
        end = selection.range.end,
        "building dashboard"
    );
    let window = dataset.window(selection);

    DashboardView {
        selection: selection.clone(),
        date_range_label: date_range_label(dataset, selection),
        forecast_options: ForecastOptions::for_selection(selection),
        trend: builders::trend::build(&window, selection),
        histogram: builders::distribution::build_histogram(&window, selection),
        correlation: builders::correlation::build(&window, selection),
        box_plot: builders::distribution::build_box_plot(&window, selection),
        monthly_change: builders::monthly::build(&window, selection),
        inflation: builders::inflation::build(&dataset.inflation, selection),
        forecast: builders::forecast::build(&window, selection),
        statistics: builders::summary::statistics(&window, selection),
        insights: builders::summary::insights(&window, selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{select, wide_dataset};

    #[test]
    fn identical_selection_gives_identical_json() {
        let ds = wide_dataset(60, 7);
        let sel = select(&ds, &["C03", "C01", "C05"]);
        let a = serde_json::to_string(&build_dashboard(&ds, &sel)).unwrap();
        let b = serde_json::to_string(&build_dashboard(&ds, &sel)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_selection_renders_placeholders_everywhere_but_inflation() {
        let ds = wide_dataset(30, 3);
        let sel = select(&ds, &[]);
        let view = build_dashboard(&ds, &sel);
        for (id, chart) in view.charts() {
            if id != "inflation-line-chart" {
                assert!(chart.is_placeholder(), "{id} should be a placeholder");
            }
        }
        assert!(view.forecast_options.options.is_empty());
    }

    #[test]
    fn label_reflects_window() {
        let ds = wide_dataset(30, 3);
        let mut sel = select(&ds, &["C00"]);
        sel.range = crate::domain::IndexRange { start: 1, end: 3 };
        assert_eq!(date_range_label(&ds, &sel), "Selected period: 2020-01-02 to 2020-01-04");
    }

    #[test]
    fn forecast_options_follow_currency_list() {
        let ds = wide_dataset(30, 3);
        let opts = ForecastOptions::for_currencies(&ds, &["C02".into(), "C00".into()]);
        assert_eq!(opts.options, vec!["C02", "C00"]);
        assert_eq!(opts.value.as_deref(), Some("C02"));
        let none = ForecastOptions::for_currencies(&ds, &[]);
        assert!(none.options.is_empty());
        assert_eq!(none.value, None);
    }
}
