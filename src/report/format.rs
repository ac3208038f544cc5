//! Plain-text rendering of a dashboard evaluation for the terminal.

use crate::app::pipeline::DashboardView;
use crate::builders::TextBlock;
use crate::builders::forecast::{ForecastOutcome, NO_TARGET_MESSAGE};
use crate::domain::Dataset;

/// Format the dataset summary and the resolved selection.
pub fn format_run_summary(dataset: &Dataset, view: &DashboardView) -> String {
    let mut out = String::new();

    out.push_str("=== fxdash - Exchange Rate Dashboard ===\n");
    let rates = &dataset.rates;
    match (rates.dates.first(), rates.dates.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Rates: n={} rows | {} to {} | {} currencies\n",
            rates.len(),
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d"),
            rates.currencies.len()
        )),
        _ => out.push_str("Rates: no rows\n"),
    }
    out.push_str(&format!(
        "Inflation: {} observations | {} series\n",
        dataset.inflation.observations.len(),
        dataset.inflation.series_names.len()
    ));

    let selection = &view.selection;
    out.push_str("\nSelection:\n");
    out.push_str(&format!("- currencies: {}\n", fmt_list(&selection.currencies)));
    out.push_str(&format!(
        "- rows: [{}, {}] ({})\n",
        selection.range.start, selection.range.end, view.date_range_label
    ));
    out.push_str(&format!(
        "- inflation series: {}\n",
        selection.inflation_series.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!("- forecast: {}\n", selection.forecast.as_deref().unwrap_or("-")));

    out.push_str("\nCharts:\n");
    for (id, chart) in view.charts() {
        let state = if chart.is_placeholder() {
            chart
                .annotations
                .first()
                .map(|a| format!("placeholder: {}", a.text))
                .unwrap_or_else(|| "placeholder".to_string())
        } else {
            format!("{} series", chart.series.len())
        };
        out.push_str(&format!("  {:<22} {} ({state})\n", id, truncate(&chart.title, 60)));
    }
    out.push('\n');

    out
}

/// Format a titled block as a heading with bulleted lines.
pub fn format_text_block(block: &TextBlock) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", block.title));
    out.push_str(&format!("{:-<width$}\n", "", width = block.title.chars().count()));
    for line in &block.lines {
        out.push_str(&format!("- {line}\n"));
    }
    out
}

/// Format the forecast fit and its projection table.
pub fn format_forecast_summary(outcome: &ForecastOutcome) -> String {
    let forecast = match outcome {
        ForecastOutcome::NoTarget => return format!("Forecast: {NO_TARGET_MESSAGE}\n"),
        ForecastOutcome::Insufficient { currency, points } => {
            return format!("Forecast: insufficient data for {currency} ({points} points)\n");
        }
        ForecastOutcome::Failed { currency, error } => {
            return format!("Forecast: cannot calculate forecast for {currency}: {error}\n");
        }
        ForecastOutcome::Ready(forecast) => forecast,
    };

    let mut out = String::new();
    let fit = &forecast.fit;
    out.push_str(&format!("Forecast for {} (n={}):\n", forecast.currency, fit.n));
    out.push_str(&format!(
        "- slope={:.6}/day intercept={:.6} std_err={:.6} band=±{:.6}\n",
        fit.slope, fit.intercept, fit.std_err, forecast.band_half_width
    ));

    out.push_str(format!("{:<12} {:>12} {:>12} {:>12}\n", "date", "forecast", "lower", "upper").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<12} {:-<12} {:-<12}\n", "", "", "", "").trim_end());
    out.push('\n');
    for (date, value) in forecast.future_dates.iter().zip(&forecast.projection) {
        out.push_str(&format!(
            "{:<12} {:>12.4} {:>12.4} {:>12.4}\n",
            date.format("%Y-%m-%d"),
            value,
            value - forecast.band_half_width,
            value + forecast.band_half_width
        ));
    }

    out
}

fn fmt_list(v: &[String]) -> String {
    if v.is_empty() {
        return "-".to_string();
    }
    v.join(", ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
