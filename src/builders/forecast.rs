//! Linear trend and 30-day projection for the forecast target.
//!
//! The fit regresses the target's values on their integer position in the
//! window, not on calendar time. The shaded band is `±1.96 × std_err` where
//! `std_err` is the slope standard error from the fit: a normal-approximation
//! band, narrower than a true prediction interval, kept as a known
//! simplification.

use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::builders::date_points;
use crate::chart::{
    AxisKind, AxisSpec, BandPoint, ChartSpec, Dash, Point, SeriesData, SeriesSpec, XValue, palette_color, with_alpha,
};
use crate::domain::{RateWindow, Selection};
use crate::math::{FitError, LinearFit, fit_trend_line};

/// Minimum number of valid points for a fit.
pub const MIN_POINTS: usize = 11;
/// Days projected past the last observation.
pub const HORIZON: usize = 30;
/// Normal quantile for the 95% band.
pub const Z_95: f64 = 1.96;

pub const NO_TARGET_MESSAGE: &str = "Please select a currency to view the forecast";
pub const FIT_FAILED_MESSAGE: &str = "Cannot calculate forecast: insufficient data or calculation error";

/// A fitted projection for one currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub currency: String,
    pub fit: LinearFit,
    pub dates: Vec<NaiveDate>,
    pub actual: Vec<f64>,
    pub trend: Vec<f64>,
    pub future_dates: Vec<NaiveDate>,
    pub projection: Vec<f64>,
    /// Half-width of the shaded band.
    pub band_half_width: f64,
}

/// The reachable states of the forecast view.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    NoTarget,
    Insufficient { currency: String, points: usize },
    Failed { currency: String, error: FitError },
    Ready(Forecast),
}

/// Run the forecast state machine for the selection's target.
pub fn evaluate(window: &RateWindow<'_>, selection: &Selection) -> ForecastOutcome {
    let Some(currency) = selection.forecast.as_deref() else {
        return ForecastOutcome::NoTarget;
    };
    let Some(values) = window.series(currency) else {
        return ForecastOutcome::NoTarget;
    };

    let (dates, actual): (Vec<NaiveDate>, Vec<f64>) = window
        .dates()
        .iter()
        .zip(values)
        .filter(|(_, v)| !v.is_nan())
        .map(|(d, v)| (*d, *v))
        .unzip();

    if actual.len() < MIN_POINTS {
        return ForecastOutcome::Insufficient {
            currency: currency.to_string(),
            points: actual.len(),
        };
    }

    match project(currency, dates, actual) {
        Ok(forecast) => ForecastOutcome::Ready(forecast),
        Err(error) => {
            warn!(currency, %error, "forecast fit failed");
            ForecastOutcome::Failed {
                currency: currency.to_string(),
                error,
            }
        }
    }
}

fn project(currency: &str, dates: Vec<NaiveDate>, actual: Vec<f64>) -> Result<Forecast, FitError> {
    let fit = fit_trend_line(&actual)?;
    let n = actual.len();
    let band_half_width = Z_95 * fit.std_err;

    let trend: Vec<f64> = (0..n).map(|i| fit.predict(i as f64)).collect();
    let projection: Vec<f64> = (n..n + HORIZON).map(|i| fit.predict(i as f64)).collect();
    if trend.iter().chain(&projection).any(|v| !v.is_finite()) || !band_half_width.is_finite() {
        return Err(FitError::Degenerate);
    }

    let last = dates.last().copied().ok_or(FitError::TooFewPoints(0))?;
    let future_dates = (1..=HORIZON as i64).map(|d| last + Duration::days(d)).collect();

    Ok(Forecast {
        currency: currency.to_string(),
        fit,
        dates,
        actual,
        trend,
        future_dates,
        projection,
        band_half_width,
    })
}

pub fn build(window: &RateWindow<'_>, selection: &Selection) -> ChartSpec {
    chart_for(&evaluate(window, selection))
}

/// Render an evaluated outcome as a chart.
pub fn chart_for(outcome: &ForecastOutcome) -> ChartSpec {
    let forecast = match outcome {
        ForecastOutcome::NoTarget => return ChartSpec::placeholder(title(None), NO_TARGET_MESSAGE),
        ForecastOutcome::Insufficient { currency, .. } => {
            return ChartSpec::placeholder(
                title(Some(currency)),
                format!("Insufficient data for {currency} to create forecast"),
            );
        }
        ForecastOutcome::Failed { currency, .. } => {
            return ChartSpec::placeholder(title(Some(currency)), FIT_FAILED_MESSAGE);
        }
        ForecastOutcome::Ready(forecast) => forecast,
    };

    let mut spec = ChartSpec::new(
        title(Some(&forecast.currency)),
        AxisSpec::new("Date", AxisKind::Time),
        AxisSpec::new("Exchange Rate", AxisKind::Value),
    );
    spec.push_series(SeriesSpec::new(
        format!("{} (Actual Data)", forecast.currency),
        palette_color(0),
        SeriesData::Line {
            points: date_points(&forecast.dates, &forecast.actual),
            dash: Dash::Solid,
        },
    ));
    spec.push_series(SeriesSpec::new(
        "Trend Line",
        palette_color(2),
        SeriesData::Line {
            points: date_points(&forecast.dates, &forecast.trend),
            dash: Dash::Dashed,
        },
    ));
    spec.push_series(SeriesSpec::new(
        "30-Day Forecast",
        palette_color(1),
        SeriesData::Line {
            points: forecast
                .future_dates
                .iter()
                .zip(&forecast.projection)
                .map(|(d, v)| Point::new(XValue::Date(*d), *v))
                .collect(),
            dash: Dash::Solid,
        },
    ));
    spec.push_series(
        SeriesSpec::new(
            "95% Confidence Interval",
            palette_color(1),
            SeriesData::Band {
                points: forecast
                    .future_dates
                    .iter()
                    .zip(&forecast.projection)
                    .map(|(d, v)| BandPoint {
                        x: XValue::Date(*d),
                        lower: v - forecast.band_half_width,
                        upper: v + forecast.band_half_width,
                    })
                    .collect(),
                fill: with_alpha(palette_color(1), 0.3),
            },
        )
        .hidden_from_legend(),
    );
    spec
}

fn title(currency: Option<&str>) -> String {
    match currency {
        Some(c) => format!("30-Day Trend Analysis and Forecast for {c}"),
        None => "30-Day Trend Analysis and Forecast".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{dataset, select};

    fn linear(n: usize) -> Vec<f64> {
        (0..n).map(|i| 1.0 + 0.01 * i as f64 + if i % 2 == 0 { 0.002 } else { -0.002 }).collect()
    }

    #[test]
    fn ten_points_is_insufficient() {
        let ds = dataset(vec![("AUD", linear(10))]);
        let sel = select(&ds, &["AUD"]);
        let outcome = evaluate(&ds.window(&sel), &sel);
        assert_eq!(
            outcome,
            ForecastOutcome::Insufficient {
                currency: "AUD".into(),
                points: 10
            }
        );
        let spec = chart_for(&outcome);
        assert!(spec.is_placeholder());
        assert_eq!(spec.annotations[0].text, "Insufficient data for AUD to create forecast");
    }

    #[test]
    fn eleven_points_project_thirty_following_days() {
        let ds = dataset(vec![("AUD", linear(11))]);
        let sel = select(&ds, &["AUD"]);
        let ForecastOutcome::Ready(forecast) = evaluate(&ds.window(&sel), &sel) else {
            panic!("expected a forecast");
        };

        let last = NaiveDate::from_ymd_opt(2020, 1, 11).unwrap();
        assert_eq!(forecast.future_dates.len(), HORIZON);
        for (k, d) in forecast.future_dates.iter().enumerate() {
            assert_eq!(*d, last + Duration::days(k as i64 + 1));
        }
        assert!((forecast.projection[0] - forecast.fit.predict(11.0)).abs() < 1e-12);
        assert!((forecast.band_half_width - 1.96 * forecast.fit.std_err).abs() < 1e-12);

        let spec = chart_for(&ForecastOutcome::Ready(forecast));
        let names: Vec<&str> = spec.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["AUD (Actual Data)", "Trend Line", "30-Day Forecast", "95% Confidence Interval"]
        );
        assert!(spec.series[3].is_band());
    }

    #[test]
    fn no_target_is_placeholder() {
        let ds = dataset(vec![("AUD", linear(20))]);
        let mut sel = select(&ds, &["AUD"]);
        sel.forecast = None;
        let spec = build(&ds.window(&sel), &sel);
        assert!(spec.is_placeholder());
        assert_eq!(spec.annotations[0].text, NO_TARGET_MESSAGE);
    }

    #[test]
    fn overflowing_fit_becomes_annotation() {
        let values: Vec<f64> = (0..12).map(|i| if i % 2 == 0 { 1e300 } else { -1e300 }).collect();
        let ds = dataset(vec![("BIG", values)]);
        let sel = select(&ds, &["BIG"]);
        let outcome = evaluate(&ds.window(&sel), &sel);
        assert!(matches!(outcome, ForecastOutcome::Failed { .. }));
        let spec = chart_for(&outcome);
        assert_eq!(spec.annotations[0].text, FIT_FAILED_MESSAGE);
    }
}
