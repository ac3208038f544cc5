//! Month-over-month percentage change of monthly mean rates.

use crate::builders::{SELECT_CURRENCY_MESSAGE, selected_series};
use crate::chart::{
    AxisKind, AxisSpec, BandPoint, ChartSpec, Point, SeriesData, SeriesSpec, XValue, palette_color, with_alpha,
};
use crate::domain::{RateWindow, Selection};
use crate::math::{mean, monthly_means, sample_std};

/// Up to this many currencies get their own area series.
pub const MAX_INDIVIDUAL_SERIES: usize = 5;

const TITLE_INDIVIDUAL: &str = "Monthly Percentage Change";
const TITLE_AVERAGE: &str = "Average Monthly Change";
const TOO_SHORT_MESSAGE: &str = "Select a date range spanning at least two months";

/// Monthly change table: month labels plus one column of percent changes per currency.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyChanges {
    pub months: Vec<String>,
    pub columns: Vec<(String, Vec<f64>)>,
}

/// Percent change between consecutive monthly means; the first month has no
/// predecessor and is dropped, and so is any month with a non-finite change.
pub fn monthly_changes(window: &RateWindow<'_>, currencies: &[String]) -> MonthlyChanges {
    let series = selected_series(window, currencies);
    let dates = window.dates();

    let per_currency: Vec<(String, Vec<(String, f64)>)> = series
        .iter()
        .map(|(code, values)| (code.to_string(), monthly_means(dates, values)))
        .collect();
    let Some((_, first)) = per_currency.first() else {
        return MonthlyChanges {
            months: Vec::new(),
            columns: Vec::new(),
        };
    };

    // All currencies share the window's dates, hence the same month keys.
    let mut keep: Vec<usize> = Vec::new();
    for i in 1..first.len() {
        let finite = per_currency.iter().all(|(_, means)| change(means, i).is_finite());
        if finite {
            keep.push(i);
        }
    }

    MonthlyChanges {
        months: keep.iter().map(|&i| first[i].0.clone()).collect(),
        columns: per_currency
            .iter()
            .map(|(code, means)| (code.clone(), keep.iter().map(|&i| change(means, i)).collect()))
            .collect(),
    }
}

fn change(means: &[(String, f64)], i: usize) -> f64 {
    (means[i].1 / means[i - 1].1 - 1.0) * 100.0
}

pub fn build(window: &RateWindow<'_>, selection: &Selection) -> ChartSpec {
    let title = if selection.currencies.len() <= MAX_INDIVIDUAL_SERIES {
        TITLE_INDIVIDUAL
    } else {
        TITLE_AVERAGE
    };
    if selection.currencies.is_empty() {
        return ChartSpec::placeholder(title, SELECT_CURRENCY_MESSAGE);
    }

    let changes = monthly_changes(window, &selection.currencies);
    if changes.months.is_empty() {
        return ChartSpec::placeholder(title, TOO_SHORT_MESSAGE);
    }

    let mut spec = ChartSpec::new(
        title,
        AxisSpec::new("Month", AxisKind::Category),
        AxisSpec::new("Change (%)", AxisKind::Value),
    );
    let month_points = |values: &[f64]| -> Vec<Point> {
        changes
            .months
            .iter()
            .zip(values)
            .map(|(m, v)| Point::new(XValue::Label(m.clone()), *v))
            .collect()
    };

    if changes.columns.len() <= MAX_INDIVIDUAL_SERIES {
        for (i, (code, values)) in changes.columns.iter().enumerate() {
            spec.push_series(SeriesSpec::new(
                code.as_str(),
                palette_color(i),
                SeriesData::Area {
                    points: month_points(values),
                },
            ));
        }
        return spec;
    }

    // Cross-sectional mean and spread across currencies for each month.
    let mut averages = Vec::with_capacity(changes.months.len());
    let mut band = Vec::with_capacity(changes.months.len());
    for (row, month) in changes.months.iter().enumerate() {
        let cross: Vec<f64> = changes.columns.iter().map(|(_, values)| values[row]).collect();
        let avg = mean(&cross);
        let sd = sample_std(&cross);
        averages.push(avg);
        band.push(BandPoint {
            x: XValue::Label(month.clone()),
            lower: avg - sd,
            upper: avg + sd,
        });
    }

    spec.push_series(SeriesSpec::new(
        "Average Change",
        palette_color(0),
        SeriesData::Area {
            points: month_points(&averages),
        },
    ));
    spec.push_series(
        SeriesSpec::new(
            "Cross-currency spread (±1 SD)",
            palette_color(1),
            SeriesData::Band {
                points: band,
                fill: with_alpha(palette_color(1), 0.3),
            },
        )
        .hidden_from_legend(),
    );
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{dataset, select, wide_dataset};

    #[test]
    fn drops_first_month_and_scales_to_percent() {
        // 2020-01-01 .. 2020-03-01: January at 1.0, February at 1.1, March 1st at 1.21.
        let mut values = vec![1.0; 31];
        values.extend(vec![1.1; 29]);
        values.push(1.21);
        let ds = dataset(vec![("AUD", values)]);
        let sel = select(&ds, &["AUD"]);
        let changes = monthly_changes(&ds.window(&sel), &sel.currencies);

        assert_eq!(changes.months, vec!["2020-02", "2020-03"]);
        let aud = &changes.columns[0].1;
        assert!((aud[0] - 10.0).abs() < 1e-9);
        assert!((aud[1] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn five_currencies_get_individual_areas() {
        let ds = wide_dataset(70, 5);
        let codes = ds.rates.codes();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let sel = select(&ds, &refs);
        let spec = build(&ds.window(&sel), &sel);
        assert_eq!(spec.title, "Monthly Percentage Change");
        assert_eq!(spec.series.len(), 5);
        assert!(spec.series.iter().all(|s| !s.is_band()));
    }

    #[test]
    fn six_currencies_collapse_to_mean_and_band() {
        let ds = wide_dataset(70, 6);
        let codes = ds.rates.codes();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let sel = select(&ds, &refs);
        let spec = build(&ds.window(&sel), &sel);

        assert_eq!(spec.title, "Average Monthly Change");
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].name, "Average Change");
        assert!(spec.series[1].is_band());
        assert!(!spec.series[1].show_in_legend);
        let SeriesData::Band { points, .. } = &spec.series[1].data else {
            panic!("expected band");
        };
        assert!(points.iter().all(|p| p.lower <= p.upper));
    }

    #[test]
    fn single_month_window_is_placeholder() {
        let ds = wide_dataset(10, 2);
        let sel = select(&ds, &["C00"]);
        assert!(build(&ds.window(&sel), &sel).is_placeholder());
    }
}
