//! Inflation trends per country for one series.
//!
//! Independent of the currency selection and the date range.

use crate::chart::{AxisKind, AxisSpec, ChartSpec, Dash, Point, SeriesData, SeriesSpec, XValue, palette_color};
use crate::domain::{InflationTable, Selection};

const TITLE: &str = "Inflation Trends";
const NO_SERIES_MESSAGE: &str = "No inflation data available for the selected series";

pub fn build(inflation: &InflationTable, selection: &Selection) -> ChartSpec {
    let Some(series_name) = selection.inflation_series.as_deref() else {
        return ChartSpec::placeholder(TITLE, NO_SERIES_MESSAGE);
    };

    // Countries in first-appearance order, each with its (year, rate) points.
    let mut countries: Vec<(&str, Vec<Point>)> = Vec::new();
    for obs in inflation.series(series_name) {
        let idx = match countries.iter().position(|(c, _)| *c == obs.country) {
            Some(idx) => idx,
            None => {
                countries.push((obs.country.as_str(), Vec::new()));
                countries.len() - 1
            }
        };
        if let Some(rate) = obs.inflation_rate {
            countries[idx].1.push(Point::new(XValue::Number(f64::from(obs.year)), rate));
        }
    }
    countries.retain(|(_, points)| !points.is_empty());

    if countries.is_empty() {
        return ChartSpec::placeholder(format!("{series_name} Trends"), NO_SERIES_MESSAGE);
    }

    let mut spec = ChartSpec::new(
        format!("{series_name} Trends"),
        AxisSpec::new("Year", AxisKind::Value),
        AxisSpec::new("Inflation Rate (%)", AxisKind::Value),
    )
    .with_legend_title("Countries");

    for (i, (country, mut points)) in countries.into_iter().enumerate() {
        points.sort_by(|a, b| match (&a.x, &b.x) {
            (XValue::Number(x), XValue::Number(y)) => x.total_cmp(y),
            _ => std::cmp::Ordering::Equal,
        });
        spec.push_series(SeriesSpec::new(
            country,
            palette_color(i),
            SeriesData::Line {
                points,
                dash: Dash::Solid,
            },
        ));
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InflationObservation, IndexRange};

    fn obs(country: &str, series: &str, year: i32, rate: Option<f64>) -> InflationObservation {
        InflationObservation {
            country: country.into(),
            series_name: series.into(),
            year,
            inflation_rate: rate,
        }
    }

    fn selection(series: Option<&str>) -> Selection {
        Selection {
            currencies: Vec::new(),
            range: IndexRange { start: 0, end: 0 },
            inflation_series: series.map(str::to_string),
            forecast: None,
        }
    }

    #[test]
    fn one_line_per_country_in_first_appearance_order() {
        let table = InflationTable::from_observations(vec![
            obs("Thailand", "Headline", 2001, Some(1.6)),
            obs("Japan", "Headline", 2000, Some(-0.7)),
            obs("Thailand", "Headline", 2000, Some(1.5)),
            obs("Japan", "Food", 2000, Some(9.0)),
            obs("Japan", "Headline", 2001, None),
        ]);
        let spec = build(&table, &selection(Some("Headline")));

        assert_eq!(spec.title, "Headline Trends");
        assert_eq!(spec.legend_title.as_deref(), Some("Countries"));
        let names: Vec<&str> = spec.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Thailand", "Japan"]);
        let SeriesData::Line { points, .. } = &spec.series[0].data else {
            panic!("expected line");
        };
        assert_eq!(points[0].x, XValue::Number(2000.0));
        // Missing rates are skipped.
        let SeriesData::Line { points, .. } = &spec.series[1].data else {
            panic!("expected line");
        };
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn ignores_currency_selection() {
        let table = InflationTable::from_observations(vec![obs("Thailand", "Headline", 2000, Some(1.5))]);
        let spec = build(&table, &selection(Some("Headline")));
        assert!(!spec.is_placeholder());
    }

    #[test]
    fn no_series_is_placeholder() {
        let spec = build(&InflationTable::default(), &selection(None));
        assert!(spec.is_placeholder());
    }
}
