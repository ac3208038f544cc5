//! Pairwise relationship between the first two selected currencies.

use crate::chart::{AxisKind, AxisSpec, ChartSpec, SeriesData, SeriesSpec, palette_color};
use crate::domain::{RateWindow, Selection};
use crate::math::pearson;

pub const NEED_TWO_MESSAGE: &str = "Please select at least 2 currencies to view correlation";

const TITLE: &str = "Currency Correlation";

/// The pair the bubble chart compares: always the first two in selection order.
pub fn chart_pair(selection: &Selection) -> Option<(&str, &str)> {
    match selection.currencies.as_slice() {
        [a, b, ..] => Some((a.as_str(), b.as_str())),
        _ => None,
    }
}

/// Pearson's r of two currencies over the window; `None` if either is unknown.
pub fn correlation_of(window: &RateWindow<'_>, a: &str, b: &str) -> Option<f64> {
    Some(pearson(window.series(a)?, window.series(b)?))
}

pub fn build(window: &RateWindow<'_>, selection: &Selection) -> ChartSpec {
    let Some((a, b)) = chart_pair(selection) else {
        return ChartSpec::placeholder(TITLE, NEED_TWO_MESSAGE);
    };
    let (Some(xs), Some(ys)) = (window.series(a), window.series(b)) else {
        return ChartSpec::placeholder(TITLE, NEED_TWO_MESSAGE);
    };

    let r = pearson(xs, ys);
    let mut spec = ChartSpec::new(
        format!("Bubble Chart: {a} vs {b} (corr: {r:.2})"),
        AxisSpec::new(format!("{a} Value"), AxisKind::Value),
        AxisSpec::new(format!("{b} Value"), AxisKind::Value),
    );
    spec.push_series(SeriesSpec::new(
        format!("{a} vs {b} (corr: {r:.2})"),
        palette_color(0),
        SeriesData::Scatter {
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        },
    ));
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{dataset, select};

    fn three() -> crate::domain::Dataset {
        dataset(vec![
            ("A", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("B", vec![2.0, 4.1, 5.9, 8.2, 9.9]),
            ("C", vec![5.0, 4.0, 3.0, 2.0, 1.0]),
        ])
    }

    #[test]
    fn uses_first_two_in_selection_order() {
        let ds = three();
        let sel = select(&ds, &["A", "B", "C"]);
        let spec = build(&ds.window(&sel), &sel);
        assert!(spec.title.starts_with("Bubble Chart: A vs B"));
        assert_eq!(spec.x_axis.title, "A Value");
        assert_eq!(spec.y_axis.title, "B Value");

        let r = correlation_of(&ds.window(&sel), "A", "B").unwrap();
        let independent = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.1, 5.9, 8.2, 9.9]);
        assert!((r - independent).abs() < 1e-6);
        assert!(spec.series[0].name.contains(&format!("(corr: {r:.2})")));
    }

    #[test]
    fn respects_the_date_window() {
        let ds = three();
        let mut sel = select(&ds, &["C", "A"]);
        sel.range = crate::domain::IndexRange { start: 1, end: 3 };
        let spec = build(&ds.window(&sel), &sel);
        let SeriesData::Scatter { points } = &spec.series[0].data else {
            panic!("expected scatter");
        };
        assert_eq!(points, &vec![(4.0, 2.0), (3.0, 3.0), (2.0, 4.0)]);
    }

    #[test]
    fn fewer_than_two_is_placeholder() {
        let ds = three();
        let sel = select(&ds, &["A"]);
        let spec = build(&ds.window(&sel), &sel);
        assert!(spec.is_placeholder());
        assert_eq!(spec.annotations[0].text, NEED_TWO_MESSAGE);
    }
}
