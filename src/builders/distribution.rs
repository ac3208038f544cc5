//! Rate distributions: overlapping histograms and box plots.

use std::collections::BTreeMap;

use crate::builders::{SELECT_CURRENCY_MESSAGE, selected_series};
use crate::chart::{AxisKind, AxisSpec, Bin, ChartSpec, SeriesData, SeriesSpec, palette_color};
use crate::domain::{RateWindow, Selection};
use crate::math::{BoxStats, mean};

pub const HISTOGRAM_BIN_WIDTH: f64 = 0.02;
pub const HISTOGRAM_OPACITY: f64 = 0.7;
/// Fixed x-axis display window; values outside still count towards the bins.
pub const HISTOGRAM_WINDOW: (f64, f64) = (0.5, 2.1);

/// Above this many currencies the box plot switches to grouped mode.
pub const BOX_GROUPING_THRESHOLD: usize = 20;
/// Currencies per extreme group in grouped mode.
pub const BOX_GROUP_SIZE: usize = 10;

const HISTOGRAM_TITLE: &str = "Histogram of Currency Distribution";
const BOX_TITLE: &str = "Exchange Rate Distribution";

pub fn build_histogram(window: &RateWindow<'_>, selection: &Selection) -> ChartSpec {
    let series = selected_series(window, &selection.currencies);
    if series.is_empty() {
        return ChartSpec::placeholder(HISTOGRAM_TITLE, SELECT_CURRENCY_MESSAGE);
    }

    let mut spec = ChartSpec::new(
        HISTOGRAM_TITLE,
        AxisSpec::new("Exchange Rate Value", AxisKind::Value).with_range(HISTOGRAM_WINDOW.0, HISTOGRAM_WINDOW.1),
        AxisSpec::new("Frequency", AxisKind::Value),
    );
    for (i, (code, values)) in series.iter().enumerate() {
        spec.push_series(SeriesSpec::new(
            *code,
            palette_color(i),
            SeriesData::Histogram {
                bin_width: HISTOGRAM_BIN_WIDTH,
                opacity: HISTOGRAM_OPACITY,
                bins: bin_values(values, HISTOGRAM_BIN_WIDTH),
            },
        ));
    }
    spec
}

/// Count values into bins aligned at multiples of `width`.
pub fn bin_values(values: &[f64], width: f64) -> Vec<Bin> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for v in values.iter().filter(|v| v.is_finite()) {
        *counts.entry((v / width).floor() as i64).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(k, count)| Bin {
            start: k as f64 * width,
            count,
        })
        .collect()
}

pub fn build_box_plot(window: &RateWindow<'_>, selection: &Selection) -> ChartSpec {
    let series = selected_series(window, &selection.currencies);
    if series.is_empty() {
        return ChartSpec::placeholder(BOX_TITLE, SELECT_CURRENCY_MESSAGE);
    }

    let grouped = series.len() > BOX_GROUPING_THRESHOLD;
    let title = if grouped {
        format!("{BOX_TITLE} (Grouped)")
    } else {
        BOX_TITLE.to_string()
    };
    let mut spec = ChartSpec::new(
        title,
        AxisSpec::new("", AxisKind::Category),
        AxisSpec::new("Exchange Rate Value", AxisKind::Value),
    );

    let boxes: Vec<(String, Vec<f64>)> = if grouped {
        group_by_mean(&series)
    } else {
        series.iter().map(|(code, values)| (code.to_string(), values.to_vec())).collect()
    };

    for (i, (name, values)) in boxes.into_iter().enumerate() {
        // The medium group is always empty and keeps its slot (and color).
        if let Some(stats) = BoxStats::from_values(&values) {
            spec.push_series(SeriesSpec::new(name, palette_color(i), SeriesData::Box { stats }));
        }
    }
    spec
}

/// Low / Medium / High groups by mean level; the medium group is left empty.
fn group_by_mean(series: &[(&str, &[f64])]) -> Vec<(String, Vec<f64>)> {
    let mut ranked: Vec<(f64, &[f64])> = series.iter().map(|(_, values)| (mean(values), *values)).collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let flatten = |group: &[(f64, &[f64])]| -> Vec<f64> {
        group.iter().flat_map(|(_, values)| values.iter().copied()).collect()
    };
    let low = &ranked[..BOX_GROUP_SIZE.min(ranked.len())];
    let high = &ranked[ranked.len().saturating_sub(BOX_GROUP_SIZE)..];

    vec![
        ("Low Range".to_string(), flatten(low)),
        ("Medium Range".to_string(), Vec::new()),
        ("High Range".to_string(), flatten(high)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{dataset, select, wide_dataset};

    #[test]
    fn bins_align_to_width_and_keep_out_of_window_values() {
        let bins = bin_values(&[1.001, 1.019, 1.05, 150.0], 0.02);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins[0].count, 2);
        assert!((bins[0].start - 1.0).abs() < 1e-9);
        // 150.0 lies outside the display window but is still counted.
        assert_eq!(bins[2].count, 1);
    }

    #[test]
    fn histogram_has_fixed_window_and_one_series_per_currency() {
        let ds = dataset(vec![("AUD", vec![1.5, 1.52, 1.49]), ("JPY", vec![105.0, 106.0, 107.0])]);
        let sel = select(&ds, &["AUD", "JPY"]);
        let spec = build_histogram(&ds.window(&sel), &sel);
        assert_eq!(spec.x_axis.range, Some((0.5, 2.1)));
        assert_eq!(spec.series.len(), 2);
        let SeriesData::Histogram { bins, .. } = &spec.series[1].data else {
            panic!("expected histogram");
        };
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn box_plot_one_box_per_currency_up_to_threshold() {
        let ds = wide_dataset(15, 20);
        let codes = ds.rates.codes();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let sel = select(&ds, &refs);
        let spec = build_box_plot(&ds.window(&sel), &sel);
        assert_eq!(spec.series.len(), 20);
        assert_eq!(spec.title, "Exchange Rate Distribution");
    }

    #[test]
    fn box_plot_groups_above_threshold() {
        let ds = wide_dataset(15, 25);
        let codes = ds.rates.codes();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let sel = select(&ds, &refs);
        let spec = build_box_plot(&ds.window(&sel), &sel);

        assert_eq!(spec.title, "Exchange Rate Distribution (Grouped)");
        let names: Vec<&str> = spec.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Low Range", "High Range"]);
        let SeriesData::Box { stats } = &spec.series[0].data else {
            panic!("expected box");
        };
        assert_eq!(stats.n, 10 * 15);
        // High Range keeps the third palette slot.
        assert_eq!(spec.series[1].color, palette_color(2));
    }

    #[test]
    fn empty_selection_is_placeholder() {
        let ds = wide_dataset(5, 2);
        let sel = select(&ds, &[]);
        assert!(build_histogram(&ds.window(&sel), &sel).is_placeholder());
        assert!(build_box_plot(&ds.window(&sel), &sel).is_placeholder());
    }
}
