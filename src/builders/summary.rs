//! Statistics and insight text blocks.

use std::cmp::Ordering;

use crate::builders::{SELECT_CURRENCY_MESSAGE, TextBlock, fmt_stat, selected_series};
use crate::domain::{RateWindow, Selection};
use crate::math::{argmax_first, argmin_first, mean, pct_changes, pearson, sample_std};

/// Daily changes averaged for the "recent trend".
pub const RECENT_CHANGES: usize = 30;
/// Correlated pairs listed in the overall card.
pub const TOP_PAIRS: usize = 3;

pub const SELECT_FOR_INSIGHTS_MESSAGE: &str = "Please select at least one currency to see insights.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Upward,
    Downward,
}

impl TrendDirection {
    /// Only a strictly positive change counts as upward; zero is downward.
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            TrendDirection::Upward
        } else {
            TrendDirection::Downward
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Upward => "upward",
            TrendDirection::Downward => "downward",
        }
    }
}

/// Qualitative band for a correlation coefficient.
pub fn correlation_label(r: f64) -> &'static str {
    if r > 0.7 {
        "Strong positive"
    } else if r < -0.7 {
        "Strong negative"
    } else if r > 0.3 {
        "Moderate positive"
    } else if r < -0.3 {
        "Moderate negative"
    } else {
        "Weak"
    }
}

/// Selected series reordered by their column position in the data, so that
/// first-occurrence tie-breaking follows the file's column order.
fn in_column_order<'a>(window: &RateWindow<'a>, selection: &'a Selection) -> Vec<(&'a str, &'a [f64])> {
    let mut series = selected_series(window, &selection.currencies);
    series.sort_by_key(|(code, _)| window.column_position(code).unwrap_or(usize::MAX));
    series
}

/// Statistics card for the current selection.
pub fn statistics(window: &RateWindow<'_>, selection: &Selection) -> TextBlock {
    let series = in_column_order(window, selection);
    match series.as_slice() {
        [] => TextBlock::new("Statistics").line(SELECT_CURRENCY_MESSAGE),
        [(code, values)] => {
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let latest = values.last().copied().unwrap_or(f64::NAN);
            TextBlock::new(format!("Statistics for {code}"))
                .line(format!("Average: {}", fmt_stat(mean(values), 4)))
                .line(format!("Current (latest): {}", fmt_stat(latest, 4)))
                .line(format!("Highest: {}", fmt_stat(max, 4)))
                .line(format!("Lowest: {}", fmt_stat(min, 4)))
                .line(format!("Standard Deviation: {}", fmt_stat(sample_std(values), 4)))
        }
        many => {
            let means: Vec<f64> = many.iter().map(|(_, v)| mean(v)).collect();
            let sds: Vec<f64> = many.iter().map(|(_, v)| sample_std(v)).collect();
            let mut block = TextBlock::new(format!("Overview of {} Selected Currencies", many.len()));
            if let Some(i) = argmax_first(&means) {
                block = block.line(format!("Highest average rate: {} ({})", fmt_stat(means[i], 4), many[i].0));
            }
            if let Some(i) = argmin_first(&means) {
                block = block.line(format!("Lowest average rate: {} ({})", fmt_stat(means[i], 4), many[i].0));
            }
            volatility_lines(block, many, &sds)
        }
    }
}

fn volatility_lines(mut block: TextBlock, series: &[(&str, &[f64])], sds: &[f64]) -> TextBlock {
    if let Some(i) = argmax_first(sds) {
        block = block.line(format!("Most volatile: {} (SD: {})", series[i].0, fmt_stat(sds[i], 4)));
    }
    if let Some(i) = argmin_first(sds) {
        block = block.line(format!("Most stable: {} (SD: {})", series[i].0, fmt_stat(sds[i], 4)));
    }
    block
}

/// Per-currency behaviour derived from daily percentage changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyInsight {
    pub currency: String,
    /// Mean of the last 30 daily changes, in percent.
    pub recent_trend: f64,
    pub direction: TrendDirection,
    /// Sample std of daily changes, in percent.
    pub volatility: f64,
}

impl CurrencyInsight {
    pub fn from_values(currency: &str, values: &[f64]) -> Self {
        let changes = pct_changes(values);
        let tail = &changes[changes.len().saturating_sub(RECENT_CHANGES)..];
        let recent_trend = mean(tail) * 100.0;
        Self {
            currency: currency.to_string(),
            recent_trend,
            direction: TrendDirection::from_change(recent_trend),
            volatility: sample_std(&changes) * 100.0,
        }
    }
}

/// One correlated pair, in selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelatedPair {
    pub first: String,
    pub second: String,
    pub r: f64,
}

/// All pairs of the selection ranked by |r|, strongest first; ties keep
/// selection order and undefined coefficients sort last.
pub fn ranked_pairs(window: &RateWindow<'_>, selection: &Selection) -> Vec<CorrelatedPair> {
    let series = selected_series(window, &selection.currencies);
    let mut pairs = Vec::new();
    for (i, (a, xs)) in series.iter().enumerate() {
        for (b, ys) in &series[i + 1..] {
            pairs.push(CorrelatedPair {
                first: a.to_string(),
                second: b.to_string(),
                r: pearson(xs, ys),
            });
        }
    }
    pairs.sort_by(|p, q| match (p.r.is_nan(), q.r.is_nan()) {
        (false, false) => q.r.abs().total_cmp(&p.r.abs()),
        (a, b) => a.cmp(&b),
    });
    pairs
}

/// Insight cards: one per selected currency, plus an overall card when more
/// than one currency is selected.
pub fn insights(window: &RateWindow<'_>, selection: &Selection) -> Vec<TextBlock> {
    let series = selected_series(window, &selection.currencies);
    if series.is_empty() {
        return vec![TextBlock::new("Insights").line(SELECT_FOR_INSIGHTS_MESSAGE)];
    }

    let per_currency: Vec<CurrencyInsight> = series
        .iter()
        .map(|(code, values)| CurrencyInsight::from_values(code, values))
        .collect();
    let vols: Vec<f64> = per_currency
        .iter()
        .map(|c| c.volatility)
        .filter(|v| v.is_finite())
        .collect();
    let mean_volatility = mean(&vols);
    let multiple = series.len() > 1;

    let mut blocks: Vec<TextBlock> = per_currency
        .iter()
        .map(|c| {
            let mut block = TextBlock::new(format!("{} Analysis", c.currency))
                .line(format!(
                    "The {} shows a {} trend of {}% over the recent period.",
                    c.currency,
                    c.direction.as_str(),
                    fmt_stat(c.recent_trend.abs(), 2)
                ))
                .line(format!(
                    "Volatility: {}% (standard deviation of daily returns)",
                    fmt_stat(c.volatility, 2)
                ));
            if multiple {
                let comparison = match c.volatility.partial_cmp(&mean_volatility) {
                    Some(Ordering::Greater) => "has higher volatility",
                    _ => "is more stable",
                };
                block = block.line(format!(
                    "Compared to other selected currencies, {} {comparison}.",
                    c.currency
                ));
            }
            block
        })
        .collect();

    if multiple {
        blocks.push(overall(window, selection));
    }
    blocks
}

fn overall(window: &RateWindow<'_>, selection: &Selection) -> TextBlock {
    let mut block = TextBlock::new("Overall Analysis").line("Key correlations between selected currencies:");
    for pair in ranked_pairs(window, selection).iter().take(TOP_PAIRS) {
        block = block.line(format!(
            "{} and {}: {} ({} correlation)",
            pair.first,
            pair.second,
            fmt_stat(pair.r, 2),
            correlation_label(pair.r)
        ));
    }

    let series = in_column_order(window, selection);
    let sds: Vec<f64> = series.iter().map(|(_, v)| sample_std(v)).collect();
    volatility_lines(block, &series, &sds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{dataset, select};

    #[test]
    fn zero_change_counts_as_downward() {
        assert_eq!(TrendDirection::from_change(0.0), TrendDirection::Downward);
        assert_eq!(TrendDirection::from_change(1e-12), TrendDirection::Upward);
        assert_eq!(TrendDirection::from_change(-0.5), TrendDirection::Downward);
    }

    #[test]
    fn correlation_bands() {
        assert_eq!(correlation_label(0.71), "Strong positive");
        assert_eq!(correlation_label(0.7), "Moderate positive");
        assert_eq!(correlation_label(-0.5), "Moderate negative");
        assert_eq!(correlation_label(-0.3), "Weak");
        assert_eq!(correlation_label(f64::NAN), "Weak");
    }

    #[test]
    fn single_currency_statistics() {
        let ds = dataset(vec![("AUD", vec![1.0, 3.0, 2.0])]);
        let sel = select(&ds, &["AUD"]);
        let block = statistics(&ds.window(&sel), &sel);
        assert_eq!(block.title, "Statistics for AUD");
        assert_eq!(
            block.lines,
            vec![
                "Average: 2.0000",
                "Current (latest): 2.0000",
                "Highest: 3.0000",
                "Lowest: 1.0000",
                "Standard Deviation: 1.0000",
            ]
        );
    }

    #[test]
    fn overview_ties_follow_column_order() {
        // Identical series: every extreme ties, so the first data column wins.
        let ds = dataset(vec![("AUD", vec![1.0, 2.0]), ("EUR", vec![1.0, 2.0])]);
        let sel = select(&ds, &["EUR", "AUD"]);
        let block = statistics(&ds.window(&sel), &sel);
        assert_eq!(block.title, "Overview of 2 Selected Currencies");
        assert_eq!(block.lines[0], "Highest average rate: 1.5000 (AUD)");
        assert_eq!(block.lines[1], "Lowest average rate: 1.5000 (AUD)");
        assert!(block.lines[2].starts_with("Most volatile: AUD"));
    }

    #[test]
    fn recent_trend_uses_last_thirty_changes() {
        // 10 falling days then 31 rising days: the last 30 changes are all +1%.
        let mut values: Vec<f64> = (0..10).map(|i| 2.0 - 0.1 * i as f64).collect();
        let mut level = values[9];
        for _ in 0..31 {
            level *= 1.01;
            values.push(level);
        }
        let insight = CurrencyInsight::from_values("AUD", &values);
        assert!((insight.recent_trend - 1.0).abs() < 1e-9);
        assert_eq!(insight.direction, TrendDirection::Upward);
    }

    #[test]
    fn pairs_rank_by_absolute_correlation() {
        let ds = dataset(vec![
            ("A", vec![1.0, 2.0, 3.0, 4.0]),
            ("B", vec![1.0, 3.0, 2.0, 4.0]),
            ("C", vec![4.0, 3.0, 2.0, 1.0]),
        ]);
        let sel = select(&ds, &["A", "B", "C"]);
        let pairs = ranked_pairs(&ds.window(&sel), &sel);
        assert_eq!((pairs[0].first.as_str(), pairs[0].second.as_str()), ("A", "C"));
        assert!((pairs[0].r + 1.0).abs() < 1e-12);
        // A-B and B-C tie at |r| = 0.8 and keep selection order.
        assert_eq!((pairs[1].first.as_str(), pairs[1].second.as_str()), ("A", "B"));
        assert_eq!((pairs[2].first.as_str(), pairs[2].second.as_str()), ("B", "C"));
    }

    #[test]
    fn insights_add_overall_card_for_several_currencies() {
        let ds = dataset(vec![("A", vec![1.0, 1.1, 1.0, 1.2]), ("B", vec![2.0, 2.0, 2.1, 2.1])]);
        let sel = select(&ds, &["A", "B"]);
        let blocks = insights(&ds.window(&sel), &sel);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].title, "A Analysis");
        assert!(blocks[0].lines[2].ends_with("has higher volatility."));
        assert!(blocks[1].lines[2].ends_with("is more stable."));
        assert_eq!(blocks[2].title, "Overall Analysis");
        assert!(blocks[2].lines[1].starts_with("A and B: "));
    }

    #[test]
    fn equal_volatility_reads_as_more_stable() {
        // B is A scaled by two, so both have bit-identical daily changes.
        let a = vec![1.0, 1.5, 1.2, 1.8, 1.35];
        let b: Vec<f64> = a.iter().map(|v| v * 2.0).collect();
        let ds = dataset(vec![("A", a), ("B", b)]);
        let sel = select(&ds, &["A", "B"]);
        let blocks = insights(&ds.window(&sel), &sel);
        assert_eq!(blocks[0].lines[1], blocks[1].lines[1]);
        assert_eq!(blocks[0].lines[2], "Compared to other selected currencies, A is more stable.");
        assert_eq!(blocks[1].lines[2], "Compared to other selected currencies, B is more stable.");
    }

    #[test]
    fn empty_selection_has_instruction() {
        let ds = dataset(vec![("A", vec![1.0, 2.0])]);
        let sel = select(&ds, &[]);
        assert_eq!(insights(&ds.window(&sel), &sel)[0].lines[0], SELECT_FOR_INSIGHTS_MESSAGE);
        assert_eq!(statistics(&ds.window(&sel), &sel).lines[0], SELECT_CURRENCY_MESSAGE);
    }
}
