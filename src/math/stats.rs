//! Descriptive statistics over plain `f64` slices.
//!
//! Conventions:
//! - standard deviation is the sample estimate (`n - 1` denominator)
//! - quantiles interpolate linearly between order statistics
//! - empty or too-short inputs yield `NaN` instead of an error; callers decide
//!   how to present a missing statistic

use chrono::NaiveDate;
use serde::Serialize;

/// Arithmetic mean, `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation, `NaN` for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Pearson correlation coefficient.
///
/// `NaN` when the slices differ in length, hold fewer than two values, or
/// either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }
    let mx = mean(x);
    let my = mean(y);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}

/// Period-over-period fractional change, one shorter than the input.
///
/// A change from a zero base is not finite and is left out.
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|v| v.is_finite())
        .collect()
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Box plot summary with Tukey whiskers (1.5 × IQR).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub n: usize,
}

impl BoxStats {
    /// Summarize finite values; `None` when nothing finite remains.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = || sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect();

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
            n: sorted.len(),
        })
    }
}

/// Mean value per calendar month (`YYYY-MM`), in date order.
///
/// `dates` must be ascending and the same length as `values`.
pub fn monthly_means(dates: &[NaiveDate], values: &[f64]) -> Vec<(String, f64)> {
    let mut out: Vec<(String, f64)> = Vec::new();
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut current: Option<String> = None;

    for (date, value) in dates.iter().zip(values) {
        let key = date.format("%Y-%m").to_string();
        if current.as_deref() != Some(key.as_str()) {
            if let Some(month) = current.take() {
                out.push((month, sum / count as f64));
            }
            current = Some(key);
            sum = 0.0;
            count = 0;
        }
        sum += value;
        count += 1;
    }
    if let Some(month) = current {
        out.push((month, sum / count as f64));
    }
    out
}

/// Index of the largest finite value; ties keep the first occurrence.
pub fn argmax_first(values: &[f64]) -> Option<usize> {
    pick_first(values, |candidate, best| candidate > best)
}

/// Index of the smallest finite value; ties keep the first occurrence.
pub fn argmin_first(values: &[f64]) -> Option<usize> {
    pick_first(values, |candidate, best| candidate < best)
}

fn pick_first(values: &[f64], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some(b) if !better(*v, values[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn mean_and_sample_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v) - 5.0).abs() < 1e-12);
        // Population std is 2.0; the sample estimate scales by sqrt(8/7).
        assert!((sample_std(&v) - 2.0 * (8.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(mean(&[]).is_nan());
        assert!(sample_std(&[1.0]).is_nan());
    }

    #[test]
    fn pearson_perfect_and_degenerate() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z) + 1.0).abs() < 1e-12);
        assert!(pearson(&x, &[1.0, 1.0, 1.0, 1.0]).is_nan());
        assert!(pearson(&x, &y[..3]).is_nan());
    }

    #[test]
    fn pct_changes_skip_zero_base() {
        let changes = pct_changes(&[1.0, 1.1, 0.0, 2.0]);
        assert_eq!(changes.len(), 2);
        assert!((changes[0] - 0.1).abs() < 1e-12);
        assert!((changes[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let s = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile_sorted(&s, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile_sorted(&s, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile_sorted(&s, 1.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn box_stats_flags_outliers() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(stats.outliers, vec![100.0]);
        assert!((stats.upper_whisker - 5.0).abs() < 1e-12);
        assert!((stats.lower_whisker - 1.0).abs() < 1e-12);
        assert_eq!(stats.n, 6);
        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn monthly_means_group_by_calendar_month() {
        let dates = [d(2020, 1, 30), d(2020, 1, 31), d(2020, 2, 3), d(2021, 2, 1)];
        let values = [1.0, 3.0, 5.0, 7.0];
        let months = monthly_means(&dates, &values);
        assert_eq!(
            months,
            vec![
                ("2020-01".to_string(), 2.0),
                ("2020-02".to_string(), 5.0),
                ("2021-02".to_string(), 7.0),
            ]
        );
    }

    #[test]
    fn arg_extremes_keep_first_tie() {
        let v = [3.0, f64::NAN, 5.0, 5.0, 1.0, 1.0];
        assert_eq!(argmax_first(&v), Some(2));
        assert_eq!(argmin_first(&v), Some(4));
        assert_eq!(argmax_first(&[f64::NAN]), None);
    }
}
