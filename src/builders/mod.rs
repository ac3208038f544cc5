//! View model builders.
//!
//! Each builder is a pure function from the immutable dataset (usually through
//! a [`RateWindow`]) and a resolved [`Selection`] to a [`ChartSpec`] or a text
//! block. Degenerate selections produce placeholders, never errors.
//!
//! [`RateWindow`]: crate::domain::RateWindow
//! [`Selection`]: crate::domain::Selection
//! [`ChartSpec`]: crate::chart::ChartSpec

use chrono::NaiveDate;
use serde::Serialize;

use crate::chart::{Point, XValue};
use crate::domain::RateWindow;

pub mod correlation;
pub mod distribution;
pub mod forecast;
pub mod inflation;
pub mod monthly;
pub mod summary;
pub mod trend;

pub const SELECT_CURRENCY_MESSAGE: &str = "Please select at least one currency";

/// A titled block of text lines (statistics card, insight card).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub title: String,
    pub lines: Vec<String>,
}

impl TextBlock {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

/// Pair each date with its value.
pub(crate) fn date_points(dates: &[NaiveDate], values: &[f64]) -> Vec<Point> {
    dates
        .iter()
        .zip(values)
        .map(|(d, v)| Point::new(XValue::Date(*d), *v))
        .collect()
}

/// Selected currencies with their window values, in selection order.
pub(crate) fn selected_series<'a>(window: &RateWindow<'a>, currencies: &'a [String]) -> Vec<(&'a str, &'a [f64])> {
    currencies
        .iter()
        .filter_map(|c| window.series(c).map(|values| (c.as_str(), values)))
        .collect()
}

/// Format a statistic, showing `n/a` when it is undefined.
pub(crate) fn fmt_stat(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        "n/a".to_string()
    }
}
