//! Shared domain types.
//!
//! The loaded tables are immutable for the life of the process; every request
//! borrows them through a [`Dataset`] and resolves its own [`Selection`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inflation series preselected when the data contains it.
pub const DEFAULT_INFLATION_SERIES: &str = "Headline Consumer Price Inflation";

/// One currency column of the rate table.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencySeries {
    pub code: String,
    pub values: Vec<f64>,
}

/// Cleaned exchange rates, column-major.
///
/// Invariants (established by ingest):
/// - `dates` strictly increasing
/// - every series has `dates.len()` finite values
/// - `currencies` keeps the file's column order
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub dates: Vec<NaiveDate>,
    pub currencies: Vec<CurrencySeries>,
}

impl RateTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn codes(&self) -> Vec<String> {
        self.currencies.iter().map(|c| c.code.clone()).collect()
    }

    /// Column position of a currency code.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.currencies.iter().position(|c| c.code == code)
    }

    /// Borrowed view over an inclusive index range.
    ///
    /// The range must come from [`IndexRange::clamped`] against this table.
    pub fn window(&self, range: IndexRange) -> RateWindow<'_> {
        RateWindow {
            table: self,
            start: range.start,
            end: range.end,
        }
    }
}

/// A date-range restricted view of the [`RateTable`].
#[derive(Debug, Clone, Copy)]
pub struct RateWindow<'a> {
    table: &'a RateTable,
    start: usize,
    end: usize,
}

impl<'a> RateWindow<'a> {
    pub fn dates(&self) -> &'a [NaiveDate] {
        &self.table.dates[self.start..=self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Values of one currency inside the window.
    pub fn series(&self, code: &str) -> Option<&'a [f64]> {
        self.table
            .currencies
            .iter()
            .find(|c| c.code == code)
            .map(|c| &c.values[self.start..=self.end])
    }

    /// Column position in the underlying table (used for tie-breaking).
    pub fn column_position(&self, code: &str) -> Option<usize> {
        self.table.position(code)
    }
}

/// One `(country, series, year)` cell of the reshaped inflation table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InflationObservation {
    pub country: String,
    pub series_name: String,
    pub year: i32,
    /// `None` when the source cell was blank or not numeric.
    pub inflation_rate: Option<f64>,
}

/// Long-form inflation data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InflationTable {
    pub observations: Vec<InflationObservation>,
    /// Distinct series names in first-appearance order.
    pub series_names: Vec<String>,
}

impl InflationTable {
    pub fn from_observations(observations: Vec<InflationObservation>) -> Self {
        let mut series_names: Vec<String> = Vec::new();
        for obs in &observations {
            if !series_names.contains(&obs.series_name) {
                series_names.push(obs.series_name.clone());
            }
        }
        Self {
            observations,
            series_names,
        }
    }

    pub fn series(&self, name: &str) -> impl Iterator<Item = &InflationObservation> {
        self.observations.iter().filter(move |o| o.series_name == name)
    }
}

/// Inclusive pair of row indices into the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn full(len: usize) -> Self {
        Self {
            start: 0,
            end: len.saturating_sub(1),
        }
    }

    /// Clamp both ends into `0..len` and order them so `start <= end`.
    pub fn clamped(start: usize, end: usize, len: usize) -> Self {
        let last = len.saturating_sub(1);
        let a = start.min(last);
        let b = end.min(last);
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }
}

/// Raw user choices as they arrive from a form, query string, or CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionQuery {
    pub currencies: Vec<String>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub series: Option<String>,
    /// `None`: not supplied. `Some("")`: explicitly cleared.
    pub forecast: Option<String>,
    /// Currencies the submitting page was rendered with, if it says so.
    pub previous: Option<Vec<String>>,
}

impl SelectionQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Selection Snapshot: the resolved state that drives one recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Ordered, unique, all known to the rate table.
    pub currencies: Vec<String>,
    pub range: IndexRange,
    pub inflation_series: Option<String>,
    pub forecast: Option<String>,
}

impl Selection {
    /// Initial page state: the first two currency columns over the full range.
    pub fn default_for(dataset: &Dataset) -> Self {
        let currencies: Vec<String> = dataset.rates.currencies.iter().take(2).map(|c| c.code.clone()).collect();
        let forecast = currencies.first().cloned();
        Self {
            currencies,
            range: IndexRange::full(dataset.rates.len()),
            inflation_series: default_series(&dataset.inflation),
            forecast,
        }
    }

    /// Resolve raw input against the dataset.
    pub fn resolve(query: &SelectionQuery, dataset: &Dataset) -> Self {
        if query.is_empty() {
            return Self::default_for(dataset);
        }

        let mut currencies: Vec<String> = Vec::new();
        for code in &query.currencies {
            let code = code.trim();
            if dataset.rates.position(code).is_none() {
                debug!(currency = code, "ignoring unknown currency in selection");
                continue;
            }
            if !currencies.iter().any(|c| c == code) {
                currencies.push(code.to_string());
            }
        }

        let len = dataset.rates.len();
        let range = IndexRange::clamped(
            query.start.unwrap_or(0),
            query.end.unwrap_or(len.saturating_sub(1)),
            len,
        );

        let inflation_series = match &query.series {
            Some(name) if dataset.inflation.series_names.contains(name) => Some(name.clone()),
            _ => default_series(&dataset.inflation),
        };

        // A changed currency list re-seeds the target from the new list.
        let changed = query.previous.as_ref().is_some_and(|prev| *prev != currencies);
        let forecast = match query.forecast.as_deref() {
            _ if changed => currencies.first().cloned(),
            Some("") => None,
            Some(code) if currencies.iter().any(|c| c == code) => Some(code.to_string()),
            _ => currencies.first().cloned(),
        };

        Self {
            currencies,
            range,
            inflation_series,
            forecast,
        }
    }
}

fn default_series(inflation: &InflationTable) -> Option<String> {
    if inflation.series_names.iter().any(|s| s == DEFAULT_INFLATION_SERIES) {
        return Some(DEFAULT_INFLATION_SERIES.to_string());
    }
    inflation.series_names.first().cloned()
}

/// A labelled position on the date-range slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderMark {
    pub index: usize,
    pub label: String,
}

/// Option lists derived once from the loaded data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOptions {
    pub currencies: Vec<String>,
    pub inflation_series: Vec<String>,
    pub slider_min: usize,
    pub slider_max: usize,
    pub slider_marks: Vec<SliderMark>,
}

impl DashboardOptions {
    pub fn derive(rates: &RateTable, inflation: &InflationTable) -> Self {
        let n = rates.len();
        let last = n.saturating_sub(1);
        let mut positions = vec![0, n / 4, n / 2, 3 * n / 4, last];
        positions.retain(|p| *p <= last);
        positions.sort_unstable();
        positions.dedup();

        let slider_marks = positions
            .into_iter()
            .filter_map(|index| {
                rates.dates.get(index).map(|d| SliderMark {
                    index,
                    label: d.format("%Y-%m-%d").to_string(),
                })
            })
            .collect();

        Self {
            currencies: rates.codes(),
            inflation_series: inflation.series_names.clone(),
            slider_min: 0,
            slider_max: last,
            slider_marks,
        }
    }
}

/// The process-wide read-only data handle passed to every builder.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rates: RateTable,
    pub inflation: InflationTable,
    pub options: DashboardOptions,
}

impl Dataset {
    pub fn new(rates: RateTable, inflation: InflationTable) -> Self {
        let options = DashboardOptions::derive(&rates, &inflation);
        Self {
            rates,
            inflation,
            options,
        }
    }

    /// Rate view for a resolved selection.
    pub fn window(&self, selection: &Selection) -> RateWindow<'_> {
        self.rates.window(selection.range)
    }
}
