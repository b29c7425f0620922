//! The per-run collection of daily bar series.

use std::collections::BTreeMap;

use market_data_ingestor::models::bar_series::BarSeries;

use crate::error::ScanError;

/// Symbol -> series, keyed uniquely and iterated alphabetically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    series: BTreeMap<String, BarSeries>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from provider output. A later series for the same symbol
    /// replaces an earlier one.
    pub fn from_series(series: impl IntoIterator<Item = BarSeries>) -> Self {
        Self {
            series: series.into_iter().map(|s| (s.symbol.clone(), s)).collect(),
        }
    }

    pub fn insert(&mut self, series: BarSeries) {
        self.series.insert(series.symbol.clone(), series);
    }

    pub fn get(&self, symbol: &str) -> Option<&BarSeries> {
        self.series.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BarSeries> + '_ {
        self.series.values()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    /// Trims every series to its newest `lookback` bars (ascending order kept).
    pub fn truncate_to_lookback(&mut self, lookback: usize) {
        for series in self.series.values_mut() {
            series.retain_latest(lookback);
        }
    }

    /// Fails on the first series (alphabetically) whose length is not `lookback`.
    pub fn validate_lookback(&self, lookback: usize) -> Result<(), ScanError> {
        match self.series.values().find(|s| s.len() != lookback) {
            Some(s) => Err(ScanError::InvalidSeriesLength {
                symbol: s.symbol.clone(),
                expected: lookback,
                actual: s.len(),
            }),
            None => Ok(()),
        }
    }

    /// Splits off every series whose length is not `lookback`, returning one
    /// [`ScanError::InvalidSeriesLength`] per removed symbol.
    pub fn drain_invalid(&mut self, lookback: usize) -> Vec<ScanError> {
        let invalid: Vec<String> = self
            .series
            .values()
            .filter(|s| s.len() != lookback)
            .map(|s| s.symbol.clone())
            .collect();

        invalid
            .into_iter()
            .filter_map(|symbol| self.series.remove(&symbol))
            .map(|s| ScanError::InvalidSeriesLength {
                expected: lookback,
                actual: s.len(),
                symbol: s.symbol,
            })
            .collect()
    }
}

impl FromIterator<BarSeries> for SeriesSet {
    fn from_iter<I: IntoIterator<Item = BarSeries>>(iter: I) -> Self {
        Self::from_series(iter)
    }
}
