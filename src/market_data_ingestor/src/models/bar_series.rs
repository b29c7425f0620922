//! A collection of time-series bars for a specific symbol and timeframe.

use crate::models::{bar::Bar, timeframe::TimeFrame};

/// Represents a complete set of time-series data for a single symbol.
///
/// This struct groups a vector of [`Bar`]s with their corresponding symbol
/// and [`TimeFrame`], making the data set self-describing. Consumers expect
/// `bars` in ascending timestamp order (index 0 = oldest).
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "AAPL").
    pub symbol: String,
    /// The time interval for each bar in the series.
    pub timeframe: TimeFrame,
    /// The collection of OHLCV bars.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar, if any.
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Sorts bars by timestamp, oldest first, and drops duplicate timestamps
    /// (the later occurrence wins).
    pub fn sort_ascending(&mut self) {
        self.bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<Bar> = Vec::with_capacity(self.bars.len());
        for bar in self.bars.drain(..) {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }
        self.bars = deduped;
    }

    /// Keeps only the newest `n` bars. Assumes ascending order.
    pub fn retain_latest(&mut self, n: usize) {
        let len = self.bars.len();
        if len > n {
            self.bars.drain(..len - n);
        }
    }
}
