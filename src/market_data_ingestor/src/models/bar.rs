//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! This struct is used as the standard output for all [`DataProvider`](crate::providers::DataProvider)
//! implementations, regardless of asset class.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single time-series bar (OHLCV) for a given timestamp.
///
/// This struct is vendor-agnostic and is used throughout the scan pipeline.
/// Bars are never mutated once a provider has produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// The timestamp for this bar (UTC). For daily bars this is the session date.
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    #[serde(rename = "o")]
    pub open: f64,

    /// Highest price during the bar interval.
    #[serde(rename = "h")]
    pub high: f64,

    /// Lowest price during the bar interval.
    #[serde(rename = "l")]
    pub low: f64,

    /// Closing price.
    #[serde(rename = "c")]
    pub close: f64,

    /// Volume traded during the bar interval.
    #[serde(rename = "v")]
    pub volume: f64,

    /// Trade count for the bar. Not all providers supply this.
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,

    /// Volume-weighted average price. Not all providers supply this.
    #[serde(rename = "vw", default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
}

impl Bar {
    /// Builds a bar without the optional trade count / VWAP fields.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            trade_count: None,
            vwap: None,
        }
    }

    /// True when every price and the volume are finite and non-negative.
    pub fn is_well_formed(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}
