//! Offline provider backed by a JSON bar file.
//!
//! The file maps symbols to bar arrays using the same short keys as the
//! Alpaca API (`t`, `o`, `h`, `l`, `c`, `v`):
//!
//! ```json
//! { "AAPL": [ { "t": "2024-03-04T05:00:00Z", "o": 176.15, "h": 176.9, "l": 173.79, "c": 175.1, "v": 81510101 } ] }
//! ```
//!
//! [`JsonFileSink`](crate::io::sink::JsonFileSink) writes the same shape, so a
//! live fetch can be saved once and replayed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, ParseFixtureSnafu, ProviderError, ReadFixtureSnafu, ValidationSnafu},
};

/// Symbol -> bars, in file order.
pub type BarFile = IndexMap<String, Vec<Bar>>;

pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BarFile, ProviderError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .context(ReadFixtureSnafu { path: self.path.clone() })?;
        serde_json::from_str(&text).context(ParseFixtureSnafu { path: self.path.clone() })
    }
}

#[async_trait]
impl DataProvider for JsonFileProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        let mut file = self.load().await?;
        let mut result = Vec::new();

        for symbol in &params.symbols {
            let Some(bars) = file.shift_remove(symbol) else {
                debug!(%symbol, path = %self.path.display(), "symbol not present in bar file");
                continue;
            };

            if let Some(bad) = bars.iter().find(|b| !b.is_well_formed()) {
                return ValidationSnafu {
                    message: format!("{symbol}: malformed bar at {}", bad.timestamp),
                }
                .fail();
            }

            let bars: Vec<Bar> = bars
                .into_iter()
                .filter(|b| b.timestamp >= params.start && b.timestamp < params.end)
                .collect();
            if bars.is_empty() {
                continue;
            }

            let mut series = BarSeries::new(symbol.clone(), params.timeframe.clone(), bars);
            series.sort_ascending();
            result.push(series);
        }

        Ok(result)
    }
}
