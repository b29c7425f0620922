use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::models::bar::Bar;

#[derive(Deserialize, Debug)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
    #[serde(rename = "n")]
    pub trade_count: Option<u64>,
    #[serde(rename = "vw")]
    pub vwap: Option<f64>,
}

impl From<AlpacaBar> for Bar {
    fn from(ab: AlpacaBar) -> Self {
        Bar {
            timestamp: ab.timestamp,
            open: ab.open,
            high: ab.high,
            low: ab.low,
            close: ab.close,
            volume: ab.volume,
            trade_count: ab.trade_count,
            vwap: ab.vwap,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AlpacaResponse {
    /// Alpaca sends `null` instead of `{}` when no symbol has data.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bars: IndexMap<String, Vec<AlpacaBar>>,
    pub next_page_token: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<IndexMap<String, Vec<AlpacaBar>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<IndexMap<String, Vec<AlpacaBar>>>::deserialize(deserializer)?.unwrap_or_default())
}
