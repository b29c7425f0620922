//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the unified interface for
//! fetching time-series bar data from any market data vendor.
//!
//! Each concrete provider ([`alpaca_rest::AlpacaProvider`],
//! [`json_file::JsonFileProvider`]) implements [`DataProvider`] and owns its
//! vendor-specific request building and validation.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn DataProvider`) for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{
//!     bar_series::BarSeries,
//!     request_params::BarsRequestParams,
//! };
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         _params: BarsRequestParams,
//!     ) -> Result<Vec<BarSeries>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod alpaca_rest;
pub mod json_file;

use std::path::PathBuf;

use async_trait::async_trait;
use shared_utils::env::{InvalidEnvVarError, MissingEnvVarError};
use snafu::{Backtrace, Snafu};

use crate::models::{bar_series::BarSeries, request_params::BarsRequestParams};

/// Trait for fetching time-series bar data from a market data provider.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches time-series bar data for the given request parameters.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BarSeries>)` - One series per symbol that had data, bars in
    ///   ascending timestamp order. Symbols without data are omitted.
    /// * `Err(ProviderError)` - If the request fails.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// an optional environment variable holds garbage.
    #[snafu(display("{source}"))]
    InvalidEnvVar {
        source: InvalidEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned a specific error message (e.g., invalid API key).
    #[snafu(display("API error ({status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters, or the data returned for them, were invalid.
    #[snafu(display("Invalid data for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// A bar fixture file could not be read.
    #[snafu(display("Failed to read bar file {}: {source}", path.display()))]
    ReadFixture {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A bar fixture file is not valid JSON in the expected shape.
    #[snafu(display("Failed to parse bar file {}: {source}", path.display()))]
    ParseFixture {
        path: PathBuf,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use crate::models::{
        asset::AssetClass,
        bar::Bar,
        request_params::ProviderParams,
        timeframe::TimeFrame,
    };

    use super::*;

    struct AlwaysOneBar;
    struct NoData;

    #[async_trait]
    impl DataProvider for AlwaysOneBar {
        async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
            Ok(params
                .symbols
                .into_iter()
                .map(|symbol| {
                    BarSeries::new(
                        symbol,
                        params.timeframe.clone(),
                        vec![Bar::new(params.start, 1.0, 2.0, 0.5, 1.5, 10.0)],
                    )
                })
                .collect())
        }
    }

    #[async_trait]
    impl DataProvider for NoData {
        async fn fetch_bars(&self, _params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
            Ok(vec![])
        }
    }

    // Decides at runtime which provider to hand back.
    fn get_provider(name: &str) -> Box<dyn DataProvider> {
        if name == "one-bar" {
            Box::new(AlwaysOneBar)
        } else {
            Box::new(NoData)
        }
    }

    fn params() -> BarsRequestParams {
        BarsRequestParams {
            symbols: vec!["AAPL".to_string(), "MSFT".to_string()],
            timeframe: TimeFrame::day(),
            start: Utc::now(),
            end: Utc::now(),
            asset_class: AssetClass::UsEquity,
            provider_specific: ProviderParams::None,
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let series = get_provider("one-bar").fetch_bars(params()).await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].symbol, "MSFT");

        let empty = get_provider("none").fetch_bars(params()).await.unwrap();
        assert!(empty.is_empty());
    }
}
