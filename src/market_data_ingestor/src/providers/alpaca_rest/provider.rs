use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use indexmap::IndexMap;
use nonzero_ext::nonzero;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::{get_env_var, parse_env_var};
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidApiKeySnafu, InvalidEnvVarSnafu,
        MissingEnvVarSnafu, ProviderError, ProviderInitError, ReqwestSnafu, ValidationSnafu,
        alpaca_rest::{
            params::{construct_params, validate_timeframe},
            response::{AlpacaBar, AlpacaResponse},
        },
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";

/// Alpaca's free plan allows 200 data requests per minute.
fn default_requests_per_minute() -> NonZeroU32 {
    nonzero!(200u32)
}

pub struct AlpacaProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
    _api_key: SecretString,
    _secret_key: SecretString,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider.
    ///
    /// Reads API keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables. `APCA_DATA_URL` overrides the bars endpoint and
    /// `APCA_REQUESTS_PER_MINUTE` the client-side rate limit.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(get_env_var("APCA_API_KEY_ID").context(MissingEnvVarSnafu)?.into());
        let secret_key =
            SecretString::new(get_env_var("APCA_API_SECRET_KEY").context(MissingEnvVarSnafu)?.into());
        let base_url = parse_env_var::<String>("APCA_DATA_URL")
            .context(InvalidEnvVarSnafu)?
            .unwrap_or_else(|| BASE_URL.to_string());
        let per_minute = parse_env_var::<NonZeroU32>("APCA_REQUESTS_PER_MINUTE")
            .context(InvalidEnvVarSnafu)?
            .unwrap_or_else(default_requests_per_minute);

        Self::with_credentials(api_key, secret_key, base_url, per_minute)
    }

    /// Creates a provider from explicit credentials and endpoint.
    pub fn with_credentials(
        api_key: SecretString,
        secret_key: SecretString,
        base_url: impl Into<String>,
        requests_per_minute: NonZeroU32,
    ) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key.expose_secret()).context(InvalidApiKeySnafu)?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(secret_key.expose_secret()).context(InvalidApiKeySnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            limiter: RateLimiter::direct(Quota::per_minute(requests_per_minute)),
            _api_key: api_key,
            _secret_key: secret_key,
        })
    }
}

fn into_bar(symbol: &str, ab: AlpacaBar) -> Result<Bar, ProviderError> {
    let bar = Bar::from(ab);
    if !bar.is_well_formed() {
        return ValidationSnafu {
            message: format!("{symbol}: malformed bar at {}", bar.timestamp),
        }
        .fail();
    }
    Ok(bar)
}

#[async_trait]
impl DataProvider for AlpacaProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        // Validate the timeframe before proceeding.
        validate_timeframe(&params.timeframe)?;

        let mut all_bars: IndexMap<String, Vec<AlpacaBar>> = IndexMap::new();
        let mut next_page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut query_params = construct_params(&params);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            self.limiter.until_ready().await;
            let response = self
                .client
                .get(&self.base_url)
                .query(&query_params)
                .send()
                .await
                .context(ReqwestSnafu)?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown API error".to_string());
                warn!(status = status.as_u16(), "alpaca bars request rejected");
                return ApiSnafu {
                    status: status.as_u16(),
                    message,
                }
                .fail();
            }

            let alpaca_response = response.json::<AlpacaResponse>().await.context(ReqwestSnafu)?;
            pages += 1;

            // Merge the bars from the current page into our collection.
            for (symbol, bars) in alpaca_response.bars {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            match alpaca_response.next_page_token {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        debug!(pages, symbols = all_bars.len(), "alpaca bars fetched");

        let mut result = Vec::with_capacity(all_bars.len());
        for (symbol, alpaca_bars) in all_bars {
            let bars = alpaca_bars
                .into_iter()
                .map(|ab| into_bar(&symbol, ab))
                .collect::<Result<Vec<_>, _>>()?;
            let mut series = BarSeries::new(symbol, params.timeframe.clone(), bars);
            series.sort_ascending();
            result.push(series);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_header_unsafe_keys() {
        let err = AlpacaProvider::with_credentials(
            SecretString::from("bad\nkey"),
            SecretString::from("secret"),
            BASE_URL,
            default_requests_per_minute(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ProviderInitError::InvalidApiKey { .. }));
    }

    #[test]
    fn malformed_vendor_bar_is_a_validation_error() {
        let ab: AlpacaBar = serde_json::from_str(
            r#"{"t":"2024-03-04T05:00:00Z","o":1.0,"h":-2.0,"l":0.5,"c":1.5,"v":10}"#,
        )
        .unwrap();
        let err = into_bar("AAPL", ab).unwrap_err();
        assert!(err.to_string().contains("AAPL"));
    }
}
