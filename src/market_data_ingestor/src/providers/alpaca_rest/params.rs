use serde::{Deserialize, Serialize};

use crate::{
    models::{
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    #[default]
    Raw,
    Split,
    Dividend,
    All,
}

/// Specifies the source feed for stock data.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    #[default]
    Sip,
    Iex,
    Otc,
}

/// Specifies the sort order for the bars.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

/// Alpaca-specific parameters for a bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

/// Alpaca accepts `[1-59]Min`, `[1-23]Hour`, `1Day`, `1Week` and `[1,2,3,4,6,12]Month`.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<(), ProviderError> {
    let ok = match timeframe.unit {
        TimeFrameUnit::Minute => (1..=59).contains(&timeframe.amount),
        TimeFrameUnit::Hour => (1..=23).contains(&timeframe.amount),
        TimeFrameUnit::Day | TimeFrameUnit::Week => timeframe.amount == 1,
        TimeFrameUnit::Month => [1, 2, 3, 4, 6, 12].contains(&timeframe.amount),
    };
    if ok {
        Ok(())
    } else {
        ValidationSnafu {
            message: format!("timeframe {timeframe} is not supported by Alpaca"),
        }
        .fail()
    }
}

fn as_query_value<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value).ok()? {
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Builds the query string pairs for `GET /v2/stocks/bars` (without `page_token`).
pub fn construct_params(params: &BarsRequestParams) -> Vec<(String, String)> {
    let mut query = vec![
        ("symbols".to_string(), params.symbols.join(",")),
        ("timeframe".to_string(), params.timeframe.to_string()),
        ("start".to_string(), params.start.to_rfc3339()),
        ("end".to_string(), params.end.to_rfc3339()),
    ];

    if let ProviderParams::Alpaca(extra) = &params.provider_specific {
        if let Some(v) = extra.adjustment.as_ref().and_then(as_query_value) {
            query.push(("adjustment".to_string(), v));
        }
        if let Some(v) = extra.feed.as_ref().and_then(as_query_value) {
            query.push(("feed".to_string(), v));
        }
        if let Some(currency) = &extra.currency {
            query.push(("currency".to_string(), currency.clone()));
        }
        if let Some(limit) = extra.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(v) = extra.sort.as_ref().and_then(as_query_value) {
            query.push(("sort".to_string(), v));
        }
    }

    query
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::asset::AssetClass;

    fn request(provider_specific: ProviderParams) -> BarsRequestParams {
        BarsRequestParams {
            symbols: vec!["AAPL".into(), "MSFT".into()],
            timeframe: TimeFrame::day(),
            start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap(),
            asset_class: AssetClass::UsEquity,
            provider_specific,
        }
    }

    fn lookup<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
        query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn builds_base_query() {
        let query = construct_params(&request(ProviderParams::None));
        assert_eq!(lookup(&query, "symbols"), Some("AAPL,MSFT"));
        assert_eq!(lookup(&query, "timeframe"), Some("1Day"));
        assert_eq!(lookup(&query, "start"), Some("2024-03-01T00:00:00+00:00"));
        assert!(lookup(&query, "feed").is_none());
    }

    #[test]
    fn includes_alpaca_specific_options() {
        let query = construct_params(&request(ProviderParams::Alpaca(AlpacaBarsParams {
            adjustment: Some(Adjustment::Split),
            feed: Some(Feed::Iex),
            limit: Some(500),
            sort: Some(Sort::Asc),
            ..Default::default()
        })));
        assert_eq!(lookup(&query, "adjustment"), Some("split"));
        assert_eq!(lookup(&query, "feed"), Some("iex"));
        assert_eq!(lookup(&query, "limit"), Some("500"));
        assert_eq!(lookup(&query, "sort"), Some("asc"));
    }

    #[test]
    fn rejects_multi_day_timeframe() {
        assert!(validate_timeframe(&TimeFrame::day()).is_ok());
        let err = validate_timeframe(&TimeFrame::new(2, TimeFrameUnit::Day)).unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
    }
}
