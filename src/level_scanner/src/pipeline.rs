//! Fetch, validate and scan: the steps behind one `daily-scan` run.

use chrono::NaiveDate;
use market_data_ingestor::{
    models::{
        asset::AssetClass,
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::TimeFrame,
    },
    providers::DataProvider,
};
use tracing::{debug, info, warn};

use crate::{
    error::ScanError,
    lookback::LookbackWindow,
    matcher::{self, ScanParams},
    report::{self, ScanReport, SignalGroup},
    round_number::filter_to_round_numbers,
    series::SeriesSet,
};

/// What to download for a scan.
#[derive(Debug, Clone)]
pub struct FetchRequest<'a> {
    pub symbols: &'a [String],
    pub lookback: usize,
    /// First day that must be excluded (today's session is still open).
    pub today: NaiveDate,
    /// Symbols per provider call.
    pub batch_size: usize,
    pub provider_params: ProviderParams,
}

/// Downloads daily bars and keeps the newest `lookback` bars per symbol.
///
/// Symbols the provider returns nothing for, or too few bars for, are dropped
/// with a warning. A provider failure aborts the whole fetch.
pub async fn fetch_series(
    provider: &dyn DataProvider,
    request: &FetchRequest<'_>,
) -> Result<SeriesSet, ScanError> {
    if request.lookback == 0 {
        return Err(ScanError::InvalidLookback);
    }

    let window = LookbackWindow::for_bars(request.lookback, request.today);
    let mut set = SeriesSet::new();

    for chunk in request.symbols.chunks(request.batch_size.max(1)) {
        let params = BarsRequestParams {
            symbols: chunk.to_vec(),
            timeframe: TimeFrame::day(),
            start: window.start,
            end: window.end,
            asset_class: AssetClass::UsEquity,
            provider_specific: request.provider_params.clone(),
        };
        debug!(symbols = chunk.len(), start = %window.start, end = %window.end, "fetching bars");
        for series in provider.fetch_bars(params).await? {
            set.insert(series);
        }
    }

    for symbol in request.symbols {
        if set.get(symbol).is_none() {
            warn!(%symbol, "no bars returned, skipping");
        }
    }

    set.truncate_to_lookback(request.lookback);
    for err in set.drain_invalid(request.lookback) {
        warn!("{err}, skipping");
    }

    info!(requested = request.symbols.len(), usable = set.len(), "bars ready");
    Ok(set)
}

/// Runs the standard scans over a validated set.
///
/// Groups, in order: newest-bar matches without the break filter, full-window
/// matches with the filter, full-window matches without it. With
/// `round_numbers` a fourth group keeps the filtered matches near whole-dollar
/// prices.
pub fn run_scans(
    set: &SeriesSet,
    lookback: usize,
    round_numbers: bool,
) -> Result<ScanReport, ScanError> {
    if lookback == 0 {
        return Err(ScanError::InvalidLookback);
    }
    set.validate_lookback(lookback)?;

    let unfiltered = ScanParams {
        lookback,
        filter: false,
    };
    let unbroken = ScanParams {
        lookback,
        filter: true,
    };

    let new = SignalGroup::new(
        report::NEW_SIGNALS,
        matcher::newest_matching_highs(set, unfiltered),
        matcher::newest_matching_lows(set, unfiltered),
    );
    let filtered = SignalGroup::new(
        report::FILTERED_SIGNALS,
        matcher::matching_highs(set, unbroken),
        matcher::matching_lows(set, unbroken),
    );
    let all = SignalGroup::new(
        report::ALL_SIGNALS,
        matcher::matching_highs(set, unfiltered),
        matcher::matching_lows(set, unfiltered),
    );

    let round = round_numbers.then(|| {
        SignalGroup::new(
            report::ROUND_NUMBER_SIGNALS,
            filter_to_round_numbers(&filtered.highs),
            filter_to_round_numbers(&filtered.lows),
        )
    });

    let report = ScanReport {
        groups: [Some(new), Some(filtered), Some(all), round]
            .into_iter()
            .flatten()
            .collect(),
    };
    info!(symbols = set.len(), signals = report.total(), "scan complete");
    Ok(report)
}
