use market_data_ingestor::providers::ProviderError;
use thiserror::Error;

/// Errors raised while preparing or running a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A series does not hold exactly the lookback number of bars.
    #[error("{symbol}: expected {expected} bars, got {actual}")]
    InvalidSeriesLength {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    /// The lookback must be at least one bar.
    #[error("lookback must be at least 1 bar")]
    InvalidLookback,

    /// Fetching bars failed. Never reported as "no match".
    #[error("failed to fetch bars: {0}")]
    Provider(#[from] ProviderError),
}
