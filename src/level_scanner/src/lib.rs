//! Daily scan for matching highs and lows.
//!
//! The core is pure and synchronous:
//! - [`buffer`]: the price tolerance used to call two prices "equal".
//! - [`matcher`]: the four scan variants over a symbol's daily bars.
//! - [`round_number`]: keeps matches that sit near a whole-dollar price.
//!
//! Around it sit the thin layers the `daily-scan` binary wires together:
//! [`config`], [`symbols`], [`lookback`], [`pipeline`], [`report`], [`sink`]
//! and [`logging`].

pub mod buffer;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookback;
pub mod match_set;
pub mod matcher;
pub mod pipeline;
pub mod report;
pub mod round_number;
pub mod series;
pub mod sink;
pub mod symbols;

pub use error::ScanError;
pub use match_set::MatchSet;
pub use matcher::{LevelMatch, MatchVariant, PriceField, ScanParams, ScanWindow};
pub use series::SeriesSet;
