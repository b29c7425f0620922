//! Market data access for the daily scanner.
//!
//! - [`models`]: vendor-agnostic bar, series, timeframe and request types.
//! - [`providers`]: the [`DataProvider`](providers::DataProvider) trait with an
//!   Alpaca REST implementation and a JSON fixture implementation.
//! - [`io`]: the [`DataSink`](io::sink::DataSink) trait and a JSON fixture sink.

pub mod io;
pub mod models;
pub mod providers;
