use chrono::{Duration, TimeZone, Utc};
use level_scanner::{
    MatchSet, ScanParams, SeriesSet,
    buffer::tolerance,
    matcher::{matching_highs, matching_lows, newest_matching_highs, newest_matching_lows},
    round_number::filter_to_round_numbers,
};
use market_data_ingestor::models::{bar::Bar, bar_series::BarSeries, timeframe::TimeFrame};

fn series(symbol: &str, highs: &[f64], lows: &[f64]) -> BarSeries {
    let start = Utc.with_ymd_and_hms(2024, 5, 6, 4, 0, 0).unwrap();
    let bars = highs
        .iter()
        .zip(lows)
        .enumerate()
        .map(|(i, (&h, &l))| Bar::new(start + Duration::days(i as i64), l, h, l, h, 10_000.0))
        .collect();
    BarSeries::new(symbol, TimeFrame::day(), bars)
}

fn params(filter: bool) -> ScanParams {
    ScanParams { lookback: 5, filter }
}

fn universe() -> SeriesSet {
    [
        // newest pair (4, 3) at 10.51
        series(
            "ORDR",
            &[10.0, 10.5, 10.2, 10.51, 10.49],
            &[9.0, 9.6, 9.3, 9.8, 9.1],
        ),
        // first high candidate broken, deeper pair (1, 0) unbroken
        series(
            "BRKN",
            &[10.50, 10.52, 10.00, 10.30, 10.01],
            &[9.0, 9.5, 9.7, 9.9, 9.3],
        ),
        // only an older pair matches
        series(
            "OLDR",
            &[9.0, 10.5, 9.5, 10.51, 12.0],
            &[8.0, 9.0, 8.5, 8.01, 11.0],
        ),
    ]
    .into_iter()
    .collect()
}

#[test]
fn tolerance_examples() {
    assert_eq!(tolerance(50.0), 0.05);
    assert_eq!(tolerance(60.0), 0.06);
    assert_eq!(tolerance(100.0), 0.10);
}

#[test]
fn full_window_highs() {
    let set = universe();

    let all = matching_highs(&set, params(false));
    assert_eq!(all.get("ORDR"), Some(10.51));
    assert_eq!(all.get("BRKN"), Some(10.01));
    assert_eq!(all.get("OLDR"), Some(10.51));

    let filtered = matching_highs(&set, params(true));
    assert_eq!(filtered.get("ORDR"), Some(10.51));
    assert!(!filtered.contains("BRKN"));
    assert_eq!(filtered.get("OLDR"), None);
}

#[test]
fn newest_only_ignores_older_pairs() {
    let set = universe();
    let newest = newest_matching_highs(&set, params(false));
    assert_eq!(newest.symbols().collect::<Vec<_>>(), vec!["BRKN", "ORDR"]);

    let lows = newest_matching_lows(&set, params(false));
    assert!(!lows.contains("OLDR"));
}

#[test]
fn full_window_lows_report_the_minimum() {
    let set = universe();
    let lows = matching_lows(&set, params(false));
    // OLDR: 8.01 (i=3) against 8.0 (i=0)
    assert_eq!(lows.get("OLDR"), Some(8.0));
    assert!(!lows.contains("ORDR"));
}

#[test]
fn round_number_examples() {
    let set: MatchSet = [("A", 100.03), ("B", 100.20), ("C", 99.95)].into_iter().collect();
    let kept = filter_to_round_numbers(&set);
    assert_eq!(kept.symbols().collect::<Vec<_>>(), vec!["A", "C"]);
    assert_eq!(filter_to_round_numbers(&kept), kept);
}

#[test]
fn half_cent_rounding_end_to_end() {
    let set: SeriesSet = [
        // tolerance(125.00) = 0.125 -> 0.13, so the 0.125 gap matches
        series(
            "TIE",
            &[130.0, 126.0, 127.0, 124.875, 125.0],
            &[120.0, 121.0, 122.0, 119.0, 123.0],
        ),
        // matched high 100.125 is an exact half cent
        series(
            "HALF",
            &[60.0, 61.0, 62.0, 100.125, 100.1],
            &[55.0, 56.0, 57.0, 90.0, 95.0],
        ),
        // 50.285 is stored just below the half cent
        series(
            "BELOW",
            &[40.0, 41.0, 42.0, 50.285, 50.26],
            &[35.0, 36.0, 37.0, 45.0, 48.0],
        ),
    ]
    .into_iter()
    .collect();

    let highs = matching_highs(&set, params(false));
    assert_eq!(highs.get("TIE"), Some(125.0));
    assert_eq!(highs.get("HALF"), Some(100.13));
    assert_eq!(highs.get("BELOW"), Some(50.28));

    let newest = newest_matching_highs(&set, params(true));
    assert_eq!(newest.len(), 3);
}
