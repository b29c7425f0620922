//! Matching highs / matching lows.
//!
//! For each symbol the matcher walks pairs of bars `(i, j)` with `j < i`,
//! newest `i` first and, for each `i`, newest `j` first. The first pair whose
//! prices differ by less than the buffer decides the symbol:
//!
//! - unfiltered: the pair is reported;
//! - filtered: the level set at bar `j` is checked against every bar from `j`
//!   to the newest bar. An unbroken level is reported. A broken level ends the
//!   search for that symbol with no match, even when a later pair in the walk
//!   would have been unbroken.
//!
//! The buffer always comes from the newest bar's **high**, for lows as well.

use market_data_ingestor::models::bar::Bar;
use tracing::{debug, trace};

use crate::{
    buffer::{round_to_cents, tolerance},
    match_set::MatchSet,
    series::SeriesSet,
};

/// Which price of a bar is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    High,
    Low,
}

impl PriceField {
    pub fn of(self, bar: &Bar) -> f64 {
        match self {
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
        }
    }

    /// The level a match at `anchor` establishes.
    fn level(self, anchor: f64, buffer: f64) -> f64 {
        match self {
            PriceField::High => anchor + buffer,
            PriceField::Low => anchor - buffer,
        }
    }

    fn breaks(self, price: f64, level: f64) -> bool {
        match self {
            PriceField::High => price > level,
            PriceField::Low => price < level,
        }
    }

    /// The reported price of a matched pair: the higher high or the lower low.
    fn extreme(self, a: f64, b: f64) -> f64 {
        match self {
            PriceField::High => a.max(b),
            PriceField::Low => a.min(b),
        }
    }
}

/// Which bars may play the "recent" side `i` of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanWindow {
    /// Every bar from the newest down to index 1.
    Full,
    /// Only the newest closed bar.
    NewestOnly,
}

/// One of the four scan variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchVariant {
    pub field: PriceField,
    pub window: ScanWindow,
}

impl MatchVariant {
    pub const FULL_WINDOW_HIGHS: Self = Self {
        field: PriceField::High,
        window: ScanWindow::Full,
    };
    pub const FULL_WINDOW_LOWS: Self = Self {
        field: PriceField::Low,
        window: ScanWindow::Full,
    };
    pub const NEWEST_HIGHS: Self = Self {
        field: PriceField::High,
        window: ScanWindow::NewestOnly,
    };
    pub const NEWEST_LOWS: Self = Self {
        field: PriceField::Low,
        window: ScanWindow::NewestOnly,
    };
}

/// Explicit per-call scan settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    /// Number of bars each series is expected to hold.
    pub lookback: usize,
    /// Require the matched level to be unbroken since it was set.
    pub filter: bool,
}

/// A matched pair of bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelMatch {
    /// Reported price, rounded to cents.
    pub price: f64,
    /// Index of the newer bar of the pair.
    pub recent_index: usize,
    /// Index of the older bar of the pair.
    pub anchor_index: usize,
}

/// How the walk over one series ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanOutcome {
    Matched(LevelMatch),
    /// The first candidate pair's level was broken; the search was abandoned.
    Broken {
        recent_index: usize,
        anchor_index: usize,
        level: f64,
    },
    /// No pair was within the buffer.
    Exhausted,
}

impl ScanOutcome {
    pub fn into_match(self) -> Option<LevelMatch> {
        match self {
            ScanOutcome::Matched(m) => Some(m),
            _ => None,
        }
    }
}

/// Walks one ascending series of bars. Fewer than two bars never match.
pub fn scan_bars(bars: &[Bar], variant: MatchVariant, filter: bool) -> ScanOutcome {
    let n = bars.len();
    if n < 2 {
        return ScanOutcome::Exhausted;
    }

    let newest = n - 1;
    let buffer = tolerance(bars[newest].high);
    let field = variant.field;
    let lowest_recent = match variant.window {
        ScanWindow::Full => 1,
        ScanWindow::NewestOnly => newest,
    };

    for i in (lowest_recent..=newest).rev() {
        let recent = field.of(&bars[i]);
        for j in (0..i).rev() {
            let anchor = field.of(&bars[j]);
            if (recent - anchor).abs() < buffer {
                if filter {
                    let level = field.level(anchor, buffer);
                    if bars[j..].iter().any(|bar| field.breaks(field.of(bar), level)) {
                        return ScanOutcome::Broken {
                            recent_index: i,
                            anchor_index: j,
                            level,
                        };
                    }
                }
                return ScanOutcome::Matched(LevelMatch {
                    price: round_to_cents(field.extreme(recent, anchor)),
                    recent_index: i,
                    anchor_index: j,
                });
            }
        }
    }

    ScanOutcome::Exhausted
}

/// Convenience wrapper over [`scan_bars`] that keeps only a match.
pub fn find_level(bars: &[Bar], variant: MatchVariant, filter: bool) -> Option<LevelMatch> {
    scan_bars(bars, variant, filter).into_match()
}

/// Runs one variant over every series in the set.
///
/// Series are expected to hold exactly `params.lookback` bars; check with
/// [`SeriesSet::validate_lookback`] first.
pub fn scan(set: &SeriesSet, variant: MatchVariant, params: ScanParams) -> MatchSet {
    let mut matches = MatchSet::new();
    for series in set.iter() {
        debug_assert_eq!(series.len(), params.lookback, "{}", series.symbol);
        match scan_bars(&series.bars, variant, params.filter) {
            ScanOutcome::Matched(m) => {
                trace!(
                    symbol = %series.symbol,
                    price = m.price,
                    recent = m.recent_index,
                    anchor = m.anchor_index,
                    "level matched"
                );
                matches.insert(series.symbol.clone(), m.price);
            }
            ScanOutcome::Broken {
                recent_index,
                anchor_index,
                level,
            } => {
                trace!(
                    symbol = %series.symbol,
                    recent = recent_index,
                    anchor = anchor_index,
                    level,
                    "level broken"
                );
            }
            ScanOutcome::Exhausted => {}
        }
    }
    debug!(?variant, filter = params.filter, matched = matches.len(), of = set.len(), "scan finished");
    matches
}

pub fn matching_highs(set: &SeriesSet, params: ScanParams) -> MatchSet {
    scan(set, MatchVariant::FULL_WINDOW_HIGHS, params)
}

pub fn matching_lows(set: &SeriesSet, params: ScanParams) -> MatchSet {
    scan(set, MatchVariant::FULL_WINDOW_LOWS, params)
}

pub fn newest_matching_highs(set: &SeriesSet, params: ScanParams) -> MatchSet {
    scan(set, MatchVariant::NEWEST_HIGHS, params)
}

pub fn newest_matching_lows(set: &SeriesSet, params: ScanParams) -> MatchSet {
    scan(set, MatchVariant::NEWEST_LOWS, params)
}
