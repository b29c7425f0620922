//! Calendar window needed to obtain `n` closed daily bars.

use chrono::{DateTime, Days, NaiveDate, Utc};

/// Half-open UTC range `[start, end)` to request from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LookbackWindow {
    /// Window ending at the start of `today`, so today's unfinished session is
    /// excluded, and reaching back far enough to cover weekends and market
    /// holidays for `bars` sessions.
    pub fn for_bars(bars: usize, today: NaiveDate) -> Self {
        let end = today.and_time(chrono::NaiveTime::MIN).and_utc();
        let padding = (bars as u64).saturating_mul(2).saturating_add(10);
        let start_date = today.checked_sub_days(Days::new(padding)).unwrap_or(NaiveDate::MIN);
        Self {
            start: start_date.and_time(chrono::NaiveTime::MIN).and_utc(),
            end,
        }
    }
}
