//! Plain-text scan report.

use std::fmt::{self, Write};

use crate::match_set::MatchSet;

pub const NEW_SIGNALS: &str = "New Signals";
pub const FILTERED_SIGNALS: &str = "Filtered Signals";
pub const ALL_SIGNALS: &str = "All Signals";
pub const ROUND_NUMBER_SIGNALS: &str = "Round Number Signals";

const SEPARATOR: &str = "##########################################";

/// Highs and lows found by one pair of scans.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalGroup {
    pub label: String,
    pub highs: MatchSet,
    pub lows: MatchSet,
}

impl SignalGroup {
    pub fn new(label: impl Into<String>, highs: MatchSet, lows: MatchSet) -> Self {
        Self {
            label: label.into(),
            highs,
            lows,
        }
    }

    pub fn total(&self) -> usize {
        self.highs.len() + self.lows.len()
    }
}

/// Groups in the order they are printed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub groups: Vec<SignalGroup>,
}

impl ScanReport {
    pub fn group(&self, label: &str) -> Option<&SignalGroup> {
        self.groups.iter().find(|g| g.label == label)
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(SignalGroup::total).sum()
    }
}

fn write_rows(out: &mut String, matches: &MatchSet) -> fmt::Result {
    for (symbol, price) in matches.iter() {
        writeln!(out, " {symbol:>5}  {price:.2}")?;
    }
    Ok(())
}

fn write_group(out: &mut String, group: &SignalGroup) -> fmt::Result {
    writeln!(out, "{}", group.label)?;
    writeln!(out)?;
    writeln!(out, "Highs:")?;
    write_rows(out, &group.highs)?;
    writeln!(out, "Lows:")?;
    write_rows(out, &group.lows)?;
    writeln!(out)?;
    writeln!(
        out,
        "Signal Total: {}   Highs: {}   Lows: {}",
        group.total(),
        group.highs.len(),
        group.lows.len()
    )?;
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out)?;
    writeln!(out)
}

pub fn render_group(group: &SignalGroup) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_group(&mut out, group);
    out
}

pub fn render_report(report: &ScanReport) -> String {
    report.groups.iter().map(render_group).collect()
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_report(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_group_layout() {
        let group = SignalGroup::new(
            NEW_SIGNALS,
            [("AAPL", 185.5), ("F", 12.0)].into_iter().collect(),
            [("MSFT", 402.119)].into_iter().collect(),
        );
        let expected = concat!(
            "New Signals\n",
            "\n",
            "Highs:\n",
            "  AAPL  185.50\n",
            "     F  12.00\n",
            "Lows:\n",
            "  MSFT  402.12\n",
            "\n",
            "Signal Total: 3   Highs: 2   Lows: 1\n",
            "##########################################\n",
            "\n",
            "\n",
        );
        assert_eq!(render_group(&group), expected);
    }

    #[test]
    fn empty_group_has_no_rows() {
        let group = SignalGroup::new(ALL_SIGNALS, MatchSet::new(), MatchSet::new());
        let text = render_group(&group);
        assert!(text.contains("Highs:\nLows:\n\n"));
        assert!(text.contains("Signal Total: 0   Highs: 0   Lows: 0"));
    }

    #[test]
    fn report_keeps_group_order() {
        let report = ScanReport {
            groups: vec![
                SignalGroup::new(NEW_SIGNALS, MatchSet::new(), MatchSet::new()),
                SignalGroup::new(
                    FILTERED_SIGNALS,
                    [("X", 1.0)].into_iter().collect(),
                    MatchSet::new(),
                ),
            ],
        };
        let text = report.to_string();
        let new_at = text.find(NEW_SIGNALS).unwrap();
        let filtered_at = text.find(FILTERED_SIGNALS).unwrap();
        assert!(new_at < filtered_at);
        assert_eq!(report.total(), 1);
        assert!(report.group(ALL_SIGNALS).is_none());
    }
}
