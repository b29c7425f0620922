use std::collections::BTreeMap;

/// Symbol -> matched price, at most one entry per symbol.
///
/// Backed by a `BTreeMap` so iteration is alphabetical by symbol, which is the
/// order every report prints in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSet {
    entries: BTreeMap<String, f64>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a match, replacing any earlier price for the symbol.
    pub fn insert(&mut self, symbol: impl Into<String>, price: f64) {
        self.entries.insert(symbol.into(), price);
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, f64)> for MatchSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for MatchSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        iter.into_iter().map(|(s, p)| (s.to_string(), p)).collect()
    }
}

impl IntoIterator for MatchSet {
    type Item = (String, f64);
    type IntoIter = std::collections::btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
