//! Symbol universe loading.

use std::{collections::BTreeSet, path::{Path, PathBuf}};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymbolsError {
    #[error("can't open symbol file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parses one symbol per line. Blank lines and `#` comments are skipped.
pub fn parse_symbols(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a symbol file, see [`parse_symbols`].
pub fn load_symbols(path: impl AsRef<Path>) -> Result<Vec<String>, SymbolsError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| SymbolsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_symbols(&text))
}

/// Union of the given lists: uppercased, de-duplicated, sorted.
pub fn merge_symbols<I, S>(lists: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lists
        .into_iter()
        .flatten()
        .map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_and_comments() {
        let text = "AAPL\n  msft  \n\n# watchlist\nNFLX # streaming\n";
        assert_eq!(parse_symbols(text), vec!["AAPL", "msft", "NFLX"]);
    }

    #[test]
    fn merges_and_sorts() {
        let inline = vec!["NFLX", "aapl", "GOOG"];
        let file = vec!["AAPL".to_string(), "FB".to_string(), " ".to_string()];
        let merged = merge_symbols([
            inline.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            file,
        ]);
        assert_eq!(merged, vec!["AAPL", "FB", "GOOG", "NFLX"]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_symbols("/definitely/not/here/symbols.txt").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/symbols.txt"));
    }
}
