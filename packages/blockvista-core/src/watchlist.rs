//! Watchlist parsing.

use std::collections::HashSet;

/// Parse a comma-separated watchlist such as `"RELIANCE, tcs"`.
///
/// Symbols are trimmed and upper-cased; blanks and repeats are dropped and
/// the first occurrence keeps its position.
pub fn parse_watchlist(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watchlist() {
        assert_eq!(parse_watchlist("RELIANCE,TCS"), vec!["RELIANCE", "TCS"]);
        assert_eq!(
            parse_watchlist(" reliance , tcs,,Reliance, infy "),
            vec!["RELIANCE", "TCS", "INFY"]
        );
    }

    #[test]
    fn test_parse_empty_watchlist() {
        assert!(parse_watchlist("").is_empty());
        assert!(parse_watchlist(" , ,").is_empty());
    }
}
