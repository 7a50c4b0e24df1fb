//! Market screener.
//!
//! Filters a batch of quote snapshots against a set of criteria and an
//! optional sector allow-list, and ranks quotes by percentage change.
//! Malformed quotes are dropped row by row; one bad row never aborts a batch.

use crate::types::{Direction, Quote, ScreenCriterion};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default number of entries on the top gainers leaderboard.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Filter quotes against every criterion and an optional sector allow-list.
///
/// # Arguments
///
/// * `quotes` - Quote snapshots, one per symbol
/// * `criteria` - Criteria a quote must all satisfy (empty keeps everything)
/// * `sector_allow_list` - Sectors to keep; unset or empty disables sector filtering
///
/// # Returns
///
/// Matching quotes in their original relative order.
///
/// # Example
///
/// ```rust
/// use blockvista_core::{screen, Quote, ScreenCriterion};
///
/// let quotes = vec![Quote::new("A", 10.0, 2.0, 500), Quote::new("B", 10.0, -1.0, 50)];
/// let gainers = screen(&quotes, &[ScreenCriterion::TopGainers], None);
/// assert_eq!(gainers[0].symbol, "A");
/// ```
pub fn screen(
    quotes: &[Quote],
    criteria: &[ScreenCriterion],
    sector_allow_list: Option<&HashSet<String>>,
) -> Vec<Quote> {
    let sectors = sector_allow_list.filter(|s| !s.is_empty());

    quotes
        .iter()
        .filter(|quote| {
            let (volume, change) = match quote.required_fields() {
                Ok(fields) => fields,
                Err(e) => {
                    tracing::debug!("Skipping quote: {}", e);
                    return false;
                }
            };

            if let Some(allowed) = sectors {
                match &quote.sector {
                    Some(sector) if allowed.contains(sector) => {}
                    _ => return false,
                }
            }

            criteria.iter().all(|c| c.matches(volume, change))
        })
        .cloned()
        .collect()
}

/// Rank quotes by the size of their percentage change.
///
/// `Descending` considers only gainers (change > 0) and `Ascending` only
/// losers (change < 0). Entries are ordered by absolute change, largest
/// first; ties keep their input order.
///
/// # Example
///
/// ```rust
/// use blockvista_core::{top_by_change, Direction, Quote};
///
/// let quotes = vec![
///     Quote::new("A", 1.0, 5.0, 1),
///     Quote::new("B", 1.0, -8.0, 1),
///     Quote::new("C", 1.0, 3.0, 1),
/// ];
/// let top: Vec<_> = top_by_change(&quotes, 2, Direction::Descending)
///     .into_iter()
///     .map(|q| q.symbol)
///     .collect();
/// assert_eq!(top, vec!["A", "C"]);
/// ```
pub fn top_by_change(quotes: &[Quote], n: usize, direction: Direction) -> Vec<Quote> {
    let mut ranked: Vec<(f64, &Quote)> = quotes
        .iter()
        .filter_map(|quote| match quote.required_fields() {
            Ok((_, change)) => Some((change, quote)),
            Err(e) => {
                tracing::debug!("Skipping quote: {}", e);
                None
            }
        })
        .filter(|(change, _)| match direction {
            Direction::Descending => *change > 0.0,
            Direction::Ascending => *change < 0.0,
        })
        .collect();

    // sort_by is stable, so equal magnitudes keep input order
    ranked.sort_by(|a, b| b.0.abs().total_cmp(&a.0.abs()));

    ranked
        .into_iter()
        .take(n)
        .map(|(_, quote)| quote.clone())
        .collect()
}

/// A complete screener pass as configured on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenRequest {
    /// Criteria applied conjunctively
    #[serde(default)]
    pub criteria: Vec<ScreenCriterion>,
    /// Sector allow-list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<HashSet<String>>,
    /// Size of the top gainers leaderboard
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}

impl Default for ScreenRequest {
    fn default() -> Self {
        Self {
            criteria: Vec::new(),
            sectors: None,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

/// Result of a [`ScreenRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenOutcome {
    /// Quotes matching the request, in input order
    pub matches: Vec<Quote>,
    /// Largest gainers among the matches
    pub top_gainers: Vec<Quote>,
}

impl ScreenRequest {
    /// Create a request with the given criteria.
    pub fn new(criteria: Vec<ScreenCriterion>) -> Self {
        Self {
            criteria,
            ..Default::default()
        }
    }

    /// Restrict the request to the given sectors.
    pub fn with_sectors<I, S>(mut self, sectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sectors = Some(sectors.into_iter().map(Into::into).collect());
        self
    }

    /// Set the leaderboard size.
    pub fn with_leaderboard_size(mut self, size: usize) -> Self {
        self.leaderboard_size = size;
        self
    }

    /// Screen the quotes and build the top gainers leaderboard from the matches.
    pub fn run(&self, quotes: &[Quote]) -> ScreenOutcome {
        let matches = screen(quotes, &self.criteria, self.sectors.as_ref());
        let top_gainers = top_by_change(&matches, self.leaderboard_size, Direction::Descending);

        tracing::debug!(
            input = quotes.len(),
            matched = matches.len(),
            "Screen pass complete"
        );

        ScreenOutcome {
            matches,
            top_gainers,
        }
    }
}
