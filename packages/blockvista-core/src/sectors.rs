//! Symbol to sector lookup table.

use crate::types::Quote;
use crate::Result;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SectorRow {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Sector")]
    sector: String,
}

/// Sector assignments keyed by uppercase symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectorMap {
    sectors: HashMap<String, String>,
}

impl SectorMap {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a `Symbol,Sector` CSV.
    ///
    /// Rows with an empty symbol or sector are skipped. If a symbol appears
    /// more than once the first row wins.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut map = Self::new();

        for (line, row) in rdr.deserialize::<SectorRow>().enumerate() {
            let row = row?;
            if row.symbol.is_empty() || row.sector.is_empty() {
                tracing::warn!("Skipping incomplete sector row {}", line + 1);
                continue;
            }
            map.sectors
                .entry(row.symbol.to_uppercase())
                .or_insert(row.sector);
        }

        tracing::debug!("Loaded {} sector assignments", map.len());
        Ok(map)
    }

    /// Read a `Symbol,Sector` CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Assign a sector to a symbol.
    pub fn insert(&mut self, symbol: &str, sector: impl Into<String>) {
        self.sectors.insert(symbol.to_uppercase(), sector.into());
    }

    /// Look up the sector for a symbol.
    pub fn sector_of(&self, symbol: &str) -> Option<&str> {
        self.sectors.get(&symbol.to_uppercase()).map(String::as_str)
    }

    /// Distinct sector names, sorted.
    pub fn sectors(&self) -> Vec<String> {
        self.sectors
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Return copies of the quotes with sectors filled from this table.
    ///
    /// Symbols missing from the table end up with an unknown (`None`) sector.
    pub fn tag(&self, quotes: &[Quote]) -> Vec<Quote> {
        quotes
            .iter()
            .map(|quote| Quote {
                sector: self.sector_of(&quote.symbol).map(str::to_string),
                ..quote.clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "Symbol,Sector\nRELIANCE,Energy\ntcs, IT \nINFY,IT\n,Banking\nRELIANCE,Telecom\n";

    #[test]
    fn test_from_csv_reader() {
        let map = SectorMap::from_csv_reader(CSV.as_bytes()).unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.sector_of("TCS"), Some("IT"));
        assert_eq!(map.sector_of("tcs"), Some("IT"));
        // First row wins for duplicates
        assert_eq!(map.sector_of("RELIANCE"), Some("Energy"));
        assert_eq!(map.sector_of("HDFCBANK"), None);
    }

    #[test]
    fn test_sectors_sorted_unique() {
        let map = SectorMap::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(map.sectors(), vec!["Energy".to_string(), "IT".to_string()]);
    }

    #[test]
    fn test_from_csv_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let map = SectorMap::from_csv_path(file.path()).unwrap();
        assert_eq!(map.sector_of("INFY"), Some("IT"));
    }

    #[test]
    fn test_missing_file() {
        assert!(SectorMap::from_csv_path("/nonexistent/sectors.csv").is_err());
    }

    #[test]
    fn test_tag_quotes() {
        let mut map = SectorMap::new();
        map.insert("infy", "IT");

        let quotes = vec![
            Quote::new("INFY", 1500.0, 1.0, 10),
            Quote::new("ZOMATO", 160.0, 1.0, 10).with_sector("Stale"),
        ];
        let tagged = map.tag(&quotes);

        assert_eq!(tagged[0].sector.as_deref(), Some("IT"));
        assert_eq!(tagged[1].sector, None);
        assert_eq!(tagged[0].symbol, "INFY");
    }
}
