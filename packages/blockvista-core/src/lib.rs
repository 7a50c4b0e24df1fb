//! BlockVista Core - Indicator and screening library for the BlockVista terminal.
//!
//! This crate provides the computation layer behind the dashboard:
//!
//! - **Technical indicators**: SMA, EMA, RSI aligned to their input series
//! - **Screener**: Conjunctive quote filtering and top-by-change leaderboards
//! - **Sectors**: Symbol to sector lookup tables
//! - **Instruments**: Memoized token lookup and option-chain selection
//! - **Holdings**: P&L valuation of an uploaded holdings file
//!
//! # Example
//!
//! ```rust
//! use blockvista_core::{screen, sma, Quote, ScreenCriterion};
//!
//! let closes = vec![10.0, 12.0, 14.0, 16.0, 18.0];
//! let values = sma(&closes, 3).unwrap();
//! assert_eq!(values[2], Some(12.0));
//!
//! let quotes = vec![
//!     Quote::new("A", 101.0, 2.0, 500),
//!     Quote::new("B", 99.0, -1.0, 50),
//! ];
//! let matches = screen(&quotes, &[ScreenCriterion::HighVolume { min_volume: 100 }], None);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].symbol, "A");
//! ```

pub mod config;
pub mod holdings;
pub mod indicators;
pub mod instruments;
pub mod screener;
pub mod sectors;
pub mod types;
pub mod watchlist;

// Re-export commonly used types
pub use types::{
    ApiResponse, CandleRecord, Direction, IndicatorSeries, PricePoint, PriceSeries, Quote,
    ScreenCriterion,
};

// Re-export main functionality
pub use config::Settings;
pub use holdings::{value_holdings, Holding, HoldingValuation, PortfolioValuation};
pub use indicators::{
    compute_overlays, ema, rsi, rsi_default, rsi_zones, sma, IndicatorKind, Overlay, RsiZone,
};
pub use instruments::{option_chain, Instrument, InstrumentIndex, OptionChain};
pub use screener::{screen, top_by_change, ScreenOutcome, ScreenRequest};
pub use sectors::SectorMap;
pub use watchlist::parse_watchlist;

/// Error types for blockvista-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid period: {0} (window length must be positive)")]
    InvalidPeriod(usize),

    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Price series not strictly ascending at index {index}")]
    UnorderedSeries { index: usize },
}

/// Result type for blockvista-core operations.
pub type Result<T> = std::result::Result<T, Error>;
