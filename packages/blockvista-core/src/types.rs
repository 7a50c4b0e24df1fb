//! Core data types for the BlockVista terminal.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indicator output aligned position-for-position with its input series.
///
/// `None` marks a position without enough window history.
pub type IndicatorSeries = Vec<Option<f64>>;

/// A single OHLCV candle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    /// Candle open time
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// Highest traded price
    pub high: f64,
    /// Lowest traded price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: u64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Raw candle row as delivered by the market-data feed.
///
/// Every field is optional; conversion into a [`PricePoint`] enforces presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandleRecord {
    #[serde(default, alias = "date")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<u64>,
}

impl TryFrom<CandleRecord> for PricePoint {
    type Error = Error;

    fn try_from(record: CandleRecord) -> Result<Self> {
        let timestamp = record
            .timestamp
            .ok_or_else(|| Error::MalformedRow("candle without timestamp".to_string()))?;

        let price = |value: Option<f64>, field: &str| -> Result<f64> {
            match value {
                Some(v) if v.is_finite() => Ok(v),
                Some(v) => Err(Error::MalformedRow(format!(
                    "candle at {timestamp}: non-finite {field} ({v})"
                ))),
                None => Err(Error::MalformedRow(format!(
                    "candle at {timestamp}: missing {field}"
                ))),
            }
        };

        Ok(Self {
            timestamp,
            open: price(record.open, "open")?,
            high: price(record.high, "high")?,
            low: price(record.low, "low")?,
            close: price(record.close, "close")?,
            volume: record.volume.ok_or_else(|| {
                Error::MalformedRow(format!("candle at {timestamp}: missing volume"))
            })?,
        })
    }
}

/// A price history ordered strictly ascending by timestamp.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series, rejecting out-of-order or duplicate timestamps.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if let Some(index) = points
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(Error::UnorderedSeries { index: index + 1 });
        }
        Ok(Self { points })
    }

    /// Create a series by sorting the points and collapsing duplicate timestamps.
    ///
    /// When several points share a timestamp, the last one in input order wins.
    pub fn normalized(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.timestamp == point.timestamp => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    /// Build a series from raw feed rows.
    ///
    /// A single malformed row fails the whole series, since dropping it would
    /// shift every later indicator value out of alignment.
    pub fn from_records(records: Vec<CandleRecord>) -> Result<Self> {
        let points = records
            .into_iter()
            .map(PricePoint::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(points)
    }

    /// Get the underlying points.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of candles.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no candles.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.volume).collect()
    }
}

/// A point-in-time market snapshot for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Trading symbol (uppercase)
    pub symbol: String,
    /// Last traded price
    pub last_price: f64,
    /// Change since previous close, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    /// Traded volume for the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    /// Open interest (derivatives only)
    #[serde(default, alias = "oi", skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<u64>,
    /// Sector, `None` when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl Quote {
    /// Create a quote with the fields the screener requires.
    pub fn new(symbol: &str, last_price: f64, change: f64, volume: u64) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            last_price,
            change: Some(change),
            volume: Some(volume),
            open_interest: None,
            sector: None,
        }
    }

    /// Set the sector.
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Set the open interest.
    pub fn with_open_interest(mut self, open_interest: u64) -> Self {
        self.open_interest = Some(open_interest);
        self
    }

    /// Return `(volume, change)`, or `MalformedRow` if either is missing or
    /// the change is not a finite number.
    pub fn required_fields(&self) -> Result<(u64, f64)> {
        let volume = self
            .volume
            .ok_or_else(|| Error::MalformedRow(format!("{}: missing volume", self.symbol)))?;
        match self.change {
            Some(change) if change.is_finite() => Ok((volume, change)),
            Some(change) => Err(Error::MalformedRow(format!(
                "{}: non-finite change ({change})",
                self.symbol
            ))),
            None => Err(Error::MalformedRow(format!(
                "{}: missing change",
                self.symbol
            ))),
        }
    }
}

/// A single screening rule. A set of criteria is applied conjunctively.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenCriterion {
    /// Session volume at or above `min_volume`
    HighVolume { min_volume: u64 },
    /// Strictly positive change
    TopGainers,
    /// Strictly negative change
    TopLosers,
}

impl ScreenCriterion {
    /// Check the criterion against a quote's validated fields.
    pub fn matches(&self, volume: u64, change: f64) -> bool {
        match *self {
            ScreenCriterion::HighVolume { min_volume } => volume >= min_volume,
            ScreenCriterion::TopGainers => change > 0.0,
            ScreenCriterion::TopLosers => change < 0.0,
        }
    }

    /// Display label as shown in the screener's criteria picker.
    pub fn label(&self) -> &'static str {
        match self {
            ScreenCriterion::HighVolume { .. } => "High Volume",
            ScreenCriterion::TopGainers => "Top Gainers",
            ScreenCriterion::TopLosers => "Top Losers",
        }
    }
}

/// Ranking direction for leaderboards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Most negative change first (losers)
    Ascending,
    /// Most positive change first (gainers)
    Descending,
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
