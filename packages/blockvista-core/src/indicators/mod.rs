//! Technical indicators for charting and signal inspection.
//!
//! This module provides the indicators the historical chart overlays:
//!
//! - **SMA**: Simple Moving Average
//! - **EMA**: Exponential Moving Average
//! - **RSI**: Relative Strength Index
//!
//! Every indicator returns a series with the same length as its input so it
//! can be drawn directly over the source candles.

mod rsi;
mod sma;

pub use rsi::{
    rsi, rsi_default, rsi_zones, RsiZone, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD,
    DEFAULT_RSI_PERIOD,
};
pub use sma::{ema, sma};

use crate::types::{IndicatorSeries, PriceSeries};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default SMA period on the historical chart.
pub const DEFAULT_SMA_PERIOD: usize = 20;

/// Default EMA period on the historical chart.
pub const DEFAULT_EMA_PERIOD: usize = 20;

/// Reject inputs holding NaN or infinite prices.
fn ensure_finite(data: &[f64]) -> Result<()> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(Error::MalformedRow(format!(
            "non-finite price {} at index {}",
            data[index], index
        ))),
        None => Ok(()),
    }
}

/// An indicator selection with its lookback period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "period", rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
}

impl IndicatorKind {
    /// The dashboard's default selections: SMA 20, EMA 20, RSI 14.
    pub fn defaults() -> [IndicatorKind; 3] {
        [
            IndicatorKind::Sma(DEFAULT_SMA_PERIOD),
            IndicatorKind::Ema(DEFAULT_EMA_PERIOD),
            IndicatorKind::Rsi(DEFAULT_RSI_PERIOD),
        ]
    }

    /// Legend label, e.g. "SMA 20".
    pub fn label(&self) -> String {
        match self {
            IndicatorKind::Sma(period) => format!("SMA {period}"),
            IndicatorKind::Ema(period) => format!("EMA {period}"),
            IndicatorKind::Rsi(period) => format!("RSI {period}"),
        }
    }

    /// Compute this indicator over a raw value series.
    pub fn compute(&self, data: &[f64]) -> Result<IndicatorSeries> {
        match *self {
            IndicatorKind::Sma(period) => sma(data, period),
            IndicatorKind::Ema(period) => ema(data, period),
            IndicatorKind::Rsi(period) => rsi(data, period),
        }
    }
}

/// A computed indicator ready to overlay on a chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overlay {
    /// Which indicator was computed
    pub kind: IndicatorKind,
    /// Legend label
    pub label: String,
    /// Values aligned with the source candles
    pub values: IndicatorSeries,
}

/// Compute the requested indicators over a series' closing prices.
///
/// Fails on the first invalid selection; no partial overlay list is returned.
pub fn compute_overlays(series: &PriceSeries, kinds: &[IndicatorKind]) -> Result<Vec<Overlay>> {
    let closes = series.closes();

    kinds
        .iter()
        .map(|kind| -> Result<Overlay> {
            Ok(Overlay {
                kind: *kind,
                label: kind.label(),
                values: kind.compute(&closes)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricePoint;
    use chrono::{Duration, TimeZone, Utc};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c, c, c, c, 100))
            .collect();
        PriceSeries::new(points).unwrap()
    }

    #[test]
    fn test_indicator_labels() {
        let labels: Vec<String> = IndicatorKind::defaults().iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["SMA 20", "EMA 20", "RSI 14"]);
    }

    #[test]
    fn test_compute_overlays_aligned() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let overlays = compute_overlays(&series(&closes), &IndicatorKind::defaults()).unwrap();

        assert_eq!(overlays.len(), 3);
        for overlay in &overlays {
            assert_eq!(overlay.values.len(), closes.len());
        }
        assert_eq!(overlays[0].values, sma(&closes, 20).unwrap());
        assert_eq!(overlays[1].values, ema(&closes, 20).unwrap());
        assert_eq!(overlays[2].values, rsi(&closes, 14).unwrap());
    }

    #[test]
    fn test_compute_overlays_short_series() {
        let overlays =
            compute_overlays(&series(&[1.0, 2.0]), &[IndicatorKind::Sma(20)]).unwrap();
        assert_eq!(overlays[0].values, vec![None, None]);
    }

    #[test]
    fn test_compute_overlays_invalid_period_aborts() {
        let result = compute_overlays(
            &series(&[1.0, 2.0, 3.0]),
            &[IndicatorKind::Sma(2), IndicatorKind::Ema(0)],
        );
        assert!(matches!(result, Err(Error::InvalidPeriod(0))));
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(&[1.0, 2.0]).is_ok());
        assert!(ensure_finite(&[]).is_ok());
        assert!(matches!(
            ensure_finite(&[1.0, f64::INFINITY]),
            Err(Error::MalformedRow(msg)) if msg.contains("index 1")
        ));
    }

    #[test]
    fn test_indicator_kind_serde() {
        let json = serde_json::to_string(&IndicatorKind::Rsi(14)).unwrap();
        assert_eq!(json, r#"{"kind":"rsi","period":14}"#);
    }
}
