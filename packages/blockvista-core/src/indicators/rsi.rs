//! Relative Strength Index (RSI) indicator.

use super::ensure_finite;
use crate::types::IndicatorSeries;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI level below which a symbol is considered oversold.
pub const DEFAULT_OVERSOLD: f64 = 30.0;

/// RSI level above which a symbol is considered overbought.
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

/// Calculate RSI value from average gain and average loss.
///
/// A zero average loss clamps RS to 0 instead of producing an infinite ratio.
#[inline]
fn calculate_rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        0.0
    } else {
        avg_gain / avg_loss
    };
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate Relative Strength Index.
///
/// Formula:
/// 1. Calculate price changes (the first position has none)
/// 2. Separate gains and losses
/// 3. Average gains and losses over a trailing window of `period` changes
/// 4. RS = average_gain / average_loss, or 0 when average_loss is 0
/// 5. RSI = 100 - (100 / (1 + RS))
///
/// # Arguments
///
/// * `prices` - Price series (typically closing prices)
/// * `period` - Lookback period (typically 14)
///
/// # Returns
///
/// Series aligned with `prices`, in `[0, 100]`. The first `period` positions
/// are `None`; short input yields all `None`.
///
/// # Errors
///
/// `Error::InvalidPeriod` if `period` is zero, `Error::MalformedRow` if any
/// price is NaN or infinite.
///
/// # Example
///
/// ```rust
/// use blockvista_core::indicators::rsi;
///
/// let prices = vec![44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.5, 44.0, 43.5, 44.0,
///                   44.25, 44.0, 43.5, 44.0, 44.5, 44.25, 44.0];
/// let rsi_values = rsi(&prices, 14).unwrap();
///
/// assert!(rsi_values[13].is_none());
/// for value in rsi_values.iter().flatten() {
///     assert!(*value >= 0.0 && *value <= 100.0);
/// }
/// ```
pub fn rsi(prices: &[f64], period: usize) -> Result<IndicatorSeries> {
    if period == 0 {
        return Err(Error::InvalidPeriod(period));
    }
    ensure_finite(prices)?;

    let n = prices.len();
    let mut result = vec![None; n];

    // Need `period` price changes, i.e. period + 1 prices
    if n <= period {
        tracing::debug!(period, len = n, "RSI window longer than series");
        return Ok(result);
    }

    // gains[k] / losses[k] hold the change from prices[k] to prices[k + 1]
    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    for i in period..n {
        let window = i - period..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        result[i] = Some(calculate_rsi_value(avg_gain, avg_loss));
    }

    Ok(result)
}

/// Calculate RSI with the default 14-period lookback.
pub fn rsi_default(prices: &[f64]) -> Result<IndicatorSeries> {
    rsi(prices, DEFAULT_RSI_PERIOD)
}

/// Position of an RSI reading relative to the oversold/overbought guides.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

/// Classify RSI readings against oversold/overbought thresholds.
///
/// # Arguments
///
/// * `rsi_values` - Calculated RSI values
/// * `oversold` - Oversold threshold (typically 30)
/// * `overbought` - Overbought threshold (typically 70)
///
/// # Returns
///
/// One zone per reading; `None` where the reading itself is missing.
/// Values exactly on a threshold are neutral.
pub fn rsi_zones(
    rsi_values: &[Option<f64>],
    oversold: f64,
    overbought: f64,
) -> Vec<Option<RsiZone>> {
    rsi_values
        .iter()
        .map(|value| {
            value.map(|rsi| {
                if rsi < oversold {
                    RsiZone::Oversold
                } else if rsi > overbought {
                    RsiZone::Overbought
                } else {
                    RsiZone::Neutral
                }
            })
        })
        .collect()
}
