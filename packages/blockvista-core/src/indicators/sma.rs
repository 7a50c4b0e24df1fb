//! Simple Moving Average (SMA) and Exponential Moving Average (EMA) indicators.

use super::ensure_finite;
use crate::types::IndicatorSeries;
use crate::{Error, Result};

/// Calculate Simple Moving Average.
///
/// # Arguments
///
/// * `data` - Price series
/// * `period` - Lookback period
///
/// # Returns
///
/// Series aligned with `data`. The first `period-1` values are `None`. A period
/// longer than the series is degenerate but valid and yields all `None`.
///
/// # Errors
///
/// `Error::InvalidPeriod` if `period` is zero, `Error::MalformedRow` if any
/// price is NaN or infinite.
///
/// # Example
///
/// ```rust
/// use blockvista_core::indicators::sma;
///
/// let prices = vec![10.0, 12.0, 14.0, 16.0, 18.0];
/// let sma_values = sma(&prices, 3).unwrap();
///
/// assert_eq!(sma_values, vec![None, None, Some(12.0), Some(14.0), Some(16.0)]);
/// ```
pub fn sma(data: &[f64], period: usize) -> Result<IndicatorSeries> {
    if period == 0 {
        return Err(Error::InvalidPeriod(period));
    }
    ensure_finite(data)?;

    let n = data.len();
    let mut result = vec![None; n];

    if period > n {
        tracing::debug!(period, len = n, "SMA window longer than series");
        return Ok(result);
    }

    for i in (period - 1)..n {
        let window = &data[i + 1 - period..=i];
        result[i] = Some(window.iter().sum::<f64>() / period as f64);
    }

    Ok(result)
}

/// Calculate Exponential Moving Average.
///
/// Uses the formula: EMA[i] = alpha * price[i] + (1 - alpha) * EMA[i-1]
/// where alpha = 2 / (period + 1), seeded with EMA[0] = price[0].
///
/// # Arguments
///
/// * `data` - Price series
/// * `period` - Span used to derive the smoothing factor
///
/// # Returns
///
/// Series aligned with `data`. Every position is defined.
///
/// # Errors
///
/// `Error::InvalidPeriod` if `period` is zero, `Error::MalformedRow` if any
/// price is NaN or infinite.
///
/// # Example
///
/// ```rust
/// use blockvista_core::indicators::ema;
///
/// let prices = vec![10.0, 11.0, 12.0, 11.0, 10.0, 11.0, 12.0, 13.0, 12.0, 11.0];
/// let ema_values = ema(&prices, 3).unwrap();
///
/// assert_eq!(ema_values[0], Some(10.0));
/// assert!(ema_values.iter().all(|v| v.is_some()));
/// ```
pub fn ema(data: &[f64], period: usize) -> Result<IndicatorSeries> {
    if period == 0 {
        return Err(Error::InvalidPeriod(period));
    }
    ensure_finite(data)?;

    let Some(&first) = data.first() else {
        return Ok(Vec::new());
    };

    let alpha = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(data.len());
    let mut prev = first;
    result.push(Some(prev));

    for &price in &data[1..] {
        prev = alpha * price + (1.0 - alpha) * prev;
        result.push(Some(prev));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3).unwrap();

        assert!(result[0].is_none());
        assert!(result[1].is_none());

        // SMA[2] = (1 + 2 + 3) / 3 = 2.0
        assert_relative_eq!(result[2].unwrap(), 2.0);
        // SMA[3] = (2 + 3 + 4) / 3 = 3.0
        assert_relative_eq!(result[3].unwrap(), 3.0);
        // SMA[4] = (3 + 4 + 5) / 3 = 4.0
        assert_relative_eq!(result[4].unwrap(), 4.0);
    }

    #[test]
    fn test_sma_dashboard_example() {
        let result = sma(&[10.0, 12.0, 14.0, 16.0, 18.0], 3).unwrap();
        assert_eq!(result, vec![None, None, Some(12.0), Some(14.0), Some(16.0)]);
    }

    #[test]
    fn test_sma_trailing_window_mean() {
        let data: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0).collect();
        let period = 7;
        let result = sma(&data, period).unwrap();

        for (i, value) in result.iter().enumerate() {
            if i < period - 1 {
                assert!(value.is_none());
            } else {
                let expected = data[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
                assert_relative_eq!(value.unwrap(), expected, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_sma_period_1() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 1).unwrap();

        // Period 1 SMA should equal the data
        for i in 0..data.len() {
            assert_eq!(result[i], Some(data[i]));
        }
    }

    #[test]
    fn test_sma_period_larger_than_data() {
        let data = vec![1.0, 2.0, 3.0];
        let result = sma(&data, 10).unwrap();

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|x| x.is_none()));
    }

    #[test]
    fn test_sma_zero_period() {
        assert!(matches!(sma(&[1.0, 2.0], 0), Err(Error::InvalidPeriod(0))));
    }

    #[test]
    fn test_sma_non_finite() {
        let data = vec![10.0, f64::NAN, 12.0, 13.0, 14.0];
        assert!(matches!(sma(&data, 2), Err(Error::MalformedRow(_))));
        assert!(matches!(
            sma(&[1.0, f64::INFINITY], 1),
            Err(Error::MalformedRow(_))
        ));
    }

    #[test]
    fn test_ema_basic() {
        let data = vec![10.0, 11.0, 12.0, 11.0, 10.0];
        let result = ema(&data, 3).unwrap();

        // EMA should start from first value
        assert_eq!(result[0], Some(10.0));

        // EMA should be between min and max
        for value in &result {
            let v = value.unwrap();
            assert!((10.0..=12.0).contains(&v));
        }
    }

    #[test]
    fn test_ema_recurrence() {
        let data: Vec<f64> = (0..30).map(|i| 50.0 + (i as f64 * 0.4).cos() * 5.0).collect();
        let period = 20;
        let alpha = 2.0 / (period as f64 + 1.0);
        let result = ema(&data, period).unwrap();

        assert_eq!(result[0], Some(data[0]));
        for i in 1..data.len() {
            let expected = alpha * data[i] + (1.0 - alpha) * result[i - 1].unwrap();
            assert_relative_eq!(result[i].unwrap(), expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_ema_responsiveness() {
        // When price jumps from 100 to 150, EMA moves faster than SMA
        let data: Vec<f64> = (0..20)
            .map(|i| if i < 10 { 100.0 } else { 150.0 })
            .collect();

        let sma_result = sma(&data, 5).unwrap();
        let ema_result = ema(&data, 5).unwrap();

        // Index 10: SMA window still holds four 100s, EMA weights the 150 more
        assert!(ema_result[10].unwrap() > sma_result[10].unwrap());
    }

    #[test]
    fn test_ema_zero_period() {
        assert!(matches!(ema(&[1.0], 0), Err(Error::InvalidPeriod(0))));
    }

    #[test]
    fn test_ema_period_larger_than_data() {
        let data = vec![1.0, 2.0, 3.0];
        let result = ema(&data, 10).unwrap();

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|x| x.is_some()));
        assert_eq!(result[0], Some(1.0));

        let alpha = 2.0 / 11.0;
        assert_relative_eq!(result[1].unwrap(), alpha * 2.0 + (1.0 - alpha) * 1.0);
    }

    #[test]
    fn test_ema_non_finite() {
        let data = vec![10.0, f64::NAN, 12.0, 13.0, 14.0];
        assert!(matches!(ema(&data, 3), Err(Error::MalformedRow(_))));
    }

    #[test]
    fn test_empty_data() {
        let data: Vec<f64> = vec![];
        assert!(sma(&data, 3).unwrap().is_empty());
        assert!(ema(&data, 3).unwrap().is_empty());
    }
}
