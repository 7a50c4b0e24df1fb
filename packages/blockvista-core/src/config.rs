//! Terminal settings loaded from TOML.

use crate::indicators::{
    IndicatorKind, DEFAULT_EMA_PERIOD, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_RSI_PERIOD,
    DEFAULT_SMA_PERIOD,
};
use crate::instruments::DEFAULT_EXCHANGE;
use crate::screener::DEFAULT_LEADERBOARD_SIZE;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default minimum volume for the High Volume criterion.
pub const DEFAULT_MIN_VOLUME: u64 = 100_000;

/// Chart indicator defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_period: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
    /// RSI oversold guide line
    pub oversold: f64,
    /// RSI overbought guide line
    pub overbought: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_period: DEFAULT_SMA_PERIOD,
            ema_period: DEFAULT_EMA_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
        }
    }
}

/// Screener defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenerSettings {
    pub min_volume: u64,
    pub leaderboard_size: usize,
    pub exchange: String,
    /// `Symbol,Sector` CSV used to tag quotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectors_file: Option<PathBuf>,
}

impl Default for ScreenerSettings {
    fn default() -> Self {
        Self {
            min_volume: DEFAULT_MIN_VOLUME,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            exchange: DEFAULT_EXCHANGE.to_string(),
            sectors_file: None,
        }
    }
}

/// All terminal settings. Missing keys fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub indicators: IndicatorSettings,
    pub screener: ScreenerSettings,
}

impl Settings {
    /// Load settings from the default path, or defaults if no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Get the default settings file path.
    ///
    /// Default path: `<config dir>/blockvista/config.toml`
    /// Can be overridden with `BLOCKVISTA_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("BLOCKVISTA_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("blockvista/config.toml"))
            .unwrap_or_else(|| PathBuf::from("blockvista.toml"))
    }

    /// Load settings from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The chart indicators selected by these settings.
    pub fn indicator_kinds(&self) -> [IndicatorKind; 3] {
        [
            IndicatorKind::Sma(self.indicators.sma_period),
            IndicatorKind::Ema(self.indicators.ema_period),
            IndicatorKind::Rsi(self.indicators.rsi_period),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.indicators.sma_period, 20);
        assert_eq!(settings.indicators.rsi_period, 14);
        assert_eq!(settings.screener.min_volume, 100_000);
        assert_eq!(settings.screener.leaderboard_size, 10);
        assert_eq!(settings.screener.exchange, "NSE");
        assert_eq!(settings.indicator_kinds(), IndicatorKind::defaults());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[indicators]\nsma_period = 50\n\n[screener]\nsectors_file = \"sectors.csv\""
        )
        .unwrap();

        let settings = Settings::load_from_path(file.path()).unwrap();
        assert_eq!(settings.indicators.sma_period, 50);
        assert_eq!(settings.indicators.ema_period, 20);
        assert_eq!(settings.screener.min_volume, 100_000);
        assert_eq!(
            settings.screener.sectors_file,
            Some(PathBuf::from("sectors.csv"))
        );
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[indicators]\nsma_period = \"twenty\"").unwrap();
        assert!(matches!(
            Settings::load_from_path(file.path()),
            Err(crate::Error::Config(_))
        ));
    }
}
