use analysis_core::AnalysisError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Tunables for the indicator battery and the classifiers built on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Indicator periods
    pub rsi_period: usize,               // 14
    pub macd_fast: usize,                // 12
    pub macd_slow: usize,                // 26
    pub macd_signal: usize,              // 9
    pub bollinger_period: usize,         // 20
    pub bollinger_k: f64,                // 2.0
    pub momentum_period: usize,          // 10
    pub volatility_period: usize,        // 20

    // Support / resistance
    pub level_lookback: usize,           // 30 bars
    pub level_threshold: f64,            // 0.02 (2% clustering distance)

    // Breakouts
    pub breakout_volume_period: usize,   // 20 bars of average volume
    pub breakout_threshold: f64,         // 0.03 (3% close-to-close move)
    pub breakout_significance: f64,      // 1.5x volume surge for a key event

    // Outlook
    pub outlook_margin: u32,             // lead needed over the other side
    pub ema_slope_lookback: usize,       // 3 bars
    pub volatility_amplify_threshold: f64, // 0.03
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_k: 2.0,
            momentum_period: 10,
            volatility_period: 20,
            level_lookback: 30,
            level_threshold: 0.02,
            breakout_volume_period: 20,
            breakout_threshold: 0.03,
            breakout_significance: 1.5,
            outlook_margin: 1,
            ema_slope_lookback: 3,
            volatility_amplify_threshold: 0.03,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `TA_*` environment variable that is set.
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let config = Self {
            rsi_period: env_or("TA_RSI_PERIOD", d.rsi_period)?,
            macd_fast: env_or("TA_MACD_FAST", d.macd_fast)?,
            macd_slow: env_or("TA_MACD_SLOW", d.macd_slow)?,
            macd_signal: env_or("TA_MACD_SIGNAL", d.macd_signal)?,
            bollinger_period: env_or("TA_BOLLINGER_PERIOD", d.bollinger_period)?,
            bollinger_k: env_or("TA_BOLLINGER_K", d.bollinger_k)?,
            momentum_period: env_or("TA_MOMENTUM_PERIOD", d.momentum_period)?,
            volatility_period: env_or("TA_VOLATILITY_PERIOD", d.volatility_period)?,
            level_lookback: env_or("TA_LEVEL_LOOKBACK", d.level_lookback)?,
            level_threshold: env_or("TA_LEVEL_THRESHOLD", d.level_threshold)?,
            breakout_volume_period: env_or("TA_BREAKOUT_VOLUME_PERIOD", d.breakout_volume_period)?,
            breakout_threshold: env_or("TA_BREAKOUT_THRESHOLD", d.breakout_threshold)?,
            breakout_significance: env_or("TA_BREAKOUT_SIGNIFICANCE", d.breakout_significance)?,
            outlook_margin: env_or("TA_OUTLOOK_MARGIN", d.outlook_margin)?,
            ema_slope_lookback: env_or("TA_EMA_SLOPE_LOOKBACK", d.ema_slope_lookback)?,
            volatility_amplify_threshold: env_or(
                "TA_VOLATILITY_AMPLIFY_THRESHOLD",
                d.volatility_amplify_threshold,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("momentum_period", self.momentum_period),
            ("volatility_period", self.volatility_period),
            ("breakout_volume_period", self.breakout_volume_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(AnalysisError::InvalidConfig(format!("{name} must be at least 1")));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(AnalysisError::InvalidConfig(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }

        let thresholds = [
            ("bollinger_k", self.bollinger_k),
            ("level_threshold", self.level_threshold),
            ("breakout_threshold", self.breakout_threshold),
            ("breakout_significance", self.breakout_significance),
            ("volatility_amplify_threshold", self.volatility_amplify_threshold),
        ];
        if let Some((name, value)) = thresholds.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }

        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
