use analysis_core::Bar;
use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSet;

/// Latest value of every indicator for one symbol.
///
/// A field is `None` only when the history was too short for that indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub ema_20: Option<f64>,
    pub ema_50: Option<f64>,
    /// EMA-50 `ema_slope_lookback` bars before the latest one.
    pub ema_50_prior: Option<f64>,
    pub ema_200: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub momentum: Option<f64>,
    pub volatility: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn from_indicators(indicators: &IndicatorSet, bars: &[Bar], slope_lookback: usize) -> Self {
        Self {
            close: bars.last().map(|b| b.close),
            rsi: indicators.rsi.latest(),
            macd_line: indicators.macd.macd_line.last().copied(),
            macd_signal: indicators.macd.signal_line.last().copied(),
            macd_histogram: indicators.macd.histogram.last().copied(),
            ema_20: indicators.ema_20.latest(),
            ema_50: indicators.ema_50.latest(),
            ema_50_prior: indicators.ema_50.back(slope_lookback),
            ema_200: indicators.ema_200.latest(),
            sma_20: indicators.sma_20.latest(),
            sma_50: indicators.sma_50.latest(),
            sma_200: indicators.sma_200.latest(),
            bollinger_upper: indicators.bollinger.upper.last().copied(),
            bollinger_middle: indicators.bollinger.middle.last().copied(),
            bollinger_lower: indicators.bollinger.lower.last().copied(),
            momentum: indicators.momentum.latest(),
            volatility: indicators.volatility.latest(),
        }
    }

    /// True when the close sits above the upper Bollinger band.
    pub fn above_upper_band(&self) -> bool {
        matches!((self.close, self.bollinger_upper), (Some(c), Some(u)) if c > u)
    }

    /// True when the close sits below the lower Bollinger band.
    pub fn below_lower_band(&self) -> bool {
        matches!((self.close, self.bollinger_lower), (Some(c), Some(l)) if c < l)
    }
}
