//! Series math and the classical indicator battery.
//!
//! Every indicator returns only the values it can define: a series computed
//! with warm-up `w` has `len(input) - w` entries and its index 0 belongs to
//! bar `w` of the input. Too little data gives an empty series, never an error.

use analysis_core::{closes, Bar};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// RS substitute denominator when the average loss is exactly zero.
const RSI_EPSILON: f64 = 1e-10;

/// Simple Moving Average. Warm-up `period - 1`.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    data.windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Exponential Moving Average. Warm-up `period - 1`, index-aligned with [`sma`].
///
/// The first value is the SMA of the first `period` inputs; after that
/// `ema = (x - prev) * 2 / (period + 1) + prev`.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len() - period + 1);
    let mut prev = data[..period].iter().sum::<f64>() / period as f64;
    result.push(prev);

    for &x in &data[period..] {
        prev = (x - prev) * multiplier + prev;
        result.push(prev);
    }

    result
}

/// Rolling population standard deviation. Warm-up `period - 1`.
pub fn rolling_std_dev(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    data.windows(period)
        .map(|w| {
            let mean = w.iter().sum::<f64>() / period as f64;
            let variance = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
            variance.sqrt()
        })
        .collect()
}

/// Relative Strength Index with Wilder smoothing. Warm-up `period`.
///
/// The first value uses the plain mean of the first `period` deltas. A window
/// with no movement at all reads 50; a window with gains and no losses
/// saturates just below 100.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = data
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip();

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut rsi_values = Vec::with_capacity(data.len() - period);
    rsi_values.push(rsi_from_averages(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        rsi_values.push(rsi_from_averages(avg_gain, avg_loss));
    }

    rsi_values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return 50.0;
    }

    let rs = avg_gain / if avg_loss == 0.0 { RSI_EPSILON } else { avg_loss };
    100.0 - (100.0 / (1.0 + rs))
}

/// MACD (Moving Average Convergence Divergence)
///
/// All three lines have the same length and share `offset`, so
/// `histogram[i] == macd_line[i] - signal_line[i]` at every index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// Bar index of the first entry: `slow + signal - 2`.
    pub offset: usize,
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(data: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdResult {
    let offset = (slow_period + signal_period).saturating_sub(2);
    if fast_period == 0
        || signal_period == 0
        || fast_period >= slow_period
        || data.len() < slow_period + signal_period
    {
        return MacdResult { offset, ..MacdResult::default() };
    }

    // Fast EMA starts slow - fast bars earlier than the slow one, so drop its
    // head to line both up on bar slow - 1.
    let ema_fast = ema(data, fast_period);
    let ema_slow = ema(data, slow_period);
    let full_line: Vec<f64> = ema_fast[slow_period - fast_period..]
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema(&full_line, signal_period);

    // Signal lags the MACD line by signal - 1 entries: trim the line's head.
    let macd_line = full_line[full_line.len() - signal_line.len()..].to_vec();
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        offset,
        macd_line,
        signal_line,
        histogram,
    }
}

/// Bollinger Bands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    /// Bar index of the first entry: `period - 1`.
    pub offset: usize,
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    /// `(upper, middle, lower)` for a bar of the input series.
    pub fn at_bar(&self, bar_index: usize) -> Option<(f64, f64, f64)> {
        let i = bar_index.checked_sub(self.offset)?;
        Some((*self.upper.get(i)?, *self.middle.get(i)?, *self.lower.get(i)?))
    }

    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }
}

pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let offset = period.saturating_sub(1);
    let middle = sma(data, period);
    let deviations = rolling_std_dev(data, period);

    let upper = middle.iter().zip(&deviations).map(|(m, sd)| m + std_dev * sd).collect();
    let lower = middle.iter().zip(&deviations).map(|(m, sd)| m - std_dev * sd).collect();

    BollingerBands {
        offset,
        upper,
        middle,
        lower,
    }
}

/// Momentum: `close[i] - close[i - period]`. Warm-up `period`.
pub fn momentum(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() <= period {
        return vec![];
    }

    data.iter()
        .zip(&data[period..])
        .map(|(past, current)| current - past)
        .collect()
}

/// Realized volatility: population std-dev of simple returns. Warm-up `period`.
pub fn volatility(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let returns: Vec<f64> = data.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    rolling_std_dev(&returns, period)
}

/// A computed indicator plus the bar index its first value belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub offset: usize,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn new(offset: usize, values: Vec<f64>) -> Self {
        Self { offset, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The value `bars_back` entries before the latest one.
    pub fn back(&self, bars_back: usize) -> Option<f64> {
        let idx = self.values.len().checked_sub(bars_back.checked_add(1)?)?;
        self.values.get(idx).copied()
    }

    /// Value for a bar index of the source price series.
    pub fn at_bar(&self, bar_index: usize) -> Option<f64> {
        let i = bar_index.checked_sub(self.offset)?;
        self.values.get(i).copied()
    }
}

/// Full indicator history for one symbol, for charting and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: IndicatorSeries,
    pub macd: MacdResult,
    pub ema_20: IndicatorSeries,
    pub ema_50: IndicatorSeries,
    pub ema_200: IndicatorSeries,
    pub sma_20: IndicatorSeries,
    pub sma_50: IndicatorSeries,
    pub sma_200: IndicatorSeries,
    pub bollinger: BollingerBands,
    pub momentum: IndicatorSeries,
    pub volatility: IndicatorSeries,
}

/// Compute every indicator over the closes of `bars`.
///
/// Callers are expected to have validated the series.
pub fn compute_indicators(bars: &[Bar], config: &EngineConfig) -> IndicatorSet {
    let closes = closes(bars);

    let moving = |f: fn(&[f64], usize) -> Vec<f64>, period: usize| {
        IndicatorSeries::new(period - 1, f(&closes, period))
    };

    IndicatorSet {
        rsi: IndicatorSeries::new(config.rsi_period, rsi(&closes, config.rsi_period)),
        macd: macd(&closes, config.macd_fast, config.macd_slow, config.macd_signal),
        ema_20: moving(ema, 20),
        ema_50: moving(ema, 50),
        ema_200: moving(ema, 200),
        sma_20: moving(sma, 20),
        sma_50: moving(sma, 50),
        sma_200: moving(sma, 200),
        bollinger: bollinger_bands(&closes, config.bollinger_period, config.bollinger_k),
        momentum: IndicatorSeries::new(
            config.momentum_period,
            momentum(&closes, config.momentum_period),
        ),
        volatility: IndicatorSeries::new(
            config.volatility_period,
            volatility(&closes, config.volatility_period),
        ),
    }
}
