//! Short- and long-term directional outlook from the latest indicator values.
//!
//! Each rule adds points to the bullish or bearish side; a missing indicator
//! adds nothing. The outlook leans one way only when that side leads by more
//! than `margin` points.

use analysis_core::Outlook;

use crate::snapshot::IndicatorSnapshot;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointTally {
    pub bullish: u32,
    pub bearish: u32,
}

impl PointTally {
    /// `value` above `reference` is bullish, below is bearish, equal or missing scores nothing.
    fn compare(&mut self, value: Option<f64>, reference: Option<f64>, points: u32) {
        if let (Some(v), Some(r)) = (value, reference) {
            if v > r {
                self.bullish += points;
            } else if v < r {
                self.bearish += points;
            }
        }
    }

    pub fn classify(&self, margin: u32) -> Outlook {
        if self.bullish > self.bearish + margin {
            Outlook::Bullish
        } else if self.bearish > self.bullish + margin {
            Outlook::Bearish
        } else {
            Outlook::Neutral
        }
    }
}

/// Points for the 1-7 day horizon.
pub fn short_term_points(s: &IndicatorSnapshot) -> PointTally {
    let mut tally = PointTally::default();

    // RSI extremes read as mean reversion
    if let Some(rsi) = s.rsi {
        if rsi > RSI_OVERBOUGHT {
            tally.bearish += 1;
        } else if rsi < RSI_OVERSOLD {
            tally.bullish += 1;
        }
    }

    tally.compare(s.macd_histogram, Some(0.0), 1);
    tally.compare(s.close, s.ema_20, 1);
    tally.compare(s.close, s.ema_50, 1);

    if s.above_upper_band() {
        tally.bearish += 1;
    } else if s.below_lower_band() {
        tally.bullish += 1;
    }

    tally.compare(s.momentum, Some(0.0), 1);
    tally
}

/// Points for the 30-90 day horizon.
///
/// Volatility above `volatility_threshold` adds a point to whichever side is
/// already ahead and never breaks a tie.
pub fn long_term_points(s: &IndicatorSnapshot, volatility_threshold: f64) -> PointTally {
    let mut tally = PointTally::default();

    tally.compare(s.close, s.ema_200, 2);
    tally.compare(s.close, s.sma_200, 2);
    tally.compare(s.ema_50, s.ema_50_prior, 1);

    if s.volatility.is_some_and(|v| v > volatility_threshold) {
        if tally.bullish > tally.bearish {
            tally.bullish += 1;
        } else if tally.bearish > tally.bullish {
            tally.bearish += 1;
        }
    }

    tally
}

pub fn short_term_outlook(snapshot: &IndicatorSnapshot, margin: u32) -> Outlook {
    short_term_points(snapshot).classify(margin)
}

pub fn long_term_outlook(snapshot: &IndicatorSnapshot, margin: u32, volatility_threshold: f64) -> Outlook {
    long_term_points(snapshot, volatility_threshold).classify(margin)
}
