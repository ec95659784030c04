use analysis_core::Bar;
use serde::{Deserialize, Serialize};

use crate::indicators::BollingerBands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakoutDirection {
    Up,
    Down,
    None,
}

/// Breakout state of one bar. `strength` is the bar's volume relative to the
/// preceding average; it is 0 when there is no breakout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakoutEvent {
    /// Bar index in the source price series.
    pub index: usize,
    pub direction: BreakoutDirection,
    pub strength: f64,
}

impl BreakoutEvent {
    pub fn is_breakout(&self) -> bool {
        self.direction != BreakoutDirection::None
    }
}

/// Flag bars whose close escapes the Bollinger envelope on a sharp move.
///
/// One event is emitted per bar that has both a band value and
/// `volume_period` preceding bars to average volume over. Up: close above
/// the upper band and more than `threshold` above the previous close. Down
/// mirrors it against the lower band.
pub fn detect_breakouts(
    bars: &[Bar],
    bands: &BollingerBands,
    volume_period: usize,
    threshold: f64,
) -> Vec<BreakoutEvent> {
    if volume_period == 0 || bands.is_empty() {
        return vec![];
    }

    let start = volume_period.max(bands.offset).max(1);
    let mut events = Vec::with_capacity(bars.len().saturating_sub(start));

    for index in start..bars.len() {
        let Some((upper, _, lower)) = bands.at_bar(index) else {
            break;
        };
        let bar = &bars[index];
        let prev_close = bars[index - 1].close;

        let avg_volume = bars[index - volume_period..index]
            .iter()
            .map(|b| b.volume)
            .sum::<f64>()
            / volume_period as f64;
        let volume_ratio = if avg_volume > 0.0 { bar.volume / avg_volume } else { 1.0 };

        let event = if bar.close > upper && bar.close > prev_close * (1.0 + threshold) {
            BreakoutEvent { index, direction: BreakoutDirection::Up, strength: volume_ratio }
        } else if bar.close < lower && bar.close < prev_close * (1.0 - threshold) {
            BreakoutEvent { index, direction: BreakoutDirection::Down, strength: volume_ratio }
        } else {
            BreakoutEvent { index, direction: BreakoutDirection::None, strength: 0.0 }
        };
        events.push(event);
    }

    events
}
