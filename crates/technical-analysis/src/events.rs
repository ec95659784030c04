use analysis_core::Bar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breakouts::{BreakoutDirection, BreakoutEvent};
use crate::indicators::{IndicatorSeries, IndicatorSet};
use crate::outlook::{RSI_OVERBOUGHT, RSI_OVERSOLD};

/// Notable things that happened on the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyEvent {
    Breakout {
        direction: BreakoutDirection,
        strength: f64,
        price: f64,
        date: DateTime<Utc>,
    },
    GoldenCross {
        date: DateTime<Utc>,
    },
    DeathCross {
        date: DateTime<Utc>,
    },
    Overbought {
        value: f64,
        date: DateTime<Utc>,
    },
    Oversold {
        value: f64,
        date: DateTime<Utc>,
    },
}

/// Key events on the latest bar: a significant breakout (volume ratio above
/// `significance`), an SMA-50/SMA-200 cross, or RSI crossing into overbought
/// or oversold territory.
pub fn extract_key_events(
    bars: &[Bar],
    indicators: &IndicatorSet,
    breakouts: &[BreakoutEvent],
    significance: f64,
) -> Vec<KeyEvent> {
    let Some(latest) = bars.last() else {
        return vec![];
    };
    let date = latest.timestamp;
    let mut events = Vec::new();

    if let Some(b) = breakouts.last() {
        if b.index == bars.len() - 1 && b.is_breakout() && b.strength > significance {
            events.push(KeyEvent::Breakout {
                direction: b.direction,
                strength: b.strength,
                price: latest.close,
                date,
            });
        }
    }

    // Both SMAs end on the latest bar, so aligning from the back is exact.
    if let Some(((cur_50, prev_50), (cur_200, prev_200))) =
        last_two(&indicators.sma_50).zip(last_two(&indicators.sma_200))
    {
        if cur_50 > cur_200 && prev_50 <= prev_200 {
            events.push(KeyEvent::GoldenCross { date });
        } else if cur_50 < cur_200 && prev_50 >= prev_200 {
            events.push(KeyEvent::DeathCross { date });
        }
    }

    if let Some((cur, prev)) = last_two(&indicators.rsi) {
        if cur > RSI_OVERBOUGHT && prev <= RSI_OVERBOUGHT {
            events.push(KeyEvent::Overbought { value: cur, date });
        } else if cur < RSI_OVERSOLD && prev >= RSI_OVERSOLD {
            events.push(KeyEvent::Oversold { value: cur, date });
        }
    }

    events
}

fn last_two(series: &IndicatorSeries) -> Option<(f64, f64)> {
    Some((series.latest()?, series.back(1)?))
}
