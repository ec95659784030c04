//! Additive "unusualness" score used to rank symbols against each other.
//!
//! The score only orders symbols; it has no meaning on its own.

use crate::snapshot::IndicatorSnapshot;

/// Score the latest indicator values. Missing indicators add nothing.
///
/// - RSI above 80 or below 20: +3; above 70 or below 30: +2
/// - |MACD histogram| above 0.5: +1, above 1.0: +1 more
/// - close outside either Bollinger band: +2
/// - volatility above 0.03: +1, above 0.05: +2 more
pub fn anomaly_score(s: &IndicatorSnapshot) -> u32 {
    let mut score = 0;

    if let Some(rsi) = s.rsi {
        if rsi > 80.0 || rsi < 20.0 {
            score += 3;
        } else if rsi > 70.0 || rsi < 30.0 {
            score += 2;
        }
    }

    if let Some(hist) = s.macd_histogram.map(f64::abs) {
        if hist > 0.5 {
            score += 1;
        }
        if hist > 1.0 {
            score += 1;
        }
    }

    if s.above_upper_band() || s.below_lower_band() {
        score += 2;
    }

    if let Some(vol) = s.volatility {
        if vol > 0.03 {
            score += 1;
        }
        if vol > 0.05 {
            score += 2;
        }
    }

    score
}
