use analysis_core::Bar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Support,
    Resistance,
}

/// A clustered pivot price and how many pivots landed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub price: f64,
    pub occurrences: usize,
    pub kind: LevelKind,
}

/// Support and resistance levels, each ranked by occurrences (descending).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
}

/// Find pivot-based levels in the last `lookback` bars.
///
/// A bar strictly below both neighbours' lows is a pivot low (support), one
/// strictly above both neighbours' highs a pivot high (resistance). A pivot
/// within `threshold` relative distance of an existing level of the same kind
/// bumps that level's count instead of opening a new one. Ties in the final
/// ranking keep discovery order. Fewer than `lookback` bars yields no levels.
pub fn find_levels(bars: &[Bar], lookback: usize, threshold: f64) -> SupportResistance {
    if lookback < 3 || bars.len() < lookback {
        return SupportResistance::default();
    }

    let recent = &bars[bars.len() - lookback..];
    let mut support = Vec::new();
    let mut resistance = Vec::new();

    for w in recent.windows(3) {
        let (prev, bar, next) = (&w[0], &w[1], &w[2]);
        if bar.low < prev.low && bar.low < next.low {
            add_level(&mut support, bar.low, LevelKind::Support, threshold);
        }
        if bar.high > prev.high && bar.high > next.high {
            add_level(&mut resistance, bar.high, LevelKind::Resistance, threshold);
        }
    }

    // sort_by is stable: equal counts stay in discovery order
    support.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    resistance.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));

    SupportResistance { support, resistance }
}

fn add_level(levels: &mut Vec<Level>, price: f64, kind: LevelKind, threshold: f64) {
    match levels
        .iter_mut()
        .find(|level| (level.price - price).abs() / price < threshold)
    {
        Some(level) => level.occurrences += 1,
        None => levels.push(Level {
            price,
            occurrences: 1,
            kind,
        }),
    }
}
