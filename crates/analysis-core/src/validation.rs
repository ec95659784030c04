//! Boundary checks for price histories.
//!
//! Every engine entry point runs [`validate_bars`] first so that corrupted
//! input fails loudly instead of leaking NaN into indicator output.

use crate::{Bar, DataError};

/// Check that a series is usable: finite positive prices, non-negative
/// volume, and strictly increasing timestamps. An empty series is valid.
pub fn validate_bars(bars: &[Bar]) -> Result<(), DataError> {
    for (index, bar) in bars.iter().enumerate() {
        for (field, value) in bar.prices() {
            if !value.is_finite() {
                return Err(DataError::NonFinite { index, field });
            }
            if value <= 0.0 {
                return Err(DataError::NonPositivePrice { index, field, value });
            }
        }

        if !bar.volume.is_finite() {
            return Err(DataError::NonFinite { index, field: "volume" });
        }
        if bar.volume < 0.0 {
            return Err(DataError::NegativeVolume { index, value: bar.volume });
        }

        if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
            return Err(DataError::NonAscendingDates { index });
        }
    }

    Ok(())
}
