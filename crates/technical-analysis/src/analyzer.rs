use analysis_core::{validate_bars, AnalysisError, Bar, Outlook, TechnicalAnalyzer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anomaly::anomaly_score;
use crate::breakouts::{detect_breakouts, BreakoutEvent};
use crate::config::EngineConfig;
use crate::events::{extract_key_events, KeyEvent};
use crate::indicators::{compute_indicators, IndicatorSet};
use crate::levels::{find_levels, Level};
use crate::outlook::{long_term_outlook, short_term_outlook};
use crate::snapshot::IndicatorSnapshot;

/// Classification derived from the latest indicator values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub snapshot: IndicatorSnapshot,
    pub short_term_outlook: Outlook,
    pub long_term_outlook: Outlook,
    pub support_levels: Vec<Level>,
    pub resistance_levels: Vec<Level>,
    pub key_events: Vec<KeyEvent>,
    pub anomaly_score: u32,
}

/// Everything the engine derives from one symbol's price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub symbol: String,
    /// Timestamp of the latest bar.
    pub as_of: Option<DateTime<Utc>>,
    pub latest_close: Option<f64>,
    /// Latest close vs. the previous one, in percent.
    pub percent_change: f64,
    pub indicators: IndicatorSet,
    pub breakouts: Vec<BreakoutEvent>,
    pub summary: SignalSummary,
}

#[derive(Debug, Clone, Default)]
pub struct TechnicalAnalysisEngine {
    config: EngineConfig,
}

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `bars` and compute the full indicator history.
    pub fn indicators(&self, bars: &[Bar]) -> Result<IndicatorSet, AnalysisError> {
        self.config.validate()?;
        validate_bars(bars)?;
        Ok(compute_indicators(bars, &self.config))
    }

    /// Validate `bars` and compute the latest-value snapshot only.
    pub fn snapshot(&self, bars: &[Bar]) -> Result<IndicatorSnapshot, AnalysisError> {
        let indicators = self.indicators(bars)?;
        Ok(IndicatorSnapshot::from_indicators(
            &indicators,
            bars,
            self.config.ema_slope_lookback,
        ))
    }

    pub fn analyze_sync(&self, symbol: &str, bars: &[Bar]) -> Result<TechnicalReport, AnalysisError> {
        let indicators = self.indicators(bars)?;
        let cfg = &self.config;

        let snapshot = IndicatorSnapshot::from_indicators(&indicators, bars, cfg.ema_slope_lookback);
        let levels = find_levels(bars, cfg.level_lookback, cfg.level_threshold);
        let breakouts = detect_breakouts(
            bars,
            &indicators.bollinger,
            cfg.breakout_volume_period,
            cfg.breakout_threshold,
        );
        let key_events = extract_key_events(bars, &indicators, &breakouts, cfg.breakout_significance);

        let summary = SignalSummary {
            snapshot,
            short_term_outlook: short_term_outlook(&snapshot, cfg.outlook_margin),
            long_term_outlook: long_term_outlook(
                &snapshot,
                cfg.outlook_margin,
                cfg.volatility_amplify_threshold,
            ),
            support_levels: levels.support,
            resistance_levels: levels.resistance,
            key_events,
            anomaly_score: anomaly_score(&snapshot),
        };

        tracing::debug!(
            symbol,
            bars = bars.len(),
            short_term = summary.short_term_outlook.to_label(),
            long_term = summary.long_term_outlook.to_label(),
            anomaly_score = summary.anomaly_score,
            "technical report computed"
        );

        Ok(TechnicalReport {
            symbol: symbol.to_string(),
            as_of: bars.last().map(|b| b.timestamp),
            latest_close: snapshot.close,
            percent_change: percent_change(bars),
            indicators,
            breakouts,
            summary,
        })
    }
}

fn percent_change(bars: &[Bar]) -> f64 {
    match bars {
        [.., prev, latest] => (latest.close - prev.close) / prev.close * 100.0,
        _ => 0.0,
    }
}

#[async_trait]
impl TechnicalAnalyzer for TechnicalAnalysisEngine {
    type Report = TechnicalReport;

    async fn analyze(&self, symbol: &str, bars: &[Bar]) -> Result<TechnicalReport, AnalysisError> {
        self.analyze_sync(symbol, bars)
    }
}
