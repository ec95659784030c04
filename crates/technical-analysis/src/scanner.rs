use std::cmp::Ordering;
use std::collections::HashMap;

use analysis_core::{Bar, Outlook};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analyzer::TechnicalAnalysisEngine;
use crate::config::EngineConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSymbol {
    pub symbol: String,
    pub anomaly_score: u32,
    pub latest_close: Option<f64>,
    pub percent_change: f64,
    pub short_term_outlook: Outlook,
    pub long_term_outlook: Outlook,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub ranked: Vec<RankedSymbol>,
    pub total_analyzed: usize,
    /// Symbols whose history failed validation.
    pub skipped: Vec<String>,
}

/// Ranks a universe of symbols by anomaly score.
#[derive(Debug, Clone, Default)]
pub struct AnomalyScanner {
    engine: TechnicalAnalysisEngine,
}

impl AnomalyScanner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: TechnicalAnalysisEngine::with_config(config),
        }
    }

    /// Score every symbol in parallel and keep the `top_n` highest.
    ///
    /// Ties are broken by symbol name so the ranking does not depend on map
    /// iteration order. Symbols with invalid data are logged and skipped.
    pub fn rank(&self, universe: &HashMap<String, Vec<Bar>>, top_n: usize) -> ScanResult {
        let total_analyzed = universe.len();
        tracing::info!("Scanning {} symbols for anomalies", total_analyzed);

        let results: Vec<(&String, Result<RankedSymbol, _>)> = universe
            .par_iter()
            .map(|(symbol, bars)| {
                let ranked = self.engine.analyze_sync(symbol, bars).map(|report| RankedSymbol {
                    symbol: report.symbol,
                    anomaly_score: report.summary.anomaly_score,
                    latest_close: report.latest_close,
                    percent_change: report.percent_change,
                    short_term_outlook: report.summary.short_term_outlook,
                    long_term_outlook: report.summary.long_term_outlook,
                });
                (symbol, ranked)
            })
            .collect();

        let mut ranked = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (symbol, result) in results {
            match result {
                Ok(r) => ranked.push(r),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", symbol, e);
                    skipped.push(symbol.clone());
                }
            }
        }
        skipped.sort();

        ranked.sort_by(|a, b| match b.anomaly_score.cmp(&a.anomaly_score) {
            Ordering::Equal => a.symbol.cmp(&b.symbol),
            other => other,
        });
        ranked.truncate(top_n);

        tracing::info!(
            "Scan complete: {}/{} symbols scored, returning top {}",
            total_analyzed - skipped.len(),
            total_analyzed,
            ranked.len()
        );

        ScanResult {
            ranked,
            total_analyzed,
            skipped,
        }
    }
}
