//! signal-report: run the technical indicator engine over daily bar files.
//!
//! Each input is a JSON array of bars (`timestamp`, `open`, `high`, `low`,
//! `close`, `volume`); the file stem, uppercased, is the symbol.
//!
//! Usage:
//!   cargo run -p signal-report -- data/aapl.json
//!   cargo run -p signal-report -- --summary data/*.json
//!   cargo run -p signal-report -- --top 10 data/*.json

use analysis_core::{Bar, TechnicalAnalyzer};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use technical_analysis::{AnomalyScanner, EngineConfig, TechnicalAnalysisEngine};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signal_report=info,technical_analysis=warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let summary_only = args.iter().any(|a| a == "--summary");

    let top: Option<usize> = match args.iter().position(|a| a == "--top") {
        Some(i) => {
            let value = args.get(i + 1).context("--top needs a value")?;
            Some(value.parse().with_context(|| format!("invalid --top value: {}", value))?)
        }
        None => None,
    };

    let files: Vec<&String> = args
        .iter()
        .enumerate()
        .filter(|(i, a)| !a.starts_with("--") && !(*i > 0 && args[i - 1] == "--top"))
        .map(|(_, a)| a)
        .collect();

    if files.is_empty() {
        eprintln!("Usage:");
        eprintln!("  signal-report FILE...            Full report per symbol");
        eprintln!("  signal-report --summary FILE...  Latest-value summary only");
        eprintln!("  signal-report --top N FILE...    Rank symbols by anomaly score");
        eprintln!();
        eprintln!("Engine settings come from TA_* environment variables (see .env).");
        std::process::exit(1);
    }

    let config = EngineConfig::from_env()?;
    let universe = load_universe(&files)?;
    tracing::info!("signal-report: {} symbols loaded", universe.len());

    if let Some(top_n) = top {
        let result = AnomalyScanner::new(config).rank(&universe, top_n);
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let engine = TechnicalAnalysisEngine::with_config(config);
    let output = build_reports(&engine, &universe, summary_only).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Analyze every symbol in name order. A symbol whose data fails validation
/// is logged and listed under `skipped`; the rest are still reported.
async fn build_reports(
    engine: &TechnicalAnalysisEngine,
    universe: &HashMap<String, Vec<Bar>>,
    summary_only: bool,
) -> Result<serde_json::Value> {
    let mut symbols: Vec<&String> = universe.keys().collect();
    symbols.sort();

    let mut reports = Vec::with_capacity(symbols.len());
    let mut skipped = Vec::new();
    for symbol in symbols {
        let report = match engine.analyze(symbol, &universe[symbol]).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", symbol, e);
                skipped.push(symbol.clone());
                continue;
            }
        };
        tracing::info!(
            "{}: short-term {}, long-term {}, anomaly score {}",
            symbol,
            report.summary.short_term_outlook.to_label(),
            report.summary.long_term_outlook.to_label(),
            report.summary.anomaly_score
        );

        reports.push(if summary_only {
            serde_json::json!({ "symbol": report.symbol, "summary": report.summary })
        } else {
            serde_json::to_value(&report)?
        });
    }

    Ok(serde_json::json!({ "reports": reports, "skipped": skipped }))
}

fn load_universe(files: &[&String]) -> Result<HashMap<String, Vec<Bar>>> {
    let mut universe = HashMap::with_capacity(files.len());

    for file in files {
        let path = Path::new(file.as_str());
        let symbol = symbol_from_path(path)?;
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let bars = parse_bars(&raw).with_context(|| format!("failed to parse {}", path.display()))?;

        if universe.insert(symbol.clone(), bars).is_some() {
            bail!("duplicate symbol {} ({})", symbol, path.display());
        }
    }

    Ok(universe)
}

fn symbol_from_path(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .with_context(|| format!("cannot derive a symbol from {}", path.display()))?;
    Ok(stem.to_uppercase())
}

fn parse_bars(raw: &str) -> Result<Vec<Bar>> {
    Ok(serde_json::from_str(raw)?)
}
