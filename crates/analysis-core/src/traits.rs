use async_trait::async_trait;
use crate::{AnalysisError, Bar};

/// Trait for technical analysis engines
#[async_trait]
pub trait TechnicalAnalyzer: Send + Sync {
    type Report: Send;

    async fn analyze(&self, symbol: &str, bars: &[Bar]) -> Result<Self::Report, AnalysisError>;
}
