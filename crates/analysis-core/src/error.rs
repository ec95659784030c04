use thiserror::Error;

/// Invalid price history, detected before any indicator is computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("bar {index}: {field} is not a finite number")]
    NonFinite { index: usize, field: &'static str },

    #[error("bar {index}: {field} must be positive, got {value}")]
    NonPositivePrice {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("bar {index}: volume must not be negative, got {value}")]
    NegativeVolume { index: usize, value: f64 },

    #[error("bar {index}: timestamp is not after the previous bar")]
    NonAscendingDates { index: usize },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid data: {0}")]
    InvalidData(#[from] DataError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
