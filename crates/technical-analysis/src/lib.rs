pub mod analyzer;
pub mod anomaly;
pub mod breakouts;
pub mod config;
pub mod events;
pub mod indicators;
pub mod levels;
pub mod outlook;
pub mod scanner;
pub mod snapshot;

#[cfg(test)]
mod indicators_tests;

pub use analyzer::*;
pub use anomaly::anomaly_score;
pub use breakouts::*;
pub use config::EngineConfig;
pub use events::*;
pub use indicators::*;
pub use levels::*;
pub use outlook::*;
pub use scanner::*;
pub use snapshot::IndicatorSnapshot;
