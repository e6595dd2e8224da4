pub mod amortization;
pub mod error;
pub mod income;
pub mod types;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "strategies")]
pub mod strategies;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::DealEngineError;
pub use types::*;

/// Standard result type for all deal-engine operations
pub type DealResult<T> = Result<T, DealEngineError>;
