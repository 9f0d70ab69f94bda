use std::time::Duration;

use thiserror::Error;

/// Errors surfaced to callers of the assessment engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FraudError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failure of a single backend call.
///
/// Never leaves the engine: every variant is replaced by the fallback value
/// of the signal that failed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyzerError {
    #[error("Backend call failed: {0}")]
    Backend(String),

    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Backend returned an unusable response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, FraudError>;
