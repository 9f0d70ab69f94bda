//! Adapters around the external backends.
//!
//! Each adapter makes at most one backend call, bounds it with a timeout and
//! turns any failure into the fixed fallback value for its signal.

use std::future::Future;
use std::time::Duration;

use crate::error::AnalyzerError;

pub mod document;
pub mod text;

pub use document::{DocumentAnalyzer, document_fallback};
pub use text::{TextAnalyzer, text_fallback};

/// Where a signal value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    Backend,
    Fallback,
}

/// A judgment together with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Signal<T> {
    pub value: T,
    pub source: SignalSource,
}

impl<T> Signal<T> {
    pub fn from_backend(value: T) -> Self {
        Self {
            value,
            source: SignalSource::Backend,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: SignalSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == SignalSource::Fallback
    }
}

/// Run `call` with a deadline, mapping expiry to [`AnalyzerError::Timeout`].
pub(crate) async fn call_with_timeout<T, F>(limit: Duration, call: F) -> Result<T, AnalyzerError>
where
    F: Future<Output = Result<T, AnalyzerError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AnalyzerError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expiry_becomes_timeout_error() {
        let limit = Duration::from_millis(50);
        let result: Result<(), AnalyzerError> = call_with_timeout(limit, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(AnalyzerError::Timeout(limit)));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let result = call_with_timeout(Duration::from_secs(1), async { Ok::<_, AnalyzerError>(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
