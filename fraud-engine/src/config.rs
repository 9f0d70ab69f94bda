use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-call budget for every backend call
pub const DEFAULT_ANALYZER_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for a [`FraudAssessor`](crate::FraudAssessor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessorConfig {
    /// Upper bound for a single document, text or narrative backend call
    pub analyzer_timeout: Duration,
    /// When false the narrative backend is never called and the template is used
    pub narrative_enabled: bool,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            analyzer_timeout: DEFAULT_ANALYZER_TIMEOUT,
            narrative_enabled: true,
        }
    }
}

impl AssessorConfig {
    pub fn with_analyzer_timeout(mut self, timeout: Duration) -> Self {
        self.analyzer_timeout = timeout;
        self
    }

    pub fn with_narrative_enabled(mut self, enabled: bool) -> Self {
        self.narrative_enabled = enabled;
        self
    }
}
