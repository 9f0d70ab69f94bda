use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{Signal, call_with_timeout};
use crate::backend::{TextAnalysis, TextAnalysisBackend};
use crate::model::{ClaimMetadata, TextJudgment};
use crate::prompts::build_text_prompt;

pub const TEXT_UNAVAILABLE_FACTOR: &str = "text analysis unavailable";

const NEUTRAL_SUSPICION: f64 = 0.3;

/// Fixed neutral judgment used when the backend cannot answer
pub fn text_fallback() -> TextJudgment {
    TextJudgment {
        suspicion_score: NEUTRAL_SUSPICION,
        inconsistencies: Vec::new(),
        suspicious_patterns: Vec::new(),
    }
}

/// Narrative consistency analysis with timeout and fallback
#[derive(Clone)]
pub struct TextAnalyzer {
    backend: Arc<dyn TextAnalysisBackend>,
    timeout: Duration,
}

impl TextAnalyzer {
    pub fn new(backend: Arc<dyn TextAnalysisBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Analyze the claim description. Never fails.
    pub async fn analyze(&self, description: &str, metadata: &ClaimMetadata<'_>) -> Signal<TextJudgment> {
        let prompt = build_text_prompt(description, metadata);
        let started = Instant::now();

        match call_with_timeout(self.timeout, self.backend.analyze(&prompt)).await {
            Ok(analysis) => {
                let judgment = judgment_from_analysis(analysis);
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    suspicion_score = judgment.suspicion_score,
                    inconsistencies = judgment.inconsistencies.len(),
                    "Text analysis completed"
                );
                Signal::from_backend(judgment)
            }
            Err(e) => {
                warn!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Text analysis failed, using neutral fallback"
                );
                Signal::fallback(text_fallback())
            }
        }
    }
}

fn judgment_from_analysis(analysis: TextAnalysis) -> TextJudgment {
    let suspicion_score = analysis
        .suspicion_score
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 1.0))
        .unwrap_or(NEUTRAL_SUSPICION);

    TextJudgment {
        suspicion_score,
        inconsistencies: analysis.inconsistencies.unwrap_or_default(),
        suspicious_patterns: analysis.suspicious_patterns.unwrap_or_default(),
    }
}
