use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::analyzer::call_with_timeout;
use crate::backend::NarrativeBackend;
use crate::model::{ClaimContext, DocumentJudgment, TextJudgment, Verdict};
use crate::prompts::build_narrative_prompt;

/// Deterministic explanation built from an already classified verdict
pub fn fallback_narrative(verdict: &Verdict) -> String {
    format!(
        "Risk score of {}/100 indicates {} risk. {} is recommended.",
        verdict.risk_score, verdict.risk_level, verdict.recommendation
    )
}

/// Explains an assessment, optionally through an external text generator
#[derive(Clone)]
pub struct NarrativeGenerator {
    backend: Option<Arc<dyn NarrativeBackend>>,
    timeout: Duration,
}

impl NarrativeGenerator {
    pub fn new(backend: Option<Arc<dyn NarrativeBackend>>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Template-only generator
    pub fn disabled() -> Self {
        Self {
            backend: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Produce the narrative. Never fails; falls back to the template.
    pub async fn narrate(
        &self,
        ctx: &ClaimContext,
        verdict: &Verdict,
        documents: &[DocumentJudgment],
        text: &TextJudgment,
        risk_factors: &[String],
    ) -> String {
        let Some(backend) = &self.backend else {
            return fallback_narrative(verdict);
        };

        let prompt = build_narrative_prompt(ctx, verdict, documents, text, risk_factors);
        let started = Instant::now();

        match call_with_timeout(self.timeout, backend.generate(&prompt)).await {
            Ok(narrative) if !narrative.trim().is_empty() => {
                debug!(
                    claim_id = %ctx.claim_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Narrative generated"
                );
                narrative.trim().to_string()
            }
            Ok(_) => {
                warn!(claim_id = %ctx.claim_id, "Narrative backend returned empty text, using template");
                fallback_narrative(verdict)
            }
            Err(e) => {
                warn!(
                    claim_id = %ctx.claim_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Narrative generation failed, using template"
                );
                fallback_narrative(verdict)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use crate::model::{Recommendation, RiskLevel, UserHistory};
    use async_trait::async_trait;

    struct Reply(Result<String, AnalyzerError>);

    #[async_trait]
    impl NarrativeBackend for Reply {
        async fn generate(&self, _prompt: &str) -> Result<String, AnalyzerError> {
            self.0.clone()
        }
    }

    fn verdict() -> Verdict {
        Verdict {
            risk_score: 62,
            risk_level: RiskLevel::High,
            recommendation: Recommendation::Review,
            confidence: 0.9,
        }
    }

    fn claim() -> ClaimContext {
        ClaimContext {
            claim_id: "CLM-3".to_string(),
            claim_type: "travel".to_string(),
            amount: 700.0,
            date_of_loss: String::new(),
            description: "Lost luggage".to_string(),
            location: String::new(),
            documents: vec![],
            history: UserHistory::default(),
        }
    }

    fn text() -> TextJudgment {
        TextJudgment {
            suspicion_score: 0.2,
            inconsistencies: vec![],
            suspicious_patterns: vec![],
        }
    }

    async fn narrate_with(generator: NarrativeGenerator) -> String {
        generator.narrate(&claim(), &verdict(), &[], &text(), &[]).await
    }

    #[test]
    fn template_uses_given_classification() {
        assert_eq!(
            fallback_narrative(&verdict()),
            "Risk score of 62/100 indicates HIGH risk. REVIEW is recommended."
        );
    }

    #[tokio::test]
    async fn disabled_generator_uses_template() {
        let narrative = narrate_with(NarrativeGenerator::disabled()).await;
        assert_eq!(narrative, fallback_narrative(&verdict()));
    }

    #[tokio::test]
    async fn backend_text_is_trimmed() {
        let backend: Arc<dyn NarrativeBackend> = Arc::new(Reply(Ok("  Elevated risk due to history.\n".to_string())));
        let narrative = narrate_with(NarrativeGenerator::new(Some(backend), Duration::from_secs(1))).await;
        assert_eq!(narrative, "Elevated risk due to history.");
    }

    #[tokio::test]
    async fn failure_or_blank_reply_uses_template() {
        for reply in [Err(AnalyzerError::Backend("down".to_string())), Ok("   ".to_string())] {
            let backend: Arc<dyn NarrativeBackend> = Arc::new(Reply(reply));
            let narrative =
                narrate_with(NarrativeGenerator::new(Some(backend), Duration::from_secs(1))).await;
            assert_eq!(narrative, fallback_narrative(&verdict()));
        }
    }
}
