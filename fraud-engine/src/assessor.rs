//! FraudAssessor – runs every signal source for one claim and composes the result.
//!
//! ## Flow
//! 1. Validate the [`ClaimContext`]; invalid claims fail fast with
//!    [`FraudError::InvalidInput`](crate::FraudError::InvalidInput) and no backend is called.
//! 2. Fan out: every document analysis and the text analysis run concurrently.
//!    Each call carries its own timeout and falls back to a fixed value on
//!    failure, so the join always completes.
//! 3. Pattern heuristics run synchronously.
//! 4. Aggregate → classify → narrate, in that order.
//!
//! Dropping the future returned by [`FraudAssessor::assess`] cancels the
//! outstanding backend calls; no partial result is ever produced.
//!
//! ## Sharing
//! `FraudAssessor` is cheap to clone (a handful of `Arc`s). Build it once at
//! startup and share it across requests:
//! ```rust,ignore
//! let assessor = FraudAssessor::builder(document_backend, text_backend)
//!     .narrative_backend(narrative_backend)
//!     .config(AssessorConfig::default())
//!     .build();
//!
//! let result = assessor.assess(&claim).await?;
//! ```

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    analyzer::{DocumentAnalyzer, TextAnalyzer, text::TEXT_UNAVAILABLE_FACTOR},
    backend::{DocumentAnalysisBackend, NarrativeBackend, TextAnalysisBackend},
    config::AssessorConfig,
    error::Result,
    model::{ClaimContext, DocumentJudgment, FraudAnalysisResult, PatternFindings, TextJudgment},
    narrative::NarrativeGenerator,
    patterns::analyze_patterns,
    scoring::score_claim,
};

/// Fraud assessment orchestrator
#[derive(Clone)]
pub struct FraudAssessor {
    documents: DocumentAnalyzer,
    text: TextAnalyzer,
    narrative: NarrativeGenerator,
}

impl FraudAssessor {
    pub fn builder(
        document_backend: Arc<dyn DocumentAnalysisBackend>,
        text_backend: Arc<dyn TextAnalysisBackend>,
    ) -> FraudAssessorBuilder {
        FraudAssessorBuilder::new(document_backend, text_backend)
    }

    /// Assess `ctx` using the current time for date based heuristics.
    pub async fn assess(&self, ctx: &ClaimContext) -> Result<FraudAnalysisResult> {
        self.assess_at(ctx, Utc::now()).await
    }

    /// Assess `ctx` as of `now`.
    pub async fn assess_at(
        &self,
        ctx: &ClaimContext,
        now: DateTime<Utc>,
    ) -> Result<FraudAnalysisResult> {
        if let Err(e) = ctx.validate() {
            warn!(claim_id = %ctx.claim_id, error = %e, "Rejecting claim before analysis");
            return Err(e);
        }

        let started = Instant::now();
        info!(
            claim_id = %ctx.claim_id,
            documents = ctx.documents.len(),
            narrative_enabled = self.narrative.is_enabled(),
            "Starting fraud assessment"
        );

        let metadata = ctx.metadata();
        let (document_signals, text_signal) = tokio::join!(
            self.documents.analyze_all(&ctx.documents),
            self.text.analyze(&ctx.description, &metadata),
        );

        let patterns = analyze_patterns(ctx, now);

        let text_degraded = text_signal.is_fallback();
        let degraded_documents = document_signals.iter().filter(|s| s.is_fallback()).count();
        let document_judgments: Vec<DocumentJudgment> =
            document_signals.into_iter().map(|s| s.value).collect();
        let text_judgment = text_signal.value;

        let verdict = score_claim(ctx, &document_judgments, &text_judgment, &patterns);
        let risk_factors =
            collect_risk_factors(&patterns, &text_judgment, &document_judgments, text_degraded);

        let narrative = self
            .narrative
            .narrate(ctx, &verdict, &document_judgments, &text_judgment, &risk_factors)
            .await;

        info!(
            claim_id = %ctx.claim_id,
            risk_score = verdict.risk_score,
            risk_level = %verdict.risk_level,
            recommendation = %verdict.recommendation,
            risk_factors = risk_factors.len(),
            degraded_documents,
            text_degraded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fraud assessment completed"
        );

        Ok(FraudAnalysisResult {
            claim_id: ctx.claim_id.clone(),
            risk_score: verdict.risk_score,
            risk_level: verdict.risk_level,
            recommendation: verdict.recommendation,
            confidence: verdict.confidence,
            risk_factors,
            document_judgments,
            text_judgment,
            pattern_findings: patterns,
            narrative,
            analyzed_at: now,
        })
    }
}

/// Union of pattern factors, suspicious text patterns and document issues,
/// deduplicated on first occurrence.
pub fn collect_risk_factors(
    patterns: &PatternFindings,
    text: &TextJudgment,
    documents: &[DocumentJudgment],
    text_degraded: bool,
) -> Vec<String> {
    let degraded_notice = text_degraded.then(|| TEXT_UNAVAILABLE_FACTOR.to_string());

    let candidates = patterns
        .risk_factors
        .iter()
        .chain(text.suspicious_patterns.iter())
        .chain(documents.iter().flat_map(|d| d.issues.iter()))
        .chain(degraded_notice.iter());

    let mut factors: Vec<String> = Vec::new();
    for factor in candidates {
        if !factors.contains(factor) {
            factors.push(factor.clone());
        }
    }
    factors
}

/// Builder for [`FraudAssessor`]
pub struct FraudAssessorBuilder {
    document_backend: Arc<dyn DocumentAnalysisBackend>,
    text_backend: Arc<dyn TextAnalysisBackend>,
    narrative_backend: Option<Arc<dyn NarrativeBackend>>,
    config: AssessorConfig,
}

impl FraudAssessorBuilder {
    pub fn new(
        document_backend: Arc<dyn DocumentAnalysisBackend>,
        text_backend: Arc<dyn TextAnalysisBackend>,
    ) -> Self {
        Self {
            document_backend,
            text_backend,
            narrative_backend: None,
            config: AssessorConfig::default(),
        }
    }

    pub fn narrative_backend(mut self, backend: Arc<dyn NarrativeBackend>) -> Self {
        self.narrative_backend = Some(backend);
        self
    }

    pub fn config(mut self, config: AssessorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> FraudAssessor {
        let timeout = self.config.analyzer_timeout;
        let narrative = match self.narrative_backend {
            Some(backend) if self.config.narrative_enabled => {
                NarrativeGenerator::new(Some(backend), timeout)
            }
            _ => NarrativeGenerator::disabled(),
        };

        FraudAssessor {
            documents: DocumentAnalyzer::new(self.document_backend, timeout),
            text: TextAnalyzer::new(self.text_backend, timeout),
            narrative,
        }
    }
}
