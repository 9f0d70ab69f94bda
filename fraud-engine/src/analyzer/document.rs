use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, warn};

use super::{Signal, call_with_timeout};
use crate::backend::{DocumentAnalysis, DocumentAnalysisBackend};
use crate::model::{DocumentJudgment, DocumentRef};

pub const DOCUMENT_UNAVAILABLE_ISSUE: &str = "document analysis unavailable";
pub const TAMPERING_ISSUE: &str = "Possible document tampering detected";
pub const NOT_AUTHENTIC_ISSUE: &str = "Document authenticity could not be verified";

const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Neutral, low-confidence judgment used when the backend cannot answer
pub fn document_fallback(document_id: &str) -> DocumentJudgment {
    DocumentJudgment {
        document_id: document_id.to_string(),
        is_authentic: true,
        tampering_detected: false,
        confidence: FALLBACK_CONFIDENCE,
        issues: vec![DOCUMENT_UNAVAILABLE_ISSUE.to_string()],
    }
}

/// Per-document authenticity analysis with timeout and fallback
#[derive(Clone)]
pub struct DocumentAnalyzer {
    backend: Arc<dyn DocumentAnalysisBackend>,
    timeout: Duration,
}

impl DocumentAnalyzer {
    pub fn new(backend: Arc<dyn DocumentAnalysisBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Analyze a single document. Never fails.
    pub async fn analyze(&self, doc: &DocumentRef) -> Signal<DocumentJudgment> {
        let started = Instant::now();
        match call_with_timeout(self.timeout, self.backend.analyze(&doc.locator)).await {
            Ok(analysis) => {
                debug!(
                    document_id = %doc.id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    is_authentic = analysis.is_authentic,
                    tags = analysis.tags.len(),
                    "Document analysis completed"
                );
                Signal::from_backend(judgment_from_analysis(&doc.id, analysis))
            }
            Err(e) => {
                warn!(
                    document_id = %doc.id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Document analysis failed, using fallback judgment"
                );
                Signal::fallback(document_fallback(&doc.id))
            }
        }
    }

    /// Analyze every document concurrently, preserving input order.
    pub async fn analyze_all(&self, docs: &[DocumentRef]) -> Vec<Signal<DocumentJudgment>> {
        join_all(docs.iter().map(|doc| self.analyze(doc))).await
    }
}

/// Tags are descriptive only; tampering comes from the backend's explicit flag.
fn judgment_from_analysis(document_id: &str, analysis: DocumentAnalysis) -> DocumentJudgment {
    let tampering_detected = analysis.tampering_detected;

    let mut issues = Vec::new();
    if tampering_detected {
        issues.push(TAMPERING_ISSUE.to_string());
    }
    if !analysis.is_authentic {
        issues.push(NOT_AUTHENTIC_ISSUE.to_string());
    }

    let confidence = if analysis.confidence.is_nan() {
        FALLBACK_CONFIDENCE
    } else {
        analysis.confidence.clamp(0.0, 1.0)
    };

    DocumentJudgment {
        document_id: document_id.to_string(),
        is_authentic: analysis.is_authentic,
        tampering_detected,
        confidence,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use async_trait::async_trait;

    struct Fixed(Result<DocumentAnalysis, AnalyzerError>);

    #[async_trait]
    impl DocumentAnalysisBackend for Fixed {
        async fn analyze(&self, _locator: &str) -> Result<DocumentAnalysis, AnalyzerError> {
            self.0.clone()
        }
    }

    struct Hanging;

    #[async_trait]
    impl DocumentAnalysisBackend for Hanging {
        async fn analyze(&self, _locator: &str) -> Result<DocumentAnalysis, AnalyzerError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(AnalyzerError::Backend("unreachable".to_string()))
        }
    }

    fn doc(id: &str) -> DocumentRef {
        DocumentRef {
            id: id.to_string(),
            doc_type: "receipt".to_string(),
            locator: format!("https://docs.example.com/{}", id),
        }
    }

    fn analysis(is_authentic: bool, tampering_detected: bool, tags: &[&str]) -> DocumentAnalysis {
        DocumentAnalysis {
            is_authentic,
            tampering_detected,
            confidence: 0.93,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn analyzer(backend: impl DocumentAnalysisBackend + 'static) -> DocumentAnalyzer {
        DocumentAnalyzer::new(Arc::new(backend), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn authentic_document_has_no_issues() {
        let signal = analyzer(Fixed(Ok(analysis(true, false, &["receipt", "text"]))))
            .analyze(&doc("d1"))
            .await;
        assert!(!signal.is_fallback());
        assert_eq!(
            signal.value,
            DocumentJudgment {
                document_id: "d1".to_string(),
                is_authentic: true,
                tampering_detected: false,
                confidence: 0.93,
                issues: vec![],
            }
        );
    }

    #[tokio::test]
    async fn tampered_document_reports_fixed_issue() {
        let signal = analyzer(Fixed(Ok(analysis(false, true, &[]))))
            .analyze(&doc("d1"))
            .await;
        assert!(signal.value.tampering_detected);
        assert_eq!(signal.value.issues, vec![TAMPERING_ISSUE, NOT_AUTHENTIC_ISSUE]);
    }

    #[tokio::test]
    async fn tags_never_override_tampering_flag() {
        let tags = [
            "no tampering found",
            "unedited original scan",
            "not forged",
            "customer forgot signature",
            "Photoshopped region",
        ];
        for tag in tags {
            let signal = analyzer(Fixed(Ok(analysis(true, false, &[tag]))))
                .analyze(&doc("d1"))
                .await;
            assert!(!signal.value.tampering_detected, "tag {:?}", tag);
            assert!(signal.value.issues.is_empty(), "tag {:?}", tag);
        }
    }

    #[tokio::test]
    async fn explicit_flag_marks_tampering_on_authentic_document() {
        let signal = analyzer(Fixed(Ok(analysis(true, true, &["no tampering found"]))))
            .analyze(&doc("d1"))
            .await;
        assert!(signal.value.tampering_detected);
        assert!(signal.value.is_authentic);
        assert_eq!(signal.value.issues, vec![TAMPERING_ISSUE]);
    }

    #[tokio::test]
    async fn confidence_is_clamped() {
        let mut raw = analysis(true, false, &[]);
        raw.confidence = 4.2;
        let signal = analyzer(Fixed(Ok(raw))).analyze(&doc("d1")).await;
        assert_eq!(signal.value.confidence, 1.0);
    }

    #[tokio::test]
    async fn backend_error_yields_fallback_every_time() {
        let analyzer = analyzer(Fixed(Err(AnalyzerError::Backend("503".to_string()))));
        for _ in 0..3 {
            let signal = analyzer.analyze(&doc("d7")).await;
            assert!(signal.is_fallback());
            assert_eq!(signal.value, document_fallback("d7"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_yields_fallback() {
        let signal = analyzer(Hanging).analyze(&doc("d2")).await;
        assert!(signal.is_fallback());
        assert!(signal.value.is_authentic);
        assert_eq!(signal.value.confidence, 0.5);
        assert_eq!(signal.value.issues, vec![DOCUMENT_UNAVAILABLE_ISSUE]);
    }

    #[tokio::test]
    async fn analyze_all_keeps_order() {
        let docs = vec![doc("a"), doc("b"), doc("c")];
        let signals = analyzer(Fixed(Ok(analysis(true, false, &[]))))
            .analyze_all(&docs)
            .await;
        let ids: Vec<_> = signals.iter().map(|s| s.value.document_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
