pub mod analyzer;
pub mod assessor;
pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod narrative;
pub mod patterns;
pub mod prompts;
pub mod scoring;

// Re-export commonly used types
pub use analyzer::{DocumentAnalyzer, Signal, SignalSource, TextAnalyzer, document_fallback, text_fallback};
pub use assessor::{FraudAssessor, FraudAssessorBuilder};
pub use backend::{
    DocumentAnalysis, DocumentAnalysisBackend, NarrativeBackend, TextAnalysis, TextAnalysisBackend,
};
pub use config::AssessorConfig;
pub use error::{AnalyzerError, FraudError, Result};
pub use model::{
    ClaimContext, ClaimMetadata, DocumentJudgment, DocumentRef, FraudAnalysisResult,
    PatternFindings, Recommendation, RiskLevel, TextJudgment, UserHistory, Verdict,
};
pub use narrative::{NarrativeGenerator, fallback_narrative};
pub use patterns::analyze_patterns;
pub use scoring::{aggregate, classify, score_claim};
