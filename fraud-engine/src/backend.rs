use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;

/// Raw authenticity judgment returned by a document backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub is_authentic: bool,
    pub tampering_detected: bool,
    pub confidence: f64,
    /// Free-form labels the backend attached to the document
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Raw text judgment returned by a text backend.
///
/// Every field is optional; the analyzer fills gaps with neutral values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAnalysis {
    pub suspicion_score: Option<f64>,
    pub inconsistencies: Option<Vec<String>>,
    pub suspicious_patterns: Option<Vec<String>>,
}

/// Judges whether a single submitted document looks genuine
#[async_trait]
pub trait DocumentAnalysisBackend: Send + Sync {
    /// Analyze the document found at `locator`
    async fn analyze(&self, locator: &str) -> Result<DocumentAnalysis, AnalyzerError>;
}

/// Judges the claim narrative for suspicion and inconsistencies
#[async_trait]
pub trait TextAnalysisBackend: Send + Sync {
    /// Analyze a fully rendered prompt describing the claim
    async fn analyze(&self, prompt: &str) -> Result<TextAnalysis, AnalyzerError>;
}

/// Produces a human readable explanation of an assessment
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AnalyzerError>;
}
