use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result};

/// Reference to a document submitted with a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: String,
    /// Free-form document category, e.g. "receipt" or "police_report"
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Where the backend can fetch the content from (URL or data URI)
    pub locator: String,
}

/// Claim history of the user filing the claim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserHistory {
    pub total_claims: u32,
    pub recent_claims: u32,
    pub rejected_claims: u32,
    pub average_claim_amount: f64,
}

/// Everything the engine knows about one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimContext {
    pub claim_id: String,
    pub claim_type: String,
    pub amount: f64,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; anything else counts as unknown
    #[serde(default)]
    pub date_of_loss: String,
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    #[serde(default)]
    pub history: UserHistory,
}

impl ClaimContext {
    /// Reject claims the engine cannot score.
    pub fn validate(&self) -> Result<()> {
        if self.claim_id.trim().is_empty() {
            return Err(FraudError::InvalidInput("claim id is required".to_string()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(FraudError::InvalidInput(format!(
                "claim amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        if !self.history.average_claim_amount.is_finite()
            || self.history.average_claim_amount < 0.0
        {
            return Err(FraudError::InvalidInput(
                "average claim amount must be a non-negative number".to_string(),
            ));
        }
        for doc in &self.documents {
            if doc.id.trim().is_empty() {
                return Err(FraudError::InvalidInput("document id is required".to_string()));
            }
            if doc.locator.trim().is_empty() {
                return Err(FraudError::InvalidInput(format!(
                    "document {} has no content locator",
                    doc.id
                )));
            }
        }
        Ok(())
    }

    pub fn metadata(&self) -> ClaimMetadata<'_> {
        ClaimMetadata {
            claim_type: &self.claim_type,
            amount: self.amount,
            date_of_loss: &self.date_of_loss,
            location: &self.location,
        }
    }
}

/// Structured claim attributes handed to the text analyzer next to the description
#[derive(Debug, Clone, Copy)]
pub struct ClaimMetadata<'a> {
    pub claim_type: &'a str,
    pub amount: f64,
    pub date_of_loss: &'a str,
    pub location: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentJudgment {
    pub document_id: String,
    pub is_authentic: bool,
    pub tampering_detected: bool,
    pub confidence: f64,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextJudgment {
    /// 0.0 (benign) to 1.0 (highly suspicious)
    pub suspicion_score: f64,
    pub inconsistencies: Vec<String>,
    pub suspicious_patterns: Vec<String>,
}

/// Heuristic factors in detection order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFindings {
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Approve,
    Review,
    Reject,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::Review => "REVIEW",
            Recommendation::Reject => "REJECT",
        };
        f.write_str(s)
    }
}

/// Score plus the classification derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    pub confidence: f64,
}

/// Final, self-contained outcome of one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudAnalysisResult {
    pub claim_id: String,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    pub confidence: f64,
    pub risk_factors: Vec<String>,
    pub document_judgments: Vec<DocumentJudgment>,
    pub text_judgment: TextJudgment,
    pub pattern_findings: PatternFindings,
    pub narrative: String,
    pub analyzed_at: DateTime<Utc>,
}
