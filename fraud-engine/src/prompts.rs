//! Prompts sent to the text and narrative backends

use crate::model::{ClaimContext, ClaimMetadata, DocumentJudgment, TextJudgment, Verdict};

pub const TEXT_ANALYSIS_PROMPT: &str = r#"You are an insurance fraud analyst reviewing the written description of a claim.

ANALYZE THE DESCRIPTION AGAINST THE CLAIM DETAILS AND DETERMINE:
- How suspicious the description is, as a number between 0.0 (benign) and 1.0 (highly suspicious)
- Any inconsistencies between the description and the claim details
- Any language patterns commonly associated with fraudulent claims

Respond ONLY with this JSON:
{
  "suspicion_score": 0.0,
  "inconsistencies": ["..."],
  "suspicious_patterns": ["..."]
}
Use empty arrays when nothing applies. Do not mix text and JSON in your response.
"#;

pub const NARRATIVE_PROMPT: &str = r#"You are an insurance fraud analyst writing a short explanation of an automated risk assessment for a claims adjuster.
Write 2-4 plain sentences. Do not change the score, the risk level or the recommendation you are given.
Mention the most important risk factors. Do not use markdown."#;

/// Render the claim description and its structured attributes for the text backend.
pub fn build_text_prompt(description: &str, metadata: &ClaimMetadata<'_>) -> String {
    let or_unknown = |value: &str| {
        if value.trim().is_empty() {
            "unknown".to_string()
        } else {
            value.to_string()
        }
    };

    format!(
        "Claim type: {}\nClaimed amount: {:.2}\nDate of loss: {}\nLocation: {}\n\nDescription:\n{}",
        or_unknown(metadata.claim_type),
        metadata.amount,
        or_unknown(metadata.date_of_loss),
        or_unknown(metadata.location),
        description
    )
}

/// Render an already classified assessment for the narrative backend.
pub fn build_narrative_prompt(
    ctx: &ClaimContext,
    verdict: &Verdict,
    documents: &[DocumentJudgment],
    text: &TextJudgment,
    risk_factors: &[String],
) -> String {
    let inauthentic = documents.iter().filter(|d| !d.is_authentic).count();
    let factors = if risk_factors.is_empty() {
        "none".to_string()
    } else {
        risk_factors.join("; ")
    };
    let inconsistencies = if text.inconsistencies.is_empty() {
        "none".to_string()
    } else {
        text.inconsistencies.join("; ")
    };

    format!(
        "Claim {} ({}) for {:.2}.\n\
         Risk score: {}/100\n\
         Risk level: {}\n\
         Recommendation: {}\n\
         Documents analyzed: {} ({} not authentic)\n\
         Text suspicion score: {:.2}\n\
         Inconsistencies: {}\n\
         Risk factors: {}",
        ctx.claim_id,
        ctx.claim_type,
        ctx.amount,
        verdict.risk_score,
        verdict.risk_level,
        verdict.recommendation,
        documents.len(),
        inauthentic,
        text.suspicion_score,
        inconsistencies,
        factors
    )
}
