//! Risk aggregation and classification.
//!
//! The weights below form the scoring policy. They are hand-tuned and kept in
//! one place so the table can be replaced without touching the callers.

use crate::model::{
    ClaimContext, DocumentJudgment, PatternFindings, Recommendation, RiskLevel, TextJudgment,
    Verdict,
};

/// Amount tiers, checked from the highest threshold down
pub const AMOUNT_TIERS: [(f64, u64); 3] = [(100_000.0, 25), (50_000.0, 15), (20_000.0, 10)];
pub const INAUTHENTIC_DOCUMENT_WEIGHT: u64 = 20;
pub const TEXT_SUSPICION_WEIGHT: f64 = 30.0;
pub const PATTERN_FACTOR_WEIGHT: u64 = 10;
pub const REJECTED_CLAIM_WEIGHT: u64 = 15;
pub const RECENT_CLAIM_WEIGHT: u64 = 5;
pub const RECENT_CLAIMS_CAP: u64 = 20;

pub const MAX_SCORE: u64 = 100;

pub const CRITICAL_THRESHOLD: u8 = 80;
pub const HIGH_THRESHOLD: u8 = 60;
pub const MEDIUM_THRESHOLD: u8 = 40;
pub const REJECT_THRESHOLD: u8 = 80;
pub const REVIEW_THRESHOLD: u8 = 50;

/// Reported until an analyzer supplies a confidence signal of its own
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Combine every signal into a score in `0..=100`.
pub fn aggregate(
    ctx: &ClaimContext,
    documents: &[DocumentJudgment],
    text: &TextJudgment,
    patterns: &PatternFindings,
) -> u8 {
    let amount = amount_points(ctx.amount);

    let inauthentic = documents.iter().filter(|d| !d.is_authentic).count() as u64;
    let document_penalty = INAUTHENTIC_DOCUMENT_WEIGHT.saturating_mul(inauthentic);

    let text_points = text_points(text.suspicion_score);

    let pattern_points = PATTERN_FACTOR_WEIGHT.saturating_mul(patterns.risk_factors.len() as u64);

    let rejected = REJECTED_CLAIM_WEIGHT.saturating_mul(u64::from(ctx.history.rejected_claims));
    let recent = RECENT_CLAIM_WEIGHT
        .saturating_mul(u64::from(ctx.history.recent_claims))
        .min(RECENT_CLAIMS_CAP);

    let sum = amount
        .saturating_add(document_penalty)
        .saturating_add(text_points)
        .saturating_add(pattern_points)
        .saturating_add(rejected)
        .saturating_add(recent);

    // bounded by MAX_SCORE, fits in u8
    sum.min(MAX_SCORE) as u8
}

fn amount_points(amount: f64) -> u64 {
    AMOUNT_TIERS
        .iter()
        .find(|(threshold, _)| amount > *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

fn text_points(suspicion_score: f64) -> u64 {
    if !suspicion_score.is_finite() || suspicion_score <= 0.0 {
        return 0;
    }
    (TEXT_SUSPICION_WEIGHT * suspicion_score.min(1.0)).round() as u64
}

/// Map a score to its risk level
pub fn risk_level(score: u8) -> RiskLevel {
    if score >= CRITICAL_THRESHOLD {
        RiskLevel::Critical
    } else if score >= HIGH_THRESHOLD {
        RiskLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Derive level and recommendation.
///
/// A single inauthentic document forces `Reject` regardless of score.
pub fn classify(score: u8, documents: &[DocumentJudgment]) -> (RiskLevel, Recommendation) {
    let level = risk_level(score);
    let any_inauthentic = documents.iter().any(|d| !d.is_authentic);

    let recommendation = if score >= REJECT_THRESHOLD || any_inauthentic {
        Recommendation::Reject
    } else if score >= REVIEW_THRESHOLD {
        Recommendation::Review
    } else {
        Recommendation::Approve
    };

    (level, recommendation)
}

/// Aggregate and classify in one step.
pub fn score_claim(
    ctx: &ClaimContext,
    documents: &[DocumentJudgment],
    text: &TextJudgment,
    patterns: &PatternFindings,
) -> Verdict {
    let risk_score = aggregate(ctx, documents, text, patterns);
    let (risk_level, recommendation) = classify(risk_score, documents);
    Verdict {
        risk_score,
        risk_level,
        recommendation,
        confidence: DEFAULT_CONFIDENCE,
    }
}
