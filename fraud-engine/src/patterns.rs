//! Heuristic risk factors derived from claim attributes and user history.
//!
//! Every rule is evaluated on its own; all rules that apply contribute a factor.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{ClaimContext, PatternFindings};

pub const HIGH_AMOUNT_THRESHOLD: f64 = 100_000.0;
pub const RECENT_CLAIMS_THRESHOLD: u32 = 3;
pub const LATE_REPORTING_DAYS: i64 = 30;

pub const HIGH_AMOUNT_FACTOR: &str = "High claim amount (>100,000)";
pub const MULTIPLE_RECENT_CLAIMS_FACTOR: &str = "Multiple recent claims";
pub const PREVIOUS_REJECTIONS_FACTOR: &str = "Previous rejected claims";
pub const LATE_REPORTING_FACTOR: &str = "Late claim reporting (>30 days)";

/// Derive pattern-based risk factors for `ctx`, using `now` as the reporting instant.
pub fn analyze_patterns(ctx: &ClaimContext, now: DateTime<Utc>) -> PatternFindings {
    let mut risk_factors = Vec::new();

    if ctx.amount > HIGH_AMOUNT_THRESHOLD {
        risk_factors.push(HIGH_AMOUNT_FACTOR.to_string());
    }

    if ctx.history.recent_claims > RECENT_CLAIMS_THRESHOLD {
        risk_factors.push(MULTIPLE_RECENT_CLAIMS_FACTOR.to_string());
    }

    if ctx.history.rejected_claims > 0 {
        risk_factors.push(PREVIOUS_REJECTIONS_FACTOR.to_string());
    }

    if let Some(loss) = parse_date_of_loss(&ctx.date_of_loss) {
        // Whole elapsed days: 30 days and 23 hours still counts as 30.
        if (now - loss).num_days() > LATE_REPORTING_DAYS {
            risk_factors.push(LATE_REPORTING_FACTOR.to_string());
        }
    }

    PatternFindings { risk_factors }
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date_of_loss(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserHistory;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn claim(amount: f64, date_of_loss: &str, history: UserHistory) -> ClaimContext {
        ClaimContext {
            claim_id: "CLM-1".to_string(),
            claim_type: "auto".to_string(),
            amount,
            date_of_loss: date_of_loss.to_string(),
            description: "Collision".to_string(),
            location: String::new(),
            documents: vec![],
            history,
        }
    }

    #[test]
    fn quiet_claim_has_no_factors() {
        let findings = analyze_patterns(&claim(5_000.0, "2024-05-30", UserHistory::default()), now());
        assert!(findings.risk_factors.is_empty());
    }

    #[test]
    fn all_rules_fire_in_detection_order() {
        let history = UserHistory {
            total_claims: 9,
            recent_claims: 4,
            rejected_claims: 2,
            average_claim_amount: 3_000.0,
        };
        let findings = analyze_patterns(&claim(150_000.0, "2024-01-01", history), now());
        assert_eq!(
            findings.risk_factors,
            vec![
                HIGH_AMOUNT_FACTOR,
                MULTIPLE_RECENT_CLAIMS_FACTOR,
                PREVIOUS_REJECTIONS_FACTOR,
                LATE_REPORTING_FACTOR,
            ]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let history = UserHistory {
            recent_claims: 3,
            ..UserHistory::default()
        };
        // exactly 100k, exactly 3 recent claims, exactly 30 days
        let findings = analyze_patterns(&claim(100_000.0, "2024-05-02T12:00:00Z", history), now());
        assert!(findings.risk_factors.is_empty());
    }

    #[test]
    fn late_reporting_counts_whole_days() {
        let late = |date: &str| {
            analyze_patterns(&claim(10.0, date, UserHistory::default()), now()).risk_factors
                == vec![LATE_REPORTING_FACTOR]
        };
        // 30 days 23 hours before now
        assert!(!late("2024-05-01T13:00:00Z"));
        // 31 days
        assert!(late("2024-05-01T12:00:00Z"));
    }

    #[test]
    fn malformed_or_future_dates_never_fire() {
        for date in ["", "yesterday", "01/02/2020", "2030-01-01"] {
            let findings = analyze_patterns(&claim(10.0, date, UserHistory::default()), now());
            assert!(findings.risk_factors.is_empty(), "date {:?} fired", date);
        }
    }

    #[test]
    fn parses_both_date_formats() {
        assert_eq!(
            parse_date_of_loss("2024-03-04"),
            Some(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date_of_loss("2024-03-04T10:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap())
        );
    }
}
