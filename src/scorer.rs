//! Per-subject scoring.
//!
//! `analyze` counts matches for every rule, applies each matched rule's score
//! delta once, and classifies the result. It performs no I/O and accepts any
//! string.

use crate::models::{AnalysisResult, HealthStatus, RuleMatch, BASE_SCORE};
use crate::rules::RuleSet;

/// Score one block of log text.
///
/// Deltas are applied once per rule that matched at all, regardless of how
/// many times it matched; counts are still reported. The score is not clamped.
pub fn analyze(log_text: &str, subject: &str, rules: &RuleSet) -> AnalysisResult {
    let mut health_score = BASE_SCORE;
    let matches: Vec<RuleMatch> = rules
        .iter()
        .map(|rule| {
            let count = rule.count_matches(log_text);
            if count > 0 {
                health_score += rule.score_delta();
            }
            RuleMatch {
                rule: rule.name().to_string(),
                severity: rule.severity(),
                count,
            }
        })
        .collect();
    AnalysisResult {
        subject: subject.to_string(),
        matches,
        health_score,
        status: HealthStatus::classify(f64::from(health_score)),
    }
}
