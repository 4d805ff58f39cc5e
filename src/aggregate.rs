//! Report aggregation across subjects.
//!
//! Subjects are scored in parallel, but results, the overall status, and the
//! recommendation list only depend on input order and rule order.

use crate::models::{
    AnalysisResult, HealthStatus, Recommendation, Report, Severity, Summary, BASE_SCORE,
};
use crate::rules::RuleSet;
use crate::scorer::analyze;
use chrono::Utc;
use rayon::prelude::*;
use std::cmp::Reverse;

/// Score every `(subject, log_text)` pair and roll the results into a report.
///
/// - `overall_status` classifies the unweighted mean score. With no subjects
///   the mean is taken as 100, so the report is healthy.
/// - Recommendations come from warning/high rules that matched, ordered by
///   severity (high first), then subject input order, then rule order.
///   Repeated rules across subjects are kept.
pub fn aggregate<S, T>(subject_logs: &[(S, T)], rules: &RuleSet) -> Report
where
    S: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
{
    let generated_at = Utc::now();
    let subjects: Vec<AnalysisResult> = subject_logs
        .par_iter()
        .map(|(subject, text)| analyze(text.as_ref(), subject.as_ref(), rules))
        .collect();
    tracing::debug!(subjects = subjects.len(), "analyzed subjects");

    let mean_score = mean_score(&subjects);
    let overall_status = HealthStatus::classify(mean_score);
    let recommendations = recommendations(&subjects, rules);
    let summary = Summary {
        subjects: subjects.len(),
        total_issues: subjects.iter().map(|s| s.matched().count()).sum(),
        critical_issues: recommendations
            .iter()
            .filter(|r| r.severity == Severity::High)
            .count(),
        mean_score,
    };
    Report {
        generated_at,
        subjects,
        overall_status,
        recommendations,
        summary,
    }
}

fn mean_score(subjects: &[AnalysisResult]) -> f64 {
    if subjects.is_empty() {
        return f64::from(BASE_SCORE);
    }
    let total: i64 = subjects.iter().map(|s| i64::from(s.health_score)).sum();
    total as f64 / subjects.len() as f64
}

fn recommendations(subjects: &[AnalysisResult], rules: &RuleSet) -> Vec<Recommendation> {
    // Built in subject order then rule order; the stable sort keeps that
    // order within each severity.
    let mut out: Vec<Recommendation> = Vec::new();
    for res in subjects {
        for m in res.matched().filter(|m| m.severity.is_actionable()) {
            let Some(rule) = rules.get(&m.rule) else {
                continue;
            };
            out.push(Recommendation {
                subject: res.subject.clone(),
                rule: m.rule.clone(),
                severity: m.severity,
                count: m.count,
                remediation: rule.remediation().to_string(),
                impact: rule.impact().to_string(),
            });
        }
    }
    out.sort_by_key(|r| Reverse(r.severity));
    out
}
