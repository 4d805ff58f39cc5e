//! Shared data models for analysis results, reports, and the rules file.

pub mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health score every subject starts from before rule deltas are applied.
pub const BASE_SCORE: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Rule severity. Ordered `Info < Warning < High`.
pub enum Severity {
    Info,
    Warning,
    High,
}

impl Severity {
    /// Score delta applied once when a rule of this severity matched.
    ///
    /// `positive` only has an effect on info rules; rule set construction
    /// rejects it elsewhere.
    pub fn score_delta(self, positive: bool) -> i32 {
        match (self, positive) {
            (Severity::High, _) => -30,
            (Severity::Warning, _) => -5,
            (Severity::Info, true) => 10,
            (Severity::Info, false) => 0,
        }
    }

    /// Whether matches of this severity produce a recommendation.
    pub fn is_actionable(self) -> bool {
        matches!(self, Severity::Warning | Severity::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Tri-state health classification.
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Classify a score. Bands are inclusive at their lower bound:
    /// `>= 80` healthy, `>= 60` degraded, anything below unhealthy.
    pub fn classify(score: f64) -> Self {
        if score >= 80.0 {
            HealthStatus::Healthy
        } else if score >= 60.0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        }
    }

    /// Whether this status is at or beyond a `--fail-on` threshold.
    ///
    /// Ordered `healthy < degraded < unhealthy`. A `healthy` threshold would
    /// trip on every run; `parse_threshold` rejects it.
    pub fn reaches(self, threshold: HealthStatus) -> bool {
        self >= threshold
    }

    /// Parse a fail threshold: `degraded` or `unhealthy`.
    pub fn parse_threshold(s: &str) -> Result<Self, String> {
        match s.parse::<HealthStatus>()? {
            HealthStatus::Healthy => Err(
                "'healthy' is not a valid threshold (expected degraded|unhealthy)".to_string(),
            ),
            status => Ok(status),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "healthy" => Ok(HealthStatus::Healthy),
            "degraded" => Ok(HealthStatus::Degraded),
            "unhealthy" => Ok(HealthStatus::Unhealthy),
            other => Err(format!(
                "unknown status '{other}' (expected healthy|degraded|unhealthy)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Match count for one rule within one subject.
pub struct RuleMatch {
    pub rule: String,
    pub severity: Severity,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Result of scoring one subject's log text.
pub struct AnalysisResult {
    pub subject: String,
    /// One entry per rule, in rule set order, zero counts included.
    pub matches: Vec<RuleMatch>,
    /// Not clamped; may leave the 0..=100 range.
    pub health_score: i32,
    pub status: HealthStatus,
}

impl AnalysisResult {
    /// Match count for `rule`, or `None` when the rule set had no such rule.
    pub fn count(&self, rule: &str) -> Option<usize> {
        self.matches.iter().find(|m| m.rule == rule).map(|m| m.count)
    }

    /// Rules that matched at least once.
    pub fn matched(&self) -> impl Iterator<Item = &RuleMatch> {
        self.matches.iter().filter(|m| m.count > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Remediation advice for a warning or high rule that matched in a subject.
pub struct Recommendation {
    pub subject: String,
    pub rule: String,
    pub severity: Severity,
    pub count: usize,
    pub remediation: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Aggregated counters used by printers.
pub struct Summary {
    pub subjects: usize,
    /// Number of (subject, rule) pairs with at least one match.
    pub total_issues: usize,
    /// Number of high severity recommendations.
    pub critical_issues: usize,
    /// Unweighted mean of subject scores; 100 when there are no subjects.
    pub mean_score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// Report over all analyzed subjects.
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Subjects in input order.
    pub subjects: Vec<AnalysisResult>,
    pub overall_status: HealthStatus,
    pub recommendations: Vec<Recommendation>,
    pub summary: Summary,
}

impl Report {
    /// First subject with the given name.
    pub fn subject(&self, name: &str) -> Option<&AnalysisResult> {
        self.subjects.iter().find(|s| s.subject == name)
    }
}
