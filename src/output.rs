//! Output rendering for reports and rule listings.
//!
//! Supports `human` (default) and `json` outputs. The JSON form is the
//! serialized report with camelCase keys.

use crate::models::{HealthStatus, Report, Severity};
use crate::rules::RuleSet;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fmt::Write;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Prefix for fatal messages on stderr.
pub fn error_prefix() -> String {
    if use_colors("human") {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

/// Prefix for informational notes on stderr.
pub fn note_prefix() -> String {
    if use_colors("human") {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

fn status_label(status: HealthStatus, color: bool) -> String {
    let text = status.as_str().to_uppercase();
    if !color {
        return text;
    }
    match status {
        HealthStatus::Healthy => text.green().bold().to_string(),
        HealthStatus::Degraded => text.yellow().bold().to_string(),
        HealthStatus::Unhealthy => text.red().bold().to_string(),
    }
}

fn severity_icon(severity: Severity, color: bool) -> String {
    let icon = match severity {
        Severity::High => "✖",
        Severity::Warning => "▲",
        Severity::Info => "◆",
    };
    if !color {
        return icon.to_string();
    }
    match severity {
        Severity::High => icon.red().to_string(),
        Severity::Warning => icon.yellow().to_string(),
        Severity::Info => icon.green().to_string(),
    }
}

/// Print a report in the requested format.
pub fn print_report(report: &Report, output: &str, max_recommendations: usize) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report)).unwrap_or_default()
        ),
        _ => print!(
            "{}",
            render_human(report, max_recommendations, use_colors(output))
        ),
    }
}

/// Human-readable report text (pure) for testing purposes.
pub fn render_human(report: &Report, max_recommendations: usize, color: bool) -> String {
    let mut out = String::new();
    let rule_line = "=".repeat(60);
    let _ = writeln!(out, "{rule_line}");
    let title = "LOG HEALTH REPORT";
    if color {
        let _ = writeln!(out, "{}", title.bold());
    } else {
        let _ = writeln!(out, "{title}");
    }
    let _ = writeln!(out, "{rule_line}");
    let _ = writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%dT%H:%M:%SZ")
    );
    let _ = writeln!(
        out,
        "Overall: {} (mean score {:.1})",
        status_label(report.overall_status, color),
        report.summary.mean_score
    );
    let _ = writeln!(
        out,
        "Issues: {} total, {} critical",
        report.summary.total_issues, report.summary.critical_issues
    );

    for res in &report.subjects {
        let _ = writeln!(out);
        let name = if color {
            res.subject.clone().bold().to_string()
        } else {
            res.subject.clone()
        };
        let _ = writeln!(
            out,
            "{} {} (health {}/100)",
            name,
            status_label(res.status, color),
            res.health_score
        );
        for m in res.matched() {
            let _ = writeln!(
                out,
                "  {} {}: {} occurrence{}",
                severity_icon(m.severity, color),
                m.rule,
                m.count,
                if m.count == 1 { "" } else { "s" }
            );
        }
    }

    if !report.recommendations.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommendations:");
        for (i, rec) in report
            .recommendations
            .iter()
            .take(max_recommendations)
            .enumerate()
        {
            let _ = writeln!(
                out,
                "  {}. [{}] {} ❲{}❳",
                i + 1,
                rec.severity,
                rec.remediation,
                rec.subject
            );
            let _ = writeln!(out, "     Impact: {}", rec.impact);
        }
        let hidden = report
            .recommendations
            .len()
            .saturating_sub(max_recommendations);
        if hidden > 0 {
            let _ = writeln!(out, "  … {hidden} more (use --output json for all)");
        }
    }
    out
}

/// Print the active rule set.
pub fn print_rules(rules: &RuleSet, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_rules_json(rules)).unwrap_or_default()
        ),
        _ => {
            let color = use_colors(output);
            for rule in rules {
                let delta = rule.score_delta();
                println!(
                    "{} {} [{}] {:+} /{}/",
                    severity_icon(rule.severity(), color),
                    rule.name(),
                    rule.severity(),
                    delta,
                    rule.pattern().as_str()
                );
                if rule.severity().is_actionable() {
                    println!("    {}", rule.remediation());
                }
            }
        }
    }
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    serde_json::to_value(report).unwrap_or(JsonVal::Null)
}

/// Compose rule listing JSON (pure).
pub fn compose_rules_json(rules: &RuleSet) -> JsonVal {
    let items: Vec<_> = rules
        .iter()
        .map(|r| {
            json!({
                "name": r.name(),
                "pattern": r.pattern().as_str(),
                "severity": r.severity(),
                "positive": r.is_positive(),
                "delta": r.score_delta(),
                "remediation": r.remediation(),
                "impact": r.impact(),
            })
        })
        .collect();
    json!({"rules": items, "total": rules.len()})
}
