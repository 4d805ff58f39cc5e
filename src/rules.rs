//! Compiled rule sets.
//!
//! A `RuleSet` is built once at startup, either from the built-in defaults or
//! from a rules file, and then passed by reference to the scorer and the
//! aggregator. Iteration order is insertion order, which keeps score
//! adjustments and recommendation ordering reproducible.

use crate::error::ConfigurationError;
use crate::models::rules::{RuleSpec, RulesFile};
use crate::models::Severity;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A compiled, immutable rule.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    pattern: Regex,
    severity: Severity,
    positive: bool,
    remediation: String,
    impact: String,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }

    pub fn remediation(&self) -> &str {
        &self.remediation
    }

    pub fn impact(&self) -> &str {
        &self.impact
    }

    /// Delta applied to the health score when this rule matched at all.
    pub fn score_delta(&self) -> i32 {
        self.severity.score_delta(self.positive)
    }

    /// Number of non-overlapping matches in `text`.
    pub fn count_matches(&self, text: &str) -> usize {
        self.pattern.find_iter(text).count()
    }
}

/// Ordered collection of uniquely named rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Built-in rules for Dapr sidecar and application logs.
    pub fn defaults() -> Self {
        // Patterns are constant and covered by tests.
        Self::from_specs(default_specs()).expect("default rules compile")
    }

    /// Compile rule specs. Patterns are matched case-insensitively.
    pub fn from_specs(specs: Vec<RuleSpec>) -> Result<Self, ConfigurationError> {
        if specs.is_empty() {
            return Err(ConfigurationError::Empty);
        }
        let mut seen: HashSet<String> = HashSet::new();
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            if !seen.insert(spec.name.clone()) {
                return Err(ConfigurationError::DuplicateRule(spec.name));
            }
            if spec.positive && spec.severity != Severity::Info {
                return Err(ConfigurationError::PositiveNotInfo(spec.name));
            }
            let pattern = RegexBuilder::new(&spec.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigurationError::InvalidPattern {
                    rule: spec.name.clone(),
                    source,
                })?;
            rules.push(Rule {
                name: spec.name,
                pattern,
                severity: spec.severity,
                positive: spec.positive,
                remediation: spec.remediation,
                impact: spec.impact,
            });
        }
        Ok(Self { rules })
    }

    /// Load rules from a TOML file, or YAML when the extension is `yaml|yml`.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let parsed: Result<RulesFile, String> = if is_yaml {
            serde_yaml::from_str(&data).map_err(|e| e.to_string())
        } else {
            toml::from_str(&data).map_err(|e| e.to_string())
        };
        let file = parsed.map_err(|message| ConfigurationError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!(path = %path.display(), rules = file.rules.len(), "loaded rules file");
        Self::from_specs(file.rules)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Index of the rule in insertion order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn default_specs() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new(
            "scheduler_connection",
            r"Failed to connect to scheduler host",
            Severity::Warning,
            r#"Add dapr.io/config: "dapr-config" annotation and disable scheduler"#,
            "Non-critical - scheduler is optional for pub/sub",
        ),
        RuleSpec::new(
            "component_errors",
            r"error loading component|component initialization failed",
            Severity::High,
            "Check component YAML configuration and AWS credentials",
            "Critical - affects pub/sub functionality",
        ),
        RuleSpec::new(
            "pubsub_success",
            r"component loaded successfully.*pubsub",
            Severity::Info,
            "No action needed",
            "Positive - pub/sub is working",
        )
        .positive(),
        RuleSpec::new(
            "sidecar_ready",
            r"dapr initialized|application discovered on port",
            Severity::Info,
            "No action needed",
            "Positive - Dapr sidecar is healthy",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_order_and_deltas() {
        let rules = RuleSet::defaults();
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "scheduler_connection",
                "component_errors",
                "pubsub_success",
                "sidecar_ready"
            ]
        );
        let deltas: Vec<_> = rules.iter().map(|r| r.score_delta()).collect();
        assert_eq!(deltas, vec![-5, -30, 10, 0]);
        assert_eq!(rules.position("pubsub_success"), Some(2));
        assert_eq!(
            rules.get("component_errors").map(|r| r.severity()),
            Some(Severity::High)
        );
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let rules = RuleSet::defaults();
        let rule = rules.get("sidecar_ready").unwrap();
        assert_eq!(rule.count_matches("DAPR INITIALIZED. Status: Running"), 1);
        assert_eq!(
            rule.count_matches("application discovered on port 8080\ndapr initialized"),
            2
        );
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let err = RuleSet::from_specs(vec![RuleSpec::new(
            "broken",
            "error (loading",
            Severity::High,
            "",
            "",
        )])
        .unwrap_err();
        match err {
            ConfigurationError::InvalidPattern { rule, .. } => assert_eq!(rule, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let spec = RuleSpec::new("dup", "x", Severity::Warning, "", "");
        let err = RuleSet::from_specs(vec![spec.clone(), spec]).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateRule(name) if name == "dup"));
    }

    #[test]
    fn test_positive_requires_info() {
        let spec = RuleSpec::new("p", "x", Severity::Warning, "", "").positive();
        let err = RuleSet::from_specs(vec![spec]).unwrap_err();
        assert!(matches!(err, ConfigurationError::PositiveNotInfo(_)));
    }

    #[test]
    fn test_empty_rule_list_rejected() {
        assert!(matches!(
            RuleSet::from_specs(Vec::new()),
            Err(ConfigurationError::Empty)
        ));
    }

    #[test]
    fn test_load_toml_rules_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(
            f,
            "{}",
            r#"
[[rule]]
name = "http_errors"
pattern = 'HTTP/1.1" [45]\d\d'
severity = "warning"
remediation = "Inspect failing requests"
impact = "Clients see errors"

[[rule]]
name = "ready"
pattern = "dapr initialized"
severity = "info"
positive = true
            "#
        )
        .unwrap();
        let rules = RuleSet::load(&path).unwrap();
        assert_eq!(rules.len(), 2);
        let http = rules.get("http_errors").unwrap();
        assert_eq!(http.count_matches(r#"GET / HTTP/1.1" 503 12"#), 1);
        assert_eq!(rules.get("ready").unwrap().score_delta(), 10);
    }

    #[test]
    fn test_load_yaml_rules_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        fs::write(
            &path,
            r#"
rule:
  - name: pubsub_error
    pattern: "error publishing message|error subscribing"
    severity: high
    remediation: Check broker connectivity
    impact: Messages are lost
"#,
        )
        .unwrap();
        let rules = RuleSet::load(&path).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("pubsub_error").unwrap().severity(), Severity::High);
    }

    #[test]
    fn test_load_uppercase_yaml_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.YAML");
        fs::write(
            &path,
            "rule:\n  - name: crash\n    pattern: panic\n    severity: high\n",
        )
        .unwrap();
        let rules = RuleSet::load(&path).unwrap();
        assert_eq!(rules.get("crash").unwrap().count_matches("PANIC: boom"), 1);
    }

    #[test]
    fn test_load_reports_parse_and_read_errors() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[[rule]]\nname = 1\n").unwrap();
        assert!(matches!(
            RuleSet::load(&bad),
            Err(ConfigurationError::Parse { .. })
        ));
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            RuleSet::load(&missing),
            Err(ConfigurationError::Read { .. })
        ));
    }
}
