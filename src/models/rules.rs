//! Rules file schema.
//!
//! TOML form:
//!
//! ```toml
//! [[rule]]
//! name = "scheduler_connection"
//! pattern = "Failed to connect to scheduler host"
//! severity = "warning"
//! remediation = "Disable the scheduler"
//! impact = "Non-critical"
//! ```
//!
//! YAML uses the same keys under a top-level `rule:` list. `positive`
//! defaults to false and is only valid for `info` rules.

use super::Severity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
/// Top-level rules file.
pub struct RulesFile {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Uncompiled rule as written in a rules file.
pub struct RuleSpec {
    pub name: String,
    pub pattern: String,
    pub severity: Severity,
    #[serde(default)]
    pub positive: bool,
    #[serde(default)]
    pub remediation: String,
    #[serde(default)]
    pub impact: String,
}

impl RuleSpec {
    pub fn new(
        name: &str,
        pattern: &str,
        severity: Severity,
        remediation: &str,
        impact: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            severity,
            positive: false,
            remediation: remediation.to_string(),
            impact: impact.to_string(),
        }
    }

    /// Mark an info rule as a positive signal.
    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }
}
