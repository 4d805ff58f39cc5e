//! logpulse core library.
//!
//! This crate scores blocks of log text against a fixed rule set and rolls the
//! per-stream results into a report with an overall health status and ranked
//! remediation advice.
//!
//! High-level modules:
//! - `rules`: Compiled, ordered rule sets (defaults or rules files).
//! - `scorer`: Per-subject match counting, scoring, and classification.
//! - `aggregate`: Report assembly across subjects.
//! - `models`: Data models for results, reports, and the rules file schema.
//! - `source`: Log acquisition via `kubectl logs` or local files.
//! - `config`: Discovery and effective configuration resolution.
//! - `output`: Human/JSON printers.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `logging`: Tracing subscriber setup.
//! - `error`: Configuration and fetch error types.
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod rules;
pub mod scorer;
pub mod source;

pub use aggregate::aggregate;
pub use error::{ConfigurationError, FetchError};
pub use models::{AnalysisResult, HealthStatus, Recommendation, Report, Severity};
pub use rules::{Rule, RuleSet};
pub use scorer::analyze;
