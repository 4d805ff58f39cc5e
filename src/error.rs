//! Error types for rule loading and log acquisition.
//!
//! Scoring and aggregation never fail; only building a `RuleSet` and fetching
//! log text from an external source can.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a `RuleSet`. Fatal: reported at startup,
/// before any analysis runs.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A rule pattern is not a valid regular expression
    #[error("rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    /// Two rules share the same name
    #[error("duplicate rule name '{0}'")]
    DuplicateRule(String),

    /// `positive = true` was set on a warning or high rule
    #[error("rule '{0}' is marked positive but its severity is not info")]
    PositiveNotInfo(String),

    /// The rule list is empty
    #[error("rule set is empty")]
    Empty,

    /// The rules file could not be read
    #[error("failed to read rules file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rules file is not valid TOML/YAML or does not match the schema
    #[error("failed to parse rules file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Errors raised while obtaining log text for a subject.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The log command is not installed or not in PATH
    #[error("{0} not found - ensure it is installed and in PATH")]
    NotFound(String),

    /// Failed to spawn the log command
    #[error("failed to spawn log command: {0}")]
    Spawn(#[from] std::io::Error),

    /// The log command exited with a non-zero status
    #[error("log command failed (exit code {code}): {stderr}")]
    CommandFailed { code: i32, stderr: String },

    /// A local log file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
