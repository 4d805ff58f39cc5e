//! CLI argument parsing via `clap`.

use crate::models::HealthStatus;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "logpulse",
    version,
    about = "Score Dapr sidecar and application logs",
    long_about = "logpulse — match known log patterns, score each log stream, and rank remediation advice.\n\nConfiguration precedence: CLI > logpulse.toml > defaults.",
    after_help = "Examples:\n  logpulse analyze\n  logpulse analyze --service order-service --namespace shop --output json\n  logpulse scan 'logs/*.log' --fail-on unhealthy\n  logpulse rules --rules conf/rules.toml",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current logpulse version.")]
    Version,
    /// Fetch cluster logs and score them
    #[command(
        about = "Analyze cluster workloads",
        long_about = "Fetch sidecar and application logs for each service with kubectl and build a health report.",
        after_help = "Examples:\n  logpulse analyze --tail 50\n  logpulse analyze --service product-service --service order-service"
    )]
    Analyze {
        #[arg(long, help = "Directory to start config discovery from (default: current dir)")]
        config_root: Option<String>,
        #[arg(long = "service", help = "Service to analyze (repeatable)")]
        services: Vec<String>,
        #[arg(long, help = "Kubernetes namespace")]
        namespace: Option<String>,
        #[arg(long, help = "Log lines fetched per container (default: 100)")]
        tail: Option<usize>,
        #[arg(long, help = "Sidecar container name (default: daprd)")]
        sidecar: Option<String>,
        #[arg(long, help = "kubectl binary (default: kubectl)")]
        kubectl: Option<String>,
        #[arg(long, help = "Rules file (TOML or YAML)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(
            long,
            value_parser = HealthStatus::parse_threshold,
            help = "Exit non-zero at this overall status: degraded|unhealthy"
        )]
        fail_on: Option<HealthStatus>,
    },
    /// Score local log files
    #[command(
        about = "Analyze log files",
        long_about = "Score local log files; each matched file is one subject named by its relative path.",
        after_help = "Examples:\n  logpulse scan 'logs/*.log'\n  logpulse scan daprd.log app.log --output json"
    )]
    Scan {
        #[arg(required = true, help = "Files or glob patterns")]
        patterns: Vec<String>,
        #[arg(long, help = "Directory to start config discovery from (default: current dir)")]
        config_root: Option<String>,
        #[arg(long, help = "Rules file (TOML or YAML)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(
            long,
            value_parser = HealthStatus::parse_threshold,
            help = "Exit non-zero at this overall status: degraded|unhealthy"
        )]
        fail_on: Option<HealthStatus>,
    },
    /// List the active rules
    #[command(
        about = "List rules",
        long_about = "Print the rule set with severities and score deltas."
    )]
    Rules {
        #[arg(long, help = "Directory to start config discovery from (default: current dir)")]
        config_root: Option<String>,
        #[arg(long, help = "Rules file (TOML or YAML)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::try_parse_from([
            "logpulse",
            "analyze",
            "--service",
            "a",
            "--service",
            "b",
            "--tail",
            "50",
            "--fail-on",
            "degraded",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Analyze {
                services,
                tail,
                fail_on,
                ..
            } => {
                assert_eq!(services, vec!["a", "b"]);
                assert_eq!(tail, Some(50));
                assert_eq!(fail_on, Some(HealthStatus::Degraded));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_fail_on_rejects_healthy() {
        assert!(Cli::try_parse_from(["logpulse", "analyze", "--fail-on", "healthy"]).is_err());
        assert!(
            Cli::try_parse_from(["logpulse", "scan", "a.log", "--fail-on", "unhealthy"]).is_ok()
        );
    }

    #[test]
    fn test_scan_requires_patterns() {
        assert!(Cli::try_parse_from(["logpulse", "scan"]).is_err());
        assert!(Cli::try_parse_from(["logpulse", "scan", "a.log", "-v"]).is_ok());
    }
}
