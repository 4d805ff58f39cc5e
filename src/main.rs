//! logpulse CLI binary entry point.
//! Resolves configuration, fetches logs, scores them, and prints the report.

use clap::Parser;
use logpulse::cli::{Cli, Commands};
use logpulse::config::{self, Effective, Overrides};
use logpulse::models::Report;
use logpulse::output::{self, error_prefix, note_prefix};
use logpulse::rules::RuleSet;
use logpulse::source::{self, FileSource, KubectlSource};
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logpulse::logging::init_tracing("logpulse", cli.verbose) {
        eprintln!("{} cannot initialise logging: {}", error_prefix(), e);
    }
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Analyze {
            config_root,
            services,
            namespace,
            tail,
            sidecar,
            kubectl,
            rules,
            output,
            fail_on,
        } => {
            let eff = config::resolve_effective(&Overrides {
                root: config_root,
                services,
                namespace,
                sidecar,
                tail,
                kubectl,
                rules,
                output,
                fail_on,
            });
            if !eff.config_found && eff.output != "json" {
                eprintln!("{} No logpulse.toml found; using defaults.", note_prefix());
            }
            let rule_set = load_rules(&eff);
            if eff.services.is_empty() {
                eprintln!(
                    "{} No services configured. Pass --service or set services in logpulse.toml.",
                    error_prefix()
                );
                std::process::exit(2);
            }
            let src = KubectlSource {
                binary: eff.kubectl.clone(),
                namespace: eff.namespace.clone(),
                tail: eff.tail,
            };
            let plans = source::plan_services(&eff.services, &eff.sidecar);
            tracing::info!(
                services = eff.services.len(),
                subjects = plans.len(),
                "fetching logs"
            );
            let subject_logs = source::fetch_all(&src, &plans);
            let report = logpulse::aggregate(&subject_logs, &rule_set);
            finish(&report, &eff);
        }
        Commands::Scan {
            patterns,
            config_root,
            rules,
            output,
            fail_on,
        } => {
            let eff = config::resolve_effective(&Overrides {
                root: config_root,
                rules,
                output,
                fail_on,
                ..Default::default()
            });
            let rule_set = load_rules(&eff);
            let files = expand_patterns(&patterns);
            if files.is_empty() {
                eprintln!(
                    "{} No log files matched: {}",
                    error_prefix(),
                    patterns.join(", ")
                );
                std::process::exit(2);
            }
            let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let plans = source::plan_files(&files, &base);
            let subject_logs = source::fetch_all(&FileSource, &plans);
            let report = logpulse::aggregate(&subject_logs, &rule_set);
            finish(&report, &eff);
        }
        Commands::Rules {
            config_root,
            rules,
            output,
        } => {
            let eff = config::resolve_effective(&Overrides {
                root: config_root,
                rules,
                output,
                ..Default::default()
            });
            let rule_set = load_rules(&eff);
            output::print_rules(&rule_set, &eff.output);
        }
    }
}

/// Build the rule set or exit with code 2 before any analysis runs.
fn load_rules(eff: &Effective) -> RuleSet {
    let Some(path) = eff.rules.as_ref() else {
        return RuleSet::defaults();
    };
    match RuleSet::load(path) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::error!(error = %e, "invalid rule set");
            eprintln!("{} {}", error_prefix(), e);
            std::process::exit(2);
        }
    }
}

fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pat in patterns {
        match glob::glob(pat) {
            Ok(paths) => {
                for entry in paths.flatten() {
                    if entry.is_file() && !files.contains(&entry) {
                        files.push(entry);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(pattern = %pat, error = %e, "invalid glob pattern");
            }
        }
    }
    files
}

fn finish(report: &Report, eff: &Effective) {
    tracing::info!(
        status = %report.overall_status,
        mean_score = report.summary.mean_score,
        recommendations = report.recommendations.len(),
        "analysis complete"
    );
    output::print_report(report, &eff.output, eff.max_recommendations);
    if eff
        .fail_on
        .is_some_and(|threshold| report.overall_status.reaches(threshold))
    {
        std::process::exit(1);
    }
}
