//! Configuration discovery and effective settings resolution.
//!
//! logpulse reads `logpulse.toml|yaml|yml` from the start directory (or the
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `services`: `product-service`, `order-service`
//! - `sidecar`: `daprd`
//! - `tail`: 100
//! - `kubectl`: `kubectl`
//! - `output`: `human`
//! - `max_recommendations`: 5
//! - `rules`: built-in rule set
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::models::HealthStatus;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 3] = ["logpulse.toml", "logpulse.yaml", "logpulse.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `logpulse.toml|yaml`.
pub struct PulseConfig {
    pub services: Option<Vec<String>>,
    pub namespace: Option<String>,
    pub sidecar: Option<String>,
    pub tail: Option<usize>,
    pub kubectl: Option<String>,
    /// Rules file, relative to the config root
    pub rules: Option<String>,
    pub output: Option<String>,
    pub max_recommendations: Option<usize>,
    pub fail_on: Option<HealthStatus>,
}

/// CLI-provided values; `None` falls through to the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<String>,
    pub services: Vec<String>,
    pub namespace: Option<String>,
    pub sidecar: Option<String>,
    pub tail: Option<usize>,
    pub kubectl: Option<String>,
    pub rules: Option<String>,
    pub output: Option<String>,
    pub fail_on: Option<HealthStatus>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub config_found: bool,
    pub services: Vec<String>,
    pub namespace: Option<String>,
    pub sidecar: String,
    pub tail: usize,
    pub kubectl: String,
    /// Absolute (root-joined) rules file, `None` for the built-in rules
    pub rules: Option<PathBuf>,
    pub output: String,
    pub max_recommendations: usize,
    pub fail_on: Option<HealthStatus>,
}

/// Walk upward from `start` to find the config root.
///
/// Stops when a `logpulse.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `PulseConfig` from `logpulse.toml` or `logpulse.yaml|yml` if present.
///
/// An unreadable or malformed file is logged and treated as absent.
pub fn load_config(root: &Path) -> Option<PulseConfig> {
    let path = CONFIG_NAMES
        .iter()
        .map(|n| root.join(n))
        .find(|p| p.exists())?;
    let s = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read config");
            return None;
        }
    };
    let parsed = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str::<PulseConfig>(&s).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<PulseConfig>(&s).map_err(|e| e.to_string())
    };
    match parsed {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
            None
        }
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides) -> Effective {
    let start = PathBuf::from(cli.root.as_deref().unwrap_or("."));
    let root = detect_root(&start);
    let loaded = load_config(&root);
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let services = if !cli.services.is_empty() {
        cli.services.clone()
    } else {
        cfg.services.unwrap_or_else(|| {
            vec!["product-service".to_string(), "order-service".to_string()]
        })
    };
    let namespace = cli.namespace.clone().or(cfg.namespace);
    let sidecar = cli
        .sidecar
        .clone()
        .or(cfg.sidecar)
        .unwrap_or_else(|| "daprd".to_string());
    let tail = cli.tail.or(cfg.tail).unwrap_or(100);
    let kubectl = cli
        .kubectl
        .clone()
        .or(cfg.kubectl)
        .unwrap_or_else(|| "kubectl".to_string());
    // CLI paths are taken as given; config paths are relative to the root
    let rules = match cli.rules.as_ref() {
        Some(p) => Some(PathBuf::from(p)),
        None => cfg.rules.map(|p| root.join(p)),
    };
    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let max_recommendations = cfg.max_recommendations.unwrap_or(5);
    let fail_on = cli.fail_on.or(match cfg.fail_on {
        Some(HealthStatus::Healthy) => {
            tracing::warn!("ignoring fail_on = \"healthy\"; expected degraded|unhealthy");
            None
        }
        other => other,
    });

    Effective {
        root,
        config_found,
        services,
        namespace,
        sidecar,
        tail,
        kubectl,
        rules,
        output,
        max_recommendations,
        fail_on,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let eff = resolve_effective(&Overrides {
            root: dir.path().to_str().map(String::from),
            ..Default::default()
        });
        assert!(!eff.config_found);
        assert_eq!(eff.services, vec!["product-service", "order-service"]);
        assert_eq!(eff.sidecar, "daprd");
        assert_eq!(eff.tail, 100);
        assert_eq!(eff.kubectl, "kubectl");
        assert_eq!(eff.output, "human");
        assert_eq!(eff.max_recommendations, 5);
        assert!(eff.rules.is_none());
        assert!(eff.fail_on.is_none());
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("logpulse.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
services = ["cart"]
namespace = "shop"
tail = 50
rules = "conf/rules.toml"
output = "json"
max_recommendations = 3
fail_on = "unhealthy"
    "#
        )
        .unwrap();
        let nested = root.join("deploy").join("scripts");
        fs::create_dir_all(&nested).unwrap();

        let eff = resolve_effective(&Overrides {
            root: nested.to_str().map(String::from),
            ..Default::default()
        });
        assert!(eff.config_found);
        assert_eq!(eff.root, root);
        assert_eq!(eff.services, vec!["cart"]);
        assert_eq!(eff.namespace.as_deref(), Some("shop"));
        assert_eq!(eff.tail, 50);
        assert_eq!(eff.rules, Some(root.join("conf/rules.toml")));
        assert_eq!(eff.output, "json");
        assert_eq!(eff.max_recommendations, 3);
        assert_eq!(eff.fail_on, Some(HealthStatus::Unhealthy));
    }

    #[test]
    fn test_load_yaml_and_cli_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("logpulse.yaml"),
            r#"
services:
  - product-service
sidecar: sidecar
tail: 20
output: json
"#,
        )
        .unwrap();

        let eff = resolve_effective(&Overrides {
            root: root.to_str().map(String::from),
            services: vec!["order-service".into()],
            tail: Some(10),
            output: Some("human".into()),
            rules: Some("/etc/logpulse/rules.toml".into()),
            ..Default::default()
        });
        assert_eq!(eff.services, vec!["order-service"]);
        assert_eq!(eff.sidecar, "sidecar");
        assert_eq!(eff.tail, 10);
        assert_eq!(eff.output, "human");
        assert_eq!(eff.rules, Some(PathBuf::from("/etc/logpulse/rules.toml")));
    }

    #[test]
    fn test_healthy_fail_on_in_config_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("logpulse.toml"), "fail_on = \"healthy\"").unwrap();
        let eff = resolve_effective(&Overrides {
            root: dir.path().to_str().map(String::from),
            ..Default::default()
        });
        assert!(eff.config_found);
        assert!(eff.fail_on.is_none());
    }

    #[test]
    fn test_invalid_config_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("logpulse.toml"), "tail = \"many\"").unwrap();
        assert!(load_config(dir.path()).is_none());
        let eff = resolve_effective(&Overrides {
            root: dir.path().to_str().map(String::from),
            ..Default::default()
        });
        assert!(!eff.config_found);
        assert_eq!(eff.tail, 100);
    }
}
