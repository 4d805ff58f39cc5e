//! Log acquisition for the host binary.
//!
//! The engine only consumes strings. This module fetches them: from `kubectl
//! logs` for cluster workloads, or from local files for `scan`. A failed fetch
//! does not drop the subject; its log text becomes an error marker so the
//! subject still shows up in the report.

use crate::error::FetchError;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Anything that can produce raw log text for a planned subject.
pub trait LogSource: Sync {
    fn fetch(&self, plan: &SubjectPlan) -> Result<String, FetchError>;
}

/// Fetches logs with `kubectl logs -l app=<workload> -c <container>`.
#[derive(Debug, Clone)]
pub struct KubectlSource {
    pub binary: String,
    pub namespace: Option<String>,
    pub tail: usize,
}

impl KubectlSource {
    /// Arguments passed to the binary for one fetch.
    pub fn args(&self, workload: &str, container: &str) -> Vec<String> {
        let mut args = vec![
            "logs".to_string(),
            "-l".to_string(),
            format!("app={workload}"),
            "-c".to_string(),
            container.to_string(),
            format!("--tail={}", self.tail),
        ];
        if let Some(ns) = self.namespace.as_ref() {
            args.push("-n".to_string());
            args.push(ns.clone());
        }
        args
    }
}

impl LogSource for KubectlSource {
    fn fetch(&self, plan: &SubjectPlan) -> Result<String, FetchError> {
        let args = self.args(&plan.workload, &plan.container);
        tracing::debug!("executing: {} {}", self.binary, args.join(" "));
        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchError::NotFound(self.binary.clone())
                } else {
                    FetchError::Spawn(e)
                }
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            return Err(FetchError::CommandFailed { code, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Reads local log files from `plan.path`, falling back to the workload
/// string when no path was planned.
#[derive(Debug, Clone, Default)]
pub struct FileSource;

impl LogSource for FileSource {
    fn fetch(&self, plan: &SubjectPlan) -> Result<String, FetchError> {
        let path = plan
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&plan.workload));
        fs::read(&path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|source| FetchError::Read { path, source })
    }
}

/// One named log stream to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPlan {
    pub subject: String,
    pub workload: String,
    pub container: String,
    /// Exact file path for file subjects; kept as a `PathBuf` so non-UTF-8
    /// names survive.
    pub path: Option<PathBuf>,
}

/// Two subjects per service, sidecar first: `<service>-dapr` reading the
/// sidecar container and `<service>-app` reading the container named after
/// the service.
pub fn plan_services(services: &[String], sidecar: &str) -> Vec<SubjectPlan> {
    services
        .iter()
        .flat_map(|svc| {
            [
                SubjectPlan {
                    subject: format!("{svc}-dapr"),
                    workload: svc.clone(),
                    container: sidecar.to_string(),
                    path: None,
                },
                SubjectPlan {
                    subject: format!("{svc}-app"),
                    workload: svc.clone(),
                    container: svc.clone(),
                    path: None,
                },
            ]
        })
        .collect()
}

/// One subject per file, named by its path relative to `base` when possible.
pub fn plan_files(files: &[PathBuf], base: &Path) -> Vec<SubjectPlan> {
    files
        .iter()
        .map(|path| {
            let subject = pathdiff::diff_paths(path, base)
                .unwrap_or_else(|| path.clone())
                .to_string_lossy()
                .to_string();
            SubjectPlan {
                subject,
                workload: path.to_string_lossy().to_string(),
                container: String::new(),
                path: Some(path.clone()),
            }
        })
        .collect()
}

/// Fetch every planned subject in parallel, keeping plan order.
///
/// Failures are logged and replaced by an `Error getting logs: ...` marker.
pub fn fetch_all(source: &dyn LogSource, plans: &[SubjectPlan]) -> Vec<(String, String)> {
    plans
        .par_iter()
        .map(|plan| {
            let text = match source.fetch(plan) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(subject = %plan.subject, error = %e, "log fetch failed");
                    format!("Error getting logs: {e}")
                }
            };
            (plan.subject.clone(), text)
        })
        .collect()
}
