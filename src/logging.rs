//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so that report output on stdout stays parseable.
//! `RUST_LOG` controls filtering when set (default `logpulse=warn`);
//! `--verbose` raises the crate to `debug` on top of either. `LOG_FORMAT=json`
//! switches to JSON lines.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_tracing(crate_name: &str, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(crate_name, verbose, rust_log.as_deref())?;

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }
    Ok(())
}

/// Filter from `RUST_LOG` if set and valid, else `<crate>=warn`.
pub fn build_filter(
    crate_name: &str,
    verbose: bool,
    rust_log: Option<&str>,
) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    let from_env = rust_log
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok());
    let filter = match from_env {
        Some(f) => f,
        None => EnvFilter::try_new(format!("{crate_name}=warn"))?,
    };
    if verbose {
        return Ok(filter.add_directive(format!("{crate_name}=debug").parse()?));
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn debug_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "logpulse", Level::DEBUG)
        })
    }

    fn warn_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "logpulse", Level::WARN)
        })
    }

    #[test]
    fn test_rust_log_can_raise_crate_level() {
        let filter = build_filter("logpulse", false, Some("logpulse=debug")).unwrap();
        assert!(debug_enabled(filter));
    }

    #[test]
    fn test_default_is_warn() {
        let filter = build_filter("logpulse", false, None).unwrap();
        assert!(!debug_enabled(filter));
        let filter = build_filter("logpulse", false, Some("  ")).unwrap();
        assert!(warn_enabled(filter));
    }

    #[test]
    fn test_verbose_adds_debug_over_rust_log() {
        let filter = build_filter("logpulse", true, Some("logpulse=error")).unwrap();
        assert!(debug_enabled(filter));
        let filter = build_filter("logpulse", true, None).unwrap();
        assert!(debug_enabled(filter));
    }

    #[test]
    fn test_invalid_rust_log_falls_back_to_default() {
        let filter = build_filter("logpulse", false, Some("logpulse=loud")).unwrap();
        assert!(warn_enabled(filter));
    }
}
