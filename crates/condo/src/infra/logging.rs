//! Tracing subscriber setup.

use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::infra::config::Logging;

const LOG_ENV: &str = "CONDO_LOG";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Plain CLI commands log to stderr.
    Stderr,
    /// The TUI owns the terminal, so logs go to the configured file or nowhere.
    FileOrDiscard,
}

/// Install the global subscriber. Calling it twice is harmless; the second call is ignored.
pub fn init(settings: &Logging, target: LogTarget) -> Result<()> {
    let filter = build_filter(settings)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match (target, settings.file.as_ref()) {
        (LogTarget::Stderr, _) => builder.with_writer(io::stderr).try_init(),
        (LogTarget::FileOrDiscard, Some(path)) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        (LogTarget::FileOrDiscard, None) => builder.with_writer(io::sink).try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

fn build_filter(settings: &Logging) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV} directives")),
        _ => EnvFilter::try_new(settings.level())
            .with_context(|| format!("invalid log level '{}'", settings.level())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_builds_filter() {
        assert!(build_filter(&Logging::default()).is_ok());
    }

    #[test]
    fn init_is_idempotent() {
        let settings = Logging::default();
        init(&settings, LogTarget::FileOrDiscard).unwrap();
        init(&settings, LogTarget::FileOrDiscard).unwrap();
    }
}
