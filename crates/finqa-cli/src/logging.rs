//! Tracing setup for the `finqa` binary.
//!
//! Logs never go to stdout. They go to the configured file (rolled daily) or
//! to stderr. `RUST_LOG` takes precedence over the configured level.

use anyhow::Context;
use finqa_config::{expand_tilde, LogLevel, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn init(config: &LoggingConfig, debug: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let level = if debug { LogLevel::Debug } else { config.level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives(level)))
        .context("invalid log filter")?;

    let (writer, guard, ansi) = match log_file(config) {
        Some(path) => {
            let (directory, file_name) = split_log_path(&path)?;
            std::fs::create_dir_all(&directory).with_context(|| {
                format!("could not create log directory {}", directory.display())
            })?;
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(fmt::layer().json().with_writer(writer).with_ansi(false))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(writer).with_ansi(ansi).with_target(false))
            .try_init()?;
    }

    tracing::debug!("Logging initialized at {}", level);
    Ok(guard)
}

/// Our crates log at `level`; dependencies only warn
fn directives(level: LogLevel) -> String {
    format!("warn,finqa={}", level)
}

fn log_file(config: &LoggingConfig) -> Option<PathBuf> {
    config
        .file
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .and_then(expand_tilde)
}

fn split_log_path(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, file_name.to_string()))
}
