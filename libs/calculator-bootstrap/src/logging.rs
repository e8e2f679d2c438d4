//! Process-wide `tracing` subscriber setup.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

const DEFAULT_LOG_FILE: &str = "calculator.log";

/// Parse a filter directive such as `info` or `calculator=debug,tower_http=info`.
///
/// # Errors
/// Returns an error if the directive is malformed.
pub fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| format!("invalid log filter '{directive}'"))
}

/// Install the global subscriber. Call once, before anything logs.
///
/// Console output goes to stderr. `RUST_LOG` overrides `cfg.level` when set.
///
/// # Errors
/// Returns an error if the level is malformed or a subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&cfg.level)?,
    };

    let (text, json) = match cfg.format {
        LogFormat::Text => (
            Some(fmt::layer().with_writer(std::io::stderr).with_target(true)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true),
            ),
        ),
    };

    let file = cfg.file.as_deref().map(|path| {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let prefix = path
            .file_name()
            .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
        fmt::layer()
            .with_writer(tracing_appender::rolling::daily(dir, prefix))
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .with(file)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!(level = %cfg.level, format = ?cfg.format, "logging initialized");
    Ok(())
}
