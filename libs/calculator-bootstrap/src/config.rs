//! Layered application configuration.
//!
//! Sources are merged in this order (later wins):
//! 1. `AppConfig::default()`
//! 2. YAML file (if provided)
//! 3. Environment variables prefixed with [`ENV_PREFIX`], `__` separating keys
//!    (e.g. `APP__LOGGING__LEVEL=debug`)
//! 4. CLI overrides via [`AppConfig::apply_cli_overrides`]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Prefix of environment variables that override configuration.
pub const ENV_PREFIX: &str = "APP__";

/// Console log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    /// Also write plain-text logs to a daily-rolling file at this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

/// Root configuration of the host process.
///
/// Each module owns the shape of its section under `modules`; the host only
/// stores raw values and hands them out through [`AppConfig::module_config`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub modules: BTreeMap<String, serde_json::Value>,
}

/// CLI arguments that feed into the config merge.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub print_config: bool,
    pub verbose: u8,
}

impl AppConfig {
    /// Load defaults, then the YAML file at `path` (if any), then environment overrides.
    ///
    /// # Errors
    /// Returns an error if `path` does not exist or the merged configuration is invalid.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    /// Apply CLI overrides on top of the loaded configuration.
    ///
    /// `-v` raises the log level to at least `info`, `-vv` to `debug`, `-vvv`
    /// to `trace`. A configured level that is already as verbose is kept; a
    /// per-target directive is replaced.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let requested = match args.verbose {
            0 => return,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        let configured = self.logging.level.trim().parse::<LevelFilter>().ok();
        if configured.is_some_and(|current| current >= requested) {
            return;
        }
        self.logging.level = requested.to_string();
    }

    /// Parse the `modules.<name>` section, or return `T::default()` when absent.
    ///
    /// # Errors
    /// Returns an error if the section does not match `T`.
    pub fn module_config<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(name) {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value.clone())
                .with_context(|| format!("invalid configuration for module '{name}'")),
        }
    }

    /// Store `value` as the `modules.<name>` section.
    ///
    /// # Errors
    /// Returns an error if `value` cannot be serialized.
    pub fn set_module_config<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("failed to serialize configuration for module '{name}'"))?;
        self.modules.insert(name.to_owned(), value);
        Ok(())
    }

    /// Render the effective configuration as YAML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| anyhow::anyhow!("failed to render config: {e}"))
    }
}
