//! Host bootstrap for the calculator service
//!
//! - [`config`]: layered `AppConfig` (defaults, YAML, environment, CLI)
//! - [`logging`]: one-time `tracing` subscriber setup
//! - [`signals`]: Ctrl+C / SIGTERM shutdown waiter

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod config;
pub mod logging;
pub mod signals;

pub use config::{AppConfig, CliArgs, ENV_PREFIX, LogFormat, LoggingConfig};
pub use logging::init_logging;
pub use signals::{ShutdownSignal, cancel_on_shutdown, wait_for_shutdown};
