// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

/// How the driver consumes the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Call `updated()` on a fixed cadence and print each result.
    Poll,
    /// Start an interval loop and print each notification.
    Emit,
}

/// Driver configuration as read from a TOML file.
///
/// ```toml
/// mode = "emit"
/// path = "config/app.toml"
/// interval_ms = 1000
/// run_for_secs = 10
/// fail_open = true
/// ```
///
/// Every key is optional here; missing values are filled from the CLI or
/// from defaults by [`resolve`](crate::config::resolve).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDriverConfig {
    pub mode: Option<Mode>,
    pub path: Option<PathBuf>,
    pub interval_ms: Option<u64>,
    pub run_for_secs: Option<u64>,
    pub fail_open: Option<bool>,
}

pub const DEFAULT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_RUN_FOR_SECS: u64 = 10;

/// Validated driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub mode: Mode,
    pub path: PathBuf,
    pub interval: Duration,
    pub run_for: Duration,
    pub fail_open: bool,
}
