// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    DriverConfig, Mode, RawDriverConfig, DEFAULT_INTERVAL_MS, DEFAULT_RUN_FOR_SECS,
};
use crate::errors::{PollwatchError, Result};

impl TryFrom<RawDriverConfig> for DriverConfig {
    type Error = PollwatchError;

    fn try_from(raw: RawDriverConfig) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;

        let path = raw.path.ok_or_else(|| {
            PollwatchError::ConfigError("a path to watch is required".to_string())
        })?;

        Ok(DriverConfig {
            mode: raw.mode.unwrap_or(Mode::Poll),
            path,
            interval: Duration::from_millis(raw.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)),
            run_for: Duration::from_secs(raw.run_for_secs.unwrap_or(DEFAULT_RUN_FOR_SECS)),
            fail_open: raw.fail_open.unwrap_or(true),
        })
    }
}

/// Check the merged settings before defaults are applied.
pub fn validate_config(cfg: &RawDriverConfig) -> Result<()> {
    match &cfg.path {
        None => {
            return Err(PollwatchError::ConfigError(
                "a path to watch is required".to_string(),
            ));
        }
        Some(path) if path.as_os_str().is_empty() => {
            return Err(PollwatchError::ConfigError(
                "path must not be empty".to_string(),
            ));
        }
        Some(_) => {}
    }

    if cfg.interval_ms == Some(0) {
        return Err(PollwatchError::ConfigError(
            "interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.run_for_secs == Some(0) {
        return Err(PollwatchError::ConfigError(
            "run_for_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}
