// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{DriverConfig, RawDriverConfig};
use crate::errors::Result;

/// Load a driver config file and return the raw, unvalidated settings.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawDriverConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawDriverConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Build the effective driver config.
///
/// - Starts from the file named by `--config`, if any.
/// - CLI values override file values.
/// - Defaults fill whatever is still missing.
/// - The result is validated.
pub fn resolve(args: &CliArgs) -> Result<DriverConfig> {
    let file = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawDriverConfig::default(),
    };

    let merged = RawDriverConfig {
        mode: args.mode.or(file.mode),
        path: args.path.clone().or(file.path),
        interval_ms: args.interval_ms.or(file.interval_ms),
        run_for_secs: args.run_for_secs.or(file.run_for_secs),
        fail_open: if args.fail_closed {
            Some(false)
        } else {
            file.fail_open
        },
    };

    DriverConfig::try_from(merged)
}
