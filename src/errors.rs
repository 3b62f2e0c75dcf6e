// src/errors.rs

//! Crate-wide error types.
//!
//! - [`FetchError`]: a target could not produce its content.
//! - [`WatchError`]: a change check failed; carries the target's fail-open
//!   policy so callers can still act on the "changed" signal.
//! - [`PollwatchError`]: driver configuration failures (validation, IO, TOML).

use std::path::PathBuf;

use thiserror::Error;

/// A [`Target`](crate::target::Target) could not produce content.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target unavailable: {0}")]
    Unavailable(String),
}

/// A change check could not complete.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("unable to get target content: {source}")]
    Fetch {
        #[source]
        source: FetchError,
        fail_open: bool,
    },
}

impl WatchError {
    /// Whether this failure should be treated as a change.
    ///
    /// This is `true` exactly when the target is configured fail-open, so
    /// dependents reload rather than keep stale state.
    pub fn signals_change(&self) -> bool {
        match self {
            WatchError::Fetch { fail_open, .. } => *fail_open,
        }
    }

    pub fn fetch_error(&self) -> &FetchError {
        match self {
            WatchError::Fetch { source, .. } => source,
        }
    }
}

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PollwatchError>;
