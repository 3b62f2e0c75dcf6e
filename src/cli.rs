// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Mode;

/// Command-line arguments for `pollwatch`.
///
/// Every setting except `--log-level` can also come from a TOML file given
/// with `--config`; values on the command line win.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Watch a file for content changes by polling and comparing fingerprints.",
    long_about = None
)]
pub struct CliArgs {
    /// `poll` checks on a fixed cadence and prints every result;
    /// `emit` prints only when a change is signalled.
    #[arg(value_enum, value_name = "MODE")]
    pub mode: Option<Mode>,

    /// File to watch.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Optional driver config file (TOML).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Check interval in milliseconds (default 1000).
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// How long to watch before exiting, in seconds (default 10).
    #[arg(long, value_name = "SECS")]
    pub run_for_secs: Option<u64>,

    /// Do not treat read failures as changes.
    #[arg(long)]
    pub fail_closed: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
