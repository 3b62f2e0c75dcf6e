// src/lib.rs

//! Poll-and-diff change detection.
//!
//! A [`Watcher`] wraps a [`Target`] and detects content changes by comparing
//! fingerprints of successive content snapshots, either on demand
//! ([`Watcher::updated`]) or from a background interval loop
//! ([`Watcher::on_interval`]).

pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod logging;
pub mod target;
pub mod watch;

use std::time::Duration;

use anyhow::Result;
use tokio::time;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{resolve, Mode};

pub use crate::errors::{FetchError, WatchError};
pub use crate::target::{FileTarget, MemoryTarget, Target};
pub use crate::watch::{CancelHandle, Fingerprint, Watcher};

/// High-level entry point used by `main.rs`.
///
/// Resolves the driver config, builds a file target and runs the selected
/// mode until the configured duration elapses or Ctrl-C is pressed.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve(&args)?;
    info!(
        mode = ?cfg.mode,
        path = ?cfg.path,
        interval = ?cfg.interval,
        fail_open = cfg.fail_open,
        "starting watch"
    );

    let target = FileTarget::new(&cfg.path, cfg.fail_open);
    let mut out = std::io::stdout();
    let shutdown = shutdown_signal(cfg.run_for);

    match cfg.mode {
        Mode::Poll => {
            let mut watcher = Watcher::new(target);
            driver::run_poll(&mut watcher, cfg.interval, shutdown, &mut out).await?;
        }
        Mode::Emit => {
            let watcher = Watcher::new(target);
            driver::run_emit(&watcher, cfg.interval, shutdown, &mut out).await?;
        }
    }

    Ok(())
}

/// Resolves after `run_for`, or earlier on Ctrl-C.
async fn shutdown_signal(run_for: Duration) {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received"),
            Err(err) => {
                warn!("failed to listen for Ctrl+C: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = time::sleep(run_for) => debug!(?run_for, "run duration elapsed"),
        _ = ctrl_c => {}
    }
}
