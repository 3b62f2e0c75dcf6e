// src/driver.rs

//! Demo driver: exercises one of the two consumption modes against a target
//! and prints what it observes.
//!
//! Output goes to the supplied writer so tests can capture it; the binary
//! passes stdout.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::target::Target;
use crate::watch::Watcher;

/// Call [`Watcher::updated`] every `interval` until `shutdown` resolves.
///
/// Prints `Updated? <changed>, <error or none>` per check and `fin` at the
/// end. Returns the number of checks performed.
pub async fn run_poll<T, F, W>(
    watcher: &mut Watcher<T>,
    interval: Duration,
    shutdown: F,
    out: &mut W,
) -> Result<usize>
where
    T: Target,
    F: Future<Output = ()>,
    W: Write,
{
    tokio::pin!(shutdown);

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut checks = 0;

    info!(?interval, "poll mode started");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                match watcher.updated() {
                    Ok(changed) => writeln!(out, "Updated? {changed}, none")?,
                    Err(err) => writeln!(out, "Updated? {}, {err}", err.signals_change())?,
                }
                checks += 1;
            }
        }
    }

    writeln!(out, "fin")?;
    debug!(checks, "poll mode finished");
    Ok(checks)
}

/// Start [`Watcher::on_interval`] and print `Updated!` per notification until
/// `shutdown` resolves, then cancel and drain the channel.
///
/// Returns the number of notifications received.
pub async fn run_emit<T, F, W>(
    watcher: &Watcher<T>,
    interval: Duration,
    shutdown: F,
    out: &mut W,
) -> Result<usize>
where
    T: Target + 'static,
    F: Future<Output = ()>,
    W: Write,
{
    tokio::pin!(shutdown);

    let (mut notifications, cancel) = watcher.on_interval(interval);
    let mut seen = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            received = notifications.recv() => match received {
                Some(()) => {
                    writeln!(out, "Updated!")?;
                    seen += 1;
                }
                None => break,
            },
        }
    }

    writeln!(out, "Cancelling watch interval")?;
    cancel.cancel();

    // Anything already queued before the cancel is still delivered.
    while notifications.recv().await.is_some() {
        writeln!(out, "Updated!")?;
        seen += 1;
    }

    writeln!(out, "fin")?;
    debug!(notifications = seen, "emit mode finished");
    Ok(seen)
}
