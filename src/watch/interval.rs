// src/watch/interval.rs

//! Interval-driven change notification.
//!
//! [`Watcher::on_interval`] spawns one Tokio task per call. The task owns a
//! private fingerprint (independent of the watcher's manual-check state), runs
//! the diff on every tick and sends an empty signal for each detected change.
//!
//! Fetches run on Tokio's blocking pool. Waiting for the next tick, for a
//! fetch to finish and for a consumer to take a notification are each raced
//! against cancellation, with cancellation polled first, so neither a slow
//! target nor a blocked send can keep the loop alive after
//! [`CancelHandle::cancel`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::WatchError;
use crate::target::Target;
use crate::watch::fingerprint::{diff_target, Diff, Fingerprint};
use crate::watch::watcher::Watcher;

/// Lifecycle of an interval loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Cancelling,
    Stopped,
}

impl LoopState {
    fn advance(&mut self, next: LoopState) {
        debug!(from = ?*self, to = ?next, "interval loop state");
        *self = next;
    }
}

/// Handle used to stop an interval loop.
///
/// Dropping the handle cancels the loop as well.
#[derive(Debug)]
pub struct CancelHandle {
    cancel_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl CancelHandle {
    /// Request termination. Never blocks; calling it again, or after the loop
    /// already stopped, does nothing.
    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Whether the loop task has exited (cancelled, or its receiver was
    /// dropped).
    pub fn is_stopped(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel and wait until the loop task has exited and the notification
    /// channel is closed.
    pub async fn stop(self) {
        self.cancel();
        if let Err(err) = self.join.await {
            debug!(error = %err, "interval loop task ended abnormally");
        }
    }
}

impl<T: Target + 'static> Watcher<T> {
    /// Start a background task that checks the target every `period` and
    /// sends `()` once per detected change.
    ///
    /// Returns immediately. The loop's baseline is the first fetch the
    /// background task makes, so only changes after it are reported. The
    /// first check happens one full `period` after start. Fetches run on
    /// Tokio's blocking pool and never stall other tasks.
    ///
    /// Fetch errors are absorbed. Under a fail-open target the first failing
    /// tick of an error streak is reported as a change; a fail-closed target
    /// never reports errors. Neither advances the loop's fingerprint.
    ///
    /// The channel holds one notification. A notification already queued
    /// when [`CancelHandle::cancel`] is called is still delivered before the
    /// receiver yields `None`; one still waiting for room is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero, or if called outside a Tokio runtime.
    pub fn on_interval(&self, period: Duration) -> (mpsc::Receiver<()>, CancelHandle) {
        assert!(period > Duration::ZERO, "`period` must be non-zero");

        let (notify_tx, notify_rx) = mpsc::channel::<()>(1);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let join = tokio::spawn(interval_loop(
            Arc::clone(&self.target),
            period,
            notify_tx,
            cancel_rx,
        ));

        (notify_rx, CancelHandle { cancel_tx, join })
    }
}

async fn interval_loop<T: Target + 'static>(
    target: Arc<T>,
    period: Duration,
    notify_tx: mpsc::Sender<()>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut state = LoopState::Running;
    info!(?period, "interval watch started");

    let mut last: Option<Fingerprint> = None;
    let mut failing = false;

    tokio::select! {
        biased;

        _ = cancelled(&mut cancel_rx) => {
            state.advance(LoopState::Cancelling);
        }

        seed = blocking_diff(&target, None) => match seed {
            Some(Ok(Diff::Changed(fingerprint))) => last = Some(fingerprint),
            Some(Ok(Diff::Unchanged)) => {}
            Some(Err(err)) => {
                debug!(error = %err, "baseline fetch failed; starting without fingerprint");
                failing = true;
            }
            None => failing = true,
        },
    }

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while state == LoopState::Running {
        tokio::select! {
            biased;

            _ = cancelled(&mut cancel_rx) => {
                state.advance(LoopState::Cancelling);
                continue;
            }

            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;

            _ = cancelled(&mut cancel_rx) => {
                state.advance(LoopState::Cancelling);
                continue;
            }

            outcome = blocking_diff(&target, last) => outcome,
        };

        let emit = match outcome {
            Some(Ok(Diff::Changed(fingerprint))) => {
                last = Some(fingerprint);
                failing = false;
                true
            }
            Some(Ok(Diff::Unchanged)) => {
                failing = false;
                false
            }
            Some(Err(err)) => {
                debug!(error = %err, "tick fetch failed");
                let streak_start = !failing;
                failing = true;
                streak_start && err.signals_change()
            }
            None => false,
        };

        if emit {
            tokio::select! {
                biased;

                _ = cancelled(&mut cancel_rx) => {
                    state.advance(LoopState::Cancelling);
                }

                sent = notify_tx.send(()) => {
                    if sent.is_err() {
                        debug!("notification receiver dropped");
                        state.advance(LoopState::Cancelling);
                    }
                }
            }
        }
    }

    // Closing the channel tells consumers no more notifications will come.
    drop(notify_tx);
    state.advance(LoopState::Stopped);
    info!("interval watch stopped");
}

/// Run [`diff_target`] on the blocking pool.
///
/// `None` means the fetch panicked; the tick is skipped.
async fn blocking_diff<T: Target + 'static>(
    target: &Arc<T>,
    token: Option<Fingerprint>,
) -> Option<Result<Diff, WatchError>> {
    let target = Arc::clone(target);
    match task::spawn_blocking(move || diff_target(target.as_ref(), token.as_ref())).await {
        Ok(outcome) => Some(outcome),
        Err(err) => {
            warn!(error = %err, "target fetch panicked");
            None
        }
    }
}

/// Resolves once cancellation is requested or every handle is gone.
async fn cancelled(cancel_rx: &mut watch::Receiver<bool>) {
    let _ = cancel_rx.wait_for(|cancelled| *cancelled).await;
}
