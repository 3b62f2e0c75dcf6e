// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::WatchError;
use crate::target::{FileTarget, Target};
use crate::watch::fingerprint::{diff_target, Diff, Fingerprint};

/// Detects content change of a [`Target`] by fingerprint comparison.
///
/// Two independent consumption modes are offered:
///
/// - [`updated`](Self::updated): synchronous "has it changed since the last
///   call?" check.
/// - [`on_interval`](Self::on_interval): a background task that signals each
///   detected change on a channel.
///
/// Each mode keeps its own fingerprint, so mixing them on one watcher does not
/// make either miss or double-report a change.
#[derive(Debug)]
pub struct Watcher<T> {
    pub(crate) target: Arc<T>,
    last: Option<Fingerprint>,
}

impl Watcher<FileTarget> {
    /// Watch the file at `path`, treating read failures as changes.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileTarget::new(path, true))
    }
}

impl<T: Target> Watcher<T> {
    pub fn new(target: T) -> Self {
        Self {
            target: Arc::new(target),
            last: None,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Fingerprint of the most recent successful manual check, if any.
    pub fn last_fingerprint(&self) -> Option<&Fingerprint> {
        self.last.as_ref()
    }

    /// Whether the target's content changed since the previous call.
    ///
    /// The first successful call always returns `Ok(true)`. On `Err` the
    /// stored fingerprint is left at its last good value, and
    /// [`WatchError::signals_change`] tells whether the failure should be
    /// treated as a change under the target's fail-open policy.
    pub fn updated(&mut self) -> Result<bool, WatchError> {
        match diff_target(self.target.as_ref(), self.last.as_ref()) {
            Ok(Diff::Changed(fingerprint)) => {
                debug!(%fingerprint, "manual check: changed");
                self.last = Some(fingerprint);
                Ok(true)
            }
            Ok(Diff::Unchanged) => Ok(false),
            Err(err) => {
                warn!(error = %err, fail_open = err.signals_change(), "manual check failed");
                Err(err)
            }
        }
    }
}
