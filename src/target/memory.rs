// src/target/memory.rs

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Target;
use crate::errors::FetchError;

#[derive(Debug, Clone)]
enum Slot {
    Content(Vec<u8>),
    Failing(String),
}

/// In-memory target.
///
/// Clones share the same content slot, so one handle can be given to a
/// [`Watcher`](crate::watch::Watcher) while another is used to change the
/// content or to make fetches fail.
#[derive(Debug, Clone)]
pub struct MemoryTarget {
    slot: Arc<Mutex<Slot>>,
    fail_open: bool,
}

impl MemoryTarget {
    pub fn new(content: impl Into<Vec<u8>>, fail_open: bool) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::Content(content.into()))),
            fail_open,
        }
    }

    /// Replace the content. Also clears a previous [`fail`](Self::fail).
    pub fn set(&self, content: impl Into<Vec<u8>>) {
        *self.lock() = Slot::Content(content.into());
    }

    /// Make every subsequent fetch fail with `message` until [`set`](Self::set)
    /// is called.
    pub fn fail(&self, message: impl Into<String>) {
        *self.lock() = Slot::Failing(message.into());
    }

    pub fn is_failing(&self) -> bool {
        matches!(*self.lock(), Slot::Failing(_))
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Target for MemoryTarget {
    fn fail_open(&self) -> bool {
        self.fail_open
    }

    fn content(&self) -> Result<Vec<u8>, FetchError> {
        match &*self.lock() {
            Slot::Content(bytes) => Ok(bytes.clone()),
            Slot::Failing(message) => Err(FetchError::Unavailable(message.clone())),
        }
    }
}
