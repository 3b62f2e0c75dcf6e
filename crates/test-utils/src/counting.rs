use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pollwatch::{FetchError, Target};

/// Wraps a target and counts how often its content was fetched.
///
/// Clones share the counter.
#[derive(Debug, Clone)]
pub struct CountingTarget<T> {
    inner: T,
    fetches: Arc<AtomicUsize>,
}

impl<T: Target> CountingTarget<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl<T: Target> Target for CountingTarget<T> {
    fn fail_open(&self) -> bool {
        self.inner.fail_open()
    }

    fn content(&self) -> Result<Vec<u8>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.content()
    }
}
