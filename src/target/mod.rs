// src/target/mod.rs

//! Observable targets.
//!
//! A [`Target`] is anything whose content can be fetched as raw bytes, plus a
//! policy flag saying whether a failed fetch should count as a change.
//!
//! - [`FileTarget`] reads a whole file from disk.
//! - [`MemoryTarget`] holds its content in memory and can be told to fail,
//!   which makes it convenient for tests and for embedding.

use std::sync::Arc;

use crate::errors::FetchError;

pub mod file;
pub mod memory;

pub use file::FileTarget;
pub use memory::MemoryTarget;

/// Something that can be observed for change.
pub trait Target: Send + Sync {
    /// How fetch failures are treated.
    ///
    /// `true` means a failed fetch is reported as a change (fail-open);
    /// `false` means it is not (fail-closed). Must not change over the
    /// lifetime of the target.
    fn fail_open(&self) -> bool;

    /// Produce the current content snapshot.
    fn content(&self) -> Result<Vec<u8>, FetchError>;
}

impl<T: Target + ?Sized> Target for Arc<T> {
    fn fail_open(&self) -> bool {
        (**self).fail_open()
    }

    fn content(&self) -> Result<Vec<u8>, FetchError> {
        (**self).content()
    }
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn fail_open(&self) -> bool {
        (**self).fail_open()
    }

    fn content(&self) -> Result<Vec<u8>, FetchError> {
        (**self).content()
    }
}
