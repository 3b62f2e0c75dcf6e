// src/watch/mod.rs

//! Change detection.
//!
//! This module is responsible for:
//! - Fingerprinting target content and comparing it to the previous
//!   fingerprint (`fingerprint.rs`).
//! - The manual "has it changed?" check (`watcher.rs`).
//! - The cancellable interval-driven notifier (`interval.rs`).
//!
//! It does **not** know how content is fetched; that is the job of a
//! [`Target`](crate::target::Target).

pub mod fingerprint;
pub mod interval;
pub mod watcher;

pub use fingerprint::{diff_target, fingerprints_match, Diff, Fingerprint, FINGERPRINT_LEN};
pub use interval::CancelHandle;
pub use watcher::Watcher;
