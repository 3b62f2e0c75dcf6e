// src/watch/fingerprint.rs

//! Content fingerprints and the diff step shared by both consumption modes.

use std::fmt;

use blake3::Hasher;
use tracing::debug;

use crate::errors::WatchError;
use crate::target::Target;

/// Length in bytes of a [`Fingerprint`].
pub const FINGERPRINT_LEN: usize = blake3::OUT_LEN;

/// Fixed-size BLAKE3 digest of one content snapshot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Fingerprint of the given raw bytes.
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(content);
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(blake3::Hash::from(self.0).to_hex().as_str())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Exact byte-sequence equality.
///
/// Sequences of different length never match. Equal-length sequences are
/// compared over every byte without an early exit.
pub fn fingerprints_match(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Outcome of a successful diff against a previous fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diff {
    /// Content matches the previous fingerprint; keep the old token.
    Unchanged,
    /// Content differs (or there was no previous fingerprint).
    Changed(Fingerprint),
}

impl Diff {
    pub fn is_changed(&self) -> bool {
        matches!(self, Diff::Changed(_))
    }
}

/// Fetch the target's content and compare its fingerprint to `token`.
///
/// An absent token never matches, so the first successful diff is always
/// [`Diff::Changed`]. A fetch failure is returned as [`WatchError::Fetch`]
/// carrying the target's fail-open flag; the caller must not advance its
/// token in that case.
pub fn diff_target<T>(target: &T, token: Option<&Fingerprint>) -> Result<Diff, WatchError>
where
    T: Target + ?Sized,
{
    let content = target.content().map_err(|source| WatchError::Fetch {
        source,
        fail_open: target.fail_open(),
    })?;

    let fingerprint = Fingerprint::of(&content);
    let previous: &[u8] = token.map(|t| &t.as_bytes()[..]).unwrap_or(&[]);

    if fingerprints_match(fingerprint.as_bytes(), previous) {
        debug!(%fingerprint, "content unchanged");
        Ok(Diff::Unchanged)
    } else {
        debug!(%fingerprint, previous = ?token, "content changed");
        Ok(Diff::Changed(fingerprint))
    }
}
