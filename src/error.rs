//! Error types for map operations.
//!
//! Recoverable failures (`MapError`) are returned to the caller and never leave a
//! partially applied mutation behind. Internal inconsistencies are reported through
//! [`Corruption`] and always end in a panic.

/// Recoverable failure of a map operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum MapError {
    /// No entry exists for the requested key.
    #[error("no entry for the requested key")]
    KeyNotFound,
    /// No entry exists for the requested value (bidirectional lookups).
    #[error("no entry for the requested value")]
    ValueNotFound,
    /// The key is already present and the operation refuses to overwrite it.
    #[error("key is already present")]
    KeyConflict,
    /// The value is already claimed by another key.
    #[error("value is already mapped to a key")]
    ValueConflict,
}

impl MapError {
    /// Check if the error reports a missing key or value
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, MapError::KeyNotFound | MapError::ValueNotFound)
    }

    /// Check if the error reports a strict insert against an existing entry
    #[inline]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, MapError::KeyConflict | MapError::ValueConflict)
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Internal inconsistency detected by a map. Never returned; see [`fatal`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Corruption {
    /// A rehash moved a different number of entries than the table claimed to hold.
    #[error("rehash moved {moved} entries but the table held {expected}")]
    RehashCount {
        /// Live count before the rehash.
        expected: usize,
        /// Entries actually found and moved.
        moved: usize,
    },
    /// The forward and reverse tables of a bidirectional map disagree on size.
    #[error("bidirectional map out of sync: {forward} forward entries, {reverse} reverse entries")]
    BijectionCount {
        /// Forward table live count.
        forward: usize,
        /// Reverse table live count.
        reverse: usize,
    },
    /// A forward entry has no matching reverse entry (or points elsewhere).
    #[error("bidirectional map out of sync: forward entry has no matching reverse entry")]
    BijectionPair,
}

/// Log and raise a corruption fault. Continuing after this would poison every later
/// lookup, so the fault is never handed back to the caller.
#[cold]
#[inline(never)]
pub(crate) fn fatal(corruption: Corruption) -> ! {
    tracing::error!(error = %corruption, "probe map corruption detected");
    panic!("probe map corruption: {corruption}");
}
