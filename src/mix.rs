//! Hash mixing policies.
//!
//! A mixer turns a key into a 32-bit slot tag. Tags `0` and `-1` are reserved for empty
//! and tombstone slots, so every policy remaps them to [`REMAPPED_TAG`]. The low bits of
//! the tag select the home slot (`tag & (capacity - 1)`), so a policy must spread
//! entropy into those bits.

use std::hash::{BuildHasher, Hash};

use ahash::RandomState;

use crate::raw::{EMPTY, TOMBSTONE};

/// Tag substituted for a mixed hash that collides with a sentinel.
pub const REMAPPED_TAG: i32 = 2;

/// Maps a key to a 32-bit slot tag.
///
/// Implementations must be deterministic for the lifetime of the mixer: a table stores
/// tags and relies on the same key producing the same tag on every later lookup. The
/// built-in mixers never return `0` or `-1`; a custom mixer that does is remapped to
/// [`REMAPPED_TAG`] by the map before the tag reaches the slot array.
pub trait KeyMixer<Q: ?Sized> {
    /// Mix `key` into a tag.
    fn mix(&self, key: &Q) -> i32;
}

/// Replace a sentinel tag with [`REMAPPED_TAG`].
#[inline(always)]
pub(crate) fn finish(tag: i32) -> i32 {
    if tag == EMPTY || tag == TOMBSTONE {
        REMAPPED_TAG
    } else {
        tag
    }
}

#[inline(always)]
fn fold64(h: u64) -> i32 {
    (h ^ (h >> 32)) as u32 as i32
}

// ================================================================================================
// GENERIC KEYS
// ================================================================================================

/// Mixer for arbitrary `Hash` keys, delegating to a `BuildHasher`.
///
/// The default hasher is `ahash::RandomState`, seeded per instance. Use
/// [`HashedKeys::with_hasher`] with a fixed-seed hasher when probe sequences must be
/// reproducible across runs.
#[derive(Clone, Default, Debug)]
pub struct HashedKeys<S = RandomState> {
    hasher: S,
}

impl HashedKeys<RandomState> {
    /// Create a mixer with a freshly seeded `ahash` hasher.
    pub fn new() -> Self {
        Self {
            hasher: RandomState::new(),
        }
    }
}

impl<S> HashedKeys<S> {
    /// Create a mixer around the given hasher builder.
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    /// The underlying hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<Q, S> KeyMixer<Q> for HashedKeys<S>
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline(always)]
    fn mix(&self, key: &Q) -> i32 {
        finish(fold64(self.hasher.hash_one(key)))
    }
}

// ================================================================================================
// INTEGER KEYS
// ================================================================================================

/// Mixer for 32-bit (and narrower) integer keys.
///
/// Identity hashing of sequential or strided integers piles them into a handful of
/// home slots under power-of-two masking. A Fibonacci multiply followed by folding the
/// high half down spreads adjacent keys across the low bits.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IntKeys;

const INT_MULTIPLIER: u32 = 0x9E37_79B9;

#[inline(always)]
fn mix32(bits: u32) -> i32 {
    let h = bits.wrapping_mul(INT_MULTIPLIER);
    finish((h ^ (h >> 16)) as i32)
}

macro_rules! impl_int_keys {
    ($($t:ty),*) => {
        $(
            impl KeyMixer<$t> for IntKeys {
                #[inline(always)]
                fn mix(&self, key: &$t) -> i32 {
                    mix32(*key as u32)
                }
            }
        )*
    };
}

impl_int_keys!(i8, u8, i16, u16, i32, u32);

// ================================================================================================
// WIDE INTEGER KEYS
// ================================================================================================

/// Mixer for 64-bit integer keys such as packed chunk coordinates.
///
/// Packed keys carry most of their entropy in the upper half, which a plain truncation
/// would throw away. The mix is a multiply/xor-shift/multiply/xor-shift finalizer whose
/// result is folded to 32 bits.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct LongKeys;

const LONG_MULTIPLIER_A: u64 = 0xBF58_476D_1CE4_E5B9;
const LONG_MULTIPLIER_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline(always)]
fn mix64(bits: u64) -> i32 {
    let mut h = bits.wrapping_mul(LONG_MULTIPLIER_A);
    h ^= h >> 32;
    h = h.wrapping_mul(LONG_MULTIPLIER_B);
    h ^= h >> 29;
    finish(fold64(h))
}

macro_rules! impl_long_keys {
    ($($t:ty),*) => {
        $(
            impl KeyMixer<$t> for LongKeys {
                #[inline(always)]
                fn mix(&self, key: &$t) -> i32 {
                    mix64(*key as u64)
                }
            }
        )*
    };
}

impl_long_keys!(i64, u64, isize, usize);
