//! probemap_rs: open-addressing hash maps with tombstone deletion.
//!
//! The container substrate for per-chunk lookups, entity indices and block-state
//! caches. All maps share one engine: a flat power-of-two slot array, linear probing,
//! tombstones for deletion, and growth once `(live + tombstones) / capacity` reaches
//! 3/4. What differs is how keys become slot tags:
//!
//! - [`ProbeMap`] with [`HashedKeys`] for any `Hash` key (default, `ahash`).
//! - [`IntMap`] / [`UIntMap`] with [`IntKeys`] for 32-bit integers.
//! - [`LongMap`] / [`ULongMap`] with [`LongKeys`] for 64-bit integers.
//! - [`BiMap`] pairs two maps into a bijection (name <-> id registries).
//!
//! ```
//! use probemap_rs::{BiMap, IntMap};
//!
//! let mut blocks: IntMap<&str> = IntMap::new();
//! blocks.set(1, "stone");
//! assert_eq!(blocks.get(&1), Ok(&"stone"));
//!
//! let mut ids: BiMap<String, u32> = BiMap::new();
//! ids.add("minecraft:stone".to_string(), 1).unwrap();
//! assert_eq!(ids.get_key(&1).map(String::as_str), Ok("minecraft:stone"));
//! ```
//!
//! Nothing here is thread-safe; a map belongs to one owner at a time.

pub mod bimap;
pub mod error;
pub mod iter;
pub mod map;
pub mod mix;
mod raw;

pub use bimap::{BiMap, Evicted};
pub use error::{Corruption, MapError, Result};
pub use map::{IntMap, LongMap, ProbeMap, UIntMap, ULongMap};
pub use mix::{HashedKeys, IntKeys, KeyMixer, LongKeys, REMAPPED_TAG};
pub use raw::MIN_CAPACITY;
