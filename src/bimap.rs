//! Bidirectional map: a live bijection between two key spaces.
//!
//! Two [`ProbeMap`]s hold the forward (`K -> V`) and reverse (`V -> K`) directions. Every
//! public mutation touches both sides before returning, so callers never observe them
//! out of step. The inner maps are never exposed.

use std::borrow::Borrow;
use std::fmt;

use crate::error::{fatal, Corruption, MapError, Result};
use crate::iter::{Iter, Keys, Values};
use crate::map::ProbeMap;
use crate::mix::{HashedKeys, KeyMixer};

/// Pairs displaced by [`BiMap::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evicted<K, V> {
    /// Value the key was mapped to before, if it differed from the new one.
    pub previous_value: Option<V>,
    /// Key that owned the value before, if it differed from the new one.
    pub previous_key: Option<K>,
}

impl<K, V> Evicted<K, V> {
    fn none() -> Self {
        Self {
            previous_value: None,
            previous_key: None,
        }
    }

    /// True when `set` replaced nothing.
    pub fn is_empty(&self) -> bool {
        self.previous_value.is_none() && self.previous_key.is_none()
    }

    /// Number of stale pairs that were removed (0, 1 or 2).
    pub fn count(&self) -> usize {
        usize::from(self.previous_value.is_some()) + usize::from(self.previous_key.is_some())
    }
}

/// Bijective map between `K` and `V`.
///
/// Both types are stored twice (once per direction), hence the `Clone` bounds on
/// insertion. `MK` and `MV` are the mixers of the forward and reverse tables.
pub struct BiMap<K, V, MK = HashedKeys, MV = HashedKeys> {
    forward: ProbeMap<K, V, MK>,
    reverse: ProbeMap<V, K, MV>,
}

// ================================================================================================
// CONSTRUCTORS
// ================================================================================================

impl<K, V, MK: Default, MV: Default> BiMap<K, V, MK, MV> {
    /// Create an empty bidirectional map.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map whose two tables start with at least `capacity_hint` slots.
    pub fn with_capacity(capacity_hint: usize) -> Self {
        Self::with_capacity_and_mixers(capacity_hint, MK::default(), MV::default())
    }
}

impl<K, V, MK, MV> BiMap<K, V, MK, MV> {
    /// Create an empty map with explicit mixers for each direction.
    pub fn with_mixers(key_mixer: MK, value_mixer: MV) -> Self {
        Self::with_capacity_and_mixers(0, key_mixer, value_mixer)
    }

    /// Create an empty map with a capacity hint and explicit mixers.
    pub fn with_capacity_and_mixers(capacity_hint: usize, key_mixer: MK, value_mixer: MV) -> Self {
        Self {
            forward: ProbeMap::with_capacity_and_mixer(capacity_hint, key_mixer),
            reverse: ProbeMap::with_capacity_and_mixer(capacity_hint, value_mixer),
        }
    }

    /// Number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns true if the map holds no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Slot capacity of each direction. Both tables grow in lock-step.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.forward.capacity()
    }

    /// Live counts of the forward and reverse tables. Always equal.
    pub fn side_lens(&self) -> (usize, usize) {
        (self.forward.len(), self.reverse.len())
    }

    /// Remove every pair from both directions, keeping capacity.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// Iterate over `(&K, &V)` pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.forward.iter()
    }

    /// Iterate over keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        self.forward.keys()
    }

    /// Iterate over values.
    pub fn values(&self) -> Values<'_, K, V> {
        self.forward.values()
    }

    // ============================================================================================
    // LOOKUP
    // ============================================================================================

    /// Value paired with `key`, or [`MapError::KeyNotFound`].
    pub fn get_value<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        MK: KeyMixer<Q>,
    {
        self.forward.try_get(key).ok_or(MapError::KeyNotFound)
    }

    /// Key paired with `value`, or [`MapError::ValueNotFound`].
    pub fn get_key<Q>(&self, value: &Q) -> Result<&K>
    where
        V: Borrow<Q>,
        Q: Eq + ?Sized,
        MV: KeyMixer<Q>,
    {
        self.reverse.try_get(value).ok_or(MapError::ValueNotFound)
    }

    /// Value paired with `key`, if any.
    pub fn try_get_value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        MK: KeyMixer<Q>,
    {
        self.forward.try_get(key)
    }

    /// Key paired with `value`, if any.
    pub fn try_get_key<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: Eq + ?Sized,
        MV: KeyMixer<Q>,
    {
        self.reverse.try_get(value)
    }

    /// Check whether `key` is paired with some value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        MK: KeyMixer<Q>,
    {
        self.forward.contains_key(key)
    }

    /// Check whether `value` is claimed by some key.
    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: Eq + ?Sized,
        MV: KeyMixer<Q>,
    {
        self.reverse.contains_key(value)
    }
}

// ================================================================================================
// MUTATION
// ================================================================================================

impl<K, V, MK, MV> BiMap<K, V, MK, MV>
where
    K: Eq + Clone,
    V: Eq + Clone,
    MK: KeyMixer<K>,
    MV: KeyMixer<V>,
{
    /// Pair `key` with `value`. Fails with [`MapError::KeyConflict`] if the key is already
    /// paired, or [`MapError::ValueConflict`] if the value is; never overwrites.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.forward.contains_key(&key) {
            return Err(MapError::KeyConflict);
        }
        if self.reverse.contains_key(&value) {
            return Err(MapError::ValueConflict);
        }
        self.insert_pair(key, value);
        self.check_sync();
        Ok(())
    }

    /// Pair `key` with `value`, evicting whatever either side was paired with before.
    ///
    /// If `key` held another value, that pair goes. If `value` was claimed by another key,
    /// that pair goes too. Setting a pair that already holds is a no-op.
    pub fn set(&mut self, key: K, value: V) -> Evicted<K, V> {
        if self.forward.try_get(&key) == Some(&value) {
            return Evicted::none();
        }

        // Both stale sides are cleared before the new pair goes in.
        let previous_value = self.forward.remove(&key).map(|old_value| {
            if self.reverse.remove(&old_value).is_none() {
                fatal(Corruption::BijectionPair);
            }
            old_value
        });
        let previous_key = self.reverse.remove(&value).map(|old_key| {
            if self.forward.remove(&old_key).is_none() {
                fatal(Corruption::BijectionPair);
            }
            old_key
        });

        let evicted = Evicted {
            previous_value,
            previous_key,
        };
        if !evicted.is_empty() && tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(
                evicted = evicted.count(),
                len = self.forward.len(),
                "bimap set displaced stale pairs"
            );
        }

        self.insert_pair(key, value);
        self.check_sync();
        evicted
    }

    /// Remove the pair owning `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        MK: KeyMixer<Q>,
    {
        let (_, value) = self.forward.remove_entry(key)?;
        if self.reverse.remove(&value).is_none() {
            fatal(Corruption::BijectionPair);
        }
        self.check_sync();
        Some(value)
    }

    /// Remove the pair owning `value`, returning its key. `None` leaves both tables as
    /// they were.
    pub fn remove_value<Q>(&mut self, value: &Q) -> Option<K>
    where
        V: Borrow<Q>,
        Q: Eq + ?Sized,
        MV: KeyMixer<Q>,
    {
        let (_, key) = self.reverse.remove_entry(value)?;
        if self.forward.remove(&key).is_none() {
            fatal(Corruption::BijectionPair);
        }
        self.check_sync();
        Some(key)
    }

    /// Keep only the pairs for which `f` returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let reverse = &mut self.reverse;
        self.forward.retain(|k, v| {
            let keep = f(k, &*v);
            if !keep && reverse.remove(&*v).is_none() {
                fatal(Corruption::BijectionPair);
            }
            keep
        });
        self.check_sync();
    }

    /// Make room for `additional` more pairs in both directions.
    pub fn reserve(&mut self, additional: usize) {
        let target = match (
            self.forward.reserve_target(additional),
            self.reverse.reserve_target(additional),
        ) {
            (None, None) => return,
            (f, r) => f.unwrap_or(0).max(r.unwrap_or(0)),
        };
        self.rehash_both(target);
    }

    // ============================================================================================
    // PRIVATE HELPER METHODS
    // ============================================================================================

    /// Insert a pair known to be absent on both sides, growing both tables together.
    fn insert_pair(&mut self, key: K, value: V) {
        let forward_full = self.forward.needs_growth();
        let reverse_full = self.reverse.needs_growth();
        if forward_full || reverse_full {
            let forward_target = if forward_full {
                self.forward.growth_target()
            } else {
                self.forward.capacity()
            };
            let reverse_target = if reverse_full {
                self.reverse.growth_target()
            } else {
                self.reverse.capacity()
            };
            self.rehash_both(forward_target.max(reverse_target));
        }
        self.forward.set(key.clone(), value.clone());
        self.reverse.set(value, key);
    }

    fn rehash_both(&mut self, target: usize) {
        let target = target
            .max(self.forward.capacity())
            .max(self.reverse.capacity());
        self.forward.rehash_to(target);
        self.reverse.rehash_to(target);
    }

    /// Count check run after every mutation.
    #[inline]
    fn check_sync(&self) {
        let (forward, reverse) = self.side_lens();
        if forward != reverse {
            fatal(Corruption::BijectionCount { forward, reverse });
        }
    }
}

impl<K, V, MK, MV> BiMap<K, V, MK, MV>
where
    K: Eq,
    V: Eq,
    MV: KeyMixer<V>,
{
    /// Walk every pair and confirm both directions agree. O(n); meant for tests and
    /// debugging, never called by the map itself.
    ///
    /// # Panics
    /// Panics with a corruption fault if the two tables disagree.
    pub fn validate(&self) {
        let (forward, reverse) = self.side_lens();
        if forward != reverse {
            fatal(Corruption::BijectionCount { forward, reverse });
        }
        for (k, v) in self.forward.iter() {
            match self.reverse.try_get(v) {
                Some(back) if back == k => {}
                _ => fatal(Corruption::BijectionPair),
            }
        }
    }
}

// ================================================================================================
// STANDARD TRAIT IMPLEMENTATIONS
// ================================================================================================

impl<K, V, MK: Default, MV: Default> Default for BiMap<K, V, MK, MV> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, MK, MV> Clone for BiMap<K, V, MK, MV>
where
    K: Clone,
    V: Clone,
    MK: Clone,
    MV: Clone,
{
    fn clone(&self) -> Self {
        Self {
            forward: self.forward.clone(),
            reverse: self.reverse.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, MK, MV> fmt::Debug for BiMap<K, V, MK, MV> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.forward.iter()).finish()
    }
}

impl<K, V, MK, MV> Extend<(K, V)> for BiMap<K, V, MK, MV>
where
    K: Eq + Clone,
    V: Eq + Clone,
    MK: KeyMixer<K>,
    MV: KeyMixer<V>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V, MK, MV> FromIterator<(K, V)> for BiMap<K, V, MK, MV>
where
    K: Eq + Clone,
    V: Eq + Clone,
    MK: KeyMixer<K> + Default,
    MV: KeyMixer<V> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, MK, MV> IntoIterator for &'a BiMap<K, V, MK, MV> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
