//! Single-key open-addressing map.

use std::borrow::Borrow;
use std::fmt;
use std::mem;
use std::ops::Index;

use crate::error::{MapError, Result};
use crate::iter::{Drain, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::mix::{finish, HashedKeys, IntKeys, KeyMixer, LongKeys};
use crate::raw::{Probe, RawTable};

/// Map keyed by 32-bit signed integers (entity ids, block-state ids).
pub type IntMap<V> = ProbeMap<i32, V, IntKeys>;

/// Map keyed by 32-bit unsigned integers.
pub type UIntMap<V> = ProbeMap<u32, V, IntKeys>;

/// Map keyed by 64-bit signed integers (packed positions, chunk coordinates).
pub type LongMap<V> = ProbeMap<i64, V, LongKeys>;

/// Map keyed by 64-bit unsigned integers.
pub type ULongMap<V> = ProbeMap<u64, V, LongKeys>;

// ================================================================================================
// MAIN MAP STRUCTURE
// ================================================================================================

/// Open-addressing hash map with linear probing and tombstone deletion.
///
/// `M` picks the hash mixing policy: [`HashedKeys`] for arbitrary `Hash` keys,
/// [`IntKeys`] / [`LongKeys`] for native integers (see the [`IntMap`] and [`LongMap`]
/// aliases).
///
/// The map is single-threaded. References handed out by [`ProbeMap::get_mut`] or
/// [`ProbeMap::get_or_add`] point straight into the slot array and are invalidated by
/// the next mutation, which the borrow checker enforces.
pub struct ProbeMap<K, V, M = HashedKeys> {
    raw: RawTable<K, V>,
    mixer: M,
}

// ================================================================================================
// CONSTRUCTORS
// ================================================================================================

impl<K, V, M: Default> ProbeMap<K, V, M> {
    /// Create an empty map with the minimum capacity (16 slots).
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with at least `capacity_hint` slots.
    ///
    /// The hint is a slot count, rounded up to the next power of two with a floor of 16.
    pub fn with_capacity(capacity_hint: usize) -> Self {
        Self::with_capacity_and_mixer(capacity_hint, M::default())
    }
}

impl<K, V, M> ProbeMap<K, V, M> {
    /// Create an empty map using the given mixer.
    pub fn with_mixer(mixer: M) -> Self {
        Self::with_capacity_and_mixer(0, mixer)
    }

    /// Create an empty map with at least `capacity_hint` slots and the given mixer.
    pub fn with_capacity_and_mixer(capacity_hint: usize, mixer: M) -> Self {
        Self {
            raw: RawTable::with_capacity(capacity_hint),
            mixer,
        }
    }

    // ============================================================================================
    // SIZE AND DIAGNOSTICS
    // ============================================================================================

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Number of slots in the backing array. Always a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Number of slots currently held by tombstones.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.raw.tombstones()
    }

    /// The mixer this map hashes keys with.
    #[inline]
    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    /// Remove every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    // ============================================================================================
    // ITERATION
    // ============================================================================================

    /// Iterate over `(&K, &V)` pairs in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.raw.slots(), self.raw.len())
    }

    /// Iterate over `(&K, &mut V)` pairs in slot order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let live = self.raw.len();
        IterMut::new(self.raw.slots_mut(), live)
    }

    /// Iterate over keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Iterate over values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Iterate over values mutably.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    /// Remove and yield every entry. The map keeps its capacity.
    ///
    /// Entries not consumed before the iterator is dropped are dropped with it.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain::new(&mut self.raw)
    }

    /// Keep only the entries for which `f` returns true. Values may be edited in place.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.raw.retain(f);
    }

    // ============================================================================================
    // LOOKUP
    // ============================================================================================

    /// Slot tag for `key`. Mixer output is never trusted to avoid the sentinels.
    #[inline(always)]
    fn tag_of<Q>(&self, key: &Q) -> i32
    where
        Q: ?Sized,
        M: KeyMixer<Q>,
    {
        finish(self.mixer.mix(key))
    }

    #[inline]
    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        M: KeyMixer<Q>,
    {
        let tag = self.tag_of(key);
        self.raw.find(tag, |k| k.borrow() == key)
    }

    /// Value stored for `key`, or [`MapError::KeyNotFound`].
    ///
    /// Prefer [`ProbeMap::try_get`] when absence is an expected outcome.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        M: KeyMixer<Q>,
    {
        self.try_get(key).ok_or(MapError::KeyNotFound)
    }

    /// Value stored for `key`, if any.
    #[inline]
    pub fn try_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        M: KeyMixer<Q>,
    {
        self.find(key).map(|idx| self.raw.value_ref(idx))
    }

    /// Stored key and value for `key`, if any.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        M: KeyMixer<Q>,
    {
        self.find(key).map(|idx| self.raw.pair_at(idx))
    }

    /// In-place mutable access to the value stored for `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        M: KeyMixer<Q>,
    {
        match self.find(key) {
            Some(idx) => Some(self.raw.value_mut(idx)),
            None => None,
        }
    }

    /// Check whether the given key is present.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        M: KeyMixer<Q>,
    {
        self.find(key).is_some()
    }

    // ============================================================================================
    // REMOVAL
    // ============================================================================================

    /// Remove `key`, returning its value if it was present. The slot becomes a tombstone.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        M: KeyMixer<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove `key`, returning the stored key and value if it was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        M: KeyMixer<Q>,
    {
        let idx = self.find(key)?;
        Some(self.raw.remove_at(idx))
    }

    // ============================================================================================
    // GROWTH HOOKS FOR PAIRED TABLES
    // ============================================================================================

    #[inline]
    pub(crate) fn needs_growth(&self) -> bool {
        self.raw.needs_growth()
    }

    #[inline]
    pub(crate) fn growth_target(&self) -> usize {
        self.raw.growth_target()
    }

    #[inline]
    pub(crate) fn reserve_target(&self, additional: usize) -> Option<usize> {
        self.raw.reserve_target(additional)
    }

    #[inline]
    pub(crate) fn rehash_to(&mut self, capacity: usize) {
        self.raw.rehash_to(capacity);
    }
}

// ================================================================================================
// INSERTION
// ================================================================================================

impl<K: Eq, V, M: KeyMixer<K>> ProbeMap<K, V, M> {
    /// Insert `key` only if it is absent; [`MapError::KeyConflict`] otherwise.
    ///
    /// A rejected call leaves the map untouched, including its capacity.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        let tag = self.tag_of(&key);
        match self.raw.probe(tag, |k| *k == key) {
            Probe::Found(_) => Err(MapError::KeyConflict),
            Probe::Vacant(idx) => {
                self.raw.insert_vacant(idx, tag, key, value);
                Ok(())
            }
        }
    }

    /// Insert or overwrite the value for `key`.
    pub fn set(&mut self, key: K, value: V) {
        let _ = self.insert(key, value);
    }

    /// Insert or overwrite the value for `key`, returning the replaced value.
    ///
    /// Overwriting never grows the table; only a new key consumes a slot.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let tag = self.tag_of(&key);
        match self.raw.probe(tag, |k| *k == key) {
            Probe::Found(idx) => Some(mem::replace(self.raw.value_mut(idx), value)),
            Probe::Vacant(idx) => {
                self.raw.insert_vacant(idx, tag, key, value);
                None
            }
        }
    }

    /// Mutable access to the value for `key`, inserting `default` first if it is absent.
    ///
    /// Returns the value handle and whether the entry was added by this call.
    pub fn get_or_add(&mut self, key: K, default: V) -> (&mut V, bool) {
        self.get_or_add_with(key, || default)
    }

    /// Like [`ProbeMap::get_or_add`], building the default only when needed.
    pub fn get_or_add_with<F>(&mut self, key: K, f: F) -> (&mut V, bool)
    where
        F: FnOnce() -> V,
    {
        let tag = self.tag_of(&key);
        match self.raw.probe(tag, |k| *k == key) {
            Probe::Found(idx) => (self.raw.value_mut(idx), false),
            Probe::Vacant(idx) => {
                let idx = self.raw.insert_vacant(idx, tag, key, f());
                (self.raw.value_mut(idx), true)
            }
        }
    }

    /// Make room for at least `additional` more entries without another resize.
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }
}

// ================================================================================================
// STANDARD TRAIT IMPLEMENTATIONS
// ================================================================================================

impl<K, V, M: Default> Default for ProbeMap<K, V, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, M: Clone> Clone for ProbeMap<K, V, M> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            mixer: self.mixer.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, M> fmt::Debug for ProbeMap<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, M> PartialEq for ProbeMap<K, V, M>
where
    K: Eq,
    V: PartialEq,
    M: KeyMixer<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.try_get(k).map_or(false, |ov| v == ov))
    }
}

impl<K: Eq, V: Eq, M: KeyMixer<K>> Eq for ProbeMap<K, V, M> {}

impl<K, Q, V, M> Index<&Q> for ProbeMap<K, V, M>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
    M: KeyMixer<Q>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.try_get(key) {
            Some(v) => v,
            None => panic!("key not found in ProbeMap"),
        }
    }
}

impl<K: Eq, V, M: KeyMixer<K>> Extend<(K, V)> for ProbeMap<K, V, M> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K: Eq, V, M: KeyMixer<K> + Default> FromIterator<(K, V)> for ProbeMap<K, V, M> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, M> IntoIterator for ProbeMap<K, V, M> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let (slots, live) = self.raw.take_slots();
        IntoIter::new(slots, live)
    }
}

impl<'a, K, V, M> IntoIterator for &'a ProbeMap<K, V, M> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, M> IntoIterator for &'a mut ProbeMap<K, V, M> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
