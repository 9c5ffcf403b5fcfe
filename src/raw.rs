//! Slot array and the probe/resize engine shared by every map in the crate.
//!
//! The table only sees pre-mixed tags and equality closures; choosing a mixer and
//! comparing keys is the caller's business, and so is remapping tags that collide with
//! a sentinel. Invariants held between calls:
//!
//! - `slots.len()` is a power of two and at least [`MIN_CAPACITY`].
//! - a slot's key and value are initialized iff its tag is neither [`EMPTY`] nor
//!   [`TOMBSTONE`].
//! - `live + tombstones <= capacity * 3 / 4` after every insertion, so a probe always
//!   reaches an empty slot.

use std::mem::{self, MaybeUninit};

use crate::error::{fatal, Corruption};

// ================================================================================================
// CONSTANTS
// ================================================================================================

/// Tag of a slot that has never been occupied since the last clear or rehash.
pub(crate) const EMPTY: i32 = 0;

/// Tag of a slot whose entry was removed. Keeps probe chains intact.
pub(crate) const TOMBSTONE: i32 = -1;

/// Smallest slot count a table is ever created with.
pub const MIN_CAPACITY: usize = 16;

/// Load factor as a ratio: grow once `(live + tombstones) / capacity >= 3/4`.
const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;

// ================================================================================================
// SLOT
// ================================================================================================

/// One entry of the slot array: a control tag plus an optionally initialized pair.
pub(crate) struct Slot<K, V> {
    tag: i32,
    key: MaybeUninit<K>,
    value: MaybeUninit<V>,
}

impl<K, V> Slot<K, V> {
    #[inline(always)]
    fn empty() -> Self {
        Self {
            tag: EMPTY,
            key: MaybeUninit::uninit(),
            value: MaybeUninit::uninit(),
        }
    }

    #[inline(always)]
    pub(crate) fn is_occupied(&self) -> bool {
        self.tag != EMPTY && self.tag != TOMBSTONE
    }

    #[inline(always)]
    pub(crate) fn pair(&self) -> Option<(&K, &V)> {
        if self.is_occupied() {
            // SAFETY: occupied slots always hold an initialized key and value.
            Some(unsafe { (self.key.assume_init_ref(), self.value.assume_init_ref()) })
        } else {
            None
        }
    }

    #[inline(always)]
    pub(crate) fn pair_mut(&mut self) -> Option<(&K, &mut V)> {
        if self.is_occupied() {
            let Slot { key, value, .. } = self;
            // SAFETY: occupied slots always hold an initialized key and value.
            Some(unsafe { (key.assume_init_ref(), value.assume_init_mut()) })
        } else {
            None
        }
    }

    /// Consume a slot that has been moved out of its table.
    #[inline(always)]
    pub(crate) fn into_pair(self) -> Option<(K, V)> {
        if self.is_occupied() {
            // SAFETY: occupied slots always hold an initialized key and value, and `self`
            // is owned so nothing else will read them again.
            Some(unsafe { (self.key.assume_init(), self.value.assume_init()) })
        } else {
            None
        }
    }

    /// Move the pair out and retag the slot. The caller fixes the counters.
    ///
    /// # Safety
    /// The slot must be occupied.
    #[inline(always)]
    unsafe fn take(&mut self, tag: i32) -> (K, V) {
        debug_assert!(self.is_occupied());
        self.tag = tag;
        (self.key.assume_init_read(), self.value.assume_init_read())
    }

    #[inline(always)]
    fn write(&mut self, tag: i32, key: K, value: V) {
        debug_assert!(!self.is_occupied());
        self.key.write(key);
        self.value.write(value);
        self.tag = tag;
    }
}

// ================================================================================================
// PROBE RESULT
// ================================================================================================

/// Outcome of walking a probe sequence for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The key lives at this index.
    Found(usize),
    /// The key is absent; this is where it would go (first tombstone seen, else the
    /// empty slot that ended the walk).
    Vacant(usize),
}

// ================================================================================================
// RAW TABLE
// ================================================================================================

/// Flat open-addressing table with linear probing and tombstone deletion.
pub(crate) struct RawTable<K, V> {
    slots: Box<[Slot<K, V>]>,
    live: usize,
    tombstones: usize,
}

impl<K, V> RawTable<K, V> {
    /// Create a table with `capacity_hint` rounded up to a power of two (floor 16).
    pub(crate) fn with_capacity(capacity_hint: usize) -> Self {
        Self {
            slots: alloc_slots(capacity_for_hint(capacity_hint)),
            live: 0,
            tombstones: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    #[inline(always)]
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline(always)]
    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    #[inline(always)]
    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }

    // ============================================================================================
    // PROBING
    // ============================================================================================

    /// Index of the slot holding a key with this tag that satisfies `eq`.
    ///
    /// Tombstones never stop the walk: the key may have been inserted after a colliding
    /// entry that has since been removed.
    #[inline]
    pub(crate) fn find<F>(&self, tag: i32, mut eq: F) -> Option<usize>
    where
        F: FnMut(&K) -> bool,
    {
        debug_assert!(tag != EMPTY && tag != TOMBSTONE);
        let mask = self.mask();
        let mut idx = home(tag, mask);
        loop {
            let slot = &self.slots[idx];
            if slot.tag == EMPTY {
                return None;
            }
            // The tag check keeps `eq` off tombstones and off most foreign keys.
            if slot.tag == tag {
                // SAFETY: callers pass remapped tags, never a sentinel, so the slot is occupied.
                if eq(unsafe { slot.key.assume_init_ref() }) {
                    return Some(idx);
                }
            }
            idx = (idx + 1) & mask;
        }
    }

    /// Walk the probe sequence for an upsert: either the key's slot or the slot where it
    /// should be written.
    #[inline]
    pub(crate) fn probe<F>(&self, tag: i32, mut eq: F) -> Probe
    where
        F: FnMut(&K) -> bool,
    {
        debug_assert!(tag != EMPTY && tag != TOMBSTONE);
        let mask = self.mask();
        let mut idx = home(tag, mask);
        let mut reusable = None;
        loop {
            let slot = &self.slots[idx];
            match slot.tag {
                EMPTY => return Probe::Vacant(reusable.unwrap_or(idx)),
                TOMBSTONE => {
                    if reusable.is_none() {
                        reusable = Some(idx);
                    }
                }
                t if t == tag => {
                    // SAFETY: non-sentinel tag, so the slot is occupied.
                    if eq(unsafe { slot.key.assume_init_ref() }) {
                        return Probe::Found(idx);
                    }
                }
                _ => {}
            }
            idx = (idx + 1) & mask;
        }
    }

    /// First non-occupied slot on the probe sequence of `tag`. Only valid for a key
    /// already known to be absent.
    #[inline]
    fn vacant_slot(&self, tag: i32) -> usize {
        let mask = self.mask();
        let mut idx = home(tag, mask);
        while self.slots[idx].is_occupied() {
            idx = (idx + 1) & mask;
        }
        idx
    }

    // ============================================================================================
    // MUTATION
    // ============================================================================================

    /// Store a new pair at the vacant slot reported by [`RawTable::probe`], growing first
    /// if the table is at its load limit. Returns the index the pair ended up in.
    pub(crate) fn insert_vacant(&mut self, vacant: usize, tag: i32, key: K, value: V) -> usize {
        let idx = if self.needs_growth() {
            self.rehash_to(self.growth_target());
            self.vacant_slot(tag)
        } else {
            vacant
        };

        let slot = &mut self.slots[idx];
        if slot.tag == TOMBSTONE {
            self.tombstones -= 1;
        }
        slot.write(tag, key, value);
        self.live += 1;
        idx
    }

    /// Turn the occupied slot at `idx` into a tombstone and hand back its pair.
    pub(crate) fn remove_at(&mut self, idx: usize) -> (K, V) {
        let slot = &mut self.slots[idx];
        assert!(slot.is_occupied(), "remove_at on a vacant slot");
        // SAFETY: checked occupied above.
        let pair = unsafe { slot.take(TOMBSTONE) };
        self.live -= 1;
        self.tombstones += 1;
        pair
    }

    /// Move the pair out of `idx` and mark the slot empty without leaving a tombstone.
    ///
    /// This breaks probe chains running through `idx`; it is only used while the whole
    /// table is being emptied.
    pub(crate) fn vacate_at(&mut self, idx: usize) -> Option<(K, V)> {
        let slot = &mut self.slots[idx];
        if !slot.is_occupied() {
            return None;
        }
        // SAFETY: checked occupied above.
        let pair = unsafe { slot.take(EMPTY) };
        self.live -= 1;
        Some(pair)
    }

    /// Turn every tombstone back into an empty slot. Only sound once no live entry is
    /// left whose probe chain depends on them.
    pub(crate) fn reset_tombstones(&mut self) {
        debug_assert_eq!(self.live, 0);
        if self.tombstones == 0 {
            return;
        }
        for slot in self.slots.iter_mut() {
            if slot.tag == TOMBSTONE {
                slot.tag = EMPTY;
            }
        }
        self.tombstones = 0;
    }

    #[inline(always)]
    pub(crate) fn value_ref(&self, idx: usize) -> &V {
        let slot = &self.slots[idx];
        assert!(slot.is_occupied(), "value_ref on a vacant slot");
        // SAFETY: checked occupied above.
        unsafe { slot.value.assume_init_ref() }
    }

    #[inline(always)]
    pub(crate) fn value_mut(&mut self, idx: usize) -> &mut V {
        let slot = &mut self.slots[idx];
        assert!(slot.is_occupied(), "value_mut on a vacant slot");
        // SAFETY: checked occupied above.
        unsafe { slot.value.assume_init_mut() }
    }

    #[inline(always)]
    pub(crate) fn pair_at(&self, idx: usize) -> (&K, &V) {
        match self.slots[idx].pair() {
            Some(pair) => pair,
            None => panic!("pair_at on a vacant slot"),
        }
    }

    /// Remove entries for which `keep` returns false, leaving tombstones behind.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        for idx in 0..self.slots.len() {
            let drop_it = match self.slots[idx].pair_mut() {
                Some((k, v)) => !keep(k, v),
                None => false,
            };
            if drop_it {
                drop(self.remove_at(idx));
            }
        }
    }

    /// Drop every entry and reset all slots to empty, keeping the capacity.
    ///
    /// Each pair is moved out and its slot tombstoned before the pair is dropped, so a
    /// panicking `Drop` leaves a consistent table holding the entries not yet reached.
    pub(crate) fn clear(&mut self) {
        if self.live == 0 && self.tombstones == 0 {
            return;
        }
        for idx in 0..self.slots.len() {
            if self.slots[idx].is_occupied() {
                drop(self.remove_at(idx));
            }
        }
        self.reset_tombstones();
    }

    /// Hand the slot array over to an owning iterator, leaving an empty shell behind.
    pub(crate) fn take_slots(&mut self) -> (Box<[Slot<K, V>]>, usize) {
        let live = mem::replace(&mut self.live, 0);
        self.tombstones = 0;
        (mem::take(&mut self.slots), live)
    }

    // ============================================================================================
    // GROWTH
    // ============================================================================================

    /// True once consuming another slot would break the load factor.
    #[inline(always)]
    pub(crate) fn needs_growth(&self) -> bool {
        (self.live + self.tombstones) * LOAD_FACTOR_DEN >= self.slots.len() * LOAD_FACTOR_NUM
    }

    /// Capacity the next resize should use. Growth always doubles; the rehash drops
    /// every tombstone on the way.
    #[inline]
    pub(crate) fn growth_target(&self) -> usize {
        self.slots.len() * 2
    }

    /// Capacity needed to take `additional` more entries without a resize, if the current
    /// one is not enough.
    pub(crate) fn reserve_target(&self, additional: usize) -> Option<usize> {
        let used = (self.live + self.tombstones).saturating_add(additional);
        if fits(used, self.slots.len()) {
            return None;
        }
        let wanted = capacity_for_entries(self.live.saturating_add(additional));
        Some(wanted.max(self.slots.len()))
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        if let Some(target) = self.reserve_target(additional) {
            self.rehash_to(target);
        }
    }

    /// Move every live entry into a fresh slot array of `new_capacity` slots.
    ///
    /// Entries are placed by their stored tags; no key is re-hashed or compared. A moved
    /// count that disagrees with the live count is a fatal corruption.
    pub(crate) fn rehash_to(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity.is_power_of_two());
        debug_assert!(new_capacity * LOAD_FACTOR_NUM >= self.live * LOAD_FACTOR_DEN);

        let expected = self.live;
        let old_capacity = self.slots.len();
        let old_tombstones = self.tombstones;
        let old = mem::replace(&mut self.slots, alloc_slots(new_capacity));
        self.live = 0;
        self.tombstones = 0;

        let mut moved = 0usize;
        for slot in old.into_vec() {
            let tag = slot.tag;
            if let Some((key, value)) = slot.into_pair() {
                let idx = self.vacant_slot(tag);
                self.slots[idx].write(tag, key, value);
                moved += 1;
            }
        }
        self.live = moved;

        if moved != expected {
            fatal(Corruption::RehashCount { expected, moved });
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(
                old_capacity,
                new_capacity,
                live = moved,
                tombstones_reclaimed = old_tombstones,
                "probe table rehashed"
            );
        }
    }
}

impl<K: Clone, V: Clone> Clone for RawTable<K, V> {
    fn clone(&self) -> Self {
        let slots: Vec<Slot<K, V>> = self
            .slots
            .iter()
            .map(|slot| match slot.pair() {
                Some((k, v)) => Slot {
                    tag: slot.tag,
                    key: MaybeUninit::new(k.clone()),
                    value: MaybeUninit::new(v.clone()),
                },
                None => Slot {
                    tag: slot.tag,
                    key: MaybeUninit::uninit(),
                    value: MaybeUninit::uninit(),
                },
            })
            .collect();
        Self {
            slots: slots.into_boxed_slice(),
            live: self.live,
            tombstones: self.tombstones,
        }
    }
}

impl<K, V> Drop for RawTable<K, V> {
    fn drop(&mut self) {
        if !(mem::needs_drop::<K>() || mem::needs_drop::<V>()) || self.live == 0 {
            return;
        }
        for slot in self.slots.iter_mut() {
            if slot.is_occupied() {
                // SAFETY: occupied slot, and the table is going away.
                unsafe {
                    slot.key.assume_init_drop();
                    slot.value.assume_init_drop();
                }
            }
        }
    }
}

// ================================================================================================
// UTILITY FUNCTIONS
// ================================================================================================

/// Home slot of a tag under the given mask.
#[inline(always)]
fn home(tag: i32, mask: usize) -> usize {
    (tag as u32 as usize) & mask
}

fn alloc_slots<K, V>(capacity: usize) -> Box<[Slot<K, V>]> {
    (0..capacity).map(|_| Slot::empty()).collect()
}

/// Round a requested slot count up to a valid table capacity.
pub(crate) fn capacity_for_hint(hint: usize) -> usize {
    checked_pow2(hint.max(MIN_CAPACITY))
}

/// Smallest capacity that holds `entries` without crossing the load factor.
fn capacity_for_entries(entries: usize) -> usize {
    let slots = entries.saturating_mul(LOAD_FACTOR_DEN).div_ceil(LOAD_FACTOR_NUM);
    checked_pow2(slots.max(MIN_CAPACITY))
}

#[inline(always)]
fn fits(used: usize, capacity: usize) -> bool {
    used.saturating_mul(LOAD_FACTOR_DEN) <= capacity.saturating_mul(LOAD_FACTOR_NUM)
}

fn checked_pow2(n: usize) -> usize {
    match n.checked_next_power_of_two() {
        Some(c) => c,
        None => panic!("probe table capacity overflow"),
    }
}
