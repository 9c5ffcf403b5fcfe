use probemap_rs::{
    HashedKeys, IntKeys, IntMap, KeyMixer, LongKeys, LongMap, UIntMap, ULongMap, REMAPPED_TAG,
};
use std::collections::HashSet;

#[test]
fn test_congruent_keys_are_decorrelated() {
    let mut m: IntMap<&str> = IntMap::new();
    let keys = [0, 16, 32, 48];
    for (i, k) in keys.iter().enumerate() {
        m.add(*k, ["a", "b", "c", "d"][i]).unwrap();
    }
    assert_eq!(m.len(), 4);
    assert_eq!(m.capacity(), 16);
    assert_eq!(m.get(&0), Ok(&"a"));
    assert_eq!(m.get(&16), Ok(&"b"));
    assert_eq!(m.get(&32), Ok(&"c"));
    assert_eq!(m.get(&48), Ok(&"d"));

    // Keys equal mod 16 must not share a home slot under the default mask.
    let homes: HashSet<i32> = keys.iter().map(|k| IntKeys.mix(k) & 15).collect();
    assert_eq!(homes.len(), keys.len());
}

#[test]
fn test_sequential_keys_spread_across_slots() {
    let homes: HashSet<i32> = (0..64i32).map(|k| IntKeys.mix(&k) & 63).collect();
    assert!(homes.len() > 32, "only {} distinct home slots", homes.len());

    // Packed coordinates that differ only in the upper half.
    let packed: Vec<i64> = (0..64i64).map(|x| x << 32).collect();
    let homes: HashSet<i32> = packed.iter().map(|k| LongKeys.mix(k) & 63).collect();
    assert!(homes.len() > 32, "only {} distinct home slots", homes.len());
}

#[test]
fn test_mixers_never_emit_sentinels() {
    for k in -100_000i32..100_000 {
        let tag = IntKeys.mix(&k);
        assert!(tag != 0 && tag != -1, "IntKeys mixed {k} to sentinel {tag}");
    }
    for k in -100_000i64..100_000 {
        let tag = LongKeys.mix(&(k.wrapping_mul(0x1_0000_0001)));
        assert!(tag != 0 && tag != -1, "LongKeys mixed {k} to sentinel {tag}");
    }
    let hashed = HashedKeys::new();
    for k in 0..100_000u64 {
        let tag = hashed.mix(&k);
        assert!(tag != 0 && tag != -1);
    }
}

#[test]
fn test_zero_key_is_remapped() {
    // Zero multiplies to zero, which would read as an empty slot.
    assert_eq!(IntKeys.mix(&0i32), REMAPPED_TAG);
    assert_eq!(IntKeys.mix(&0u32), REMAPPED_TAG);
    assert_eq!(LongKeys.mix(&0i64), REMAPPED_TAG);

    let mut m: IntMap<u8> = IntMap::new();
    m.set(0, 1);
    assert_eq!(m.get(&0), Ok(&1));
}

#[test]
fn test_negative_and_extreme_keys() {
    let mut m: IntMap<i32> = IntMap::new();
    for k in [i32::MIN, -1, 0, 1, i32::MAX] {
        m.add(k, k.wrapping_neg()).unwrap();
    }
    for k in [i32::MIN, -1, 0, 1, i32::MAX] {
        assert_eq!(m.get(&k), Ok(&k.wrapping_neg()));
    }

    let mut u: UIntMap<u32> = UIntMap::new();
    u.set(u32::MAX, 1);
    u.set(0, 2);
    assert_eq!(u.get(&u32::MAX), Ok(&1));
    assert_eq!(u.get(&0), Ok(&2));
}

#[test]
fn test_long_map_chunk_coordinates() {
    fn pack(x: i32, z: i32) -> i64 {
        ((x as i64) << 32) | (z as u32 as i64)
    }

    let mut chunks: LongMap<(i32, i32)> = LongMap::new();
    for x in -10..10 {
        for z in -10..10 {
            chunks.add(pack(x, z), (x, z)).unwrap();
        }
    }
    assert_eq!(chunks.len(), 400);
    assert_eq!(chunks.get(&pack(-10, 9)), Ok(&(-10, 9)));
    assert_eq!(chunks.get(&pack(3, -3)), Ok(&(3, -3)));

    for x in -10..0 {
        for z in -10..10 {
            assert_eq!(chunks.remove(&pack(x, z)), Some((x, z)));
        }
    }
    assert_eq!(chunks.len(), 200);
    assert!(!chunks.contains_key(&pack(-1, 0)));
    assert!(chunks.contains_key(&pack(0, 0)));

    let mut unsigned: ULongMap<()> = ULongMap::new();
    unsigned.set(u64::MAX, ());
    assert!(unsigned.contains_key(&u64::MAX));
}

#[test]
fn test_int_map_churn_resizes_double_and_drop_tombstones() {
    let mut m: IntMap<u32> = IntMap::new();
    let mut resizes = 0;
    for i in 0..10_000 {
        let before = m.capacity();
        m.set(i, i as u32);
        if m.capacity() != before {
            resizes += 1;
            assert_eq!(m.capacity(), before * 2);
            assert_eq!(m.tombstones(), 0);
        }
        if i >= 8 {
            assert_eq!(m.remove(&(i - 8)), Some((i - 8) as u32));
        }
        assert!((m.len() + m.tombstones()) * 4 <= m.capacity() * 3);
    }
    assert!(resizes > 0);
    assert_eq!(m.len(), 8);
    for i in 10_000 - 8..10_000 {
        assert_eq!(m.get(&i), Ok(&(i as u32)));
    }
}
