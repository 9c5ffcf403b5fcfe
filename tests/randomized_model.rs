use probemap_rs::{BiMap, IntMap, LongMap, MapError, ProbeMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const OPS: usize = 20_000;

#[test]
fn test_probe_map_matches_std_hash_map() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut map: ProbeMap<u32, u64> = ProbeMap::new();
    let mut model: HashMap<u32, u64> = HashMap::new();

    for step in 0..OPS {
        let key = rng.gen_range(0..512u32);
        match rng.gen_range(0..5) {
            0 => {
                let expected = if model.contains_key(&key) {
                    Err(MapError::KeyConflict)
                } else {
                    model.insert(key, step as u64);
                    Ok(())
                };
                assert_eq!(map.add(key, step as u64), expected, "add {key} at step {step}");
            }
            1 => {
                assert_eq!(map.insert(key, step as u64), model.insert(key, step as u64));
            }
            2 => {
                assert_eq!(map.remove(&key), model.remove(&key), "remove {key} at step {step}");
            }
            3 => {
                let (value, added) = map.get_or_add(key, step as u64);
                let absent = !model.contains_key(&key);
                let expected = *model.entry(key).or_insert(step as u64);
                assert_eq!(added, absent);
                assert_eq!(*value, expected);
            }
            _ => {
                assert_eq!(map.try_get(&key), model.get(&key), "get {key} at step {step}");
            }
        }
        assert_eq!(map.len(), model.len());
    }

    let mut entries: Vec<(u32, u64)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable();
    let mut expected: Vec<(u32, u64)> = model.into_iter().collect();
    expected.sort_unstable();
    assert_eq!(entries, expected);
}

#[test]
fn test_resize_preserves_membership() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut map: LongMap<i64> = LongMap::new();
    let mut model: HashMap<i64, i64> = HashMap::new();

    while model.len() < 5_000 {
        let key: i64 = rng.gen();
        let before = map.capacity();
        map.set(key, key.wrapping_mul(3));
        model.insert(key, key.wrapping_mul(3));

        if map.capacity() != before {
            assert_eq!(map.len(), model.len());
            for (k, v) in &model {
                assert_eq!(map.get(k), Ok(v));
            }
        }
    }
}

#[test]
fn test_tombstone_reuse_under_churn() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut map: IntMap<u8> = IntMap::new();
    let mut model: HashMap<i32, u8> = HashMap::new();

    for _ in 0..OPS {
        let key = rng.gen_range(-64..64);
        if rng.gen_bool(0.5) {
            map.set(key, 1);
            model.insert(key, 1);
        } else {
            assert_eq!(map.remove(&key), model.remove(&key));
        }
        assert!((map.len() + map.tombstones()) * 4 <= map.capacity() * 3);
    }

    for key in -64..64 {
        assert_eq!(map.contains_key(&key), model.contains_key(&key));
    }
}

#[test]
fn test_bimap_stays_bijective() {
    let mut rng = StdRng::seed_from_u64(0xb1);
    let mut map: BiMap<u16, u16> = BiMap::new();
    let mut forward: HashMap<u16, u16> = HashMap::new();
    let mut reverse: HashMap<u16, u16> = HashMap::new();

    for _ in 0..OPS / 4 {
        let key = rng.gen_range(0..64u16);
        let value = rng.gen_range(0..64u16);
        match rng.gen_range(0..4) {
            0 => {
                let result = map.add(key, value);
                if forward.contains_key(&key) {
                    assert_eq!(result, Err(MapError::KeyConflict));
                } else if reverse.contains_key(&value) {
                    assert_eq!(result, Err(MapError::ValueConflict));
                } else {
                    assert_eq!(result, Ok(()));
                    forward.insert(key, value);
                    reverse.insert(value, key);
                }
            }
            1 => {
                let evicted = map.set(key, value);
                if forward.get(&key) != Some(&value) {
                    let old_value = forward.remove(&key);
                    if let Some(v) = old_value {
                        reverse.remove(&v);
                    }
                    let old_key = reverse.remove(&value);
                    if let Some(k) = old_key {
                        forward.remove(&k);
                    }
                    assert_eq!(evicted.previous_value, old_value);
                    assert_eq!(evicted.previous_key, old_key);
                    forward.insert(key, value);
                    reverse.insert(value, key);
                } else {
                    assert!(evicted.is_empty());
                }
            }
            2 => {
                let expected = forward.remove(&key);
                if let Some(v) = expected {
                    reverse.remove(&v);
                }
                assert_eq!(map.remove(&key), expected);
            }
            _ => {
                let expected = reverse.remove(&value);
                if let Some(k) = expected {
                    forward.remove(&k);
                }
                assert_eq!(map.remove_value(&value), expected);
            }
        }

        map.validate();
        let (f, r) = map.side_lens();
        assert_eq!(f, forward.len());
        assert_eq!(r, reverse.len());
        for (k, v) in map.iter() {
            assert_eq!(map.get_key(v), Ok(k));
            assert_eq!(forward.get(k), Some(v));
        }
    }
}
