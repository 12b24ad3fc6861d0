use rhmap::raw::{self, Bucket, RawTable, Tag};
use rhmap::{InsertError, RehashError};

mod common;
use common::check;

#[test]
fn init() {
    let table = RawTable::<u64, u64>::with_capacity(8);
    assert_eq!(table.capacity(), 8);
    assert_eq!(table.population(), 0);
    assert_eq!(table.max_distance(), 0);
    assert_eq!(table.load_factor(), 0.0);
    assert!(table.buckets().iter().all(|b| b.tag() == Tag::Empty));
}

#[test]
#[should_panic]
fn init_empty_storage() {
    let storage: Vec<Bucket<u64, u64>> = Vec::new();
    let _ = RawTable::<u64, u64, _>::init(storage);
}

#[test]
fn init_resets_reused_storage() {
    let mut table = RawTable::<u64, u64>::with_capacity(4);
    table.insert(1, 1).unwrap();
    table.insert(2, 2).unwrap();
    table.remove(2);

    // Storage handed back and reused starts out empty.
    let storage = table.into_storage();
    let table = RawTable::<u64, u64>::init(storage);
    assert!(table.is_empty());
    assert!(table.buckets().iter().all(|b| b.tag() == Tag::Empty));
}

#[test]
fn stack_storage() {
    let mut storage: [Bucket<u16, char>; 4] = std::array::from_fn(|_| Bucket::empty());

    {
        let mut table: RawTable<u16, char, _> = RawTable::init(&mut storage[..]);
        table.insert(1, 'a').unwrap();
        table.insert(5, 'b').unwrap();
        assert_eq!(table.search(5), Some(&'b'));
        check(&table);
    }

    // The entries outlive the table handle.
    assert_eq!(storage[1].key(), Some(1));
    assert_eq!(storage[2].value(), Some(&'b'));
    assert_eq!(storage[2].distance(), Some(1));
}

#[test]
fn vec_storage() {
    let storage: Vec<Bucket<u32, &str>> = (0..3).map(|_| Bucket::empty()).collect();
    let mut table: RawTable<u32, &str, _> = RawTable::init(storage);
    table.insert(9, "nine").unwrap();

    let old = table.rehash((0..7).map(|_| Bucket::empty()).collect()).unwrap();
    assert_eq!(old.len(), 3);
    assert_eq!(table.search(9), Some(&"nine"));
}

#[test]
fn round_trip() {
    let mut table = RawTable::<u64, String>::with_capacity(16);

    for key in [3, 19, 35, 4, 100] {
        let stored = table.insert(key, format!("v{key}")).unwrap();
        assert_eq!(*stored, format!("v{key}"));
        assert_eq!(table.search(key), Some(&format!("v{key}")));
    }

    check(&table);
    assert_eq!(table.population(), 5);
    assert!(table.contains(35));
    assert!(!table.contains(51));
}

#[test]
fn insert_returns_stored_value_after_displacement() {
    let mut table = RawTable::<u64, u64>::with_capacity(4);
    table.insert(1, 1).unwrap();
    table.insert(0, 0).unwrap();

    // 4 displaces 1 from slot 1; the returned reference is 4's value.
    *table.insert(4, 40).unwrap() += 1;
    assert_eq!(table.search(4), Some(&41));
    assert_eq!(table.search(1), Some(&1));
    check(&table);
}

#[test]
fn remove() {
    let mut table = RawTable::<u64, u64>::with_capacity(8);
    table.insert(7, 70).unwrap();
    table.insert(15, 150).unwrap();

    assert_eq!(table.remove(7), Some(70));
    assert_eq!(table.search(7), None);
    assert_eq!(table.population(), 1);
    assert_eq!(table.buckets()[7].tag(), Tag::Tombstone);

    // A second remove is a miss and leaves the population alone.
    assert_eq!(table.remove(7), None);
    assert_eq!(table.population(), 1);

    // 15 probes past the tombstone.
    assert_eq!(table.search(15), Some(&150));
    check(&table);
}

#[test]
fn tombstone_reuse() {
    let mut table = RawTable::<u64, &str>::with_capacity(8);
    table.insert(2, "a").unwrap();
    table.insert(10, "b").unwrap();
    table.insert(18, "c").unwrap();

    let population = table.population();
    assert_eq!(table.remove(10), Some("b"));
    table.insert(10, "b2").unwrap();

    assert_eq!(table.search(10), Some(&"b2"));
    assert_eq!(table.population(), population);
    check(&table);
}

#[test]
fn capacity_exhausted() {
    let mut table = RawTable::<u64, u64>::with_capacity(5);

    // Key 5 has ideal slot 0, which 0 already holds.
    for key in [0, 1, 2, 3, 5] {
        table.insert(key, key).unwrap();
    }

    assert_eq!(table.population(), 5);
    check(&table);

    let before: Vec<_> = table.buckets().iter().map(|b| (b.key(), b.distance())).collect();

    let err = table.insert(6, 60).unwrap_err();
    assert_eq!(
        err,
        InsertError {
            key: 6,
            value: 60,
            capacity: 5
        }
    );
    assert_eq!(err.to_string(), "table is full: all 5 buckets are occupied");

    let after: Vec<_> = table.buckets().iter().map(|b| (b.key(), b.distance())).collect();
    assert_eq!(before, after);
    assert_eq!(table.population(), 5);

    for key in [0, 1, 2, 3, 5] {
        assert_eq!(table.search(key), Some(&key));
    }
}

#[test]
fn full_table_misses() {
    let mut table = RawTable::<u64, ()>::with_capacity(4);
    for key in [0, 4, 8, 12] {
        table.insert(key, ()).unwrap();
    }

    // No empty bucket to stop at, the scan is bounded by the table length.
    assert!(!table.contains(16));
    assert!(!table.contains(1));
    check(&table);
}

#[test]
fn clear() {
    let mut table = RawTable::<u64, Vec<u8>>::with_capacity(6);
    table.insert(0, vec![0]).unwrap();
    table.insert(6, vec![6]).unwrap();
    table.insert(12, vec![12]).unwrap();
    table.remove(6);

    let mut destroyed = Vec::new();
    table.clear_with(|value| destroyed.extend(value));
    destroyed.sort();

    assert_eq!(destroyed, [0, 12]);
    assert_eq!(table.population(), 0);
    assert_eq!(table.max_distance(), 0);
    assert_eq!(table.capacity(), 6);
    assert!(table.buckets().iter().all(|b| b.tag() == Tag::Empty));

    // The table is fully usable afterwards.
    table.insert(6, vec![1]).unwrap();
    assert_eq!(table.search(6), Some(&vec![1]));
}

#[test]
fn rehash_preserves_contents() {
    let mut table = RawTable::<u64, u64>::with_capacity(64);
    let keys: Vec<u64> = (0..50).map(|i| i * 64 + i % 3).collect();

    for &key in &keys {
        table.insert(key, key * 2).unwrap();
    }

    for capacity in [50, 51, 97, 128] {
        let old = table.rehash(raw::alloc(capacity)).unwrap();

        // The old storage comes back emptied.
        assert!(old.iter().all(|b| b.tag() == Tag::Empty));

        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.population(), keys.len());
        check(&table);

        for &key in &keys {
            assert_eq!(table.search(key), Some(&(key * 2)));
        }
    }
}

#[test]
fn rehash_drops_tombstones() {
    let mut table = RawTable::<u64, u64>::with_capacity(4);
    for key in 0..4 {
        table.insert(key, key).unwrap();
    }
    table.remove(1);
    table.remove(2);

    table.rehash(raw::alloc(4)).unwrap();
    assert_eq!(
        table.buckets().iter().filter(|b| b.tag() == Tag::Tombstone).count(),
        0
    );
    assert_eq!(table.population(), 2);
    check(&table);
}

#[test]
fn rehash_too_small() {
    let mut table = RawTable::<u64, u64>::with_capacity(7);
    for key in [1, 2, 3] {
        table.insert(key, key * 10).unwrap();
    }

    // 3 <= 3
    table.rehash(raw::alloc(3)).unwrap();
    assert_eq!(table.capacity(), 3);
    for key in [1, 2, 3] {
        assert_eq!(table.search(key), Some(&(key * 10)));
    }

    let max_distance = table.max_distance();
    let err: RehashError<_> = table.rehash(raw::alloc(2)).unwrap_err();
    assert_eq!(err.population, 3);
    assert_eq!(err.capacity, 2);
    assert_eq!(err.to_string(), "cannot rehash 3 entries into 2 buckets");
    assert_eq!(err.into_storage().len(), 2);

    assert_eq!(table.capacity(), 3);
    assert_eq!(table.population(), 3);
    assert_eq!(table.max_distance(), max_distance);
    for key in [1, 2, 3] {
        assert_eq!(table.search(key), Some(&(key * 10)));
    }
}

#[test]
fn search_mut() {
    let mut table = RawTable::<u8, u32>::with_capacity(3);
    table.insert(200, 1).unwrap();
    *table.search_mut(200).unwrap() = 2;
    assert_eq!(table.search(200), Some(&2));
    assert!(table.search_mut(201).is_none());
}

#[test]
fn wide_keys() {
    let mut table = RawTable::<u128, u8>::with_capacity(5);
    table.insert(u128::MAX, 1).unwrap();
    table.insert(u128::MAX - 5, 2).unwrap();
    assert_eq!(table.search(u128::MAX), Some(&1));
    assert_eq!(table.search(u128::MAX - 5), Some(&2));
    check(&table);
}

#[test]
fn debug() {
    let mut table = RawTable::<u64, u64>::with_capacity(4);
    table.insert(1, 10).unwrap();
    table.insert(2, 20).unwrap();
    assert_eq!(format!("{table:?}"), "{1: 10, 2: 20}");
}
