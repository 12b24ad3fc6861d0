#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use rhmap::HashMap as RhHashMap;
use std::collections::HashMap as StdHashMap;

#[derive(Debug, Arbitrary)]
enum Operation<K, V> {
    Insert(K, V),
    Remove(K),
    Get(K),
    Contains(K),
    Update(K, V),
    Reserve(u8),
    Clear,
    Len,
    IsEmpty,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    max_load: u8,
    operations: Vec<Operation<u32, u32>>,
}

fn fuzz_hashmap(input: FuzzInput) {
    let mut std_map = StdHashMap::new();

    let max_load = (input.max_load as f64 + 1.0) / 256.0;
    let mut rh_map: RhHashMap<u32, u32> = RhHashMap::builder().max_load(max_load).build();

    for op in input.operations {
        match op {
            Operation::Insert(k, v) => {
                let std_result = std_map.insert(k, v);
                let rh_result = rh_map.insert(k, v).map(|(_, v)| v);
                assert_eq!(std_result, rh_result);
            }
            Operation::Remove(k) => {
                let std_result = std_map.remove(&k);
                let rh_result = rh_map.remove(&k);
                assert_eq!(std_result, rh_result);
            }
            Operation::Get(k) => {
                assert_eq!(std_map.get(&k), rh_map.get(&k));
            }
            Operation::Contains(k) => {
                assert_eq!(std_map.contains_key(&k), rh_map.contains_key(&k));
            }
            Operation::Update(k, v) => {
                let std_result = std_map.get_mut(&k).map(|e| {
                    *e = e.wrapping_add(v);
                    *e
                });
                let rh_result = rh_map.get_mut(&k).map(|e| {
                    *e = e.wrapping_add(v);
                    *e
                });
                assert_eq!(std_result, rh_result);
            }
            Operation::Reserve(additional) => {
                rh_map.reserve(additional as usize);
            }
            Operation::Clear => {
                std_map.clear();
                rh_map.clear();
            }
            Operation::Len => {
                assert_eq!(std_map.len(), rh_map.len());
            }
            Operation::IsEmpty => {
                assert_eq!(std_map.is_empty(), rh_map.is_empty());
            }
        }

        assert!(rh_map.load_factor() <= 1.0);
    }

    // Final consistency checks
    for (k, v) in std_map.iter() {
        assert_eq!(Some(v), rh_map.get(k));
    }
    assert_eq!(std_map.len(), rh_map.len());
    assert_eq!(std_map.is_empty(), rh_map.is_empty());
}

fuzz_target!(|data: FuzzInput| {
    fuzz_hashmap(data);
});
