#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use rhmap::raw::{self, RawTable};
use std::collections::HashMap;

#[derive(Debug, Arbitrary)]
enum Operation {
    Insert(u16, u16),
    Remove(u16),
    Search(u16),
    Rehash(u8),
    Clear,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    capacity: u8,
    operations: Vec<Operation>,
}

// Checks that every entry sits `distance` slots past its ideal slot, within `max_distance`.
fn check(table: &RawTable<u16, u16>) {
    let capacity = table.capacity();
    let mut occupied = 0;

    for (i, bucket) in table.buckets().iter().enumerate() {
        if let (Some(key), Some(distance)) = (bucket.key(), bucket.distance()) {
            let ideal = key as usize % capacity;
            assert_eq!(distance, (i + capacity - ideal) % capacity);
            assert!(distance <= table.max_distance());
            occupied += 1;
        }
    }

    assert_eq!(occupied, table.population());
}

fn fuzz_raw(input: FuzzInput) {
    let mut table = RawTable::<u16, u16>::with_capacity(input.capacity as usize + 1);
    let mut model = HashMap::new();

    for op in input.operations {
        match op {
            Operation::Insert(k, v) => {
                if let Some(slot) = table.search_mut(k) {
                    *slot = v;
                    model.insert(k, v);
                } else {
                    let full = model.len() == table.capacity();
                    assert_eq!(table.insert(k, v).is_err(), full);
                    if !full {
                        model.insert(k, v);
                    }
                }
            }
            Operation::Remove(k) => {
                assert_eq!(table.remove(k), model.remove(&k));
            }
            Operation::Search(k) => {
                assert_eq!(table.search(k), model.get(&k));
            }
            Operation::Rehash(capacity) => {
                let capacity = capacity as usize + 1;
                let result = table.rehash(raw::alloc(capacity));
                assert_eq!(result.is_err(), capacity < model.len());
            }
            Operation::Clear => {
                table.clear();
                model.clear();
            }
        }

        check(&table);
        assert_eq!(table.population(), model.len());
    }

    for (k, v) in &model {
        assert_eq!(table.search(*k), Some(v));
    }
}

fuzz_target!(|data: FuzzInput| {
    fuzz_raw(data);
});
