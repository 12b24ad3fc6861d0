#![allow(dead_code)]

use rhmap::raw::{Bucket, Key, RawTable};
use rhmap::HashMap;

// Run the test on different configurations of a `HashMap`.
pub fn with_map<K, V>(mut test: impl FnMut(&dyn Fn() -> HashMap<K, V>)) {
    // The default growth policy.
    test(&(|| HashMap::new()));

    // Let the table fill up completely before growing, stressing long probe sequences.
    test(
        &(|| {
            HashMap::builder()
                .max_load(1.0)
                .growth(|capacity| capacity + 1)
                .build()
        }),
    );

    // Grow aggressively from a sparse table.
    test(
        &(|| {
            HashMap::builder()
                .max_load(0.5)
                .growth(|capacity| capacity * 4)
                .build()
        }),
    );
}

// Checks the placement invariants of every occupied bucket.
pub fn check<K, V, B>(table: &RawTable<K, V, B>)
where
    K: Key,
    B: AsRef<[Bucket<K, V>]> + AsMut<[Bucket<K, V>]>,
{
    let capacity = table.capacity();
    let mut occupied = 0;

    for (i, bucket) in table.buckets().iter().enumerate() {
        let (Some(key), Some(distance)) = (bucket.key(), bucket.distance()) else {
            continue;
        };

        let ideal = key.ideal(capacity);
        assert_eq!(
            distance,
            (i + capacity - ideal) % capacity,
            "bucket {i} holds {key:?} at the wrong distance"
        );
        assert!(
            distance <= table.max_distance(),
            "bucket {i} is farther than max_distance {}",
            table.max_distance()
        );
        occupied += 1;
    }

    assert_eq!(occupied, table.population());
    assert!(table.population() <= capacity);
}

// Prints a log message if `RUST_LOG=debug` is set.
#[macro_export]
macro_rules! debug {
    ($($x:tt)*) => {
        if std::env::var("RUST_LOG").as_deref() == Ok("debug") {
            println!($($x)*);
        }
    };
}
