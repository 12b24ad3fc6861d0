use std::mem;

use super::Bucket;

/// Allocate backing storage for a table with the provided capacity.
///
/// Every bucket starts out empty. The returned storage is owned by the caller,
/// who hands it to [`RawTable::init`](super::RawTable::init) or
/// [`RawTable::rehash`](super::RawTable::rehash).
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn alloc<K: Default, V>(capacity: usize) -> Box<[Bucket<K, V>]> {
    assert!(capacity > 0, "table capacity must be nonzero");
    (0..capacity).map(|_| Bucket::empty()).collect()
}

/// Returns the number of bytes of backing storage needed for `capacity` buckets.
pub fn storage_size<K, V>(capacity: usize) -> usize {
    mem::size_of::<Bucket<K, V>>()
        .checked_mul(capacity)
        .expect("capacity overflow")
}

#[test]
fn layout() {
    let buckets: Box<[Bucket<u64, u8>]> = alloc(4);
    assert_eq!(buckets.len(), 4);
    assert!(buckets.iter().all(|b| b.tag() == super::Tag::Empty));
    assert_eq!(
        storage_size::<u64, u8>(4),
        4 * mem::size_of::<Bucket<u64, u8>>()
    );
}

#[test]
#[should_panic]
fn zero_capacity() {
    let _: Box<[Bucket<u64, ()>]> = alloc(0);
}
