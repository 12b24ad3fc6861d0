//! The core table: Robin Hood open addressing over caller-owned storage.

mod alloc;
mod bucket;
mod key;
mod probe;

pub use alloc::{alloc, storage_size};
pub use bucket::{Bucket, Tag};
pub use key::Key;

use std::marker::PhantomData;
use std::{fmt, mem, slice};

use self::bucket::Slot;
use self::probe::Probe;
use crate::error::{InsertError, RehashError};

/// A Robin Hood hash table over caller-owned bucket storage.
///
/// The table never allocates or frees memory itself. Storage is handed to the
/// table by [`RawTable::init`], handed back by [`RawTable::rehash`] (the old
/// storage) and by [`RawTable::into_storage`]. Any type that can be viewed as a
/// mutable slice of [`Bucket`]s works: a boxed slice from [`alloc`], a `Vec`,
/// an array on the stack, or a borrowed slice.
///
/// Keys are fixed-width unsigned integers, and are expected to already be
/// well-distributed hashes. The ideal slot of a key is `key % capacity`.
///
/// # Duplicate keys
///
/// [`RawTable::insert`] does not check whether the key is already present.
/// Inserting a key twice stores two entries, and which one a lookup finds is
/// unspecified. Callers that want upsert semantics should call
/// [`RawTable::search_mut`] first, as [`HashMap`](crate::HashMap) does.
///
/// # Examples
///
/// ```
/// use rhmap::raw::{self, RawTable};
///
/// let mut table: RawTable<u64, &str> = RawTable::init(raw::alloc(8));
/// table.insert(42, "answer").unwrap();
/// assert_eq!(table.search(42), Some(&"answer"));
///
/// // Grow the table, releasing the old storage.
/// let old = table.rehash(raw::alloc(17)).unwrap();
/// drop(old);
/// assert_eq!(table.capacity(), 17);
/// assert_eq!(table.remove(42), Some("answer"));
/// ```
pub struct RawTable<K, V, B = Box<[Bucket<K, V>]>> {
    // The backing storage.
    storage: B,
    // The number of buckets in `storage`.
    capacity: usize,
    // The number of occupied buckets.
    population: usize,
    // An upper bound on the probe distance of any occupied bucket.
    //
    // Only ever grows, until the table is reinitialized.
    max_distance: usize,
    _kv: PhantomData<(K, V)>,
}

impl<K: Key, V> RawTable<K, V> {
    /// Creates a table with freshly allocated storage for `capacity` buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> RawTable<K, V> {
        RawTable::init(alloc(capacity))
    }
}

impl<K, V, B> RawTable<K, V, B>
where
    K: Key,
    B: AsRef<[Bucket<K, V>]> + AsMut<[Bucket<K, V>]>,
{
    /// Initializes a table over the given storage, marking every bucket empty.
    ///
    /// The capacity of the table is the number of buckets in `storage`. Any
    /// values left in the storage are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `storage` holds no buckets.
    pub fn init(mut storage: B) -> RawTable<K, V, B> {
        let capacity = storage.as_ref().len();
        assert!(capacity > 0, "table capacity must be nonzero");

        for bucket in storage.as_mut() {
            bucket.slot = Slot::Empty;
        }

        RawTable {
            storage,
            capacity,
            population: 0,
            max_distance: 0,
            _kv: PhantomData,
        }
    }

    /// Removes every entry, dropping the values.
    pub fn clear(&mut self) {
        self.clear_with(drop);
    }

    /// Removes every entry, passing each value to `destructor`.
    ///
    /// Tombstones are reset without a call; their values were already handed
    /// out by [`RawTable::remove`]. The capacity is unchanged.
    pub fn clear_with(&mut self, mut destructor: impl FnMut(V)) {
        for bucket in self.storage.as_mut() {
            if let Some(value) = bucket.take() {
                destructor(value);
            }
        }

        self.population = 0;
        self.max_distance = 0;
    }

    /// Inserts an entry, returning a reference to the stored value.
    ///
    /// The key is not checked for duplicates, see the [type-level
    /// documentation](RawTable#duplicate-keys).
    ///
    /// # Errors
    ///
    /// Returns an [`InsertError`] holding the key and value if every bucket is
    /// occupied. The table is not modified.
    pub fn insert(&mut self, key: K, value: V) -> Result<&mut V, InsertError<K, V>> {
        if self.population + 1 > self.capacity {
            log::trace!("insert of {key:?} rejected, all {} buckets occupied", self.capacity);

            return Err(InsertError {
                key,
                value,
                capacity: self.capacity,
            });
        }

        let capacity = self.capacity;
        let mut max_distance = self.max_distance;
        let buckets = self.storage.as_mut();

        // The record being carried, and the slot the caller's value ended up in.
        let (mut key, mut value) = (key, value);
        let mut placed = None;

        let mut probe = Probe::start(key.ideal(capacity), capacity);

        // There is at least one free bucket, so this finishes within one pass.
        let index = loop {
            let bucket = &mut buckets[probe.i];

            match bucket.slot {
                Slot::Empty | Slot::Tombstone => {
                    bucket.key = key;
                    bucket.distance = probe.distance;
                    bucket.slot = Slot::Occupied(value);
                    break placed.unwrap_or(probe.i);
                }

                // The resident is closer to its ideal slot than we are to ours,
                // take its place and carry it forward instead.
                Slot::Occupied(ref mut resident) if bucket.distance < probe.distance => {
                    mem::swap(&mut bucket.key, &mut key);
                    mem::swap(resident, &mut value);
                    probe.distance = mem::replace(&mut bucket.distance, probe.distance);
                    if placed.is_none() {
                        placed = Some(probe.i);
                    }
                }

                Slot::Occupied(_) => {}
            }

            probe.next();
            max_distance = max_distance.max(probe.distance);
        };

        self.population += 1;
        self.max_distance = max_distance;

        match &mut buckets[index].slot {
            Slot::Occupied(value) => Ok(value),
            _ => unreachable!("inserted bucket is not occupied"),
        }
    }

    /// Returns a reference to the value stored under `key`.
    #[inline]
    pub fn search(&self, key: K) -> Option<&V> {
        let index = self.locate(key)?;
        self.storage.as_ref()[index].value()
    }

    /// Returns a mutable reference to the value stored under `key`.
    #[inline]
    pub fn search_mut(&mut self, key: K) -> Option<&mut V> {
        let index = self.locate(key)?;

        match &mut self.storage.as_mut()[index].slot {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if the table holds an entry for `key`.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.locate(key).is_some()
    }

    /// Removes the entry stored under `key`, returning its value.
    ///
    /// The bucket is left as a tombstone, which later inserts may reuse.
    pub fn remove(&mut self, key: K) -> Option<V> {
        let index = self.locate(key)?;
        let bucket = &mut self.storage.as_mut()[index];

        match mem::replace(&mut bucket.slot, Slot::Tombstone) {
            Slot::Occupied(value) => {
                self.population -= 1;
                Some(value)
            }
            _ => unreachable!("located bucket is not occupied"),
        }
    }

    /// Moves every entry into `storage`, returning the old storage.
    ///
    /// The returned storage has every bucket reset to empty, and can be
    /// dropped or reused. This is a full rebuild: it visits every old bucket and
    /// reinserts every entry.
    ///
    /// # Errors
    ///
    /// Returns a [`RehashError`] holding `storage` if it has fewer buckets than
    /// the table has entries. The table is not modified.
    ///
    /// # Panics
    ///
    /// Panics if `storage` holds no buckets.
    pub fn rehash(&mut self, storage: B) -> Result<B, RehashError<B>> {
        let capacity = storage.as_ref().len();

        if self.population > capacity {
            return Err(RehashError {
                storage,
                population: self.population,
                capacity,
            });
        }

        log::debug!(
            "rehashing {} entries from {} to {} buckets (max distance {})",
            self.population,
            self.capacity,
            capacity,
            self.max_distance
        );

        let mut old = mem::replace(self, RawTable::init(storage));

        for bucket in old.storage.as_mut() {
            if let Some(value) = bucket.take() {
                let inserted = self.insert(bucket.key, value).is_ok();
                debug_assert!(inserted, "rehash target overflowed");
            }
        }

        Ok(old.storage)
    }

    /// Returns the storage to the caller, dropping every value.
    pub fn into_storage(mut self) -> B {
        self.clear();
        self.storage
    }

    /// Returns the buckets of the table, in slot order.
    #[inline]
    pub fn buckets(&self) -> &[Bucket<K, V>] {
        self.storage.as_ref()
    }

    /// Returns an iterator over the entries of the table, in slot order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.storage.as_ref().iter(),
            remaining: self.population,
        }
    }

    // Returns the index of the bucket holding `key`.
    //
    // Walks from the ideal slot past tombstones and other keys, stopping at the
    // first empty bucket or after `max_distance + 1` buckets.
    #[inline]
    fn locate(&self, key: K) -> Option<usize> {
        let buckets = self.storage.as_ref();
        let mut probe = Probe::start(key.ideal(self.capacity), self.capacity);

        for _ in 0..probe::limit(self.max_distance, self.capacity) {
            let bucket = &buckets[probe.i];

            match bucket.slot {
                Slot::Empty => return None,
                Slot::Occupied(_) if bucket.key == key => return Some(probe.i),
                _ => {}
            }

            probe.next();
        }

        None
    }
}

impl<K, V, B> RawTable<K, V, B> {
    /// Returns the number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries.
    #[inline]
    pub fn population(&self) -> usize {
        self.population
    }

    /// Returns `true` if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.population == 0
    }

    /// Returns the ratio of entries to buckets.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.population as f64 / self.capacity as f64
    }

    /// Returns the upper bound on the probe distance of any entry.
    ///
    /// A failed lookup visits at most `max_distance + 1` buckets.
    #[inline]
    pub fn max_distance(&self) -> usize {
        self.max_distance
    }
}

impl<K, V, B> fmt::Debug for RawTable<K, V, B>
where
    K: Key,
    V: fmt::Debug,
    B: AsRef<[Bucket<K, V>]> + AsMut<[Bucket<K, V>]>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, B> IntoIterator for &'a RawTable<K, V, B>
where
    K: Key,
    B: AsRef<[Bucket<K, V>]> + AsMut<[Bucket<K, V>]>,
{
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`RawTable`].
///
/// Created by [`RawTable::iter`].
pub struct Iter<'a, K, V> {
    buckets: slice::Iter<'a, Bucket<K, V>>,
    remaining: usize,
}

impl<'a, K: Key, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for bucket in self.buckets.by_ref() {
            if let Slot::Occupied(value) = &bucket.slot {
                self.remaining -= 1;
                return Some((bucket.key, value));
            }
        }

        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Key, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            buckets: self.buckets.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Checks the placement invariants of every occupied bucket.
    fn check<K: Key, V>(table: &RawTable<K, V>) {
        let mut occupied = 0;

        for (i, bucket) in table.buckets().iter().enumerate() {
            if let (Some(key), Some(distance)) = (bucket.key(), bucket.distance()) {
                let ideal = key.ideal(table.capacity());
                assert_eq!(distance, (i + table.capacity() - ideal) % table.capacity());
                assert!(distance <= table.max_distance());
                occupied += 1;
            }
        }

        assert_eq!(occupied, table.population());
    }

    #[test]
    fn displacement() {
        let mut table = RawTable::<u64, u64>::with_capacity(5);

        // 0, 5 and 10 share ideal slot 0.
        table.insert(0, 0).unwrap();
        table.insert(5, 5).unwrap();
        table.insert(10, 10).unwrap();
        check(&table);
        assert_eq!(table.max_distance(), 2);

        // Key 1 cannot displace 5 or 10, which are farther from home.
        table.insert(1, 1).unwrap();
        check(&table);
        assert_eq!(table.buckets()[3].key(), Some(1));
        assert_eq!(table.buckets()[3].distance(), Some(2));

        for key in [0, 5, 10, 1] {
            assert_eq!(table.search(key), Some(&key));
        }
    }

    #[test]
    fn robin_hood_swap() {
        let mut table = RawTable::<u64, &str>::with_capacity(4);

        // 1 sits in its ideal slot, 0 and 4 share slot 0.
        table.insert(1, "one").unwrap();
        table.insert(0, "zero").unwrap();
        // 4 reaches slot 1 at distance 1, and displaces 1 (distance 0).
        let value = table.insert(4, "four").unwrap();
        assert_eq!(*value, "four");
        check(&table);

        assert_eq!(table.buckets()[1].key(), Some(4));
        assert_eq!(table.buckets()[2].key(), Some(1));
        assert_eq!(table.buckets()[2].distance(), Some(1));
    }

    #[test]
    fn tombstones_are_reused() {
        let mut table = RawTable::<u64, u64>::with_capacity(3);
        table.insert(0, 0).unwrap();
        table.insert(3, 3).unwrap();
        assert_eq!(table.remove(0), Some(0));
        assert_eq!(table.buckets()[0].tag(), Tag::Tombstone);

        // The tombstone does not cut off the probe sequence of 3.
        assert_eq!(table.search(3), Some(&3));

        table.insert(6, 6).unwrap();
        assert_eq!(table.buckets()[0].key(), Some(6));
        check(&table);
    }

    #[test]
    fn clear_with_destructor() {
        let mut table = RawTable::<u8, String>::with_capacity(4);
        table.insert(1, "a".to_owned()).unwrap();
        table.insert(2, "b".to_owned()).unwrap();
        table.insert(3, "c".to_owned()).unwrap();
        table.remove(2);

        let mut dropped = Vec::new();
        table.clear_with(|value| dropped.push(value));
        dropped.sort();

        assert_eq!(dropped, ["a", "c"]);
        assert!(table.is_empty());
        assert_eq!(table.max_distance(), 0);
        assert_eq!(table.capacity(), 4);
        assert!(table.buckets().iter().all(|b| b.tag() == Tag::Empty));
    }

    #[test]
    fn wrapping_probe() {
        let mut table = RawTable::<u32, u32>::with_capacity(4);
        table.insert(3, 3).unwrap();
        table.insert(7, 7).unwrap();
        assert_eq!(table.buckets()[0].key(), Some(7));
        assert_eq!(table.buckets()[0].distance(), Some(1));
        check(&table);
        assert_eq!(table.search(7), Some(&7));
        assert_eq!(table.search(11), None);
    }

    #[test]
    fn iter_in_slot_order() {
        let mut table = RawTable::<u64, u64>::with_capacity(8);
        for key in [6, 2, 4] {
            table.insert(key, key * 10).unwrap();
        }

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, [(2, &20), (4, &40), (6, &60)]);
        assert_eq!(table.iter().len(), 3);
    }
}
