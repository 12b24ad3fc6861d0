use crate::raw::{self, RawTable};

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::mem;

/// A hash map that manages its own storage and growth.
///
/// `HashMap` hashes keys to a `u64` fingerprint with its [`BuildHasher`] and stores
/// the key and value in a [`RawTable`]. Once the load factor reaches the configured
/// maximum, the next insert allocates a larger table and rehashes every entry into it.
///
/// Lookups compare the stored key, so two keys whose fingerprints collide are never
/// confused. They cannot be stored at the same time though: inserting the second
/// one replaces the first, which is handed back by [`HashMap::insert`].
///
/// # Examples
///
/// ```
/// use rhmap::HashMap;
///
/// let mut book = HashMap::new();
/// book.insert("Alfa", 1);
/// book.insert("Bravo", 2);
///
/// assert_eq!(book.get("Alfa"), Some(&1));
/// assert_eq!(book.remove("Bravo"), Some(2));
/// assert_eq!(book.len(), 1);
/// ```
pub struct HashMap<K, V, S = RandomState> {
    table: RawTable<u64, (K, V)>,
    build_hasher: S,
    max_load: f64,
    growth: fn(usize) -> usize,
}

// The default maximum load factor.
const MAX_LOAD: f64 = 0.9;

// The default growth function.
fn grow(capacity: usize) -> usize {
    capacity
        .checked_mul(2)
        .and_then(|capacity| capacity.checked_add(1))
        .expect("capacity overflow")
}

// Returns the number of buckets needed to hold `entries` without growing.
fn buckets_for(entries: usize, max_load: f64) -> usize {
    (entries as f64 / max_load) as usize + 1
}

/// A builder for a [`HashMap`].
///
/// # Examples
///
/// ```rust
/// use rhmap::{hash::BuildDjb2, HashMap};
///
/// let map: HashMap<String, i32, BuildDjb2> = HashMap::builder()
///     // Set the initial capacity.
///     .capacity(2048)
///     // Set the hasher.
///     .hasher(BuildDjb2::default())
///     // Grow once three quarters of the buckets are occupied.
///     .max_load(0.75)
///     // Quadruple the number of buckets on growth.
///     .growth(|capacity| capacity * 4)
///     // Construct the hash map.
///     .build();
/// ```
pub struct HashMapBuilder<K, V, S = RandomState> {
    hasher: S,
    capacity: usize,
    max_load: f64,
    growth: fn(usize) -> usize,
    _kv: PhantomData<(K, V)>,
}

impl<K, V> HashMapBuilder<K, V> {
    /// Set the hash builder used to hash keys.
    ///
    /// Warning: `hash_builder` is normally randomly generated, and is designed
    /// to allow HashMaps to be resistant to attacks that cause many collisions
    /// and very poor performance. Setting it manually using this function can
    /// expose a DoS attack vector.
    pub fn hasher<S>(self, hasher: S) -> HashMapBuilder<K, V, S> {
        HashMapBuilder {
            hasher,
            capacity: self.capacity,
            max_load: self.max_load,
            growth: self.growth,
            _kv: PhantomData,
        }
    }
}

impl<K, V, S> HashMapBuilder<K, V, S> {
    /// Set the initial capacity of the map.
    ///
    /// The map will be able to hold at least `capacity` elements before growing.
    pub fn capacity(self, capacity: usize) -> HashMapBuilder<K, V, S> {
        HashMapBuilder { capacity, ..self }
    }

    /// Set the maximum load factor of the map.
    ///
    /// An insert into a map whose load factor is at least `max_load` grows the map
    /// first. Defaults to `0.9`.
    ///
    /// # Panics
    ///
    /// Panics if `max_load` is not in `(0, 1]`.
    pub fn max_load(self, max_load: f64) -> HashMapBuilder<K, V, S> {
        assert!(
            max_load > 0.0 && max_load <= 1.0,
            "maximum load factor must be in (0, 1]"
        );

        HashMapBuilder { max_load, ..self }
    }

    /// Set the function computing the new number of buckets from the old one.
    ///
    /// The function must return a value greater than its input. Defaults to
    /// `2 * capacity + 1`.
    pub fn growth(self, growth: fn(usize) -> usize) -> HashMapBuilder<K, V, S> {
        HashMapBuilder { growth, ..self }
    }

    /// Construct a [`HashMap`] from the builder, using the configured options.
    pub fn build(self) -> HashMap<K, V, S> {
        HashMap {
            table: RawTable::with_capacity(buckets_for(self.capacity, self.max_load)),
            build_hasher: self.hasher,
            max_load: self.max_load,
            growth: self.growth,
        }
    }
}

impl<K, V, S> fmt::Debug for HashMapBuilder<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashMapBuilder")
            .field("capacity", &self.capacity)
            .field("max_load", &self.max_load)
            .finish()
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty `HashMap`.
    ///
    /// The map starts out with a single bucket.
    pub fn new() -> HashMap<K, V> {
        HashMap::with_capacity_and_hasher(0, RandomState::new())
    }

    /// Creates an empty `HashMap` able to hold at least `capacity` elements
    /// before growing.
    pub fn with_capacity(capacity: usize) -> HashMap<K, V> {
        HashMap::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Returns a builder for a `HashMap`.
    pub fn builder() -> HashMapBuilder<K, V> {
        HashMapBuilder {
            hasher: RandomState::default(),
            capacity: 0,
            max_load: MAX_LOAD,
            growth: grow,
            _kv: PhantomData,
        }
    }
}

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        HashMap::with_hasher(S::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty `HashMap` which will use the given hash builder to hash keys.
    pub fn with_hasher(hash_builder: S) -> HashMap<K, V, S> {
        HashMap::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty `HashMap` with at least the specified capacity, using
    /// `hash_builder` to hash the keys.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> HashMap<K, V, S> {
        HashMap {
            table: RawTable::with_capacity(buckets_for(capacity, MAX_LOAD)),
            build_hasher: hash_builder,
            max_load: MAX_LOAD,
            growth: grow,
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.population()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets in the map.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the ratio of entries to buckets.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the upper bound on the probe distance of any entry.
    #[inline]
    pub fn max_distance(&self) -> usize {
        self.table.max_distance()
    }

    /// Returns a reference to the map's [`BuildHasher`].
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.build_hasher
    }

    /// Removes every entry, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// An iterator visiting all key-value pairs in arbitrary order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            raw: self.table.iter(),
        }
    }

    /// An iterator visiting all keys in arbitrary order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { iter: self.iter() }
    }

    /// An iterator visiting all values in arbitrary order.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { iter: self.iter() }
    }

    // Returns `true` if inserting into a map of `population` entries must grow
    // it first.
    #[inline]
    fn over_threshold(&self, population: usize, capacity: usize) -> bool {
        population as f64 >= self.max_load * capacity as f64
    }

    // Grows the table by one step of the growth function.
    fn grow(&mut self) {
        let capacity = self.table.capacity();
        let new_capacity = (self.growth)(capacity);
        assert!(
            new_capacity > capacity,
            "growth function must increase the capacity"
        );

        self.resize(new_capacity);
    }

    // Rehashes into freshly allocated storage, releasing the old storage.
    fn resize(&mut self, capacity: usize) {
        log::debug!(
            "growing map from {} to {} buckets at load factor {:.2}",
            self.table.capacity(),
            capacity,
            self.table.load_factor()
        );

        let old = self.table.rehash(raw::alloc(capacity));
        debug_assert!(old.is_ok(), "grown table cannot hold its entries");
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts a key-value pair into the map.
    ///
    /// If an entry with the same fingerprint was present, it is replaced and
    /// returned. This is usually the same key with its old value, but may be a
    /// different key whose fingerprint collides with `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let hash = self.build_hasher.hash_one(&key);

        if let Some(entry) = self.table.search_mut(hash) {
            return Some(mem::replace(entry, (key, value)));
        }

        if self.over_threshold(self.table.population(), self.table.capacity()) {
            self.grow();
        }

        let mut entry = (key, value);
        while let Err(err) = self.table.insert(hash, entry) {
            entry = err.value;
            self.grow();
        }

        None
    }

    /// Returns a reference to the value corresponding to the key.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (k, v) = self.table.search(self.build_hasher.hash_one(key))?;
        (<K as Borrow<Q>>::borrow(k) == key).then_some((k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (k, v) = self.table.search_mut(self.build_hasher.hash_one(key))?;
        (<K as Borrow<Q>>::borrow(k) == key).then_some(v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(key);

        // A colliding key must not remove the resident.
        let found = matches!(
            self.table.search(hash),
            Some((k, _)) if <K as Borrow<Q>>::borrow(k) == key
        );
        if !found {
            return None;
        }

        self.table.remove(hash)
    }

    /// Reserves capacity for at least `additional` more elements to be inserted
    /// without growing.
    pub fn reserve(&mut self, additional: usize) {
        if additional == 0 {
            return;
        }

        let last = self.table.population() + additional - 1;
        let mut capacity = self.table.capacity();

        while self.over_threshold(last, capacity) {
            let next = (self.growth)(capacity);
            assert!(next > capacity, "growth function must increase the capacity");
            capacity = next;
        }

        if capacity != self.table.capacity() {
            self.resize(capacity);
        }
    }
}

impl<K, V, S> fmt::Debug for HashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key).map_or(false, |v| *value == *v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        // from `hashbrown::HashMap::extend`:
        // Keys may be already present or show multiple times in the iterator.
        // Reserve the entire hint lower bound if the map is empty.
        // Otherwise reserve half the hint (rounded up), so the map
        // will only resize twice in the worst case.
        let iter = iter.into_iter();
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            (iter.size_hint().0 + 1) / 2
        };

        self.reserve(reserve);

        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for HashMap<K, V, S>
where
    K: Copy + Hash + Eq,
    V: Copy,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut iter = iter.into_iter();

        if let Some((key, value)) = iter.next() {
            let (lower, _) = iter.size_hint();
            let mut map = HashMap::with_capacity_and_hasher(lower.saturating_add(1), S::default());
            map.insert(key, value);
            map.extend(iter);
            map
        } else {
            HashMap::default()
        }
    }
}

impl<K, V, S, const N: usize> From<[(K, V); N]> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from(arr: [(K, V); N]) -> Self {
        HashMap::from_iter(arr)
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over a map's entries.
///
/// This struct is created by the [`iter`](HashMap::iter) method on [`HashMap`].
pub struct Iter<'a, K, V> {
    raw: raw::Iter<'a, u64, (K, V)>,
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|(_, (key, value))| (key, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over a map's keys.
///
/// This struct is created by the [`keys`](HashMap::keys) method on [`HashMap`].
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K: 'a, V: 'a> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (key, _) = self.iter.next()?;
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over a map's values.
///
/// This struct is created by the [`values`](HashMap::values) method on [`HashMap`].
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K: 'a, V: 'a> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (_, value) = self.iter.next()?;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
