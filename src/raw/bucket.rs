use std::fmt;

/// The state of a bucket, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The bucket has never held an entry since the table was (re)initialized.
    Empty,
    /// The bucket held an entry that was removed.
    ///
    /// Tombstones keep probe sequences of other keys intact and are reused
    /// by later inserts.
    Tombstone,
    /// The bucket holds a live entry.
    Occupied,
}

// The contents of a bucket.
pub(crate) enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(V),
}

/// A single slot of a table's backing storage.
pub struct Bucket<K, V> {
    // Only meaningful while occupied, or as the stale key of a tombstone.
    pub(crate) key: K,
    // Number of slots past the key's ideal slot. Only meaningful while occupied.
    pub(crate) distance: usize,
    pub(crate) slot: Slot<V>,
}

impl<K: Default, V> Bucket<K, V> {
    /// Creates an empty bucket.
    pub fn empty() -> Bucket<K, V> {
        Bucket {
            key: K::default(),
            distance: 0,
            slot: Slot::Empty,
        }
    }
}

impl<K: Default, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Bucket::empty()
    }
}

impl<K: Copy, V> Bucket<K, V> {
    /// Returns the key stored in this bucket, if it is occupied.
    #[inline]
    pub fn key(&self) -> Option<K> {
        match self.slot {
            Slot::Occupied(_) => Some(self.key),
            _ => None,
        }
    }
}

impl<K, V> Bucket<K, V> {
    /// Returns the probe distance of the entry in this bucket, if it is occupied.
    #[inline]
    pub fn distance(&self) -> Option<usize> {
        match self.slot {
            Slot::Occupied(_) => Some(self.distance),
            _ => None,
        }
    }

    /// Returns the state of this bucket.
    #[inline]
    pub fn tag(&self) -> Tag {
        match self.slot {
            Slot::Empty => Tag::Empty,
            Slot::Tombstone => Tag::Tombstone,
            Slot::Occupied(_) => Tag::Occupied,
        }
    }

    /// Returns the value stored in this bucket, if it is occupied.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        match &self.slot {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self.slot, Slot::Occupied(_))
    }

    // Resets the bucket to empty, returning the value if it was occupied.
    #[inline]
    pub(crate) fn take(&mut self) -> Option<V> {
        match std::mem::replace(&mut self.slot, Slot::Empty) {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Bucket<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Slot::Empty => f.write_str("Empty"),
            Slot::Tombstone => f.write_str("Tombstone"),
            Slot::Occupied(value) => f
                .debug_struct("Occupied")
                .field("key", &self.key)
                .field("distance", &self.distance)
                .field("value", value)
                .finish(),
        }
    }
}
