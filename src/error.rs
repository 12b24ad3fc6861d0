use thiserror::Error;

/// The error returned by [`RawTable::insert`](crate::raw::RawTable::insert) when every bucket
/// is occupied.
///
/// The table is left unchanged, and the rejected key and value are handed back.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("table is full: all {capacity} buckets are occupied")]
pub struct InsertError<K, V> {
    /// The key that was not inserted.
    pub key: K,
    /// The value that was not inserted.
    pub value: V,
    /// The capacity of the table.
    pub capacity: usize,
}

impl<K, V> InsertError<K, V> {
    /// Returns the rejected key and value.
    pub fn into_inner(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// The error returned by [`RawTable::rehash`](crate::raw::RawTable::rehash) when the new storage
/// cannot hold the current entries.
///
/// The table is left unchanged, and the unused storage is handed back.
#[derive(Error, Debug)]
#[error("cannot rehash {population} entries into {capacity} buckets")]
pub struct RehashError<B> {
    /// The storage that was offered to the table.
    pub storage: B,
    /// The number of entries in the table.
    pub population: usize,
    /// The capacity of the rejected storage.
    pub capacity: usize,
}

impl<B> RehashError<B> {
    /// Returns the rejected storage.
    pub fn into_storage(self) -> B {
        self.storage
    }
}
