//! Hashers for producing table keys.
//!
//! The core table never hashes anything. These are conveniences for callers
//! that need a deterministic fingerprint, for example to share keys across
//! processes, where [`RandomState`](std::collections::hash_map::RandomState)
//! would not do.

use std::hash::{BuildHasherDefault, Hasher};

/// Bernstein's djb2 string hash: `k = k * 33 + byte`, seeded with 5381.
///
/// Fast and deterministic, but not resistant to collision attacks.
///
/// # Examples
///
/// ```
/// use rhmap::hash::Djb2;
/// use std::hash::Hasher;
///
/// let mut hasher = Djb2::default();
/// hasher.write(b"Alfa");
/// assert_eq!(hasher.finish(), Djb2::hash_bytes(b"Alfa"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Djb2(u64);

impl Djb2 {
    const SEED: u64 = 5381;

    /// Hashes a byte string directly.
    pub fn hash_bytes(bytes: &[u8]) -> u64 {
        let mut hasher = Djb2::default();
        hasher.write(bytes);
        hasher.finish()
    }
}

impl Default for Djb2 {
    fn default() -> Self {
        Djb2(Djb2::SEED)
    }
}

impl Hasher for Djb2 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = (self.0 << 5).wrapping_add(self.0).wrapping_add(byte as u64);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

/// A [`BuildHasher`](std::hash::BuildHasher) for [`Djb2`].
pub type BuildDjb2 = BuildHasherDefault<Djb2>;
