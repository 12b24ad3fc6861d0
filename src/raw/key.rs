use std::fmt::Debug;
use std::hash::Hash;

/// A fixed-width unsigned integer usable as a table key.
///
/// Keys are fingerprints: hashing an arbitrary key domain down to an integer
/// happens before a key ever reaches the table.
pub trait Key: Copy + Default + Eq + Hash + Debug {
    /// Returns the ideal slot of this key in a table of `capacity` buckets.
    fn ideal(self, capacity: usize) -> usize;
}

macro_rules! impl_key {
    ($($ty:ty => $wide:ty),* $(,)?) => {
        $(
            impl Key for $ty {
                #[inline]
                fn ideal(self, capacity: usize) -> usize {
                    debug_assert!(capacity > 0);
                    // The remainder is below `capacity`, so it always fits.
                    ((self as $wide) % (capacity as $wide)) as usize
                }
            }
        )*
    };
}

impl_key! {
    u8 => u64,
    u16 => u64,
    u32 => u64,
    u64 => u64,
    usize => u64,
    u128 => u128,
}

#[test]
fn ideal_slots() {
    assert_eq!(5u64.ideal(5), 0);
    assert_eq!(7u8.ideal(5), 2);
    assert_eq!(u64::MAX.ideal(10), 5);
    assert_eq!(u128::MAX.ideal(7), (u128::MAX % 7) as usize);
    assert_eq!(3usize.ideal(1), 0);
}
