#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod error;
mod map;

pub mod hash;
pub mod raw;

#[cfg(feature = "serde")]
mod serde_impls;

pub use error::{InsertError, RehashError};
pub use map::{HashMap, HashMapBuilder, Iter, Keys, Values};
pub use raw::RawTable;
