#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use core::borrow::Borrow;

mod error;
mod info;

/// A map built on the Robin Hood [`HashTable`].
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value interface with configurable hashers, storage and load factor.
pub mod hash_map;

/// A set built on the Robin Hood [`HashTable`].
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a set interface with configurable hashers, storage and load factor.
pub mod hash_set;

pub mod hash;
pub mod hash_table;
pub mod pool;
pub mod storage;

pub use error::TryReserveError;
pub use hash_map::Entry;
pub use hash_map::FlatMap;
pub use hash_map::HashMap;
pub use hash_map::NodeMap;
pub use hash_set::FlatSet;
pub use hash_set::HashSet;
pub use hash_set::NodeSet;
pub use hash_table::HashTable;
pub use storage::Inline;
pub use storage::Pooled;
pub use storage::Storage;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = hash::BuildRobinHoodHasher;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "load-factor-ninety")] {
        /// Maximum load factor, in percent, used when none is specified.
        pub const DEFAULT_MAX_LOAD_FACTOR: usize = 90;
    } else if #[cfg(feature = "load-factor-seventy")] {
        /// Maximum load factor, in percent, used when none is specified.
        pub const DEFAULT_MAX_LOAD_FACTOR: usize = 70;
    } else {
        /// Maximum load factor, in percent, used when none is specified.
        pub const DEFAULT_MAX_LOAD_FACTOR: usize = 80;
    }
}

/// Key equivalence used for lookups.
///
/// Lookups accept any `Q: Hash + Equivalent<K>`, so a table of `String`s can
/// be searched with a `&str`, or with a custom key view that implements this
/// trait. `Q` must hash exactly like the `K` it is equivalent to.
///
/// # Examples
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// # use robin_hood_map::Equivalent;
/// # use robin_hood_map::HashMap;
/// # use robin_hood_map::hash::BuildRobinHoodHasher;
/// #
/// #[derive(PartialEq, Eq, Hash)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// struct PointRef<'a>(&'a i32, &'a i32);
///
/// impl Hash for PointRef<'_> {
///     fn hash<H: Hasher>(&self, state: &mut H) {
///         self.0.hash(state);
///         self.1.hash(state);
///     }
/// }
///
/// impl Equivalent<Point> for PointRef<'_> {
///     fn equivalent(&self, key: &Point) -> bool {
///         *self.0 == key.x && *self.1 == key.y
///     }
/// }
///
/// let mut map: HashMap<Point, &str, BuildRobinHoodHasher> = HashMap::new();
/// map.insert(Point { x: 1, y: 2 }, "a");
/// assert_eq!(map.get(&PointRef(&1, &2)), Some(&"a"));
/// ```
pub trait Equivalent<K: ?Sized> {
    /// Returns `true` if `self` identifies `key`.
    fn equivalent(&self, key: &K) -> bool;
}

impl<Q, K> Equivalent<K> for Q
where
    Q: Eq + ?Sized,
    K: Borrow<Q> + ?Sized,
{
    #[inline]
    fn equivalent(&self, key: &K) -> bool {
        self == key.borrow()
    }
}
