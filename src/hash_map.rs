use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::DEFAULT_MAX_LOAD_FACTOR;
use crate::DefaultHashBuilder;
use crate::Equivalent;
use crate::TryReserveError;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::storage::Inline;
use crate::storage::Pooled;
use crate::storage::Storage;

/// A hash map built on the Robin Hood [`HashTable`].
///
/// `HashMap<K, V, S, P, LF>` stores key-value pairs where keys implement
/// `Hash + Eq`, hashed with the hasher builder `S`. The pairs are kept
/// according to the storage strategy `P`, and the map grows once it is more
/// than `LF` percent full.
///
/// Most code uses one of the two aliases: [`FlatMap`] keeps pairs in the slot
/// array, [`NodeMap`] keeps them in pooled blocks so references stay valid
/// when the map grows.
///
/// `P` defaults to [`Inline`] whatever the size of `(K, V)`; the strategy is
/// never picked for you. [`prefers_inline`](crate::storage::prefers_inline)
/// tells whether `(K, V)` is small enough for [`FlatMap`], and larger pairs
/// are usually better off in a [`NodeMap`]:
///
/// ```rust
/// use robin_hood_map::storage::prefers_inline;
///
/// assert!(prefers_inline::<(u32, u64)>());
/// assert!(!prefers_inline::<(u64, [u8; 64])>());
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: 1 byte of metadata per slot, plus the size of `(K, V)` for
///   inline storage or one pointer for pooled storage
/// - **Lookups**: linear probing that stops as soon as the probed element is
///   closer to home than the key would be
///
/// # Examples
///
/// ```rust
/// # use robin_hood_map::HashMap;
/// #
/// let mut map: HashMap<&str, u32> = HashMap::new();
/// map.insert("sherwood", 1);
/// map.insert("nottingham", 2);
///
/// assert_eq!(map.get("sherwood"), Some(&1));
/// assert_eq!(map["nottingham"], 2);
/// ```
pub struct HashMap<
    K,
    V,
    S = DefaultHashBuilder,
    P: Storage<(K, V)> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    table: HashTable<(K, V), P, LF>,
    hash_builder: S,
}

/// A [`HashMap`] storing its pairs directly in the slot array.
pub type FlatMap<K, V, S = DefaultHashBuilder, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> =
    HashMap<K, V, S, Inline, LF>;

/// A [`HashMap`] storing its pairs in pooled blocks, so references to them
/// stay valid across growth.
pub type NodeMap<K, V, S = DefaultHashBuilder, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> =
    HashMap<K, V, S, Pooled, LF>;

#[inline]
fn make_hasher<K: Hash, V, S: BuildHasher>(hash_builder: &S) -> impl Fn(&(K, V)) -> u64 {
    move |(k, _): &(K, V)| hash_builder.hash_one(k)
}

impl<K, V, S, P, const LF: usize> Debug for HashMap<K, V, S, P, LF>
where
    K: Debug,
    V: Debug,
    P: Storage<(K, V)>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, P, const LF: usize> Clone for HashMap<K, V, S, P, LF>
where
    K: Clone,
    V: Clone,
    S: Clone,
    P: Storage<(K, V)>,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<K, V, S, P: Storage<(K, V)>, const LF: usize> HashMap<K, V, S, P, LF> {
    /// Creates a new hash map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hood_map::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.bucket_count(), 0);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates a new hash map that holds at least `capacity` elements
    /// without growing, using the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hood_map::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_capacity_and_hasher(100, SimpleHasher);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the map can hold before growing.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of buckets: zero or a power of two.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the ratio of elements to buckets.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the load factor at which the map grows.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Removes all elements, keeping the allocated memory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(map.capacity() > 0);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Swaps the contents of two maps, including their hasher builders.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Retains only the pairs for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(|(k, v)| f(&*k, v));
    }

    /// An iterator visiting all key-value pairs in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut pairs: Vec<_> = map.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, vec![(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, P> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// An iterator visiting all key-value pairs, with mutable references to
    /// the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, P> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// An iterator visiting all keys.
    pub fn keys(&self) -> Keys<'_, K, V, P> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values.
    pub fn values(&self) -> Values<'_, K, V, P> {
        Values { inner: self.iter() }
    }

    /// An iterator visiting all values mutably.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// for value in map.values_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(map.values().sum::<i32>(), 30);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, P> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    ///
    /// The allocation is kept. Pairs not consumed are dropped along with the
    /// iterator.
    pub fn drain(&mut self) -> Drain<'_, K, V, P, LF> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns a cursor positioned on the first pair in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, i32> = (0..10).map(|x| (x, x)).collect();
    ///
    /// let mut cursor = map.cursor_mut();
    /// while let Some((&k, _)) = cursor.get() {
    ///     if k % 2 == 0 {
    ///         cursor.remove();
    ///     } else {
    ///         cursor.move_next();
    ///     }
    /// }
    /// assert_eq!(map.len(), 5);
    /// ```
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, P, LF> {
        CursorMut {
            inner: self.table.cursor_mut(),
        }
    }

    /// Computes a histogram of probe distances for the current map state.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram()
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<K, V, S, P, const LF: usize> HashMap<K, V, S, P, LF>
where
    K: Hash + Eq,
    S: BuildHasher,
    P: Storage<(K, V)>,
{
    #[inline]
    fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Shrinks the map to the smallest size that holds its elements.
    pub fn shrink_to_fit(&mut self) {
        self.table
            .shrink_to_fit(make_hasher::<K, V, S>(&self.hash_builder));
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new size overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// # use robin_hood_map::DefaultHashBuilder;
    /// # use robin_hood_map::Inline;
    /// #
    /// let mut map: HashMap<i32, i32, DefaultHashBuilder, Inline, 80> = HashMap::new();
    /// map.reserve(819);
    /// assert_eq!(map.bucket_count(), 1024);
    /// map.reserve(820);
    /// assert_eq!(map.bucket_count(), 2048);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.table
            .reserve(additional, make_hasher::<K, V, S>(&self.hash_builder));
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// # use robin_hood_map::TryReserveError;
    /// #
    /// let mut map: HashMap<i32, i32> = HashMap::new();
    /// assert_eq!(
    ///     map.try_reserve(usize::MAX - 2),
    ///     Err(TryReserveError::CapacityOverflow)
    /// );
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.table
            .try_reserve(additional, make_hasher::<K, V, S>(&self.hash_builder))
    }

    /// Rebuilds the map with the smallest size that holds
    /// `max(count, len)` elements. May shrink the map.
    pub fn rehash(&mut self, count: usize) {
        self.table
            .rehash(count, make_hasher::<K, V, S>(&self.hash_builder));
    }

    /// Like [`rehash`](Self::rehash), but returns an error instead of
    /// panicking. The map is unchanged on error.
    pub fn try_rehash(&mut self, count: usize) -> Result<(), TryReserveError> {
        self.table
            .try_rehash(count, make_hasher::<K, V, S>(&self.hash_builder))
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut letters: HashMap<char, u32> = HashMap::new();
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.entry(ch).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(letters[&'s'], 2);
    /// assert_eq!(letters[&'t'], 3);
    /// assert_eq!(letters.get(&'y'), None);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, P, LF> {
        let hash = self.hash(&key);
        match self.table.entry(
            hash,
            |(k, _)| *k == key,
            make_hasher::<K, V, S>(&self.hash_builder),
        ) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Like [`entry`](Self::entry), but returns an error instead of
    /// panicking if the map has to grow and cannot.
    pub fn try_entry(&mut self, key: K) -> Result<Entry<'_, K, V, P, LF>, TryReserveError> {
        let hash = self.hash(&key);
        match self.table.try_entry(
            hash,
            |(k, _)| *k == key,
            make_hasher::<K, V, S>(&self.hash_builder),
        )? {
            TableEntry::Occupied(entry) => Ok(Entry::Occupied(OccupiedEntry { entry })),
            TableEntry::Vacant(entry) => Ok(Entry::Vacant(VacantEntry { entry, key })),
        }
    }

    /// Inserts a key-value pair if the key is absent.
    ///
    /// Returns a reference to the value stored under `key` and `true` if the
    /// pair was inserted. An existing value is left untouched and `value` is
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), (&mut "a", true));
    /// assert_eq!(map.insert(37, "b"), (&mut "a", false));
    /// assert_eq!(map[&37], "a");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (&mut V, bool) {
        match self.entry(key) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(value), true),
        }
    }

    /// Inserts a key-value pair, replacing the value of an existing key.
    ///
    /// Returns a reference to the stored value and `true` if the key was
    /// absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.insert_or_assign(37, "a"), (&mut "a", true));
    /// assert_eq!(map.insert_or_assign(37, "b"), (&mut "b", false));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (&mut V, bool) {
        match self.entry(key) {
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                *slot = value;
                (slot, false)
            }
            Entry::Vacant(entry) => (entry.insert(value), true),
        }
    }

    /// Inserts the value produced by `make` if the key is absent.
    ///
    /// `make` is only called when the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, String> = HashMap::new();
    /// map.try_emplace(1, || "one".to_string());
    /// let (value, inserted) = map.try_emplace(1, || unreachable!());
    /// assert_eq!((value.as_str(), inserted), ("one", false));
    /// ```
    pub fn try_emplace(&mut self, key: K, make: impl FnOnce() -> V) -> (&mut V, bool) {
        match self.entry(key) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(make()), true),
        }
    }

    /// Returns a mutable reference to the value under `key`, inserting
    /// `V::default()` first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns a reference to the value under the key.
    ///
    /// The key may be any borrowed or [`Equivalent`] form of the map's key
    /// type that hashes the same way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<String, i32> = HashMap::new();
    /// map.insert("one".to_string(), 1);
    /// assert_eq!(map.get("one"), Some(&1));
    /// assert_eq!(map.get("two"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let hash = self.hash(key);
        self.table
            .find(hash, |(k, _)| key.equivalent(k))
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value under the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let hash = self.hash(key);
        self.table
            .find_mut(hash, |(k, _)| key.equivalent(k))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns the number of pairs stored under the key: 0 or 1.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        usize::from(self.contains_key(key))
    }

    /// Removes the key, returning its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the key, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let hash = self.hash(key);
        self.table.remove(hash, |(k, _)| key.equivalent(k))
    }

    /// Removes the key, returning the number of pairs removed: 0 or 1.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        usize::from(self.remove_entry(key).is_some())
    }

    /// Returns a cursor positioned on the key, or at the end if the key is
    /// absent.
    pub fn find_cursor_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, P, LF>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let hash = self.hash(key);
        CursorMut {
            inner: self
                .table
                .find_cursor_mut(hash, |(k, _)| key.equivalent(k)),
        }
    }
}

impl<K, V, S, P, const LF: usize> HashMap<K, V, S, P, LF>
where
    S: Default,
    P: Storage<(K, V)>,
{
    /// Creates an empty map using the default hasher builder. Does not
    /// allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a map that holds at least `capacity` elements without
    /// growing, using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::NodeMap;
    /// #
    /// let map: NodeMap<i32, String> = NodeMap::with_capacity(100);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S, P, const LF: usize> Default for HashMap<K, V, S, P, LF>
where
    S: Default,
    P: Storage<(K, V)>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S, P, const LF: usize> PartialEq for HashMap<K, V, S, P, LF>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
    P: Storage<(K, V)>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V, S, P, const LF: usize> Eq for HashMap<K, V, S, P, LF>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
    P: Storage<(K, V)>,
{
}

impl<K, Q, V, S, P, const LF: usize> Index<&Q> for HashMap<K, V, S, P, LF>
where
    K: Hash + Eq,
    Q: Hash + Equivalent<K> + ?Sized,
    S: BuildHasher,
    P: Storage<(K, V)>,
{
    type Output = V;

    /// Returns a reference to the value under the key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K, V, S, P, const LF: usize> Extend<(K, V)> for HashMap<K, V, S, P, LF>
where
    K: Hash + Eq,
    S: BuildHasher,
    P: Storage<(K, V)>,
{
    /// Inserts every pair, replacing the values of keys already present.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        let additional = if self.is_empty() {
            iter.size_hint().0
        } else {
            iter.size_hint().0.div_ceil(2)
        };
        self.reserve(additional);
        for (k, v) in iter {
            self.insert_or_assign(k, v);
        }
    }
}

impl<'a, K, V, S, P, const LF: usize> Extend<(&'a K, &'a V)> for HashMap<K, V, S, P, LF>
where
    K: Hash + Eq + Copy,
    V: Copy,
    S: BuildHasher,
    P: Storage<(K, V)>,
{
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

impl<K, V, S, P, const LF: usize> FromIterator<(K, V)> for HashMap<K, V, S, P, LF>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
    P: Storage<(K, V)>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S, P: Storage<(K, V)>, const LF: usize> IntoIterator for HashMap<K, V, S, P, LF> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, P, LF>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S, P: Storage<(K, V)>, const LF: usize> IntoIterator
    for &'a HashMap<K, V, S, P, LF>
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S, P: Storage<(K, V)>, const LF: usize> IntoIterator
    for &'a mut HashMap<K, V, S, P, LF>
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<
    'a,
    K,
    V,
    P: Storage<(K, V)> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, P, LF>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, P, LF>),
}

impl<'a, K, V, P: Storage<(K, V)>, const LF: usize> Entry<'a, K, V, P, LF> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }

    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<
    'a,
    K,
    V,
    P: Storage<(K, V)> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    entry: crate::hash_table::VacantEntry<'a, (K, V), P, LF>,
    key: K,
}

impl<'a, K, V, P: Storage<(K, V)>, const LF: usize> VacantEntry<'a, K, V, P, LF> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<
    'a,
    K,
    V,
    P: Storage<(K, V)> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V), P, LF>,
}

impl<'a, K, V, P: Storage<(K, V)>, const LF: usize> OccupiedEntry<'a, K, V, P, LF> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// A cursor over the pairs of a [`HashMap`] that can remove the pair it
/// points at.
///
/// After [`remove`](CursorMut::remove) the cursor points at the next pair
/// in slot order, so a remove-or-advance loop visits every pair once.
pub struct CursorMut<
    'a,
    K,
    V,
    P: Storage<(K, V)> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    inner: crate::hash_table::CursorMut<'a, (K, V), P, LF>,
}

impl<K, V, P: Storage<(K, V)>, const LF: usize> CursorMut<'_, K, V, P, LF> {
    /// Returns `true` if the cursor is past the last pair.
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Returns the pair under the cursor.
    pub fn get(&self) -> Option<(&K, &V)> {
        self.inner.get().map(|(k, v)| (k, v))
    }

    /// Returns the pair under the cursor with a mutable value.
    pub fn get_mut(&mut self) -> Option<(&K, &mut V)> {
        self.inner.get_mut().map(|(k, v)| (&*k, v))
    }

    /// Moves the cursor to the next pair.
    pub fn move_next(&mut self) {
        self.inner.move_next();
    }

    /// Removes the pair under the cursor and moves to the next pair.
    pub fn remove(&mut self) -> Option<(K, V)> {
        self.inner.remove()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V, P: Storage<(K, V)> = Inline> {
    inner: crate::hash_table::Iter<'a, (K, V), P>,
}

impl<K, V, P: Storage<(K, V)>> Clone for Iter<'_, K, V, P> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, P: Storage<(K, V)>> Iterator for Iter<'a, K, V, P> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: Storage<(K, V)>> ExactSizeIterator for Iter<'_, K, V, P> {}
impl<K, V, P: Storage<(K, V)>> FusedIterator for Iter<'_, K, V, P> {}

/// A mutable iterator over the key-value pairs of a `HashMap`.
pub struct IterMut<'a, K, V, P: Storage<(K, V)> = Inline> {
    inner: crate::hash_table::IterMut<'a, (K, V), P>,
}

impl<'a, K, V, P: Storage<(K, V)>> Iterator for IterMut<'a, K, V, P> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: Storage<(K, V)>> ExactSizeIterator for IterMut<'_, K, V, P> {}
impl<K, V, P: Storage<(K, V)>> FusedIterator for IterMut<'_, K, V, P> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V, P: Storage<(K, V)> = Inline> {
    inner: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: Storage<(K, V)>> Iterator for Keys<'a, K, V, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: Storage<(K, V)>> ExactSizeIterator for Keys<'_, K, V, P> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V, P: Storage<(K, V)> = Inline> {
    inner: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: Storage<(K, V)>> Iterator for Values<'a, K, V, P> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: Storage<(K, V)>> ExactSizeIterator for Values<'_, K, V, P> {}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V, P: Storage<(K, V)> = Inline> {
    inner: IterMut<'a, K, V, P>,
}

impl<'a, K, V, P: Storage<(K, V)>> Iterator for ValuesMut<'a, K, V, P> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: Storage<(K, V)>> ExactSizeIterator for ValuesMut<'_, K, V, P> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<
    'a,
    K,
    V,
    P: Storage<(K, V)> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    inner: crate::hash_table::Drain<'a, (K, V), P, LF>,
}

impl<K, V, P: Storage<(K, V)>, const LF: usize> Iterator for Drain<'_, K, V, P, LF> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: Storage<(K, V)>, const LF: usize> ExactSizeIterator for Drain<'_, K, V, P, LF> {}

/// An owning iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V, P: Storage<(K, V)> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    inner: crate::hash_table::IntoIter<(K, V), P, LF>,
}

impl<K, V, P: Storage<(K, V)>, const LF: usize> Iterator for IntoIter<K, V, P, LF> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: Storage<(K, V)>, const LF: usize> ExactSizeIterator for IntoIter<K, V, P, LF> {}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::hash::BuildRobinHoodHasher;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Sends every key to the same bucket.
    #[derive(Clone, Default)]
    struct ConstantHashBuilder;

    struct ConstantHasher;

    impl Hasher for ConstantHasher {
        fn finish(&self) -> u64 {
            0x1234
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    impl BuildHasher for ConstantHashBuilder {
        type Hasher = ConstantHasher;

        fn build_hasher(&self) -> Self::Hasher {
            ConstantHasher
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.bucket_count(), 0);

        let map2: HashMap<i32, String, _> = HashMap::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.capacity(), 0);
    }

    #[test]
    fn test_with_capacity() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::with_capacity(100);
        assert!(map.capacity() >= 100);
        assert!(map.is_empty());

        let map2: NodeMap<i32, String, _> =
            HashMap::with_capacity_and_hasher(200, SipHashBuilder::default());
        assert!(map2.capacity() >= 200);
        assert!(map2.is_empty());
    }

    #[test]
    fn test_insert_keeps_first_value() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());

        let (value, inserted) = map.insert(1, "hello".to_string());
        assert_eq!((value.as_str(), inserted), ("hello", true));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        let (value, inserted) = map.insert(1, "world".to_string());
        assert_eq!((value.as_str(), inserted), ("hello", false));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);
    }

    #[test]
    fn test_insert_or_assign_keeps_last_value() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());

        assert!(map.insert_or_assign(1, "hello".to_string()).1);
        let (value, inserted) = map.insert_or_assign(1, "world".to_string());
        assert_eq!((value.as_str(), inserted), ("world", false));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
    }

    #[test]
    fn test_try_emplace_is_lazy() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        let calls = Cell::new(0);
        let make = || {
            calls.set(calls.get() + 1);
            "made".to_string()
        };

        assert!(map.try_emplace(7, make).1);
        assert!(!map.try_emplace(7, make).1);
        assert_eq!(calls.get(), 1);
        assert_eq!(map[&7], "made");
    }

    #[test]
    fn test_get_mut() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_contains_key_and_count() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        assert!(!map.contains_key(&1));
        assert_eq!(map.count(&1), 0);

        map.insert(1, "value".to_string());
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
        assert_eq!(map.count(&1), 1);
    }

    #[test]
    fn test_remove_and_erase() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());
        map.insert(3, "!".to_string());

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));
        assert_eq!(map.remove(&1), None);

        assert_eq!(map.remove_entry(&2), Some((2, "world".to_string())));
        assert_eq!(map.erase(&3), 1);
        assert_eq!(map.erase(&3), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..100 {
            map.insert(i, i * 2);
        }
        let buckets = map.bucket_count();

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.bucket_count(), buckets);
        assert!(map.iter().next().is_none());

        map.insert(5, 10);
        assert_eq!(map.get(&5), Some(&10));
    }

    #[test]
    fn test_reserve_bucket_counts() {
        let mut map: HashMap<u64, u64, SipHashBuilder, Inline, 80> = HashMap::new();
        map.reserve(819);
        assert_eq!(map.bucket_count(), 1024);
        map.reserve(820);
        assert_eq!(map.bucket_count(), 2048);

        let mut map: HashMap<u64, u64, SipHashBuilder, Inline, 80> = HashMap::new();
        map.reserve(820);
        assert_eq!(map.bucket_count(), 2048);
    }

    #[test]
    fn test_reserve_overflow() {
        let mut map: HashMap<u64, u64, SipHashBuilder> = HashMap::new();
        map.insert(1, 1);
        assert_eq!(
            map.try_reserve(usize::MAX - 2),
            Err(TryReserveError::CapacityOverflow)
        );
        assert_eq!(map[&1], 1);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_reserve_overflow_panics() {
        let mut map: HashMap<u64, u64, SipHashBuilder> = HashMap::new();
        map.reserve(usize::MAX - 2);
    }

    #[test]
    fn test_rehash_and_shrink() {
        let mut map: HashMap<u64, u64, SipHashBuilder, Inline, 80> = HashMap::new();
        for i in 0..100 {
            map.insert(i, i);
        }
        map.reserve(10_000);
        assert!(map.bucket_count() >= 16384);

        map.shrink_to_fit();
        assert_eq!(map.bucket_count(), 128);

        map.rehash(1000);
        assert_eq!(map.bucket_count(), 2048);
        assert!(map.try_rehash(0).is_ok());
        assert_eq!(map.bucket_count(), 128);

        for i in 0..100 {
            assert_eq!(map.get(&i), Some(&i));
        }
    }

    #[test]
    fn test_entry_api() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());

        match map.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);
                entry.insert("first".to_string());
            }
            Entry::Occupied(_) => panic!("Entry should be vacant"),
        }

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), "first");
                assert_eq!(entry.insert("second".to_string()), "first");
            }
            Entry::Vacant(_) => panic!("Entry should be occupied"),
        }
        assert_eq!(map[&1], "second");

        *map.entry(2).or_insert_with(|| "two".to_string()) += "!";
        assert_eq!(map[&2], "two!");

        map.entry(2).and_modify(|v| v.push('?')).or_default();
        assert_eq!(map[&2], "two!?");

        assert_eq!(map.entry(3).key(), &3);
        assert_eq!(map.get_or_insert_default(3), "");
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_occupied_entry_remove() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);

        if let Entry::Occupied(entry) = map.entry("a".to_string()) {
            assert_eq!(entry.remove_entry(), ("a".to_string(), 1));
        }
        if let Entry::Occupied(entry) = map.entry("b".to_string()) {
            assert_eq!(entry.remove(), 2);
        }
        assert!(map.is_empty());

        if let Entry::Vacant(entry) = map.entry("c".to_string()) {
            assert_eq!(entry.into_key(), "c");
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_iterators() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..10 {
            map.insert(i, i * 10);
        }

        assert_eq!(map.iter().len(), 10);
        let mut pairs: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.sort();
        assert_eq!(pairs, (0..10).map(|i| (i, i * 10)).collect::<Vec<_>>());

        let mut keys: Vec<_> = map.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());

        for (_, v) in map.iter_mut() {
            *v += 1;
        }
        for v in map.values_mut() {
            *v *= 2;
        }
        let sum: i32 = map.values().sum();
        assert_eq!(sum, (0..10).map(|i| (i * 10 + 1) * 2).sum::<i32>());

        for (k, v) in &mut map {
            *v = *k;
        }
        assert!((&map).into_iter().all(|(k, v)| k == v));

        let mut owned: Vec<_> = map.into_iter().collect();
        owned.sort();
        assert_eq!(owned.len(), 10);
        assert_eq!(owned[3], (3, 3));
    }

    #[test]
    fn test_drain() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..5 {
            map.insert(i, i * 10);
        }

        let mut drained: Vec<_> = map.drain().collect();
        drained.sort();
        assert_eq!(drained, alloc::vec![(0, 0), (1, 10), (2, 20), (3, 30), (4, 40)]);
        assert!(map.is_empty());

        map.insert(9, 9);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_retain() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..1000 {
            map.insert(i, i);
        }
        map.retain(|k, v| {
            *v += 1;
            k % 7 == 0
        });
        assert_eq!(map.len(), 143);
        assert!(map.iter().all(|(k, v)| k % 7 == 0 && *v == k + 1));
    }

    #[test]
    fn test_erase_evens_scenario() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        for i in 1..=100 {
            map.insert(i, i);
        }
        for i in (2..=100).step_by(2) {
            assert_eq!(map.erase(&i), 1);
        }
        assert_eq!(map.len(), 50);
        for i in 1000..1050 {
            map.insert(i, i);
        }
        assert_eq!(map.len(), 100);
        assert_eq!(map.iter().count(), 100);
        assert!((1..=100).all(|i| map.contains_key(&i) == (i % 2 == 1)));
    }

    #[test]
    fn test_cursor_erase_loop() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..1000u32 {
            map.insert(i, i);
        }

        let mut visited = 0;
        let mut cursor = map.cursor_mut();
        while let Some((&k, v)) = cursor.get_mut() {
            visited += 1;
            *v += 1;
            if k % 3 == 0 {
                assert_eq!(cursor.remove().map(|(k, _)| k % 3), Some(0));
            } else {
                cursor.move_next();
            }
        }
        assert_eq!(visited, 1000);
        assert_eq!(map.len(), 666);
        assert!(map.iter().all(|(k, v)| k % 3 != 0 && *v == k + 1));

        let mut cursor = map.find_cursor_mut(&1);
        assert_eq!(cursor.get(), Some((&1, &2)));
        assert_eq!(cursor.remove(), Some((1, 2)));
        assert!(map.find_cursor_mut(&1).is_end());
    }

    #[test]
    fn test_string_keys_borrowed_lookup() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        map.insert("hello".to_string(), 1);
        map.insert("world".to_string(), 2);

        assert_eq!(map.get("hello"), Some(&1));
        assert_eq!(map.get_key_value("world"), Some((&"world".to_string(), &2)));
        assert!(map.contains_key("world"));
        assert!(!map.contains_key("missing"));
        assert_eq!(map["hello"], 1);
        assert_eq!(map.remove("hello"), Some(1));
    }

    #[derive(PartialEq, Eq, Hash, Debug)]
    struct Name {
        first: String,
        last: String,
    }

    struct NameRef<'a>(&'a str, &'a str);

    impl Hash for NameRef<'_> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.0.hash(state);
            self.1.hash(state);
        }
    }

    impl Equivalent<Name> for NameRef<'_> {
        fn equivalent(&self, key: &Name) -> bool {
            self.0 == key.first && self.1 == key.last
        }
    }

    #[test]
    fn test_custom_equivalent_lookup() {
        let mut map: HashMap<Name, u32, _> = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(
            Name {
                first: "Robin".to_string(),
                last: "Locksley".to_string(),
            },
            1,
        );

        assert_eq!(map.get(&NameRef("Robin", "Locksley")), Some(&1));
        assert_eq!(map.get(&NameRef("Robin", "Hood")), None);
        assert_eq!(map.remove(&NameRef("Robin", "Locksley")), Some(1));
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_index_missing_key_panics() {
        let map: HashMap<i32, i32, SipHashBuilder> = HashMap::new();
        let _value: i32 = map[&1];
    }

    #[test]
    fn test_swap() {
        let mut a: HashMap<i32, i32, BuildRobinHoodHasher> = (0..10).map(|i| (i, i)).collect();
        let mut b: HashMap<i32, i32, BuildRobinHoodHasher> = HashMap::new();
        b.insert(100, 100);

        a.swap(&mut b);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 10);
        assert_eq!(a[&100], 100);
        assert_eq!(b[&9], 9);
    }

    #[test]
    fn test_clone_and_eq() {
        let mut map: NodeMap<String, Vec<u8>, SipHashBuilder> = HashMap::new();
        for i in 0..50 {
            map.insert(i.to_string(), alloc::vec![i as u8; 3]);
        }

        let mut copy = map.clone();
        assert_eq!(copy, map);
        copy.get_mut("7").unwrap().push(0);
        assert_ne!(copy, map);
        copy.remove("7");
        assert_ne!(copy, map);
        assert_eq!(map.len(), 50);
    }

    #[test]
    fn test_extend_last_value_wins() {
        let mut map: HashMap<i32, &str, SipHashBuilder> = HashMap::new();
        map.extend([(1, "a"), (2, "b"), (1, "c")]);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&1], "c");

        let other: HashMap<i32, &str, BuildRobinHoodHasher> =
            [(3, "x"), (4, "y")].into_iter().collect();
        map.extend(&other);
        assert_eq!(map.len(), 4);
        assert_eq!(map[&4], "y");
    }

    #[test]
    fn test_debug_output() {
        let mut map: HashMap<i32, &str, SipHashBuilder> = HashMap::new();
        map.insert(1, "a");
        assert_eq!(alloc::format!("{:?}", map), r#"{1: "a"}"#);
    }

    #[test]
    fn test_degenerate_hasher_reports_overflow() {
        let mut map: HashMap<u32, u32, ConstantHashBuilder, Inline, 80> = HashMap::new();
        for i in 0..255 {
            match map.try_entry(i) {
                Ok(entry) => {
                    entry.or_insert(i);
                }
                Err(err) => panic!("failed at {i}: {err}"),
            }
        }
        assert!(matches!(
            map.try_entry(255),
            Err(TryReserveError::ProbeOverflow)
        ));
        assert_eq!(map.len(), 255);
        assert!((0..255).all(|i| map[&i] == i));
    }

    #[test]
    #[should_panic(expected = "probe distance overflow")]
    fn test_degenerate_hasher_panics_on_insert() {
        let mut map: HashMap<u32, u32, ConstantHashBuilder> = HashMap::new();
        for i in 0..1000 {
            map.insert(i, i);
        }
    }

    #[derive(Clone)]
    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_node_map_drops() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut map: NodeMap<u32, Tracked, SipHashBuilder> = HashMap::new();
            for i in 0..100 {
                map.insert(i, Tracked(drops.clone()));
            }
            // Rejected duplicate.
            map.insert(0, Tracked(drops.clone()));
            assert_eq!(drops.get(), 1);

            map.insert_or_assign(1, Tracked(drops.clone()));
            assert_eq!(drops.get(), 2);

            map.remove(&2);
            assert_eq!(drops.get(), 3);
        }
        assert_eq!(drops.get(), 102);
    }

    #[test]
    fn test_node_map_references_survive_growth() {
        let mut map: NodeMap<u64, [u64; 8], SipHashBuilder> = HashMap::new();
        let first = map.insert(0, [7; 8]).0 as *const [u64; 8];
        for i in 1..10_000 {
            map.insert(i, [i; 8]);
        }
        assert_eq!(map.get(&0).unwrap() as *const [u64; 8], first);
    }

    #[test]
    fn test_complex_values() {
        let mut map: HashMap<_, _, _> = HashMap::with_hasher(SipHashBuilder::default());
        let value = alloc::vec![1, 2, 3, 4, 5];
        map.insert("numbers", value.clone());
        assert_eq!(map.get("numbers"), Some(&value));

        if let Some(v) = map.get_mut("numbers") {
            v.push(6);
        }
        assert_eq!(map.get("numbers").map(Vec::len), Some(6));
    }
}
