use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::DEFAULT_MAX_LOAD_FACTOR;
use crate::DefaultHashBuilder;
use crate::Equivalent;
use crate::TryReserveError;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::storage::Inline;
use crate::storage::Pooled;
use crate::storage::Storage;

/// A hash set built on the Robin Hood [`HashTable`].
///
/// `HashSet<T, S, P, LF>` stores values of type `T` where `T` implements
/// `Hash + Eq`, hashed with the hasher builder `S`, kept according to the
/// storage strategy `P`, and grows once more than `LF` percent full.
///
/// `P` defaults to [`Inline`] whatever the size of `T`. Use [`NodeSet`] for
/// values that [`prefers_inline`](crate::storage::prefers_inline) reports as
/// too large for the slot array.
///
/// # Performance Characteristics
///
/// - **Memory**: 1 byte of metadata per slot, plus the size of `T` for
///   inline storage or one pointer for pooled storage.
pub struct HashSet<
    T,
    S = DefaultHashBuilder,
    P: Storage<T> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    table: HashTable<T, P, LF>,
    hash_builder: S,
}

/// A [`HashSet`] storing its values directly in the slot array.
pub type FlatSet<T, S = DefaultHashBuilder, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> =
    HashSet<T, S, Inline, LF>;

/// A [`HashSet`] storing its values in pooled blocks.
pub type NodeSet<T, S = DefaultHashBuilder, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> =
    HashSet<T, S, Pooled, LF>;

impl<T, S, P, const LF: usize> PartialEq for HashSet<T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher,
    P: Storage<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S, P, const LF: usize> Eq for HashSet<T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher,
    P: Storage<T>,
{
}

impl<T: Debug, S, P: Storage<T>, const LF: usize> Debug for HashSet<T, S, P, LF> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone, S: Clone, P: Storage<T>, const LF: usize> Clone for HashSet<T, S, P, LF> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<T, S, P: Storage<T>, const LF: usize> HashSet<T, S, P, LF> {
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::hash::RandomState;
    ///
    /// use robin_hood_map::hash_set::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates a new hash set that holds at least `capacity` values without
    /// growing, using the given hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of values the set can hold before growing.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of buckets: zero or a power of two.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the ratio of values to buckets.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the load factor at which the set grows.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Clears the set, removing all values. Keeps the allocated memory.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Swaps the contents of two sets.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Retains only the values for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    ///
    /// let mut set: HashSet<i32> = (1..=4).collect();
    /// set.retain(|&x| x % 2 == 0);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains(&2));
    /// assert!(set.contains(&4));
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table.retain(|v| f(&*v));
    }

    /// An iterator visiting all values in slot order.
    pub fn iter(&self) -> Iter<'_, T, P> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Clears the set, returning all values as an iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    ///
    /// let mut set: HashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let mut drained: Vec<_> = set.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, vec![1, 2, 3]);
    /// assert!(set.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T, P, LF> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T, S, P, const LF: usize> HashSet<T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher,
    P: Storage<T>,
{
    #[inline]
    fn hash<Q: Hash + ?Sized>(&self, value: &Q) -> u64 {
        self.hash_builder.hash_one(value)
    }

    /// Shrinks the set to the smallest size that holds its values.
    pub fn shrink_to_fit(&mut self) {
        let hash_builder = &self.hash_builder;
        self.table.shrink_to_fit(|v| hash_builder.hash_one(v));
    }

    /// Reserves capacity for at least `additional` more values.
    ///
    /// # Panics
    ///
    /// Panics if the new size overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        let hash_builder = &self.hash_builder;
        self.table.reserve(additional, |v| hash_builder.hash_one(v));
    }

    /// Tries to reserve capacity for at least `additional` more values.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let hash_builder = &self.hash_builder;
        self.table
            .try_reserve(additional, |v| hash_builder.hash_one(v))
    }

    /// Rebuilds the set with the smallest size that holds
    /// `max(count, len)` values. May shrink the set.
    pub fn rehash(&mut self, count: usize) {
        let hash_builder = &self.hash_builder;
        self.table.rehash(count, |v| hash_builder.hash_one(v));
    }

    /// Like [`rehash`](Self::rehash), but returns an error instead of
    /// panicking.
    pub fn try_rehash(&mut self, count: usize) -> Result<(), TryReserveError> {
        let hash_builder = &self.hash_builder;
        self.table.try_rehash(count, |v| hash_builder.hash_one(v))
    }

    /// Gets the entry for `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    /// use robin_hood_map::hash_set::Entry;
    ///
    /// let mut set: HashSet<String> = HashSet::new();
    /// match set.entry("robin".to_string()) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert();
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    /// assert!(set.contains("robin"));
    /// assert_eq!(set.entry("robin".to_string()).or_insert(), "robin");
    /// ```
    pub fn entry(&mut self, value: T) -> Entry<'_, T, P, LF> {
        let hash = self.hash(&value);
        let hash_builder = &self.hash_builder;
        match self
            .table
            .entry(hash, |v| *v == value, |v| hash_builder.hash_one(v))
        {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, value }),
        }
    }

    /// Like [`entry`](Self::entry), but returns an error instead of
    /// panicking if the set has to grow and cannot.
    pub fn try_entry(&mut self, value: T) -> Result<Entry<'_, T, P, LF>, TryReserveError> {
        let hash = self.hash(&value);
        let hash_builder = &self.hash_builder;
        match self
            .table
            .try_entry(hash, |v| *v == value, |v| hash_builder.hash_one(v))?
        {
            TableEntry::Occupied(entry) => Ok(Entry::Occupied(OccupiedEntry { entry })),
            TableEntry::Vacant(entry) => Ok(Entry::Vacant(VacantEntry { entry, value })),
        }
    }

    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was newly inserted. An equal value already
    /// in the set is kept and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        match self.entry(value) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert();
                true
            }
        }
    }

    /// Adds a value to the set, replacing an equal value if present.
    ///
    /// Returns the replaced value.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.hash(&value);
        let hash_builder = &self.hash_builder;
        match self
            .table
            .entry(hash, |v| *v == value, |v| hash_builder.hash_one(v))
        {
            TableEntry::Occupied(mut entry) => Some(entry.insert(value)),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns `true` if the set contains the value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    ///
    /// let set: HashSet<String> = ["a".to_string()].into_iter().collect();
    /// assert!(set.contains("a"));
    /// assert!(!set.contains("b"));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        Q: Hash + Equivalent<T> + ?Sized,
    {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        Q: Hash + Equivalent<T> + ?Sized,
    {
        let hash = self.hash(value);
        self.table.find(hash, |v| value.equivalent(v))
    }

    /// Removes a value from the set. Returns whether it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        Q: Hash + Equivalent<T> + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        Q: Hash + Equivalent<T> + ?Sized,
    {
        let hash = self.hash(value);
        self.table.remove(hash, |v| value.equivalent(v))
    }

    /// Returns `true` if `self` has no values in common with `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [3, 4].into_iter().collect();
    /// assert!(a.is_disjoint(&b));
    /// ```
    pub fn is_disjoint(&self, other: &Self) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if `other` contains every value in `self`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if `self` contains every value in `other`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Visits the values in `self` or `other`, each once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let b: HashSet<i32> = [3, 4].into_iter().collect();
    ///
    /// let mut union: Vec<_> = a.union(&b).copied().collect();
    /// union.sort();
    /// assert_eq!(union, vec![1, 2, 3, 4]);
    /// ```
    pub fn union<'a>(&'a self, other: &'a Self) -> Union<'a, T, S, P, LF> {
        Union {
            iter: self.iter(),
            other_iter: other.iter(),
            set: self,
        }
    }

    /// Visits the values in both `self` and `other`.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> Intersection<'a, T, S, P, LF> {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        Intersection {
            iter: small.iter(),
            other: large,
        }
    }

    /// Visits the values in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a Self) -> Difference<'a, T, S, P, LF> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Visits the values in exactly one of `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let b: HashSet<i32> = [3, 4].into_iter().collect();
    ///
    /// let mut diff: Vec<_> = a.symmetric_difference(&b).copied().collect();
    /// diff.sort();
    /// assert_eq!(diff, vec![1, 2, 4]);
    /// ```
    pub fn symmetric_difference<'a>(
        &'a self,
        other: &'a Self,
    ) -> SymmetricDifference<'a, T, S, P, LF> {
        SymmetricDifference {
            iter: self.difference(other).chain(other.difference(self)),
        }
    }
}

impl<T, S, P, const LF: usize> HashSet<T, S, P, LF>
where
    S: Default,
    P: Storage<T>,
{
    /// Creates a new hash set using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash set that holds at least `capacity` values without
    /// growing, using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::NodeSet;
    ///
    /// let set: NodeSet<i32> = NodeSet::with_capacity(100);
    /// assert!(set.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S, P, const LF: usize> Default for HashSet<T, S, P, LF>
where
    S: Default,
    P: Storage<T>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// A view into a single entry in a set, which may either be vacant or
/// occupied.
pub enum Entry<'a, T, P: Storage<T> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, T, P, LF>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, T, P, LF>),
}

impl<'a, T, P: Storage<T>, const LF: usize> Entry<'a, T, P, LF> {
    /// Inserts the value if the entry is vacant and returns a reference to
    /// the stored value.
    pub fn or_insert(self) -> &'a T {
        match self {
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(entry) => entry.insert(),
        }
    }

    /// Returns a reference to the entry's value.
    pub fn get(&self) -> &T {
        match self {
            Entry::Occupied(entry) => entry.get(),
            Entry::Vacant(entry) => entry.get(),
        }
    }
}

/// A view into a vacant entry in a set.
pub struct VacantEntry<'a, T, P: Storage<T> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR>
{
    entry: crate::hash_table::VacantEntry<'a, T, P, LF>,
    value: T,
}

impl<'a, T, P: Storage<T>, const LF: usize> VacantEntry<'a, T, P, LF> {
    /// Gets a reference to the value that would be inserted.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Takes ownership of the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Inserts the value into the set.
    pub fn insert(self) -> &'a T {
        self.entry.insert(self.value)
    }
}

/// A view into an occupied entry in a set.
pub struct OccupiedEntry<'a, T, P: Storage<T> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR>
{
    entry: crate::hash_table::OccupiedEntry<'a, T, P, LF>,
}

impl<'a, T, P: Storage<T>, const LF: usize> OccupiedEntry<'a, T, P, LF> {
    /// Gets a reference to the stored value.
    pub fn get(&self) -> &T {
        self.entry.get()
    }

    fn into_ref(self) -> &'a T {
        self.entry.into_mut()
    }

    /// Replaces the stored value, returning the old one.
    pub fn replace(mut self, value: T) -> T {
        self.entry.insert(value)
    }

    /// Removes the value from the set and returns it.
    pub fn remove(self) -> T {
        self.entry.remove()
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T, P: Storage<T> = Inline> {
    inner: crate::hash_table::Iter<'a, T, P>,
}

impl<T, P: Storage<T>> Clone for Iter<'_, T, P> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T, P: Storage<T>> Iterator for Iter<'a, T, P> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, P: Storage<T>> ExactSizeIterator for Iter<'_, T, P> {}
impl<T, P: Storage<T>> FusedIterator for Iter<'_, T, P> {}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T, P: Storage<T> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    inner: crate::hash_table::Drain<'a, T, P, LF>,
}

impl<T, P: Storage<T>, const LF: usize> Iterator for Drain<'_, T, P, LF> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A consuming iterator over the values of a `HashSet`.
pub struct IntoIter<T, P: Storage<T> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    inner: crate::hash_table::IntoIter<T, P, LF>,
}

impl<T, P: Storage<T>, const LF: usize> Iterator for IntoIter<T, P, LF> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, S, P: Storage<T>, const LF: usize> IntoIterator for HashSet<T, S, P, LF> {
    type IntoIter = IntoIter<T, P, LF>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S, P: Storage<T>, const LF: usize> IntoIterator for &'a HashSet<T, S, P, LF> {
    type IntoIter = Iter<'a, T, P>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S, P, const LF: usize> FromIterator<T> for HashSet<T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
    P: Storage<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = HashSet::new();
        set.extend(iter);
        set
    }
}

impl<T, S, P, const LF: usize> Extend<T> for HashSet<T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher,
    P: Storage<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, S, P, const LF: usize> Extend<&'a T> for HashSet<T, S, P, LF>
where
    T: Hash + Eq + Copy + 'a,
    S: BuildHasher,
    P: Storage<T>,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

/// An iterator over the union of two sets.
pub struct Union<'a, T, S, P: Storage<T> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    iter: Iter<'a, T, P>,
    other_iter: Iter<'a, T, P>,
    set: &'a HashSet<T, S, P, LF>,
}

impl<'a, T, S, P, const LF: usize> Iterator for Union<'a, T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher,
    P: Storage<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(v) = self.iter.next() {
            return Some(v);
        }
        loop {
            let v = self.other_iter.next()?;
            if !self.set.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the intersection of two sets.
pub struct Intersection<
    'a,
    T,
    S,
    P: Storage<T> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    iter: Iter<'a, T, P>,
    other: &'a HashSet<T, S, P, LF>,
}

impl<'a, T, S, P, const LF: usize> Iterator for Intersection<'a, T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher,
    P: Storage<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let v = self.iter.next()?;
            if self.other.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the difference of two sets.
pub struct Difference<'a, T, S, P: Storage<T> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR>
{
    iter: Iter<'a, T, P>,
    other: &'a HashSet<T, S, P, LF>,
}

impl<'a, T, S, P, const LF: usize> Iterator for Difference<'a, T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher,
    P: Storage<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let v = self.iter.next()?;
            if !self.other.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the symmetric difference of two sets.
pub struct SymmetricDifference<
    'a,
    T,
    S,
    P: Storage<T> = Inline,
    const LF: usize = DEFAULT_MAX_LOAD_FACTOR,
> {
    iter: core::iter::Chain<Difference<'a, T, S, P, LF>, Difference<'a, T, S, P, LF>>,
}

impl<'a, T, S, P, const LF: usize> Iterator for SymmetricDifference<'a, T, S, P, LF>
where
    T: Hash + Eq,
    S: BuildHasher,
    P: Storage<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
