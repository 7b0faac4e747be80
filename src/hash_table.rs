//! A low-level Robin Hood hash table.
//!
//! [`HashTable<V, P, LF>`] stores values of type `V` with linear probing and
//! Robin Hood displacement. Callers supply the hash and the equality
//! predicate for every operation, plus a rehashing closure for operations
//! that may grow the table.
//!
//! Each slot carries one metadata byte (see the `info` module): empty, or
//! occupied together with the element's distance from its ideal bucket.
//! Lookups stop as soon as a slot holds an element closer to home than the
//! key would be, and removal shifts the following displaced elements back
//! one slot, so the table never needs tombstones.

use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr::NonNull;

use crate::DEFAULT_MAX_LOAD_FACTOR;
use crate::error::Fallibility;
use crate::error::TryReserveError;
use crate::info;
use crate::storage::Inline;
use crate::storage::Storage;

/// Bucket count of the first allocation.
const MIN_BUCKETS: usize = 8;

/// Number of elements allowed in `buckets` buckets at `max_load_factor`
/// percent.
#[inline(always)]
pub(crate) fn max_elements_allowed(buckets: usize, max_load_factor: usize) -> usize {
    if buckets <= usize::MAX / 100 {
        buckets * max_load_factor / 100
    } else {
        (buckets as f64 * (max_load_factor as f64 / 100.0)) as usize
    }
}

/// Slots appended after the last bucket so that probing never wraps.
#[inline(always)]
fn overflow_slots(max_elements: usize) -> usize {
    max_elements.min(info::MAX_OVERFLOW_SLOTS)
}

#[inline(always)]
fn infallible<T>(result: Result<T, TryReserveError>) -> T {
    match result {
        Ok(value) => value,
        Err(_) => unreachable!("infallible operations panic instead of returning errors"),
    }
}

#[derive(Clone, Copy, Debug)]
struct DataLayout {
    layout: Layout,
    infos_offset: usize,
}

impl DataLayout {
    const UNALLOCATED: DataLayout = DataLayout {
        layout: Layout::new::<()>(),
        infos_offset: 0,
    };

    /// Nodes first, then one metadata byte per slot plus the sentinel.
    fn new<N>(slots: usize) -> Option<Self> {
        let nodes_layout = Layout::array::<N>(slots).ok()?;
        let infos_layout = Layout::array::<u8>(slots.checked_add(1)?).ok()?;
        let (layout, infos_offset) = nodes_layout.extend(infos_layout).ok()?;

        Some(DataLayout {
            layout: layout.pad_to_align(),
            infos_offset,
        })
    }
}

/// Probe distances of the live elements.
///
/// `counts[d]` is the number of elements sitting `d` slots past their ideal
/// bucket.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Element count per probe distance.
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Longest probe distance present, if any element is present.
    pub fn max_distance(&self) -> Option<usize> {
        self.counts.iter().rposition(|&count| count != 0)
    }

    /// Number of elements counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Pretty-prints the histogram as a horizontal bar chart on stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            bar.extend(partial);
            bar
        };

        let shown = self.max_distance().map_or(0, |d| d + 1);
        for (distance, &count) in self.counts.iter().take(shown).enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Maximum number of elements before the table grows
    pub capacity: usize,
    /// Number of buckets (a power of two, or zero when unallocated)
    pub buckets: usize,
    /// Buckets plus overflow slots
    pub slots: usize,
    /// Longest probe distance of any element
    pub max_distance: usize,
    /// Average probe distance over all elements
    pub mean_distance: f64,
    /// Load factor (populated / buckets)
    pub load_factor: f64,
    /// Bytes in the slot and metadata allocation
    pub total_bytes: usize,
    /// Blocks owned by the node pool
    pub pool_blocks: usize,
    /// Pool blocks waiting on the free list
    pub pool_available: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% of {} buckets)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            self.buckets
        );
        println!(
            "Slots: {} ({} overflow)",
            self.slots,
            self.slots - self.buckets
        );
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_distance, self.mean_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        if self.pool_blocks != 0 {
            println!(
                "Pool: {} blocks ({} free)",
                self.pool_blocks, self.pool_available
            );
        }
    }
}

/// A hash table using Robin Hood hashing with backward-shift deletion.
///
/// `HashTable<V, P, LF>` stores values of type `V` using the storage strategy
/// `P` ([`Inline`] or [`Pooled`](crate::storage::Pooled)) and grows once it
/// holds more than `LF` percent of its bucket count. Unlike standard hash
/// maps, this table requires you to provide the hash value and an equality
/// predicate for each operation, and a hasher for operations that may move
/// elements to a new allocation.
///
/// ## Performance Characteristics
///
/// - **Memory**: 1 byte per slot overhead plus the node size. A table with
///   `n` buckets has up to 255 extra overflow slots, so probing never wraps.
/// - **Probing**: linear; elements are kept ordered by distance from their
///   ideal bucket, which bounds the length of unsuccessful searches.
///
/// ## Example
///
/// ```rust
/// # use robin_hood_map::hash::hash_int;
/// # use robin_hood_map::hash_table::Entry;
/// # use robin_hood_map::hash_table::HashTable;
/// #
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let mut table: HashTable<Person> = HashTable::with_capacity(100);
/// let hash = hash_int(123);
///
/// match table.entry(hash, |p| p.id == 123, |p| hash_int(p.id)) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).unwrap().name, "Alice");
/// ```
pub struct HashTable<V, P: Storage<V> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    layout: DataLayout,
    alloc: NonNull<u8>,
    pool: P::Pool,

    populated: usize,
    /// Population limit before the next insertion grows the table. Dropped to
    /// zero when an element reaches the largest storable probe distance.
    max_pop: usize,
    buckets: usize,
    slots: usize,

    _phantom: PhantomData<V>,
}

// SAFETY: The table owns its elements and the pool they live in; nothing is
// shared with other tables.
unsafe impl<V: Send, P: Storage<V>, const LF: usize> Send for HashTable<V, P, LF> {}
// SAFETY: Shared access only hands out shared references to elements.
unsafe impl<V: Sync, P: Storage<V>, const LF: usize> Sync for HashTable<V, P, LF> {}

impl<V, P: Storage<V>, const LF: usize> Debug for HashTable<V, P, LF> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        let mut s = f.debug_struct("HashTable");
        if self.slots == 0 {
            s.field("metadata", &"unallocated");
        } else {
            // SAFETY: An allocated table has `slots + 1` initialized metadata
            // bytes.
            let infos =
                unsafe { core::slice::from_raw_parts(self.infos_ptr(), self.slots + 1) };
            s.field(
                "metadata",
                &infos
                    .chunks(16)
                    .map(|w| {
                        w.iter()
                            .map(|&b| {
                                if b == info::EMPTY {
                                    "..".to_string()
                                } else {
                                    format!("{:02x}", b)
                                }
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            );
        }

        s.field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("buckets", &self.buckets)
            .finish()
    }
}

impl<V, P, const LF: usize> Clone for HashTable<V, P, LF>
where
    V: Clone,
    P: Storage<V>,
{
    /// Copies the slot layout exactly; the clone gets its own pool.
    fn clone(&self) -> Self {
        if self.slots == 0 {
            return Self::new();
        }

        let mut new_table = infallible(Self::allocate_buckets(
            self.buckets,
            Fallibility::Infallible,
        ));
        new_table.max_pop = self.max_pop;

        // SAFETY: Both tables have the same geometry. Metadata is copied only
        // after the node is written, so a panicking `clone` leaves a table
        // whose metadata matches its contents.
        unsafe {
            for index in 0..self.slots {
                let info = self.info(index);
                if info::is_occupied(info) {
                    let value = P::get(&*self.node_ptr(index)).clone();
                    let node = P::construct(&mut new_table.pool, value);
                    new_table.node_ptr(index).write(node);
                    new_table.set_info(index, info);
                    new_table.populated += 1;
                }
            }
        }

        debug_assert_eq!(new_table.populated, self.populated);
        new_table
    }
}

impl<V, P: Storage<V>, const LF: usize> Drop for HashTable<V, P, LF> {
    fn drop(&mut self) {
        // SAFETY: Nodes are only read from occupied slots. A table with
        // `populated == 0` owns no nodes even if its metadata says otherwise,
        // which is how a rebuild hands its nodes over.
        unsafe {
            if core::mem::needs_drop::<V>() && self.populated > 0 {
                for index in 0..self.slots {
                    if info::is_occupied(self.info(index)) {
                        P::drop_node(self.node_ptr(index).read());
                    }
                }
            }

            if self.layout.layout.size() != 0 {
                alloc::alloc::dealloc(self.alloc.as_ptr(), self.layout.layout);
            }
        }
    }
}

impl<V, P: Storage<V>, const LF: usize> Default for HashTable<V, P, LF> {
    fn default() -> Self {
        Self::new()
    }
}

enum Probe {
    Found(usize),
    Vacant { index: usize, info: u8, empty: usize },
    Full,
}

impl<V, P: Storage<V>, const LF: usize> HashTable<V, P, LF> {
    const LOAD_FACTOR_IN_RANGE: () = assert!(
        LF > 10 && LF < 100,
        "the maximum load factor must be between 11 and 99 percent"
    );

    /// Creates an empty table without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::new();
    /// assert_eq!(table.bucket_count(), 0);
    /// ```
    pub fn new() -> Self {
        let () = Self::LOAD_FACTOR_IN_RANGE;
        Self {
            layout: DataLayout::UNALLOCATED,
            alloc: NonNull::dangling(),
            pool: P::Pool::default(),
            populated: 0,
            max_pop: 0,
            buckets: 0,
            slots: 0,
            _phantom: PhantomData,
        }
    }

    /// Creates a new hash table that can hold at least `capacity` elements
    /// without growing.
    ///
    /// A capacity of zero does not allocate.
    ///
    /// # Panics
    ///
    /// Panics if the required allocation size overflows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// assert_eq!(table.bucket_count(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            return Self::new();
        }

        let fallibility = Fallibility::Infallible;
        let buckets = infallible(
            Self::buckets_for(capacity).ok_or_else(|| fallibility.capacity_overflow()),
        );
        infallible(Self::allocate_buckets(buckets, fallibility))
    }

    /// Smallest bucket count that holds `elements` elements.
    fn buckets_for(elements: usize) -> Option<usize> {
        let mut buckets = MIN_BUCKETS;
        while max_elements_allowed(buckets, LF) < elements {
            buckets = buckets.checked_mul(2)?;
        }
        Some(buckets)
    }

    fn allocate_buckets(buckets: usize, fallibility: Fallibility) -> Result<Self, TryReserveError> {
        let () = Self::LOAD_FACTOR_IN_RANGE;
        debug_assert!(buckets.is_power_of_two());

        let max_pop = max_elements_allowed(buckets, LF);
        let slots = buckets
            .checked_add(overflow_slots(max_pop))
            .ok_or_else(|| fallibility.capacity_overflow())?;
        let layout =
            DataLayout::new::<P::Node>(slots).ok_or_else(|| fallibility.capacity_overflow())?;

        // SAFETY: The layout always has a non-zero size, since it holds at
        // least the sentinel byte.
        let alloc = unsafe {
            let raw_alloc = alloc::alloc::alloc(layout.layout);
            let Some(alloc) = NonNull::new(raw_alloc) else {
                return Err(fallibility.alloc_err(layout.layout));
            };

            core::ptr::write_bytes(raw_alloc.add(layout.infos_offset), info::EMPTY, slots);
            raw_alloc
                .add(layout.infos_offset + slots)
                .write(info::SENTINEL);
            alloc
        };

        Ok(Self {
            layout,
            alloc,
            pool: P::Pool::default(),
            populated: 0,
            max_pop,
            buckets,
            slots,
            _phantom: PhantomData,
        })
    }

    #[inline(always)]
    fn infos_ptr(&self) -> *mut u8 {
        // SAFETY: `infos_offset` is inside the allocation, or zero for an
        // unallocated table.
        unsafe { self.alloc.as_ptr().add(self.layout.infos_offset) }
    }

    /// # Safety
    ///
    /// `index <= self.slots` and the table must be allocated.
    #[inline(always)]
    unsafe fn info(&self, index: usize) -> u8 {
        debug_assert!(index <= self.slots);
        // SAFETY: Caller guarantees `index` addresses a metadata byte.
        unsafe { *self.infos_ptr().add(index) }
    }

    /// # Safety
    ///
    /// `index < self.slots`.
    #[inline(always)]
    unsafe fn set_info(&mut self, index: usize, info: u8) {
        debug_assert!(index < self.slots);
        // SAFETY: Caller guarantees `index` addresses a slot's metadata byte.
        unsafe { *self.infos_ptr().add(index) = info }
    }

    /// # Safety
    ///
    /// `index <= self.slots`. The node is only initialized if the slot is
    /// occupied.
    #[inline(always)]
    unsafe fn node_ptr(&self, index: usize) -> *mut P::Node {
        debug_assert!(index <= self.slots);
        // SAFETY: Caller guarantees `index` is inside the node array or one
        // past its end.
        unsafe { self.alloc.as_ptr().cast::<P::Node>().add(index) }
    }

    #[inline(always)]
    fn bucket_index(&self, hash: u64) -> usize {
        debug_assert!(self.buckets.is_power_of_two());
        hash as usize & (self.buckets - 1)
    }

    /// Returns the number of elements in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// assert_eq!(table.len(), 0);
    ///
    /// table.entry(hash_int(1), |&n: &u64| n == 1, |&n| hash_int(n)).or_insert(1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements the table can hold before growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 102);
    /// ```
    pub fn capacity(&self) -> usize {
        max_elements_allowed(self.buckets, LF)
    }

    /// Returns the number of buckets: zero or a power of two.
    pub fn bucket_count(&self) -> usize {
        self.buckets
    }

    /// Returns the ratio of elements to buckets.
    pub fn load_factor(&self) -> f32 {
        if self.buckets == 0 {
            0.0
        } else {
            self.populated as f32 / self.buckets as f32
        }
    }

    /// Returns the load factor at which the table grows.
    pub fn max_load_factor(&self) -> f32 {
        LF as f32 / 100.0
    }

    /// Finds the slot holding the value matching `eq`.
    #[inline]
    fn find_index(&self, hash: u64, mut eq: impl FnMut(&V) -> bool) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let mut index = self.bucket_index(hash);
        let mut expected = info::IDEAL as usize;

        // SAFETY: The sentinel holds the smallest occupied value, so neither
        // walk can pass it: the first stops because `expected >= 1`, the
        // second because `expected == 1` only at the starting bucket.
        unsafe {
            while expected < self.info(index) as usize {
                index += 1;
                expected += 1;
            }

            while expected == self.info(index) as usize {
                if eq(P::get(&*self.node_ptr(index))) {
                    return Some(index);
                }
                index += 1;
                expected += 1;
            }
        }

        None
    }

    /// Finds a value in the table by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.entry(hash_int(7), |&n: &u64| n == 7, |&n| hash_int(n)).or_insert(7);
    ///
    /// assert_eq!(table.find(hash_int(7), |&n| n == 7), Some(&7));
    /// assert_eq!(table.find(hash_int(8), |&n| n == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl FnMut(&V) -> bool) -> Option<&V> {
        let index = self.find_index(hash, eq)?;
        // SAFETY: `find_index` only returns occupied slots.
        unsafe { Some(P::get(&*self.node_ptr(index))) }
    }

    /// Finds a value in the table by hash and equality predicate, returning a
    /// mutable reference.
    pub fn find_mut(&mut self, hash: u64, eq: impl FnMut(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, eq)?;
        // SAFETY: `find_index` only returns occupied slots.
        unsafe { Some(P::get_mut(&mut *self.node_ptr(index))) }
    }

    /// Walks the probe sequence of `hash`, looking for a match or a place to
    /// insert.
    fn probe(&mut self, hash: u64, eq: &mut impl FnMut(&V) -> bool) -> Probe {
        if self.slots == 0 {
            return Probe::Full;
        }

        let mut index = self.bucket_index(hash);
        let mut expected = info::IDEAL as usize;

        // SAFETY: Same walk as `find_index`; the sentinel bounds both loops.
        unsafe {
            while expected < self.info(index) as usize {
                index += 1;
                expected += 1;
            }

            while expected == self.info(index) as usize {
                if eq(P::get(&*self.node_ptr(index))) {
                    return Probe::Found(index);
                }
                index += 1;
                expected += 1;
            }
        }

        if self.populated >= self.max_pop || expected > info::MAX as usize {
            return Probe::Full;
        }

        match self.find_empty(index) {
            Some(empty) => Probe::Vacant {
                index,
                info: expected as u8,
                empty,
            },
            None => {
                self.max_pop = 0;
                Probe::Full
            }
        }
    }

    #[inline]
    fn find_empty(&self, mut index: usize) -> Option<usize> {
        while index < self.slots {
            // SAFETY: `index < self.slots`.
            if unsafe { self.info(index) } == info::EMPTY {
                return Some(index);
            }
            index += 1;
        }
        None
    }

    /// Moves the nodes in `index..empty` up by one slot and bumps their
    /// probe distances.
    ///
    /// # Safety
    ///
    /// `index <= empty < self.slots` and `empty` must be an empty slot.
    unsafe fn shift_up(&mut self, index: usize, empty: usize) {
        debug_assert!(index <= empty && empty < self.slots);
        // SAFETY: Caller guarantees the range is inside the slot array and
        // that `empty` holds no node.
        unsafe {
            core::ptr::copy(self.node_ptr(index), self.node_ptr(index + 1), empty - index);

            let mut slot = empty;
            while slot > index {
                let moved = self.info(slot - 1);
                debug_assert!(moved < info::MAX);
                self.set_info(slot, moved + 1);
                if moved + 1 == info::MAX {
                    self.max_pop = 0;
                }
                slot -= 1;
            }
        }
    }

    /// Copies the node at `src` into the table without checking for
    /// duplicates.
    ///
    /// Returns `false`, leaving the table untouched, when the node cannot be
    /// placed because an earlier placement reached the largest storable probe
    /// distance or the probe would run past the overflow slots.
    ///
    /// # Safety
    ///
    /// `src` must point at an initialized node outside this table's
    /// allocation, and the table must be allocated.
    unsafe fn insert_unique_node(&mut self, hash: u64, src: *const P::Node) -> bool {
        if self.max_pop == 0 {
            return false;
        }

        let mut index = self.bucket_index(hash);
        let mut expected = info::IDEAL as usize;

        // SAFETY: The sentinel stops the walk at `self.slots` at the latest.
        unsafe {
            while expected <= self.info(index) as usize {
                index += 1;
                expected += 1;
            }
        }

        if expected > info::MAX as usize {
            return false;
        }
        let Some(empty) = self.find_empty(index) else {
            return false;
        };

        // SAFETY: `index <= empty < slots`; `src` is valid per the caller.
        unsafe {
            self.shift_up(index, empty);
            core::ptr::copy_nonoverlapping(src, self.node_ptr(index), 1);
            self.set_info(index, expected as u8);
        }
        if expected == info::MAX as usize {
            self.max_pop = 0;
        }
        self.populated += 1;

        true
    }

    /// Removes the node at `index`, shifting displaced successors back.
    ///
    /// # Safety
    ///
    /// The slot at `index` must be occupied.
    unsafe fn erase_index(&mut self, index: usize) -> P::Node {
        // SAFETY: Caller guarantees `index` is occupied. The sentinel stops
        // the shift, so `hole < self.slots`.
        unsafe {
            debug_assert!(info::is_occupied(self.info(index)));
            let node = self.node_ptr(index).read();

            let mut hole = index;
            loop {
                let next = self.info(hole + 1);
                if next <= info::IDEAL {
                    break;
                }
                self.set_info(hole, next - 1);
                hole += 1;
            }

            core::ptr::copy(self.node_ptr(index + 1), self.node_ptr(index), hole - index);
            self.set_info(hole, info::EMPTY);
            self.populated -= 1;

            node
        }
    }

    /// Gets the entry for the value matching `eq`, growing the table first if
    /// the value is absent and the table is full.
    ///
    /// `hasher` must return the hash each stored value was inserted with.
    ///
    /// # Panics
    ///
    /// Panics if the table has to grow and the new size overflows, or if
    /// growing cannot resolve a probe distance overflow (see
    /// [`TryReserveError::ProbeOverflow`]).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::Entry;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// for n in 0..100u64 {
    ///     match table.entry(hash_int(n), |&v: &u64| v == n, |&v| hash_int(v)) {
    ///         Entry::Vacant(entry) => {
    ///             entry.insert(n);
    ///         }
    ///         Entry::Occupied(_) => unreachable!(),
    ///     }
    /// }
    /// assert_eq!(table.len(), 100);
    /// ```
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl FnMut(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Entry<'_, V, P, LF> {
        infallible(self.entry_impl(hash, eq, &hasher, Fallibility::Infallible))
    }

    /// Like [`entry`](Self::entry), but returns an error instead of panicking
    /// if the table cannot grow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::TryReserveError;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// // Every value lands in the same bucket.
    /// let mut table: HashTable<u64> = HashTable::new();
    /// let mut result = Ok(());
    /// for n in 0..1000u64 {
    ///     match table.try_entry(0, |&v: &u64| v == n, |_| 0) {
    ///         Ok(entry) => {
    ///             entry.or_insert(n);
    ///         }
    ///         Err(err) => {
    ///             result = Err(err);
    ///             break;
    ///         }
    ///     }
    /// }
    /// assert_eq!(result, Err(TryReserveError::ProbeOverflow));
    /// assert_eq!(table.len(), 255);
    /// ```
    pub fn try_entry(
        &mut self,
        hash: u64,
        eq: impl FnMut(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<Entry<'_, V, P, LF>, TryReserveError> {
        self.entry_impl(hash, eq, &hasher, Fallibility::Fallible)
    }

    fn entry_impl(
        &mut self,
        hash: u64,
        mut eq: impl FnMut(&V) -> bool,
        hasher: &impl Fn(&V) -> u64,
        fallibility: Fallibility,
    ) -> Result<Entry<'_, V, P, LF>, TryReserveError> {
        loop {
            match self.probe(hash, &mut eq) {
                Probe::Found(index) => {
                    return Ok(Entry::Occupied(OccupiedEntry { table: self, index }));
                }
                Probe::Vacant { index, info, empty } => {
                    return Ok(Entry::Vacant(VacantEntry {
                        table: self,
                        index,
                        info,
                        empty,
                    }));
                }
                Probe::Full => self.grow(hasher, fallibility)?,
            }
        }
    }

    /// Removes and returns the value matching `eq`.
    ///
    /// Elements displaced past the removed one move back by one slot, so no
    /// tombstone is left behind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.entry(hash_int(1), |&n: &u64| n == 1, |&n| hash_int(n)).or_insert(1);
    ///
    /// assert_eq!(table.remove(hash_int(1), |&n| n == 1), Some(1));
    /// assert_eq!(table.remove(hash_int(1), |&n| n == 1), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl FnMut(&V) -> bool) -> Option<V> {
        let index = self.find_index(hash, eq)?;
        // SAFETY: `find_index` only returns occupied slots.
        let node = unsafe { self.erase_index(index) };
        Some(P::destroy(&mut self.pool, node))
    }

    #[cold]
    #[inline(never)]
    fn grow(
        &mut self,
        hasher: &impl Fn(&V) -> u64,
        fallibility: Fallibility,
    ) -> Result<(), TryReserveError> {
        if self.buckets == 0 {
            return self.rebuild(MIN_BUCKETS, hasher, fallibility);
        }

        // Growing only helps if the table is close to its load limit. Far
        // below it, running out of probe distance means the hash function
        // piles keys into the same buckets and doubling would not stop.
        if self.populated.saturating_mul(2) < max_elements_allowed(self.buckets, LF) {
            return Err(fallibility.probe_overflow());
        }

        let buckets = self
            .buckets
            .checked_mul(2)
            .ok_or_else(|| fallibility.capacity_overflow())?;
        self.rebuild(buckets, hasher, fallibility)
    }

    /// Moves every element into a fresh allocation of `buckets` buckets.
    ///
    /// On error the table is unchanged.
    fn rebuild(
        &mut self,
        buckets: usize,
        hasher: &impl Fn(&V) -> u64,
        fallibility: Fallibility,
    ) -> Result<(), TryReserveError> {
        // Nodes are copied bitwise, so until the swap below both tables
        // describe the same nodes. `new_table` must not drop them.
        let mut new_table = ManuallyDrop::new(Self::allocate_buckets(buckets, fallibility)?);

        if self.populated > 0 {
            // SAFETY: Only occupied slots are read. The new allocation is
            // distinct from the old one.
            unsafe {
                for index in 0..self.slots {
                    if !info::is_occupied(self.info(index)) {
                        continue;
                    }

                    let hash = hasher(P::get(&*self.node_ptr(index)));
                    if !new_table.insert_unique_node(hash, self.node_ptr(index)) {
                        new_table.populated = 0;
                        drop(ManuallyDrop::into_inner(new_table));
                        return Err(fallibility.probe_overflow());
                    }
                }
            }
        }

        let mut new_table = ManuallyDrop::into_inner(new_table);
        debug_assert_eq!(new_table.populated, self.populated);
        core::mem::swap(&mut new_table.pool, &mut self.pool);

        let mut old_table = core::mem::replace(self, new_table);
        old_table.populated = 0;
        // SAFETY: The old table owns no nodes any more, and its allocation
        // is forgotten below once the pool takes it.
        if old_table.layout.layout.size() != 0
            && unsafe { P::adopt(&mut self.pool, old_table.alloc, old_table.layout.layout) }
        {
            old_table.layout = DataLayout::UNALLOCATED;
        }
        drop(old_table);

        Ok(())
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// Never shrinks the table.
    ///
    /// # Panics
    ///
    /// Panics if the new size overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.reserve(819, |&n| hash_int(n));
    /// assert_eq!(table.bucket_count(), 1024);
    /// table.reserve(820, |&n| hash_int(n));
    /// assert_eq!(table.bucket_count(), 2048);
    /// ```
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(&V) -> u64) {
        infallible(self.reserve_impl(additional, &hasher, Fallibility::Infallible))
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::TryReserveError;
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// assert_eq!(
    ///     table.try_reserve(usize::MAX - 2, |&n| hash_int(n)),
    ///     Err(TryReserveError::CapacityOverflow)
    /// );
    /// ```
    pub fn try_reserve(
        &mut self,
        additional: usize,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<(), TryReserveError> {
        self.reserve_impl(additional, &hasher, Fallibility::Fallible)
    }

    fn reserve_impl(
        &mut self,
        additional: usize,
        hasher: &impl Fn(&V) -> u64,
        fallibility: Fallibility,
    ) -> Result<(), TryReserveError> {
        let required = self
            .populated
            .checked_add(additional)
            .ok_or_else(|| fallibility.capacity_overflow())?;
        if required <= self.capacity() {
            return Ok(());
        }

        let buckets = Self::buckets_for(required).ok_or_else(|| fallibility.capacity_overflow())?;
        if buckets > self.buckets {
            self.rebuild(buckets, hasher, fallibility)
        } else {
            Ok(())
        }
    }

    /// Rebuilds the table with the smallest size that holds
    /// `max(count, len)` elements, shrinking it if possible.
    ///
    /// # Panics
    ///
    /// Panics if the new size overflows `usize`, or if the elements do not
    /// fit in the new size because of a probe distance overflow.
    pub fn rehash(&mut self, count: usize, hasher: impl Fn(&V) -> u64) {
        infallible(self.rehash_impl(count, &hasher, Fallibility::Infallible))
    }

    /// Like [`rehash`](Self::rehash), but returns an error instead of
    /// panicking. The table is unchanged on error.
    pub fn try_rehash(
        &mut self,
        count: usize,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<(), TryReserveError> {
        self.rehash_impl(count, &hasher, Fallibility::Fallible)
    }

    fn rehash_impl(
        &mut self,
        count: usize,
        hasher: &impl Fn(&V) -> u64,
        fallibility: Fallibility,
    ) -> Result<(), TryReserveError> {
        let required = count.max(self.populated);
        if required == 0 && self.buckets == 0 {
            return Ok(());
        }

        let buckets = Self::buckets_for(required).ok_or_else(|| fallibility.capacity_overflow())?;
        self.rebuild(buckets, hasher, fallibility)
    }

    /// Shrinks the table to the smallest size that holds its elements.
    ///
    /// An allocated table keeps at least 8 buckets. If the elements do not
    /// fit in the smaller table, or the allocation fails, the table keeps its
    /// current allocation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::with_capacity(1000);
    /// table.entry(hash_int(1), |&n| n == 1, |&n| hash_int(n)).or_insert(1);
    ///
    /// table.shrink_to_fit(|&n| hash_int(n));
    /// assert_eq!(table.bucket_count(), 8);
    /// assert_eq!(table.find(hash_int(1), |&n| n == 1), Some(&1));
    /// ```
    pub fn shrink_to_fit(&mut self, hasher: impl Fn(&V) -> u64) {
        if self.buckets == 0 {
            return;
        }

        if let Some(buckets) = Self::buckets_for(self.populated)
            && buckets < self.buckets
        {
            // A failed rebuild leaves the current allocation in place.
            let _ = self.rebuild(buckets, &hasher, Fallibility::Fallible);
        }
    }

    /// Removes all elements, keeping the allocation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.entry(hash_int(1), |&n: &u64| n == 1, |&n| hash_int(n)).or_insert(1);
    /// let buckets = table.bucket_count();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.bucket_count(), buckets);
    /// ```
    pub fn clear(&mut self) {
        if self.slots == 0 {
            return;
        }

        if self.populated > 0 {
            // SAFETY: Only occupied slots are read, and each one is marked
            // empty before its node is destroyed.
            unsafe {
                if P::VISIT_ON_CLEAR {
                    for index in 0..self.slots {
                        if info::is_occupied(self.info(index)) {
                            self.set_info(index, info::EMPTY);
                            self.populated -= 1;
                            let node = self.node_ptr(index).read();
                            drop(P::destroy(&mut self.pool, node));
                        }
                    }
                } else {
                    core::ptr::write_bytes(self.infos_ptr(), info::EMPTY, self.slots);
                }
            }
        }

        self.populated = 0;
        self.max_pop = self.capacity();
    }

    /// Retains only the values for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// for n in 0..10u64 {
    ///     table.entry(hash_int(n), |&v| v == n, |&v| hash_int(v)).or_insert(n);
    /// }
    ///
    /// table.retain(|n| *n % 2 == 0);
    /// assert_eq!(table.len(), 5);
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&mut V) -> bool) {
        let mut index = 0;
        while index < self.slots && self.populated > 0 {
            // SAFETY: `index < self.slots`; nodes are only touched in occupied
            // slots.
            unsafe {
                if info::is_occupied(self.info(index))
                    && !f(P::get_mut(&mut *self.node_ptr(index)))
                {
                    let node = self.erase_index(index);
                    drop(P::destroy(&mut self.pool, node));
                    // A displaced successor may have moved into `index`.
                    continue;
                }
            }
            index += 1;
        }
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are yielded in slot order, which changes whenever the table
    /// grows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// for n in 0..10u64 {
    ///     table.entry(hash_int(n), |&v| v == n, |&v| hash_int(v)).or_insert(n);
    /// }
    ///
    /// assert_eq!(table.iter().sum::<u64>(), 45);
    /// ```
    pub fn iter(&self) -> Iter<'_, V, P> {
        Iter {
            nodes: self.alloc.as_ptr().cast(),
            infos: self.infos_ptr(),
            index: 0,
            remaining: self.populated,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over mutable references to all values.
    pub fn iter_mut(&mut self) -> IterMut<'_, V, P> {
        IterMut {
            nodes: self.alloc.as_ptr().cast(),
            infos: self.infos_ptr(),
            index: 0,
            remaining: self.populated,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// The allocation is kept. Values not consumed are dropped when the
    /// iterator is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.entry(hash_int(1), |&n: &u64| n == 1, |&n| hash_int(n)).or_insert(1);
    ///
    /// let values: Vec<u64> = table.drain().collect();
    /// assert_eq!(values, vec![1]);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V, P, LF> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Removes the first occupied node at or after `*index`.
    ///
    /// No backward shift happens; the caller keeps removing until the table
    /// is empty.
    fn take_next(&mut self, index: &mut usize) -> Option<V> {
        if self.populated == 0 {
            return None;
        }

        // SAFETY: With `populated > 0` an occupied slot exists at or after
        // `*index`, because every slot before it was emptied by earlier
        // calls. The sentinel bounds the scan either way.
        unsafe {
            while self.info(*index) == info::EMPTY {
                *index += 1;
            }
            debug_assert!(*index < self.slots);

            self.set_info(*index, info::EMPTY);
            self.populated -= 1;
            let node = self.node_ptr(*index).read();
            *index += 1;

            if self.populated == 0 {
                self.max_pop = self.capacity();
            }

            Some(P::destroy(&mut self.pool, node))
        }
    }

    /// Returns a cursor positioned on the first value in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// for n in 0..10u64 {
    ///     table.entry(hash_int(n), |&v| v == n, |&v| hash_int(v)).or_insert(n);
    /// }
    ///
    /// let mut cursor = table.cursor_mut();
    /// while let Some(&mut n) = cursor.get_mut() {
    ///     if n % 3 == 0 {
    ///         cursor.remove();
    ///     } else {
    ///         cursor.move_next();
    ///     }
    /// }
    /// assert_eq!(table.len(), 6);
    /// ```
    pub fn cursor_mut(&mut self) -> CursorMut<'_, V, P, LF> {
        let mut cursor = CursorMut {
            table: self,
            index: 0,
        };
        cursor.settle();
        cursor
    }

    /// Returns a cursor positioned on the value matching `eq`, or at the end
    /// if there is none.
    pub fn find_cursor_mut(
        &mut self,
        hash: u64,
        eq: impl FnMut(&V) -> bool,
    ) -> CursorMut<'_, V, P, LF> {
        let index = self.find_index(hash, eq).unwrap_or(self.slots);
        CursorMut { table: self, index }
    }

    /// Computes a histogram of probe distances for the current table state.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = alloc::vec![0usize; info::MAX as usize];

        // SAFETY: Only metadata bytes of existing slots are read.
        unsafe {
            for index in 0..self.slots {
                let info = self.info(index);
                if info::is_occupied(info) {
                    counts[info::distance(info)] += 1;
                }
            }
        }

        let used = counts
            .iter()
            .rposition(|&count| count != 0)
            .map_or(0, |d| d + 1);
        counts.truncate(used);

        ProbeHistogram { counts }
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let total_distance: usize = histogram
            .counts
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();
        let (pool_blocks, pool_available) = P::pool_blocks(&self.pool);

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            buckets: self.buckets,
            slots: self.slots,
            max_distance: histogram.max_distance().unwrap_or(0),
            mean_distance: if self.populated == 0 {
                0.0
            } else {
                total_distance as f64 / self.populated as f64
            },
            load_factor: self.load_factor() as f64,
            total_bytes: self.layout.layout.size(),
            pool_blocks,
            pool_available,
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V, P: Storage<V> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    /// A vacant entry - the value is not present in the table
    Vacant(VacantEntry<'a, V, P, LF>),
    /// An occupied entry - the value is present in the table
    Occupied(OccupiedEntry<'a, V, P, LF>),
}

impl<'a, V, P: Storage<V>, const LF: usize> Entry<'a, V, P, LF> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    ///
    /// The closure is not called for an occupied entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry's value. Returns `None` for a vacant
    /// entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hood_map::hash::hash_int;
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<(u64, u64)> = HashTable::new();
    /// let hash = hash_int(42);
    ///
    /// let result = table
    ///     .entry(hash, |v| v.0 == 42, |v| hash_int(v.0))
    ///     .and_modify(|v| v.1 += 1);
    /// assert_eq!(result, None);
    ///
    /// table.entry(hash, |v| v.0 == 42, |v| hash_int(v.0)).or_insert((42, 0));
    /// let result = table
    ///     .entry(hash, |v| v.0 == 42, |v| hash_int(v.0))
    ///     .and_modify(|v| v.1 += 1);
    /// assert_eq!(result, Some(&mut (42, 1)));
    /// ```
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// The table already has room for one more value; inserting never grows it.
pub struct VacantEntry<'a, V, P: Storage<V> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    table: &'a mut HashTable<V, P, LF>,
    index: usize,
    info: u8,
    empty: usize,
}

impl<'a, V, P: Storage<V>, const LF: usize> VacantEntry<'a, V, P, LF> {
    /// Inserts a value into the vacant entry and returns a mutable reference
    /// to it.
    ///
    /// Values closer to their ideal bucket than the new one are moved one
    /// slot further along.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let node = P::construct(&mut table.pool, value);

        // SAFETY: `probe` found `index <= empty < slots` with `empty` free,
        // and `info` is the new value's metadata at `index`.
        unsafe {
            table.shift_up(self.index, self.empty);
            table.node_ptr(self.index).write(node);
            table.set_info(self.index, self.info);
            if self.info == info::MAX {
                table.max_pop = 0;
            }
            table.populated += 1;

            P::get_mut(&mut *table.node_ptr(self.index))
        }
    }
}

/// A view into an occupied entry in the hash table.
pub struct OccupiedEntry<'a, V, P: Storage<V> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR>
{
    table: &'a mut HashTable<V, P, LF>,
    index: usize,
}

impl<'a, V, P: Storage<V>, const LF: usize> OccupiedEntry<'a, V, P, LF> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        // SAFETY: The entry's slot is occupied.
        unsafe { P::get(&*self.table.node_ptr(self.index)) }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        // SAFETY: The entry's slot is occupied.
        unsafe { P::get_mut(&mut *self.table.node_ptr(self.index)) }
    }

    /// Converts the entry into a mutable reference to the value with the
    /// lifetime of the table borrow.
    pub fn into_mut(self) -> &'a mut V {
        // SAFETY: The entry's slot is occupied.
        unsafe { P::get_mut(&mut *self.table.node_ptr(self.index)) }
    }

    /// Replaces the value in the entry, returning the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the table and returns the value.
    pub fn remove(self) -> V {
        // SAFETY: The entry's slot is occupied.
        let node = unsafe { self.table.erase_index(self.index) };
        P::destroy(&mut self.table.pool, node)
    }
}

/// A cursor over the values of a [`HashTable`] that can remove the value it
/// points at.
///
/// Removing through the cursor keeps it valid: it then points at the next
/// value in slot order, which may be a displaced value that moved into the
/// vacated slot.
pub struct CursorMut<'a, V, P: Storage<V> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    table: &'a mut HashTable<V, P, LF>,
    index: usize,
}

impl<'a, V, P: Storage<V>, const LF: usize> CursorMut<'a, V, P, LF> {
    /// Advances to the next occupied slot, or to the end.
    fn settle(&mut self) {
        if self.table.slots == 0 {
            return;
        }
        // SAFETY: `index <= slots` and the sentinel is occupied, so the scan
        // stops at the end at the latest.
        unsafe {
            while self.table.info(self.index) == info::EMPTY {
                self.index += 1;
            }
        }
    }

    /// Returns `true` if the cursor is past the last value.
    pub fn is_end(&self) -> bool {
        self.index >= self.table.slots
    }

    /// Returns the value under the cursor.
    pub fn get(&self) -> Option<&V> {
        if self.is_end() {
            return None;
        }
        // SAFETY: A settled cursor that is not at the end is on an occupied
        // slot.
        unsafe { Some(P::get(&*self.table.node_ptr(self.index))) }
    }

    /// Returns the value under the cursor mutably.
    pub fn get_mut(&mut self) -> Option<&mut V> {
        if self.is_end() {
            return None;
        }
        // SAFETY: A settled cursor that is not at the end is on an occupied
        // slot.
        unsafe { Some(P::get_mut(&mut *self.table.node_ptr(self.index))) }
    }

    /// Moves the cursor to the next value.
    pub fn move_next(&mut self) {
        if !self.is_end() {
            self.index += 1;
            self.settle();
        }
    }

    /// Removes the value under the cursor and moves to the next value.
    pub fn remove(&mut self) -> Option<V> {
        if self.is_end() {
            return None;
        }
        // SAFETY: The cursor is on an occupied slot.
        let node = unsafe { self.table.erase_index(self.index) };
        let value = P::destroy(&mut self.table.pool, node);
        self.settle();
        Some(value)
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`]. It yields
/// `&V` references in slot order.
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V, P: Storage<V> = Inline> {
    nodes: *const P::Node,
    infos: *const u8,
    index: usize,
    remaining: usize,
    _marker: PhantomData<(&'a V, &'a P::Node)>,
}

// SAFETY: The iterator only hands out shared references.
unsafe impl<V: Sync, P: Storage<V>> Send for Iter<'_, V, P> {}
// SAFETY: The iterator only hands out shared references.
unsafe impl<V: Sync, P: Storage<V>> Sync for Iter<'_, V, P> {}

impl<V, P: Storage<V>> Clone for Iter<'_, V, P> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            infos: self.infos,
            index: self.index,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, V, P: Storage<V>> Iterator for Iter<'a, V, P> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: `remaining > 0` means an occupied slot lies ahead, and the
        // sentinel would stop the scan regardless.
        unsafe {
            while *self.infos.add(self.index) == info::EMPTY {
                self.index += 1;
            }
            let node = &*self.nodes.add(self.index);
            self.index += 1;
            self.remaining -= 1;
            Some(P::get(node))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V, P: Storage<V>> ExactSizeIterator for Iter<'_, V, P> {}
impl<V, P: Storage<V>> FusedIterator for Iter<'_, V, P> {}

/// A mutable iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, V, P: Storage<V> = Inline> {
    nodes: *mut P::Node,
    infos: *const u8,
    index: usize,
    remaining: usize,
    _marker: PhantomData<(&'a mut V, &'a mut P::Node)>,
}

// SAFETY: The iterator hands out unique references to distinct values.
unsafe impl<V: Send, P: Storage<V>> Send for IterMut<'_, V, P> {}
// SAFETY: Shared access to the iterator exposes nothing.
unsafe impl<V: Sync, P: Storage<V>> Sync for IterMut<'_, V, P> {}

impl<'a, V, P: Storage<V>> Iterator for IterMut<'a, V, P> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: Same scan as `Iter`; each slot is yielded at most once, so
        // the mutable references never alias.
        unsafe {
            while *self.infos.add(self.index) == info::EMPTY {
                self.index += 1;
            }
            let node = &mut *self.nodes.add(self.index);
            self.index += 1;
            self.remaining -= 1;
            Some(P::get_mut(node))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V, P: Storage<V>> ExactSizeIterator for IterMut<'_, V, P> {}
impl<V, P: Storage<V>> FusedIterator for IterMut<'_, V, P> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V, P: Storage<V> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    table: &'a mut HashTable<V, P, LF>,
    index: usize,
}

impl<V, P: Storage<V>, const LF: usize> Iterator for Drain<'_, V, P, LF> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.table.take_next(&mut self.index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V, P: Storage<V>, const LF: usize> ExactSizeIterator for Drain<'_, V, P, LF> {}
impl<V, P: Storage<V>, const LF: usize> FusedIterator for Drain<'_, V, P, LF> {}

impl<V, P: Storage<V>, const LF: usize> Drop for Drain<'_, V, P, LF> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V, P: Storage<V> = Inline, const LF: usize = DEFAULT_MAX_LOAD_FACTOR> {
    table: HashTable<V, P, LF>,
    index: usize,
}

impl<V, P: Storage<V>, const LF: usize> Iterator for IntoIter<V, P, LF> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.table.take_next(&mut self.index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V, P: Storage<V>, const LF: usize> ExactSizeIterator for IntoIter<V, P, LF> {}
impl<V, P: Storage<V>, const LF: usize> FusedIterator for IntoIter<V, P, LF> {}

impl<V, P: Storage<V>, const LF: usize> IntoIterator for HashTable<V, P, LF> {
    type Item = V;
    type IntoIter = IntoIter<V, P, LF>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            table: self,
            index: 0,
        }
    }
}

impl<'a, V, P: Storage<V>, const LF: usize> IntoIterator for &'a HashTable<V, P, LF> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V, P: Storage<V>, const LF: usize> IntoIterator for &'a mut HashTable<V, P, LF> {
    type Item = &'a mut V;
    type IntoIter = IterMut<'a, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
