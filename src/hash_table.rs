//! The raw chained hash table shared by every container in this crate.
//!
//! Layout: a bucket array of slot indices, one per bucket, and a slot array
//! holding `(hash, next, value)` for every stored element. Elements sharing a
//! bucket are chained through `next`; vacated slots are chained through the
//! same field into a free list. Both arrays are sized to the same prime.
//!
//! Slot indices are stable between mutations and, as long as only
//! [`HashTable::insert_unique`], [`HashTable::shift_insert`],
//! [`HashTable::shift_remove_index`] and [`HashTable::retain_ordered`] are
//! used, they are also the insertion order: the slot array is dense and its
//! index order is the enumeration order.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem;

use crate::capacity;
use crate::error::Error;
use crate::version::Version;

/// Link sentinel: an empty bucket, the end of a chain, or the end of the free
/// list.
const EMPTY: usize = usize::MAX;

#[derive(Clone)]
enum Slot<V> {
    Occupied { hash: u64, next: usize, value: V },
    Free { next: usize },
}

impl<V> Slot<V> {
    #[inline(always)]
    fn next(&self) -> usize {
        match self {
            Slot::Occupied { next, .. } | Slot::Free { next } => *next,
        }
    }

    #[inline(always)]
    fn next_mut(&mut self) -> &mut usize {
        match self {
            Slot::Occupied { next, .. } | Slot::Free { next } => next,
        }
    }

    #[inline(always)]
    fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    #[inline(always)]
    fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Free { .. } => None,
        }
    }

    #[inline(always)]
    fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Free { .. } => None,
        }
    }

    #[inline(always)]
    fn into_value(self) -> Option<V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Free { .. } => None,
        }
    }
}

/// Debug statistics for hash table analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live elements.
    pub len: usize,
    /// Number of buckets (equal to the slot capacity).
    pub capacity: usize,
    /// Slots that are live or on the free list.
    pub slots_in_use: usize,
    /// Slots on the free list.
    pub free_slots: usize,
    /// Buckets with no chain.
    pub empty_buckets: usize,
    /// Length of the longest bucket chain.
    pub longest_chain: usize,
    /// Load factor (len / capacity).
    pub load_factor: f64,
    /// Bytes held by the bucket and slot arrays.
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.len,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} in use, {} on the free list",
            self.slots_in_use, self.free_slots
        );
        println!(
            "Buckets: {} empty, longest chain {}",
            self.empty_buckets, self.longest_chain
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// A chained hash table with prime bucket counts and free-list slot reuse.
///
/// `HashTable<V>` stores values of type `V`. Like the containers built on
/// it, it does not hash anything itself: every operation takes the hash of
/// the value of interest and an equality predicate.
///
/// ## Performance Characteristics
///
/// - **Memory**: one `usize` per bucket plus, per slot, the value, a `u64`
///   hash and a `usize` link.
/// - Lookups walk a single bucket chain. Plain removal is O(1) beyond the
///   chain walk; positional removal and insertion are O(n).
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use prime_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_capacity(100);
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     prime_hash::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     prime_hash::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Box<[usize]>,
    slots: Vec<Slot<V>>,
    free_head: usize,
    free_count: usize,
    version: Version,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("free", &self.free_count)
            .field(
                "buckets",
                &self
                    .buckets
                    .iter()
                    .map(|&head| {
                        if head == EMPTY {
                            "..".to_string()
                        } else {
                            format!("{head}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|slot| {
                        let next = match slot.next() {
                            EMPTY => String::from("end"),
                            next => format!("{next}"),
                        };
                        match slot {
                            Slot::Occupied { hash, .. } => format!("{hash:016x}->{next}"),
                            Slot::Free { .. } => format!("free->{next}"),
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table. Nothing is allocated until the first insert.
    pub fn new() -> Self {
        Self {
            buckets: Box::new([]),
            slots: Vec::new(),
            free_head: EMPTY,
            free_count: 0,
            version: Version::default(),
        }
    }

    /// Creates a new hash table with room for at least `capacity` elements.
    ///
    /// The actual capacity is the smallest table prime that fits.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds
    /// [`MAX_PRIME_CAPACITY`](crate::capacity::MAX_PRIME_CAPACITY).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use prime_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 107);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(table) => table,
            Err(_) => panic!("capacity overflow"),
        }
    }

    /// Fallible form of [`with_capacity`](Self::with_capacity).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if `capacity` is too large.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut table = Self::new();
        if capacity > 0 {
            table.resize(capacity::next_prime(capacity)?);
        }
        Ok(table)
    }

    /// Returns the number of elements in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use prime_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.len(), 0);
    ///
    /// table.entry(hash_u64(1), |&n: &u64| n == 1).or_insert(1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_count
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the table can hold before it grows.
    ///
    /// This is also the number of buckets, and is always zero or prime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the current structural version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the number of slots that are live or on the free list.
    ///
    /// Removing elements from an unordered table does not shrink this; the
    /// vacated slots are reused by later inserts.
    pub fn slots_in_use(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn bucket_of(&self, hash: u64) -> usize {
        debug_assert!(!self.buckets.is_empty());
        (hash % self.buckets.len() as u64) as usize
    }

    /// Returns the slot index of the value matching `hash` and `eq`.
    ///
    /// For tables only mutated through the positional operations, this is
    /// the value's position in insertion order.
    pub fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }

        let mut index = self.buckets[self.bucket_of(hash)];
        while index != EMPTY {
            match &self.slots[index] {
                Slot::Occupied {
                    hash: stored,
                    next,
                    value,
                } => {
                    if *stored == hash && eq(value) {
                        return Some(index);
                    }
                    index = *next;
                }
                Slot::Free { .. } => {
                    debug_assert!(false, "free slot {index} linked into a bucket chain");
                    return None;
                }
            }
        }

        None
    }

    /// Finds a value in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use prime_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table.entry(hash_u64(42), |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.find(hash_u64(42), |&n| n == 42), Some(&42));
    /// assert_eq!(table.find(hash_u64(7), |&n| n == 7), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].value()
    }

    /// Finds a value in the table and returns a mutable reference to it.
    ///
    /// The caller must not change the value in a way that changes its hash.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].value_mut()
    }

    /// Returns the value stored in slot `index`, if that slot is live.
    pub fn get(&self, index: usize) -> Option<&V> {
        self.slots.get(index)?.value()
    }

    /// Returns the value stored in slot `index` mutably, if that slot is
    /// live.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut V> {
        self.slots.get_mut(index)?.value_mut()
    }

    fn value_at_mut(&mut self, index: usize) -> &mut V {
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => value,
            Slot::Free { .. } => unreachable!("slot {index} is not occupied"),
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use prime_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_str("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello") {
    ///     prime_hash::hash_table::Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     prime_hash::hash_table::Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.find_index(hash, eq) {
            Some(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Inserts `value`, which must not compare equal to any stored value.
    ///
    /// A slot from the free list is reused if there is one; otherwise the
    /// value is appended, growing the table first if it is full. Returns the
    /// slot index.
    ///
    /// # Panics
    ///
    /// Panics if the table would have to grow past
    /// [`MAX_PRIME_CAPACITY`](crate::capacity::MAX_PRIME_CAPACITY).
    pub fn insert_unique(&mut self, hash: u64, value: V) -> usize {
        let index = if self.free_count > 0 {
            let index = self.free_head;
            self.free_head = self.slots[index].next();
            self.free_count -= 1;
            index
        } else {
            if self.slots.len() == self.buckets.len() {
                self.grow();
            }
            self.slots.len()
        };

        let bucket = self.bucket_of(hash);
        let slot = Slot::Occupied {
            hash,
            next: self.buckets[bucket],
            value,
        };
        if index == self.slots.len() {
            self.slots.push(slot);
        } else {
            self.slots[index] = slot;
        }
        self.buckets[bucket] = index;

        self.version.bump();
        index
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self) {
        match capacity::growth_target(self.buckets.len()) {
            Ok(target) => self.resize(target),
            Err(_) => panic!("capacity overflow"),
        }
    }

    /// Reallocates the bucket array to `size` buckets and makes room for
    /// `size` slots, rethreading every chain.
    fn resize(&mut self, size: usize) {
        debug_assert!(size >= self.slots.len());
        self.slots.reserve_exact(size - self.slots.len());
        self.buckets = vec![EMPTY; size].into_boxed_slice();
        self.rethread();
    }

    /// Rebuilds every bucket chain from the cached hashes.
    fn rethread(&mut self) {
        self.buckets.fill(EMPTY);
        if self.buckets.is_empty() {
            return;
        }

        let bucket_count = self.buckets.len() as u64;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Slot::Occupied { hash, next, .. } = slot {
                let bucket = (*hash % bucket_count) as usize;
                *next = self.buckets[bucket];
                self.buckets[bucket] = index;
            }
        }
    }

    /// Detaches slot `index` from its bucket chain. Array order and the
    /// slot's contents are untouched.
    fn unlink(&mut self, index: usize) {
        let (hash, next) = match &self.slots[index] {
            Slot::Occupied { hash, next, .. } => (*hash, *next),
            Slot::Free { .. } => return,
        };

        let bucket = self.bucket_of(hash);
        if self.buckets[bucket] == index {
            self.buckets[bucket] = next;
            return;
        }

        let mut cursor = self.buckets[bucket];
        while cursor != EMPTY {
            let link = self.slots[cursor].next_mut();
            if *link == index {
                *link = next;
                return;
            }
            cursor = *link;
        }

        debug_assert!(false, "slot {index} missing from bucket {bucket}");
    }

    /// Removes and returns a value from the table, releasing its slot to the
    /// free list.
    ///
    /// Other values keep their slot indices.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use prime_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table.entry(hash_u64(42), |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(hash_u64(42), |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(hash_u64(99), |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = self.find_index(hash, eq)?;
        self.remove_index(index)
    }

    /// Removes the value in slot `index`, releasing the slot to the free
    /// list. Returns `None` if the slot is not live.
    pub fn remove_index(&mut self, index: usize) -> Option<V> {
        if !self.slots.get(index)?.is_occupied() {
            return None;
        }

        self.unlink(index);
        let slot = mem::replace(
            &mut self.slots[index],
            Slot::Free {
                next: self.free_head,
            },
        );
        self.free_head = index;
        self.free_count += 1;

        self.version.bump();
        slot.into_value()
    }

    /// Removes the value matching `hash` and `eq` by shifting every later
    /// slot down by one. Returns the removed value and its former index.
    pub fn shift_remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, V)> {
        let index = self.find_index(hash, eq)?;
        self.shift_remove_index(index).map(|value| (index, value))
    }

    /// Removes the value in slot `index` by shifting every later slot down by
    /// one, so the remaining slots stay dense and keep their relative order.
    ///
    /// This is O(n): every bucket head and chain link above `index` is
    /// renumbered.
    pub fn shift_remove_index(&mut self, index: usize) -> Option<V> {
        if !self.slots.get(index)?.is_occupied() {
            return None;
        }

        self.unlink(index);
        let slot = self.slots.remove(index);
        self.renumber_links(|link| if link > index { link - 1 } else { link });

        self.version.bump();
        slot.into_value()
    }

    /// Inserts `value`, which must not compare equal to any stored value, at
    /// slot `index`, shifting every slot at or after `index` up by one.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.slots_in_use()`, or if the table would have to
    /// grow past [`MAX_PRIME_CAPACITY`](crate::capacity::MAX_PRIME_CAPACITY).
    pub fn shift_insert(&mut self, index: usize, hash: u64, value: V) {
        assert!(
            index <= self.slots.len(),
            "insertion index {index} out of range for {} slots",
            self.slots.len()
        );

        if self.slots.len() == self.buckets.len() {
            self.grow();
        }

        self.renumber_links(|link| if link >= index { link + 1 } else { link });
        let bucket = self.bucket_of(hash);
        self.slots.insert(
            index,
            Slot::Occupied {
                hash,
                next: self.buckets[bucket],
                value,
            },
        );
        self.buckets[bucket] = index;

        self.version.bump();
    }

    /// Applies `renumber` to every bucket head, chain link and free-list link.
    fn renumber_links(&mut self, renumber: impl Fn(usize) -> usize) {
        for head in self.buckets.iter_mut().filter(|head| **head != EMPTY) {
            *head = renumber(*head);
        }
        for slot in self.slots.iter_mut() {
            let next = slot.next_mut();
            if *next != EMPTY {
                *next = renumber(*next);
            }
        }
        if self.free_head != EMPTY {
            self.free_head = renumber(self.free_head);
        }
    }

    /// Replaces the value in slot `index` with `value`, whose hash may route
    /// it to a different bucket. Returns the old value, or `None` (leaving
    /// the table untouched) if the slot is not live.
    ///
    /// The slot keeps its index: the old chain linkage is removed and the
    /// slot is linked into the bucket for `hash`. `value` must not compare
    /// equal to any other stored value.
    pub fn replace_at(&mut self, index: usize, hash: u64, value: V) -> Option<V> {
        if !self.slots.get(index)?.is_occupied() {
            return None;
        }

        self.unlink(index);
        let bucket = self.bucket_of(hash);
        let old = mem::replace(
            &mut self.slots[index],
            Slot::Occupied {
                hash,
                next: self.buckets[bucket],
                value,
            },
        );
        self.buckets[bucket] = index;

        self.version.bump();
        old.into_value()
    }

    /// Removes all elements from the table, keeping its capacity.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.buckets.fill(EMPTY);
        self.free_head = EMPTY;
        self.free_count = 0;
        self.version.bump();
    }

    /// Removes every value for which `f` returns `false`, releasing their
    /// slots to the free list. Returns the number of removed values.
    pub fn retain(&mut self, mut f: impl FnMut(&mut V) -> bool) -> usize {
        let mut removed = 0;
        for index in 0..self.slots.len() {
            let keep = match self.slots[index].value_mut() {
                Some(value) => f(value),
                None => continue,
            };
            if !keep {
                self.remove_index(index);
                removed += 1;
            }
        }
        removed
    }

    /// Removes every value for which `f` returns `false`, compacting the
    /// remaining values in order. Returns the number of removed values.
    ///
    /// `f` sees every value before anything moves, so a panic in `f` leaves
    /// the table intact.
    pub fn retain_ordered(&mut self, mut f: impl FnMut(&mut V) -> bool) -> usize {
        let keep: Vec<bool> = self
            .slots
            .iter_mut()
            .map(|slot| slot.value_mut().is_some_and(&mut f))
            .collect();

        let before = self.len();
        let slots_before = self.slots.len();
        let mut keep = keep.into_iter();
        self.slots.retain(|_| keep.next().unwrap_or(false));

        if self.slots.len() != slots_before {
            self.free_head = EMPTY;
            self.free_count = 0;
            self.rethread();
            self.version.bump();
        }

        before - self.len()
    }

    /// Grows the table to hold at least `requested` elements and returns the
    /// resulting capacity.
    ///
    /// A request at or below the current capacity changes nothing and
    /// returns the current capacity. The version is bumped either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] (leaving the table untouched) if
    /// `requested` is too large.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use prime_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u32> = HashTable::new();
    /// assert_eq!(table.ensure_capacity(20), Ok(23));
    /// assert_eq!(table.ensure_capacity(20), Ok(23));
    /// assert_eq!(table.ensure_capacity(5), Ok(23));
    /// ```
    pub fn ensure_capacity(&mut self, requested: usize) -> Result<usize, Error> {
        if requested > self.capacity() {
            let size = capacity::next_prime(requested)?;
            self.resize(size);
        }
        self.version.bump();
        Ok(self.capacity())
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the required capacity is too large.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len().saturating_add(additional);
        if required > self.capacity() && self.ensure_capacity(required).is_err() {
            panic!("capacity overflow");
        }
    }

    /// Shrinks the table to the smallest prime capacity that holds both the
    /// live elements and `min_capacity`, compacting away free slots.
    ///
    /// An empty table shrunk to zero releases its storage entirely. The
    /// version is bumped even if the capacity does not change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityBelowLength`] if `min_capacity < self.len()`.
    pub fn shrink_to(&mut self, min_capacity: usize) -> Result<(), Error> {
        let len = self.len();
        if min_capacity < len {
            return Err(Error::CapacityBelowLength {
                requested: min_capacity,
                len,
            });
        }

        if min_capacity == 0 {
            self.buckets = Box::new([]);
            self.slots = Vec::new();
            self.free_head = EMPTY;
            self.free_count = 0;
        } else {
            let size = capacity::next_prime(min_capacity)?;
            if size < self.capacity() {
                self.compact_to(size);
            } else if self.free_count > 0 {
                self.compact_to(self.capacity());
            }
        }

        self.version.bump();
        Ok(())
    }

    /// Shrinks the table as much as possible.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use prime_hash::HashTable;
    ///
    /// let mut table: HashTable<i32> = HashTable::with_capacity(1000);
    /// assert!(table.capacity() >= 1000);
    ///
    /// table.entry(42, |&v| v == 5).or_insert(5);
    /// table.entry(123, |&v| v == 10).or_insert(10);
    ///
    /// table.shrink_to_fit();
    /// assert_eq!(table.capacity(), 3);
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        let len = self.len();
        if len == 0 {
            // Zero is always a valid target.
            let _ = self.shrink_to(0);
            return;
        }

        let size = capacity::next_prime(len).unwrap_or(self.capacity());
        if size < self.capacity() {
            self.compact_to(size);
        } else if self.free_count > 0 {
            self.compact_to(self.capacity());
        }
        self.version.bump();
    }

    /// Moves the live slots, in order, into fresh arrays of `size`.
    fn compact_to(&mut self, size: usize) {
        debug_assert!(size >= self.len());
        let old = mem::replace(&mut self.slots, Vec::with_capacity(size));
        self.slots.extend(old.into_iter().filter(|slot| slot.is_occupied()));
        self.free_head = EMPTY;
        self.free_count = 0;
        self.buckets = vec![EMPTY; size].into_boxed_slice();
        self.rethread();
    }

    /// Returns an iterator over all values in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use prime_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert_unique(7, "a");
    /// table.insert_unique(3, "b");
    ///
    /// assert_eq!(table.iter().copied().collect::<Vec<_>>(), ["a", "b"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len(),
        }
    }

    /// Returns an iterator over mutable references to all values in slot
    /// order.
    ///
    /// The caller must not change any value's hash.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        let remaining = self.len();
        IterMut {
            slots: self.slots.iter_mut(),
            remaining,
        }
    }

    /// Returns an iterator that removes and yields all values in slot order.
    ///
    /// The table is empty as soon as this returns, whether or not the
    /// iterator is consumed.
    pub fn drain(&mut self) -> Drain<'_, V> {
        let remaining = self.len();
        self.buckets.fill(EMPTY);
        self.free_head = EMPTY;
        self.free_count = 0;
        self.version.bump();
        Drain {
            slots: self.slots.drain(..),
            remaining,
        }
    }

    pub(crate) fn next_live(&self, from: usize) -> Option<(usize, &V)> {
        self.slots
            .get(from..)?
            .iter()
            .enumerate()
            .find_map(|(offset, slot)| slot.value().map(|value| (from + offset, value)))
    }

    /// Counts bucket chains by length: entry `i` is the number of buckets
    /// whose chain holds `i` values.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let mut hist = vec![0usize; 1];
        for &head in self.buckets.iter() {
            let mut length = 0;
            let mut index = head;
            while index != EMPTY {
                length += 1;
                index = self.slots[index].next();
            }
            if hist.len() <= length {
                hist.resize(length + 1, 0);
            }
            hist[length] += 1;
        }
        hist
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let hist = self.chain_histogram();
        DebugStats {
            len: self.len(),
            capacity: self.capacity(),
            slots_in_use: self.slots.len(),
            free_slots: self.free_count,
            empty_buckets: if self.buckets.is_empty() { 0 } else { hist[0] },
            longest_chain: hist.len() - 1,
            load_factor: if self.capacity() == 0 {
                0.0
            } else {
                self.len() as f64 / self.capacity() as f64
            },
            total_bytes: self.buckets.len() * core::mem::size_of::<usize>()
                + self.slots.capacity() * core::mem::size_of::<Slot<V>>(),
        }
    }

    /// Pretty-prints the chain-length histogram horizontally using stdout.
    ///
    /// Requires the `std` and `stats` features.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        let hist = self.chain_histogram();
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!(
            "chain histogram ({} entries, {} buckets):",
            self.len(),
            self.capacity()
        );

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let full = units / 8;
            let rem = units % 8;
            let mut bar = "█".repeat(full);
            if rem > 0 {
                let ch = match rem {
                    1 => '▏',
                    2 => '▎',
                    3 => '▍',
                    4 => '▌',
                    5 => '▋',
                    6 => '▊',
                    7 => '▉',
                    _ => unreachable!(),
                };
                bar.push(ch);
            }
            bar
        };

        for (length, &count) in hist.iter().enumerate() {
            println!("{:>2} | {} ({})", length, make_bar(count), count);
        }
    }

    /// Panics if any structural invariant is violated.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(self.slots.len() <= self.buckets.len());
        assert!(self.buckets.is_empty() || capacity::is_prime(self.buckets.len()));

        let mut seen = vec![0u8; self.slots.len()];
        for (bucket, &head) in self.buckets.iter().enumerate() {
            let mut index = head;
            let mut steps = 0;
            while index != EMPTY {
                assert!(index < self.slots.len(), "bucket {bucket} links past the end");
                match &self.slots[index] {
                    Slot::Occupied { hash, next, .. } => {
                        assert_eq!(self.bucket_of(*hash), bucket, "slot {index} misfiled");
                        seen[index] += 1;
                        index = *next;
                    }
                    Slot::Free { .. } => panic!("free slot {index} in bucket {bucket}"),
                }
                steps += 1;
                assert!(steps <= self.slots.len(), "cycle in bucket {bucket}");
            }
        }

        let mut free = 0;
        let mut index = self.free_head;
        while index != EMPTY {
            match &self.slots[index] {
                Slot::Free { next } => {
                    seen[index] += 1;
                    free += 1;
                    index = *next;
                }
                Slot::Occupied { .. } => panic!("live slot {index} on the free list"),
            }
            assert!(free <= self.slots.len(), "cycle in the free list");
        }

        assert_eq!(free, self.free_count);
        for (index, &count) in seen.iter().enumerate() {
            assert_eq!(count, 1, "slot {index} reachable {count} times");
        }
        assert_eq!(
            self.len(),
            self.slots.iter().filter(|slot| slot.is_occupied()).count()
        );
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        let remaining = self.len();
        IntoIter {
            slots: self.slots.into_iter(),
            remaining,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no matching value is present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a matching value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the entry's value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use prime_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// let hash = hash_str("key");
    ///
    /// let value = table
    ///     .entry(hash, |s: &String| s == "key")
    ///     .or_insert("key".to_string());
    /// assert_eq!(value, "key");
    ///
    /// let existing = table
    ///     .entry(hash, |s: &String| s == "key")
    ///     .or_insert("other".to_string());
    /// assert_eq!(existing, "key");
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the entry's value. `default` is not called for
    /// an occupied entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value of an occupied entry and returns it; returns
    /// `None` for a vacant entry without inserting anything.
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
    /// reference to the entry's value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// This struct is created by the [`entry`] method on [`HashTable`] when no
/// stored value matches.
///
/// [`entry`]: HashTable::entry
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant entry and returns a mutable reference
    /// to it.
    pub fn insert(self, value: V) -> &'a mut V {
        self.insert_full(value).1
    }

    /// Inserts a value into the vacant entry and returns its slot index with
    /// a mutable reference to it.
    pub fn insert_full(self, value: V) -> (usize, &'a mut V) {
        let index = self.table.insert_unique(self.hash, value);
        (index, self.table.value_at_mut(index))
    }
}

/// A view into an occupied entry in the hash table.
///
/// This struct is created by the [`entry`] method on [`HashTable`] when a
/// stored value matches.
///
/// [`entry`]: HashTable::entry
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns the slot index of the entry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        match &self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            Slot::Free { .. } => unreachable!("occupied entry on a free slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.value_at_mut(self.index)
    }

    /// Converts the entry into a mutable reference to its value.
    pub fn into_mut(self) -> &'a mut V {
        self.table.value_at_mut(self.index)
    }

    /// Removes the value, releasing its slot to the free list.
    pub fn remove(self) -> V {
        match self.table.remove_index(self.index) {
            Some(value) => value,
            None => unreachable!("occupied entry on a free slot"),
        }
    }

    /// Removes the value by shifting every later slot down by one.
    pub fn shift_remove(self) -> V {
        match self.table.shift_remove_index(self.index) {
            Some(value) => value,
            None => unreachable!("occupied entry on a free slot"),
        }
    }
}

/// An iterator over the values of a [`HashTable`] in slot order.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().find_map(Slot::value)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().rev().find_map(Slot::value)?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the values of a [`HashTable`] in slot order.
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().find_map(Slot::value_mut)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for IterMut<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().rev().find_map(Slot::value_mut)?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> FusedIterator for IterMut<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    slots: vec::Drain<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().find_map(Slot::into_value)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Drain<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().rev().find_map(Slot::into_value)?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
impl<V> FusedIterator for Drain<'_, V> {}

/// A consuming iterator over the values of a [`HashTable`] in slot order.
pub struct IntoIter<V> {
    slots: vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().find_map(Slot::into_value)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().rev().find_map(Slot::into_value)?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(state: &HashState, key: u64) -> u64 {
        let mut h = state.build_hasher();
        h.write_u64(key);
        h.finish()
    }

    fn insert(table: &mut HashTable<Item>, state: &HashState, key: u64) -> usize {
        match table.entry(hash_key(state, key), |v| v.key == key) {
            Entry::Vacant(v) => {
                v.insert_full(Item {
                    key,
                    value: key as i32,
                })
                .0
            }
            Entry::Occupied(_) => panic!("unexpected occupied for {key}"),
        }
    }

    fn contains(table: &HashTable<Item>, state: &HashState, key: u64) -> bool {
        table.find(hash_key(state, key), |v| v.key == key).is_some()
    }

    fn keys(table: &HashTable<Item>) -> Vec<u64> {
        table.iter().map(|item| item.key).collect()
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            match table.entry(hash, |v: &Item| v.key == k) {
                Entry::Vacant(v) => {
                    v.insert(Item {
                        key: k,
                        value: (k as i32) * 2,
                    });
                    assert_eq!(
                        table.find(hash, |v| v.key == k),
                        Some(&Item {
                            key: k,
                            value: (k as i32) * 2
                        }),
                        "{:#?}",
                        table
                    );
                }
                Entry::Occupied(_) => panic!("unexpected occupied on first insert: {:#?}", table),
            }
            table.assert_invariants();
        }
        assert_eq!(table.len(), 32);
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            assert_eq!(
                table.find(hash, |v| v.key == k),
                Some(&Item {
                    key: k,
                    value: (k as i32) * 2
                }),
                "{:#?}",
                table
            );
        }

        let miss_hash = hash_key(&state, 999);
        assert!(table.find(miss_hash, |v| v.key == 999).is_none());
    }

    #[test]
    fn first_insert_allocates_smallest_prime() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        assert_eq!(table.capacity(), 0);
        insert(&mut table, &state, 1);
        assert_eq!(table.capacity(), 3);
        for k in 2..=4 {
            insert(&mut table, &state, k);
        }
        assert_eq!(table.capacity(), 7);
        table.assert_invariants();
    }

    #[test]
    fn duplicate_entry_is_occupied() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        let k = 42u64;
        let hash = hash_key(&state, k);

        match table.entry(hash, |v| v.key == k) {
            Entry::Vacant(v) => {
                v.insert(Item { key: k, value: 7 });
            }
            Entry::Occupied(_) => panic!("should be vacant first time"),
        }

        match table.entry(hash, |v| v.key == k) {
            Entry::Occupied(mut occ) => {
                assert_eq!(occ.get().value, 7);
                *occ.get_mut() = Item { key: k, value: 11 };
            }
            Entry::Vacant(_) => panic!("should be occupied second time"),
        }

        assert_eq!(table.len(), 1);
        assert_eq!(table.find(hash, |v| v.key == k).unwrap().value, 11);
    }

    #[test]
    fn find_mut_and_modify() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in 0..10 {
            insert(&mut table, &state, k);
        }

        for k in 0..10u64 {
            let hash = hash_key(&state, k);
            table.find_mut(hash, |v| v.key == k).unwrap().value += 100;
        }

        for k in 0..10u64 {
            let hash = hash_key(&state, k);
            assert_eq!(
                table.find(hash, |v| v.key == k).unwrap().value,
                k as i32 + 100
            );
        }
    }

    #[test]
    fn remove_items() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in 0..64u64 {
            insert(&mut table, &state, k);
        }

        for k in (0..64u64).step_by(2) {
            let hash = hash_key(&state, k);
            let removed = table.remove(hash, |v| v.key == k);
            assert_eq!(removed.map(|item| item.key), Some(k));
            table.assert_invariants();
        }

        assert_eq!(table.len(), 32);
        for k in 0..64u64 {
            assert_eq!(contains(&table, &state, k), k % 2 == 1);
        }
        assert!(table.remove(hash_key(&state, 0), |v| v.key == 0).is_none());
    }

    #[test]
    fn free_list_reuses_slots() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in 0..20u64 {
            insert(&mut table, &state, k);
        }
        let slots = table.slots_in_use();
        let capacity = table.capacity();

        for k in 5..15u64 {
            table.remove(hash_key(&state, k), |v| v.key == k);
        }
        assert_eq!(table.slots_in_use(), slots);

        for k in 100..110u64 {
            insert(&mut table, &state, k);
            table.assert_invariants();
        }
        assert_eq!(table.slots_in_use(), slots);
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn removed_value_is_dropped_from_slot() {
        let state = HashState::default();
        let mut table: HashTable<(u64, alloc::rc::Rc<()>)> = HashTable::new();
        let marker = alloc::rc::Rc::new(());
        table.insert_unique(hash_key(&state, 1), (1, marker.clone()));
        assert_eq!(alloc::rc::Rc::strong_count(&marker), 2);

        let removed = table.remove(hash_key(&state, 1), |v| v.0 == 1);
        drop(removed);
        assert_eq!(alloc::rc::Rc::strong_count(&marker), 1);
    }

    #[test]
    fn explicit_collision() {
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        let hash = 0x1234_5678_9abc_def0;
        for k in 0..20u64 {
            match table.entry(hash, |v| v.key == k) {
                Entry::Vacant(v) => {
                    v.insert(Item {
                        key: k,
                        value: k as i32,
                    });
                }
                Entry::Occupied(_) => panic!("unexpected occupied"),
            }
        }
        assert_eq!(table.len(), 20);
        assert_eq!(table.debug_stats().longest_chain, 20);
        for k in 0..20u64 {
            assert_eq!(table.find(hash, |v| v.key == k).unwrap().key, k);
        }

        for k in [0u64, 10, 19] {
            assert!(table.remove(hash, |v| v.key == k).is_some());
            table.assert_invariants();
        }
        assert_eq!(table.len(), 17);
        for k in 0..20u64 {
            assert_eq!(
                table.find(hash, |v| v.key == k).is_some(),
                ![0, 10, 19].contains(&k)
            );
        }
    }

    #[test]
    fn shift_remove_keeps_order_and_chains() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in 1..=10u64 {
            insert(&mut table, &state, k);
        }

        let (index, removed) = table
            .shift_remove(hash_key(&state, 5), |v| v.key == 5)
            .unwrap();
        assert_eq!(index, 4);
        assert_eq!(removed.key, 5);
        table.assert_invariants();

        assert_eq!(keys(&table), vec![1, 2, 3, 4, 6, 7, 8, 9, 10]);
        for k in 1..=10u64 {
            assert_eq!(contains(&table, &state, k), k != 5);
            if k != 5 {
                let position = table
                    .find_index(hash_key(&state, k), |v| v.key == k)
                    .unwrap();
                assert_eq!(table.get(position).unwrap().key, k);
            }
        }

        assert_eq!(table.shift_remove_index(0).unwrap().key, 1);
        assert_eq!(table.shift_remove_index(7).unwrap().key, 10);
        assert!(table.shift_remove_index(7).is_none());
        table.assert_invariants();
        assert_eq!(keys(&table), vec![2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn shift_remove_with_shared_hash() {
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in 0..8u64 {
            table.insert_unique(
                7,
                Item {
                    key: k,
                    value: k as i32,
                },
            );
        }

        table.shift_remove_index(3);
        table.assert_invariants();
        for k in 0..8u64 {
            assert_eq!(table.find(7, |v| v.key == k).is_some(), k != 3);
        }
        assert_eq!(table.find_index(7, |v| v.key == 4), Some(3));
    }

    #[test]
    fn shift_insert_renumbers() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in [1u64, 2, 4, 5] {
            insert(&mut table, &state, k);
        }

        table.shift_insert(
            2,
            hash_key(&state, 3),
            Item { key: 3, value: 3 },
        );
        table.shift_insert(0, hash_key(&state, 0), Item { key: 0, value: 0 });
        table.shift_insert(6, hash_key(&state, 6), Item { key: 6, value: 6 });
        table.assert_invariants();

        assert_eq!(keys(&table), vec![0, 1, 2, 3, 4, 5, 6]);
        for k in 0..7u64 {
            assert_eq!(
                table.find_index(hash_key(&state, k), |v| v.key == k),
                Some(k as usize)
            );
        }
    }

    #[test]
    fn replace_at_moves_between_buckets() {
        let mut table: HashTable<Item> = HashTable::with_capacity(7);
        assert_eq!(table.capacity(), 7);
        for k in 0..5u64 {
            table.insert_unique(
                k,
                Item {
                    key: k,
                    value: k as i32,
                },
            );
        }

        // Hash 2 lives in bucket 2; hash 12 lands in bucket 5.
        let old = table
            .replace_at(2, 12, Item { key: 12, value: 12 })
            .unwrap();
        assert_eq!(old.key, 2);
        table.assert_invariants();

        assert!(table.find(2, |v| v.key == 2).is_none());
        assert_eq!(table.find_index(12, |v| v.key == 12), Some(2));
        assert_eq!(keys(&table), vec![0, 1, 12, 3, 4]);
        assert!(table.replace_at(99, 1, Item { key: 1, value: 1 }).is_none());
    }

    #[test]
    fn replace_at_in_shared_chain() {
        let mut table: HashTable<Item> = HashTable::with_capacity(3);
        for k in 0..3u64 {
            table.insert_unique(
                9,
                Item {
                    key: k,
                    value: k as i32,
                },
            );
        }

        table.replace_at(1, 9, Item { key: 7, value: 7 });
        table.assert_invariants();
        assert!(table.find(9, |v| v.key == 1).is_none());
        assert_eq!(table.find_index(9, |v| v.key == 7), Some(1));
        assert_eq!(table.find_index(9, |v| v.key == 0), Some(0));
        assert_eq!(table.find_index(9, |v| v.key == 2), Some(2));
    }

    #[test]
    fn iter_and_drain() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(0);
        for k in 0..16u64 {
            insert(&mut table, &state, k);
        }
        table.remove(hash_key(&state, 3), |v| v.key == 3);

        let mut seen: Vec<u64> = table.iter().map(|v| v.key).collect();
        assert_eq!(table.iter().len(), 15);
        seen.sort_unstable();
        assert_eq!(seen, (0..16).filter(|&k| k != 3).collect::<Vec<_>>());

        let drained: Vec<Item> = table.drain().collect();
        assert_eq!(drained.len(), 15);
        assert!(table.is_empty());
        table.assert_invariants();

        insert(&mut table, &state, 99);
        assert!(contains(&table, &state, 99));
    }

    #[test]
    fn dropped_drain_empties_table() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..8u64 {
            insert(&mut table, &state, k);
        }

        let mut drain = table.drain();
        assert!(drain.next().is_some());
        drop(drain);
        assert!(table.is_empty());
        table.assert_invariants();
    }

    #[test]
    fn insert_and_find_string_keys() {
        fn hash_string_key(state: &HashState, key: &str) -> u64 {
            let mut h = state.build_hasher();
            h.write(key.as_bytes());
            h.finish()
        }

        let state = HashState::default();
        let mut table: HashTable<String> = HashTable::new();
        let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
        for word in words {
            table
                .entry(hash_string_key(&state, word), |s| s == word)
                .or_insert(word.to_string());
        }
        assert_eq!(table.len(), words.len());

        for word in words {
            assert_eq!(
                table.find(hash_string_key(&state, word), |s| s == word),
                Some(&word.to_string())
            );
        }
        assert_eq!(
            table.iter().map(String::as_str).collect::<Vec<_>>(),
            words.to_vec()
        );
    }

    #[test]
    fn entry_or_insert_with() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        let hash = hash_key(&state, 1);
        let mut calls = 0;
        for _ in 0..3 {
            table
                .entry(hash, |v| v.key == 1)
                .or_insert_with(|| {
                    calls += 1;
                    Item { key: 1, value: 1 }
                })
                .value += 1;
        }
        assert_eq!(calls, 1);
        assert_eq!(table.find(hash, |v| v.key == 1).unwrap().value, 4);
        assert!(
            table
                .entry(hash_key(&state, 2), |v| v.key == 2)
                .and_modify(|v| v.value = 0)
                .is_none()
        );
    }

    #[test]
    fn occupied_entry_removals() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..4u64 {
            insert(&mut table, &state, k);
        }

        match table.entry(hash_key(&state, 1), |v| v.key == 1) {
            Entry::Occupied(entry) => {
                assert_eq!(entry.index(), 1);
                assert_eq!(entry.shift_remove().key, 1);
            }
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        assert_eq!(keys(&table), vec![0, 2, 3]);

        match table.entry(hash_key(&state, 2), |v| v.key == 2) {
            Entry::Occupied(entry) => assert_eq!(entry.remove().key, 2),
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        assert_eq!(keys(&table), vec![0, 3]);
        assert_eq!(table.slots_in_use(), 3);
        table.assert_invariants();
    }

    #[test]
    fn retain_variants() {
        let state = HashState::default();
        let mut unordered: HashTable<Item> = HashTable::new();
        for k in 0..30u64 {
            insert(&mut unordered, &state, k);
        }
        let mut ordered = unordered.clone();

        assert_eq!(unordered.retain(|v| v.key % 3 == 0), 20);
        unordered.assert_invariants();
        assert_eq!(unordered.slots_in_use(), 30);

        assert_eq!(ordered.retain_ordered(|v| v.key % 3 == 0), 20);
        ordered.assert_invariants();
        assert_eq!(ordered.slots_in_use(), 10);
        assert_eq!(keys(&ordered), (0..30).step_by(3).collect::<Vec<_>>());
        for k in 0..30u64 {
            assert_eq!(contains(&ordered, &state, k), k % 3 == 0);
            assert_eq!(contains(&unordered, &state, k), k % 3 == 0);
        }
    }

    #[test]
    fn ensure_capacity_is_idempotent() {
        let mut table: HashTable<Item> = HashTable::new();
        let first = table.ensure_capacity(50).unwrap();
        assert_eq!(first, 59);
        assert_eq!(table.ensure_capacity(50), Ok(first));
        assert_eq!(table.ensure_capacity(10), Ok(first));
        assert_eq!(
            table.ensure_capacity(usize::MAX),
            Err(Error::CapacityOverflow)
        );
        assert_eq!(table.capacity(), first);
    }

    #[test]
    fn ensure_capacity_bumps_version() {
        let mut table: HashTable<Item> = HashTable::with_capacity(10);
        let before = table.version();
        table.ensure_capacity(1).unwrap();
        assert_ne!(table.version(), before);

        let before = table.version();
        assert!(table.ensure_capacity(usize::MAX).is_err());
        assert_eq!(table.version(), before);
    }

    #[test]
    fn growth_preserves_contents() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        let mut capacities = vec![];
        for k in 0..500u64 {
            insert(&mut table, &state, k);
            if capacities.last() != Some(&table.capacity()) {
                capacities.push(table.capacity());
            }
        }
        table.assert_invariants();
        assert!(capacities.iter().all(|&c| capacity::is_prime(c)));
        assert!(capacities.windows(2).all(|w| w[1] >= w[0] * 2));
        assert_eq!(keys(&table), (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_clone() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..12u64 {
            insert(&mut table, &state, k);
        }
        table.remove(hash_key(&state, 4), |v| v.key == 4);

        let mut cloned = table.clone();
        cloned.assert_invariants();
        assert_eq!(keys(&cloned), keys(&table));

        insert(&mut cloned, &state, 4);
        assert!(contains(&cloned, &state, 4));
        assert!(!contains(&table, &state, 4));
    }

    #[test]
    fn test_shrink_to_fit_empty_table() {
        let mut table: HashTable<Item> = HashTable::with_capacity(100);
        table.shrink_to_fit();
        assert_eq!(table.capacity(), 0);
        table.assert_invariants();

        let state = HashState::default();
        insert(&mut table, &state, 1);
        assert_eq!(table.capacity(), 3);
    }

    #[test]
    fn test_shrink_to_fit_after_removals() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..100u64 {
            insert(&mut table, &state, k);
        }
        for k in 10..100u64 {
            table.remove(hash_key(&state, k), |v| v.key == k);
        }

        table.shrink_to_fit();
        table.assert_invariants();
        assert_eq!(table.capacity(), 11);
        assert_eq!(table.slots_in_use(), 10);
        assert_eq!(keys(&table), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_shrink_to_fit_compacts_at_same_capacity() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..3u64 {
            insert(&mut table, &state, k);
        }
        table.remove(hash_key(&state, 0), |v| v.key == 0);
        assert_eq!(table.slots_in_use(), 3);

        table.shrink_to_fit();
        table.assert_invariants();
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.slots_in_use(), 2);
        assert_eq!(keys(&table), vec![1, 2]);
    }

    #[test]
    fn test_shrink_to_respects_floor() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(500);
        for k in 0..5u64 {
            insert(&mut table, &state, k);
        }

        assert_eq!(
            table.shrink_to(4),
            Err(Error::CapacityBelowLength {
                requested: 4,
                len: 5
            })
        );
        assert_eq!(table.capacity(), 521);

        table.shrink_to(40).unwrap();
        assert_eq!(table.capacity(), 47);
        table.assert_invariants();

        let version = table.version();
        table.shrink_to(1000).unwrap();
        assert_eq!(table.capacity(), 47);
        assert_ne!(table.version(), version);
    }

    #[test]
    fn next_live_skips_free_slots() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..4u64 {
            insert(&mut table, &state, k);
        }
        table.remove_index(1);

        assert_eq!(table.next_live(0).map(|(i, v)| (i, v.key)), Some((0, 0)));
        assert_eq!(table.next_live(1).map(|(i, v)| (i, v.key)), Some((2, 2)));
        assert_eq!(table.next_live(4), None);
        assert_eq!(table.next_live(40), None);
    }

    #[test]
    fn chain_histogram_counts_buckets() {
        let mut table: HashTable<u64> = HashTable::with_capacity(3);
        table.insert_unique(0, 0);
        table.insert_unique(3, 3);
        table.insert_unique(1, 1);

        let hist = table.chain_histogram();
        assert_eq!(hist, vec![1, 1, 1]);
        let stats = table.debug_stats();
        assert_eq!(stats.empty_buckets, 1);
        assert_eq!(stats.longest_chain, 2);
        assert_eq!(stats.len, 3);
    }

    #[test]
    #[cfg(feature = "std")]
    fn histogram_output() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..1000u64 {
            insert(&mut table, &state, k);
        }
        table.print_chain_histogram();
        table.debug_stats().print();
    }
}
