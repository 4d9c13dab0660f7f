//! A hash map that remembers insertion order.
//!
//! Entries occupy positions `0..len` in insertion order. Removing an entry
//! shifts every later entry down by one, which costs O(n) but keeps
//! positional access exact.

use core::fmt::Debug;
use core::marker::PhantomData;
use core::mem;
use core::ops::Index;

use crate::comparer::AlternateComparer;
use crate::comparer::DefaultComparer;
use crate::comparer::KeyComparer;
use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::version::Enumerable;
use crate::version::Enumerator;
use crate::version::Version;

/// An insertion-ordered hash map with positional access.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use prime_hash::OrderedMap;
///
/// let mut map: OrderedMap<&str, u32> = OrderedMap::new();
/// map.insert("one", 1);
/// map.insert("two", 2);
/// map.insert("three", 3);
/// map.remove(&"one");
///
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["two", "three"]);
/// assert_eq!(map.get_at(1), Ok((&"three", &3)));
/// assert_eq!(map[&"two"], 2);
/// # }
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V, C = DefaultComparer> {
    table: HashTable<(K, V)>,
    comparer: C,
}

impl<K, V, C> Debug for OrderedMap<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equality compares contents and ignores order.
impl<K, V, C> PartialEq for OrderedMap<K, V, C>
where
    V: PartialEq,
    C: KeyComparer<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, C> Eq for OrderedMap<K, V, C>
where
    V: Eq,
    C: KeyComparer<K>,
{
}

impl<K, V, C> OrderedMap<K, V, C> {
    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of entries the map can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the map's comparer.
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Removes all entries, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the map to hold at least `capacity` entries and returns the
    /// resulting capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if `capacity` is too large.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize, Error> {
        self.table.ensure_capacity(capacity)
    }

    /// Reserves capacity for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Shrinks the capacity of the map as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Shrinks the capacity to the smallest prime that fits both the
    /// current entries and `min_capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityBelowLength`] if `min_capacity` is smaller
    /// than [`len`](Self::len).
    pub fn shrink_to(&mut self, min_capacity: usize) -> Result<(), Error> {
        self.table.shrink_to(min_capacity)
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            index,
            len: self.len(),
        }
    }

    /// Returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn get_at(&self, index: usize) -> Result<(&K, &V), Error> {
        match self.table.get(index) {
            Some((k, v)) => Ok((k, v)),
            None => Err(self.out_of_range(index)),
        }
    }

    /// Returns the entry at `index` with its value mutable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn get_at_mut(&mut self, index: usize) -> Result<(&K, &mut V), Error> {
        let error = self.out_of_range(index);
        match self.table.get_mut(index) {
            Some((k, v)) => Ok((&*k, v)),
            None => Err(error),
        }
    }

    /// Replaces the value at `index`, keeping its key and position, and
    /// returns the old value. This is not a structural change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn set_value_at(&mut self, index: usize, value: V) -> Result<V, Error> {
        let (_, slot) = self.get_at_mut(index)?;
        Ok(mem::replace(slot, value))
    }

    /// Removes and returns the entry at `index`, shifting later entries down
    /// by one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<(K, V), Error> {
        let error = self.out_of_range(index);
        self.table.shift_remove_index(index).ok_or(error)
    }

    /// Returns the first entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.get_at(0).ok()
    }

    /// Returns the last entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.get_at(self.len().checked_sub(1)?).ok()
    }

    /// Returns an iterator over the entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the entries in insertion order, with mutable
    /// values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in insertion order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable values in insertion order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes and yields all entries in insertion order.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the entries specified by the predicate, preserving the
    /// order of the survivors.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain_ordered(|(k, v)| f(&*k, v));
    }

    /// Removes every entry matching the predicate and returns how many were
    /// removed.
    pub fn remove_where(&mut self, mut f: impl FnMut(&K, &V) -> bool) -> usize {
        self.table.retain_ordered(|(k, v)| !f(&*k, &*v))
    }

    /// Returns a detached [`Enumerator`] over the map.
    pub fn enumerator(&self) -> Enumerator<Self> {
        Enumerator::new(self)
    }

    /// Returns a reference to the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn table(&self) -> &HashTable<(K, V)> {
        &self.table
    }
}

impl<K, V, C> OrderedMap<K, V, C>
where
    C: KeyComparer<K>,
{
    /// Creates an empty map with the given comparer.
    pub fn with_comparer(comparer: C) -> Self {
        Self::with_capacity_and_comparer(0, comparer)
    }

    /// Creates an empty map with the specified capacity and comparer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds
    /// [`MAX_PRIME_CAPACITY`](crate::capacity::MAX_PRIME_CAPACITY).
    pub fn with_capacity_and_comparer(capacity: usize, comparer: C) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            comparer,
        }
    }

    /// Builds a map from `entries` in order, failing on the first key that
    /// repeats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if two entries have equal keys.
    pub fn from_entries_with_comparer(
        entries: impl IntoIterator<Item = (K, V)>,
        comparer: C,
    ) -> Result<Self, Error> {
        let entries = entries.into_iter();
        let mut map = Self::with_capacity_and_comparer(entries.size_hint().0, comparer);
        for (key, value) in entries {
            map.add(key, value)?;
        }
        Ok(map)
    }

    fn find_index(&self, key: &K) -> Option<usize> {
        let hash = self.comparer.hash(key);
        self.table.find_index(hash, |(k, _)| self.comparer.eq(k, key))
    }

    /// Inserts a key-value pair. A new key is appended; an existing key keeps
    /// its position and stored key, and its old value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_full(key, value).1
    }

    /// Inserts a key-value pair and returns the entry's position along with
    /// the old value, if the key was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::OrderedMap;
    ///
    /// let mut map: OrderedMap<char, u32> = OrderedMap::new();
    /// assert_eq!(map.insert_full('a', 1), (0, None));
    /// assert_eq!(map.insert_full('b', 2), (1, None));
    /// assert_eq!(map.insert_full('a', 3), (0, Some(1)));
    /// # }
    /// ```
    pub fn insert_full(&mut self, key: K, value: V) -> (usize, Option<V>) {
        match self.entry(key) {
            Entry::Occupied(mut entry) => (entry.index(), Some(entry.insert(value))),
            Entry::Vacant(entry) => (entry.insert_full(value).0, None),
        }
    }

    /// Appends a new key-value pair, refusing to overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`], leaving the map unchanged, if the key
    /// is already present.
    pub fn add(&mut self, key: K, value: V) -> Result<(), Error> {
        match self.entry(key) {
            Entry::Occupied(_) => Err(Error::DuplicateKey),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Appends a new key-value pair if the key is absent. Returns whether it
    /// was inserted.
    pub fn try_add(&mut self, key: K, value: V) -> bool {
        self.add(key, value).is_ok()
    }

    /// Inserts a new entry at `index`, shifting the entries at and after it
    /// up by one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`, or
    /// [`Error::DuplicateKey`] if the key is already present. The map is
    /// unchanged on error.
    pub fn insert_at(&mut self, index: usize, key: K, value: V) -> Result<(), Error> {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        if self.contains_key(&key) {
            return Err(Error::DuplicateKey);
        }
        let hash = self.comparer.hash(&key);
        self.table.shift_insert(index, hash, (key, value));
        Ok(())
    }

    /// Replaces the entry at `index` with a new key and value, returning the
    /// old entry.
    ///
    /// If `key` is equal to the key already at `index`, the entry is
    /// overwritten in place, which is not a structural change. Otherwise the
    /// old key is no longer found and `key` is found at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`, or
    /// [`Error::DuplicateKey`] if `key` is equal to a key at another
    /// position. The map is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::Error;
    /// use prime_hash::OrderedMap;
    ///
    /// let mut map: OrderedMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// assert_eq!(map.set_at(0, "z", 26), Ok(("a", 1)));
    /// assert_eq!(map.get_index_of(&"z"), Some(0));
    /// assert!(!map.contains_key(&"a"));
    ///
    /// assert_eq!(map.set_at(0, "b", 0), Err(Error::DuplicateKey));
    /// # }
    /// ```
    pub fn set_at(&mut self, index: usize, key: K, value: V) -> Result<(K, V), Error> {
        let error = self.out_of_range(index);
        if index >= self.len() {
            return Err(error);
        }
        let hash = self.comparer.hash(&key);
        match self.find_index(&key) {
            Some(existing) if existing == index => match self.table.get_mut(index) {
                Some(slot) => Ok(mem::replace(slot, (key, value))),
                None => Err(error),
            },
            Some(_) => Err(Error::DuplicateKey),
            None => self.table.replace_at(index, hash, (key, value)).ok_or(error),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.get_full(key).map(|(_, k, v)| (k, v))
    }

    /// Returns the position, stored key, and value for the key.
    pub fn get_full(&self, key: &K) -> Option<(usize, &K, &V)> {
        let index = self.find_index(key)?;
        self.table.get(index).map(|(k, v)| (index, k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find_index(key)?;
        self.table.get_mut(index).map(|(_, v)| v)
    }

    /// Returns the position of the key.
    pub fn get_index_of(&self, key: &K) -> Option<usize> {
        self.find_index(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Removes a key, shifting later entries down by one, and returns its
    /// value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.shift_remove_full(key).map(|(_, _, v)| v)
    }

    /// Removes a key, shifting later entries down by one, and returns the
    /// stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.shift_remove_full(key).map(|(_, k, v)| (k, v))
    }

    /// Removes a key and returns its former position, stored key, and value.
    pub fn shift_remove_full(&mut self, key: &K) -> Option<(usize, K, V)> {
        let hash = self.comparer.hash(key);
        self.table
            .shift_remove(hash, |(k, _)| self.comparer.eq(k, key))
            .map(|(index, (k, v))| (index, k, v))
    }

    /// Gets the given key's corresponding entry for in-place manipulation.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.comparer.hash(&key);
        match self.table.entry(hash, |(k, _)| self.comparer.eq(k, &key)) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Returns a handle for looking entries up through the borrowed key view
    /// `Q`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleComparer`] if the map's comparer has no
    /// consistent alternate form for `Q`.
    pub fn alternate_lookup<Q>(&mut self) -> Result<AlternateLookup<'_, K, V, C, Q>, Error>
    where
        Q: ?Sized,
        C: AlternateComparer<Q, K>,
    {
        if !self.comparer.supports_alternate() {
            return Err(Error::IncompatibleComparer);
        }
        Ok(AlternateLookup {
            map: self,
            _view: PhantomData,
        })
    }

    /// Returns a read-only handle for looking entries up through the
    /// borrowed key view `Q`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleComparer`] if the map's comparer has no
    /// consistent alternate form for `Q`.
    pub fn alternate_view<Q>(&self) -> Result<AlternateView<'_, K, V, C, Q>, Error>
    where
        Q: ?Sized,
        C: AlternateComparer<Q, K>,
    {
        if !self.comparer.supports_alternate() {
            return Err(Error::IncompatibleComparer);
        }
        Ok(AlternateView {
            map: self,
            _view: PhantomData,
        })
    }
}

impl<K, V, C> OrderedMap<K, V, C>
where
    C: KeyComparer<K> + Default,
{
    /// Creates an empty map with the default comparer.
    pub fn new() -> Self {
        Self::with_comparer(C::default())
    }

    /// Creates an empty map with the specified capacity and the default
    /// comparer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparer(capacity, C::default())
    }

    /// Builds a map from `entries` with the default comparer, failing on the
    /// first key that repeats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if two entries have equal keys.
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self, Error> {
        Self::from_entries_with_comparer(entries, C::default())
    }
}

impl<K, V, C> Default for OrderedMap<K, V, C>
where
    C: KeyComparer<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Index<&K> for OrderedMap<K, V, C>
where
    C: KeyComparer<K>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found"),
        }
    }
}

impl<K, V, C> Index<usize> for OrderedMap<K, V, C> {
    type Output = V;

    /// Returns the value at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    fn index(&self, index: usize) -> &V {
        match self.table.get(index) {
            Some((_, value)) => value,
            None => panic!(
                "index out of bounds: the len is {} but the index is {index}",
                self.len()
            ),
        }
    }
}

impl<K, V, C> Enumerable for OrderedMap<K, V, C> {
    type Item<'a>
        = (&'a K, &'a V)
    where
        Self: 'a;

    fn version(&self) -> Version {
        self.table.version()
    }

    fn next_live(&self, from: usize) -> Option<(usize, (&K, &V))> {
        self.table
            .next_live(from)
            .map(|(index, (k, v))| (index, (k, v)))
    }
}

impl<K, V, C> FromIterator<(K, V)> for OrderedMap<K, V, C>
where
    C: KeyComparer<K> + Default,
{
    /// Collects entries in order. A repeated key keeps its first position and
    /// takes the last value.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> Extend<(K, V)> for OrderedMap<K, V, C>
where
    C: KeyComparer<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C> IntoIterator for OrderedMap<K, V, C> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrderedMap<K, V, C> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A read-only lookup handle that accepts a borrowed key view `Q` in place
/// of `K`.
///
/// Created by [`OrderedMap::alternate_view`] or
/// [`AlternateLookup::as_view`].
pub struct AlternateView<'a, K, V, C, Q: ?Sized> {
    map: &'a OrderedMap<K, V, C>,
    _view: PhantomData<fn(&Q)>,
}

impl<K, V, C, Q: ?Sized> Clone for AlternateView<'_, K, V, C, Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C, Q: ?Sized> Copy for AlternateView<'_, K, V, C, Q> {}

impl<'a, K, V, C, Q> AlternateView<'a, K, V, C, Q>
where
    Q: ?Sized,
    C: AlternateComparer<Q, K>,
{
    /// Returns the map this handle looks into.
    pub fn map(&self) -> &'a OrderedMap<K, V, C> {
        self.map
    }

    /// Returns the position of the key denoted by `view`.
    pub fn get_index_of(&self, view: &Q) -> Option<usize> {
        let comparer = &self.map.comparer;
        let hash = comparer.hash_alternate(view);
        self.map
            .table
            .find_index(hash, |(k, _)| comparer.eq_alternate(view, k))
    }

    /// Returns `true` if the map contains the key denoted by `view`.
    pub fn contains_key(&self, view: &Q) -> bool {
        self.get_index_of(view).is_some()
    }

    /// Returns the value for the key denoted by `view`.
    pub fn get(&self, view: &Q) -> Option<&'a V> {
        self.get_key_value(view).map(|(_, v)| v)
    }

    /// Returns the stored key and value for the key denoted by `view`.
    pub fn get_key_value(&self, view: &Q) -> Option<(&'a K, &'a V)> {
        let index = self.get_index_of(view)?;
        self.map.table.get(index).map(|(k, v)| (k, v))
    }
}

/// A lookup handle that accepts a borrowed key view `Q` in place of `K`.
///
/// Created by [`OrderedMap::alternate_lookup`].
pub struct AlternateLookup<'a, K, V, C, Q: ?Sized> {
    map: &'a mut OrderedMap<K, V, C>,
    _view: PhantomData<fn(&Q)>,
}

impl<K, V, C, Q> AlternateLookup<'_, K, V, C, Q>
where
    Q: ?Sized,
    C: AlternateComparer<Q, K>,
{
    /// Returns the map this handle looks into.
    pub fn map(&self) -> &OrderedMap<K, V, C> {
        self.map
    }

    /// Reborrows this handle as a read-only [`AlternateView`].
    pub fn as_view(&self) -> AlternateView<'_, K, V, C, Q> {
        AlternateView {
            map: self.map,
            _view: PhantomData,
        }
    }

    /// Returns the position of the key denoted by `view`.
    pub fn get_index_of(&self, view: &Q) -> Option<usize> {
        self.as_view().get_index_of(view)
    }

    /// Returns `true` if the map contains the key denoted by `view`.
    pub fn contains_key(&self, view: &Q) -> bool {
        self.as_view().contains_key(view)
    }

    /// Returns the value for the key denoted by `view`.
    pub fn get(&self, view: &Q) -> Option<&V> {
        self.as_view().get(view)
    }

    /// Returns the stored key and value for the key denoted by `view`.
    pub fn get_key_value(&self, view: &Q) -> Option<(&K, &V)> {
        self.as_view().get_key_value(view)
    }

    /// Returns the value for the key denoted by `view` mutably.
    pub fn get_mut(&mut self, view: &Q) -> Option<&mut V> {
        let index = self.get_index_of(view)?;
        self.map.table.get_mut(index).map(|(_, v)| v)
    }

    /// Inserts `value` under the key denoted by `view`, converting the view
    /// to an owned key only if the key is absent. A new key is appended.
    /// Returns the old value.
    pub fn insert(&mut self, view: &Q, value: V) -> Option<V> {
        let comparer = &self.map.comparer;
        let hash = comparer.hash_alternate(view);
        match self
            .map
            .table
            .entry(hash, |(k, _)| comparer.eq_alternate(view, k))
        {
            TableEntry::Occupied(mut entry) => Some(mem::replace(&mut entry.get_mut().1, value)),
            TableEntry::Vacant(entry) => {
                entry.insert((comparer.to_key(view), value));
                None
            }
        }
    }

    /// Removes the key denoted by `view`, shifting later entries down, and
    /// returns its value.
    pub fn remove(&mut self, view: &Q) -> Option<V> {
        let comparer = &self.map.comparer;
        let hash = comparer.hash_alternate(view);
        self.map
            .table
            .shift_remove(hash, |(k, _)| comparer.eq_alternate(view, k))
            .map(|(_, (_, v))| v)
    }
}

/// A view into a single entry in an ordered map, which may either be vacant
/// or occupied.
///
/// This enum is constructed from the [`entry`] method on [`OrderedMap`].
///
/// [`entry`]: OrderedMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
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
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in an ordered map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Appends the entry and returns a mutable reference to its value.
    pub fn insert(self, value: V) -> &'a mut V {
        self.insert_full(value).1
    }

    /// Appends the entry and returns its position along with a mutable
    /// reference to its value.
    pub fn insert_full(self, value: V) -> (usize, &'a mut V) {
        let (index, (_, value)) = self.entry.insert_full((self.key, value));
        (index, value)
    }
}

/// A view into an occupied entry in an ordered map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Returns the entry's position.
    pub fn index(&self) -> usize {
        self.entry.index()
    }

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

    /// Replaces the entry's value and returns the old one.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry, shifting later entries down by one, and returns
    /// the value.
    pub fn remove(self) -> V {
        self.entry.shift_remove().1
    }

    /// Removes the entry, shifting later entries down by one, and returns
    /// the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.shift_remove()
    }
}

/// An iterator over the entries of an `OrderedMap` in insertion order.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of an `OrderedMap`.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (&*k, v))
    }
}

/// An iterator over the keys of an `OrderedMap` in insertion order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

/// An iterator over the values of an `OrderedMap` in insertion order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

/// A mutable iterator over the values of an `OrderedMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the entries of an `OrderedMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A consuming iterator over the entries of an `OrderedMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}
