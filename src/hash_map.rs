use core::fmt::Debug;
use core::marker::PhantomData;
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

/// A hash map built on the chained [`HashTable`].
///
/// `HashMap<K, V, C>` stores key-value pairs whose keys are hashed and
/// compared by the comparer `C`. Removal releases slots to a free list that
/// later inserts reuse, so iteration order is unspecified once entries have
/// been removed.
///
/// # Performance Characteristics
///
/// - **Memory**: one `usize` per bucket, plus a `u64` hash and a `usize`
///   link per entry, plus the size of `(K, V)`.
#[derive(Clone)]
pub struct HashMap<K, V, C = DefaultComparer> {
    table: HashTable<(K, V)>,
    comparer: C,
}

impl<K, V, C> Debug for HashMap<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, C> PartialEq for HashMap<K, V, C>
where
    V: PartialEq,
    C: KeyComparer<K>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, C> Eq for HashMap<K, V, C>
where
    V: Eq,
    C: KeyComparer<K>,
{
}

impl<K, V, C> HashMap<K, V, C> {
    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// # }
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the map can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the map's comparer.
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Clears the map, removing all key-value pairs. Keeps the allocated
    /// memory for reuse.
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

    /// Reserves capacity for at least `additional` more elements.
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

    /// Returns an iterator over the key-value pairs of the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("Key: {}, Value: {}", key, value);
    /// }
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values of the map.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let drained: Vec<_> = map.drain().collect();
    /// assert_eq!(drained.len(), 2);
    /// assert!(map.is_empty());
    /// # }
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the entries specified by the predicate.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(|(k, v)| f(&*k, v));
    }

    /// Removes every entry matching the predicate and returns how many were
    /// removed.
    pub fn remove_where(&mut self, mut f: impl FnMut(&K, &V) -> bool) -> usize {
        self.table.retain(|(k, v)| !f(&*k, &*v))
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

impl<K, V, C> HashMap<K, V, C>
where
    C: KeyComparer<K>,
{
    /// Creates a new hash map with the given comparer.
    pub fn with_comparer(comparer: C) -> Self {
        Self::with_capacity_and_comparer(0, comparer)
    }

    /// Creates a new hash map with the specified capacity and comparer.
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

    /// Builds a map from `entries`, failing on the first key that repeats.
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

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, [`None`] is returned.
    ///
    /// If the map did have this key present, the value is updated, and the
    /// old value is returned. The stored key is left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Inserts a new key-value pair, refusing to overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`], leaving the map unchanged, if the key
    /// is already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::Error;
    /// use prime_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// assert_eq!(map.add("a", 1), Ok(()));
    /// assert_eq!(map.add("a", 2), Err(Error::DuplicateKey));
    /// assert_eq!(map[&"a"], 1);
    /// # }
    /// ```
    pub fn add(&mut self, key: K, value: V) -> Result<(), Error> {
        match self.entry(key) {
            Entry::Occupied(_) => Err(Error::DuplicateKey),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Inserts a new key-value pair if the key is absent. Returns whether it
    /// was inserted.
    pub fn try_add(&mut self, key: K, value: V) -> bool {
        self.add(key, value).is_ok()
    }

    fn find_index(&self, key: &K) -> Option<usize> {
        let hash = self.comparer.hash(key);
        self.table.find_index(hash, |(k, _)| self.comparer.eq(k, key))
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let index = self.find_index(key)?;
        self.table.get(index).map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find_index(key)?;
        self.table.get_mut(index).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.comparer.hash(key);
        self.table.remove(hash, |(k, _)| self.comparer.eq(k, key))
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashMap;
    ///
    /// let mut counts: HashMap<&str, u32> = HashMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.entry(word).or_default() += 1;
    /// }
    /// assert_eq!(counts[&"a"], 2);
    /// assert_eq!(counts[&"b"], 1);
    /// # }
    /// ```
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
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashMap;
    ///
    /// let mut map: HashMap<String, u32> = HashMap::new();
    /// map.insert("apple".to_string(), 3);
    ///
    /// let mut lookup = map.alternate_lookup::<str>().unwrap();
    /// assert_eq!(lookup.get("apple"), Some(&3));
    /// assert_eq!(lookup.insert("pear", 5), None);
    /// assert_eq!(map.len(), 2);
    /// # }
    /// ```
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

impl<K, V, C> HashMap<K, V, C>
where
    C: KeyComparer<K> + Default,
{
    /// Creates an empty `HashMap` with the default comparer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_comparer(C::default())
    }

    /// Creates an empty `HashMap` with the specified capacity and the default
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
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::Error;
    /// use prime_hash::HashMap;
    ///
    /// let map: Result<HashMap<i32, i32>, _> = HashMap::from_entries([(1, 1), (1, 2)]);
    /// assert_eq!(map.unwrap_err(), Error::DuplicateKey);
    /// # }
    /// ```
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self, Error> {
        Self::from_entries_with_comparer(entries, C::default())
    }
}

impl<K, V, C> Default for HashMap<K, V, C>
where
    C: KeyComparer<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Index<&K> for HashMap<K, V, C>
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

impl<K, V, C> Enumerable for HashMap<K, V, C> {
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

impl<K, V, C> FromIterator<(K, V)> for HashMap<K, V, C>
where
    C: KeyComparer<K> + Default,
{
    /// Collects entries, keeping the last value for a repeated key. Use
    /// [`HashMap::from_entries`] to reject repeats instead.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> Extend<(K, V)> for HashMap<K, V, C>
where
    C: KeyComparer<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C> IntoIterator for HashMap<K, V, C> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a HashMap<K, V, C> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A read-only lookup handle that accepts a borrowed key view `Q` in place
/// of `K`.
///
/// Created by [`HashMap::alternate_view`] or [`AlternateLookup::as_view`].
pub struct AlternateView<'a, K, V, C, Q: ?Sized> {
    map: &'a HashMap<K, V, C>,
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
    pub fn map(&self) -> &'a HashMap<K, V, C> {
        self.map
    }

    fn find_index(&self, view: &Q) -> Option<usize> {
        let comparer = &self.map.comparer;
        let hash = comparer.hash_alternate(view);
        self.map
            .table
            .find_index(hash, |(k, _)| comparer.eq_alternate(view, k))
    }

    /// Returns `true` if the map contains the key denoted by `view`.
    pub fn contains_key(&self, view: &Q) -> bool {
        self.find_index(view).is_some()
    }

    /// Returns the value for the key denoted by `view`.
    pub fn get(&self, view: &Q) -> Option<&'a V> {
        self.get_key_value(view).map(|(_, v)| v)
    }

    /// Returns the stored key and value for the key denoted by `view`.
    pub fn get_key_value(&self, view: &Q) -> Option<(&'a K, &'a V)> {
        let index = self.find_index(view)?;
        self.map.table.get(index).map(|(k, v)| (k, v))
    }
}

/// A lookup handle that accepts a borrowed key view `Q` in place of `K`.
///
/// Created by [`HashMap::alternate_lookup`].
pub struct AlternateLookup<'a, K, V, C, Q: ?Sized> {
    map: &'a mut HashMap<K, V, C>,
    _view: PhantomData<fn(&Q)>,
}

impl<K, V, C, Q> AlternateLookup<'_, K, V, C, Q>
where
    Q: ?Sized,
    C: AlternateComparer<Q, K>,
{
    /// Returns the map this handle looks into.
    pub fn map(&self) -> &HashMap<K, V, C> {
        self.map
    }

    /// Reborrows this handle as a read-only [`AlternateView`].
    pub fn as_view(&self) -> AlternateView<'_, K, V, C, Q> {
        AlternateView {
            map: self.map,
            _view: PhantomData,
        }
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
        let index = self.as_view().find_index(view)?;
        self.map.table.get_mut(index).map(|(_, v)| v)
    }

    /// Inserts `value` under the key denoted by `view`, converting the view
    /// to an owned key only if the key is absent. Returns the old value.
    pub fn insert(&mut self, view: &Q, value: V) -> Option<V> {
        let comparer = &self.map.comparer;
        let hash = comparer.hash_alternate(view);
        match self
            .map
            .table
            .entry(hash, |(k, _)| comparer.eq_alternate(view, k))
        {
            TableEntry::Occupied(mut entry) => {
                Some(core::mem::replace(&mut entry.get_mut().1, value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((comparer.to_key(view), value));
                None
            }
        }
    }

    /// Removes the key denoted by `view`, returning its value.
    pub fn remove(&mut self, view: &Q) -> Option<V> {
        self.remove_entry(view).map(|(_, v)| v)
    }

    /// Removes the key denoted by `view`, returning the stored key and value.
    pub fn remove_entry(&mut self, view: &Q) -> Option<(K, V)> {
        let comparer = &self.map.comparer;
        let hash = comparer.hash_alternate(view);
        self.map
            .table
            .remove(hash, |(k, _)| comparer.eq_alternate(view, k))
    }
}

/// A view into a single entry in a map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
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

/// A view into a vacant entry in the map.
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

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
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
        core::mem::replace(&mut self.entry.get_mut().1, value)
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

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
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

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A mutable iterator over the key-value pairs of a `HashMap`.
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

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// A consuming iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
