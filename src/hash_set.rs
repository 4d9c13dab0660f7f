use core::fmt::Debug;
use core::marker::PhantomData;

use crate::comparer::AlternateComparer;
use crate::comparer::DefaultComparer;
use crate::comparer::KeyComparer;
use crate::error::Error;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::version::Enumerable;
use crate::version::Enumerator;
use crate::version::Version;

/// A hash set built on the chained [`HashTable`].
///
/// `HashSet<T, C>` stores values of type `T`, hashed and compared by the
/// comparer `C`. Removal releases slots to a free list that later inserts
/// reuse, so iteration order is unspecified once elements have been removed.
///
/// # Performance Characteristics
///
/// - **Memory**: one `usize` per bucket, plus a `u64` hash and a `usize`
///   link per element, plus the size of `T`.
#[derive(Clone)]
pub struct HashSet<T, C = DefaultComparer> {
    table: HashTable<T>,
    comparer: C,
}

impl<T, C> PartialEq for HashSet<T, C>
where
    C: KeyComparer<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, C> Eq for HashSet<T, C> where C: KeyComparer<T> {}

impl<T, C> Debug for HashSet<T, C>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.table.iter()).finish()
    }
}

impl<T, C> HashSet<T, C> {
    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the current capacity of the set.
    ///
    /// The capacity is zero or prime, and is the number of elements the set
    /// can hold before it grows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::with_capacity(100);
    /// assert_eq!(set.capacity(), 107);
    /// # }
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the set's comparer.
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Removes all elements from the set.
    ///
    /// This operation preserves the set's allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the set to hold at least `capacity` elements and returns the
    /// resulting capacity. Requests at or below the current capacity change
    /// nothing.
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

    /// Shrinks the capacity of the set as much as possible.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::with_capacity(1000);
    /// set.insert(1);
    /// set.insert(2);
    ///
    /// set.shrink_to_fit();
    /// assert_eq!(set.capacity(), 3);
    /// # }
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Shrinks the capacity to the smallest prime that fits both the
    /// current elements and `min_capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityBelowLength`] if `min_capacity` is smaller
    /// than [`len`](Self::len).
    pub fn shrink_to(&mut self, min_capacity: usize) -> Result<(), Error> {
        self.table.shrink_to(min_capacity)
    }

    /// Returns an iterator over the values of the set.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields all values from the
    /// set.
    ///
    /// After calling `drain()`, the set will be empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(1);
    /// set.insert(2);
    ///
    /// let values: Vec<_> = set.drain().collect();
    /// assert!(set.is_empty());
    /// assert_eq!(values.len(), 2);
    /// # }
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the elements specified by the predicate.
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table.retain(|v| f(&*v));
    }

    /// Removes every element matching the predicate and returns how many
    /// were removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (1..=10).collect();
    /// assert_eq!(set.remove_where(|&v| v % 2 == 0), 5);
    /// assert!(!set.contains(&4));
    /// # }
    /// ```
    pub fn remove_where(&mut self, mut f: impl FnMut(&T) -> bool) -> usize {
        self.table.retain(|v| !f(&*v))
    }

    /// Returns a detached [`Enumerator`] over the set.
    pub fn enumerator(&self) -> Enumerator<Self> {
        Enumerator::new(self)
    }

    /// Returns a reference to the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn table(&self) -> &HashTable<T> {
        &self.table
    }
}

impl<T, C> HashSet<T, C>
where
    C: KeyComparer<T>,
{
    /// Creates a new hash set with the given comparer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    /// use prime_hash::StringComparer;
    ///
    /// let mut set = HashSet::with_comparer(StringComparer::ignore_ascii_case());
    /// set.insert("Key".to_string());
    /// assert!(!set.insert("KEY".to_string()));
    /// # }
    /// ```
    pub fn with_comparer(comparer: C) -> Self {
        Self::with_capacity_and_comparer(0, comparer)
    }

    /// Creates a new hash set with the specified capacity and comparer.
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

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain this value, `true` is returned.
    /// - If the set already contained this value, `false` is returned, and the
    ///   set is not modified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.insert(37), true);
    /// assert_eq!(set.insert(37), false);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.comparer.hash(&value);
        match self.table.entry(hash, |v| self.comparer.eq(v, &value)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns `true` if the set contains a value.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Removes a value from the set. Returns whether the value was
    /// present in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), true);
    /// assert_eq!(set.remove(&1), false);
    /// # }
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Adds a value to the set, replacing the existing value, if any, that is
    /// equal to the given one. Returns the replaced value.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.comparer.hash(&value);
        match self.table.entry(hash, |v| self.comparer.eq(v, &value)) {
            Entry::Occupied(mut entry) => Some(core::mem::replace(entry.get_mut(), value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Removes and returns the value in the set, if any, that is equal to the
    /// given one.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.comparer.hash(value);
        self.table.remove(hash, |v| self.comparer.eq(v, value))
    }

    /// Returns a reference to the value in the set, if any, that is equal to
    /// the given value.
    ///
    /// With a comparer coarser than `==`, this is the stored value, which may
    /// differ from `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.comparer.hash(value);
        self.table.find(hash, |v| self.comparer.eq(v, value))
    }

    /// Returns a handle for looking values up through the borrowed view `Q`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleComparer`] if the set's comparer has no
    /// consistent alternate form for `Q`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = HashSet::new();
    /// let mut lookup = set.alternate_lookup::<str>().unwrap();
    /// assert!(lookup.insert("apple"));
    /// assert!(lookup.contains("apple"));
    /// assert!(set.contains(&"apple".to_string()));
    /// # }
    /// ```
    pub fn alternate_lookup<Q>(&mut self) -> Result<AlternateLookup<'_, T, C, Q>, Error>
    where
        Q: ?Sized,
        C: AlternateComparer<Q, T>,
    {
        if !self.comparer.supports_alternate() {
            return Err(Error::IncompatibleComparer);
        }
        Ok(AlternateLookup {
            set: self,
            _view: PhantomData,
        })
    }

    /// Returns a read-only handle for looking values up through the borrowed
    /// view `Q`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleComparer`] if the set's comparer has no
    /// consistent alternate form for `Q`.
    pub fn alternate_view<Q>(&self) -> Result<AlternateView<'_, T, C, Q>, Error>
    where
        Q: ?Sized,
        C: AlternateComparer<Q, T>,
    {
        if !self.comparer.supports_alternate() {
            return Err(Error::IncompatibleComparer);
        }
        Ok(AlternateView {
            set: self,
            _view: PhantomData,
        })
    }

    /// Returns `true` if the set contains no elements in common with `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [3, 4].into_iter().collect();
    /// assert!(a.is_disjoint(&b));
    /// # }
    /// ```
    pub fn is_disjoint(&self, other: &HashSet<T, C>) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if `other` contains at least all the elements in
    /// `self`.
    pub fn is_subset(&self, other: &HashSet<T, C>) -> bool {
        if self.len() > other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if `self` contains at least all the elements in
    /// `other`.
    pub fn is_superset(&self, other: &HashSet<T, C>) -> bool {
        other.is_subset(self)
    }

    /// Visits the values representing the union, i.e., all the values in
    /// `self` or `other`, without duplicates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let b: HashSet<i32> = [4, 2, 3, 4].into_iter().collect();
    ///
    /// let mut union: Vec<_> = a.union(&b).copied().collect();
    /// union.sort();
    /// assert_eq!(union, [1, 2, 3, 4]);
    /// # }
    /// ```
    pub fn union<'a>(&'a self, other: &'a HashSet<T, C>) -> Union<'a, T, C> {
        Union {
            iter: self.iter(),
            other_iter: other.iter(),
            set: self,
        }
    }

    /// Visits the values representing the intersection, i.e., the values
    /// that are both in `self` and `other`.
    pub fn intersection<'a>(&'a self, other: &'a HashSet<T, C>) -> Intersection<'a, T, C> {
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

    /// Visits the values representing the difference, i.e., the values that
    /// are in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a HashSet<T, C>) -> Difference<'a, T, C> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Visits the values representing the symmetric difference, i.e., the
    /// values that are in `self` or in `other` but not in both.
    pub fn symmetric_difference<'a>(
        &'a self,
        other: &'a HashSet<T, C>,
    ) -> SymmetricDifference<'a, T, C> {
        SymmetricDifference {
            iter: self.difference(other).chain(other.difference(self)),
        }
    }
}

impl<T, C> HashSet<T, C>
where
    C: KeyComparer<T> + Default,
{
    /// Creates a new hash set using the default comparer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 0);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_comparer(C::default())
    }

    /// Creates a new hash set with the specified capacity using the default
    /// comparer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparer(capacity, C::default())
    }
}

impl<T, C> Default for HashSet<T, C>
where
    C: KeyComparer<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Enumerable for HashSet<T, C> {
    type Item<'a>
        = &'a T
    where
        Self: 'a;

    fn version(&self) -> Version {
        self.table.version()
    }

    fn next_live(&self, from: usize) -> Option<(usize, &T)> {
        self.table.next_live(from)
    }
}

/// A read-only lookup handle that accepts a borrowed view `Q` in place of
/// `T`.
///
/// Created by [`HashSet::alternate_view`] or [`AlternateLookup::as_view`].
pub struct AlternateView<'a, T, C, Q: ?Sized> {
    set: &'a HashSet<T, C>,
    _view: PhantomData<fn(&Q)>,
}

impl<T, C, Q: ?Sized> Clone for AlternateView<'_, T, C, Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C, Q: ?Sized> Copy for AlternateView<'_, T, C, Q> {}

impl<'a, T, C, Q> AlternateView<'a, T, C, Q>
where
    Q: ?Sized,
    C: AlternateComparer<Q, T>,
{
    /// Returns the set this handle looks into.
    pub fn set(&self) -> &'a HashSet<T, C> {
        self.set
    }

    /// Returns `true` if the set contains the value denoted by `view`.
    pub fn contains(&self, view: &Q) -> bool {
        self.get(view).is_some()
    }

    /// Returns the stored value denoted by `view`.
    pub fn get(&self, view: &Q) -> Option<&'a T> {
        let comparer = &self.set.comparer;
        let hash = comparer.hash_alternate(view);
        self.set
            .table
            .find(hash, |v| comparer.eq_alternate(view, v))
    }
}

/// A lookup handle that accepts a borrowed view `Q` in place of `T`.
///
/// Created by [`HashSet::alternate_lookup`].
pub struct AlternateLookup<'a, T, C, Q: ?Sized> {
    set: &'a mut HashSet<T, C>,
    _view: PhantomData<fn(&Q)>,
}

impl<T, C, Q> AlternateLookup<'_, T, C, Q>
where
    Q: ?Sized,
    C: AlternateComparer<Q, T>,
{
    /// Returns the set this handle looks into.
    pub fn set(&self) -> &HashSet<T, C> {
        self.set
    }

    /// Reborrows this handle as a read-only [`AlternateView`].
    pub fn as_view(&self) -> AlternateView<'_, T, C, Q> {
        AlternateView {
            set: self.set,
            _view: PhantomData,
        }
    }

    /// Returns `true` if the set contains the value denoted by `view`.
    pub fn contains(&self, view: &Q) -> bool {
        self.as_view().contains(view)
    }

    /// Returns the stored value denoted by `view`.
    pub fn get(&self, view: &Q) -> Option<&T> {
        self.as_view().get(view)
    }

    /// Inserts the value denoted by `view`, converting it to an owned value
    /// only if it is not already present. Returns whether it was inserted.
    pub fn insert(&mut self, view: &Q) -> bool {
        let comparer = &self.set.comparer;
        let hash = comparer.hash_alternate(view);
        match self
            .set
            .table
            .entry(hash, |v| comparer.eq_alternate(view, v))
        {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(comparer.to_key(view));
                true
            }
        }
    }

    /// Removes the value denoted by `view`. Returns whether it was present.
    pub fn remove(&mut self, view: &Q) -> bool {
        self.take(view).is_some()
    }

    /// Removes and returns the value denoted by `view`.
    pub fn take(&mut self, view: &Q) -> Option<T> {
        let comparer = &self.set.comparer;
        let hash = comparer.hash_alternate(view);
        self.set
            .table
            .remove(hash, |v| comparer.eq_alternate(view, v))
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A consuming iterator over the values of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, C> IntoIterator for HashSet<T, C> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a HashSet<T, C> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> FromIterator<T> for HashSet<T, C>
where
    C: KeyComparer<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = HashSet::new();
        set.extend(iter);
        set
    }
}

impl<T, C> Extend<T> for HashSet<T, C>
where
    C: KeyComparer<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

/// An iterator over the union of two sets.
pub struct Union<'a, T, C> {
    iter: Iter<'a, T>,
    other_iter: Iter<'a, T>,
    set: &'a HashSet<T, C>,
}

impl<'a, T, C> Iterator for Union<'a, T, C>
where
    C: KeyComparer<T>,
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
pub struct Intersection<'a, T, C> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, C>,
}

impl<'a, T, C> Iterator for Intersection<'a, T, C>
where
    C: KeyComparer<T>,
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
pub struct Difference<'a, T, C> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, C>,
}

impl<'a, T, C> Iterator for Difference<'a, T, C>
where
    C: KeyComparer<T>,
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
pub struct SymmetricDifference<'a, T, C> {
    iter: core::iter::Chain<Difference<'a, T, C>, Difference<'a, T, C>>,
}

impl<'a, T, C> Iterator for SymmetricDifference<'a, T, C>
where
    C: KeyComparer<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
