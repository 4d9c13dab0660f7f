//! A hash set that remembers insertion order.
//!
//! Removal shifts later elements down instead of leaving holes, so element
//! positions are always `0..len` in insertion order and can be used for
//! positional access. The shift is O(n).

use core::fmt::Debug;
use core::marker::PhantomData;
use core::mem;
use core::ops::Index;

use crate::comparer::AlternateComparer;
use crate::comparer::DefaultComparer;
use crate::comparer::KeyComparer;
use crate::error::Error;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::version::Enumerable;
use crate::version::Enumerator;
use crate::version::Version;

/// An insertion-ordered hash set with positional access.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use prime_hash::OrderedSet;
///
/// let mut set: OrderedSet<&str> = OrderedSet::new();
/// set.insert("b");
/// set.insert("a");
/// set.insert("c");
/// set.remove(&"a");
///
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["b", "c"]);
/// assert_eq!(set[1], "c");
/// assert_eq!(set.get_index_of(&"c"), Some(1));
/// # }
/// ```
#[derive(Clone)]
pub struct OrderedSet<T, C = DefaultComparer> {
    table: HashTable<T>,
    comparer: C,
}

/// Equality ignores order, matching the set semantics.
impl<T, C> PartialEq for OrderedSet<T, C>
where
    C: KeyComparer<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T, C> Eq for OrderedSet<T, C> where C: KeyComparer<T> {}

impl<T, C> Debug for OrderedSet<T, C>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> OrderedSet<T, C> {
    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the set can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the set's comparer.
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Removes all elements, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the set to hold at least `capacity` elements and returns the
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

    /// Shrinks the capacity of the set as much as possible.
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

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index < self.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn get_at(&self, index: usize) -> Result<&T, Error> {
        self.check_index(index)?;
        self.table.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// down by one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, Error> {
        let len = self.len();
        self.table
            .shift_remove_index(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Returns the first element.
    pub fn first(&self) -> Option<&T> {
        self.table.get(0)
    }

    /// Returns the last element.
    pub fn last(&self) -> Option<&T> {
        self.table.get(self.len().checked_sub(1)?)
    }

    /// Returns an iterator over the elements in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields all elements in insertion order.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the elements specified by the predicate, preserving the
    /// order of the survivors.
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table.retain_ordered(|v| f(&*v));
    }

    /// Removes every element matching the predicate and returns how many
    /// were removed. The survivors keep their relative order.
    pub fn remove_where(&mut self, mut f: impl FnMut(&T) -> bool) -> usize {
        self.table.retain_ordered(|v| !f(&*v))
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

impl<T, C> OrderedSet<T, C>
where
    C: KeyComparer<T>,
{
    /// Creates an empty set with the given comparer.
    pub fn with_comparer(comparer: C) -> Self {
        Self::with_capacity_and_comparer(0, comparer)
    }

    /// Creates an empty set with the specified capacity and comparer.
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

    /// Appends `value` if it is not already present. Returns whether it was
    /// inserted.
    pub fn insert(&mut self, value: T) -> bool {
        self.insert_full(value).1
    }

    /// Appends `value` if it is not already present. Returns its position
    /// and whether it was inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::OrderedSet;
    ///
    /// let mut set: OrderedSet<char> = OrderedSet::new();
    /// assert_eq!(set.insert_full('a'), (0, true));
    /// assert_eq!(set.insert_full('b'), (1, true));
    /// assert_eq!(set.insert_full('a'), (0, false));
    /// # }
    /// ```
    pub fn insert_full(&mut self, value: T) -> (usize, bool) {
        let hash = self.comparer.hash(&value);
        match self.table.entry(hash, |v| self.comparer.eq(v, &value)) {
            Entry::Occupied(entry) => (entry.index(), false),
            Entry::Vacant(entry) => (entry.insert_full(value).0, true),
        }
    }

    /// Inserts `value` at `index`, shifting the elements at and after it up
    /// by one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`, or
    /// [`Error::DuplicateKey`] if `value` is already present. The set is
    /// unchanged on error.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), Error> {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let hash = self.comparer.hash(&value);
        if self
            .table
            .find_index(hash, |v| self.comparer.eq(v, &value))
            .is_some()
        {
            return Err(Error::DuplicateKey);
        }
        self.table.shift_insert(index, hash, value);
        Ok(())
    }

    /// Replaces the element at `index` with `value` and returns the old
    /// element.
    ///
    /// If `value` is equal to the element already at `index`, it is
    /// overwritten in place; this is not a structural change. Otherwise the
    /// old element is no longer found, and `value` is found at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`, or
    /// [`Error::DuplicateKey`] if `value` is equal to an element at another
    /// position. The set is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use prime_hash::Error;
    /// use prime_hash::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = (1..=4).collect();
    /// assert_eq!(set.set_at(1, 20), Ok(2));
    /// assert!(!set.contains(&2));
    /// assert_eq!(set.get_index_of(&20), Some(1));
    ///
    /// assert_eq!(set.set_at(0, 3), Err(Error::DuplicateKey));
    /// assert_eq!(set.set_at(9, 5), Err(Error::IndexOutOfRange { index: 9, len: 4 }));
    /// # }
    /// ```
    pub fn set_at(&mut self, index: usize, value: T) -> Result<T, Error> {
        self.check_index(index)?;
        let hash = self.comparer.hash(&value);
        match self.table.find_index(hash, |v| self.comparer.eq(v, &value)) {
            Some(existing) if existing == index => match self.table.get_mut(index) {
                Some(slot) => Ok(mem::replace(slot, value)),
                None => Err(Error::IndexOutOfRange {
                    index,
                    len: self.len(),
                }),
            },
            Some(_) => Err(Error::DuplicateKey),
            None => {
                let len = self.len();
                self.table
                    .replace_at(index, hash, value)
                    .ok_or(Error::IndexOutOfRange { index, len })
            }
        }
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.get_index_of(value).is_some()
    }

    /// Returns the stored element equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.table.get(self.get_index_of(value)?)
    }

    /// Returns the position of `value`.
    pub fn get_index_of(&self, value: &T) -> Option<usize> {
        let hash = self.comparer.hash(value);
        self.table.find_index(hash, |v| self.comparer.eq(v, value))
    }

    /// Removes `value`, shifting later elements down by one. Returns whether
    /// it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.shift_remove_full(value).is_some()
    }

    /// Removes and returns the stored element equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.shift_remove_full(value).map(|(_, v)| v)
    }

    /// Removes the stored element equal to `value` and returns it with its
    /// former position.
    pub fn shift_remove_full(&mut self, value: &T) -> Option<(usize, T)> {
        let hash = self.comparer.hash(value);
        self.table.shift_remove(hash, |v| self.comparer.eq(v, value))
    }

    /// Returns a handle for looking elements up through the borrowed view
    /// `Q`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleComparer`] if the set's comparer has no
    /// consistent alternate form for `Q`.
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

    /// Returns a read-only handle for looking elements up through the
    /// borrowed view `Q`.
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
}

impl<T, C> OrderedSet<T, C>
where
    C: KeyComparer<T> + Default,
{
    /// Creates an empty set with the default comparer.
    pub fn new() -> Self {
        Self::with_comparer(C::default())
    }

    /// Creates an empty set with the specified capacity and the default
    /// comparer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparer(capacity, C::default())
    }
}

impl<T, C> Default for OrderedSet<T, C>
where
    C: KeyComparer<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Index<usize> for OrderedSet<T, C> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    fn index(&self, index: usize) -> &T {
        match self.table.get(index) {
            Some(value) => value,
            None => panic!(
                "index out of bounds: the len is {} but the index is {index}",
                self.len()
            ),
        }
    }
}

impl<T, C> Enumerable for OrderedSet<T, C> {
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

impl<T, C> FromIterator<T> for OrderedSet<T, C>
where
    C: KeyComparer<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<T, C> Extend<T> for OrderedSet<T, C>
where
    C: KeyComparer<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C> IntoIterator for OrderedSet<T, C> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedSet<T, C> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A read-only lookup handle that accepts a borrowed view `Q` in place of
/// `T`.
///
/// Created by [`OrderedSet::alternate_view`] or [`AlternateLookup::as_view`].
pub struct AlternateView<'a, T, C, Q: ?Sized> {
    set: &'a OrderedSet<T, C>,
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
    pub fn set(&self) -> &'a OrderedSet<T, C> {
        self.set
    }

    /// Returns the position of the element denoted by `view`.
    pub fn get_index_of(&self, view: &Q) -> Option<usize> {
        let comparer = &self.set.comparer;
        let hash = comparer.hash_alternate(view);
        self.set
            .table
            .find_index(hash, |v| comparer.eq_alternate(view, v))
    }

    /// Returns `true` if the set contains the element denoted by `view`.
    pub fn contains(&self, view: &Q) -> bool {
        self.get_index_of(view).is_some()
    }

    /// Returns the stored element denoted by `view`.
    pub fn get(&self, view: &Q) -> Option<&'a T> {
        self.set.table.get(self.get_index_of(view)?)
    }
}

/// A lookup handle that accepts a borrowed view `Q` in place of `T`.
///
/// Created by [`OrderedSet::alternate_lookup`].
pub struct AlternateLookup<'a, T, C, Q: ?Sized> {
    set: &'a mut OrderedSet<T, C>,
    _view: PhantomData<fn(&Q)>,
}

impl<T, C, Q> AlternateLookup<'_, T, C, Q>
where
    Q: ?Sized,
    C: AlternateComparer<Q, T>,
{
    /// Returns the set this handle looks into.
    pub fn set(&self) -> &OrderedSet<T, C> {
        self.set
    }

    /// Reborrows this handle as a read-only [`AlternateView`].
    pub fn as_view(&self) -> AlternateView<'_, T, C, Q> {
        AlternateView {
            set: self.set,
            _view: PhantomData,
        }
    }

    /// Returns the position of the element denoted by `view`.
    pub fn get_index_of(&self, view: &Q) -> Option<usize> {
        self.as_view().get_index_of(view)
    }

    /// Returns `true` if the set contains the element denoted by `view`.
    pub fn contains(&self, view: &Q) -> bool {
        self.as_view().contains(view)
    }

    /// Returns the stored element denoted by `view`.
    pub fn get(&self, view: &Q) -> Option<&T> {
        self.as_view().get(view)
    }

    /// Appends the element denoted by `view` if it is absent, converting it
    /// to an owned value only then. Returns its position and whether it was
    /// inserted.
    pub fn insert_full(&mut self, view: &Q) -> (usize, bool) {
        let comparer = &self.set.comparer;
        let hash = comparer.hash_alternate(view);
        match self
            .set
            .table
            .entry(hash, |v| comparer.eq_alternate(view, v))
        {
            Entry::Occupied(entry) => (entry.index(), false),
            Entry::Vacant(entry) => (entry.insert_full(comparer.to_key(view)).0, true),
        }
    }

    /// Appends the element denoted by `view` if it is absent. Returns whether
    /// it was inserted.
    pub fn insert(&mut self, view: &Q) -> bool {
        self.insert_full(view).1
    }

    /// Removes the element denoted by `view`, shifting later elements down.
    /// Returns whether it was present.
    pub fn remove(&mut self, view: &Q) -> bool {
        let comparer = &self.set.comparer;
        let hash = comparer.hash_alternate(view);
        self.set
            .table
            .shift_remove(hash, |v| comparer.eq_alternate(view, v))
            .is_some()
    }
}

/// An iterator over the elements of an `OrderedSet` in insertion order.
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

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A draining iterator over the elements of an `OrderedSet`.
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

impl<T> DoubleEndedIterator for Drain<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

/// A consuming iterator over the elements of an `OrderedSet`.
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

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::comparer::StringComparer;
    use crate::comparer::StringComparison;
    use crate::version::EnumeratorState;

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
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type SipSet<T> = OrderedSet<T, DefaultComparer<SipHashBuilder>>;

    fn items<T: Copy, C>(set: &OrderedSet<T, C>) -> Vec<T> {
        set.iter().copied().collect()
    }

    #[test]
    fn preserves_insertion_order() {
        let mut set: SipSet<i32> = OrderedSet::new();
        for v in [5, 3, 9, 1, 3, 5] {
            set.insert(v);
        }
        assert_eq!(items(&set), vec![5, 3, 9, 1]);
        assert_eq!(set.first(), Some(&5));
        assert_eq!(set.last(), Some(&1));
        assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), vec![1, 9, 3, 5]);
    }

    #[test]
    fn remove_shifts_positions() {
        let mut set: SipSet<i32> = (1..=10).collect();
        assert!(set.remove(&5));
        assert!(!set.remove(&5));
        set.table().assert_invariants();

        assert_eq!(items(&set), vec![1, 2, 3, 4, 6, 7, 8, 9, 10]);
        for (position, value) in set.iter().enumerate() {
            assert_eq!(set.get_index_of(value), Some(position));
        }
        assert_eq!(set.table().slots_in_use(), set.len());
    }

    #[test]
    fn ten_element_scenario() {
        let mut set: SipSet<i32> = OrderedSet::with_capacity(0);
        assert_eq!(set.capacity(), 0);
        for v in 1..=10 {
            set.insert(v);
            if v == 1 {
                assert_eq!(set.capacity(), 3);
            }
        }

        assert!(set.remove(&5));
        assert_eq!(set.set_at(3, 99), Ok(4));
        set.table().assert_invariants();

        assert!(set.contains(&99));
        assert!(!set.contains(&4));
        assert!(!set.contains(&5));
        assert_eq!(items(&set), vec![1, 2, 3, 99, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn set_at_same_value_keeps_version() {
        let mut set = OrderedSet::with_comparer(StringComparer::with_hasher(
            StringComparison::IgnoreAsciiCase,
            SipHashBuilder::default(),
        ));
        set.insert("alpha".to_string());
        set.insert("beta".to_string());

        let mut cursor = set.enumerator();
        assert_eq!(set.set_at(0, "ALPHA".to_string()), Ok("alpha".to_string()));
        assert_eq!(set[0], "ALPHA");
        assert_eq!(
            cursor.move_next(&set).map(|v| v.cloned()),
            Ok(Some("ALPHA".to_string()))
        );

        assert_eq!(set.set_at(0, "Beta".to_string()), Err(Error::DuplicateKey));
        assert_eq!(set[0], "ALPHA");
        assert_eq!(set.len(), 2);
        assert_eq!(cursor.state(), EnumeratorState::Iterating);
    }

    #[test]
    fn set_at_rejects_out_of_range() {
        let mut set: SipSet<i32> = (0..3).collect();
        assert_eq!(
            set.set_at(3, 7),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(items(&set), vec![0, 1, 2]);
    }

    #[test]
    fn set_at_relinks_every_position() {
        let mut set: SipSet<u32> = (0..50).collect();
        for index in 0..50 {
            let old = set.set_at(index, 1000 + index as u32).unwrap();
            assert_eq!(old, index as u32);
            assert!(!set.contains(&old));
            assert_eq!(set.get_index_of(&(1000 + index as u32)), Some(index));
        }
        set.table().assert_invariants();
    }

    #[test]
    fn insert_at_positions() {
        let mut set: SipSet<char> = ['a', 'c'].into_iter().collect();
        assert_eq!(set.insert_at(1, 'b'), Ok(()));
        assert_eq!(set.insert_at(3, 'd'), Ok(()));
        assert_eq!(set.insert_at(0, 'z'), Ok(()));
        assert_eq!(items(&set), vec!['z', 'a', 'b', 'c', 'd']);

        assert_eq!(set.insert_at(0, 'c'), Err(Error::DuplicateKey));
        assert_eq!(
            set.insert_at(9, 'q'),
            Err(Error::IndexOutOfRange { index: 9, len: 5 })
        );
        assert_eq!(set.len(), 5);
        for (position, value) in set.iter().enumerate() {
            assert_eq!(set.get_index_of(value), Some(position));
        }
        set.table().assert_invariants();
    }

    #[test]
    fn get_and_remove_at() {
        let mut set: SipSet<i32> = (10..15).collect();
        assert_eq!(set.get_at(2), Ok(&12));
        assert_eq!(
            set.get_at(5),
            Err(Error::IndexOutOfRange { index: 5, len: 5 })
        );

        assert_eq!(set.remove_at(0), Ok(10));
        assert_eq!(set.remove_at(3), Ok(14));
        assert_eq!(
            set.remove_at(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(items(&set), vec![11, 12, 13]);
    }

    #[test]
    fn take_and_shift_remove_full() {
        let mut set: SipSet<i32> = (0..5).collect();
        assert_eq!(set.shift_remove_full(&2), Some((2, 2)));
        assert_eq!(set.take(&4), Some(4));
        assert_eq!(set.take(&4), None);
        assert_eq!(items(&set), vec![0, 1, 3]);
    }

    #[test]
    fn retain_keeps_order() {
        let mut set: SipSet<i32> = (0..20).collect();
        set.retain(|v| v % 3 != 0);
        assert_eq!(set.remove_where(|v| *v > 10), 6);
        assert_eq!(items(&set), vec![1, 2, 4, 5, 7, 8, 10]);
        set.table().assert_invariants();

        set.insert(3);
        assert_eq!(set.last(), Some(&3));
    }

    #[test]
    #[cfg(feature = "std")]
    fn panicking_retain_leaves_set_intact() {
        use std::panic::AssertUnwindSafe;
        use std::panic::catch_unwind;

        let mut set: SipSet<u32> = (0..20).collect();
        let result = catch_unwind(AssertUnwindSafe(|| {
            set.retain(|&v| {
                if v == 15 {
                    panic!("predicate failed");
                }
                v % 2 == 0
            })
        }));
        assert!(result.is_err());

        set.table().assert_invariants();
        assert_eq!(items(&set), (0..20).collect::<Vec<_>>());
        for v in 0..20 {
            assert!(set.contains(&v));
            assert_eq!(set.get_index_of(&v), Some(v as usize));
        }

        assert_eq!(set.remove_where(|v| v % 2 == 1), 10);
        assert_eq!(items(&set), (0..20).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn removing_everything_then_refilling() {
        let mut set: SipSet<i32> = (0..8).collect();
        for v in 0..8 {
            assert!(set.remove(&v));
        }
        assert!(set.is_empty());
        assert_eq!(set.first(), None);

        set.extend([3, 1, 2]);
        assert_eq!(items(&set), vec![3, 1, 2]);
    }

    #[test]
    fn drain_and_into_iter_in_order() {
        let mut set: SipSet<i32> = [4, 2, 6].into_iter().collect();
        assert_eq!(set.drain().collect::<Vec<_>>(), vec![4, 2, 6]);
        assert!(set.is_empty());

        set.extend([9, 8]);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![9, 8]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: SipSet<i32> = [1, 2, 3].into_iter().collect();
        let b: SipSet<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(alloc::format!("{a:?}"), "{1, 2, 3}");
    }

    #[test]
    fn alternate_lookup_positions() {
        let mut set: OrderedSet<String, _> = OrderedSet::with_comparer(StringComparer::with_hasher(
            StringComparison::Ordinal,
            SipHashBuilder::default(),
        ));
        set.insert("x".to_string());

        let mut lookup = set.alternate_lookup::<str>().unwrap();
        assert_eq!(lookup.insert_full("y"), (1, true));
        assert_eq!(lookup.insert_full("x"), (0, false));
        assert!(lookup.insert("z"));
        assert_eq!(lookup.get_index_of("z"), Some(2));
        assert_eq!(lookup.get("y").map(String::as_str), Some("y"));
        assert!(lookup.remove("x"));
        assert!(!lookup.contains("x"));
        assert_eq!(lookup.get_index_of("z"), Some(1));
        assert_eq!(lookup.set().len(), 2);
    }

    #[test]
    fn enumerator_invalidation() {
        let mut set: SipSet<i32> = (0..3).collect();

        let mut cursor = set.enumerator();
        assert_eq!(cursor.move_next(&set), Ok(Some(&0)));
        set.remove(&2);
        assert_eq!(cursor.move_next(&set), Err(Error::CollectionModified));

        let mut cursor = set.enumerator();
        set.ensure_capacity(1).unwrap();
        assert_eq!(cursor.move_next(&set), Err(Error::CollectionModified));

        let mut cursor = set.enumerator();
        set.shrink_to_fit();
        assert_eq!(cursor.move_next(&set), Err(Error::CollectionModified));

        cursor.reset(&set);
        assert_eq!(cursor.move_next(&set), Ok(Some(&0)));
        assert_eq!(cursor.move_next(&set), Ok(Some(&1)));
        assert_eq!(cursor.move_next(&set), Ok(None));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_out_of_bounds_panics() {
        let set: SipSet<i32> = (0..2).collect();
        let _ = set[2];
    }
}
