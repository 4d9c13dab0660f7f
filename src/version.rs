//! Structural versioning and invalidating enumeration.
//!
//! Every container bumps its [`Version`] on each structural mutation. An
//! [`Enumerator`] is a cursor that holds no borrow of its container: it
//! captures the version when created and compares it on every step, so a
//! container may be mutated while an enumerator exists, and the enumerator
//! reports [`Error::CollectionModified`] on its next step instead of reading
//! a changed layout.
//!
//! Invalidation is deliberately coarse: any bump invalidates, even one that
//! could not affect the remaining traversal.

use core::fmt;
use core::marker::PhantomData;

use crate::error::Error;

/// A structural version stamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Version(u64);

impl Version {
    /// Advances to the next version.
    #[inline]
    pub(crate) fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// A container that can be walked by an [`Enumerator`].
///
/// Positions are opaque slot indices; `next_live(from)` returns the first
/// live element at or after `from` together with its position.
pub trait Enumerable {
    /// The element type yielded for a borrow of the container.
    type Item<'a>
    where
        Self: 'a;

    /// Returns the container's current structural version.
    fn version(&self) -> Version;

    /// Returns the first live element at a position `>= from`.
    fn next_live(&self, from: usize) -> Option<(usize, Self::Item<'_>)>;
}

/// Lifecycle of an [`Enumerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumeratorState {
    /// Created, not yet advanced.
    Created,
    /// Has yielded at least one element.
    Iterating,
    /// Walked past the last element.
    Exhausted,
    /// Observed a structural change; every further step fails.
    Invalidated,
}

/// A detached cursor over an [`Enumerable`] container.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use prime_hash::Error;
/// use prime_hash::OrderedSet;
///
/// let mut set: OrderedSet<i32> = OrderedSet::new();
/// set.insert(1);
/// set.insert(2);
///
/// let mut cursor = set.enumerator();
/// assert_eq!(cursor.move_next(&set), Ok(Some(&1)));
///
/// set.insert(3);
/// assert_eq!(cursor.move_next(&set), Err(Error::CollectionModified));
/// assert_eq!(cursor.move_next(&set), Err(Error::CollectionModified));
/// # }
/// ```
pub struct Enumerator<C: ?Sized> {
    captured: Version,
    position: usize,
    state: EnumeratorState,
    _source: PhantomData<fn(&C)>,
}

impl<C: ?Sized> Clone for Enumerator<C> {
    fn clone(&self) -> Self {
        Self {
            captured: self.captured,
            position: self.position,
            state: self.state,
            _source: PhantomData,
        }
    }
}

impl<C: ?Sized> fmt::Debug for Enumerator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerator")
            .field("captured", &self.captured)
            .field("position", &self.position)
            .field("state", &self.state)
            .finish()
    }
}

impl<C: Enumerable + ?Sized> Enumerator<C> {
    /// Creates an enumerator positioned before the first element of `source`.
    pub fn new(source: &C) -> Self {
        Self {
            captured: source.version(),
            position: 0,
            state: EnumeratorState::Created,
            _source: PhantomData,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> EnumeratorState {
        self.state
    }

    /// Advances and returns the next element, or `None` once exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionModified`] if `source` changed structurally
    /// since this enumerator was created or last reset. The enumerator stays
    /// invalidated afterwards.
    pub fn move_next<'a>(&mut self, source: &'a C) -> Result<Option<C::Item<'a>>, Error> {
        if self.state == EnumeratorState::Invalidated {
            return Err(Error::CollectionModified);
        }

        if source.version() != self.captured {
            self.state = EnumeratorState::Invalidated;
            return Err(Error::CollectionModified);
        }

        if self.state == EnumeratorState::Exhausted {
            return Ok(None);
        }

        match source.next_live(self.position) {
            Some((position, item)) => {
                self.position = position + 1;
                self.state = EnumeratorState::Iterating;
                Ok(Some(item))
            }
            None => {
                self.state = EnumeratorState::Exhausted;
                Ok(None)
            }
        }
    }

    /// Rewinds to the start of `source` and captures its current version.
    pub fn reset(&mut self, source: &C) {
        *self = Self::new(source);
    }
}
