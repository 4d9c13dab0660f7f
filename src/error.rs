use core::fmt;

/// The broad category an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A precondition on an argument was violated (bad position, capacity).
    InvalidArgument,
    /// The operation required a unique key, and the key was already present.
    Conflict,
    /// A detached [`Enumerator`](crate::Enumerator) observed a structural
    /// change to its container.
    InvalidatedEnumerator,
    /// The container's comparer has no alternate form for the requested view
    /// type.
    IncompatibleComparer,
}

/// Errors reported by the containers in this crate.
///
/// Every operation that returns an `Err` leaves its container exactly as it
/// was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// A position was outside `0..len` (or `0..=len` for insertion).
    IndexOutOfRange {
        /// The position that was requested.
        index: usize,
        /// The length of the container at the time of the call.
        len: usize,
    },
    /// A shrink request asked for less room than the live elements need.
    CapacityBelowLength {
        /// The requested capacity.
        requested: usize,
        /// The number of live elements.
        len: usize,
    },
    /// The requested capacity exceeds the largest supported prime capacity.
    CapacityOverflow,
    /// A key equal to the one supplied is already present.
    DuplicateKey,
    /// The container was structurally modified after the enumerator captured
    /// its version.
    CollectionModified,
    /// The container's comparer cannot hash or compare the requested view
    /// type consistently with its owned keys.
    IncompatibleComparer,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IndexOutOfRange { .. }
            | Error::CapacityBelowLength { .. }
            | Error::CapacityOverflow => ErrorKind::InvalidArgument,
            Error::DuplicateKey => ErrorKind::Conflict,
            Error::CollectionModified => ErrorKind::InvalidatedEnumerator,
            Error::IncompatibleComparer => ErrorKind::IncompatibleComparer,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for length {len}")
            }
            Error::CapacityBelowLength { requested, len } => write!(
                f,
                "requested capacity {requested} is smaller than the current length {len}"
            ),
            Error::CapacityOverflow => {
                f.write_str("the computed capacity exceeded the collection's maximum")
            }
            Error::DuplicateKey => f.write_str("an element with the same key already exists"),
            Error::CollectionModified => {
                f.write_str("collection was modified; enumeration may not continue")
            }
            Error::IncompatibleComparer => f.write_str(
                "the collection's comparer is not compatible with the requested alternate key type",
            ),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            Error::IndexOutOfRange { index: 3, len: 2 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(Error::CapacityOverflow.kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::DuplicateKey.kind(), ErrorKind::Conflict);
        assert_eq!(
            Error::CollectionModified.kind(),
            ErrorKind::InvalidatedEnumerator
        );
        assert_eq!(
            Error::IncompatibleComparer.kind(),
            ErrorKind::IncompatibleComparer
        );
    }

    #[test]
    fn display_mentions_arguments() {
        let message = Error::IndexOutOfRange { index: 7, len: 4 }.to_string();
        assert!(message.contains('7'));
        assert!(message.contains('4'));

        let message = Error::CapacityBelowLength {
            requested: 1,
            len: 10,
        }
        .to_string();
        assert!(message.contains("10"));
    }
}
