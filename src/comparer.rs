//! Pluggable hashing and equality.
//!
//! Containers are generic over a [`KeyComparer`], so the hot comparison path
//! is statically dispatched. A comparer that also implements
//! [`AlternateComparer<Q, K>`] lets callers look keys up through a borrowed
//! view `Q` (for example `str` for `String` keys) without building an owned
//! key first.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::hash::Hasher;

use equivalent::Equivalent;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`DefaultComparer`] and
        /// [`StringComparer`] when none is supplied.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`DefaultComparer`] and
        /// [`StringComparer`] when none is supplied.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder when neither `foldhash` nor `std` is enabled; a hasher
        /// builder must be supplied explicitly.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}

/// Hashing and equality over owned keys.
///
/// Implementations must be consistent: `eq(a, b)` implies
/// `hash(a) == hash(b)`, and both must be stable for as long as a key is
/// stored in a container.
pub trait KeyComparer<K: ?Sized> {
    /// Hashes `key`.
    fn hash(&self, key: &K) -> u64;

    /// Returns `true` if `a` and `b` are the same key.
    fn eq(&self, a: &K, b: &K) -> bool;
}

/// Hashing and equality between a borrowed view `Q` and owned keys `K`.
///
/// Implementations must agree with the owned form: whenever
/// `eq_alternate(view, key)` is `true`, `hash_alternate(view)` must equal
/// `hash(key)`.
pub trait AlternateComparer<Q: ?Sized, K>: KeyComparer<K> {
    /// Returns `false` if this particular comparer cannot honor the
    /// consistency contract for `Q`.
    ///
    /// Checked once when an alternate lookup handle is created.
    fn supports_alternate(&self) -> bool {
        true
    }

    /// Hashes `view` as if it were the owned key it stands for.
    fn hash_alternate(&self, view: &Q) -> u64;

    /// Returns `true` if `view` denotes `key`.
    fn eq_alternate(&self, view: &Q, key: &K) -> bool;

    /// Builds the owned key for `view`. Only called on insertion of a new
    /// key.
    fn to_key(&self, view: &Q) -> K;
}

/// Comparer for `Hash + Eq` keys built on a [`BuildHasher`].
///
/// Any `Q` that the key type can be looked up by through
/// [`Equivalent`] and that can be turned back into an owned `K` works as an
/// alternate view, for instance `str` for `String` or `[u8]` for `Vec<u8>`.
#[derive(Clone, Debug, Default)]
pub struct DefaultComparer<S = DefaultHashBuilder> {
    hash_builder: S,
}

impl<S> DefaultComparer<S> {
    /// Creates a comparer hashing with `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns the hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<S: Default> DefaultComparer<S> {
    /// Creates a comparer with a default-constructed hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> KeyComparer<K> for DefaultComparer<S>
where
    K: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }

    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

impl<Q, K, S> AlternateComparer<Q, K> for DefaultComparer<S>
where
    Q: ?Sized + Hash + Equivalent<K> + ToOwned<Owned = K>,
    K: Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash_alternate(&self, view: &Q) -> u64 {
        self.hash_builder.hash_one(view)
    }

    #[inline]
    fn eq_alternate(&self, view: &Q, key: &K) -> bool {
        view.equivalent(key)
    }

    fn to_key(&self, view: &Q) -> K {
        view.to_owned()
    }
}

/// How a [`StringComparer`] compares strings.
#[derive(Clone, Copy)]
pub enum StringComparison {
    /// Byte-for-byte comparison.
    Ordinal,
    /// Comparison ignoring ASCII case; non-ASCII bytes compare exactly.
    IgnoreAsciiCase,
    /// Caller-supplied functions over owned strings.
    ///
    /// These only know how to handle `String`s, so a comparer in this mode
    /// has no alternate form for `str`.
    Custom {
        /// Hash function.
        hash: fn(&String) -> u64,
        /// Equality function.
        eq: fn(&String, &String) -> bool,
    },
}

impl fmt::Debug for StringComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringComparison::Ordinal => f.write_str("Ordinal"),
            StringComparison::IgnoreAsciiCase => f.write_str("IgnoreAsciiCase"),
            StringComparison::Custom { .. } => f.write_str("Custom"),
        }
    }
}

/// Comparer for `String` keys with a selectable [`StringComparison`].
///
/// Implements `AlternateComparer<str, String>`, except in
/// [`StringComparison::Custom`] mode, where alternate lookups are refused.
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
/// set.insert("Hello".to_string());
/// assert!(set.contains(&"HELLO".to_string()));
///
/// let lookup = set.alternate_lookup::<str>().unwrap();
/// assert!(lookup.contains("hello"));
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct StringComparer<S = DefaultHashBuilder> {
    comparison: StringComparison,
    hash_builder: S,
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl StringComparer {
    /// Byte-for-byte comparer.
    pub fn ordinal() -> Self {
        Self::with_hasher(StringComparison::Ordinal, DefaultHashBuilder::default())
    }

    /// ASCII case-insensitive comparer.
    pub fn ignore_ascii_case() -> Self {
        Self::with_hasher(
            StringComparison::IgnoreAsciiCase,
            DefaultHashBuilder::default(),
        )
    }

    /// Comparer delegating to caller-supplied functions.
    pub fn custom(hash: fn(&String) -> u64, eq: fn(&String, &String) -> bool) -> Self {
        Self::with_hasher(
            StringComparison::Custom { hash, eq },
            DefaultHashBuilder::default(),
        )
    }
}

impl<S> StringComparer<S> {
    /// Creates a comparer with an explicit hasher builder.
    pub fn with_hasher(comparison: StringComparison, hash_builder: S) -> Self {
        Self {
            comparison,
            hash_builder,
        }
    }

    /// Returns the comparison mode.
    pub fn comparison(&self) -> StringComparison {
        self.comparison
    }
}

impl<S: BuildHasher> StringComparer<S> {
    fn hash_str(&self, s: &str) -> u64 {
        match self.comparison {
            StringComparison::Ordinal => self.hash_builder.hash_one(s),
            StringComparison::IgnoreAsciiCase => {
                let mut hasher = self.hash_builder.build_hasher();
                for byte in s.bytes() {
                    hasher.write_u8(byte.to_ascii_lowercase());
                }
                hasher.write_u8(0xff);
                hasher.finish()
            }
            StringComparison::Custom { hash, .. } => hash(&String::from(s)),
        }
    }

    fn eq_str(&self, a: &str, b: &str) -> bool {
        match self.comparison {
            StringComparison::Ordinal => a == b,
            StringComparison::IgnoreAsciiCase => a.eq_ignore_ascii_case(b),
            StringComparison::Custom { eq, .. } => eq(&String::from(a), &String::from(b)),
        }
    }
}

impl<S: BuildHasher> KeyComparer<String> for StringComparer<S> {
    fn hash(&self, key: &String) -> u64 {
        match self.comparison {
            StringComparison::Custom { hash, .. } => hash(key),
            _ => self.hash_str(key),
        }
    }

    fn eq(&self, a: &String, b: &String) -> bool {
        match self.comparison {
            StringComparison::Custom { eq, .. } => eq(a, b),
            _ => self.eq_str(a, b),
        }
    }
}

impl<S: BuildHasher> AlternateComparer<str, String> for StringComparer<S> {
    fn supports_alternate(&self) -> bool {
        !matches!(self.comparison, StringComparison::Custom { .. })
    }

    fn hash_alternate(&self, view: &str) -> u64 {
        self.hash_str(view)
    }

    fn eq_alternate(&self, view: &str, key: &String) -> bool {
        self.eq_str(view, key)
    }

    fn to_key(&self, view: &str) -> String {
        String::from(view)
    }
}
