//! Provide [`ForceEq`], a best-effort equality for arbitrary values.

use alloc::string::String;
use core::any::type_name;
use core::fmt::{self, Debug};
use core::hash::{Hash, Hasher};
use core::ptr;

// -----------------------------------------------------------------------------
// Dump

/// Builds the structural dump used by the [`EqStrategy::Dump`] fallback.
///
/// The dump is the static type name followed by the pretty [`Debug`] output.
///
/// This performs a full traversal of `value` and allocates, it should not be
/// used on a hot path. Types whose `Debug` output is not deterministic
/// (pointer addresses, hash-ordered containers) produce unstable dumps, two
/// equal values may then compare unequal.
///
/// # Examples
///
/// ```
/// use vc_identity::dump;
///
/// #[derive(Debug)]
/// struct Foo { a: u8 }
///
/// let text = dump(&Foo { a: 1 });
/// assert!(text.ends_with(":: Foo {\n    a: 1,\n}"));
/// ```
pub fn dump<V: Debug + ?Sized>(value: &V) -> String {
    log::trace!("building structural dump of `{}`", type_name::<V>());
    alloc::format!("{} :: {:#?}", type_name::<V>(), value)
}

// -----------------------------------------------------------------------------
// Strategy

/// The comparison a [`ForceEq`] was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqStrategy {
    /// The value's own [`PartialEq`].
    Native,
    /// The value's own [`PartialEq`] and [`Hash`].
    Hashable,
    /// Comparison of structural dumps, see [`dump`].
    Dump,
    /// A user supplied comparison function.
    Custom,
}

enum Compare<V> {
    Native(fn(&V, &V) -> bool),
    Hashable {
        eq: fn(&V, &V) -> bool,
        hash: fn(&V, &mut dyn Hasher),
    },
    Dump(fn(&V) -> String),
    Custom(fn(&V, &V) -> bool),
}

// #26925
impl<V> Clone for Compare<V> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Compare<V> {}

fn hash_native<V: Hash>(value: &V, mut state: &mut dyn Hasher) {
    value.hash(&mut state);
}

// -----------------------------------------------------------------------------
// ForceEq

/// A value paired with the way it should be compared.
///
/// Rust cannot ask at runtime whether a type implements [`PartialEq`], so the
/// capability is selected where the concrete type is known:
///
/// - [`ForceEq::new`] for `PartialEq` types,
/// - [`ForceEq::hashable`] for `Eq + Hash` types,
/// - [`ForceEq::dumped`] for everything that implements [`Debug`],
/// - [`ForceEq::with_eq`] for a custom comparison.
///
/// Wrappers only compare equal when built with the same strategy.
///
/// # Examples
///
/// ```
/// use vc_identity::ForceEq;
///
/// // not `PartialEq`
/// #[derive(Debug)]
/// struct Opaque(u32);
///
/// assert!(ForceEq::dumped(Opaque(1)) == ForceEq::dumped(Opaque(1)));
/// assert!(ForceEq::dumped(Opaque(1)) != ForceEq::dumped(Opaque(2)));
///
/// assert!(ForceEq::new(0.5_f32) == ForceEq::new(0.5_f32));
/// ```
pub struct ForceEq<V> {
    value: V,
    compare: Compare<V>,
}

impl<V: PartialEq> ForceEq<V> {
    /// Compares through the value's own `PartialEq`.
    #[inline]
    pub fn new(value: V) -> Self {
        Self {
            value,
            compare: Compare::Native(<V as PartialEq>::eq),
        }
    }
}

impl<V: Eq + Hash> ForceEq<V> {
    /// Compares and hashes through the value's own `Eq` and `Hash`.
    #[inline]
    pub fn hashable(value: V) -> Self {
        Self {
            value,
            compare: Compare::Hashable {
                eq: <V as PartialEq>::eq,
                hash: hash_native::<V>,
            },
        }
    }
}

impl<V: Debug> ForceEq<V> {
    /// Compares structural dumps, see [`dump`].
    #[inline]
    pub fn dumped(value: V) -> Self {
        Self {
            value,
            compare: Compare::Dump(dump::<V>),
        }
    }
}

impl<V> ForceEq<V> {
    /// Compares with `is_equal`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_identity::ForceEq;
    ///
    /// fn same_class(a: &i32, b: &i32) -> bool {
    ///     a % 3 == b % 3
    /// }
    ///
    /// let a = ForceEq::with_eq(10, same_class);
    /// let b = ForceEq::with_eq(4, same_class);
    /// assert!(a == b);
    /// assert!(a != ForceEq::new(10));
    /// ```
    #[inline]
    pub fn with_eq(value: V, is_equal: fn(&V, &V) -> bool) -> Self {
        Self {
            value,
            compare: Compare::Custom(is_equal),
        }
    }

    /// Returns a reference to the wrapped value.
    #[inline(always)]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns a mutable reference to the wrapped value.
    #[inline(always)]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Extracts the wrapped value.
    #[inline(always)]
    pub fn into_inner(self) -> V {
        self.value
    }

    /// Returns the comparison this wrapper was built with.
    #[inline]
    pub fn strategy(&self) -> EqStrategy {
        match self.compare {
            Compare::Native(_) => EqStrategy::Native,
            Compare::Hashable { .. } => EqStrategy::Hashable,
            Compare::Dump(_) => EqStrategy::Dump,
            Compare::Custom(_) => EqStrategy::Custom,
        }
    }

    /// Compares `self` and `other`.
    ///
    /// Wrappers built with different strategies, or with different custom
    /// functions, are never equal.
    pub fn is_equal(&self, other: &Self) -> bool {
        match (self.compare, other.compare) {
            (Compare::Native(eq), Compare::Native(_))
            | (Compare::Hashable { eq, .. }, Compare::Hashable { .. }) => {
                eq(&self.value, &other.value)
            }
            (Compare::Custom(eq), Compare::Custom(other_eq)) => {
                ptr::fn_addr_eq(eq, other_eq) && eq(&self.value, &other.value)
            }
            (Compare::Dump(dump), Compare::Dump(_)) => dump(&self.value) == dump(&other.value),
            _ => false,
        }
    }

    /// Returns the structural dump if this wrapper compares by dump.
    pub fn dump(&self) -> Option<String> {
        match self.compare {
            Compare::Dump(dump) => Some(dump(&self.value)),
            _ => None,
        }
    }

    /// Feeds the part of the value that takes part in equality into `state`.
    ///
    /// Only [`EqStrategy::Hashable`] and [`EqStrategy::Dump`] contribute,
    /// other strategies cannot hash consistently with their equality.
    pub(crate) fn hash_content(&self, mut state: &mut dyn Hasher) {
        match self.compare {
            Compare::Hashable { hash, .. } => hash(&self.value, state),
            Compare::Dump(dump) => dump(&self.value).hash(&mut state),
            Compare::Native(_) | Compare::Custom(_) => {}
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<V: PartialEq> From<V> for ForceEq<V> {
    #[inline]
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

impl<V> PartialEq for ForceEq<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl<V: Clone> Clone for ForceEq<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            compare: self.compare,
        }
    }
}

impl<V: Debug> Debug for ForceEq<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForceEq")
            .field("value", &self.value)
            .field("strategy", &self.strategy())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
