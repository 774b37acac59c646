//! Provide [`IdentityToken`], an opaque comparable stand-in for a value.

use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};
use core::fmt::{self, Debug};
use core::hash::{BuildHasher, Hash, Hasher};

use crate::hash::FixedHashState;
use crate::{EqStrategy, ForceEq, HashTokenWrapper};

// -----------------------------------------------------------------------------
// Erased identity

trait ErasedIdentity: Any + Send + Sync {
    fn erased_eq(&self, other: &dyn ErasedIdentity) -> bool;

    fn erased_hash(&self, state: &mut dyn Hasher);

    fn erased_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<V: Debug + Send + Sync + 'static> ErasedIdentity for ForceEq<V> {
    fn erased_eq(&self, other: &dyn ErasedIdentity) -> bool {
        let other: &dyn Any = other;
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.is_equal(other))
    }

    #[inline]
    fn erased_hash(&self, state: &mut dyn Hasher) {
        self.hash_content(state);
    }

    fn erased_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.value(), f)
    }
}

/// A pre-built structural dump.
///
/// The dump already starts with the type name of the dumped value,
/// so comparing dumps also compares types.
struct DumpIdentity(String);

impl ErasedIdentity for DumpIdentity {
    fn erased_eq(&self, other: &dyn ErasedIdentity) -> bool {
        let other: &dyn Any = other;
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.0 == other.0)
    }

    #[inline]
    fn erased_hash(&self, mut state: &mut dyn Hasher) {
        self.0.hash(&mut state);
    }

    fn erased_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An allocation, compared by address.
///
/// The handle is kept alive by the token, so the address cannot be reused
/// while the token exists.
struct InstanceIdentity<T: ?Sized>(Arc<T>);

impl<T: ?Sized> InstanceIdentity<T> {
    #[inline(always)]
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T: ?Sized + Send + Sync + 'static> ErasedIdentity for InstanceIdentity<T> {
    fn erased_eq(&self, other: &dyn ErasedIdentity) -> bool {
        let other: &dyn Any = other;
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.addr() == other.addr())
    }

    #[inline]
    fn erased_hash(&self, mut state: &mut dyn Hasher) {
        self.addr().hash(&mut state);
    }

    fn erased_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance {:#x}", self.addr())
    }
}

// -----------------------------------------------------------------------------
// TypeToken

/// The identity of a type.
///
/// Every closure has its own unnamed type, so the `TypeToken` of a closure
/// is the identity of the closure definition: reusing one closure always
/// yields equal tokens, two closures never compare equal even when their
/// captured values coincide.
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Returns the token of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the type.
    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the name of the type, for diagnostics only.
    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeToken {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {}", self.name)
    }
}

// -----------------------------------------------------------------------------
// IdentityToken

/// An ordered token list, shared between clones.
pub type Tokens = Arc<[IdentityToken]>;

#[derive(PartialEq, Eq, Hash)]
struct Nested(Tokens);

impl Debug for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// An opaque, type-erased value used only for equality and hashing.
///
/// Two tokens are equal when they hold the same dynamic type **and** equal
/// content. Content is compared with the [`ForceEq`] strategy the token was
/// built with, tokens built from a dump compare their dump strings.
///
/// The hash is computed once, at construction, with [`FixedHashState`].
///
/// # Examples
///
/// ```
/// use vc_identity::IdentityToken;
///
/// assert_eq!(IdentityToken::of(1_u32), IdentityToken::of(1_u32));
/// assert_ne!(IdentityToken::of(1_u32), IdentityToken::of(2_u32));
///
/// // same content, different dynamic types
/// assert_ne!(IdentityToken::of(1_u32), IdentityToken::of(1_u64));
///
/// let f = |x: i32| x + 1;
/// let g = |x: i32| x + 1;
/// assert_eq!(IdentityToken::closure(&f), IdentityToken::closure(&f));
/// assert_ne!(IdentityToken::closure(&f), IdentityToken::closure(&g));
/// ```
#[derive(Clone)]
pub struct IdentityToken {
    hash: u64,
    inner: Arc<dyn ErasedIdentity>,
}

impl IdentityToken {
    fn from_erased<E: ErasedIdentity>(inner: E) -> Self {
        let mut hasher = FixedHashState.build_hasher();
        TypeId::of::<E>().hash(&mut hasher);
        inner.erased_hash(&mut hasher);

        Self {
            hash: hasher.finish(),
            inner: Arc::new(inner),
        }
    }

    /// Creates a token compared and hashed by the value's own `Eq + Hash`.
    #[inline]
    pub fn of<V>(value: V) -> Self
    where
        V: Eq + Hash + Debug + Send + Sync + 'static,
    {
        Self::from_erased(ForceEq::hashable(value))
    }

    /// Creates a token compared by the value's own `PartialEq`.
    ///
    /// The token hash only covers the dynamic type of the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_identity::IdentityToken;
    ///
    /// assert_eq!(IdentityToken::equatable(0.5_f32), IdentityToken::equatable(0.5_f32));
    /// assert_ne!(IdentityToken::equatable(0.5_f32), IdentityToken::equatable(1.5_f32));
    /// ```
    #[inline]
    pub fn equatable<V>(value: V) -> Self
    where
        V: PartialEq + Debug + Send + Sync + 'static,
    {
        Self::from_erased(ForceEq::new(value))
    }

    /// Creates a token from the structural dump of `value`, see [`dump`](crate::dump).
    ///
    /// The dump is built once.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_identity::IdentityToken;
    ///
    /// // neither `PartialEq` nor `Hash`
    /// #[derive(Debug)]
    /// struct Opaque { id: u8 }
    ///
    /// let a = IdentityToken::dumped(&Opaque { id: 1 });
    /// let b = IdentityToken::dumped(&Opaque { id: 1 });
    /// assert_eq!(a, b);
    /// ```
    #[inline]
    pub fn dumped<V: Debug + ?Sized>(value: &V) -> Self {
        Self::from_erased(DumpIdentity(crate::dump(value)))
    }

    /// Erases an existing [`ForceEq`].
    ///
    /// Dump-compared wrappers are stored as their dump, so that
    /// `force(ForceEq::dumped(v)) == dumped(&v)`.
    pub fn force<V>(value: ForceEq<V>) -> Self
    where
        V: Debug + Send + Sync + 'static,
    {
        match value.strategy() {
            EqStrategy::Dump => Self::dumped(value.value()),
            _ => Self::from_erased(value),
        }
    }

    /// Creates the token of type `T`, see [`TypeToken`].
    #[inline]
    pub fn type_of<T: ?Sized + 'static>() -> Self {
        Self::of(TypeToken::of::<T>())
    }

    /// Creates the token of the closure (or any value) type of `_value`.
    #[inline]
    pub fn closure<F: ?Sized + 'static>(_value: &F) -> Self {
        Self::type_of::<F>()
    }

    /// Creates the token of the allocation behind `handle`.
    ///
    /// Clones of `handle` yield equal tokens, distinct allocations never do.
    /// The hash depends on the address, it is not stable across runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use vc_identity::IdentityToken;
    ///
    /// let a = Arc::new(1);
    /// let b = Arc::new(1);
    ///
    /// assert_eq!(IdentityToken::instance(a.clone()), IdentityToken::instance(a));
    /// assert_ne!(IdentityToken::instance(Arc::new(2)), IdentityToken::instance(b));
    /// ```
    #[inline]
    pub fn instance<T: ?Sized + Send + Sync + 'static>(handle: Arc<T>) -> Self {
        Self::from_erased(InstanceIdentity(handle))
    }

    /// Folds the token list of `wrapper` into a single token.
    #[inline]
    pub fn hashed<V>(wrapper: &HashTokenWrapper<V>) -> Self {
        Self::nested(wrapper.shared_tokens().clone())
    }

    /// Folds a token list into a single token.
    ///
    /// The result is never equal to a token outside nested lists.
    #[inline]
    pub fn nested(tokens: Tokens) -> Self {
        Self::of(Nested(tokens))
    }

    /// Returns the pre-computed hash.
    #[inline(always)]
    pub fn fixed_hash(&self) -> u64 {
        self.hash
    }
}

// -----------------------------------------------------------------------------
// Traits

impl PartialEq for IdentityToken {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && (Arc::ptr_eq(&self.inner, &other.inner) || self.inner.erased_eq(&*other.inner))
    }
}

impl Eq for IdentityToken {}

impl Hash for IdentityToken {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Debug for IdentityToken {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.erased_fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[allow(dead_code, reason = "only read through `Debug`")]
    #[derive(Debug)]
    struct Opaque {
        id: u32,
    }

    #[test]
    fn dynamic_types_must_match() {
        assert_ne!(IdentityToken::of(1_i32), IdentityToken::of(1_i64));
        assert_ne!(IdentityToken::equatable(1_i32), IdentityToken::of(1_i32));
        assert_ne!(IdentityToken::of("1"), IdentityToken::dumped(&"1"));
    }

    #[test]
    fn equatable_tokens_hash_by_type() {
        let a = IdentityToken::equatable(1.0_f64);
        let b = IdentityToken::equatable(2.0_f64);

        assert_eq!(a.fixed_hash(), b.fixed_hash());
        assert_ne!(a, b);
    }

    #[test]
    fn dump_tokens() {
        let a = IdentityToken::dumped(&Opaque { id: 1 });
        let b = IdentityToken::dumped(&Opaque { id: 1 });
        let c = IdentityToken::dumped(&Opaque { id: 2 });

        assert_eq!(a, b);
        assert_eq!(a.fixed_hash(), b.fixed_hash());
        assert_ne!(a, c);
        assert_eq!(IdentityToken::force(ForceEq::dumped(Opaque { id: 1 })), a);
    }

    #[test]
    fn closure_identity() {
        let offset = 3;
        let f = move |x: i32| x + offset;
        let g = move |x: i32| x + offset;

        let a = IdentityToken::closure(&f);
        assert_eq!(a, IdentityToken::closure(&f));
        assert_ne!(a, IdentityToken::closure(&g));
        assert_ne!(a, IdentityToken::type_of::<dyn Fn(i32) -> i32>());
    }

    #[test]
    fn instance_tokens() {
        let shared: Arc<dyn Fn(u8) -> u8 + Send + Sync> = Arc::new(|x: u8| x + 1);
        let other: Arc<dyn Fn(u8) -> u8 + Send + Sync> = Arc::new(|x: u8| x + 1);

        let a = IdentityToken::instance(shared.clone());
        assert_eq!(a, IdentityToken::instance(shared));
        assert_ne!(a, IdentityToken::instance(other));
        assert_ne!(a, IdentityToken::type_of::<dyn Fn(u8) -> u8 + Send + Sync>());
    }

    #[test]
    fn strategies_must_match() {
        fn always(_: &u8, _: &u8) -> bool {
            true
        }

        fn never(_: &u8, _: &u8) -> bool {
            false
        }

        let native = IdentityToken::force(ForceEq::new(2_u8));
        let custom = IdentityToken::force(ForceEq::with_eq(1_u8, always));

        assert_eq!(native.fixed_hash(), custom.fixed_hash());
        assert_ne!(native, custom);
        assert_ne!(custom, native);

        assert_eq!(custom, IdentityToken::force(ForceEq::with_eq(5_u8, always)));
        assert_ne!(custom, IdentityToken::force(ForceEq::with_eq(1_u8, never)));
        assert_ne!(IdentityToken::force(ForceEq::hashable(2_u8)), native);
    }

    #[test]
    fn nested_tokens() {
        let list: Tokens = vec![IdentityToken::of(1_u8), IdentityToken::of(2_u8)].into();
        let same: Tokens = vec![IdentityToken::of(1_u8), IdentityToken::of(2_u8)].into();
        let swapped: Tokens = vec![IdentityToken::of(2_u8), IdentityToken::of(1_u8)].into();

        assert_eq!(IdentityToken::nested(list.clone()), IdentityToken::nested(same));
        assert_ne!(IdentityToken::nested(list.clone()), IdentityToken::nested(swapped));
        assert_ne!(IdentityToken::nested(list), IdentityToken::of(1_u8));
    }

    #[test]
    fn debug_output() {
        let text = alloc::format!("{:?}", IdentityToken::of(42_u16));
        assert_eq!(text, "42");

        let text = alloc::format!("{:?}", IdentityToken::type_of::<u8>());
        assert_eq!(text, "type u8");
    }
}
