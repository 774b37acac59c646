//! Statically typed paths.
//!
//! - [`Path`]: read-only.
//! - [`WritablePath`]: writable through `&mut Root`, value-owned.
//! - [`ReferenceWritablePath`]: writable through `&Root`, reference-owned.

use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::hash::{Hash, Hasher};

use vc_identity::{HashTokenWrapper, IdentityToken};

use crate::any_path::Identity;
use crate::{AnyPath, CastError, PathKind};

// -----------------------------------------------------------------------------
// Capabilities

/// A path that can be read.
pub trait Readable<R, V> {
    /// Returns the erased path.
    fn as_any_path(&self) -> &AnyPath<R, V>;

    /// Reads the value at the end of the path.
    #[inline]
    fn get(&self, root: &R) -> V {
        self.as_any_path().get(root)
    }

    /// Returns the static capability of the path type.
    fn static_kind(&self) -> PathKind;
}

/// A path that can be written through `&mut Root`.
pub trait Writable<R, V>: Readable<R, V> {
    /// Writes `value` at the end of the path.
    #[inline]
    fn set(&self, root: &mut R, value: V) {
        self.as_any_path().write(root, value);
    }

    /// Reads the value, lets `f` modify it, then writes it back.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::{Writable, writable_path};
    ///
    /// struct Counter { hits: u32 }
    ///
    /// let hits = writable_path!(Counter => hits);
    /// let mut counter = Counter { hits: 1 };
    ///
    /// hits.update(&mut counter, |hits| *hits += 1);
    /// assert_eq!(counter.hits, 2);
    /// ```
    fn update<T>(&self, root: &mut R, f: impl FnOnce(&mut V) -> T) -> T {
        let mut value = self.get(root);
        let output = f(&mut value);
        self.set(root, value);
        output
    }
}

/// A path that can be written through `&Root`.
pub trait ReferenceWritable<R, V>: Writable<R, V> {
    /// Writes `value` at the end of the path without exclusive access to the root.
    #[inline]
    fn set_shared(&self, root: &R, value: V) {
        self.as_any_path().write_shared(root, value);
    }
}

impl<R, V> Readable<R, V> for AnyPath<R, V> {
    #[inline(always)]
    fn as_any_path(&self) -> &AnyPath<R, V> {
        self
    }

    #[inline(always)]
    fn static_kind(&self) -> PathKind {
        PathKind::ReadOnly
    }
}

// -----------------------------------------------------------------------------
// Typed paths

macro_rules! define_typed_path {
    ($(#[$meta:meta])* $name:ident: $kind:ident) => {
        $(#[$meta])*
        pub struct $name<R, V>(AnyPath<R, V>);

        impl<R, V> $name<R, V> {
            /// Returns the erased path.
            #[inline(always)]
            pub fn into_any(self) -> AnyPath<R, V> {
                self.0
            }

            /// Returns the identity tokens of the path.
            #[inline(always)]
            pub fn tokens(&self) -> &[IdentityToken] {
                self.0.tokens()
            }

            /// Returns the runtime capability of the underlying path.
            ///
            /// This may exceed the static capability of the type for upcast paths.
            #[inline(always)]
            pub const fn kind(&self) -> PathKind {
                self.0.kind()
            }

            /// Folds the identity of the path into one token.
            #[inline]
            pub fn identity_token(&self) -> IdentityToken {
                self.0.identity_token()
            }

            /// Wraps `value`, identified by this path.
            ///
            /// Values wrapped by equal paths compare equal, whatever their content.
            #[inline]
            pub fn hashed<T>(&self, value: T) -> HashTokenWrapper<T> {
                HashTokenWrapper::new(value, [self.identity_token()])
            }

            /// Appends `token` to the identity of the path.
            ///
            /// A token distinguishes paths of one closure definition
            /// created by generic code from runtime parameters.
            #[inline]
            pub fn with_token(self, token: IdentityToken) -> Self {
                Self(self.0.with_token(token))
            }
        }

        impl<R, V> Readable<R, V> for $name<R, V> {
            #[inline(always)]
            fn as_any_path(&self) -> &AnyPath<R, V> {
                &self.0
            }

            #[inline(always)]
            fn static_kind(&self) -> PathKind {
                PathKind::$kind
            }
        }

        // #26925
        impl<R, V> Clone for $name<R, V> {
            #[inline]
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<R, V> PartialEq for $name<R, V> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl<R, V> Eq for $name<R, V> {}

        impl<R, V> Hash for $name<R, V> {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl<R, V> Debug for $name<R, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }
    };
}

define_typed_path! {
    /// A read-only path from `R` to `V`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::{Path, Readable};
    ///
    /// let len = Path::new(|s: &String| s.len());
    /// assert_eq!(len.get(&"four".to_string()), 4);
    /// ```
    Path: ReadOnly
}

define_typed_path! {
    /// A path from `R` to `V` written through `&mut R`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::{Readable, Writable, WritablePath};
    ///
    /// let first = WritablePath::new(|v: &(i32, i32)| v.0, |v: &mut (i32, i32), x| v.0 = x);
    ///
    /// let mut pair = (1, 2);
    /// first.set(&mut pair, 3);
    /// assert_eq!(first.get(&pair), 3);
    /// assert_eq!(pair, (3, 2));
    /// ```
    WritablePath: Writable
}

define_typed_path! {
    /// A path from `R` to `V` written through `&R`.
    ///
    /// The written slot lives in a container shared by the root, such as
    /// the content of an `Arc<Mutex<_>>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use vc_path::{ReferenceWritable, ReferenceWritablePath, Readable};
    ///
    /// type Shared = Arc<Mutex<i32>>;
    ///
    /// let inner = ReferenceWritablePath::new(
    ///     |s: &Shared| *s.lock().unwrap(),
    ///     |s: &Shared, v| *s.lock().unwrap() = v,
    /// );
    ///
    /// let shared: Shared = Arc::new(Mutex::new(1));
    /// let alias = shared.clone();
    /// inner.set_shared(&shared, 5);
    /// assert_eq!(inner.get(&alias), 5);
    /// ```
    ReferenceWritablePath: ReferenceWritable
}

impl<R, V> Writable<R, V> for WritablePath<R, V> {}

impl<R, V> Writable<R, V> for ReferenceWritablePath<R, V> {}

impl<R, V> ReferenceWritable<R, V> for ReferenceWritablePath<R, V> {}

// -----------------------------------------------------------------------------
// Constructors

impl<R: 'static, V: 'static> Path<R, V> {
    /// Creates a read-only path from a getter.
    ///
    /// A zero-sized closure is identified by its type: every path created
    /// from one closure definition compares equal. A getter carrying state
    /// (captured values, a function pointer, a boxed closure) is also
    /// identified by its allocation: clones of the path compare equal,
    /// independently created paths never do.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::Path;
    ///
    /// let at = |i: usize| Path::new(move |v: &Vec<u8>| v[i]);
    ///
    /// let first = at(0);
    /// assert_eq!(first, first.clone());
    /// assert_ne!(first, at(0));
    /// ```
    #[inline]
    pub fn new<G>(get: G) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
    {
        Self(AnyPath::read_only(get, Identity::Instance))
    }

    /// Creates a read-only path whose captured state is identified by `tokens`.
    ///
    /// The path is identified by the type of `get` followed by `tokens`.
    /// Two paths created from the same closure definition with equal tokens
    /// compare equal, whatever their captured values.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_identity::IdentityToken;
    /// use vc_path::Path;
    ///
    /// let at = |i: usize| Path::with_identity(move |v: &Vec<u8>| v[i], [IdentityToken::of(i)]);
    ///
    /// assert_eq!(at(0), at(0));
    /// assert_ne!(at(0), at(1));
    /// ```
    #[inline]
    pub fn with_identity<G>(get: G, tokens: impl IntoIterator<Item = IdentityToken>) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
    {
        let tokens: Vec<IdentityToken> = tokens.into_iter().collect();
        Self(AnyPath::read_only(get, Identity::Declared(&tokens)))
    }
}

impl<R: Clone + 'static> Path<R, R> {
    /// Returns the path from `R` to itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::{Compose, Path, Readable};
    ///
    /// let len = Path::new(|s: &String| s.len());
    /// let same = Path::<String, String>::identity().compose(&len);
    /// assert_eq!(same.get(&"abc".to_string()), 3);
    /// ```
    #[inline]
    pub fn identity() -> Self {
        Self::new(R::clone)
    }
}

impl<R: 'static, V: 'static> WritablePath<R, V> {
    /// Creates a writable path from a getter and a setter.
    ///
    /// Each closure is identified as described in [`Path::new`].
    #[inline]
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
        S: Fn(&mut R, V) + Send + Sync + 'static,
    {
        Self(AnyPath::writable(get, set, Identity::Instance))
    }

    /// Creates a writable path whose captured state is identified by `tokens`.
    ///
    /// See [`Path::with_identity`].
    #[inline]
    pub fn with_identity<G, S>(
        get: G,
        set: S,
        tokens: impl IntoIterator<Item = IdentityToken>,
    ) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
        S: Fn(&mut R, V) + Send + Sync + 'static,
    {
        let tokens: Vec<IdentityToken> = tokens.into_iter().collect();
        Self(AnyPath::writable(get, set, Identity::Declared(&tokens)))
    }
}

impl<R: Clone + 'static> WritablePath<R, R> {
    /// Returns the writable path from `R` to itself.
    #[inline]
    pub fn identity() -> Self {
        Self::new(R::clone, |root: &mut R, value| *root = value)
    }
}

impl<R: 'static, V: 'static> ReferenceWritablePath<R, V> {
    /// Creates a reference-writable path from a getter and a shared setter.
    #[inline]
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
        S: Fn(&R, V) + Send + Sync + 'static,
    {
        Self(AnyPath::reference_writable(get, set, Identity::Instance))
    }

    /// Creates a reference-writable path whose captured state is identified
    /// by `tokens`.
    ///
    /// See [`Path::with_identity`].
    #[inline]
    pub fn with_identity<G, S>(
        get: G,
        set: S,
        tokens: impl IntoIterator<Item = IdentityToken>,
    ) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
        S: Fn(&R, V) + Send + Sync + 'static,
    {
        let tokens: Vec<IdentityToken> = tokens.into_iter().collect();
        Self(AnyPath::reference_writable(get, set, Identity::Declared(&tokens)))
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl<R, V> From<WritablePath<R, V>> for Path<R, V> {
    #[inline]
    fn from(path: WritablePath<R, V>) -> Self {
        Self(path.0)
    }
}

impl<R, V> From<ReferenceWritablePath<R, V>> for Path<R, V> {
    #[inline]
    fn from(path: ReferenceWritablePath<R, V>) -> Self {
        Self(path.0)
    }
}

impl<R, V> From<ReferenceWritablePath<R, V>> for WritablePath<R, V> {
    #[inline]
    fn from(path: ReferenceWritablePath<R, V>) -> Self {
        Self(path.0)
    }
}

impl<R, V> From<AnyPath<R, V>> for Path<R, V> {
    #[inline]
    fn from(path: AnyPath<R, V>) -> Self {
        Self(path)
    }
}

fn check_kind<R, V>(path: &AnyPath<R, V>, expected: PathKind) -> Result<(), CastError> {
    let actual = path.kind();
    if actual.satisfies(expected) {
        Ok(())
    } else {
        log::debug!("rejected cast of a {actual} path into a {expected} path");
        Err(CastError::KindMismatch { expected, actual })
    }
}

impl<R, V> TryFrom<AnyPath<R, V>> for WritablePath<R, V> {
    type Error = CastError;

    #[inline]
    fn try_from(path: AnyPath<R, V>) -> Result<Self, Self::Error> {
        check_kind(&path, PathKind::Writable)?;
        Ok(Self(path))
    }
}

impl<R, V> TryFrom<AnyPath<R, V>> for ReferenceWritablePath<R, V> {
    type Error = CastError;

    #[inline]
    fn try_from(path: AnyPath<R, V>) -> Result<Self, Self::Error> {
        check_kind(&path, PathKind::ReferenceWritable)?;
        Ok(Self(path))
    }
}

// -----------------------------------------------------------------------------
// Composition

/// Appending a path to another one.
///
/// Implemented for every pair of typed paths where the value of the left
/// path is the root of the right path. The result is writable only if both
/// paths are, and reference-writable if either is.
///
/// Tokens of the composition are the tokens of `self` followed by the tokens
/// of `rhs`, composition is therefore associative with respect to equality.
///
/// # Examples
///
/// ```
/// use vc_path::{Compose, Readable, Writable, WritablePath};
///
/// struct Outer { inner: Inner }
/// #[derive(Clone)]
/// struct Inner { value: u8 }
///
/// let inner = WritablePath::new(|o: &Outer| o.inner.clone(), |o: &mut Outer, i| o.inner = i);
/// let value = WritablePath::new(|i: &Inner| i.value, |i: &mut Inner, v| i.value = v);
///
/// let path = inner.compose(&value);
/// let mut root = Outer { inner: Inner { value: 1 } };
/// path.set(&mut root, 2);
/// assert_eq!(path.get(&root), 2);
/// ```
pub trait Compose<Rhs> {
    /// The composed path.
    type Output;

    /// Returns the path from the root of `self` to the value of `rhs`.
    fn compose(&self, rhs: &Rhs) -> Self::Output;
}

macro_rules! impl_compose {
    ($($outer:ident + $inner:ident => $output:ident;)*) => {$(
        impl<A: 'static, B: 'static, C: 'static> Compose<$inner<B, C>> for $outer<A, B> {
            type Output = $output<A, C>;

            #[inline]
            fn compose(&self, rhs: &$inner<B, C>) -> Self::Output {
                $output(self.0.compose(&rhs.0))
            }
        }
    )*};
}

impl_compose! {
    Path + Path => Path;
    Path + WritablePath => Path;
    Path + ReferenceWritablePath => Path;
    WritablePath + Path => Path;
    WritablePath + WritablePath => WritablePath;
    WritablePath + ReferenceWritablePath => ReferenceWritablePath;
    ReferenceWritablePath + Path => Path;
    ReferenceWritablePath + WritablePath => ReferenceWritablePath;
    ReferenceWritablePath + ReferenceWritablePath => ReferenceWritablePath;
}

// -----------------------------------------------------------------------------
// Lift

/// Lifting a path to an optional root.
pub trait Lift {
    /// The lifted path, from `Option<R>` to `Option<V>`.
    type Lifted;

    /// Returns a path total over an absent root.
    ///
    /// The lifted path reads `None` for an absent root. Writing `None`, or
    /// writing into an absent root, does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::{Lift, Readable, Writable, WritablePath};
    ///
    /// let double = WritablePath::new(|v: &u8| *v * 2, |v: &mut u8, x| *v = x / 2);
    /// let lifted = double.lift_to_optional_root();
    ///
    /// assert_eq!(lifted.get(&None), None);
    /// assert_eq!(lifted.get(&Some(2)), Some(4));
    ///
    /// let mut absent = None;
    /// lifted.set(&mut absent, Some(8));
    /// assert_eq!(absent, None);
    /// ```
    fn lift_to_optional_root(&self) -> Self::Lifted;
}

macro_rules! impl_lift {
    ($($name:ident),*) => {$(
        impl<R: 'static, V: 'static> Lift for $name<R, V> {
            type Lifted = $name<Option<R>, Option<V>>;

            #[inline]
            fn lift_to_optional_root(&self) -> Self::Lifted {
                $name(self.0.lift())
            }
        }
    )*};
}

impl_lift!(Path, WritablePath, ReferenceWritablePath);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use std::sync::Mutex;

    use hashbrown::HashSet;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Inner {
        value: u8,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Outer {
        inner: Inner,
        name: String,
    }

    fn inner() -> WritablePath<Outer, Inner> {
        WritablePath::new(|o: &Outer| o.inner.clone(), |o: &mut Outer, i| o.inner = i)
    }

    fn value() -> WritablePath<Inner, u8> {
        WritablePath::new(|i: &Inner| i.value, |i: &mut Inner, v| i.value = v)
    }

    fn double() -> Path<u8, u16> {
        Path::new(|v: &u8| u16::from(*v) * 2)
    }

    fn outer() -> Outer {
        Outer {
            inner: Inner { value: 4 },
            name: "outer".to_string(),
        }
    }

    #[test]
    fn compose_value_paths() {
        let path = inner().compose(&value());
        let mut root = outer();

        assert_eq!(path.get(&root), 4);
        path.set(&mut root, 9);
        assert_eq!(root.inner.value, 9);
        assert_eq!(root.name, "outer");

        path.update(&mut root, |v| *v += 1);
        assert_eq!(root.inner.value, 10);
    }

    #[test]
    fn read_only_composition() {
        let path = inner().compose(&value()).compose(&double());
        assert_eq!(path.get(&outer()), 8);
        assert_eq!(path.kind(), PathKind::ReadOnly);
        assert_eq!(path.static_kind(), PathKind::ReadOnly);
    }

    #[test]
    fn associativity() {
        let left = inner().compose(&value()).compose(&double());
        let right = inner().compose(&value().compose(&double()));
        assert_eq!(left, right);

        let mut set = HashSet::new();
        set.insert(left);
        assert!(set.contains(&right));
    }

    #[test]
    fn equivalent_paths_are_not_equal() {
        let a = Path::new(|o: &Outer| o.inner.value);
        let b = Path::new(|o: &Outer| o.inner.value);
        let composed: Path<Outer, u8> = inner().compose(&value()).into();

        assert_eq!(a.get(&outer()), b.get(&outer()));
        assert_ne!(a, b);
        assert_ne!(a, composed);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn identity_paths() {
        let path = WritablePath::<Inner, Inner>::identity().compose(&value());
        let mut root = Inner { value: 1 };
        path.set(&mut root, 3);
        assert_eq!(root, Inner { value: 3 });

        let len = Path::<String, String>::identity().compose(&Path::new(|s: &String| s.len()));
        assert_eq!(len.get(&"four".to_string()), 4);
    }

    #[test]
    fn distinct_tokens() {
        let make = |i: usize| Path::new(|v: &[u8; 4]| v[0]).with_token(IdentityToken::of(i));

        assert_eq!(make(1), make(1));
        assert_ne!(make(1), make(2));
    }

    #[test]
    fn stateful_getters_are_distinct() {
        fn len(s: &String) -> usize {
            s.len()
        }

        fn zero(_: &String) -> usize {
            0
        }

        let a = Path::new(len as fn(&String) -> usize);
        let b = Path::new(zero as fn(&String) -> usize);
        assert_eq!(a.get(&"abc".to_string()), 3);
        assert_eq!(b.get(&"abc".to_string()), 0);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let at: Vec<Path<Vec<u8>, u8>> =
            (0..3).map(|i| Path::new(move |v: &Vec<u8>| v[i])).collect();
        let set: HashSet<_> = at.iter().cloned().collect();
        assert_eq!(set.len(), 3);

        let boxed = || -> Box<dyn Fn(&u8) -> u8 + Send + Sync> { Box::new(|v: &u8| *v) };
        assert_ne!(Path::new(boxed()), Path::new(boxed()));
    }

    #[test]
    fn declared_identities() {
        let at = |i: usize| {
            WritablePath::with_identity(
                move |v: &Vec<u8>| v[i],
                move |v: &mut Vec<u8>, x| v[i] = x,
                [IdentityToken::of(i)],
            )
        };

        assert_eq!(at(1), at(1));
        assert_ne!(at(1), at(2));

        let mut values = alloc::vec![0, 0];
        at(1).set(&mut values, 4);
        assert_eq!(values, [0, 4]);
    }

    #[test]
    fn values_identified_by_paths() {
        let path = inner().compose(&value());

        assert_eq!(path.identity_token(), path.clone().into_any().identity_token());
        assert_ne!(path.identity_token(), inner().identity_token());

        let a = path.hashed(1_u8);
        let b = inner().compose(&value()).hashed(2_u8);
        let c = inner().hashed(1_u8);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(*a.value(), 1);
    }

    #[test]
    fn upcast_and_downcast() {
        let path = inner().compose(&value());
        let read_only: Path<Outer, u8> = path.clone().into();

        assert_eq!(read_only.kind(), PathKind::Writable);
        assert_eq!(read_only.static_kind(), PathKind::ReadOnly);

        let recovered = WritablePath::try_from(read_only.into_any()).unwrap();
        assert_eq!(recovered, path);

        let error = ReferenceWritablePath::try_from(path.clone().into_any()).unwrap_err();
        assert_eq!(error.expected(), PathKind::ReferenceWritable);
        assert_eq!(error.actual(), PathKind::Writable);

        let error = WritablePath::try_from(double().into_any()).unwrap_err();
        assert_eq!(
            alloc::format!("{error}"),
            "Cannot cast a read-only path into a writable path"
        );
    }

    #[test]
    fn reference_paths() {
        type Shared = Arc<Mutex<Inner>>;

        let shared = ReferenceWritablePath::new(
            |s: &Shared| s.lock().unwrap().clone(),
            |s: &Shared, i| *s.lock().unwrap() = i,
        );
        let path = shared.compose(&value());
        assert_eq!(path.kind(), PathKind::ReferenceWritable);

        let root: Shared = Arc::new(Mutex::new(Inner { value: 1 }));
        path.set_shared(&root, 7);
        assert_eq!(root.lock().unwrap().value, 7);

        let mut alias = root.clone();
        path.set(&mut alias, 8);
        assert_eq!(root.lock().unwrap().value, 8);

        let writable: WritablePath<Shared, u8> = path.into();
        writable.set(&mut alias, 9);
        assert_eq!(root.lock().unwrap().value, 9);
    }

    #[test]
    fn lift_keeps_kind() {
        let lifted = inner().compose(&value()).lift_to_optional_root();
        assert_eq!(lifted.kind(), PathKind::Writable);

        let mut root = Some(outer());
        lifted.set(&mut root, Some(1));
        assert_eq!(lifted.get(&root), Some(1));

        lifted.set(&mut root, None);
        assert_eq!(lifted.get(&root), Some(1));

        let tagged = inner()
            .compose(&value())
            .lift_to_optional_root()
            .with_token(IdentityToken::of(0));
        assert_ne!(lifted, tagged);
    }
}
