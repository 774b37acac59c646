use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::hash::{Hash, Hasher};

use vc_identity::{IdentityToken, Tokens};

use crate::PathKind;

// -----------------------------------------------------------------------------
// Accessors

pub(crate) type Getter<R, V> = Arc<dyn Fn(&R) -> V + Send + Sync>;
pub(crate) type ValueSetter<R, V> = Arc<dyn Fn(&mut R, V) + Send + Sync>;
pub(crate) type ReferenceSetter<R, V> = Arc<dyn Fn(&R, V) + Send + Sync>;

/// The write half of a path, tagged by ownership.
pub(crate) enum Setter<R, V> {
    ReadOnly,
    Value(ValueSetter<R, V>),
    Reference(ReferenceSetter<R, V>),
}

// #26925
impl<R, V> Clone for Setter<R, V> {
    fn clone(&self) -> Self {
        match self {
            Self::ReadOnly => Self::ReadOnly,
            Self::Value(set) => Self::Value(set.clone()),
            Self::Reference(set) => Self::Reference(set.clone()),
        }
    }
}

impl<R, V> Setter<R, V> {
    #[inline]
    const fn kind(&self) -> PathKind {
        match self {
            Self::ReadOnly => PathKind::ReadOnly,
            Self::Value(_) => PathKind::Writable,
            Self::Reference(_) => PathKind::ReferenceWritable,
        }
    }
}

/// How the state captured by the closures of a path takes part in its identity.
///
/// A closure is always identified by its type.
#[derive(Clone, Copy)]
pub(crate) enum Identity<'a> {
    /// A closure carrying state is also identified by its allocation.
    Instance,
    /// The captured state is described by these tokens, appended after the
    /// closure tokens.
    Declared(&'a [IdentityToken]),
}

impl Identity<'_> {
    fn push<F: 'static, T>(self, tokens: &mut Vec<IdentityToken>, stored: &Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        tokens.push(IdentityToken::type_of::<F>());
        if matches!(self, Self::Instance) && size_of::<F>() != 0 {
            tokens.push(IdentityToken::instance(stored.clone()));
        }
    }

    fn finish(self, mut tokens: Vec<IdentityToken>) -> Tokens {
        if let Self::Declared(declared) = self {
            tokens.extend_from_slice(declared);
        }
        tokens.into()
    }
}

/// Token list of a path lifted to an optional root.
#[derive(Debug, PartialEq, Eq, Hash)]
struct Lifted(Tokens);

// -----------------------------------------------------------------------------
// AnyPath

/// A path whose write capability is only known at runtime.
///
/// Every typed path ([`Path`](crate::Path), [`WritablePath`](crate::WritablePath),
/// [`ReferenceWritablePath`](crate::ReferenceWritablePath)) is a thin facade
/// over an `AnyPath`. The dynamic [`kind`](Self::kind) of the erased path is
/// kept when a typed path is upcast, so a writable path viewed as a
/// [`Path`](crate::Path) can be recovered with `TryFrom`.
///
/// Equality and hashing only look at the [identity tokens](Self::tokens).
///
/// # Examples
///
/// ```
/// use vc_path::{AnyPath, Path, PathKind, WritablePath};
///
/// let writable = WritablePath::new(|v: &(u8, u8)| v.0, |v: &mut (u8, u8), x| v.0 = x);
/// let read_only: Path<_, _> = writable.clone().into();
///
/// let erased: AnyPath<_, _> = read_only.into_any();
/// assert_eq!(erased.kind(), PathKind::Writable);
///
/// let recovered = WritablePath::try_from(erased).unwrap();
/// assert_eq!(recovered, writable);
/// ```
pub struct AnyPath<R, V> {
    get: Getter<R, V>,
    set: Setter<R, V>,
    tokens: Tokens,
}

impl<R: 'static, V: 'static> AnyPath<R, V> {
    pub(crate) fn read_only<G>(get: G, identity: Identity<'_>) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
    {
        let get: Getter<R, V> = Arc::new(get);

        let mut tokens = Vec::new();
        identity.push::<G, _>(&mut tokens, &get);

        Self {
            get,
            set: Setter::ReadOnly,
            tokens: identity.finish(tokens),
        }
    }

    pub(crate) fn writable<G, S>(get: G, set: S, identity: Identity<'_>) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
        S: Fn(&mut R, V) + Send + Sync + 'static,
    {
        let get: Getter<R, V> = Arc::new(get);
        let set: ValueSetter<R, V> = Arc::new(set);

        let mut tokens = Vec::new();
        identity.push::<G, _>(&mut tokens, &get);
        identity.push::<S, _>(&mut tokens, &set);

        Self {
            get,
            set: Setter::Value(set),
            tokens: identity.finish(tokens),
        }
    }

    pub(crate) fn reference_writable<G, S>(get: G, set: S, identity: Identity<'_>) -> Self
    where
        G: Fn(&R) -> V + Send + Sync + 'static,
        S: Fn(&R, V) + Send + Sync + 'static,
    {
        let get: Getter<R, V> = Arc::new(get);
        let set: ReferenceSetter<R, V> = Arc::new(set);

        let mut tokens = Vec::new();
        identity.push::<G, _>(&mut tokens, &get);
        identity.push::<S, _>(&mut tokens, &set);

        Self {
            get,
            set: Setter::Reference(set),
            tokens: identity.finish(tokens),
        }
    }

    /// Appends `inner` after `self`.
    ///
    /// - A read-only link makes the result read-only.
    /// - A value-owned `inner` is written by get-modify-set through `self`:
    ///   the intermediate value is read, modified, then written back with
    ///   the setter of `self`.
    /// - A reference-owned `inner` is written into the intermediate value
    ///   directly and nothing is written back upstream.
    pub(crate) fn compose<C: 'static>(&self, inner: &AnyPath<V, C>) -> AnyPath<R, C> {
        let outer_get = self.get.clone();
        let inner_get = inner.get.clone();
        let get: Getter<R, C> = Arc::new(move |root: &R| inner_get(&outer_get(root)));

        let set = match (&self.set, &inner.set) {
            (Setter::ReadOnly, _) | (_, Setter::ReadOnly) => Setter::ReadOnly,
            (_, Setter::Reference(inner_set)) => {
                let outer_get = self.get.clone();
                let inner_set = inner_set.clone();

                Setter::Reference(Arc::new(move |root: &R, value: C| {
                    inner_set(&outer_get(root), value);
                }))
            }
            (Setter::Value(outer_set), Setter::Value(inner_set)) => {
                let outer_get = self.get.clone();
                let outer_set = outer_set.clone();
                let inner_set = inner_set.clone();

                Setter::Value(Arc::new(move |root: &mut R, value: C| {
                    let mut target = outer_get(root);
                    inner_set(&mut target, value);
                    outer_set(root, target);
                }))
            }
            (Setter::Reference(outer_set), Setter::Value(inner_set)) => {
                let outer_get = self.get.clone();
                let outer_set = outer_set.clone();
                let inner_set = inner_set.clone();

                Setter::Reference(Arc::new(move |root: &R, value: C| {
                    let mut target = outer_get(root);
                    inner_set(&mut target, value);
                    outer_set(root, target);
                }))
            }
        };

        debug_assert_eq!(set.kind(), self.kind().compose(inner.kind()));

        AnyPath {
            get,
            set,
            tokens: self.tokens.iter().chain(inner.tokens.iter()).cloned().collect(),
        }
    }

    /// Lifts `self` to an optional root.
    ///
    /// Reads yield `None` for an absent root. Writing `None`, or writing
    /// into an absent root, does nothing.
    pub(crate) fn lift(&self) -> AnyPath<Option<R>, Option<V>> {
        let get = self.get.clone();
        let lifted_get: Getter<Option<R>, Option<V>> =
            Arc::new(move |root: &Option<R>| root.as_ref().map(|root| get(root)));

        let set = match &self.set {
            Setter::ReadOnly => Setter::ReadOnly,
            Setter::Value(set) => {
                let set = set.clone();
                Setter::Value(Arc::new(move |root: &mut Option<R>, value: Option<V>| {
                    if let (Some(root), Some(value)) = (root.as_mut(), value) {
                        set(root, value);
                    }
                }))
            }
            Setter::Reference(set) => {
                let set = set.clone();
                Setter::Reference(Arc::new(move |root: &Option<R>, value: Option<V>| {
                    if let (Some(root), Some(value)) = (root.as_ref(), value) {
                        set(root, value);
                    }
                }))
            }
        };

        let tokens: Tokens = Arc::new([IdentityToken::of(Lifted(self.tokens.clone()))]);

        AnyPath {
            get: lifted_get,
            set,
            tokens,
        }
    }
}

impl<R, V> AnyPath<R, V> {
    /// Returns the runtime capability of the path.
    #[inline]
    pub const fn kind(&self) -> PathKind {
        self.set.kind()
    }

    /// Reads the value at the end of the path.
    #[inline]
    pub fn get(&self, root: &R) -> V {
        (self.get)(root)
    }

    /// Returns the identity tokens of the path, outermost link first.
    #[inline(always)]
    pub fn tokens(&self) -> &[IdentityToken] {
        &self.tokens
    }

    /// Returns the shared token list.
    #[inline(always)]
    pub fn shared_tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// Folds the identity of the whole path into one token.
    #[inline]
    pub fn identity_token(&self) -> IdentityToken {
        IdentityToken::nested(self.tokens.clone())
    }

    pub(crate) fn with_token(self, token: IdentityToken) -> Self {
        Self {
            get: self.get,
            set: self.set,
            tokens: self.tokens.iter().cloned().chain([token]).collect(),
        }
    }

    pub(crate) fn write(&self, root: &mut R, value: V) {
        match &self.set {
            Setter::Value(set) => set(root, value),
            Setter::Reference(set) => set(&*root, value),
            Setter::ReadOnly => log::debug!("ignored write through a read-only path {:?}", self.tokens),
        }
    }

    pub(crate) fn write_shared(&self, root: &R, value: V) {
        match &self.set {
            Setter::Reference(set) => set(root, value),
            _ => log::debug!("ignored shared write through a {} path {:?}", self.kind(), self.tokens),
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

// #26925
impl<R, V> Clone for AnyPath<R, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<R, V> PartialEq for AnyPath<R, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tokens, &other.tokens) || self.tokens == other.tokens
    }
}

impl<R, V> Eq for AnyPath<R, V> {}

impl<R, V> Hash for AnyPath<R, V> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.hash(state);
    }
}

impl<R, V> Debug for AnyPath<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyPath")
            .field("kind", &self.kind())
            .field("tokens", &self.tokens)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use std::sync::Mutex;

    use super::*;

    type Shared = Arc<Mutex<i32>>;

    fn first() -> AnyPath<(Vec<i32>, u8), Vec<i32>> {
        AnyPath::writable(
            |r: &(Vec<i32>, u8)| r.0.clone(),
            |r: &mut (Vec<i32>, u8), v| r.0 = v,
            Identity::Instance,
        )
    }

    fn head() -> AnyPath<Vec<i32>, i32> {
        AnyPath::writable(|v: &Vec<i32>| v[0], |v: &mut Vec<i32>, x| v[0] = x, Identity::Instance)
    }

    fn shared() -> AnyPath<Shared, i32> {
        AnyPath::reference_writable(
            |s: &Shared| *s.lock().unwrap(),
            |s: &Shared, x| *s.lock().unwrap() = x,
            Identity::Instance,
        )
    }

    #[test]
    fn kinds() {
        assert_eq!(head().kind(), PathKind::Writable);
        assert_eq!(shared().kind(), PathKind::ReferenceWritable);
        let len = AnyPath::read_only(|v: &Vec<i32>| v.len(), Identity::Instance);
        assert_eq!(len.kind(), PathKind::ReadOnly);
    }

    #[test]
    fn value_composition_writes_back() {
        let path = first().compose(&head());
        let mut root = (alloc::vec![1, 2], 7);

        assert_eq!(path.get(&root), 1);
        path.write(&mut root, 10);
        assert_eq!(root, (alloc::vec![10, 2], 7));
        assert_eq!(path.kind(), PathKind::Writable);
    }

    #[test]
    fn reference_composition_does_not_write_back() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();

        let outer: AnyPath<Shared, Shared> = AnyPath::writable(
            |s: &Shared| s.clone(),
            move |_: &mut Shared, _| *counter.lock().unwrap() += 1,
            Identity::Instance,
        );

        let path = outer.compose(&shared());
        let root: Shared = Arc::new(Mutex::new(3));

        path.write_shared(&root, 4);
        assert_eq!(*root.lock().unwrap(), 4);
        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(path.kind(), PathKind::ReferenceWritable);
    }

    #[test]
    fn read_only_link_blocks_writes() {
        let path = AnyPath::read_only(|r: &(Vec<i32>, u8)| r.0.clone(), Identity::Instance)
            .compose(&head());
        let mut root = (alloc::vec![1], 0);

        path.write(&mut root, 5);
        assert_eq!(root.0, [1]);
        assert_eq!(path.kind(), PathKind::ReadOnly);
    }

    #[test]
    fn lifted_paths() {
        let path = head().lift();

        assert_eq!(path.get(&None), None);
        assert_eq!(path.get(&Some(alloc::vec![4])), Some(4));

        let mut absent: Option<Vec<i32>> = None;
        path.write(&mut absent, Some(1));
        assert_eq!(absent, None);

        let mut present = Some(alloc::vec![4]);
        path.write(&mut present, None);
        assert_eq!(present, Some(alloc::vec![4]));
        path.write(&mut present, Some(8));
        assert_eq!(present, Some(alloc::vec![8]));
    }

    #[test]
    fn tokens_of_compositions() {
        let a = first();
        let b = head();
        let path = a.compose(&b);

        assert_eq!(path.tokens().len(), a.tokens().len() + b.tokens().len());
        assert_eq!(&path.tokens()[..2], a.tokens());
        assert_eq!(&path.tokens()[2..], b.tokens());
        assert_eq!(path, first().compose(&head()));
        assert_ne!(head().lift().tokens(), head().tokens());
    }

    #[test]
    fn stateful_closures_are_identified_by_instance() {
        let at = |i: usize| AnyPath::read_only(move |v: &Vec<i32>| v[i], Identity::Instance);

        let first = at(0);
        assert_eq!(first.tokens().len(), 2);
        assert_eq!(first, first.clone());
        assert_ne!(first, at(0));
        assert_eq!(head().tokens().len(), 2);
    }

    #[test]
    fn declared_identities() {
        let at = |i: usize| {
            let tokens = [IdentityToken::of(i)];
            AnyPath::read_only(move |v: &Vec<i32>| v[i], Identity::Declared(&tokens))
        };

        assert_eq!(at(1), at(1));
        assert_ne!(at(1), at(2));
        assert_eq!(at(1).tokens().len(), 2);
        assert_eq!(at(1).tokens()[1], IdentityToken::of(1_usize));
    }
}
