use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::hash::{Hash, Hasher};
use core::ops::{Deref, DerefMut};

use crate::hash::fixed_hash;
use crate::{IdentityToken, Tokens};

// -----------------------------------------------------------------------------
// HashTokenWrapper

/// A value whose equality and hash are given by a list of identity tokens.
///
/// The wrapped value never takes part in comparison. This lets values that
/// are neither `PartialEq` nor `Hash` (closures, default values captured by
/// closures) live inside types that must be `Eq + Hash`.
///
/// - Token lists differing in any position, order or length are unequal.
/// - Identical token lists are equal, whatever the wrapped values.
/// - Two wrappers without tokens are always equal, supply at least one token
///   when wrappers must be told apart.
///
/// # Examples
///
/// ```
/// use vc_identity::{HashTokenWrapper, IdentityToken};
///
/// let a = HashTokenWrapper::new(1, [IdentityToken::of("a")]);
/// let b = HashTokenWrapper::new(2, [IdentityToken::of("a")]);
/// let c = HashTokenWrapper::new(1, [IdentityToken::of("c")]);
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(*a.value(), 1);
/// ```
pub struct HashTokenWrapper<V> {
    value: V,
    tokens: Tokens,
}

impl<V> HashTokenWrapper<V> {
    /// Creates a wrapper identified by `tokens`.
    #[inline]
    pub fn new(value: V, tokens: impl IntoIterator<Item = IdentityToken>) -> Self {
        Self {
            value,
            tokens: tokens.into_iter().collect(),
        }
    }

    /// Creates a wrapper sharing an existing token list.
    #[inline(always)]
    pub const fn from_tokens(value: V, tokens: Tokens) -> Self {
        Self { value, tokens }
    }

    /// Returns a reference to the wrapped value.
    #[inline(always)]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns a mutable reference to the wrapped value.
    ///
    /// Mutating the value never changes the identity of the wrapper.
    #[inline(always)]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Extracts the wrapped value.
    #[inline(always)]
    pub fn into_inner(self) -> V {
        self.value
    }

    /// Returns the tokens identifying this wrapper.
    #[inline(always)]
    pub fn tokens(&self) -> &[IdentityToken] {
        &self.tokens
    }

    /// Returns the shared token list.
    #[inline(always)]
    pub fn shared_tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// Appends `token` at the end of the token list.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_identity::{HashTokenWrapper, IdentityToken};
    ///
    /// let a = HashTokenWrapper::new((), [IdentityToken::of(1)]);
    /// let b = HashTokenWrapper::new((), [IdentityToken::of(1), IdentityToken::of(2)]);
    /// assert_eq!(a.with_token(IdentityToken::of(2)), b);
    /// ```
    pub fn with_token(self, token: IdentityToken) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend(self.tokens.iter().cloned());
        tokens.push(token);

        Self {
            value: self.value,
            tokens: tokens.into(),
        }
    }

    /// Maps the wrapped value, keeping the identity.
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> HashTokenWrapper<U> {
        HashTokenWrapper {
            value: f(self.value),
            tokens: self.tokens,
        }
    }

    /// Returns the hash of the token list under
    /// [`FixedHashState`](crate::hash::FixedHashState).
    #[inline]
    pub fn fixed_hash(&self) -> u64 {
        fixed_hash(&*self.tokens)
    }
}

impl<V> HashTokenWrapper<V>
where
    V: Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    /// Creates a wrapper identified by the value itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_identity::HashTokenWrapper;
    ///
    /// assert_eq!(HashTokenWrapper::hashable(3), HashTokenWrapper::hashable(3));
    /// assert_ne!(HashTokenWrapper::hashable(3), HashTokenWrapper::hashable(4));
    /// ```
    #[inline]
    pub fn hashable(value: V) -> Self {
        let token = IdentityToken::of(value.clone());
        Self {
            value,
            tokens: Arc::new([token]),
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<V> PartialEq for HashTokenWrapper<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tokens, &other.tokens) || self.tokens == other.tokens
    }
}

impl<V> Eq for HashTokenWrapper<V> {}

impl<V> Hash for HashTokenWrapper<V> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.hash(state);
    }
}

impl<V> Deref for HashTokenWrapper<V> {
    type Target = V;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V> DerefMut for HashTokenWrapper<V> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<V: Clone> Clone for HashTokenWrapper<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<V: Debug> Debug for HashTokenWrapper<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTokenWrapper")
            .field("value", &self.value)
            .field("tokens", &self.tokens)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
