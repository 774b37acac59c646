use alloc::sync::Arc;

use vc_identity::{HashTokenWrapper, IdentityToken, Tokens};

use super::{Mapper, WritableMappingPath};
use crate::WritablePath;

// -----------------------------------------------------------------------------
// Hashing

impl<V: Clone + 'static> Mapper<V> {
    /// Returns the path viewing the value as a [`HashTokenWrapper`]
    /// identified by `token`.
    ///
    /// Writing stores the wrapped value and drops the tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_identity::IdentityToken;
    /// use vc_path::mapper::Mapper;
    ///
    /// // not comparable
    /// let a = Mapper::new(|x: i32| x + 1);
    /// let b = Mapper::new(|x: i32| x * 2);
    ///
    /// let left = a.map(&Mapper::hashed_by(IdentityToken::of("same"))).into_inner();
    /// let right = b.map(&Mapper::hashed_by(IdentityToken::of("same"))).into_inner();
    ///
    /// assert_eq!(left.tokens(), right.tokens());
    /// assert_eq!(left.value()(1), 2);
    /// ```
    pub fn hashed_by(token: IdentityToken) -> WritableMappingPath<V, HashTokenWrapper<V>> {
        let tokens: Tokens = Arc::new([token.clone()]);

        WritablePath::with_identity(
            move |mapper: &Self| {
                Mapper::new(HashTokenWrapper::from_tokens(mapper.value().clone(), tokens.clone()))
            },
            |mapper: &mut Self, value: Mapper<HashTokenWrapper<V>>| {
                mapper.set(value.into_inner().into_inner());
            },
            [token],
        )
    }
}

impl<T: Clone + 'static> Mapper<Option<T>> {
    /// Returns the path viewing a present value as a [`HashTokenWrapper`]
    /// identified by `token`.
    ///
    /// Writing `None` clears the value.
    pub fn hashed_optional_by(
        token: IdentityToken,
    ) -> WritableMappingPath<Option<T>, Option<HashTokenWrapper<T>>> {
        let tokens: Tokens = Arc::new([token.clone()]);

        WritablePath::with_identity(
            move |mapper: &Self| {
                let value = mapper.value().as_ref();
                Mapper::new(value.map(|v| HashTokenWrapper::from_tokens(v.clone(), tokens.clone())))
            },
            |mapper: &mut Self, value: Mapper<Option<HashTokenWrapper<T>>>| {
                mapper.set(value.into_inner().map(HashTokenWrapper::into_inner));
            },
            [token],
        )
    }
}

// -----------------------------------------------------------------------------
// Tests
