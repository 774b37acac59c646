use core::any::type_name;
use core::fmt::Debug;

use vc_identity::{ForceEq, HashTokenWrapper, IdentityToken};

use super::{Mapper, WritableMappingPath};
use crate::WritablePath;

// -----------------------------------------------------------------------------
// Unwrapping

impl<T: Clone + Send + Sync + 'static> Mapper<Option<T>> {
    /// Returns the path substituting `default` for an absent value.
    ///
    /// - Reads yield the present value, or `default`.
    /// - With `aggressive == false`, writes only happen when a value is present.
    /// - With `aggressive == true`, writes always store `Some`.
    ///
    /// The default takes part in the identity of the path.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::mapper::Mapper;
    ///
    /// let gentle = Mapper::<Option<i32>>::unwrapped_with(0, false);
    /// let aggressive = Mapper::<Option<i32>>::unwrapped_with(0, true);
    /// assert_ne!(gentle, aggressive);
    ///
    /// let mut mapper = Mapper::new(None);
    /// assert_eq!(mapper.map(&gentle).into_inner(), 0);
    ///
    /// mapper.map_set(&gentle, Mapper::new(1));
    /// assert_eq!(mapper.value(), &None);
    ///
    /// mapper.map_set(&aggressive, Mapper::new(2));
    /// assert_eq!(mapper.value(), &Some(2));
    /// ```
    pub fn unwrapped_with(
        default: impl Into<ForceEq<T>>,
        aggressive: bool,
    ) -> WritableMappingPath<Option<T>, T>
    where
        T: Debug,
    {
        let default = default.into();
        let token = IdentityToken::force(default.clone());
        Self::unwrapped_with_hashed(HashTokenWrapper::new(default.into_inner(), [token]), aggressive)
    }

    /// Returns the path substituting `default` for an absent value,
    /// the identity of the default being given by its tokens.
    ///
    /// See [`unwrapped_with`](Self::unwrapped_with).
    pub fn unwrapped_with_hashed(
        default: HashTokenWrapper<T>,
        aggressive: bool,
    ) -> WritableMappingPath<Option<T>, T> {
        let token = IdentityToken::hashed(&default);

        WritablePath::with_identity(
            move |mapper: &Self| match mapper.value() {
                Some(value) => Mapper::new(value.clone()),
                None => Mapper::new(default.value().clone()),
            },
            move |mapper: &mut Self, value: Mapper<T>| {
                if aggressive || mapper.value().is_some() {
                    mapper.set(Some(value.into_inner()));
                } else {
                    log::trace!("suppressed write into an absent `{}`", type_name::<T>());
                }
            },
            [IdentityToken::of(aggressive), token],
        )
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::{Readable, Writable};

    use super::*;

    #[derive(Debug, Clone)]
    struct Opaque {
        id: u8,
    }

    #[test]
    fn non_aggressive_unwrapping() {
        let path = Mapper::<Option<i32>>::unwrapped_with(0, false);
        let mut mapper = Mapper::new(None);

        assert_eq!(path.get(&mapper).into_inner(), 0);

        path.update(&mut mapper, |value| *value.value_mut() += 1);
        assert_eq!(mapper.value(), &None);

        path.set(&mut mapper, Mapper::new(1));
        assert_eq!(mapper.value(), &None);

        let mut present = Mapper::new(Some(5));
        path.set(&mut present, Mapper::new(6));
        assert_eq!(present.into_inner(), Some(6));
    }

    #[test]
    fn aggressive_unwrapping() {
        let path = Mapper::<Option<i32>>::unwrapped_with(0, true);
        let mut mapper = Mapper::new(None);

        assert_eq!(path.get(&mapper).into_inner(), 0);

        path.update(&mut mapper, |value| *value.value_mut() += 1);
        assert_eq!(mapper.value(), &Some(1));

        path.set(&mut mapper, Mapper::new(2));
        assert_eq!(mapper.value(), &Some(2));
    }

    #[test]
    fn defaults_take_part_in_identity() {
        let zero = Mapper::<Option<i32>>::unwrapped_with(0, false);

        assert_eq!(zero, Mapper::<Option<i32>>::unwrapped_with(0, false));
        assert_ne!(zero, Mapper::<Option<i32>>::unwrapped_with(1, false));
        assert_ne!(zero, Mapper::<Option<i32>>::unwrapped_with(0, true));
    }

    #[test]
    fn default_strategies_are_symmetric() {
        fn always(_: &i32, _: &i32) -> bool {
            true
        }

        let native = Mapper::<Option<i32>>::unwrapped_with(0, false);
        let custom = Mapper::<Option<i32>>::unwrapped_with(ForceEq::with_eq(0, always), false);

        assert_ne!(native, custom);
        assert_ne!(custom, native);
        assert_eq!(
            custom,
            Mapper::<Option<i32>>::unwrapped_with(ForceEq::with_eq(1, always), false)
        );
    }

    #[test]
    fn dumped_defaults() {
        let path = |id| Mapper::<Option<Opaque>>::unwrapped_with(ForceEq::dumped(Opaque { id }), false);

        assert_eq!(path(1), path(1));
        assert_ne!(path(1), path(2));
        assert_eq!(path(3).get(&Mapper::new(None)).into_inner().id, 3);
    }

    #[test]
    fn hashed_defaults() {
        struct NotDebug(u8);

        impl Clone for NotDebug {
            fn clone(&self) -> Self {
                Self(self.0)
            }
        }

        let path = |tag: &'static str, value| {
            let default = HashTokenWrapper::new(NotDebug(value), [IdentityToken::of(tag)]);
            Mapper::<Option<NotDebug>>::unwrapped_with_hashed(default, false)
        };

        assert_eq!(path("a", 1), path("a", 2));
        assert_ne!(path("a", 1), path("b", 1));
        assert_eq!(path("a", 7).get(&Mapper::new(None)).into_inner().0, 7);
    }
}
