//! Adapters for paths leading to optional values.
//!
//! # Write policies
//!
//! An unwrapped path reads the present value, or the default. Writes follow
//! the policy chosen at adaptation time:
//!
//! - non-aggressive: the write happens only if a value is present,
//! - aggressive: the write always stores `Some`.
//!
//! # Reference-owned links
//!
//! A reference-owned link never writes back upstream. When a
//! reference-writable path is appended after an unwrapped path, writes go
//! into the intermediate value only. If the optional was absent, that value
//! is the default itself: the root is left unchanged even under the aggressive
//! policy, and a default of a shared type (an `Arc`) observes the write.
//!
//! Likewise an aggressive unwrap appended after a lifted path is never reached
//! when the lifted root is absent.


use core::fmt::Debug;

use vc_identity::ForceEq;

use crate::mapper::Mapper;
use crate::{Compose, Lift, Path, ReferenceWritablePath, WritablePath};

// -----------------------------------------------------------------------------
// Adapter

/// Returns the path from `Option<T>` to `T` substituting `default`
/// for an absent value.
///
/// See [`Mapper::unwrapped_with`] for the write policies.
///
/// # Examples
///
/// ```
/// use vc_path::{Readable, Writable, unwrap_path};
///
/// let path = unwrap_path(69, false);
/// let mut slot = None;
///
/// assert_eq!(path.get(&slot), 69);
/// path.set(&mut slot, 0);
/// assert_eq!(slot, None);
///
/// let path = unwrap_path(69, true);
/// path.set(&mut slot, 0);
/// assert_eq!(slot, Some(0));
/// ```
pub fn unwrap_path<T>(default: impl Into<ForceEq<T>>, aggressive: bool) -> WritablePath<Option<T>, T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    Mapper::<Option<T>>::wrap()
        .compose(&Mapper::unwrapped_with(default, aggressive))
        .compose(&Mapper::value_path())
}

/// Adapters of paths whose value is an `Option<T>`.
pub trait OptionalPathExt<T>: Sized {
    /// The adapted path, leading to `T`.
    type Unwrapped;

    /// Returns the path substituting `default` for an absent value.
    ///
    /// With `aggressive == false`, writes through the adapted path only
    /// happen when the value is present. With `aggressive == true`, writes
    /// always store `Some`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::{OptionalPathExt, Readable, Writable, writable_path};
    ///
    /// struct Root { count: Option<u32> }
    ///
    /// let count = writable_path!(Root => count);
    /// let gentle = count.unwrapped(1, false);
    /// let aggressive = count.unwrapped(1, true);
    ///
    /// let mut root = Root { count: None };
    /// assert_eq!(gentle.get(&root), 1);
    ///
    /// gentle.set(&mut root, 5);
    /// assert_eq!(root.count, None);
    ///
    /// aggressive.set(&mut root, 5);
    /// assert_eq!(root.count, Some(5));
    /// ```
    fn unwrapped(&self, default: impl Into<ForceEq<T>>, aggressive: bool) -> Self::Unwrapped;

    /// Returns the path substituting `T::default()` for an absent value.
    #[inline]
    fn unwrapped_or_default(&self, aggressive: bool) -> Self::Unwrapped
    where
        T: Default + PartialEq,
    {
        self.unwrapped(T::default(), aggressive)
    }

    /// Appends `rhs`, a path from the wrapped type, after lifting it.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::{OptionalPathExt, Readable, Writable, writable_path};
    ///
    /// #[derive(Debug, Clone)]
    /// struct Property { value: i32 }
    /// struct Root { property: Option<Property> }
    ///
    /// let property = writable_path!(Root => property);
    /// let value = writable_path!(Property => value);
    /// let path = property.compose_optional(&value);
    ///
    /// let mut root = Root { property: Some(Property { value: 1 }) };
    /// assert_eq!(path.get(&root), Some(1));
    ///
    /// path.set(&mut root, Some(2));
    /// assert_eq!(path.get(&root), Some(2));
    /// ```
    #[inline]
    fn compose_optional<Rhs>(&self, rhs: &Rhs) -> <Self as Compose<Rhs::Lifted>>::Output
    where
        Rhs: Lift,
        Self: Compose<Rhs::Lifted>,
    {
        self.compose(&rhs.lift_to_optional_root())
    }
}

macro_rules! impl_optional_path {
    ($($name:ident),*) => {$(
        impl<R, T> OptionalPathExt<T> for $name<R, Option<T>>
        where
            R: 'static,
            T: Clone + Debug + Send + Sync + 'static,
        {
            type Unwrapped = $name<R, T>;

            #[inline]
            fn unwrapped(&self, default: impl Into<ForceEq<T>>, aggressive: bool) -> Self::Unwrapped {
                self.compose(&unwrap_path(default, aggressive))
            }
        }
    )*};
}

impl_optional_path!(Path, WritablePath, ReferenceWritablePath);
