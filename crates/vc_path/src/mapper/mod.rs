//! Provide [`Mapper`], the uniform node type of mapping paths.
//!
//! A mapping path goes from `Mapper<A>` to `Mapper<B>`. Building paths over
//! `Mapper` instead of the raw types lets this crate attach accessors
//! (unwrapping, indexing, hashing) to any type, including foreign ones.

mod collection;
mod conformances;
mod hashed;
mod optional;

pub use collection::{IndexedCollection, KeyedCollection, SetCollection};
pub use conformances::Mappable;

use crate::{Path, Readable, Writable, WritablePath};

// -----------------------------------------------------------------------------
// Aliases

/// A read-only path between two mappers.
pub type MappingPath<A, B> = Path<Mapper<A>, Mapper<B>>;

/// A writable path between two mappers.
pub type WritableMappingPath<A, B> = WritablePath<Mapper<A>, Mapper<B>>;

// -----------------------------------------------------------------------------
// Mapper

/// A transparent wrapper exposing one value to mapping paths.
///
/// Wrapping and unwrapping are lossless:
/// `Mapper::new(v).into_inner() == v`.
///
/// A mapper is created for each read or write step of a mapping path and
/// dropped when the step completes.
///
/// # Examples
///
/// ```
/// use vc_path::mapper::Mapper;
///
/// let mut mapper = Mapper::new(1);
/// mapper.set(2);
/// *mapper.value_mut() += 1;
///
/// assert_eq!(mapper.value(), &3);
/// assert_eq!(mapper.into_inner(), 3);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Mapper<V> {
    value: V,
}

impl<V> Mapper<V> {
    /// Wraps `value`.
    #[inline(always)]
    pub const fn new(value: V) -> Self {
        Self { value }
    }

    /// Returns a reference to the wrapped value.
    #[inline(always)]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns a mutable reference to the wrapped value.
    #[inline(always)]
    pub const fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replaces the wrapped value.
    #[inline(always)]
    pub fn set(&mut self, value: V) {
        self.value = value;
    }

    /// Extracts the wrapped value.
    #[inline(always)]
    pub fn into_inner(self) -> V {
        self.value
    }

    /// Reads the value at the end of `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::mapper::Mapper;
    ///
    /// let mapper = Mapper::new(Some(4));
    /// let path = Mapper::<Option<i32>>::unwrapped_with(0, false);
    ///
    /// assert_eq!(mapper.map(&path).into_inner(), 4);
    /// ```
    #[inline]
    pub fn map<T>(&self, path: &impl Readable<Self, T>) -> T {
        path.get(self)
    }

    /// Writes `value` at the end of `path`.
    #[inline]
    pub fn map_set<T>(&mut self, path: &impl Writable<Self, T>, value: T) {
        path.set(self, value);
    }
}

impl<V> From<V> for Mapper<V> {
    #[inline(always)]
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

// -----------------------------------------------------------------------------
// Mapping paths

impl<V: Clone + 'static> Mapper<V> {
    /// Returns the path from `V` into its mapper.
    #[inline]
    pub fn wrap() -> WritablePath<V, Self> {
        WritablePath::new(
            |value: &V| Mapper::new(value.clone()),
            |value: &mut V, mapper: Self| *value = mapper.into_inner(),
        )
    }

    /// Returns the path from a mapper to the wrapped value.
    #[inline]
    pub fn value_path() -> WritablePath<Self, V> {
        WritablePath::new(
            |mapper: &Self| mapper.value.clone(),
            |mapper: &mut Self, value: V| mapper.set(value),
        )
    }

    /// Returns the path viewing the value as always present.
    ///
    /// Writing `None` leaves the value unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::mapper::Mapper;
    ///
    /// let path = Mapper::<i32>::optional();
    /// let mut mapper = Mapper::new(1);
    ///
    /// assert_eq!(mapper.map(&path).into_inner(), Some(1));
    ///
    /// mapper.map_set(&path, Mapper::new(None));
    /// assert_eq!(mapper.value(), &1);
    ///
    /// mapper.map_set(&path, Mapper::new(Some(2)));
    /// assert_eq!(mapper.value(), &2);
    /// ```
    #[inline]
    pub fn optional() -> WritableMappingPath<V, Option<V>> {
        WritablePath::new(
            |mapper: &Self| Mapper::new(Some(mapper.value.clone())),
            |mapper: &mut Self, value: Mapper<Option<V>>| {
                if let Some(value) = value.into_inner() {
                    mapper.set(value);
                }
            },
        )
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::*;
    use crate::Compose;

    #[test]
    fn wrap_unwrap_is_lossless() {
        for value in ["", "a", "longer value"] {
            assert_eq!(Mapper::new(value.to_string()).into_inner(), value);
        }

        let mapper: Mapper<_> = 7.into();
        assert_eq!(mapper, Mapper::new(7));
    }

    #[test]
    fn wrap_then_value_is_identity() {
        let path = Mapper::<String>::wrap().compose(&Mapper::value_path());
        let mut text = "before".to_string();

        assert_eq!(path.get(&text), "before");
        path.set(&mut text, "after".to_string());
        assert_eq!(text, "after");
    }

    #[test]
    fn optional_ignores_none() {
        let path = Mapper::<u8>::optional();
        let mut mapper = Mapper::new(3);

        assert_eq!(path.get(&mapper), Mapper::new(Some(3)));
        path.set(&mut mapper, Mapper::new(None));
        assert_eq!(mapper.into_inner(), 3);
    }

    #[test]
    fn mapping_paths_are_comparable() {
        assert_eq!(Mapper::<u8>::optional(), Mapper::<u8>::optional());
        assert_ne!(Mapper::<u8>::value_path().tokens(), Mapper::<u16>::value_path().tokens());
        assert_ne!(Mapper::<u8>::wrap().tokens(), Mapper::<u8>::value_path().tokens());
    }
}
