use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;

use super::Mapper;
use crate::{Readable, Writable};

// -----------------------------------------------------------------------------
// Mappable

/// A value that can be read and written through mapping paths.
///
/// Every method has a default implementation, containers opt in with an
/// empty impl:
///
/// ```
/// use vc_path::mapper::{Mappable, Mapper};
///
/// #[derive(Clone)]
/// struct Grid(Vec<u8>);
///
/// impl Mappable for Grid {}
/// ```
///
/// The value is cloned into a [`Mapper`] for the duration of each operation.
pub trait Mappable: Clone {
    /// Reads the value at the end of `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::mapper::{Mappable, Mapper};
    ///
    /// let value = Some(3);
    /// assert_eq!(value.map_path(&Mapper::<Option<i32>>::unwrapped_with(0, false)), 3);
    /// ```
    #[inline]
    fn map_path<T>(&self, path: &impl Readable<Mapper<Self>, Mapper<T>>) -> T {
        path.get(&Mapper::new(self.clone())).into_inner()
    }

    /// Writes `value` at the end of `path`.
    fn set_map_path<T>(&mut self, path: &impl Writable<Mapper<Self>, Mapper<T>>, value: T) {
        let mut mapper = Mapper::new(self.clone());
        path.set(&mut mapper, Mapper::new(value));
        *self = mapper.into_inner();
    }

    /// Reads the value at the end of `path`, lets `f` modify it, then writes it back.
    fn update_map_path<T, O>(
        &mut self,
        path: &impl Writable<Mapper<Self>, Mapper<T>>,
        f: impl FnOnce(&mut T) -> O,
    ) -> O {
        let mut mapper = Mapper::new(self.clone());
        let output = path.update(&mut mapper, |value| f(value.value_mut()));
        *self = mapper.into_inner();
        output
    }
}

// -----------------------------------------------------------------------------
// Implementations

impl<V: Clone> Mappable for Mapper<V> {}

impl Mappable for String {}

impl<T: Clone> Mappable for Option<T> {}

impl<T: Clone, E: Clone> Mappable for Result<T, E> {}

impl<T: Clone> Mappable for Vec<T> {}

impl<T: Clone> Mappable for VecDeque<T> {}

impl<T: Clone, const N: usize> Mappable for [T; N] {}

impl<K: Clone, V: Clone> Mappable for BTreeMap<K, V> {}

impl<T: Clone> Mappable for BTreeSet<T> {}

impl<K: Clone, V: Clone, S: Clone> Mappable for hashbrown::HashMap<K, V, S> {}

impl<T: Clone, S: Clone> Mappable for hashbrown::HashSet<T, S> {}

#[cfg(feature = "std")]
impl<K: Clone, V: Clone, S: Clone> Mappable for std::collections::HashMap<K, V, S> {}

#[cfg(feature = "std")]
impl<T: Clone, S: Clone> Mappable for std::collections::HashSet<T, S> {}

// -----------------------------------------------------------------------------
// Tests
