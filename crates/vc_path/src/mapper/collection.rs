//! Indexed, keyed and membership accessors on collections.

use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::any::type_name;
use core::fmt::Debug;
use core::hash::{BuildHasher, Hash};
use core::ops::{Index, IndexMut};

use vc_identity::IdentityToken;

use super::{Mapper, WritableMappingPath};
use crate::WritablePath;

// -----------------------------------------------------------------------------
// Collection traits

/// A collection addressed by contiguous positions `0..len`.
pub trait IndexedCollection: IndexMut<usize> {
    /// Returns the number of positions.
    fn len(&self) -> usize;
}

/// A collection mapping keys to values.
pub trait KeyedCollection {
    /// The type of the keys.
    type Key;
    /// The type of the values stored under keys.
    type Value;

    /// Returns the value stored under `key`.
    fn value_of(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn insert_value(&mut self, key: Self::Key, value: Self::Value);

    /// Removes the value stored under `key`.
    fn remove_key(&mut self, key: &Self::Key);
}

/// A collection of distinct items.
pub trait SetCollection {
    /// The type of the items.
    type Item;

    /// Returns `true` if `item` is in the collection.
    fn has_item(&self, item: &Self::Item) -> bool;

    /// Adds `item`, doing nothing if it is already present.
    fn insert_item(&mut self, item: Self::Item);

    /// Removes `item`, doing nothing if it is absent.
    fn remove_item(&mut self, item: &Self::Item);
}

// -----------------------------------------------------------------------------
// Indexed access

type Element<C> = <C as Index<usize>>::Output;

impl<C> Mapper<C>
where
    C: IndexedCollection + Clone + 'static,
    Element<C>: Clone + 'static,
{
    /// Returns the path to position `index`, assuming it is valid.
    ///
    /// # Panics
    ///
    /// Reading or writing through the path panics if `index` is out of range,
    /// like direct indexing.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::mapper::{Mappable, Mapper};
    ///
    /// let mut array = vec![0, 1, 2, 3];
    ///
    /// assert_eq!(array.map_path(&Mapper::<Vec<i32>>::unsafe_index(0)), 0);
    ///
    /// array.set_map_path(&Mapper::<Vec<i32>>::unsafe_index(0), 1);
    /// assert_eq!(array, [1, 1, 2, 3]);
    /// ```
    pub fn unsafe_index(index: usize) -> WritableMappingPath<C, Element<C>> {
        WritablePath::with_identity(
            move |mapper: &Self| Mapper::new(mapper.value()[index].clone()),
            move |mapper: &mut Self, value: Mapper<Element<C>>| {
                mapper.value_mut()[index] = value.into_inner();
            },
            [IdentityToken::of(index)],
        )
    }

    /// Returns the bounds-checked path to position `index`.
    ///
    /// - Reads yield `None` when `index` is out of range.
    /// - Writing `None`, or writing out of range, does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_path::mapper::{Mappable, Mapper};
    ///
    /// let mut array = vec![0, 1, 2, 3];
    /// let first = Mapper::<Vec<i32>>::safe_index(0);
    /// let far = Mapper::<Vec<i32>>::safe_index(9);
    ///
    /// assert_eq!(array.map_path(&first), Some(0));
    /// assert_eq!(array.map_path(&far), None);
    ///
    /// array.set_map_path(&first, None);
    /// array.set_map_path(&far, Some(1));
    /// assert_eq!(array, [0, 1, 2, 3]);
    ///
    /// array.set_map_path(&first, Some(1));
    /// assert_eq!(array, [1, 1, 2, 3]);
    /// ```
    pub fn safe_index(index: usize) -> WritableMappingPath<C, Option<Element<C>>> {
        WritablePath::with_identity(
            move |mapper: &Self| {
                let collection = mapper.value();
                Mapper::new((index < collection.len()).then(|| collection[index].clone()))
            },
            move |mapper: &mut Self, value: Mapper<Option<Element<C>>>| {
                let collection = mapper.value_mut();
                match value.into_inner() {
                    Some(value) if index < collection.len() => collection[index] = value,
                    Some(_) => log::trace!(
                        "ignored write at index {index} of a `{}` of length {}",
                        type_name::<C>(),
                        collection.len(),
                    ),
                    None => {}
                }
            },
            [IdentityToken::of(index)],
        )
    }
}

// -----------------------------------------------------------------------------
// Keyed access

impl<C> Mapper<C>
where
    C: KeyedCollection + Clone + 'static,
    C::Key: Clone + PartialEq + Debug + Send + Sync + 'static,
    C::Value: Clone + 'static,
{
    /// Returns the path to the value stored under `key`.
    ///
    /// Writing `Some` inserts, writing `None` removes.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use vc_path::mapper::{Mappable, Mapper};
    ///
    /// let mut map = BTreeMap::from([("a", 1)]);
    /// let a = Mapper::<BTreeMap<&str, i32>>::key("a");
    /// let b = Mapper::<BTreeMap<&str, i32>>::key("b");
    ///
    /// assert_eq!(map.map_path(&a), Some(1));
    ///
    /// map.set_map_path(&b, Some(2));
    /// map.set_map_path(&a, None);
    /// assert_eq!(map, BTreeMap::from([("b", 2)]));
    /// ```
    pub fn key(key: C::Key) -> WritableMappingPath<C, Option<C::Value>> {
        let token = IdentityToken::equatable(key.clone());
        let read_key = key.clone();

        WritablePath::with_identity(
            move |mapper: &Self| Mapper::new(mapper.value().value_of(&read_key).cloned()),
            move |mapper: &mut Self, value: Mapper<Option<C::Value>>| match value.into_inner() {
                Some(value) => mapper.value_mut().insert_value(key.clone(), value),
                None => mapper.value_mut().remove_key(&key),
            },
            [token],
        )
    }
}

// -----------------------------------------------------------------------------
// Membership

impl<C> Mapper<C>
where
    C: SetCollection + Clone + 'static,
    C::Item: Clone + PartialEq + Debug + Send + Sync + 'static,
{
    /// Returns the path to the membership of `item`.
    ///
    /// Writing `true` inserts, writing `false` removes.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeSet;
    /// use vc_path::mapper::{Mappable, Mapper};
    ///
    /// let mut set = BTreeSet::from([1]);
    /// let two = Mapper::<BTreeSet<i32>>::contains(2);
    ///
    /// assert!(!set.map_path(&two));
    /// set.set_map_path(&two, true);
    /// assert_eq!(set, BTreeSet::from([1, 2]));
    /// ```
    pub fn contains(item: C::Item) -> WritableMappingPath<C, bool> {
        let token = IdentityToken::equatable(item.clone());
        let read_item = item.clone();

        WritablePath::with_identity(
            move |mapper: &Self| Mapper::new(mapper.value().has_item(&read_item)),
            move |mapper: &mut Self, value: Mapper<bool>| {
                if value.into_inner() {
                    mapper.value_mut().insert_item(item.clone());
                } else {
                    mapper.value_mut().remove_item(&item);
                }
            },
            [token],
        )
    }
}

// -----------------------------------------------------------------------------
// Implementations

impl<T> IndexedCollection for Vec<T> {
    #[inline(always)]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T> IndexedCollection for VecDeque<T> {
    #[inline(always)]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }
}

impl<T, const N: usize> IndexedCollection for [T; N] {
    #[inline(always)]
    fn len(&self) -> usize {
        N
    }
}

impl<K: Ord, V> KeyedCollection for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn value_of(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    #[inline]
    fn insert_value(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    #[inline]
    fn remove_key(&mut self, key: &K) {
        self.remove(key);
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> KeyedCollection for hashbrown::HashMap<K, V, S> {
    type Key = K;
    type Value = V;

    #[inline]
    fn value_of(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    #[inline]
    fn insert_value(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    #[inline]
    fn remove_key(&mut self, key: &K) {
        self.remove(key);
    }
}

#[cfg(feature = "std")]
impl<K: Eq + Hash, V, S: BuildHasher> KeyedCollection for std::collections::HashMap<K, V, S> {
    type Key = K;
    type Value = V;

    #[inline]
    fn value_of(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    #[inline]
    fn insert_value(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    #[inline]
    fn remove_key(&mut self, key: &K) {
        self.remove(key);
    }
}

impl<T: Ord> SetCollection for BTreeSet<T> {
    type Item = T;

    #[inline]
    fn has_item(&self, item: &T) -> bool {
        self.contains(item)
    }

    #[inline]
    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }

    #[inline]
    fn remove_item(&mut self, item: &T) {
        self.remove(item);
    }
}

impl<T: Eq + Hash, S: BuildHasher> SetCollection for hashbrown::HashSet<T, S> {
    type Item = T;

    #[inline]
    fn has_item(&self, item: &T) -> bool {
        self.contains(item)
    }

    #[inline]
    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }

    #[inline]
    fn remove_item(&mut self, item: &T) {
        self.remove(item);
    }
}

#[cfg(feature = "std")]
impl<T: Eq + Hash, S: BuildHasher> SetCollection for std::collections::HashSet<T, S> {
    type Item = T;

    #[inline]
    fn has_item(&self, item: &T) -> bool {
        self.contains(item)
    }

    #[inline]
    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }

    #[inline]
    fn remove_item(&mut self, item: &T) {
        self.remove(item);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::mapper::Mappable;

    use super::*;

    #[test]
    fn unsafe_index() {
        let mut array = vec![0, 1, 2, 3];
        let first = Mapper::<Vec<i32>>::unsafe_index(0);

        assert_eq!(array.map_path(&first), 0);

        array.set_map_path(&first, 1);
        assert_eq!(array, [1, 1, 2, 3]);
    }

    #[test]
    #[should_panic]
    fn unsafe_index_out_of_range() {
        let array = vec![0];
        array.map_path(&Mapper::<Vec<i32>>::unsafe_index(1));
    }

    #[test]
    fn safe_index() {
        let mut array = vec![0, 1, 2, 3];
        let first = Mapper::<Vec<i32>>::safe_index(0);
        let last = Mapper::<Vec<i32>>::safe_index(3);
        let past = Mapper::<Vec<i32>>::safe_index(4);

        assert_eq!(array.map_path(&first), Some(0));
        assert_eq!(array.map_path(&last), Some(3));
        assert_eq!(array.map_path(&past), None);

        array.set_map_path(&first, None);
        assert_eq!(array, [0, 1, 2, 3]);

        array.set_map_path(&past, Some(1));
        assert_eq!(array, [0, 1, 2, 3]);

        array.set_map_path(&first, Some(1));
        assert_eq!(array, [1, 1, 2, 3]);

        array.set_map_path(&last, Some(9));
        assert_eq!(array, [1, 1, 2, 9]);
    }

    #[test]
    fn other_indexed_collections() {
        let mut ring = VecDeque::from([1, 2]);
        ring.set_map_path(&Mapper::<VecDeque<i32>>::safe_index(1), Some(5));
        assert_eq!(ring, [1, 5]);

        let mut fixed = [0_u8; 3];
        fixed.set_map_path(&Mapper::<[u8; 3]>::safe_index(2), Some(7));
        assert_eq!(fixed.map_path(&Mapper::<[u8; 3]>::safe_index(3)), None);
        assert_eq!(fixed, [0, 0, 7]);
    }

    #[test]
    fn index_is_part_of_identity() {
        assert_eq!(Mapper::<Vec<u8>>::safe_index(1), Mapper::<Vec<u8>>::safe_index(1));
        assert_ne!(Mapper::<Vec<u8>>::safe_index(1), Mapper::<Vec<u8>>::safe_index(2));
    }

    #[test]
    fn keyed_access() {
        let mut map = hashbrown::HashMap::<&str, u8>::new();
        let key = Mapper::<hashbrown::HashMap<&str, u8>>::key("k");

        assert_eq!(map.map_path(&key), None);

        map.set_map_path(&key, Some(1));
        assert_eq!(map.get("k"), Some(&1));

        map.update_map_path(&key, |value| *value = value.map(|v| v + 1));
        assert_eq!(map.get("k"), Some(&2));

        map.set_map_path(&key, None);
        assert!(map.is_empty());
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_keyed_access() {
        let mut map = std::collections::HashMap::from([(1, 'a')]);
        let one = Mapper::<std::collections::HashMap<i32, char>>::key(1);

        assert_eq!(map.map_path(&one), Some('a'));
        map.set_map_path(&one, Some('b'));
        assert_eq!(map[&1], 'b');
    }

    #[test]
    fn membership() {
        let mut set = hashbrown::HashSet::<u8>::new();
        let three = Mapper::<hashbrown::HashSet<u8>>::contains(3);

        assert!(!set.map_path(&three));

        set.set_map_path(&three, true);
        assert!(set.contains(&3));

        set.set_map_path(&three, false);
        assert!(set.is_empty());
        assert_ne!(three, Mapper::<hashbrown::HashSet<u8>>::contains(4));
    }

    #[test]
    fn keys_are_part_of_identity() {
        type Map = BTreeMap<u8, u8>;
        type Set = BTreeSet<u8>;

        assert_eq!(Mapper::<Map>::key(1), Mapper::<Map>::key(1));
        assert_ne!(Mapper::<Map>::key(1), Mapper::<Map>::key(2));
        assert_eq!(Mapper::<Set>::contains(1), Mapper::<Set>::contains(1));
        assert_eq!(Mapper::<Vec<u8>>::unsafe_index(0), Mapper::<Vec<u8>>::unsafe_index(0));
    }
}
