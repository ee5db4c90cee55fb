//! Flat arena keyed by an index newtype.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::{fmt, iter, slice};

use itertools::Itertools;

use super::{TypedIndex, TypedIndexIter};
use crate::error::{IndexOutOfRange, IndexOverflow};

/// Iterator over `(index, &element)` pairs of a [`TiVec`].
pub type Iter<'a, I, E> = iter::Zip<TypedIndexIter<I>, slice::Iter<'a, E>>;

/// Simplices of a triangulation, faces of one dimension, surfaces of a list:
/// a `Vec<E>` whose positions are named by `I` instead of `usize`.
///
/// Growth is checked against the range of `I`, so a collection never holds
/// an element that its index type cannot name. Lookups with `[]` panic on a
/// bad index; [`TiVec::get()`] reports it instead.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TiVec<I, E> {
    elems: Vec<E>,
    _key: PhantomData<I>,
}

impl<I, E> TiVec<I, E> {
    fn wrap(elems: Vec<E>) -> Self {
        Self {
            elems,
            _key: PhantomData,
        }
    }
}

impl<I: TypedIndex, E> TiVec<I, E> {
    /// Constructs an empty arena.
    pub const fn new() -> Self {
        Self {
            elems: Vec::new(),
            _key: PhantomData,
        }
    }

    /// Checks that `len` elements can be named by `I`.
    fn reserve_keys(len: usize) -> Result<(), IndexOverflow> {
        match len {
            0 => Ok(()),
            n => I::try_from_index(n - 1).map(drop),
        }
    }

    /// Builds an arena of `len` elements, calling `f` once per index in
    /// increasing order.
    pub fn from_fn(len: usize, f: impl FnMut(I) -> E) -> Result<Self, IndexOverflow> {
        Self::reserve_keys(len)?;
        Ok(Self::wrap(I::iter(len).map(f).collect()))
    }
    /// Builds an arena of `len` copies of `value`.
    pub fn filled(len: usize, value: E) -> Result<Self, IndexOverflow>
    where
        E: Clone,
    {
        Self::reserve_keys(len)?;
        Ok(Self::wrap(vec![value; len]))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elems.len()
    }
    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Appends `value` and returns the index it was given.
    pub fn push(&mut self, value: E) -> Result<I, IndexOverflow> {
        let key = I::try_from_index(self.elems.len())?;
        self.elems.push(value);
        Ok(key)
    }
    /// Takes out the element at `key`. Every later element moves down one
    /// index, so outstanding keys past `key` must be renumbered by the
    /// caller.
    pub fn remove(&mut self, key: I) -> Result<E, IndexOutOfRange> {
        let len = self.len();
        match key.to_index() {
            i if i < len => Ok(self.elems.remove(i)),
            _ => Err(IndexOutOfRange::new(key, len)),
        }
    }
    /// Drops every element.
    pub fn clear(&mut self) {
        self.elems.clear();
    }

    /// Returns the element at `key`.
    pub fn get(&self, key: I) -> Result<&E, IndexOutOfRange> {
        self.elems
            .get(key.to_index())
            .ok_or_else(|| IndexOutOfRange::new(key, self.elems.len()))
    }
    /// Returns the element at `key` mutably.
    pub fn get_mut(&mut self, key: I) -> Result<&mut E, IndexOutOfRange> {
        let len = self.elems.len();
        self.elems
            .get_mut(key.to_index())
            .ok_or_else(|| IndexOutOfRange::new(key, len))
    }

    /// Iterates over the valid indices.
    pub fn iter_keys(&self) -> TypedIndexIter<I> {
        I::iter(self.len())
    }
    /// Iterates over the elements without their indices.
    pub fn iter_values(&self) -> slice::Iter<'_, E> {
        self.elems.iter()
    }
    /// Iterates mutably over the elements without their indices.
    pub fn iter_values_mut(&mut self) -> slice::IterMut<'_, E> {
        self.elems.iter_mut()
    }
    /// Iterates over `(index, &element)` pairs.
    pub fn iter(&self) -> Iter<'_, I, E> {
        self.iter_keys().zip(&self.elems)
    }

    /// Builds a parallel arena with the same indices, for per-simplex or
    /// per-face data derived from this one.
    pub fn map_ref<'a, U>(&'a self, mut f: impl FnMut(I, &'a E) -> U) -> TiVec<I, U> {
        TiVec::wrap(self.iter().map(|(i, e)| f(i, e)).collect())
    }
    /// Like [`TiVec::map_ref()`], consuming the elements.
    pub fn map<U>(self, mut f: impl FnMut(I, E) -> U) -> TiVec<I, U> {
        TiVec::wrap(self.iter_keys().zip(self.elems).map(|(i, e)| f(i, e)).collect())
    }
}

impl<I, E: fmt::Debug> fmt::Debug for TiVec<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.elems).finish()
    }
}

impl<I, E> Default for TiVec<I, E> {
    fn default() -> Self {
        Self::wrap(Vec::new())
    }
}

impl<I, E> Deref for TiVec<I, E> {
    type Target = [E];

    fn deref(&self) -> &[E] {
        &self.elems
    }
}
impl<I, E> DerefMut for TiVec<I, E> {
    fn deref_mut(&mut self) -> &mut [E] {
        &mut self.elems
    }
}

impl<I: TypedIndex, E> Index<I> for TiVec<I, E> {
    type Output = E;

    fn index(&self, key: I) -> &E {
        &self.elems[key.to_index()]
    }
}
impl<I: TypedIndex, E> IndexMut<I> for TiVec<I, E> {
    fn index_mut(&mut self, key: I) -> &mut E {
        &mut self.elems[key.to_index()]
    }
}

/// Elements past the last index that `I` can name are dropped.
impl<I: TypedIndex, E> FromIterator<E> for TiVec<I, E> {
    fn from_iter<T: IntoIterator<Item = E>>(elems: T) -> Self {
        Self::wrap(elems.into_iter().take(I::MAX_INDEX.saturating_add(1)).collect_vec())
    }
}

impl<'a, I: TypedIndex, E> IntoIterator for &'a TiVec<I, E> {
    type Item = (I, &'a E);
    type IntoIter = Iter<'a, I, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
