use std::hash::Hash;
use std::marker::PhantomData;
use std::{fmt, ops};

use crate::error::IndexOverflow;

/// Small unsigned newtype naming a position in a [`TiVec`](super::TiVec).
///
/// Implemented by [`typed_index_struct!`](crate::typed_index_struct). The
/// largest value of the underlying integer is never used, so the length of a
/// full arena is itself representable.
pub trait TypedIndex:
    'static + Copy + Default + Eq + Ord + Hash + fmt::Debug + fmt::Display + tinyset::Fits64 + Send + Sync
{
    /// Largest usable index.
    const MAX: Self;
    /// [`Self::MAX`] as a `usize`.
    const MAX_INDEX: usize;
    /// Name of the newtype, used in error messages.
    const TYPE_NAME: &'static str;

    /// Position as a `usize`.
    fn to_index(self) -> usize;
    /// Index for position `i`, if the type can name it.
    fn try_from_index(i: usize) -> Result<Self, IndexOverflow>;

    /// Indices `0..count`, stopping early at [`Self::MAX`].
    fn iter(count: usize) -> TypedIndexIter<Self> {
        TypedIndexIter {
            positions: 0..count.min(Self::MAX_INDEX.saturating_add(1)),
            _key: PhantomData,
        }
    }
}

/// Iterator returned by [`TypedIndex::iter()`].
#[derive(Debug, Default, Clone)]
pub struct TypedIndexIter<I> {
    positions: ops::Range<usize>,
    _key: PhantomData<fn() -> I>,
}

impl<I: TypedIndex> Iterator for TypedIndexIter<I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        I::try_from_index(self.positions.next()?).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<I: TypedIndex> DoubleEndedIterator for TypedIndexIter<I> {
    fn next_back(&mut self) -> Option<I> {
        I::try_from_index(self.positions.next_back()?).ok()
    }
}

impl<I: TypedIndex> ExactSizeIterator for TypedIndexIter<I> {}
