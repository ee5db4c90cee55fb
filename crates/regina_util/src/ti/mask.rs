//! Fixed-length bitset keyed by a typed index.

use std::fmt;
use std::marker::PhantomData;

use bitvec::vec::BitVec;

use super::TypedIndex;

/// Set of indices below a fixed bound, stored as one bit per index.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TiMask<I> {
    bits: BitVec,
    _phantom: PhantomData<fn() -> I>,
}

impl<I: TypedIndex> fmt::Debug for TiMask<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<I: TypedIndex> TiMask<I> {
    /// Constructs an empty mask over `len` indices.
    pub fn new_empty(len: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, len),
            _phantom: PhantomData,
        }
    }
    /// Constructs a full mask over `len` indices.
    pub fn new_full(len: usize) -> Self {
        Self {
            bits: BitVec::repeat(true, len),
            _phantom: PhantomData,
        }
    }
    /// Constructs a mask over `len` indices from a predicate.
    pub fn from_fn(len: usize, mut f: impl FnMut(I) -> bool) -> Self {
        let mut ret = Self::new_empty(len);
        for i in I::iter(len) {
            if f(i) {
                ret.insert(i);
            }
        }
        ret
    }

    /// Returns the number of indices the mask ranges over.
    pub fn max_len(&self) -> usize {
        self.bits.len()
    }
    /// Returns the number of indices in the mask.
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }
    /// Returns whether the mask contains no indices.
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Returns whether `i` is in the mask. Indices beyond the bound are never
    /// in the mask.
    pub fn contains(&self, i: I) -> bool {
        self.bits.get(i.to_index()).is_some_and(|b| *b)
    }
    /// Adds `i` to the mask and returns whether it was newly added. Indices
    /// beyond the bound are ignored.
    pub fn insert(&mut self, i: I) -> bool {
        match self.bits.get_mut(i.to_index()) {
            Some(mut b) => !std::mem::replace(&mut *b, true),
            None => false,
        }
    }
    /// Removes `i` from the mask.
    pub fn remove(&mut self, i: I) {
        if let Some(mut b) = self.bits.get_mut(i.to_index()) {
            *b = false;
        }
    }

    /// Returns whether every element of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.bits
            .iter_ones()
            .all(|i| other.bits.get(i).is_some_and(|b| *b))
    }
    /// Returns the intersection of two masks.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let bits = std::iter::zip(&self.bits, &other.bits)
            .map(|(a, b)| *a && *b)
            .collect();
        Self {
            bits,
            _phantom: PhantomData,
        }
    }
    /// Returns the union of two masks.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let bits = std::iter::zip(&self.bits, &other.bits)
            .map(|(a, b)| *a || *b)
            .collect();
        Self {
            bits,
            _phantom: PhantomData,
        }
    }

    /// Returns an iterator over the indices in the mask, in ascending order.
    pub fn iter(&self) -> impl '_ + DoubleEndedIterator<Item = I> {
        self.bits
            .iter_ones()
            .filter_map(|i| I::try_from_index(i).ok())
    }
}
