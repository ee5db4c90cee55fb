//! Errors from typed-index arenas.

use thiserror::Error;

use crate::ti::TypedIndex;

/// An arena is full: its index type cannot name one more element.
///
/// This is what adding a simplex to a triangulation that already has the
/// maximum number of simplices reports.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("{kind} arena is full (largest index is {max_index})")]
pub struct IndexOverflow {
    /// Name of the index type, such as `SimplexId`.
    pub kind: &'static str,
    /// Largest index the type can represent.
    pub max_index: usize,
}

impl IndexOverflow {
    /// Overflow of the index type `I`.
    pub fn new<I: TypedIndex>() -> Self {
        Self {
            kind: I::TYPE_NAME,
            max_index: I::MAX_INDEX,
        }
    }
}

/// A typed index names no element of an arena.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("no {kind} {index} among {len} entries")]
pub struct IndexOutOfRange {
    /// Name of the index type, such as `SimplexId`.
    pub kind: &'static str,
    /// Index that was looked up.
    pub index: usize,
    /// Number of elements in the arena.
    pub len: usize,
}

impl IndexOutOfRange {
    /// Lookup of `index` in an arena of `len` elements.
    pub fn new<I: TypedIndex>(index: I, len: usize) -> Self {
        Self {
            kind: I::TYPE_NAME,
            index: index.to_index(),
            len,
        }
    }
}
