//! Typed indices and the collections keyed by them.

mod index;
mod mask;
mod vec;

pub use index::{TypedIndex, TypedIndexIter};
pub use mask::TiMask;
pub use tinyset::Fits64;

/// Compact set of typed indices, for small sets of faces or simplices.
pub type IdSet<I> = tinyset::Set64<I>;
pub use vec::{Iter, TiVec};

pub use crate::error::{IndexOutOfRange, IndexOverflow};
