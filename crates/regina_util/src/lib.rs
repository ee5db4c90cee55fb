//! Typed-index arenas shared by the Regina crates.
//!
//! Simplices, faces, components and surfaces all live in flat vectors owned
//! by their container and are referred to by small index newtypes. This crate
//! provides those newtypes ([`typed_index_struct!`]), the vectors that they
//! index ([`ti::TiVec`]), and bitsets keyed by them ([`ti::TiMask`]).

#[macro_use]
mod macros;
pub mod error;
pub mod ti;

/// Common imports.
pub mod prelude {
    pub use crate::error::{IndexOutOfRange, IndexOverflow};
    pub use crate::ti::{IdSet, TiMask, TiVec, TypedIndex, TypedIndexIter};
}

#[cfg(test)]
mod tests;
