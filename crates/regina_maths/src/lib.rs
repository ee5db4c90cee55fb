//! Exact arithmetic used throughout Regina.
//!
//! Everything topologically meaningful is computed exactly: arbitrary-size
//! [`Integer`]s with a native fast path, [`Rational`]s with infinite and
//! undefined sentinels, small permutations [`Perm`], dense integer matrices
//! [`MatrixInt`] with Smith and Hermite normal forms, and finitely generated
//! [`AbelianGroup`]s.

macro_rules! debug_panic {
    ($($tok:tt)*) => {
        match cfg!(debug_assertions) {
            true => panic!($($tok)*),
            false => log::error!($($tok)*),
        }
    };
}

mod abelian;
mod error;
mod integer;
mod matrix;
mod normal_form;
pub mod perm;
pub mod primes;
mod rational;

pub use abelian::AbelianGroup;
pub use error::{MathsError, MathsResult};
pub use integer::Integer;
pub use matrix::MatrixInt;
pub use perm::{Parity, Perm, Permutation};
pub use rational::Rational;

/// Structs, traits, and functions.
pub mod prelude {
    pub use crate::perm::{Parity, Perm, Permutation};
    pub use crate::{AbelianGroup, Integer, MathsError, MathsResult, MatrixInt, Rational};
}

#[cfg(test)]
mod tests;
