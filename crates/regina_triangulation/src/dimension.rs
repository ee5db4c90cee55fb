//! Type-level dimensions.

use std::fmt;
use std::hash::Hash;

use regina_maths::{Perm, Permutation};

/// Dimension of a triangulation, as a marker type.
///
/// Each dimension fixes the permutation type used for gluings, which acts on
/// the `DIM + 1` vertices of a top-dimensional simplex.
pub trait Dimension:
    'static + fmt::Debug + Default + Copy + Eq + Hash + Send + Sync
{
    /// Dimension of the top-dimensional simplices.
    const DIM: usize;
    /// Permutation of the vertices of a top-dimensional simplex.
    type Perm: Permutation;
    /// Dimension one lower, used for vertex links. The lowest dimension is
    /// its own lower dimension.
    type Lower: Dimension;
}

macro_rules! dimensions {
    ($($name:ident = $dim:literal, $lower:ident;)*) => {
        $(
            #[doc = concat!("Marker for dimension ", stringify!($dim), ".")]
            #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
            pub struct $name;

            impl Dimension for $name {
                const DIM: usize = $dim;
                type Perm = Perm<{ $dim + 1 }>;
                type Lower = $lower;
            }
        )*
    };
}

dimensions! {
    Dim1 = 1, Dim1;
    Dim2 = 2, Dim1;
    Dim3 = 3, Dim2;
    Dim4 = 4, Dim3;
    Dim5 = 5, Dim4;
    Dim6 = 6, Dim5;
    Dim7 = 7, Dim6;
    Dim8 = 8, Dim7;
    Dim9 = 9, Dim8;
    Dim10 = 10, Dim9;
    Dim11 = 11, Dim10;
    Dim12 = 12, Dim11;
    Dim13 = 13, Dim12;
    Dim14 = 14, Dim13;
    Dim15 = 15, Dim14;
}

/// Returns `n` choose `k`.
pub(crate) fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k.min(n - k)).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(16, 8), 12870);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(5, 0), 1);
    }

    #[test]
    fn test_perm_sizes() {
        assert_eq!(<Dim3 as Dimension>::Perm::SIZE, 4);
        assert_eq!(<Dim15 as Dimension>::Perm::SIZE, 16);
        assert_eq!(<Dim4 as Dimension>::Lower::DIM, 3);
    }
}
