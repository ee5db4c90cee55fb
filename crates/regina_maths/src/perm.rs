//! Permutations of `{0, ..., N-1}` for `2 <= N <= 16`.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Mul;
use std::sync::OnceLock;

use itertools::Itertools;

use crate::{MathsError, MathsResult};

/// Parity of a permutation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Parity {
    /// Even number of transpositions.
    #[default]
    Even = 0,
    /// Odd number of transpositions.
    Odd = 1,
}
impl Parity {
    /// Returns the opposite parity.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }
    /// Returns `1` for even and `-1` for odd.
    pub fn sign(self) -> i32 {
        match self {
            Parity::Even => 1,
            Parity::Odd => -1,
        }
    }
    /// Returns the parity of an index: even indices are even.
    pub fn of_index(i: u64) -> Self {
        match i % 2 {
            0 => Parity::Even,
            _ => Parity::Odd,
        }
    }
}

const FACTORIALS: [u64; 17] = {
    let mut ret = [1_u64; 17];
    let mut i = 1;
    while i < 17 {
        ret[i] = ret[i - 1] * i as u64;
        i += 1;
    }
    ret
};

/// Returns `n!` for `n <= 16`.
pub const fn factorial(n: usize) -> u64 {
    FACTORIALS[n]
}

/// Bits used for each image.
const BITS: usize = 4;
const MASK: u64 = 0xf;

/// Permutation of `{0, ..., N-1}`, packed into a single word with four bits
/// per image.
///
/// `p * q` is the composition that applies `q` first, so
/// `(p * q).image(i) == p.image(q.image(i))`.
///
/// Permutations are ordered lexicographically by their image sequences, which
/// agrees with the order of [`Perm::ordered_sn()`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Perm<const N: usize> {
    code: u64,
}

impl<const N: usize> Default for Perm<N> {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl<const N: usize> Perm<N> {
    /// Number of permutations of this size.
    pub const COUNT: u64 = {
        assert!(2 <= N && N <= 16, "permutation size must be between 2 and 16");
        factorial(N)
    };

    /// Identity permutation.
    pub const IDENTITY: Self = {
        let mut code = 0;
        let mut i = 0;
        while i < N {
            code |= (i as u64) << (BITS * i);
            i += 1;
        }
        Self { code }
    };

    /// Returns the identity permutation.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Constructs the permutation swapping `a` and `b`. If `a == b` this is
    /// the identity.
    ///
    /// # Panics
    ///
    /// Panics if either argument is out of range.
    pub fn transposition(a: usize, b: usize) -> Self {
        assert!(a < N && b < N, "transposition ({a} {b}) out of range for Perm<{N}>");
        let mut ret = Self::IDENTITY;
        ret.set(a, b);
        ret.set(b, a);
        ret
    }

    /// Constructs a permutation from its image sequence.
    ///
    /// # Panics
    ///
    /// Panics if `images` is not a permutation. Use [`Perm::from_images()`]
    /// for unvalidated input.
    pub fn from_array(images: [usize; N]) -> Self {
        match Self::from_images(&images) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Constructs a permutation from its image sequence, or returns an error
    /// if the sequence is not a bijection of `{0, ..., N-1}`.
    pub fn from_images(images: &[usize]) -> MathsResult<Self> {
        if images.len() != N {
            return Err(MathsError::InvalidArgument(format!(
                "expected {N} images, got {}",
                images.len(),
            )));
        }
        let mut seen = 0_u32;
        let mut code = 0;
        for (i, &img) in images.iter().enumerate() {
            if img >= N || seen & (1 << img) != 0 {
                return Err(MathsError::InvalidArgument(format!(
                    "{images:?} is not a permutation of 0..{N}",
                )));
            }
            seen |= 1 << img;
            code |= (img as u64) << (BITS * i);
        }
        Ok(Self { code })
    }

    /// Constructs the permutation mapping `a[i]` to `b[i]` for each `i`.
    /// Both slices must list distinct elements; any elements not listed in
    /// `a` are mapped to those not listed in `b` in increasing order.
    pub fn from_pairs(a: &[usize], b: &[usize]) -> MathsResult<Self> {
        if a.len() != b.len() || a.len() > N {
            return Err(MathsError::InvalidArgument(
                "mismatched image lists".to_string(),
            ));
        }
        let mut images = [usize::MAX; N];
        for (&x, &y) in std::iter::zip(a, b) {
            if x >= N || images[x] != usize::MAX {
                return Err(MathsError::InvalidArgument(format!("repeated preimage {x}")));
            }
            images[x] = y;
        }
        let mut unused = (0..N).filter(|y| !b.contains(y));
        for img in &mut images {
            if *img == usize::MAX {
                *img = unused.next().unwrap_or(usize::MAX);
            }
        }
        Self::from_images(&images)
    }

    /// Returns the packed image code.
    pub fn code(self) -> u64 {
        self.code
    }

    fn set(&mut self, i: usize, img: usize) {
        self.code &= !(MASK << (BITS * i));
        self.code |= (img as u64) << (BITS * i);
    }

    /// Returns the image of `i`.
    pub fn image(self, i: usize) -> usize {
        ((self.code >> (BITS * i)) & MASK) as usize
    }

    /// Returns the preimage of `i`.
    pub fn pre_image_of(self, i: usize) -> usize {
        (0..N).find(|&j| self.image(j) == i).unwrap_or(N)
    }

    /// Returns the image sequence.
    pub fn images(self) -> [usize; N] {
        std::array::from_fn(|i| self.image(i))
    }

    /// Returns the inverse permutation.
    #[must_use]
    pub fn inverse(self) -> Self {
        let mut ret = Self { code: 0 };
        for i in 0..N {
            ret.set(self.image(i), i);
        }
        ret
    }

    /// Returns the permutation whose image sequence is this one's reversed.
    #[must_use]
    pub fn reverse(self) -> Self {
        let mut ret = Self { code: 0 };
        for i in 0..N {
            ret.set(i, self.image(N - 1 - i));
        }
        ret
    }

    /// Returns the cyclic shift `i -> i + k (mod N)`.
    pub fn rot(k: usize) -> Self {
        let mut ret = Self { code: 0 };
        for i in 0..N {
            ret.set(i, (i + k) % N);
        }
        ret
    }

    /// Returns whether this is the identity.
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Returns the parity.
    pub fn parity(self) -> Parity {
        let inversions = (0..N)
            .tuple_combinations()
            .filter(|&(i, j)| self.image(i) > self.image(j))
            .count();
        Parity::of_index(inversions as u64)
    }

    /// Returns `1` for even permutations and `-1` for odd ones.
    pub fn sign(self) -> i32 {
        self.parity().sign()
    }

    /// Returns the smallest `k > 0` with `self^k` the identity.
    pub fn order(self) -> u64 {
        let mut seen = 0_u32;
        let mut ret = 1_u64;
        for start in 0..N {
            if seen & (1 << start) != 0 {
                continue;
            }
            let mut len = 0_u64;
            let mut i = start;
            while seen & (1 << i) == 0 {
                seen |= 1 << i;
                i = self.image(i);
                len += 1;
            }
            ret = num_integer::lcm(ret, len);
        }
        ret
    }

    /// Returns the lexicographic index of this permutation, between `0` and
    /// `N! - 1`.
    pub fn ordered_sn_index(self) -> u64 {
        let mut ret = 0;
        let mut used = 0_u32;
        for i in 0..N {
            let img = self.image(i);
            let smaller_unused = (0..img).filter(|&j| used & (1 << j) == 0).count() as u64;
            ret += smaller_unused * factorial(N - 1 - i);
            used |= 1 << img;
        }
        ret
    }

    /// Returns the permutation with the given lexicographic index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N!`.
    pub fn ordered_sn(index: u64) -> Self {
        assert!(index < Self::COUNT, "index {index} out of range for Perm<{N}>");
        let mut remaining: Vec<usize> = (0..N).collect();
        let mut index = index;
        let mut ret = Self { code: 0 };
        for i in 0..N {
            let f = factorial(N - 1 - i);
            let k = (index / f) as usize;
            index %= f;
            ret.set(i, remaining.remove(k));
        }
        ret
    }

    /// Returns the index of this permutation in the sign-alternating order
    /// of [`Perm::sn()`].
    pub fn sn_index(self) -> u64 {
        let i = self.ordered_sn_index();
        match Parity::of_index(i) == self.parity() {
            true => i,
            false => i ^ 1,
        }
    }

    /// Returns the permutation with the given index in the sign-alternating
    /// order, in which even permutations occupy even indices and each pair
    /// `(2k, 2k+1)` differs by swapping the last two images.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N!`.
    pub fn sn(index: u64) -> Self {
        let p = Self::ordered_sn(index);
        match Parity::of_index(index) == p.parity() {
            true => p,
            false => Self::ordered_sn(index ^ 1),
        }
    }

    /// Replaces this permutation with the next one in the [`Perm::sn()`]
    /// order, wrapping around to the identity after the last.
    pub fn increment(&mut self) {
        let next = self.sn_index() + 1;
        *self = match next < Self::COUNT {
            true => Self::sn(next),
            false => Self::IDENTITY,
        };
    }

    /// Returns an iterator over all permutations in [`Perm::sn()`] order.
    pub fn iter_sn() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::sn)
    }

    /// Returns an iterator over all permutations in lexicographic order.
    pub fn iter_ordered() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::ordered_sn)
    }

    /// Extends to a permutation of `{0, ..., M-1}` that fixes every element
    /// `>= N`.
    pub fn extend<const M: usize>(self) -> Perm<M> {
        const { assert!(M >= N) };
        let mut ret = Perm::<M>::IDENTITY;
        for i in 0..N {
            ret.set(i, self.image(i));
        }
        ret
    }

    /// Restricts to a permutation of `{0, ..., M-1}`, or returns `None` if
    /// some element below `M` maps outside that range.
    pub fn contract<const M: usize>(self) -> Option<Perm<M>> {
        let images: Vec<usize> = (0..M).map(|i| self.image(i)).collect();
        Perm::<M>::from_images(&images).ok()
    }
}

impl<const N: usize> Mul for Perm<N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut ret = Self { code: 0 };
        for i in 0..N {
            ret.set(i, self.image(rhs.image(i)));
        }
        ret
    }
}

impl<const N: usize> Ord for Perm<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        (0..N)
            .map(|i| self.image(i).cmp(&other.image(i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<const N: usize> PartialOrd for Perm<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> fmt::Display for Perm<N> {
    /// Writes the image sequence as hexadecimal digits, such as `1032`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..N {
            write!(f, "{:x}", self.image(i))?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for Perm<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Perm<{N}>({self})")
    }
}

/// Lookup tables for small permutations, indexed by [`Perm::sn_index()`].
struct PermTables {
    by_index: Vec<u64>,
    inverse: Vec<u32>,
    order: Vec<u8>,
    /// Full product table, only kept for `N <= 6`.
    product: Option<Vec<u32>>,
}

/// Largest size for which [`Perm::precompute()`] builds lookup tables.
pub const MAX_TABULATED: usize = 7;
/// Largest size for which the full product table is built.
const MAX_PRODUCT_TABLE: usize = 6;

static TABLES: [OnceLock<PermTables>; MAX_TABULATED + 1] = [const { OnceLock::new() }; MAX_TABULATED + 1];

impl<const N: usize> Perm<N> {
    /// Builds the process-wide lookup tables used by the `cached_*` methods.
    ///
    /// This is idempotent and thread-safe. Sizes above
    /// [`MAX_TABULATED`] have no tables, but this still checks that every
    /// index fits in a `usize` on this platform.
    pub fn precompute() -> MathsResult<()> {
        if usize::try_from(Self::COUNT).is_err() {
            return Err(MathsError::FailedPrecondition(format!(
                "{N}! does not fit in a usize on this platform"
            )));
        }
        if N <= MAX_TABULATED {
            TABLES[N].get_or_init(Self::build_tables);
        }
        Ok(())
    }

    fn build_tables() -> PermTables {
        log::debug!("precomputing tables for Perm<{N}>");
        let all: Vec<Self> = Self::iter_sn().collect();
        let index_of = |p: Self| p.sn_index() as u32;
        PermTables {
            by_index: all.iter().map(|p| p.code).collect(),
            inverse: all.iter().map(|p| index_of(p.inverse())).collect(),
            order: all.iter().map(|p| p.order() as u8).collect(),
            product: (N <= MAX_PRODUCT_TABLE).then(|| {
                all.iter()
                    .flat_map(|&p| all.iter().map(move |&q| index_of(p * q)))
                    .collect()
            }),
        }
    }

    fn tables() -> Option<&'static PermTables> {
        TABLES.get(N)?.get()
    }

    /// Returns the inverse, using lookup tables if they have been built.
    #[must_use]
    pub fn cached_inverse(self) -> Self {
        match Self::tables() {
            Some(t) => Self {
                code: t.by_index[t.inverse[self.sn_index() as usize] as usize],
            },
            None => self.inverse(),
        }
    }

    /// Returns `self * other`, using lookup tables if they have been built.
    #[must_use]
    pub fn cached_comp(self, other: Self) -> Self {
        match Self::tables() {
            Some(PermTables {
                by_index,
                product: Some(product),
                ..
            }) => {
                let i = self.sn_index() as usize * Self::COUNT as usize + other.sn_index() as usize;
                Self {
                    code: by_index[product[i] as usize],
                }
            }
            _ => self * other,
        }
    }

    /// Returns the order, using lookup tables if they have been built.
    pub fn cached_order(self) -> u64 {
        match Self::tables() {
            Some(t) => u64::from(t.order[self.sn_index() as usize]),
            None => self.order(),
        }
    }
}

/// Operations shared by every permutation size, for code that is generic
/// over the dimension of a triangulation.
pub trait Permutation:
    'static + fmt::Debug + fmt::Display + Copy + Eq + Ord + std::hash::Hash + Send + Sync + Mul<Output = Self>
{
    /// Number of elements permuted.
    const SIZE: usize;
    /// Number of permutations of this size.
    const COUNT: u64;

    /// Returns the identity permutation.
    fn identity() -> Self;
    /// Constructs a permutation from its image sequence.
    fn from_images(images: &[usize]) -> MathsResult<Self>;
    /// Constructs the transposition of `a` and `b`.
    fn transposition(a: usize, b: usize) -> Self;
    /// Returns the image of `i`.
    fn image(self, i: usize) -> usize;
    /// Returns the preimage of `i`.
    fn pre_image_of(self, i: usize) -> usize;
    /// Returns the inverse.
    fn inverse(self) -> Self;
    /// Returns the parity.
    fn parity(self) -> Parity;
    /// Returns the lexicographic index.
    fn ordered_sn_index(self) -> u64;
    /// Returns the permutation with the given lexicographic index.
    fn ordered_sn(index: u64) -> Self;

    /// Returns `1` for even permutations and `-1` for odd ones.
    fn sign(self) -> i32 {
        self.parity().sign()
    }
    /// Returns the image sequence.
    fn image_vec(self) -> Vec<usize> {
        (0..Self::SIZE).map(|i| self.image(i)).collect()
    }
    /// Returns an iterator over all permutations in lexicographic order.
    fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::ordered_sn)
    }
}

impl<const N: usize> Permutation for Perm<N> {
    const SIZE: usize = N;
    const COUNT: u64 = Perm::<N>::COUNT;

    fn identity() -> Self {
        Self::IDENTITY
    }
    fn from_images(images: &[usize]) -> MathsResult<Self> {
        Perm::from_images(images)
    }
    fn transposition(a: usize, b: usize) -> Self {
        Perm::transposition(a, b)
    }
    fn image(self, i: usize) -> usize {
        Perm::image(self, i)
    }
    fn pre_image_of(self, i: usize) -> usize {
        Perm::pre_image_of(self, i)
    }
    fn inverse(self) -> Self {
        Perm::inverse(self)
    }
    fn parity(self) -> Parity {
        Perm::parity(self)
    }
    fn ordered_sn_index(self) -> u64 {
        Perm::ordered_sn_index(self)
    }
    fn ordered_sn(index: u64) -> Self {
        Perm::ordered_sn(index)
    }
}

#[cfg(feature = "serde")]
impl<const N: usize> serde::Serialize for Perm<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.images())
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize> serde::Deserialize<'de> for Perm<N> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let images = Vec::<usize>::deserialize(deserializer)?;
        Self::from_images(&images).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sn_order_alternates_sign() {
        for (i, p) in Perm::<4>::iter_sn().enumerate() {
            assert_eq!(p.parity(), Parity::of_index(i as u64));
            assert_eq!(p.sn_index(), i as u64);
        }
        // Consecutive pairs differ by swapping the last two images.
        for k in 0..12 {
            assert_eq!(Perm::<4>::sn(2 * k) * Perm::transposition(2, 3), Perm::sn(2 * k + 1));
        }
    }

    #[test]
    fn test_ordered_sn_is_lexicographic() {
        let all: Vec<Perm<5>> = Perm::iter_ordered().collect();
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(all[0], Perm::IDENTITY);
        assert_eq!(all[119], Perm::from_array([4, 3, 2, 1, 0]));
    }

    #[test]
    fn test_increment_wraps() {
        let mut p = Perm::<3>::sn(5);
        p.increment();
        assert_eq!(p, Perm::IDENTITY);
    }

    #[test]
    fn test_large_perm_index_round_trip() {
        let p = Perm::<16>::from_array([15, 3, 0, 7, 1, 2, 14, 4, 5, 6, 13, 8, 9, 12, 10, 11]);
        assert_eq!(Perm::ordered_sn(p.ordered_sn_index()), p);
        assert_eq!(Perm::sn(p.sn_index()), p);
        assert_eq!(p * p.inverse(), Perm::IDENTITY);
        assert_eq!(Perm::<16>::ordered_sn(Perm::<16>::COUNT - 1).image(0), 15);
    }

    #[test]
    fn test_cached_matches_direct() {
        Perm::<5>::precompute().unwrap();
        Perm::<5>::precompute().unwrap();
        for p in Perm::<5>::iter_sn().step_by(7) {
            assert_eq!(p.cached_inverse(), p.inverse());
            assert_eq!(p.cached_order(), p.order());
            for q in Perm::<5>::iter_sn().step_by(11) {
                assert_eq!(p.cached_comp(q), p * q);
            }
        }
    }

    #[test]
    fn test_from_images_rejects_non_bijection() {
        assert!(Perm::<4>::from_images(&[0, 1, 1, 3]).is_err());
        assert!(Perm::<4>::from_images(&[0, 1, 2]).is_err());
        assert!(Perm::<4>::from_images(&[0, 1, 2, 4]).is_err());
    }

    #[test]
    fn test_display_and_extend() {
        let p = Perm::<4>::from_array([1, 3, 0, 2]);
        assert_eq!(p.to_string(), "1302");
        assert_eq!(p.extend::<5>().to_string(), "13024");
        assert_eq!(p.extend::<5>().contract::<4>(), Some(p));
        assert_eq!(Perm::<5>::transposition(0, 4).contract::<4>(), None);
        assert_eq!(p.order(), 4);
        assert_eq!(p.reverse().to_string(), "2031");
    }
}
