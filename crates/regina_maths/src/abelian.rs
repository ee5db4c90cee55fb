//! Finitely generated abelian groups.

use std::fmt;

use itertools::Itertools;

use crate::{Integer, MathsError, MathsResult, MatrixInt, primes};

/// Finitely generated abelian group `ℤʳ ⊕ ℤ/d₁ ⊕ ... ⊕ ℤ/dₖ`, stored in
/// canonical form: the invariant factors are all at least 2 and each divides
/// the next. Equality compares canonical forms.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct AbelianGroup {
    rank: usize,
    torsion: Vec<Integer>,
}

impl AbelianGroup {
    /// Trivial group.
    pub const TRIVIAL: Self = Self {
        rank: 0,
        torsion: Vec::new(),
    };

    /// Constructs the free abelian group of the given rank.
    pub fn free(rank: usize) -> Self {
        Self {
            rank,
            torsion: vec![],
        }
    }

    /// Constructs the group with the given presentation matrix, whose rows
    /// are relations and whose columns are generators.
    pub fn from_presentation(presentation: &MatrixInt) -> Self {
        let mut snf = presentation.clone();
        let diag = snf.smith_normal_form();
        let relation_rank = diag.iter().filter(|d| !d.is_zero()).count();
        Self {
            rank: presentation.cols() - relation_rank,
            torsion: diag.into_iter().filter(|d| *d > 1).collect(),
        }
    }

    /// Constructs the homology `ker(outgoing) / im(incoming)` of a chain
    /// complex `C₂ → C₁ → C₀`, where matrices act on column vectors:
    /// `incoming` maps C₂ to C₁ and `outgoing` maps C₁ to C₀.
    ///
    /// Returns an error if the dimensions of the two matrices do not agree.
    /// Does not check that their product is zero.
    pub fn from_chain_complex(incoming: &MatrixInt, outgoing: &MatrixInt) -> MathsResult<Self> {
        if incoming.rows() != outgoing.cols() {
            return Err(MathsError::InvalidArgument(format!(
                "chain maps do not compose: {}x{} after {}x{}",
                outgoing.rows(),
                outgoing.cols(),
                incoming.rows(),
                incoming.cols(),
            )));
        }
        // C₁/ker embeds in the free group C₀, so the torsion of ker/im is the
        // torsion of C₁/im, which the Smith normal form of `incoming` gives.
        let mut snf = incoming.clone();
        let diag = snf.smith_normal_form();
        let image_rank = diag.iter().filter(|d| !d.is_zero()).count();
        let kernel_rank = outgoing.cols() - outgoing.rank();
        Ok(Self {
            rank: kernel_rank - image_rank,
            torsion: diag.into_iter().filter(|d| *d > 1).collect(),
        })
    }

    /// Returns the rank of the free part.
    pub fn rank(&self) -> usize {
        self.rank
    }
    /// Returns the invariant factors `d₁ | d₂ | ...`, all at least 2.
    pub fn invariant_factors(&self) -> &[Integer] {
        &self.torsion
    }
    /// Returns the number of invariant factors divisible by `p`. For prime
    /// `p` this is the rank of the `p`-torsion subgroup.
    pub fn torsion_rank(&self, p: &Integer) -> usize {
        self.torsion.iter().filter(|d| p.divides(d)).count()
    }

    /// Returns whether the group is trivial.
    pub fn is_trivial(&self) -> bool {
        self.rank == 0 && self.torsion.is_empty()
    }
    /// Returns whether the group is infinite cyclic.
    pub fn is_z(&self) -> bool {
        self.rank == 1 && self.torsion.is_empty()
    }
    /// Returns whether the group is free abelian.
    pub fn is_free(&self) -> bool {
        self.torsion.is_empty()
    }
    /// Returns whether the group is `ℤ/n`.
    pub fn is_zn(&self, n: u64) -> bool {
        match n {
            0 => self.is_z(),
            1 => self.is_trivial(),
            _ => self.rank == 0 && self.torsion == [Integer::from(n)],
        }
    }

    /// Adds `ℤᵏ` to the group.
    pub fn add_rank(&mut self, k: usize) {
        self.rank += k;
    }

    /// Adds `ℤ/d` to the group and restores canonical form. Adding `ℤ/0` adds
    /// a free summand and adding `ℤ/1` does nothing.
    pub fn add_torsion(&mut self, d: &Integer) {
        let d = d.abs();
        if d.is_zero() {
            self.rank += 1;
            return;
        }
        if d == 1 {
            return;
        }
        let factors = self.torsion.iter().chain([&d]).cloned().collect_vec();
        let n = factors.len();
        let mut diagonal = MatrixInt::from_fn(n, n, |r, c| match r == c {
            true => factors[r].clone(),
            false => Integer::ZERO,
        });
        self.torsion = diagonal
            .smith_normal_form()
            .into_iter()
            .filter(|f| *f > 1)
            .collect();
    }

    /// Adds another group as a direct summand.
    pub fn add_group(&mut self, other: &AbelianGroup) {
        self.rank += other.rank;
        for d in &other.torsion {
            self.add_torsion(d);
        }
    }

    /// Returns the elementary divisors: the prime powers `pᵉ` whose cyclic
    /// groups sum to the torsion subgroup, in increasing order.
    pub fn elementary_divisors(&self) -> Vec<Integer> {
        self.torsion
            .iter()
            .flat_map(primes::prime_power_decomposition)
            .map(|(p, e)| p.raise_to_power(e))
            .sorted()
            .collect()
    }
}

impl fmt::Display for AbelianGroup {
    /// Writes the group as a sum such as `2 Z + Z_2 + 3 Z_6`, or `0` for the
    /// trivial group.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms = vec![];
        match self.rank {
            0 => (),
            1 => terms.push("Z".to_string()),
            r => terms.push(format!("{r} Z")),
        }
        for (count, d) in self.torsion.iter().dedup_with_count() {
            match count {
                1 => terms.push(format!("Z_{d}")),
                _ => terms.push(format!("{count} Z_{d}")),
            }
        }
        match terms.is_empty() {
            true => write!(f, "0"),
            false => write!(f, "{}", terms.join(" + ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_presentation() {
        // < a, b, c | 2a, 4b + 6c, 6b + 4c >
        let m = MatrixInt::from_rows([[2, 0, 0], [0, 4, 6], [0, 6, 4]]).unwrap();
        let g = AbelianGroup::from_presentation(&m);
        assert_eq!(g.rank(), 0);
        assert_eq!(g.invariant_factors(), [Integer::from(2), Integer::from(2), Integer::from(10)]);
        assert_eq!(g.to_string(), "2 Z_2 + Z_10");
        assert_eq!(g.torsion_rank(&Integer::from(2)), 3);
        assert_eq!(g.torsion_rank(&Integer::from(5)), 1);
        let expected: Vec<Integer> = [2, 2, 2, 5].into_iter().map(Integer::from).collect();
        assert_eq!(g.elementary_divisors(), expected);
    }

    #[test]
    fn test_add_torsion_recanonicalises() {
        let mut g = AbelianGroup::free(2);
        g.add_torsion(&Integer::from(2));
        g.add_torsion(&Integer::from(3));
        assert_eq!(g.invariant_factors(), [Integer::from(6)]);
        g.add_torsion(&Integer::from(4));
        assert_eq!(g.invariant_factors(), [Integer::from(2), Integer::from(12)]);
        assert_eq!(g.to_string(), "2 Z + Z_2 + Z_12");
        g.add_torsion(&Integer::ZERO);
        assert_eq!(g.rank(), 3);
        assert_eq!(AbelianGroup::TRIVIAL.to_string(), "0");
        assert_eq!(AbelianGroup::free(1).to_string(), "Z");
    }

    #[test]
    fn test_chain_complex() {
        // Circle with one vertex and one edge: ∂₁ = 0.
        let d1 = MatrixInt::zero(1, 1);
        let d2 = MatrixInt::zero(1, 0);
        assert!(AbelianGroup::from_chain_complex(&d2, &d1).unwrap().is_z());

        // Cellular RP²: one cell in each dimension, ∂₂ = 2, ∂₁ = 0.
        let d2 = MatrixInt::from_rows([[2]]).unwrap();
        assert!(AbelianGroup::from_chain_complex(&d2, &d1).unwrap().is_zn(2));

        assert!(AbelianGroup::from_chain_complex(&MatrixInt::zero(2, 1), &d1).is_err());
    }
}
