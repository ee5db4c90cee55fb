//! Dual Hilbert basis method for fundamental surfaces.
//!
//! Starts from the Hilbert basis of the orthant (the unit vectors) and
//! intersects with one matching equation at a time. For each equation the
//! basis is split by the sign of the equation's value, and sums of one
//! positive and one negative element are added until every new sum is
//! reducible by an element already present. The elements on the hyperplane
//! then form the Hilbert basis of the intersection. As with the double
//! description method, sums whose support breaks the quad or octagon
//! constraints are never formed.

use std::collections::HashSet;

use itertools::Itertools;
use regina_maths::Integer;

use crate::{Cancellation, Enumeration, MatchingEquations};

#[derive(Debug, Clone)]
struct Element {
    coords: Vec<Integer>,
    value: Integer,
    fresh: bool,
}

fn dot(coords: &[Integer], row: &[Integer]) -> Integer {
    coords
        .iter()
        .zip(row)
        .filter(|(x, _)| !x.is_zero())
        .map(|(x, a)| x * a)
        .sum()
}

fn is_below(a: &[Integer], b: &[Integer]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y)
}

/// Elements of the basis under construction, split by the sign of the
/// current equation.
#[derive(Debug, Default)]
struct Split {
    pos: Vec<Element>,
    neg: Vec<Element>,
    zero: Vec<Element>,
    present: HashSet<Vec<Integer>>,
}

impl Split {
    fn insert(&mut self, elem: Element) {
        self.present.insert(elem.coords.clone());
        match elem.value.sign() {
            1 => self.pos.push(elem),
            -1 => self.neg.push(elem),
            _ => self.zero.push(elem),
        }
    }

    /// Returns whether `coords` is already present or is the sum of an
    /// element on the same side of the hyperplane and something else in the
    /// cone.
    fn is_reducible(&self, coords: &[Integer], value: &Integer) -> bool {
        if self.present.contains(coords) {
            return true;
        }
        let same_side: &[Element] = match value.sign() {
            1 => &self.pos,
            -1 => &self.neg,
            _ => &[],
        };
        same_side
            .iter()
            .chain(&self.zero)
            .any(|b| b.value.abs() <= value.abs() && is_below(&b.coords, coords))
    }
}

/// Returns the admissible Hilbert basis of the cone cut out by `eqs`, and
/// whether the run was cancelled. A cancelled run returns no vectors.
pub(crate) fn hilbert_dual(
    eqs: &MatchingEquations,
    cancel: Option<&Cancellation>,
) -> (Vec<Vec<Integer>>, Enumeration) {
    let width = eqs.width();
    let cancelled = || cancel.is_some_and(Cancellation::is_cancelled);

    let mut basis: Vec<Vec<Integer>> = (0..width)
        .map(|i| {
            let mut v = vec![Integer::ZERO; width];
            v[i] = Integer::ONE;
            v
        })
        .collect();

    for (r, row) in eqs.matrix().iter_rows().enumerate() {
        let mut split = Split::default();
        for coords in basis {
            let value = dot(&coords, row);
            split.insert(Element {
                coords,
                value,
                fresh: true,
            });
        }

        let mut rounds = 0;
        loop {
            if cancelled() {
                log::debug!("Hilbert basis cancelled at equation {r}");
                return (vec![], Enumeration::Cancelled);
            }
            rounds += 1;
            let mut candidates = vec![];
            for p in &split.pos {
                for n in &split.neg {
                    if !(p.fresh || n.fresh) {
                        continue;
                    }
                    if !eqs.is_admissible_support(|c| !p.coords[c].is_zero() || !n.coords[c].is_zero()) {
                        continue;
                    }
                    let coords = p.coords.iter().zip(&n.coords).map(|(x, y)| x + y).collect_vec();
                    candidates.push((coords, &p.value + &n.value));
                }
            }
            for elem in split.pos.iter_mut().chain(&mut split.neg) {
                elem.fresh = false;
            }

            candidates.sort_by_cached_key(|(coords, _)| (coords.iter().sum::<Integer>(), coords.clone()));
            candidates.dedup_by(|a, b| a.0 == b.0);
            let mut grew = false;
            for (coords, value) in candidates {
                if split.is_reducible(&coords, &value) {
                    continue;
                }
                grew |= !value.is_zero();
                split.insert(Element {
                    coords,
                    value,
                    fresh: true,
                });
            }
            if !grew {
                break;
            }
        }
        log::trace!(
            "Hilbert basis: equation {r} leaves {} elements after {rounds} rounds",
            split.zero.len(),
        );
        basis = split.zero.into_iter().map(|e| e.coords).collect();
    }

    let basis: Vec<Vec<Integer>> = basis
        .into_iter()
        .filter(|v| v.iter().any(|x| !x.is_zero()))
        .filter(|v| eqs.is_admissible_support(|c| !v[c].is_zero()))
        .collect();
    let ret = basis
        .iter()
        .filter(|v| !basis.iter().any(|b| b != *v && is_below(b, v)))
        .cloned()
        .collect();
    (ret, Enumeration::Complete)
}
