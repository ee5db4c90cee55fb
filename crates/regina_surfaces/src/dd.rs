//! Double description method for vertex surfaces.
//!
//! Starts from the unit vectors, which span the non-negative orthant, and
//! intersects with one matching equation at a time. After each equation the
//! extreme rays are those on the hyperplane plus one combination of each
//! adjacent pair on opposite sides. Pairs whose combined support breaks the
//! quad or octagon constraints are never combined, so every intermediate ray
//! is admissible.

use bitvec::prelude::*;
use regina_maths::Integer;

use crate::lp::make_primitive;
use crate::{Cancellation, Enumeration, MatchingEquations};

#[derive(Debug, Clone)]
struct Ray {
    coords: Vec<Integer>,
    zeros: BitVec,
}

impl Ray {
    fn new(coords: Vec<Integer>) -> Self {
        let zeros = coords.iter().map(Integer::is_zero).collect();
        Self { coords, zeros }
    }

    fn dot(&self, row: &[Integer]) -> Integer {
        self.coords
            .iter()
            .zip(row)
            .filter(|(x, _)| !x.is_zero())
            .map(|(x, a)| x * a)
            .sum()
    }
}

/// Returns the admissible extreme rays of the cone cut out by `eqs`, and
/// whether the run was cancelled. A cancelled run returns no rays.
pub(crate) fn double_description(
    eqs: &MatchingEquations,
    cancel: Option<&Cancellation>,
) -> (Vec<Vec<Integer>>, Enumeration) {
    let width = eqs.width();
    let cancelled = || cancel.is_some_and(Cancellation::is_cancelled);

    let mut rays: Vec<Ray> = (0..width)
        .map(|i| {
            let mut v = vec![Integer::ZERO; width];
            v[i] = Integer::ONE;
            Ray::new(v)
        })
        .collect();

    for (r, row) in eqs.matrix().iter_rows().enumerate() {
        if cancelled() {
            log::debug!("double description cancelled at equation {r}");
            return (vec![], Enumeration::Cancelled);
        }
        let values: Vec<Integer> = rays.iter().map(|ray| ray.dot(row)).collect();
        let (mut pos, mut neg, mut next) = (vec![], vec![], vec![]);
        for (i, value) in values.iter().enumerate() {
            match value.sign() {
                1 => pos.push(i),
                -1 => neg.push(i),
                _ => next.push(rays[i].clone()),
            }
        }

        for &p in &pos {
            if cancelled() {
                log::debug!("double description cancelled at equation {r}");
                return (vec![], Enumeration::Cancelled);
            }
            for &n in &neg {
                let mut common = rays[p].zeros.clone();
                common &= rays[n].zeros.as_bitslice();
                if !eqs.is_admissible_support(|c| !common[c]) {
                    continue;
                }
                // Adjacent iff no other ray vanishes everywhere both do.
                let adjacent = rays.iter().enumerate().all(|(i, other)| {
                    i == p || i == n || common.iter_ones().any(|c| !other.zeros[c])
                });
                if !adjacent {
                    continue;
                }
                let (a, b) = (&values[p], -&values[n]);
                let mut coords: Vec<Integer> = rays[p]
                    .coords
                    .iter()
                    .zip(&rays[n].coords)
                    .map(|(x, y)| &b * x + a * y)
                    .collect();
                make_primitive(&mut coords);
                next.push(Ray::new(coords));
            }
        }
        log::trace!(
            "double description: equation {r} leaves {} rays ({} +, {} -)",
            next.len(),
            pos.len(),
            neg.len(),
        );
        rays = next;
    }

    let ret = rays.into_iter().map(|ray| ray.coords).collect();
    (ret, Enumeration::Complete)
}
