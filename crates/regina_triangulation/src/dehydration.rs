//! Dehydration strings for closed census 3-manifolds.
//!
//! A dehydration string packs a connected, closed triangulation with at most
//! 25 tetrahedra into lowercase letters, each standing for a number from 0 to
//! 25. The first letter is the number of tetrahedra `n`. A bit string follows,
//! two letters (high then low nibble) per byte and least significant bit
//! first, with one bit per facet visited in breadth-first order: `1` if the
//! facet is glued to a new tetrahedron by the identity, `0` otherwise. Then
//! come `n + 1` destination tetrahedra and `n + 1` gluing permutations for
//! the `0` facets, each permutation given as the index `i` of
//! `ordered_sn(i).reverse()`.

use itertools::Itertools;
use regina_maths::Perm;
use regina_util::ti::TypedIndex;

use crate::{Dim3, SimplexId, TriResult, Triangulation, TriangulationError};

/// Largest number of tetrahedra that fits in a dehydration string.
pub const MAX_DEHYDRATION_SIZE: usize = 25;

fn letter(value: usize) -> char {
    (b'a' + value as u8) as char
}

fn gluing_perm(index: usize) -> Perm<4> {
    Perm::<4>::ordered_sn(index as u64).reverse()
}

impl Triangulation<Dim3> {
    /// Reconstructs a triangulation from a dehydration string.
    pub fn rehydrate(s: &str) -> TriResult<Self> {
        let bad = |msg: &str| TriangulationError::invalid(format!("invalid dehydration string {s:?}: {msg}"));
        let values = s
            .bytes()
            .map(|c| match c {
                b'a'..=b'z' => Ok((c - b'a') as usize),
                _ => Err(bad("not a lowercase letter")),
            })
            .collect::<TriResult<Vec<_>>>()?;
        let Some(&n) = values.first() else {
            return Err(bad("empty"));
        };
        let bit_letters = 2 * n.div_ceil(4);
        if values.len() != 1 + bit_letters + 2 * (n + 1) {
            return Err(bad("wrong length"));
        }
        let bits = values[1..1 + bit_letters]
            .iter()
            .tuples()
            .map(|(&hi, &lo)| hi * 16 + lo)
            .flat_map(|byte| (0..8).map(move |j| (byte >> j) & 1 == 1))
            .collect_vec();
        let (dests, perms) = values[1 + bit_letters..].split_at(n + 1);

        let mut ret = Self::new();
        {
            let mut tri = ret.change_span();
            let ids = tri.new_simplices(n)?;
            let mut bits = bits.into_iter();
            let mut gluings = std::iter::zip(dests, perms);
            let mut next_new = 1;
            for t in 0..n {
                for f in 0..4 {
                    if tri.gluing(ids[t], f).is_some() {
                        continue;
                    }
                    if bits.next().ok_or_else(|| bad("too few bits"))? {
                        if next_new >= n {
                            return Err(bad("too many new tetrahedra"));
                        }
                        tri.join(ids[t], f, ids[next_new], Perm::IDENTITY)?;
                        next_new += 1;
                    } else {
                        let (&dest, &perm) = gluings.next().ok_or_else(|| bad("too few gluings"))?;
                        if dest >= n || perm >= 24 {
                            return Err(bad("gluing out of range"));
                        }
                        tri.join(ids[t], f, ids[dest], gluing_perm(perm))?;
                    }
                }
            }
        }
        if ret.has_boundary_facets() {
            return Err(bad("triangulation is not closed"));
        }
        Ok(ret)
    }

    /// Returns the lexicographically smallest dehydration string over every
    /// choice of starting tetrahedron and vertex labelling.
    ///
    /// The triangulation must be closed, connected and have at most 25
    /// tetrahedra.
    pub fn dehydrate(&self) -> TriResult<String> {
        let n = self.size();
        if n == 0 || n > MAX_DEHYDRATION_SIZE || !self.is_connected() || self.has_boundary_facets() {
            return Err(TriangulationError::precondition(
                "dehydration requires a closed connected triangulation with 1 to 25 tetrahedra",
            ));
        }
        let best = self
            .simplices
            .iter_keys()
            .cartesian_product(Perm::<4>::iter_ordered().collect_vec())
            .map(|(start, labels)| self.dehydrate_from(start, labels))
            .min();
        best.ok_or_else(|| TriangulationError::precondition("no tetrahedra to dehydrate"))
    }

    fn dehydrate_from(&self, start: SimplexId, labels: Perm<4>) -> String {
        let n = self.size();
        let mut image = vec![None; n];
        let mut vertex_map = vec![Perm::<4>::IDENTITY; n];
        let mut order = vec![start];
        image[start.to_index()] = Some(0);
        vertex_map[start.to_index()] = labels.inverse();

        let mut bits = vec![];
        let mut dests = vec![];
        let mut perms = vec![];
        let mut i = 0;
        while let Some(&src) = order.get(i) {
            let src_image = i;
            let src_map = vertex_map[src.to_index()];
            for new_facet in 0..4 {
                let facet = src_map.pre_image_of(new_facet);
                let Some(g) = self.simplices[src].gluing(facet) else {
                    continue;
                };
                let dst = g.simplex.to_index();
                match image[dst] {
                    Some(dst_image) => {
                        let earlier = dst_image < src_image
                            || (g.simplex == src && src_map.image(g.perm.image(facet)) < new_facet);
                        if earlier {
                            continue;
                        }
                        bits.push(false);
                        dests.push(dst_image);
                        let perm = vertex_map[dst] * g.perm * src_map.inverse();
                        perms.push(perm.reverse().ordered_sn_index() as usize);
                    }
                    None => {
                        image[dst] = Some(order.len());
                        vertex_map[dst] = src_map * g.perm.inverse();
                        order.push(g.simplex);
                        bits.push(true);
                    }
                }
            }
            i += 1;
        }

        let mut ret = String::new();
        ret.push(letter(n));
        for byte in &bits.into_iter().chunks(8) {
            let byte = byte
                .enumerate()
                .fold(0, |acc, (j, bit)| acc | (usize::from(bit) << j));
            ret.push(letter(byte >> 4));
            ret.push(letter(byte & 15));
        }
        ret.extend(dests.into_iter().map(letter));
        ret.extend(perms.into_iter().map(letter));
        ret
    }
}
