//! Isomorphism signatures.
//!
//! A signature is a printable string that identifies a triangulation up to
//! combinatorial isomorphism. Each connected component is relabelled by a
//! breadth-first search from every possible starting simplex and vertex
//! labelling, and the lexicographically smallest encoding wins. Component
//! signatures are then sorted and concatenated.
//!
//! The encoding of one component uses the base-64 alphabet
//! `a-z A-Z 0-9 + -` and consists of:
//!
//! - the number of simplices `n`, as a single character if `n < 63` and
//!   otherwise as an escape character, a width `w`, and `w` characters;
//! - one action per facet visited (free, new simplex, or glued to a known
//!   simplex), packed three to a character;
//! - for each gluing to a known simplex, its destination (in the same width
//!   as `n`) and its gluing permutation as a lexicographic index.

use itertools::Itertools;
use regina_maths::Permutation;
use regina_util::ti::TypedIndex;

use crate::{Dimension, Isomorphism, SimplexId, TriResult, Triangulation, TriangulationError};

const ALPHABET: &[u8; 64] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+-";

fn char_of(value: u64) -> char {
    ALPHABET[(value & 63) as usize] as char
}

fn value_of(c: u8) -> Option<u64> {
    ALPHABET.iter().position(|&a| a == c).map(|i| i as u64)
}

fn encode_int(sig: &mut String, value: u64, width: usize) {
    sig.extend((0..width).map(|i| char_of(value >> (6 * i))));
}

/// Number of characters used for each gluing permutation.
fn perm_width<D: Dimension>() -> usize {
    let mut remaining = D::Perm::COUNT - 1;
    let mut width = 1;
    while remaining >= 64 {
        remaining >>= 6;
        width += 1;
    }
    width
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Action {
    Boundary = 0,
    NewSimplex = 1,
    Known = 2,
}

/// Relabelling of one component found by a breadth-first search.
struct Traversal<D: Dimension> {
    sig: String,
    order: Vec<SimplexId>,
    vertex_map: Vec<Option<D::Perm>>,
}

fn traverse<D: Dimension>(tri: &Triangulation<D>, start: SimplexId, labels: D::Perm) -> Traversal<D> {
    let n_total = tri.size();
    let mut image = vec![None; n_total];
    let mut vertex_map: Vec<Option<D::Perm>> = vec![None; n_total];
    let mut order = vec![start];
    image[start.to_index()] = Some(0_usize);
    vertex_map[start.to_index()] = Some(labels.inverse());

    let mut actions = vec![];
    let mut dests = vec![];
    let mut gluings = vec![];
    let mut i = 0;
    while let Some(&src) = order.get(i) {
        let src_image = image[src.to_index()].unwrap_or(0);
        let Some(src_map) = vertex_map[src.to_index()] else {
            break;
        };
        for new_facet in 0..=D::DIM {
            let facet = src_map.pre_image_of(new_facet);
            let Some(g) = tri.simplices[src].gluing(facet) else {
                actions.push(Action::Boundary);
                continue;
            };
            let dst = g.simplex.to_index();
            if let Some(dst_image) = image[dst] {
                let earlier = dst_image < src_image
                    || (g.simplex == src && src_map.image(g.perm.image(facet)) < new_facet);
                if earlier {
                    continue;
                }
            }
            match (image[dst], vertex_map[dst]) {
                (Some(dst_image), Some(dst_map)) => {
                    dests.push(dst_image as u64);
                    gluings.push((dst_map * g.perm * src_map.inverse()).ordered_sn_index());
                    actions.push(Action::Known);
                }
                _ => {
                    image[dst] = Some(order.len());
                    vertex_map[dst] = Some(src_map * g.perm.inverse());
                    order.push(g.simplex);
                    actions.push(Action::NewSimplex);
                }
            }
        }
        i += 1;
    }

    let n = order.len() as u64;
    let mut sig = String::new();
    let width = if n < 63 {
        1
    } else {
        let width = (64 - n.leading_zeros() as usize).div_ceil(6);
        sig.push(char_of(63));
        sig.push(char_of(width as u64));
        width
    };
    encode_int(&mut sig, n, width);
    for chunk in &actions.iter().chunks(3) {
        let packed = chunk
            .enumerate()
            .fold(0, |acc, (j, &a)| acc | ((a as u64) << (2 * j)));
        sig.push(char_of(packed));
    }
    for d in dests {
        encode_int(&mut sig, d, width);
    }
    for g in gluings {
        encode_int(&mut sig, g, perm_width::<D>());
    }
    Traversal {
        sig,
        order,
        vertex_map,
    }
}

/// Cursor over the characters of a signature.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
    fn next_value(&mut self) -> TriResult<u64> {
        let c = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| TriangulationError::invalid("isomorphism signature ends early"))?;
        self.pos += 1;
        value_of(c).ok_or_else(|| {
            TriangulationError::invalid(format!(
                "invalid character {:?} in isomorphism signature",
                c as char,
            ))
        })
    }
    fn next_int(&mut self, width: usize) -> TriResult<u64> {
        let mut ret = 0;
        for i in 0..width {
            ret |= self.next_value()? << (6 * i);
        }
        Ok(ret)
    }
}

impl<D: Dimension> Triangulation<D> {
    /// Returns the isomorphism signature, together with the relabelling that
    /// takes this triangulation to the one the signature describes.
    pub fn isosig_with_isomorphism(&self) -> (String, Isomorphism<D>) {
        let n = self.size();
        if n == 0 {
            return ("a".to_string(), Isomorphism::from_parts(vec![], vec![]));
        }
        let mut best_per_component = self
            .components()
            .iter_values()
            .filter_map(|component| {
                component
                    .simplices()
                    .iter()
                    .cartesian_product(D::Perm::all().collect_vec())
                    .map(|(&start, labels)| traverse(self, start, labels))
                    .min_by(|a, b| a.sig.cmp(&b.sig))
            })
            .collect_vec();
        best_per_component.sort_by(|a, b| a.sig.cmp(&b.sig));

        let mut simplex_image = vec![SimplexId(0); n];
        let mut facet_perm = vec![D::Perm::identity(); n];
        let mut offset = 0;
        for traversal in &best_per_component {
            for (i, &s) in traversal.order.iter().enumerate() {
                simplex_image[s.to_index()] = SimplexId((offset + i) as u32);
                if let Some(map) = traversal.vertex_map[s.to_index()] {
                    facet_perm[s.to_index()] = map;
                }
            }
            offset += traversal.order.len();
        }
        let sig = best_per_component.iter().map(|t| t.sig.as_str()).collect();
        (sig, Isomorphism::from_parts(simplex_image, facet_perm))
    }

    /// Returns the isomorphism signature.
    pub fn isosig(&self) -> String {
        self.isosig_with_isomorphism().0
    }

    /// Reconstructs a triangulation from its isomorphism signature.
    pub fn from_isosig(sig: &str) -> TriResult<Self> {
        let mut reader = Reader {
            bytes: sig.as_bytes(),
            pos: 0,
        };
        let mut ret = Self::new();
        {
            let mut tri = ret.change_span();
            loop {
                read_component(&mut tri, &mut reader)?;
                if reader.at_end() {
                    break;
                }
            }
        }
        Ok(ret)
    }

    /// Returns whether the two triangulations are combinatorially
    /// isomorphic.
    pub fn is_isomorphic_to(&self, other: &Self) -> bool {
        self.size() == other.size() && self.isosig() == other.isosig()
    }

    /// Returns an isomorphism from this triangulation to `other`, if there is
    /// one.
    pub fn find_isomorphism(&self, other: &Self) -> Option<Isomorphism<D>> {
        if self.size() != other.size() {
            return None;
        }
        let (sig, to_canonical) = self.isosig_with_isomorphism();
        let (other_sig, other_to_canonical) = other.isosig_with_isomorphism();
        (sig == other_sig)
            .then(|| to_canonical.then(&other_to_canonical.inverse()).ok())
            .flatten()
    }

    /// Relabels the simplices and vertices into the canonical order used by
    /// the isomorphism signature.
    pub fn make_canonical(&mut self) -> TriResult<()> {
        let (_, iso) = self.isosig_with_isomorphism();
        self.relabel(&iso)
    }
}

fn read_component<D: Dimension>(tri: &mut Triangulation<D>, reader: &mut Reader<'_>) -> TriResult<()> {
    let first = reader.next_value()?;
    let (n, width) = if first < 63 {
        (first as usize, 1)
    } else {
        let width = reader.next_value()? as usize;
        (reader.next_int(width)? as usize, width)
    };
    if n == 0 {
        return Ok(());
    }

    let mut actions = vec![];
    let mut positions = n * (D::DIM + 1);
    while positions > 0 {
        let packed = reader.next_value()?;
        for j in 0..3 {
            let trit = (packed >> (2 * j)) & 3;
            if positions == 0 {
                if trit != 0 {
                    return Err(TriangulationError::invalid("trailing facet actions in signature"));
                }
                continue;
            }
            let (action, used) = match trit {
                0 => (Action::Boundary, 1),
                1 => (Action::NewSimplex, 2),
                2 => (Action::Known, 2),
                _ => return Err(TriangulationError::invalid("invalid facet action in signature")),
            };
            if used > positions {
                return Err(TriangulationError::invalid("facet actions overrun the simplices"));
            }
            positions -= used;
            actions.push(action);
        }
    }
    let known = actions.iter().filter(|&&a| a == Action::Known).count();
    let dests = (0..known)
        .map(|_| Ok(reader.next_int(width)? as usize))
        .collect::<TriResult<Vec<_>>>()?;
    let gluings = (0..known)
        .map(|_| reader.next_int(perm_width::<D>()))
        .collect::<TriResult<Vec<_>>>()?;

    let offset = tri.size();
    let ids = tri.new_simplices(n)?;
    let mut actions = actions.into_iter();
    let mut dests = dests.into_iter();
    let mut gluings = gluings.into_iter();
    let mut next_new = 1;
    for i in 0..n {
        for f in 0..=D::DIM {
            if tri.gluing(ids[i], f).is_some() {
                continue;
            }
            match actions.next() {
                Some(Action::Boundary) => (),
                Some(Action::NewSimplex) => {
                    if next_new >= n {
                        return Err(TriangulationError::invalid("too many new simplices in signature"));
                    }
                    tri.join(ids[i], f, ids[next_new], D::Perm::identity())?;
                    next_new += 1;
                }
                Some(Action::Known) => {
                    let (Some(dest), Some(index)) = (dests.next(), gluings.next()) else {
                        return Err(TriangulationError::invalid("missing gluing in signature"));
                    };
                    if dest >= n || index >= D::Perm::COUNT {
                        return Err(TriangulationError::invalid("gluing out of range in signature"));
                    }
                    let dest = SimplexId::try_from_index(offset + dest)?;
                    tri.join(ids[i], f, dest, D::Perm::ordered_sn(index))?;
                }
                None => return Err(TriangulationError::invalid("too few facet actions in signature")),
            }
        }
    }
    if next_new != n {
        return Err(TriangulationError::invalid("signature describes a disconnected component"));
    }
    Ok(())
}
