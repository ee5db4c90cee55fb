//! Numbering of the subfaces of a simplex.
//!
//! The `k`-faces of a `dim`-simplex are numbered in lexicographic order of
//! their vertex sets, so the edges of a tetrahedron are `01, 02, 03, 12, 13,
//! 23`. Facets are the exception: facet `i` is always the facet opposite
//! vertex `i`, and gluings are described in those terms.

use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use smallvec::SmallVec;

/// Vertex set of a subface, as a sorted list of simplex vertices.
pub type VertexSet = SmallVec<[u8; 16]>;

/// Numbering of the `k`-faces of a `dim`-simplex.
#[derive(Debug)]
pub struct FaceNumbering {
    dim: usize,
    subdim: usize,
    faces: Vec<VertexSet>,
    /// Face number for each vertex bitmask, or `u32::MAX` if the mask does not
    /// have exactly `subdim + 1` bits.
    by_mask: Vec<u32>,
}

lazy_static! {
    static ref NUMBERINGS: Mutex<HashMap<(usize, usize), Arc<FaceNumbering>>> =
        Mutex::new(HashMap::new());
}

impl FaceNumbering {
    /// Returns the numbering of the `subdim`-faces of a `dim`-simplex. Tables
    /// are built once per process and shared.
    ///
    /// # Panics
    ///
    /// Panics if `subdim > dim` or `dim > 15`.
    pub fn get(dim: usize, subdim: usize) -> Arc<FaceNumbering> {
        assert!(subdim <= dim && dim <= 15, "no {subdim}-faces in a {dim}-simplex");
        NUMBERINGS
            .lock()
            .entry((dim, subdim))
            .or_insert_with(|| Arc::new(Self::build(dim, subdim)))
            .clone()
    }

    fn build(dim: usize, subdim: usize) -> Self {
        let faces: Vec<VertexSet> = (0..=dim as u8)
            .combinations(subdim + 1)
            .map(VertexSet::from_vec)
            .collect();
        let mut by_mask = vec![u32::MAX; 1 << (dim + 1)];
        for (i, face) in faces.iter().enumerate() {
            by_mask[mask_of(face)] = i as u32;
        }
        Self {
            dim,
            subdim,
            faces,
            by_mask,
        }
    }

    /// Returns the dimension of the simplex.
    pub fn dim(&self) -> usize {
        self.dim
    }
    /// Returns the dimension of the subfaces.
    pub fn subdim(&self) -> usize {
        self.subdim
    }
    /// Returns the number of subfaces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }
    /// Returns whether there are no subfaces, which never happens.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
    /// Returns the sorted vertices of subface `i`.
    pub fn vertices(&self, i: usize) -> &[u8] {
        &self.faces[i]
    }
    /// Returns whether subface `i` contains vertex `v`.
    pub fn contains(&self, i: usize, v: usize) -> bool {
        self.faces[i].contains(&(v as u8))
    }
    /// Returns the number of the subface with the given vertices, in any
    /// order, or `None` if there is no such subface.
    pub fn index_of(&self, vertices: impl IntoIterator<Item = usize>) -> Option<usize> {
        let mask = vertices.into_iter().fold(0, |m, v| m | (1 << v));
        match self.by_mask.get(mask) {
            Some(&i) if i != u32::MAX => Some(i as usize),
            _ => None,
        }
    }
    /// Returns the images of the canonical ordering permutation of subface
    /// `i`: its own vertices in increasing order, followed by the remaining
    /// vertices in increasing order.
    pub fn ordering(&self, i: usize) -> Vec<usize> {
        let face = &self.faces[i];
        let rest = (0..=self.dim).filter(|&v| !face.contains(&(v as u8)));
        face.iter().map(|&v| v as usize).chain(rest).collect()
    }
}

fn mask_of(vertices: &[u8]) -> usize {
    vertices.iter().fold(0, |m, &v| m | (1 << v))
}
