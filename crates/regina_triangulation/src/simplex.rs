//! Top-dimensional simplices and their gluings.

use smallvec::SmallVec;

use crate::Dimension;

regina_util::typed_index_struct! {
    /// Index of a top-dimensional simplex within its triangulation.
    pub struct SimplexId(pub u32);
    /// Index of a face within the faces of one dimension of a skeleton.
    pub struct FaceId(pub u32);
    /// Index of a connected component.
    pub struct ComponentId(pub u32);
    /// Index of a boundary component.
    pub struct BoundaryComponentId(pub u32);
}

/// Gluing of one facet of a simplex onto a facet of another (or the same)
/// simplex.
///
/// If facet `f` of simplex `s` carries the gluing `(t, p)`, then vertex `v`
/// of `s` is identified with vertex `p(v)` of `t`, and facet `f` is glued to
/// facet `p(f)` of `t`. The other side always carries `(s, p⁻¹)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Gluing<D: Dimension> {
    /// Simplex on the other side.
    pub simplex: SimplexId,
    /// Map from the vertices of this simplex to those of the other.
    pub perm: D::Perm,
}

/// Top-dimensional simplex of a triangulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simplex<D: Dimension> {
    pub(crate) adj: SmallVec<[Option<Gluing<D>>; 16]>,
    pub(crate) description: String,
}

impl<D: Dimension> Default for Simplex<D> {
    fn default() -> Self {
        Self {
            adj: smallvec::smallvec![None; D::DIM + 1],
            description: String::new(),
        }
    }
}

impl<D: Dimension> Simplex<D> {
    /// Returns the gluing on facet `f`, or `None` if the facet is free.
    pub fn gluing(&self, f: usize) -> Option<Gluing<D>> {
        self.adj.get(f).copied().flatten()
    }
    /// Returns the simplex glued to facet `f`, if any.
    pub fn adjacent_simplex(&self, f: usize) -> Option<SimplexId> {
        self.gluing(f).map(|g| g.simplex)
    }
    /// Returns whether facet `f` is free.
    pub fn is_free(&self, f: usize) -> bool {
        self.gluing(f).is_none()
    }
    /// Returns the gluings of every facet, in order.
    pub fn gluings(&self) -> impl Iterator<Item = (usize, Option<Gluing<D>>)> + '_ {
        self.adj.iter().copied().enumerate()
    }
    /// Returns whether any facet is free.
    pub fn has_free_facet(&self) -> bool {
        self.adj.iter().any(Option::is_none)
    }
    /// Returns the free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }
}
