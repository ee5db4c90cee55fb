//! Operations that change the combinatorics of a triangulation.

use regina_maths::Permutation;
use regina_util::ti::TypedIndex;

use crate::{
    Dim3, Dimension, FaceId, Isomorphism, SimplexId, TriResult, Triangulation, TriangulationError,
};

impl<D: Dimension> Triangulation<D> {
    /// Replaces the contents of this triangulation with those of `other`,
    /// as a single change.
    fn replace_with(&mut self, mut other: Triangulation<D>) {
        let simplices = std::mem::take(&mut other.simplices);
        self.change_span().simplices = simplices;
    }

    /// Relabels the vertices of each simplex so that every gluing reverses
    /// orientation, which makes every gluing permutation odd.
    pub fn orient(&mut self) -> TriResult<()> {
        if !self.is_orientable() {
            return Err(TriangulationError::precondition(
                "cannot orient a non-orientable triangulation",
            ));
        }
        let skeleton = self.ensure_skeleton();
        let swap = D::Perm::transposition(D::DIM - 1, D::DIM);
        let facet_perm = self
            .simplices
            .iter_keys()
            .map(|s| match skeleton.orientation(s) {
                1 => D::Perm::identity(),
                _ => swap,
            })
            .collect();
        let iso = Isomorphism::from_parts(self.simplices.iter_keys().collect(), facet_perm);
        self.relabel(&iso)
    }

    /// Returns the orientable double cover.
    ///
    /// Every simplex `s` has two lifts, `s` and `s + n`. Each orientable
    /// component lifts to two disjoint copies of itself, and each
    /// non-orientable component to its connected orientable double cover.
    pub fn double_cover(&self) -> TriResult<Triangulation<D>> {
        let n = self.size();
        let skeleton = self.ensure_skeleton();
        let mut ret = Triangulation::new();
        {
            let mut tri = ret.change_span();
            let ids = tri.new_simplices(2 * n)?;
            for (s, simplex) in &self.simplices {
                for (f, gluing) in simplex.gluings() {
                    let Some(g) = gluing else { continue };
                    let t = g.simplex;
                    if (t, g.perm.image(f)) < (s, f) {
                        continue;
                    }
                    let consistent = skeleton.orientation(t)
                        == -skeleton.orientation(s) * g.perm.sign() as i8;
                    let (lower, upper) = (s.to_index(), t.to_index());
                    let (same, other) = match consistent {
                        true => (ids[upper], ids[upper + n]),
                        false => (ids[upper + n], ids[upper]),
                    };
                    tri.join(ids[lower], f, same, g.perm)?;
                    tri.join(ids[lower + n], f, other, g.perm)?;
                }
            }
        }
        Ok(ret)
    }
    /// Replaces this triangulation with its orientable double cover.
    pub fn make_double_cover(&mut self) -> TriResult<()> {
        let cover = self.double_cover()?;
        self.replace_with(cover);
        Ok(())
    }

    /// Replaces each simplex with the `(D+1)!` simplices of its barycentric
    /// subdivision.
    ///
    /// The new simplex for simplex `s` and permutation `π` has index
    /// `s * (D+1)! + π.ordered_sn_index()`. Its vertex `i` is the barycentre
    /// of the face of `s` spanned by `π(i), ..., π(D)`.
    pub fn barycentric_subdivision(&mut self) -> TriResult<()> {
        let per_simplex = D::Perm::COUNT as usize;
        let perms: Vec<D::Perm> = D::Perm::all().collect();
        let mut sub = Triangulation::new();
        {
            let mut tri = sub.change_span();
            let ids = tri.new_simplices(self.size() * per_simplex)?;
            for (s, simplex) in &self.simplices {
                let base = s.to_index() * per_simplex;
                for (k, &pi) in perms.iter().enumerate() {
                    let here = ids[base + k];
                    if let Some(g) = simplex.gluing(pi.image(0)) {
                        let target = g.simplex.to_index() * per_simplex
                            + (g.perm * pi).ordered_sn_index() as usize;
                        if tri.gluing(here, 0).is_none() {
                            tri.join(here, 0, ids[target], D::Perm::identity())?;
                        }
                    }
                    for j in 1..=D::DIM {
                        let neighbour = pi * D::Perm::transposition(j - 1, j);
                        let target = base + neighbour.ordered_sn_index() as usize;
                        if tri.gluing(here, j).is_none() {
                            tri.join(here, j, ids[target], D::Perm::identity())?;
                        }
                    }
                }
            }
        }
        log::debug!(
            "barycentric subdivision: {} simplices became {}",
            self.size(),
            sub.size(),
        );
        self.replace_with(sub);
        Ok(())
    }

    /// Performs a `1-(D+1)` Pachner move on simplex `s`, replacing it with a
    /// cone over its boundary from a new internal vertex.
    ///
    /// New simplex `i` keeps the vertices of `s` but with vertex `i` moved to
    /// the new internal vertex, and inherits the gluing on facet `i`. The new
    /// simplices are appended and `s` is removed, so later simplices move
    /// down by one index.
    pub fn pachner_1_to_n(&mut self, s: SimplexId) -> TriResult<()> {
        let old = self.simplex(s)?.clone();
        let mut tri = self.change_span();
        tri.isolate(s)?;
        let new = tri.new_simplices(D::DIM + 1)?;
        for i in 0..=D::DIM {
            for j in i + 1..=D::DIM {
                tri.join(new[i], j, new[j], D::Perm::transposition(i, j))?;
            }
        }
        for (f, gluing) in old.gluings() {
            let Some(g) = gluing else { continue };
            if g.simplex == s {
                let other = g.perm.image(f);
                if tri.gluing(new[f], f).is_none() {
                    tri.join(new[f], f, new[other], g.perm)?;
                }
            } else {
                tri.join(new[f], f, g.simplex, g.perm)?;
            }
        }
        tri.remove_simplex(s)?;
        Ok(())
    }
}

impl Triangulation<Dim3> {
    /// Layers a new tetrahedron over a boundary edge, gluing two of its faces
    /// to the two boundary triangles that meet at the edge. Returns the new
    /// tetrahedron, whose faces 0 and 1 are left free.
    ///
    /// Vertices 0 and 1 of the new tetrahedron lie on the ends of the edge,
    /// and its edge 23 is the new boundary edge that crosses it.
    pub fn layer_on(&mut self, edge: FaceId) -> TriResult<SimplexId> {
        let face = self.face(1, edge)?;
        if !face.is_boundary() {
            return Err(TriangulationError::invalid(format!("edge {edge} is not on the boundary")));
        }
        let ring = self.ridge_ring(edge)?;
        let (Some(&first), Some(&last)) = (ring.embeddings.first(), ring.embeddings.last()) else {
            return Err(TriangulationError::invalid(format!("edge {edge} has no embeddings")));
        };
        let back = (first.simplex, first.perm.image(3));
        let front = (last.simplex, last.perm.image(2));
        if back == front || self.gluing(back.0, back.1).is_some() || self.gluing(front.0, front.1).is_some() {
            return Err(TriangulationError::invalid(format!(
                "edge {edge} does not meet two distinct boundary triangles",
            )));
        }
        let mut tri = self.change_span();
        let new = tri.new_simplex()?;
        tri.join(new, 3, first.simplex, first.perm)?;
        tri.join(new, 2, last.simplex, last.perm)?;
        Ok(new)
    }
}
