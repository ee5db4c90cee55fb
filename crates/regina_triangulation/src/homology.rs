//! Homology groups computed from chain complexes over ℤ.

use itertools::Itertools;
use regina_maths::{AbelianGroup, Integer, MatrixInt, Permutation};
use regina_util::ti::TypedIndex;

use crate::skeleton::Face;
use crate::{Dimension, FaceId, SimplexId, TriResult, Triangulation, TriangulationError};

/// Sign of the permutation taking `from` to `to`, which must hold the same
/// elements.
fn relative_sign(from: &[usize], to: &[usize]) -> i64 {
    let positions = from
        .iter()
        .map(|x| to.iter().position(|y| y == x).unwrap_or(0))
        .collect_vec();
    let inversions = positions
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| a > b)
        .count();
    if inversions % 2 == 0 { 1 } else { -1 }
}

impl<D: Dimension> Triangulation<D> {
    fn require_valid(&self, what: &str) -> TriResult<()> {
        match self.is_valid() {
            true => Ok(()),
            false => Err(TriangulationError::precondition(format!(
                "{what} requires a valid triangulation",
            ))),
        }
    }

    /// Returns the first homology group, computed from the dual cell
    /// complex: one dual vertex per simplex, one dual edge per internal facet
    /// and one dual 2-cell per internal `(D-2)`-face.
    ///
    /// For ideal triangulations this is the homology of the compact
    /// manifold with the ideal vertices truncated.
    pub fn homology(&self) -> TriResult<AbelianGroup> {
        self.require_valid("homology")?;
        let skeleton = self.ensure_skeleton();
        let facets = skeleton.faces(D::DIM - 1);
        let internal = facets
            .iter()
            .filter(|(_, f)| !f.is_boundary())
            .map(|(id, _)| id)
            .collect_vec();
        let mut column_of = vec![None; facets.len()];
        for (col, &id) in internal.iter().enumerate() {
            column_of[id.to_index()] = Some(col);
        }

        let mut outgoing = MatrixInt::zero(self.size(), internal.len());
        for (col, &id) in internal.iter().enumerate() {
            let embs = facets[id].embeddings();
            outgoing[(embs[0].simplex.to_index(), col)] -= Integer::ONE;
            outgoing[(embs[1].simplex.to_index(), col)] += Integer::ONE;
        }

        let mut cells = vec![];
        if D::DIM >= 2 {
            for (ridge, face) in skeleton.faces(D::DIM - 2) {
                if face.is_boundary() {
                    continue;
                }
                let ring = self.ridge_ring(ridge)?;
                let mut column = vec![Integer::ZERO; internal.len()];
                for emb in &ring.embeddings {
                    let crossing = emb.perm.image(D::DIM - 1);
                    let (facet, _) = skeleton.facet(emb.simplex, crossing);
                    let Some(col) = column_of[facet.to_index()] else {
                        continue;
                    };
                    let first = facets[facet].embeddings()[0];
                    if first.simplex == emb.simplex && first.perm.image(D::DIM) == crossing {
                        column[col] += Integer::ONE;
                    } else {
                        column[col] -= Integer::ONE;
                    }
                }
                cells.push(column);
            }
        }
        let incoming = MatrixInt::from_fn(internal.len(), cells.len(), |r, c| cells[c][r].clone());
        log::debug!(
            "dual chain complex: {} cells, {} edges, {} vertices",
            cells.len(),
            internal.len(),
            self.size(),
        );
        Ok(AbelianGroup::from_chain_complex(&incoming, &outgoing)?)
    }

    /// Returns the `k`-th homology group of the simplicial chain complex,
    /// for `0 <= k <= D`. Ideal vertices are treated as points, so this is the
    /// homology of the space with each ideal boundary coned off.
    pub fn homology_primal(&self, k: usize) -> TriResult<AbelianGroup> {
        if k > D::DIM {
            return Err(TriangulationError::invalid(format!(
                "no {k}-th homology for a {}-triangulation",
                D::DIM,
            )));
        }
        self.require_valid("homology")?;
        let keep = |_: usize, _: FaceId| true;
        let outgoing = self.boundary_map(k, keep)?;
        let incoming = self.boundary_map(k + 1, keep)?;
        Ok(AbelianGroup::from_chain_complex(&incoming, &outgoing)?)
    }

    /// Returns the first homology group relative to the boundary, with both
    /// real boundary faces and ideal vertices removed from the chain complex.
    pub fn homology_relative(&self) -> TriResult<AbelianGroup> {
        self.require_valid("relative homology")?;
        let skeleton = self.ensure_skeleton();
        let keep = |k: usize, id: FaceId| {
            k == D::DIM || {
                let face: &Face<D> = &skeleton.faces(k)[id];
                !face.is_boundary() && !face.is_ideal()
            }
        };
        let outgoing = self.boundary_map(1, keep)?;
        let incoming = self.boundary_map(2, keep)?;
        Ok(AbelianGroup::from_chain_complex(&incoming, &outgoing)?)
    }

    /// Ordered representatives of the `k`-faces kept by `keep`: a simplex and
    /// the simplex vertices of the face in their canonical order.
    fn oriented_faces(
        &self,
        k: usize,
        keep: impl Fn(usize, FaceId) -> bool,
    ) -> Vec<(SimplexId, Vec<usize>)> {
        if k == D::DIM {
            return self
                .simplices
                .iter_keys()
                .map(|s| (s, (0..=D::DIM).collect()))
                .collect();
        }
        self.ensure_skeleton()
            .faces(k)
            .iter()
            .filter(|&(id, _)| keep(k, id))
            .map(|(_, face)| {
                let emb = face.embeddings()[0];
                (emb.simplex, (0..=k).map(|i| emb.perm.image(i)).collect())
            })
            .collect()
    }

    /// Matrix of the boundary map from `k`-chains to `(k-1)`-chains, over
    /// the faces kept by `keep`.
    fn boundary_map(&self, k: usize, keep: impl Fn(usize, FaceId) -> bool + Copy) -> TriResult<MatrixInt> {
        let cols = if k > D::DIM { 0 } else { self.oriented_faces(k, keep).len() };
        if k == 0 || k > D::DIM {
            let rows = if k == 0 { 0 } else { self.oriented_faces(k - 1, keep).len() };
            return Ok(MatrixInt::zero(rows, cols));
        }
        let skeleton = self.ensure_skeleton();
        let lower = skeleton
            .faces(k - 1)
            .iter_keys()
            .filter(|&id| keep(k - 1, id))
            .collect_vec();
        let mut row_of = vec![None; skeleton.faces(k - 1).len()];
        for (row, id) in lower.iter().enumerate() {
            row_of[id.to_index()] = Some(row);
        }

        let mut ret = MatrixInt::zero(lower.len(), cols);
        for (col, (s, vertices)) in self.oriented_faces(k, keep).into_iter().enumerate() {
            for j in 0..=k {
                let sub = vertices
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != j)
                    .map(|(_, &v)| v)
                    .collect_vec();
                let Some((id, perm)) = skeleton.face_of(s, &sub) else {
                    return Err(TriangulationError::invalid("missing subface in skeleton"));
                };
                let Some(row) = row_of[id.to_index()] else {
                    continue;
                };
                let canonical = (0..k).map(|i| perm.image(i)).collect_vec();
                let sign = relative_sign(&sub, &canonical) * if j % 2 == 0 { 1 } else { -1 };
                ret[(row, col)] += Integer::from(sign);
            }
        }
        Ok(ret)
    }
}
