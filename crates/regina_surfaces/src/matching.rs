//! Matching equations and the admissibility constraints that go with them.

use itertools::Itertools;
use regina_maths::{Integer, MatrixInt};
use regina_triangulation::{Dim3, SimplexId, Triangulation};
use smallvec::SmallVec;

use crate::coords::{on_vertex_zero_side, quad_separating};
use crate::{CoordSystem, DiscType, Orientation, SurfaceError, SurfaceResult};

/// Columns of one disc type within a tetrahedron: one column, or two in
/// oriented coordinates.
pub type ColumnGroup = SmallVec<[usize; 2]>;

/// Matching equations for a triangulation in some coordinate system,
/// together with the constraints that make a solution an embedded surface.
///
/// A non-negative integer vector `x` is an admissible solution if `Mx = 0`,
/// at most one group of each clique has a non-zero column, and at most one
/// octagon column is non-zero.
#[derive(Debug, Clone)]
pub struct MatchingEquations {
    coords: CoordSystem,
    size: usize,
    matrix: MatrixInt,
    cliques: Vec<Vec<ColumnGroup>>,
    octagons: Vec<usize>,
}

impl MatchingEquations {
    /// Builds the matching equations for `tri` in the given coordinates.
    ///
    /// Standard-style systems have one equation per glued face and corner,
    /// stating that the arcs cut from that corner agree on both sides.
    /// Quad-style systems have one equation per internal edge, stating that
    /// the surface winds consistently around it. Oriented systems split
    /// every equation by the direction in which the arcs point.
    pub fn new(tri: &Triangulation<Dim3>, coords: CoordSystem) -> SurfaceResult<Self> {
        let size = tri.size();
        let builder = Builder {
            coords,
            width: coords.dimension(size),
        };
        let rows = match coords.has_triangles() {
            true => builder.face_rows(tri),
            false => builder.edge_rows(tri)?,
        };
        let matrix = match rows.is_empty() {
            true => MatrixInt::zero(0, builder.width),
            false => MatrixInt::from_rows(rows)?,
        };

        let mut cliques = vec![];
        let mut octagons = vec![];
        for t in tri.simplices().iter_keys() {
            let mut clique = vec![];
            for k in 0..3 {
                clique.push(builder.group(t, DiscType::Quad(k)));
            }
            if coords.has_octagons() {
                for k in 0..3 {
                    let group = builder.group(t, DiscType::Octagon(k));
                    octagons.extend(group.iter().copied());
                    clique.push(group);
                }
            }
            cliques.push(clique);
        }
        log::trace!(
            "{} matching equations over {} columns in {coords} coordinates",
            matrix.rows(),
            matrix.cols(),
        );
        Ok(Self {
            coords,
            size,
            matrix,
            cliques,
            octagons,
        })
    }

    /// Returns the coordinate system.
    pub fn coords(&self) -> CoordSystem {
        self.coords
    }
    /// Returns the number of tetrahedra.
    pub fn size(&self) -> usize {
        self.size
    }
    /// Returns the matching matrix, one row per equation.
    pub fn matrix(&self) -> &MatrixInt {
        &self.matrix
    }
    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.matrix.cols()
    }
    /// Returns the disjointness cliques, one per tetrahedron. Each clique
    /// lists the column groups of its quad (and octagon) types.
    pub fn cliques(&self) -> &[Vec<ColumnGroup>] {
        &self.cliques
    }
    /// Returns every octagon column.
    pub fn octagon_columns(&self) -> &[usize] {
        &self.octagons
    }

    /// Returns whether a set of non-zero columns satisfies the quad and
    /// octagon constraints.
    pub fn is_admissible_support(&self, nonzero: impl Fn(usize) -> bool) -> bool {
        let clique_ok = self.cliques.iter().all(|clique| {
            clique
                .iter()
                .filter(|group| group.iter().any(|&c| nonzero(c)))
                .nth(1)
                .is_none()
        });
        clique_ok && self.octagons.iter().filter(|&&c| nonzero(c)).nth(1).is_none()
    }

    /// Returns whether `v` is a non-negative solution of the matching
    /// equations that satisfies the quad and octagon constraints.
    pub fn is_admissible(&self, v: &[Integer]) -> SurfaceResult<bool> {
        if v.len() != self.width() {
            return Err(SurfaceError::invalid(format!(
                "vector has length {} but {} coordinates need {}",
                v.len(),
                self.coords,
                self.width(),
            )));
        }
        if v.iter().any(Integer::is_negative) || !self.is_admissible_support(|c| !v[c].is_zero()) {
            return Ok(false);
        }
        Ok(self.matrix.mul_vec(v)?.iter().all(Integer::is_zero))
    }
}

struct Builder {
    coords: CoordSystem,
    width: usize,
}

impl Builder {
    fn orientations(&self) -> &'static [Option<bool>] {
        match self.coords.is_oriented() {
            true => &[Some(true), Some(false)],
            false => &[None],
        }
    }

    fn group(&self, t: SimplexId, disc: DiscType) -> ColumnGroup {
        match self.coords.is_oriented() {
            true => [Orientation::Positive, Orientation::Negative]
                .into_iter()
                .filter_map(|o| self.coords.column(t, disc, Some(o)))
                .collect(),
            false => self.coords.column(t, disc, None).into_iter().collect(),
        }
    }

    /// Adds `sign` times the number of arcs cut from corner `v` of face `f`
    /// of tetrahedron `t`. With `toward` set, counts only the discs whose
    /// orientation points towards (or away from) that corner.
    fn add_arcs(
        &self,
        row: &mut [i64],
        (t, f, v): (SimplexId, usize, usize),
        toward: Option<bool>,
        with_triangles: bool,
        sign: i64,
    ) {
        let q = quad_separating(v, f);
        let mut add = |disc: DiscType, positive_toward: bool| {
            let orientation = toward.map(|toward| match toward == positive_toward {
                true => Orientation::Positive,
                false => Orientation::Negative,
            });
            if let Some(c) = self.coords.column(t, disc, orientation) {
                row[c] += sign;
            }
        };
        if with_triangles {
            add(DiscType::Triangle(v), true);
        }
        add(DiscType::Quad(q), on_vertex_zero_side(q, v));
        for k in (0..3).filter(|&k| k != q) {
            add(DiscType::Octagon(k), on_vertex_zero_side(k, v));
        }
    }

    fn face_rows(&self, tri: &Triangulation<Dim3>) -> Vec<Vec<i64>> {
        let mut rows = vec![];
        for (t, simplex) in tri.simplices() {
            for (f, gluing) in simplex.gluings() {
                let Some(g) = gluing else { continue };
                let (u, h) = (g.simplex, g.perm.image(f));
                if (u, h) < (t, f) {
                    continue;
                }
                for v in (0..4).filter(|&v| v != f) {
                    for &toward in self.orientations() {
                        let mut row = vec![0; self.width];
                        self.add_arcs(&mut row, (t, f, v), toward, true, 1);
                        self.add_arcs(&mut row, (u, h, g.perm.image(v)), toward, true, -1);
                        push_nonzero(&mut rows, row);
                    }
                }
            }
        }
        rows
    }

    fn edge_rows(&self, tri: &Triangulation<Dim3>) -> SurfaceResult<Vec<Vec<i64>>> {
        let mut rows = vec![];
        let skeleton = tri.ensure_skeleton();
        for (edge, face) in skeleton.faces(1) {
            if face.is_boundary() {
                continue;
            }
            let ring = tri.ridge_ring(edge)?;
            for &toward in self.orientations() {
                let mut row = vec![0; self.width];
                for emb in &ring.embeddings {
                    let [v0, v2, v3] = [0, 2, 3].map(|i| emb.perm.image(i));
                    self.add_arcs(&mut row, (emb.simplex, v2, v0), toward, false, 1);
                    self.add_arcs(&mut row, (emb.simplex, v3, v0), toward, false, -1);
                }
                push_nonzero(&mut rows, row);
            }
        }
        Ok(rows)
    }
}

fn push_nonzero(rows: &mut Vec<Vec<i64>>, row: Vec<i64>) {
    if row.iter().any(|&x| x != 0) {
        rows.push(row);
    }
}

/// Returns the columns on which `v` is non-zero.
pub(crate) fn support(v: &[Integer]) -> Vec<usize> {
    v.iter().positions(|x| !x.is_zero()).collect()
}
