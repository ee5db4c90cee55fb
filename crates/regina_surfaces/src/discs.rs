//! Individual discs of an embedded surface and how they meet across faces.
//!
//! Within face `f` of a tetrahedron, the arcs cut from corner `v` are
//! numbered outwards from `v`: first the arcs of triangles at `v`, then the
//! arcs of the quads or octagons that cut off that corner. Arc `j` at corner
//! `v` of face `f` is glued to arc `j` at corner `p(v)` of face `p(f)` on the
//! other side.

use disjoint::DisjointSet;
use regina_maths::Perm;
use regina_triangulation::{Dim3, FaceId, SimplexId, Triangulation};
use regina_util::ti::TypedIndex;

use crate::coords::{on_vertex_zero_side, quad_separating};
use crate::surface::TetDiscs;
use crate::{DiscType, SurfaceError, SurfaceResult};

/// Discs of one tetrahedron, with every disc given a global number.
#[derive(Debug, Clone)]
struct TetLayout {
    triangles: [usize; 4],
    /// The quad or octagon type present, with its number of copies.
    sheet: Option<(DiscType, usize)>,
    first: usize,
}

impl TetLayout {
    fn sheet_count(&self) -> usize {
        self.sheet.map_or(0, |(_, m)| m)
    }

    /// Returns whether the sheet meets corner `v` of face `f`.
    fn sheet_meets(&self, f: usize, v: usize) -> bool {
        let q = quad_separating(v, f);
        match self.sheet {
            Some((DiscType::Quad(k), _)) => k == q,
            Some((DiscType::Octagon(k), _)) => k != q,
            _ => false,
        }
    }

    /// Returns the type index of the sheet, which decides which side of it
    /// each vertex lies on.
    fn sheet_type(&self) -> usize {
        match self.sheet {
            Some((DiscType::Quad(k) | DiscType::Octagon(k), _)) => k,
            _ => 0,
        }
    }

    fn arc_count(&self, f: usize, v: usize) -> usize {
        self.triangles[v] + if self.sheet_meets(f, v) { self.sheet_count() } else { 0 }
    }

    /// Returns the disc owning arc `j` at corner `v` of face `f`, and
    /// whether that disc's positive side faces the corner.
    fn arc(&self, f: usize, v: usize, j: usize) -> (usize, bool) {
        let before: usize = self.triangles[..v].iter().sum();
        if j < self.triangles[v] {
            return (self.first + before + j, true);
        }
        let i = j - self.triangles[v];
        let m = self.sheet_count();
        let toward = on_vertex_zero_side(self.sheet_type(), v);
        let copy = if toward { i } else { m - 1 - i };
        let all_triangles: usize = self.triangles.iter().sum();
        (self.first + all_triangles + copy, toward)
    }
}

/// Embedded, compact surface broken into its individual discs.
pub(crate) struct DiscSet<'a> {
    tri: &'a Triangulation<Dim3>,
    tets: Vec<TetLayout>,
    count: usize,
}

fn to_count(x: &regina_maths::Integer) -> SurfaceResult<usize> {
    x.to_i64()
        .and_then(|x| usize::try_from(x).ok())
        .ok_or_else(|| SurfaceError::precondition("too many discs to examine individually"))
}

/// Arc shared by two tetrahedra across a glued face.
pub(crate) struct ArcPair {
    pub(crate) discs: [usize; 2],
    /// Whether each disc's positive side faces the corner of its arc.
    pub(crate) toward: [bool; 2],
    pub(crate) perm: Perm<4>,
}

impl<'a> DiscSet<'a> {
    pub fn new(tri: &'a Triangulation<Dim3>, discs: &[TetDiscs]) -> SurfaceResult<Self> {
        let mut tets = vec![];
        let mut count = 0;
        for d in discs {
            let mut triangles = [0; 4];
            for (n, x) in triangles.iter_mut().zip(&d.triangles) {
                let x = x
                    .as_ref()
                    .ok_or_else(|| SurfaceError::precondition("surface is not compact"))?;
                *n = to_count(x)?;
            }
            let mut sheet = None;
            let sheets = (0..3)
                .map(|k| (DiscType::Quad(k), &d.quads[k]))
                .chain((0..3).map(|k| (DiscType::Octagon(k), &d.octagons[k])));
            for (disc, n) in sheets {
                if n.is_zero() {
                    continue;
                }
                if sheet.is_some() {
                    return Err(SurfaceError::precondition(
                        "surface has two quad or octagon types in one tetrahedron",
                    ));
                }
                sheet = Some((disc, to_count(n)?));
            }
            let layout = TetLayout {
                triangles,
                sheet,
                first: count,
            };
            count += triangles.iter().sum::<usize>() + layout.sheet_count();
            tets.push(layout);
        }
        Ok(Self { tri, tets, count })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn layout(&self, t: SimplexId) -> &TetLayout {
        &self.tets[t.to_index()]
    }

    pub fn arc_count(&self, t: SimplexId, f: usize, v: usize) -> usize {
        self.layout(t).arc_count(f, v)
    }

    /// Returns every pair of arcs glued across an internal face.
    pub fn glued_arcs(&self) -> SurfaceResult<Vec<ArcPair>> {
        let mut ret = vec![];
        for (t, simplex) in self.tri.simplices() {
            for (f, gluing) in simplex.gluings() {
                let Some(g) = gluing else { continue };
                let (u, h) = (g.simplex, g.perm.image(f));
                if (u, h) < (t, f) {
                    continue;
                }
                for v in (0..4).filter(|&v| v != f) {
                    let pv = g.perm.image(v);
                    let n = self.arc_count(t, f, v);
                    if n != self.arc_count(u, h, pv) {
                        return Err(SurfaceError::invalid(format!(
                            "arcs do not match across face {f} of tetrahedron {t}",
                        )));
                    }
                    for j in 0..n {
                        let (d1, s1) = self.layout(t).arc(f, v, j);
                        let (d2, s2) = self.layout(u).arc(h, pv, j);
                        ret.push(ArcPair {
                            discs: [d1, d2],
                            toward: [s1, s2],
                            perm: g.perm,
                        });
                    }
                }
            }
        }
        Ok(ret)
    }

    /// Returns whether discs can be consistently labelled so that glued
    /// discs agree, where `flips` says whether a given pair disagrees.
    pub fn is_consistent(&self, arcs: &[ArcPair], flips: impl Fn(&ArcPair) -> bool) -> bool {
        // Node `2d` is disc `d` with one label and `2d + 1` with the other.
        let mut sets = DisjointSet::with_len(2 * self.count);
        for arc in arcs {
            let [a, b] = arc.discs;
            let flip = usize::from(flips(arc));
            sets.join(2 * a, 2 * b + flip);
            sets.join(2 * a + 1, 2 * b + 1 - flip);
        }
        (0..self.count).all(|d| !sets.is_joined(2 * d, 2 * d + 1))
    }

    /// Returns the number of connected components.
    pub fn components(&self, arcs: &[ArcPair]) -> usize {
        let mut sets = DisjointSet::with_len(self.count);
        for arc in arcs {
            sets.join(arc.discs[0], arc.discs[1]);
        }
        sets.sets().len()
    }

    /// Returns the number of closed curves in which the surface meets the
    /// boundary of the triangulation.
    ///
    /// Each boundary edge carries one point per time the surface crosses it,
    /// numbered from the edge's vertex 0. Every arc in a boundary face joins
    /// a point on each of the two edges meeting at its corner.
    pub fn boundary_curves(&self, edge_weight: impl Fn(FaceId) -> SurfaceResult<usize>) -> SurfaceResult<usize> {
        let skeleton = self.tri.ensure_skeleton();
        let mut offset = vec![None; skeleton.faces(1).len()];
        let mut points = 0;
        for (e, face) in skeleton.faces(1) {
            if face.is_boundary() {
                offset[e.to_index()] = Some(points);
                points += edge_weight(e)?;
            }
        }

        let mut sets = DisjointSet::with_len(points);
        for (t, simplex) in self.tri.simplices() {
            for f in (0..4).filter(|&f| simplex.is_free(f)) {
                for v in (0..4).filter(|&v| v != f) {
                    let others: Vec<usize> = (0..4).filter(|&w| w != v && w != f).collect();
                    for j in 0..self.arc_count(t, f, v) {
                        let mut ends = [0; 2];
                        for (end, &w) in ends.iter_mut().zip(&others) {
                            let (edge, perm) = skeleton.face_of(t, &[v, w]).ok_or_else(|| {
                                SurfaceError::invalid(format!("tetrahedron {t} has no edge {v}{w}"))
                            })?;
                            let base = offset[edge.to_index()].ok_or_else(|| {
                                SurfaceError::invalid(format!("edge {edge} lies in a boundary face but is internal"))
                            })?;
                            let weight = edge_weight(edge)?;
                            let index = match perm.image(0) == v {
                                true => j,
                                false => weight - 1 - j,
                            };
                            *end = base + index;
                        }
                        sets.join(ends[0], ends[1]);
                    }
                }
            }
        }
        Ok(sets.sets().len())
    }

    /// Returns the number of pieces left after cutting the triangulation
    /// along the surface.
    ///
    /// A tetrahedron with triangles `n_v` at each vertex and `m` copies of
    /// a quad or octagon is cut into `n_v` slabs near each vertex (slab `j`
    /// lies between triangle `j - 1` and triangle `j`, counting outwards
    /// from the vertex) and `m + 1` central regions. Central region `i` lies
    /// between sheet copies `i - 1` and `i`, counting from the side of
    /// vertex 0.
    pub fn pieces(&self) -> SurfaceResult<usize> {
        let mut first_region = vec![];
        let mut regions = 0;
        for layout in &self.tets {
            first_region.push(regions);
            regions += layout.triangles.iter().sum::<usize>() + layout.sheet_count() + 1;
        }
        let central = |t: SimplexId, i: usize| {
            let layout = self.layout(t);
            first_region[t.to_index()] + layout.triangles.iter().sum::<usize>() + i
        };
        let slab = |t: SimplexId, v: usize, j: usize| {
            let layout = self.layout(t);
            first_region[t.to_index()] + layout.triangles[..v].iter().sum::<usize>() + j
        };
        // Region touching arc `j` at corner `v` of a face, on the corner's
        // side.
        let face_piece = |t: SimplexId, v: usize, j: usize| {
            let layout = self.layout(t);
            if j < layout.triangles[v] {
                return slab(t, v, j);
            }
            let i = j - layout.triangles[v];
            let m = layout.sheet_count();
            match on_vertex_zero_side(layout.sheet_type(), v) {
                true => central(t, i),
                false => central(t, m - i),
            }
        };
        // Region of face `f` beyond all arcs at every corner.
        let central_face_piece = |t: SimplexId, f: usize| {
            let layout = self.layout(t);
            let m = layout.sheet_count();
            let corner = (0..4).find(|&v| v != f && layout.sheet_meets(f, v));
            match corner {
                Some(v) if m > 0 => match on_vertex_zero_side(layout.sheet_type(), v) {
                    true => central(t, m),
                    false => central(t, 0),
                },
                _ => central(t, 0),
            }
        };

        let mut sets = DisjointSet::with_len(regions);
        for (t, simplex) in self.tri.simplices() {
            for (f, gluing) in simplex.gluings() {
                let Some(g) = gluing else { continue };
                let (u, h) = (g.simplex, g.perm.image(f));
                sets.join(central_face_piece(t, f), central_face_piece(u, h));
                for v in (0..4).filter(|&v| v != f) {
                    let pv = g.perm.image(v);
                    for j in 0..self.arc_count(t, f, v) {
                        sets.join(face_piece(t, v, j), face_piece(u, pv, j));
                    }
                }
            }
        }
        Ok(sets.sets().len())
    }
}
