//! A single normal or almost normal surface.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use regina_maths::{Integer, Rational};
use regina_triangulation::{Dim3, FaceId, SimplexId, Triangulation};
use regina_util::ti::{TiVec, TypedIndex};

use crate::coords::{QUAD_DEFN, quad_separating};
use crate::discs::DiscSet;
use crate::{CoordSystem, DiscType, Orientation, SurfaceError, SurfaceResult};

/// Disc counts within one tetrahedron.
///
/// A triangle count of `None` means infinitely many triangles, which happens
/// for spun surfaces around ideal vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TetDiscs {
    pub triangles: [Option<Integer>; 4],
    pub quads: [Integer; 3],
    pub octagons: [Integer; 3],
}

impl TetDiscs {
    fn read(coords: CoordSystem, t: SimplexId, vector: &[Integer]) -> Self {
        let total = |disc: DiscType| -> Integer {
            let orientations = match coords.is_oriented() {
                true => vec![Some(Orientation::Positive), Some(Orientation::Negative)],
                false => vec![None],
            };
            orientations
                .into_iter()
                .filter_map(|o| coords.column(t, disc, o))
                .map(|c| &vector[c])
                .sum()
        };
        Self {
            triangles: [0, 1, 2, 3].map(|v| Some(total(DiscType::Triangle(v)))),
            quads: [0, 1, 2].map(|k| total(DiscType::Quad(k))),
            octagons: [0, 1, 2].map(|k| total(DiscType::Octagon(k))),
        }
    }

    /// Returns the number of quad and octagon arcs cut from corner `v` of
    /// face `f`.
    pub fn sheet_arcs(&self, f: usize, v: usize) -> Integer {
        let q = quad_separating(v, f);
        let octagons: Integer = (0..3).filter(|&k| k != q).map(|k| &self.octagons[k]).sum();
        &self.quads[q] + octagons
    }

    fn is_compact(&self) -> bool {
        self.triangles.iter().all(Option::is_some)
    }

    fn disc_count(&self) -> Option<Integer> {
        let triangles: Option<Integer> = self.triangles.iter().map(Option::as_ref).sum::<Option<Integer>>();
        let sheets: Integer = self.quads.iter().chain(&self.octagons).sum();
        triangles.map(|t| t + sheets)
    }
}

/// Fills in the triangle counts of surfaces given without them, choosing in
/// each vertex class the fewest triangles that satisfy the matching
/// equations. A vertex class around which the quads and octagons do not
/// close up gets infinitely many triangles.
fn reconstruct_triangles(tri: &Triangulation<Dim3>, discs: &mut TiVec<SimplexId, TetDiscs>) -> SurfaceResult<()> {
    let corners = 4 * tri.size();
    let mut value: Vec<Option<Integer>> = vec![None; corners];
    for start in 0..corners {
        if value[start].is_some() {
            continue;
        }
        value[start] = Some(Integer::ZERO);
        let mut class = vec![start];
        let mut queue = VecDeque::from([start]);
        let mut closes_up = true;
        while let Some(i) = queue.pop_front() {
            let (t, v) = (SimplexId::try_from_index(i / 4)?, i % 4);
            let Some(here) = value[i].clone() else { continue };
            for f in (0..4).filter(|&f| f != v) {
                let Some(g) = tri.gluing(t, f) else { continue };
                let (u, h, pv) = (g.simplex, g.perm.image(f), g.perm.image(v));
                let there = &here + discs[t].sheet_arcs(f, v) - discs[u].sheet_arcs(h, pv);
                let j = 4 * u.to_index() + pv;
                match &value[j] {
                    None => {
                        value[j] = Some(there);
                        class.push(j);
                        queue.push_back(j);
                    }
                    Some(existing) => closes_up &= *existing == there,
                }
            }
        }

        let min = class.iter().filter_map(|&i| value[i].clone()).min().unwrap_or(Integer::ZERO);
        if !closes_up {
            log::trace!("vertex class of corner {start} carries a spun end");
        }
        for &i in &class {
            let t = SimplexId::try_from_index(i / 4)?;
            discs[t].triangles[i % 4] = match closes_up {
                true => value[i].as_ref().map(|x| x - &min),
                false => None,
            };
        }
    }
    Ok(())
}

/// Normal or almost normal surface in a 3-manifold triangulation.
///
/// The surface keeps a shared snapshot of its triangulation, so it stays
/// valid however the caller's copy is modified afterwards.
#[derive(Debug, Clone)]
pub struct NormalSurface {
    tri: Arc<Triangulation<Dim3>>,
    coords: CoordSystem,
    vector: Vec<Integer>,
    discs: TiVec<SimplexId, TetDiscs>,
}

impl PartialEq for NormalSurface {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.tri, &other.tri) || self.tri == other.tri) && self.discs == other.discs
    }
}

impl NormalSurface {
    /// Constructs a surface from its vector in the given coordinates.
    ///
    /// The vector must be non-negative and have one entry per column. It is
    /// not checked against the matching equations; see
    /// [`MatchingEquations::is_admissible()`](crate::MatchingEquations::is_admissible).
    pub fn new(tri: Arc<Triangulation<Dim3>>, coords: CoordSystem, vector: Vec<Integer>) -> SurfaceResult<Self> {
        let width = coords.dimension(tri.size());
        if vector.len() != width {
            return Err(SurfaceError::invalid(format!(
                "vector has length {} but {coords} coordinates need {width}",
                vector.len(),
            )));
        }
        if let Some(i) = vector.iter().position(Integer::is_negative) {
            return Err(SurfaceError::invalid(format!("coordinate {i} is negative")));
        }
        let mut discs = TiVec::from_fn(tri.size(), |t| TetDiscs::read(coords, t, &vector))?;
        if !coords.has_triangles() {
            reconstruct_triangles(&tri, &mut discs)?;
        }
        Ok(Self {
            tri,
            coords,
            vector,
            discs,
        })
    }

    /// Returns the triangulation in which this surface lives.
    pub fn triangulation(&self) -> &Arc<Triangulation<Dim3>> {
        &self.tri
    }
    /// Returns the coordinate system of the underlying vector.
    pub fn coords(&self) -> CoordSystem {
        self.coords
    }
    /// Returns the underlying vector.
    pub fn vector(&self) -> &[Integer] {
        &self.vector
    }

    pub(crate) fn tet_discs(&self) -> &TiVec<SimplexId, TetDiscs> {
        &self.discs
    }

    fn tet(&self, t: SimplexId) -> SurfaceResult<&TetDiscs> {
        Ok(self.discs.get(t)?)
    }

    /// Returns the number of triangles cutting off vertex `v` of tetrahedron
    /// `t`, or `None` if there are infinitely many.
    ///
    /// In coordinate systems without triangles, the triangles are recovered
    /// from the quads and octagons.
    pub fn triangles(&self, t: SimplexId, v: usize) -> SurfaceResult<Option<&Integer>> {
        let tet = self.tet(t)?;
        let x = tet
            .triangles
            .get(v)
            .ok_or_else(|| SurfaceError::invalid(format!("no vertex {v} in a tetrahedron")))?;
        Ok(x.as_ref())
    }
    /// Returns the number of quads of type `k` in tetrahedron `t`.
    pub fn quads(&self, t: SimplexId, k: usize) -> SurfaceResult<&Integer> {
        self.tet(t)?
            .quads
            .get(k)
            .ok_or_else(|| SurfaceError::invalid(format!("no quad type {k}")))
    }
    /// Returns the number of octagons of type `k` in tetrahedron `t`.
    pub fn octagons(&self, t: SimplexId, k: usize) -> SurfaceResult<&Integer> {
        self.tet(t)?
            .octagons
            .get(k)
            .ok_or_else(|| SurfaceError::invalid(format!("no octagon type {k}")))
    }
    /// Returns the number of discs of the given type and transverse
    /// orientation in tetrahedron `t`.
    ///
    /// Only available in oriented coordinate systems.
    pub fn oriented(&self, t: SimplexId, disc: DiscType, orientation: Orientation) -> SurfaceResult<&Integer> {
        if !self.coords.is_oriented() {
            return Err(SurfaceError::invalid(format!(
                "{} coordinates carry no orientations",
                self.coords,
            )));
        }
        self.tet(t)?;
        let c = self
            .coords
            .column(t, disc, Some(orientation))
            .ok_or_else(|| SurfaceError::invalid(format!("{disc:?} has no coordinate")))?;
        Ok(&self.vector[c])
    }

    /// Returns the number of times the surface crosses edge `e`.
    pub fn edge_weight(&self, e: FaceId) -> SurfaceResult<Integer> {
        let edge = self.tri.face(1, e)?;
        let emb = edge
            .embeddings()
            .first()
            .ok_or_else(|| SurfaceError::invalid(format!("edge {e} has no embeddings")))?;
        let (a, b) = (emb.vertex(0), emb.vertex(1));
        let tet = self.tet(emb.simplex)?;
        let (Some(ta), Some(tb)) = (&tet.triangles[a], &tet.triangles[b]) else {
            return Err(SurfaceError::precondition(format!(
                "surface meets edge {e} infinitely often",
            )));
        };
        let s = quad_separating(a, b);
        let quads: Integer = (0..3).filter(|&k| k != s).map(|k| &tet.quads[k]).sum();
        let octagons: Integer = tet.octagons.iter().sum();
        Ok(ta + tb + quads + octagons + &tet.octagons[s])
    }

    /// Returns the number of arcs in triangle `face` cutting off vertex `v`
    /// of that triangle.
    pub fn arcs(&self, face: FaceId, v: usize) -> SurfaceResult<Integer> {
        if v >= 3 {
            return Err(SurfaceError::invalid(format!("no vertex {v} in a triangle")));
        }
        let triangle = self.tri.face(2, face)?;
        let emb = triangle
            .embeddings()
            .first()
            .ok_or_else(|| SurfaceError::invalid(format!("triangle {face} has no embeddings")))?;
        let (corner, f) = (emb.vertex(v), emb.vertex(3));
        let tet = self.tet(emb.simplex)?;
        let Some(triangles) = &tet.triangles[corner] else {
            return Err(SurfaceError::precondition(format!(
                "surface meets triangle {face} infinitely often",
            )));
        };
        Ok(triangles + tet.sheet_arcs(f, corner))
    }

    /// Returns the Euler characteristic.
    ///
    /// Requires a compact surface.
    pub fn euler_char(&self) -> SurfaceResult<Rational> {
        self.require_compact()?;
        let skeleton = self.tri.ensure_skeleton();
        let mut ret = Integer::ZERO;
        for e in skeleton.faces(1).iter_keys() {
            ret += self.edge_weight(e)?;
        }
        for face in skeleton.faces(2).iter_keys() {
            for v in 0..3 {
                ret -= self.arcs(face, v)?;
            }
        }
        for tet in self.discs.iter_values() {
            ret += tet.disc_count().unwrap_or_default();
        }
        Ok(ret.into())
    }

    fn require_compact(&self) -> SurfaceResult<()> {
        match self.is_compact() {
            true => Ok(()),
            false => Err(SurfaceError::precondition("surface is not compact")),
        }
    }

    fn disc_set(&self) -> SurfaceResult<DiscSet<'_>> {
        DiscSet::new(&self.tri, &self.discs)
    }

    /// Returns whether the surface is orientable.
    ///
    /// Requires a compact embedded surface.
    pub fn is_orientable(&self) -> SurfaceResult<bool> {
        let discs = self.disc_set()?;
        let arcs = discs.glued_arcs()?;
        // Discs oriented alike in each tetrahedron match across an even
        // gluing only if their transverse orientations disagree.
        Ok(discs.is_consistent(&arcs, |arc| {
            (arc.toward[0] != arc.toward[1]) ^ (arc.perm.sign() == 1)
        }))
    }

    /// Returns whether the surface is two-sided.
    ///
    /// Requires a compact embedded surface.
    pub fn is_two_sided(&self) -> SurfaceResult<bool> {
        let discs = self.disc_set()?;
        let arcs = discs.glued_arcs()?;
        Ok(discs.is_consistent(&arcs, |arc| arc.toward[0] != arc.toward[1]))
    }

    /// Returns the number of connected components.
    ///
    /// Requires a compact embedded surface.
    pub fn count_components(&self) -> SurfaceResult<usize> {
        let discs = self.disc_set()?;
        let arcs = discs.glued_arcs()?;
        Ok(discs.components(&arcs))
    }

    /// Returns whether the surface is connected. The empty surface is not.
    pub fn is_connected(&self) -> SurfaceResult<bool> {
        Ok(self.count_components()? == 1)
    }

    /// Returns the number of curves in which the surface meets the boundary
    /// of the triangulation.
    ///
    /// Requires a compact embedded surface.
    pub fn boundary_curve_count(&self) -> SurfaceResult<usize> {
        let discs = self.disc_set()?;
        discs.boundary_curves(|e| {
            let weight = self.edge_weight(e)?;
            weight
                .to_i64()
                .and_then(|w| usize::try_from(w).ok())
                .ok_or_else(|| SurfaceError::precondition("edge weight too large to walk"))
        })
    }

    /// Returns the number of pieces the triangulation falls into when cut
    /// along this surface.
    ///
    /// Requires a compact embedded surface.
    pub fn cut_along(&self) -> SurfaceResult<usize> {
        self.disc_set()?.pieces()
    }

    /// Returns whether the surface is a non-empty union of vertex links, that
    /// is, has only triangles.
    pub fn is_vertex_linking(&self) -> bool {
        !self.is_empty()
            && self.is_compact()
            && self
                .discs
                .iter_values()
                .all(|tet| tet.quads.iter().chain(&tet.octagons).all(Integer::is_zero))
    }

    /// Returns the vertex whose link is a positive multiple of this surface,
    /// if any.
    pub fn vertex_link(&self) -> SurfaceResult<Option<FaceId>> {
        if !self.is_vertex_linking() {
            return Ok(None);
        }
        let skeleton = self.tri.ensure_skeleton();
        let mut linked = None;
        for (vertex, face) in skeleton.faces(0) {
            let counts: Vec<&Integer> = face
                .embeddings()
                .iter()
                .filter_map(|emb| self.discs[emb.simplex].triangles[emb.vertex(0)].as_ref())
                .collect();
            let Some(&first) = counts.first() else { continue };
            if counts.iter().any(|&x| x != first) {
                return Ok(None);
            }
            if !first.is_zero() {
                if linked.is_some() {
                    return Ok(None);
                }
                linked = Some(vertex);
            }
        }
        Ok(linked)
    }

    /// Returns the edges whose thin link is a positive multiple of this
    /// surface. There are at most two.
    pub fn thin_edge_links(&self) -> SurfaceResult<Vec<FaceId>> {
        if self.is_empty() || !self.is_compact() || self.has_octagons() {
            return Ok(vec![]);
        }
        let skeleton = self.tri.ensure_skeleton();
        let mut ret = vec![];
        for (e, edge) in skeleton.faces(1) {
            let Some(emb) = edge.embeddings().first() else { continue };
            let ends = [
                skeleton.vertex(emb.simplex, emb.vertex(0)),
                skeleton.vertex(emb.simplex, emb.vertex(1)),
            ];
            let mut link = vec![];
            let mut surface = vec![];
            for (t, tet) in &self.discs {
                let edge_at = |a: usize, b: usize| skeleton.face_of(t, &[a, b]).map(|(id, _)| id);
                for v in 0..4 {
                    let at_end = ends.contains(&skeleton.vertex(t, v));
                    let meets = (0..4).filter(|&w| w != v).any(|w| edge_at(v, w) == Some(e));
                    link.push(Integer::from(usize::from(at_end && !meets)));
                    surface.push(tet.triangles[v].clone().unwrap_or_default());
                }
                for (k, [a, b, c, d]) in QUAD_DEFN.into_iter().enumerate() {
                    let hits = [edge_at(a, b), edge_at(c, d)].into_iter().filter(|&x| x == Some(e)).count();
                    link.push(Integer::from(hits));
                    surface.push(tet.quads[k].clone());
                }
            }
            if is_positive_multiple(&surface, &link) {
                ret.push(e);
            }
        }
        Ok(ret)
    }

    /// Returns whether every triangle count is finite.
    pub fn is_compact(&self) -> bool {
        self.discs.iter_values().all(TetDiscs::is_compact)
    }

    /// Returns whether this is the empty surface.
    pub fn is_empty(&self) -> bool {
        self.discs.iter_values().all(|tet| {
            tet.triangles.iter().all(|x| x.as_ref().is_some_and(Integer::is_zero))
                && tet.quads.iter().chain(&tet.octagons).all(Integer::is_zero)
        })
    }

    /// Returns whether the surface meets the real boundary of the
    /// triangulation.
    pub fn has_real_boundary(&self) -> bool {
        self.tri.simplices().iter().any(|(t, simplex)| {
            if !simplex.has_free_facet() {
                return false;
            }
            let tet = &self.discs[t];
            if tet.quads.iter().chain(&tet.octagons).any(|x| !x.is_zero()) {
                return true;
            }
            (0..4).any(|v| {
                tet.triangles[v].as_ref().is_none_or(|x| !x.is_zero())
                    && (0..4).any(|f| f != v && simplex.is_free(f))
            })
        })
    }

    /// Returns the number of discs if the surface is compact and meets each
    /// tetrahedron in at most one disc, or `None` otherwise.
    pub fn central_disc_count(&self) -> Option<usize> {
        let mut ret = 0;
        for tet in self.discs.iter_values() {
            let count = tet.disc_count()?;
            if count > 1 {
                return None;
            }
            if count == 1 {
                ret += 1;
            }
        }
        (ret > 0).then_some(ret)
    }

    /// Returns whether the surface consists of exactly one quad in every
    /// tetrahedron and nothing else.
    pub fn is_splitting(&self) -> bool {
        self.discs.iter_values().all(|tet| {
            tet.triangles.iter().all(|x| x.as_ref().is_some_and(Integer::is_zero))
                && tet.octagons.iter().all(Integer::is_zero)
                && tet.quads.iter().sum::<Integer>() == 1
        })
    }

    fn has_octagons(&self) -> bool {
        self.discs.iter_values().any(|tet| tet.octagons.iter().any(|x| !x.is_zero()))
    }

    /// Returns whether the surface has more than one octagonal disc.
    pub fn has_multiple_octagon_discs(&self) -> bool {
        let total: Integer = self.discs.iter_values().flat_map(|tet| &tet.octagons).sum();
        total > 1
    }

    /// Returns whether the surface can be realised as an embedded surface:
    /// at most one quad or octagon type per tetrahedron, and at most one
    /// octagon type in total.
    pub fn is_embedded(&self) -> bool {
        let per_tet = self.discs.iter_values().all(|tet| {
            tet.quads.iter().chain(&tet.octagons).filter(|x| !x.is_zero()).count() <= 1
        });
        let octagon_types = self
            .discs
            .iter_values()
            .flat_map(|tet| &tet.octagons)
            .filter(|x| !x.is_zero())
            .count();
        per_tet && octagon_types <= 1
    }

    /// Returns the sum of two surfaces in the same triangulation and
    /// coordinates.
    pub fn sum(&self, other: &Self) -> SurfaceResult<Self> {
        if self.coords != other.coords || !(Arc::ptr_eq(&self.tri, &other.tri) || self.tri == other.tri) {
            return Err(SurfaceError::invalid(
                "surfaces live in different triangulations or coordinates",
            ));
        }
        let vector = self.vector.iter().zip(&other.vector).map(|(a, b)| a + b).collect();
        Self::new(Arc::clone(&self.tri), self.coords, vector)
    }
}

/// Returns whether `surface` is a positive rational multiple of `link`.
fn is_positive_multiple(surface: &[Integer], link: &[Integer]) -> bool {
    let Some((s0, l0)) = surface.iter().zip(link).find(|(_, l)| !l.is_zero()) else {
        return false;
    };
    s0.is_positive() && surface.iter().zip(link).all(|(s, l)| s * l0 == l * s0)
}

impl fmt::Display for NormalSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let almost_normal = self.coords.is_almost_normal();
        let tets = self.discs.iter_values().map(|tet| {
            let triangles = tet
                .triangles
                .iter()
                .map(|x| x.as_ref().map_or("inf".to_string(), Integer::to_string))
                .join(" ");
            let quads = tet.quads.iter().join(" ");
            match almost_normal {
                true => format!("{triangles} ; {quads} ; {}", tet.octagons.iter().join(" ")),
                false => format!("{triangles} ; {quads}"),
            }
        });
        write!(f, "{}", tets.format(" || "))
    }
}
