//! Lower-dimensional faces, components and boundary components.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use disjoint::DisjointSet;
use itertools::Itertools;
use regina_maths::Permutation;
use regina_util::ti::{IdSet, TiVec, TypedIndex};

use crate::numbering::FaceNumbering;
use crate::{
    BoundaryComponentId, ComponentId, Dimension, FaceId, SimplexId, TriResult, Triangulation,
    TriangulationError,
};

/// Appearance of a face inside one top-dimensional simplex.
///
/// `perm` maps vertex `i` of the face to vertex `perm(i)` of the simplex for
/// `i` up to the face dimension. The remaining images list the other
/// vertices of the simplex.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FaceEmbedding<D: Dimension> {
    /// Simplex containing the face.
    pub simplex: SimplexId,
    /// Map from face vertices to simplex vertices.
    pub perm: D::Perm,
}

impl<D: Dimension> FaceEmbedding<D> {
    /// Returns the simplex vertex corresponding to vertex `i` of the face.
    pub fn vertex(&self, i: usize) -> usize {
        self.perm.image(i)
    }
}

/// Topology of the link of a vertex.
///
/// Links of vertices in a 4-triangulation are 3-manifolds, and these are
/// recognised by homology alone: a closed orientable link with trivial first
/// homology counts as a [`LinkKind::Sphere`], and a link with one 2-sphere
/// boundary and trivial first homology counts as a [`LinkKind::Ball`]. A
/// vertex whose link is a homology sphere other than the 3-sphere, such as
/// the Poincaré sphere, is therefore reported as internal rather than ideal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Closed sphere: the vertex is internal. For 4-triangulations, any
    /// homology 3-sphere.
    Sphere,
    /// Ball: the vertex lies on the real boundary. For 4-triangulations, any
    /// homology 3-ball.
    Ball,
    /// Closed manifold other than a sphere: the vertex is ideal.
    Ideal,
    /// Anything else.
    Invalid,
}

/// Equivalence class of subfaces of simplices under the gluings.
#[derive(Debug, Clone)]
pub struct Face<D: Dimension> {
    subdim: usize,
    embeddings: Vec<FaceEmbedding<D>>,
    self_identified: bool,
    boundary: bool,
    link: Option<LinkKind>,
    link_euler_char: Option<i64>,
    component: ComponentId,
    boundary_component: Option<BoundaryComponentId>,
}

impl<D: Dimension> Face<D> {
    fn new(subdim: usize) -> Self {
        Self {
            subdim,
            embeddings: vec![],
            self_identified: false,
            boundary: false,
            link: None,
            link_euler_char: None,
            component: ComponentId(0),
            boundary_component: None,
        }
    }

    /// Returns the dimension of the face.
    pub fn subdim(&self) -> usize {
        self.subdim
    }
    /// Returns every appearance of the face, in breadth-first order from the
    /// first simplex that contains it.
    pub fn embeddings(&self) -> &[FaceEmbedding<D>] {
        &self.embeddings
    }
    /// Returns the number of appearances.
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }
    /// Returns whether the face is glued to itself with its vertices
    /// permuted.
    pub fn has_bad_identification(&self) -> bool {
        self.self_identified
    }
    /// Returns whether the link of this vertex is neither a sphere, a ball
    /// nor a closed manifold. Only vertices of 2-, 3- and 4-triangulations
    /// have their links checked.
    pub fn has_bad_link(&self) -> bool {
        self.link == Some(LinkKind::Invalid)
    }
    /// Returns whether the face is valid.
    pub fn is_valid(&self) -> bool {
        !self.has_bad_identification() && !self.has_bad_link()
    }
    /// Returns whether the face lies in the real boundary.
    pub fn is_boundary(&self) -> bool {
        self.boundary
    }
    /// Returns the link of this vertex, if it has been classified.
    pub fn link(&self) -> Option<LinkKind> {
        self.link
    }
    /// Returns the Euler characteristic of the link of this vertex, if it has
    /// been built.
    pub fn link_euler_char(&self) -> Option<i64> {
        self.link_euler_char
    }
    /// Returns whether this is an ideal vertex.
    pub fn is_ideal(&self) -> bool {
        self.link == Some(LinkKind::Ideal)
    }
    /// Returns the connected component containing the face.
    pub fn component(&self) -> ComponentId {
        self.component
    }
    /// Returns a boundary component containing the face, if any.
    pub fn boundary_component(&self) -> Option<BoundaryComponentId> {
        self.boundary_component
    }
}

/// Connected component of a triangulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    simplices: Vec<SimplexId>,
    orientable: bool,
    boundary_facets: usize,
}

impl Component {
    /// Returns the simplices of the component in increasing order.
    pub fn simplices(&self) -> &[SimplexId] {
        &self.simplices
    }
    /// Returns the number of simplices.
    pub fn size(&self) -> usize {
        self.simplices.len()
    }
    /// Returns whether the component is orientable.
    pub fn is_orientable(&self) -> bool {
        self.orientable
    }
    /// Returns the number of free facets.
    pub fn count_boundary_facets(&self) -> usize {
        self.boundary_facets
    }
}

/// Kind of boundary component.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Union of free facets.
    Real,
    /// Single vertex whose link is a closed manifold other than a sphere.
    Ideal,
    /// Single internal vertex whose link is not a manifold.
    InvalidVertex,
}

/// Boundary component of a triangulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryComponent {
    kind: BoundaryKind,
    facets: Vec<FaceId>,
    vertex: Option<FaceId>,
    component: ComponentId,
    euler_char: i64,
}

impl BoundaryComponent {
    /// Returns the kind of boundary component.
    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }
    /// Returns whether this is real boundary.
    pub fn is_real(&self) -> bool {
        self.kind == BoundaryKind::Real
    }
    /// Returns whether this is an ideal vertex.
    pub fn is_ideal(&self) -> bool {
        self.kind == BoundaryKind::Ideal
    }
    /// Returns the free facets, which is empty unless this is real
    /// boundary.
    pub fn facets(&self) -> &[FaceId] {
        &self.facets
    }
    /// Returns the vertex of an ideal or invalid-vertex boundary component.
    pub fn vertex(&self) -> Option<FaceId> {
        self.vertex
    }
    /// Returns the component of the triangulation containing this boundary
    /// component.
    pub fn component(&self) -> ComponentId {
        self.component
    }
    /// Returns the Euler characteristic of the boundary, or of the vertex
    /// link for ideal and invalid vertices.
    pub fn euler_char(&self) -> i64 {
        self.euler_char
    }
}

/// Ordered ring of simplices around a `(D-2)`-face, stepping across one
/// facet at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RidgeRing<D: Dimension> {
    /// Appearances of the face, in order. Each one is reached from the
    /// previous by crossing facet `perm(D-1)` of the previous simplex.
    pub embeddings: Vec<FaceEmbedding<D>>,
    /// Whether the ring closes up. Rings that meet the boundary run from one
    /// boundary facet to the other.
    pub closed: bool,
}

/// Skeleton of a triangulation: every face of dimension `0..D`, with the
/// components and boundary components.
#[derive(Debug, Clone)]
pub struct Skeleton<D: Dimension> {
    faces: Vec<TiVec<FaceId, Face<D>>>,
    lookup: Vec<TiVec<SimplexId, Vec<(FaceId, D::Perm)>>>,
    components: TiVec<ComponentId, Component>,
    simplex_component: TiVec<SimplexId, ComponentId>,
    orientation: TiVec<SimplexId, i8>,
    boundary_components: TiVec<BoundaryComponentId, BoundaryComponent>,
    valid: bool,
    orientable: bool,
}

pub(crate) fn perm_of<P: Permutation>(images: &[usize]) -> P {
    P::from_images(images).unwrap_or_else(|e| {
        debug_panic!("bad permutation {images:?}: {e}");
        P::identity()
    })
}

fn index<I: TypedIndex>(i: usize) -> I {
    I::try_from_index(i).unwrap_or_else(|e| {
        debug_panic!("{e}");
        I::MAX
    })
}

impl<D: Dimension> Skeleton<D> {
    pub(crate) fn compute(tri: &Triangulation<D>) -> Self {
        log::debug!(
            "computing skeleton of {}-triangulation with {} simplices",
            D::DIM,
            tri.size(),
        );
        let (faces, lookup): (Vec<_>, Vec<_>) = (0..D::DIM).map(|k| label_faces(tri, k)).unzip();
        let (components, simplex_component, orientation) = find_components(tri);
        let mut ret = Self {
            faces,
            lookup,
            components,
            simplex_component,
            orientation,
            boundary_components: TiVec::new(),
            valid: true,
            orientable: true,
        };
        for k in 0..D::DIM {
            for face in ret.faces[k].iter_values_mut() {
                if let Some(e) = face.embeddings.first() {
                    face.component = ret.simplex_component[e.simplex];
                }
            }
        }
        ret.classify_vertex_links(tri);
        ret.find_boundary_components();
        ret.valid = ret.faces.iter().flat_map(|f| f.iter_values()).all(Face::is_valid);
        ret.orientable = ret.components.iter_values().all(|c| c.orientable);
        ret
    }

    fn classify_vertex_links(&mut self, tri: &Triangulation<D>) {
        if !(2..=4).contains(&D::DIM) {
            return;
        }
        for vertex in self.faces[0].iter_values_mut() {
            if D::DIM == 2 {
                vertex.link = Some(if vertex.boundary { LinkKind::Ball } else { LinkKind::Sphere });
                continue;
            }
            match build_vertex_link(tri, &vertex.embeddings) {
                Ok(link) => {
                    vertex.link = Some(classify_link(&link));
                    vertex.link_euler_char = Some(link.euler_char_tri());
                }
                Err(e) => {
                    log::warn!("could not build vertex link: {e}");
                    vertex.link = Some(LinkKind::Invalid);
                }
            }
        }
    }

    fn find_boundary_components(&mut self) {
        let d = D::DIM;
        let boundary_facets = self.faces[d - 1]
            .iter()
            .filter(|(_, f)| f.boundary)
            .map(|(id, _)| id)
            .collect_vec();
        let mut sets = DisjointSet::with_len(boundary_facets.len());
        if d >= 2 {
            let ridges = FaceNumbering::get(d, d - 2);
            let mut first_facet_of_ridge = HashMap::new();
            for (i, &facet) in boundary_facets.iter().enumerate() {
                let emb = self.faces[d - 1][facet].embeddings[0];
                let free = emb.perm.image(d);
                for u in (0..=d).filter(|&u| u != free) {
                    let Some(r) = ridges.index_of((0..=d).filter(|&x| x != free && x != u)) else {
                        continue;
                    };
                    let ridge = self.lookup[d - 2][emb.simplex][r].0;
                    match first_facet_of_ridge.entry(ridge) {
                        Entry::Vacant(e) => {
                            e.insert(i);
                        }
                        Entry::Occupied(e) => {
                            sets.join(*e.get(), i);
                        }
                    }
                }
            }
        }

        let mut groups = sets.sets();
        groups.iter_mut().for_each(|g| g.sort_unstable());
        groups.sort();
        for group in groups {
            let bc_id = index(self.boundary_components.len());
            let facets = group.iter().map(|&i| boundary_facets[i]).collect_vec();
            let mut distinct: Vec<IdSet<FaceId>> = vec![IdSet::new(); d];
            for &facet in &facets {
                let emb = self.faces[d - 1][facet].embeddings[0];
                let free = emb.perm.image(d);
                let others = (0..=d).filter(|&x| x != free).collect_vec();
                for k in 0..d {
                    let numbering = FaceNumbering::get(d, k);
                    for subset in others.iter().copied().combinations(k + 1) {
                        if let Some(i) = numbering.index_of(subset) {
                            distinct[k].insert(self.lookup[k][emb.simplex][i].0);
                        }
                    }
                }
            }
            for (k, ids) in distinct.iter().enumerate() {
                for id in ids.iter() {
                    self.faces[k][id].boundary_component.get_or_insert(bc_id);
                }
            }
            let euler_char = distinct
                .iter()
                .enumerate()
                .map(|(k, ids)| if k % 2 == 0 { ids.len() as i64 } else { -(ids.len() as i64) })
                .sum();
            let component = self.faces[d - 1][facets[0]].component;
            let _ = self.boundary_components.push(BoundaryComponent {
                kind: BoundaryKind::Real,
                facets,
                vertex: None,
                component,
                euler_char,
            });
        }

        for v in self.faces[0].iter_keys() {
            let vertex = &self.faces[0][v];
            let kind = match vertex.link {
                Some(LinkKind::Ideal) => BoundaryKind::Ideal,
                Some(LinkKind::Invalid) if !vertex.boundary => BoundaryKind::InvalidVertex,
                _ => continue,
            };
            let bc = BoundaryComponent {
                kind,
                facets: vec![],
                vertex: Some(v),
                component: vertex.component,
                euler_char: vertex.link_euler_char.unwrap_or(0),
            };
            if let Ok(id) = self.boundary_components.push(bc) {
                self.faces[0][v].boundary_component = Some(id);
            }
        }
    }

    /// Returns the faces of dimension `subdim`.
    ///
    /// # Panics
    ///
    /// Panics if `subdim >= D`.
    pub fn faces(&self, subdim: usize) -> &TiVec<FaceId, Face<D>> {
        &self.faces[subdim]
    }
    /// Returns the face containing subface `local` of simplex `s`, where
    /// subfaces are numbered as in [`FaceNumbering`], together with the map
    /// from face vertices to simplex vertices.
    ///
    /// # Panics
    ///
    /// Panics if any argument is out of range.
    pub fn simplex_face(&self, subdim: usize, s: SimplexId, local: usize) -> (FaceId, D::Perm) {
        self.lookup[subdim][s][local]
    }
    /// Returns the vertex of the skeleton at vertex `v` of simplex `s`.
    pub fn vertex(&self, s: SimplexId, v: usize) -> FaceId {
        self.lookup[0][s][v].0
    }
    /// Returns the `(D-1)`-face at facet `f` of simplex `s`.
    pub fn facet(&self, s: SimplexId, f: usize) -> (FaceId, D::Perm) {
        // Facets are numbered lexicographically by vertex set, so the facet
        // opposite vertex `f` comes `D - f`th.
        self.lookup[D::DIM - 1][s][D::DIM - f]
    }
    /// Returns the face of the given vertices of simplex `s`.
    pub fn face_of(&self, s: SimplexId, vertices: &[usize]) -> Option<(FaceId, D::Perm)> {
        let subdim = vertices.len().checked_sub(1)?;
        let local = FaceNumbering::get(D::DIM, subdim).index_of(vertices.iter().copied())?;
        self.lookup.get(subdim)?.get(s).ok()?.get(local).copied()
    }
    /// Returns the connected components.
    pub fn components(&self) -> &TiVec<ComponentId, Component> {
        &self.components
    }
    /// Returns the component containing simplex `s`.
    pub fn simplex_component(&self, s: SimplexId) -> ComponentId {
        self.simplex_component[s]
    }
    /// Returns `1` or `-1` for simplex `s`, such that for orientable
    /// components every gluing reverses the orientation.
    pub fn orientation(&self, s: SimplexId) -> i8 {
        self.orientation[s]
    }
    /// Returns the boundary components: real ones first, ordered by their
    /// lowest facet, then ideal and invalid vertices.
    pub fn boundary_components(&self) -> &TiVec<BoundaryComponentId, BoundaryComponent> {
        &self.boundary_components
    }
    /// Returns whether every face is valid.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
    /// Returns whether every component is orientable.
    pub fn is_orientable(&self) -> bool {
        self.orientable
    }
}

fn label_faces<D: Dimension>(
    tri: &Triangulation<D>,
    k: usize,
) -> (
    TiVec<FaceId, Face<D>>,
    TiVec<SimplexId, Vec<(FaceId, D::Perm)>>,
) {
    let numbering = FaceNumbering::get(D::DIM, k);
    let mut lookup: TiVec<SimplexId, Vec<Option<(FaceId, D::Perm)>>> =
        tri.simplices.map_ref(|_, _| vec![None; numbering.len()]);
    let mut faces = TiVec::new();
    let mut queue = VecDeque::new();

    for s in tri.simplices.iter_keys() {
        for i in 0..numbering.len() {
            if lookup[s][i].is_some() {
                continue;
            }
            let id = index(faces.len());
            let start = perm_of::<D::Perm>(&numbering.ordering(i));
            lookup[s][i] = Some((id, start));
            queue.push_back((s, start));

            let mut face = Face::new(k);
            while let Some((s, pi)) = queue.pop_front() {
                face.embeddings.push(FaceEmbedding { simplex: s, perm: pi });
                for m in k + 1..=D::DIM {
                    let Some(gluing) = tri.simplices[s].gluing(pi.image(m)) else {
                        face.boundary = true;
                        continue;
                    };
                    let next = gluing.perm * pi;
                    let Some(j) = numbering.index_of((0..=k).map(|x| next.image(x))) else {
                        continue;
                    };
                    match lookup[gluing.simplex][j] {
                        None => {
                            lookup[gluing.simplex][j] = Some((id, next));
                            queue.push_back((gluing.simplex, next));
                        }
                        Some((_, seen)) => {
                            if (0..=k).any(|x| seen.image(x) != next.image(x)) {
                                face.self_identified = true;
                            }
                        }
                    }
                }
            }
            if let Err(e) = faces.push(face) {
                debug_panic!("{e}");
            }
        }
    }

    let lookup = lookup.map(|_, v| v.into_iter().flatten().collect());
    (faces, lookup)
}

fn find_components<D: Dimension>(
    tri: &Triangulation<D>,
) -> (
    TiVec<ComponentId, Component>,
    TiVec<SimplexId, ComponentId>,
    TiVec<SimplexId, i8>,
) {
    let mut sets = DisjointSet::with_len(tri.size());
    for (s, simplex) in &tri.simplices {
        for (_, gluing) in simplex.gluings() {
            if let Some(g) = gluing {
                sets.join(s.to_index(), g.simplex.to_index());
            }
        }
    }
    let mut groups = sets.sets();
    groups.iter_mut().for_each(|g| g.sort_unstable());
    groups.sort();

    let mut components = TiVec::new();
    let mut simplex_component = tri.simplices.map_ref(|_, _| ComponentId(0));
    let mut orientation = tri.simplices.map_ref(|_, _| 0_i8);
    for group in groups {
        let id = index(components.len());
        let simplices = group.into_iter().map(index::<SimplexId>).collect_vec();
        let mut orientable = true;
        let mut boundary_facets = 0;
        let mut queue = VecDeque::from([simplices[0]]);
        orientation[simplices[0]] = 1;
        while let Some(s) = queue.pop_front() {
            simplex_component[s] = id;
            for (_, gluing) in tri.simplices[s].gluings() {
                let Some(g) = gluing else {
                    boundary_facets += 1;
                    continue;
                };
                let expected = -orientation[s] * g.perm.sign() as i8;
                if orientation[g.simplex] == 0 {
                    orientation[g.simplex] = expected;
                    queue.push_back(g.simplex);
                } else if orientation[g.simplex] != expected {
                    orientable = false;
                }
            }
        }
        let _ = components.push(Component {
            simplices,
            orientable,
            boundary_facets,
        });
    }
    (components, simplex_component, orientation)
}

/// Builds the link of a vertex from its appearances: one link simplex for
/// each corner of a simplex at the vertex. Vertex `a` of the link simplex at
/// corner `v` lies on the edge from `v` to the `a`-th other vertex.
fn build_vertex_link<D: Dimension>(
    tri: &Triangulation<D>,
    embeddings: &[FaceEmbedding<D>],
) -> TriResult<Triangulation<D::Lower>> {
    if D::Lower::DIM + 1 != D::DIM {
        return Err(TriangulationError::NotImplemented(format!(
            "vertex links in dimension {}",
            D::DIM,
        )));
    }
    let corners: HashMap<(SimplexId, usize), usize> = embeddings
        .iter()
        .enumerate()
        .map(|(i, e)| ((e.simplex, e.perm.image(0)), i))
        .collect();
    let others = |v: usize| (0..=D::DIM).filter(move |&u| u != v);

    let mut link = Triangulation::<D::Lower>::new();
    {
        let mut span = link.change_span();
        let ids = span.new_simplices(embeddings.len())?;
        for (i, e) in embeddings.iter().enumerate() {
            let v = e.perm.image(0);
            for (a, f) in others(v).enumerate() {
                if span.gluing(ids[i], a).is_some() {
                    continue;
                }
                let Some(g) = tri.simplices[e.simplex].gluing(f) else {
                    continue;
                };
                let w = g.perm.image(v);
                let Some(&j) = corners.get(&(g.simplex, w)) else {
                    return Err(TriangulationError::invalid("vertex link is disconnected"));
                };
                let target = others(w).collect_vec();
                let images = others(v)
                    .map(|u| {
                        let image = g.perm.image(u);
                        target.iter().position(|&x| x == image).unwrap_or(0)
                    })
                    .collect_vec();
                let perm = <<D::Lower as Dimension>::Perm as Permutation>::from_images(&images)?;
                span.join(ids[i], a, ids[j], perm)?;
            }
        }
    }
    Ok(link)
}

fn classify_link<L: Dimension>(link: &Triangulation<L>) -> LinkKind {
    let closed = !link.has_boundary_facets();
    let skeleton = link.ensure_skeleton();
    match L::DIM {
        2 => match (closed, link.euler_char_tri()) {
            (true, 2) => LinkKind::Sphere,
            (true, _) => LinkKind::Ideal,
            (false, 1) if skeleton.boundary_components().len() == 1 => LinkKind::Ball,
            _ => LinkKind::Invalid,
        },
        3 => {
            if !skeleton.is_valid() || link.is_ideal() {
                return LinkKind::Invalid;
            }
            let trivial_h1 = link.homology().is_ok_and(|h| h.is_trivial());
            if closed {
                match link.is_orientable() && trivial_h1 {
                    true => LinkKind::Sphere,
                    false => LinkKind::Ideal,
                }
            } else {
                let bcs = skeleton.boundary_components();
                match bcs.len() == 1 && bcs.iter_values().all(|bc| bc.euler_char == 2) && trivial_h1 {
                    true => LinkKind::Ball,
                    false => LinkKind::Invalid,
                }
            }
        }
        _ => LinkKind::Invalid,
    }
}

impl<D: Dimension> Triangulation<D> {
    /// Returns the number of faces of dimension `subdim`, which counts
    /// top-dimensional simplices when `subdim == D`.
    pub fn count_faces(&self, subdim: usize) -> usize {
        match subdim.cmp(&D::DIM) {
            std::cmp::Ordering::Less => self.ensure_skeleton().faces(subdim).len(),
            std::cmp::Ordering::Equal => self.size(),
            std::cmp::Ordering::Greater => 0,
        }
    }
    /// Returns the number of faces of each dimension from `0` to `D`.
    pub fn f_vector(&self) -> Vec<usize> {
        (0..=D::DIM).map(|k| self.count_faces(k)).collect()
    }
    /// Returns the number of vertices.
    pub fn count_vertices(&self) -> usize {
        self.count_faces(0)
    }
    /// Returns the number of edges.
    pub fn count_edges(&self) -> usize {
        self.count_faces(1)
    }
    /// Returns a face of dimension `subdim < D`.
    pub fn face(&self, subdim: usize, id: FaceId) -> TriResult<&Face<D>> {
        if subdim >= D::DIM {
            return Err(TriangulationError::invalid(format!(
                "no {subdim}-faces in the skeleton of a {}-triangulation",
                D::DIM,
            )));
        }
        Ok(self.ensure_skeleton().faces(subdim).get(id)?)
    }

    /// Returns whether every face is valid.
    pub fn is_valid(&self) -> bool {
        self.ensure_skeleton().is_valid()
    }
    /// Returns whether every component is orientable.
    pub fn is_orientable(&self) -> bool {
        self.ensure_skeleton().is_orientable()
    }
    /// Returns whether there are no boundary components of any kind.
    pub fn is_closed(&self) -> bool {
        self.ensure_skeleton().boundary_components().is_empty()
    }
    /// Returns whether any facet is free.
    pub fn has_boundary_facets(&self) -> bool {
        self.simplices.iter_values().any(|s| s.has_free_facet())
    }
    /// Returns the number of free facets.
    pub fn count_boundary_facets(&self) -> usize {
        self.simplices
            .iter_values()
            .map(|s| s.gluings().filter(|(_, g)| g.is_none()).count())
            .sum()
    }
    /// Returns whether any vertex is ideal.
    pub fn is_ideal(&self) -> bool {
        D::DIM >= 3 && self.ensure_skeleton().faces(0).iter_values().any(Face::is_ideal)
    }
    /// Returns whether there is at most one component.
    pub fn is_connected(&self) -> bool {
        self.count_components() <= 1
    }
    /// Returns the number of connected components.
    pub fn count_components(&self) -> usize {
        self.ensure_skeleton().components().len()
    }
    /// Returns the connected components.
    pub fn components(&self) -> &TiVec<ComponentId, Component> {
        self.ensure_skeleton().components()
    }
    /// Returns the number of boundary components: real, ideal and invalid
    /// vertices together.
    pub fn boundary_component_count(&self) -> usize {
        self.ensure_skeleton().boundary_components().len()
    }
    /// Returns the boundary components.
    pub fn boundary_components(&self) -> &TiVec<BoundaryComponentId, BoundaryComponent> {
        self.ensure_skeleton().boundary_components()
    }
    /// Returns the alternating sum of face counts over every dimension.
    ///
    /// Ideal vertices count as single points, so this differs from the Euler
    /// characteristic of the compact manifold for ideal triangulations.
    pub fn euler_char_tri(&self) -> i64 {
        self.f_vector()
            .into_iter()
            .enumerate()
            .map(|(k, n)| if k % 2 == 0 { n as i64 } else { -(n as i64) })
            .sum()
    }

    /// Builds the link of vertex `v` as a triangulation of one dimension
    /// lower.
    pub fn vertex_link(&self, v: FaceId) -> TriResult<Triangulation<D::Lower>> {
        let vertex = self.face(0, v)?;
        build_vertex_link(self, vertex.embeddings())
    }

    /// Returns the ring of simplices around a `(D-2)`-face.
    pub fn ridge_ring(&self, ridge: FaceId) -> TriResult<RidgeRing<D>> {
        if D::DIM < 2 {
            return Err(TriangulationError::invalid("no ridges in dimension 1"));
        }
        let face = self.face(D::DIM - 2, ridge)?;
        let degree = face.degree();
        let swap = D::Perm::transposition(D::DIM - 1, D::DIM);
        let cross = |emb: FaceEmbedding<D>, facet: usize| {
            let g = self.gluing(emb.simplex, emb.perm.image(facet))?;
            Some(FaceEmbedding {
                simplex: g.simplex,
                perm: g.perm * emb.perm * swap,
            })
        };

        let mut start = face.embeddings()[0];
        if face.is_boundary() {
            for _ in 0..degree {
                match cross(start, D::DIM) {
                    Some(prev) => start = prev,
                    None => break,
                }
            }
        }
        let mut embeddings = vec![start];
        while embeddings.len() < degree {
            match embeddings.last().and_then(|&e| cross(e, D::DIM - 1)) {
                Some(next) => embeddings.push(next),
                None => break,
            }
        }
        Ok(RidgeRing {
            embeddings,
            closed: !face.is_boundary(),
        })
    }
}
