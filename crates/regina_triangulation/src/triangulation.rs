//! Triangulations as flat arenas of glued simplices.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use regina_maths::Permutation;
use regina_util::ti::{TiVec, TypedIndex};

use crate::change::{ChangeEvent, ChangeListener, ChangeSpan};
use crate::skeleton::Skeleton;
use crate::{Dimension, FaceId, Gluing, Simplex, SimplexId, TriResult, TriangulationError};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a triangulation, used to validate handles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangulationId(u64);

impl TriangulationId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Triangulation of a `D`-manifold, stored as an ordered collection of
/// top-dimensional simplices with some of their facets glued in pairs.
///
/// Faces of lower dimension are computed lazily the first time they are
/// needed and cached until the next mutation.
pub struct Triangulation<D: Dimension> {
    pub(crate) id: TriangulationId,
    pub(crate) generation: u64,
    pub(crate) simplices: TiVec<SimplexId, Simplex<D>>,
    pub(crate) skeleton: OnceLock<Skeleton<D>>,
    pub(crate) span_depth: u32,
    pub(crate) listener: Option<ChangeListener>,
}

impl<D: Dimension> fmt::Debug for Triangulation<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triangulation")
            .field("dim", &D::DIM)
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("simplices", &self.simplices)
            .finish_non_exhaustive()
    }
}

impl<D: Dimension> Default for Triangulation<D> {
    fn default() -> Self {
        Self {
            id: TriangulationId::next(),
            generation: 0,
            simplices: TiVec::new(),
            skeleton: OnceLock::new(),
            span_depth: 0,
            listener: None,
        }
    }
}

/// Clones get a fresh identity, so handles into the original do not
/// resolve against the clone. Listeners are not cloned.
impl<D: Dimension> Clone for Triangulation<D> {
    fn clone(&self) -> Self {
        Self {
            id: TriangulationId::next(),
            generation: 0,
            simplices: self.simplices.clone(),
            skeleton: self.skeleton.clone(),
            span_depth: 0,
            listener: None,
        }
    }
}

/// Two triangulations are equal if they have identical gluings, simplex for
/// simplex. Descriptions are ignored.
impl<D: Dimension> PartialEq for Triangulation<D> {
    fn eq(&self, other: &Self) -> bool {
        self.simplices.len() == other.simplices.len()
            && std::iter::zip(self.simplices.iter_values(), other.simplices.iter_values())
                .all(|(a, b)| a.adj == b.adj)
    }
}
impl<D: Dimension> Eq for Triangulation<D> {}

impl<D: Dimension> Triangulation<D> {
    /// Constructs an empty triangulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a triangulation with `size` simplices and the given
    /// gluings, each written as `(simplex, facet, other_simplex, images)`.
    pub fn from_gluings<P: AsRef<[usize]>>(
        size: usize,
        gluings: impl IntoIterator<Item = (usize, usize, usize, P)>,
    ) -> TriResult<Self> {
        let mut ret = Self::new();
        {
            let mut tri = ret.change_span();
            tri.new_simplices(size)?;
            for (s, f, t, images) in gluings {
                let perm = D::Perm::from_images(images.as_ref())?;
                tri.join(SimplexId::try_from_index(s)?, f, SimplexId::try_from_index(t)?, perm)?;
            }
        }
        Ok(ret)
    }

    /// Returns the dimension of the triangulation.
    pub fn dim(&self) -> usize {
        D::DIM
    }
    /// Returns the identity of this triangulation.
    pub fn id(&self) -> TriangulationId {
        self.id
    }
    /// Returns the number of completed changes so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
    /// Returns the number of top-dimensional simplices.
    pub fn size(&self) -> usize {
        self.simplices.len()
    }
    /// Returns whether there are no simplices.
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }
    /// Returns all simplices.
    pub fn simplices(&self) -> &TiVec<SimplexId, Simplex<D>> {
        &self.simplices
    }
    /// Returns a single simplex.
    pub fn simplex(&self, s: SimplexId) -> TriResult<&Simplex<D>> {
        Ok(self.simplices.get(s)?)
    }
    /// Returns the gluing on facet `f` of simplex `s`.
    ///
    /// # Panics
    ///
    /// Panics if `s` is out of range.
    pub fn gluing(&self, s: SimplexId, f: usize) -> Option<Gluing<D>> {
        self.simplices[s].gluing(f)
    }

    /// Installs a callback invoked once at the end of every outermost
    /// [`ChangeSpan`].
    pub fn set_listener(&mut self, listener: Option<ChangeListener>) {
        self.listener = listener;
    }

    /// Opens a change span. Mutations made through the span are reported as
    /// a single change when the outermost span is dropped.
    pub fn change_span(&mut self) -> ChangeSpan<'_, D> {
        ChangeSpan::new(self)
    }

    pub(crate) fn end_span(&mut self) {
        self.skeleton = OnceLock::new();
        self.span_depth -= 1;
        if self.span_depth == 0 {
            self.generation += 1;
            let event = ChangeEvent {
                triangulation: self.id,
                generation: self.generation,
                size: self.size(),
            };
            log::trace!("{}-triangulation changed: {event:?}", D::DIM);
            if let Some(listener) = &self.listener {
                listener(&event);
            }
        }
    }

    /// Returns the cached skeleton, computing it if necessary.
    pub fn ensure_skeleton(&self) -> &Skeleton<D> {
        self.skeleton.get_or_init(|| Skeleton::compute(self))
    }

    /// Adds a new simplex with every facet free.
    pub fn new_simplex(&mut self) -> TriResult<SimplexId> {
        let mut tri = self.change_span();
        Ok(tri.simplices.push(Simplex::default())?)
    }
    /// Adds a new simplex with a description.
    pub fn new_simplex_with_description(&mut self, description: impl Into<String>) -> TriResult<SimplexId> {
        let s = self.new_simplex()?;
        self.simplices[s].description = description.into();
        Ok(s)
    }
    /// Adds `k` new simplices and returns their indices.
    pub fn new_simplices(&mut self, k: usize) -> TriResult<Vec<SimplexId>> {
        SimplexId::try_from_index(self.size() + k)?;
        let mut tri = self.change_span();
        (0..k)
            .map(|_| Ok(tri.simplices.push(Simplex::default())?))
            .collect()
    }
    /// Sets the description of simplex `s`.
    pub fn set_description(&mut self, s: SimplexId, description: impl Into<String>) -> TriResult<()> {
        self.simplices.get_mut(s)?.description = description.into();
        Ok(())
    }

    /// Unglues every facet of `s` and removes it. Later simplices move down
    /// by one index.
    pub fn remove_simplex(&mut self, s: SimplexId) -> TriResult<Simplex<D>> {
        self.simplices.get(s)?;
        let mut tri = self.change_span();
        tri.isolate(s)?;
        let removed = tri.simplices.remove(s)?;
        for simplex in tri.simplices.iter_values_mut() {
            for gluing in simplex.adj.iter_mut().flatten() {
                if gluing.simplex > s {
                    gluing.simplex = SimplexId(gluing.simplex.0 - 1);
                }
            }
        }
        Ok(removed)
    }
    /// Removes every simplex.
    pub fn clear(&mut self) {
        let mut tri = self.change_span();
        tri.simplices.clear();
    }

    /// Glues facet `f` of `s` to facet `perm(f)` of `t`, identifying vertex
    /// `v` of `s` with vertex `perm(v)` of `t`.
    ///
    /// Both facets must be free, and a facet may not be glued to itself.
    pub fn join(&mut self, s: SimplexId, f: usize, t: SimplexId, perm: D::Perm) -> TriResult<()> {
        if f > D::DIM {
            return Err(TriangulationError::invalid(format!("no facet {f} in a {}-simplex", D::DIM)));
        }
        let g = perm.image(f);
        if self.simplices.get(s)?.gluing(f).is_some() {
            return Err(TriangulationError::invalid(format!("facet {f} of simplex {s} is already glued")));
        }
        if self.simplices.get(t)?.gluing(g).is_some() {
            return Err(TriangulationError::invalid(format!("facet {g} of simplex {t} is already glued")));
        }
        if s == t && f == g {
            return Err(TriangulationError::invalid(format!("cannot glue facet {f} of simplex {s} to itself")));
        }
        let mut tri = self.change_span();
        tri.simplices[s].adj[f] = Some(Gluing { simplex: t, perm });
        tri.simplices[t].adj[g] = Some(Gluing {
            simplex: s,
            perm: perm.inverse(),
        });
        Ok(())
    }
    /// Glues facet `f` of `s` to facet `g` of `t`, checking that `perm`
    /// maps one to the other.
    pub fn glue(&mut self, s: SimplexId, f: usize, t: SimplexId, g: usize, perm: D::Perm) -> TriResult<()> {
        if f > D::DIM || perm.image(f) != g {
            return Err(TriangulationError::invalid(format!(
                "gluing permutation {perm} does not map facet {f} to facet {g}",
            )));
        }
        self.join(s, f, t, perm)
    }

    /// Unglues facet `f` of `s` and returns the gluing that was removed.
    pub fn unjoin(&mut self, s: SimplexId, f: usize) -> TriResult<Gluing<D>> {
        let Some(gluing) = self.simplices.get(s)?.gluing(f) else {
            return Err(TriangulationError::invalid(format!("facet {f} of simplex {s} is not glued")));
        };
        let mut tri = self.change_span();
        tri.simplices[s].adj[f] = None;
        tri.simplices[gluing.simplex].adj[gluing.perm.image(f)] = None;
        Ok(gluing)
    }
    /// Alias for [`Self::unjoin()`].
    pub fn unglue(&mut self, s: SimplexId, f: usize) -> TriResult<Gluing<D>> {
        self.unjoin(s, f)
    }
    /// Unglues every facet of `s`.
    pub fn isolate(&mut self, s: SimplexId) -> TriResult<()> {
        self.simplices.get(s)?;
        let mut tri = self.change_span();
        for f in 0..=D::DIM {
            if tri.simplices[s].gluing(f).is_some() {
                tri.unjoin(s, f)?;
            }
        }
        Ok(())
    }

    /// Appends a copy of every simplex of `other`, with the same gluings
    /// among them. Returns the index of the first new simplex.
    pub fn insert_triangulation(&mut self, other: &Self) -> TriResult<SimplexId> {
        let offset = self.size();
        let first = SimplexId::try_from_index(offset)?;
        SimplexId::try_from_index(offset + other.size())?;
        let mut tri = self.change_span();
        for simplex in other.simplices.iter_values() {
            let mut copy = simplex.clone();
            for gluing in copy.adj.iter_mut().flatten() {
                gluing.simplex = SimplexId::try_from_index(gluing.simplex.to_index() + offset)?;
            }
            tri.simplices.push(copy)?;
        }
        Ok(first)
    }

    /// Returns a handle to simplex `s` that remains valid until the next
    /// change.
    pub fn simplex_handle(&self, s: SimplexId) -> TriResult<SimplexHandle> {
        self.simplices.get(s)?;
        Ok(SimplexHandle {
            triangulation: self.id,
            generation: self.generation,
            index: s,
        })
    }
    /// Resolves a simplex handle against this triangulation.
    pub fn resolve_simplex(&self, handle: SimplexHandle) -> TriResult<SimplexId> {
        self.check_handle(handle.triangulation, handle.generation)?;
        Ok(handle.index)
    }
    /// Returns a handle to the `subdim`-face `face` that remains valid until
    /// the next change.
    pub fn face_handle(&self, subdim: usize, face: FaceId) -> TriResult<FaceHandle> {
        if subdim >= D::DIM {
            return Err(TriangulationError::invalid(format!("no {subdim}-faces in the skeleton")));
        }
        self.ensure_skeleton().faces(subdim).get(face)?;
        Ok(FaceHandle {
            triangulation: self.id,
            generation: self.generation,
            subdim,
            index: face,
        })
    }
    /// Resolves a face handle against this triangulation, returning the
    /// face dimension and index.
    pub fn resolve_face(&self, handle: FaceHandle) -> TriResult<(usize, FaceId)> {
        self.check_handle(handle.triangulation, handle.generation)?;
        Ok((handle.subdim, handle.index))
    }
    fn check_handle(&self, triangulation: TriangulationId, generation: u64) -> TriResult<()> {
        if triangulation != self.id {
            Err(TriangulationError::invalid("handle belongs to a different triangulation"))
        } else if generation != self.generation {
            Err(TriangulationError::SnapshotOutOfDate)
        } else {
            Ok(())
        }
    }
}

/// Handle to a simplex, tagged with the triangulation and generation it was
/// taken from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SimplexHandle {
    triangulation: TriangulationId,
    generation: u64,
    index: SimplexId,
}

/// Handle to a face of the skeleton, tagged with the triangulation and
/// generation it was taken from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FaceHandle {
    triangulation: TriangulationId,
    generation: u64,
    subdim: usize,
    index: FaceId,
}

