//! Lists of enumerated surfaces.

use std::sync::Arc;

use itertools::Itertools;
use regina_maths::Integer;
use regina_triangulation::{Dim3, Triangulation};
use regina_util::ti::TiVec;

use crate::dd::double_description;
use crate::hilbert::hilbert_dual;
use crate::lp::make_primitive;
use crate::matching::support;
use crate::tree::TreeSearch;
use crate::{
    Algorithm, CoordSystem, Enumeration, EnumerationOptions, MatchingEquations, NormalSurface, SurfaceError,
    SurfaceKind, SurfaceResult,
};

regina_util::typed_index_struct! {
    /// Index of a surface in a [`NormalSurfaces`] list.
    pub struct SurfaceId(pub u32);
}

/// Enumerated vertex or fundamental surfaces of a triangulation.
#[derive(Debug, Clone)]
pub struct NormalSurfaces {
    tri: Arc<Triangulation<Dim3>>,
    coords: CoordSystem,
    kind: SurfaceKind,
    algorithm: Algorithm,
    status: Enumeration,
    surfaces: TiVec<SurfaceId, NormalSurface>,
}

impl NormalSurfaces {
    /// Enumerates surfaces in a snapshot of `tri`.
    pub fn enumerate(tri: &Triangulation<Dim3>, options: &EnumerationOptions) -> SurfaceResult<Self> {
        Self::enumerate_shared(Arc::new(tri.clone()), options)
    }

    /// Enumerates surfaces in a shared triangulation.
    ///
    /// Vertex surfaces may be found by tree search or by the double
    /// description method, and fundamental surfaces by the dual Hilbert
    /// basis method. Tree search does not handle oriented coordinates, so
    /// those fall back to the double description method.
    pub fn enumerate_shared(tri: Arc<Triangulation<Dim3>>, options: &EnumerationOptions) -> SurfaceResult<Self> {
        let coords = options.coords;
        let algorithm = match (options.kind, options.algorithm) {
            (SurfaceKind::Vertex, Algorithm::HilbertDual) => {
                return Err(SurfaceError::invalid(
                    "the Hilbert dual method finds fundamental surfaces, not vertex surfaces",
                ));
            }
            (SurfaceKind::Fundamental, Algorithm::Tree | Algorithm::DoubleDescription) => {
                return Err(SurfaceError::not_implemented(
                    "fundamental surfaces are only found by the Hilbert dual method",
                ));
            }
            (SurfaceKind::Vertex, Algorithm::Tree) if coords.is_oriented() => {
                log::debug!("tree search does not handle {coords} coordinates; using double description");
                Algorithm::DoubleDescription
            }
            (_, algorithm) => algorithm,
        };

        let eqs = MatchingEquations::new(&tri, coords)?;
        let cancel = options.cancel.as_ref();
        let (vectors, status) = match algorithm {
            Algorithm::Tree => TreeSearch::new(&eqs, cancel).run()?,
            Algorithm::DoubleDescription => double_description(&eqs, cancel),
            Algorithm::HilbertDual => hilbert_dual(&eqs, cancel),
        };
        let surfaces = vectors
            .into_iter()
            .map(|v| NormalSurface::new(Arc::clone(&tri), coords, v))
            .collect::<SurfaceResult<TiVec<SurfaceId, _>>>()?;
        log::debug!(
            "{} {} surfaces in {coords} coordinates by {algorithm} ({status})",
            surfaces.len(),
            options.kind,
        );
        Ok(Self {
            tri,
            coords,
            kind: options.kind,
            algorithm,
            status,
            surfaces,
        })
    }

    /// Returns the triangulation the surfaces live in.
    pub fn triangulation(&self) -> &Arc<Triangulation<Dim3>> {
        &self.tri
    }
    /// Returns the coordinate system used for enumeration.
    pub fn coords(&self) -> CoordSystem {
        self.coords
    }
    /// Returns whether these are vertex or fundamental surfaces.
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }
    /// Returns the algorithm that actually ran.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
    /// Returns whether the enumeration ran to completion.
    pub fn status(&self) -> Enumeration {
        self.status
    }
    /// Returns the number of surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }
    /// Returns whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
    /// Returns the surface with the given index.
    pub fn get(&self, id: SurfaceId) -> SurfaceResult<&NormalSurface> {
        Ok(self.surfaces.get(id)?)
    }
    /// Iterates over the surfaces in order.
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, &NormalSurface)> {
        self.surfaces.iter()
    }

    /// Returns a copy of this list keeping only surfaces with at most one
    /// octagonal disc.
    #[must_use]
    pub fn without_multiple_octagons(&self) -> Self {
        Self {
            surfaces: self
                .surfaces
                .iter_values()
                .filter(|s| !s.has_multiple_octagon_discs())
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Converts a list of standard vertex surfaces into the corresponding
    /// list of quad vertex surfaces (or standard almost normal into
    /// quad-oct).
    ///
    /// Vertex links are dropped, the remaining surfaces are projected, and
    /// only projections that are extreme in the smaller cone are kept. This
    /// is only sound for valid triangulations without ideal vertices.
    pub fn standard_to_quad(&self) -> SurfaceResult<Self> {
        if self.kind != SurfaceKind::Vertex {
            return Err(SurfaceError::not_implemented(
                "conversion of fundamental surface lists",
            ));
        }
        if !matches!(self.coords, CoordSystem::Standard | CoordSystem::AlmostNormal) {
            return Err(SurfaceError::not_implemented(format!(
                "conversion of a list in {} coordinates",
                self.coords,
            )));
        }
        if !self.tri.is_valid() || self.tri.is_ideal() {
            return Err(SurfaceError::not_implemented(
                "conversion needs a valid triangulation with no ideal vertices",
            ));
        }

        let mut candidates: Vec<Vec<Integer>> = vec![];
        for surface in self.surfaces.iter_values() {
            if surface.is_vertex_linking() {
                continue;
            }
            let mut v = surface.standard_to_quad()?.vector().to_vec();
            make_primitive(&mut v);
            if !candidates.contains(&v) {
                candidates.push(v);
            }
        }
        let supports = candidates.iter().map(|v| support(v)).collect_vec();
        let is_subset = |a: &[usize], b: &[usize]| a.iter().all(|c| b.contains(c));
        let reduced = self.coords.reduced();
        let surfaces = candidates
            .iter()
            .enumerate()
            .filter(|&(i, _)| {
                (0..candidates.len()).all(|j| j == i || !is_subset(&supports[j], &supports[i]))
            })
            .map(|(_, v)| NormalSurface::new(Arc::clone(&self.tri), reduced, v.clone()))
            .collect::<SurfaceResult<TiVec<SurfaceId, _>>>()?;
        log::debug!(
            "{} of {} standard vertex surfaces survive as {reduced} vertex surfaces",
            surfaces.len(),
            self.len(),
        );
        Ok(Self {
            tri: Arc::clone(&self.tri),
            coords: reduced,
            kind: self.kind,
            algorithm: self.algorithm,
            status: self.status,
            surfaces,
        })
    }
}

impl<'a> IntoIterator for &'a NormalSurfaces {
    type Item = &'a NormalSurface;
    type IntoIter = std::slice::Iter<'a, NormalSurface>;

    fn into_iter(self) -> Self::IntoIter {
        self.surfaces.iter_values()
    }
}
