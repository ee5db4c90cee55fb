//! Conversion between coordinate systems with and without triangles.

use std::sync::Arc;

use regina_maths::Integer;

use crate::{DiscType, NormalSurface, SurfaceError, SurfaceResult};

impl NormalSurface {
    /// Returns the same surface in the coordinate system without triangles,
    /// by dropping the triangle coordinates.
    pub fn standard_to_quad(&self) -> SurfaceResult<NormalSurface> {
        let coords = self.coords();
        if !coords.has_triangles() {
            return Err(SurfaceError::invalid(format!("{coords} coordinates have no triangles to drop")));
        }
        let reduced = coords.reduced();
        let tri = self.triangulation();
        let vector = (0..reduced.dimension(tri.size()))
            .map(|c| {
                let (t, disc, orientation) = reduced.column_disc(c)?;
                let source = coords
                    .column(t, disc, orientation)
                    .ok_or_else(|| SurfaceError::invalid(format!("{disc:?} has no {coords} coordinate")))?;
                Ok(self.vector()[source].clone())
            })
            .collect::<SurfaceResult<Vec<_>>>()?;
        NormalSurface::new(Arc::clone(tri), reduced, vector)
    }

    /// Returns the same surface in the coordinate system with triangles,
    /// adding the fewest triangles around each vertex that make it a
    /// solution of the standard matching equations.
    ///
    /// Only supported for valid triangulations without ideal vertices, where
    /// this is always possible.
    pub fn quad_to_standard(&self) -> SurfaceResult<NormalSurface> {
        let coords = self.coords();
        if coords.has_triangles() {
            return Err(SurfaceError::invalid(format!("{coords} coordinates already have triangles")));
        }
        if coords.is_oriented() {
            return Err(SurfaceError::not_implemented(
                "recovering oriented triangles from oriented quads",
            ));
        }
        let tri = self.triangulation();
        if !tri.is_valid() || tri.is_ideal() {
            return Err(SurfaceError::not_implemented(
                "conversion to standard coordinates needs a valid triangulation with no ideal vertices",
            ));
        }
        let full = coords.unreduced();
        let discs = self.tet_discs();
        let vector = (0..full.dimension(tri.size()))
            .map(|c| {
                let (t, disc, _) = full.column_disc(c)?;
                let tet = &discs[t];
                Ok(match disc {
                    DiscType::Triangle(v) => tet.triangles[v]
                        .clone()
                        .ok_or_else(|| SurfaceError::precondition("surface is not compact"))?,
                    DiscType::Quad(k) => tet.quads[k].clone(),
                    DiscType::Octagon(k) => tet.octagons[k].clone(),
                })
            })
            .collect::<SurfaceResult<Vec<Integer>>>()?;
        NormalSurface::new(Arc::clone(tri), full, vector)
    }
}
