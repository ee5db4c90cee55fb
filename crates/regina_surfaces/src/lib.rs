//! Normal and almost normal surfaces in 3-manifold triangulations.
//!
//! A surface is described by a vector counting its discs of each type in
//! each tetrahedron, in one of several [`CoordSystem`]s. The vectors that
//! describe embedded surfaces are the non-negative solutions of a system of
//! [`MatchingEquations`] that also satisfy the quadrilateral constraints.
//! [`NormalSurfaces::enumerate()`] finds the vertex or fundamental solutions
//! by tree search, the double description method, or the dual Hilbert basis
//! method, and each is wrapped as a [`NormalSurface`] that answers
//! topological queries.

macro_rules! debug_panic {
    ($($tok:tt)*) => {
        match cfg!(debug_assertions) {
            true => panic!($($tok)*),
            false => log::error!($($tok)*),
        }
    };
}

mod conversion;
pub mod coords;
mod dd;
mod discs;
mod error;
mod hilbert;
mod list;
mod lp;
mod matching;
mod options;
mod surface;
mod tree;
mod typetrie;

pub use coords::{CoordSystem, DiscType, Orientation};
pub use error::{SurfaceError, SurfaceResult};
pub use list::{NormalSurfaces, SurfaceId};
pub use lp::LpSystem;
pub use matching::{ColumnGroup, MatchingEquations};
pub use options::{Algorithm, Cancellation, Enumeration, EnumerationOptions, SurfaceKind};
pub use surface::NormalSurface;

/// Structs, traits, and functions.
pub mod prelude {
    pub use crate::{
        Algorithm, Cancellation, CoordSystem, DiscType, Enumeration, EnumerationOptions, MatchingEquations,
        NormalSurface, NormalSurfaces, Orientation, SurfaceError, SurfaceId, SurfaceKind, SurfaceResult,
    };
}

#[cfg(test)]
mod tests;
