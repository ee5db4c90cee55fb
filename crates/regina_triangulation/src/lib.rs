//! Triangulations of manifolds in dimensions 1 to 15.
//!
//! A [`Triangulation`] is a list of top-dimensional simplices with some of
//! their facets glued together in pairs by vertex permutations. Everything
//! else (faces of every dimension, components, boundary components, vertex
//! links, orientability) is derived from the gluings on demand and cached
//! until the next change.

macro_rules! debug_panic {
    ($($tok:tt)*) => {
        match cfg!(debug_assertions) {
            true => panic!($($tok)*),
            false => log::error!($($tok)*),
        }
    };
}

mod change;
mod dehydration;
mod dimension;
mod error;
pub mod example;
mod homology;
mod isomorphism;
mod isosig;
mod moves;
pub mod numbering;
mod simplex;
mod skeleton;
mod triangulation;

pub use change::{ChangeEvent, ChangeListener, ChangeSpan};
pub use dehydration::MAX_DEHYDRATION_SIZE;
pub use dimension::*;
pub use error::{TriResult, TriangulationError};
pub use isomorphism::Isomorphism;
pub use numbering::FaceNumbering;
pub use simplex::{BoundaryComponentId, ComponentId, FaceId, Gluing, Simplex, SimplexId};
pub use skeleton::{
    BoundaryComponent, BoundaryKind, Component, Face, FaceEmbedding, LinkKind, RidgeRing, Skeleton,
};
pub use triangulation::{FaceHandle, SimplexHandle, Triangulation, TriangulationId};

/// Structs, traits, and functions.
pub mod prelude {
    pub use crate::example;
    pub use crate::{
        BoundaryComponentId, ComponentId, Dim1, Dim2, Dim3, Dim4, Dimension, FaceId, Gluing,
        Isomorphism, SimplexId, TriResult, Triangulation, TriangulationError,
    };
}

#[cfg(test)]
mod tests;
