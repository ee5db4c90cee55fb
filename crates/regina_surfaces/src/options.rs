//! Options controlling an enumeration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::CoordSystem;

/// Cooperative cancellation flag for long enumerations.
///
/// Clones share the same flag, so one clone can be handed to the
/// enumeration and another kept by whoever may want to stop it.
#[derive(Debug, Default, Clone)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    /// Returns a flag that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }
    /// Raises the flag. Enumerations notice at their next step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    /// Returns whether the flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Which solutions of the matching equations to enumerate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceKind {
    /// Extreme rays of the admissible cone.
    #[strum(to_string = "vertex")]
    Vertex,
    /// Hilbert basis of the admissible integer points.
    #[strum(to_string = "fundamental")]
    Fundamental,
}

/// Enumeration algorithm.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Tree search with linear programming (vertex surfaces only).
    #[strum(to_string = "tree traversal")]
    Tree,
    /// Double description method (vertex surfaces only).
    #[strum(to_string = "double description")]
    DoubleDescription,
    /// Dual Hilbert basis method (fundamental surfaces only).
    #[strum(to_string = "Hilbert dual")]
    HilbertDual,
}

/// Whether an enumeration ran to completion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Enumeration {
    /// Every solution was found.
    #[strum(to_string = "complete")]
    Complete,
    /// The enumeration was cancelled and the list may be partial.
    #[strum(to_string = "cancelled")]
    Cancelled,
}

/// Options for [`NormalSurfaces::enumerate()`](crate::NormalSurfaces::enumerate).
#[derive(Debug, Clone)]
pub struct EnumerationOptions {
    /// Coordinate system.
    pub coords: CoordSystem,
    /// Vertex or fundamental surfaces.
    pub kind: SurfaceKind,
    /// Algorithm to use.
    pub algorithm: Algorithm,
    /// Optional flag to stop the enumeration early.
    pub cancel: Option<Cancellation>,
}

impl EnumerationOptions {
    /// Vertex surfaces by tree search.
    pub fn vertex(coords: CoordSystem) -> Self {
        Self {
            coords,
            kind: SurfaceKind::Vertex,
            algorithm: Algorithm::Tree,
            cancel: None,
        }
    }
    /// Fundamental surfaces by the dual Hilbert basis method.
    pub fn fundamental(coords: CoordSystem) -> Self {
        Self {
            coords,
            kind: SurfaceKind::Fundamental,
            algorithm: Algorithm::HilbertDual,
            cancel: None,
        }
    }
    /// Replaces the algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
    /// Attaches a cancellation flag.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = Some(cancel);
        self
    }
}
