//! Grouping of mutations into change events.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::{Dimension, Triangulation, TriangulationId};

/// Callback invoked after each completed change to a triangulation.
pub type ChangeListener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Coalesced notification that a triangulation has changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Triangulation that changed.
    pub triangulation: TriangulationId,
    /// Generation after the change. Handles from earlier generations no
    /// longer resolve.
    pub generation: u64,
    /// Number of simplices after the change.
    pub size: usize,
}

/// Scope guard grouping mutations of a triangulation.
///
/// Spans nest. The cached skeleton is dropped whenever a span ends, and the
/// outermost span bumps the generation and notifies the listener exactly
/// once, however many mutations it contained.
pub struct ChangeSpan<'a, D: Dimension> {
    tri: &'a mut Triangulation<D>,
}

impl<'a, D: Dimension> ChangeSpan<'a, D> {
    pub(crate) fn new(tri: &'a mut Triangulation<D>) -> Self {
        tri.span_depth += 1;
        Self { tri }
    }
}

impl<D: Dimension> Deref for ChangeSpan<'_, D> {
    type Target = Triangulation<D>;

    fn deref(&self) -> &Self::Target {
        self.tri
    }
}

impl<D: Dimension> DerefMut for ChangeSpan<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.tri
    }
}

impl<D: Dimension> Drop for ChangeSpan<'_, D> {
    fn drop(&mut self) {
        self.tri.end_span();
    }
}
