use regina_maths::MathsError;
use regina_util::error::{IndexOutOfRange, IndexOverflow};

/// Error produced by an operation on a triangulation.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TriangulationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("handle refers to an out-of-date snapshot of the triangulation")]
    SnapshotOutOfDate,
    #[error(transparent)]
    IndexOverflow(#[from] IndexOverflow),
    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),
    #[error(transparent)]
    Maths(#[from] MathsError),
}

/// Result type for triangulation operations.
pub type TriResult<T> = Result<T, TriangulationError>;

impl TriangulationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Self::FailedPrecondition(msg.into())
    }
}
