use regina_maths::MathsError;
use regina_triangulation::TriangulationError;
use regina_util::error::{IndexOutOfRange, IndexOverflow};

/// Error produced while building or querying normal surfaces.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
    #[error(transparent)]
    Maths(#[from] MathsError),
}

/// Result type for normal surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

impl SurfaceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Self::FailedPrecondition(msg.into())
    }
    pub(crate) fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }
}

impl From<IndexOverflow> for SurfaceError {
    fn from(value: IndexOverflow) -> Self {
        Self::Triangulation(value.into())
    }
}

impl From<IndexOutOfRange> for SurfaceError {
    fn from(value: IndexOutOfRange) -> Self {
        Self::Triangulation(value.into())
    }
}
