use regina_surfaces::SurfaceError;
use regina_triangulation::TriangulationError;

/// Error produced by an operation on a packet tree.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("child index {index} out of range for a packet with {len} children")]
    ChildOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Result type for packet operations.
pub type PacketResult<T> = Result<T, PacketError>;

impl PacketError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
