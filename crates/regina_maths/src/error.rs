/// Error from an arithmetic operation.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MathsError {
    /// The arguments violate a precondition that is visible from the
    /// arguments alone.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The arguments violate a semantic precondition, or the environment
    /// cannot support the operation.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations.
pub type MathsResult<T> = Result<T, MathsError>;
