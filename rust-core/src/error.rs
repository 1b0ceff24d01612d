//! Error taxonomy shared by every component.

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, CrystalError>;

/// Errors raised by lattice arithmetic, operator algebra and spectral analysis.
///
/// All of them describe invalid input or an impossible request; none is transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrystalError {
    /// The lattice basis is not square or not invertible
    #[error("Lattice basis must be square and nonsingular: {0}")]
    SingularBasis(String),

    /// Two lattices have no common sublattice (non-integral index)
    #[error("Lattices are not commensurable: {0}")]
    IncommensurableLattice(String),

    /// Domain/codomain structure or block shapes do not fit together
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An inverse was requested for something that cannot be inverted
    #[error("Operator is not invertible: {0}")]
    NotInvertible(String),

    /// Eigen-analysis on a rectangular symbol
    #[error("Symbol is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A value has no exact integer/rational representation where one is required
    #[error("Value is not representable: {0}")]
    NotRepresentable(String),

    #[error("Eigen decomposition failed: {0}")]
    EigenDecomposition(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CrystalError {
    pub(crate) fn dimension(expected: usize, found: usize) -> Self {
        CrystalError::DimensionMismatch { expected, found }
    }
}
