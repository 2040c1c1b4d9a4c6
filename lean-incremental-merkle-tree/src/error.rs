use thiserror::Error;

/// Alias for `core::result::Result<T, LeanImtError>`.
pub type Result<T> = core::result::Result<T, LeanImtError>;

/// Failure reported by a hash binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hash binding failed: {0}")]
pub struct HashError(pub String);

/// Unified error type for lean tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LeanImtError {
    /// Invalid input parameters.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The leaf index is not below the tree size.
    #[error("leaf index {index} is out of range (size {size})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of leaves in the tree.
        size: usize,
    },
    /// Import requires a tree without leaves.
    #[error("cannot import into a tree with {size} leaves")]
    NotEmpty {
        /// Number of leaves already in the tree.
        size: usize,
    },
    /// Exported text that cannot be parsed or is not a valid node matrix.
    #[error("invalid export: {0}")]
    InvalidExport(String),
    /// Invalid proof during verification or decoding.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// The hash binding failed; the tree was not modified.
    #[error(transparent)]
    Hash(#[from] HashError),
}
