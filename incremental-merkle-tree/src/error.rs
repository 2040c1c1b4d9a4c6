use thiserror::Error;

/// Failure reported by a hash binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hash binding failed: {0}")]
pub struct HashError(pub String);

/// Errors from incremental Merkle tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImtError {
    /// A construction parameter is out of its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// No room for another leaf.
    #[error("tree is full (capacity {capacity}, count {count})")]
    TreeFull {
        /// Maximum number of leaves, `arity^depth`.
        capacity: usize,
        /// Number of leaves the caller tried to hold.
        count: usize,
    },
    /// The leaf index is not below the leaf count.
    #[error("leaf index {index} is out of range (leaf count {leaf_count})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of leaves ever inserted.
        leaf_count: usize,
    },
    /// The proof is malformed. A well-formed proof for a different root
    /// verifies to `false` instead.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// The hash binding failed; the tree was not modified.
    #[error(transparent)]
    Hash(#[from] HashError),
}
