//! Fixed-depth, fixed-arity incremental Merkle tree.
//!
//! The tree keeps every level of the node matrix in memory: level 0 holds the
//! leaves, level `depth` holds the root. A parent is the hash of a run of
//! `arity` consecutive children; positions beyond the end of a level are
//! padded with that level's zero value:
//!
//! `zeroes[0] = zero_value`, `zeroes[i] = hash([zeroes[i - 1]; arity])`
//!
//! Inserting, updating or deleting a leaf only recomputes the `depth` nodes
//! on the path from that leaf to the root. The hash function is supplied by
//! the caller through [`NodeHasher`].
//!
//! # Core types
//!
//! - [`IncrementalMerkleTree`]: insert, update, delete, proofs.
//! - [`MerkleProof`]: self-contained membership proof.
//! - [`ImtConfig`]: depth, arity and zero value of a tree.

#![deny(missing_docs)]

mod config;
mod error;
pub(crate) mod hash;
pub(crate) mod proof;
pub(crate) mod tree;
mod verify;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::ImtConfig;
pub use error::{HashError, ImtError};
pub use hash::NodeHasher;
pub use imt_costs::{CostContext, CostResult, CostsExt, OperationCost};
pub use proof::MerkleProof;
pub use tree::IncrementalMerkleTree;
pub use verify::verify_proof;
