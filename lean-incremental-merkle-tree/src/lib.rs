//! Lean incremental Merkle tree (LeanIMT), a dynamic-depth binary
//! accumulator without zero padding.
//!
//! The depth of the tree is `ceil(log2(size))` and grows as leaves are
//! appended. A node without a right sibling is not hashed with a
//! placeholder: its value is copied to its parent unchanged. Proofs
//! therefore skip the levels where the path has no sibling, and encode the
//! directions of the recorded siblings as the bits of a single index.
//!
//! # Core types
//!
//! - [`LeanIMT`]: insert, batch insert, update, proofs, export/import.
//! - [`LeanIMTMerkleProof`]: self-contained membership proof.
//! - [`PairHasher`]: the two-to-one hash binding.

#![deny(missing_docs)]

mod error;
mod export;
mod hash;
/// Level arithmetic of the lean tree.
pub(crate) mod helper;
mod lean_imt;
mod proof;
#[cfg(test)]
mod tests;

pub use error::{HashError, LeanImtError, Result};
pub use hash::PairHasher;
pub use helper::depth_for_size;
pub use imt_costs::{CostContext, CostResult, CostsExt, OperationCost};
pub use lean_imt::LeanIMT;
pub use proof::{LeanIMTMerkleProof, verify_proof};
