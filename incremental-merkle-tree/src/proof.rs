//! Membership proofs for the fixed-arity tree.
//!
//! A proof carries, for every level from the leaves up, the leaf's position
//! inside its group of `arity` siblings and the other `arity - 1` members of
//! that group (zero-padded where the level was shorter). Proofs own their
//! values and stay valid after the tree is mutated.

use bincode::{Decode, Encode};

use crate::ImtError;

/// Upper bound accepted by [`MerkleProof::decode_from_slice`].
const MAX_DECODE_BYTES: usize = 64 * 1024 * 1024;

/// A membership proof for one leaf of an
/// [`IncrementalMerkleTree`](crate::IncrementalMerkleTree).
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MerkleProof<N> {
    /// Root of the tree when the proof was created.
    pub root: N,
    /// The proved leaf value.
    pub leaf: N,
    /// Index of the leaf at level 0.
    pub leaf_index: usize,
    /// Position of the path node inside its sibling group, per level.
    pub path_indices: Vec<usize>,
    /// The rest of each sibling group, in order, per level.
    pub siblings: Vec<Vec<N>>,
}

impl<N> MerkleProof<N> {
    /// Number of levels the proof climbs.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Checks the proof is foldable: one path index per sibling group, and
    /// each path index is a valid insertion point in its group.
    pub(crate) fn validate_structure(&self) -> Result<(), ImtError> {
        if self.path_indices.len() != self.siblings.len() {
            return Err(ImtError::InvalidProof(format!(
                "{} path indices for {} sibling groups",
                self.path_indices.len(),
                self.siblings.len()
            )));
        }
        for (level, (&position, group)) in self.path_indices.iter().zip(&self.siblings).enumerate() {
            if position > group.len() {
                return Err(ImtError::InvalidProof(format!(
                    "path index {} at level {} exceeds sibling group of {}",
                    position,
                    level,
                    group.len()
                )));
            }
        }
        Ok(())
    }

    /// Checks the proof matches a tree of the given depth and arity.
    pub(crate) fn validate_shape(&self, depth: usize, arity: usize) -> Result<(), ImtError> {
        self.validate_structure()?;
        if self.siblings.len() != depth {
            return Err(ImtError::InvalidProof(format!(
                "proof has {} levels, tree depth is {}",
                self.siblings.len(),
                depth
            )));
        }
        if let Some((level, group)) = self
            .siblings
            .iter()
            .enumerate()
            .find(|(_, group)| group.len() + 1 != arity)
        {
            return Err(ImtError::InvalidProof(format!(
                "sibling group at level {} has {} members, expected {}",
                level,
                group.len(),
                arity - 1
            )));
        }
        Ok(())
    }
}

impl<N: Encode> MerkleProof<N> {
    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, ImtError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| ImtError::InvalidProof(format!("encode error: {}", e)))
    }
}

impl<N: Decode<()>> MerkleProof<N> {
    /// Decode from bytes using bincode.
    ///
    /// Rejects structurally unusable proofs so that a decoded proof can
    /// always be folded.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, ImtError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<MAX_DECODE_BYTES>();
        let (proof, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| ImtError::InvalidProof(format!("decode error: {}", e)))?;
        proof.validate_structure()?;
        Ok(proof)
    }
}
