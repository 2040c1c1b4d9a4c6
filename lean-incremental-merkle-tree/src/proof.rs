//! Membership proofs for the lean tree.
//!
//! A proof lists only the siblings that exist along the path, bottom-up.
//! The direction of each one is a bit of `index`: bit `i` is set when
//! `siblings[i]` is the left child, so the verifier computes
//! `hash(siblings[i], node)` instead of `hash(node, siblings[i])`.

use bincode::{Decode, Encode};
use imt_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error, cost_return_on_error_no_add};

use crate::{LeanImtError, PairHasher, Result, hash::hash_pair};

/// Upper bound accepted by [`LeanIMTMerkleProof::decode_from_slice`].
const MAX_DECODE_BYTES: usize = 64 * 1024 * 1024;

/// A membership proof for one leaf of a [`LeanIMT`](crate::LeanIMT).
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeanIMTMerkleProof<N> {
    /// Root of the tree when the proof was generated.
    pub root: N,
    /// The proved leaf value.
    pub leaf: N,
    /// Direction bits of the recorded siblings, least significant first.
    /// This is not the leaf index whenever levels were skipped.
    pub index: usize,
    /// Siblings that exist along the path, bottom-up.
    pub siblings: Vec<N>,
}

impl<N> LeanIMTMerkleProof<N> {
    /// Checks `index` only addresses recorded siblings.
    pub(crate) fn validate_structure(&self) -> Result<()> {
        let count = self.siblings.len();
        let Ok(bits) = u32::try_from(count) else {
            return Err(LeanImtError::InvalidProof(format!("{count} siblings")));
        };
        if bits > usize::BITS {
            return Err(LeanImtError::InvalidProof(format!(
                "{count} siblings exceed the {} addressable levels",
                usize::BITS
            )));
        }
        if self.index.checked_shr(bits).unwrap_or(0) != 0 {
            return Err(LeanImtError::InvalidProof(format!(
                "index {:#b} has direction bits beyond {count} siblings",
                self.index
            )));
        }
        Ok(())
    }
}

impl<N: Encode> LeanIMTMerkleProof<N> {
    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| LeanImtError::InvalidProof(format!("encode error: {}", e)))
    }
}

impl<N: Decode<()>> LeanIMTMerkleProof<N> {
    /// Decode from bytes using bincode, rejecting proofs whose index has
    /// bits beyond the recorded siblings.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<MAX_DECODE_BYTES>();
        let (proof, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| LeanImtError::InvalidProof(format!("decode error: {}", e)))?;
        proof.validate_structure()?;
        Ok(proof)
    }
}

/// Verify `proof` with `hasher`, without access to the tree.
///
/// Folds the siblings into the leaf and compares the result with the
/// proof's root. Returns `Ok(false)` for a well-formed proof that does not
/// match, and [`LeanImtError::InvalidProof`] for one that cannot be folded.
pub fn verify_proof<N, H>(proof: &LeanIMTMerkleProof<N>, hasher: &H) -> CostResult<bool, LeanImtError>
where
    N: Clone + PartialEq,
    H: PairHasher<N>,
{
    let mut cost = OperationCost::default();
    cost_return_on_error_no_add!(cost, proof.validate_structure());

    let mut node = proof.leaf.clone();
    for (i, sibling) in proof.siblings.iter().enumerate() {
        node = if (proof.index >> i) & 1 == 1 {
            cost_return_on_error!(&mut cost, hash_pair(hasher, sibling, &node))
        } else {
            cost_return_on_error!(&mut cost, hash_pair(hasher, &node, sibling))
        };
    }

    Ok(node == proof.root).wrap_with_cost(cost)
}
