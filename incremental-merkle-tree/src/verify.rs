//! Proof verification for the fixed-arity tree.
//!
//! Pure function: only the proof and the hash binding are needed. Folds the
//! leaf upward by splicing it into each sibling group at its recorded
//! position and hashing the full group.

use imt_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error, cost_return_on_error_no_add};

use crate::{
    MerkleProof, NodeHasher,
    hash::hash_node,
};

/// Verify `proof` with `hasher`, without access to the tree.
///
/// Returns `Ok(false)` when the recomputed root differs from `proof.root`
/// and [`ImtError::InvalidProof`](crate::ImtError::InvalidProof) when the
/// proof cannot be folded at all.
pub fn verify_proof<N, H>(proof: &MerkleProof<N>, hasher: &H) -> CostResult<bool, crate::ImtError>
where
    N: Clone + PartialEq,
    H: NodeHasher<N>,
{
    let mut cost = OperationCost::default();
    cost_return_on_error_no_add!(cost, proof.validate_structure());

    let mut node = proof.leaf.clone();
    for (group, &position) in proof.siblings.iter().zip(&proof.path_indices) {
        let mut children = Vec::with_capacity(group.len() + 1);
        children.extend_from_slice(&group[..position]);
        children.push(node);
        children.extend_from_slice(&group[position..]);
        node = cost_return_on_error!(&mut cost, hash_node(hasher, &children));
    }

    Ok(node == proof.root).wrap_with_cost(cost)
}
