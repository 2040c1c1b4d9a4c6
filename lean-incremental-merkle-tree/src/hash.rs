use imt_costs::{CostResult, CostsExt, OperationCost};

use crate::{HashError, LeanImtError};

/// Hash binding of the lean tree: combines a left and a right node.
///
/// Must be deterministic. Any `Fn(&N, &N) -> Result<N, HashError>` is a
/// binding.
pub trait PairHasher<N> {
    /// Combine `left` and `right` into their parent node.
    fn hash(&self, left: &N, right: &N) -> Result<N, HashError>;
}

impl<N, F> PairHasher<N> for F
where
    F: Fn(&N, &N) -> Result<N, HashError>,
{
    fn hash(&self, left: &N, right: &N) -> Result<N, HashError> {
        self(left, right)
    }
}

/// Invoke the binding once, counting the call.
pub(crate) fn hash_pair<N, H: PairHasher<N>>(
    hasher: &H,
    left: &N,
    right: &N,
) -> CostResult<N, LeanImtError> {
    hasher
        .hash(left, right)
        .map_err(LeanImtError::from)
        .wrap_with_cost(OperationCost::with_hash_node_calls(1))
}

/// Parent of `left` and an optional `right`: hashed when both exist,
/// copied up otherwise.
pub(crate) fn parent_of<N: Clone, H: PairHasher<N>>(
    hasher: &H,
    left: &N,
    right: Option<&N>,
) -> CostResult<N, LeanImtError> {
    match right {
        Some(right) => hash_pair(hasher, left, right),
        None => Ok(left.clone()).wrap_with_cost(OperationCost::default()),
    }
}
