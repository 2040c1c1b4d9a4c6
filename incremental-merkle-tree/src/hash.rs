use imt_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error};

use crate::{HashError, ImtError};

/// Hash binding of a fixed-arity tree.
///
/// Receives exactly `arity` ordered children and returns their parent. Must
/// be deterministic. Any `Fn(&[N]) -> Result<N, HashError>` is a binding.
pub trait NodeHasher<N> {
    /// Combine `children` into their parent node.
    fn hash(&self, children: &[N]) -> Result<N, HashError>;
}

impl<N, F> NodeHasher<N> for F
where
    F: Fn(&[N]) -> Result<N, HashError>,
{
    fn hash(&self, children: &[N]) -> Result<N, HashError> {
        self(children)
    }
}

/// Invoke the binding once, counting the call.
pub(crate) fn hash_node<N, H: NodeHasher<N>>(hasher: &H, children: &[N]) -> CostResult<N, ImtError> {
    hasher
        .hash(children)
        .map_err(ImtError::from)
        .wrap_with_cost(OperationCost::with_hash_node_calls(1))
}

/// Check `arity >= 2` and return the capacity `arity^depth`, saturating at
/// `usize::MAX` since no tree can hold more leaves than that.
pub(crate) fn validate_shape(depth: usize, arity: usize) -> Result<usize, ImtError> {
    if arity < 2 {
        return Err(ImtError::InvalidParameter(format!(
            "arity must be at least 2, got {}",
            arity
        )));
    }
    let exponent = u32::try_from(depth).unwrap_or(u32::MAX);
    Ok(arity.checked_pow(exponent).unwrap_or(usize::MAX))
}

/// Build the per-level zero values.
///
/// Returns `(zeroes, empty_root)` where `zeroes` holds levels `0..depth` and
/// `empty_root` is the zero value of level `depth`, i.e. the root of a tree
/// without leaves.
pub(crate) fn zero_chain<N: Clone, H: NodeHasher<N>>(
    hasher: &H,
    depth: usize,
    arity: usize,
    zero_value: N,
) -> CostResult<(Vec<N>, N), ImtError> {
    let mut cost = OperationCost::default();
    let mut zeroes = Vec::with_capacity(depth);
    let mut zero = zero_value;
    for _ in 0..depth {
        let children = vec![zero.clone(); arity];
        zeroes.push(zero);
        zero = cost_return_on_error!(&mut cost, hash_node(hasher, &children));
    }
    Ok((zeroes, zero)).wrap_with_cost(cost)
}
