use std::fmt;

use imt_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error, cost_return_on_error_no_add};
use log::{debug, trace};

use crate::{
    ImtConfig, ImtError, MerkleProof, NodeHasher,
    hash::{hash_node, validate_shape, zero_chain},
    verify::verify_proof,
};

/// A fixed-depth, fixed-arity incremental Merkle tree.
///
/// `nodes[0]` holds the leaves and `nodes[depth]` holds the root once at
/// least one leaf exists. Level `l + 1` always has
/// `ceil(nodes[l].len() / arity)` nodes. Leaf indices are append-only; a
/// deleted leaf keeps its index and holds the leaf-level zero value.
///
/// Mutations compute the new leaf-to-root path before touching the matrix,
/// so a failing hash binding leaves the tree unchanged.
#[derive(Clone)]
pub struct IncrementalMerkleTree<N, H> {
    hasher: H,
    depth: usize,
    arity: usize,
    capacity: usize,
    zeroes: Vec<N>,
    empty_root: N,
    nodes: Vec<Vec<N>>,
}

impl<N, H> IncrementalMerkleTree<N, H>
where
    N: Clone + PartialEq,
    H: NodeHasher<N>,
{
    /// Create a tree from `config`, optionally pre-filled with `leaves`.
    ///
    /// Fails with [`ImtError::TreeFull`] if `leaves` exceeds
    /// `arity^depth`. Building from leaves yields the same tree as inserting
    /// them one by one into an empty tree.
    pub fn from_config(hasher: H, config: ImtConfig<N>, leaves: Vec<N>) -> CostResult<Self, ImtError> {
        let mut cost = OperationCost::default();
        let ImtConfig {
            depth,
            arity,
            zero_value,
        } = config;

        let capacity = cost_return_on_error_no_add!(cost, validate_shape(depth, arity));
        if leaves.len() > capacity {
            return Err(ImtError::TreeFull {
                capacity,
                count: leaves.len(),
            })
            .wrap_with_cost(cost);
        }

        let (zeroes, empty_root) =
            cost_return_on_error!(&mut cost, zero_chain(&hasher, depth, arity, zero_value));

        let mut nodes: Vec<Vec<N>> = Vec::with_capacity(depth + 1);
        cost.add_node_writes(leaves.len());
        nodes.push(leaves);
        for level in 0..depth {
            let mut parents = Vec::with_capacity(nodes[level].len().div_ceil(arity));
            for group in nodes[level].chunks(arity) {
                let mut children = group.to_vec();
                children.resize(arity, zeroes[level].clone());
                parents.push(cost_return_on_error!(&mut cost, hash_node(&hasher, &children)));
            }
            cost.add_node_writes(parents.len());
            nodes.push(parents);
        }

        debug!(
            "built incremental merkle tree: depth {}, arity {}, {} leaves",
            depth,
            arity,
            nodes[0].len()
        );

        Ok(Self {
            hasher,
            depth,
            arity,
            capacity,
            zeroes,
            empty_root,
            nodes,
        })
        .wrap_with_cost(cost)
    }

    /// Create an empty tree.
    pub fn new(hasher: H, depth: usize, zero_value: N, arity: usize) -> CostResult<Self, ImtError> {
        Self::from_config(hasher, ImtConfig::new(depth, zero_value, arity), Vec::new())
    }

    /// Create a tree pre-filled with `leaves`.
    pub fn with_leaves(
        hasher: H,
        depth: usize,
        zero_value: N,
        arity: usize,
        leaves: Vec<N>,
    ) -> CostResult<Self, ImtError> {
        Self::from_config(hasher, ImtConfig::new(depth, zero_value, arity), leaves)
    }

    /// Current root. For a tree without leaves this is the zero value of
    /// level `depth`.
    pub fn root(&self) -> &N {
        self.nodes[self.depth].first().unwrap_or(&self.empty_root)
    }

    /// Number of levels above the leaves.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Children per parent.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Maximum number of leaves, `arity^depth`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Leaves in index order, including soft-deleted ones.
    pub fn leaves(&self) -> &[N] {
        &self.nodes[0]
    }

    /// Number of leaves ever inserted. Never decreases.
    pub fn leaf_count(&self) -> usize {
        self.nodes[0].len()
    }

    /// Zero values for levels `0..depth`.
    pub fn zeroes(&self) -> &[N] {
        &self.zeroes
    }

    /// The node matrix, level 0 first.
    pub fn nodes(&self) -> &[Vec<N>] {
        &self.nodes
    }

    /// The hash binding.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Config that rebuilds this tree's shape.
    pub fn config(&self) -> ImtConfig<N> {
        ImtConfig::new(self.depth, self.leaf_zero().clone(), self.arity)
    }

    /// Index of the first leaf equal to `leaf`.
    pub fn index_of(&self, leaf: &N) -> Option<usize> {
        self.nodes[0].iter().position(|l| l == leaf)
    }

    /// Append `leaf` at index `leaf_count()` and return that index.
    pub fn insert(&mut self, leaf: N) -> CostResult<usize, ImtError> {
        let mut cost = OperationCost::default();
        let index = self.leaf_count();
        if index >= self.capacity {
            return Err(ImtError::TreeFull {
                capacity: self.capacity,
                count: index,
            })
            .wrap_with_cost(cost);
        }

        let path = cost_return_on_error!(&mut cost, self.compute_path(index, leaf));
        cost.add_node_writes(self.commit_path(index, path));
        trace!("inserted leaf {} (depth {})", index, self.depth);

        Ok(index).wrap_with_cost(cost)
    }

    /// Overwrite the leaf at `index` and recompute its path to the root.
    pub fn update(&mut self, index: usize, leaf: N) -> CostResult<(), ImtError> {
        let mut cost = OperationCost::default();
        cost_return_on_error_no_add!(cost, self.check_index(index));

        let path = cost_return_on_error!(&mut cost, self.compute_path(index, leaf));
        cost.add_node_writes(self.commit_path(index, path));
        trace!("updated leaf {}", index);

        Ok(()).wrap_with_cost(cost)
    }

    /// Soft-delete the leaf at `index`: it is overwritten with the leaf-level
    /// zero value. The leaf count does not change.
    pub fn delete(&mut self, index: usize) -> CostResult<(), ImtError> {
        let zero = self.leaf_zero().clone();
        self.update(index, zero)
    }

    /// Create a membership proof for the leaf at `index`.
    pub fn create_proof(&self, index: usize) -> Result<MerkleProof<N>, ImtError> {
        self.check_index(index)?;

        let mut path_indices = Vec::with_capacity(self.depth);
        let mut siblings = Vec::with_capacity(self.depth);
        let mut current = index;
        for level in 0..self.depth {
            let position = current % self.arity;
            let start = current - position;
            let group = (start..start + self.arity)
                .filter(|&i| i != current)
                .map(|i| self.node_or_zero(level, i).clone())
                .collect();
            path_indices.push(position);
            siblings.push(group);
            current /= self.arity;
        }
        trace!("created proof for leaf {}", index);

        Ok(MerkleProof {
            root: self.root().clone(),
            leaf: self.nodes[0][index].clone(),
            leaf_index: index,
            path_indices,
            siblings,
        })
    }

    /// Verify `proof` with this tree's hash binding.
    ///
    /// Unlike [`verify_proof`](crate::verify_proof), also rejects proofs
    /// whose shape does not match this tree's depth and arity.
    pub fn verify_proof(&self, proof: &MerkleProof<N>) -> CostResult<bool, ImtError> {
        let cost = OperationCost::default();
        cost_return_on_error_no_add!(cost, proof.validate_shape(self.depth, self.arity));
        verify_proof(proof, &self.hasher)
    }

    fn leaf_zero(&self) -> &N {
        self.zeroes.first().unwrap_or(&self.empty_root)
    }

    fn check_index(&self, index: usize) -> Result<(), ImtError> {
        if index >= self.leaf_count() {
            return Err(ImtError::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count(),
            });
        }
        Ok(())
    }

    fn node_or_zero(&self, level: usize, index: usize) -> &N {
        self.nodes[level].get(index).unwrap_or(&self.zeroes[level])
    }

    /// New values for the path from leaf `index` to the root, one per level
    /// `0..=depth`. Reads the matrix but does not modify it.
    fn compute_path(&self, index: usize, leaf: N) -> CostResult<Vec<N>, ImtError> {
        let mut cost = OperationCost::default();
        let mut path = Vec::with_capacity(self.depth + 1);
        let mut node = leaf;
        let mut current = index;
        for level in 0..self.depth {
            let position = current % self.arity;
            let start = current - position;
            let children: Vec<N> = (start..start + self.arity)
                .map(|i| {
                    if i == current {
                        node.clone()
                    } else {
                        self.node_or_zero(level, i).clone()
                    }
                })
                .collect();
            path.push(node);
            node = cost_return_on_error!(&mut cost, hash_node(&self.hasher, &children));
            current /= self.arity;
        }
        path.push(node);
        Ok(path).wrap_with_cost(cost)
    }

    /// Write a path computed by `compute_path` into the matrix. Returns the
    /// number of cells written.
    fn commit_path(&mut self, index: usize, path: Vec<N>) -> usize {
        let mut current = index;
        let mut writes = 0;
        for (level, value) in path.into_iter().enumerate() {
            let row = &mut self.nodes[level];
            debug_assert!(current <= row.len());
            if current < row.len() {
                row[current] = value;
            } else {
                row.push(value);
            }
            writes += 1;
            current /= self.arity;
        }
        writes
    }
}

impl<N: fmt::Debug, H> fmt::Debug for IncrementalMerkleTree<N, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalMerkleTree")
            .field("depth", &self.depth)
            .field("arity", &self.arity)
            .field("leaf_count", &self.nodes[0].len())
            .field("root", &self.nodes[self.depth].first().unwrap_or(&self.empty_root))
            .finish()
    }
}
