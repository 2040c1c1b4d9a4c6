use std::{collections::BTreeMap, fmt};

use imt_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error, cost_return_on_error_no_add};
use log::{debug, trace};

use crate::{
    LeanIMTMerkleProof, LeanImtError, PairHasher, Result,
    hash::{hash_pair, parent_of},
    helper::{depth_for_size, parent_count},
    proof::verify_proof,
};

/// Lean incremental Merkle tree.
///
/// `nodes[0]` holds the leaves and `nodes[depth]` holds the root. An empty
/// tree is a single empty level. Level `l + 1` always has
/// `ceil(nodes[l].len() / 2)` nodes, and a node without a right sibling is
/// copied to its parent unchanged.
///
/// Every mutation computes its new node values before touching the matrix,
/// so a failing hash binding leaves the tree unchanged.
#[derive(Clone)]
pub struct LeanIMT<N, H> {
    hasher: H,
    pub(crate) nodes: Vec<Vec<N>>,
}

/// New values of one level after a batch insertion: the level keeps its
/// first `start` nodes and continues with `values`.
struct LevelSuffix<N> {
    start: usize,
    values: Vec<N>,
}

impl<N, H> LeanIMT<N, H>
where
    N: Clone + PartialEq,
    H: PairHasher<N>,
{
    /// Create an empty tree.
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            nodes: vec![Vec::new()],
        }
    }

    /// Create a tree holding `leaves`, built with a single batch insertion.
    pub fn with_leaves(hasher: H, leaves: Vec<N>) -> CostResult<Self, LeanImtError> {
        let mut tree = Self::new(hasher);
        if leaves.is_empty() {
            return Ok(tree).wrap_with_cost(OperationCost::default());
        }
        tree.insert_many(leaves).map_ok(|()| tree)
    }

    /// Current root, `None` while the tree is empty.
    pub fn root(&self) -> Option<&N> {
        self.nodes[self.depth()].first()
    }

    /// Number of levels above the leaves, `ceil(log2(size))`.
    pub fn depth(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Number of leaves.
    pub fn size(&self) -> usize {
        self.nodes[0].len()
    }

    /// Whether the tree holds no leaves.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].is_empty()
    }

    /// Leaves in index order.
    pub fn leaves(&self) -> &[N] {
        &self.nodes[0]
    }

    /// The node matrix, level 0 first.
    pub fn nodes(&self) -> &[Vec<N>] {
        &self.nodes
    }

    /// The hash binding.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Whether some leaf equals `leaf`.
    pub fn has(&self, leaf: &N) -> bool {
        self.nodes[0].contains(leaf)
    }

    /// Index of the first leaf equal to `leaf`.
    pub fn index_of(&self, leaf: &N) -> Option<usize> {
        self.nodes[0].iter().position(|l| l == leaf)
    }

    /// Append `leaf` at index `size()` and return that index. The depth
    /// grows by one when the previous size was a power of two.
    pub fn insert(&mut self, leaf: N) -> CostResult<usize, LeanImtError> {
        let mut cost = OperationCost::default();
        let index = self.size();
        let depth = depth_for_size(index + 1);

        let mut path = Vec::with_capacity(depth + 1);
        let mut node = leaf;
        let mut current = index;
        for level in 0..depth {
            // The new node is the last of its level, so it only ever has a
            // left sibling.
            let parent = if current & 1 == 1 {
                cost_return_on_error!(
                    &mut cost,
                    hash_pair(&self.hasher, &self.nodes[level][current - 1], &node)
                )
            } else {
                node.clone()
            };
            path.push(node);
            node = parent;
            current >>= 1;
        }
        path.push(node);

        if depth > self.depth() {
            self.nodes.push(Vec::new());
        }
        cost.add_node_writes(self.commit_path(index, path));
        trace!("inserted leaf {} (depth {})", index, self.depth());

        Ok(index).wrap_with_cost(cost)
    }

    /// Append all `leaves` at once.
    ///
    /// Produces the same tree as inserting them one by one, but each parent
    /// is computed once per batch instead of once per insertion. Fails with
    /// [`LeanImtError::InvalidParameter`] on an empty batch.
    pub fn insert_many(&mut self, leaves: Vec<N>) -> CostResult<(), LeanImtError> {
        let mut cost = OperationCost::default();
        if leaves.is_empty() {
            return Err(LeanImtError::InvalidParameter(
                "there are no leaves to add".into(),
            ))
            .wrap_with_cost(cost);
        }

        let old_size = self.size();
        let count = leaves.len();
        let depth = depth_for_size(old_size + count);

        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(LevelSuffix {
            start: old_size,
            values: leaves,
        });
        for level in 0..depth {
            let below = &levels[level];
            let start = below.start >> 1;
            let len = parent_count(below.start + below.values.len());
            let mut values = Vec::with_capacity(len - start);
            for parent in start..len {
                let left = self.node_after_batch(level, below, 2 * parent);
                let right = self.node_after_batch(level, below, 2 * parent + 1);
                let Some(left) = left else {
                    return Err(LeanImtError::InvalidParameter(format!(
                        "level {level} is missing node {}",
                        2 * parent
                    )))
                    .wrap_with_cost(cost);
                };
                values.push(cost_return_on_error!(
                    &mut cost,
                    parent_of(&self.hasher, left, right)
                ));
            }
            levels.push(LevelSuffix { start, values });
        }

        self.nodes.resize_with(depth + 1, Vec::new);
        for (row, suffix) in self.nodes.iter_mut().zip(levels) {
            cost.add_node_writes(suffix.values.len());
            row.truncate(suffix.start);
            row.extend(suffix.values);
        }
        debug!(
            "inserted {} leaves (size {}, depth {})",
            count,
            self.size(),
            self.depth()
        );

        Ok(()).wrap_with_cost(cost)
    }

    /// Overwrite the leaf at `index` and recompute its path to the root.
    pub fn update(&mut self, index: usize, leaf: N) -> CostResult<(), LeanImtError> {
        let mut cost = OperationCost::default();
        cost_return_on_error_no_add!(cost, self.check_index(index));

        let mut path = Vec::with_capacity(self.depth() + 1);
        let mut node = leaf;
        let mut current = index;
        for level in 0..self.depth() {
            let row = &self.nodes[level];
            let parent = if current & 1 == 1 {
                cost_return_on_error!(&mut cost, hash_pair(&self.hasher, &row[current - 1], &node))
            } else {
                cost_return_on_error!(
                    &mut cost,
                    parent_of(&self.hasher, &node, row.get(current + 1))
                )
            };
            path.push(node);
            node = parent;
            current >>= 1;
        }
        path.push(node);

        cost.add_node_writes(self.commit_path(index, path));
        trace!("updated leaf {}", index);

        Ok(()).wrap_with_cost(cost)
    }

    /// Overwrite the leaves at `indices` with `leaves`, pairwise.
    ///
    /// Equivalent to calling [`update`](Self::update) for each pair, but
    /// every affected parent is recomputed once. Indices must be in range
    /// and distinct. An empty batch is a no-op.
    pub fn update_many(&mut self, indices: &[usize], leaves: Vec<N>) -> CostResult<(), LeanImtError> {
        let mut cost = OperationCost::default();
        if indices.len() != leaves.len() {
            return Err(LeanImtError::InvalidParameter(format!(
                "{} indices for {} leaves",
                indices.len(),
                leaves.len()
            )))
            .wrap_with_cost(cost);
        }

        let mut changed: BTreeMap<usize, N> = BTreeMap::new();
        for (&index, leaf) in indices.iter().zip(leaves) {
            cost_return_on_error_no_add!(cost, self.check_index(index));
            if changed.insert(index, leaf).is_some() {
                return Err(LeanImtError::InvalidParameter(format!(
                    "leaf {index} is updated more than once"
                )))
                .wrap_with_cost(cost);
            }
        }
        if changed.is_empty() {
            return Ok(()).wrap_with_cost(cost);
        }

        let mut levels = Vec::with_capacity(self.depth() + 1);
        levels.push(changed);
        for level in 0..self.depth() {
            let below = &levels[level];
            let row = &self.nodes[level];
            let lookup = |i: usize| below.get(&i).or_else(|| row.get(i));
            let mut parents = BTreeMap::new();
            for parent in below.keys().map(|i| i >> 1) {
                if parents.contains_key(&parent) {
                    continue;
                }
                let Some(left) = lookup(2 * parent) else {
                    return Err(LeanImtError::InvalidParameter(format!(
                        "level {level} is missing node {}",
                        2 * parent
                    )))
                    .wrap_with_cost(cost);
                };
                let value = cost_return_on_error!(
                    &mut cost,
                    parent_of(&self.hasher, left, lookup(2 * parent + 1))
                );
                parents.insert(parent, value);
            }
            levels.push(parents);
        }

        for (row, changed) in self.nodes.iter_mut().zip(levels) {
            for (index, value) in changed {
                row[index] = value;
                cost.add_node_writes(1);
            }
        }
        debug!("updated {} leaves", indices.len());

        Ok(()).wrap_with_cost(cost)
    }

    /// Create a membership proof for the leaf at `index`.
    ///
    /// Levels where the path has no sibling are skipped. Bit `i` of the
    /// proof index is set when `siblings[i]` sits to the left of the path.
    pub fn generate_proof(&self, index: usize) -> Result<LeanIMTMerkleProof<N>> {
        self.check_index(index)?;

        let mut siblings = Vec::new();
        let mut path_bits = 0usize;
        let mut current = index;
        for level in 0..self.depth() {
            let is_right = current & 1 == 1;
            let sibling_index = if is_right { current - 1 } else { current + 1 };
            if let Some(sibling) = self.nodes[level].get(sibling_index) {
                if is_right {
                    path_bits |= 1usize << siblings.len();
                }
                siblings.push(sibling.clone());
            }
            current >>= 1;
        }
        trace!(
            "generated proof for leaf {} with {} siblings",
            index,
            siblings.len()
        );

        Ok(LeanIMTMerkleProof {
            root: self.nodes[self.depth()][0].clone(),
            leaf: self.nodes[0][index].clone(),
            index: path_bits,
            siblings,
        })
    }

    /// Verify `proof` with this tree's hash binding.
    pub fn verify_proof(&self, proof: &LeanIMTMerkleProof<N>) -> CostResult<bool, LeanImtError> {
        verify_proof(proof, &self.hasher)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.size() {
            return Err(LeanImtError::IndexOutOfRange {
                index,
                size: self.size(),
            });
        }
        Ok(())
    }

    /// Node `index` of `level` as it will be once `suffix` replaces the tail
    /// of that level.
    fn node_after_batch<'a>(
        &'a self,
        level: usize,
        suffix: &'a LevelSuffix<N>,
        index: usize,
    ) -> Option<&'a N> {
        if index >= suffix.start {
            suffix.values.get(index - suffix.start)
        } else {
            self.nodes.get(level).and_then(|row| row.get(index))
        }
    }

    /// Write one value per level along the path of leaf `index`, pushing
    /// where the level is not that long yet. Returns the number of cells
    /// written.
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
            current >>= 1;
        }
        writes
    }
}

impl<N: fmt::Debug, H> fmt::Debug for LeanIMT<N, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeanIMT")
            .field("size", &self.nodes[0].len())
            .field("depth", &(self.nodes.len() - 1))
            .field("root", &self.nodes.last().and_then(|top| top.first()))
            .finish()
    }
}
