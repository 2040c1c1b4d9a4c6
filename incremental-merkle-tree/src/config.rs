use crate::{ImtError, hash::validate_shape};

#[cfg(feature = "serde")]
fn default_arity() -> usize {
    2
}

/// Shape of a fixed-arity tree: immutable once the tree is built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImtConfig<N> {
    /// Number of levels above the leaves.
    pub depth: usize,
    /// Children per parent. Defaults to 2 when deserialized without it.
    #[cfg_attr(feature = "serde", serde(default = "default_arity"))]
    pub arity: usize,
    /// Leaf-level zero value, used for padding and soft deletes.
    pub zero_value: N,
}

impl<N> ImtConfig<N> {
    /// Config for a tree of the given depth and arity.
    pub fn new(depth: usize, zero_value: N, arity: usize) -> Self {
        Self {
            depth,
            arity,
            zero_value,
        }
    }

    /// Config for a binary tree.
    pub fn binary(depth: usize, zero_value: N) -> Self {
        Self::new(depth, zero_value, 2)
    }

    /// Maximum number of leaves, `arity^depth` saturated at `usize::MAX`.
    pub fn capacity(&self) -> Result<usize, ImtError> {
        validate_shape(self.depth, self.arity)
    }

    /// Rejects `arity < 2`. Any depth is accepted.
    pub fn validate(&self) -> Result<(), ImtError> {
        self.capacity().map(|_| ())
    }
}
