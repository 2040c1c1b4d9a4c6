//! Text export and import of the node matrix.
//!
//! The export is a JSON array of levels, level 0 first, each an array of
//! node values written as strings with [`Display`](fmt::Display). Values
//! round-trip through [`FromStr`], so big integers keep full precision.
//!
//! ```text
//! [["1","2","3"],["3","3"],["6"]]
//! ```

use std::{fmt, str::FromStr};

use log::debug;

use crate::{LeanIMT, LeanImtError, PairHasher, Result, helper::check_matrix_shape};

impl<N, H> LeanIMT<N, H>
where
    N: Clone + PartialEq + fmt::Display,
    H: PairHasher<N>,
{
    /// Serialize the node matrix to text.
    pub fn export(&self) -> Result<String> {
        let levels: Vec<Vec<String>> = self
            .nodes
            .iter()
            .map(|level| level.iter().map(ToString::to_string).collect())
            .collect();
        serde_json::to_string(&levels).map_err(|e| LeanImtError::InvalidExport(e.to_string()))
    }
}

impl<N, H> LeanIMT<N, H>
where
    N: Clone + PartialEq + FromStr,
    N::Err: fmt::Display,
    H: PairHasher<N>,
{
    /// Replace the node matrix of an empty tree with an exported one.
    ///
    /// The matrix shape is checked; hash values are trusted, not
    /// recomputed. Fails with [`LeanImtError::NotEmpty`] when the tree
    /// already holds leaves.
    pub fn import(&mut self, exported: &str) -> Result<()> {
        if !self.is_empty() {
            return Err(LeanImtError::NotEmpty { size: self.size() });
        }

        let levels: Vec<Vec<String>> =
            serde_json::from_str(exported).map_err(|e| LeanImtError::InvalidExport(e.to_string()))?;
        let nodes = levels
            .into_iter()
            .enumerate()
            .map(|(level, values)| {
                values
                    .iter()
                    .map(|value| {
                        value.parse::<N>().map_err(|e| {
                            LeanImtError::InvalidExport(format!(
                                "node {value:?} at level {level}: {e}"
                            ))
                        })
                    })
                    .collect::<Result<Vec<N>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        check_matrix_shape(&nodes).map_err(LeanImtError::InvalidExport)?;

        self.nodes = nodes;
        debug!(
            "imported lean tree (size {}, depth {})",
            self.size(),
            self.depth()
        );
        Ok(())
    }

    /// Create a tree from an exported node matrix.
    pub fn import_from(hasher: H, exported: &str) -> Result<Self> {
        let mut tree = Self::new(hasher);
        tree.import(exported)?;
        Ok(tree)
    }
}
