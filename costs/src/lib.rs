#![deny(missing_docs)]
//! Interface crate to unify how tree operations' costs are passed and
//! retrieved.
//!
//! Every mutating or proving operation of the incremental Merkle trees
//! reports how many times it invoked the hash binding and how many node
//! matrix cells it wrote, wrapped together with the operation's result in a
//! [`CostContext`].

mod context;

use std::ops::AddAssign;

pub use context::{CostContext, CostResult, CostsExt};

/// Piece of data representing the work an operation performed
/// (approximately).
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// How many times the hash binding was invoked to combine child nodes.
    pub hash_node_calls: u32,
    /// How many node matrix cells were written.
    pub node_writes: u32,
}

impl OperationCost {
    /// Returns `true` if the operation did no work at all.
    pub fn is_nothing(&self) -> bool {
        self == &Self::default()
    }

    /// Helper function to build default `OperationCost` with different
    /// `hash_node_calls`.
    pub fn with_hash_node_calls(hash_node_calls: u32) -> Self {
        OperationCost {
            hash_node_calls,
            ..Default::default()
        }
    }

    /// Count `count` node writes, saturating at `u32::MAX`.
    pub fn add_node_writes(&mut self, count: usize) {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.node_writes = self.node_writes.saturating_add(count);
    }
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        self.hash_node_calls = self.hash_node_calls.saturating_add(rhs.hash_node_calls);
        self.node_writes = self.node_writes.saturating_add(rhs.node_writes);
    }
}

/// Macro to achieve a kind of what `?` operator does, but with `CostContext` on
/// top. Main properties are:
/// 1. Early termination on error;
/// 2. Because of 1. `Result` is removed from the equation;
/// 3. `CostContext` if removed too because it is added to external cost
///    accumulator;
/// 4. Early termination uses external cost accumulator so previous
///    costs won't be lost.
#[macro_export]
macro_rules! cost_return_on_error {
    ( &mut $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result_with_cost = { $($body)+ };
            let result = result_with_cost.unwrap_add_cost(&mut $cost);
            match result {
                Ok(x) => x,
                Err(e) => return Err(e.into()).wrap_with_cost($cost),
            }
        }
    };
}

/// Macro to achieve a kind of what `?` operator does, but with `CostContext` on
/// top. The difference between this macro and `cost_return_on_error` is that it
/// is intended to use it on `Result` rather than `CostContext<Result<..>>`, so
/// no costs will be added except previously accumulated.
#[macro_export]
macro_rules! cost_return_on_error_no_add {
    ( $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result = { $($body)+ };
            match result {
                Ok(x) => x,
                Err(e) => return Err(e.into()).wrap_with_cost($cost),
            }
        }
    };
}
