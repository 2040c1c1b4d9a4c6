//! Test utilities: hash bindings over integers and Blake3 digests.

use std::cell::Cell;

use crate::{HashError, NodeHasher};

/// A 32-byte node value.
pub(crate) type Digest = [u8; 32];

/// Install a logger for the current test binary; repeated calls are no-ops.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parent = sum of children.
pub(crate) fn sum_hash(children: &[u64]) -> Result<u64, HashError> {
    Ok(children.iter().sum())
}

/// Order-sensitive arithmetic binding: `fold(acc * 31 + child + 1)`.
pub(crate) fn affine_hash(children: &[u64]) -> Result<u64, HashError> {
    Ok(children
        .iter()
        .fold(7u64, |acc, child| acc.wrapping_mul(31).wrapping_add(*child).wrapping_add(1)))
}

/// Parent = blake3 over the concatenated children.
pub(crate) fn blake3_hash(children: &[Digest]) -> Result<Digest, HashError> {
    let mut hasher = blake3::Hasher::new();
    for child in children {
        hasher.update(child);
    }
    Ok(*hasher.finalize().as_bytes())
}

/// Leaf digest derived from an integer.
pub(crate) fn digest(i: u64) -> Digest {
    *blake3::hash(&i.to_le_bytes()).as_bytes()
}

/// Sum binding that fails once its call budget is exhausted.
pub(crate) struct FlakyHasher {
    pub(crate) remaining: Cell<u32>,
}

impl FlakyHasher {
    pub(crate) fn failing_after(calls: u32) -> Self {
        Self {
            remaining: Cell::new(calls),
        }
    }
}

impl NodeHasher<u64> for FlakyHasher {
    fn hash(&self, children: &[u64]) -> Result<u64, HashError> {
        match self.remaining.get() {
            0 => Err(HashError("hash budget exhausted".into())),
            n => {
                self.remaining.set(n - 1);
                sum_hash(children)
            }
        }
    }
}
