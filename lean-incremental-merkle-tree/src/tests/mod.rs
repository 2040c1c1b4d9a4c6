//! Hash bindings and builders shared by the lean tree tests.


use std::cell::Cell;

use crate::{HashError, LeanIMT, PairHasher};

type Digest = [u8; 32];
type SumHash = fn(&u64, &u64) -> Result<u64, HashError>;
type DigestHash = fn(&Digest, &Digest) -> Result<Digest, HashError>;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sum_hash(left: &u64, right: &u64) -> Result<u64, HashError> {
    Ok(left + right)
}

/// Order-sensitive: `left * 31 + right + 1`.
fn affine_hash(left: &u64, right: &u64) -> Result<u64, HashError> {
    Ok(left.wrapping_mul(31).wrapping_add(*right).wrapping_add(1))
}

fn blake3_hash(left: &Digest, right: &Digest) -> Result<Digest, HashError> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(left);
    hasher.update(right);
    Ok(*hasher.finalize().as_bytes())
}

fn digest(i: u64) -> Digest {
    *blake3::hash(&i.to_le_bytes()).as_bytes()
}

fn sum_tree(leaves: Vec<u64>) -> LeanIMT<u64, SumHash> {
    LeanIMT::with_leaves(sum_hash as SumHash, leaves)
        .unwrap()
        .expect("build tree")
}

fn affine_tree(count: u64) -> LeanIMT<u64, SumHash> {
    LeanIMT::with_leaves(affine_hash as SumHash, (1..=count).collect())
        .unwrap()
        .expect("build tree")
}

/// Tree built with one `insert` per leaf.
fn affine_tree_sequential(count: u64) -> LeanIMT<u64, SumHash> {
    let mut tree = LeanIMT::new(affine_hash as SumHash);
    for leaf in 1..=count {
        tree.insert(leaf).unwrap().expect("insert");
    }
    tree
}

fn digest_tree(count: u64) -> LeanIMT<Digest, DigestHash> {
    LeanIMT::with_leaves(blake3_hash as DigestHash, (0..count).map(digest).collect())
        .unwrap()
        .expect("build tree")
}

/// Affine binding that fails once its call budget is exhausted.
struct FlakyHasher {
    remaining: Cell<u32>,
}

impl FlakyHasher {
    fn failing_after(calls: u32) -> Self {
        Self {
            remaining: Cell::new(calls),
        }
    }
}

impl PairHasher<u64> for FlakyHasher {
    fn hash(&self, left: &u64, right: &u64) -> Result<u64, HashError> {
        match self.remaining.get() {
            0 => Err(HashError("hash budget exhausted".into())),
            n => {
                self.remaining.set(n - 1);
                affine_hash(left, right)
            }
        }
    }
}
