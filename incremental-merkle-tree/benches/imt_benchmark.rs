#[macro_use]
extern crate criterion;

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use incremental_merkle_tree::{HashError, IncrementalMerkleTree, MerkleProof, verify_proof};

type Digest = [u8; 32];
type DigestHash = fn(&[Digest]) -> Result<Digest, HashError>;

fn blake3_hash(children: &[Digest]) -> Result<Digest, HashError> {
    let mut hasher = blake3::Hasher::new();
    for child in children {
        hasher.update(child);
    }
    Ok(*hasher.finalize().as_bytes())
}

fn leaf(i: u64) -> Digest {
    *blake3::hash(&i.to_le_bytes()).as_bytes()
}

/// Tree with room for 2^16 leaves; `arity` must be a power of two.
fn prepare_tree(count: u64, arity: usize) -> IncrementalMerkleTree<Digest, DigestHash> {
    let depth = 16 / arity.trailing_zeros() as usize;
    let leaves = (0..count).map(leaf).collect();
    IncrementalMerkleTree::with_leaves(blake3_hash as DigestHash, depth, [0u8; 32], arity, leaves)
        .unwrap()
        .expect("build tree")
}

fn bench(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("IMT insertion");
        for arity in [2usize, 4, 16] {
            group.bench_with_input(BenchmarkId::new("arity", arity), &arity, |b, &arity| {
                b.iter(|| {
                    let mut tree = prepare_tree(0, arity);
                    for i in 0..1_000 {
                        tree.insert(leaf(i)).unwrap().expect("insert");
                    }
                    tree
                });
            });
        }
    }

    c.bench_function("IMT bulk build", |b| {
        b.iter(|| prepare_tree(black_box(10_000), 2));
    });

    c.bench_function("IMT create proof", |b| {
        let tree = prepare_tree(10_000, 2);
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 7919) % 10_000;
            black_box(tree.create_proof(i).expect("proof"))
        });
    });

    c.bench_function("IMT verify", |b| {
        let tree = prepare_tree(10_000, 4);
        let proofs: Vec<MerkleProof<Digest>> = (0..1_000)
            .map(|i| tree.create_proof(i * 10).expect("proof"))
            .collect();
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % proofs.len();
            verify_proof(&proofs[i], tree.hasher())
                .unwrap()
                .expect("verify")
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench
);
criterion_main!(benches);
