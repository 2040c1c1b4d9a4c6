#[macro_use]
extern crate criterion;

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lean_incremental_merkle_tree::{HashError, LeanIMT, LeanIMTMerkleProof, verify_proof};

type Digest = [u8; 32];
type DigestHash = fn(&Digest, &Digest) -> Result<Digest, HashError>;

fn blake3_hash(left: &Digest, right: &Digest) -> Result<Digest, HashError> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(left);
    hasher.update(right);
    Ok(*hasher.finalize().as_bytes())
}

fn leaf(i: u64) -> Digest {
    *blake3::hash(&i.to_le_bytes()).as_bytes()
}

fn prepare_sequential(count: u64) -> LeanIMT<Digest, DigestHash> {
    let mut tree = LeanIMT::new(blake3_hash as DigestHash);
    for i in 0..count {
        tree.insert(leaf(i)).unwrap().expect("insert");
    }
    tree
}

fn prepare_batch(count: u64) -> LeanIMT<Digest, DigestHash> {
    LeanIMT::with_leaves(blake3_hash as DigestHash, (0..count).map(leaf).collect())
        .unwrap()
        .expect("insert many")
}

fn bench(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("LeanIMT insertion");
        for size in [1_000u64, 10_000, 100_000] {
            group.bench_with_input(BenchmarkId::new("insert", size), &size, |b, &size| {
                b.iter(|| prepare_sequential(size));
            });
            group.bench_with_input(BenchmarkId::new("insert_many", size), &size, |b, &size| {
                b.iter(|| prepare_batch(size));
            });
        }
    }

    c.bench_function("LeanIMT update", |b| {
        let mut tree = prepare_batch(100_000);
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 7919) % 100_000;
            tree.update(i, leaf(i as u64 + 1)).unwrap().expect("update");
        });
    });

    c.bench_function("LeanIMT generate proof", |b| {
        let tree = prepare_batch(100_000);
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 7919) % 100_000;
            black_box(tree.generate_proof(i).expect("proof"))
        });
    });

    c.bench_function("LeanIMT verify", |b| {
        let tree = prepare_batch(100_000);
        let proofs: Vec<LeanIMTMerkleProof<Digest>> = (0..10_000)
            .map(|i| tree.generate_proof(i * 10).expect("proof"))
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
