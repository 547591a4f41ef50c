use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use merkle_proof::{BinaryHashTree, Blake3, HashTree as _, Sha256, TreeOptions, gen_leaves};

fn bench_build_root(c: &mut Criterion) {
  let mut group = c.benchmark_group("build-root");
  for num_leaves in [1_000u64, 10_000, 100_000] {
    let leaves = gen_leaves(num_leaves);
    group.bench_with_input(BenchmarkId::new("sha256", num_leaves), &leaves, |b, leaves| {
      let tree = BinaryHashTree::new(leaves, &Sha256, TreeOptions::default()).unwrap();
      b.iter(|| black_box(tree.root_hash().unwrap()));
    });
    group.bench_with_input(BenchmarkId::new("blake3", num_leaves), &leaves, |b, leaves| {
      let tree = BinaryHashTree::new(leaves, &Blake3, TreeOptions::default()).unwrap();
      b.iter(|| black_box(tree.root_hash().unwrap()));
    });
    group.bench_with_input(BenchmarkId::new("sha256-sequential", num_leaves), &leaves, |b, leaves| {
      let options = TreeOptions::default().with_parallel_threshold(usize::MAX);
      let tree = BinaryHashTree::new(leaves, &Sha256, options).unwrap();
      b.iter(|| black_box(tree.root_hash().unwrap()));
    });
  }
  group.finish();
}

fn bench_proof(c: &mut Criterion) {
  let leaves = gen_leaves(100_000);
  let tree = BinaryHashTree::new(&leaves, &Sha256, TreeOptions::default()).unwrap();
  c.bench_function("generate-proof", |b| b.iter(|| black_box(tree.generate_proof(54_321).unwrap())));

  let proof = tree.generate_proof(54_321).unwrap();
  c.bench_function("verify-proof", |b| b.iter(|| black_box(merkle_proof::verify_proof(&proof))));
}

criterion_group!(benches, bench_build_root, bench_proof);
criterion_main!(benches);
