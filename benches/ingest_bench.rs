// benches/ingest_bench.rs
//! Throughput of the sequential transform fold.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docs2index::{run_transforms, Node, RunOptions, SentenceSplitter, Transform};
use std::sync::Arc;

fn bench_split_fold(c: &mut Criterion) {
    let steps: Vec<Arc<dyn Transform>> = vec![Arc::new(SentenceSplitter::new(128, 1))];
    let options = RunOptions::default();
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(32);

    c.bench_function("split_256_nodes", |b| {
        b.iter(|| {
            let batch: Vec<Node> = (0..256).map(|_| Node::new(text.clone())).collect();
            run_transforms(black_box(batch), &steps, &options).unwrap()
        })
    });
}

criterion_group!(benches, bench_split_fold);
criterion_main!(benches);
