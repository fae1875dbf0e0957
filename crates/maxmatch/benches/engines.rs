//! Criterion comparison of the matching engines on seeded random graphs.
//!
//! Inputs are deterministic in the seed so numbers are comparable
//! across runs. Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use maxmatch::api::*;

fn bench_general(c: &mut Criterion) {
    let mut group = c.benchmark_group("general");
    for &(n, p) in &[(200usize, 5u32), (400, 2)] {
        let edges = gnp(n, p, 42);
        let g = Graph::from_edges(n, &edges);
        let label = format!("n{n}_p{p}");
        group.bench_function(BenchmarkId::new("blossom_simple", &label), |b| {
            b.iter(|| blossom_simple(&g))
        });
        group.bench_function(BenchmarkId::new("blossom_forest", &label), |b| {
            b.iter(|| blossom_forest(&g))
        });
        group.bench_function(BenchmarkId::new("gabow", &label), |b| {
            b.iter(|| gabow_simple(&g))
        });
        group.bench_function(BenchmarkId::new("gabow_scaling", &label), |b| {
            b.iter(|| gabow_scaling(&g))
        });
        group.bench_function(BenchmarkId::new("micali_vazirani", &label), |b| {
            b.iter(|| micali_vazirani(&g))
        });
    }
    group.finish();
}

fn bench_bipartite(c: &mut Criterion) {
    let mut group = c.benchmark_group("bipartite");
    let (l, r) = (300usize, 300usize);
    let pairs = bipartite_gnp(l, r, 3, 7);
    let g = BipartiteGraph::from_edges(l, r, &pairs);
    group.bench_function(BenchmarkId::new("hopcroft_karp", "300x300_p3"), |b| {
        b.iter(|| hopcroft_karp(&g))
    });
    group.bench_function(BenchmarkId::new("hopcroft_karp_greedy", "300x300_p3"), |b| {
        b.iter(|| HopcroftKarp::new(&g).maximum_matching(BipartiteWarmstart::Naive))
    });
    group.finish();
}

fn bench_warmstart(c: &mut Criterion) {
    let mut group = c.benchmark_group("warmstart");
    let edges = gnp(300, 3, 9);
    let g = Graph::from_edges(300, &edges);
    group.bench_function(BenchmarkId::new("gabow_cold", "n300_p3"), |b| {
        b.iter(|| GabowSimple::new(&g).maximum_matching(Warmstart::Off))
    });
    group.bench_function(BenchmarkId::new("gabow_greedy", "n300_p3"), |b| {
        b.iter(|| GabowSimple::new(&g).maximum_matching(Warmstart::Naive))
    });
    group.bench_function(BenchmarkId::new("gabow_greedy_md", "n300_p3"), |b| {
        b.iter(|| GabowSimple::new(&g).maximum_matching(Warmstart::MinDegree))
    });
    group.finish();
}

criterion_group!(benches, bench_general, bench_bipartite, bench_warmstart);
criterion_main!(benches);
