use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uncover_core::RngHandle;
use uncover_graph::{gen_path, gen_random_hypergraph, BacktrackingMatcher, Matcher};

fn matching_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(42);
    let target = gen_random_hypergraph(40, 80, &["A", "B"], 2, &mut rng).unwrap();
    let pattern = gen_path(2, "A").unwrap();
    let matcher = BacktrackingMatcher::new();

    c.bench_function("path2_into_random_40", |b| {
        b.iter(|| black_box(matcher.find_matches(&pattern, &target, true).unwrap()));
    });
    c.bench_function("path2_into_random_40_non_injective", |b| {
        b.iter(|| black_box(matcher.find_matches(&pattern, &target, false).unwrap()));
    });
}

criterion_group!(benches, matching_bench);
criterion_main!(benches);
