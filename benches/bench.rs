// Criterion benchmarks for Stable Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use stable_match::core::{
    find_blocking_pairs, generate_participants, generate_random_preferences_with_rng, run_gale_shapley,
    StableMatcher,
};
use stable_match::models::PreferenceTable;

fn instance(n: usize) -> (PreferenceTable, PreferenceTable) {
    let participants = generate_participants(n);
    generate_random_preferences_with_rng(
        &participants.group_a,
        &participants.group_b,
        &mut StdRng::seed_from_u64(n as u64),
    )
}

fn bench_gale_shapley(c: &mut Criterion) {
    let mut group = c.benchmark_group("gale_shapley");

    for size in [3, 10, 50, 200].iter() {
        let (prefs_a, prefs_b) = instance(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| run_gale_shapley(black_box(&prefs_a), black_box(&prefs_b)));
        });
    }

    group.finish();
}

fn bench_blocking_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("blocking_pairs");

    for size in [10, 50, 200].iter() {
        let (prefs_a, prefs_b) = instance(*size);
        let matching = run_gale_shapley(&prefs_a, &prefs_b)
            .expect("generated instance is valid")
            .matching;

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| find_blocking_pairs(black_box(&matching), black_box(&prefs_a), black_box(&prefs_b)));
        });
    }

    group.finish();
}

fn bench_full_pass(c: &mut Criterion) {
    let matcher = StableMatcher::default();
    let (prefs_a, prefs_b) = instance(10);

    c.bench_function("full_pass_10", |b| {
        b.iter(|| matcher.run(black_box(&prefs_a), black_box(&prefs_b)));
    });
}

criterion_group!(benches, bench_gale_shapley, bench_blocking_pairs, bench_full_pass);
criterion_main!(benches);
