use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ledger_core::{HexPrefix, ProofOfWork};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_pow(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let previous: Vec<u64> = (0..16).map(|_| rng.gen_range(1..1_000_000)).collect();

    let mut group = c.benchmark_group("solve");
    for zeros in [1usize, 2, 3] {
        let pow = ProofOfWork::new(HexPrefix::new(zeros));
        group.bench_with_input(BenchmarkId::from_parameter(zeros), &pow, |b, pow| {
            let mut i = 0usize;
            b.iter(|| {
                let p = previous[i % previous.len()];
                i += 1;
                pow.solve(p).expect("unbounded search")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
