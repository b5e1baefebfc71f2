use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use donor_emd::wasserstein_1d;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn benchmark_wasserstein_1d(c: &mut Criterion) {
    let mut group = c.benchmark_group("wasserstein_1d");
    // O(m log m): should look close to linear on a log-log plot
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let u: Vec<f64> = (0..*size).map(|_| rng.gen::<f64>()).collect();
        let v: Vec<f64> = (0..*size).map(|_| rng.gen::<f64>() + 0.1).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(wasserstein_1d(black_box(&u), black_box(&v))));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_wasserstein_1d);
criterion_main!(benches);
