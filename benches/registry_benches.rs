use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lattice_supports::support::registry_digest;
use lattice_supports::{CarrierType, Lattice, SigmaArray, SupportModel, SupportRegistration};

fn girder_ring(carriers: i64) -> SupportRegistration {
    let pairs: Vec<(i64, i64)> = (0..carriers).map(|i| (10 * i + 1, 10 * i + 9)).collect();
    SupportRegistration::from_pairs(CarrierType::Girder, &pairs)
        .offset(SigmaArray::start([1e-6; 3]))
        .roll(SigmaArray::start([1e-5, 0.0, 0.0]))
}

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("support_registry");
    let registration = girder_ring(500);
    group.bench_function("register_500_girders", |b| {
        b.iter(|| {
            let mut model = SupportModel::new(Lattice::with_drifts(5_000));
            black_box(registration.apply(&mut model).expect("valid registration"));
        });
    });

    let mut model = SupportModel::new(Lattice::with_drifts(5_000));
    registration.apply(&mut model).expect("valid registration");
    group.bench_function("digest_500_girders", |b| {
        b.iter(|| black_box(registry_digest(black_box(&model))));
    });
    group.finish();
}

criterion_group!(benches, bench_registry);
criterion_main!(benches);
