use blob_recovery::{
    blob::{BLOB_LEN, Blob},
    domain::{EvaluationDomain, evaluation_points},
    fields::{NttFieldElement, fieldbls12_381_scalar::FieldBls12_381Scalar},
    ifft::{TransformPlan, fft, ifft},
};
use criterion::{BenchmarkGroup, BenchmarkId, Criterion, criterion_group, measurement::WallTime};
use std::hint::black_box;

fn benchmark_transforms<FE: NttFieldElement>(g: &mut BenchmarkGroup<WallTime>) {
    for size in [64, 256, 1024, 4096] {
        let domain = EvaluationDomain::<FE>::new(size).unwrap();
        let values = (0..size as u64).map(FE::from).collect::<Vec<_>>();

        g.bench_function(BenchmarkId::new("ifft", size), |b| {
            b.iter(|| ifft(black_box(&values), domain.points()))
        });
        g.bench_function(BenchmarkId::new("fft", size), |b| {
            b.iter(|| fft(black_box(&values), domain.points()))
        });
        let plan = TransformPlan::new(domain.points()).unwrap();
        g.bench_function(BenchmarkId::new("planned_ifft", size), |b| {
            b.iter(|| plan.ifft(black_box(&values)))
        });

        let omegas = domain.roots_of_unity();
        let omega_inverses = domain.inverse_roots_of_unity().unwrap();
        g.bench_function(BenchmarkId::new("ntt", size), |b| {
            let mut values = values.clone();
            b.iter(|| FE::ntt_bit_reversed(black_box(&mut values), &omegas))
        });
        g.bench_function(BenchmarkId::new("inverse_ntt", size), |b| {
            let mut values = values.clone();
            b.iter(|| FE::inverse_ntt_bit_reversed(black_box(&mut values), &omega_inverses))
        });

        g.bench_function(BenchmarkId::new("evaluation_points", size), |b| {
            b.iter(|| evaluation_points(black_box(domain.generator()), size))
        });
    }
}

fn benchmark_blob(c: &mut Criterion) {
    let mut g = c.benchmark_group("fieldbls12_381_scalar");
    benchmark_transforms::<FieldBls12_381Scalar>(&mut g);
    g.finish();

    let mut g = c.benchmark_group("blob");
    let data = include_str!("../test-vectors/blob/cubic_blob.txt");
    g.bench_function("parse", |b| b.iter(|| Blob::from_hex(black_box(data))));
    let blob = Blob::from_hex(data).unwrap();
    g.bench_function("recover", |b| b.iter(|| black_box(&blob).recover()));
    let coefficients = blob.recover().unwrap();
    assert_eq!(coefficients.len(), BLOB_LEN);
    g.bench_function("from_coefficients", |b| {
        b.iter(|| Blob::from_coefficients(black_box(&coefficients)))
    });
    g.finish();
}

criterion_group!(benches, benchmark_blob);

fn main() {
    let git_version = git_version::git_version!(fallback = "unknown");
    println!("Git revision: {git_version}");
    println!();

    benches();
    Criterion::default().configure_from_args().final_summary();
}
