//! Benchmarks for construction, spectral analysis, and certification.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fingeo::config::{SpaceConfig, Tolerance};
use fingeo::incidence::IncidenceSpace;
use fingeo::invariants::{eigen_spectrum, srg_parameters};
use fingeo::iso::Certifier;
use fingeo::orbit::orbits;
use fingeo::scheme::{decompose, graph_relations};
use fingeo::{ModMatrix, Permutation, PrimeField};

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    for (q, n) in [(3u32, 4usize), (5, 4), (3, 6)] {
        let cfg = SpaceConfig::symplectic(q, n);
        group.bench_function(format!("W({}, {q})", n - 1), |b| {
            b.iter(|| black_box(IncidenceSpace::build(black_box(&cfg))))
        });
    }
    group.finish();
}

fn bench_linalg(c: &mut Criterion) {
    let mut group = c.benchmark_group("linalg");
    let space = IncidenceSpace::build(&SpaceConfig::symplectic(3, 4)).unwrap();
    let inc = space.incidence_matrix();
    group.bench_function("rank_40x40_gf3", |b| b.iter(|| black_box(inc.rank())));
    group.bench_function("kernel_40x40_gf3", |b| b.iter(|| black_box(inc.kernel_basis())));
    let f = PrimeField::new(101).unwrap();
    let m = ModMatrix::from_fn(f, 32, 32, |i, j| f.element(((i * 37 + j * 11) ^ (i * j)) as u64));
    group.bench_function("invert_32x32_gf101", |b| b.iter(|| black_box(m.invert())));
    group.finish();
}

fn bench_invariants(c: &mut Criterion) {
    let mut group = c.benchmark_group("invariants");
    let space = IncidenceSpace::build(&SpaceConfig::symplectic(3, 4)).unwrap();
    let g = space.graph().clone();
    group.bench_function("srg_parameters_w33", |b| b.iter(|| black_box(srg_parameters(&g))));
    group.bench_function("eigen_spectrum_w33", |b| {
        b.iter(|| black_box(eigen_spectrum(&g, Tolerance::default())))
    });
    group.bench_function("bose_mesner_w33", |b| {
        let rel = graph_relations(&g);
        b.iter(|| black_box(decompose(&rel, Tolerance::default())))
    });
    let gens = space.transvection_generators().unwrap();
    group.bench_function("orbits_w33_transvections", |b| {
        b.iter(|| black_box(orbits(40, &gens)))
    });
    group.finish();
}

fn bench_certify(c: &mut Criterion) {
    let space = IncidenceSpace::build(&SpaceConfig::symplectic(3, 4)).unwrap();
    let g = space.graph().clone();
    let shift = Permutation::new((0..40).map(|i| (i * 7 + 3) % 40).collect()).unwrap();
    let h = g.relabel(&shift).unwrap();
    let certifier = Certifier::new();
    c.bench_function("certify_w33_relabelled", |b| {
        b.iter(|| black_box(certifier.certify(&g, &h)))
    });
}

criterion_group!(
    benches,
    bench_construction,
    bench_linalg,
    bench_invariants,
    bench_certify
);
criterion_main!(benches);
