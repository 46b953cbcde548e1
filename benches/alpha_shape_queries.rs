//! Alpha-shape performance suite.
//!
//! 1. Delaunay construction at a few input sizes
//! 2. Alpha complex (interval) computation on a finished triangulation
//! 3. Repeated α queries, which must stay cheap enough for interactive sliders
//!
//! Inputs are seeded so runs are comparable across commits.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use delaunay_alpha::geometry::util::generate_random_points_seeded;
use delaunay_alpha::prelude::{AlphaComplex, AlphaShapeMode, DelaunayTriangulation};
use std::hint::black_box;

/// Input sizes shared by all groups
const COUNTS: &[usize] = &[100, 1_000, 5_000];

const SEED: u64 = 0x00A1_FA5E;

fn points(count: usize) -> Vec<delaunay_alpha::geometry::Point> {
    generate_random_points_seeded(count, (0.0, 1.0), SEED.wrapping_add(count as u64))
        .unwrap_or_else(|err| panic!("point generation failed for {count} points: {err}"))
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("delaunay_construction");
    group.sample_size(20);
    for &count in COUNTS {
        let input = points(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| {
                let dt = DelaunayTriangulation::new(black_box(input))
                    .unwrap_or_else(|err| panic!("construction failed: {err}"));
                black_box(dt.number_of_cells())
            });
        });
    }
    group.finish();
}

fn bench_interval_computation(c: &mut Criterion) {
    let mut group = c.benchmark_group("alpha_complex");
    group.sample_size(20);
    for &count in COUNTS {
        let dt = DelaunayTriangulation::new(&points(count))
            .unwrap_or_else(|err| panic!("construction failed: {err}"));
        group.throughput(Throughput::Elements(dt.number_of_cells() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &dt, |b, dt| {
            b.iter(|| black_box(AlphaComplex::new(black_box(dt))));
        });
    }
    group.finish();
}

fn bench_alpha_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("alpha_query");
    for &count in COUNTS {
        let dt = DelaunayTriangulation::new(&points(count))
            .unwrap_or_else(|err| panic!("construction failed: {err}"));
        let complex = AlphaComplex::new(&dt);
        let alpha = complex.find_alpha_solid();
        for mode in [AlphaShapeMode::Regular, AlphaShapeMode::General] {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), count),
                &complex,
                |b, complex| {
                    b.iter(|| {
                        let shape = complex
                            .shape(black_box(alpha), mode)
                            .unwrap_or_else(|err| panic!("query failed: {err}"));
                        black_box(shape.number_of_triangles())
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_interval_computation,
    bench_alpha_queries
);
criterion_main!(benches);
