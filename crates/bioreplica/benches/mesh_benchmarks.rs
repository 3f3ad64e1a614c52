//! Mesh synthesis and hull triangulation benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::Point3;

use bioreplica::mesh::{StlFormat, convex_hull, write_stl};
use bioreplica::{OrganType, ParametricMeshGenerator, ReferenceCatalog};

/// Points on a UV sphere with `n` rings and `n` segments.
fn sphere_cloud(n: usize) -> Vec<Point3<f64>> {
    let mut points = Vec::with_capacity(n * n);
    for i in 0..n {
        let theta = std::f64::consts::PI * (i as f64 + 0.5) / n as f64;
        for j in 0..n {
            let phi = std::f64::consts::TAU * j as f64 / n as f64;
            points.push(Point3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ));
        }
    }
    points
}

/// Benchmark organ mesh generation for every archetype.
fn bench_generate(c: &mut Criterion) {
    let catalog = ReferenceCatalog::builtin();
    let generator = ParametricMeshGenerator::new(catalog);
    let mut group = c.benchmark_group("generate_mesh");

    for organ in OrganType::all() {
        let dims = catalog.geometry_profile(*organ).unwrap().base_dimensions;
        group.bench_with_input(BenchmarkId::from_parameter(organ), &dims, |b, dims| {
            b.iter(|| black_box(generator.generate(*organ, dims).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the hull alone on growing point clouds.
fn bench_convex_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("convex_hull");

    for n in [16, 32, 64].iter() {
        let points = sphere_cloud(*n);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("sphere_points", points.len()),
            &points,
            |b, points| b.iter(|| black_box(convex_hull(points).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark STL encoding into memory.
fn bench_stl(c: &mut Criterion) {
    let catalog = ReferenceCatalog::builtin();
    let dims = catalog.geometry_profile(OrganType::Liver).unwrap().base_dimensions;
    let mesh = ParametricMeshGenerator::new(catalog)
        .generate(OrganType::Liver, &dims)
        .unwrap();

    let mut group = c.benchmark_group("stl_encoding");
    group.throughput(Throughput::Elements(mesh.face_count() as u64));
    for format in [StlFormat::Binary, StlFormat::Ascii] {
        group.bench_function(format.to_string(), |b| {
            b.iter(|| {
                let mut buffer = Vec::new();
                write_stl(&mesh, &mut buffer, format).unwrap();
                black_box(buffer)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_convex_hull, bench_stl);
criterion_main!(benches);
