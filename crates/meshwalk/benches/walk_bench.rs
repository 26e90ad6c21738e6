//! Criterion benches for walker steps.
//!
//! - Seeded random walks on the cube and a large torus.
//! - Bounded steps (`attempt`) on a grid with walls.
//! - Unfolding a square neighbourhood.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use meshwalk::api::{
    cube, grid, random_directions, torus, unfold, Dir, Limits, VertexId, WalkState, Walker,
};
use rand::{rngs::StdRng, SeedableRng};

fn bench_random_walks(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");
    let meshes = [
        ("cube", cube().expect("cube layout")),
        ("torus64", torus(64, 64).expect("torus layout")),
    ];
    for (name, mesh) in &meshes {
        group.bench_function(BenchmarkId::new("random_1k", name), |b| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(42);
                    random_directions::<3, _>(&mut rng, 1_000)
                },
                |dirs: Vec<Dir<3>>| {
                    let mut w = Walker::new(VertexId(0), mesh);
                    for d in &dirs {
                        w.to(d);
                    }
                    w.state()
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_attempt(c: &mut Criterion) {
    let mesh = grid(16, 16).expect("grid layout");
    let mut rng = StdRng::seed_from_u64(7);
    let dirs = random_directions::<3, _>(&mut rng, 1_000);
    c.bench_function("attempt_grid16_1k", |b| {
        b.iter(|| {
            let mut w = Walker::new(VertexId(0), &mesh);
            dirs.iter().filter(|d| w.attempt(d)).count()
        })
    });
}

fn bench_unfold(c: &mut Criterion) {
    let mut group = c.benchmark_group("unfold");
    let mesh = cube().expect("cube layout");
    for radius in [2usize, 8, 32] {
        group.bench_function(BenchmarkId::new("cube_radius", radius), |b| {
            b.iter(|| unfold(&mesh, WalkState::origin(VertexId(0)), Limits::square(radius)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_random_walks, bench_attempt, bench_unfold);
criterion_main!(benches);
