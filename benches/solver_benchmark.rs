//! Benchmarks for the polynomial solvers and the full intercept pipeline.

use std::hint::black_box;

use bevy::math::Vec3;
use bevy_turret_ballistics::math;
use bevy_turret_ballistics::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_quartic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quartic Solver");

    // Representative firing polynomials: four real roots, a mixed set,
    // and a no-real-root miss.
    let cases = [
        ("four_real", [1.0, -10.0, 35.0, -50.0, 24.0]),
        ("mixed", [1.0, 1.0, 2.0, 4.0, -8.0]),
        ("no_real", [1.0, 0.0, 0.0, 0.0, 1.0]),
        ("ballistic", [24.06, 0.96, -3600.0, 0.0, 10000.0]),
    ];

    for (name, [a, b, c_, d, e]) in cases {
        group.bench_function(name, |bench| {
            bench.iter(|| {
                math::quartic(
                    black_box(a),
                    black_box(b),
                    black_box(c_),
                    black_box(d),
                    black_box(e),
                )
            });
        });
    }

    group.finish();
}

fn benchmark_intercept(c: &mut Criterion) {
    let env = BallisticsEnvironment::default();
    let clock = SimClock::at_time(0.0);

    let mut group = c.benchmark_group("Intercept");

    for distance in [50.0_f32, 200.0, 800.0] {
        let target = Trajectory::new(
            MotionSample::new(
                Vec3::new(distance, 10.0, distance * 0.25),
                Vec3::new(-8.0, 1.0, 3.0),
            )
            .with_gravity(true),
            &env,
            &clock,
        );
        let params = LaunchParams::new(400.0, Vec3::ZERO).with_gravity(true);

        group.bench_with_input(
            BenchmarkId::from_parameter(distance as u32),
            &distance,
            |bench, _| {
                let mut rng = StdRng::seed_from_u64(1);
                bench.iter(|| {
                    black_box(&target)
                        .intercept(black_box(&params), &env, &clock, &mut rng)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_quartic, benchmark_intercept);
criterion_main!(benches);
