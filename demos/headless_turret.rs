//! Headless turret simulation: intercepting a moving drone without rendering.
//!
//! A turret at the origin fires at a drone crossing overhead. Shots are
//! scheduled through a [`RateLimiter`] whose continuity error feeds the
//! intercept's time shift, and each shot is scored when its trajectory
//! elapses by comparing the predicted impact point against where the drone
//! actually ended up.
//!
//! Run with: `cargo run --example headless_turret`

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy_turret_ballistics::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const TURRET_POSITION: Vec3 = Vec3::new(0.0, 2.0, 0.0);
const MUZZLE_SPEED: f32 = 90.0;
const FIRE_INTERVAL: f32 = 1.25;
const SHOTS_TO_RESOLVE: u32 = 5;

/// A direct hit in this demo: within a drone-sized radius of the target.
const HIT_RADIUS: f32 = 1.0;

fn main() {
    println!("Starting Headless Turret Simulation...");
    println!("Firing {SHOTS_TO_RESOLVE} interception shots at a crossing drone...");

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        )
        .add_plugins(TurretBallisticsPlugin)
        .insert_resource(TurretState {
            fire_limiter: RateLimiter::new(0.0, FIRE_INTERVAL),
            shots_fired: 0,
        })
        .add_systems(Startup, setup_simulation)
        .add_systems(Update, (fire_when_ready, watch_timeout))
        .add_systems(FixedUpdate, (drive_drone, score_shots).chain())
        .run();
}

#[derive(Resource)]
struct TurretState {
    fire_limiter: RateLimiter,
    shots_fired: u32,
}

#[derive(Component)]
struct TargetDrone {
    velocity: Vec3,
}

/// A fired projectile, represented purely by its predicted trajectory.
#[derive(Component)]
struct InFlightShot {
    trajectory: Trajectory,
}

fn setup_simulation(mut commands: Commands) {
    println!("\n[SETUP] Spawning drone at (120, 40, -30), cruising at 13.4 m/s...");
    commands.spawn((
        Transform::from_translation(Vec3::new(120.0, 40.0, -30.0)),
        TargetDrone {
            velocity: Vec3::new(-12.0, 0.0, 6.0),
        },
        Name::new("Drone"),
    ));
}

/// The drone moves the way a kinematic body does: one velocity step per
/// physics tick.
fn drive_drone(time: Res<Time>, mut drones: Query<(&mut Transform, &TargetDrone)>) {
    for (mut transform, drone) in drones.iter_mut() {
        transform.translation += drone.velocity * time.delta_secs();
    }
}

fn fire_when_ready(
    mut commands: Commands,
    mut turret: ResMut<TurretState>,
    clock: Res<SimClock>,
    env: Res<BallisticsEnvironment>,
    drones: Query<(&Transform, &TargetDrone)>,
) {
    if turret.shots_fired >= SHOTS_TO_RESOLVE {
        return;
    }

    let Ok((transform, drone)) = drones.single() else {
        return;
    };

    let delta_time = clock.delta_time;
    let Some(t_error) = turret.fire_limiter.pass(&clock, delta_time, FIRE_INTERVAL) else {
        return;
    };

    // Sample the drone's motion as seen this frame.
    let target = Trajectory::new(
        MotionSample::new(transform.translation, drone.velocity).with_duration(30.0),
        &env,
        &clock,
    );

    let params = LaunchParams::new(MUZZLE_SPEED, TURRET_POSITION)
        .with_gravity(true)
        .with_time_shift(t_error);

    // Spread is zero, so the rng is never consumed; it is seeded anyway to
    // keep the demo reproducible if spread is dialed in.
    let mut rng = StdRng::seed_from_u64(turret.shots_fired as u64);

    match target.intercept(&params, &env, &clock, &mut rng) {
        Some(shot) => {
            turret.shots_fired += 1;
            println!(
                "[FIRE] Shot {} away at t={:.2}s: launch velocity {:.1?}, impact in {:.2}s",
                turret.shots_fired, clock.time, shot.launch_velocity, shot.duration
            );
            commands.spawn((InFlightShot { trajectory: shot }, Name::new("Shot")));
        }
        None => {
            println!("[MISS] No firing solution at t={:.2}s (drone out of reach)", clock.time);
        }
    }
}

fn score_shots(
    mut commands: Commands,
    clock: Res<SimClock>,
    shots: Query<(Entity, &InFlightShot)>,
    drones: Query<&Transform, With<TargetDrone>>,
    mut resolved: Local<u32>,
) {
    let Ok(drone_transform) = drones.single() else {
        return;
    };

    for (entity, shot) in shots.iter() {
        if !shot.trajectory.has_elapsed(&clock) {
            continue;
        }

        let predicted = shot.trajectory.terminal_point();
        let miss = predicted.distance(drone_transform.translation);
        if miss <= HIT_RADIUS {
            println!("[HIT]  Impact {miss:.3}m from drone center");
        } else {
            println!("[FAIL] Impact {miss:.3}m from drone (outside {HIT_RADIUS}m hit radius)");
        }

        commands.entity(entity).despawn();
        *resolved += 1;

        if *resolved >= SHOTS_TO_RESOLVE {
            println!("\n[FINISHED] All {SHOTS_TO_RESOLVE} shots resolved.");
            std::process::exit(0);
        }
    }
}

fn watch_timeout(time: Res<Time>) {
    if time.elapsed_secs() > 20.0 {
        println!("[TIMEOUT] Simulation did not resolve all shots in 20s.");
        std::process::exit(1);
    }
}
