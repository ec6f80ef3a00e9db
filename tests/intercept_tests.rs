//! End-to-end interception properties.
//!
//! These exercise the full pipeline (coefficient derivation, quartic
//! solve, root selection, launch-velocity recovery) against closed-form
//! expectations and against the forward integrators themselves.

use bevy::math::Vec3;
use bevy_turret_ballistics::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0xB411157)
}

fn assert_close(a: f32, b: f32, tolerance: f32) {
    assert!((a - b).abs() <= tolerance, "{a} != {b} (±{tolerance})");
}

fn assert_vec_close(a: Vec3, b: Vec3, tolerance: f32) {
    assert!(a.distance(b) <= tolerance, "{a} != {b} (±{tolerance})");
}

/// Stationary target, straight-line shot: distance / speed seconds, with
/// the launch velocity pointing straight at the target.
#[test]
fn stationary_target_straight_line() {
    let env = BallisticsEnvironment::zero_gravity();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO),
        &env,
        &clock,
    );

    let shot = target
        .intercept(&LaunchParams::new(50.0, Vec3::ZERO), &env, &clock, &mut rng())
        .expect("stationary target in range must be interceptable");

    assert_close(shot.duration, 2.0, 1e-4);
    assert_vec_close(shot.launch_velocity, Vec3::new(50.0, 0.0, 0.0), 1e-3);
    assert_vec_close(shot.velocity, Vec3::new(50.0, 0.0, 0.0), 1e-3);
    assert!(shot.target_trajectory.is_some());
}

/// A target receding at projectile speed or faster can never be caught.
#[test]
fn receding_target_is_unreachable() {
    let env = BallisticsEnvironment::zero_gravity();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(100.0, 0.0, 0.0), Vec3::new(60.0, 0.0, 0.0)),
        &env,
        &clock,
    );

    let result = target.intercept(&LaunchParams::new(50.0, Vec3::ZERO), &env, &clock, &mut rng());
    assert!(result.is_none());
}

/// At a true root the required launch speed is exactly the requested one.
#[test]
fn launch_speed_matches_request() {
    let env = BallisticsEnvironment::default();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(80.0, 10.0, -30.0), Vec3::new(-6.0, 0.0, 4.0)),
        &env,
        &clock,
    );

    let params = LaunchParams::new(70.0, Vec3::new(0.0, 2.0, 0.0)).with_gravity(true);
    let shot = target
        .intercept(&params, &env, &clock, &mut rng())
        .expect("target well within reach");

    assert_close(shot.launch_velocity.length(), 70.0, 0.01);
}

/// Gravity on the projectile opens a second, lofted solution; the
/// preference flag deterministically picks between them, and both hit.
#[test]
fn mortar_and_direct_solutions() {
    let env = BallisticsEnvironment::default();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO),
        &env,
        &clock,
    );

    let direct_params = LaunchParams::new(60.0, Vec3::ZERO).with_gravity(true);
    let mortar_params = LaunchParams::new(60.0, Vec3::ZERO)
        .with_gravity(true)
        .prefer_longest_time();

    let direct = target
        .intercept(&direct_params, &env, &clock, &mut rng())
        .expect("direct solution");
    let mortar = target
        .intercept(&mortar_params, &env, &clock, &mut rng())
        .expect("mortar solution");

    assert!(
        direct.duration < mortar.duration,
        "direct {} should beat mortar {}",
        direct.duration,
        mortar.duration
    );
    // The lofted shot leaves the muzzle climbing.
    assert!(mortar.launch_velocity.y > direct.launch_velocity.y);

    for shot in [&direct, &mortar] {
        assert_vec_close(
            shot.position_at(shot.duration),
            target.position_at(shot.duration),
            0.1,
        );
    }
}

/// The computed projectile path and the target path pass through the same
/// point at the intercept time, with every motion term in play.
#[test]
fn intercept_closes_on_moving_accelerating_target() {
    let env = BallisticsEnvironment::default();
    let clock = SimClock::at_time(4.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(120.0, 30.0, -40.0), Vec3::new(-8.0, 2.0, 5.0))
            .with_gravity(true)
            .with_acceleration(Vec3::new(0.5, 0.0, -1.0)),
        &env,
        &clock,
    );

    let params = LaunchParams::new(90.0, Vec3::new(0.0, 1.5, 0.0))
        .with_velocity(Vec3::new(3.0, 0.0, 0.0))
        .with_gravity(true);
    let shot = target
        .intercept(&params, &env, &clock, &mut rng())
        .expect("fast projectile reaches the target");

    assert!(shot.duration > 0.0);
    assert_vec_close(
        shot.position_at(shot.duration),
        target.position_at(shot.duration),
        0.1,
    );
}

/// Same closure property from inside a fixed tick, where the target is
/// tick-aligned and the shot is created in its instantiated regime.
#[test]
fn intercept_closes_inside_fixed_step() {
    let env = BallisticsEnvironment::default();
    let clock = SimClock::at_time(4.0).in_fixed_step();
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(60.0, 5.0, 20.0), Vec3::new(-3.0, 0.0, -2.0))
            .with_gravity(true),
        &env,
        &clock,
    );
    assert_eq!(target.regime, TimingRegime::FixedAligned);

    let params = LaunchParams::new(75.0, Vec3::ZERO).with_gravity(true);
    let shot = target
        .intercept(&params, &env, &clock, &mut rng())
        .expect("target in range");
    assert_eq!(shot.regime, TimingRegime::FixedInstantiated);

    assert_vec_close(
        shot.position_at(shot.duration),
        target.position_at(shot.duration),
        0.1,
    );
}

/// Zero spread must not consume randomness: any two RNGs produce the
/// identical solution.
#[test]
fn zero_spread_is_deterministic() {
    let env = BallisticsEnvironment::default();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(50.0, 20.0, 10.0), Vec3::new(-2.0, 0.0, 1.0))
            .with_gravity(true),
        &env,
        &clock,
    );
    let params = LaunchParams::new(80.0, Vec3::ZERO).with_gravity(true);

    let mut rng_a = StdRng::seed_from_u64(1);
    let mut rng_b = StdRng::seed_from_u64(2);
    let shot_a = target.intercept(&params, &env, &clock, &mut rng_a).unwrap();
    let shot_b = target.intercept(&params, &env, &clock, &mut rng_b).unwrap();

    assert_eq!(shot_a.launch_velocity, shot_b.launch_velocity);
    assert_eq!(shot_a.velocity, shot_b.velocity);
    assert_eq!(shot_a.duration, shot_b.duration);
}

/// Spread perturbs direction only; the launch speed stays the requested
/// magnitude.
#[test]
fn spread_preserves_launch_speed() {
    let env = BallisticsEnvironment::zero_gravity();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO),
        &env,
        &clock,
    );
    let params = LaunchParams::new(50.0, Vec3::ZERO).with_spread(3.0);

    let mut rng = rng();
    for _ in 0..16 {
        let shot = target.intercept(&params, &env, &clock, &mut rng).unwrap();
        assert_close(shot.launch_velocity.length(), 50.0, 0.01);
        let deviation = shot
            .launch_velocity
            .angle_between(Vec3::X)
            .to_degrees();
        assert!(deviation <= 3.0 + 1e-3, "deviation {deviation} out of cone");
    }
}

/// The inherited platform velocity rides on top of the launch component.
#[test]
fn inherited_velocity_adds_to_launch() {
    let env = BallisticsEnvironment::zero_gravity();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(100.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)),
        &env,
        &clock,
    );

    let platform_velocity = Vec3::new(10.0, 0.0, 0.0);
    let params = LaunchParams::new(50.0, Vec3::ZERO).with_velocity(platform_velocity);
    let shot = target.intercept(&params, &env, &clock, &mut rng()).unwrap();

    assert_eq!(shot.velocity, platform_velocity + shot.launch_velocity);
    // Platform matching the target's velocity reduces the problem to the
    // stationary case in the moving frame.
    assert_close(shot.duration, 2.0, 1e-4);
    assert_vec_close(shot.launch_velocity, Vec3::new(50.0, 0.0, 0.0), 1e-3);
}

/// A continuity time shift advances the returned trajectory to the
/// current frame's reference instant.
#[test]
fn time_shift_advances_result() {
    let env = BallisticsEnvironment::zero_gravity();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO),
        &env,
        &clock,
    );

    let params = LaunchParams::new(50.0, Vec3::ZERO).with_time_shift(0.5);
    let shot = target.intercept(&params, &env, &clock, &mut rng()).unwrap();

    assert_close(shot.time_shift, 0.5, 1e-6);
    assert_close(shot.duration, 1.5, 1e-4);
    assert_vec_close(shot.position, Vec3::new(25.0, 0.0, 0.0), 1e-3);
    assert_vec_close(shot.position_at(shot.duration), Vec3::new(100.0, 0.0, 0.0), 1e-3);
}

/// A target already sitting on the muzzle yields the degenerate zero-time
/// solution without dividing by it.
#[test]
fn zero_distance_target_yields_finite_solution() {
    let env = BallisticsEnvironment::zero_gravity();
    let clock = SimClock::at_time(0.0);
    let target = Trajectory::new(MotionSample::new(Vec3::ZERO, Vec3::ZERO), &env, &clock);

    let shot = target
        .intercept(&LaunchParams::new(50.0, Vec3::ZERO), &env, &clock, &mut rng())
        .expect("degenerate quartic still has a non-negative root");

    assert_eq!(shot.duration, 0.0);
    assert!(shot.launch_velocity.is_finite());
    assert_eq!(shot.launch_velocity, Vec3::ZERO);
}

/// Chained intercepts: shooting down an incoming shot references it as the
/// target, two levels deep at most.
#[test]
fn counterfire_references_target_trajectory() {
    let env = BallisticsEnvironment::zero_gravity();
    let clock = SimClock::at_time(0.0);
    let incoming = Trajectory::new(
        MotionSample::new(Vec3::new(200.0, 50.0, 0.0), Vec3::new(-40.0, -10.0, 0.0))
            .with_duration(5.0),
        &env,
        &clock,
    );

    let counter = incoming
        .intercept(&LaunchParams::new(120.0, Vec3::ZERO), &env, &clock, &mut rng())
        .expect("interceptor outruns the incoming shot");

    let referenced = counter.target_trajectory.as_deref().unwrap();
    assert_eq!(referenced.position, incoming.position);
    assert!(referenced.target_trajectory.is_none());

    assert_vec_close(
        counter.position_at(counter.duration),
        incoming.position_at(counter.duration),
        0.05,
    );
}
