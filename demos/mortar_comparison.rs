//! Direct fire versus mortar fire against the same target.
//!
//! The trajectory core is plain value computation, so it works without an
//! `App`: build the clock and environment by hand, solve the same firing
//! problem with both time preferences, and print the two arcs.
//!
//! Run with: `cargo run --example mortar_comparison`

use bevy::math::Vec3;
use bevy_turret_ballistics::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let env = BallisticsEnvironment::default();
    let clock = SimClock::at_time(0.0);
    let mut rng = StdRng::seed_from_u64(0);

    // A truck rolling away from the battery.
    let target = Trajectory::new(
        MotionSample::new(Vec3::new(140.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)),
        &env,
        &clock,
    );

    let direct_params = LaunchParams::new(75.0, Vec3::ZERO).with_gravity(true);
    let mortar_params = LaunchParams::new(75.0, Vec3::ZERO)
        .with_gravity(true)
        .prefer_longest_time();

    let Some(direct) = target.intercept(&direct_params, &env, &clock, &mut rng) else {
        println!("No direct solution at this speed.");
        return;
    };
    let Some(mortar) = target.intercept(&mortar_params, &env, &clock, &mut rng) else {
        println!("No mortar solution at this speed.");
        return;
    };

    print_arc("Direct", &direct);
    print_arc("Mortar", &mortar);

    println!(
        "\nSame muzzle speed, same target: the mortar round hangs {:.1}s longer.",
        mortar.duration - direct.duration
    );
}

fn print_arc(label: &str, shot: &Trajectory) {
    let apex = shot
        .positions_by_count(0.0, shot.duration, 32)
        .into_iter()
        .map(|p| p.y)
        .fold(f32::MIN, f32::max);

    println!(
        "{label}: impact in {:.2}s, launch velocity {:.1?} (elevation {:.1} deg), apex {apex:.1}m",
        shot.duration,
        shot.launch_velocity,
        shot.launch_velocity
            .y
            .atan2(shot.launch_velocity.with_y(0.0).length())
            .to_degrees(),
    );
    println!("        impact point {:.1?}", shot.terminal_point());
}
