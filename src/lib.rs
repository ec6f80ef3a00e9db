//! # Bevy Turret Ballistics
//!
//! Closed-form trajectory prediction and firing solutions for Bevy 0.18.
//!
//! ## Features
//! - Quartic-root interception of moving, accelerating, gravity-affected
//!   targets: no iterative aiming, one closed-form solve per shot
//! - Three fixed-tick-aware integration regimes so predictions match what
//!   the physics step actually simulates, sample-for-sample
//! - Direct or lofted (mortar) solution selection
//! - Magnitude-preserving spread with caller-supplied randomness, fully
//!   deterministic at zero spread
//! - Frame-continuity time shifting and fire-rate bookkeeping
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_turret_ballistics::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TurretBallisticsPlugin)
//!         .add_systems(Update, aim)
//!         .run();
//! }
//!
//! fn aim(clock: Res<SimClock>, env: Res<BallisticsEnvironment>) {
//!     // Sample the target's motion, wrap it, and solve for a 60 m/s shot.
//!     let target = Trajectory::new(
//!         MotionSample::new(Vec3::new(100.0, 0.0, 40.0), Vec3::new(-5.0, 0.0, 0.0)),
//!         &env,
//!         &clock,
//!     );
//!
//!     let mut rng = StdRng::seed_from_u64(0);
//!     let params = LaunchParams::new(60.0, Vec3::ZERO).with_gravity(true);
//!     if let Some(shot) = target.intercept(&params, &env, &clock, &mut rng) {
//!         info!("fire {:?}, impact in {:.2}s", shot.launch_velocity, shot.duration);
//!     }
//! }
//! ```

pub mod kinematics;
pub mod math;
pub mod resources;
pub mod timing;
pub mod trajectory;

pub mod prelude {
    pub use crate::kinematics::TimingRegime;
    pub use crate::resources::BallisticsEnvironment;
    pub use crate::timing::{RateLimiter, SimClock};
    pub use crate::trajectory::{LaunchParams, MotionSample, Trajectory};
    pub use crate::TurretBallisticsPlugin;
}

use bevy::prelude::*;

use resources::BallisticsEnvironment;
use timing::SimClock;

/// Plugin wiring the ambient inputs the trajectory core consumes.
///
/// The core itself is pure; every function takes the clock and
/// environment explicitly. This plugin keeps a [`SimClock`] resource in
/// step with Bevy's virtual and fixed clocks so host systems can hand it
/// straight to [`Trajectory`](trajectory::Trajectory) calls from either a
/// variable-rate or a fixed-rate schedule:
///
/// - `First`: sync time, frame delta, and tick length from
///   [`Time<Virtual>`] and [`Time<Fixed>`]
/// - `FixedFirst`/`FixedLast`: bracket the fixed main loop so
///   [`SimClock::in_fixed_timestep`] reflects the invoking schedule the
///   same way `Time<Fixed>` swaps in for `Time` inside fixed updates
pub struct TurretBallisticsPlugin;

impl Plugin for TurretBallisticsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SimClock>()
            .register_type::<BallisticsEnvironment>()
            .init_resource::<SimClock>()
            .init_resource::<BallisticsEnvironment>()
            .add_systems(First, sync_clock)
            .add_systems(FixedFirst, enter_fixed_timestep)
            .add_systems(FixedLast, exit_fixed_timestep);
    }
}

/// Mirror the engine clocks into the [`SimClock`] resource once per frame.
fn sync_clock(
    mut clock: ResMut<SimClock>,
    time: Res<Time<Virtual>>,
    fixed: Res<Time<Fixed>>,
) {
    clock.time = time.elapsed_secs();
    clock.delta_time = time.delta_secs();
    clock.fixed_time = fixed.elapsed_secs();
    clock.fixed_delta_time = fixed.timestep().as_secs_f32();
    clock.in_fixed_timestep = false;
}

fn enter_fixed_timestep(mut clock: ResMut<SimClock>, fixed: Res<Time<Fixed>>) {
    clock.in_fixed_timestep = true;
    clock.fixed_time = fixed.elapsed_secs();
    clock.time = clock.fixed_time;
}

fn exit_fixed_timestep(mut clock: ResMut<SimClock>, time: Res<Time<Virtual>>) {
    clock.in_fixed_timestep = false;
    clock.time = time.elapsed_secs();
}
