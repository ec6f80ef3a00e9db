//! The [`Trajectory`] value object and the interception algorithm.
//!
//! A trajectory bundles a body's sampled motion state with the timing
//! metadata needed to evaluate it bias-free against the host's fixed tick.
//! [`Trajectory::intercept`] is the firing-solution solver: it reduces
//! "hit that moving target with a fixed-speed projectile" to a quartic in
//! the intercept time and converts the chosen root back into a launch
//! velocity and a new trajectory for the projectile itself.

use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};

use crate::kinematics::{self, TimingRegime};
use crate::math;
use crate::resources::BallisticsEnvironment;
use crate::timing::SimClock;

/// Sampled motion state used to construct a [`Trajectory`].
///
/// Builder-style: only position and velocity are mandatory, everything
/// else defaults to an inert body measured on a frame it already existed
/// in.
#[derive(Clone, Debug, Default)]
pub struct MotionSample {
    pub position: Vec3,
    pub velocity: Vec3,
    pub has_gravity: bool,
    pub acceleration: Vec3,
    pub duration: f32,
    pub instantiated_or_enabled: bool,
    pub launch_velocity: Vec3,
    pub time_shift: f32,
    pub target_trajectory: Option<Arc<Trajectory>>,
}

impl MotionSample {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            ..Default::default()
        }
    }

    /// Marks the body as affected by the global gravity setting.
    pub fn with_gravity(mut self, has_gravity: bool) -> Self {
        self.has_gravity = has_gravity;
        self
    }

    /// Constant externally applied acceleration, distinct from gravity.
    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Intended lifespan of the trajectory.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Marks the sample as taken in the same frame the body was
    /// instantiated or enabled.
    pub fn instantiated(mut self) -> Self {
        self.instantiated_or_enabled = true;
        self
    }

    /// The velocity component attributed to the shot itself, as opposed
    /// to velocity inherited from the launching platform.
    pub fn with_launch_velocity(mut self, launch_velocity: Vec3) -> Self {
        self.launch_velocity = launch_velocity;
        self
    }

    /// Initial cumulative time shift.
    pub fn with_time_shift(mut self, time_shift: f32) -> Self {
        self.time_shift = time_shift;
        self
    }

    /// The trajectory this one was computed to intercept.
    pub fn with_target(mut self, target: Arc<Trajectory>) -> Self {
        self.target_trajectory = Some(target);
        self
    }
}

/// Launch parameters for [`Trajectory::intercept`].
#[derive(Clone, Debug)]
pub struct LaunchParams {
    /// Launch speed of the projectile (the magnitude of the unknown
    /// launch-direction component).
    pub speed: f32,
    /// Position the projectile is fired from.
    pub origin: Vec3,
    /// Velocity the projectile inherits from its platform.
    pub velocity: Vec3,
    /// Whether the projectile is affected by the global gravity setting.
    pub has_gravity: bool,
    /// Constant acceleration applied to the projectile in flight.
    pub acceleration: Vec3,
    /// Cone half-angle, in degrees, of the randomized deviation applied
    /// to the computed launch direction. Zero means fully deterministic.
    pub spread: f32,
    /// Forward time shift applied to the result for frame continuity
    /// (typically the [`RateLimiter`](crate::timing::RateLimiter) pass
    /// error).
    pub time_shift: f32,
    /// When several intercept times exist, pick the smallest (direct
    /// shot) if true, the largest (lofted/mortar shot) if false.
    pub prefer_shortest_time: bool,
}

impl LaunchParams {
    pub fn new(speed: f32, origin: Vec3) -> Self {
        Self {
            speed,
            origin,
            velocity: Vec3::ZERO,
            has_gravity: false,
            acceleration: Vec3::ZERO,
            spread: 0.0,
            time_shift: 0.0,
            prefer_shortest_time: true,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_gravity(mut self, has_gravity: bool) -> Self {
        self.has_gravity = has_gravity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Spread cone half-angle in degrees.
    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_time_shift(mut self, time_shift: f32) -> Self {
        self.time_shift = time_shift;
        self
    }

    /// Prefer the longest valid intercept time: lofted, mortar-style
    /// shots instead of the fastest hit.
    pub fn prefer_longest_time(mut self) -> Self {
        self.prefer_shortest_time = false;
        self
    }
}

/// Ballistic motion of a body from a sampled instant.
///
/// Physically immutable except for [`shift_time`](Self::shift_time), which
/// deterministically re-anchors the sample at a new reference instant.
/// The integration regime is fixed at construction from the clock state
/// and the instantiation flag, and never changes.
#[derive(Clone, Debug)]
pub struct Trajectory {
    /// Position at the creation instant.
    pub position: Vec3,
    /// Velocity at the creation instant.
    pub velocity: Vec3,
    /// Whether gravity applies to this body over its lifetime.
    pub has_gravity: bool,
    /// The constant gravity resolved at construction; zero when
    /// `has_gravity` is false.
    pub gravity: Vec3,
    /// Constant externally applied acceleration over the lifetime.
    pub acceleration: Vec3,
    /// Intended lifespan; reduced by forward time shifts. Negative values
    /// can occur transiently through degenerate shifts.
    pub duration: f32,
    /// The velocity component attributed to the shot, separate from
    /// inherited base velocity. Display/compatibility only; evaluation
    /// uses `velocity`.
    pub launch_velocity: Vec3,
    /// Absolute clock time at creation.
    pub time_created: f32,
    /// The integration regime selected at construction.
    pub regime: TimingRegime,
    /// Time remaining until the next fixed tick, captured at creation.
    pub created_time_until_fixed_update: f32,
    /// Time elapsed since the previous fixed tick, captured at creation.
    pub created_time_since_fixed_update: f32,
    /// Fixed tick length captured at creation; the integrators' half-tick
    /// corrections derive from it.
    pub fixed_delta_time: f32,
    /// Cumulative time shift applied via [`shift_time`](Self::shift_time).
    pub time_shift: f32,
    /// The trajectory this one was computed to intercept, if any. A
    /// reference, not an owner; intercept results point at their target
    /// and the chain never grows deeper than that.
    pub target_trajectory: Option<Arc<Trajectory>>,
}

impl Trajectory {
    /// Wraps a motion sample, capturing the ambient gravity and clock
    /// state that determine the sample's integration regime.
    pub fn new(sample: MotionSample, env: &BallisticsEnvironment, clock: &SimClock) -> Self {
        let MotionSample {
            position,
            velocity,
            has_gravity,
            acceleration,
            duration,
            instantiated_or_enabled,
            launch_velocity,
            time_shift,
            target_trajectory,
        } = sample;

        Self {
            position,
            velocity,
            has_gravity,
            gravity: if has_gravity { env.gravity } else { Vec3::ZERO },
            acceleration,
            duration,
            launch_velocity,
            time_created: clock.time,
            regime: TimingRegime::select(clock.in_fixed_timestep, instantiated_or_enabled),
            created_time_until_fixed_update: clock.time_until_fixed_update(),
            created_time_since_fixed_update: clock.time_since_fixed_update(),
            fixed_delta_time: clock.fixed_delta_time,
            time_shift,
            target_trajectory,
        }
    }

    /// Position `elapsed_time` seconds after the sample instant.
    pub fn position_at(&self, elapsed_time: f32) -> Vec3 {
        kinematics::position(
            self.regime,
            elapsed_time,
            self.position,
            self.velocity,
            self.acceleration,
            self.gravity,
            self.fixed_delta_time,
        )
    }

    /// Velocity `elapsed_time` seconds after the sample instant.
    pub fn velocity_at(&self, elapsed_time: f32) -> Vec3 {
        kinematics::velocity(
            self.regime,
            elapsed_time,
            self.velocity,
            self.acceleration,
            self.gravity,
            self.fixed_delta_time,
        )
    }

    /// The point where this trajectory terminates, based on its duration.
    pub fn terminal_point(&self) -> Vec3 {
        self.position_at(self.duration)
    }

    /// The duration floored to the fixed tick immediately before the tick
    /// that will contain the trajectory's termination.
    pub fn duration_fixed_time_floor(&self) -> f32 {
        math::to_incremental_floor(self.duration, self.fixed_delta_time)
    }

    /// Evenly spaced positions between two times. `count` must be at
    /// least 2. Unaccelerated trajectories collapse to their two
    /// endpoints.
    pub fn positions_by_count(&self, from_time: f32, to_time: f32, count: usize) -> Vec<Vec3> {
        self.sample_by_count(from_time, to_time, count, |t| self.position_at(t))
    }

    /// Positions between two times at a fixed spacing, clamped to at
    /// least one tick. Unaccelerated trajectories collapse to their two
    /// endpoints.
    pub fn positions_by_interval(&self, from_time: f32, to_time: f32, interval: f32) -> Vec<Vec3> {
        self.sample_by_interval(from_time, to_time, interval, |t| self.position_at(t))
    }

    /// Evenly spaced velocities between two times. `count` must be at
    /// least 2.
    pub fn velocities_by_count(&self, from_time: f32, to_time: f32, count: usize) -> Vec<Vec3> {
        self.sample_by_count(from_time, to_time, count, |t| self.velocity_at(t))
    }

    /// Velocities between two times at a fixed spacing, clamped to at
    /// least one tick.
    pub fn velocities_by_interval(&self, from_time: f32, to_time: f32, interval: f32) -> Vec<Vec3> {
        self.sample_by_interval(from_time, to_time, interval, |t| self.velocity_at(t))
    }

    fn is_unaccelerated(&self) -> bool {
        self.acceleration == Vec3::ZERO && !self.has_gravity
    }

    fn sample_by_count(
        &self,
        from_time: f32,
        to_time: f32,
        count: usize,
        f: impl Fn(f32) -> Vec3,
    ) -> Vec<Vec3> {
        debug_assert!(count >= 2, "need at least the two endpoint samples");
        if self.is_unaccelerated() {
            return vec![f(from_time), f(to_time)];
        }

        let total = (count - 1) as f32;
        let span = to_time - from_time;
        (0..count)
            .map(|i| f(from_time + span * i as f32 / total))
            .collect()
    }

    fn sample_by_interval(
        &self,
        from_time: f32,
        to_time: f32,
        interval: f32,
        f: impl Fn(f32) -> Vec3,
    ) -> Vec<Vec3> {
        if self.is_unaccelerated() {
            return vec![f(from_time), f(to_time)];
        }

        let step = interval.max(self.fixed_delta_time);
        let mut samples = Vec::new();
        let mut t = from_time;
        while t < to_time {
            samples.push(f(t));
            t += step;
        }
        samples.push(f(to_time));
        samples
    }

    /// Shifts the trajectory's reference instant by `time` seconds.
    ///
    /// Position is advanced through the trajectory's own regime formula,
    /// velocity through the shared constant-acceleration form; the
    /// cumulative shift grows and the remaining duration shrinks by the
    /// same amount. Shifting forward and then backward by the same amount
    /// restores the original state.
    pub fn shift_time(&mut self, time: f32) {
        if time == 0.0 {
            return;
        }

        self.position = self.position_at(time);
        self.velocity =
            kinematics::continuous_velocity(time, self.velocity, self.acceleration, self.gravity);
        self.time_shift += time;
        self.duration -= time;
    }

    /// The fixed-tick sampling error between the frame this trajectory was
    /// created in and the frame interpreting it now. All present-time
    /// queries correct by this offset, so a trajectory created inside a
    /// fixed tick reads consistently from a render frame and vice versa.
    pub fn fixed_time_offset(&self, clock: &SimClock) -> f32 {
        self.created_time_since_fixed_update - clock.time_since_fixed_update()
    }

    /// Time remaining before this trajectory's duration elapses.
    pub fn remaining_time(&self, clock: &SimClock) -> f32 {
        self.time_created + self.duration - clock.time - self.fixed_time_offset(clock)
    }

    /// Whether the trajectory's duration has elapsed at the current time.
    pub fn has_elapsed(&self, clock: &SimClock) -> bool {
        math::less_than_or_equal(self.remaining_time(clock), 0.0)
    }

    /// Time elapsed since creation, as seen from the invoking frame.
    pub fn elapsed_time(&self, clock: &SimClock) -> f32 {
        clock.time - self.time_created + self.fixed_time_offset(clock)
    }

    /// Expected position at the current time.
    pub fn position_now(&self, clock: &SimClock) -> Vec3 {
        self.position_at(self.elapsed_time(clock))
    }

    /// Expected velocity at the current time.
    pub fn velocity_now(&self, clock: &SimClock) -> Vec3 {
        self.velocity_at(self.elapsed_time(clock))
    }

    /// Computes the trajectory a projectile must follow to intercept this
    /// one, or `None` when no intercept exists.
    ///
    /// The relative motion between this trajectory (the target) and the
    /// projectile's origin is a vector quadratic in time; requiring the
    /// gap to be closable at exactly `params.speed` turns it into a
    /// scalar quartic whose real non-negative roots are the candidate
    /// intercept times. Failure is routine (a target outrunning the
    /// projectile simply has no root) and is reported as `None`, never
    /// an error.
    ///
    /// The returned trajectory starts at the projectile origin with the
    /// net launch velocity (inherited plus computed launch component,
    /// with spread applied), runs for the chosen intercept time, and
    /// references this trajectory as its target.
    ///
    /// # Example
    /// ```
    /// use bevy::math::Vec3;
    /// use bevy_turret_ballistics::prelude::*;
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    ///
    /// let env = BallisticsEnvironment::zero_gravity();
    /// let clock = SimClock::at_time(0.0);
    /// let target = Trajectory::new(
    ///     MotionSample::new(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO),
    ///     &env,
    ///     &clock,
    /// );
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let shot = target
    ///     .intercept(&LaunchParams::new(50.0, Vec3::ZERO), &env, &clock, &mut rng)
    ///     .unwrap();
    /// assert!((shot.duration - 2.0).abs() < 1e-4);
    /// ```
    pub fn intercept<R: Rng + ?Sized>(
        &self,
        params: &LaunchParams,
        env: &BallisticsEnvironment,
        clock: &SimClock,
        rng: &mut R,
    ) -> Option<Trajectory> {
        // Align reference frames: the target state is rewound by the
        // requested shift, and the result is shifted forward by it again
        // at the end.
        let p1 = self.position_at(-params.time_shift);
        let v1 = kinematics::continuous_velocity(
            -params.time_shift,
            self.velocity,
            self.acceleration,
            self.gravity,
        );

        let p2 = params.origin;
        let v2 = params.velocity;
        let a3 = params.acceleration;
        let g3 = if params.has_gravity {
            env.gravity
        } else {
            Vec3::ZERO
        };

        let (a, b, c) = kinematics::intercept_coefficients(
            self.regime,
            p1,
            v1,
            self.acceleration,
            self.gravity,
            p2,
            v2,
            a3,
            g3,
            self.fixed_delta_time,
        );

        // ‖a·t² + b·t + c‖² = speed²·t², expanded through dot products.
        let t4 = a.dot(a) as f64;
        let t3 = 2.0 * a.dot(b) as f64;
        let t2 = 2.0 * a.dot(c) as f64 + b.dot(b) as f64
            - (params.speed as f64 * params.speed as f64);
        let t1 = 2.0 * b.dot(c) as f64;
        let t0 = c.dot(c) as f64;

        let mut duration: Option<f32> = None;
        for root in math::quartic(t4, t3, t2, t1, t0) {
            if root.im != 0.0 || root.re < 0.0 {
                continue;
            }

            let t = root.re as f32;
            duration = Some(match duration {
                None => t,
                Some(best) if params.prefer_shortest_time => best.min(t),
                Some(best) => best.max(t),
            });
        }
        let duration = duration?;

        // The gap the projectile has to close over the chosen time; its
        // average closing velocity is the launch component. At a root of
        // exactly zero the target already sits at the muzzle and the
        // relative-velocity coefficient stands in undivided.
        let reach = a * (duration * duration) + b * duration + c;
        let launch_velocity = if duration > 0.0 { reach / duration } else { b };
        let launch_velocity = randomize_direction(launch_velocity, params.spread, rng);
        let velocity = v2 + launch_velocity;

        let mut trajectory = Trajectory::new(
            MotionSample::new(p2, velocity)
                .with_gravity(params.has_gravity)
                .with_acceleration(a3)
                .with_duration(duration)
                .instantiated()
                .with_launch_velocity(launch_velocity)
                .with_target(Arc::new(self.clone())),
            env,
            clock,
        );
        trajectory.shift_time(params.time_shift);
        Some(trajectory)
    }
}

/// Rotates `direction` by a random angle, up to `spread` degrees, about a
/// random axis. Magnitude is preserved. A zero spread returns the input
/// untouched without consuming randomness.
pub fn randomize_direction<R: Rng + ?Sized>(direction: Vec3, spread: f32, rng: &mut R) -> Vec3 {
    if spread == 0.0 || direction == Vec3::ZERO {
        return direction;
    }

    let axis: [f32; 3] = UnitSphere.sample(rng);
    let angle = rng.random_range(-spread..=spread).to_radians();
    Quat::from_axis_angle(Vec3::from(axis), angle) * direction
}
