//! Clock context and fire-interval bookkeeping.
//!
//! The trajectory core never reads ambient time. Everything an engine
//! usually exposes through global accessors (current time, fixed-tick
//! time, tick length, whether the caller is inside a fixed tick) travels
//! through an explicit [`SimClock`] value, so the three-regime dispatch is
//! plain data flow and trivially testable.

use bevy::prelude::*;

use crate::math;

/// Engine-default fixed tick length in seconds.
pub const DEFAULT_FIXED_DELTA_TIME: f32 = 0.02;

/// Snapshot of the host's clocks.
///
/// Kept in sync by [`TurretBallisticsPlugin`](crate::TurretBallisticsPlugin);
/// tests construct one directly with [`SimClock::at_time`].
#[derive(Resource, Reflect, Clone, Copy, Debug)]
#[reflect(Resource)]
pub struct SimClock {
    /// Current time in seconds. Inside a fixed tick this equals
    /// [`fixed_time`](Self::fixed_time).
    pub time: f32,
    /// Start time of the most recent fixed tick.
    pub fixed_time: f32,
    /// Frame delta of the current update.
    pub delta_time: f32,
    /// Fixed tick length. Must be positive.
    pub fixed_delta_time: f32,
    /// Whether the current evaluation context is inside a fixed tick.
    pub in_fixed_timestep: bool,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            time: 0.0,
            fixed_time: 0.0,
            delta_time: 0.0,
            fixed_delta_time: DEFAULT_FIXED_DELTA_TIME,
            in_fixed_timestep: false,
        }
    }
}

impl SimClock {
    /// Clock standing at `time`, with the fixed clock floored to the last
    /// tick boundary before it.
    pub fn at_time(time: f32) -> Self {
        Self {
            time,
            fixed_time: math::to_incremental_floor(time, DEFAULT_FIXED_DELTA_TIME),
            ..Default::default()
        }
    }

    /// Overrides the fixed tick length and re-floors the fixed clock.
    pub fn with_fixed_delta_time(mut self, fixed_delta_time: f32) -> Self {
        debug_assert!(fixed_delta_time > 0.0, "fixed tick length must be positive");
        self.fixed_delta_time = fixed_delta_time;
        self.fixed_time = math::to_incremental_floor(self.time, fixed_delta_time);
        self
    }

    /// Marks the clock as being inside a fixed tick; `time` snaps to the
    /// tick boundary, as it would when sampled from a fixed update.
    pub fn in_fixed_step(mut self) -> Self {
        self.in_fixed_timestep = true;
        self.time = self.fixed_time;
        self
    }

    /// Time remaining until the next fixed tick. Zero inside a fixed tick,
    /// which assumes the tick is happening presently.
    pub fn time_until_fixed_update(&self) -> f32 {
        if self.in_fixed_timestep {
            0.0
        } else {
            self.fixed_time + self.fixed_delta_time - self.time
        }
    }

    /// Time elapsed since the previous fixed tick ran.
    pub fn time_since_fixed_update(&self) -> f32 {
        if self.in_fixed_timestep {
            self.fixed_delta_time
        } else {
            self.time - self.fixed_time
        }
    }

    /// The delta appropriate to the current context: the fixed tick length
    /// inside a fixed tick, the frame delta otherwise.
    pub fn smart_delta_time(&self) -> f32 {
        if self.in_fixed_timestep {
            self.fixed_delta_time
        } else {
            self.delta_time
        }
    }
}

/// Rate limits an action and measures the framerate error of each pass so
/// callers can interpolate for continuity.
///
/// A turret firing every `wait_time` seconds will in general pass the
/// limiter some fraction of a frame late; [`RateLimiter::pass`] returns
/// that error and deducts it from the next wait, so the *average* rate
/// stays exact. Hosts feed the returned error into
/// [`Trajectory::intercept`](crate::trajectory::Trajectory::intercept) as
/// its `time_shift` to keep successive shots frame-aligned.
#[derive(Reflect, Clone, Copy, Debug, Default)]
pub struct RateLimiter {
    /// The time the limiter measures elapsed time from.
    pub wait_start: f32,
    /// How long the limiter must wait before it can pass.
    pub wait_time: f32,
}

impl RateLimiter {
    pub fn new(wait_start: f32, wait_time: f32) -> Self {
        Self {
            wait_start,
            wait_time,
        }
    }

    /// The time at which the limiter will be ready to pass.
    pub fn ready_time(&self) -> f32 {
        self.wait_start + self.wait_time
    }

    /// Whether enough time has elapsed to pass.
    pub fn can_pass(&self, clock: &SimClock) -> bool {
        clock.time >= self.ready_time()
    }

    /// Time elapsed since the limiter started waiting.
    pub fn elapsed_time(&self, clock: &SimClock) -> f32 {
        clock.time - self.wait_start
    }

    /// Time remaining until the limiter can pass.
    pub fn remaining_time(&self, clock: &SimClock) -> f32 {
        self.wait_time - self.elapsed_time(clock)
    }

    /// Fraction of the wait still remaining, clamped to `[0, 1]`.
    pub fn remaining_percent(&self, clock: &SimClock) -> f32 {
        if self.wait_time == 0.0 {
            0.0
        } else {
            (self.remaining_time(clock) / self.wait_time).clamp(0.0, 1.0)
        }
    }

    /// Attempts to pass; on success returns the continuity error (how far
    /// past the ready time the current frame landed) and re-arms the
    /// limiter with `wait_time` minus that error.
    pub fn pass(&mut self, clock: &SimClock, delta_time: f32, wait_time: f32) -> Option<f32> {
        if !self.can_pass(clock) {
            return None;
        }

        let t_error = self.continuous_error(clock, delta_time);
        self.wait_start = clock.time;
        self.wait_time = wait_time - t_error;
        Some(t_error)
    }

    /// The continuity error of the current frame: positive when the frame
    /// overshot the ready time by less than one frame, zero otherwise.
    pub fn continuous_error(&self, clock: &SimClock, delta_time: f32) -> f32 {
        let t_error = clock.time - self.ready_time();
        if t_error <= delta_time && t_error > 0.0 {
            t_error
        } else {
            0.0
        }
    }

    /// Appends to the pending wait.
    pub fn add_wait_time(&mut self, wait_time: f32) {
        self.wait_time += wait_time;
    }

    /// Clears any pending wait. The next ready time can be specified.
    pub fn reset(&mut self, ready_time: f32) {
        self.wait_start = ready_time;
        self.wait_time = 0.0;
    }
}
