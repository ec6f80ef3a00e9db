//! Closed-form kinematic integrators for the three sampling regimes.
//!
//! The host engine advances physics on a discrete fixed tick while gameplay
//! code runs at variable frame rate. The exact integral of a constant
//! acceleration therefore depends on *when* a body's state was sampled
//! relative to the tick boundary, and on whether the body came into
//! existence mid-tick. Each regime gets its own closed form; the intercept
//! solver derives its polynomial coefficients from the same forms so that
//! predicted and simulated positions agree without systematic bias.

use bevy::prelude::*;

/// Which closed-form integration applies to a motion sample.
///
/// Selected once, when the sample is taken, from the pair
/// `(created_in_fixed_time, instantiated_or_enabled)` and carried as data
/// for the sample's lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub enum TimingRegime {
    /// Sampled outside the fixed-tick boundary (variable frame time).
    #[default]
    Continuous,
    /// Sampled exactly on a fixed tick, body pre-existing.
    FixedAligned,
    /// Sampled on a fixed tick, in the same tick the body was
    /// instantiated or enabled. The body's first force application has
    /// not yet been integrated the same way as its ongoing motion.
    FixedInstantiated,
}

impl TimingRegime {
    /// Maps the sampling flags onto a regime.
    pub fn select(created_in_fixed_time: bool, instantiated_or_enabled: bool) -> Self {
        if !created_in_fixed_time {
            Self::Continuous
        } else if !instantiated_or_enabled {
            Self::FixedAligned
        } else {
            Self::FixedInstantiated
        }
    }

    /// Whether the sample was taken on a fixed-tick boundary.
    pub fn created_in_fixed_time(self) -> bool {
        !matches!(self, Self::Continuous)
    }
}

/// Position after `t` seconds, dispatched on the sample's regime.
///
/// `p` and `v` are the sampled position and velocity, `a` the constant
/// externally applied acceleration, `g` the constant gravity, and
/// `fixed_dt` the fixed tick length captured when the sample was taken.
pub fn position(
    regime: TimingRegime,
    t: f32,
    p: Vec3,
    v: Vec3,
    a: Vec3,
    g: Vec3,
    fixed_dt: f32,
) -> Vec3 {
    match regime {
        TimingRegime::Continuous => continuous_position(t, p, v, a, g, fixed_dt),
        TimingRegime::FixedAligned => fixed_aligned_position(t, p, v, a, g, fixed_dt),
        TimingRegime::FixedInstantiated => fixed_instantiated_position(t, p, v, a, g, fixed_dt),
    }
}

/// Velocity after `t` seconds, dispatched on the sample's regime.
pub fn velocity(regime: TimingRegime, t: f32, v: Vec3, a: Vec3, g: Vec3, fixed_dt: f32) -> Vec3 {
    match regime {
        TimingRegime::Continuous | TimingRegime::FixedAligned => continuous_velocity(t, v, a, g),
        TimingRegime::FixedInstantiated => fixed_instantiated_velocity(t, v, a, g, fixed_dt),
    }
}

/// Position for a sample taken at variable frame time.
///
/// The half-tick term compensates for the sample straddling the next
/// discrete acceleration application.
pub fn continuous_position(t: f32, p: Vec3, v: Vec3, a: Vec3, g: Vec3, fixed_dt: f32) -> Vec3 {
    if t == 0.0 {
        return p;
    }

    let h = 0.5 * fixed_dt;
    p + v * t + 0.5 * (t * t) * (a + g) + h * t * (a + g)
}

/// Position for a sample taken exactly on a fixed tick.
pub fn fixed_aligned_position(t: f32, p: Vec3, v: Vec3, a: Vec3, g: Vec3, fixed_dt: f32) -> Vec3 {
    p + v * t + (t * t + fixed_dt * t) * 0.5 * (a + g)
}

/// Position for a sample taken on the fixed tick in which the body was
/// instantiated or enabled.
///
/// Gravity and external acceleration are offset half a tick in opposite
/// directions: gravity has already acted on the fresh body this tick,
/// the external acceleration has not.
pub fn fixed_instantiated_position(
    t: f32,
    p: Vec3,
    v: Vec3,
    a: Vec3,
    g: Vec3,
    fixed_dt: f32,
) -> Vec3 {
    let h = 0.5 * fixed_dt;
    let h_2 = h * h;

    let tp = t + h;
    let tm = t - h;
    p + v * t + 0.5 * (tp * tp) * g - 0.5 * h_2 * g + 0.5 * (tm * tm) * a - 0.5 * h_2 * a
}

/// Velocity after `t` seconds under constant acceleration.
///
/// Shared by the continuous and fixed-aligned regimes.
pub fn continuous_velocity(t: f32, v: Vec3, a: Vec3, g: Vec3) -> Vec3 {
    if t == 0.0 {
        return v;
    }

    v + (a + g) * t
}

/// Velocity for the fixed-instantiated regime.
///
/// The external acceleration starts one full tick late relative to
/// gravity.
pub fn fixed_instantiated_velocity(t: f32, v: Vec3, a: Vec3, g: Vec3, fixed_dt: f32) -> Vec3 {
    if t == 0.0 {
        return v;
    }

    v + a * (t - fixed_dt) + g * t
}

/// Position recovered from initial and final velocities.
///
/// Continuous/fixed-aligned shape; agrees exactly with
/// [`continuous_position`] when `v2 = continuous_velocity(t, v1, a, g)`.
pub fn position_from_velocities(t: f32, p: Vec3, v1: Vec3, v2: Vec3, fixed_dt: f32) -> Vec3 {
    if t == 0.0 {
        return p;
    }

    p + (t + fixed_dt) * 0.5 * v2 + (t - fixed_dt) * 0.5 * v1
}

/// Position recovered from initial and final velocities for the
/// fixed-instantiated regime.
pub fn fixed_instantiated_position_from_velocities(
    t: f32,
    p: Vec3,
    v1: Vec3,
    v2: Vec3,
    g: Vec3,
    fixed_dt: f32,
) -> Vec3 {
    let h = 0.5 * fixed_dt;
    p + 0.5 * t * v1 + 0.5 * t * v2 + h * t * g
}

/// Vector coefficients of the relative position polynomial
/// `a·t² + b·t + c` between a target and a projectile launch origin.
///
/// The target moves with `(p1, v1, a1, g1)` under `regime`; the projectile
/// contributes its origin `p2`, inherited base velocity `v2`, acceleration
/// `a3` and gravity `g3`, while its launch-direction component stays the
/// unknown the intercept solver resolves. In the fixed regimes the
/// projectile side is integrated in the fixed-instantiated form, because
/// that is the regime an interception result is created in.
#[allow(clippy::too_many_arguments)]
pub fn intercept_coefficients(
    regime: TimingRegime,
    p1: Vec3,
    v1: Vec3,
    a1: Vec3,
    g1: Vec3,
    p2: Vec3,
    v2: Vec3,
    a3: Vec3,
    g3: Vec3,
    fixed_dt: f32,
) -> (Vec3, Vec3, Vec3) {
    let h = 0.5 * fixed_dt;

    match regime {
        TimingRegime::Continuous => {
            let a = 0.5 * (a1 + g1) - 0.5 * (a3 + g3);
            let b = h * (a1 + g1) + v1 - h * (a3 + g3) - v2;
            let c = p1 - p2;
            (a, b, c)
        }
        TimingRegime::FixedAligned => {
            let a = 0.5 * a1 + 0.5 * g1 - 0.5 * a3 - 0.5 * g3;
            let b = h * a1 + h * g1 + v1 + h * a3 - h * g3 - v2;
            let c = p1 - p2;
            (a, b, c)
        }
        TimingRegime::FixedInstantiated => {
            let a = 0.5 * a1 + 0.5 * g1 - 0.5 * a3 - 0.5 * g3;
            let b = -h * a1 + h * g1 + v1 + h * a3 - h * g3 - v2;
            let c = p1 - p2;
            (a, b, c)
        }
    }
}
