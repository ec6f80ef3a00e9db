//! Global resources consumed by trajectory construction.

use bevy::prelude::*;

/// Global environment settings affecting all trajectories.
///
/// Gravity is resolved into a [`Trajectory`](crate::trajectory::Trajectory)
/// once, at construction, for bodies flagged as gravity-affected. Changing
/// the resource afterwards does not retroactively alter existing
/// trajectories, matching how a physics engine applies its gravity setting
/// tick by tick.
#[derive(Resource, Reflect, Clone, Copy, Debug)]
#[reflect(Resource)]
pub struct BallisticsEnvironment {
    /// Gravity vector (m/s²)
    pub gravity: Vec3,
}

impl Default for BallisticsEnvironment {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl BallisticsEnvironment {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    /// Environment with no gravity at all; useful for space scenes and
    /// straight-line tests.
    pub fn zero_gravity() -> Self {
        Self { gravity: Vec3::ZERO }
    }
}
