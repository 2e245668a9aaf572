//! Collaborator seams the player agent is driven through.
//!
//! The agent never owns physics, transforms or scenes. A host (the Bevy
//! layer in `crate::player`, or a test double) implements these traits and
//! hands them to the agent per call.
use bevy::math::{Vec2, Vec3};

/// Opaque identity of a collider owned by the host physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u64);

/// Rigid body the agent steers.
pub trait PhysicsBody {
    /// Current linear velocity in world units per second.
    fn velocity(&self) -> Vec2;

    fn set_velocity(&mut self, velocity: Vec2);

    /// Apply an instantaneous impulse (velocity change scaled by inverse mass).
    fn apply_impulse(&mut self, impulse: Vec2);

    /// Return at most one collider overlapping an axis-aligned box.
    fn overlap_box(&self, center: Vec2, size: Vec2) -> Option<ColliderId>;

    /// The agent's own collider, excluded from ground checks.
    fn own_collider(&self) -> ColliderId;

    /// World position of the point the ground probe is centred on.
    fn ground_check_point(&self) -> Vec2;

    /// Horizontal scale of the agent, used as the probe width.
    fn horizontal_scale(&self) -> f32;
}

/// Local transform of the displayed health bar.
pub trait BarTransform {
    fn local_scale(&self) -> Vec3;
    fn set_local_scale(&mut self, scale: Vec3);
    fn local_position(&self) -> Vec3;
    fn set_local_position(&mut self, position: Vec3);
}

/// Accepts scene reload commands.
pub trait SceneController {
    fn reload_scene(&mut self, name: &str);
}

/// What the agent touched this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Entity that hurts on touch, carrying its damage value.
    Damaging { damage: f32 },
    /// Anything else (ground, walls, pickups).
    Inert,
}

impl BarTransform for bevy::transform::components::Transform {
    fn local_scale(&self) -> Vec3 {
        self.scale
    }

    fn set_local_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    fn local_position(&self) -> Vec3 {
        self.translation
    }

    fn set_local_position(&mut self, position: Vec3) {
        self.translation = position;
    }
}
