//! Minimal 2D host physics: gravity, box collision and contact events.
//!
//! Dynamic entities carry a `Body` and a `BoxCollider`. Everything with a
//! `BoxCollider` but no `Body` is static. `integrate_bodies` moves bodies one
//! axis at a time and pushes them out of statics. Contacts that begin this
//! step are published as `CollisionStarted`.
use bevy::prelude::*;
use std::collections::HashSet;

/// Rigid body state integrated by `integrate_bodies`.
#[derive(Component, Debug, Clone)]
pub struct Body {
    /// Linear velocity in world units per second.
    pub velocity: Vec2,
    /// Mass used to turn impulses into velocity changes.
    pub mass: f32,
    /// Whether the body ended the last step resting on something.
    pub resting: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self { velocity: Vec2::ZERO, mass: 1.0, resting: false }
    }
}

impl Body {
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }
}

/// Axis-aligned box in local units, scaled by the entity's transform.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoxCollider {
    pub size: Vec2,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self { size: Vec2::ONE }
    }
}

/// A contact between a body (`body`) and another collider (`other`) began.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionStarted {
    pub body: Entity,
    pub other: Entity,
}

/// Contacts touching during the previous step, for begin detection.
#[derive(Resource, Default)]
pub struct ActiveContacts(pub HashSet<(Entity, Entity)>);

/// Gravity and friction applied by `integrate_bodies`.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PhysicsParams {
    pub gravity: f32,
    pub ground_friction: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self { gravity: -30.0, ground_friction: 4.0 }
    }
}

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    #[must_use]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self { min: center - half, max: center + half }
    }

    #[must_use]
    pub fn from_transform(tf: &Transform, collider: &BoxCollider) -> Self {
        Self::from_center_size(tf.translation.truncate(), collider.size * tf.scale.truncate())
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Return the first collider in `colliders` overlapping the given box.
pub fn overlap_box<'a>(
    center: Vec2,
    size: Vec2,
    colliders: impl IntoIterator<Item = &'a (Entity, Aabb)>,
) -> Option<Entity> {
    let probe = Aabb::from_center_size(center, size);
    colliders.into_iter().find(|(_, aabb)| probe.overlaps(aabb)).map(|(e, _)| *e)
}

/// Advance one body by `dt` against static colliders.
///
/// # Returns
/// The static entities touched during the move.
pub fn step_body(
    tf: &mut Transform,
    body: &mut Body,
    collider: &BoxCollider,
    statics: &[(Entity, Aabb)],
    params: &PhysicsParams,
    dt: f32,
) -> Vec<Entity> {
    let half = (collider.size * tf.scale.truncate()).abs() * 0.5;
    let mut touched = Vec::new();

    body.velocity.y += params.gravity * dt;

    tf.translation.x += body.velocity.x * dt;
    for (entity, other) in statics {
        let me = Aabb::from_center_size(tf.translation.truncate(), half * 2.0);
        if !me.overlaps(other) {
            continue;
        }
        let pushing_right = if body.velocity.x == 0.0 {
            tf.translation.x < (other.min.x + other.max.x) * 0.5
        } else {
            body.velocity.x > 0.0
        };
        tf.translation.x = if pushing_right { other.min.x - half.x } else { other.max.x + half.x };
        body.velocity.x = 0.0;
        touched.push(*entity);
    }

    body.resting = false;
    tf.translation.y += body.velocity.y * dt;
    for (entity, other) in statics {
        let me = Aabb::from_center_size(tf.translation.truncate(), half * 2.0);
        if !me.overlaps(other) {
            continue;
        }
        if body.velocity.y <= 0.0 {
            tf.translation.y = other.max.y + half.y;
            body.resting = true;
        } else {
            tf.translation.y = other.min.y - half.y;
        }
        body.velocity.y = 0.0;
        if !touched.contains(entity) {
            touched.push(*entity);
        }
    }

    if body.resting {
        body.velocity.x *= (1.0 - params.ground_friction * dt).max(0.0);
    }

    touched
}

/// Integrate every body and publish contacts that began this step.
#[allow(clippy::needless_pass_by_value)]
pub fn integrate_bodies(
    time: Res<Time>,
    params: Res<PhysicsParams>,
    mut contacts: ResMut<ActiveContacts>,
    mut bodies: Query<(Entity, &mut Transform, &mut Body, &BoxCollider)>,
    statics: Query<(Entity, &Transform, &BoxCollider), Without<Body>>,
    mut started: EventWriter<CollisionStarted>,
) {
    let dt = time.delta_seconds();
    if dt <= 0.0 {
        return;
    }

    let snapshot: Vec<(Entity, Aabb)> = statics
        .iter()
        .map(|(e, tf, c)| (e, Aabb::from_transform(tf, c)))
        .collect();

    let mut now = HashSet::new();
    for (entity, mut tf, mut body, collider) in &mut bodies {
        for other in step_body(&mut tf, &mut body, collider, &snapshot, &params, dt) {
            now.insert((entity, other));
        }
    }

    for &(body, other) in &now {
        if !contacts.0.contains(&(body, other)) {
            started.send(CollisionStarted { body, other });
        }
    }
    contacts.0 = now;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> (Entity, Aabb) {
        (Entity::from_raw(10), Aabb::from_center_size(Vec2::new(0.0, -1.0), Vec2::new(20.0, 1.0)))
    }

    #[test]
    fn edge_contact_is_not_overlap() {
        let a = Aabb::from_center_size(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::from_center_size(Vec2::new(1.0, 0.0), Vec2::ONE);
        assert!(!a.overlaps(&b));
        let c = Aabb::from_center_size(Vec2::new(0.99, 0.0), Vec2::ONE);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn body_falls_and_rests_on_floor() {
        let statics = [floor()];
        let mut tf = Transform::from_xyz(0.0, 2.0, 0.0);
        let mut body = Body::default();
        let params = PhysicsParams::default();
        let mut touched_any = false;
        for _ in 0..200 {
            touched_any |= !step_body(&mut tf, &mut body, &BoxCollider::default(), &statics, &params, 0.02).is_empty();
        }
        assert!(touched_any);
        assert!(body.resting);
        assert!((tf.translation.y - 0.0).abs() < 1e-4);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn wall_stops_horizontal_motion() {
        let wall = (Entity::from_raw(11), Aabb::from_center_size(Vec2::new(2.0, 0.0), Vec2::new(1.0, 10.0)));
        let mut tf = Transform::from_xyz(0.0, 0.0, 0.0);
        let mut body = Body { velocity: Vec2::new(60.0, 0.0), ..default() };
        let params = PhysicsParams { gravity: 0.0, ground_friction: 0.0 };
        let touched = step_body(&mut tf, &mut body, &BoxCollider::default(), &[wall], &params, 0.02);
        assert_eq!(touched, vec![wall.0]);
        assert!((tf.translation.x - 1.0).abs() < 1e-5);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn impulse_respects_mass() {
        let mut body = Body { mass: 2.0, ..default() };
        body.apply_impulse(Vec2::new(0.0, 10.0));
        assert_eq!(body.velocity, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn overlap_box_finds_floor_under_feet() {
        let statics = [floor()];
        // bottom of a unit box resting at y = 0 sits at -0.5, the floor top
        let hit = overlap_box(Vec2::new(0.0, -0.5), Vec2::new(1.0, 0.001), &statics);
        assert_eq!(hit, Some(statics[0].0));
        assert_eq!(overlap_box(Vec2::new(0.0, 3.0), Vec2::new(1.0, 0.001), &statics), None);
    }
}
