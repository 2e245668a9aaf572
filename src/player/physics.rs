//! Player fixed-step driving and contact handling.
//!
//! `BodyView` adapts the ECS physics data of one player to the agent's
//! `PhysicsBody` seam. `player_fixed_step` steps each agent once per fixed
//! tick and `player_contacts` turns begun hazard contacts into damage.

use super::{GroundCheck, Hazard, Player, PlayerHealthChanged};
use crate::agent::{ColliderId, Contact, PhysicsBody, SceneController};
use crate::physics::{Aabb, Body, BoxCollider, CollisionStarted};
use crate::scene::SceneReloadRequested;
use bevy::prelude::*;

fn collider_id(entity: Entity) -> ColliderId {
    ColliderId(entity.to_bits())
}

/// World position of the ground probe for a player transform.
#[must_use]
pub fn ground_check_point(tf: &Transform, ground_check: &GroundCheck) -> Vec2 {
    tf.translation.truncate() + Vec2::new(0.0, ground_check.offset * tf.scale.y)
}

/// World-space boxes of every collider, taken once per system run.
#[must_use]
pub fn collider_snapshot(colliders: &Query<(Entity, &Transform, &BoxCollider)>) -> Vec<(Entity, Aabb)> {
    colliders.iter().map(|(e, tf, c)| (e, Aabb::from_transform(tf, c))).collect()
}

/// One player's body as seen by its agent.
pub struct BodyView<'a> {
    entity: Entity,
    transform: &'a Transform,
    body: &'a mut Body,
    ground_check: GroundCheck,
    colliders: &'a [(Entity, Aabb)],
}

impl<'a> BodyView<'a> {
    pub fn new(
        entity: Entity,
        transform: &'a Transform,
        body: &'a mut Body,
        ground_check: GroundCheck,
        colliders: &'a [(Entity, Aabb)],
    ) -> Self {
        Self { entity, transform, body, ground_check, colliders }
    }
}

impl PhysicsBody for BodyView<'_> {
    fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.body.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.body.apply_impulse(impulse);
    }

    fn overlap_box(&self, center: Vec2, size: Vec2) -> Option<ColliderId> {
        // Another collider wins over our own when both overlap.
        let others = self.colliders.iter().filter(|(e, _)| *e != self.entity);
        let own = self.colliders.iter().filter(|(e, _)| *e == self.entity);
        crate::physics::overlap_box(center, size, others.chain(own)).map(collider_id)
    }

    fn own_collider(&self) -> ColliderId {
        collider_id(self.entity)
    }

    fn ground_check_point(&self) -> Vec2 {
        ground_check_point(self.transform, &self.ground_check)
    }

    fn horizontal_scale(&self) -> f32 {
        self.transform.scale.x.abs()
    }
}

/// Scene controller that forwards reload commands as events.
pub struct SceneRequests<'a, 'w>(pub &'a mut EventWriter<'w, SceneReloadRequested>);

impl SceneController for SceneRequests<'_, '_> {
    fn reload_scene(&mut self, name: &str) {
        self.0.send(SceneReloadRequested { name: name.to_string() });
    }
}

/// Step every player agent once per fixed tick.
#[allow(clippy::needless_pass_by_value)]
pub fn player_fixed_step(
    time: Res<Time>,
    mut players: Query<(Entity, &mut Player, &mut Body, &Transform, &GroundCheck)>,
    colliders: Query<(Entity, &Transform, &BoxCollider)>,
    mut reloads: EventWriter<SceneReloadRequested>,
    mut health: EventWriter<PlayerHealthChanged>,
) {
    let dt = time.delta_seconds();
    let snapshot = collider_snapshot(&colliders);

    for (entity, mut player, mut body, tf, ground_check) in &mut players {
        let mut view = BodyView::new(entity, tf, &mut body, *ground_check, &snapshot);
        let outcome = player.agent.on_fixed_step(dt, &mut view, &mut SceneRequests(&mut reloads));
        if let Some(change) = outcome.health_changed {
            health.send(PlayerHealthChanged { entity, change });
        }
    }
}

/// Apply damage for contacts with hazards that began this step.
#[allow(clippy::needless_pass_by_value)]
pub fn player_contacts(
    mut started: EventReader<CollisionStarted>,
    mut players: Query<&mut Player>,
    hazards: Query<&Hazard>,
    mut health: EventWriter<PlayerHealthChanged>,
) {
    for ev in started.read() {
        let Ok(mut player) = players.get_mut(ev.body) else { continue };
        let contact = hazards
            .get(ev.other)
            .map_or(Contact::Inert, |h| Contact::Damaging { damage: h.damage });
        if let Some(change) = player.agent.on_collision(&contact) {
            health.send(PlayerHealthChanged { entity: ev.body, change });
        }
    }
}
