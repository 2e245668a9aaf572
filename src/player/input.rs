//! Keyboard to player input translation and dispatch.

use super::physics::{collider_snapshot, BodyView};
use super::{GroundCheck, JumpInput, MoveInput, Player};
use crate::physics::{Body, BoxCollider};
use crate::settings::Settings;
use bevy::prelude::*;

/// Turn mapped keys into `MoveInput` (only when the axis changes) and
/// `JumpInput` (on press).
#[allow(clippy::needless_pass_by_value)]
pub fn read_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut last_axis: Local<f32>,
    mut moves: EventWriter<MoveInput>,
    mut jumps: EventWriter<JumpInput>,
) {
    let controls = &settings.controls;
    let left = controls.key("left", KeyCode::KeyA);
    let right = controls.key("right", KeyCode::KeyD);
    let jump = controls.key("jump", KeyCode::Space);

    let mut axis = 0.0;
    if keys.pressed(left) {
        axis -= 1.0;
    }
    if keys.pressed(right) {
        axis += 1.0;
    }

    if axis != *last_axis {
        *last_axis = axis;
        moves.send(MoveInput(axis));
    }
    if keys.just_pressed(jump) {
        jumps.send(JumpInput);
    }
}

/// Feed buffered input into every player's agent.
///
/// Move input is only stored. A jump applies its impulse to the body at once.
/// A newly spawned player is handed the axis that is currently held, since
/// `read_keyboard` only reports changes.
#[allow(clippy::needless_pass_by_value)]
pub fn dispatch_input(
    mut moves: EventReader<MoveInput>,
    mut jumps: EventReader<JumpInput>,
    mut held_axis: Local<f32>,
    mut players: Query<(Entity, &mut Player, &mut Body, &Transform, &GroundCheck)>,
    colliders: Query<(Entity, &Transform, &BoxCollider)>,
) {
    let moved = moves.read().last().map(|m| m.0);
    if let Some(axis) = moved {
        *held_axis = axis;
    }
    let jump = jumps.read().count() > 0;

    let snapshot = if jump { collider_snapshot(&colliders) } else { Vec::new() };
    for (entity, mut player, mut body, tf, ground_check) in &mut players {
        if moved.is_some() || player.is_added() {
            player.agent.on_move_input(*held_axis);
        }
        if jump {
            let mut view = BodyView::new(entity, tf, &mut body, *ground_check, &snapshot);
            player.agent.on_jump_input(&mut view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentConfig, PlayerAgent};
    use bevy::ecs::event::Events;
    use bevy::ecs::schedule::ExecutorKind;

    fn input_world() -> World {
        let mut world = World::new();
        world.init_resource::<Events<MoveInput>>();
        world.init_resource::<Events<JumpInput>>();
        world.init_resource::<ButtonInput<KeyCode>>();
        world.insert_resource(Settings::defaults());
        world
    }

    fn input_schedule() -> Schedule {
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule
    }

    fn spawn_player(world: &mut World) -> Entity {
        let agent = PlayerAgent::new(AgentConfig::default(), "level_1").unwrap();
        world
            .spawn((Player::new(agent), Body::default(), BoxCollider::default(), Transform::default(), GroundCheck::default()))
            .id()
    }

    fn axis(world: &World, player: Entity) -> f32 {
        world.get::<Player>(player).unwrap().agent.horizontal_axis()
    }

    #[test]
    fn held_direction_carries_over_to_respawned_player() {
        let mut world = input_world();
        let mut schedule = input_schedule();
        schedule.add_systems((read_keyboard, dispatch_input).chain());

        let old = spawn_player(&mut world);
        world.resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyD);
        schedule.run(&mut world);
        assert_eq!(axis(&world, old), 1.0);

        // D stays held through the respawn, so no new MoveInput is sent
        world.despawn(old);
        let fresh = spawn_player(&mut world);
        schedule.run(&mut world);
        assert_eq!(axis(&world, fresh), 1.0);

        world.resource_mut::<ButtonInput<KeyCode>>().release(KeyCode::KeyD);
        schedule.run(&mut world);
        assert_eq!(axis(&world, fresh), 0.0);
    }

    #[test]
    fn unchanged_keys_send_nothing() {
        let mut world = input_world();
        let mut schedule = input_schedule();
        schedule.add_systems(read_keyboard);

        world.resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyA);
        schedule.run(&mut world);
        schedule.run(&mut world);

        let events = world.resource::<Events<MoveInput>>();
        let sent: Vec<f32> = events.get_reader().read(events).map(|m| m.0).collect();
        assert_eq!(sent, vec![-1.0]);
    }
}
