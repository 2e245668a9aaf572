//! Scene spawning and reload-by-name.
//!
//! Everything a scene spawns is tagged `SceneEntity`. Reloading despawns all
//! of it and spawns the named layout again, which resets the player agent to
//! full health with fresh tuning from `Settings`.
pub mod layout;

use crate::agent::PlayerAgent;
use crate::physics::{ActiveContacts, Body, BoxCollider};
use crate::player::{GroundCheck, Hazard, Player};
use crate::settings::Settings;
use crate::ui::HealthBar;
use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

pub use layout::{load_layout, BarSpec, HazardSpec, PlatformSpec, SceneError, SceneLayout};

/// Marker for entities owned by the current scene.
#[derive(Component, Debug, Default)]
pub struct SceneEntity;

/// Camera that tracks the player horizontally.
#[derive(Component, Debug, Default)]
pub struct FollowCamera;

/// Name of the scene currently loaded.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ActiveScene {
    pub name: String,
}

/// Ask for the named scene to be torn down and spawned again.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneReloadRequested {
    pub name: String,
}

/// World units visible vertically.
const VIEW_HEIGHT: f32 = 12.0;

const PLAYER_COLOR: Color = Color::srgb(0.35, 0.75, 1.0);
const PLATFORM_COLOR: Color = Color::srgb(0.4, 0.4, 0.45);
const HAZARD_COLOR: Color = Color::srgb(0.9, 0.25, 0.2);
const BAR_COLOR: Color = Color::srgb(0.2, 0.85, 0.3);
const BAR_BACK_COLOR: Color = Color::srgb(0.15, 0.15, 0.15);

fn v2(p: (f32, f32)) -> Vec2 {
    Vec2::new(p.0, p.1)
}

fn block(center: (f32, f32), size: (f32, f32), color: Color, z: f32) -> SpriteBundle {
    SpriteBundle {
        sprite: Sprite { color, custom_size: Some(Vec2::ONE), ..default() },
        transform: Transform::from_translation(v2(center).extend(z)).with_scale(v2(size).extend(1.0)),
        ..default()
    }
}

/// Resolve a layout by name, falling back to the built-in level.
#[must_use]
pub fn resolve_layout(dir: &str, name: &str) -> SceneLayout {
    match load_layout(dir, name) {
        Ok(layout) => layout,
        Err(SceneError::NotFound(_)) => {
            warn!("no layout for scene '{name}' in {dir}, using the built-in level");
            SceneLayout::default()
        }
        Err(e) => {
            warn!("scene '{name}' could not be loaded ({e}), using the built-in level");
            SceneLayout::default()
        }
    }
}

/// Spawn every entity of `layout` under the scene name `name`.
///
/// # Errors
/// Fails before spawning anything if the agent tuning or the health bar
/// geometry is invalid.
pub fn spawn_scene(
    commands: &mut Commands,
    name: &str,
    layout: &SceneLayout,
    settings: &Settings,
) -> Result<(), SceneError> {
    let agent = PlayerAgent::new(settings.agent_config(), name)?;
    let bar_tf = Transform::from_translation(v2(layout.health_bar.position).extend(-1.0))
        .with_scale(v2(layout.health_bar.size).extend(1.0));
    let bar = HealthBar::capture(&bar_tf)?;

    let mut camera = Camera2dBundle::default();
    camera.projection.scaling_mode = ScalingMode::FixedVertical(VIEW_HEIGHT);

    commands
        .spawn((camera, FollowCamera, SceneEntity))
        .with_children(|cam| {
            cam.spawn(block(layout.health_bar.position, layout.health_bar.size, BAR_BACK_COLOR, -1.1));
            cam.spawn((
                SpriteBundle {
                    sprite: Sprite { color: BAR_COLOR, custom_size: Some(Vec2::ONE), ..default() },
                    transform: bar_tf,
                    ..default()
                },
                bar,
            ));
        });

    for p in &layout.platforms {
        commands.spawn((block(p.center, p.size, PLATFORM_COLOR, 0.0), BoxCollider::default(), SceneEntity));
    }
    for h in &layout.hazards {
        commands.spawn((
            block(h.center, h.size, HAZARD_COLOR, 0.0),
            BoxCollider::default(),
            Hazard { damage: h.damage },
            SceneEntity,
        ));
    }

    commands.spawn((
        block(layout.spawn, layout.player_size, PLAYER_COLOR, 1.0),
        Body::default(),
        BoxCollider::default(),
        GroundCheck { offset: settings.player.ground_check_offset },
        Player::new(agent),
        SceneEntity,
    ));

    info!(
        "spawned scene '{name}': {} platforms, {} hazards",
        layout.platforms.len(),
        layout.hazards.len()
    );
    Ok(())
}

fn load_and_spawn(commands: &mut Commands, name: &str, settings: &Settings, exit: &mut EventWriter<AppExit>) {
    let layout = resolve_layout(&settings.scenes.directory, name);
    if let Err(e) = spawn_scene(commands, name, &layout, settings) {
        error!("cannot start scene '{name}': {e}");
        exit.send(AppExit::error());
    }
}

/// Startup system: load the initial scene named in `Settings`.
#[allow(clippy::needless_pass_by_value)]
pub fn load_initial_scene(mut commands: Commands, settings: Res<Settings>, mut exit: EventWriter<AppExit>) {
    let name = settings.scenes.initial.clone();
    load_and_spawn(&mut commands, &name, &settings, &mut exit);
    commands.insert_resource(ActiveScene { name });
}

/// Tear down and respawn the scene when a reload was requested.
///
/// Several requests in one frame collapse into one reload of the last name.
#[allow(clippy::needless_pass_by_value)]
pub fn reload_scene(
    mut commands: Commands,
    mut requests: EventReader<SceneReloadRequested>,
    entities: Query<Entity, (With<SceneEntity>, Without<Parent>)>,
    settings: Res<Settings>,
    mut contacts: ResMut<ActiveContacts>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(request) = requests.read().last().cloned() else { return };

    info!("reloading scene '{}'", request.name);
    for entity in &entities {
        commands.entity(entity).despawn_recursive();
    }
    contacts.0.clear();
    load_and_spawn(&mut commands, &request.name, &settings, &mut exit);
    commands.insert_resource(ActiveScene { name: request.name });
}

/// Keep the scene camera centred on the player horizontally.
#[allow(clippy::needless_pass_by_value)]
pub fn follow_player(
    players: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut cameras: Query<&mut Transform, With<FollowCamera>>,
) {
    let Ok(player) = players.get_single() else { return };
    for mut cam in &mut cameras {
        cam.translation.x = player.translation.x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::event::Events;
    use bevy::ecs::system::RunSystemOnce;

    fn scene_world() -> World {
        let mut world = World::new();
        world.init_resource::<Events<SceneReloadRequested>>();
        world.init_resource::<Events<AppExit>>();
        world.init_resource::<ActiveContacts>();
        let mut settings = Settings::defaults();
        settings.scenes.directory = "/no/such/scenes".to_string();
        world.insert_resource(settings);
        world
    }

    fn count<F: bevy::ecs::query::QueryFilter>(world: &mut World) -> usize {
        world.query_filtered::<Entity, F>().iter(world).count()
    }

    #[test]
    fn initial_scene_spawns_built_in_level() {
        let mut world = scene_world();
        world.run_system_once(load_initial_scene);

        let layout = SceneLayout::default();
        assert_eq!(world.resource::<ActiveScene>().name, "level_1");
        assert_eq!(count::<With<Player>>(&mut world), 1);
        assert_eq!(count::<With<Hazard>>(&mut world), layout.hazards.len());
        assert_eq!(count::<With<HealthBar>>(&mut world), 1);
        assert!(world.resource::<Events<AppExit>>().is_empty());
    }

    #[test]
    fn reload_replaces_scene_with_fresh_agent() {
        let mut world = scene_world();
        world.run_system_once(load_initial_scene);
        let old = world.query_filtered::<Entity, With<Player>>().single(&world);
        world.get_mut::<Player>(old).unwrap().agent.take_damage(100.0);

        world.send_event(SceneReloadRequested { name: "level_1".into() });
        world.send_event(SceneReloadRequested { name: "level_1".into() });
        world.run_system_once(reload_scene);

        assert!(world.get_entity(old).is_none());
        let mut players = world.query::<&Player>();
        let fresh: Vec<&Player> = players.iter(&world).collect();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].agent.health().current(), 100.0);
        assert_eq!(count::<With<FollowCamera>>(&mut world), 1);
    }

    #[test]
    fn invalid_tuning_exits_instead_of_spawning() {
        let mut world = scene_world();
        world.resource_mut::<Settings>().health.max_health = -1.0;
        world.run_system_once(load_initial_scene);

        assert_eq!(count::<With<Player>>(&mut world), 0);
        assert!(!world.resource::<Events<AppExit>>().is_empty());
    }
}
