//! Keeps the running physics parameters in step with `Settings.physics`.
use bevy::prelude::*;
use stride::physics::PhysicsParams;
use stride::settings::Settings;

/// Sync `Settings.physics.{gravity, ground_friction}` into `PhysicsParams`.
/// Lets gravity and friction be tuned from the settings file while running.
pub fn sync_physics_settings(
    settings: Res<Settings>,
    mut params: ResMut<PhysicsParams>,
    mut last: Local<Option<(f32, f32)>>,
) {
    let desired = (settings.physics.gravity, settings.physics.ground_friction);
    if *last == Some(desired) { return; }

    params.gravity = desired.0;
    params.ground_friction = desired.1;
    *last = Some(desired);
}
